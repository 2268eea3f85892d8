use serde::{Deserialize, Serialize};

/// Consecutive check-in days required for the streak NFT
pub const NFT_STREAK_TARGET: u64 = 7;

/// Snapshot of one identity's streak record as reported by the ledger.
///
/// `current_streak <= max_streak` is upheld by the contract and only
/// propagated here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatistics {
    pub current_streak: u64,
    pub max_streak: u64,
    pub total_checkins: u64,
}

impl UserStatistics {
    pub fn new(current_streak: u64, max_streak: u64, total_checkins: u64) -> Self {
        Self {
            current_streak,
            max_streak,
            total_checkins,
        }
    }

    /// Record of an identity with no recorded activity
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Outcome of a successful ledger lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticsLookup {
    Found(UserStatistics),
    NotFound,
}

impl StatisticsLookup {
    /// A missing record counts as zero activity
    pub fn into_statistics(self) -> UserStatistics {
        match self {
            StatisticsLookup::Found(stats) => stats,
            StatisticsLookup::NotFound => UserStatistics::zero(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, StatisticsLookup::Found(_))
    }
}

/// Progress toward the streak NFT milestone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreakProgress {
    pub current_streak: u64,
    pub target: u64,
    pub percentage: f64,
    pub completed: bool,
}

impl StreakProgress {
    pub fn from_streak(current_streak: u64) -> Self {
        let percentage = (current_streak as f64 / NFT_STREAK_TARGET as f64 * 100.0).min(100.0);

        Self {
            current_streak,
            target: NFT_STREAK_TARGET,
            percentage,
            completed: current_streak >= NFT_STREAK_TARGET,
        }
    }

    /// Whole-number percentage for display
    pub fn rounded_percentage(&self) -> u32 {
        self.percentage.round() as u32
    }

    pub fn message(&self) -> &'static str {
        if self.completed {
            "Congratulations! You've received an NFT!"
        } else {
            "Check in for 7 consecutive days to automatically receive an NFT!"
        }
    }
}
