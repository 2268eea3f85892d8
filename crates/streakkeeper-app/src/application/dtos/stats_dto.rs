use serde::{Deserialize, Serialize};

use streakkeeper_domain::dashboard::DashboardPhase;
use streakkeeper_domain::shared::Identity;
use streakkeeper_domain::streak::{StatisticsLookup, StreakProgress};

use super::LeaderboardSnapshotDto;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakProgressDto {
    pub target: u64,
    /// Whole-number percentage, capped at 100
    pub percentage: u32,
    pub completed: bool,
    pub message: String,
}

impl From<StreakProgress> for StreakProgressDto {
    fn from(progress: StreakProgress) -> Self {
        Self {
            target: progress.target,
            percentage: progress.rounded_percentage(),
            completed: progress.completed,
            message: progress.message().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatsDto {
    pub address: String,
    pub current_streak: u64,
    pub max_streak: u64,
    pub total_checkins: u64,
    /// False when the ledger has no record of this address yet
    pub registered: bool,
    pub progress: StreakProgressDto,
}

impl UserStatsDto {
    pub fn from_lookup(identity: &Identity, lookup: StatisticsLookup) -> Self {
        let registered = lookup.is_found();
        let stats = lookup.into_statistics();

        Self {
            address: identity.to_string(),
            current_streak: stats.current_streak,
            max_streak: stats.max_streak,
            total_checkins: stats.total_checkins,
            registered,
            progress: StreakProgress::from_streak(stats.current_streak).into(),
        }
    }
}

/// Everything the dashboard shows after one load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshotDto {
    pub phase: DashboardPhase,
    pub stats: Option<UserStatsDto>,
    pub leaderboard: LeaderboardSnapshotDto,
}
