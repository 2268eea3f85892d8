use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use streakkeeper_domain::leaderboard::LeaderboardEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntryDto {
    pub rank: usize,
    pub address: String,
    pub short_address: String,
    pub streak: u64,
    pub total: u64,
    pub is_current_actor: bool,
}

impl From<LeaderboardEntry> for LeaderboardEntryDto {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            rank: entry.rank,
            short_address: entry.identity.short(),
            address: entry.identity.to_string(),
            streak: entry.streak,
            total: entry.total,
            is_current_actor: entry.is_current_actor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardSnapshotDto {
    pub generated_at: DateTime<Utc>,
    pub current_actor: Option<String>,
    pub entries: Vec<LeaderboardEntryDto>,
}

impl LeaderboardSnapshotDto {
    pub fn new(current_actor: Option<String>, entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            generated_at: Utc::now(),
            current_actor,
            entries: entries.into_iter().map(LeaderboardEntryDto::from).collect(),
        }
    }

    pub fn actor_entry(&self) -> Option<&LeaderboardEntryDto> {
        self.entries.iter().find(|e| e.is_current_actor)
    }
}
