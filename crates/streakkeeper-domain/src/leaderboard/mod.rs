mod ranking;

pub use ranking::{build_working_set, rank_entries, LeaderboardEntry, RankCandidate};
