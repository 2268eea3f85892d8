mod alert_dto;
mod leaderboard_dto;
mod stats_dto;
mod story_dto;

pub use alert_dto::AlertReportDto;
pub use leaderboard_dto::{LeaderboardEntryDto, LeaderboardSnapshotDto};
pub use stats_dto::{DashboardSnapshotDto, StreakProgressDto, UserStatsDto};
pub use story_dto::{ContributorDto, GeneratedStoryPartDto, StoryDto};
