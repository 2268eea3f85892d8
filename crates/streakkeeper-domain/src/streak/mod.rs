mod source;
mod value_objects;


pub use source::UserStatisticsSource;
#[cfg(test)]
pub use source::MockUserStatisticsSource;
pub use value_objects::{StatisticsLookup, StreakProgress, UserStatistics, NFT_STREAK_TARGET};
