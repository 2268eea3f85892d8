// Domain layer - Pure business logic
// No dependencies on infrastructure or presentation layers

pub mod dashboard;
pub mod leaderboard;
pub mod notification;
pub mod session;
pub mod shared;
pub mod story;
pub mod streak;

// Re-exports for convenience
pub use shared::{DomainError, Identity, TxId};
