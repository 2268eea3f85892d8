// Infrastructure layer - Technical implementations
// Depends on domain layer, implements its interfaces

pub mod clarity;
pub mod config;
pub mod http;
pub mod logging;
pub mod notification;
