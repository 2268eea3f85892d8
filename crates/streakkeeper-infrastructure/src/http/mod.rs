pub mod client;
pub mod gemini;
pub mod stacks;

pub use client::{HttpClient, RetryConfig};
pub use gemini::GeminiStoryClient;
pub use stacks::{StacksApiClient, StacksContracts};
