// GitHub API module.
// Provides client, retry policy, and types for interacting with the GitHub REST API.

pub mod client;
pub mod endpoints;
pub mod retry;
pub mod types;

pub use client::GitHubClient;
pub use retry::RetryPolicy;
pub use types::*;
