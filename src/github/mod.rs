pub mod client;

pub use client::{GitHubClient, DEFAULT_API_URL};
