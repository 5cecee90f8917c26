//! Networking for Stellar Press
//!
//! This crate talks to the remote content moderation service: an HTTP
//! client with timeout handling and retry with exponential backoff, behind
//! the [`ModerationService`] trait so callers can substitute a mock.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod retry;

pub use client::{ModerationClient, ModerationClientConfig, ModerationService};
pub use error::{Result, ServiceError};
pub use retry::{retry, RetryConfig};
