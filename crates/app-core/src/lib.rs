//! Core application logic for Stellar Press
//!
//! This crate holds the drafts users submit (posts, comments, profiles)
//! and the submission gate that decides whether they may be published.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod comments;
pub mod content;
pub mod posts;
pub mod profiles;
pub mod submission;

pub use comments::CommentDraft;
pub use content::{ContentField, ContentKind, Draft};
pub use posts::PostDraft;
pub use profiles::ProfileDraft;
pub use submission::{SubmissionError, SubmissionGate};
