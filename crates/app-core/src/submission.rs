//! Submission gate
//!
//! Every post, comment and profile passes three checks before it is
//! saved, in this order:
//!
//! 1. the local banned-word filter on each field
//! 2. the remote moderation service on the combined text
//! 3. the image safety gate on any attached image
//!
//! The first failing check blocks the submission. A collaborator that
//! cannot answer also blocks it; an outage is never treated as a pass.

use crate::comments::CommentDraft;
use crate::content::{ContentField, ContentKind, Draft};
use crate::posts::PostDraft;
use crate::profiles::ProfileDraft;
use media_processing::ImageSafetyChecker;
use moderation::{Term, WordFilter};
use networking::ModerationService;
use std::sync::Arc;
use thiserror::Error;

/// Why a submission was refused
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// A field contains a banned term
    #[error("Banned word {term:?} in {field}")]
    BannedWord {
        /// The offending field
        field: ContentField,
        /// First offending term in lexicon order
        term: Term,
    },

    /// The remote moderation service flagged the content
    #[error("Content flagged by moderation service: {kind}")]
    Flagged {
        /// The kind of content
        kind: ContentKind,
    },

    /// The remote moderation service could not be reached
    #[error("Moderation service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The attached image was classified as unsafe
    #[error("Attached image is unsafe")]
    UnsafeImage,

    /// The attached image could not be checked
    #[error("Image check failed: {0}")]
    ImageCheckFailed(String),
}

impl SubmissionError {
    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::BannedWord { field, term } => format!(
                "Your {} contains inappropriate or banned words (\"{}\" in the {}). Please revise and try again.",
                field.kind().noun(),
                term,
                field
            ),
            SubmissionError::Flagged { kind: ContentKind::Post } => {
                "Your post contains content that is not allowed (politically sensitive or inappropriate). Please revise and try again.".to_string()
            }
            SubmissionError::Flagged { kind } => format!(
                "Your {} contains content that is considered inappropriate or toxic. Please revise and try again.",
                kind.noun()
            ),
            SubmissionError::ServiceUnavailable(_) => {
                "Content moderation service is unavailable. Please try again later.".to_string()
            }
            SubmissionError::UnsafeImage => {
                "The attached image appears to contain inappropriate content. Please choose a different image.".to_string()
            }
            SubmissionError::ImageCheckFailed(_) => {
                "We couldn't verify the attached image. Please try again later.".to_string()
            }
        }
    }

    /// Whether the same submission may succeed later without edits
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SubmissionError::ServiceUnavailable(_) | SubmissionError::ImageCheckFailed(_)
        )
    }
}

/// Result type for submission checks
pub type Result<T> = std::result::Result<T, SubmissionError>;

/// Composes the local filter, the remote moderation service and the image
/// gate into one blocking decision
#[derive(Clone)]
pub struct SubmissionGate {
    filter: WordFilter,
    service: Arc<dyn ModerationService>,
    images: Option<ImageSafetyChecker>,
}

impl SubmissionGate {
    /// Create a gate with the default word filter and no image checker
    pub fn new(service: Arc<dyn ModerationService>) -> Self {
        Self {
            filter: WordFilter::default(),
            service,
            images: None,
        }
    }

    /// Use a specific word filter
    pub fn with_filter(mut self, filter: WordFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Check attached images with `checker`
    pub fn with_image_checker(mut self, checker: ImageSafetyChecker) -> Self {
        self.images = Some(checker);
        self
    }

    /// The local word filter
    pub fn filter(&self) -> &WordFilter {
        &self.filter
    }

    /// Run only the local filter
    ///
    /// Cheap and synchronous, so it can run on every keystroke to show the
    /// warning before the user submits.
    pub fn check_locally<D: Draft + ?Sized>(&self, draft: &D) -> Result<()> {
        for (field, text) in draft.fields() {
            let verdict = self.filter.detect(text.as_deref());
            if let Some(term) = verdict.first_term() {
                tracing::info!(kind = %draft.kind(), field = %field, term, "submission blocked by word filter");
                return Err(SubmissionError::BannedWord { field, term });
            }
        }
        Ok(())
    }

    /// Run every check on a draft
    pub async fn review<D: Draft + ?Sized>(&self, draft: &D) -> Result<()> {
        self.check_locally(draft)?;
        self.check_remotely(draft).await?;
        self.check_image(draft).await
    }

    /// Review a post
    pub async fn review_post(&self, post: &PostDraft) -> Result<()> {
        self.review(post).await
    }

    /// Review a comment
    pub async fn review_comment(&self, comment: &CommentDraft) -> Result<()> {
        self.review(comment).await
    }

    /// Review a profile
    pub async fn review_profile(&self, profile: &ProfileDraft) -> Result<()> {
        self.review(profile).await
    }

    async fn check_remotely<D: Draft + ?Sized>(&self, draft: &D) -> Result<()> {
        let text = draft.moderation_text();
        if text.trim().is_empty() {
            return Ok(());
        }

        match self.service.is_flagged(&text).await {
            Ok(false) => Ok(()),
            Ok(true) => {
                tracing::info!(kind = %draft.kind(), "submission flagged by moderation service");
                Err(SubmissionError::Flagged { kind: draft.kind() })
            }
            Err(err) => {
                tracing::warn!(kind = %draft.kind(), error = %err, "moderation service unavailable");
                Err(SubmissionError::ServiceUnavailable(err.to_string()))
            }
        }
    }

    async fn check_image<D: Draft + ?Sized>(&self, draft: &D) -> Result<()> {
        let Some(bytes) = draft.image() else {
            return Ok(());
        };

        let Some(checker) = &self.images else {
            tracing::warn!(kind = %draft.kind(), "image attached but no image checker configured");
            return Err(SubmissionError::ImageCheckFailed(
                "no image checker configured".to_string(),
            ));
        };

        match checker.is_image_safe_async(bytes.to_vec()).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::info!(kind = %draft.kind(), "submission blocked by image gate");
                Err(SubmissionError::UnsafeImage)
            }
            Err(err) => {
                tracing::warn!(kind = %draft.kind(), error = %err, "image check failed");
                Err(SubmissionError::ImageCheckFailed(err.to_string()))
            }
        }
    }
}

impl std::fmt::Debug for SubmissionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionGate")
            .field("filter", &self.filter)
            .field("images", &self.images)
            .finish_non_exhaustive()
    }
}
