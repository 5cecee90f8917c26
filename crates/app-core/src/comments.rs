//! Comment drafts

use crate::content::{ContentField, ContentKind, Draft};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A comment or reply as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDraft {
    /// Comment text
    pub text: String,
}

impl CommentDraft {
    /// Create a comment draft
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Whether the comment has any visible text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl Draft for CommentDraft {
    fn kind(&self) -> ContentKind {
        ContentKind::Comment
    }

    fn fields(&self) -> Vec<(ContentField, Option<Cow<'_, str>>)> {
        vec![(ContentField::Comment, Some(Cow::Borrowed(self.text.as_str())))]
    }

    fn moderation_text(&self) -> String {
        self.text.clone()
    }
}
