//! User-submitted content
//!
//! Every submission form produces a draft made of named text fields. The
//! [`Draft`] trait is what the submission gate sees.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::OnceLock;

/// The kind of content being submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// A blog post
    Post,
    /// A comment on a post
    Comment,
    /// A user profile
    Profile,
}

impl ContentKind {
    /// Noun used in user-facing messages
    pub fn noun(&self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Comment => "comment",
            ContentKind::Profile => "profile",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.noun())
    }
}

/// A text field of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentField {
    /// Post title
    Title,
    /// Post body
    Body,
    /// Comment text
    Comment,
    /// Profile username
    Username,
    /// Profile first name
    FirstName,
    /// Profile last name
    LastName,
    /// Profile biography
    Bio,
}

impl ContentField {
    /// The kind of content this field belongs to
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentField::Title | ContentField::Body => ContentKind::Post,
            ContentField::Comment => ContentKind::Comment,
            ContentField::Username
            | ContentField::FirstName
            | ContentField::LastName
            | ContentField::Bio => ContentKind::Profile,
        }
    }

    /// Human-readable field name
    pub fn label(&self) -> &'static str {
        match self {
            ContentField::Title => "title",
            ContentField::Body => "body",
            ContentField::Comment => "comment",
            ContentField::Username => "username",
            ContentField::FirstName => "first name",
            ContentField::LastName => "last name",
            ContentField::Bio => "bio",
        }
    }
}

impl std::fmt::Display for ContentField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Content that passes through the submission gate
pub trait Draft: Send + Sync {
    /// The kind of content
    fn kind(&self) -> ContentKind;

    /// Text fields in the order they are checked
    ///
    /// Missing optional fields are `None`.
    fn fields(&self) -> Vec<(ContentField, Option<Cow<'_, str>>)>;

    /// The text sent to the remote moderation service
    ///
    /// Defaults to the present fields joined by newlines.
    fn moderation_text(&self) -> String {
        self.fields()
            .into_iter()
            .filter_map(|(_, text)| text)
            .filter(|text| !text.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Attached image bytes, if any
    fn image(&self) -> Option<&[u8]> {
        None
    }
}

/// Remove HTML tags, keeping the text between them
pub fn strip_tags(html: &str) -> Cow<'_, str> {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]+>").unwrap());
    re.replace_all(html, "")
}
