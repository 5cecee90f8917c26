//! Profile drafts

use crate::content::{ContentField, ContentKind, Draft};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Editable profile fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    /// Public username
    pub username: String,
    /// First name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Short biography
    #[serde(default)]
    pub bio: Option<String>,
}

impl ProfileDraft {
    /// Create a profile draft with only a username
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    /// Set the first and last name
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Set the biography
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }
}

impl Draft for ProfileDraft {
    fn kind(&self) -> ContentKind {
        ContentKind::Profile
    }

    fn fields(&self) -> Vec<(ContentField, Option<Cow<'_, str>>)> {
        vec![
            (ContentField::Username, Some(Cow::Borrowed(self.username.as_str()))),
            (ContentField::FirstName, self.first_name.as_deref().map(Cow::Borrowed)),
            (ContentField::LastName, self.last_name.as_deref().map(Cow::Borrowed)),
            (ContentField::Bio, self.bio.as_deref().map(Cow::Borrowed)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_are_none() {
        let profile = ProfileDraft::new("stargazer");
        let fields = profile.fields();
        assert_eq!(fields.len(), 4);
        assert!(fields[1].1.is_none());
        assert!(fields[3].1.is_none());
    }

    #[test]
    fn test_moderation_text_skips_missing_fields() {
        let profile = ProfileDraft::new("stargazer").with_bio("I like telescopes");
        assert_eq!(profile.moderation_text(), "stargazer\nI like telescopes");
    }

    #[test]
    fn test_deserialize_partial_profile() {
        let profile: ProfileDraft =
            serde_json::from_str(r#"{"username": "stargazer", "firstName": "Ada"}"#).unwrap();
        assert_eq!(profile.first_name.as_deref(), Some("Ada"));
        assert!(profile.bio.is_none());
    }
}
