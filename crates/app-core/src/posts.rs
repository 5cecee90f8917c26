//! Post drafts

use crate::content::{strip_tags, ContentField, ContentKind, Draft};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A blog post as submitted from the editor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    /// Post title
    pub title: String,
    /// Rich-text body as HTML
    pub body_html: String,
    /// Attached cover image bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
}

impl PostDraft {
    /// Create a post draft without an image
    pub fn new(title: impl Into<String>, body_html: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body_html: body_html.into(),
            image: None,
        }
    }

    /// Attach an image
    pub fn with_image(mut self, bytes: Vec<u8>) -> Self {
        self.image = Some(bytes);
        self
    }

    /// The body with HTML tags removed
    pub fn plain_body(&self) -> Cow<'_, str> {
        strip_tags(&self.body_html)
    }
}

impl Draft for PostDraft {
    fn kind(&self) -> ContentKind {
        ContentKind::Post
    }

    fn fields(&self) -> Vec<(ContentField, Option<Cow<'_, str>>)> {
        vec![
            (ContentField::Title, Some(Cow::Borrowed(self.title.as_str()))),
            (ContentField::Body, Some(self.plain_body())),
        ]
    }

    /// Title and plain body, newline-separated
    fn moderation_text(&self) -> String {
        format!("{}\n{}", self.title, self.plain_body())
    }

    fn image(&self) -> Option<&[u8]> {
        self.image.as_deref().filter(|bytes| !bytes.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_body() {
        let post = PostDraft::new("Title", "<p>First <em>paragraph</em></p><p>Second</p>");
        assert_eq!(post.plain_body(), "First paragraphSecond");
    }

    #[test]
    fn test_fields_order() {
        let post = PostDraft::new("Hello", "<p>World</p>");
        let fields = post.fields();
        assert_eq!(fields[0], (ContentField::Title, Some(Cow::Borrowed("Hello"))));
        assert_eq!(fields[1].0, ContentField::Body);
        assert_eq!(fields[1].1.as_deref(), Some("World"));
    }

    #[test]
    fn test_moderation_text() {
        let post = PostDraft::new("Hello", "<p>World</p>");
        assert_eq!(post.moderation_text(), "Hello\nWorld");
    }

    #[test]
    fn test_image() {
        let post = PostDraft::new("a", "b");
        assert!(post.image().is_none());

        let post = post.with_image(Vec::new());
        assert!(post.image().is_none());

        let post = post.with_image(vec![1, 2, 3]);
        assert_eq!(post.image(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_deserialize() {
        let post: PostDraft =
            serde_json::from_str(r#"{"title": "T", "bodyHtml": "<p>B</p>"}"#).unwrap();
        assert_eq!(post, PostDraft::new("T", "<p>B</p>"));
    }
}
