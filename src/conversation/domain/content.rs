//! Content blocks carried by messages.

use super::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of payload a content block carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Plain text.
    Text,
    /// An image reference or encoded image.
    Image,
    /// A file reference or encoded file.
    File,
}

impl ContentType {
    /// Every supported content type, in declaration order.
    pub const ALL: [Self; 3] = [Self::Text, Self::Image, Self::File];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One block of message content.
///
/// Serialised with a `type` field naming the kind:
///
/// ```json
/// { "type": "text", "content": "Hello" }
/// ```
///
/// # Examples
///
/// ```
/// use parley::conversation::domain::{ContentBlock, ContentType};
///
/// let block = ContentBlock::text("hello");
/// assert_eq!(block.content_type, ContentType::Text);
/// assert_eq!(block.content, "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// The payload kind.
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// The payload itself; text for `text`, a reference or encoding otherwise.
    pub content: String,
    /// Optional block-level metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ContentBlock {
    /// Creates a block of the given kind.
    #[must_use]
    pub fn new(content_type: ContentType, content: impl Into<String>) -> Self {
        Self {
            content_type,
            content: content.into(),
            metadata: None,
        }
    }

    /// Creates a text block.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ContentType::Text, content)
    }

    /// Creates an image block.
    #[must_use]
    pub fn image(content: impl Into<String>) -> Self {
        Self::new(ContentType::Image, content)
    }

    /// Creates a file block.
    #[must_use]
    pub fn file(content: impl Into<String>) -> Self {
        Self::new(ContentType::File, content)
    }

    /// Attaches block-level metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
