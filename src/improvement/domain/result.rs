//! The result envelope returned by every improvement attempt.

use crate::conversation::domain::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the improver that always exists and cannot be removed.
pub const DEFAULT_IMPROVER: &str = "default";

/// Metadata key carrying the cause of a `none` result.
pub const ERROR_KEY: &str = "error";

/// Error text recorded when the requested improver is not registered.
pub const IMPROVER_NOT_FOUND: &str = "Improver not found";

/// Context passed to improvers.
///
/// Carries `conversationId`, `messageId` and `role` when invoked from the
/// processing pipeline, plus any caller-supplied extensions.
pub type ImprovementContext = Metadata;

/// How a message was (or was not) improved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementType {
    /// The built-in `default` improver produced the text.
    Default,
    /// A non-default improver produced the text.
    Custom,
    /// No transformation was applied.
    None,
}

impl ImprovementType {
    /// Classifies a successful run of the improver registered as `name`.
    #[must_use]
    pub fn for_improver(name: &str) -> Self {
        if name == DEFAULT_IMPROVER {
            Self::Default
        } else {
            Self::Custom
        }
    }

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Custom => "custom",
            Self::None => "none",
        }
    }
}

impl fmt::Display for ImprovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an improvement attempt.
///
/// Improvement is fail-open: whenever `improvement_type` is
/// [`ImprovementType::None`], `improved_message` equals `original_message`.
///
/// # Examples
///
/// ```
/// use parley::improvement::domain::{ImprovementType, MessageImprovementResult};
///
/// let result = MessageImprovementResult::failed("hi", "boom");
/// assert_eq!(result.improvement_type, ImprovementType::None);
/// assert_eq!(result.improved_message, "hi");
/// assert_eq!(result.error(), Some("boom"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageImprovementResult {
    /// The text handed to the improver.
    pub original_message: String,
    /// The text after improvement.
    pub improved_message: String,
    /// Which kind of improvement happened.
    pub improvement_type: ImprovementType,
    /// Extra detail, such as the failure cause under `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl MessageImprovementResult {
    /// Records a successful improvement.
    #[must_use]
    pub fn improved(
        original: impl Into<String>,
        improved: impl Into<String>,
        improvement_type: ImprovementType,
    ) -> Self {
        Self {
            original_message: original.into(),
            improved_message: improved.into(),
            improvement_type,
            metadata: None,
        }
    }

    /// Records a skipped improvement, passing the text through unchanged.
    #[must_use]
    pub fn unchanged(original: impl Into<String>, metadata: Option<Metadata>) -> Self {
        let original_message = original.into();
        Self {
            improved_message: original_message.clone(),
            original_message,
            improvement_type: ImprovementType::None,
            metadata,
        }
    }

    /// Records a failed improvement, passing the text through unchanged.
    #[must_use]
    pub fn failed(original: impl Into<String>, error: impl Into<String>) -> Self {
        Self::unchanged(original, Some(Metadata::new().with(ERROR_KEY, error.into())))
    }

    /// Returns the failure cause, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.get_str(ERROR_KEY))
    }

    /// Returns `true` when the text was transformed by an improver.
    #[must_use]
    pub fn is_improved(&self) -> bool {
        self.improvement_type != ImprovementType::None
    }
}
