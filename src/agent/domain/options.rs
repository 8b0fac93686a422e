//! Per-call options for message processing.

use crate::conversation::domain::Metadata;
use serde::{Deserialize, Serialize};

/// Options accepted by [`crate::agent::services::AgentService::process_message`].
///
/// # Examples
///
/// ```
/// use parley::agent::domain::ProcessOptions;
///
/// let options = ProcessOptions::new().with_improver("professional");
/// assert!(options.should_improve());
/// assert!(!ProcessOptions::new().skip_improvement().should_improve());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessOptions {
    /// `Some(false)` skips improvement entirely.
    pub improve_message: Option<bool>,
    /// Improver to use instead of the active one.
    pub improver_name: Option<String>,
    /// Extra context merged into the improver context.
    pub context: Option<Metadata>,
}

impl ProcessOptions {
    /// Creates options that improve with the active improver.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            improve_message: None,
            improver_name: None,
            context: None,
        }
    }

    /// Disables improvement for this call.
    #[must_use]
    pub const fn skip_improvement(mut self) -> Self {
        self.improve_message = Some(false);
        self
    }

    /// Selects an explicit improver for this call.
    #[must_use]
    pub fn with_improver(mut self, name: impl Into<String>) -> Self {
        self.improver_name = Some(name.into());
        self
    }

    /// Adds caller context passed to the improver.
    #[must_use]
    pub fn with_context(mut self, context: Metadata) -> Self {
        self.context = Some(context);
        self
    }

    /// Returns `false` only when improvement was explicitly disabled.
    #[must_use]
    pub const fn should_improve(&self) -> bool {
        !matches!(self.improve_message, Some(false))
    }
}
