//! The improver contract.

use crate::improvement::{
    domain::ImprovementContext,
    error::ImproverResult,
};
use async_trait::async_trait;

/// A named text transformation applied to inbound messages.
///
/// Implementations may be pure or effectful and may fail; the registry
/// isolates every invocation, so neither an `Err` nor a panic reaches the
/// caller.
#[async_trait]
pub trait MessageImprover: Send + Sync {
    /// Transforms `text`, optionally consulting `context`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::improvement::error::ImproverError`] when the text
    /// cannot be improved.
    async fn improve(&self, text: &str, context: &ImprovementContext) -> ImproverResult<String>;
}

/// Adapts a synchronous closure into a [`MessageImprover`].
///
/// # Examples
///
/// ```
/// use parley::improvement::ports::{FnImprover, MessageImprover};
///
/// let shout = FnImprover::new(|text: &str, _context: &_| Ok(text.to_uppercase()));
/// # let _ = &shout as &dyn MessageImprover;
/// ```
pub struct FnImprover<F> {
    transform: F,
}

impl<F> FnImprover<F>
where
    F: Fn(&str, &ImprovementContext) -> ImproverResult<String> + Send + Sync,
{
    /// Wraps `transform`.
    #[must_use]
    pub const fn new(transform: F) -> Self {
        Self { transform }
    }
}

#[async_trait]
impl<F> MessageImprover for FnImprover<F>
where
    F: Fn(&str, &ImprovementContext) -> ImproverResult<String> + Send + Sync,
{
    async fn improve(&self, text: &str, context: &ImprovementContext) -> ImproverResult<String> {
        (self.transform)(text, context)
    }
}
