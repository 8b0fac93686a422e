//! Registry of named improvers with an active selection.
//!
//! Provides [`ImproverRegistry`], which owns every improver, tracks which
//! one is active, and applies improvers with per-invocation isolation.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::FutureExt;
use tracing::{debug, error, warn};

use crate::improvement::{
    adapters::{
        CREATIVE_IMPROVER, CreativeImprover, DefaultImprover, PROFESSIONAL_IMPROVER,
        ProfessionalImprover,
    },
    domain::{
        DEFAULT_IMPROVER, IMPROVER_NOT_FOUND, ImprovementContext, ImprovementType,
        MessageImprovementResult,
    },
    error::{ImproverError, ImproverResult},
    ports::{FnImprover, MessageImprover},
};

const UNDESCRIBED_FAILURE: &str = "improver failed";

struct RegistryState {
    improvers: HashMap<String, Arc<dyn MessageImprover>>,
    active: String,
}

/// Named improvers plus the currently active selection.
///
/// # Invariants
///
/// - `"default"` is always registered and cannot be removed
/// - the active name always refers to a registered improver
///
/// Improvers run outside the internal lock, so a slow improver never
/// blocks registration or selection.
///
/// # Examples
///
/// ```
/// use parley::improvement::services::ImproverRegistry;
///
/// let registry = ImproverRegistry::new();
/// registry.register_fn("shout", |text: &str, _context: &_| Ok(text.to_uppercase()));
/// assert!(registry.set_active("shout"));
/// assert_eq!(registry.active(), "shout");
/// ```
pub struct ImproverRegistry {
    state: RwLock<RegistryState>,
}

impl ImproverRegistry {
    /// Creates a registry seeded with the `default`, `professional` and
    /// `creative` improvers, with `default` active.
    #[must_use]
    pub fn new() -> Self {
        let registry = Self::with_default_only();
        {
            let mut state = registry.write_state();
            state
                .improvers
                .insert(PROFESSIONAL_IMPROVER.to_owned(), Arc::new(ProfessionalImprover));
            state
                .improvers
                .insert(CREATIVE_IMPROVER.to_owned(), Arc::new(CreativeImprover));
        }
        registry
    }

    /// Creates a registry holding only the `default` improver.
    #[must_use]
    pub fn with_default_only() -> Self {
        let mut improvers: HashMap<String, Arc<dyn MessageImprover>> = HashMap::new();
        improvers.insert(DEFAULT_IMPROVER.to_owned(), Arc::new(DefaultImprover));
        Self {
            state: RwLock::new(RegistryState {
                improvers,
                active: DEFAULT_IMPROVER.to_owned(),
            }),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `improver` under `name`, replacing any existing entry.
    ///
    /// Replacing an entry is logged as a warning.
    pub fn register(&self, name: impl Into<String>, improver: Arc<dyn MessageImprover>) {
        let improver_name = name.into();
        let replaced = self
            .write_state()
            .improvers
            .insert(improver_name.clone(), improver)
            .is_some();
        if replaced {
            warn!(improver = %improver_name, "overwriting registered message improver");
        } else {
            debug!(improver = %improver_name, "registered message improver");
        }
    }

    /// Registers a synchronous closure under `name`.
    pub fn register_fn<F>(&self, name: impl Into<String>, transform: F)
    where
        F: Fn(&str, &ImprovementContext) -> ImproverResult<String> + Send + Sync + 'static,
    {
        self.register(name, Arc::new(FnImprover::new(transform)));
    }

    /// Removes the improver registered as `name`.
    ///
    /// Returns `false` without effect for `"default"`; otherwise returns
    /// whether an entry was removed. Removing the active improver makes
    /// `"default"` active again.
    pub fn unregister(&self, name: &str) -> bool {
        if name == DEFAULT_IMPROVER {
            warn!(improver = name, "refusing to remove the default message improver");
            return false;
        }

        let mut state = self.write_state();
        let removed = state.improvers.remove(name).is_some();
        if removed && state.active == name {
            DEFAULT_IMPROVER.clone_into(&mut state.active);
            debug!(improver = name, "active improver removed; reverted to default");
        }
        removed
    }

    /// Alias of [`ImproverRegistry::unregister`].
    pub fn remove(&self, name: &str) -> bool {
        self.unregister(name)
    }

    /// Makes `name` the active improver.
    ///
    /// Returns `false`, logs an error, and leaves the selection unchanged when
    /// `name` is not registered.
    pub fn set_active(&self, name: &str) -> bool {
        let mut state = self.write_state();
        if !state.improvers.contains_key(name) {
            error!(improver = name, "cannot activate unknown message improver");
            return false;
        }
        name.clone_into(&mut state.active);
        debug!(improver = name, "active message improver changed");
        true
    }

    /// Returns the active improver name.
    #[must_use]
    pub fn active(&self) -> String {
        self.read_state().active.clone()
    }

    /// Returns every registered name, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read_state().improvers.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.read_state().improvers.contains_key(name)
    }

    /// Improves `text` with the active improver.
    ///
    /// The active name and its improver are read together, so a concurrent
    /// [`ImproverRegistry::set_active`] cannot split them. Never fails; see
    /// [`ImproverRegistry::improve_with`].
    pub async fn improve(
        &self,
        text: &str,
        context: &ImprovementContext,
    ) -> MessageImprovementResult {
        let (name, resolved) = {
            let state = self.read_state();
            (
                state.active.clone(),
                state.improvers.get(&state.active).cloned(),
            )
        };
        invoke(&name, resolved, text, context).await
    }

    /// Improves `text` with the improver registered as `name`.
    ///
    /// Does not change the active selection. Never fails: an unknown name,
    /// an improver error or an improver panic all produce an
    /// [`ImprovementType::None`] result carrying the original text and the
    /// cause under `metadata.error`.
    pub async fn improve_with(
        &self,
        name: &str,
        text: &str,
        context: &ImprovementContext,
    ) -> MessageImprovementResult {
        let resolved = self.read_state().improvers.get(name).cloned();
        invoke(name, resolved, text, context).await
    }
}

impl Default for ImproverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ImproverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImproverRegistry")
            .field("active", &self.active())
            .field("improvers", &self.list())
            .finish()
    }
}

async fn invoke(
    name: &str,
    resolved: Option<Arc<dyn MessageImprover>>,
    text: &str,
    context: &ImprovementContext,
) -> MessageImprovementResult {
    let Some(improver) = resolved else {
        warn!(improver = name, "message improver not found");
        return MessageImprovementResult::failed(text, IMPROVER_NOT_FOUND);
    };

    let outcome = AssertUnwindSafe(improver.improve(text, context))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(ImproverError::Panicked(panic_reason(payload.as_ref()))));

    match outcome {
        Ok(improved) => {
            MessageImprovementResult::improved(text, improved, ImprovementType::for_improver(name))
        }
        Err(err) => {
            let mut cause = err.to_string();
            if cause.trim().is_empty() {
                UNDESCRIBED_FAILURE.clone_into(&mut cause);
            }
            error!(improver = name, error = %cause, "message improver failed");
            MessageImprovementResult::failed(text, cause)
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|reason| (*reason).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}
