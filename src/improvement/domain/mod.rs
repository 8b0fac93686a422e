//! Domain types for message improvement.

mod result;

pub use result::{
    DEFAULT_IMPROVER, ERROR_KEY, IMPROVER_NOT_FOUND, ImprovementContext, ImprovementType,
    MessageImprovementResult,
};
