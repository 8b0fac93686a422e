//! Improver implementations shipped with the crate.

pub mod builtin;

pub use builtin::{
    CREATIVE_IMPROVER, CreativeImprover, DefaultImprover, PROFESSIONAL_IMPROVER,
    ProfessionalImprover,
};
