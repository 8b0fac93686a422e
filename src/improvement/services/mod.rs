//! Application services for message improvement.

mod registry;

pub use registry::ImproverRegistry;
