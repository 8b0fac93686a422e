//! Adapters for the agent runtime ports.

pub mod bridge;
pub mod directory;

pub use bridge::LocalBridge;
pub use directory::HttpDirectoryClient;
