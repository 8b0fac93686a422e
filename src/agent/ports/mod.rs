//! Ports the agent runtime depends on.

pub mod channel;
pub mod directory;
pub mod http;

pub use channel::{ChannelError, ChannelResult, ErrorHandler, InboundChannel, MessageHandler};
pub use directory::{DirectoryClient, DirectoryError, DirectoryResult};
pub use http::{HttpSurface, HttpSurfaceError, HttpSurfaceResult};
