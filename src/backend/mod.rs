//! Device abstraction layer
//!
//! Traits and shared value types for the render device, swapchain, and
//! command-recording collaborators the frame graph drives.

pub mod traits;
pub mod types;

pub use traits::*;
pub use types::*;
