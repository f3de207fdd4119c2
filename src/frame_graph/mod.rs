//! Frame Graph System
//!
//! A declarative system for defining GPU passes and the logical image
//! resources they read and write. The graph derives a minimal
//! producer-before-consumer execution order from the declarations each frame
//! and materializes device resources and pass descriptors on demand, caching
//! them across frames.

pub mod graph;
pub mod pass;
pub mod resource;

pub use graph::*;
pub use pass::*;
pub use resource::*;
