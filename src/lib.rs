//! Frame Graph - a declarative frame graph for GPU pass scheduling
//!
//! Rendering code declares, per frame, a set of passes and the logical image
//! resources they read and write instead of manually sequencing GPU commands
//! and managing image lifetimes.
//!
//! # Features
//! - Name-keyed, get-or-create resource registry
//! - Graphics and compute passes with setup/execute callbacks
//! - Backward-reachability bake: the minimal pass order that produces the
//!   backbuffer, with dead passes dropped and independent passes always kept
//! - On-demand materialization of device textures and render-pass objects,
//!   cached across frames
//! - A composition-layer [`Renderer`] fanning lifecycle hooks out to
//!   observers keyed by pass name
//!
//! The render device, swapchain, and command recording are trait-level
//! collaborators (see [`backend`]); this crate never talks to a GPU itself.

pub mod backend;
pub mod frame_graph;
pub mod renderer;

pub use backend::traits::{
    BufferHandle, CommandList, ComputePipelineHandle, ComputeRecorder, DeviceError, DeviceResult,
    FramebufferBinding, GraphicsRecorder, IndexFormat, RenderDevice, RenderPassHandle,
    RenderPipelineHandle, Swapchain, TextureHandle,
};
pub use backend::types::{
    ColorAttachmentDesc, DepthAttachmentDesc, LoadAction, PixelFormat, RenderPassInfo,
    StencilAttachmentDesc, StoreAction, TextureDesc, TextureUsage,
};
pub use frame_graph::{
    AttachmentDescriptor, AttachmentSize, FrameGraph, Pass, PassBuilder, PassHooks, PassId,
    PassKind, Resource, ResourceId, ResourceKind, ResourceRegistry,
};
pub use renderer::{RenderObserver, Renderer};
