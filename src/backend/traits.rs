//! Device collaborator traits
//!
//! These traits define the interface the frame graph materializes and records
//! against. Concrete GPU backends implement them outside this crate; the
//! integration tests use a recording device with no GPU behind it.

use crate::backend::types::*;
use thiserror::Error;

/// Device error type
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Failed to create texture: {0}")]
    TextureCreationFailed(String),
    #[error("Failed to create render pass: {0}")]
    RenderPassCreationFailed(String),
    #[error("Failed to create command list: {0}")]
    CommandListCreationFailed(String),
    #[error("Failed to submit command list: {0}")]
    SubmitFailed(String),
    #[error("Failed to acquire next image: {0}")]
    AcquireImageFailed(String),
    #[error("Failed to present: {0}")]
    PresentFailed(String),
    #[error("Out of memory")]
    OutOfMemory,
    #[error("Device lost")]
    DeviceLost,
}

pub type DeviceResult<T> = Result<T, DeviceError>;

/// Handle to a device texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Handle to a device render-pass object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderPassHandle(pub u64);

/// Handle to a device buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle to a render pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderPipelineHandle(pub u64);

/// Handle to a compute pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComputePipelineHandle(pub u64);

/// Index format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    Uint16,
    Uint32,
}

/// Mapping from attachment slots to concrete device textures, rebuilt for
/// every pass every frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramebufferBinding {
    color_attachments: Vec<(u32, TextureHandle)>,
    depth_attachment: Option<TextureHandle>,
    stencil_attachment: Option<TextureHandle>,
}

impl FramebufferBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_color_attachment(&mut self, texture: TextureHandle, index: u32) {
        self.color_attachments.push((index, texture));
    }

    pub fn set_depth_attachment(&mut self, texture: TextureHandle) {
        self.depth_attachment = Some(texture);
    }

    pub fn set_stencil_attachment(&mut self, texture: TextureHandle) {
        self.stencil_attachment = Some(texture);
    }

    pub fn color_attachments(&self) -> &[(u32, TextureHandle)] {
        &self.color_attachments
    }

    pub fn depth_attachment(&self) -> Option<TextureHandle> {
        self.depth_attachment
    }

    pub fn stencil_attachment(&self) -> Option<TextureHandle> {
        self.stencil_attachment
    }
}

/// Main render device trait
///
/// Object creation only; command recording happens on a [`CommandList`]
/// obtained from [`RenderDevice::create_command_list`].
pub trait RenderDevice {
    /// Create a texture
    fn create_texture(&mut self, desc: &TextureDesc) -> DeviceResult<TextureHandle>;

    /// Create a render-pass object from attachment descriptions
    fn create_render_pass(
        &mut self,
        info: &RenderPassInfo,
        label: &str,
    ) -> DeviceResult<RenderPassHandle>;

    /// Create a command list for recording one frame's work
    fn create_command_list(&mut self) -> DeviceResult<Box<dyn CommandList>>;

    /// Submit a recorded command list for execution
    fn submit(&mut self, commands: Box<dyn CommandList>) -> DeviceResult<()>;
}

/// Command recording target for one frame
///
/// Scopes must be strictly nested: a `begin_*` call hands out a recorder that
/// stays valid until the matching `end_*`.
pub trait CommandList {
    /// Open a graphics recording scope against a render pass and the textures
    /// bound for it
    fn begin_graphics(
        &mut self,
        pass: RenderPassHandle,
        framebuffer: &FramebufferBinding,
        label: &str,
    ) -> &mut dyn GraphicsRecorder;

    /// Close the current graphics scope
    fn end_graphics(&mut self);

    /// Open a compute recording scope
    fn begin_compute(&mut self) -> &mut dyn ComputeRecorder;

    /// Close the current compute scope
    fn end_compute(&mut self);
}

/// Recording primitives available inside a graphics scope
pub trait GraphicsRecorder {
    fn set_render_pipeline(&mut self, pipeline: RenderPipelineHandle);

    fn set_vertex_buffer(&mut self, slot: u32, buffer: BufferHandle, offset: u64);

    fn set_index_buffer(&mut self, buffer: BufferHandle, offset: u64, format: IndexFormat);

    fn set_viewport(&mut self, x: f32, y: f32, width: f32, height: f32, min_depth: f32, max_depth: f32);

    fn set_scissor_rect(&mut self, x: u32, y: u32, width: u32, height: u32);

    fn draw(&mut self, vertices: std::ops::Range<u32>, instances: std::ops::Range<u32>);

    fn draw_indexed(
        &mut self,
        indices: std::ops::Range<u32>,
        base_vertex: i32,
        instances: std::ops::Range<u32>,
    );
}

/// Recording primitives available inside a compute scope
pub trait ComputeRecorder {
    fn set_compute_pipeline(&mut self, pipeline: ComputePipelineHandle);

    fn dispatch(&mut self, x: u32, y: u32, z: u32);
}

/// Swapchain collaborator: source of the per-frame backbuffer image
pub trait Swapchain {
    /// Acquire the image for the current frame
    fn begin(&mut self) -> DeviceResult<TextureHandle>;

    /// Present a previously acquired image
    fn present(&mut self, image: TextureHandle) -> DeviceResult<()>;

    /// Format of the swapchain images
    fn pixel_format(&self) -> PixelFormat;

    /// Resize the swapchain (e.g. after a window resize)
    fn resize(&mut self, width: u32, height: u32);
}
