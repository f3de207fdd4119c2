//! Shared test infrastructure: recording implementations of the device
//! collaborator traits that never touch a GPU.
//!
//! Every device call and recording-scope transition is captured so tests can
//! assert on materialization and command order after the fact.

use std::cell::RefCell;
use std::rc::Rc;

use frame_graph::{
    CommandList, ComputePipelineHandle, ComputeRecorder, DeviceResult, FramebufferBinding,
    GraphicsRecorder, IndexFormat, PixelFormat, RenderDevice, RenderPassHandle, RenderPassInfo,
    RenderPipelineHandle, Swapchain, TextureDesc, TextureHandle, TextureUsage,
};

/// Initialize test logging; safe to call from every test.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One captured device-level call.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateTexture {
        label: Option<String>,
        width: u32,
        height: u32,
        format: PixelFormat,
        usage: TextureUsage,
        handle: TextureHandle,
    },
    CreateRenderPass {
        label: String,
        info: RenderPassInfo,
        handle: RenderPassHandle,
    },
    Submit,
}

/// One captured recording-scope transition or draw/dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeEvent {
    BeginGraphics {
        pass: RenderPassHandle,
        label: String,
        framebuffer: FramebufferBinding,
    },
    EndGraphics,
    BeginCompute,
    EndCompute,
    Draw,
    Dispatch { x: u32, y: u32, z: u32 },
}

/// Recording render device. Handles are issued from 100 upward so tests can
/// use small literals for externally provided swapchain images.
pub struct RecordingDevice {
    next_handle: u64,
    pub calls: Vec<DeviceCall>,
    pub events: Rc<RefCell<Vec<ScopeEvent>>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            next_handle: 100,
            calls: Vec::new(),
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The texture-creation calls carrying the given debug label.
    pub fn texture_creations(&self, label: &str) -> Vec<&DeviceCall> {
        self.calls
            .iter()
            .filter(|call| {
                matches!(call, DeviceCall::CreateTexture { label: l, .. } if l.as_deref() == Some(label))
            })
            .collect()
    }

    /// The handle issued for the texture with the given label, if created.
    pub fn texture_handle(&self, label: &str) -> Option<TextureHandle> {
        self.calls.iter().find_map(|call| match call {
            DeviceCall::CreateTexture {
                label: l, handle, ..
            } if l.as_deref() == Some(label) => Some(*handle),
            _ => None,
        })
    }

    /// Render-pass descriptors created so far, as (label, info) pairs.
    pub fn render_passes(&self) -> Vec<(String, RenderPassInfo)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::CreateRenderPass { label, info, .. } => {
                    Some((label.clone(), info.clone()))
                }
                _ => None,
            })
            .collect()
    }

    #[allow(dead_code)]
    pub fn take_events(&self) -> Vec<ScopeEvent> {
        self.events.borrow_mut().drain(..).collect()
    }
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderDevice for RecordingDevice {
    fn create_texture(&mut self, desc: &TextureDesc) -> DeviceResult<TextureHandle> {
        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        self.calls.push(DeviceCall::CreateTexture {
            label: desc.label.clone(),
            width: desc.width,
            height: desc.height,
            format: desc.format,
            usage: desc.usage,
            handle,
        });
        Ok(handle)
    }

    fn create_render_pass(
        &mut self,
        info: &RenderPassInfo,
        label: &str,
    ) -> DeviceResult<RenderPassHandle> {
        let handle = RenderPassHandle(self.next_handle);
        self.next_handle += 1;
        self.calls.push(DeviceCall::CreateRenderPass {
            label: label.to_string(),
            info: info.clone(),
            handle,
        });
        Ok(handle)
    }

    fn create_command_list(&mut self) -> DeviceResult<Box<dyn CommandList>> {
        Ok(Box::new(RecordingCommandList {
            events: Rc::clone(&self.events),
        }))
    }

    fn submit(&mut self, _commands: Box<dyn CommandList>) -> DeviceResult<()> {
        self.calls.push(DeviceCall::Submit);
        Ok(())
    }
}

/// Command list that appends scope transitions into the device's shared
/// event log. Doubles as both recorder types.
pub struct RecordingCommandList {
    events: Rc<RefCell<Vec<ScopeEvent>>>,
}

impl CommandList for RecordingCommandList {
    fn begin_graphics(
        &mut self,
        pass: RenderPassHandle,
        framebuffer: &FramebufferBinding,
        label: &str,
    ) -> &mut dyn GraphicsRecorder {
        self.events.borrow_mut().push(ScopeEvent::BeginGraphics {
            pass,
            label: label.to_string(),
            framebuffer: framebuffer.clone(),
        });
        self
    }

    fn end_graphics(&mut self) {
        self.events.borrow_mut().push(ScopeEvent::EndGraphics);
    }

    fn begin_compute(&mut self) -> &mut dyn ComputeRecorder {
        self.events.borrow_mut().push(ScopeEvent::BeginCompute);
        self
    }

    fn end_compute(&mut self) {
        self.events.borrow_mut().push(ScopeEvent::EndCompute);
    }
}

impl GraphicsRecorder for RecordingCommandList {
    fn set_render_pipeline(&mut self, _pipeline: RenderPipelineHandle) {}

    fn set_vertex_buffer(&mut self, _slot: u32, _buffer: frame_graph::BufferHandle, _offset: u64) {}

    fn set_index_buffer(
        &mut self,
        _buffer: frame_graph::BufferHandle,
        _offset: u64,
        _format: IndexFormat,
    ) {
    }

    fn set_viewport(
        &mut self,
        _x: f32,
        _y: f32,
        _width: f32,
        _height: f32,
        _min_depth: f32,
        _max_depth: f32,
    ) {
    }

    fn set_scissor_rect(&mut self, _x: u32, _y: u32, _width: u32, _height: u32) {}

    fn draw(&mut self, _vertices: std::ops::Range<u32>, _instances: std::ops::Range<u32>) {
        self.events.borrow_mut().push(ScopeEvent::Draw);
    }

    fn draw_indexed(
        &mut self,
        _indices: std::ops::Range<u32>,
        _base_vertex: i32,
        _instances: std::ops::Range<u32>,
    ) {
        self.events.borrow_mut().push(ScopeEvent::Draw);
    }
}

impl ComputeRecorder for RecordingCommandList {
    fn set_compute_pipeline(&mut self, _pipeline: ComputePipelineHandle) {}

    fn dispatch(&mut self, x: u32, y: u32, z: u32) {
        self.events.borrow_mut().push(ScopeEvent::Dispatch { x, y, z });
    }
}

/// Swapchain stub handing out sequential image handles starting at 1.
pub struct RecordingSwapchain {
    format: PixelFormat,
    width: u32,
    height: u32,
    next_image: u64,
    pub presented: Vec<TextureHandle>,
}

impl RecordingSwapchain {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            format: PixelFormat::Bgra8Unorm,
            width,
            height,
            next_image: 1,
            presented: Vec::new(),
        }
    }

    #[allow(dead_code)]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Swapchain for RecordingSwapchain {
    fn begin(&mut self) -> DeviceResult<TextureHandle> {
        let image = TextureHandle(self.next_image);
        self.next_image += 1;
        Ok(image)
    }

    fn present(&mut self, image: TextureHandle) -> DeviceResult<()> {
        self.presented.push(image);
        Ok(())
    }

    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}
