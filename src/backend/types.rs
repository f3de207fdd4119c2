//! Common value types shared between the frame graph and device backends

use glam::Vec4;

/// Pixel format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8Unorm,
    Bgra8UnormSrgb,
    Rgba16Float,
    Rgba32Float,
    R32Float,
    Rg32Float,
    Depth32Float,
    Depth24PlusStencil8,
}

impl PixelFormat {
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            PixelFormat::Depth32Float | PixelFormat::Depth24PlusStencil8
        )
    }
}

/// What happens to an attachment's contents when a pass begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    DontCare,
    Load,
    Clear,
}

/// What happens to an attachment's contents when a pass ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAction {
    DontCare,
    Store,
}

/// Texture usage flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureUsage(u32);

impl TextureUsage {
    pub const NONE: Self = Self(0);
    pub const COPY_SRC: Self = Self(1 << 0);
    pub const COPY_DST: Self = Self(1 << 1);
    pub const TEXTURE_BINDING: Self = Self(1 << 2);
    pub const STORAGE_BINDING: Self = Self(1 << 3);
    pub const RENDER_ATTACHMENT: Self = Self(1 << 4);

    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for TextureUsage {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for TextureUsage {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Texture descriptor handed to [`RenderDevice::create_texture`]
///
/// [`RenderDevice::create_texture`]: crate::backend::traits::RenderDevice::create_texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    pub label: Option<String>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub usage: TextureUsage,
    /// Optional initial contents, tightly packed
    pub initial_data: Option<Vec<u8>>,
}

impl Default for TextureDesc {
    fn default() -> Self {
        Self {
            label: None,
            width: 1,
            height: 1,
            format: PixelFormat::Rgba8Unorm,
            usage: TextureUsage::TEXTURE_BINDING | TextureUsage::COPY_DST,
            initial_data: None,
        }
    }
}

/// One color attachment slot of a render-pass descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAttachmentDesc {
    pub format: PixelFormat,
    pub load_action: LoadAction,
    pub store_action: StoreAction,
    pub clear_color: Vec4,
    pub index: u32,
}

/// Depth attachment of a render-pass descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct DepthAttachmentDesc {
    pub format: PixelFormat,
    pub load_action: LoadAction,
    pub store_action: StoreAction,
    pub clear_depth: f32,
}

/// Stencil attachment of a render-pass descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct StencilAttachmentDesc {
    pub format: PixelFormat,
    pub load_action: LoadAction,
    pub store_action: StoreAction,
    pub clear_stencil: u32,
}

/// Static description of a render pass: attachment formats and actions,
/// without any concrete image bound yet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPassInfo {
    pub color_attachments: Vec<ColorAttachmentDesc>,
    pub depth_attachment: Option<DepthAttachmentDesc>,
    pub stencil_attachment: Option<StencilAttachmentDesc>,
}

impl RenderPassInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_color_attachment(&mut self, attachment: ColorAttachmentDesc) {
        self.color_attachments.push(attachment);
    }
}
