//! Logical image resources and the name-keyed registry

use crate::backend::types::{LoadAction, PixelFormat, StoreAction};
use crate::frame_graph::pass::PassId;
use glam::Vec4;
use std::collections::HashMap;

/// Unique identifier for a frame graph resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(pub(crate) u32);

/// Describes attachment dimensions, either literal or relative to the
/// backbuffer's declared size
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttachmentSize {
    /// Fraction of the backbuffer size (1.0 = full size)
    SwapchainRelative { width: f32, height: f32 },
    /// Absolute size in pixels
    Absolute { width: u32, height: u32 },
}

impl Default for AttachmentSize {
    fn default() -> Self {
        AttachmentSize::SwapchainRelative {
            width: 1.0,
            height: 1.0,
        }
    }
}

impl AttachmentSize {
    pub fn resolve(&self, base_width: u32, base_height: u32) -> (u32, u32) {
        match self {
            AttachmentSize::Absolute { width, height } => (*width, *height),
            AttachmentSize::SwapchainRelative { width, height } => (
                ((base_width as f32) * width) as u32,
                ((base_height as f32) * height) as u32,
            ),
        }
    }

    /// Literal pixel dimensions, if this size does not depend on the
    /// backbuffer
    pub fn absolute(&self) -> Option<(u32, u32)> {
        match self {
            AttachmentSize::Absolute { width, height } => Some((*width, *height)),
            AttachmentSize::SwapchainRelative { .. } => None,
        }
    }
}

/// Static configuration for a logical image, immutable once bound to a
/// resource
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentDescriptor {
    pub size: AttachmentSize,
    pub format: PixelFormat,
    pub load_action: LoadAction,
    pub store_action: StoreAction,
    pub clear_color: Vec4,
    pub clear_depth: f32,
    pub clear_stencil: u32,
}

impl Default for AttachmentDescriptor {
    fn default() -> Self {
        Self {
            size: AttachmentSize::default(),
            format: PixelFormat::Rgba8Unorm,
            load_action: LoadAction::Clear,
            store_action: StoreAction::Store,
            clear_color: Vec4::ZERO,
            clear_depth: 1.0,
            clear_stencil: 0,
        }
    }
}

/// Resource type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Texture,
    DepthStencil,
}

/// A named logical image node
///
/// Reader/writer back-references are pass indices into the owning graph,
/// populated when a pass referencing this resource is declared.
#[derive(Debug)]
pub struct Resource {
    pub(crate) name: String,
    pub(crate) kind: ResourceKind,
    pub(crate) desc: AttachmentDescriptor,
    pub(crate) readers: Vec<PassId>,
    pub(crate) writers: Vec<PassId>,
}

impl Resource {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn descriptor(&self) -> &AttachmentDescriptor {
        &self.desc
    }

    /// Passes that declared a read of this resource
    pub fn readers(&self) -> &[PassId] {
        &self.readers
    }

    /// Passes that declared a write of this resource
    pub fn writers(&self) -> &[PassId] {
        &self.writers
    }
}

/// Get-or-create store of resources keyed by name
///
/// Lookups are get-or-create: re-declaring an existing name returns the
/// original resource and ignores a differing kind or descriptor. There is no
/// removal; resources live as long as the registry.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: Vec<Resource>,
    names: HashMap<String, ResourceId>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the resource registered under `name`
    pub fn create_resource(
        &mut self,
        name: &str,
        kind: ResourceKind,
        desc: AttachmentDescriptor,
    ) -> ResourceId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }

        let id = ResourceId(self.resources.len() as u32);
        self.resources.push(Resource {
            name: name.to_string(),
            kind,
            desc,
            readers: Vec::new(),
            writers: Vec::new(),
        });
        self.names.insert(name.to_string(), id);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<ResourceId> {
        self.names.get(name).copied()
    }

    pub fn get(&self, id: ResourceId) -> &Resource {
        &self.resources[id.0 as usize]
    }

    pub(crate) fn get_mut(&mut self, id: ResourceId) -> &mut Resource {
        &mut self.resources[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
