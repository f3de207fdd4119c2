//! Frame graph: pass declaration, dependency baking, and per-frame
//! materialization
//!
//! Passes declare logical reads/writes against registry resources. Each frame
//! `execute` bakes the minimal pass order that produces the backbuffer,
//! allocates any device resources and render-pass objects not yet cached, and
//! records every baked pass exactly once. Both caches only ever grow, apart
//! from the backbuffer entry (replaced every frame with that frame's
//! swapchain image) and an explicit [`FrameGraph::invalidate`].

use crate::backend::traits::{
    CommandList, ComputeRecorder, DeviceResult, FramebufferBinding, GraphicsRecorder,
    RenderDevice, RenderPassHandle, TextureHandle,
};
use crate::backend::types::{
    ColorAttachmentDesc, DepthAttachmentDesc, RenderPassInfo, StencilAttachmentDesc, TextureDesc,
    TextureUsage,
};
use crate::frame_graph::pass::{Pass, PassBuilder, PassId, PassKind};
use crate::frame_graph::resource::{
    AttachmentDescriptor, AttachmentSize, Resource, ResourceId, ResourceKind, ResourceRegistry,
};
use std::collections::{HashMap, HashSet, VecDeque};

/// Per-pass lifecycle hooks fired during [`FrameGraph::execute_with_hooks`]
///
/// The composition layer uses this to fan recording notifications out to
/// observers; all hooks default to no-ops.
pub trait PassHooks {
    fn pass_begin(&mut self, pass: &str) {
        let _ = pass;
    }

    fn pass_prepare(&mut self, pass: &str) {
        let _ = pass;
    }

    fn pass_end(&mut self, pass: &str) {
        let _ = pass;
    }
}

struct NoHooks;

impl PassHooks for NoHooks {}

/// The frame graph
///
/// Owns the resource registry, the declared pass list, and the two
/// materialization caches. Single-threaded: declaration and execution must
/// happen on one execution context.
pub struct FrameGraph {
    registry: ResourceRegistry,
    backbuffer: Option<ResourceId>,
    passes: Vec<Pass>,
    resource_cache: HashMap<ResourceId, TextureHandle>,
    pass_cache: HashMap<PassId, RenderPassHandle>,
}

impl FrameGraph {
    pub fn new() -> Self {
        Self {
            registry: ResourceRegistry::new(),
            backbuffer: None,
            passes: Vec::new(),
            resource_cache: HashMap::new(),
            pass_cache: HashMap::new(),
        }
    }

    /// Get or create the logical resource registered under `name`
    pub fn create_resource(
        &mut self,
        name: &str,
        kind: ResourceKind,
        desc: AttachmentDescriptor,
    ) -> ResourceId {
        self.registry.create_resource(name, kind, desc)
    }

    pub fn lookup_resource(&self, name: &str) -> Option<ResourceId> {
        self.registry.lookup(name)
    }

    pub fn resource(&self, id: ResourceId) -> &Resource {
        self.registry.get(id)
    }

    /// Designate the graph's final-output resource
    pub fn set_backbuffer(&mut self, id: ResourceId) {
        self.backbuffer = Some(id);
    }

    pub fn backbuffer(&self) -> Option<ResourceId> {
        self.backbuffer
    }

    /// Declare a graphics pass: `setup` collects read/write declarations
    /// against a fresh builder, `callback` records commands when the pass
    /// runs
    pub fn add_graphics_pass(
        &mut self,
        name: &str,
        setup: impl FnOnce(&mut PassBuilder),
        callback: impl Fn(&Pass, &mut dyn GraphicsRecorder) + 'static,
    ) -> PassId {
        self.add_pass(name, setup, PassKind::Graphics(Box::new(callback)))
    }

    /// Declare a compute pass
    pub fn add_compute_pass(
        &mut self,
        name: &str,
        setup: impl FnOnce(&mut PassBuilder),
        callback: impl Fn(&Pass, &mut dyn ComputeRecorder) + 'static,
    ) -> PassId {
        self.add_pass(name, setup, PassKind::Compute(Box::new(callback)))
    }

    fn add_pass(
        &mut self,
        name: &str,
        setup: impl FnOnce(&mut PassBuilder),
        kind: PassKind,
    ) -> PassId {
        let id = PassId(self.passes.len() as u32);

        let mut builder = PassBuilder::new();
        setup(&mut builder);
        let pass = builder.build(name.to_string(), kind);

        // Wire reader/writer back-references on every declared resource.
        for &input in &pass.inputs {
            self.registry.get_mut(input).readers.push(id);
        }
        for &output in &pass.outputs {
            self.registry.get_mut(output).writers.push(id);
        }

        self.passes.push(pass);
        id
    }

    pub fn pass(&self, id: PassId) -> &Pass {
        &self.passes[id.0 as usize]
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Compute the minimal, dependency-correct pass order that produces the
    /// backbuffer
    ///
    /// Walks writer edges backward from the backbuffer, propagating the
    /// needed frontier through each discovered pass's reads, then appends all
    /// independent passes and reverses into producer-before-consumer order.
    /// Passes that do not reach the backbuffer are dropped, which permits
    /// speculative registration. A read/write cycle is broken arbitrarily by
    /// the visited check rather than reported. No backbuffer means an empty
    /// order.
    pub fn bake(&self) -> Vec<PassId> {
        let Some(backbuffer) = self.backbuffer else {
            return Vec::new();
        };

        let mut independent = Vec::new();
        let mut writers: HashMap<ResourceId, Vec<PassId>> = HashMap::new();
        for (index, pass) in self.passes.iter().enumerate() {
            let id = PassId(index as u32);
            if pass.is_independent() {
                independent.push(id);
                continue;
            }
            for &output in pass.outputs() {
                writers.entry(output).or_default().push(id);
            }
        }

        let mut queue: VecDeque<ResourceId> = VecDeque::new();
        queue.push_back(backbuffer);

        let mut visited: HashSet<PassId> = HashSet::new();
        let mut discovered: Vec<PassId> = Vec::new();

        while let Some(resource) = queue.pop_front() {
            let Some(producers) = writers.get(&resource) else {
                continue;
            };
            for &pass_id in producers {
                if !visited.insert(pass_id) {
                    continue;
                }
                discovered.push(pass_id);
                queue.extend(self.passes[pass_id.0 as usize].inputs().iter().copied());
            }
        }

        if log::log_enabled!(log::Level::Debug) {
            for (index, pass) in self.passes.iter().enumerate() {
                let id = PassId(index as u32);
                if !pass.is_independent() && !visited.contains(&id) {
                    log::debug!("pass '{}' does not reach the backbuffer, dropped", pass.name());
                }
            }
        }

        discovered.extend(independent);

        // Traversal found consumers before their producers; reverse into
        // execution order.
        discovered.reverse();
        discovered
    }

    /// Bake, materialize, and record one frame
    ///
    /// `backbuffer` is this frame's concrete swapchain image; its cache entry
    /// is the only one replaced rather than appended.
    pub fn execute(
        &mut self,
        device: &mut dyn RenderDevice,
        commands: &mut dyn CommandList,
        backbuffer: TextureHandle,
    ) -> DeviceResult<()> {
        self.execute_with_hooks(device, commands, backbuffer, &mut NoHooks)
    }

    /// [`FrameGraph::execute`] with per-pass lifecycle hooks
    pub fn execute_with_hooks(
        &mut self,
        device: &mut dyn RenderDevice,
        commands: &mut dyn CommandList,
        backbuffer: TextureHandle,
        hooks: &mut dyn PassHooks,
    ) -> DeviceResult<()> {
        let order = self.bake();
        if order.is_empty() {
            return Ok(());
        }

        let backbuffer_id = self
            .backbuffer
            .expect("non-empty bake without a backbuffer");
        self.resource_cache.insert(backbuffer_id, backbuffer);

        let used = self.collect_used_resources(&order);
        self.materialize_resources(device, &used, backbuffer_id)?;
        self.materialize_pass_descriptors(device, &order)?;
        self.record(commands, &order, hooks);

        Ok(())
    }

    /// Drop every cached device handle, forcing re-materialization on the
    /// next `execute`
    ///
    /// Call after a change that invalidates descriptors, e.g. a display
    /// resize. The old device objects are not destroyed here; the graph never
    /// owns them.
    pub fn invalidate(&mut self) {
        self.resource_cache.clear();
        self.pass_cache.clear();
        for pass in &mut self.passes {
            pass.render_pass = None;
        }
        log::debug!("frame graph caches invalidated");
    }

    /// Union of all inputs and outputs of the baked passes, first-seen order
    fn collect_used_resources(&self, order: &[PassId]) -> Vec<ResourceId> {
        let mut used = Vec::new();
        let mut seen = HashSet::new();
        for &pass_id in order {
            let pass = &self.passes[pass_id.0 as usize];
            for &id in pass.inputs().iter().chain(pass.outputs().iter()) {
                if seen.insert(id) {
                    used.push(id);
                }
            }
        }
        used
    }

    fn materialize_resources(
        &mut self,
        device: &mut dyn RenderDevice,
        used: &[ResourceId],
        backbuffer_id: ResourceId,
    ) -> DeviceResult<()> {
        for &id in used {
            if self.resource_cache.contains_key(&id) {
                continue;
            }

            let resource = self.registry.get(id);
            let mut usage = TextureUsage::NONE;
            if !resource.readers().is_empty() {
                usage |= TextureUsage::TEXTURE_BINDING;
            }
            if !resource.writers().is_empty() {
                usage |= TextureUsage::RENDER_ATTACHMENT;
            }

            let (width, height) = match resource.descriptor().size {
                AttachmentSize::Absolute { width, height } => (width, height),
                AttachmentSize::SwapchainRelative { .. } => {
                    let (base_width, base_height) = self
                        .registry
                        .get(backbuffer_id)
                        .descriptor()
                        .size
                        .absolute()
                        .expect(
                            "swapchain-relative resource requires a backbuffer declared with absolute dimensions",
                        );
                    resource.descriptor().size.resolve(base_width, base_height)
                }
            };

            let handle = device.create_texture(&TextureDesc {
                label: Some(resource.name().to_string()),
                width,
                height,
                format: resource.descriptor().format,
                usage,
                initial_data: None,
            })?;
            log::debug!(
                "materialized resource '{}' ({}x{})",
                resource.name(),
                width,
                height
            );
            self.resource_cache.insert(id, handle);
        }
        Ok(())
    }

    fn materialize_pass_descriptors(
        &mut self,
        device: &mut dyn RenderDevice,
        order: &[PassId],
    ) -> DeviceResult<()> {
        for &pass_id in order {
            if self.pass_cache.contains_key(&pass_id) {
                continue;
            }

            let pass = &self.passes[pass_id.0 as usize];
            let mut info = RenderPassInfo::new();
            let mut color_index = 0u32;

            for &output in pass.outputs() {
                let resource = self.registry.get(output);
                let desc = resource.descriptor();
                match resource.kind() {
                    ResourceKind::Texture => {
                        info.add_color_attachment(ColorAttachmentDesc {
                            format: desc.format,
                            load_action: desc.load_action,
                            store_action: desc.store_action,
                            clear_color: desc.clear_color,
                            index: color_index,
                        });
                        color_index += 1;
                    }
                    ResourceKind::DepthStencil => {
                        assert!(
                            info.depth_attachment.is_none(),
                            "pass '{}' declares more than one depth-stencil output",
                            pass.name()
                        );
                        info.depth_attachment = Some(DepthAttachmentDesc {
                            format: desc.format,
                            load_action: desc.load_action,
                            store_action: desc.store_action,
                            clear_depth: desc.clear_depth,
                        });
                        info.stencil_attachment = Some(StencilAttachmentDesc {
                            format: desc.format,
                            load_action: desc.load_action,
                            store_action: desc.store_action,
                            clear_stencil: desc.clear_stencil,
                        });
                    }
                }
            }

            let handle = device.create_render_pass(&info, pass.name())?;
            self.pass_cache.insert(pass_id, handle);
            self.passes[pass_id.0 as usize].render_pass = Some(handle);
        }
        Ok(())
    }

    fn record(&self, commands: &mut dyn CommandList, order: &[PassId], hooks: &mut dyn PassHooks) {
        for &pass_id in order {
            let pass = &self.passes[pass_id.0 as usize];
            hooks.pass_begin(pass.name());
            hooks.pass_prepare(pass.name());

            match &pass.kind {
                PassKind::Compute(callback) => {
                    let recorder = commands.begin_compute();
                    callback(pass, recorder);
                    commands.end_compute();
                }
                PassKind::Graphics(callback) => {
                    let framebuffer = self.bind_outputs(pass);
                    let render_pass = self.pass_cache.get(&pass_id).copied().unwrap_or_else(|| {
                        panic!("pass '{}' missing from descriptor cache at record time", pass.name())
                    });
                    let recorder = commands.begin_graphics(render_pass, &framebuffer, pass.name());
                    callback(pass, recorder);
                    commands.end_graphics();
                }
            }

            hooks.pass_end(pass.name());
        }
    }

    /// Bind each output's cached device texture into a framebuffer binding:
    /// textures as indexed color attachments in output order, a depth-stencil
    /// output as both the depth and stencil slot
    fn bind_outputs(&self, pass: &Pass) -> FramebufferBinding {
        let mut framebuffer = FramebufferBinding::new();
        let mut color_index = 0u32;
        for &output in pass.outputs() {
            let handle = self.resource_cache.get(&output).copied().unwrap_or_else(|| {
                panic!(
                    "resource '{}' missing from cache at record time",
                    self.registry.get(output).name()
                )
            });
            match self.registry.get(output).kind() {
                ResourceKind::Texture => {
                    framebuffer.set_color_attachment(handle, color_index);
                    color_index += 1;
                }
                ResourceKind::DepthStencil => {
                    framebuffer.set_depth_attachment(handle);
                    framebuffer.set_stencil_attachment(handle);
                }
            }
        }
        framebuffer
    }
}

impl Default for FrameGraph {
    fn default() -> Self {
        Self::new()
    }
}
