//! Frame driver and observer fan-out
//!
//! The renderer owns a [`FrameGraph`] and drives it once per frame: acquire
//! the swapchain image, execute the graph, submit, present. Around each baked
//! pass it notifies the observers registered under that pass's name. It
//! contains no dependency logic of its own.

use crate::backend::traits::{DeviceResult, RenderDevice, Swapchain};
use crate::frame_graph::{FrameGraph, PassHooks};
use std::collections::HashMap;

/// Lifecycle hooks for subsystems that follow a pass's recording
///
/// All hooks default to no-ops; implement only what you need.
pub trait RenderObserver {
    fn on_frame_begin(&mut self) {}

    fn on_frame_end(&mut self) {}

    fn on_pass_begin(&mut self, pass: &str) {
        let _ = pass;
    }

    fn on_pass_prepare(&mut self, pass: &str) {
        let _ = pass;
    }

    /// Reserved submit hook; the renderer does not invoke it currently.
    fn on_pass_submit(&mut self, pass: &str) {
        let _ = pass;
    }

    fn on_pass_end(&mut self, pass: &str) {
        let _ = pass;
    }
}

/// Drives one frame graph per frame and fans lifecycle notifications out to
/// observers keyed by pass name
pub struct Renderer {
    graph: FrameGraph,
    observers: HashMap<String, Vec<Box<dyn RenderObserver>>>,
}

impl Renderer {
    pub fn new(graph: FrameGraph) -> Self {
        Self {
            graph,
            observers: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &FrameGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut FrameGraph {
        &mut self.graph
    }

    /// Register an observer for the pass named `pass`
    ///
    /// Observers only receive pass hooks for passes that are actually baked;
    /// frame hooks fire regardless.
    pub fn add_observer(&mut self, pass: &str, observer: Box<dyn RenderObserver>) {
        self.observers.entry(pass.to_string()).or_default().push(observer);
    }

    /// Render one frame: acquire, execute the graph, submit, present
    pub fn render_frame(
        &mut self,
        device: &mut dyn RenderDevice,
        swapchain: &mut dyn Swapchain,
    ) -> DeviceResult<()> {
        for observer in self.observers.values_mut().flatten() {
            observer.on_frame_begin();
        }

        let image = swapchain.begin()?;
        let mut commands = device.create_command_list()?;

        let mut hooks = ObserverHooks {
            observers: &mut self.observers,
        };
        self.graph
            .execute_with_hooks(device, commands.as_mut(), image, &mut hooks)?;

        device.submit(commands)?;
        swapchain.present(image)?;

        for observer in self.observers.values_mut().flatten() {
            observer.on_frame_end();
        }

        Ok(())
    }
}

/// Adapts the graph's pass hooks onto the observer lists
struct ObserverHooks<'a> {
    observers: &'a mut HashMap<String, Vec<Box<dyn RenderObserver>>>,
}

impl PassHooks for ObserverHooks<'_> {
    fn pass_begin(&mut self, pass: &str) {
        if let Some(list) = self.observers.get_mut(pass) {
            for observer in list {
                observer.on_pass_begin(pass);
            }
        }
    }

    fn pass_prepare(&mut self, pass: &str) {
        if let Some(list) = self.observers.get_mut(pass) {
            for observer in list {
                observer.on_pass_prepare(pass);
            }
        }
    }

    fn pass_end(&mut self, pass: &str) {
        if let Some(list) = self.observers.get_mut(pass) {
            for observer in list {
                observer.on_pass_end(pass);
            }
        }
    }
}
