//! Pass declaration and the read/write builder

use crate::backend::traits::{ComputeRecorder, GraphicsRecorder, RenderPassHandle};
use crate::frame_graph::resource::ResourceId;

/// Unique identifier for a declared pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassId(pub(crate) u32);

/// Execution callback of a graphics pass, invoked with the pass and an open
/// graphics recording scope
pub type GraphicsPassCallback = Box<dyn Fn(&Pass, &mut dyn GraphicsRecorder)>;

/// Execution callback of a compute pass, invoked with the pass and an open
/// compute recording scope
pub type ComputePassCallback = Box<dyn Fn(&Pass, &mut dyn ComputeRecorder)>;

/// Pass variant, carrying the execution callback for that variant
pub enum PassKind {
    Graphics(GraphicsPassCallback),
    Compute(ComputePassCallback),
}

impl PassKind {
    pub fn is_compute(&self) -> bool {
        matches!(self, PassKind::Compute(_))
    }
}

/// A declared unit of work with fixed input/output resource sets
///
/// Inputs and outputs are fixed at construction. The device render-pass
/// handle is populated lazily, the first time the pass is materialized.
pub struct Pass {
    pub(crate) name: String,
    pub(crate) kind: PassKind,
    pub(crate) inputs: Vec<ResourceId>,
    pub(crate) outputs: Vec<ResourceId>,
    pub(crate) render_pass: Option<RenderPassHandle>,
}

impl Pass {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PassKind {
        &self.kind
    }

    /// Resources this pass reads, in declaration order
    pub fn inputs(&self) -> &[ResourceId] {
        &self.inputs
    }

    /// Resources this pass writes, in declaration order
    pub fn outputs(&self) -> &[ResourceId] {
        &self.outputs
    }

    /// A pass with no declared reads or writes is independent and is included
    /// in every baked order
    pub fn is_independent(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }

    pub fn reads(&self, resource: ResourceId) -> bool {
        self.inputs.contains(&resource)
    }

    pub fn writes(&self, resource: ResourceId) -> bool {
        self.outputs.contains(&resource)
    }

    /// Device render-pass handle, once materialized
    pub fn render_pass(&self) -> Option<RenderPassHandle> {
        self.render_pass
    }
}

/// Collects read/write declarations during a pass setup callback
#[derive(Debug, Default)]
pub struct PassBuilder {
    inputs: Vec<ResourceId>,
    outputs: Vec<ResourceId>,
}

impl PassBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Declare that the pass reads `resource`. Duplicate declarations are
    /// no-ops.
    pub fn read(&mut self, resource: ResourceId) -> &mut Self {
        if !self.inputs.contains(&resource) {
            self.inputs.push(resource);
        }
        self
    }

    /// Declare that the pass writes `resource`. Duplicate declarations are
    /// no-ops.
    pub fn write(&mut self, resource: ResourceId) -> &mut Self {
        if !self.outputs.contains(&resource) {
            self.outputs.push(resource);
        }
        self
    }

    pub(crate) fn build(self, name: String, kind: PassKind) -> Pass {
        Pass {
            name,
            kind,
            inputs: self.inputs,
            outputs: self.outputs,
            render_pass: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_graphics() -> PassKind {
        PassKind::Graphics(Box::new(|_, _| {}))
    }

    #[test]
    fn duplicate_declarations_are_ignored() {
        let mut builder = PassBuilder::new();
        let a = ResourceId(0);
        let b = ResourceId(1);

        builder.read(a).read(a).write(b).write(b).write(b);
        let pass = builder.build("pass".to_string(), noop_graphics());

        assert_eq!(pass.inputs(), &[a]);
        assert_eq!(pass.outputs(), &[b]);
    }

    #[test]
    fn declaration_order_is_preserved() {
        let mut builder = PassBuilder::new();
        let first = ResourceId(3);
        let second = ResourceId(1);
        let third = ResourceId(2);

        builder.write(first).write(second).write(third);
        let pass = builder.build("mrt".to_string(), noop_graphics());

        assert_eq!(pass.outputs(), &[first, second, third]);
    }

    #[test]
    fn pass_without_declarations_is_independent() {
        let pass = PassBuilder::new().build("standalone".to_string(), noop_graphics());
        assert!(pass.is_independent());

        let mut builder = PassBuilder::new();
        builder.write(ResourceId(0));
        let pass = builder.build("writer".to_string(), noop_graphics());
        assert!(!pass.is_independent());
    }
}
