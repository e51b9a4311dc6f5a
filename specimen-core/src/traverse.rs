//! The traversal engine: expands a root property into a value-node tree.

use std::sync::Arc;

use crate::data::{GenerateOptions, RandomSource};
use crate::error::Result;
use crate::node::{GenerationNode, ValueNode};
use crate::property::Property;
use crate::shape::GenerationContext;

/// Recursively expands a root [`Property`](crate::Property) into a full
/// [`ValueNode`] tree.
///
/// Each child property is resolved through the same generator registry
/// as the root, so the traversal handles arbitrarily nested shapes. The
/// random source is consulted once per container/optional node, in
/// traversal order; a fixed seed and a fixed registry yield an identical
/// tree shape on replay.
///
/// Depth is bounded only by the structural depth of the described type.
/// Cycle detection is a caller responsibility: a self-nesting
/// description will not terminate without an externally imposed limit.
pub struct TreeBuilder<V> {
    options: GenerateOptions<V>,
}

impl<V> TreeBuilder<V> {
    pub fn new(options: GenerateOptions<V>) -> Self {
        TreeBuilder { options }
    }

    pub fn options(&self) -> &GenerateOptions<V> {
        &self.options
    }

    /// Build the full tree for `root`, or fail as a whole.
    ///
    /// There is no partial-success mode: the first shape or registry
    /// error anywhere in the tree aborts the build.
    pub fn build(&self, root: Arc<Property<V>>, source: &mut RandomSource) -> Result<ValueNode<V>> {
        let generator = self.options.generator_for(&root)?;
        let node = generator.generate(GenerationContext::root(root, &self.options, source))?;
        self.expand(node, source)
    }

    fn expand(&self, node: GenerationNode<V>, source: &mut RandomSource) -> Result<ValueNode<V>> {
        let mut children = Vec::with_capacity(node.children().len());

        for index in 0..node.children().len() {
            let child_property = node.children()[index].clone();
            let generator = self.options.generator_for(&child_property)?;

            // Sibling index is part of the contract only under a
            // container-shaped parent.
            let sibling_index = node.container_info().map(|_| index);

            let child_node = generator.generate(GenerationContext::child(
                child_property,
                sibling_index,
                &node,
                &self.options,
                source,
            ))?;
            children.push(self.expand(child_node, source)?);
        }

        let supplier = node.preset().cloned();
        Ok(ValueNode::new(node, children, supplier))
    }
}
