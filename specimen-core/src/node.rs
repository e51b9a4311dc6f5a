//! Tree node data model: container sizing, declarative nodes, and
//! expanded value nodes.

use std::fmt;
use std::sync::Arc;

use crate::data::RandomSource;
use crate::error::{Result, SpecimenError};
use crate::introspect::Introspector;
use crate::property::{NameResolver, Property, ValueSupplier};

/// Inclusive container size bounds.
///
/// Invariant: `0 <= min <= max`. `min == max` is the valid degenerate
/// case of a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSizeInfo {
    min: usize,
    max: usize,
}

impl ContainerSizeInfo {
    /// Create validated bounds; fails when `min > max`.
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min > max {
            return Err(SpecimenError::InvalidBounds { min, max });
        }
        Ok(ContainerSizeInfo { min, max })
    }

    /// Fixed-size bounds with `min == max`.
    pub const fn exact(size: usize) -> Self {
        ContainerSizeInfo {
            min: size,
            max: size,
        }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Draw a size uniformly over `[min, max]` inclusive, consuming
    /// exactly one draw from the source.
    pub fn sample(&self, source: &mut RandomSource) -> usize {
        let span = (self.max - self.min + 1) as u64;
        self.min + source.next_bounded(span) as usize
    }
}

impl Default for ContainerSizeInfo {
    /// The global default bounds `[0, 3]`.
    fn default() -> Self {
        ContainerSizeInfo { min: 0, max: 3 }
    }
}

impl fmt::Display for ContainerSizeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// The declarative description of one tree position.
///
/// Produced by a shape generator: the originating property, the ordered
/// child-property list (empty for leaves), the null-injection
/// probability, the sibling index, and container sizing metadata when
/// the position is container-shaped.
pub struct GenerationNode<V> {
    property: Arc<Property<V>>,
    name_resolver: Arc<dyn NameResolver>,
    null_probability: f64,
    index: Option<usize>,
    children: Vec<Arc<Property<V>>>,
    container_info: Option<ContainerSizeInfo>,
}

impl<V> GenerationNode<V> {
    pub fn new(
        property: Arc<Property<V>>,
        name_resolver: Arc<dyn NameResolver>,
        null_probability: f64,
        index: Option<usize>,
        children: Vec<Arc<Property<V>>>,
        container_info: Option<ContainerSizeInfo>,
    ) -> Self {
        GenerationNode {
            property,
            name_resolver,
            null_probability,
            index,
            children,
            container_info,
        }
    }

    /// The originating property.
    pub fn property(&self) -> &Arc<Property<V>> {
        &self.property
    }

    /// The property name under the configured resolution strategy.
    pub fn resolved_name(&self) -> String {
        self.name_resolver.resolve(self.property.name())
    }

    /// Probability in `[0, 1]` that this node's value is replaced with
    /// absence at sample time.
    pub fn null_probability(&self) -> f64 {
        self.null_probability
    }

    /// Position among siblings, set when the parent is container-shaped.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Ordered child properties; order is iteration order.
    pub fn children(&self) -> &[Arc<Property<V>>] {
        &self.children
    }

    /// Sizing metadata, present iff the node is container-shaped.
    pub fn container_info(&self) -> Option<ContainerSizeInfo> {
        self.container_info
    }

    /// Pre-set value supplier carried from the property, if any.
    pub fn preset(&self) -> Option<&ValueSupplier<V>> {
        self.property.preset()
    }
}

impl<V> fmt::Debug for GenerationNode<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationNode")
            .field("property", &self.property)
            .field("null_probability", &self.null_probability)
            .field("index", &self.index)
            .field("children", &self.children)
            .field("container_info", &self.container_info)
            .finish()
    }
}

/// The expanded tree node: a [`GenerationNode`] together with its
/// recursively built children and an optional verbatim value supplier.
///
/// Single-owner: a parent exclusively owns its children and no child
/// holds a reference back to its parent. Sampling re-evaluates on every
/// call; nothing is memoized across draws.
pub struct ValueNode<V> {
    node: GenerationNode<V>,
    children: Vec<ValueNode<V>>,
    supplier: Option<ValueSupplier<V>>,
}

impl<V> ValueNode<V> {
    pub fn new(
        node: GenerationNode<V>,
        children: Vec<ValueNode<V>>,
        supplier: Option<ValueSupplier<V>>,
    ) -> Self {
        ValueNode {
            node,
            children,
            supplier,
        }
    }

    pub fn node(&self) -> &GenerationNode<V> {
        &self.node
    }

    /// Built children, in the same order as the node's child properties.
    pub fn children(&self) -> &[ValueNode<V>] {
        &self.children
    }

    /// Whether a pre-set value supplier bypasses generation here.
    pub fn has_preset(&self) -> bool {
        self.supplier.is_some()
    }

    /// Count the total number of nodes in the tree.
    pub fn count_nodes(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.count_nodes())
            .sum::<usize>()
    }

    /// Get the depth of the tree.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.depth())
            .max()
            .unwrap_or(0)
    }

    /// Materialize one concrete value, bottom-up.
    ///
    /// A pre-set supplier wins outright. Otherwise one Bernoulli draw
    /// against the node's null probability decides absence; children are
    /// then sampled in order and handed to the introspector to combine.
    pub fn sample<I>(&self, introspector: &I, source: &mut RandomSource) -> V
    where
        I: Introspector<V> + ?Sized,
    {
        if let Some(supplier) = &self.supplier {
            return supplier();
        }

        if source.next_bernoulli(self.node.null_probability()) {
            return introspector.absent(self);
        }

        let children = self
            .children
            .iter()
            .map(|child| child.sample(introspector, source))
            .collect();
        introspector.introspect(self, children)
    }
}

impl<V> fmt::Debug for ValueNode<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueNode")
            .field("node", &self.node)
            .field("children", &self.children)
            .field("preset", &self.supplier.is_some())
            .finish()
    }
}
