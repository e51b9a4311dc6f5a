//! The value-materialization seam.

use crate::node::ValueNode;

/// External collaborator that turns an expanded node into a concrete
/// value of type `V`.
///
/// The engine hands over each node together with its children's
/// already-produced values, bottom-up and in child order; how leaves are
/// sampled and how an object is assembled from field values is entirely
/// the introspector's concern.
pub trait Introspector<V> {
    /// Synthesize the value for `node` from its children's values.
    ///
    /// `children` is empty for leaves. Its order matches
    /// `node.children()`.
    fn introspect(&self, node: &ValueNode<V>, children: Vec<V>) -> V;

    /// The value standing in for absence when the node's null-injection
    /// draw fires.
    fn absent(&self, node: &ValueNode<V>) -> V;
}
