//! Declarative type descriptions driving tree generation.
//!
//! A [`Property`] describes one type-position: its declared type, its
//! structural [`Shape`], its ordered generic arguments, and (for object
//! shapes) its declared fields. Descriptions are supplied explicitly by
//! the caller rather than extracted from a live type system, and are
//! shared by reference (`Arc`) with every node built from them.

use std::fmt;
use std::sync::Arc;

use crate::node::ContainerSizeInfo;

/// A supplier for a pre-set concrete value, returned verbatim instead of
/// a generated one.
pub type ValueSupplier<V> = Arc<dyn Fn() -> V>;

/// Structural category of a property's declared type.
///
/// This is the registry key for shape generators. The specialized
/// optional shapes carry no generic arguments; their element type is
/// fixed by the shape itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A scalar or object type: children are its declared fields.
    Scalar,
    /// A sequence container (list, set, array) with one element type.
    Sequence,
    /// A key-value container with exactly two generic types.
    MapEntry,
    /// A generic optional wrapper with one wrapped type.
    Optional,
    /// An optional wrapper specialized to a 32-bit integer.
    OptionalInt,
    /// An optional wrapper specialized to a 64-bit integer.
    OptionalLong,
    /// An optional wrapper specialized to a double-precision float.
    OptionalDouble,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Scalar => "scalar",
            Shape::Sequence => "sequence",
            Shape::MapEntry => "map-entry",
            Shape::Optional => "optional",
            Shape::OptionalInt => "optional-int",
            Shape::OptionalLong => "optional-long",
            Shape::OptionalDouble => "optional-double",
        };
        write!(f, "{}", name)
    }
}

/// Strategy for turning a property's stable name into a resolved name.
pub trait NameResolver {
    fn resolve(&self, property_name: &str) -> String;
}

/// Default resolver: the property name is used as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNameResolver;

impl NameResolver for IdentityNameResolver {
    fn resolve(&self, property_name: &str) -> String {
        property_name.to_string()
    }
}

/// An opaque description of one type-position.
///
/// Immutable once created; a `Property` outlives every tree built from
/// it. `V` is the concrete value type produced by the external
/// introspector, needed only for pre-set value suppliers.
pub struct Property<V> {
    name: String,
    type_name: String,
    shape: Shape,
    generics: Vec<Arc<Property<V>>>,
    fields: Vec<Arc<Property<V>>>,
    nullable: bool,
    container_size: Option<ContainerSizeInfo>,
    preset: Option<ValueSupplier<V>>,
    index: Option<usize>,
}

impl<V> Property<V> {
    /// A scalar leaf with no fields and no generics.
    pub fn scalar(name: &str, type_name: &str) -> Self {
        Property {
            name: name.to_string(),
            type_name: type_name.to_string(),
            shape: Shape::Scalar,
            generics: Vec::new(),
            fields: Vec::new(),
            nullable: true,
            container_size: None,
            preset: None,
            index: None,
        }
    }

    /// An object type whose children are its declared fields, in order.
    pub fn object(name: &str, type_name: &str, fields: Vec<Property<V>>) -> Self {
        let mut property = Property::scalar(name, type_name);
        property.fields = fields.into_iter().map(Arc::new).collect();
        property
    }

    /// A sequence container with one generic element type.
    pub fn sequence(name: &str, type_name: &str, element: Property<V>) -> Self {
        Property::of(name, type_name, Shape::Sequence, vec![element])
    }

    /// A key-value container with two generic types, key first.
    pub fn map(name: &str, type_name: &str, key: Property<V>, value: Property<V>) -> Self {
        Property::of(name, type_name, Shape::MapEntry, vec![key, value])
    }

    /// A generic optional wrapper around one wrapped type.
    pub fn optional(name: &str, wrapped: Property<V>) -> Self {
        Property::of(name, "Option", Shape::Optional, vec![wrapped])
    }

    /// An optional wrapper specialized to `i32`; carries no generics.
    pub fn optional_int(name: &str) -> Self {
        Property::of(name, "OptionalInt", Shape::OptionalInt, Vec::new())
    }

    /// An optional wrapper specialized to `i64`; carries no generics.
    pub fn optional_long(name: &str) -> Self {
        Property::of(name, "OptionalLong", Shape::OptionalLong, Vec::new())
    }

    /// An optional wrapper specialized to `f64`; carries no generics.
    pub fn optional_double(name: &str) -> Self {
        Property::of(name, "OptionalDouble", Shape::OptionalDouble, Vec::new())
    }

    /// A description with an explicit shape and generic argument list.
    ///
    /// The generic arity is not validated here; the resolved shape
    /// generator checks it when the node is generated.
    pub fn of(name: &str, type_name: &str, shape: Shape, generics: Vec<Property<V>>) -> Self {
        let mut property = Property::scalar(name, type_name);
        property.shape = shape;
        property.generics = generics.into_iter().map(Arc::new).collect();
        property
    }

    /// Declare this type-position non-nullable: no null injection.
    pub fn non_nullable(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Override the container size bounds for this position only.
    pub fn with_container_size(mut self, size: ContainerSizeInfo) -> Self {
        self.container_size = Some(size);
        self
    }

    /// Attach a pre-set value; generation for this position is bypassed
    /// and the supplier's value is returned verbatim on every sample.
    pub fn with_preset<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> V + 'static,
    {
        self.preset = Some(Arc::new(supplier));
        self
    }

    /// An element-at-index view over `source`, used for container
    /// elements. Shares the source's type description but has a distinct
    /// identity per index, so each sibling samples independently.
    /// Public so custom shape generators can mint their own elements.
    pub fn element_of(source: &Property<V>, index: usize) -> Self {
        let mut element = source.clone();
        element.name = format!("[{}]", index);
        element.index = Some(index);
        element
    }

    /// A paired map entry at `index`: an object whose two fields are the
    /// key element and the value element sharing that index.
    pub fn entry_of(key: &Property<V>, value: &Property<V>, index: usize) -> Self {
        let mut entry = Property::object(
            &format!("[{}]", index),
            "Entry",
            Vec::new(),
        );
        entry.fields = vec![
            Arc::new(Property::element_of(key, index)),
            Arc::new(Property::element_of(value, index)),
        ];
        entry.nullable = false;
        entry.index = Some(index);
        entry
    }

    /// Stable name of this type-position, used for child addressing.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type name, carried into error messages.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Structural category, the registry key for shape generators.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Ordered generic arguments: position 0 is the key/element/first
    /// type parameter, position 1 the value/second.
    pub fn generics(&self) -> &[Arc<Property<V>>] {
        &self.generics
    }

    /// Declared fields, in declaration order. Empty for non-object types.
    pub fn fields(&self) -> &[Arc<Property<V>>] {
        &self.fields
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Per-position container size override, if any.
    pub fn container_size(&self) -> Option<ContainerSizeInfo> {
        self.container_size
    }

    /// Pre-set value supplier, if any.
    pub fn preset(&self) -> Option<&ValueSupplier<V>> {
        self.preset.as_ref()
    }

    /// Element position among siblings, set on element views.
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

impl<V> Clone for Property<V> {
    fn clone(&self) -> Self {
        Property {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            shape: self.shape,
            generics: self.generics.clone(),
            fields: self.fields.clone(),
            nullable: self.nullable,
            container_size: self.container_size,
            preset: self.preset.clone(),
            index: self.index,
        }
    }
}

impl<V> fmt::Debug for Property<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("shape", &self.shape)
            .field("generics", &self.generics)
            .field("fields", &self.fields)
            .field("nullable", &self.nullable)
            .field("container_size", &self.container_size)
            .field("preset", &self.preset.is_some())
            .field("index", &self.index)
            .finish()
    }
}
