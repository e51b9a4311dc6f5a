//! Shape generators: one per structural category.
//!
//! A shape generator decides, for one tree position, how many children
//! the node has, what each child's property is, and how null and size
//! decisions are sampled. Generators are resolved through the registry
//! in [`GenerateOptions`] and are caller-replaceable per shape.

use std::sync::Arc;

use crate::data::{GenerateOptions, RandomSource};
use crate::error::{Result, SpecimenError};
use crate::node::{ContainerSizeInfo, GenerationNode};
use crate::property::{Property, Shape};

/// Ephemeral per-step context handed to a shape generator.
///
/// Bundles the current property, its sibling index (set only for
/// container elements), the parent node when not at the root, the shared
/// options, and the explicit random source. Never retained beyond the
/// `generate` call it is built for.
pub struct GenerationContext<'a, V> {
    property: Arc<Property<V>>,
    index: Option<usize>,
    parent: Option<&'a GenerationNode<V>>,
    options: &'a GenerateOptions<V>,
    source: &'a mut RandomSource,
}

impl<'a, V> GenerationContext<'a, V> {
    /// Context for the root position: no parent, no sibling index.
    pub fn root(
        property: Arc<Property<V>>,
        options: &'a GenerateOptions<V>,
        source: &'a mut RandomSource,
    ) -> Self {
        GenerationContext {
            property,
            index: None,
            parent: None,
            options,
            source,
        }
    }

    /// Context for a child position under `parent`.
    pub fn child(
        property: Arc<Property<V>>,
        index: Option<usize>,
        parent: &'a GenerationNode<V>,
        options: &'a GenerateOptions<V>,
        source: &'a mut RandomSource,
    ) -> Self {
        GenerationContext {
            property,
            index,
            parent: Some(parent),
            options,
            source,
        }
    }

    pub fn property(&self) -> &Arc<Property<V>> {
        &self.property
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn parent(&self) -> Option<&GenerationNode<V>> {
        self.parent
    }

    pub fn options(&self) -> &GenerateOptions<V> {
        self.options
    }

    pub fn source(&mut self) -> &mut RandomSource {
        self.source
    }
}

/// One generator per structural kind.
///
/// Implementations fail fast with [`SpecimenError::InvalidShape`] when
/// the property's generic arity does not match the shape's requirement;
/// the traversal propagates the failure and aborts the whole build.
pub trait ShapeGenerator<V> {
    fn generate(&self, ctx: GenerationContext<'_, V>) -> Result<GenerationNode<V>>;
}

fn arity_error<V>(property: &Property<V>, expected: usize) -> SpecimenError {
    SpecimenError::InvalidShape {
        type_name: property.type_name().to_string(),
        shape: property.shape(),
        expected,
        actual: property.generics().len(),
    }
}

/// Scalar/object generator: children are the declared fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectGenerator;

impl<V> ShapeGenerator<V> for ObjectGenerator {
    fn generate(&self, ctx: GenerationContext<'_, V>) -> Result<GenerationNode<V>> {
        let property = ctx.property().clone();
        let null_probability = if property.nullable() {
            ctx.options().null_probability()
        } else {
            0.0
        };
        let children = property.fields().to_vec();

        Ok(GenerationNode::new(
            property,
            ctx.options().name_resolver().clone(),
            null_probability,
            ctx.index(),
            children,
            None,
        ))
    }
}

/// Sequence-container generator: one element property per sampled index.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceGenerator;

impl<V> ShapeGenerator<V> for SequenceGenerator {
    fn generate(&self, mut ctx: GenerationContext<'_, V>) -> Result<GenerationNode<V>> {
        let property = ctx.property().clone();
        if property.generics().len() != 1 {
            return Err(arity_error(&property, 1));
        }

        let info = property
            .container_size()
            .unwrap_or_else(|| ctx.options().container_bounds());
        let size = info.sample(ctx.source());

        let element = &property.generics()[0];
        let children = (0..size)
            .map(|index| Arc::new(Property::element_of(element, index)))
            .collect();

        Ok(GenerationNode::new(
            property.clone(),
            ctx.options().name_resolver().clone(),
            ctx.options().container_null_probability(),
            ctx.index(),
            children,
            Some(info),
        ))
    }
}

/// Map-entry-container generator: paired key/value elements per index.
///
/// Size defaults to exactly 1 when the property carries no override; a
/// map's entry count is a fixed policy, not inferred.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryGenerator;

impl<V> ShapeGenerator<V> for EntryGenerator {
    fn generate(&self, mut ctx: GenerationContext<'_, V>) -> Result<GenerationNode<V>> {
        let property = ctx.property().clone();
        if property.generics().len() != 2 {
            return Err(arity_error(&property, 2));
        }

        let info = property
            .container_size()
            .unwrap_or(ContainerSizeInfo::exact(1));
        let size = info.sample(ctx.source());

        let key = &property.generics()[0];
        let value = &property.generics()[1];
        let children = (0..size)
            .map(|index| Arc::new(Property::entry_of(key, value, index)))
            .collect();

        Ok(GenerationNode::new(
            property.clone(),
            ctx.options().name_resolver().clone(),
            ctx.options().container_null_probability(),
            ctx.index(),
            children,
            Some(info),
        ))
    }
}

/// Optional-wrapper generator.
///
/// Always produces exactly one child, the "present" branch; absence is
/// modeled by the node's null-injection probability, never by a variable
/// child count. The specialized optional shapes map to a fixed primitive
/// element type without consulting generics.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalGenerator;

impl OptionalGenerator {
    fn element_property<V>(property: &Property<V>) -> Result<Property<V>> {
        let fixed = |type_name: &str| {
            Property::element_of(&Property::scalar("value", type_name).non_nullable(), 0)
        };
        match property.shape() {
            Shape::OptionalInt => Ok(fixed("i32")),
            Shape::OptionalLong => Ok(fixed("i64")),
            Shape::OptionalDouble => Ok(fixed("f64")),
            _ => {
                if property.generics().len() != 1 {
                    return Err(arity_error(property, 1));
                }
                Ok(Property::element_of(&property.generics()[0], 0))
            }
        }
    }
}

impl<V> ShapeGenerator<V> for OptionalGenerator {
    fn generate(&self, ctx: GenerationContext<'_, V>) -> Result<GenerationNode<V>> {
        let property = ctx.property().clone();
        let element = Self::element_property(&property)?;
        let info = ContainerSizeInfo::new(0, 1)?;

        Ok(GenerationNode::new(
            property,
            ctx.options().name_resolver().clone(),
            ctx.options().container_null_probability(),
            ctx.index(),
            vec![Arc::new(element)],
            Some(info),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(
        property: Property<()>,
        options: &GenerateOptions<()>,
        seed: u64,
    ) -> Result<GenerationNode<()>> {
        let mut source = RandomSource::from_u64(seed);
        let generator = options.generator_for(&property)?;
        generator.generate(GenerationContext::root(Arc::new(property), options, &mut source))
    }

    #[test]
    fn test_object_children_are_declared_fields() {
        let options = GenerateOptions::new();
        let property = Property::object(
            "user",
            "User",
            vec![
                Property::scalar("name", "String"),
                Property::scalar("age", "i32"),
            ],
        );

        let node = generate(property, &options, 1).unwrap();
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[0].name(), "name");
        assert_eq!(node.children()[1].name(), "age");
        assert!(node.container_info().is_none());
        assert_eq!(node.null_probability(), 0.2);
    }

    #[test]
    fn test_non_nullable_object_gets_zero_probability() {
        let options = GenerateOptions::new();
        let property = Property::object("user", "User", Vec::new()).non_nullable();

        let node = generate(property, &options, 1).unwrap();
        assert_eq!(node.null_probability(), 0.0);
    }

    #[test]
    fn test_sequence_size_within_default_bounds() {
        let options = GenerateOptions::new();
        for seed in 0..50 {
            let property =
                Property::sequence("tags", "Vec", Property::scalar("element", "i32"));
            let node = generate(property, &options, seed).unwrap();

            assert!(node.children().len() <= 3);
            assert_eq!(node.container_info(), Some(ContainerSizeInfo::default()));
            for (index, child) in node.children().iter().enumerate() {
                assert_eq!(child.index(), Some(index));
                assert_eq!(child.type_name(), "i32");
            }
        }
    }

    #[test]
    fn test_sequence_size_override() {
        let options = GenerateOptions::new();
        let property = Property::sequence("tags", "Vec", Property::scalar("element", "i32"))
            .with_container_size(ContainerSizeInfo::exact(2));

        let node = generate(property, &options, 9).unwrap();
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[0].name(), "[0]");
        assert_eq!(node.children()[1].name(), "[1]");
    }

    #[test]
    fn test_sequence_rejects_wrong_arity() {
        let options = GenerateOptions::new();
        let property = Property::of("bad", "Vec", Shape::Sequence, Vec::new());

        let error = generate(property, &options, 1).unwrap_err();
        assert_eq!(
            error,
            SpecimenError::InvalidShape {
                type_name: "Vec".to_string(),
                shape: Shape::Sequence,
                expected: 1,
                actual: 0,
            }
        );
    }

    #[test]
    fn test_entry_defaults_to_exactly_one() {
        let options = GenerateOptions::new();
        for seed in 0..20 {
            let property = Property::map(
                "scores",
                "HashMap",
                Property::scalar("key", "String"),
                Property::scalar("value", "i32"),
            );
            let node = generate(property, &options, seed).unwrap();

            assert_eq!(node.children().len(), 1);
            let entry = &node.children()[0];
            assert_eq!(entry.index(), Some(0));
            assert_eq!(entry.fields().len(), 2);
            assert_eq!(entry.fields()[0].type_name(), "String");
            assert_eq!(entry.fields()[1].type_name(), "i32");
        }
    }

    #[test]
    fn test_entry_size_override() {
        let options = GenerateOptions::new();
        let property = Property::map(
            "scores",
            "HashMap",
            Property::scalar("key", "String"),
            Property::scalar("value", "i32"),
        )
        .with_container_size(ContainerSizeInfo::exact(3));

        let node = generate(property, &options, 4).unwrap();
        assert_eq!(node.children().len(), 3);
        for (index, entry) in node.children().iter().enumerate() {
            assert_eq!(entry.index(), Some(index));
            assert_eq!(entry.fields()[0].index(), Some(index));
            assert_eq!(entry.fields()[1].index(), Some(index));
        }
    }

    #[test]
    fn test_entry_rejects_wrong_arity() {
        let options = GenerateOptions::new();
        for generics in [0, 1, 3] {
            let args = (0..generics)
                .map(|i| Property::scalar(&format!("g{}", i), "i32"))
                .collect();
            let property = Property::of("bad", "HashMap", Shape::MapEntry, args);

            let error = generate(property, &options, 1).unwrap_err();
            assert_eq!(
                error,
                SpecimenError::InvalidShape {
                    type_name: "HashMap".to_string(),
                    shape: Shape::MapEntry,
                    expected: 2,
                    actual: generics,
                }
            );
        }
    }

    #[test]
    fn test_optional_always_has_one_child() {
        let options = GenerateOptions::new();
        let property = Property::optional("nickname", Property::scalar("value", "String"));

        let node = generate(property, &options, 1).unwrap();
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].type_name(), "String");
        assert_eq!(node.children()[0].index(), Some(0));
        assert_eq!(node.container_info(), Some(ContainerSizeInfo::new(0, 1).unwrap()));
    }

    #[test]
    fn test_specialized_optionals_have_fixed_element_types() {
        let options = GenerateOptions::new();
        let cases = [
            (Property::optional_int("a"), "i32"),
            (Property::optional_long("b"), "i64"),
            (Property::optional_double("c"), "f64"),
        ];
        for (property, expected) in cases {
            let node = generate(property, &options, 1).unwrap();
            assert_eq!(node.children().len(), 1);
            assert_eq!(node.children()[0].type_name(), expected);
        }
    }

    #[test]
    fn test_optional_rejects_wrong_arity() {
        let options = GenerateOptions::new();
        for generics in [0, 2] {
            let args = (0..generics)
                .map(|i| Property::scalar(&format!("g{}", i), "i32"))
                .collect();
            let property = Property::of("bad", "Option", Shape::Optional, args);

            let error = generate(property, &options, 1).unwrap_err();
            assert_eq!(
                error,
                SpecimenError::InvalidShape {
                    type_name: "Option".to_string(),
                    shape: Shape::Optional,
                    expected: 1,
                    actual: generics,
                }
            );
        }
    }
}
