//! Random source and generation options.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, SpecimenError};
use crate::node::ContainerSizeInfo;
use crate::property::{IdentityNameResolver, NameResolver, Property, Shape};
use crate::shape::{
    EntryGenerator, ObjectGenerator, OptionalGenerator, SequenceGenerator, ShapeGenerator,
};

/// Splittable random seed for deterministic tree generation.
///
/// Seeds can be split to create independent random streams, ensuring
/// deterministic and reproducible generation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed(pub u64, pub u64);

impl Seed {
    /// Create a new seed from a single value.
    pub fn from_u64(value: u64) -> Self {
        let state = splitmix64_mix(value);
        let gamma = mix_gamma(state);
        Seed(state, gamma)
    }

    /// Split a seed into two independent seeds.
    /// Uses SplitMix64 splitting strategy for independence.
    pub fn split(self) -> (Self, Self) {
        let Seed(state, gamma) = self;
        let new_state = state.wrapping_add(gamma);
        let output = splitmix64_mix(new_state);
        let new_gamma = mix_gamma(output);

        (Seed(new_state, gamma), Seed(output, new_gamma))
    }

    /// Generate the next random value and advance the seed.
    /// Uses SplitMix64 algorithm for high-quality randomness.
    pub fn next_u64(self) -> (u64, Self) {
        let Seed(state, gamma) = self;
        let new_state = state.wrapping_add(gamma);
        let output = splitmix64_mix(new_state);
        (output, Seed(new_state, gamma))
    }

    /// Generate a bounded random value [0, bound).
    pub fn next_bounded(self, bound: u64) -> (u64, Self) {
        let (value, new_seed) = self.next_u64();
        ((value as u128 * bound as u128 >> 64) as u64, new_seed)
    }

    /// Generate a random seed.
    pub fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        Seed(rng.gen(), rng.gen())
    }
}

/// SplitMix64 mixing function for high-quality output.
fn splitmix64_mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Generate a good gamma value for SplitMix64 splitting.
fn mix_gamma(mut z: u64) -> u64 {
    z = splitmix64_mix(z);
    // Ensure gamma is odd for maximal period
    (z | 1).wrapping_mul(0x9e3779b97f4a7c15)
}

/// Mutable random source threaded explicitly through every traversal.
///
/// Wraps a [`Seed`] and advances it in place, so the sequence of draws is
/// deterministic given the initial seed and the order of consultation.
/// Not thread-safe; callers parallelizing sibling subtrees must use
/// [`RandomSource::split`] for per-branch sub-sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomSource {
    seed: Seed,
}

impl RandomSource {
    /// Create a source from a single seed value.
    pub fn from_u64(value: u64) -> Self {
        RandomSource {
            seed: Seed::from_u64(value),
        }
    }

    /// Create a source from an existing seed.
    pub fn from_seed(seed: Seed) -> Self {
        RandomSource { seed }
    }

    /// Create a source seeded from OS entropy.
    pub fn random() -> Self {
        RandomSource {
            seed: Seed::random(),
        }
    }

    /// Split off an independent sub-source, advancing this one.
    pub fn split(&mut self) -> RandomSource {
        let (left, right) = self.seed.split();
        self.seed = left;
        RandomSource { seed: right }
    }

    /// Draw the next random value.
    pub fn next_u64(&mut self) -> u64 {
        let (value, seed) = self.seed.next_u64();
        self.seed = seed;
        value
    }

    /// Draw a bounded random value [0, bound).
    pub fn next_bounded(&mut self, bound: u64) -> u64 {
        let (value, seed) = self.seed.next_bounded(bound);
        self.seed = seed;
        value
    }

    /// Draw a random float in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Bernoulli draw with probability `p`. Consumes no draw when `p`
    /// is zero or less.
    pub fn next_bernoulli(&mut self, p: f64) -> bool {
        p > 0.0 && self.next_f64() < p
    }
}

/// Shared generation options: global null/size policy and the registry
/// mapping each structural shape to its generator.
pub struct GenerateOptions<V> {
    null_probability: f64,
    container_null_probability: f64,
    container_bounds: ContainerSizeInfo,
    name_resolver: Arc<dyn NameResolver>,
    generators: HashMap<Shape, Arc<dyn ShapeGenerator<V>>>,
}

impl<V> Default for GenerateOptions<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> GenerateOptions<V> {
    /// Options with the default policy and the four built-in generators
    /// registered: scalar/object, sequence, map-entry, and optional (the
    /// latter also covering the specialized optional shapes).
    pub fn new() -> Self {
        let mut options = Self::empty();

        let optional: Arc<dyn ShapeGenerator<V>> = Arc::new(OptionalGenerator);
        options.generators.insert(Shape::Scalar, Arc::new(ObjectGenerator));
        options.generators.insert(Shape::Sequence, Arc::new(SequenceGenerator));
        options.generators.insert(Shape::MapEntry, Arc::new(EntryGenerator));
        options.generators.insert(Shape::Optional, optional.clone());
        options.generators.insert(Shape::OptionalInt, optional.clone());
        options.generators.insert(Shape::OptionalLong, optional.clone());
        options.generators.insert(Shape::OptionalDouble, optional);

        options
    }

    /// Options with default policy but no generators registered.
    pub fn empty() -> Self {
        GenerateOptions {
            null_probability: 0.2,
            container_null_probability: 0.0,
            container_bounds: ContainerSizeInfo::default(),
            name_resolver: Arc::new(IdentityNameResolver),
            generators: HashMap::new(),
        }
    }

    /// Set the global null-injection probability for nullable scalars.
    pub fn with_null_probability(mut self, p: f64) -> Self {
        self.null_probability = p;
        self
    }

    /// Set the null-injection probability for container/optional nodes.
    pub fn with_container_null_probability(mut self, p: f64) -> Self {
        self.container_null_probability = p;
        self
    }

    /// Set the global container size bounds.
    pub fn with_container_bounds(mut self, bounds: ContainerSizeInfo) -> Self {
        self.container_bounds = bounds;
        self
    }

    /// Replace the name-resolution strategy.
    pub fn with_name_resolver(mut self, resolver: Arc<dyn NameResolver>) -> Self {
        self.name_resolver = resolver;
        self
    }

    /// Register or replace the generator for a structural shape.
    pub fn with_generator(mut self, shape: Shape, generator: Arc<dyn ShapeGenerator<V>>) -> Self {
        self.generators.insert(shape, generator);
        self
    }

    pub fn null_probability(&self) -> f64 {
        self.null_probability
    }

    pub fn container_null_probability(&self) -> f64 {
        self.container_null_probability
    }

    pub fn container_bounds(&self) -> ContainerSizeInfo {
        self.container_bounds
    }

    pub fn name_resolver(&self) -> &Arc<dyn NameResolver> {
        &self.name_resolver
    }

    /// Resolve the generator registered for a property's shape.
    pub fn generator_for(&self, property: &Property<V>) -> Result<Arc<dyn ShapeGenerator<V>>> {
        self.generators
            .get(&property.shape())
            .cloned()
            .ok_or_else(|| SpecimenError::UnsupportedShape {
                type_name: property.type_name().to_string(),
                shape: property.shape(),
            })
    }
}
