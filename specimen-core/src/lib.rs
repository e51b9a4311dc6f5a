//! Core engine for Specimen structural test-data generation.
//!
//! This crate builds a tree mirroring a described type's shape and
//! lazily produces randomized concrete values conforming to it. Type
//! descriptions come from the caller, leaf values from an external
//! [`Introspector`]; the engine owns everything in between: shape
//! generators, sizing, null injection, and the traversal.

pub mod data;
pub mod error;
pub mod introspect;
pub mod node;
pub mod property;
pub mod shape;
pub mod traverse;

// Re-export the main types
pub use data::*;
pub use error::*;
pub use introspect::*;
pub use node::*;
pub use property::*;
pub use shape::*;
pub use traverse::*;
