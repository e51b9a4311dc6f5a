//! Specimen structural test-data generation library.
//!
//! This is the main entry point for the Specimen library: describe a
//! type's shape, build its generation tree, and sample concrete values
//! for fixture-based and property-based tests.

pub use specimen_core::*;
