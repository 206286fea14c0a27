//! This module defines the core, strongly-typed tag representations used
//! throughout the transduce pipeline.
//!
//! It includes the closed `TypeTag` enum that discriminates every `Value` and
//! every stream segment, and the `Scalar` trait that links a Rust primitive to
//! its tag so generic kernels can be written once.

pub mod type_tag;

// Re-export the main type(s) for easier access.
pub use type_tag::{Scalar, TypeTag};
