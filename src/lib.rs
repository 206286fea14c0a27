//! This file is the root of the `transduce` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`value`, `stream`,
//!     `reducer`, `transducer`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of types a caller needs to build and drive a
//!     pipeline, so `use transduce::*` style imports stay short.
//!
//! A pipeline is built by applying a (possibly composed) `Transducer` to a
//! terminal `Reducer`, then folding a `StreamRange` through the result with
//! `reduce`. Every owned value is carved from an explicit `Allocator`.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod config;
pub mod error;
pub mod logging;
pub mod memory;
pub mod reducer;
pub mod stream;
pub mod transducer;
pub mod types;
pub mod utils;
pub mod value;

//==================================================================================
// 2. Public Surface
//==================================================================================
pub use config::EngineConfig;
pub use error::TransduceError;
pub use memory::{Allocator, HeapAllocator, TrackingAllocator};
pub use reducer::{
    accumulate, reduce, BoxedReducer, CollectingReducer, IdentityReducer, LoggingReducer, Reducer,
    SumReducer,
};
pub use stream::{Segment, SegmentSource, StreamRange, StreamStatus};
pub use transducer::{
    transduce, transduce_slice, ComposingTransducer, FilteringTransducer, MappingTransducer,
    Transducer,
};
pub use types::{Scalar, TypeTag};
pub use value::Value;
