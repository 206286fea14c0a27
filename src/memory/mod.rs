//! The allocator capability consumed by the engine.
//!
//! Every allocating operation receives an `&dyn Allocator` explicitly; there is
//! no ambient allocator. Blocks are plain owned byte buffers, so payloads are
//! written and read through `bytemuck` rather than raw pointers.

pub mod allocator;

pub use allocator::{Allocator, Block, HeapAllocator, TrackingAllocator, TrackingStats};
