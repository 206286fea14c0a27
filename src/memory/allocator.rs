//! Concrete allocators.
//!
//! `HeapAllocator` is the production default. `TrackingAllocator` wraps the heap
//! with counters (and an optional byte budget) so tests can assert that every
//! owned `Value` is released exactly once.

use std::cell::Cell;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::TransduceError;

/// An owned block of payload memory handed out by an `Allocator`.
pub type Block = Box<[u8]>;

/// The injected memory capability.
///
/// Implementations are used from a single thread; interior mutability through
/// `Cell` is enough for bookkeeping.
pub trait Allocator {
    /// Hands out a zeroed block of exactly `size` bytes.
    fn alloc(&self, size: usize) -> Result<Block, TransduceError>;

    /// Takes a block back. Called exactly once per block by `OwnedBlock`.
    fn release(&self, block: Block);
}

//==================================================================================
// 1. Heap
//==================================================================================

/// Allocates straight from the global heap.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl Allocator for HeapAllocator {
    fn alloc(&self, size: usize) -> Result<Block, TransduceError> {
        Ok(vec![0u8; size].into_boxed_slice())
    }

    fn release(&self, block: Block) {
        drop(block);
    }
}

//==================================================================================
// 2. Tracking
//==================================================================================

/// A point-in-time copy of a `TrackingAllocator`'s counters.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackingStats {
    pub live_blocks: usize,
    pub live_bytes: usize,
    pub peak_bytes: usize,
    pub total_allocations: usize,
    pub total_releases: usize,
    pub refused: usize,
    /// Blocks handed back that this allocator's counters could not account for.
    pub foreign_releases: usize,
}

/// Heap allocator that counts what it hands out and takes back.
#[derive(Debug, Default)]
pub struct TrackingAllocator {
    budget_bytes: Option<usize>,
    live_blocks: Cell<usize>,
    live_bytes: Cell<usize>,
    peak_bytes: Cell<usize>,
    total_allocations: Cell<usize>,
    total_releases: Cell<usize>,
    refused: Cell<usize>,
    foreign_releases: Cell<usize>,
}

impl TrackingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracking allocator that refuses to hold more than `budget_bytes` live.
    pub fn with_budget(budget_bytes: usize) -> Self {
        Self {
            budget_bytes: Some(budget_bytes),
            ..Self::default()
        }
    }

    /// Builds an allocator honouring `allocation_budget_bytes` from the config.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            budget_bytes: config.allocation_budget_bytes,
            ..Self::default()
        }
    }

    pub fn budget_bytes(&self) -> Option<usize> {
        self.budget_bytes
    }

    pub fn live_blocks(&self) -> usize {
        self.live_blocks.get()
    }

    pub fn live_bytes(&self) -> usize {
        self.live_bytes.get()
    }

    pub fn stats(&self) -> TrackingStats {
        TrackingStats {
            live_blocks: self.live_blocks.get(),
            live_bytes: self.live_bytes.get(),
            peak_bytes: self.peak_bytes.get(),
            total_allocations: self.total_allocations.get(),
            total_releases: self.total_releases.get(),
            refused: self.refused.get(),
            foreign_releases: self.foreign_releases.get(),
        }
    }
}

impl Allocator for TrackingAllocator {
    fn alloc(&self, size: usize) -> Result<Block, TransduceError> {
        let live = self.live_bytes.get();
        if let Some(budget) = self.budget_bytes {
            if live.saturating_add(size) > budget {
                self.refused.set(self.refused.get() + 1);
                log::warn!(
                    "TrackingAllocator refused {} bytes ({} live, budget {})",
                    size,
                    live,
                    budget
                );
                return Err(TransduceError::AllocationFailed {
                    requested: size,
                    reason: format!("budget of {} bytes exhausted ({} live)", budget, live),
                });
            }
        }

        let block = HeapAllocator.alloc(size)?;
        self.live_blocks.set(self.live_blocks.get() + 1);
        self.live_bytes.set(live + size);
        self.peak_bytes.set(self.peak_bytes.get().max(live + size));
        self.total_allocations.set(self.total_allocations.get() + 1);
        Ok(block)
    }

    fn release(&self, block: Block) {
        let size = block.len();
        if self.live_blocks.get() == 0 || self.live_bytes.get() < size {
            // A block from some other allocator; the counters cannot absorb it.
            log::warn!("TrackingAllocator asked to release a foreign block of {} bytes", size);
            self.foreign_releases.set(self.foreign_releases.get() + 1);
            return HeapAllocator.release(block);
        }
        self.live_blocks.set(self.live_blocks.get().saturating_sub(1));
        self.live_bytes.set(self.live_bytes.get().saturating_sub(size));
        self.total_releases.set(self.total_releases.get() + 1);
        HeapAllocator.release(block);
    }
}
