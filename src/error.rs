// In: src/error.rs

//! This module defines the single, unified error type for the entire transduce library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Note that stream exhaustion is *not* an error in this sense: a stream range
//! reports it through its latched `StreamStatus`, and the driving loop observes
//! it as data. `TransduceError` is reserved for contract violations and
//! resource failures.

use thiserror::Error;

use crate::types::TypeTag;

#[derive(Error, Debug)]
pub enum TransduceError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// A reducer received a value whose tag it does not accept. This is a
    /// programming-contract violation; the reduction that hit it is abandoned.
    #[error("Type contract violation: expected {expected}, found {found}")]
    TypeMismatch { expected: TypeTag, found: TypeTag },

    #[error("Allocation of {requested} bytes refused: {reason}")]
    AllocationFailed { requested: usize, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g., config file not found).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading an `EngineConfig`.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // Manual `From` impl is needed as bytemuck::PodCastError doesn't impl Error

    // =========================================================================
    // === Low-Level Buffer Errors
    // =========================================================================
    #[error("Buffer length mismatch: expected a multiple of {0}, got {1}")]
    BufferMismatch(usize, usize),
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for TransduceError {
    fn from(err: bytemuck::PodCastError) -> Self {
        TransduceError::PodCast(format!("{:?}", err))
    }
}
