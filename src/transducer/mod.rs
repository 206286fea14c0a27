//! Reducer transformers.
//!
//! A `Transducer` takes the next stage of a pipeline (the "step", itself a
//! `Reducer`) and returns a new reducer that does its own work before or
//! around calling the step. Stacking transducers onto a terminal reducer gives
//! one fused traversal: each element goes through every stage before the next
//! element is pulled, and nothing is buffered in between.
//!
//! Transducers are reusable. Every `apply` builds an independent reducer, so
//! running state (e.g. a mapping's inner accumulator) never leaks between two
//! reductions driven by the same transducer.

use crate::error::TransduceError;
use crate::memory::Allocator;
use crate::reducer::{reduce, BoxedReducer, IdentityReducer, Reducer};
use crate::stream::StreamRange;
use crate::types::Scalar;
use crate::utils::typed_slice_as_bytes;
use crate::value::{Payload, Value};

pub mod composing;
pub mod filtering;
pub mod mapping;

pub use composing::ComposingTransducer;
pub use filtering::FilteringTransducer;
pub use mapping::MappingTransducer;

/// A factory of reducers: wraps `step` into a reducer doing additional work.
///
/// The produced reducer borrows the transducer (for `'a`) and owns the boxed
/// step, which may itself be a borrow of a caller-owned terminal.
pub trait Transducer<'a> {
    fn apply(
        &'a self,
        step: BoxedReducer<'a>,
        allocator: &'a dyn Allocator,
    ) -> Result<BoxedReducer<'a>, TransduceError>;
}

//==================================================================================
// Drivers
//==================================================================================

/// Applies `transducer` to `step` and folds `range` through the result.
///
/// The seed is the produced reducer's `zero`. `step.zero` is only consulted
/// when the outermost stage delegates `zero` to its step (mapping does,
/// filtering and composition seed with `Null`), so a seeded step such as
/// `SumReducer` usually sits behind a `MappingTransducer`.
pub fn transduce<'a>(
    range: &mut StreamRange<'a>,
    transducer: &'a dyn Transducer<'a>,
    step: BoxedReducer<'a>,
    allocator: &'a dyn Allocator,
) -> Result<Value<'a>, TransduceError> {
    let reducer = transducer.apply(step, allocator)?;
    reduce(range, &*reducer, allocator)
}

/// Folds a plain slice through `transducer` applied to the identity reducer,
/// without building a stream range.
pub fn transduce_slice<'a, T: Scalar>(
    values: &'a [T],
    transducer: &'a dyn Transducer<'a>,
    allocator: &'a dyn Allocator,
) -> Result<Value<'a>, TransduceError> {
    let reducer = transducer.apply(Box::new(IdentityReducer), allocator)?;
    let bytes: &'a [u8] = typed_slice_as_bytes(values);

    let mut accumulator = reducer.zero(allocator)?;
    for element in bytes.chunks_exact(T::TAG.element_size()) {
        let value = Value::with_payload(T::TAG, Payload::Borrowed(element));
        accumulator = reducer.apply(value, accumulator, allocator)?;
    }
    Ok(accumulator)
}
