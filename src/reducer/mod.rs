//! The fold-step interface and the loop that drives it over a stream.
//!
//! A `Reducer` is a pair of operations, `zero` (seed the accumulator) and
//! `apply` (fold one element into it). Reducers are immutable from the outside
//! (`&self`); variants that need running state keep it behind a `RefCell`.
//!
//! # Ownership contract
//!
//! `apply` takes ownership of both `input` and `current` and hands ownership of
//! the returned accumulator to the caller. A reducer that builds a fresh
//! accumulator drops the previous one, which returns any owned payload to its
//! allocator; a reducer that returns `current` or `input` unchanged passes
//! ownership straight through. Nothing is leaked and nothing is released twice.

use crate::error::TransduceError;
use crate::memory::Allocator;
use crate::stream::StreamRange;
use crate::value::Value;

pub mod builtin;

pub use builtin::{accumulate, CollectingReducer, IdentityReducer, LoggingReducer, SumReducer};

/// A fold step over values borrowed for `'a`.
pub trait Reducer<'a> {
    /// The initial accumulator. Must not read any external element.
    fn zero(&self, allocator: &'a dyn Allocator) -> Result<Value<'a>, TransduceError>;

    /// Folds `input` into `current`, returning the new accumulator.
    fn apply(
        &self,
        input: Value<'a>,
        current: Value<'a>,
        allocator: &'a dyn Allocator,
    ) -> Result<Value<'a>, TransduceError>;
}

/// A reducer produced by a transducer: owns its boxed step, borrows for `'a`.
pub type BoxedReducer<'a> = Box<dyn Reducer<'a> + 'a>;

/// Lets callers keep ownership of a terminal and hand a transducer a borrow.
impl<'a, R: Reducer<'a> + ?Sized> Reducer<'a> for &R {
    fn zero(&self, allocator: &'a dyn Allocator) -> Result<Value<'a>, TransduceError> {
        (**self).zero(allocator)
    }

    fn apply(
        &self,
        input: Value<'a>,
        current: Value<'a>,
        allocator: &'a dyn Allocator,
    ) -> Result<Value<'a>, TransduceError> {
        (**self).apply(input, current, allocator)
    }
}

impl<'a, R: Reducer<'a> + ?Sized> Reducer<'a> for Box<R> {
    fn zero(&self, allocator: &'a dyn Allocator) -> Result<Value<'a>, TransduceError> {
        (**self).zero(allocator)
    }

    fn apply(
        &self,
        input: Value<'a>,
        current: Value<'a>,
        allocator: &'a dyn Allocator,
    ) -> Result<Value<'a>, TransduceError> {
        (**self).apply(input, current, allocator)
    }
}

//==================================================================================
// Driver
//==================================================================================

/// Folds every element of `range` through `reducer`.
///
/// The loop ends when the range latches a terminal status (end of sequence or
/// fault); the caller can inspect `range.status()` to tell the two apart. The
/// first `Err` from the reducer abandons the reduction and is returned as is.
pub fn reduce<'a>(
    range: &mut StreamRange<'a>,
    reducer: &dyn Reducer<'a>,
    allocator: &'a dyn Allocator,
) -> Result<Value<'a>, TransduceError> {
    let mut accumulator = reducer.zero(allocator)?;
    let mut folded = 0usize;

    log::debug!("reduce: start ({:?})", range.status());
    loop {
        let element = range.pull_next();
        if range.status().is_terminal() {
            break;
        }
        log::trace!("reduce: element #{} = {}", folded, element);
        accumulator = reducer.apply(element, accumulator, allocator)?;
        folded += 1;
    }
    if range.status().is_end_of_sequence() {
        log::debug!("reduce: folded {} elements, result {}", folded, accumulator);
    } else {
        log::warn!(
            "reduce: stream ended with {:?} after {} elements, partial result {}",
            range.status(),
            folded,
            accumulator
        );
    }

    Ok(accumulator)
}
