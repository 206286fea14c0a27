//! Run every element through an inner fold and pass the running result on.
//!
//! This is not a pure element-wise map. The produced reducer keeps the inner
//! reducer's accumulator between elements, so with a sum as the inner reducer
//! the step receives the running total after each element.

use std::cell::RefCell;
use std::fmt;

use crate::error::TransduceError;
use crate::memory::Allocator;
use crate::reducer::{BoxedReducer, Reducer};
use crate::transducer::Transducer;
use crate::value::Value;

/// Injects a sub-fold (`inner`) in front of the step.
pub struct MappingTransducer<'a> {
    inner: &'a dyn Reducer<'a>,
}

impl<'a> MappingTransducer<'a> {
    pub fn new(inner: &'a dyn Reducer<'a>) -> Self {
        Self { inner }
    }
}

impl fmt::Debug for MappingTransducer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MappingTransducer")
    }
}

impl<'a> Transducer<'a> for MappingTransducer<'a> {
    fn apply(
        &'a self,
        step: BoxedReducer<'a>,
        allocator: &'a dyn Allocator,
    ) -> Result<BoxedReducer<'a>, TransduceError> {
        let inner_accumulator = self.inner.zero(allocator)?;
        Ok(Box::new(MappingReducer {
            inner: self.inner,
            inner_accumulator: RefCell::new(inner_accumulator),
            step,
        }))
    }
}

struct MappingReducer<'a> {
    inner: &'a dyn Reducer<'a>,
    inner_accumulator: RefCell<Value<'a>>,
    step: BoxedReducer<'a>,
}

impl<'a> Reducer<'a> for MappingReducer<'a> {
    fn zero(&self, allocator: &'a dyn Allocator) -> Result<Value<'a>, TransduceError> {
        self.step.zero(allocator)
    }

    fn apply(
        &self,
        input: Value<'a>,
        current: Value<'a>,
        allocator: &'a dyn Allocator,
    ) -> Result<Value<'a>, TransduceError> {
        // On error the running state is left at `Null`; the reduction is over anyway.
        let previous = self.inner_accumulator.take();
        let updated = self.inner.apply(input, previous, allocator)?;

        // The step gets its own copy; ours stays here for the next element.
        let forwarded = updated.duplicate(allocator)?;
        self.inner_accumulator.replace(updated);

        self.step.apply(forwarded, current, allocator)
    }
}
