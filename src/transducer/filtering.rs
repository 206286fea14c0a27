//! Gate elements by a predicate.

use std::fmt;

use crate::error::TransduceError;
use crate::memory::Allocator;
use crate::reducer::{BoxedReducer, Reducer};
use crate::transducer::Transducer;
use crate::value::Value;

/// Forwards only the elements for which `predicate` holds.
pub struct FilteringTransducer<'p> {
    predicate: Box<dyn Fn(&Value<'_>) -> bool + 'p>,
}

impl<'p> FilteringTransducer<'p> {
    pub fn new(predicate: impl Fn(&Value<'_>) -> bool + 'p) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

impl fmt::Debug for FilteringTransducer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FilteringTransducer")
    }
}

impl<'a, 'p: 'a> Transducer<'a> for FilteringTransducer<'p> {
    fn apply(
        &'a self,
        step: BoxedReducer<'a>,
        _allocator: &'a dyn Allocator,
    ) -> Result<BoxedReducer<'a>, TransduceError> {
        Ok(Box::new(FilteringReducer {
            predicate: &*self.predicate,
            step,
        }))
    }
}

struct FilteringReducer<'a> {
    predicate: &'a dyn Fn(&Value<'_>) -> bool,
    step: BoxedReducer<'a>,
}

impl<'a> Reducer<'a> for FilteringReducer<'a> {
    /// Filtering contributes no seed of its own.
    fn zero(&self, _allocator: &'a dyn Allocator) -> Result<Value<'a>, TransduceError> {
        Ok(Value::null())
    }

    fn apply(
        &self,
        input: Value<'a>,
        current: Value<'a>,
        allocator: &'a dyn Allocator,
    ) -> Result<Value<'a>, TransduceError> {
        if (self.predicate)(&input) {
            return self.step.apply(input, current, allocator);
        }
        // Skipped: `input` is dropped, the accumulator passes through untouched.
        Ok(current)
    }
}
