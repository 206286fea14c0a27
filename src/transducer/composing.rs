//! Chain several transducers into one.
//!
//! `[A, B, C]` applied to `step` is `A.apply(B.apply(C.apply(step)))`: every
//! element goes through `A` first, then `B`, then `C`, then reaches `step`.

use std::fmt;

use crate::error::TransduceError;
use crate::memory::Allocator;
use crate::reducer::{BoxedReducer, Reducer};
use crate::transducer::Transducer;
use crate::value::Value;

/// An ordered chain of borrowed transducers, executed left to right.
pub struct ComposingTransducer<'a> {
    transducers: Vec<&'a dyn Transducer<'a>>,
}

impl<'a> ComposingTransducer<'a> {
    pub fn new(transducers: impl IntoIterator<Item = &'a dyn Transducer<'a>>) -> Self {
        Self {
            transducers: transducers.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            transducers: Vec::new(),
        }
    }

    /// Appends `transducer` as the innermost stage (runs after all current ones).
    pub fn then(mut self, transducer: &'a dyn Transducer<'a>) -> Self {
        self.transducers.push(transducer);
        self
    }

    pub fn len(&self) -> usize {
        self.transducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transducers.is_empty()
    }
}

impl fmt::Debug for ComposingTransducer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposingTransducer")
            .field("len", &self.transducers.len())
            .finish()
    }
}

impl<'a> Transducer<'a> for ComposingTransducer<'a> {
    fn apply(
        &'a self,
        step: BoxedReducer<'a>,
        allocator: &'a dyn Allocator,
    ) -> Result<BoxedReducer<'a>, TransduceError> {
        if self.transducers.is_empty() {
            return Ok(step);
        }

        // Fold from the innermost stage outwards.
        let mut head = step;
        for &transducer in self.transducers.iter().rev() {
            head = transducer.apply(head, allocator)?;
        }
        log::trace!("composed {} transducers", self.transducers.len());

        Ok(Box::new(ComposingReducer { head }))
    }
}

struct ComposingReducer<'a> {
    head: BoxedReducer<'a>,
}

impl<'a> Reducer<'a> for ComposingReducer<'a> {
    fn zero(&self, _allocator: &'a dyn Allocator) -> Result<Value<'a>, TransduceError> {
        Ok(Value::null())
    }

    fn apply(
        &self,
        input: Value<'a>,
        current: Value<'a>,
        allocator: &'a dyn Allocator,
    ) -> Result<Value<'a>, TransduceError> {
        self.head.apply(input, current, allocator)
    }
}
