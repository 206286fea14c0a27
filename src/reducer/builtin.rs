//! Terminal reducers shipped with the engine.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;

use crate::error::TransduceError;
use crate::memory::Allocator;
use crate::reducer::Reducer;
use crate::types::Scalar;
use crate::value::Value;

//==================================================================================
// 1. Identity
//==================================================================================

/// The base step: seeds with `Null` and replaces the accumulator with each input.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityReducer;

impl<'a> Reducer<'a> for IdentityReducer {
    fn zero(&self, _allocator: &'a dyn Allocator) -> Result<Value<'a>, TransduceError> {
        Ok(Value::null())
    }

    fn apply(
        &self,
        input: Value<'a>,
        _current: Value<'a>,
        _allocator: &'a dyn Allocator,
    ) -> Result<Value<'a>, TransduceError> {
        Ok(input)
    }
}

//==================================================================================
// 2. Running Sum
//==================================================================================

/// Adds two scalars of type `T` into a freshly allocated, owned value.
///
/// # Errors
/// `TypeMismatch` if either operand is not tagged `T::TAG`.
pub fn accumulate<'a, T: Scalar>(
    input: &Value<'a>,
    current: &Value<'a>,
    allocator: &'a dyn Allocator,
) -> Result<Value<'a>, TransduceError> {
    let x = input.expect_scalar::<T>()?;
    let acc = current.expect_scalar::<T>()?;
    Value::make_scalar(x + acc, allocator)
}

/// Sums every element; the seed is a borrowed view of an immutable zero.
pub struct SumReducer<T: Scalar> {
    _scalar: PhantomData<T>,
}

impl<T: Scalar> SumReducer<T> {
    pub fn new() -> Self {
        Self {
            _scalar: PhantomData,
        }
    }
}

impl<T: Scalar> Default for SumReducer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> fmt::Debug for SumReducer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SumReducer<{}>", T::TAG)
    }
}

impl<'a, T: Scalar> Reducer<'a> for SumReducer<T> {
    fn zero(&self, _allocator: &'a dyn Allocator) -> Result<Value<'a>, TransduceError> {
        Value::borrowed(T::TAG, T::ZERO_BYTES)
    }

    fn apply(
        &self,
        input: Value<'a>,
        current: Value<'a>,
        allocator: &'a dyn Allocator,
    ) -> Result<Value<'a>, TransduceError> {
        // `input` and the old `current` drop here, releasing what they own.
        accumulate::<T>(&input, &current, allocator)
    }
}

//==================================================================================
// 3. Observers
//==================================================================================

/// Logs every element at `info` level and otherwise behaves like identity.
#[derive(Debug, Clone)]
pub struct LoggingReducer {
    label: String,
}

impl LoggingReducer {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl<'a> Reducer<'a> for LoggingReducer {
    fn zero(&self, _allocator: &'a dyn Allocator) -> Result<Value<'a>, TransduceError> {
        Ok(Value::null())
    }

    fn apply(
        &self,
        input: Value<'a>,
        current: Value<'a>,
        _allocator: &'a dyn Allocator,
    ) -> Result<Value<'a>, TransduceError> {
        if current.is_null() {
            log::info!("[{}] first element: {}", self.label, input);
        } else {
            log::info!("[{}] element: {} (previous {})", self.label, input, current);
        }
        Ok(input)
    }
}

/// Records every `T` it receives, in order, and otherwise behaves like identity.
///
/// Useful as a terminal when the question is "what reached this step?".
pub struct CollectingReducer<T: Scalar> {
    seen: RefCell<Vec<T>>,
}

impl<T: Scalar> CollectingReducer<T> {
    pub fn new() -> Self {
        Self {
            seen: RefCell::new(Vec::new()),
        }
    }

    /// A copy of everything recorded so far.
    pub fn seen(&self) -> Vec<T> {
        self.seen.borrow().clone()
    }

    /// Drains the record.
    pub fn take(&self) -> Vec<T> {
        self.seen.take()
    }
}

impl<T: Scalar> Default for CollectingReducer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> fmt::Debug for CollectingReducer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectingReducer")
            .field("seen", &self.seen.borrow())
            .finish()
    }
}

impl<'a, T: Scalar> Reducer<'a> for CollectingReducer<T> {
    fn zero(&self, _allocator: &'a dyn Allocator) -> Result<Value<'a>, TransduceError> {
        Ok(Value::null())
    }

    fn apply(
        &self,
        input: Value<'a>,
        _current: Value<'a>,
        _allocator: &'a dyn Allocator,
    ) -> Result<Value<'a>, TransduceError> {
        let x = input.expect_scalar::<T>()?;
        self.seen.borrow_mut().push(x);
        Ok(input)
    }
}

//==================================================================================
// 4. Unit Tests
//==================================================================================
