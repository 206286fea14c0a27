//! Pull-based, lazily advancing streams over segmented byte buffers.
//!
//! A `StreamRange` presents one cursor over any number of contiguous segments.
//! When the cursor reaches the end of a segment, the range asks its
//! `SegmentSource` for the next one; when the source has nothing more (or
//! fails), the range latches a terminal `StreamStatus` and every later pull
//! returns `Value::Null` without touching memory.

use serde::{Deserialize, Serialize};

pub mod range;
pub mod sources;

pub use range::StreamRange;
pub use sources::{Exhausted, Segment, SegmentList, SegmentSource};

/// The sticky status of a stream range.
///
/// Anything other than `NoError` is terminal: once latched, it stays latched
/// for the rest of the range's life.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StreamStatus {
    #[default]
    NoError,
    /// The sequence is exhausted. This is the normal end of every finite stream.
    ReadPastEnd,
    /// Abnormal termination: the source failed, produced a malformed segment,
    /// or stopped making progress.
    Fault,
}

impl StreamStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::NoError)
    }

    pub fn is_end_of_sequence(&self) -> bool {
        matches!(self, Self::ReadPastEnd)
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault)
    }
}
