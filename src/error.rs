//! Error type shared by cells, arrays and the dynamic cell.

use crate::width::WidthKind;

/// Errors raised by fallible construction, store and indexing operations.
///
/// None of these can be caused by another thread's concurrent activity: every
/// error is decided from the call's own arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtomicError {
    /// A value does not fit the width of the target cell.
    ///
    /// `value` is `None` when the rejected input is not even representable as
    /// an `i128` (e.g. a NaN float).
    #[error("{} is out of range for `{kind}` [{}, {}]", display_value(.value), min_of(.kind), max_of(.kind))]
    Range {
        /// Configuration of the cell that rejected the value.
        kind: WidthKind,
        /// The rejected value.
        value: Option<i128>,
    },

    /// An array index is outside `0..len`.
    #[error("index {index} is out of bounds for array of length {len}")]
    Index {
        /// The requested index.
        index: usize,
        /// Array length at the time of the call.
        len: usize,
    },

    /// A width/signedness name that is not one of the eight supported ones.
    #[error("unsupported integer configuration `{name}`")]
    TypeConfiguration {
        /// The name as given by the caller.
        name: String,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AtomicError>;

fn display_value(value: &Option<i128>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "value".to_owned(),
    }
}

fn min_of(kind: &WidthKind) -> i128 {
    kind.min_value()
}

fn max_of(kind: &WidthKind) -> i128 {
    kind.max_value()
}

impl AtomicError {
    pub(crate) fn range(kind: WidthKind, value: Option<i128>) -> Self {
        trace_event!(trace, kind = %kind, ?value, "rejected out-of-range value");
        AtomicError::Range { kind, value }
    }

    pub(crate) fn index(index: usize, len: usize) -> Self {
        trace_event!(trace, index, len, "rejected out-of-bounds index");
        AtomicError::Index { index, len }
    }

    pub(crate) fn type_configuration(name: &str) -> Self {
        trace_event!(trace, name, "rejected unknown integer configuration");
        AtomicError::TypeConfiguration {
            name: name.to_owned(),
        }
    }

    /// Returns `true` for [`AtomicError::Range`].
    pub fn is_range(&self) -> bool {
        matches!(self, AtomicError::Range { .. })
    }

    /// Returns `true` for [`AtomicError::Index`].
    pub fn is_index(&self) -> bool {
        matches!(self, AtomicError::Index { .. })
    }

    /// Returns `true` for [`AtomicError::TypeConfiguration`].
    pub fn is_type_configuration(&self) -> bool {
        matches!(self, AtomicError::TypeConfiguration { .. })
    }
}
