//! `AnyAtomicCell` - a cell whose configuration is chosen at runtime.
//!
//! A closed enum over the eight typed cells. The configuration is resolved
//! once, at construction; every operation then dispatches with a `match` to
//! the typed cell. Values cross the API as `i128`, which holds every
//! configuration's full range, and arguments are range-checked against the
//! configuration before they reach the slot.

use core::fmt;

use crate::cell::{narrow, AtomicCell};
use crate::error::Result;
use crate::width::{Int, Long, LongLong, Short, UInt, ULong, ULongLong, UShort, Width, WidthKind};

/// A runtime-configured atomic integer cell.
#[derive(Clone)]
pub enum AnyAtomicCell {
    /// `short`
    Short(AtomicCell<Short>),
    /// `unsigned short`
    UShort(AtomicCell<UShort>),
    /// `int`
    Int(AtomicCell<Int>),
    /// `unsigned int`
    UInt(AtomicCell<UInt>),
    /// `long`
    Long(AtomicCell<Long>),
    /// `unsigned long`
    ULong(AtomicCell<ULong>),
    /// `long long`
    LongLong(AtomicCell<LongLong>),
    /// `unsigned long long`
    ULongLong(AtomicCell<ULongLong>),
}

macro_rules! dispatch {
    ($self:expr, $cell:ident => $body:expr) => {
        match $self {
            AnyAtomicCell::Short($cell) => $body,
            AnyAtomicCell::UShort($cell) => $body,
            AnyAtomicCell::Int($cell) => $body,
            AnyAtomicCell::UInt($cell) => $body,
            AnyAtomicCell::Long($cell) => $body,
            AnyAtomicCell::ULong($cell) => $body,
            AnyAtomicCell::LongLong($cell) => $body,
            AnyAtomicCell::ULongLong($cell) => $body,
        }
    };
}

/// Narrows `value` to the configuration of `_cell`.
fn arg<W: Width>(_cell: &AtomicCell<W>, value: i128) -> Result<W::Value> {
    narrow::<W, i128>(value)
}

impl AnyAtomicCell {
    /// Creates a cell of configuration `kind` holding `value`.
    ///
    /// # Errors
    /// [`AtomicError::Range`](crate::AtomicError::Range) if `value` does not
    /// fit `kind`.
    pub fn new(kind: WidthKind, value: i128) -> Result<Self> {
        Ok(match kind {
            WidthKind::Short => AnyAtomicCell::Short(AtomicCell::try_new(value)?),
            WidthKind::UShort => AnyAtomicCell::UShort(AtomicCell::try_new(value)?),
            WidthKind::Int => AnyAtomicCell::Int(AtomicCell::try_new(value)?),
            WidthKind::UInt => AnyAtomicCell::UInt(AtomicCell::try_new(value)?),
            WidthKind::Long => AnyAtomicCell::Long(AtomicCell::try_new(value)?),
            WidthKind::ULong => AnyAtomicCell::ULong(AtomicCell::try_new(value)?),
            WidthKind::LongLong => AnyAtomicCell::LongLong(AtomicCell::try_new(value)?),
            WidthKind::ULongLong => AnyAtomicCell::ULongLong(AtomicCell::try_new(value)?),
        })
    }

    /// Creates a zero-valued cell of configuration `kind`.
    pub fn zeroed(kind: WidthKind) -> Self {
        match kind {
            WidthKind::Short => AnyAtomicCell::Short(AtomicCell::default()),
            WidthKind::UShort => AnyAtomicCell::UShort(AtomicCell::default()),
            WidthKind::Int => AnyAtomicCell::Int(AtomicCell::default()),
            WidthKind::UInt => AnyAtomicCell::UInt(AtomicCell::default()),
            WidthKind::Long => AnyAtomicCell::Long(AtomicCell::default()),
            WidthKind::ULong => AnyAtomicCell::ULong(AtomicCell::default()),
            WidthKind::LongLong => AnyAtomicCell::LongLong(AtomicCell::default()),
            WidthKind::ULongLong => AnyAtomicCell::ULongLong(AtomicCell::default()),
        }
    }

    /// Creates a cell from a C type name such as `"unsigned long"`.
    ///
    /// # Errors
    /// [`AtomicError::TypeConfiguration`](crate::AtomicError::TypeConfiguration)
    /// for an unknown name, [`AtomicError::Range`](crate::AtomicError::Range)
    /// if `value` does not fit.
    ///
    /// ```rust
    /// use atomint::{AnyAtomicCell, WidthKind};
    ///
    /// let cell = AnyAtomicCell::from_name("unsigned short", 65_535).unwrap();
    /// assert_eq!(cell.kind(), WidthKind::UShort);
    /// assert_eq!(cell.add_and_fetch(1).unwrap(), 0);
    /// assert!(AnyAtomicCell::from_name("unsigned char", 0).is_err());
    /// ```
    pub fn from_name(name: &str, value: i128) -> Result<Self> {
        Self::new(name.parse()?, value)
    }

    /// The configuration chosen at construction.
    pub fn kind(&self) -> WidthKind {
        dispatch!(self, cell => cell.width_kind())
    }

    /// Reads the current value.
    pub fn read(&self) -> i128 {
        dispatch!(self, cell => cell.read().into())
    }

    /// Replaces the current value.
    ///
    /// # Errors
    /// [`AtomicError::Range`](crate::AtomicError::Range) if `value` does not
    /// fit; the cell is unchanged.
    pub fn store(&self, value: i128) -> Result<()> {
        dispatch!(self, cell => {
            cell.store(arg(cell, value)?);
            Ok(())
        })
    }

    /// Adds `delta` (which must itself fit the configuration) with wraparound
    /// and returns the new value.
    ///
    /// # Errors
    /// [`AtomicError::Range`](crate::AtomicError::Range) if `delta` does not fit.
    pub fn add_and_fetch(&self, delta: i128) -> Result<i128> {
        dispatch!(self, cell => Ok(cell.add_and_fetch(arg(cell, delta)?).into()))
    }

    /// Subtracts `delta` (which must itself fit the configuration) with
    /// wraparound and returns the new value.
    ///
    /// # Errors
    /// [`AtomicError::Range`](crate::AtomicError::Range) if `delta` does not fit.
    pub fn sub_and_fetch(&self, delta: i128) -> Result<i128> {
        dispatch!(self, cell => Ok(cell.sub_and_fetch(arg(cell, delta)?).into()))
    }

    /// Stores `value` and returns the value it replaced.
    ///
    /// # Errors
    /// [`AtomicError::Range`](crate::AtomicError::Range) if `value` does not fit.
    pub fn get_and_set(&self, value: i128) -> Result<i128> {
        dispatch!(self, cell => Ok(cell.get_and_set(arg(cell, value)?).into()))
    }

    /// Stores `new` if the current value equals `expected`.
    ///
    /// An `expected` outside the configuration's range can never match, so
    /// it yields `Ok(false)` rather than an error.
    ///
    /// # Errors
    /// [`AtomicError::Range`](crate::AtomicError::Range) if `new` does not fit.
    pub fn compare_and_set(&self, expected: i128, new: i128) -> Result<bool> {
        dispatch!(self, cell => {
            let new = arg(cell, new)?;
            match arg(cell, expected) {
                Ok(expected) => Ok(cell.compare_and_set(expected, new)),
                Err(_) => Ok(false),
            }
        })
    }
}

impl fmt::Debug for AnyAtomicCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, cell => fmt::Debug::fmt(cell, f))
    }
}

impl fmt::Display for AnyAtomicCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, cell => fmt::Display::fmt(cell, f))
    }
}

impl PartialEq for AnyAtomicCell {
    /// Equal when both configuration and current value match (independent
    /// reads, as for [`AtomicCell`]).
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self, other) || (self.kind() == other.kind() && self.read() == other.read())
    }
}

macro_rules! impl_from_typed {
    ($($marker:ident),*) => {
        $(
            impl From<AtomicCell<$marker>> for AnyAtomicCell {
                fn from(cell: AtomicCell<$marker>) -> Self {
                    AnyAtomicCell::$marker(cell)
                }
            }
        )*
    };
}

impl_from_typed!(Short, UShort, Int, UInt, Long, ULong, LongLong, ULongLong);
