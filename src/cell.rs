//! `AtomicCell` - one atomically updated integer slot.
//!
//! Every operation is sequentially consistent: all operations on a cell, from
//! every thread, appear in one total order that respects each thread's
//! program order. Reads, stores, add/sub-and-fetch and exchange are
//! wait-free. `compare_and_set` is the strong (non-spurious) form, so it
//! never retries internally; retry loops belong to the caller, and
//! [`AtomicCell::fetch_and_update`] is the stock one.
//!
//! The slot is private and there is no raw-pointer or `&mut` accessor: the
//! operation set is the only way to reach it.

use core::cmp::Ordering;
use core::ffi::{c_int, c_long, c_longlong, c_short, c_uint, c_ulong, c_ulonglong, c_ushort};
use core::fmt;
use core::marker::PhantomData;
use core::ptr;

use crossbeam_utils::Backoff;
use num_traits::{NumCast, One, PrimInt, Zero};

use crate::error::{AtomicError, Result};
use crate::primitive::AtomicPrimitive;
use crate::width::{Int, Long, LongLong, Short, UInt, ULong, ULongLong, UShort, Width, WidthKind};

/// An integer of configuration `W` supporting lock-free `SeqCst` operations.
///
/// Share it between threads by reference (`&AtomicCell<W>`, `Arc<AtomicCell<W>>`,
/// scoped threads); no external lock is needed.
pub struct AtomicCell<W: Width> {
    slot: <W::Value as AtomicPrimitive>::Atomic,
    _width: PhantomData<W>,
}

/// Converts any primitive integer into `W::Value`, rejecting values outside
/// the configuration's range.
pub(crate) fn narrow<W: Width, V: PrimInt>(value: V) -> Result<W::Value> {
    let wide = value.to_i128();
    <W::Value as NumCast>::from(value).ok_or_else(|| AtomicError::range(W::KIND, wide))
}

impl<W: Width> AtomicCell<W> {
    /// Creates a cell holding `value`.
    #[inline]
    pub fn new(value: W::Value) -> Self {
        Self {
            slot: <W::Value as AtomicPrimitive>::new_atomic(value),
            _width: PhantomData,
        }
    }

    /// Creates a cell from any primitive integer.
    ///
    /// # Errors
    /// [`AtomicError::Range`] if `value` is not representable in `W`.
    ///
    /// ```rust
    /// use atomint::AtomicUShort;
    ///
    /// assert!(AtomicUShort::try_new(65_535).is_ok());
    /// assert!(AtomicUShort::try_new(-1).is_err());
    /// assert!(AtomicUShort::try_new(65_536).is_err());
    /// ```
    pub fn try_new<V: PrimInt>(value: V) -> Result<Self> {
        narrow::<W, V>(value).map(Self::new)
    }

    /// The configuration of this cell.
    #[inline]
    pub fn width_kind(&self) -> WidthKind {
        W::KIND
    }

    /// Reads the current value.
    #[inline]
    pub fn read(&self) -> W::Value {
        <W::Value as AtomicPrimitive>::load(&self.slot)
    }

    /// Replaces the current value.
    #[inline]
    pub fn store(&self, value: W::Value) {
        <W::Value as AtomicPrimitive>::store(&self.slot, value);
    }

    /// Replaces the current value with any primitive integer.
    ///
    /// # Errors
    /// [`AtomicError::Range`] if `value` does not fit; the cell is unchanged.
    pub fn try_store<V: PrimInt>(&self, value: V) -> Result<()> {
        let value = narrow::<W, V>(value)?;
        self.store(value);
        Ok(())
    }

    /// Adds `delta` and returns the value after the addition.
    ///
    /// Overflow wraps modulo 2<sup>bits</sup>.
    #[inline]
    pub fn add_and_fetch(&self, delta: W::Value) -> W::Value {
        <W::Value as AtomicPrimitive>::add_and_fetch(&self.slot, delta)
    }

    /// Subtracts `delta` and returns the value after the subtraction.
    ///
    /// Underflow wraps modulo 2<sup>bits</sup>.
    #[inline]
    pub fn sub_and_fetch(&self, delta: W::Value) -> W::Value {
        <W::Value as AtomicPrimitive>::sub_and_fetch(&self.slot, delta)
    }

    /// Adds one and returns the new value.
    #[inline]
    pub fn increment(&self) -> W::Value {
        self.add_and_fetch(<W::Value as One>::one())
    }

    /// Subtracts one and returns the new value.
    #[inline]
    pub fn decrement(&self) -> W::Value {
        self.sub_and_fetch(<W::Value as One>::one())
    }

    /// Stores `value` and returns the value it replaced.
    #[inline]
    pub fn get_and_set(&self, value: W::Value) -> W::Value {
        <W::Value as AtomicPrimitive>::get_and_set(&self.slot, value)
    }

    /// Alias for [`AtomicCell::get_and_set`].
    #[inline]
    pub fn swap(&self, value: W::Value) -> W::Value {
        self.get_and_set(value)
    }

    /// Stores `new` if the current value equals `expected`.
    ///
    /// Returns `true` when the store happened. A `false` result always means
    /// the value differed at the instant of the comparison.
    #[inline]
    pub fn compare_and_set(&self, expected: W::Value, new: W::Value) -> bool {
        <W::Value as AtomicPrimitive>::compare_and_set(&self.slot, expected, new)
    }

    /// Alias for [`AtomicCell::compare_and_set`].
    #[inline]
    pub fn compare_and_swap(&self, expected: W::Value, new: W::Value) -> bool {
        self.compare_and_set(expected, new)
    }

    /// Applies `f` in a `compare_and_set` retry loop and returns the value
    /// that was replaced.
    ///
    /// `f` may run more than once when other threads race with the update, so
    /// it should be free of side effects.
    pub fn fetch_and_update<F>(&self, mut f: F) -> W::Value
    where
        F: FnMut(W::Value) -> W::Value,
    {
        let backoff = Backoff::new();
        let mut current = self.read();
        loop {
            let next = f(current);
            if self.compare_and_set(current, next) {
                return current;
            }
            backoff.spin();
            current = self.read();
        }
    }

    /// Like [`AtomicCell::fetch_and_update`] but returns the value stored.
    pub fn update_and_fetch<F>(&self, mut f: F) -> W::Value
    where
        F: FnMut(W::Value) -> W::Value,
    {
        let mut stored = <W::Value as Zero>::zero();
        self.fetch_and_update(|current| {
            stored = f(current);
            stored
        });
        stored
    }
}

impl<W: Width> Default for AtomicCell<W> {
    /// A cell holding zero.
    fn default() -> Self {
        Self::new(<W::Value as Zero>::zero())
    }
}

impl<W: Width> Clone for AtomicCell<W> {
    /// Creates an independent cell holding this cell's current value.
    fn clone(&self) -> Self {
        Self::new(self.read())
    }
}

impl<W: Width> fmt::Debug for AtomicCell<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicCell")
            .field("kind", &W::KIND.name())
            .field("value", &self.read())
            .finish()
    }
}

impl<W: Width> fmt::Display for AtomicCell<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.read(), f)
    }
}

// Comparisons read each operand independently. The pair of reads is not one
// atomic snapshot: if either cell is mutated between them, the result may not
// match any single point in the global order.

impl<W: Width> PartialEq for AtomicCell<W> {
    /// Compares current values. A cell always equals itself without reading.
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other) || self.read() == other.read()
    }
}

impl<W: Width> Eq for AtomicCell<W> {}

impl<W: Width> PartialOrd for AtomicCell<W> {
    /// Orders by current values (independent reads).
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if ptr::eq(self, other) {
            return Some(Ordering::Equal);
        }
        Some(self.read().cmp(&other.read()))
    }
}

macro_rules! impl_value_interop {
    ($($marker:ident => $value:ty),* $(,)?) => {
        $(
            impl From<$value> for AtomicCell<$marker> {
                fn from(value: $value) -> Self {
                    Self::new(value)
                }
            }

            impl PartialEq<$value> for AtomicCell<$marker> {
                fn eq(&self, other: &$value) -> bool {
                    self.read() == *other
                }
            }

            impl PartialEq<AtomicCell<$marker>> for $value {
                fn eq(&self, other: &AtomicCell<$marker>) -> bool {
                    *self == other.read()
                }
            }

            impl PartialOrd<$value> for AtomicCell<$marker> {
                fn partial_cmp(&self, other: &$value) -> Option<Ordering> {
                    Some(self.read().cmp(other))
                }
            }

            impl PartialOrd<AtomicCell<$marker>> for $value {
                fn partial_cmp(&self, other: &AtomicCell<$marker>) -> Option<Ordering> {
                    Some(self.cmp(&other.read()))
                }
            }
        )*
    };
}

impl_value_interop! {
    Short => c_short,
    UShort => c_ushort,
    Int => c_int,
    UInt => c_uint,
    Long => c_long,
    ULong => c_ulong,
    LongLong => c_longlong,
    ULongLong => c_ulonglong,
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        let cell = AtomicCell::<Int>::default();
        assert_eq!(cell.read(), 0);
        assert_eq!(cell.width_kind(), WidthKind::Int);
    }

    #[test]
    fn store_and_read() {
        let cell = AtomicCell::<UInt>::new(1);
        cell.store(99);
        assert_eq!(cell.read(), 99);
    }

    #[test]
    fn try_store_keeps_prior_value_on_error() {
        let cell = AtomicCell::<UShort>::new(7);
        let err = cell.try_store(-1i32).unwrap_err();
        assert!(err.is_range());
        assert_eq!(cell.read(), 7);
        cell.try_store(65_535u64).unwrap();
        assert_eq!(cell.read(), 65_535);
    }

    #[test]
    fn increment_and_decrement() {
        let cell = AtomicCell::<Short>::new(0);
        assert_eq!(cell.increment(), 1);
        assert_eq!(cell.increment(), 2);
        assert_eq!(cell.decrement(), 1);
    }

    #[test]
    fn exchange_returns_prior_value() {
        let cell = AtomicCell::<Int>::new(-4);
        assert_eq!(cell.get_and_set(10), -4);
        assert_eq!(cell.read(), 10);
        assert_eq!(cell.swap(11), 10);
    }

    #[test]
    fn compare_and_set_only_on_match() {
        let cell = AtomicCell::<Int>::new(5);
        assert!(!cell.compare_and_set(4, 100));
        assert_eq!(cell.read(), 5);
        assert!(cell.compare_and_set(5, 100));
        assert_eq!(cell.read(), 100);
        assert!(!cell.compare_and_swap(5, 1));
    }

    #[test]
    fn update_loops_apply_function() {
        let cell = AtomicCell::<UInt>::new(3);
        assert_eq!(cell.fetch_and_update(|v| v * 2), 3);
        assert_eq!(cell.update_and_fetch(|v| v + 1), 7);
        assert_eq!(cell.read(), 7);
    }

    #[test]
    fn comparisons_use_current_values() {
        let a = AtomicCell::<Int>::new(1);
        let b = AtomicCell::<Int>::new(2);
        assert!(a < b);
        assert!(a != b);
        assert!(a == a);
        b.store(1);
        assert!(a == b);
        assert!(a == 1_i32);
        assert!(1_i32 == a);
        assert!(a < 2_i32);
        assert!(0_i32 < a);
    }

    #[test]
    fn debug_and_display() {
        let cell = AtomicCell::<UShort>::from(12_u16);
        assert_eq!(format!("{cell}"), "12");
        assert_eq!(
            format!("{cell:?}"),
            "AtomicCell { kind: \"unsigned short\", value: 12 }"
        );
    }

    #[test]
    fn clone_is_independent() {
        let a = AtomicCell::<Int>::new(1);
        let b = a.clone();
        a.store(2);
        assert_eq!(b.read(), 1);
    }
}
