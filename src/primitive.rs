//! The atomic operation provider.
//!
//! One binding per primitive integer type, each delegating to the matching
//! hardware atomic with `Ordering::SeqCst`. Bindings only exist where the
//! target has native atomics of that width (`target_has_atomic`); there is no
//! lock-based fallback, so an unsupported width fails to build.
//!
//! Under `cfg(loom)` the bindings use `loom`'s atomics so that model tests can
//! explore every interleaving.

use core::fmt::{Debug, Display};
use core::hash::Hash;
use core::sync::atomic::Ordering;

#[cfg(loom)]
use loom::sync::atomic;

#[cfg(not(loom))]
use core::sync::atomic;

use num_traits::PrimInt;

mod sealed {
    pub trait Sealed {}
}

/// A primitive integer with a sequentially-consistent atomic counterpart.
///
/// Sealed: implemented for `i16`, `u16`, `i32`, `u32`, `i64` and `u64`, which
/// cover every C integer width the crate exposes. Every operation acts on a
/// slot of type [`AtomicPrimitive::Atomic`] and is `SeqCst`.
pub trait AtomicPrimitive:
    sealed::Sealed
    + PrimInt
    + Into<i128>
    + Default
    + Debug
    + Display
    + Hash
    + Send
    + Sync
    + serde::Serialize
    + for<'de> serde::Deserialize<'de>
    + 'static
{
    /// Hardware atomic holding one value of this type.
    type Atomic: Send + Sync;

    /// Creates a slot holding `value`.
    fn new_atomic(value: Self) -> Self::Atomic;

    /// Reads the slot.
    fn load(slot: &Self::Atomic) -> Self;

    /// Replaces the slot contents.
    fn store(slot: &Self::Atomic, value: Self);

    /// Adds `delta` with wraparound and returns the new value.
    fn add_and_fetch(slot: &Self::Atomic, delta: Self) -> Self;

    /// Subtracts `delta` with wraparound and returns the new value.
    fn sub_and_fetch(slot: &Self::Atomic, delta: Self) -> Self;

    /// Replaces the slot contents and returns the previous value.
    fn get_and_set(slot: &Self::Atomic, value: Self) -> Self;

    /// Strong compare-and-swap: stores `new` iff the slot equals `expected`.
    ///
    /// Never fails spuriously.
    fn compare_and_set(slot: &Self::Atomic, expected: Self, new: Self) -> bool;
}

macro_rules! impl_atomic_primitive {
    ($($width:literal => $value:ty, $atomic:ident;)*) => {
        $(
            #[cfg(target_has_atomic = $width)]
            impl sealed::Sealed for $value {}

            #[cfg(target_has_atomic = $width)]
            impl AtomicPrimitive for $value {
                type Atomic = atomic::$atomic;

                #[inline(always)]
                fn new_atomic(value: Self) -> Self::Atomic {
                    atomic::$atomic::new(value)
                }

                #[inline(always)]
                fn load(slot: &Self::Atomic) -> Self {
                    slot.load(Ordering::SeqCst)
                }

                #[inline(always)]
                fn store(slot: &Self::Atomic, value: Self) {
                    slot.store(value, Ordering::SeqCst);
                }

                #[inline(always)]
                fn add_and_fetch(slot: &Self::Atomic, delta: Self) -> Self {
                    // fetch_add wraps; replay the addition on the old value.
                    slot.fetch_add(delta, Ordering::SeqCst).wrapping_add(delta)
                }

                #[inline(always)]
                fn sub_and_fetch(slot: &Self::Atomic, delta: Self) -> Self {
                    slot.fetch_sub(delta, Ordering::SeqCst).wrapping_sub(delta)
                }

                #[inline(always)]
                fn get_and_set(slot: &Self::Atomic, value: Self) -> Self {
                    slot.swap(value, Ordering::SeqCst)
                }

                #[inline(always)]
                fn compare_and_set(slot: &Self::Atomic, expected: Self, new: Self) -> bool {
                    slot.compare_exchange(expected, new, Ordering::SeqCst, Ordering::SeqCst)
                        .is_ok()
                }
            }
        )*
    };
}

impl_atomic_primitive! {
    "16" => i16, AtomicI16;
    "16" => u16, AtomicU16;
    "32" => i32, AtomicI32;
    "32" => u32, AtomicU32;
    "64" => i64, AtomicI64;
    "64" => u64, AtomicU64;
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn add_and_fetch_returns_new_value() {
        let slot = i32::new_atomic(40);
        assert_eq!(i32::add_and_fetch(&slot, 2), 42);
        assert_eq!(i32::load(&slot), 42);
    }

    #[test]
    fn sub_and_fetch_wraps_unsigned() {
        let slot = u16::new_atomic(0);
        assert_eq!(u16::sub_and_fetch(&slot, 1), u16::MAX);
    }

    #[test]
    fn compare_and_set_is_strong() {
        let slot = u64::new_atomic(7);
        assert!(!u64::compare_and_set(&slot, 8, 9));
        assert_eq!(u64::load(&slot), 7);
        assert!(u64::compare_and_set(&slot, 7, 9));
        assert_eq!(u64::load(&slot), 9);
    }

    #[test]
    fn get_and_set_returns_previous() {
        let slot = i16::new_atomic(-3);
        assert_eq!(i16::get_and_set(&slot, 5), -3);
        assert_eq!(i16::load(&slot), 5);
    }
}
