//! # `atomint` - Atomic Integer Cells
//!
//! Fixed-width integer cells that any number of threads can update without
//! locks, plus a homogeneous array of such cells. Every operation is
//! sequentially consistent.
//!
//! ## Guarantees
//!
//! ### Per cell
//! - **Sequential consistency**: all operations on one cell, from all threads,
//!   fall into a single total order compatible with each thread's program order.
//! - **Progress**: `read`, `store`, `add_and_fetch`, `sub_and_fetch` and
//!   `get_and_set` are wait-free; `compare_and_set` is the strong form and
//!   never fails spuriously.
//! - **Wraparound**: arithmetic wraps modulo the width, never errors.
//! - **Encapsulation**: the slot is reachable only through the operation set.
//!
//! ### Across cells
//! - **No joint atomicity**: there is no ordering claim between two cells.
//!   Comparing two cells reads each one independently, and
//!   [`AtomicArray::snapshot`] reads each element independently.
//! - **Structural changes need `&mut`**: [`AtomicArray::reset`] and
//!   [`AtomicArray::replace_element`] take `&mut self`, so concurrent readers
//!   of the old elements are ruled out at compile time.
//!
//! ## Architecture
//!
//! 1. **Operation provider** ([`AtomicPrimitive`]): one sealed binding per
//!    primitive integer to the matching hardware atomic, all `SeqCst`.
//! 2. **Configurations** ([`Width`], [`WidthKind`]): eight zero-sized markers,
//!    one per C integer type, each naming its value type. Resolved at compile
//!    time; `long` and `long long` stay distinct even where both are 64-bit.
//! 3. **Cells** ([`AtomicCell`]) and **arrays** ([`AtomicArray`]) generic over
//!    the configuration, with an alias per configuration.
//! 4. **Runtime selection** ([`AnyAtomicCell`]): a closed enum over the eight
//!    cells for callers that only know the configuration at runtime.
//!
//! ## Features
//!
//! - `tracing`: emits `debug` events for array structure changes and `trace`
//!   events for rejected arguments, under the `atomint` target.
//!
//! ## Example
//!
//! ```rust
//! use atomint::{AtomicUIntArray, AtomicUShort};
//! use std::thread;
//!
//! let counter = AtomicUShort::new(u16::MAX);
//! assert_eq!(counter.add_and_fetch(1), 0);
//!
//! let arr = AtomicUIntArray::from_values([10, 20, 30]);
//! thread::scope(|s| {
//!     for _ in 0..4 {
//!         s.spawn(|| {
//!             arr.cell(1).unwrap().add_and_fetch(1);
//!         });
//!     }
//! });
//! assert_eq!(arr.snapshot(), vec![10, 24, 30]);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

#[macro_use]
mod macros;

pub mod array;
pub mod cell;
pub mod dynamic;
pub mod error;
pub mod primitive;
mod serde_impls;
pub mod width;

pub use array::{AtomicArray, Values};
pub use cell::AtomicCell;
pub use dynamic::AnyAtomicCell;
pub use error::{AtomicError, Result};
pub use primitive::AtomicPrimitive;
pub use width::{Int, Long, LongLong, Short, UInt, ULong, ULongLong, UShort, Width, WidthKind};

/// Atomic `short`.
pub type AtomicShort = AtomicCell<Short>;
/// Atomic `unsigned short`.
pub type AtomicUShort = AtomicCell<UShort>;
/// Atomic `int`.
pub type AtomicInt = AtomicCell<Int>;
/// Atomic `unsigned int`.
pub type AtomicUInt = AtomicCell<UInt>;
/// Atomic `long`.
pub type AtomicLong = AtomicCell<Long>;
/// Atomic `unsigned long`.
pub type AtomicULong = AtomicCell<ULong>;
/// Atomic `long long`.
pub type AtomicLongLong = AtomicCell<LongLong>;
/// Atomic `unsigned long long`.
pub type AtomicULongLong = AtomicCell<ULongLong>;

/// Array of atomic `short`.
pub type AtomicShortArray = AtomicArray<Short>;
/// Array of atomic `unsigned short`.
pub type AtomicUShortArray = AtomicArray<UShort>;
/// Array of atomic `int`.
pub type AtomicIntArray = AtomicArray<Int>;
/// Array of atomic `unsigned int`.
pub type AtomicUIntArray = AtomicArray<UInt>;
/// Array of atomic `long`.
pub type AtomicLongArray = AtomicArray<Long>;
/// Array of atomic `unsigned long`.
pub type AtomicULongArray = AtomicArray<ULong>;
/// Array of atomic `long long`.
pub type AtomicLongLongArray = AtomicArray<LongLong>;
/// Array of atomic `unsigned long long`.
pub type AtomicULongLongArray = AtomicArray<ULongLong>;

// A cell is exactly its hardware atomic: the marker is a ZST.
#[cfg(not(loom))]
const _: () = {
    use core::mem;
    use core::ffi::c_uint;
    use core::sync::atomic::{AtomicI16, AtomicU16, AtomicU64};

    assert!(mem::size_of::<Short>() == 0);
    assert!(mem::size_of::<AtomicShort>() == mem::size_of::<AtomicI16>());
    assert!(mem::size_of::<AtomicUShort>() == mem::size_of::<AtomicU16>());
    assert!(mem::size_of::<AtomicUInt>() == mem::size_of::<c_uint>());
    assert!(mem::size_of::<AtomicULongLong>() == mem::size_of::<AtomicU64>());
    assert!(mem::align_of::<AtomicULongLong>() == mem::align_of::<AtomicU64>());
};
