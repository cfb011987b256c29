//! `AtomicArray` - an owned vector of independently atomic cells.
//!
//! Design:
//! - The array owns a `Vec<AtomicCell<W>>`; no cell is shared with anything
//!   outside it.
//! - Element operations (`get`, `set`, `cell(i).add_and_fetch(..)`, ...) take
//!   `&self` and are atomic per element. Share the array across threads with
//!   `&`/`Arc` and mutate values concurrently without locks.
//! - Structural operations (`replace_element`, `reset`, `push`) take
//!   `&mut self`, so the borrow checker enforces that nobody is reading the
//!   old elements while the element list changes. Callers that need both wrap
//!   the array in a `RwLock`.
//!
//! There is no atomicity across elements. [`AtomicArray::snapshot`] and
//! iteration perform one independent read per element, in index order, and
//! can observe a mix of before/after values under concurrent mutation.

use core::fmt;
use core::iter::FusedIterator;
use core::mem;
use core::ops::Index;
use core::slice;

use num_traits::PrimInt;

use crate::cell::{narrow, AtomicCell};
use crate::error::{AtomicError, Result};
use crate::width::{Width, WidthKind};

/// An ordered, resizable collection of [`AtomicCell`]s sharing configuration `W`.
pub struct AtomicArray<W: Width> {
    elements: Vec<AtomicCell<W>>,
}

impl<W: Width> AtomicArray<W> {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Creates an empty array with room for `capacity` cells.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Creates an array with one fresh cell per value.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = W::Value>,
    {
        Self {
            elements: values.into_iter().map(AtomicCell::new).collect(),
        }
    }

    /// Creates an array from any primitive integers.
    ///
    /// # Errors
    /// [`AtomicError::Range`] for the first value that does not fit `W`.
    pub fn try_from_values<I, V>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: PrimInt,
    {
        Ok(Self {
            elements: build_cells::<W, I, V>(values)?,
        })
    }

    /// Configuration shared by every element.
    pub fn element_kind(&self) -> WidthKind {
        W::KIND
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the array has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Borrows the cell at `index`.
    ///
    /// # Errors
    /// [`AtomicError::Index`] if `index >= len()`.
    #[inline]
    pub fn cell(&self, index: usize) -> Result<&AtomicCell<W>> {
        self.elements
            .get(index)
            .ok_or_else(|| AtomicError::index(index, self.elements.len()))
    }

    /// Reads the value of element `index`.
    ///
    /// # Errors
    /// [`AtomicError::Index`] if `index >= len()`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<W::Value> {
        self.cell(index).map(AtomicCell::read)
    }

    /// Stores `value` into element `index`.
    ///
    /// This is the cell's own `store`: the cell is not replaced, so anyone
    /// holding a reference to it sees the new value.
    ///
    /// # Errors
    /// [`AtomicError::Index`] if `index >= len()`.
    #[inline]
    pub fn set(&self, index: usize, value: W::Value) -> Result<()> {
        self.cell(index)?.store(value);
        Ok(())
    }

    /// Stores any primitive integer into element `index`.
    ///
    /// # Errors
    /// [`AtomicError::Index`] if `index >= len()`, otherwise
    /// [`AtomicError::Range`] if `value` does not fit. The element is
    /// unchanged on error.
    pub fn try_set<V: PrimInt>(&self, index: usize, value: V) -> Result<()> {
        self.cell(index)?.try_store(value)
    }

    /// Puts `cell` at `index` and returns the cell it displaced.
    ///
    /// Unlike [`AtomicArray::set`] this swaps cell identity: later updates to
    /// the returned cell are not visible through the array.
    ///
    /// # Errors
    /// [`AtomicError::Index`] if `index >= len()`; `cell` is dropped.
    pub fn replace_element(&mut self, index: usize, cell: AtomicCell<W>) -> Result<AtomicCell<W>> {
        let len = self.elements.len();
        let slot = self
            .elements
            .get_mut(index)
            .ok_or_else(|| AtomicError::index(index, len))?;
        trace_event!(debug, kind = %W::KIND, index, "replacing array element");
        Ok(mem::replace(slot, cell))
    }

    /// Appends a fresh cell holding `value`.
    pub fn push(&mut self, value: W::Value) {
        self.elements.push(AtomicCell::new(value));
    }

    /// Reads every element in index order.
    ///
    /// Each element is read atomically, but the result is not a point-in-time
    /// image of the whole array: elements mutated during the call may appear
    /// with their old or new values independently.
    pub fn snapshot(&self) -> Vec<W::Value> {
        self.iter().collect()
    }

    /// Drops every cell and builds one fresh cell per value.
    ///
    /// An empty input leaves a zero-length array.
    pub fn reset<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = W::Value>,
    {
        self.elements = values.into_iter().map(AtomicCell::new).collect();
        trace_event!(debug, kind = %W::KIND, len = self.elements.len(), "array reset");
    }

    /// Like [`AtomicArray::reset`] for any primitive integers.
    ///
    /// # Errors
    /// [`AtomicError::Range`] for the first value that does not fit `W`; the
    /// array keeps its previous elements.
    pub fn try_reset<I, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: PrimInt,
    {
        self.elements = build_cells::<W, I, V>(values)?;
        trace_event!(debug, kind = %W::KIND, len = self.elements.len(), "array reset");
        Ok(())
    }

    /// Lazily reads element values in index order.
    ///
    /// Each call starts a new pass that re-reads the cells.
    pub fn iter(&self) -> Values<'_, W> {
        Values {
            inner: self.elements.iter(),
        }
    }

    /// Iterates over the cells themselves.
    pub fn iter_cells(&self) -> slice::Iter<'_, AtomicCell<W>> {
        self.elements.iter()
    }
}

fn build_cells<W, I, V>(values: I) -> Result<Vec<AtomicCell<W>>>
where
    W: Width,
    I: IntoIterator<Item = V>,
    V: PrimInt,
{
    values
        .into_iter()
        .map(|value| narrow::<W, V>(value).map(AtomicCell::new))
        .collect()
}

impl<W: Width> Default for AtomicArray<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Width> Clone for AtomicArray<W> {
    /// Builds fresh cells from a [`AtomicArray::snapshot`] of this array.
    fn clone(&self) -> Self {
        Self::from_values(self.iter())
    }
}

impl<W: Width> fmt::Debug for AtomicArray<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicArray")
            .field("kind", &W::KIND.name())
            .field("values", &self.snapshot())
            .finish()
    }
}

impl<W: Width> Index<usize> for AtomicArray<W> {
    type Output = AtomicCell<W>;

    /// # Panics
    /// Panics if `index >= len()`; use [`AtomicArray::cell`] to get an error instead.
    fn index(&self, index: usize) -> &AtomicCell<W> {
        &self.elements[index]
    }
}

impl<W: Width> FromIterator<W::Value> for AtomicArray<W> {
    fn from_iter<I: IntoIterator<Item = W::Value>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

impl<W: Width> Extend<W::Value> for AtomicArray<W> {
    fn extend<I: IntoIterator<Item = W::Value>>(&mut self, iter: I) {
        self.elements.extend(iter.into_iter().map(AtomicCell::new));
    }
}

impl<'a, W: Width> IntoIterator for &'a AtomicArray<W> {
    type Item = W::Value;
    type IntoIter = Values<'a, W>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the current values of an [`AtomicArray`].
///
/// Reads each cell when it is reached, not when the iterator is created.
pub struct Values<'a, W: Width> {
    inner: slice::Iter<'a, AtomicCell<W>>,
}

impl<'a, W: Width> Iterator for Values<'a, W> {
    type Item = W::Value;

    #[inline]
    fn next(&mut self) -> Option<W::Value> {
        self.inner.next().map(AtomicCell::read)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, W: Width> DoubleEndedIterator for Values<'a, W> {
    #[inline]
    fn next_back(&mut self) -> Option<W::Value> {
        self.inner.next_back().map(AtomicCell::read)
    }
}

impl<'a, W: Width> ExactSizeIterator for Values<'a, W> {}

impl<'a, W: Width> FusedIterator for Values<'a, W> {}

impl<'a, W: Width> Clone for Values<'a, W> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use crate::width::{Int, UInt, UShort};

    #[test]
    fn from_values_and_get() {
        let arr = AtomicArray::<UInt>::from_values([10, 20, 30]);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(0), Ok(10));
        assert_eq!(arr.get(2), Ok(30));
        assert_eq!(arr.element_kind(), WidthKind::UInt);
    }

    #[test]
    fn out_of_bounds_is_index_error() {
        let arr = AtomicArray::<Int>::from_values([1]);
        assert_eq!(arr.get(1), Err(AtomicError::Index { index: 1, len: 1 }));
        assert!(arr.set(5, 0).unwrap_err().is_index());
        assert!(arr.cell(1).is_err());

        let empty = AtomicArray::<Int>::new();
        assert!(empty.is_empty());
        assert!(empty.get(0).unwrap_err().is_index());
    }

    #[test]
    fn set_updates_in_place() {
        let arr = AtomicArray::<Int>::from_values([1, 2]);
        let cell = arr.cell(0).unwrap();
        arr.set(0, 9).unwrap();
        assert_eq!(cell.read(), 9);
        assert_eq!(arr.get(1), Ok(2));
    }

    #[test]
    fn try_set_checks_index_then_range() {
        let arr = AtomicArray::<UShort>::from_values([1]);
        assert!(arr.try_set(3, -1).unwrap_err().is_index());
        assert!(arr.try_set(0, -1).unwrap_err().is_range());
        assert_eq!(arr.get(0), Ok(1));
        arr.try_set(0, 65_535_i64).unwrap();
        assert_eq!(arr.get(0), Ok(65_535));
    }

    #[test]
    fn replace_element_swaps_identity() {
        let mut arr = AtomicArray::<Int>::from_values([1, 2, 3]);
        let old = arr.replace_element(1, AtomicCell::new(20)).unwrap();
        assert_eq!(old.read(), 2);
        old.store(99);
        assert_eq!(arr.get(1), Ok(20));

        let err = arr.replace_element(3, AtomicCell::new(0)).unwrap_err();
        assert_eq!(err, AtomicError::Index { index: 3, len: 3 });
    }

    #[test]
    fn reset_rebuilds_cells() {
        let mut arr = AtomicArray::<Int>::from_values([1, 2, 3]);
        arr.reset([7, 8]);
        assert_eq!(arr.snapshot(), vec![7, 8]);
        arr.reset(core::iter::empty());
        assert!(arr.is_empty());
        assert_eq!(arr.snapshot(), Vec::<i32>::new());
    }

    #[test]
    fn try_reset_is_all_or_nothing() {
        let mut arr = AtomicArray::<UShort>::from_values([1, 2]);
        let err = arr.try_reset([5, 70_000, 6]).unwrap_err();
        assert_eq!(
            err,
            AtomicError::Range {
                kind: WidthKind::UShort,
                value: Some(70_000)
            }
        );
        assert_eq!(arr.snapshot(), vec![1, 2]);
        arr.try_reset([0_u8, 255]).unwrap();
        assert_eq!(arr.snapshot(), vec![0, 255]);
    }

    #[test]
    fn try_from_values_rejects_out_of_range() {
        assert!(AtomicArray::<UShort>::try_from_values([0, 65_535]).is_ok());
        assert!(AtomicArray::<UShort>::try_from_values([-1]).is_err());
    }

    #[test]
    fn iteration_rereads_current_values() {
        let arr = AtomicArray::<Int>::from_values([1, 2, 3]);
        let first: Vec<_> = arr.iter().collect();
        arr.cell(1).unwrap().add_and_fetch(10);
        let second: Vec<_> = (&arr).into_iter().collect();
        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(second, vec![1, 12, 3]);
        assert_eq!(arr.iter().rev().collect::<Vec<_>>(), vec![3, 12, 1]);
        assert_eq!(arr.iter().len(), 3);
    }

    #[test]
    fn iterator_reads_lazily() {
        let arr = AtomicArray::<Int>::from_values([1, 2]);
        let mut values = arr.iter();
        assert_eq!(values.next(), Some(1));
        arr.set(1, 5).unwrap();
        assert_eq!(values.next(), Some(5));
        assert_eq!(values.next(), None);
    }

    #[test]
    fn push_extend_collect_and_index() {
        let mut arr: AtomicArray<Int> = (0..3).collect();
        arr.push(3);
        arr.extend([4, 5]);
        assert_eq!(arr.snapshot(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(arr[4].read(), 4);
        assert_eq!(arr.iter_cells().count(), 6);
    }

    #[test]
    fn clone_and_debug() {
        let arr = AtomicArray::<UShort>::from_values([4, 5]);
        let copy = arr.clone();
        arr.set(0, 0).unwrap();
        assert_eq!(copy.snapshot(), vec![4, 5]);
        assert_eq!(
            format!("{arr:?}"),
            "AtomicArray { kind: \"unsigned short\", values: [0, 5] }"
        );
    }
}
