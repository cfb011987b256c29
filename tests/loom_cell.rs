//! Model-checked interleavings. Run with:
//!
//! ```text
//! RUSTFLAGS="--cfg loom" cargo test --release --test loom_cell
//! ```
#![cfg(loom)]

use atomint::{AtomicArray, AtomicCell, Int, UInt};
use loom::sync::Arc;
use loom::thread;

#[test]
fn concurrent_increments_are_not_lost() {
    loom::model(|| {
        let cell = Arc::new(AtomicCell::<UInt>::new(0));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    cell.add_and_fetch(1);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cell.read(), 2);
    });
}

#[test]
fn exactly_one_compare_and_set_wins() {
    loom::model(|| {
        let cell = Arc::new(AtomicCell::<Int>::new(0));

        let handles: Vec<_> = (1..=2)
            .map(|id| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || cell.compare_and_set(0, id))
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(wins, 1);
        let value = cell.read();
        assert!(value == 1 || value == 2);
    });
}

#[test]
fn exchange_hands_back_every_value_once() {
    loom::model(|| {
        let cell = Arc::new(AtomicCell::<Int>::new(0));

        let handles: Vec<_> = (1..=2)
            .map(|id| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || cell.get_and_set(id))
            })
            .collect();

        let mut seen: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        seen.push(cell.read());
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
    });
}

#[test]
fn array_elements_are_isolated() {
    loom::model(|| {
        let arr = Arc::new(AtomicArray::<Int>::from_values([0, 0]));

        let a = Arc::clone(&arr);
        let t = thread::spawn(move || {
            a.set(0, 5).unwrap();
        });
        arr.cell(1).unwrap().add_and_fetch(7);
        t.join().unwrap();

        assert_eq!(arr.snapshot(), vec![5, 7]);
    });
}
