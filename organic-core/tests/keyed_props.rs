//! Property tests for the keyed reconciler.
//!
//! Drives the list through arbitrary add/remove/reorder sequences and
//! checks the two load-bearing properties after every update: the
//! rendered order matches the source order, and a key is only ever
//! mounted when it was absent from the previous update.

mod common;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use proptest::prelude::*;

use common::TestContainer;
use organic_core::reactive::{flush, Signal};
use organic_core::render::{Keyed, Mountable};

/// Deduplicate while preserving first-occurrence order. The reconciler
/// expects distinct keys within one update.
fn dedup(values: Vec<u8>) -> Vec<u8> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).collect()
}

fn step_sequences() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(0u8..12, 0..10), 1..8)
        .prop_map(|steps| steps.into_iter().map(dedup).collect())
}

proptest! {
    #[test]
    fn order_matches_and_mounts_are_minimal(steps in step_sequences()) {
        let parent = TestContainer::root();
        let first = steps[0].clone();
        let rows = Signal::new(first.clone());

        let mounts: Rc<RefCell<HashMap<u8, usize>>> = Rc::new(RefCell::new(HashMap::new()));
        let list = Keyed::new(
            {
                let rows = rows.clone();
                move || rows.get()
            },
            {
                let mounts = Rc::clone(&mounts);
                move |value: &u8, _index: usize| -> Box<dyn Mountable<TestContainer>> {
                    let value = *value;
                    let mounts = Rc::clone(&mounts);
                    Box::new(move |fragment: &TestContainer| {
                        *mounts.borrow_mut().entry(value).or_insert(0) += 1;
                        fragment.mount_text(&value.to_string())
                    })
                }
            },
        )
        .keyed_by(|value, _| *value);

        let disposer = list.mount(&parent);

        let mut expected_mounts: HashMap<u8, usize> = HashMap::new();
        for &value in &first {
            *expected_mounts.entry(value).or_insert(0) += 1;
        }
        let mut previous: HashSet<u8> = first.iter().copied().collect();

        prop_assert_eq!(
            parent.rendering(),
            first.iter().map(u8::to_string).collect::<Vec<_>>()
        );

        for step in &steps[1..] {
            for &value in step {
                if !previous.contains(&value) {
                    *expected_mounts.entry(value).or_insert(0) += 1;
                }
            }
            previous = step.iter().copied().collect();

            rows.set(step.clone());
            flush().unwrap();

            prop_assert_eq!(
                parent.rendering(),
                step.iter().map(u8::to_string).collect::<Vec<_>>()
            );
            prop_assert_eq!(&*mounts.borrow(), &expected_mounts);
        }

        disposer();
        prop_assert!(parent.rendering().is_empty());
        prop_assert_eq!(parent.child_count(), 0);
    }
}
