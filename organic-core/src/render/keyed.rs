//! Keyed List Reconciliation
//!
//! [`Keyed`] (the "For" primitive) maintains a live correspondence between
//! a reactive sequence and a set of mounted fragments: items whose key
//! persists keep their fragment and disposer (identity-preserving), new
//! keys mount fresh fragments, vanished keys are disposed, and a greedy
//! order pass moves any fragment not already in place so the region order
//! matches the sequence order.
//!
//! # Keyed vs unkeyed
//!
//! Without a key function the reconciler degrades to full replace-all:
//! every update disposes and recreates everything. That is an intentional
//! simplification, not a bug; use [`Keyed::keyed_by`] whenever item
//! identity matters.
//!
//! # Order pass
//!
//! The reorder step is a single greedy "move if out of place" walk, not a
//! minimal-edit-distance algorithm. It produces the correct final order
//! inside the reconciler's private region (property-tested over arbitrary
//! add/remove/reorder sequences) but may move more fragments than a
//! minimal plan would.

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::reactive::{create_scope, Effect};

use super::mountable::{Container, Disposer, Mountable};

/// One live entry: a key, the fragment bracketing its mounted output, and
/// the disposer that unmounts it.
struct KeyedItem<C, K> {
    key: Option<K>,
    fragment: C,
    disposer: Option<Disposer>,
}

impl<C: Container, K> KeyedItem<C, K> {
    fn dispose(mut self, region: &C) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
        region.remove_fragment(&self.fragment);
    }
}

/// Keyed list reconciliation over a reactive sequence.
///
/// # Example
///
/// ```rust,ignore
/// let rows = Signal::new(vec![1u32, 2, 3]);
/// let list = Keyed::new(
///     { let rows = rows.clone(); move || rows.get() },
///     |n, _| render_row(*n),
/// )
/// .keyed_by(|n, _| *n)
/// .with_fallback(empty_state());
///
/// let disposer = list.mount(&parent);
/// ```
pub struct Keyed<C, T, K = usize> {
    source: Rc<dyn Fn() -> Vec<T>>,
    render: Rc<dyn Fn(&T, usize) -> Box<dyn Mountable<C>>>,
    key: Option<Rc<dyn Fn(&T, usize) -> K>>,
    fallback: Option<Rc<dyn Mountable<C>>>,
}

impl<C, T, K> Keyed<C, T, K>
where
    C: Container,
    T: 'static,
    K: Eq + Hash + Clone + 'static,
{
    /// Create an unkeyed list over `source`, rendering each item with
    /// `render`.
    pub fn new(
        source: impl Fn() -> Vec<T> + 'static,
        render: impl Fn(&T, usize) -> Box<dyn Mountable<C>> + 'static,
    ) -> Self {
        Self {
            source: Rc::new(source),
            render: Rc::new(render),
            key: None,
            fallback: None,
        }
    }

    /// Reconcile by key: items whose key persists across updates keep
    /// their mounted fragment.
    pub fn keyed_by(mut self, key: impl Fn(&T, usize) -> K + 'static) -> Self {
        self.key = Some(Rc::new(key));
        self
    }

    /// Mount `fallback` whenever the sequence is empty.
    pub fn with_fallback(mut self, fallback: impl Mountable<C> + 'static) -> Self {
        self.fallback = Some(Rc::new(fallback));
        self
    }
}

impl<C, T, K> Mountable<C> for Keyed<C, T, K>
where
    C: Container,
    T: 'static,
    K: Eq + Hash + Clone + 'static,
{
    fn mount(&self, parent: &C) -> Disposer {
        // A private region isolates the list from sibling fragments, so
        // the order pass only ever reasons about its own children.
        let region = parent.create_fragment();
        let items: Rc<RefCell<Vec<KeyedItem<C, K>>>> = Rc::new(RefCell::new(Vec::new()));
        let fallback_slot: Rc<RefCell<Option<(C, Disposer)>>> = Rc::new(RefCell::new(None));

        let source = Rc::clone(&self.source);
        let render = Rc::clone(&self.render);
        let key = self.key.clone();
        let fallback = self.fallback.clone();

        let effect_region = region.clone();
        let effect_items = Rc::clone(&items);
        let effect_fallback_slot = Rc::clone(&fallback_slot);

        let (_, scope) = create_scope(move || {
            Effect::new(move || {
                let current = source();
                reconcile(
                    &effect_region,
                    &current,
                    &*render,
                    key.as_deref(),
                    fallback.as_deref(),
                    &effect_items,
                    &effect_fallback_slot,
                );
            });
        });

        let parent = parent.clone();
        Box::new(move || {
            scope.dispose();
            if let Some((fragment, disposer)) = fallback_slot.borrow_mut().take() {
                disposer();
                region.remove_fragment(&fragment);
            }
            let live: Vec<_> = items.borrow_mut().drain(..).collect();
            for item in live {
                item.dispose(&region);
            }
            parent.remove_fragment(&region);
        })
    }
}

/// One reconciliation pass: bring the mounted fragments in line with
/// `source`.
fn reconcile<C, T, K>(
    region: &C,
    source: &[T],
    render: &dyn Fn(&T, usize) -> Box<dyn Mountable<C>>,
    key: Option<&dyn Fn(&T, usize) -> K>,
    fallback: Option<&dyn Mountable<C>>,
    items: &RefCell<Vec<KeyedItem<C, K>>>,
    fallback_slot: &RefCell<Option<(C, Disposer)>>,
) where
    C: Container,
    K: Eq + Hash + Clone,
{
    if source.is_empty() {
        let stale: Vec<_> = items.borrow_mut().drain(..).collect();
        for item in stale {
            item.dispose(region);
        }
        // Mount the fallback exactly once; later empty updates leave it be.
        if let Some(fallback) = fallback {
            let mut slot = fallback_slot.borrow_mut();
            if slot.is_none() {
                let fragment = region.create_fragment();
                let disposer = fallback.mount(&fragment);
                *slot = Some((fragment, disposer));
            }
        }
        return;
    }

    // Back to non-empty: the fallback goes first.
    if let Some((fragment, disposer)) = fallback_slot.borrow_mut().take() {
        disposer();
        region.remove_fragment(&fragment);
    }

    let Some(key) = key else {
        // Unkeyed: full replace-all.
        let stale: Vec<_> = items.borrow_mut().drain(..).collect();
        for item in stale {
            item.dispose(region);
        }
        let mut next = Vec::with_capacity(source.len());
        for (index, value) in source.iter().enumerate() {
            let fragment = region.create_fragment();
            let disposer = render(value, index).mount(&fragment);
            next.push(KeyedItem {
                key: None,
                fragment,
                disposer: Some(disposer),
            });
        }
        *items.borrow_mut() = next;
        return;
    };

    let old: Vec<KeyedItem<C, K>> = items.borrow_mut().drain(..).collect();

    // Old key -> position. Duplicate old keys keep the last entry; the
    // shadowed one is disposed below like any other leftover.
    let mut index_of: HashMap<K, usize> = HashMap::with_capacity(old.len());
    for (position, item) in old.iter().enumerate() {
        if let Some(item_key) = &item.key {
            index_of.insert(item_key.clone(), position);
        }
    }
    let mut slots: Vec<Option<KeyedItem<C, K>>> = old.into_iter().map(Some).collect();

    // Walk the new sequence: reuse matches, create misses.
    let mut next = Vec::with_capacity(source.len());
    let mut created = 0usize;
    for (index, value) in source.iter().enumerate() {
        let item_key = key(value, index);
        let reused = index_of
            .get(&item_key)
            .and_then(|&position| slots[position].take());
        match reused {
            Some(existing) => next.push(existing),
            None => {
                created += 1;
                let fragment = region.create_fragment();
                let disposer = render(value, index).mount(&fragment);
                next.push(KeyedItem {
                    key: Some(item_key),
                    fragment,
                    disposer: Some(disposer),
                });
            }
        }
    }

    // Dispose everything the new sequence did not consume.
    let mut removed = 0usize;
    for slot in slots {
        if let Some(stale) = slot {
            removed += 1;
            stale.dispose(region);
        }
    }

    // Greedy order pass: move any fragment not immediately following its
    // predecessor.
    let mut previous: Option<C> = None;
    for item in &next {
        if !region.fragment_follows(&item.fragment, previous.as_ref()) {
            region.move_fragment_after(&item.fragment, previous.as_ref());
        }
        previous = Some(item.fragment.clone());
    }

    tracing::debug!(
        total = next.len(),
        created,
        removed,
        "keyed list reconciled"
    );
    *items.borrow_mut() = next;
}
