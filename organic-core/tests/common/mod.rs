//! Shared test host: an ordered in-memory container tree.
//!
//! Fragments are nodes in a tree; text leaves are the "rendered output".
//! `rendering()` flattens the tree depth-first so tests can assert on the
//! visible order, and node ids let tests check fragment identity across
//! reconciliations.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use organic_core::render::{Container, Disposer};

struct Node {
    id: usize,
    text: RefCell<Option<String>>,
    children: RefCell<Vec<Rc<Node>>>,
}

fn new_node() -> Rc<Node> {
    static NEXT_ID: AtomicUsize = AtomicUsize::new(0);
    Rc::new(Node {
        id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
        text: RefCell::new(None),
        children: RefCell::new(Vec::new()),
    })
}

fn collect(node: &Rc<Node>, out: &mut Vec<String>) {
    if let Some(text) = node.text.borrow().as_ref() {
        out.push(text.clone());
    }
    for child in node.children.borrow().iter() {
        collect(child, out);
    }
}

#[derive(Clone)]
pub struct TestContainer {
    node: Rc<Node>,
}

impl TestContainer {
    pub fn root() -> Self {
        Self { node: new_node() }
    }

    /// Stable identity of this fragment, for reuse assertions.
    pub fn id(&self) -> usize {
        self.node.id
    }

    /// Append a text leaf; the returned disposer detaches it again.
    pub fn mount_text(&self, text: &str) -> Disposer {
        let leaf = new_node();
        *leaf.text.borrow_mut() = Some(text.to_string());
        self.node.children.borrow_mut().push(Rc::clone(&leaf));

        let parent = Rc::clone(&self.node);
        Box::new(move || {
            parent
                .children
                .borrow_mut()
                .retain(|child| !Rc::ptr_eq(child, &leaf));
        })
    }

    /// All text leaves under this container, depth-first, in order.
    pub fn rendering(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect(&self.node, &mut out);
        out
    }

    /// Number of direct children (fragments and leaves).
    pub fn child_count(&self) -> usize {
        self.node.children.borrow().len()
    }
}

impl Container for TestContainer {
    fn create_fragment(&self) -> Self {
        let child = new_node();
        self.node.children.borrow_mut().push(Rc::clone(&child));
        Self { node: child }
    }

    fn move_fragment_after(&self, fragment: &Self, after: Option<&Self>) {
        let mut children = self.node.children.borrow_mut();
        let from = children
            .iter()
            .position(|child| Rc::ptr_eq(child, &fragment.node))
            .expect("fragment not in container");
        let node = children.remove(from);
        let to = match after {
            Some(anchor) => {
                children
                    .iter()
                    .position(|child| Rc::ptr_eq(child, &anchor.node))
                    .expect("anchor not in container")
                    + 1
            }
            None => 0,
        };
        children.insert(to, node);
    }

    fn remove_fragment(&self, fragment: &Self) {
        self.node
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, &fragment.node));
    }

    fn fragment_follows(&self, fragment: &Self, after: Option<&Self>) -> bool {
        let children = self.node.children.borrow();
        let position = children
            .iter()
            .position(|child| Rc::ptr_eq(child, &fragment.node));
        let Some(position) = position else {
            return false;
        };
        match after {
            None => position == 0,
            Some(anchor) => children
                .iter()
                .position(|child| Rc::ptr_eq(child, &anchor.node))
                .map(|anchor_position| anchor_position + 1 == position)
                .unwrap_or(false),
        }
    }
}
