//! Multi-Branch Conditional Mounting
//!
//! [`Switch`] mounts the children of the first case whose value matches a
//! reactive discriminant, or a fallback when no case matches. Cases are
//! tried in declaration order. Like [`crate::render::Show`], changing the
//! selected branch disposes the current content and mounts the new branch
//! fresh; there is no fragment reuse across branch changes.

use std::cell::RefCell;
use std::rc::Rc;

use crate::reactive::{create_scope, Effect};

use super::mountable::{Container, Disposer, Mountable};

struct CaseArm<C, T> {
    when: T,
    children: Rc<dyn Fn() -> Box<dyn Mountable<C>>>,
}

/// Mount one of several branches selected by a reactive value.
///
/// # Example
///
/// ```rust,ignore
/// let tab = Signal::new(Tab::Home);
/// let panel = Switch::new({ let tab = tab.clone(); move || tab.get() })
///     .case(Tab::Home, || home_panel())
///     .case(Tab::Settings, || settings_panel())
///     .with_fallback(|| not_found());
/// ```
pub struct Switch<C, T> {
    on: Rc<dyn Fn() -> T>,
    matcher: Rc<dyn Fn(&T, &T) -> bool>,
    cases: Vec<Rc<CaseArm<C, T>>>,
    fallback: Option<Rc<dyn Fn() -> Box<dyn Mountable<C>>>>,
}

impl<C: Container, T: PartialEq + 'static> Switch<C, T> {
    /// Create a switch over the reactive value `on`, matching cases by
    /// equality.
    pub fn new(on: impl Fn() -> T + 'static) -> Self {
        Self {
            on: Rc::new(on),
            matcher: Rc::new(|value: &T, when: &T| value == when),
            cases: Vec::new(),
            fallback: None,
        }
    }
}

impl<C: Container, T: 'static> Switch<C, T> {
    /// Replace the equality matcher with a custom predicate.
    ///
    /// The predicate receives the current discriminant first and the
    /// case's value second.
    pub fn matched_by(mut self, matcher: impl Fn(&T, &T) -> bool + 'static) -> Self {
        self.matcher = Rc::new(matcher);
        self
    }

    /// Add a case. Cases are tried in the order they were added; the first
    /// match wins.
    pub fn case(
        mut self,
        when: T,
        children: impl Fn() -> Box<dyn Mountable<C>> + 'static,
    ) -> Self {
        self.cases.push(Rc::new(CaseArm {
            when,
            children: Rc::new(children),
        }));
        self
    }

    /// Mount `fallback()` whenever no case matches.
    pub fn with_fallback(
        mut self,
        fallback: impl Fn() -> Box<dyn Mountable<C>> + 'static,
    ) -> Self {
        self.fallback = Some(Rc::new(fallback));
        self
    }
}

impl<C: Container, T: 'static> Mountable<C> for Switch<C, T> {
    fn mount(&self, parent: &C) -> Disposer {
        let region = parent.create_fragment();
        let content: Rc<RefCell<Option<Disposer>>> = Rc::new(RefCell::new(None));

        let on = Rc::clone(&self.on);
        let matcher = Rc::clone(&self.matcher);
        let cases = self.cases.clone();
        let fallback = self.fallback.clone();

        let effect_region = region.clone();
        let effect_content = Rc::clone(&content);

        let (_, scope) = create_scope(move || {
            Effect::new(move || {
                if let Some(disposer) = effect_content.borrow_mut().take() {
                    disposer();
                }

                let value = on();
                let next = cases
                    .iter()
                    .find(|arm| matcher(&value, &arm.when))
                    .map(|arm| (arm.children)())
                    .or_else(|| fallback.as_ref().map(|factory| factory()));

                if let Some(mountable) = next {
                    *effect_content.borrow_mut() = Some(mountable.mount(&effect_region));
                }
            });
        });

        let parent = parent.clone();
        Box::new(move || {
            scope.dispose();
            if let Some(disposer) = content.borrow_mut().take() {
                disposer();
            }
            parent.remove_fragment(&region);
        })
    }
}
