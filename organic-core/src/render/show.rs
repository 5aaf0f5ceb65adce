//! Conditional Mounting
//!
//! [`Show`] mounts one of two renderable factories depending on a reactive
//! boolean. Toggling disposes the current content and mounts the other
//! side fresh; there is no fragment reuse across toggles.

use std::cell::RefCell;
use std::rc::Rc;

use crate::reactive::{create_scope, Effect};

use super::mountable::{Container, Disposer, Mountable};

/// Conditionally mount content driven by a reactive boolean.
///
/// # Example
///
/// ```rust,ignore
/// let logged_in = Signal::new(false);
/// let gate = Show::new(
///     { let logged_in = logged_in.clone(); move || logged_in.get() },
///     || dashboard(),
/// )
/// .with_fallback(|| login_form());
/// ```
pub struct Show<C> {
    when: Rc<dyn Fn() -> bool>,
    children: Rc<dyn Fn() -> Box<dyn Mountable<C>>>,
    fallback: Option<Rc<dyn Fn() -> Box<dyn Mountable<C>>>>,
}

impl<C: Container> Show<C> {
    /// Mount `children()` whenever `when()` is true, nothing otherwise.
    pub fn new(
        when: impl Fn() -> bool + 'static,
        children: impl Fn() -> Box<dyn Mountable<C>> + 'static,
    ) -> Self {
        Self {
            when: Rc::new(when),
            children: Rc::new(children),
            fallback: None,
        }
    }

    /// Mount `fallback()` whenever the condition is false.
    pub fn with_fallback(
        mut self,
        fallback: impl Fn() -> Box<dyn Mountable<C>> + 'static,
    ) -> Self {
        self.fallback = Some(Rc::new(fallback));
        self
    }
}

impl<C: Container> Mountable<C> for Show<C> {
    fn mount(&self, parent: &C) -> Disposer {
        let region = parent.create_fragment();
        let content: Rc<RefCell<Option<Disposer>>> = Rc::new(RefCell::new(None));

        let when = Rc::clone(&self.when);
        let children = Rc::clone(&self.children);
        let fallback = self.fallback.clone();

        let effect_region = region.clone();
        let effect_content = Rc::clone(&content);

        let (_, scope) = create_scope(move || {
            Effect::new(move || {
                if let Some(disposer) = effect_content.borrow_mut().take() {
                    disposer();
                }

                let next = if when() {
                    Some(children())
                } else {
                    fallback.as_ref().map(|factory| factory())
                };

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
