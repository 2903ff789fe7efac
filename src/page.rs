//! Page - one document session.
//!
//! Owns the document, its event bindings, the widget instances attached to
//! its elements and the host capabilities (installed plugins, environment,
//! viewport). Hosts drive the page with [`click`](Page::click),
//! [`resize`](Page::resize), [`scroll_to`](Page::scroll_to) and friends.
//!
//! # Dispatch order
//!
//! Element events walk from the target up to the root. At each element with
//! bindings, delegated handlers run first for every matching descendant on
//! the path (innermost first), then the element's own handlers. Document
//! delegates run last. `stop_propagation` ends the walk after the element
//! currently being handled.

use std::rc::Rc;

use tracing::trace;

use crate::dom::{Document, ElementId};
use crate::engine::{EnvFlags, PluginHost};
use crate::events::{Binding, BoundHandler, Event, EventKind, EventRegistry};
use crate::layout::{compute_layout, natural_width, resolved_width, ComputedLayout};
use crate::options::OptionValue;
use crate::viewport::Viewport;
use crate::widgets::{Widget, WidgetStore};

#[derive(Debug, Default)]
pub struct Page {
    pub document: Document,
    pub events: EventRegistry,
    pub widgets: WidgetStore,
    pub plugins: PluginHost,
    pub environment: EnvFlags,
    pub viewport: Viewport,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_environment(mut self, environment: EnvFlags) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_plugins(mut self, plugins: PluginHost) -> Self {
        self.plugins = plugins;
        self
    }

    // =========================================================================
    // Layout
    // =========================================================================

    pub fn layout(&self) -> ComputedLayout {
        compute_layout(&self.document, self.viewport.width, self.viewport.height)
    }

    /// Width `element` gets in the current viewport (0 when not rendered).
    pub fn width_of(&self, element: ElementId) -> f32 {
        resolved_width(
            &self.document,
            element,
            self.viewport.width,
            self.viewport.height,
        )
    }

    /// Unconstrained width of `element`, measured as if shown.
    pub fn natural_width_of(&self, element: ElementId) -> f32 {
        natural_width(&self.document, element)
    }

    // =========================================================================
    // Widgets
    // =========================================================================

    pub fn widget<W: Widget>(&self, element: ElementId) -> Option<Rc<W>> {
        self.widgets.get::<W>(element)
    }

    /// Attach `instance` to `element`, unbinding the handlers of the instance
    /// it replaces.
    pub fn attach_widget<W: Widget>(&mut self, element: ElementId, instance: Rc<W>) {
        if let Some(old) = self.widgets.insert(element, instance) {
            trace!(widget = old.name(), element = element.index(), "replacing widget");
            for id in old.bindings() {
                self.events.off(id);
            }
        }
    }

    /// Remove `element` and its subtree. Widgets attached anywhere in the
    /// subtree are dropped and every handler they or the elements own is
    /// unbound.
    pub fn remove_element(&mut self, element: ElementId) -> Vec<ElementId> {
        let removed = self.document.remove(element);
        for &id in &removed {
            for widget in self.widgets.remove_element(id) {
                for handler in widget.bindings() {
                    self.events.off(handler);
                }
            }
            self.events.off_owner(id);
        }
        removed
    }

    // =========================================================================
    // Host input
    // =========================================================================

    /// Resize the viewport and notify window resize handlers.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.dispatch_window(Event::new(EventKind::Resize, None));
    }

    /// Click `element`. Checkboxes flip their checked state unless a handler
    /// prevents the default, then receive `change`.
    ///
    /// Returns false when a handler prevented the default action.
    pub fn click(&mut self, element: ElementId) -> bool {
        let checkbox = self.document.tag(element) == Some("input")
            && self.document.attr(element, "type") == Some("checkbox");
        if checkbox {
            let checked = self.document.is_checked(element);
            self.document.set_checked(element, !checked);
        }

        let proceed = self.dispatch(Event::new(EventKind::Click, Some(element)));

        if checkbox {
            if proceed {
                self.change(element);
            } else {
                let checked = self.document.is_checked(element);
                self.document.set_checked(element, !checked);
            }
        }
        proceed
    }

    pub fn change(&mut self, element: ElementId) -> bool {
        self.dispatch(Event::new(EventKind::Change, Some(element)))
    }

    /// Scroll `element` to `top` and fire `scroll` on it.
    pub fn scroll_to(&mut self, element: ElementId, top: f32) -> bool {
        self.document.set_scroll_top(element, top);
        self.dispatch(Event::new(EventKind::Scroll, Some(element)))
    }

    pub fn hover(&mut self, element: ElementId) -> bool {
        self.dispatch(Event::new(EventKind::MouseEnter, Some(element)))
    }

    pub fn leave(&mut self, element: ElementId) -> bool {
        self.dispatch(Event::new(EventKind::MouseLeave, Some(element)))
    }

    /// Fire `kind` on `element` with extra arguments.
    pub fn trigger(&mut self, element: ElementId, kind: EventKind, detail: Vec<OptionValue>) -> bool {
        self.dispatch(Event::new(kind, Some(element)).with_detail(detail))
    }

    /// Apply a terminal event. Returns true if it was a resize.
    pub fn handle_terminal_event(&mut self, event: &crossterm::event::Event) -> bool {
        match crate::viewport::translate(event) {
            Some(viewport) => {
                self.resize(viewport.width, viewport.height);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatch an event. Returns false when a handler prevented the default.
    pub fn dispatch(&mut self, event: Event) -> bool {
        let Some(target) = event.target else {
            return self.dispatch_window(event);
        };
        if !self.document.contains(target) {
            trace!(kind = %event.kind, target = target.index(), "dispatch to removed element");
            return true;
        }

        trace!(kind = %event.kind, target = target.index(), "dispatch");
        let path = if event.kind.bubbles() {
            self.document.path_to_root(target)
        } else {
            vec![target]
        };

        for (depth, &level) in path.iter().enumerate() {
            let bound = self.events.snapshot(Binding::Element(level), &event.kind);
            if bound.is_empty() {
                continue;
            }
            let (delegated, direct): (Vec<_>, Vec<_>) =
                bound.into_iter().partition(|b| b.delegate.is_some());

            // Delegates only match strictly below the bound element.
            for &candidate in &path[..depth] {
                self.run_delegates(&delegated, candidate, Some(level), &event);
                if event.is_propagation_stopped() {
                    return !event.is_default_prevented();
                }
            }

            if self.document.contains(level) {
                for bound in &direct {
                    self.run(bound, Some(level), &event);
                }
            }
            if event.is_propagation_stopped() {
                return !event.is_default_prevented();
            }
        }

        let document_handlers = self.events.snapshot(Binding::Document, &event.kind);
        if !document_handlers.is_empty() {
            for &candidate in &path {
                self.run_delegates(&document_handlers, candidate, None, &event);
                if event.is_propagation_stopped() {
                    break;
                }
            }
        }

        !event.is_default_prevented()
    }

    fn dispatch_window(&mut self, event: Event) -> bool {
        for bound in self.events.snapshot(Binding::Window, &event.kind) {
            self.run(&bound, None, &event);
        }
        !event.is_default_prevented()
    }

    fn run_delegates(
        &mut self,
        delegated: &[BoundHandler],
        candidate: ElementId,
        scope: Option<ElementId>,
        event: &Event,
    ) {
        for bound in delegated {
            let matches = bound
                .delegate
                .as_ref()
                .is_some_and(|selector| selector.matches(&self.document, candidate, scope));
            if matches && self.document.contains(candidate) {
                self.run(bound, Some(candidate), event);
            }
        }
    }

    fn run(&mut self, bound: &BoundHandler, current: Option<ElementId>, event: &Event) {
        // A handler earlier in this dispatch may have unbound this one.
        if !self.events.is_bound(bound.id) {
            return;
        }
        let handler = Rc::clone(&bound.handler);
        handler(self, &event.at(current));
    }
}
