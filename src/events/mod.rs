//! Events Module - Event types and handler registry
//!
//! Handlers are bound in one of three places:
//!
//! - **element** - on an element, optionally delegated to descendants
//!   matching a selector (`$(el).on('click', '.item', fn)`)
//! - **document** - delegated from the document to any element matching a
//!   selector, tagged with a namespace so it can be unbound as a group
//! - **window** - non-element events such as resize
//!
//! Every handler records an owner element. Removing the owner (or replacing
//! the widget that bound it) unbinds the handler.
//!
//! Dispatch itself lives on [`Page`](crate::page::Page), which owns both the
//! document and this registry. The registry only hands out snapshots, so
//! handlers are free to bind and unbind while an event is in flight.
//!
//! # Example
//!
//! ```
//! use spark_components::dom::Node;
//! use spark_components::events::EventKind;
//! use spark_components::page::Page;
//!
//! let mut page = Page::new();
//! let root = page.document.root();
//! let button = page.document.insert(root, Node::new("button"));
//!
//! page.events.on_element(button, EventKind::Click, None, |page, event| {
//!     if let Some(el) = event.current {
//!         page.document.add_class(el, "pressed");
//!     }
//! });
//!
//! page.click(button);
//! assert!(page.document.has_class(button, "pressed"));
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::dom::{ElementId, Selector};
use crate::options::OptionValue;
use crate::page::Page;

// =============================================================================
// TYPES
// =============================================================================

/// Event type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    Resize,
    Scroll,
    MouseEnter,
    MouseLeave,
    /// Named event raised by a widget (`toggle:sticky`, `close.bs.tab`).
    Custom(String),
}

impl EventKind {
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Parse an event name as used in markup and trigger calls.
    pub fn from_name(name: &str) -> Self {
        match name {
            "click" => Self::Click,
            "change" => Self::Change,
            "resize" => Self::Resize,
            "scroll" => Self::Scroll,
            "mouseenter" => Self::MouseEnter,
            "mouseleave" => Self::MouseLeave,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Whether the event travels from its target up to the root. Scroll
    /// only reaches handlers on the scrolled element itself.
    pub fn bubbles(&self) -> bool {
        !matches!(self, Self::Scroll | Self::Resize)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::Change => "change",
            Self::Resize => "resize",
            Self::Scroll => "scroll",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An event in flight.
#[derive(Clone, Debug)]
pub struct Event {
    pub kind: EventKind,
    /// Element the event originated on. `None` for window events.
    pub target: Option<ElementId>,
    /// Element the running handler is attached to: the delegate match for
    /// delegated handlers, the bound element otherwise.
    pub current: Option<ElementId>,
    /// Extra arguments passed by the trigger.
    pub detail: Vec<OptionValue>,
    stopped: Rc<Cell<bool>>,
    prevented: Rc<Cell<bool>>,
}

impl Event {
    pub fn new(kind: EventKind, target: Option<ElementId>) -> Self {
        Self {
            kind,
            target,
            current: target,
            detail: Vec::new(),
            stopped: Rc::new(Cell::new(false)),
            prevented: Rc::new(Cell::new(false)),
        }
    }

    pub fn with_detail(mut self, detail: Vec<OptionValue>) -> Self {
        self.detail = detail;
        self
    }

    /// Copy of this event seen from another element. Shares the
    /// stop/prevent flags with the original.
    pub(crate) fn at(&self, current: Option<ElementId>) -> Self {
        Self {
            current,
            ..self.clone()
        }
    }

    /// Don't bubble past the element currently handling the event.
    pub fn stop_propagation(&self) {
        self.stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.stopped.get()
    }

    /// Cancel the event's default action (checkbox toggle, tab close).
    pub fn prevent_default(&self) {
        self.prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.prevented.get()
    }
}

/// Event handler. Receives the page mutably so it can rewrite the document
/// and bind further handlers.
pub type EventHandler = Rc<dyn Fn(&mut Page, &Event)>;

/// Handle returned by every bind call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(usize);

/// Where a handler is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    Window,
    Element(ElementId),
    Document,
}

struct Listener {
    id: HandlerId,
    kind: EventKind,
    binding: Binding,
    delegate: Option<Selector>,
    namespace: Option<String>,
    owner: Option<ElementId>,
    handler: EventHandler,
}

/// Snapshot of a bound handler taken before dispatch.
#[derive(Clone)]
pub(crate) struct BoundHandler {
    pub id: HandlerId,
    pub delegate: Option<Selector>,
    pub handler: EventHandler,
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

/// All event bindings of one page.
#[derive(Default)]
pub struct EventRegistry {
    listeners: Vec<Listener>,
    next_id: usize,
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(
        &mut self,
        kind: EventKind,
        binding: Binding,
        delegate: Option<Selector>,
        namespace: Option<String>,
        owner: Option<ElementId>,
        handler: EventHandler,
    ) -> HandlerId {
        let id = self.next_id();
        trace!(?id, %kind, ?binding, delegate = delegate.as_ref().map(Selector::as_str), "bind");
        self.listeners.push(Listener {
            id,
            kind,
            binding,
            delegate,
            namespace,
            owner,
            handler,
        });
        id
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Bind a window-level handler owned by `owner`.
    pub fn on_window<F>(&mut self, kind: EventKind, owner: ElementId, handler: F) -> HandlerId
    where
        F: Fn(&mut Page, &Event) + 'static,
    {
        self.push(kind, Binding::Window, None, None, Some(owner), Rc::new(handler))
    }

    /// Bind a handler on `element`. With a delegate selector the handler
    /// runs for descendants of `element` matching it instead of for
    /// `element` itself.
    pub fn on_element<F>(
        &mut self,
        element: ElementId,
        kind: EventKind,
        delegate: Option<Selector>,
        handler: F,
    ) -> HandlerId
    where
        F: Fn(&mut Page, &Event) + 'static,
    {
        self.push(
            kind,
            Binding::Element(element),
            delegate,
            None,
            Some(element),
            Rc::new(handler),
        )
    }

    /// Bind a document-level delegated handler under `namespace`.
    pub fn on_document<F>(
        &mut self,
        kind: EventKind,
        delegate: Selector,
        namespace: impl Into<String>,
        handler: F,
    ) -> HandlerId
    where
        F: Fn(&mut Page, &Event) + 'static,
    {
        self.push(
            kind,
            Binding::Document,
            Some(delegate),
            Some(namespace.into()),
            None,
            Rc::new(handler),
        )
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    /// Unbind one handler. Returns false if it was not bound.
    pub fn off(&mut self, id: HandlerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        before != self.listeners.len()
    }

    /// Unbind every handler owned by `owner`. Returns how many were removed.
    pub fn off_owner(&mut self, owner: ElementId) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.owner != Some(owner));
        before - self.listeners.len()
    }

    /// Unbind every handler bound under `namespace`.
    pub fn off_namespace(&mut self, namespace: &str) -> usize {
        let before = self.listeners.len();
        self.listeners
            .retain(|l| l.namespace.as_deref() != Some(namespace));
        before - self.listeners.len()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn is_bound(&self, id: HandlerId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Number of handlers bound at `binding` for `kind`.
    pub fn count(&self, binding: Binding, kind: &EventKind) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.binding == binding && l.kind == *kind)
            .count()
    }

    /// Number of handlers bound under `namespace`.
    pub fn count_namespace(&self, namespace: &str) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.namespace.as_deref() == Some(namespace))
            .count()
    }

    /// Number of handlers owned by `owner`.
    pub fn count_owned(&self, owner: ElementId) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.owner == Some(owner))
            .count()
    }

    /// Handlers bound at `binding` for `kind`, in bind order.
    pub(crate) fn snapshot(&self, binding: Binding, kind: &EventKind) -> Vec<BoundHandler> {
        self.listeners
            .iter()
            .filter(|l| l.binding == binding && l.kind == *kind)
            .map(|l| BoundHandler {
                id: l.id,
                delegate: l.delegate.clone(),
                handler: Rc::clone(&l.handler),
            })
            .collect()
    }
}
