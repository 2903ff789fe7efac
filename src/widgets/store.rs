//! Widget Store - per-element widget instances.
//!
//! Side table keyed by `(element, widget type)`. At most one instance of a
//! widget type lives on an element; inserting a second one hands the old one
//! back so its handlers can be unbound.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::dom::ElementId;
use crate::events::HandlerId;

/// A stateful object attached to one element.
///
/// Widgets use interior mutability (`Cell`, `RefCell`, signals); the store
/// hands out shared `Rc` handles.
pub trait Widget: Any {
    /// Name the widget is known by in markup and logs.
    fn name(&self) -> &'static str;

    /// Handlers this instance has bound. Unbound when the instance is
    /// replaced or its element is removed.
    fn bindings(&self) -> Vec<HandlerId>;
}

struct Slot {
    any: Rc<dyn Any>,
    widget: Rc<dyn Widget>,
}

#[derive(Default)]
pub struct WidgetStore {
    slots: HashMap<(ElementId, TypeId), Slot>,
}

impl fmt::Debug for WidgetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self
            .slots
            .iter()
            .map(|((el, _), slot)| (el.index(), slot.widget.name()))
            .collect();
        entries.sort();
        f.debug_struct("WidgetStore").field("instances", &entries).finish()
    }
}

impl WidgetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `instance` on `element`, returning the instance it replaced.
    pub fn insert<W: Widget>(&mut self, element: ElementId, instance: Rc<W>) -> Option<Rc<dyn Widget>> {
        let slot = Slot {
            any: instance.clone(),
            widget: instance,
        };
        self.slots
            .insert((element, TypeId::of::<W>()), slot)
            .map(|old| old.widget)
    }

    pub fn get<W: Widget>(&self, element: ElementId) -> Option<Rc<W>> {
        let slot = self.slots.get(&(element, TypeId::of::<W>()))?;
        Rc::clone(&slot.any).downcast::<W>().ok()
    }

    pub fn contains<W: Widget>(&self, element: ElementId) -> bool {
        self.slots.contains_key(&(element, TypeId::of::<W>()))
    }

    pub fn remove<W: Widget>(&mut self, element: ElementId) -> Option<Rc<W>> {
        let slot = self.slots.remove(&(element, TypeId::of::<W>()))?;
        slot.any.downcast::<W>().ok()
    }

    /// Drop every instance attached to `element`.
    pub fn remove_element(&mut self, element: ElementId) -> Vec<Rc<dyn Widget>> {
        let keys: Vec<_> = self
            .slots
            .keys()
            .filter(|(el, _)| *el == element)
            .copied()
            .collect();
        keys.into_iter()
            .filter_map(|key| self.slots.remove(&key))
            .map(|slot| slot.widget)
            .collect()
    }

    /// Names of the widgets attached to `element`, sorted.
    pub fn names(&self, element: ElementId) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .slots
            .iter()
            .filter(|((el, _), _)| *el == element)
            .map(|(_, slot)| slot.widget.name())
            .collect();
        names.sort_unstable();
        names
    }

    /// Elements holding an instance of `W`.
    pub fn elements<W: Widget>(&self) -> Vec<ElementId> {
        let mut elements: Vec<_> = self
            .slots
            .keys()
            .filter(|(_, ty)| *ty == TypeId::of::<W>())
            .map(|(el, _)| *el)
            .collect();
        elements.sort();
        elements
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Node};

    struct Counter(u32);

    impl Widget for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn bindings(&self) -> Vec<HandlerId> {
            Vec::new()
        }
    }

    struct Marker;

    impl Widget for Marker {
        fn name(&self) -> &'static str {
            "marker"
        }

        fn bindings(&self) -> Vec<HandlerId> {
            Vec::new()
        }
    }

    #[test]
    fn test_one_instance_per_type_per_element() {
        let mut doc = Document::new();
        let root = doc.root();
        let el = doc.insert(root, Node::new("div"));
        let mut store = WidgetStore::new();

        assert!(store.insert(el, Rc::new(Counter(1))).is_none());
        assert!(store.insert(el, Rc::new(Marker)).is_none());
        let replaced = store.insert(el, Rc::new(Counter(2)));

        assert_eq!(replaced.map(|w| w.name()), Some("counter"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get::<Counter>(el).map(|c| c.0), Some(2));
        assert_eq!(store.names(el), vec!["counter", "marker"]);
    }

    #[test]
    fn test_remove_element() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.insert(root, Node::new("div"));
        let b = doc.insert(root, Node::new("div"));
        let mut store = WidgetStore::new();
        store.insert(a, Rc::new(Counter(1)));
        store.insert(a, Rc::new(Marker));
        store.insert(b, Rc::new(Marker));

        assert_eq!(store.remove_element(a).len(), 2);
        assert!(!store.contains::<Counter>(a));
        assert_eq!(store.elements::<Marker>(), vec![b]);
    }
}
