//! Document - element arena.
//!
//! Elements are slots in a vector addressed by [`ElementId`]. Removed slots
//! stay empty and are never reused, so a stale id simply stops resolving
//! instead of aliasing a newer element.
//!
//! Every write through the document bumps a mutation counter. Widgets use it
//! in tests to prove that repeated layout passes are free.

use std::collections::BTreeMap;

use tracing::warn;

use crate::options::{element_data, Options};

use super::node::Node;
use super::selector::Selector;

// =============================================================================
// ElementId / Element
// =============================================================================

/// Handle to an element in a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    /// Raw slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single element.
#[derive(Clone, Debug, Default)]
pub struct Element {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    checked: bool,
    hidden: bool,
    scroll_top: f32,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Space separated class list.
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }
}

// =============================================================================
// Document
// =============================================================================

/// Owned element tree with a single root (`body`).
#[derive(Clone, Debug)]
pub struct Document {
    elements: Vec<Option<Element>>,
    root: ElementId,
    mutations: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let body = Element {
            tag: "body".to_string(),
            ..Element::default()
        };
        Self {
            elements: vec![Some(body)],
            root: ElementId(0),
            mutations: 0,
        }
    }

    /// The root element. Activation with no context covers this subtree.
    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Whether `id` still refers to a live element.
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live elements (root included).
    pub fn len(&self) -> usize {
        self.elements.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count of write operations performed so far.
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    fn touch(&mut self) {
        self.mutations += 1;
    }

    // -------------------------------------------------------------------------
    // Tree construction
    // -------------------------------------------------------------------------

    /// Insert a node subtree as the last child of `parent`.
    ///
    /// Inserting under a dead parent creates a detached subtree.
    pub fn insert(&mut self, parent: ElementId, node: Node) -> ElementId {
        let parent = self.contains(parent).then_some(parent);
        let id = self.build(parent, node);
        if let Some(parent) = parent {
            if let Some(p) = self.get_mut(parent) {
                p.children.push(id);
            }
        }
        self.touch();
        id
    }

    fn build(&mut self, parent: Option<ElementId>, node: Node) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Some(Element {
            tag: node.tag,
            parent,
            children: Vec::new(),
            classes: node.classes,
            attributes: node.attributes.into_iter().collect(),
            styles: node.styles.into_iter().collect(),
            text: node.text,
            checked: node.checked,
            hidden: node.hidden,
            scroll_top: 0.0,
        }));

        let children: Vec<ElementId> = node
            .children
            .into_iter()
            .map(|child| self.build(Some(id), child))
            .collect();
        if let Some(el) = self.get_mut(id) {
            el.children = children;
        }
        id
    }

    /// Remove an element and its whole subtree.
    ///
    /// Returns the removed ids (subtree root first). The root element cannot
    /// be removed.
    pub fn remove(&mut self, id: ElementId) -> Vec<ElementId> {
        if id == self.root || !self.contains(id) {
            return Vec::new();
        }

        if let Some(parent) = self.parent(id) {
            if let Some(p) = self.get_mut(parent) {
                p.children.retain(|&c| c != id);
            }
        }

        let mut removed = vec![id];
        removed.extend(self.descendants(id));
        for &dead in &removed {
            self.elements[dead.0] = None;
        }
        self.touch();
        removed
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|el| el.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    /// All descendants in document order (not including `id`).
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// `id` followed by each ancestor up to the root.
    pub fn path_to_root(&self, id: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut current = self.contains(id).then_some(id);
        while let Some(el) = current {
            path.push(el);
            current = self.parent(el);
        }
        path
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = self.parent(id);
        while let Some(el) = current {
            if el == ancestor {
                return true;
            }
            current = self.parent(el);
        }
        false
    }

    /// Other children of the same parent.
    pub fn siblings(&self, id: ElementId) -> Vec<ElementId> {
        match self.parent(id) {
            Some(parent) => self
                .children(parent)
                .iter()
                .copied()
                .filter(|&c| c != id)
                .collect(),
            None => Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Elements under `scope` matching `selector`, in document order.
    ///
    /// With no scope the root element itself is a candidate too.
    pub fn select(&self, scope: Option<ElementId>, selector: &Selector) -> Vec<ElementId> {
        let candidates = match scope {
            Some(scope) => self.descendants(scope),
            None => {
                let mut all = vec![self.root];
                all.extend(self.descendants(self.root));
                all
            }
        };
        candidates
            .into_iter()
            .filter(|&el| selector.matches(self, el, scope))
            .collect()
    }

    /// Like [`select`](Self::select), parsing the selector first. Selectors
    /// that fail to parse are logged and match nothing.
    pub fn find(&self, scope: Option<ElementId>, selector: &str) -> Vec<ElementId> {
        match Selector::parse(selector) {
            Ok(selector) => self.select(scope, &selector),
            Err(err) => {
                warn!(selector, %err, "ignoring malformed selector");
                Vec::new()
            }
        }
    }

    pub fn find_first(&self, scope: Option<ElementId>, selector: &str) -> Option<ElementId> {
        self.find(scope, selector).into_iter().next()
    }

    /// Whether `id` matches `selector`. Malformed selectors never match.
    pub fn is(&self, id: ElementId, selector: &str) -> bool {
        Selector::parse(selector).is_ok_and(|s| s.matches(self, id, None))
    }

    /// `id` or its nearest ancestor matching `selector`.
    pub fn closest(&self, id: ElementId, selector: &str) -> Option<ElementId> {
        let selector = Selector::parse(selector).ok()?;
        self.path_to_root(id)
            .into_iter()
            .find(|&el| selector.matches(self, el, None))
    }

    /// Ancestors of `id` matching `selector`, nearest first.
    pub fn parents(&self, id: ElementId, selector: &str) -> Vec<ElementId> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.path_to_root(id)
            .into_iter()
            .skip(1)
            .filter(|&el| selector.matches(self, el, None))
            .collect()
    }

    /// Element carrying `id="<value>"`.
    pub fn by_id(&self, value: &str) -> Option<ElementId> {
        self.elements.iter().enumerate().find_map(|(i, el)| {
            let el = el.as_ref()?;
            (el.attribute("id") == Some(value)).then_some(ElementId(i))
        })
    }

    /// The element's `data-*` attributes as options.
    pub fn data(&self, id: ElementId) -> Options {
        self.get(id)
            .map(|el| element_data(el.attributes()))
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(Element::tag)
    }

    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id).and_then(|el| el.attribute(name))
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).is_some_and(|el| el.has_class(class))
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.get(id).and_then(|el| el.style(property))
    }

    pub fn text(&self, id: ElementId) -> &str {
        self.get(id).map(Element::text).unwrap_or("")
    }

    pub fn is_checked(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(Element::is_checked)
    }

    pub fn is_hidden(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(Element::is_hidden)
    }

    pub fn scroll_top(&self, id: ElementId) -> f32 {
        self.get(id).map(Element::scroll_top).unwrap_or(0.0)
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.get_mut(id) {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
            self.touch();
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.get_mut(id) {
            el.classes.retain(|c| c != class);
            self.touch();
        }
    }

    /// Toggle a class and return whether it is now present.
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        let present = self.has_class(id, class);
        if present {
            self.remove_class(id, class);
        } else {
            self.add_class(id, class);
        }
        !present
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(el) = self.get_mut(id) {
            el.attributes.insert(name.to_string(), value.to_string());
            self.touch();
        }
    }

    pub fn remove_attr(&mut self, id: ElementId, name: &str) {
        if let Some(el) = self.get_mut(id) {
            el.attributes.remove(name);
            self.touch();
        }
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: &str) {
        if let Some(el) = self.get_mut(id) {
            el.styles.insert(property.to_string(), value.to_string());
            self.touch();
        }
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(el) = self.get_mut(id) {
            el.text = text.to_string();
            self.touch();
        }
    }

    pub fn set_checked(&mut self, id: ElementId, checked: bool) {
        if let Some(el) = self.get_mut(id) {
            el.checked = checked;
            self.touch();
        }
    }

    pub fn show(&mut self, id: ElementId) {
        self.set_hidden(id, false);
    }

    pub fn hide(&mut self, id: ElementId) {
        self.set_hidden(id, true);
    }

    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        if let Some(el) = self.get_mut(id) {
            el.hidden = hidden;
            self.touch();
        }
    }

    /// Scroll position is user state, not markup: it does not count as a
    /// mutation.
    pub fn set_scroll_top(&mut self, id: ElementId, top: f32) {
        if let Some(el) = self.get_mut(id) {
            el.scroll_top = top.max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> (Document, ElementId) {
        let mut doc = Document::new();
        let root = doc.root();
        let table = doc.insert(
            root,
            Node::new("table").data("plugin", "selectable").child(
                Node::new("tbody")
                    .child(Node::new("tr").child(Node::new("td").child(
                        Node::new("input").class("selectable-item").attr("type", "checkbox"),
                    )))
                    .child(Node::new("tr").child(Node::new("td").child(
                        Node::new("input").class("selectable-item").attr("type", "checkbox"),
                    ))),
            ),
        );
        (doc, table)
    }

    #[test]
    fn test_insert_and_traverse() {
        let (doc, table) = table();

        assert_eq!(doc.parent(table), Some(doc.root()));
        assert_eq!(doc.descendants(table).len(), 7);
        assert_eq!(doc.find(Some(table), ".selectable-item").len(), 2);
        assert_eq!(doc.find(None, "[data-plugin=\"selectable\"]"), vec![table]);
    }

    #[test]
    fn test_closest_and_parents() {
        let (doc, table) = table();
        let item = doc.find_first(Some(table), ".selectable-item").unwrap();

        let row = doc.closest(item, "tr").unwrap();
        assert_eq!(doc.tag(row), Some("tr"));
        assert_eq!(doc.closest(item, "input"), Some(item));
        assert_eq!(doc.parents(item, "tr"), vec![row]);
        assert!(doc.is_ancestor(table, item));
    }

    #[test]
    fn test_remove_subtree() {
        let (mut doc, table) = table();
        let before = doc.len();
        let item = doc.find_first(Some(table), ".selectable-item").unwrap();
        let row = doc.closest(item, "tr").unwrap();

        let removed = doc.remove(row);
        assert_eq!(removed.len(), 3);
        assert!(!doc.contains(item));
        assert_eq!(doc.len(), before - 3);
        assert_eq!(doc.find(Some(table), ".selectable-item").len(), 1);

        // Root is permanent
        assert!(doc.remove(doc.root()).is_empty());
    }

    #[test]
    fn test_mutation_counter() {
        let (mut doc, table) = table();
        let start = doc.mutation_count();

        doc.add_class(table, "active");
        doc.remove_class(table, "active");
        doc.set_scroll_top(table, 40.0);
        assert_eq!(doc.mutation_count(), start + 2);
        assert_eq!(doc.scroll_top(table), 40.0);

        // Writes to dead ids are ignored
        let removed = doc.remove(table)[0];
        let after_remove = doc.mutation_count();
        doc.add_class(removed, "active");
        assert_eq!(doc.mutation_count(), after_remove);
    }

    #[test]
    fn test_data_and_toggle() {
        let (mut doc, table) = table();
        assert_eq!(doc.data(table).get_str("plugin"), Some("selectable"));

        assert!(doc.toggle_class(table, "active"));
        assert!(doc.has_class(table, "active"));
        assert!(!doc.toggle_class(table, "active"));
        assert!(!doc.has_class(table, "active"));
    }

    #[test]
    fn test_malformed_selector_matches_nothing() {
        let (doc, table) = table();
        assert!(doc.find(Some(table), "tr[").is_empty());
        assert!(!doc.is(table, "::"));
    }
}
