//! Pass-through components.
//!
//! Components whose whole job is constructing a host plugin on each
//! `[data-plugin=<name>]` element with the merged options. The plugin itself
//! is opaque; the framework only guarantees one construction per element.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::trace;

use crate::dom::ElementId;
use crate::engine::ComponentHandler;
use crate::events::HandlerId;
use crate::options::Options;
use crate::page::Page;
use crate::widgets::Widget;

/// Records which host plugins have been constructed on an element.
#[derive(Debug, Default)]
pub struct ExternalPlugins {
    names: RefCell<BTreeSet<String>>,
}

impl Widget for ExternalPlugins {
    fn name(&self) -> &'static str {
        "externalPlugins"
    }

    fn bindings(&self) -> Vec<HandlerId> {
        Vec::new()
    }
}

impl ExternalPlugins {
    pub fn contains(&self, plugin: &str) -> bool {
        self.names.borrow().contains(plugin)
    }

    pub fn names(&self) -> Vec<String> {
        self.names.borrow().iter().cloned().collect()
    }
}

/// Construct `plugin` on `element` unless it already was. Returns false
/// when skipped (already constructed, or plugin not installed).
pub fn construct_once(page: &mut Page, plugin: &str, element: ElementId, options: &Options) -> bool {
    let Some(constructor) = page.plugins.get(plugin) else {
        return false;
    };
    let record = match page.widget::<ExternalPlugins>(element) {
        Some(record) => record,
        None => {
            let record = Rc::new(ExternalPlugins::default());
            page.attach_widget(element, Rc::clone(&record));
            record
        }
    };
    if !record.names.borrow_mut().insert(plugin.to_string()) {
        trace!(plugin, element = element.index(), "plugin already constructed");
        return false;
    }

    constructor(&mut page.document, element, options);
    true
}

/// Init handler constructing `plugin` on `[data-plugin="<name>"]` elements.
pub struct PassThrough {
    selector: String,
    plugin: String,
}

impl PassThrough {
    pub fn new(name: &str, plugin: impl Into<String>) -> Self {
        Self {
            selector: format!("[data-plugin=\"{name}\"]"),
            plugin: plugin.into(),
        }
    }

    /// Construct on every element matching `selector` instead of the
    /// `data-plugin` marker.
    pub fn with_selector(selector: impl Into<String>, plugin: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            plugin: plugin.into(),
        }
    }
}

impl ComponentHandler for PassThrough {
    fn selector(&self) -> Option<&str> {
        Some(&self.selector)
    }

    fn activate_per_element(&self, page: &mut Page, element: ElementId, options: &Options) {
        construct_once(page, &self.plugin, element, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::dom::Node;
    use crate::engine::{ComponentDefinition, ComponentRegistry, Components};

    #[test]
    fn test_constructs_once_per_element() {
        let calls = Rc::new(Cell::new(0));
        let counted = Rc::clone(&calls);

        let mut registry = ComponentRegistry::new();
        registry
            .register(
                ComponentDefinition::init("breadcrumb", PassThrough::new("breadcrumb", "asBreadcrumbs"))
                    .with_plugin("asBreadcrumbs")
                    .with_defaults(Options::new().with("namespace", "breadcrumb")),
            )
            .unwrap();
        let mut components = Components::new(registry);

        let mut page = Page::new();
        page.plugins.install("asBreadcrumbs", move |doc, el, options| {
            counted.set(counted.get() + 1);
            doc.add_class(el, options.get_str("namespace").unwrap_or("none"));
        });
        let root = page.document.root();
        let el = page.document.insert(root, Node::new("ol").data("plugin", "breadcrumb"));

        components.activate(&mut page, None);
        components.activate(&mut page, None);

        assert_eq!(calls.get(), 1);
        assert!(page.document.has_class(el, "breadcrumb"));
        let record = page.widget::<ExternalPlugins>(el).unwrap();
        assert_eq!(record.names(), vec!["asBreadcrumbs".to_string()]);
    }

    #[test]
    fn test_missing_plugin_constructs_nothing() {
        let mut page = Page::new();
        let root = page.document.root();
        let el = page.document.insert(root, Node::new("div"));

        assert!(!construct_once(&mut page, "Switchery", el, &Options::new()));
        assert!(page.widget::<ExternalPlugins>(el).is_none());
    }

    #[test]
    fn test_selector_pass_through_respects_context() {
        let mut registry = ComponentRegistry::new();
        registry
            .register(ComponentDefinition::init(
                "verticalTab",
                PassThrough::with_selector(".nav-tabs-vertical", "matchHeight"),
            ))
            .unwrap();
        let mut components = Components::new(registry);

        let mut page = Page::new();
        page.plugins.install("matchHeight", |doc, el, _| doc.add_class(el, "matched"));
        let root = page.document.root();
        let outside = page.document.insert(root, Node::new("div").class("nav-tabs-vertical"));
        let context = page.document.insert(root, Node::new("section"));
        let inside = page
            .document
            .insert(context, Node::new("div").class("nav-tabs-vertical"));

        components.activate(&mut page, Some(context));

        assert!(page.document.has_class(inside, "matched"));
        assert!(!page.document.has_class(outside, "matched"));
    }
}
