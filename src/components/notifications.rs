//! Notification components (toastr, alertify, sweetalert).
//!
//! Each binds a single document-level click handler on
//! `[data-plugin=<name>]` that hands the merged options of the clicked
//! element to the host's notifier.

use crate::dom::Selector;
use crate::engine::{ActivationCx, ComponentHandler};
use crate::events::{Event, EventKind};
use crate::options::{merge_layers, Options};
use crate::page::Page;

pub struct Notifier {
    plugin: String,
    /// Applied beneath everything else.
    fallbacks: Options,
    /// `(from, to)`: copy `from` to `to` when present.
    aliases: Vec<(&'static str, &'static str)>,
    prevent_default: bool,
}

impl Notifier {
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            fallbacks: Options::new(),
            aliases: Vec::new(),
            prevent_default: false,
        }
    }

    pub fn with_fallbacks(mut self, fallbacks: Options) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    pub fn with_alias(mut self, from: &'static str, to: &'static str) -> Self {
        self.aliases.push((from, to));
        self
    }

    pub fn preventing_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }

    fn options(&self, defaults: &Options, data: &Options) -> Options {
        let mut options = merge_layers([&self.fallbacks, defaults, data]);
        for &(from, to) in &self.aliases {
            if let Some(value) = options.get(from).cloned() {
                options.insert(to, value);
            }
        }
        options
    }
}

impl ComponentHandler for Notifier {
    fn activate_once(&self, page: &mut Page, cx: &ActivationCx) {
        let Ok(selector) = Selector::parse(&format!("[data-plugin=\"{}\"]", cx.name)) else {
            return;
        };
        // Defaults are frozen at wiring time; element data is read per click.
        let notifier = Notifier {
            plugin: self.plugin.clone(),
            fallbacks: self.options(&cx.defaults, &Options::new()),
            aliases: self.aliases.clone(),
            prevent_default: self.prevent_default,
        };

        page.events.on_document(
            EventKind::Click,
            selector,
            format!("site.{}", cx.name),
            move |page: &mut Page, event: &Event| {
                if notifier.prevent_default {
                    event.prevent_default();
                }
                let Some(element) = event.current else {
                    return;
                };
                let Some(constructor) = page.plugins.get(&notifier.plugin) else {
                    return;
                };
                let options = notifier.options(&Options::new(), &page.document.data(element));
                constructor(&mut page.document, element, &options);
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::dom::Node;
    use crate::engine::{ComponentDefinition, ComponentRegistry, Components};

    fn toastr() -> Notifier {
        Notifier::new("toastr")
            .with_fallbacks(Options::new().with("type", "info").with("message", ""))
            .preventing_default()
    }

    #[test]
    fn test_click_forwards_merged_options() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);

        let mut registry = ComponentRegistry::new();
        registry
            .register(
                ComponentDefinition::api("toastr", toastr())
                    .with_plugin("toastr")
                    .with_defaults(Options::new().with("timeOut", 3000)),
            )
            .unwrap();
        let mut components = Components::new(registry);

        let mut page = Page::new();
        page.plugins.install("toastr", move |_, _, options| {
            sink.borrow_mut().push(options.clone());
        });
        let root = page.document.root();
        let button = page.document.insert(
            root,
            Node::new("button").data("plugin", "toastr").data("message", "Saved"),
        );

        components.activate(&mut page, None);
        components.activate(&mut page, None);
        assert_eq!(page.events.count_namespace("site.toastr"), 1);

        assert!(!page.click(button));
        let received = received.borrow();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].get_str("message"), Some("Saved"));
        assert_eq!(received[0].get_str("type"), Some("info"));
        assert_eq!(received[0].get_f64("timeOut"), Some(3000.0));
    }

    #[test]
    fn test_aliases() {
        let alertify = Notifier::new("alertify").with_alias("labelOk", "okBtn");
        let options = alertify.options(&Options::new(), &Options::new().with("labelOk", "Yes"));
        assert_eq!(options.get_str("okBtn"), Some("Yes"));
    }
}
