//! Activation Runner.
//!
//! [`Components`] owns the registry and remembers which Api components have
//! already wired their document-level handlers:
//!
//! | mode    | on `activate`                                  |
//! |---------|------------------------------------------------|
//! | Api     | `activate_once`, first activation only         |
//! | Init    | `init` scoped to the context, every activation |
//! | Manual  | nothing                                        |
//! | Default | nothing                                        |
//!
//! A component whose host plugin is missing is skipped without error.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::dom::ElementId;
use crate::options::{merge_layers, Options};
use crate::page::Page;

use super::definition::{ActivationCx, ComponentDefinition, Mode};
use super::registry::ComponentRegistry;

#[derive(Debug, Default)]
pub struct Components {
    registry: ComponentRegistry,
    wired: HashSet<String>,
}

impl Components {
    pub fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry,
            wired: HashSet::new(),
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    /// Whether the Api component `name` has already been wired.
    pub fn is_wired(&self, name: &str) -> bool {
        self.wired.contains(name)
    }

    // =========================================================================
    // Activation
    // =========================================================================

    /// Run every registered component over `context` (the whole document
    /// when `None`), in registration order.
    pub fn activate(&mut self, page: &mut Page, context: Option<ElementId>) {
        debug!(context = context.map(ElementId::index), "activating components");
        let definitions: Vec<ComponentDefinition> = self.registry.definitions().cloned().collect();
        for definition in &definitions {
            self.run(page, definition, context);
        }
    }

    /// Run one component over `context`. Unknown names are a no-op and
    /// return false.
    pub fn activate_component(
        &mut self,
        page: &mut Page,
        name: &str,
        context: Option<ElementId>,
    ) -> bool {
        let Some(definition) = self.registry.get(name).cloned() else {
            debug!(component = name, "activate_component on unknown component");
            return false;
        };
        self.run(page, &definition, context);
        true
    }

    fn run(&mut self, page: &mut Page, definition: &ComponentDefinition, context: Option<ElementId>) {
        let name = definition.name();
        let Some(handler) = definition.handler() else {
            return;
        };

        match definition.mode() {
            Mode::Api => {
                if !self.wired.insert(name.to_string()) {
                    return;
                }
                if !plugin_available(page, definition) {
                    return;
                }
                trace!(component = name, "wiring document handlers");
                let cx = self.cx(page, definition, context);
                handler.activate_once(page, &cx);
            }
            Mode::Init => {
                if !plugin_available(page, definition) {
                    return;
                }
                trace!(component = name, "init");
                let cx = self.cx(page, definition, context);
                handler.init(page, &cx);
            }
            Mode::Manual | Mode::Default => {}
        }
    }

    fn cx(&self, page: &Page, definition: &ComponentDefinition, context: Option<ElementId>) -> ActivationCx {
        ActivationCx {
            name: definition.name().to_string(),
            context,
            defaults: self
                .registry
                .resolve_defaults(definition.name(), page.environment),
        }
    }

    // =========================================================================
    // Options / ad hoc construction
    // =========================================================================

    /// Options for `name` on `element`: defaults, environment overrides,
    /// the element's `data-*` attributes, then `overrides`.
    pub fn element_options(
        &self,
        page: &Page,
        name: &str,
        element: ElementId,
        overrides: &Options,
    ) -> Options {
        let defaults = self.registry.resolve_defaults(name, page.environment);
        let data = page.document.data(element);
        merge_layers([&defaults, &data, overrides])
    }

    /// Construct the host plugin of `name` on `element` with merged options.
    /// Returns false when the component is unknown or the plugin is not
    /// installed.
    pub fn construct_plugin(
        &self,
        page: &mut Page,
        name: &str,
        element: ElementId,
        overrides: &Options,
    ) -> bool {
        let Some(definition) = self.registry.get(name) else {
            debug!(component = name, "construct_plugin on unknown component");
            return false;
        };
        let plugin = definition.plugin().unwrap_or(name);
        let Some(constructor) = page.plugins.get(plugin) else {
            debug!(component = name, plugin, "plugin not installed");
            return false;
        };
        let options = self.element_options(page, name, element, overrides);
        constructor(&mut page.document, element, &options);
        true
    }
}

fn plugin_available(page: &Page, definition: &ComponentDefinition) -> bool {
    match definition.plugin() {
        Some(plugin) if !page.plugins.has(plugin) => {
            debug!(component = definition.name(), plugin, "plugin missing, skipping");
            false
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::dom::Node;
    use crate::engine::definition::ComponentHandler;
    use crate::engine::host::EnvFlags;

    struct Counting {
        once: Rc<Cell<u32>>,
        inits: Rc<Cell<u32>>,
    }

    impl ComponentHandler for Counting {
        fn activate_once(&self, _page: &mut Page, _cx: &ActivationCx) {
            self.once.set(self.once.get() + 1);
        }

        fn init(&self, _page: &mut Page, _cx: &ActivationCx) {
            self.inits.set(self.inits.get() + 1);
        }
    }

    fn counting() -> (Counting, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let once = Rc::new(Cell::new(0));
        let inits = Rc::new(Cell::new(0));
        let handler = Counting {
            once: Rc::clone(&once),
            inits: Rc::clone(&inits),
        };
        (handler, once, inits)
    }

    #[test]
    fn test_api_runs_once_init_every_time() {
        let (api_handler, api_once, api_inits) = counting();
        let (init_handler, init_once, init_inits) = counting();
        let (manual_handler, manual_once, manual_inits) = counting();

        let mut registry = ComponentRegistry::new();
        registry.register(ComponentDefinition::api("api", api_handler)).unwrap();
        registry.register(ComponentDefinition::init("init", init_handler)).unwrap();
        registry
            .register(ComponentDefinition::manual("manual").with_handler(manual_handler))
            .unwrap();
        let mut components = Components::new(registry);
        let mut page = Page::new();

        for _ in 0..3 {
            components.activate(&mut page, None);
        }

        assert_eq!((api_once.get(), api_inits.get()), (1, 0));
        assert_eq!((init_once.get(), init_inits.get()), (0, 3));
        assert_eq!((manual_once.get(), manual_inits.get()), (0, 0));
        assert!(components.is_wired("api"));
    }

    #[test]
    fn test_missing_plugin_skips() {
        let (handler, once, _) = counting();
        let (init_handler, _, inits) = counting();
        let mut registry = ComponentRegistry::new();
        registry
            .register(ComponentDefinition::api("toastr", handler).with_plugin("toastr"))
            .unwrap();
        registry
            .register(ComponentDefinition::init("breadcrumb", init_handler).with_plugin("asBreadcrumbs"))
            .unwrap();
        let mut components = Components::new(registry);
        let mut page = Page::new();

        components.activate(&mut page, None);
        assert_eq!(once.get(), 0);
        assert_eq!(inits.get(), 0);

        // Api components count as wired even when skipped.
        page.plugins.install("toastr", |_, _, _| {});
        components.activate(&mut page, None);
        assert_eq!(once.get(), 0);
        assert!(components.is_wired("toastr"));
    }

    #[test]
    fn test_activate_component_unknown_is_noop() {
        let mut components = Components::default();
        let mut page = Page::new();
        let before = page.document.mutation_count();

        assert!(!components.activate_component(&mut page, "ghost", None));
        assert_eq!(page.document.mutation_count(), before);
    }

    #[test]
    fn test_element_options_precedence() {
        let mut registry = ComponentRegistry::new();
        registry
            .register(
                ComponentDefinition::defaults_only("demo", Options::new().with("a", 1).with("b", 2))
                    .when(EnvFlags::TOUCH, Options::new().with("c", 5)),
            )
            .unwrap();
        let components = Components::new(registry);

        let mut page = Page::new().with_environment(EnvFlags::TOUCH);
        let root = page.document.root();
        let el = page.document.insert(root, Node::new("div").data("b", "3"));

        let merged = components.element_options(&page, "demo", el, &Options::new().with("a", 4));
        assert_eq!(merged.get_f64("a"), Some(4.0));
        assert_eq!(merged.get_f64("b"), Some(3.0));
        assert_eq!(merged.get_f64("c"), Some(5.0));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_construct_plugin() {
        let mut registry = ComponentRegistry::new();
        registry
            .register(ComponentDefinition::defaults_only(
                "select2",
                Options::new().with("width", "style"),
            ))
            .unwrap();
        let components = Components::new(registry);

        let mut page = Page::new();
        let root = page.document.root();
        let select = page.document.insert(root, Node::new("select"));

        assert!(!components.construct_plugin(&mut page, "select2", select, &Options::new()));

        page.plugins.install("select2", |doc, el, options| {
            doc.set_style(el, "width", options.get_str("width").unwrap_or("auto"));
        });
        assert!(components.construct_plugin(&mut page, "select2", select, &Options::new()));
        assert_eq!(page.document.style(select, "width"), Some("style"));
        assert!(!components.construct_plugin(&mut page, "missing", select, &Options::new()));
    }
}
