//! Built-in component catalog.
//!
//! [`register_builtins`] fills a registry with every component the crate
//! ships: the widgets in [`crate::widgets`], the pass-through and notification
//! components that forward to host plugins, and the defaults-only entries that
//! exist so page code can read shared plugin defaults.
//!
//! ```
//! use spark_components::components::builtin_components;
//!
//! let components = builtin_components().unwrap();
//! assert!(components.registry().has("horizontalTab"));
//! ```

mod buttons;
mod notifications;
mod pass_through;

pub use buttons::{toggle_more, MoreButtonsHandler};
pub use notifications::Notifier;
pub use pass_through::{construct_once, ExternalPlugins, PassThrough};

use crate::engine::{ComponentDefinition, ComponentRegistry, Components};
use crate::error::RegistryError;
use crate::options::{OptionValue, Options};
use crate::widgets::action_button::ActionButtonOptions;
use crate::widgets::responsive_tabs::{HorizontalTabHandler, TabsOptions};
use crate::widgets::selectable::{SelectableHandler, SelectableOptions};
use crate::widgets::sticky_header::{StickyHeaderHandler, StickyOptions};
use crate::widgets::tab_close::TabCloseHandler;
use crate::widgets::table_section::TableSectionHandler;

// =============================================================================
// Catalog
// =============================================================================

fn pass_through(name: &str, plugin: &str, defaults: Options) -> ComponentDefinition {
    ComponentDefinition::init(name, PassThrough::new(name, plugin))
        .with_plugin(plugin)
        .with_defaults(defaults)
}

fn notifier(name: &str, notifier: Notifier, plugin: &str, defaults: Options) -> ComponentDefinition {
    ComponentDefinition::api(name, notifier)
        .with_plugin(plugin)
        .with_defaults(defaults)
}

fn outline_button() -> OptionValue {
    "btn btn-outline btn-default".into()
}

/// Every built-in definition, in registration order.
pub fn builtin_definitions() -> Vec<ComponentDefinition> {
    vec![
        notifier(
            "alertify",
            Notifier::new("alertify")
                .with_alias("labelOk", "okBtn")
                .with_alias("labelCancel", "cancelBtn"),
            "alertify",
            Options::new()
                .with("type", "alert")
                .with("delay", 5000)
                .with("theme", "bootstrap"),
        ),
        pass_through("breadcrumb", "asBreadcrumbs", Options::new().with("namespace", "breadcrumb")),
        pass_through(
            "pieProgress",
            "asPieProgress",
            Options::new()
                .with("namespace", "pie-progress")
                .with("speed", 30)
                .with(
                    "classes",
                    Options::new()
                        .with("svg", "pie-progress-svg")
                        .with("element", "pie-progress")
                        .with("number", "pie-progress-number")
                        .with("content", "pie-progress-content"),
                ),
        ),
        ComponentDefinition::defaults_only(
            "datepicker",
            Options::new().with("autoclose", true).with("language", "zh-CN"),
        )
        .with_plugin("datepicker"),
        ComponentDefinition::defaults_only("maxlength", Options::new()).with_plugin("maxlength"),
        notifier("sweetalert", Notifier::new("swal"), "swal", Options::new()),
        ComponentDefinition::defaults_only("tokenfield", Options::new()).with_plugin("tokenfield"),
        ComponentDefinition::api("buttons", MoreButtonsHandler),
        ComponentDefinition::defaults_only(
            "TouchSpin",
            Options::new()
                .with("verticalupclass", "wb-plus")
                .with("verticaldownclass", "wb-minus")
                .with("buttondown_class", outline_button())
                .with("buttonup_class", outline_button()),
        )
        .with_plugin("TouchSpin"),
        ComponentDefinition::defaults_only("select2", Options::new().with("width", "style"))
            .with_plugin("select2"),
        ComponentDefinition::init("selectable", SelectableHandler)
            .with_defaults(SelectableOptions::defaults()),
        pass_through("switchery", "Switchery", Options::new().with("color", "#62a8ea")),
        ComponentDefinition::api("table", TableSectionHandler),
        ComponentDefinition::init(
            "verticalTab",
            PassThrough::with_selector(".nav-tabs-vertical", "matchHeight"),
        )
        .with_plugin("matchHeight"),
        ComponentDefinition::init("horizontalTab", HorizontalTabHandler)
            .with_defaults(TabsOptions::defaults()),
        notifier(
            "toastr",
            Notifier::new("toastr")
                .with_fallbacks(Options::new().with("type", "info").with("message", ""))
                .preventing_default(),
            "toastr",
            Options::new(),
        ),
        ComponentDefinition::init("stickyHeader", StickyHeaderHandler)
            .with_defaults(StickyOptions::defaults()),
        ComponentDefinition::api("tabClose", TabCloseHandler),
        ComponentDefinition::manual("actionBtn").with_defaults(ActionButtonOptions::defaults()),
        ComponentDefinition::manual("slidePanel").with_defaults(
            Options::new()
                .with("closeSelector", ".slidePanel-close")
                .with("mouseDragHandler", ".slidePanel-handler"),
        ),
    ]
}

/// Register every built-in component. Fails on the first name already
/// present in `registry`.
pub fn register_builtins(registry: &mut ComponentRegistry) -> Result<(), RegistryError> {
    for definition in builtin_definitions() {
        registry.register(definition)?;
    }
    Ok(())
}

/// A fresh registry holding the built-ins.
pub fn builtin_registry() -> Result<ComponentRegistry, RegistryError> {
    let mut registry = ComponentRegistry::new();
    register_builtins(&mut registry)?;
    Ok(registry)
}

/// An activation runner over [`builtin_registry`].
pub fn builtin_components() -> Result<Components, RegistryError> {
    Ok(Components::new(builtin_registry()?))
}
