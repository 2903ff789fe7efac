//! # spark-components
//!
//! Declarative components for element trees.
//!
//! Markup opts into behavior with `data-plugin="<name>"` and configures it with
//! `data-*` attributes. A [`ComponentRegistry`] maps names to definitions, and
//! [`Components::activate`] walks a subtree and runs each definition according
//! to its [`Mode`]. Widgets hold their observable state in
//! [spark-signals](https://github.com/RLabs-Inc/spark-signals) signals.
//!
//! ## Architecture
//!
//! ```text
//! data-* attributes → Options merge → ComponentHandler → widget instance
//!                                                      → document mutation / handler binding
//! ```
//!
//! The [`Page`] owns everything a component touches: the [`Document`], the
//! [`EventRegistry`], the [`WidgetStore`], the [`PluginHost`] and the
//! viewport. It is single-threaded; handlers take `&mut Page`.
//!
//! ## Modules
//!
//! - [`options`] - Option values, deep merge, `data-*` decoding
//! - [`dom`] - Element tree and selectors
//! - [`layout`] - Taffy layout for natural and resolved widths
//! - [`events`] - Handler registry and bubbling dispatch
//! - [`engine`] - Component registry and activation runner
//! - [`widgets`] - Responsive tabs, selectable, sticky header, ...
//! - [`components`] - The built-in component catalog
//! - [`config`] - TOML theme configuration
//!
//! ## Example
//!
//! ```
//! use spark_components::components::builtin_components;
//! use spark_components::dom::Node;
//! use spark_components::widgets::{ResponsiveTabs, TabMode};
//! use spark_components::{Page, Viewport};
//!
//! let mut page = Page::new().with_viewport(Viewport::new(90.0, 24.0));
//! let root = page.document.root();
//! let strip = page.document.insert(
//!     root,
//!     Node::new("div").class("nav-tabs-horizontal").child(
//!         Node::new("ul")
//!             .class("nav-tabs")
//!             .children((0..4).map(|_| Node::new("li").width(50.0)))
//!             .child(Node::new("li").class("dropdown").width(20.0).child(Node::new("ul"))),
//!     ),
//! );
//!
//! let mut components = builtin_components().unwrap();
//! components.activate(&mut page, None);
//!
//! let tabs = page.widget::<ResponsiveTabs>(strip).unwrap();
//! assert_eq!(tabs.mode(), TabMode::Partial(1));
//! ```

pub mod components;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod events;
pub mod layout;
pub mod logging;
pub mod options;
pub mod page;
pub mod viewport;
pub mod widgets;

// Re-export commonly used items
pub use error::{ConfigError, Error, RegistryError, Result, SelectorError};

pub use options::{deep_merge, merge_layers, OptionValue, Options};

pub use dom::{Document, ElementId, Node, Selector};

pub use events::{Event, EventKind, EventRegistry, HandlerId};

pub use engine::{
    ActivationCx, Capability, ComponentDefinition, ComponentHandler, ComponentRegistry,
    Components, EnvFlags, Mode, PluginHost,
};

pub use page::Page;
pub use viewport::Viewport;

pub use widgets::{Widget, WidgetStore};

pub use config::ThemeConfig;
