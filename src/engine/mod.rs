//! Component engine - registration and activation.
//!
//! The engine manages the core data structures:
//! - Definition: name, lifecycle mode, defaults and handler of a component
//! - Registry: owned name → definition table with default overrides
//! - Activation: the runner that walks a context and invokes handlers
//! - Host: installed third-party plugins and environment flags
//!
//! # Architecture
//!
//! Markup names a component, the registry maps the name to a typed handler:
//!
//! ```text
//! data-plugin="selectable" → registry["selectable"] → SelectableHandler
//!                                                  → Selectable widget on the element
//! ```
//!
//! The registry is an ordinary value owned by [`Components`], not ambient
//! global state. Build it once at startup, apply configuration, then
//! activate as often as new markup arrives.

mod activation;
mod definition;
mod host;
mod registry;

pub use activation::Components;
pub use definition::{ActivationCx, Capability, ComponentDefinition, ComponentHandler, Mode};
pub use host::{EnvFlags, PluginConstructor, PluginHost};
pub use registry::ComponentRegistry;
