//! Component definitions.
//!
//! A definition is a name, a lifecycle [`Mode`], default options and an
//! optional [`ComponentHandler`] that does the actual work.

use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use serde::Deserialize;

use crate::dom::ElementId;
use crate::options::{merge_layers, Options};
use crate::page::Page;

use super::host::EnvFlags;

// =============================================================================
// Mode / Capability
// =============================================================================

/// When a component's handler runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Holds defaults only. Page code constructs the plugin itself.
    #[default]
    Default,
    /// `init` runs on every activation, scoped to the activation context.
    Init,
    /// `activate_once` runs on the first activation only.
    Api,
    /// Registered but never run by activation.
    Manual,
}

bitflags! {
    /// What a registered component can do.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capability: u8 {
        /// Has non-empty default options.
        const DEFAULTS = 1 << 0;
        /// Runs on every activation.
        const AUTO_INIT = 1 << 1;
        /// Wires document-level handlers once.
        const DOCUMENT_API = 1 << 2;
        /// Caller controls construction.
        const MANUAL = 1 << 3;
        /// Attaches to individual elements.
        const PER_ELEMENT = 1 << 4;
    }
}

// =============================================================================
// Handler
// =============================================================================

/// Arguments of one lifecycle call.
#[derive(Clone, Debug)]
pub struct ActivationCx {
    pub name: String,
    /// Subtree being activated. `None` is the whole document.
    pub context: Option<ElementId>,
    /// Definition defaults with stored and environment overrides applied.
    pub defaults: Options,
}

impl ActivationCx {
    /// Defaults overlaid with the element's `data-*` attributes.
    pub fn element_options(&self, page: &Page, element: ElementId) -> Options {
        merge_layers([&self.defaults, &page.document.data(element)])
    }
}

/// Behaviour behind a component name.
///
/// Init components usually only provide [`selector`](Self::selector) and
/// [`activate_per_element`](Self::activate_per_element); the default
/// [`init`](Self::init) walks the matches. Api components override
/// [`activate_once`](Self::activate_once).
pub trait ComponentHandler {
    /// Elements the component attaches to.
    fn selector(&self) -> Option<&str> {
        None
    }

    /// Wire document-level behaviour. Called at most once per runner.
    fn activate_once(&self, _page: &mut Page, _cx: &ActivationCx) {}

    /// Called on every activation.
    fn init(&self, page: &mut Page, cx: &ActivationCx) {
        let Some(selector) = self.selector() else {
            return;
        };
        for element in page.document.find(cx.context, selector) {
            let options = cx.element_options(page, element);
            self.activate_per_element(page, element, &options);
        }
    }

    /// Attach to one element with its merged options.
    fn activate_per_element(&self, _page: &mut Page, _element: ElementId, _options: &Options) {}
}

// =============================================================================
// Definition
// =============================================================================

#[derive(Clone)]
pub struct ComponentDefinition {
    name: String,
    mode: Mode,
    defaults: Options,
    env_overrides: Vec<(EnvFlags, Options)>,
    plugin: Option<String>,
    handler: Option<Rc<dyn ComponentHandler>>,
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("defaults", &self.defaults)
            .field("env_overrides", &self.env_overrides)
            .field("plugin", &self.plugin)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

impl ComponentDefinition {
    pub fn new(name: impl Into<String>, mode: Mode) -> Self {
        Self {
            name: name.into(),
            mode,
            defaults: Options::new(),
            env_overrides: Vec::new(),
            plugin: None,
            handler: None,
        }
    }

    /// Defaults-only component.
    pub fn defaults_only(name: impl Into<String>, defaults: Options) -> Self {
        Self::new(name, Mode::Default).with_defaults(defaults)
    }

    pub fn init<H: ComponentHandler + 'static>(name: impl Into<String>, handler: H) -> Self {
        Self::new(name, Mode::Init).with_handler(handler)
    }

    pub fn api<H: ComponentHandler + 'static>(name: impl Into<String>, handler: H) -> Self {
        Self::new(name, Mode::Api).with_handler(handler)
    }

    pub fn manual(name: impl Into<String>) -> Self {
        Self::new(name, Mode::Manual)
    }

    pub fn with_defaults(mut self, defaults: Options) -> Self {
        self.defaults = defaults;
        self
    }

    /// Options applied on top of the defaults when every flag in `flags` is
    /// present in the page environment.
    pub fn when(mut self, flags: EnvFlags, overrides: Options) -> Self {
        self.env_overrides.push((flags, overrides));
        self
    }

    /// Host plugin the component needs. Without it the lifecycle handlers
    /// are skipped.
    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = Some(plugin.into());
        self
    }

    pub fn with_handler<H: ComponentHandler + 'static>(mut self, handler: H) -> Self {
        self.handler = Some(Rc::new(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn defaults(&self) -> &Options {
        &self.defaults
    }

    pub fn env_overrides(&self) -> &[(EnvFlags, Options)] {
        &self.env_overrides
    }

    pub fn plugin(&self) -> Option<&str> {
        self.plugin.as_deref()
    }

    pub fn handler(&self) -> Option<Rc<dyn ComponentHandler>> {
        self.handler.clone()
    }

    pub fn capabilities(&self) -> Capability {
        let mut caps = match self.mode {
            Mode::Default => Capability::empty(),
            Mode::Init => Capability::AUTO_INIT,
            Mode::Api => Capability::DOCUMENT_API,
            Mode::Manual => Capability::MANUAL,
        };
        if !self.defaults.is_empty() {
            caps |= Capability::DEFAULTS;
        }
        if self.handler.as_ref().is_some_and(|h| h.selector().is_some()) {
            caps |= Capability::PER_ELEMENT;
        }
        caps
    }
}
