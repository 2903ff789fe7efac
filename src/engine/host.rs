//! Host capabilities.
//!
//! - [`EnvFlags`]: detected environment traits used to pick
//!   environment-conditional option overrides
//! - [`PluginHost`]: third-party widget constructors the host has installed.
//!   Components check for their plugin here and quietly skip when it is
//!   absent.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::dom::{Document, ElementId};
use crate::error::ConfigError;
use crate::options::Options;

bitflags! {
    /// Environment traits detected by the host.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EnvFlags: u8 {
        const TOUCH = 1 << 0;
        const MOBILE = 1 << 1;
        const RETINA = 1 << 2;
        const REDUCED_MOTION = 1 << 3;
        /// Old engines without modern layout support.
        const LEGACY = 1 << 4;
    }
}

impl EnvFlags {
    /// Parse a flag by its lowercase name (`touch`, `reduced-motion`, ...).
    pub fn parse_name(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "touch" => Ok(Self::TOUCH),
            "mobile" => Ok(Self::MOBILE),
            "retina" => Ok(Self::RETINA),
            "reduced-motion" => Ok(Self::REDUCED_MOTION),
            "legacy" => Ok(Self::LEGACY),
            _ => Err(ConfigError::UnknownFlag(name.to_string())),
        }
    }

    /// Parse a `+`/`,` separated flag list (`"touch+mobile"`).
    pub fn parse_list(list: &str) -> Result<Self, ConfigError> {
        list.split(['+', ','])
            .filter(|part| !part.trim().is_empty())
            .try_fold(Self::empty(), |flags, part| Ok(flags | Self::parse_name(part)?))
    }
}

/// Constructor for a third-party widget: build it on `element` with the
/// merged options.
pub type PluginConstructor = Rc<dyn Fn(&mut Document, ElementId, &Options)>;

/// Registry of installed third-party constructors.
#[derive(Clone, Default)]
pub struct PluginHost {
    plugins: BTreeMap<String, PluginConstructor>,
}

impl fmt::Debug for PluginHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.plugins.keys()).finish()
    }
}

impl PluginHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the constructor for `name`.
    pub fn install<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&mut Document, ElementId, &Options) + 'static,
    {
        self.plugins.insert(name.into(), Rc::new(constructor));
    }

    pub fn uninstall(&mut self, name: &str) -> bool {
        self.plugins.remove(name).is_some()
    }

    pub fn has(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<PluginConstructor> {
        self.plugins.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;

    #[test]
    fn test_env_flag_names() {
        assert_eq!(EnvFlags::parse_name("Touch").unwrap(), EnvFlags::TOUCH);
        assert_eq!(
            EnvFlags::parse_name("reduced_motion").unwrap(),
            EnvFlags::REDUCED_MOTION
        );
        assert_eq!(
            EnvFlags::parse_list("touch+mobile").unwrap(),
            EnvFlags::TOUCH | EnvFlags::MOBILE
        );
        assert_eq!(EnvFlags::parse_list("").unwrap(), EnvFlags::empty());
        assert!(matches!(
            EnvFlags::parse_name("smell"),
            Err(ConfigError::UnknownFlag(name)) if name == "smell"
        ));
    }

    #[test]
    fn test_plugin_host_install_and_call() {
        let mut host = PluginHost::new();
        assert!(!host.has("asBreadcrumbs"));

        host.install("asBreadcrumbs", |doc, el, options| {
            let ns = options.get_str("namespace").unwrap_or("none");
            doc.add_class(el, ns);
        });
        assert!(host.has("asBreadcrumbs"));

        let mut doc = Document::new();
        let root = doc.root();
        let el = doc.insert(root, Node::new("ol"));
        let ctor = host.get("asBreadcrumbs").unwrap();
        ctor(&mut doc, el, &Options::new().with("namespace", "breadcrumb"));
        assert!(doc.has_class(el, "breadcrumb"));

        assert!(host.uninstall("asBreadcrumbs"));
        assert_eq!(host.names().count(), 0);
    }
}
