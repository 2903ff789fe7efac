//! Theme configuration.
//!
//! A TOML file that adjusts component defaults per site without touching
//! code:
//!
//! ```toml
//! environment = ["touch"]
//!
//! [viewport]
//! width = 1280
//! height = 720
//!
//! [components.stickyHeader]
//! changeHeaderOn = 80
//!
//! [components.horizontalTab.when."touch+mobile"]
//! activeClassName = "current"
//! ```
//!
//! Keys under `[components.<name>]` are merged into the registry with
//! [`ComponentRegistry::set_defaults`]; each `when.<flags>` table becomes an
//! environment-conditional layer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::engine::{ComponentRegistry, EnvFlags};
use crate::error::ConfigError;
use crate::options::{OptionValue, Options};
use crate::viewport::Viewport;

/// Names the config file read by [`ThemeConfig::load_default`].
pub const CONFIG_ENV: &str = "SPARK_COMPONENTS_CONFIG";

/// Overrides for one component.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ComponentConfig {
    /// Environment-conditional overrides keyed by a flag list such as
    /// `"touch+mobile"`.
    #[serde(default)]
    pub when: BTreeMap<String, toml::Table>,

    /// Everything else is a default override.
    #[serde(flatten)]
    pub defaults: toml::Table,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub viewport: Option<Viewport>,
    pub environment: Vec<String>,
    pub components: BTreeMap<String, ComponentConfig>,
}

fn table_options(table: &toml::Table) -> Options {
    table
        .iter()
        .map(|(key, value)| (key.clone(), OptionValue::from(value.clone())))
        .collect()
}

impl ThemeConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading theme config");
        Self::from_toml_str(&source)
    }

    /// Load the file named by `SPARK_COMPONENTS_CONFIG`, or an empty config
    /// when the variable is unset.
    pub fn load_default() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    /// Combined environment flags.
    pub fn environment(&self) -> Result<EnvFlags, ConfigError> {
        self.environment
            .iter()
            .try_fold(EnvFlags::empty(), |flags, name| Ok(flags | EnvFlags::parse_list(name)?))
    }

    /// Configured viewport, else the default one.
    pub fn viewport(&self) -> Viewport {
        self.viewport
            .map(|v| Viewport::new(v.width, v.height))
            .unwrap_or_default()
    }

    /// Push every component override into `registry`. Overrides for
    /// unregistered names are dropped. Fails only on malformed `when` keys,
    /// before anything is applied.
    pub fn apply(&self, registry: &mut ComponentRegistry) -> Result<(), ConfigError> {
        let mut conditional = Vec::new();
        for (name, component) in &self.components {
            for (flags, table) in &component.when {
                conditional.push((name, EnvFlags::parse_list(flags)?, table_options(table)));
            }
        }

        for (name, component) in &self.components {
            if !component.defaults.is_empty() {
                registry.set_defaults(name, &table_options(&component.defaults));
            }
        }
        for (name, flags, options) in conditional {
            registry.set_env_defaults(name, flags, options);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::engine::ComponentDefinition;

    const SAMPLE: &str = r#"
environment = ["touch", "retina"]

[viewport]
width = 1280
height = 720

[components.stickyHeader]
changeHeaderOn = 80
classes = { active = "pinned" }

[components.stickyHeader.when."touch+mobile"]
min = 30
"#;

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        registry
            .register(ComponentDefinition::manual("stickyHeader").with_defaults(
                Options::new()
                    .with("changeHeaderOn", 100)
                    .with("min", 50)
                    .with("classes", Options::new().with("active", "sticky").with("shrunk", "small")),
            ))
            .unwrap();
        registry
    }

    #[test]
    fn test_parse() {
        let config = ThemeConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.viewport(), Viewport::new(1280.0, 720.0));
        assert_eq!(config.environment().unwrap(), EnvFlags::TOUCH | EnvFlags::RETINA);
        let sticky = &config.components["stickyHeader"];
        assert!(sticky.defaults.contains_key("changeHeaderOn"));
        assert!(!sticky.defaults.contains_key("when"));
        assert!(sticky.when.contains_key("touch+mobile"));
    }

    #[test]
    fn test_apply_visible_in_defaults() {
        let config = ThemeConfig::from_toml_str(SAMPLE).unwrap();
        let mut registry = registry();
        config.apply(&mut registry).unwrap();

        let defaults = registry.get_defaults("stickyHeader");
        assert_eq!(defaults.get_f64("changeHeaderOn"), Some(80.0));
        let classes = defaults.get_map("classes").unwrap();
        assert_eq!(classes.get_str("active"), Some("pinned"));
        assert_eq!(classes.get_str("shrunk"), Some("small"));

        assert_eq!(defaults.get_f64("min"), Some(50.0));
        let touch = registry.resolve_defaults("stickyHeader", EnvFlags::TOUCH | EnvFlags::MOBILE);
        assert_eq!(touch.get_f64("min"), Some(30.0));
    }

    #[test]
    fn test_bad_flag_applies_nothing() {
        let config = ThemeConfig::from_toml_str(
            "[components.stickyHeader]\nmin = 10\n[components.stickyHeader.when.tablet]\nmin = 5\n",
        )
        .unwrap();
        let mut registry = registry();
        assert!(matches!(
            config.apply(&mut registry),
            Err(ConfigError::UnknownFlag(flag)) if flag == "tablet"
        ));
        assert_eq!(registry.get_defaults("stickyHeader").get_f64("min"), Some(50.0));
    }

    #[test]
    fn test_empty_config() {
        let config = ThemeConfig::from_toml_str("").unwrap();
        assert_eq!(config.viewport(), Viewport::default());
        assert!(config.environment().unwrap().is_empty());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = ThemeConfig::load(file.path()).unwrap();
        assert_eq!(config.components.len(), 1);

        let missing = ThemeConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            ThemeConfig::from_toml_str("environment = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
