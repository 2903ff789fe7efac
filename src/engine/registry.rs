//! Component Registry - name → definition table.
//!
//! Manages the registered components of one page session:
//! - name → index mapping, definitions kept in registration order
//! - stored default overrides (`set_defaults`) layered over the
//!   definition's own defaults
//! - environment-conditional override layers
//!
//! Lookups never fail. Unknown names yield empty defaults and `false`
//! capability answers, so optional components degrade instead of erroring.

use std::collections::HashMap;

use tracing::debug;

use crate::error::RegistryError;
use crate::options::{deep_merge, merge_layers, Options};

use super::definition::{Capability, ComponentDefinition, Mode};
use super::host::EnvFlags;

// =============================================================================
// Registry State
// =============================================================================

#[derive(Debug)]
struct Entry {
    definition: ComponentDefinition,
    /// Accumulated `set_defaults` calls.
    overrides: Options,
    /// Accumulated `set_env_defaults` calls.
    env_overrides: Vec<(EnvFlags, Options)>,
}

/// Owned component registry.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a definition. A name can only be registered once; a second
    /// registration is rejected and leaves the first one untouched.
    pub fn register(&mut self, definition: ComponentDefinition) -> Result<(), RegistryError> {
        let name = definition.name().to_string();
        if self.index.contains_key(&name) {
            debug!(component = %name, "rejecting duplicate registration");
            return Err(RegistryError::Duplicate(name));
        }

        debug!(component = %name, mode = ?definition.mode(), "registered component");
        self.index.insert(name, self.entries.len());
        self.entries.push(Entry {
            definition,
            overrides: Options::new(),
            env_overrides: Vec::new(),
        });
        Ok(())
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut Entry> {
        let i = *self.index.get(name)?;
        self.entries.get_mut(i)
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    /// Stored defaults merged with applied overrides. Empty for unknown
    /// names.
    pub fn get_defaults(&self, name: &str) -> Options {
        match self.entry(name) {
            Some(entry) => merge_layers([entry.definition.defaults(), &entry.overrides]),
            None => Options::new(),
        }
    }

    /// Deep-merge `partial` into the stored overrides of `name`. Unknown
    /// names are ignored.
    pub fn set_defaults(&mut self, name: &str, partial: &Options) {
        match self.entry_mut(name) {
            Some(entry) => deep_merge(&mut entry.overrides, partial),
            None => debug!(component = name, "set_defaults on unknown component"),
        }
    }

    /// Add an override applied only when the environment has all of `flags`.
    pub fn set_env_defaults(&mut self, name: &str, flags: EnvFlags, partial: Options) {
        match self.entry_mut(name) {
            Some(entry) => entry.env_overrides.push((flags, partial)),
            None => debug!(component = name, "set_env_defaults on unknown component"),
        }
    }

    /// Defaults as seen in environment `env`: [`get_defaults`](Self::get_defaults)
    /// with every matching environment override applied in order.
    pub fn resolve_defaults(&self, name: &str, env: EnvFlags) -> Options {
        let Some(entry) = self.entry(name) else {
            return Options::new();
        };

        let mut resolved = merge_layers([entry.definition.defaults(), &entry.overrides]);
        let layers = entry
            .definition
            .env_overrides()
            .iter()
            .chain(&entry.env_overrides);
        for (flags, overrides) in layers {
            if env.contains(*flags) {
                deep_merge(&mut resolved, overrides);
            }
        }
        resolved
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ComponentDefinition> {
        self.entry(name).map(|e| &e.definition)
    }

    pub fn mode(&self, name: &str) -> Option<Mode> {
        self.get(name).map(ComponentDefinition::mode)
    }

    /// Whether `name` has `capability`. False for unknown names.
    pub fn supports(&self, name: &str, capability: Capability) -> bool {
        self.get(name)
            .is_some_and(|d| d.capabilities().contains(capability))
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.definition.name())
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.entries.iter().map(|e| &e.definition)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
