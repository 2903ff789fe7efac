//! Error types.
//!
//! Only hard failures surface here. Soft failures (unknown component names,
//! absent host plugins, stale element ids) are logged and answered with
//! neutral values instead.

use std::path::PathBuf;

use thiserror::Error;

/// Registration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A component with this name is already registered. The stored
    /// definition is left untouched.
    #[error("component `{0}` is already registered")]
    Duplicate(String),
}

/// Selector parse failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected character `{found}` at offset {offset} in `{selector}`")]
    Unexpected {
        selector: String,
        offset: usize,
        found: char,
    },

    #[error("unterminated attribute selector in `{0}`")]
    UnterminatedAttribute(String),

    #[error("unsupported pseudo-class `:{0}`")]
    UnsupportedPseudo(String),
}

/// Theme configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid theme config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown environment flag `{0}`")]
    UnknownFlag(String),
}

/// Umbrella error for the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terminal host input (size queries, event polling).
    #[error("terminal i/o failed: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message() {
        let err = RegistryError::Duplicate("selectable".into());
        assert_eq!(err.to_string(), "component `selectable` is already registered");
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: Error = SelectorError::Empty.into();
        assert!(matches!(err, Error::Selector(SelectorError::Empty)));
    }

    #[test]
    fn test_terminal_error_conversion() {
        let err: Error = std::io::Error::other("not a tty").into();
        assert_eq!(err.to_string(), "terminal i/o failed: not a tty");
    }
}
