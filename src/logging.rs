//! Opt-in log output.
//!
//! The crate only emits `tracing` events. Hosts that have no subscriber of
//! their own can call [`init`] to print them to stderr.

use tracing_subscriber::EnvFilter;

/// Filter directives are read from this variable first.
pub const LOG_ENV: &str = "SPARK_COMPONENTS_LOG";

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install a stderr fmt subscriber filtered by `SPARK_COMPONENTS_LOG`, else
/// `default_directive` (e.g. `"spark_components=debug"`).
///
/// Returns false if a global subscriber was already set.
pub fn init(default_directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init("spark_components=trace");
        assert!(!init("spark_components=trace"));
        tracing::debug!("still logging");
    }
}
