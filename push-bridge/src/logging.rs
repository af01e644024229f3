//! Tracing subscriber setup.
//!
//! The bridge lives inside someone else's process, so it only installs a
//! subscriber when nobody has yet: a host or test that set one up first
//! keeps it.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install a stderr `fmt` subscriber unless logging is disabled or a
/// global subscriber already exists.
///
/// `RUST_LOG` takes precedence over `config.filter`.
pub fn init(config: &LoggingConfig) {
    if !config.enabled {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let config = LoggingConfig::default();
        init(&config);
        init(&config);
        tracing::debug!("still alive after double init");
    }

    #[test]
    fn disabled_logging_is_a_no_op() {
        let config = LoggingConfig {
            enabled: false,
            filter: "not a [valid filter".to_string(),
        };
        init(&config);
    }
}
