//! Subscriber setup for the CLI. Logs go to stderr so stdout stays clean JSON.

use problemkit::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Pick the filter: `-v` flags first, then `RUST_LOG`, then the configured level.
fn filter(config: &LoggingConfig, verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

pub fn init(config: &LoggingConfig, verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(config, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn verbose_flags_override_config() {
        let config = LoggingConfig {
            level: "warn".to_owned(),
        };
        assert_eq!(filter(&config, 2).to_string(), "debug");
        assert_eq!(filter(&config, 5).to_string(), "trace");
    }
}
