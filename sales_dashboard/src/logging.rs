//! Tracing setup for the dashboard binary

use std::env;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub fn default_directive(verbose: u8) -> String {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    format!("sales_forecast={level},sales_dashboard={level}")
}

/// Install a stderr `fmt` subscriber. `RUST_LOG` takes precedence over
/// the verbosity flag.
pub fn init_tracing(verbose: u8) {
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default_directive(verbose));

    let _ = fmt()
        .with_env_filter(EnvFilter::new(filter_directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(
            default_directive(0),
            "sales_forecast=info,sales_dashboard=info"
        );
        assert!(default_directive(1).contains("sales_forecast=debug"));
        assert!(default_directive(5).contains("sales_dashboard=trace"));
    }
}
