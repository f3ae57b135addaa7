//! Logging initialization for the CLI.
//!
//! Library crates only emit `tracing` events; the binary decides where
//! they go.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const TARGETS: [&str; 3] = ["hagalund", "hagalund_resolver", "hagalund_xml"];

/// Install the global tracing subscriber.
///
/// * `verbosity` - 0 = `RUST_LOG` or WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE
/// * `json` - emit JSON lines on stderr instead of human-readable text
pub fn init(verbosity: u8, json: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env.as_deref(), verbosity);

    let subscriber = tracing_subscriber::registry().with(filter);
    if json {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

/// Filter from the `RUST_LOG` value, defaulting to `warn`.
///
/// Without `-v` the environment is left alone; each `-v` overrides the
/// level of the `hagalund` crates.
fn build_filter(env: Option<&str>, verbosity: u8) -> EnvFilter {
    let mut filter = env
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let level = match verbosity {
        0 => return filter,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    for target in TARGETS {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_kept_without_verbose() {
        let filter = build_filter(Some("hagalund_resolver=debug"), 0)
            .to_string()
            .to_lowercase();
        assert!(filter.contains("hagalund_resolver=debug"), "{filter}");
        assert!(!filter.contains("hagalund_resolver=warn"), "{filter}");
    }

    #[test]
    fn test_default_is_warn() {
        assert!(build_filter(None, 0).to_string().eq_ignore_ascii_case("warn"));
    }

    #[test]
    fn test_verbose_raises_crate_level() {
        let filter = build_filter(None, 2).to_string().to_lowercase();
        for target in TARGETS {
            assert!(filter.contains(&format!("{target}=debug")), "{filter}");
        }
    }
}
