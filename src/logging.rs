//! `tracing` subscriber set-up shared by the binaries.

use tracing::metadata::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default level when `RUST_LOG` is unset: `info`, raised by each `-v`.
pub fn default_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Compact stderr subscriber. `RUST_LOG` takes precedence over `verbosity`.
pub fn subscriber(verbosity: u8) -> impl tracing::Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbosity).into())
        .from_env_lossy();

    tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .with_filter(filter),
    )
}

/// Installs [`subscriber`] globally. Calling it twice is harmless.
pub fn init(verbosity: u8) {
    let _ = subscriber(verbosity).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_level(0), LevelFilter::INFO);
        assert_eq!(default_level(1), LevelFilter::DEBUG);
        assert_eq!(default_level(5), LevelFilter::TRACE);
    }

    #[test]
    fn subscriber_applies_verbosity_while_scoped() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        tracing::subscriber::with_default(subscriber(1), || {
            assert!(tracing::enabled!(Level::DEBUG));
            assert!(!tracing::enabled!(Level::TRACE));
        });
        tracing::subscriber::with_default(subscriber(0), || {
            assert!(tracing::enabled!(Level::INFO));
            assert!(!tracing::enabled!(Level::DEBUG));
        });
    }
}
