use std::io::IsTerminal;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "order_desk=debug,mediator=info";

/// Keeps the non-blocking log writer flushing until dropped.
#[must_use = "LogGuard must be held to keep logging active"]
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

impl LogGuard {
    /// Installs the global subscriber. Logs go to stderr because stdout
    /// carries replies; colors are only used when stderr is a terminal.
    pub fn init(configured: Option<&str>) -> anyhow::Result<Self> {
        let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref(), configured)?;
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stderr());

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_writer(non_blocking_writer),
            )
            .try_init()?;

        Ok(Self { _guard: guard })
    }
}

/// `RUST_LOG` wins over `ORDERS_LOG`, which wins over the built-in default.
/// A directive that does not parse is a startup error rather than silently
/// falling back.
fn log_filter(env: Option<&str>, configured: Option<&str>) -> anyhow::Result<EnvFilter> {
    let (source, directives) = match (env, configured) {
        (Some(env), _) => ("RUST_LOG", env),
        (None, Some(configured)) => ("ORDERS_LOG", configured),
        (None, None) => ("default", DEFAULT_FILTER),
    };

    EnvFilter::try_new(directives)
        .with_context(|| format!("invalid log filter '{directives}' from {source}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        let rendered = log_filter(None, None).unwrap().to_string();
        assert!(rendered.contains("order_desk=debug"));
        assert!(rendered.contains("mediator=info"));
    }

    #[test]
    fn test_env_overrides_config() {
        let rendered = log_filter(Some("mediator=trace"), Some("order_desk=warn"))
            .unwrap()
            .to_string();
        assert!(rendered.contains("mediator=trace"));
        assert!(!rendered.contains("order_desk"));
    }

    #[test]
    fn test_config_used_without_env() {
        let rendered = log_filter(None, Some("order_desk=warn")).unwrap().to_string();
        assert!(rendered.contains("order_desk=warn"));
    }

    #[test]
    fn test_bad_directive_names_its_source() {
        let err = log_filter(None, Some("order_desk=loud")).unwrap_err();
        assert!(err.to_string().contains("ORDERS_LOG"));
    }
}
