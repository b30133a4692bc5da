//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log format.
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event (production).
    #[default]
    Json,
    /// Single-line human-readable output (local runs).
    Compact,
}

impl LogFormat {
    /// `"compact"` selects [`LogFormat::Compact`]; anything else is JSON.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "compact" | "pretty" | "text" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }

    /// Read [`LOG_FORMAT_VAR`]; unset means JSON.
    pub fn from_env() -> Self {
        Self::from_setting(std::env::var(LOG_FORMAT_VAR).ok().as_deref())
    }

    pub fn from_setting(value: Option<&str>) -> Self {
        value.map(Self::from_name).unwrap_or_default()
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `default_directive`. Returns `false` when a
/// subscriber was already installed (the call is then a no-op).
pub fn init_with(format: LogFormat, default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let installed = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .with_current_span(true)
            .with_target(false)
            .try_init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .with_target(true)
            .try_init(),
    };

    installed.is_ok()
}
