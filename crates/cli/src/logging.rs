//! Client log file. The terminal belongs to the editing prompt, so every
//! record goes to `<data dir>/logs/client.log`.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn,tungstenite=warn";
const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "client.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    /// `SRDFSE_LOG_FORMAT`; anything but `pretty` logs JSON.
    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("pretty") => Self::Pretty,
            _ => Self::Json,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
        }
    }
}

/// Filter directive: `SRDFSE_LOG_FILTER` > `RUST_LOG` > default. Blank
/// values and directives `EnvFilter` cannot parse fall through.
fn filter_directive(explicit: Option<&str>, rust_log: Option<&str>) -> String {
    [explicit, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty() && EnvFilter::try_new(value).is_ok())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

fn new_run_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("pid-{}-{millis}", std::process::id())
}

pub struct LoggingHandle {
    pub run_id: String,
    pub log_path: PathBuf,
    /// Flushes the background writer when dropped
    pub guard: WorkerGuard,
}

pub fn init_logging(data_dir: &Path) -> anyhow::Result<LoggingHandle> {
    let log_dir = data_dir.join(LOG_DIR);
    std::fs::create_dir_all(&log_dir)?;

    let directive = filter_directive(
        std::env::var("SRDFSE_LOG_FILTER").ok().as_deref(),
        std::env::var("RUST_LOG").ok().as_deref(),
    );
    let format = LogFormat::from_env_value(std::env::var("SRDFSE_LOG_FORMAT").ok().as_deref());

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&log_dir, LOG_FILE));
    let registry = tracing_subscriber::registry().with(EnvFilter::try_new(&directive)?);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);
    match format {
        LogFormat::Json => registry.with(layer.json().flatten_event(true)).try_init()?,
        LogFormat::Pretty => registry.with(layer.pretty()).try_init()?,
    }

    let handle = LoggingHandle {
        run_id: new_run_id(),
        log_path: log_dir.join(LOG_FILE),
        guard,
    };
    tracing::info!(
        component = "logging",
        event = "logging.initialized",
        run_id = %handle.run_id,
        log_path = %handle.log_path.display(),
        format = format.as_str(),
        filter = %directive,
    );
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_defaults_to_json() {
        assert_eq!(LogFormat::from_env_value(None), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("text")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some(" Pretty ")), LogFormat::Pretty);
    }

    #[test]
    fn explicit_filter_beats_rust_log() {
        assert_eq!(filter_directive(Some("debug"), Some("trace")), "debug");
        assert_eq!(filter_directive(None, Some("srdfse_client=trace")), "srdfse_client=trace");
        assert_eq!(filter_directive(None, None), DEFAULT_FILTER);
    }

    #[test]
    fn blank_or_invalid_filters_fall_through() {
        assert_eq!(filter_directive(Some("  "), Some("warn")), "warn");
        assert_eq!(filter_directive(Some("srdfse=loud"), None), DEFAULT_FILTER);
    }
}
