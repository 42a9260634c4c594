//! Logging system configuration and initialization
//!
//! Every run writes its own log file, `<prefix>_<YYYYmmdd_HHMMSS>.log`, with
//! lines of the form `2024-05-01 12:00:00,123 - INFO - message`. The scraper
//! also logs to the console; the loader is configured file-only.

#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Event, Subscriber, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{
        self, FmtContext, FormatEvent, FormatFields,
        format::Writer,
        time::FormatTime,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

// Keeps the non-blocking file writer alive for the whole process
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<tracing_appender::non_blocking::WorkerGuard>> =
        Mutex::new(Vec::new());
}

/// Dependency targets that drown out the crawler's own messages
const QUIET_TARGETS: &[&str] = &["reqwest", "hyper", "hyper_util", "html5ever", "selectors"];

/// Console timestamps in local time
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// `<timestamp> - <LEVEL> - <message>` file line format
struct DashedFormat;

impl<S, N> FormatEvent<S, N> for DashedFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Log file name for a run started at `started`
pub fn log_file_name(prefix: &str, started: DateTime<Local>) -> String {
    format!("{}_{}.log", prefix, started.format("%Y%m%d_%H%M%S"))
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = EnvFilter::new(level);
        if !level.eq_ignore_ascii_case("trace") {
            for target in QUIET_TARGETS {
                if let Ok(directive) = format!("{}=warn", target).parse() {
                    filter = filter.add_directive(directive);
                }
            }
        }
        filter
    })
}

/// Initialize the global subscriber.
///
/// Returns the path of the run's log file when file output is enabled.
/// `RUST_LOG` takes precedence over `config.level`.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    if !config.file_output && !config.console_output {
        return Err(anyhow!("No logging output configured"));
    }

    let registry = Registry::default().with(build_env_filter(&config.level));

    let mut log_path = None;
    let file_layer = if config.file_output {
        let (writer, path) = open_run_log(&config.log_dir, &config.file_prefix)?;
        log_path = Some(path);
        Some(
            fmt::Layer::new()
                .with_writer(writer)
                .with_ansi(false)
                .event_format(DashedFormat),
        )
    } else {
        None
    };

    let console_layer = config.console_output.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stdout)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
    });

    registry
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    info!("Logging system initialized (level: {})", config.level);
    if let Some(path) = &log_path {
        info!("Log file: {}", path.display());
    }

    Ok(log_path)
}

fn open_run_log(
    log_dir: &Path,
    prefix: &str,
) -> Result<(non_blocking::NonBlocking, PathBuf)> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;

    let file_name = log_file_name(prefix, Local::now());
    let path = log_dir.join(&file_name);
    let (writer, guard) = non_blocking(rolling::never(log_dir, &file_name));

    LOG_GUARDS
        .lock()
        .map_err(|_| anyhow!("Log guard holder is poisoned"))?
        .push(guard);

    Ok((writer, path))
}

/// Log runtime information at the start of a run
pub fn log_system_info() {
    info!("=== Autos Crawler v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {} ({})", std::env::consts::OS, std::env::consts::ARCH);
    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {:?}", current_dir);
    }
}
