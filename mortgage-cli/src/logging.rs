//! Process-wide `tracing` setup for the `mortgage` binary.
//!
//! One global [`EnvFilter`] sits in front of two outputs: stderr, which
//! `--quiet` switches off, and an append-only log file opened once the
//! configuration has been read. The filter starts from `RUST_LOG` (or
//! [`DEFAULT_FILTER`]) and is replaced only when `--log-level` or the
//! configuration file asks for a level.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::{FmtContext, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Registry, reload};

/// Filter used when neither `RUST_LOG` nor the configuration sets one.
pub const DEFAULT_FILTER: &str = "info";

static LEVEL_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();
static CONSOLE_ENABLED: AtomicBool = AtomicBool::new(true);
static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

// --- Formatter ---

/// `2026-10-18T09:30:00.123+01:00  INFO mortgage_core::form: message key=value`
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
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
        let meta = event.metadata();
        write!(
            writer,
            "{} {:>5} {}: ",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"),
            meta.level(),
            meta.target()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Log file ---

/// Writes to whatever file the slot holds; discards output while it is empty.
#[derive(Clone, Copy)]
struct FileSlot(&'static Mutex<Option<File>>);

struct SlotWriter(MutexGuard<'static, Option<File>>);

impl Write for SlotWriter {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match self.0.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.0.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

// --- Level selection ---

/// The directive installed at startup: `RUST_LOG` when it is set and parses,
/// [`DEFAULT_FILTER`] otherwise.
fn startup_directive(env: Option<&str>) -> &str {
    match env {
        Some(directive) if !directive.trim().is_empty() && EnvFilter::try_new(directive).is_ok() => {
            directive
        }
        _ => DEFAULT_FILTER,
    }
}

/// The level to switch to once the configuration is known, if any.
///
/// `--log-level` wins over the configuration file. `None` keeps the startup
/// filter, so `RUST_LOG` applies only when neither sets a level.
pub fn level_override<'a>(
    flag: Option<&'a str>,
    configured: Option<&'a str>,
) -> Option<&'a str> {
    flag.or(configured)
}

// --- Public API ---

/// Replaces the active filter. Accepts a bare level (`"debug"`) or any
/// `EnvFilter` directive (`"info,mortgage_core=trace"`).
pub fn set_log_level(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .with_context(|| format!("invalid log level '{directive}'"))?;
    let handle = LEVEL_HANDLE.get().context("logging not yet initialized")?;
    handle.reload(filter).context("failed to apply log level")
}

/// Shows or hides console output. File logging is unaffected.
pub fn set_console_enabled(enabled: bool) {
    CONSOLE_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Starts appending log output to `path`, replacing any file already open.
/// The directory must exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;
    *LOG_FILE.lock().unwrap_or_else(PoisonError::into_inner) = Some(file);
    Ok(())
}

/// Installs the global subscriber. Later calls are no-ops.
///
/// Console output goes to stderr so results on stdout stay clean. The file
/// output stays silent until [`enable_file_logging`] is called.
pub fn init_default_logging() {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (level_filter, level_handle) =
        reload::Layer::new(EnvFilter::new(startup_directive(env.as_deref())));

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(false)
        .with_writer(io::stderr)
        .with_filter(filter_fn(|_| CONSOLE_ENABLED.load(Ordering::Relaxed)));

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(false)
        .with_writer(FileSlot(&LOG_FILE));

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        let _ = LEVEL_HANDLE.set(level_handle);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn startup_directive_honours_rust_log() {
        assert_eq!(startup_directive(Some("debug")), "debug");
        assert_eq!(
            startup_directive(Some("warn,mortgage_core=trace")),
            "warn,mortgage_core=trace"
        );
    }

    #[test]
    fn startup_directive_falls_back_to_default() {
        assert_eq!(startup_directive(None), DEFAULT_FILTER);
        assert_eq!(startup_directive(Some("  ")), DEFAULT_FILTER);
        assert_eq!(startup_directive(Some("mortgage_core=loud")), DEFAULT_FILTER);
    }

    #[test]
    fn flag_wins_over_configured_level() {
        assert_eq!(level_override(Some("debug"), Some("warn")), Some("debug"));
        assert_eq!(level_override(Some("debug"), None), Some("debug"));
    }

    #[test]
    fn configured_level_applies_without_flag() {
        assert_eq!(level_override(None, Some("warn")), Some("warn"));
    }

    #[test]
    fn no_override_keeps_startup_filter() {
        assert_eq!(level_override(None, None), None);
    }

    #[test]
    fn file_slot_discards_without_file() {
        let slot = FileSlot(Box::leak(Box::new(Mutex::new(None))));
        let mut writer = slot.make_writer();

        assert_eq!(writer.write(b"dropped").unwrap(), 7);
        assert!(writer.flush().is_ok());
    }

    #[test]
    fn enable_file_logging_rejects_missing_directory() {
        let dir = TempDir::new().unwrap();

        let err = enable_file_logging(&dir.path().join("missing").join("mortgage.log"))
            .unwrap_err();

        assert!(err.to_string().contains("cannot open log file"), "{err}");
    }

    #[test]
    fn runtime_controls_route_events_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mortgage.log");

        init_default_logging();
        set_console_enabled(false);
        set_log_level("info").unwrap();
        assert!(set_log_level("mortgage_core=loud").is_err());
        enable_file_logging(&path).unwrap();

        tracing::info!(marker = "file-sink-check", "written to log file");
        tracing::debug!(marker = "filtered-out", "below the active level");

        set_log_level("debug").unwrap();
        tracing::debug!(marker = "after-reload", "level raised at runtime");
        set_console_enabled(true);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("INFO"), "{contents}");
        assert!(contents.contains("file-sink-check"), "{contents}");
        assert!(!contents.contains("filtered-out"), "{contents}");
        assert!(contents.contains("after-reload"), "{contents}");
        assert!(contents.contains("mortgage_cli::logging::tests"), "{contents}");
    }
}
