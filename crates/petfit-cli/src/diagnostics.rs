use std::backtrace::Backtrace;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, Once, OnceLock, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PETFIT_LOG";

#[derive(Default)]
struct DiagnosticsLog {
    path: Option<PathBuf>,
    file: Option<File>,
}

static HOOK_ONCE: Once = Once::new();
static LOG: OnceLock<Mutex<DiagnosticsLog>> = OnceLock::new();

fn log_state() -> MutexGuard<'static, DiagnosticsLog> {
    LOG.get_or_init(|| Mutex::new(DiagnosticsLog::default()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Where tracing output goes for this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    /// The terminal belongs to the UI, so events only reach the diagnostics
    /// log (and are dropped when diagnostics are off).
    DiagnosticsOnly,
}

pub struct DiagnosticsSession {
    path: Option<PathBuf>,
}

impl DiagnosticsSession {
    pub fn initialize(enabled: bool) -> Result<Self> {
        install_panic_hook();
        if !enabled {
            let mut state = log_state();
            state.path = None;
            state.file = None;
            return Ok(Self { path: None });
        }

        let path = create_diagnostics_log_path()?;
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("failed to create diagnostics log at {}", path.display()))?;
        write_header(&mut file, &path)?;

        let mut state = log_state();
        state.path = Some(path.clone());
        state.file = Some(file);

        Ok(Self { path: Some(path) })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn record<S: AsRef<str>>(&self, entry: S) {
        append_line(entry.as_ref());
    }
}

fn write_header(file: &mut File, path: &Path) -> Result<()> {
    let started = petfit_core::time::now_utc_rfc3339()
        .unwrap_or_else(|_| format!("epoch_ms={}", epoch_ms()));
    writeln!(
        file,
        "petfit diagnostics start\nversion={}\nstarted_at={started}\npid={}",
        env!("CARGO_PKG_VERSION"),
        std::process::id()
    )
    .and_then(|()| writeln!(file, "argv={:?}", std::env::args().collect::<Vec<String>>()))
    .and_then(|()| file.flush())
    .with_context(|| format!("failed to write diagnostics header to {}", path.display()))
}

/// Installs the global tracing subscriber. `PETFIT_LOG` wins over
/// `--verbose`.
pub fn init_tracing(verbose: bool, sink: LogSink, diagnostics_enabled: bool) {
    let default_directive = if verbose {
        "warn,petfit_core=debug,petfit_app=debug,petfit_tui=debug,petfit_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

    let result = match sink {
        LogSink::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .try_init(),
        LogSink::DiagnosticsOnly if diagnostics_enabled => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(|| DiagnosticsWriter)
            .with_ansi(false)
            .try_init(),
        LogSink::DiagnosticsOnly => return,
    };

    if let Err(error) = result {
        append_line(format!("tracing subscriber not installed: {error}"));
    }
}

/// Forwards formatted tracing events into the open diagnostics log.
struct DiagnosticsWriter;

impl Write for DiagnosticsWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = log_state();
        match state.file.as_mut() {
            Some(file) => file.write_all(buf).map(|()| buf.len()),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match log_state().file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn install_panic_hook() {
    HOOK_ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|panic_info| {
            let payload = panic_payload(panic_info);
            let location = panic_info
                .location()
                .map(|value| format!("{}:{}:{}", value.file(), value.line(), value.column()))
                .unwrap_or_else(|| "unknown".to_string());
            let backtrace = Backtrace::force_capture();

            append_line("panic captured");
            append_line(format!("panic_message={payload}"));
            append_line(format!("panic_location={location}"));
            append_line(format!("panic_backtrace={backtrace:?}"));

            let path = log_state().path.clone();

            eprintln!("Fatal internal error in petfit.");
            match path {
                Some(path) => eprintln!("Diagnostics written to {}", path.display()),
                None => eprintln!("Run `petfit --diagnostics` to capture a diagnostics log."),
            }
        }));
    });
}

fn panic_payload(panic_info: &std::panic::PanicHookInfo<'_>) -> String {
    if let Some(payload) = panic_info.payload().downcast_ref::<&str>() {
        return (*payload).to_string();
    }
    if let Some(payload) = panic_info.payload().downcast_ref::<String>() {
        return payload.clone();
    }
    "unknown panic payload".to_string()
}

fn append_line<S: AsRef<str>>(line: S) {
    let mut state = log_state();
    let Some(file) = state.file.as_mut() else {
        return;
    };

    let _ = writeln!(file, "[{}] {}", epoch_ms(), line.as_ref());
    let _ = file.flush();
}

fn epoch_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

fn create_diagnostics_log_path() -> Result<PathBuf> {
    let config_path = petfit_core::config::resolve_config_path()
        .context("failed to resolve petfit config path for diagnostics")?;
    let config_dir = config_path.parent().ok_or_else(|| {
        anyhow!(
            "failed to resolve diagnostics directory from config path {}",
            config_path.display()
        )
    })?;

    let diagnostics_dir = config_dir.join("diagnostics");
    fs::create_dir_all(&diagnostics_dir).with_context(|| {
        format!(
            "failed to create diagnostics directory {}",
            diagnostics_dir.display()
        )
    })?;

    Ok(diagnostics_dir.join(format!("{}.log", epoch_ms())))
}
