use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::{AssertError, AssertResult};

/// `log` target used for assertion records.
///
/// The `log` crate has no level above `Error`, so the reserved ASSERT severity is
/// expressed as `Level::Error` on this dedicated target.
pub const ASSERT_LOG_TARGET: &str = "newengine::assert";

/// Severity attached to lines written to an [`AssertSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
    /// Reserved for fault reports.
    Assert,
}

impl Severity {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
            Severity::Assert => "ASSERT",
        }
    }

    #[inline]
    pub fn to_log_level(self) -> log::Level {
        match self {
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error | Severity::Assert => log::Level::Error,
        }
    }
}

/// Destination for assertion log lines.
///
/// Implementations must not block indefinitely. Errors are reported back to the
/// handler, which swallows them and moves on to the decision protocol.
pub trait AssertSink: Send + Sync {
    fn write(&self, text: &str, severity: Severity) -> AssertResult<()>;
}

/// Forwards to the `log` facade under [`ASSERT_LOG_TARGET`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AssertSink for LogSink {
    fn write(&self, text: &str, severity: Severity) -> AssertResult<()> {
        log::log!(target: ASSERT_LOG_TARGET, severity.to_log_level(), "{text}");
        Ok(())
    }
}

/// Appends `[SEVERITY] text` lines to a file.
///
/// Nothing touches the filesystem until the first write: [`FileSink::new`] only records
/// the path, and the file (with its parent directories) is created on demand. A failed
/// open is retried on the next write.
///
/// The file handle sits behind a lock acquired with a timeout: a writer stuck on
/// another thread turns into [`AssertError::SinkBusy`] instead of a hang.
pub struct FileSink {
    path: PathBuf,
    file: Mutex<Option<File>>,
    timeout: Duration,
}

impl FileSink {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(250);

    /// Sink for `path`; the file is opened on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(None),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Opens (or creates) `path` right away, so a bad path shows up here.
    pub fn open(path: impl Into<PathBuf>) -> AssertResult<Self> {
        let sink = Self::new(path);
        *sink.file.lock() = Some(open_append(&sink.path)?);
        Ok(sink)
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn open_append(path: &Path) -> AssertResult<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| AssertError::io(dir, e))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AssertError::io(path, e))
}

impl AssertSink for FileSink {
    fn write(&self, text: &str, severity: Severity) -> AssertResult<()> {
        let Some(mut slot) = self.file.try_lock_for(self.timeout) else {
            return Err(AssertError::SinkBusy {
                timeout_ms: self.timeout.as_millis() as u64,
            });
        };

        let file = match slot.take() {
            Some(file) => slot.insert(file),
            None => slot.insert(open_append(&self.path)?),
        };

        writeln!(file, "[{}] {}", severity.as_str(), text)
            .and_then(|_| file.flush())
            .map_err(|e| AssertError::io(&self.path, e))
    }
}

/// Writes to every inner sink. All sinks are tried; the first error is returned.
#[derive(Default)]
pub struct TeeSink {
    sinks: Vec<Arc<dyn AssertSink>>,
}

impl TeeSink {
    #[inline]
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    #[inline]
    pub fn with(mut self, sink: impl AssertSink + 'static) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }
}

impl AssertSink for TeeSink {
    fn write(&self, text: &str, severity: Severity) -> AssertResult<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.write(text, severity) {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
