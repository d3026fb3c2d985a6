//! Log writer module
//!
//! Thread-safe log output to files or stdout/stderr.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl LogTarget {
    fn open(path: Option<&str>, fallback: Self) -> io::Result<Self> {
        match path {
            Some(p) => Ok(Self::File(Mutex::new(open_log_file(p)?))),
            None => Ok(fallback),
        }
    }

    fn write(&self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{message}");
                }
            }
        }
    }
}

/// Log writer with separate access and error targets
pub struct LogWriter {
    access: LogTarget,
    error: LogTarget,
    debug: bool,
}

impl LogWriter {
    fn new(
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
        debug: bool,
    ) -> io::Result<Self> {
        Ok(Self {
            access: LogTarget::open(access_log_file, LogTarget::Stdout)?,
            error: LogTarget::open(error_log_file, LogTarget::Stderr)?,
            debug,
        })
    }

    /// Write to access log (also used for info messages)
    pub fn write_access(&self, message: &str) {
        self.access.write(message);
    }

    /// Write to error log
    pub fn write_error(&self, message: &str) {
        self.error.write(message);
    }

    pub const fn debug_enabled(&self) -> bool {
        self.debug
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global log writer
///
/// Called once at startup. Fails if a log file cannot be opened or the
/// writer was already initialized.
pub fn init(
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
    debug: bool,
) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file, debug)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if initialized
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}
