//! Result logging for operator-facing audit output.
//!
//! Every message is rendered as `<channel>: [<timestamp>] : <message>` and
//! dispatched to a console sink chosen per [`Channel`]. When a destination
//! is given (explicitly or as the logger's default) the rendered line is
//! also appended to that file.

mod file;
mod sink;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Local};

pub use file::append_line;
pub use sink::{ConsoleSink, StderrSink, TerminalSink};

/// Timestamp layout used in rendered lines.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Output channel of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Low-visibility diagnostics
    Verbose,
    /// User-visible console output
    Host,
    /// Pipeline output: only the raw message text is emitted to the console
    StdOut,
    /// Non-fatal alert
    Warning,
    /// Reportable failure; the caller decides whether to terminate
    Error,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Verbose => "Verbose",
            Channel::Host => "Host",
            Channel::StdOut => "StdOut",
            Channel::Warning => "Warning",
            Channel::Error => "Error",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Console color requested for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorHint {
    Green,
    Yellow,
    Red,
    Cyan,
    Magenta,
    White,
}

/// A single log message. Written once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub channel: Channel,
    pub text: String,
    pub color: Option<ColorHint>,
}

impl LogEntry {
    /// Create an entry stamped with the current local time
    pub fn new(channel: Channel, text: impl Into<String>) -> Self {
        Self::at(Local::now(), channel, text)
    }

    /// Create an entry with an explicit timestamp
    pub fn at(timestamp: DateTime<Local>, channel: Channel, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            channel,
            text: text.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: Option<ColorHint>) -> Self {
        self.color = color;
        self
    }

    /// Render as `<channel>: [<timestamp>] : <text>`
    pub fn render(&self) -> String {
        format!(
            "{}: [{}] : {}",
            self.channel,
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.text
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("Failed to append to log file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Formats messages and dispatches them to the console and an optional log file.
#[derive(Debug)]
pub struct ResultLogger {
    default_destination: Option<PathBuf>,
    console: Box<dyn ConsoleSink>,
    errors_reported: AtomicUsize,
    write_failures: AtomicUsize,
}

impl ResultLogger {
    /// Create a logger writing to the terminal and, when set, to `default_destination`.
    pub fn new(default_destination: Option<PathBuf>) -> Self {
        Self::with_sink(default_destination, Box::new(TerminalSink::new()))
    }

    /// Terminal output only.
    pub fn console_only() -> Self {
        Self::new(None)
    }

    /// Create a logger with a custom console sink
    pub fn with_sink(default_destination: Option<PathBuf>, console: Box<dyn ConsoleSink>) -> Self {
        Self {
            default_destination,
            console,
            errors_reported: AtomicUsize::new(0),
            write_failures: AtomicUsize::new(0),
        }
    }

    pub fn default_destination(&self) -> Option<&Path> {
        self.default_destination.as_deref()
    }

    /// Log a message on `channel`.
    ///
    /// `destination` overrides the default log file for this call. With no
    /// destination at all the message goes to the console only.
    pub fn log(
        &self,
        message: &str,
        channel: Channel,
        destination: Option<&Path>,
        color: Option<ColorHint>,
    ) -> Result<(), LogError> {
        let entry = LogEntry::new(channel, message).with_color(color);
        self.write_entry(&entry, destination)
    }

    /// Dispatch a prepared entry.
    pub fn write_entry(&self, entry: &LogEntry, destination: Option<&Path>) -> Result<(), LogError> {
        let line = entry.render();
        self.console.emit(entry, &line);

        if entry.channel == Channel::Error {
            self.errors_reported.fetch_add(1, Ordering::Relaxed);
        }

        let Some(path) = destination.or(self.default_destination.as_deref()) else {
            return Ok(());
        };

        append_line(path, &line).map_err(|source| {
            self.write_failures.fetch_add(1, Ordering::Relaxed);
            LogError::Write {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Number of messages logged on the Error channel so far.
    pub fn errors_reported(&self) -> usize {
        self.errors_reported.load(Ordering::Relaxed)
    }

    /// Number of failed log-file appends so far.
    pub fn write_failures(&self) -> usize {
        self.write_failures.load(Ordering::Relaxed)
    }
}
