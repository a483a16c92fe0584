//! Console sinks for rendered log lines.

use std::fmt::Debug;

use console::{Color, Style};

use super::{Channel, ColorHint, LogEntry};

/// Where console output for each channel goes.
pub trait ConsoleSink: Debug {
    /// Emit one entry. `line` is the rendered form of `entry`.
    fn emit(&self, entry: &LogEntry, line: &str);
}

/// Writes to the process's terminal streams.
///
/// - Verbose: `tracing::debug!`
/// - Host: stdout, colored when a hint is given
/// - StdOut: stdout, raw message text only
/// - Warning / Error: stderr, yellow / red
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSink;

impl TerminalSink {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleSink for TerminalSink {
    fn emit(&self, entry: &LogEntry, line: &str) {
        match entry.channel {
            Channel::Verbose => tracing::debug!("{}", line),
            Channel::Host => println!("{}", styled(line, entry.color)),
            Channel::StdOut => println!("{}", entry.text),
            Channel::Warning => {
                eprintln!("{}", styled(line, entry.color.or(Some(ColorHint::Yellow))))
            }
            Channel::Error => eprintln!("{}", styled(line, entry.color.or(Some(ColorHint::Red)))),
        }
    }
}

/// Like [`TerminalSink`] but keeps stdout free: Host and StdOut lines go to
/// stderr. Used when stdout carries machine-readable output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl ConsoleSink for StderrSink {
    fn emit(&self, entry: &LogEntry, line: &str) {
        match entry.channel {
            Channel::Verbose => tracing::debug!("{}", line),
            Channel::Host => eprintln!("{}", styled(line, entry.color)),
            Channel::StdOut => eprintln!("{}", entry.text),
            Channel::Warning => {
                eprintln!("{}", styled(line, entry.color.or(Some(ColorHint::Yellow))))
            }
            Channel::Error => eprintln!("{}", styled(line, entry.color.or(Some(ColorHint::Red)))),
        }
    }
}

fn styled(line: &str, color: Option<ColorHint>) -> String {
    match color {
        Some(hint) => Style::new().fg(to_color(hint)).apply_to(line).to_string(),
        None => line.to_string(),
    }
}

fn to_color(hint: ColorHint) -> Color {
    match hint {
        ColorHint::Green => Color::Green,
        ColorHint::Yellow => Color::Yellow,
        ColorHint::Red => Color::Red,
        ColorHint::Cyan => Color::Cyan,
        ColorHint::Magenta => Color::Magenta,
        ColorHint::White => Color::White,
    }
}
