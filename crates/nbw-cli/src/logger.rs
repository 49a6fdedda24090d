//! Colored stderr logger for the `log` facade.
//!
//! Library crates trace through `log`; this is the only sink. Each record
//! is printed as a one-letter colored level tag followed by the message.

use colored::Colorize;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

pub struct Logger {
    level: LevelFilter,
}

impl Logger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

/// Level for a `-v` count: warnings by default, then info, debug, trace.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn tag(level: Level) -> colored::ColoredString {
    match level {
        Level::Error => "E".red(),
        Level::Warn => "W".yellow(),
        Level::Info => "I".green(),
        Level::Debug => "D".blue(),
        Level::Trace => "T".dimmed(),
    }
    .bold()
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let target = record.target().dimmed();
        eprintln!("{} {} {}", tag(record.level()), target, record.args());
    }

    fn flush(&self) {}
}

/// Install the logger. Fails if another logger is already installed.
pub fn init(verbose: u8) -> Result<(), SetLoggerError> {
    let level = level_for_verbosity(verbose);
    log::set_boxed_logger(Box::new(Logger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}
