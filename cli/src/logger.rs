use colored::*;
use droptty_core::paths;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Colors that stay readable when dimmed.
const TARGET_COLORS: &[fn(&str) -> ColoredString] = &[
    |s| s.green(),
    |s| s.yellow(),
    |s| s.blue(),
    |s| s.magenta(),
    |s| s.cyan(),
];

pub struct DropttyLogger {
    max_level: Level,
    log_file: Mutex<Option<File>>,
    target_colors: Mutex<HashMap<String, usize>>,
    next_color_index: AtomicUsize,
}

impl DropttyLogger {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let log_file = paths::ensure_data_dir()
            .and_then(|_| paths::log_file_path())
            .and_then(|path| {
                OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(&path)
                    .map_err(|e| {
                        eprintln!("Warning: Failed to open log file at {:?}: {}", path, e)
                    })
                    .ok()
            });

        Self {
            max_level: max_level(quiet, verbose),
            log_file: Mutex::new(log_file),
            target_colors: Mutex::new(HashMap::new()),
            next_color_index: AtomicUsize::new(0),
        }
    }

    fn color_for_target(&self, target: &str) -> ColoredString {
        let index = match self.target_colors.lock() {
            Ok(mut colors) => *colors.entry(target.to_string()).or_insert_with(|| {
                self.next_color_index.fetch_add(1, Ordering::SeqCst) % TARGET_COLORS.len()
            }),
            Err(_) => 0,
        };
        TARGET_COLORS[index](target)
    }

    fn format_colored(&self, record: &Record) -> String {
        let level = level_tag(record.level());
        let target = short_target(record.target());
        let prefix = match target {
            Some(target) => format!("[{}] ", self.color_for_target(target).dimmed()),
            None => String::new(),
        };

        match record.level() {
            Level::Error => format!("{} {}{}", level, prefix, record.args())
                .red()
                .bold()
                .to_string(),
            Level::Warn => format!("{} {}{}", level, prefix, record.args())
                .yellow()
                .bold()
                .to_string(),
            Level::Info => format!("{} {}{}", level.green().bold(), prefix, record.args()),
            Level::Debug => format!("{} {}{}", level.blue().bold(), prefix, record.args()),
            Level::Trace => format!("{} {}{}", level.white().bold(), prefix, record.args()),
        }
    }
}

impl Log for DropttyLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        println!("{}", self.format_colored(record));

        if let Ok(mut file) = self.log_file.lock() {
            if let Some(file) = file.as_mut() {
                let _ = writeln!(file, "{}", format_plain(record));
                let _ = file.flush();
            }
        }
    }

    fn flush(&self) {}
}

/// Quiet stops at Info, verbose goes down to Trace, and the default stops at Debug.
pub fn max_level(quiet: bool, verbose: bool) -> Level {
    if quiet {
        Level::Info
    } else if verbose {
        Level::Trace
    } else {
        Level::Debug
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "[E]",
        Level::Warn => "[W]",
        Level::Info => "[I]",
        Level::Debug => "[D]",
        Level::Trace => "[T]",
    }
}

fn short_target(target: &str) -> Option<&str> {
    if target.is_empty() {
        return None;
    }
    target.rsplit("::").next()
}

fn format_plain(record: &Record) -> String {
    match short_target(record.target()) {
        Some(target) => format!(
            "{} [{}] {}",
            level_tag(record.level()),
            target,
            record.args()
        ),
        None => format!("{} {}", level_tag(record.level()), record.args()),
    }
}

pub fn init_logger(quiet: bool, verbose: bool) -> Result<(), log::SetLoggerError> {
    let logger = DropttyLogger::new(quiet, verbose);
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_selection() {
        assert_eq!(max_level(true, false), Level::Info);
        assert_eq!(max_level(false, true), Level::Trace);
        assert_eq!(max_level(false, false), Level::Debug);
    }

    #[test]
    fn test_plain_format_uses_last_target_segment() {
        let record = Record::builder()
            .level(Level::Warn)
            .target("droptty_core::controller")
            .args(format_args!("Could not register hotkey"))
            .build();
        assert_eq!(
            format_plain(&record),
            "[W] [controller] Could not register hotkey"
        );
    }
}
