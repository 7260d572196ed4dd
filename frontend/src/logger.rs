//! Routes `log` records from `shared` to the browser console.

use std::str::FromStr;

use log::{Level, LevelFilter, Log, Metadata, Record};
use zoon::local_storage;

pub const LOG_LEVEL_STORAGE_KEY: &str = "petta-playground-log-level";

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error | Level::Warn => {
                zoon::eprintln!("[{}] {}: {}", record.level(), record.target(), record.args())
            }
            _ => zoon::println!("[{}] {}: {}", record.level(), record.target(), record.args()),
        }
    }

    fn flush(&self) {}
}

/// Level comes from local storage (`"debug"`, `"warn"`, ...) when set.
pub fn init() {
    let level = local_storage()
        .get::<String>(LOG_LEVEL_STORAGE_KEY)
        .and_then(Result::ok)
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(DEFAULT_LOG_LEVEL);

    if let Err(error) = log::set_logger(&LOGGER) {
        zoon::eprintln!("Failed to install console logger: {error}");
        return;
    }
    log::set_max_level(level);
}
