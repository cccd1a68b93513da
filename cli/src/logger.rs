//! Stderr logger for the `log` facade.

use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable holding the log level (`error` .. `trace`, or `off`).
pub const LOG_ENV: &str = "HTTPCLIENT_LOG";

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Level named by `value`, `Warn` when unset or unrecognized.
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Warn)
}

/// Install the logger at the level named by `HTTPCLIENT_LOG`.
pub fn init() {
    let level = level_from(std::env::var(LOG_ENV).ok().as_deref());
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
