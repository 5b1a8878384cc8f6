//! `log` backend that writes to the browser console.
//!
//! Installed once from the wasm entrypoint. Everything else in the crate logs
//! through the `log` macros and never touches `web_sys::console` directly.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use wasm_bindgen::JsValue;

static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = JsValue::from_str(&format_line(
            record.level(),
            record.target(),
            &record.args().to_string(),
        ));

        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger as the global `log` sink.
///
/// Fails if another logger was already installed.
pub(crate) fn init_logging(max_level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&CONSOLE_LOGGER)?;
    log::set_max_level(max_level);
    Ok(())
}

pub(crate) fn format_line(level: Level, target: &str, message: &str) -> String {
    // Targets look like `intranet_portal::api`; the crate prefix is noise in the console.
    let target = target.strip_prefix("intranet_portal::").unwrap_or(target);
    format!("[{level:<5} {target}] {message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_strips_crate_prefix() {
        let line = format_line(Level::Warn, "intranet_portal::download", "popup blocked");
        assert_eq!(line, "[WARN  download] popup blocked");
    }

    #[test]
    fn test_format_line_keeps_foreign_targets() {
        let line = format_line(Level::Info, "reqwest::wasm", "sent");
        assert_eq!(line, "[INFO  reqwest::wasm] sent");
    }
}
