//! Debug log for the interactive session.
//!
//! The terminal is owned by the UI while fontlet runs, so diagnostics go to a
//! file instead of stderr. Logging is off unless `FONTLET_DEBUG` is truthy;
//! the destination defaults to `fontlet.log` in the temp dir and can be moved
//! with `FONTLET_DEBUG_LOG`.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::OnceCell;

pub const DEBUG_ENV: &str = "FONTLET_DEBUG";
pub const DEBUG_LOG_ENV: &str = "FONTLET_DEBUG_LOG";

fn debug_enabled() -> bool {
    static FLAG: OnceCell<bool> = OnceCell::new();
    *FLAG.get_or_init(|| {
        std::env::var(DEBUG_ENV)
            .map(|val| is_truthy(&val))
            .unwrap_or(false)
    })
}

fn is_truthy(raw: &str) -> bool {
    let trimmed = raw.trim();
    !(trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("0")
        || trimmed.eq_ignore_ascii_case("false")
        || trimmed.eq_ignore_ascii_case("no")
        || trimmed.eq_ignore_ascii_case("off"))
}

pub fn log_path() -> PathBuf {
    std::env::var_os(DEBUG_LOG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("fontlet.log"))
}

fn debug_writer() -> Option<&'static Mutex<File>> {
    static WRITER: OnceCell<Option<Mutex<File>>> = OnceCell::new();
    WRITER
        .get_or_init(|| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path())
                .map(Mutex::new)
                .ok()
        })
        .as_ref()
}

pub fn debug_log(message: impl AsRef<str>) {
    if !debug_enabled() {
        return;
    }
    if let Some(writer) = debug_writer() {
        if let Ok(mut file) = writer.lock() {
            let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "[{stamp}] {}", message.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy("yes"));
        assert!(is_truthy(" TRUE "));
        assert!(!is_truthy(""));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("Off"));
    }
}
