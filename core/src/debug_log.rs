//! Simple file-based debug logging for development
//!
//! Enabled through the tracker's `debug` setting.
//! Usage: `debug_log!("message {}", value);`
//! Writes to /tmp/quarry-debug.log

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static LOG_PATH: &str = "/tmp/quarry-debug.log";
static ENABLED: AtomicBool = AtomicBool::new(false);

/// Toggle debug logging at runtime (truncates the log file when turning on)
pub fn set_enabled(enabled: bool) {
    if enabled && !ENABLED.swap(true, Ordering::Relaxed) {
        if let Ok(mut f) = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(LOG_PATH)
        {
            let _ = writeln!(f, "=== quarry debug log started ===");
        }
    } else if !enabled {
        ENABLED.store(false, Ordering::Relaxed);
    }
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Write a line to the debug log
pub fn log(msg: &str) {
    if !is_enabled() {
        return;
    }
    if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(LOG_PATH) {
        let _ = writeln!(f, "{}", msg);
    }
}

/// Debug log macro - use like println!
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if $crate::debug_log::is_enabled() {
            $crate::debug_log::log(&format!($($arg)*));
        }
    };
}
