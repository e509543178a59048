//! Logging utilities with colored module prefixes.
//!
//! - `log!` prints a message behind a colored `[module]` prefix
//! - `debug!` does the same, but only when verbose mode is enabled
//!
//! # Example
//!
//! ```ignore
//! log!("build"; "writing {} pages", count);
//! debug!("request"; "GET {}", url);
//! ```

use owo_colors::{OwoColorize, Stream, Style};
use std::io::{Write, stdout};
use std::sync::atomic::{AtomicBool, Ordering};

/// Global verbose flag (set by `--verbose`)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macros
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::emit($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when verbose mode is enabled)
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::emit($module, &format!($($arg)*))
        }
    }};
}

pub(crate) use {debug, log};

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn emit(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
///
/// Honors `--color`/`--lp-color` through `owo_colors::set_override`.
#[inline]
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    let style = match module.to_ascii_lowercase().as_str() {
        "serve" | "request" => Style::new().bright_blue().bold(),
        "build" | "sitemap" | "robots" => Style::new().bright_green().bold(),
        "error" => Style::new().bright_red().bold(),
        _ => Style::new().bright_yellow().bold(),
    };
    prefix
        .if_supports_color(Stream::Stdout, |p| p.style(style))
        .to_string()
}
