pub use anstream::println as aprintln;

/// Terminal colors for report lines.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const GREEN: &str = "\x1b[38;2;158;206;106m";
}

/// Wraps text in green, for success messages.
///
/// `anstream` strips the escape codes when stdout is not a terminal.
pub fn green(text: &str) -> String {
    format!("{}{}{}", colors::GREEN, text, colors::RESET)
}
