//! Spinner animation frames for waits on the shell.

/// Spinner frames as a string (for indicatif ProgressBar)
///
/// Braille-style dots, the same characters used by indicatif's default spinner.
pub fn spinner_chars() -> &'static str {
    "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"
}
