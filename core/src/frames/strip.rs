//! Control Sequence Stripping
//!
//! Terminal recordings are full of escape sequences that only make sense
//! to a terminal emulator. Frames are displayed as plain text, so every
//! sequence is removed rather than interpreted.
//!
//! The patterns run in order; the last two remove any introducer byte that
//! survived (including truncated sequences) and bell characters. Output
//! never contains ESC or BEL, which is what makes stripping idempotent.

use std::sync::LazyLock;

use regex::Regex;

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Color / attribute (SGR)
        r"\x1b\[[0-9;]*m",
        // Cursor movement and positioning
        r"\x1b\[[0-9;]*[ABCDEFGHf]",
        // Screen / line clear
        r"\x1b\[[0-9]*[JK]",
        // Compound mode setting
        r"\x1b\[[?0-9;]*[hlnpqr]",
        // Operating system commands, BEL or ST terminated
        r"\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)",
        // Private / mode-query sequences
        r"\x1b\[[?0-9;]*[a-zA-Z]",
        // Device status
        r"\x1b\[[0-9]*n",
        // Leftover introducers
        r"\x1b\[?",
        // Bell
        r"\x07",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("control sequence pattern is valid"))
    .collect()
});

/// Remove terminal control sequences from `input`
pub fn strip_control_sequences(input: &str) -> String {
    let mut output = input.to_string();
    for pattern in PATTERNS.iter() {
        if let std::borrow::Cow::Owned(replaced) = pattern.replace_all(&output, "") {
            output = replaced;
        }
    }
    output
}
