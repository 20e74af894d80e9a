// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal output helpers: colors when we have a TTY, plain text when
//! piped.

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Wrap `text` in a color code if stdout is a terminal.
pub fn styled(text: &str, color: &str) -> String {
    if atty::is(atty::Stream::Stdout) {
        format!("{}{}{}", color, text, RESET)
    } else {
        text.to_string()
    }
}

/// Render a duration in the most readable unit.
pub fn timing(seconds: f64) -> String {
    let micros = seconds * 1_000_000.0;
    if micros < 1_000.0 {
        format!("{:.0}µs", micros)
    } else if micros < 1_000_000.0 {
        format!("{:.2}ms", micros / 1_000.0)
    } else {
        format!("{:.2}s", seconds)
    }
}

/// Thousands-separated counts: 1234567 → "1,234,567".
pub fn count(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, c) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
