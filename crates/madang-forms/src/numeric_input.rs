//! Keystroke filter for numeric fields

/// The only decimal separator accepted
pub const DECIMAL_SEPARATOR: char = '.';

/// Backspace as delivered by key-press events
pub const BACKSPACE: char = '\u{8}';

/// Whether `ch` may be appended to `current` in a numeric field.
///
/// Digits are always accepted, the separator at most once. Control
/// characters are not handled here.
pub fn accepts(current: &str, ch: char) -> bool {
    ch.is_ascii_digit() || (ch == DECIMAL_SEPARATOR && !current.contains(DECIMAL_SEPARATOR))
}
