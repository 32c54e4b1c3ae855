//! Terminal control sequences
//!
//! Pure builders for the 7-bit ANSI sequences the display emits. The byte
//! strings here are what terminals see, so they must not change shape.
//! Rows and columns are 1-based, as on the wire.

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// DEC save cursor (`ESC 7`)
pub const SAVE_CURSOR: &str = "\x1b7";
/// DEC restore cursor (`ESC 8`)
pub const RESTORE_CURSOR: &str = "\x1b8";
pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const CURSOR_HOME: &str = "\x1b[H";
pub const CLEAR_LINE: &str = "\x1b[2K";
pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";

const ELLIPSIS: &str = "...";

/// Move the cursor to an absolute position.
pub fn move_to(row: u16, col: u16) -> String {
    format!("\x1b[{row};{col}H")
}

/// Confine scrolling to rows `top..=bottom`.
pub fn set_scroll_region(top: u16, bottom: u16) -> String {
    format!("\x1b[{top};{bottom}r")
}

/// Restore full-screen scrolling.
pub fn reset_scroll_region() -> &'static str {
    "\x1b[r"
}

/// Fit `text` into a line of `max_width` columns.
///
/// Text narrower than `max_width - 1` columns is returned unchanged.
/// Anything longer keeps its first `max_width - 4` columns followed by
/// `...`, so the result never reaches the last column (writing there
/// would trigger an auto-wrap on some terminals).
pub fn truncate_to_fit(text: &str, max_width: usize) -> String {
    if text.width() <= max_width.saturating_sub(1) {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(4);
    let mut used = 0;
    let mut out = String::with_capacity(budget + ELLIPSIS.len());
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str(ELLIPSIS);
    out
}
