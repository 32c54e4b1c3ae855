//! Status line formatting

use crossterm::style::{Color, Stylize};
use unicode_width::UnicodeWidthStr;

use crate::ansi::truncate_to_fit;

/// Format a status message for a line `width` columns wide.
///
/// The message is truncated to fit and padded with spaces to exactly
/// `width` columns, so a shorter message fully overwrites a longer one.
pub fn format_status(text: &str, width: u16, accent: Color) -> String {
    let width = width as usize;
    let mut line = truncate_to_fit(text, width);
    let pad = width.saturating_sub(line.width());
    line.extend(std::iter::repeat_n(' ', pad));
    format!("{}", line.with(accent))
}

/// Accent-coloured message for plain (non-interactive) output.
pub fn format_plain(text: &str, accent: Color) -> String {
    format!("{}", text.with(accent))
}
