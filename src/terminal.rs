//! Tracked terminal geometry and cursor position.

use std::io;

/// Source of the current window size as `(cols, rows)`.
///
/// The display re-queries this on every resize instead of trusting a
/// cached value, since the signal only says *something* changed.
pub trait SizeSource: Send {
    fn size(&self) -> io::Result<(u16, u16)>;
}

/// Window size as reported by the OS for the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermSize;

impl SizeSource for CrosstermSize {
    fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }
}

/// Cursor position inside the scroll region plus cached dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalState {
    /// 0-based line offset from the top of the scroll region
    pub cursor_line: usize,
    /// 1-based column
    pub cursor_column: usize,
    pub height: u16,
    pub width: u16,
}

impl Default for TerminalState {
    fn default() -> Self {
        Self {
            cursor_line: 0,
            cursor_column: 1,
            height: 0,
            width: 0,
        }
    }
}

impl TerminalState {
    /// Re-read the window size from `source`.
    pub fn refresh(&mut self, source: &dyn SizeSource) -> io::Result<()> {
        let (cols, rows) = source.size()?;
        self.width = cols;
        self.height = rows;
        Ok(())
    }

    pub fn has_size_changed(&self, prev_height: u16, prev_width: u16) -> bool {
        self.height != prev_height || self.width != prev_width
    }

    /// Move the tracked cursor back to the origin of the scroll region.
    pub fn reset_cursor(&mut self) {
        self.cursor_line = 0;
        self.cursor_column = 1;
    }
}
