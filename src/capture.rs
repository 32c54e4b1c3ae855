//! Capturing writer for step output
//!
//! Steps never print to stdout directly. They get a [`CaptureWriter`]
//! from the display and use it like any other `io::Write`. Every byte is
//! forwarded to the real terminal first; while the display is active the
//! same text is also recorded so a resize can replay it.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use unicode_width::UnicodeWidthStr;

use crate::display::Display;
use crate::terminal::TerminalState;

/// Everything written to the scroll region since the last step boundary,
/// split into logical lines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StepOutput {
    lines: Vec<String>,
    /// The last fragment did not end in a newline
    line_open: bool,
}

impl StepOutput {
    /// Record one forwarded fragment.
    ///
    /// A fragment continuing an unterminated line is appended to it, each
    /// `\n` closes the current line, and a lone `\n` after a closed line
    /// records an empty line.
    pub fn record(&mut self, text: &str) {
        for segment in text.split_inclusive('\n') {
            let (body, closed) = match segment.strip_suffix('\n') {
                Some(body) => (body, true),
                None => (segment, false),
            };
            match self.lines.last_mut() {
                Some(last) if self.line_open => last.push_str(body),
                _ => self.lines.push(body.to_string()),
            }
            self.line_open = !closed;
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines already ended by a newline; excludes an unterminated last line.
    pub(crate) fn closed_lines(&self) -> &[String] {
        let open = usize::from(self.line_open);
        &self.lines[..self.lines.len() - open]
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.line_open = false;
    }
}

/// Update the tracked cursor for text written into the scroll region.
pub(crate) fn advance_cursor(state: &mut TerminalState, text: &str) {
    let newlines = text.matches('\n').count();
    if newlines > 0 {
        state.cursor_line += newlines;
        state.cursor_column = 1;
    } else {
        state.cursor_column += text.width();
    }
}

/// `io::Write` handle that routes step output through the display.
///
/// Cheap to clone; all clones share the display's single output path, so
/// body text and status updates reach the terminal in call order.
#[derive(Clone)]
pub struct CaptureWriter {
    shared: Arc<Mutex<Display>>,
}

impl CaptureWriter {
    pub(crate) fn new(shared: Arc<Mutex<Display>>) -> Self {
        Self { shared }
    }
}

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut display = self
            .shared
            .lock()
            .map_err(|_| io::Error::other("display mutex poisoned"))?;
        display.write_body(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut display = self
            .shared
            .lock()
            .map_err(|_| io::Error::other("display mutex poisoned"))?;
        display.flush()
    }
}
