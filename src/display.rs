//! Fixed-header display controller
//!
//! Splits the terminal into a reserved header at the top (logo, banner and
//! a single status row) and a scroll region below it that holds step
//! output. Step output is written through a [`CaptureWriter`], which lets
//! the controller replay it after a resize.
//!
//! # Lifecycle
//!
//! ```text
//! Disabled                      (stdout is not a TTY; permanent)
//! Uninitialized --initialize--> Active --cleanup--> Uninitialized
//!                               Active <--> Redrawing
//! ```
//!
//! `Redrawing` brackets every write the controller makes on its own
//! behalf. While in it, nothing written to the terminal is recorded as
//! step output or moves the tracked cursor, so a redraw can never feed
//! its own replay.
//!
//! All terminal writes, whether body text, status updates or redraws, go
//! through one mutex-guarded output, so they reach the terminal in call
//! order and a resize cannot interleave with a half-written fragment.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use crossterm::tty::IsTty;
use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthStr;

use crate::ansi::{self, CLEAR_LINE, CLEAR_SCREEN, CURSOR_HOME, HIDE_CURSOR, SHOW_CURSOR};
use crate::capture::{self, CaptureWriter, StepOutput};
use crate::config::DisplayConfig;
use crate::error::{KickstartError, Result};
use crate::resize::ResizeWatcher;
use crate::status::{format_plain, format_status};
use crate::terminal::{CrosstermSize, SizeSource, TerminalState};

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Lifecycle {
    /// Output is not interactive; only plain text is ever written
    Disabled,
    Uninitialized,
    Active,
    /// The controller itself is writing to the terminal
    Redrawing,
}

/// Header lines and the row that holds the status line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderContent {
    pub lines: Vec<String>,
    /// 1-based absolute row of the status line; 0 means no status line
    pub status_row: u16,
}

impl HeaderContent {
    /// Rows reserved above the scroll region.
    pub fn reserved_rows(&self) -> u16 {
        let lines = u16::try_from(self.lines.len()).unwrap_or(u16::MAX);
        lines.max(self.status_row)
    }

    /// First row of the scroll region.
    pub fn scroll_start(&self) -> u16 {
        self.reserved_rows().saturating_add(1)
    }
}

/// State shared between the controller, its writers and the resize thread.
pub(crate) struct Display {
    out: Box<dyn Write + Send>,
    size: Box<dyn SizeSource>,
    config: DisplayConfig,
    lifecycle: Lifecycle,
    header: HeaderContent,
    terminal: TerminalState,
    log: StepOutput,
    status: Option<String>,
}

impl Display {
    fn new(
        out: Box<dyn Write + Send>,
        size: Box<dyn SizeSource>,
        interactive: bool,
        config: DisplayConfig,
    ) -> Self {
        let lifecycle = if interactive {
            Lifecycle::Uninitialized
        } else {
            Lifecycle::Disabled
        };
        Self {
            out,
            size,
            config,
            lifecycle,
            header: HeaderContent::default(),
            terminal: TerminalState::default(),
            log: StepOutput::default(),
            status: None,
        }
    }

    /// Forward step output and, while active, record it.
    pub(crate) fn write_body(&mut self, buf: &[u8]) -> io::Result<()> {
        self.out.write_all(buf)?;
        if self.lifecycle == Lifecycle::Active {
            let text = String::from_utf8_lossy(buf);
            self.log.record(&text);
            capture::advance_cursor(&mut self.terminal, &text);
        }
        Ok(())
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Rows needed for the header lines plus `min_scroll_rows`.
    ///
    /// The status row counts toward `min_scroll_rows` when it sits right
    /// below the header.
    fn rows_needed(&self) -> u32 {
        let lines = u32::try_from(self.header.lines.len()).unwrap_or(u32::MAX);
        lines.saturating_add(u32::from(self.config.min_scroll_rows))
    }

    fn has_room(&self) -> bool {
        let height = u32::from(self.terminal.height);
        height >= self.rows_needed() && height >= u32::from(self.header.scroll_start())
    }

    fn refresh_size(&mut self) -> Result<()> {
        self.terminal
            .refresh(self.size.as_ref())
            .map_err(|e| KickstartError::terminal(format!("cannot query window size: {e}")))
    }

    fn set_header_content(&mut self, lines: Vec<String>, status_row: u16) {
        if self.lifecycle == Lifecycle::Disabled {
            return;
        }
        self.header = HeaderContent { lines, status_row };
    }

    fn initialize(&mut self) -> Result<bool> {
        if self.lifecycle != Lifecycle::Uninitialized {
            return Ok(false);
        }

        self.refresh_size()?;
        if !self.has_room() {
            warn!(
                "Terminal too small for fixed header ({} rows, need {}); using plain output",
                self.terminal.height,
                self.rows_needed()
            );
            return Ok(false);
        }

        let start = self.header.scroll_start();
        self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        self.out.write_all(HIDE_CURSOR.as_bytes())?;
        self.out.write_all(CURSOR_HOME.as_bytes())?;
        self.write_header()?;
        self.out
            .write_all(ansi::set_scroll_region(start, self.terminal.height).as_bytes())?;
        self.out.write_all(ansi::move_to(start, 1).as_bytes())?;
        self.out.write_all(SHOW_CURSOR.as_bytes())?;
        self.out.flush()?;

        self.terminal.reset_cursor();
        self.log.clear();
        self.status = None;
        self.lifecycle = Lifecycle::Active;
        info!(
            "Display active: {}x{}, scroll region {}-{}",
            self.terminal.width, self.terminal.height, start, self.terminal.height
        );
        Ok(true)
    }

    fn write_header(&mut self) -> io::Result<()> {
        for (row, line) in (1u16..).zip(self.header.lines.iter()) {
            self.out.write_all(ansi::move_to(row, 1).as_bytes())?;
            self.out.write_all(line.as_bytes())?;
        }
        Ok(())
    }

    fn update_status(&mut self, message: &str) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Disabled => {
                writeln!(self.out, "{}", format_plain(message, self.config.accent.color()))?;
                self.out.flush()?;
                Ok(())
            }
            Lifecycle::Active => {
                self.status = Some(message.to_string());
                self.redrawing(|display| display.render_status())
            }
            Lifecycle::Uninitialized | Lifecycle::Redrawing => Ok(()),
        }
    }

    /// Run `draw` with capture suspended.
    fn redrawing<F>(&mut self, draw: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        self.lifecycle = Lifecycle::Redrawing;
        let result = draw(self);
        self.lifecycle = Lifecycle::Active;
        result.map_err(KickstartError::from)
    }

    fn render_status(&mut self) -> io::Result<()> {
        let row = self.header.status_row;
        let Some(message) = self.status.as_deref() else {
            return Ok(());
        };
        if row == 0 {
            return Ok(());
        }
        let line = format_status(message, self.terminal.width, self.config.accent.color());

        self.out.write_all(ansi::SAVE_CURSOR.as_bytes())?;
        self.out.write_all(ansi::move_to(row, 1).as_bytes())?;
        self.out.write_all(CLEAR_LINE.as_bytes())?;
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(ansi::RESTORE_CURSOR.as_bytes())?;
        self.out.flush()
    }

    fn clear_step_output(&mut self) {
        if self.lifecycle != Lifecycle::Active {
            return;
        }
        self.log.clear();
        self.terminal.reset_cursor();
    }

    fn handle_resize(&mut self) -> Result<bool> {
        if self.lifecycle != Lifecycle::Active {
            return Ok(false);
        }

        let (prev_height, prev_width) = (self.terminal.height, self.terminal.width);
        self.refresh_size()?;
        if !self.terminal.has_size_changed(prev_height, prev_width) {
            debug!("Resize signal without a size change");
            return Ok(false);
        }
        if !self.has_room() {
            warn!(
                "Terminal shrank to {}x{}; skipping redraw",
                self.terminal.width, self.terminal.height
            );
            return Ok(false);
        }

        debug!(
            "Redrawing for {}x{} -> {}x{}",
            prev_width, prev_height, self.terminal.width, self.terminal.height
        );
        self.redrawing(|display| display.redraw())?;
        Ok(true)
    }

    fn redraw(&mut self) -> io::Result<()> {
        let start = self.header.scroll_start();
        let height = self.terminal.height;

        self.out.write_all(HIDE_CURSOR.as_bytes())?;
        self.out.write_all(ansi::reset_scroll_region().as_bytes())?;
        self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        self.out.write_all(CURSOR_HOME.as_bytes())?;
        self.write_header()?;
        self.out
            .write_all(ansi::set_scroll_region(start, height).as_bytes())?;
        self.out.write_all(ansi::move_to(start, 1).as_bytes())?;

        if let Some((last, rest)) = self.log.lines().split_last() {
            for line in rest {
                writeln!(self.out, "{line}")?;
            }
            self.out.write_all(last.as_bytes())?;
            self.out.flush()?;
        }

        let width = usize::from(self.terminal.width.max(1));
        let wrapped: usize = self
            .log
            .closed_lines()
            .iter()
            .map(|line| line.width().saturating_sub(1) / width)
            .sum();
        let row = clamp_row(start, self.terminal.cursor_line + wrapped, height);
        let col = self.terminal.cursor_column.min(usize::from(self.terminal.width.max(1)));
        let col = u16::try_from(col).unwrap_or(u16::MAX);
        self.out.write_all(ansi::move_to(row, col).as_bytes())?;
        self.out.write_all(SHOW_CURSOR.as_bytes())?;

        self.render_status()?;
        self.out.flush()
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.lifecycle != Lifecycle::Active {
            return Ok(());
        }
        // stop capturing before touching the terminal so nothing after this
        // point lands in the step log
        self.lifecycle = Lifecycle::Uninitialized;
        self.status = None;

        self.out.write_all(ansi::SAVE_CURSOR.as_bytes())?;
        self.out.write_all(ansi::reset_scroll_region().as_bytes())?;
        if self.header.status_row > 0 {
            self.out
                .write_all(ansi::move_to(self.header.status_row, 1).as_bytes())?;
            self.out.write_all(CLEAR_LINE.as_bytes())?;
        }
        self.out.write_all(ansi::RESTORE_CURSOR.as_bytes())?;
        self.out.flush()?;
        info!("Display released");
        Ok(())
    }
}

/// Absolute row for a cursor `offset` rows into a region starting at
/// `start`. Output past the bottom has scrolled, so the cursor sits on
/// the last row.
fn clamp_row(start: u16, offset: usize, height: u16) -> u16 {
    let row = usize::from(start).saturating_add(offset);
    u16::try_from(row).unwrap_or(u16::MAX).min(height)
}

/// Owner of the display.
///
/// Drops back to a normal terminal on every exit path: `cleanup` runs
/// from `Drop` if the caller did not run it.
pub struct DisplayController {
    shared: Arc<Mutex<Display>>,
    watcher: Option<ResizeWatcher>,
    watch_resize: bool,
}

impl DisplayController {
    /// Controller for the process's stdout.
    ///
    /// Disabled unless stdout is a terminal.
    pub fn stdout(config: DisplayConfig) -> Self {
        let out = io::stdout();
        let interactive = out.is_tty();
        debug!("stdout is_tty={}", interactive);
        Self::with_parts(Box::new(out), Box::new(CrosstermSize), interactive, config)
            .watch_resize(true)
    }

    /// Controller over an arbitrary output and size source.
    ///
    /// The resize watcher is off; call [`handle_resize`](Self::handle_resize)
    /// directly or enable it with [`watch_resize`](Self::watch_resize).
    pub fn with_parts(
        out: Box<dyn Write + Send>,
        size: Box<dyn SizeSource>,
        interactive: bool,
        config: DisplayConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Display::new(out, size, interactive, config))),
            watcher: None,
            watch_resize: false,
        }
    }

    /// Whether `initialize` registers a SIGWINCH watcher.
    pub fn watch_resize(mut self, enabled: bool) -> Self {
        self.watch_resize = enabled;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, Display>> {
        self.shared
            .lock()
            .map_err(|_| KickstartError::state("display mutex poisoned"))
    }

    /// Writer for step output. Use it wherever a step would print.
    pub fn writer(&self) -> CaptureWriter {
        CaptureWriter::new(Arc::clone(&self.shared))
    }

    pub fn lifecycle(&self) -> Result<Lifecycle> {
        Ok(self.lock()?.lifecycle)
    }

    /// Whether a SIGWINCH watcher is currently delivering resizes.
    pub fn is_watching_resize(&self) -> bool {
        self.watcher.as_ref().is_some_and(ResizeWatcher::is_running)
    }

    pub fn header(&self) -> Result<HeaderContent> {
        Ok(self.lock()?.header.clone())
    }

    pub fn terminal_state(&self) -> Result<TerminalState> {
        Ok(self.lock()?.terminal)
    }

    /// Lines captured since the last step boundary.
    pub fn step_output(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.log.lines().to_vec())
    }

    /// Set the header and the 1-based row of the status line.
    ///
    /// Call before [`initialize`](Self::initialize). Ignored when disabled.
    pub fn set_header_content(&self, lines: Vec<String>, status_row: u16) -> Result<()> {
        self.lock()?.set_header_content(lines, status_row);
        Ok(())
    }

    /// Draw the header and confine scrolling to the rows below it.
    ///
    /// Does nothing when disabled or already active. A terminal too short
    /// for the header plus `min_scroll_rows` leaves the controller
    /// uninitialized and output scrolls normally.
    pub fn initialize(&mut self) -> Result<()> {
        let activated = self.lock()?.initialize()?;
        if activated && self.watch_resize && self.watcher.is_none() {
            let shared = Arc::downgrade(&self.shared);
            let watcher = ResizeWatcher::start(move || {
                let Some(shared) = shared.upgrade() else {
                    return;
                };
                let result = match shared.lock() {
                    Ok(mut display) => display.handle_resize(),
                    Err(_) => Err(KickstartError::state("display mutex poisoned")),
                };
                if let Err(e) = result {
                    warn!("Redraw after resize failed: {}", e);
                }
            });
            match watcher {
                Ok(watcher) => self.watcher = Some(watcher),
                Err(e) => warn!("Failed to watch for terminal resizes: {}", e),
            }
        }
        Ok(())
    }

    /// Show `message` on the status row without moving the body cursor.
    ///
    /// When disabled the message is printed as a plain accent-coloured line.
    pub fn update_status(&self, message: &str) -> Result<()> {
        self.lock()?.update_status(message)
    }

    /// Forget captured output and move the tracked cursor to the top of
    /// the scroll region. Called between steps.
    pub fn clear_step_output(&self) -> Result<()> {
        self.lock()?.clear_step_output();
        Ok(())
    }

    /// Redraw everything if the window size actually changed.
    ///
    /// Returns whether a redraw happened.
    pub fn handle_resize(&self) -> Result<bool> {
        self.lock()?.handle_resize()
    }

    /// Restore a single full-screen scroll region and clear the status row.
    ///
    /// Safe to call repeatedly; only the first call after `initialize`
    /// writes anything.
    pub fn cleanup(&mut self) -> Result<()> {
        // the watcher thread takes the lock, so stop it before locking
        if let Some(mut watcher) = self.watcher.take() {
            watcher.stop();
        }
        self.lock()?.cleanup()
    }

    /// Cleanup callable from another thread, e.g. a termination handler.
    pub fn cleanup_hook(&self) -> Box<dyn Fn() + Send + Sync> {
        let shared = Arc::downgrade(&self.shared);
        Box::new(move || {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            if let Ok(mut display) = shared.lock() {
                if let Err(e) = display.cleanup() {
                    warn!("Display cleanup failed: {}", e);
                }
            }
        })
    }
}

impl Drop for DisplayController {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            warn!("Display cleanup on drop failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Output buffer the test can inspect after handing a clone to the display.
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn take(&self) -> String {
            let mut bytes = self.0.lock().unwrap();
            String::from_utf8(std::mem::take(&mut *bytes)).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[derive(Clone)]
    struct Size(Arc<Mutex<(u16, u16)>>);

    impl Size {
        fn new(cols: u16, rows: u16) -> Self {
            Self(Arc::new(Mutex::new((cols, rows))))
        }

        fn set(&self, cols: u16, rows: u16) {
            *self.0.lock().unwrap() = (cols, rows);
        }
    }

    impl SizeSource for Size {
        fn size(&self) -> io::Result<(u16, u16)> {
            Ok(*self.0.lock().unwrap())
        }
    }

    fn controller(cols: u16, rows: u16) -> (DisplayController, Buffer, Size) {
        let buffer = Buffer::default();
        let size = Size::new(cols, rows);
        let display = DisplayController::with_parts(
            Box::new(buffer.clone()),
            Box::new(size.clone()),
            true,
            DisplayConfig::default(),
        );
        (display, buffer, size)
    }

    fn active(cols: u16, rows: u16) -> (DisplayController, Buffer, Size) {
        let (mut display, buffer, size) = controller(cols, rows);
        display
            .set_header_content(vec!["logo".into(), "banner".into()], 3)
            .unwrap();
        display.initialize().unwrap();
        buffer.take();
        (display, buffer, size)
    }

    #[test]
    fn test_header_reserved_rows() {
        let header = HeaderContent {
            lines: vec!["a".into(), "b".into()],
            status_row: 3,
        };
        assert_eq!(header.reserved_rows(), 3);
        assert_eq!(header.scroll_start(), 4);

        let header = HeaderContent {
            lines: vec!["a".into(), "b".into(), "c".into()],
            status_row: 2,
        };
        assert_eq!(header.reserved_rows(), 3);
    }

    #[test]
    fn test_clamp_row() {
        assert_eq!(clamp_row(4, 0, 24), 4);
        assert_eq!(clamp_row(4, 5, 24), 9);
        assert_eq!(clamp_row(4, 500, 24), 24);
    }

    #[test]
    fn test_initialize_sets_scroll_region() {
        let (mut display, buffer, _) = controller(80, 24);
        display
            .set_header_content(vec!["logo".into(), "banner".into()], 3)
            .unwrap();
        display.initialize().unwrap();

        let out = buffer.take();
        assert!(out.starts_with(CLEAR_SCREEN));
        assert!(out.contains("\x1b[1;1Hlogo\x1b[2;1Hbanner"));
        assert!(out.contains("\x1b[4;24r\x1b[4;1H"));
        assert!(out.ends_with(SHOW_CURSOR));
        assert_eq!(display.lifecycle().unwrap(), Lifecycle::Active);
    }

    #[test]
    fn test_initialize_too_small_stays_uninitialized() {
        let (mut display, buffer, _) = controller(80, 5);
        display
            .set_header_content(vec!["a".into(), "b".into(), "c".into()], 3)
            .unwrap();
        display.initialize().unwrap();
        assert_eq!(display.lifecycle().unwrap(), Lifecycle::Uninitialized);
        assert!(buffer.take().is_empty());
    }

    #[test]
    fn test_status_row_counts_toward_minimum_room() {
        // 2 header lines + 3 rows, with the status line as the first of them
        let (mut display, buffer, _) = controller(80, 5);
        display
            .set_header_content(vec!["logo".into(), "banner".into()], 3)
            .unwrap();
        display.initialize().unwrap();
        assert_eq!(display.lifecycle().unwrap(), Lifecycle::Active);
        assert!(buffer.take().contains("\x1b[4;5r\x1b[4;1H"));
    }

    #[test]
    fn test_status_row_past_bottom_stays_uninitialized() {
        let (mut display, buffer, _) = controller(80, 10);
        display.set_header_content(vec!["logo".into()], 12).unwrap();
        display.initialize().unwrap();
        assert_eq!(display.lifecycle().unwrap(), Lifecycle::Uninitialized);
        assert!(buffer.take().is_empty());
    }

    #[test]
    fn test_size_query_failure_is_terminal_error() {
        struct NoSize;
        impl SizeSource for NoSize {
            fn size(&self) -> io::Result<(u16, u16)> {
                Err(io::Error::new(io::ErrorKind::Unsupported, "not a tty"))
            }
        }

        let buffer = Buffer::default();
        let mut display = DisplayController::with_parts(
            Box::new(buffer.clone()),
            Box::new(NoSize),
            true,
            DisplayConfig::default(),
        );
        display.set_header_content(vec!["logo".into()], 2).unwrap();
        let err = display.initialize().unwrap_err();
        assert!(matches!(err, KickstartError::Terminal(_)));
        assert_eq!(display.lifecycle().unwrap(), Lifecycle::Uninitialized);
        assert!(buffer.take().is_empty());
    }

    #[test]
    fn test_initialize_twice_is_noop() {
        let (mut display, buffer, _) = active(80, 24);
        display.initialize().unwrap();
        assert!(buffer.take().is_empty());
    }

    #[test]
    fn test_disabled_prints_plain_status() {
        let buffer = Buffer::default();
        let mut display = DisplayController::with_parts(
            Box::new(buffer.clone()),
            Box::new(Size::new(80, 24)),
            false,
            DisplayConfig::default(),
        );
        display.set_header_content(vec!["logo".into()], 2).unwrap();
        display.initialize().unwrap();
        display.update_status("Step 1/5").unwrap();
        display.cleanup().unwrap();

        let out = buffer.take();
        assert!(out.contains("Step 1/5"));
        assert!(out.ends_with('\n'));
        assert!(!out.contains(CLEAR_SCREEN));
        assert!(!out.contains("\x1b[r"));
        assert!(!out.contains(HIDE_CURSOR));
        assert_eq!(display.lifecycle().unwrap(), Lifecycle::Disabled);
        assert_eq!(display.header().unwrap(), HeaderContent::default());
    }

    #[test]
    fn test_status_before_initialize_is_noop() {
        let (display, buffer, _) = controller(80, 24);
        display.update_status("early").unwrap();
        assert!(buffer.take().is_empty());
    }

    #[test]
    fn test_update_status_preserves_body_cursor() {
        let (display, buffer, _) = active(80, 24);
        let mut out = display.writer();
        out.write_all(b"ok\n").unwrap();
        buffer.take();

        display.update_status("Step 1/5").unwrap();
        let written = buffer.take();
        let status = format_status("Step 1/5", 80, DisplayConfig::default().accent.color());
        assert_eq!(
            written,
            format!("\x1b7\x1b[3;1H\x1b[2K{status}\x1b8")
        );

        let state = display.terminal_state().unwrap();
        assert_eq!((state.cursor_line, state.cursor_column), (1, 1));
        assert_eq!(display.step_output().unwrap(), ["ok"]);
        assert_eq!(display.lifecycle().unwrap(), Lifecycle::Active);
    }

    #[test]
    fn test_body_write_is_forwarded_and_recorded() {
        let (display, buffer, _) = active(80, 24);
        let mut out = display.writer();
        out.write_all(b"ok\n").unwrap();

        assert_eq!(buffer.take(), "ok\n");
        assert_eq!(display.step_output().unwrap(), ["ok"]);
        let state = display.terminal_state().unwrap();
        assert_eq!((state.cursor_line, state.cursor_column), (1, 1));
    }

    #[test]
    fn test_writes_before_initialize_are_not_recorded() {
        let (display, buffer, _) = controller(80, 24);
        let mut out = display.writer();
        out.write_all(b"plain\n").unwrap();
        assert_eq!(buffer.take(), "plain\n");
        assert!(display.step_output().unwrap().is_empty());
    }

    #[test]
    fn test_clear_step_output() {
        let (display, _, _) = active(80, 24);
        let mut out = display.writer();
        out.write_all(b"one\ntwo").unwrap();

        display.clear_step_output().unwrap();
        let first = (display.step_output().unwrap(), display.terminal_state().unwrap());
        display.clear_step_output().unwrap();
        let second = (display.step_output().unwrap(), display.terminal_state().unwrap());

        assert!(first.0.is_empty());
        assert_eq!((first.1.cursor_line, first.1.cursor_column), (0, 1));
        assert_eq!(first, second);
    }

    #[test]
    fn test_resize_without_change_is_silent() {
        let (display, buffer, _) = active(80, 24);
        assert!(!display.handle_resize().unwrap());
        assert!(buffer.take().is_empty());
    }

    #[test]
    fn test_resize_redraws_and_replays() {
        let (display, buffer, size) = active(80, 24);
        display.update_status("Step 1/5").unwrap();
        let mut out = display.writer();
        out.write_all(b"ok\n").unwrap();
        buffer.take();

        size.set(100, 30);
        assert!(display.handle_resize().unwrap());

        let redraw = buffer.take();
        assert!(redraw.contains("\x1b[r\x1b[2J\x1b[H"));
        assert!(redraw.contains("\x1b[4;30r\x1b[4;1Hok\x1b[5;1H"));
        let status = format_status("Step 1/5", 100, DisplayConfig::default().accent.color());
        assert!(redraw.contains(&status));

        // replay is not captured again
        assert_eq!(display.step_output().unwrap(), ["ok"]);
        let state = display.terminal_state().unwrap();
        assert_eq!((state.height, state.width), (30, 100));
        assert_eq!((state.cursor_line, state.cursor_column), (1, 1));
        assert_eq!(display.lifecycle().unwrap(), Lifecycle::Active);
    }

    #[test]
    fn test_resize_replays_lines_in_order() {
        let (display, buffer, size) = active(80, 24);
        let mut out = display.writer();
        out.write_all(b"first\nsecond\npartial").unwrap();
        buffer.take();

        size.set(80, 40);
        display.handle_resize().unwrap();
        let redraw = buffer.take();
        // a fragment containing newlines leaves the tracked column at 1
        assert!(redraw.contains("first\nsecond\npartial\x1b[6;1H"));
    }

    #[test]
    fn test_resize_counts_wrapped_rows_for_cursor() {
        let (display, buffer, size) = active(80, 24);
        let mut out = display.writer();
        writeln!(out, "{}", "a".repeat(30)).unwrap();
        write!(out, "next").unwrap();
        buffer.take();

        // 30 columns wrap onto a second row at width 20
        size.set(20, 24);
        display.handle_resize().unwrap();
        let redraw = buffer.take();
        assert!(redraw.contains("next\x1b[6;5H"));

        // no wrapping at the original width
        size.set(80, 24);
        display.handle_resize().unwrap();
        assert!(buffer.take().contains("next\x1b[5;5H"));
    }

    #[test]
    fn test_resize_too_small_skips_redraw() {
        let (display, buffer, size) = active(80, 24);
        size.set(80, 4);
        assert!(!display.handle_resize().unwrap());
        assert!(buffer.take().is_empty());
        assert_eq!(display.lifecycle().unwrap(), Lifecycle::Active);

        // growing again redraws
        size.set(80, 24);
        assert!(display.handle_resize().unwrap());
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let (mut display, buffer, _) = active(80, 24);
        display.cleanup().unwrap();
        let out = buffer.take();
        assert_eq!(out, "\x1b7\x1b[r\x1b[3;1H\x1b[2K\x1b8");
        assert_eq!(display.lifecycle().unwrap(), Lifecycle::Uninitialized);

        display.cleanup().unwrap();
        assert!(buffer.take().is_empty());
        assert_eq!(display.lifecycle().unwrap(), Lifecycle::Uninitialized);
    }

    #[test]
    fn test_writes_after_cleanup_are_passthrough() {
        let (mut display, buffer, _) = active(80, 24);
        display.cleanup().unwrap();
        buffer.take();

        let mut out = display.writer();
        out.write_all(b"after\n").unwrap();
        assert_eq!(buffer.take(), "after\n");
        assert!(display.step_output().unwrap().is_empty());
    }

    #[test]
    fn test_operations_noop_when_uninitialized() {
        let (display, buffer, size) = controller(80, 24);
        size.set(100, 30);
        assert!(!display.handle_resize().unwrap());
        display.clear_step_output().unwrap();
        assert!(buffer.take().is_empty());
    }

    #[test]
    fn test_cleanup_hook_releases_display() {
        let (display, buffer, _) = active(80, 24);
        let hook = display.cleanup_hook();
        hook();
        assert_eq!(display.lifecycle().unwrap(), Lifecycle::Uninitialized);
        assert!(buffer.take().contains("\x1b[r"));
    }

    #[test]
    fn test_drop_runs_cleanup() {
        let (display, buffer, _) = active(80, 24);
        drop(display);
        assert!(buffer.take().contains("\x1b[r"));
    }

    #[test]
    fn test_reinitialize_after_cleanup() {
        let (mut display, buffer, _) = active(80, 24);
        display.cleanup().unwrap();
        display.initialize().unwrap();
        assert_eq!(display.lifecycle().unwrap(), Lifecycle::Active);
        assert!(buffer.take().contains("\x1b[4;24r"));
    }
}
