//! kickstart library
//!
//! A terminal display for installers: a fixed logo/status header at the
//! top of the screen with step output scrolling underneath, kept intact
//! across terminal resizes, plus the step driver that feeds it.

pub mod ansi;
pub mod branding;
pub mod capture;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod plan;
pub mod process_guard;
pub mod resize;
pub mod runner;
pub mod status;
pub mod terminal;
pub mod types;

// Re-export main types for convenience
pub use capture::{CaptureWriter, StepOutput};
pub use config::{Config, DisplayConfig};
pub use display::{DisplayController, HeaderContent, Lifecycle};
pub use error::{KickstartError, Result};
pub use plan::{Plan, Step, run_plan};
pub use process_guard::{ChildRegistry, CommandProcessGroup, ProcessGuard};
pub use resize::ResizeWatcher;
pub use terminal::{CrosstermSize, SizeSource, TerminalState};
pub use types::{Accent, Distro};
