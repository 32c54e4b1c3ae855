//! Step command execution
//!
//! Every command a step runs goes through [`run_command`], which
//! - spawns it in its own process group registered with the
//!   [`ChildRegistry`], so an interrupt takes it down too
//! - streams its output into the caller's writer as it arrives, which
//!   during a run is the display's capturing writer

use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

use tracing::info;

use crate::error::{KickstartError, Result};
use crate::process_guard::{ChildRegistry, CommandProcessGroup};

/// Run `command` with `sh`, writing its merged stdout/stderr to `out`.
///
/// With `dry_run` the command is only echoed as `[DRY RUN] <command>`.
/// A non-zero exit is an error.
pub fn run_command(command: &str, dry_run: bool, out: &mut dyn Write) -> Result<()> {
    if dry_run {
        writeln!(out, "[DRY RUN] {command}")?;
        return Ok(());
    }

    info!("run_command: {}", command);

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(format!("exec 2>&1\n{command}"))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .in_new_process_group()
        .spawn()
        .map_err(|e| KickstartError::command(format!("failed to spawn `{command}`: {e}")))?;
    let pid = child.id();
    register(pid, true);

    let streamed = match child.stdout.take() {
        Some(stdout) => stream_lines(stdout, out),
        None => Ok(()),
    };
    // always reap the child, even if forwarding its output failed
    let status = child.wait();
    register(pid, false);

    streamed?;
    let status = status?;
    out.flush()?;

    if status.success() {
        info!("Command succeeded: {}", command);
        Ok(())
    } else {
        let code = status
            .code()
            .map_or_else(|| "a signal".to_string(), |c| format!("status {c}"));
        info!("Command failed with {}: {}", code, command);
        Err(KickstartError::command(format!(
            "`{command}` exited with {code}"
        )))
    }
}

fn register(pid: u32, running: bool) {
    let registry = ChildRegistry::global();
    if let Ok(mut guard) = registry.lock() {
        if running {
            guard.register(pid);
        } else {
            guard.unregister(pid);
        }
    }
}

/// Forward `reader` line by line so partial output shows up promptly.
fn stream_lines(reader: impl std::io::Read, out: &mut dyn Write) -> Result<()> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        out.write_all(&line)?;
    }
}
