//! Operator commands from a line-oriented reader.
//!
//! Each line is parsed as a [`ControlCommand`], either the word form or the
//! single-key binding.  Unknown lines are logged and skipped.  The reader
//! ends at end of input, after a `quit`, or when the loop drops its
//! receiver.
//!
//! Reading runs on a dedicated OS thread rather than a Tokio task, so a
//! terminal read still pending when the loop returns does not hold up
//! runtime shutdown.

use std::io::{self, BufRead, BufReader};
use std::thread::JoinHandle;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::application::control::ControlCommand;

/// Forwards parsed commands from `reader` to `tx`, blocking the calling
/// thread.  Must not be called from inside an async context.
pub fn forward_commands<R: BufRead>(reader: R, tx: mpsc::Sender<ControlCommand>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("control input read failed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<ControlCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };
        if tx.blocking_send(command).is_err() {
            // Receiver dropped: the loop has stopped.
            break;
        }
        if command == ControlCommand::Quit {
            break;
        }
    }
    debug!("control input closed");
}

/// Spawns a named thread forwarding commands from `reader`.
///
/// The returned handle may be dropped; the thread then runs detached and
/// dies with the process.
///
/// # Errors
///
/// Returns the OS error if the thread cannot be spawned.
pub fn spawn_command_reader<R>(
    reader: R,
    tx: mpsc::Sender<ControlCommand>,
) -> io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    std::thread::Builder::new()
        .name("airkeys-control".to_string())
        .spawn(move || forward_commands(reader, tx))
}

/// Spawns the command reader over stdin.
///
/// # Errors
///
/// Returns the OS error if the thread cannot be spawned.
pub fn spawn_stdin_reader(tx: mpsc::Sender<ControlCommand>) -> io::Result<JoinHandle<()>> {
    spawn_command_reader(BufReader::new(io::stdin()), tx)
}
