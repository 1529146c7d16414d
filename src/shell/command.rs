//! Command execution with deadline and cancellation.

use crate::error::{PkgsenseError, Result};
use crate::shell::CancelToken;
use std::collections::HashMap;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled for exit, deadline and cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal or by us).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,

    /// Whether the command was killed for exceeding its timeout.
    pub timed_out: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
            timed_out: false,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
            timed_out: false,
        }
    }

    /// Create a result for a command killed at its deadline.
    pub fn timeout(duration: Duration) -> Self {
        Self {
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            duration,
            success: false,
            timed_out: true,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Deadline for the whole run (None = no timeout).
    pub timeout: Option<Duration>,

    /// Token checked while waiting; cancelling kills the child.
    pub cancel: Option<CancelToken>,
}

/// Execute `program` with `args`, capturing stdout and stderr.
///
/// Returns `Ok` with a non-success [`CommandResult`] for non-zero exits and
/// timeouts, `Err(Io)` when the program cannot be spawned, and
/// `Err(Cancelled)` when the token fires first. In the last two cases of a
/// running child, the child is killed and reaped before returning.
pub fn execute(program: &str, args: &[&str], options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    if options.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
        return Err(PkgsenseError::Cancelled);
    }

    let mut cmd = Command::new(program);
    cmd.args(args);
    for (key, value) in &options.env {
        cmd.env(key, value);
    }
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn()?;

    // Drain both pipes on their own threads so a chatty child never blocks
    // on a full pipe while we poll it.
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_rx = spawn_drain(stdout);
    let stderr_rx = spawn_drain(stderr);

    // A deadline past what Instant can represent is no deadline at all.
    let deadline = options.timeout.and_then(|t| start.checked_add(t));
    let cancel = options.cancel.as_ref();

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }

        if cancel.is_some_and(CancelToken::is_cancelled) {
            terminate(&mut child);
            tracing::debug!("Killed `{}` after cancellation", program);
            return Err(PkgsenseError::Cancelled);
        }

        if deadline.is_some_and(|d| Instant::now() >= d) {
            terminate(&mut child);
            tracing::debug!("Killed `{}` after {:?}", program, start.elapsed());
            // Reader threads are detached: a grandchild may still hold the pipes.
            return Ok(CommandResult::timeout(start.elapsed()));
        }

        thread::sleep(POLL_INTERVAL);
    };

    // A grandchild may still hold the pipes after the child exits.
    let (Some(stdout_output), Some(stderr_output)) = (
        wait_drained(&stdout_rx, deadline, cancel)?,
        wait_drained(&stderr_rx, deadline, cancel)?,
    ) else {
        tracing::debug!("Output of `{}` still open after {:?}", program, start.elapsed());
        return Ok(CommandResult::timeout(start.elapsed()));
    };
    let duration = start.elapsed();

    if status.success() {
        Ok(CommandResult::success(stdout_output, stderr_output, duration))
    } else {
        Ok(CommandResult::failure(
            status.code(),
            stdout_output,
            stderr_output,
            duration,
        ))
    }
}

fn spawn_drain<R: Read + Send + 'static>(reader: Option<R>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(drain(reader));
    });
    rx
}

/// Wait for a drained pipe. `None` means the deadline passed first.
fn wait_drained(
    rx: &Receiver<String>,
    deadline: Option<Instant>,
    cancel: Option<&CancelToken>,
) -> Result<Option<String>> {
    loop {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(PkgsenseError::Cancelled);
        }

        let wait = match deadline {
            Some(d) => {
                let now = Instant::now();
                if now >= d {
                    return Ok(None);
                }
                (d - now).min(POLL_INTERVAL)
            }
            None => POLL_INTERVAL,
        };

        match rx.recv_timeout(wait) {
            Ok(output) => return Ok(Some(output)),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return Ok(Some(String::new())),
        }
    }
}

fn drain<R: Read>(reader: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        let _ = reader.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn terminate(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
