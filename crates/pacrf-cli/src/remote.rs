//! Remote Execution over ssh
//!
//! Runs the PAC-RF binary on the board and streams its merged stdout and
//! stderr back one line at a time.

use crate::settings::Settings;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// ssh options applied to every connection
pub const SSH_OPTIONS: [&str; 5] = [
    "BatchMode=yes",
    "ConnectTimeout=10",
    "ServerAliveInterval=5",
    "ServerAliveCountMax=2",
    "StrictHostKeyChecking=accept-new",
];

/// Errors from the remote transport
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The local ssh process could not be started
    #[error("failed to start subprocess ({0})")]
    Spawn(#[source] std::io::Error),

    /// Reading subprocess output failed
    #[error("failed to read subprocess output ({0})")]
    Read(#[source] std::io::Error),

    /// Waiting for the subprocess to exit failed
    #[error("command close failed ({0})")]
    Wait(#[source] std::io::Error),

    /// Output pipe was not captured
    #[error("subprocess {0} pipe unavailable")]
    MissingPipe(&'static str),
}

/// A fully built remote invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInvocation {
    program: String,
    args: Vec<String>,
}

impl RemoteInvocation {
    /// Build the ssh invocation running `command_args` on the board
    pub fn new(settings: &Settings, command_args: &str) -> Self {
        let remote_command = if command_args.trim().is_empty() {
            settings.remote_path.clone()
        } else {
            format!("{} {}", settings.remote_path, command_args.trim())
        };

        let mut args = Vec::with_capacity(SSH_OPTIONS.len() * 2 + 4);
        for option in SSH_OPTIONS {
            args.push("-o".to_string());
            args.push(option.to_string());
        }
        if let Some(key) = &settings.ssh_key {
            args.push("-i".to_string());
            args.push(key.clone());
        }
        args.push(format!("{}@{}", settings.remote_user, settings.remote_host));
        args.push(remote_command);

        Self {
            program: "ssh".to_string(),
            args,
        }
    }

    /// Run an arbitrary local program through the same streaming path
    pub fn local(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Program to execute
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Program arguments
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Shell-style rendering for logs
    pub fn display(&self) -> String {
        let mut text = self.program.clone();
        for arg in &self.args {
            text.push(' ');
            if arg.contains(char::is_whitespace) {
                text.push('\'');
                text.push_str(arg);
                text.push('\'');
            } else {
                text.push_str(arg);
            }
        }
        text
    }

    /// Run to completion, passing every output line to `on_line`
    ///
    /// Lines from stdout and stderr are delivered as they arrive. A non-zero
    /// exit adds a `LOG:` line with the status, which is returned either way.
    pub async fn run<F>(&self, mut on_line: F) -> Result<i32, RemoteError>
    where
        F: FnMut(&str),
    {
        info!("Running remote command: {}", self.display());

        let mut child = match Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to start {}: {}", self.program, e);
                on_line(&format!("LOG: ERROR - failed to start subprocess ({})", e));
                return Err(RemoteError::Spawn(e));
            }
        };

        let stdout = child.stdout.take().ok_or(RemoteError::MissingPipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(RemoteError::MissingPipe("stderr"))?;
        let mut stdout = BufReader::new(stdout);
        let mut stderr = BufReader::new(stderr);
        let (mut stdout_buf, mut stderr_buf) = (Vec::new(), Vec::new());
        let (mut stdout_open, mut stderr_open) = (true, true);

        // read_until keeps partial bytes in the buffer when the other branch wins
        while stdout_open || stderr_open {
            tokio::select! {
                read = stdout.read_until(b'\n', &mut stdout_buf), if stdout_open => {
                    stdout_open = forward_line(read, &mut stdout_buf, &mut on_line)?;
                }
                read = stderr.read_until(b'\n', &mut stderr_buf), if stderr_open => {
                    stderr_open = forward_line(read, &mut stderr_buf, &mut on_line)?;
                }
            }
        }

        let status = child.wait().await.map_err(RemoteError::Wait)?;
        let code = status.code().unwrap_or(-1);
        debug!("Remote command exited with {}", status);

        if code != 0 {
            on_line(&format!("LOG: Subprocess exited with status {}", code));
        }
        Ok(code)
    }
}

/// Hand one completed line to `on_line`; `Ok(false)` once the stream ends
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the stream.
fn forward_line<F>(
    read: std::io::Result<usize>,
    buf: &mut Vec<u8>,
    on_line: &mut F,
) -> Result<bool, RemoteError>
where
    F: FnMut(&str),
{
    let n = read.map_err(RemoteError::Read)?;
    if n == 0 && buf.is_empty() {
        return Ok(false);
    }

    let mut line = buf.as_slice();
    if let Some(rest) = line.strip_suffix(b"\n") {
        line = rest;
    }
    if let Some(rest) = line.strip_suffix(b"\r") {
        line = rest;
    }
    on_line(&String::from_utf8_lossy(line));
    buf.clear();
    // EOF may arrive right after a fragment left by a cancelled read
    Ok(n > 0)
}
