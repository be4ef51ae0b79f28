//! External tool transport.
//!
//! Provides a trait-based transport layer so that the real ratbagctl binary
//! and canned test responses share the same interface. Responses are returned
//! verbatim; trimming and pattern matching belong to the callers.

use crate::error::{Error, Result};
use crate::request::ToolRequest;
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, trace, warn};
use wait_timeout::ChildExt;

/// Default program name of the device-configuration client.
pub const DEFAULT_PROGRAM: &str = "ratbagctl";

/// Default upper bound on a single tool invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Abstraction over running the configuration tool.
pub trait RatbagTool {
    /// Run the tool with `args` and return its decoded standard output.
    fn run(&self, args: &[String]) -> Result<String>;
}

impl<T: RatbagTool + ?Sized> RatbagTool for &T {
    fn run(&self, args: &[String]) -> Result<String> {
        (**self).run(args)
    }
}

/// Issue a typed request through a tool.
pub fn tool_request(tool: &dyn RatbagTool, req: &ToolRequest<'_>) -> Result<String> {
    let args = req.args();
    debug!(command = %req, "tool TX");
    let out = tool.run(&args)?;
    trace!(command = %req, output = %out.trim_end(), "tool RX");
    Ok(out)
}

/// Runs the real program as a subprocess, one process per call, no retries.
#[derive(Debug, Clone)]
pub struct Ratbagctl {
    program: String,
    timeout: Duration,
}

impl Default for Ratbagctl {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_TIMEOUT)
    }
}

impl Ratbagctl {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn describe(&self, args: &[String]) -> String {
        let mut words = Vec::with_capacity(args.len() + 1);
        words.push(self.program.as_str());
        words.extend(args.iter().map(String::as_str));
        words.join(" ")
    }
}

impl RatbagTool for Ratbagctl {
    fn run(&self, args: &[String]) -> Result<String> {
        let command = self.describe(args);
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::ToolUnavailable {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        // Drain both pipes on their own threads so a chatty child cannot
        // block on a full pipe while we wait for its exit.
        let stdout = child.stdout.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                pipe.read_to_end(&mut buf).map(|_| buf)
            })
        });
        let stderr = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                buf
            })
        });

        let status = match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                warn!(command = %command, timeout = ?self.timeout, "killing hung tool");
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Timeout {
                    command,
                    after: self.timeout,
                });
            }
            Err(e) => {
                return Err(Error::ToolUnavailable {
                    program: self.program.clone(),
                    reason: format!("wait failed: {e}"),
                })
            }
        };

        let stderr_text = stderr
            .and_then(|h| h.join().ok())
            .map(|buf| String::from_utf8_lossy(&buf).trim().to_string())
            .unwrap_or_default();

        if !status.success() {
            debug!(command = %command, %status, stderr = %stderr_text, "tool exited non-zero");
            return Err(Error::ToolFailed {
                command,
                status: status.to_string(),
            });
        }

        let stdout_bytes = match stdout.map(|h| h.join()) {
            Some(Ok(Ok(buf))) => buf,
            Some(Ok(Err(e))) => {
                return Err(Error::ToolUnavailable {
                    program: self.program.clone(),
                    reason: format!("reading stdout: {e}"),
                })
            }
            Some(Err(_)) | None => Vec::new(),
        };
        if !stderr_text.is_empty() {
            trace!(command = %command, stderr = %stderr_text, "tool stderr");
        }
        Ok(String::from_utf8_lossy(&stdout_bytes).into_owned())
    }
}
