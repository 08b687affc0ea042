//! Execution of the external analysis tool and capture of its diagnostic output.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{FfmovieError, Result};

/// Source of raw diagnostic output for a media file.
///
/// `Movie` talks to the analysis tool through this trait so tests can inject
/// canned output (and count invocations) instead of spawning processes.
pub trait MovieProber {
    /// Runs the analysis tool against `path` and returns the captured
    /// diagnostic bytes. Encoding is not guaranteed; see [`crate::text`].
    fn probe(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Default prober: runs `ffmpeg -i <path>` and captures stderr.
///
/// ffmpeg prints the stream descriptions on stderr and exits non-zero when
/// given an input with no output, so the exit status is deliberately not
/// treated as a failure signal here.
#[derive(Debug, Clone)]
pub struct FfmpegProber {
    binary: String,
}

impl Default for FfmpegProber {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegProber {
    pub fn new() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
        }
    }

    /// Uses an alternate binary name or path instead of `ffmpeg`.
    pub fn with_binary(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }
}

impl MovieProber for FfmpegProber {
    fn probe(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(FfmovieError::InputNotFound(path.to_path_buf()));
        }

        log::debug!("Running {} -i {}", self.binary, path.display());

        let mut child = Command::new(&self.binary)
            .arg("-i")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| FfmovieError::ToolUnavailable {
                tool: self.binary.clone(),
                source,
            })?;

        // Drain stderr to EOF before waiting. Waiting first can deadlock:
        // the child blocks once the pipe buffer fills.
        let mut output = Vec::new();
        let read_result = match child.stderr.take() {
            Some(mut stderr) => stderr.read_to_end(&mut output).map(|_| ()),
            None => Ok(()),
        };
        if read_result.is_err() {
            let _ = child.kill();
        }
        let wait_result = child.wait();
        read_result?;
        let status = wait_result?;

        log::trace!(
            "{} exited with {:?}, captured {} bytes of diagnostics",
            self.binary,
            status.code(),
            output.len()
        );
        Ok(output)
    }
}

/// Escapes a path for safe interpolation into quoted string contexts.
///
/// Backslashes, `</` sequences, quotes and line breaks are all escaped; any
/// flavor of line break collapses to a literal `\n` sequence.
pub fn escape_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '<' if chars.peek() == Some(&'/') => {
                chars.next();
                escaped.push_str("<\\/");
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            '\n' => escaped.push_str("\\n"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            _ => escaped.push(c),
        }
    }
    escaped
}
