//! Clipboard export.
//!
//! Text is piped into a clipboard command's stdin: the configured one, or the
//! platform default (`pbcopy`, `clip`, `wl-copy`, `xclip`). Copying is
//! best-effort; callers report failures and carry on.

use crate::config::ClipboardConfig;
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

pub struct Clipboard {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Clipboard {
    pub fn from_config(config: &ClipboardConfig) -> Result<Self> {
        let argv = match &config.command {
            Some(command) => shell_words::split(command)
                .with_context(|| format!("Invalid clipboard command: {}", command))?,
            None => default_command(),
        };

        let Some((program, args)) = argv.split_first() else {
            bail!("Clipboard command is empty");
        };

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout: config.timeout(),
        })
    }

    /// The command line used for copying
    pub fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| shell_words::quote(part).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Pipe `text` into the clipboard command and wait for it to finish
    pub fn copy(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn clipboard command: {}", self.program))?;

        {
            let mut stdin = child
                .stdin
                .take()
                .context("Failed to open clipboard command stdin")?;
            stdin
                .write_all(text.as_bytes())
                .context("Failed to write to clipboard command")?;
            // stdin is closed here so the command sees EOF
        }

        match child.wait_timeout(self.timeout)? {
            Some(status) if status.success() => {
                tracing::debug!(command = %self.describe(), bytes = text.len(), "copied to clipboard");
                Ok(())
            }
            Some(status) => bail!("Clipboard command '{}' failed: {}", self.program, status),
            None => {
                let _ = child.kill();
                let _ = child.wait();
                bail!(
                    "Clipboard command '{}' timed out after {}ms",
                    self.program,
                    self.timeout.as_millis()
                )
            }
        }
    }
}

fn default_command() -> Vec<String> {
    let argv: &[&str] = if cfg!(target_os = "macos") {
        &["pbcopy"]
    } else if cfg!(windows) {
        &["clip"]
    } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        &["wl-copy"]
    } else {
        &["xclip", "-selection", "clipboard"]
    };
    argv.iter().map(|s| s.to_string()).collect()
}
