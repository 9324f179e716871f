//! External command execution.
//!
//! Checks never spawn processes directly. They describe a [`CommandSpec`]
//! and hand it to a [`CommandRunner`], so the sequencing logic can be
//! driven by a fake in tests.

use std::fmt;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::Error;

/// How the child's standard output is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Child writes straight to our terminal (long-running waits).
    Inherit,
    /// Stdout is collected as text, stderr is swallowed.
    Capture,
}

/// A single external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub output: OutputMode,
}

impl CommandSpec {
    /// Command whose stdout is captured.
    pub fn capture<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            output: OutputMode::Capture,
        }
    }

    /// Command that inherits our stdout/stderr.
    pub fn inherit<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output: OutputMode::Inherit,
            ..Self::capture(program, args)
        }
    }

    /// `sh -c <line>`, output inherited.
    pub fn shell(line: impl Into<String>) -> Self {
        Self::inherit("sh", ["-c".to_string(), line.into()])
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Quote an argument so the rendered line can be pasted into `sh`.
fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_=./:,@%+".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// What came back from a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the child was killed by a signal.
    pub status: Option<i32>,
    /// Captured stdout. Always empty for [`OutputMode::Inherit`].
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Capability to run an external command to completion.
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, Error>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner {
    inherited_to_stderr: bool,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the stdout of inherited commands at our stderr, leaving our
    /// stdout to the report alone.
    pub fn inherited_to_stderr(mut self) -> Self {
        self.inherited_to_stderr = true;
        self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, Error> {
        debug!(command = %spec, mode = ?spec.output, "Spawning command");

        let mut command = Command::new(&spec.program);
        command.args(&spec.args);

        let spawn_err = |source| Error::Spawn {
            program: spec.program.clone(),
            source,
        };

        let output = match spec.output {
            OutputMode::Inherit => {
                if self.inherited_to_stderr {
                    command.stdout(Stdio::from(std::io::stderr()));
                }
                let status = command.status().map_err(spawn_err)?;
                CommandOutput {
                    status: status.code(),
                    stdout: String::new(),
                }
            }
            OutputMode::Capture => {
                let output = command
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .output()
                    .map_err(spawn_err)?;
                CommandOutput {
                    status: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                }
            }
        };

        debug!(command = %spec, status = ?output.status, "Command finished");
        Ok(output)
    }
}
