use std::fmt;
use std::process::{Command, Stdio};

use serde::Serialize;
use tracing::warn;

use crate::error::StrainError;

/// A command line, either handed to the shell or executed directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    Shell(String),
    Argv(Vec<String>),
}

impl CommandSpec {
    pub fn shell(line: impl Into<String>) -> Self {
        CommandSpec::Shell(line.into())
    }

    pub fn argv<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::Argv(args.into_iter().map(Into::into).collect())
    }

    fn build(&self) -> Result<Command, StrainError> {
        let (program, args) = match self {
            CommandSpec::Shell(line) if cfg!(windows) => {
                let mut parts = line.split_whitespace().map(str::to_string);
                let program = parts.next().ok_or(StrainError::EmptyCommand)?;
                (program, parts.collect::<Vec<_>>())
            }
            CommandSpec::Shell(line) => ("sh".to_string(), vec!["-c".to_string(), line.clone()]),
            CommandSpec::Argv(args) => {
                let (program, rest) = args.split_first().ok_or(StrainError::EmptyCommand)?;
                (program.clone(), rest.to_vec())
            }
        };
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        Ok(cmd)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSpec::Shell(line) => write!(f, "{line}"),
            CommandSpec::Argv(args) => write!(f, "{}", args.join(" ")),
        }
    }
}

impl From<&str> for CommandSpec {
    fn from(line: &str) -> Self {
        CommandSpec::shell(line)
    }
}

impl From<Vec<String>> for CommandSpec {
    fn from(args: Vec<String>) -> Self {
        CommandSpec::Argv(args)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs the command to completion and hands back its exit code and streams.
pub fn capture_command(spec: &CommandSpec) -> Result<CommandOutput, StrainError> {
    let output = spec.build()?.output()?;
    Ok(CommandOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Runs the command and reports whether it exited with status zero.
///
/// Failures are logged unless `ignore_errors` is set; they are never raised.
pub fn run_command(spec: impl Into<CommandSpec>, ignore_errors: bool) -> bool {
    let spec = spec.into();
    match capture_command(&spec) {
        Ok(output) if output.success() => true,
        Ok(output) => {
            if !ignore_errors {
                let code = output
                    .code
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                warn!(
                    command = %spec,
                    code = %code,
                    stderr = %output.stderr.trim(),
                    "command failed"
                );
            }
            false
        }
        Err(err) => {
            if !ignore_errors {
                warn!(command = %spec, "command could not be started: {err}");
            }
            false
        }
    }
}
