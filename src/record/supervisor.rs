//! Spawning and draining the program under test.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::record::error::RecordError;
use crate::record::interceptor::InputInterceptor;

/// A fully specified invocation: the program under test plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Build from the raw word list handed over by the CLI.
    ///
    /// An empty list is a usage error: there is nothing to run.
    pub fn new(words: Vec<String>) -> Result<Self, RecordError> {
        let mut words = words.into_iter();
        let program = words.next().ok_or(RecordError::EmptyCommand)?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }
}

/// Everything captured from one completed run of the program under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCapture {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run `command` in `workdir` with its stdin wired to `interceptor` and
/// stdout/stderr captured in memory, blocking until the process exits.
///
/// Failing to resolve or start the executable is fatal and happens before
/// any filesystem mutation. A non-zero exit is data, not an error.
pub async fn run(
    command: &CommandLine,
    workdir: &Path,
    interceptor: &mut InputInterceptor,
) -> Result<ProcessCapture, RecordError> {
    let program = resolve(&command.program, workdir)?;

    let mut cmd = Command::new(&program);
    cmd.args(&command.args);
    cmd.current_dir(workdir);
    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| RecordError::Spawn {
        program: command.program.clone(),
        source,
    })?;

    let stdin = child.stdin.take().ok_or_else(|| RecordError::Spawn {
        program: command.program.clone(),
        source: io::Error::other("failed to capture stdin"),
    })?;
    interceptor.attach(stdin);

    let output = child.wait_with_output().await?;

    Ok(ProcessCapture {
        exit_code: exit_code_of(&output.status),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

fn resolve(program: &str, workdir: &Path) -> Result<PathBuf, RecordError> {
    which::which_in(program, std::env::var_os("PATH"), workdir).map_err(|err| {
        RecordError::Spawn {
            program: program.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, err),
        }
    })
}

/// Exit status as the integer the recipe stores. On unix a signal death
/// maps to the negated signal number.
fn exit_code_of(status: &std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    status.code().unwrap_or(-1)
}
