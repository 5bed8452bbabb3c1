//! Execution boundary.
//!
//! The core hands generated source to a [`Sandbox`] and gets an
//! [`ExecutionResult`] back. Failures of any kind, including failing to start
//! the interpreter at all, are reported as data in `error`.

use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, warn};

/// Captured outcome of running a program.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionResult {
    pub stdout: String,
    /// Formatted error text, `None` when the program ran to completion.
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            error: None,
        }
    }

    pub fn failure(stdout: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs source text and captures what it printed.
pub trait Sandbox {
    fn execute(&self, source: &str) -> ExecutionResult;
}

impl<F> Sandbox for F
where
    F: Fn(&str) -> ExecutionResult,
{
    fn execute(&self, source: &str) -> ExecutionResult {
        self(source)
    }
}

/// Failure to drive the interpreter process itself.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("failed to start `{interpreter}`: {source}")]
    Spawn {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to send program to the interpreter: {0}")]
    Stdin(#[source] std::io::Error),
    #[error("failed to collect interpreter output: {0}")]
    Wait(#[source] std::io::Error),
}

/// Runs programs with an external Python interpreter.
///
/// The source is piped through stdin, so nothing is written to disk.
#[derive(Debug, Clone)]
pub struct PythonSandbox {
    interpreter: String,
    args: Vec<String>,
}

impl Default for PythonSandbox {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_owned(),
            args: vec!["-".to_owned()],
        }
    }
}

impl PythonSandbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different interpreter executable (default: `python3`).
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Replace the interpreter arguments (default: `-`, read from stdin).
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    fn run(&self, source: &str) -> Result<ExecutionResult, SandboxError> {
        let mut child = Command::new(&self.interpreter)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SandboxError::Spawn {
                interpreter: self.interpreter.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(source.as_bytes()) {
                drop(stdin);
                // Reap the child so it does not linger as a zombie.
                if let Err(kill_err) = child.kill() {
                    debug!(error = %kill_err, "interpreter already exited");
                }
                if let Err(wait_err) = child.wait() {
                    warn!(error = %wait_err, "failed to reap interpreter");
                }
                return Err(SandboxError::Stdin(err));
            }
        }

        let output = child.wait_with_output().map_err(SandboxError::Wait)?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if output.status.success() {
            Ok(ExecutionResult::success(stdout))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let error = match stderr.trim() {
                "" => format!("{} exited with {}", self.interpreter, output.status),
                text => text.to_owned(),
            };
            Ok(ExecutionResult::failure(stdout, error))
        }
    }
}

impl Sandbox for PythonSandbox {
    fn execute(&self, source: &str) -> ExecutionResult {
        match self.run(source) {
            Ok(result) => {
                debug!(
                    interpreter = %self.interpreter,
                    success = result.is_success(),
                    "program finished"
                );
                result
            }
            Err(err) => {
                warn!(error = %err, "sandbox could not run program");
                ExecutionResult::failure(String::new(), err.to_string())
            }
        }
    }
}
