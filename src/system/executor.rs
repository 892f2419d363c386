// src/system/executor.rs

use crate::{CancellationToken, models::Invocation};
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use std::sync::atomic::Ordering;
use std::time::Duration;
use thiserror::Error;

/// Interval between two checks of a running child.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("No program specified to run.")]
    EmptyProgram,
    #[error("Program '{program}' could not be started: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Program '{program}' exited with code {code}.")]
    Exit { program: String, code: i32 },
    #[error("Failed while waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Operation was cancelled by the user.")]
    Cancelled,
}

impl ExecutionError {
    /// The child's exit code, for [`ExecutionError::Exit`] only.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecutionError::Exit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Where the child's standard streams go. Defaults to the caller's own.
#[derive(Debug)]
pub struct Streams {
    pub stdin: Stdio,
    pub stdout: Stdio,
    pub stderr: Stdio,
}

impl Default for Streams {
    fn default() -> Self {
        Self::inherit()
    }
}

impl Streams {
    pub fn inherit() -> Self {
        Self {
            stdin: Stdio::inherit(),
            stdout: Stdio::inherit(),
            stderr: Stdio::inherit(),
        }
    }

    pub fn stdin(mut self, stdin: impl Into<Stdio>) -> Self {
        self.stdin = stdin.into();
        self
    }

    pub fn stdout(mut self, stdout: impl Into<Stdio>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn stderr(mut self, stderr: impl Into<Stdio>) -> Self {
        self.stderr = stderr.into();
        self
    }
}

/// Runs `invocation` to completion on the calling thread.
///
/// The child sees exactly `invocation.env` and nothing else. It is polled
/// rather than waited on so that setting `cancellation_token` kills it and
/// returns [`ExecutionError::Cancelled`] instead of blocking.
pub fn execute(
    invocation: &Invocation,
    streams: Streams,
    cancellation_token: &CancellationToken,
) -> Result<(), ExecutionError> {
    let program = invocation.program.as_str();
    if program.trim().is_empty() {
        return Err(ExecutionError::EmptyProgram);
    }
    if cancellation_token.load(Ordering::SeqCst) {
        return Err(ExecutionError::Cancelled);
    }

    let mut command = StdCommand::new(program);
    command
        .args(&invocation.args)
        .env_clear()
        .envs(invocation.env.iter().map(|(k, v)| (k, v)))
        .stdin(streams.stdin)
        .stdout(streams.stdout)
        .stderr(streams.stderr);

    log::debug!("Spawning '{}' with {} argument(s).", program, invocation.args.len());
    let mut child = command.spawn().map_err(|e| ExecutionError::Spawn {
        program: program.to_string(),
        source: e,
    })?;

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                log::debug!("'{}' finished with {}.", program, status);
                return match status_code(status) {
                    0 => Ok(()),
                    code => Err(ExecutionError::Exit {
                        program: program.to_string(),
                        code,
                    }),
                };
            }
            Ok(None) => {
                if cancellation_token.load(Ordering::SeqCst) {
                    log::debug!(
                        "Cancellation requested, killing child process (PID: {})...",
                        child.id()
                    );
                    if let Err(e) = child.kill() {
                        log::warn!("Failed to kill child process {}: {}", child.id(), e);
                    }
                    child.wait().ok();
                    return Err(ExecutionError::Cancelled);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(ExecutionError::Wait {
                    program: program.to_string(),
                    source: e,
                });
            }
        }
    }
}

/// Maps an exit status onto the code a shell would report.
/// A child terminated by signal `n` reports `128 + n`.
fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use std::thread;
    use std::time::Instant;
    use tempfile::NamedTempFile;

    fn sh(script: &str) -> Invocation {
        Invocation {
            program: "sh".to_string(),
            args: vec![OsString::from("-c"), OsString::from(script)],
            env: std::env::vars_os().collect(),
        }
    }

    fn token() -> CancellationToken {
        Arc::new(AtomicBool::new(false))
    }

    fn quiet() -> Streams {
        Streams::inherit()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
    }

    #[test]
    fn test_success_is_ok() {
        assert!(execute(&sh("exit 0"), quiet(), &token()).is_ok());
    }

    #[test]
    fn test_exit_code_is_preserved() {
        let err = execute(&sh("exit 42"), quiet(), &token()).unwrap_err();
        assert!(matches!(err, ExecutionError::Exit { code: 42, .. }));
        assert_eq!(err.exit_code(), Some(42));
    }

    #[test]
    fn test_missing_program_is_a_spawn_error() {
        let invocation = Invocation {
            program: "sidetable-definitely-not-a-real-program".to_string(),
            args: vec![],
            env: std::env::vars_os().collect(),
        };
        let err = execute(&invocation, quiet(), &token()).unwrap_err();
        assert!(matches!(err, ExecutionError::Spawn { .. }));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_empty_program_is_rejected() {
        let invocation = Invocation {
            program: " ".to_string(),
            args: vec![],
            env: vec![],
        };
        assert!(matches!(
            execute(&invocation, quiet(), &token()),
            Err(ExecutionError::EmptyProgram)
        ));
    }

    #[test]
    fn test_child_sees_exactly_the_given_environment() {
        let output = NamedTempFile::new().unwrap();
        let mut invocation = sh("printf '%s' \"$SIDETABLE_TEST_VALUE\"");
        invocation.env.push((
            OsString::from("SIDETABLE_TEST_VALUE"),
            OsString::from("from-invocation"),
        ));

        let file = output.reopen().unwrap();
        execute(&invocation, quiet().stdout(file), &token()).unwrap();
        assert_eq!(fs::read_to_string(output.path()).unwrap(), "from-invocation");
    }

    #[test]
    fn test_cancellation_kills_the_child() {
        let cancel = token();
        let trigger = cancel.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            trigger.store(true, Ordering::SeqCst);
        });

        let started = Instant::now();
        let result = execute(&sh("sleep 30"), quiet(), &cancel);
        handle.join().unwrap();

        assert!(matches!(result, Err(ExecutionError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_already_cancelled_token_does_not_spawn() {
        let cancel = token();
        cancel.store(true, Ordering::SeqCst);
        assert!(matches!(
            execute(&sh("exit 0"), quiet(), &cancel),
            Err(ExecutionError::Cancelled)
        ));
    }

    #[test]
    fn test_non_utf8_arguments_reach_the_child() {
        use std::os::unix::ffi::OsStrExt;

        let output = NamedTempFile::new().unwrap();
        let mut invocation = sh("printf '%s' \"$1\"");
        invocation.args.push(OsString::from("sh"));
        invocation
            .args
            .push(std::ffi::OsStr::from_bytes(b"file\xff.txt").to_os_string());

        let file = output.reopen().unwrap();
        execute(&invocation, quiet().stdout(file), &token()).unwrap();
        assert_eq!(fs::read(output.path()).unwrap(), b"file\xff.txt");
    }

    #[test]
    fn test_signal_maps_to_128_plus_signal() {
        let err = execute(&sh("kill -TERM $$"), quiet(), &token()).unwrap_err();
        assert_eq!(err.exit_code(), Some(128 + 15));
    }
}
