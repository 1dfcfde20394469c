//! Run kubectl with a bounded timeout.
//!
//! Every external invocation in the crate goes through [`Kubectl::run`]:
//! stdout and stderr are captured separately, and a process group that
//! outlives its timeout is killed and reaped before the error is returned.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::config::types::KobsConfig;
use crate::error::{KobsError, Result};

use super::command::{CommandLine, Resolver};

/// Captured result of one finished invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Exit code; `None` when the process was ended by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Invocation {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Turn a non-zero exit into `CommandFailed`.
    pub fn into_stdout(self, command: &CommandLine) -> Result<String> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(KobsError::CommandFailed {
                command: command.to_string(),
                status: self.status,
                stderr: self.stderr,
            })
        }
    }
}

/// Handle on the kubectl binary plus the arguments every call carries.
#[derive(Debug, Clone)]
pub struct Kubectl {
    resolver: Resolver,
}

impl Kubectl {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    pub fn from_config(cfg: &KobsConfig) -> Self {
        Self::new(Resolver::new(
            &cfg.kubectl.binary,
            cfg.kubectl.global_args(),
            cfg.logs.tail_lines,
        ))
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Run `kubectl <args>` and return stdout, failing on non-zero exit.
    pub async fn output(&self, args: &[&str], timeout: Duration) -> Result<String> {
        let command = self.resolver.literal(args);
        self.run(&command, timeout).await?.into_stdout(&command)
    }

    /// Execute a resolved command line.
    ///
    /// The timeout covers the exit and both pipes reaching EOF, so a
    /// descendant holding stdout open cannot stretch the call. kubectl runs in
    /// its own process group and the whole group is killed on expiry.
    pub async fn run(&self, command: &CommandLine, timeout: Duration) -> Result<Invocation> {
        let started = Instant::now();
        tracing::debug!(command = %command, timeout_secs = timeout.as_secs(), "exec");

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(|source| KobsError::Spawn {
            program: command.program.display().to_string(),
            source,
        })?;
        let pid = child.id();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let finished = tokio::time::timeout(timeout, async {
            let (status, stdout, stderr) =
                tokio::join!(child.wait(), read_pipe(stdout), read_pipe(stderr));
            status.map(|status| (status, stdout, stderr))
        })
        .await;

        let (status, stdout, stderr) = match finished {
            Ok(result) => result.map_err(|source| KobsError::Spawn {
                program: command.program.display().to_string(),
                source,
            })?,
            Err(_) => {
                if let Some(pid) = pid {
                    kill_group(pid);
                }
                if let Err(e) = child.start_kill() {
                    tracing::debug!(command = %command, error = %e, "child already exited");
                }
                if let Err(e) = child.wait().await {
                    tracing::warn!(command = %command, error = %e, "failed to reap timed-out process");
                }
                tracing::warn!(command = %command, timeout_secs = timeout.as_secs(), "exec timed out");
                return Err(KobsError::Timeout {
                    command: command.to_string(),
                    seconds: timeout.as_secs(),
                });
            }
        };

        let invocation = Invocation {
            status: status.code(),
            stdout,
            stderr,
        };

        tracing::debug!(
            command = %command,
            status = ?invocation.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "exec finished"
        );
        Ok(invocation)
    }
}

async fn read_pipe<R>(pipe: Option<R>) -> String
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        if let Err(e) = pipe.read_to_end(&mut buf).await {
            tracing::debug!(error = %e, "pipe read failed");
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// SIGKILL every process in the group led by `pid`.
#[cfg(unix)]
fn kill_group(pid: u32) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        tracing::debug!(pgid = raw, error = %e, "killpg failed");
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: u32) {}
