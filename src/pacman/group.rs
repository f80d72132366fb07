//! Child processes that lead their own process group.

use crate::error::{PactopacError, Result};
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::process::ExitStatus;
use std::time::{Duration, Instant};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// How long a dropped group gets to disappear after SIGKILL
const GROUP_EXIT_TIMEOUT: Duration = Duration::from_secs(2);

/// A spawned child that leads its own process group.
///
/// Wrappers like `fakeroot` run the real command as a grandchild, so killing
/// the direct child leaves it running. Dropping the guard before the child
/// was waited for kills the whole group and blocks until it is gone.
struct ProcessGroup {
    child: Child,
    pgid: Pid,
    reaped: bool,
}

impl ProcessGroup {
    fn spawn(cmd: &mut Command, tool: &str) -> Result<Self> {
        let child = cmd
            .process_group(0)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PactopacError::from_spawn(tool, e))?;

        let pid = child
            .id()
            .ok_or_else(|| PactopacError::PacmanFailed(format!("{} exited before it was tracked", tool)))?;

        Ok(Self {
            child,
            pgid: Pid::from_raw(pid as i32),
            reaped: false,
        })
    }

    async fn wait(&mut self) -> Result<ExitStatus> {
        let status = self.child.wait().await?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        // Once reaped the pgid may belong to someone else.
        if self.reaped {
            return;
        }

        debug!("Killing process group {}", self.pgid);
        if let Err(e) = signal::killpg(self.pgid, Signal::SIGKILL) {
            if e != Errno::ESRCH {
                warn!("Could not kill process group {}: {}", self.pgid, e);
                return;
            }
        }

        let deadline = Instant::now() + GROUP_EXIT_TIMEOUT;
        loop {
            let _ = self.child.try_wait();
            if signal::killpg(self.pgid, None) == Err(Errno::ESRCH) {
                return;
            }
            if Instant::now() >= deadline {
                warn!("Process group {} still present after SIGKILL", self.pgid);
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}

/// Run `cmd` in a new process group and wait for it.
///
/// If the returned future is dropped early, every process in the group is
/// killed before the drop completes.
pub async fn run_in_group(cmd: &mut Command, tool: &str) -> Result<ExitStatus> {
    let mut group = ProcessGroup::spawn(cmd, tool)?;
    group.wait().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exit_status_is_returned() {
        let status = run_in_group(Command::new("sh").args(["-c", "exit 3"]), "sh")
            .await
            .unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[tokio::test]
    async fn missing_program_is_tool_missing() {
        let err = run_in_group(&mut Command::new("pactopac-no-such-tool"), "pactopac-no-such-tool")
            .await
            .unwrap_err();
        assert!(matches!(err, PactopacError::ToolMissing(tool) if tool == "pactopac-no-such-tool"));
    }

    #[tokio::test]
    async fn dropping_kills_grandchildren() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("late");

        // The subshell is a grandchild; killing only `sh` would leave it running.
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("(sleep 0.5; mkdir -p \"$0\") & wait").arg(&marker);

        let result = tokio::time::timeout(Duration::from_millis(100), run_in_group(&mut cmd, "sh")).await;
        assert!(result.is_err());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!marker.exists());
    }
}
