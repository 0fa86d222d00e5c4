//! Process-group teardown.
//!
//! Children are spawned as leaders of their own process group so that
//! everything they start (compilers, git, shells) can be signalled at once.

use tokio::process::Command;

/// Make the spawned child the leader of a fresh process group.
pub fn isolate(command: &mut Command) -> &mut Command {
    #[cfg(unix)]
    command.process_group(0);
    command
}

/// SIGKILL every process left in the group led by `pgid`.
///
/// A group that is already empty is not an error.
#[cfg(unix)]
pub fn kill_group(pgid: u32) -> std::io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let pgid = i32::try_from(pgid).map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "pgid out of range")
    })?;
    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(std::io::Error::other(e)),
    }
}

/// Without process groups only the direct child can be killed.
#[cfg(not(unix))]
pub fn kill_group(_pgid: u32) -> std::io::Result<()> {
    Ok(())
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;
    use std::process::Stdio;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, BufReader};

    /// Alive and not a zombie, per `/proc/<pid>/stat`.
    fn is_running(pid: u32) -> bool {
        std::fs::read_to_string(format!("/proc/{pid}/stat")).is_ok_and(|stat| {
            stat.rsplit(')')
                .next()
                .is_some_and(|rest| !rest.trim_start().starts_with('Z'))
        })
    }

    #[tokio::test]
    async fn test_kill_group_reaches_grandchildren() {
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg("sleep 30 & echo $!; wait")
            .stdout(Stdio::piped());
        let mut child = isolate(&mut command).spawn().unwrap();
        let pgid = child.id().unwrap();

        let stdout = child.stdout.take().unwrap();
        let line = BufReader::new(stdout).lines().next_line().await.unwrap().unwrap();
        let grandchild: u32 = line.trim().parse().unwrap();
        assert!(is_running(grandchild));

        kill_group(pgid).unwrap();
        let status = child.wait().await.unwrap();
        assert!(!status.success());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!is_running(grandchild));
    }

    #[test]
    fn test_kill_empty_group_is_ok() {
        // Far above any pid_max, so the group cannot exist
        assert!(kill_group(0x3fff_fff0).is_ok());
    }
}
