use super::group::run_in_group;
use crate::error::{PactopacError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, warn};

/// Prefix of every snapshot directory created under the temp root
pub const SNAPSHOT_PREFIX: &str = "pactopac-db.";

/// A disposable copy of the pacman database used to look for upgrades.
///
/// `local/` is a symlink to the live database and is only ever read.
/// `sync/` starts as a copy of the live sync databases so pacman only has to
/// download what changed. Dropping the value removes the directory; the
/// symlink is unlinked, never followed.
#[derive(Debug)]
pub struct DbSnapshot {
    dir: TempDir,
}

impl DbSnapshot {
    /// Snapshot `live_db` into a fresh directory under the system temp dir
    pub fn create(live_db: &Path) -> Result<Self> {
        Self::create_in(live_db, &std::env::temp_dir())
    }

    pub fn create_in(live_db: &Path, tmp_root: &Path) -> Result<Self> {
        let local = live_db.join("local");
        if !local.is_dir() {
            return Err(PactopacError::PacmanFailed(format!(
                "No local database at {}",
                local.display()
            )));
        }

        let dir = tempfile::Builder::new()
            .prefix(SNAPSHOT_PREFIX)
            .tempdir_in(tmp_root)?;

        std::os::unix::fs::symlink(&local, dir.path().join("local"))?;

        let sync = dir.path().join("sync");
        fs::create_dir(&sync)?;
        seed_sync_databases(&live_db.join("sync"), &sync);

        debug!("Created database snapshot at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Refresh the snapshot's sync databases without root.
    ///
    /// Runs `fakeroot -- pacman -Sy --dbpath <snapshot> --logfile /dev/null`
    /// with all output discarded. pacman runs as a grandchild of `fakeroot`,
    /// so the pair is started in its own process group and killed as one.
    pub async fn sync(&self) -> Result<()> {
        let mut cmd = Command::new("fakeroot");
        cmd.args(["--", "pacman", "-Sy", "--dbpath"])
            .arg(self.path())
            .args(["--logfile", "/dev/null"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let status = run_in_group(&mut cmd, "fakeroot").await?;
        sync_result(status.code())
    }

    /// Raw `pacman -Qu` output against the snapshot
    pub async fn query_upgrades(&self) -> Result<String> {
        let output = Command::new("pacman")
            .args(["-Qu", "--dbpath"])
            .arg(self.path())
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| PactopacError::from_spawn("pacman", e))?;

        upgrade_output(output.status.code(), &String::from_utf8_lossy(&output.stdout))
    }
}

fn sync_result(code: Option<i32>) -> Result<()> {
    match code {
        Some(0) => Ok(()),
        Some(code) => Err(PactopacError::PacmanFailed(format!("Snapshot sync exited with {}", code))),
        None => Err(PactopacError::PacmanFailed("Snapshot sync was killed by a signal".to_string())),
    }
}

/// Map `pacman -Qu` exit status and stdout to the pending-upgrade list.
///
/// pacman exits 1 when nothing is upgradable, which is not a failure.
fn upgrade_output(code: Option<i32>, stdout: &str) -> Result<String> {
    match code {
        Some(0) => Ok(stdout.to_string()),
        Some(1) if stdout.trim().is_empty() => Ok(String::new()),
        Some(code) => Err(PactopacError::PacmanFailed(format!("Upgrade query exited with {}", code))),
        None => Err(PactopacError::PacmanFailed("Upgrade query was killed by a signal".to_string())),
    }
}

fn seed_sync_databases(live_sync: &Path, target: &Path) {
    let entries = match fs::read_dir(live_sync) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("No sync databases to seed from {}: {}", live_sync.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "db") {
            if let Err(e) = fs::copy(&path, target.join(entry.file_name())) {
                debug!("Skipping {}: {}", path.display(), e);
            }
        }
    }
}

/// Remove snapshot directories older than `max_age` left behind in `tmp_root`.
///
/// Only a SIGKILL can leave one behind.
pub fn sweep_stale(tmp_root: &Path, max_age: Duration) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    let Ok(entries) = fs::read_dir(tmp_root) else {
        return removed;
    };

    let now = SystemTime::now();

    for entry in entries.flatten() {
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(SNAPSHOT_PREFIX) {
            continue;
        }

        let Ok(meta) = fs::symlink_metadata(entry.path()) else {
            continue;
        };
        if !meta.is_dir() {
            continue;
        }

        let age = meta
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();

        if age < max_age {
            continue;
        }

        let path = entry.path();
        match fs::remove_dir_all(&path) {
            Ok(()) => removed.push(path),
            Err(e) => warn!("Could not remove stale snapshot {}: {}", path.display(), e),
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_live_db() -> TempDir {
        let live = tempfile::tempdir().unwrap();
        fs::create_dir_all(live.path().join("local").join("bash-5.2-1")).unwrap();
        fs::create_dir_all(live.path().join("sync")).unwrap();
        fs::write(live.path().join("sync").join("core.db"), b"core").unwrap();
        fs::write(live.path().join("sync").join("core.files"), b"files").unwrap();
        live
    }

    #[test]
    fn snapshot_links_local_and_copies_sync_dbs() {
        let live = fake_live_db();
        let tmp = tempfile::tempdir().unwrap();

        let snapshot = DbSnapshot::create_in(live.path(), tmp.path()).unwrap();
        let local = snapshot.path().join("local");

        assert!(fs::symlink_metadata(&local).unwrap().file_type().is_symlink());
        assert!(local.join("bash-5.2-1").is_dir());
        assert_eq!(fs::read(snapshot.path().join("sync").join("core.db")).unwrap(), b"core");
        assert!(!snapshot.path().join("sync").join("core.files").exists());
        assert!(snapshot
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(SNAPSHOT_PREFIX));
    }

    #[test]
    fn drop_removes_directory_but_not_live_db() {
        let live = fake_live_db();
        let tmp = tempfile::tempdir().unwrap();

        let snapshot = DbSnapshot::create_in(live.path(), tmp.path()).unwrap();
        let path = snapshot.path().to_path_buf();
        assert!(path.exists());

        drop(snapshot);

        assert!(!path.exists());
        assert!(live.path().join("local").join("bash-5.2-1").is_dir());
        assert!(live.path().join("sync").join("core.db").is_file());
    }

    #[tokio::test]
    async fn cancelled_cycle_removes_directory() {
        let live = fake_live_db();
        let tmp = tempfile::tempdir().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();

        let live_path = live.path().to_path_buf();
        let tmp_path = tmp.path().to_path_buf();
        let cycle = async move {
            let snapshot = DbSnapshot::create_in(&live_path, &tmp_path).unwrap();
            let _ = tx.send(snapshot.path().to_path_buf());
            tokio::time::sleep(Duration::from_secs(3600)).await;
        };

        let handle = tokio::spawn(cycle);
        let path = rx.await.unwrap();
        assert!(path.exists());

        handle.abort();
        let _ = handle.await;

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn cancelled_sync_leaves_nothing_behind() {
        let live = fake_live_db();
        let tmp = tempfile::tempdir().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();

        let live_path = live.path().to_path_buf();
        let tmp_path = tmp.path().to_path_buf();
        let cycle = async move {
            let snapshot = DbSnapshot::create_in(&live_path, &tmp_path).unwrap();
            let _ = tx.send(snapshot.path().to_path_buf());

            // A wrapper whose grandchild writes into the snapshot late, like
            // pacman running under fakeroot.
            let mut cmd = Command::new("sh");
            cmd.arg("-c")
                .arg("(sleep 0.5; mkdir -p \"$0/sync\"; echo x > \"$0/sync/core.db.part\") & wait")
                .arg(snapshot.path());
            let _ = run_in_group(&mut cmd, "sh").await;
        };

        let shutdown = async {
            let path = rx.await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            path
        };

        let (path_tx, path_rx) = tokio::sync::oneshot::channel();
        crate::checker::daemon::run_until(cycle, async move {
            let _ = path_tx.send(shutdown.await);
        })
        .await;
        let path = path_rx.await.unwrap();

        assert!(!path.exists());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!path.exists());
        assert!(live.path().join("local").join("bash-5.2-1").is_dir());
    }

    #[test]
    fn sync_exit_codes() {
        assert!(sync_result(Some(0)).is_ok());
        assert!(sync_result(Some(1)).is_err());
        assert!(sync_result(None).is_err());
    }

    #[test]
    fn query_exit_codes() {
        let listing = "linux 6.9.1-1 -> 6.9.2-1\n";
        assert_eq!(upgrade_output(Some(0), listing).unwrap(), listing);
        assert_eq!(upgrade_output(Some(0), "").unwrap(), "");
        assert_eq!(upgrade_output(Some(1), "").unwrap(), "");
        assert_eq!(upgrade_output(Some(1), "  \n").unwrap(), "");
        assert!(upgrade_output(Some(1), listing).is_err());
        assert!(upgrade_output(Some(2), "").is_err());
        assert!(upgrade_output(None, "").is_err());
    }

    #[test]
    fn missing_local_db_is_an_error() {
        let live = tempfile::tempdir().unwrap();
        let tmp = tempfile::tempdir().unwrap();

        assert!(DbSnapshot::create_in(live.path(), tmp.path()).is_err());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn sweep_only_touches_old_snapshot_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let stale = tmp.path().join(format!("{}abc123", SNAPSHOT_PREFIX));
        let other = tmp.path().join("unrelated");
        fs::create_dir(&stale).unwrap();
        fs::create_dir(&other).unwrap();

        assert!(sweep_stale(tmp.path(), Duration::from_secs(3600)).is_empty());
        assert!(stale.exists());

        let removed = sweep_stale(tmp.path(), Duration::ZERO);
        assert_eq!(removed, vec![stale.clone()]);
        assert!(!stale.exists());
        assert!(other.exists());
    }
}
