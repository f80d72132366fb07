use super::{daemon_pattern, launcher_daemon_exe, BIN_NAME};
use crate::dirs::Layout;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonStop {
    Stopped,
    NotRunning,
    /// pkill missing or failed; uninstall continues
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Removed,
    NotFound,
    Failed(String),
}

#[derive(Debug)]
pub struct UninstallReport {
    pub daemon: DaemonStop,
    pub launcher: Removal,
    pub autostart: Removal,
}

/// Stop the daemon and remove its files; never fails on missing targets
pub fn uninstall(layout: &Layout) -> UninstallReport {
    uninstall_with(layout, stop_daemon)
}

pub fn uninstall_with<F>(layout: &Layout, stop: F) -> UninstallReport
where
    F: FnOnce(&str) -> DaemonStop,
{
    let launcher = layout.launcher();

    // Read the launcher before deleting it: its exec line names the daemon binary.
    let pattern = fs::read_to_string(&launcher)
        .ok()
        .and_then(|script| launcher_daemon_exe(&script))
        .map(|exe| daemon_pattern(&exe))
        .unwrap_or_else(|| format!(r"\b{} daemon --interval", BIN_NAME));
    debug!("Stopping daemon matching {:?}", pattern);

    UninstallReport {
        daemon: stop(&pattern),
        launcher: remove_file(&launcher),
        autostart: remove_file(&layout.autostart_entry()),
    }
}

/// `pkill -f <pattern>`: exit 0 killed something, exit 1 matched nothing
pub fn stop_daemon(pattern: &str) -> DaemonStop {
    if which::which("pkill").is_err() {
        return DaemonStop::Unavailable("pkill is not installed".to_string());
    }

    match Command::new("pkill").arg("-f").arg(pattern).status() {
        Ok(status) => match status.code() {
            Some(0) => DaemonStop::Stopped,
            Some(1) => DaemonStop::NotRunning,
            _ => DaemonStop::Unavailable(format!("pkill exited with {}", status)),
        },
        Err(e) => DaemonStop::Unavailable(e.to_string()),
    }
}

fn remove_file(path: &Path) -> Removal {
    match fs::remove_file(path) {
        Ok(()) => Removal::Removed,
        Err(e) if e.kind() == ErrorKind::NotFound => Removal::NotFound,
        Err(e) => {
            warn!("Could not remove {}: {}", path.display(), e);
            Removal::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::install;

    #[test]
    fn uninstall_with_nothing_installed_reports_not_found() {
        let home = tempfile::tempdir().unwrap();
        let layout = Layout::under(home.path());

        let mut seen = None;
        let report = uninstall_with(&layout, |pattern| {
            seen = Some(pattern.to_string());
            DaemonStop::NotRunning
        });

        assert_eq!(report.daemon, DaemonStop::NotRunning);
        assert_eq!(report.launcher, Removal::NotFound);
        assert_eq!(report.autostart, Removal::NotFound);
        assert_eq!(seen.as_deref(), Some(r"\bpactopac daemon --interval"));
    }

    #[test]
    fn uninstall_removes_installed_files_and_targets_launcher_exe() {
        let home = tempfile::tempdir().unwrap();
        let layout = Layout::under(home.path());
        install(&layout, Path::new("/opt/tools/pactopac"), 600).unwrap();

        let mut seen = None;
        let report = uninstall_with(&layout, |pattern| {
            seen = Some(pattern.to_string());
            DaemonStop::Stopped
        });

        assert_eq!(report.launcher, Removal::Removed);
        assert_eq!(report.autostart, Removal::Removed);
        assert!(!layout.launcher().exists());
        assert!(!layout.autostart_entry().exists());
        assert_eq!(seen.as_deref(), Some(r"/opt/tools/pactopac daemon --interval"));

        let again = uninstall_with(&layout, |_| DaemonStop::NotRunning);
        assert_eq!(again.launcher, Removal::NotFound);
        assert_eq!(again.autostart, Removal::NotFound);
    }
}
