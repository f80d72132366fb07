use super::{autostart_entry, launcher_script};
use crate::dirs::Layout;
use crate::error::Result;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug)]
pub struct InstallReport {
    pub launcher: PathBuf,
    pub autostart: PathBuf,
    /// A previous installation was overwritten
    pub replaced: bool,
}

/// Write the launcher and autostart entry, overwriting any previous copy.
///
/// Does not start the daemon.
pub fn install(layout: &Layout, exe: &Path, interval_secs: u64) -> Result<InstallReport> {
    let launcher = layout.launcher();
    let autostart = layout.autostart_entry();
    let replaced = launcher.exists() || autostart.exists();

    fs::create_dir_all(&layout.bin_dir)?;
    fs::create_dir_all(&layout.autostart_dir)?;

    fs::write(&launcher, launcher_script(exe, interval_secs))?;
    fs::set_permissions(&launcher, fs::Permissions::from_mode(0o755))?;
    debug!("Wrote launcher {}", launcher.display());

    fs::write(&autostart, autostart_entry(&launcher))?;
    debug!("Wrote autostart entry {}", autostart.display());

    info!(interval_secs, replaced, "Update checker installed");

    Ok(InstallReport {
        launcher,
        autostart,
        replaced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_creates_executable_launcher_and_entry() {
        let home = tempfile::tempdir().unwrap();
        let layout = Layout::under(home.path());

        let report = install(&layout, Path::new("/usr/bin/pactopac"), 3600).unwrap();

        assert!(!report.replaced);
        let mode = fs::metadata(&report.launcher).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert!(fs::read_to_string(&report.launcher)
            .unwrap()
            .contains("exec '/usr/bin/pactopac' daemon --interval 3600"));
        assert!(fs::read_to_string(&report.autostart)
            .unwrap()
            .contains(&format!("Exec={}", report.launcher.display())));
    }

    #[test]
    fn install_twice_leaves_one_copy_of_each() {
        let home = tempfile::tempdir().unwrap();
        let layout = Layout::under(home.path());

        install(&layout, Path::new("/usr/bin/pactopac"), 3600).unwrap();
        let second = install(&layout, Path::new("/usr/bin/pactopac"), 7200).unwrap();

        assert!(second.replaced);
        assert_eq!(fs::read_dir(&layout.bin_dir).unwrap().count(), 1);
        assert_eq!(fs::read_dir(&layout.autostart_dir).unwrap().count(), 1);

        let script = fs::read_to_string(layout.launcher()).unwrap();
        assert_eq!(script.matches("exec ").count(), 1);
        assert!(script.contains("--interval 7200"));
    }
}
