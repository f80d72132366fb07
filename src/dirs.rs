use crate::error::{PactopacError, Result};
use std::path::{Path, PathBuf};

/// File name of the launcher script the autostart entry points at
pub const LAUNCHER_NAME: &str = "pactopac-update-checker";

/// File name of the desktop autostart entry
pub const AUTOSTART_NAME: &str = "pactopac-update-checker.desktop";

/// Per-user locations of the files the installer manages
#[derive(Debug, Clone)]
pub struct Layout {
    pub bin_dir: PathBuf,
    pub autostart_dir: PathBuf,
}

impl Layout {
    /// Resolve the layout for the current user (~/.local/bin, ~/.config/autostart)
    pub fn user() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| PactopacError::Config("Could not determine home directory".to_string()))?;

        let mut layout = Self::under(&home);
        if let Some(bin_dir) = dirs::executable_dir() {
            layout.bin_dir = bin_dir;
        }
        if let Some(config_dir) = dirs::config_dir() {
            layout.autostart_dir = config_dir.join("autostart");
        }

        Ok(layout)
    }

    /// Layout rooted at an arbitrary home directory
    pub fn under(home: &Path) -> Self {
        Self {
            bin_dir: home.join(".local").join("bin"),
            autostart_dir: home.join(".config").join("autostart"),
        }
    }

    pub fn launcher(&self) -> PathBuf {
        self.bin_dir.join(LAUNCHER_NAME)
    }

    pub fn autostart_entry(&self) -> PathBuf {
        self.autostart_dir.join(AUTOSTART_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_under_home() {
        let layout = Layout::under(Path::new("/home/alice"));
        assert_eq!(layout.launcher(), PathBuf::from("/home/alice/.local/bin/pactopac-update-checker"));
        assert_eq!(
            layout.autostart_entry(),
            PathBuf::from("/home/alice/.config/autostart/pactopac-update-checker.desktop")
        );
    }
}
