//! Small in-place edits of `/etc/pacman.conf`.
//!
//! Every edit is a pure text transform; [`write_conf`] stages the result in a
//! temp file and only reaches for `sudo` when the file is not writable.

use crate::error::{PactopacError, Result};
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;
use tracing::debug;

pub const PACMAN_CONF: &str = "/etc/pacman.conf";

static IGNORE_PKG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*IgnorePkg\s*=(.*)$").expect("valid IgnorePkg regex"));

/// Packages listed on active `IgnorePkg` lines
pub fn ignored_packages(conf: &str) -> Vec<String> {
    conf.lines()
        .filter_map(|line| IGNORE_PKG.captures(line))
        .filter_map(|caps| caps.get(1))
        .flat_map(|m| m.as_str().split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .collect()
}

pub fn is_ignored(conf: &str, package_name: &str) -> bool {
    ignored_packages(conf).iter().any(|p| p == package_name)
}

/// Add a package to `IgnorePkg`.
///
/// Appends to the first active line, or inserts a new line at the end of the
/// leading key/value block of `[options]`.
pub fn add_ignored(conf: &str, package_name: &str) -> String {
    if is_ignored(conf, package_name) {
        return conf.to_string();
    }

    let mut lines: Vec<String> = conf.lines().map(str::to_string).collect();

    if let Some(line) = lines.iter_mut().find(|l| IGNORE_PKG.is_match(l)) {
        line.truncate(line.trim_end().len());
        line.push(' ');
        line.push_str(package_name);
        return join_lines(&lines, conf);
    }

    let entry = format!("IgnorePkg = {}", package_name);
    match lines.iter().position(|l| l.trim() == "[options]") {
        Some(options) => {
            let insert_at = lines[options + 1..]
                .iter()
                .position(|l| {
                    let t = l.trim();
                    t.is_empty() || t.starts_with('#') || t.starts_with('[')
                })
                .map(|offset| options + 1 + offset)
                .unwrap_or(lines.len());
            lines.insert(insert_at, entry);
        }
        None => {
            lines.insert(0, entry);
            lines.insert(0, "[options]".to_string());
        }
    }

    join_lines(&lines, conf)
}

/// Remove a package from every active `IgnorePkg` line, dropping lines left empty
pub fn remove_ignored(conf: &str, package_name: &str) -> String {
    let mut lines = Vec::new();

    for line in conf.lines() {
        match IGNORE_PKG.captures(line).and_then(|caps| caps.get(1)) {
            Some(list) => {
                let remaining: Vec<&str> = list
                    .as_str()
                    .split_whitespace()
                    .filter(|p| *p != package_name)
                    .collect();
                if !remaining.is_empty() {
                    lines.push(format!("IgnorePkg = {}", remaining.join(" ")));
                }
            }
            None => lines.push(line.to_string()),
        }
    }

    join_lines(&lines, conf)
}

/// Uncomment `#Color` and add `ILoveCandy` after `# Misc options` when missing
pub fn apply_style(conf: &str) -> String {
    let has_candy = conf.lines().any(|l| l.trim() == "ILoveCandy");
    let mut lines = Vec::new();

    for line in conf.lines() {
        match line.trim() {
            "#Color" => lines.push("Color".to_string()),
            "# Misc options" if !has_candy => {
                lines.push(line.to_string());
                lines.push("ILoveCandy".to_string());
            }
            _ => lines.push(line.to_string()),
        }
    }

    join_lines(&lines, conf)
}

fn join_lines(lines: &[String], original: &str) -> String {
    let mut out = lines.join("\n");
    if original.ends_with('\n') || original.is_empty() {
        out.push('\n');
    }
    out
}

pub fn read_conf(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| PactopacError::Config(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write `contents` to `path`, via `sudo cp` when the file is not writable
pub fn write_conf(path: &Path, contents: &str) -> Result<()> {
    match fs::write(path, contents) {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            debug!("{} not writable, staging for sudo", path.display());
        }
        Err(e) => return Err(e.into()),
    }

    let mut staged = tempfile::NamedTempFile::new()?;
    staged.write_all(contents.as_bytes())?;
    staged.flush()?;

    let status = Command::new("sudo")
        .arg("cp")
        .arg(staged.path())
        .arg(path)
        .status()
        .map_err(|e| PactopacError::from_spawn("sudo", e))?;

    if !status.success() {
        return Err(PactopacError::Config(format!("Failed to update {}", path.display())));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONF: &str = "\
[options]
HoldPkg     = pacman glibc
Architecture = auto

#IgnorePkg   =
#IgnoreGroup =

# Misc options
#UseSyslog
#Color
ParallelDownloads = 5

[core]
Include = /etc/pacman.d/mirrorlist
";

    #[test]
    fn commented_ignore_lines_are_not_active() {
        assert!(ignored_packages(CONF).is_empty());
    }

    #[test]
    fn add_inserts_into_options_block() {
        let updated = add_ignored(CONF, "linux");
        assert_eq!(ignored_packages(&updated), vec!["linux"]);
        assert!(updated.contains("Architecture = auto\nIgnorePkg = linux\n\n#IgnorePkg"));
        assert!(updated.ends_with("mirrorlist\n"));
    }

    #[test]
    fn add_appends_to_existing_line_without_duplicates() {
        let once = add_ignored(CONF, "linux");
        let twice = add_ignored(&once, "mesa");
        let again = add_ignored(&twice, "mesa");

        assert_eq!(ignored_packages(&again), vec!["linux", "mesa"]);
        assert_eq!(twice, again);
        assert_eq!(again.matches("IgnorePkg = ").count(), 1);
    }

    #[test]
    fn add_does_not_match_on_substring() {
        let conf = "[options]\nIgnorePkg = linux-lts\n";
        let updated = add_ignored(conf, "linux");
        assert_eq!(ignored_packages(&updated), vec!["linux-lts", "linux"]);
    }

    #[test]
    fn remove_drops_empty_line() {
        let conf = "[options]\nIgnorePkg = linux mesa\n#IgnorePkg = linux\n";
        let one = remove_ignored(conf, "linux");
        assert_eq!(one, "[options]\nIgnorePkg = mesa\n#IgnorePkg = linux\n");

        let none = remove_ignored(&one, "mesa");
        assert_eq!(none, "[options]\n#IgnorePkg = linux\n");
    }

    #[test]
    fn style_enables_color_and_candy_once() {
        let styled = apply_style(CONF);
        assert!(styled.contains("\nColor\n"));
        assert!(!styled.contains("#Color"));
        assert!(styled.contains("# Misc options\nILoveCandy\n"));

        let restyled = apply_style(&styled);
        assert_eq!(restyled.matches("ILoveCandy").count(), 1);
        assert_eq!(styled, restyled);
    }

    #[test]
    fn write_conf_to_writable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pacman.conf");
        fs::write(&path, CONF).unwrap();

        write_conf(&path, &add_ignored(CONF, "linux")).unwrap();
        assert!(is_ignored(&read_conf(&path).unwrap(), "linux"));
    }
}
