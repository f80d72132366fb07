//! Launcher script and autostart entry for the background update checker.

mod install;
mod uninstall;

pub use install::*;
pub use uninstall::*;

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Binary name used to find a daemon when the launcher is already gone
pub const BIN_NAME: &str = "pactopac";

static EXEC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^exec '((?:[^']|'\\'')*)' daemon\b").expect("valid exec line regex")
});

/// Quote for a POSIX shell single-quoted word
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// `sh` launcher that execs the daemon with the interval baked in
pub fn launcher_script(exe: &Path, interval_secs: u64) -> String {
    format!(
        "#!/bin/sh\n\
         # Managed by `{bin} install`; remove with `{bin} uninstall`.\n\
         exec {exe} daemon --interval {interval_secs}\n",
        bin = BIN_NAME,
        exe = shell_quote(&exe.to_string_lossy()),
    )
}

/// Desktop autostart entry pointing at the launcher
pub fn autostart_entry(launcher: &Path) -> String {
    let launcher = launcher.to_string_lossy();
    let exec = if launcher.contains(char::is_whitespace) {
        format!("\"{}\"", launcher)
    } else {
        launcher.to_string()
    };

    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=PacToPac Update Checker\n\
         Comment=Notify about pending pacman upgrades\n\
         Exec={exec}\n\
         Terminal=false\n\
         NoDisplay=true\n\
         X-GNOME-Autostart-enabled=true\n"
    )
}

/// Daemon executable named on the launcher's `exec` line
pub fn launcher_daemon_exe(script: &str) -> Option<String> {
    script
        .lines()
        .find_map(|line| EXEC_LINE.captures(line.trim()))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace(r"'\''", "'"))
}

/// `pkill -f` pattern matching the daemon started from `exe`
pub fn daemon_pattern(exe: &str) -> String {
    format!("{} daemon --interval", regex::escape(exe))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launcher_round_trips_exe_path() {
        let script = launcher_script(Path::new("/home/al'ice/bin/pactopac"), 7200);
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("daemon --interval 7200\n"));
        assert_eq!(launcher_daemon_exe(&script).as_deref(), Some("/home/al'ice/bin/pactopac"));
    }

    #[test]
    fn foreign_script_has_no_exe() {
        assert!(launcher_daemon_exe("#!/bin/sh\necho hi\n").is_none());
    }

    #[test]
    fn autostart_quotes_paths_with_spaces() {
        let plain = autostart_entry(Path::new("/home/a/.local/bin/pactopac-update-checker"));
        assert!(plain.contains("\nExec=/home/a/.local/bin/pactopac-update-checker\n"));

        let spaced = autostart_entry(Path::new("/home/a b/.local/bin/x"));
        assert!(spaced.contains("\nExec=\"/home/a b/.local/bin/x\"\n"));
    }

    #[test]
    fn pattern_escapes_regex_characters() {
        let pattern = daemon_pattern("/opt/pac.top+pac/pactopac");
        let re = Regex::new(&pattern).unwrap();
        assert!(re.is_match("/opt/pac.top+pac/pactopac daemon --interval 7200"));
        assert!(!re.is_match("/opt/pacXtop+pac/pactopac daemon --interval 7200"));
    }
}
