use crate::error::{PactopacError, Result};
use std::process::Stdio;
use tokio::process::Command;

/// Check if flatpak is installed
pub fn is_available() -> bool {
    which::which("flatpak").is_ok()
}

/// Application IDs with a pending update (`flatpak remote-ls --updates`).
///
/// Read-only; does not need root.
pub async fn pending_updates() -> Result<Vec<String>> {
    let output = Command::new("flatpak")
        .args(["remote-ls", "--updates", "--columns=application"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| PactopacError::from_spawn("flatpak", e))?;

    if !output.status.success() {
        return Err(PactopacError::FlatpakFailed(format!(
            "remote-ls exited with {}",
            output.status
        )));
    }

    Ok(parse_update_ids(&String::from_utf8_lossy(&output.stdout)))
}

fn parse_update_ids(output: &str) -> Vec<String> {
    let mut ids: Vec<String> = output
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "Application ID" && *s != "Application")
        .map(str::to_string)
        .collect();
    ids.dedup();
    ids
}
