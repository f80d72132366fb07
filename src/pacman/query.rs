use crate::error::{PactopacError, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::process::Command;

/// One line of `pacman -Qu`: `name old -> new`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingUpgrade {
    pub name: String,
    pub old_version: String,
    pub new_version: String,
}

/// Number of non-empty lines in pending-upgrade output
pub fn count_upgrades(output: &str) -> usize {
    output.lines().filter(|line| !line.trim().is_empty()).count()
}

/// Parse `pacman -Qu` output, skipping lines that do not have the usual shape
pub fn parse_upgrades(output: &str) -> Vec<PendingUpgrade> {
    output
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 4 && parts[2] == "->" {
                Some(PendingUpgrade {
                    name: parts[0].to_string(),
                    old_version: parts[1].to_string(),
                    new_version: parts[3].to_string(),
                })
            } else {
                None
            }
        })
        .collect()
}

/// A repository package as listed by `pacman -Sl`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPackage {
    pub repository: String,
    pub name: String,
    pub installed: bool,
}

/// Parse `pacman -Sl` (`repo name version [installed]`) against a set of installed names
pub fn parse_sync_list(output: &str, installed: &HashSet<String>) -> Vec<RepoPackage> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, ' ');
            let repository = parts.next()?.trim();
            let name = parts.next()?.trim();
            if repository.is_empty() || name.is_empty() {
                return None;
            }
            Some(RepoPackage {
                repository: repository.to_string(),
                name: name.to_string(),
                installed: installed.contains(name),
            })
        })
        .collect()
}

/// Names from `pacman -Q` output
pub fn parse_installed_names(output: &str) -> HashSet<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Case-insensitive substring filter on the package name, capped at `limit`
pub fn filter_packages(packages: &[RepoPackage], query: &str, limit: usize) -> Vec<RepoPackage> {
    let query = query.to_lowercase();
    packages
        .iter()
        .filter(|pkg| pkg.name.to_lowercase().contains(&query))
        .take(limit)
        .cloned()
        .collect()
}

/// All repository packages with their installed state
pub fn list_repo_packages() -> Result<Vec<RepoPackage>> {
    let all = run_pacman(&["-Sl"])?;
    let installed = parse_installed_names(&run_pacman(&["-Q"])?);
    Ok(parse_sync_list(&all, &installed))
}

/// Parse `pacman -Si` / `-Qi` output into ordered fields.
///
/// Indented lines continue the previous value.
pub fn parse_info(output: &str) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            if let Some((_, value)) = fields.last_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            fields.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    fields
}

/// Package information from the sync databases, falling back to the local one
pub fn package_info(package_name: &str) -> Result<Option<Vec<(String, String)>>> {
    for flag in ["-Si", "-Qi"] {
        let output = Command::new("pacman")
            .args([flag, package_name])
            .output()
            .map_err(|e| PactopacError::from_spawn("pacman", e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            return Ok(Some(parse_info(&stdout)));
        }
    }

    Ok(None)
}

/// Explicitly installed package names (`pacman -Qqe`)
pub fn explicit_packages() -> Result<Vec<String>> {
    let stdout = run_pacman(&["-Qqe"])?;
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Number of unique dependencies reported by `pactree -u`, excluding the package itself
pub fn dependency_count(package_name: &str) -> Result<usize> {
    let output = Command::new("pactree")
        .args(["-u", package_name])
        .output()
        .map_err(|e| PactopacError::from_spawn("pactree", e))?;

    if !output.status.success() {
        return Err(PactopacError::PacmanFailed(format!("pactree failed for {}", package_name)));
    }

    Ok(count_upgrades(&String::from_utf8_lossy(&output.stdout)).saturating_sub(1))
}

/// Explicit packages with at least `threshold` dependencies, heaviest first
pub fn heavy_packages(threshold: usize) -> Result<Vec<(String, usize)>> {
    if which::which("pactree").is_err() {
        return Err(PactopacError::ToolMissing("pactree (pacman-contrib)".to_string()));
    }

    let mut heavy = Vec::new();
    for pkg in explicit_packages()? {
        match dependency_count(&pkg) {
            Ok(count) if count >= threshold => heavy.push((pkg, count)),
            Ok(_) => {}
            Err(e) => tracing::debug!("Skipping {}: {}", pkg, e),
        }
    }

    heavy.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(heavy)
}

fn run_pacman(args: &[&str]) -> Result<String> {
    let output = Command::new("pacman")
        .args(args)
        .output()
        .map_err(|e| PactopacError::from_spawn("pacman", e))?;

    if !output.status.success() {
        return Err(PactopacError::PacmanFailed(format!(
            "pacman {} exited with {}",
            args.join(" "),
            output.status
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
