use crate::pacman::{PendingUpgrade, RepoPackage};
use colored::*;

/// Format pending upgrades as `name old -> new`, column aligned
pub fn format_upgrades(upgrades: &[PendingUpgrade]) -> String {
    if upgrades.is_empty() {
        return "No upgrades pending".dimmed().to_string();
    }

    let name_width = upgrades.iter().map(|u| u.name.len()).max().unwrap_or(0);
    let old_width = upgrades.iter().map(|u| u.old_version.len()).max().unwrap_or(0);

    let mut output = String::new();
    for upgrade in upgrades {
        output.push_str(&format!(
            "  {} {} {} {}\n",
            format!("{:<width$}", upgrade.name, width = name_width).bright_white().bold(),
            format!("{:<width$}", upgrade.old_version, width = old_width).bright_red(),
            "->".bright_black(),
            upgrade.new_version.bright_green(),
        ));
    }
    output
}

/// Format repository packages with an installed marker
pub fn format_repo_packages(packages: &[RepoPackage]) -> String {
    if packages.is_empty() {
        return "No packages found".dimmed().to_string();
    }

    let mut output = String::new();
    for pkg in packages {
        let (marker, name) = if pkg.installed {
            ("●".green(), pkg.name.bright_green())
        } else {
            ("○".bright_black(), pkg.name.bright_white())
        };
        output.push_str(&format!("{} {} {}\n", marker, name, pkg.repository.dimmed()));
    }
    output
}

/// Format `pacman -Si` fields with bold keys
pub fn format_info(fields: &[(String, String)]) -> String {
    let key_width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    let mut output = String::new();
    for (key, value) in fields {
        output.push_str(&format!(
            "{} : {}\n",
            format!("{:<width$}", key, width = key_width).bold(),
            value
        ));
    }
    output
}
