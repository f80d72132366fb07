use crate::error::{PactopacError, Result};
use crate::pacman;
use crate::ui;
use colored::Colorize;

pub fn list(query: &str, limit: usize) -> Result<()> {
    let packages = pacman::list_repo_packages()?;
    let matches = pacman::filter_packages(&packages, query, limit);

    print!("{}", ui::format_repo_packages(&matches));
    println!(
        "\n{} {} of {} packages",
        "::".bright_blue().bold(),
        matches.len(),
        packages.len()
    );
    Ok(())
}

pub fn info(package_name: &str) -> Result<()> {
    match pacman::package_info(package_name)? {
        Some(fields) => {
            println!("{}", ui::section_header(&format!("Package Info: {}", package_name)));
            print!("{}", ui::format_info(&fields));
        }
        None => {
            println!(
                "{}",
                ui::error(&format!("Could not retrieve information for package '{}'", package_name))
            );
        }
    }
    Ok(())
}

pub fn heavy(threshold: usize) -> Result<()> {
    println!("{}", ui::section_header("Packages With Many Dependencies"));

    let heavy = match pacman::heavy_packages(threshold) {
        Ok(heavy) => heavy,
        Err(PactopacError::ToolMissing(tool)) => {
            println!("{}", ui::warning(&format!("{} is not installed", tool)));
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if heavy.is_empty() {
        println!("{}", ui::info(&format!("No explicit package has {} or more dependencies", threshold)));
        return Ok(());
    }

    for (name, count) in &heavy {
        println!("  {} {}", format!("{:>5}", count).bright_magenta(), name.bright_white());
    }
    Ok(())
}
