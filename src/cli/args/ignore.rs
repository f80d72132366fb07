use crate::error::Result;
use crate::pacman::conf::{self, PACMAN_CONF};
use crate::ui;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand, Debug, Clone)]
pub enum IgnoreSubcommand {
    /// List ignored packages
    List,
    /// Hold a package back from upgrades
    Add { package: String },
    /// Stop ignoring a package
    Remove { package: String },
}

pub fn handle_ignore(cmd: &IgnoreSubcommand) -> Result<()> {
    let path = Path::new(PACMAN_CONF);
    let current = conf::read_conf(path)?;

    match cmd {
        IgnoreSubcommand::List => {
            let ignored = conf::ignored_packages(&current);
            if ignored.is_empty() {
                println!("{}", ui::info("No packages in IgnorePkg"));
            } else {
                for pkg in ignored {
                    println!("{}", pkg);
                }
            }
        }
        IgnoreSubcommand::Add { package } => {
            if conf::is_ignored(&current, package) {
                println!("{}", ui::info(&format!("{} is already ignored", package)));
                return Ok(());
            }
            conf::write_conf(path, &conf::add_ignored(&current, package))?;
            println!("{}", ui::success(&format!("Added {} to IgnorePkg", package)));
        }
        IgnoreSubcommand::Remove { package } => {
            if !conf::is_ignored(&current, package) {
                println!("{}", ui::info(&format!("{} is not in IgnorePkg", package)));
                return Ok(());
            }
            conf::write_conf(path, &conf::remove_ignored(&current, package))?;
            println!("{}", ui::success(&format!("Removed {} from IgnorePkg", package)));
        }
    }

    Ok(())
}
