use crate::config::Config;
use crate::error::Result;
use crate::ui;
use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// List all configuration values
    List,
    /// Get a specific configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
}

pub fn handle_config(cmd: &ConfigSubcommand) -> Result<()> {
    let mut config = Config::load()?;

    match cmd {
        ConfigSubcommand::List => {
            println!("{}", ui::section_header("Current Configuration"));
            println!("File: {:?}", Config::config_file_path()?);
            println!();
            for key in Config::KEYS {
                if let Some(value) = config.get(key) {
                    println!("  {}: {}", key, value);
                }
            }
        }
        ConfigSubcommand::Get { key } => match config.get(key) {
            Some(value) => println!("{}", value),
            None => eprintln!("{}", ui::error(&format!("Unknown config key: {}", key))),
        },
        ConfigSubcommand::Set { key, value } => {
            config.set(key, value)?;
            config.save()?;
            println!("{}", ui::success(&format!("Set '{}' to '{}'", key, value)));
            if key == "interval_secs" {
                println!("{}", ui::info("Run `pactopac install` again to apply the new interval"));
            }
        }
    }

    Ok(())
}
