use crate::config::Config;
use crate::error::Result;
use clap::{Parser, Subcommand};

pub mod check;
pub mod completions;
pub mod config_cmd;
pub mod ignore;
pub mod packages;
pub mod setup_cmd;
pub mod style;

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
#[command(name = "pactopac")]
#[command(about = "Pending-upgrade notifications and small pacman helpers for Arch-based systems")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output (show debug information)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check once for pending upgrades using a throwaway database snapshot
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Also send the desktop notification
        #[arg(long)]
        notify: bool,
    },
    /// Run the update checker forever (started by the autostart entry)
    Daemon {
        /// Seconds between checks (defaults to the configured interval)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
    /// Install the update checker launcher and autostart entry
    Install {
        /// Seconds between checks baked into the launcher
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
    /// Stop the update checker and remove its files
    Uninstall,
    /// List repository packages, optionally filtered by name
    List {
        /// Case-insensitive name filter
        query: Option<String>,
        /// Maximum number of rows
        #[arg(short = 'n', long, default_value_t = 500)]
        limit: usize,
    },
    /// Show package information
    Info {
        /// Package name
        package: String,
    },
    /// Manage IgnorePkg in pacman.conf
    Ignore {
        #[command(subcommand)]
        action: ignore::IgnoreSubcommand,
    },
    /// Enable Color and ILoveCandy in pacman.conf
    Style {
        /// Don't ask for confirmation
        #[arg(long)]
        noconfirm: bool,
    },
    /// Explicitly installed packages with many dependencies (needs pacman-contrib)
    Heavy {
        /// Minimum number of dependencies
        #[arg(short = 't', long, default_value_t = 50)]
        threshold: usize,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        cmd: config_cmd::ConfigSubcommand,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Args {
    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Command::Check { json, notify } => check::run_once(&Config::load()?, *json, *notify).await,
            Command::Daemon { interval } => check::run_daemon(&Config::load_or_default(), *interval).await,
            Command::Install { interval } => setup_cmd::install(&Config::load()?, *interval),
            Command::Uninstall => setup_cmd::uninstall(),
            Command::List { query, limit } => packages::list(query.as_deref().unwrap_or(""), *limit),
            Command::Info { package } => packages::info(package),
            Command::Ignore { action } => ignore::handle_ignore(action),
            Command::Style { noconfirm } => style::apply(*noconfirm),
            Command::Heavy { threshold } => packages::heavy(*threshold),
            Command::Config { cmd } => config_cmd::handle_config(cmd),
            Command::Completions { shell } => completions::generate_completions(*shell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_daemon_interval() {
        let args = Args::parse_from(["pactopac", "daemon", "--interval", "600"]);
        assert!(matches!(args.command, Command::Daemon { interval: Some(600) }));
    }

    #[test]
    fn rejects_zero_interval() {
        assert!(Args::try_parse_from(["pactopac", "install", "--interval", "0"]).is_err());
    }

    #[test]
    fn verbose_is_global() {
        let args = Args::parse_from(["pactopac", "check", "--json", "-v"]);
        assert!(args.verbose);
        assert!(matches!(args.command, Command::Check { json: true, notify: false }));
    }
}
