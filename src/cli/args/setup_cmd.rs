use crate::config::Config;
use crate::dirs::Layout;
use crate::error::Result;
use crate::setup::{self, DaemonStop, Removal};
use crate::ui;

pub fn install(config: &Config, interval: Option<u64>) -> Result<()> {
    println!("{}", ui::section_header("Installing Update Checker"));

    let interval_secs = interval.unwrap_or(config.interval_secs);
    let exe = std::env::current_exe()?;
    let report = setup::install(&Layout::user()?, &exe, interval_secs)?;

    if report.replaced {
        println!("{}", ui::info("Replaced previous installation"));
    }
    println!("{}", ui::success(&format!("Launcher: {}", report.launcher.display())));
    println!("{}", ui::success(&format!("Autostart entry: {}", report.autostart.display())));
    println!("{}", ui::info(&format!("Checking every {} seconds", interval_secs)));
    println!(
        "\n{}",
        ui::info(&format!(
            "Restart your session or run {} to start it now",
            report.launcher.display()
        ))
    );

    Ok(())
}

pub fn uninstall() -> Result<()> {
    println!("{}", ui::section_header("Uninstalling Update Checker"));

    let report = setup::uninstall(&Layout::user()?);

    match &report.daemon {
        DaemonStop::Stopped => println!("{}", ui::success("Stopped running update checker")),
        DaemonStop::NotRunning => println!("{}", ui::info("Update checker was not running")),
        DaemonStop::Unavailable(reason) => {
            println!("{}", ui::warning(&format!("Could not stop update checker: {}", reason)))
        }
    }

    print_removal("Launcher", &report.launcher);
    print_removal("Autostart entry", &report.autostart);

    println!("\n{}", ui::success("Uninstall complete"));
    Ok(())
}

fn print_removal(what: &str, removal: &Removal) {
    match removal {
        Removal::Removed => println!("{}", ui::success(&format!("{} removed", what))),
        Removal::NotFound => println!("{}", ui::info(&format!("{} not found", what))),
        Removal::Failed(reason) => {
            println!("{}", ui::warning(&format!("{} could not be removed: {}", what, reason)))
        }
    }
}
