use crate::checker::{daemon, CheckStatus, DesktopNotifier, SystemSource, UpdateChecker};
use crate::config::Config;
use crate::error::Result;
use crate::ui;
use std::time::Duration;

/// Run a single check in the foreground and print the result
pub async fn run_once(config: &Config, json: bool, notify: bool) -> Result<()> {
    let source = SystemSource::new(config.db_path.clone(), config.include_flatpak);
    let notifier = DesktopNotifier::detect(&config.app_name);
    let mut checker = UpdateChecker::new(source, notifier);

    let spinner = (!json).then(|| ui::Spinner::new("Syncing database snapshot..."));

    // Ctrl-C must drop the snapshot, not kill the process outright.
    let shutdown = daemon::shutdown_signal()?;
    let mut report = None;
    daemon::run_until(
        async {
            report = Some(if notify {
                checker.cycle().await
            } else {
                checker.check().await
            });
        },
        shutdown,
    )
    .await;

    if let Some(spinner) = spinner {
        spinner.finish();
    }

    let Some(report) = report else {
        eprintln!("{}", ui::warning("Interrupted"));
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", ui::section_header("Pending Upgrades"));

    match &report.status {
        CheckStatus::Complete => {}
        CheckStatus::ToolMissing { tool } => {
            eprintln!("{}", ui::error(&format!("{} is not installed; cannot check for upgrades", tool)));
            return Ok(());
        }
        CheckStatus::Failed { reason } => {
            eprintln!("{}", ui::warning(&format!("Snapshot check failed: {}", reason)));
        }
    }

    if report.pending == 0 {
        println!("{}", ui::success("System up to date"));
    } else {
        println!("{}", ui::info(&format!("{} packages available", report.pending)));
        print!("{}", ui::format_upgrades(&report.upgrades));
    }

    if let Some(count) = report.flatpak {
        println!("{}", ui::info(&format!("{} Flatpak updates available", count)));
    }

    Ok(())
}

/// Run the background checker; the interval flag overrides the config
pub async fn run_daemon(config: &Config, interval: Option<u64>) -> Result<()> {
    let secs = interval.unwrap_or(config.interval_secs);
    daemon::run(config, Duration::from_secs(secs)).await
}
