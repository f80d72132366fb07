//! Periodic pending-upgrade check against a disposable database snapshot.

pub mod daemon;
mod notify;

pub use notify::*;

use crate::error::{PactopacError, Result};
use crate::pacman::{self, DbSnapshot, PendingUpgrade};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Where pending upgrades come from.
///
/// A cycle is `preflight`, `snapshot`, `sync`, `query`, in that order; the
/// snapshot is dropped before the result is reported.
pub trait PackageSource {
    type Snapshot;

    /// Fail with `ToolMissing` when a required binary is absent
    fn preflight(&self) -> Result<()> {
        Ok(())
    }

    fn snapshot(&self) -> Result<Self::Snapshot>;

    async fn sync(&self, snapshot: &Self::Snapshot) -> Result<()>;

    /// Raw pending-upgrade output, one package per line
    async fn query(&self, snapshot: &Self::Snapshot) -> Result<String>;

    /// Pending Flatpak updates, `None` when not checked
    async fn flatpak_updates(&self) -> Option<usize> {
        None
    }
}

/// The real system: pacman through fakeroot, optionally flatpak
#[derive(Debug, Clone)]
pub struct SystemSource {
    db_path: PathBuf,
    include_flatpak: bool,
}

impl SystemSource {
    pub fn new(db_path: PathBuf, include_flatpak: bool) -> Self {
        Self {
            db_path,
            include_flatpak,
        }
    }
}

impl PackageSource for SystemSource {
    type Snapshot = DbSnapshot;

    fn preflight(&self) -> Result<()> {
        for tool in ["pacman", "fakeroot"] {
            if which::which(tool).is_err() {
                return Err(PactopacError::ToolMissing(tool.to_string()));
            }
        }
        Ok(())
    }

    fn snapshot(&self) -> Result<DbSnapshot> {
        DbSnapshot::create(&self.db_path)
    }

    async fn sync(&self, snapshot: &DbSnapshot) -> Result<()> {
        snapshot.sync().await
    }

    async fn query(&self, snapshot: &DbSnapshot) -> Result<String> {
        snapshot.query_upgrades().await
    }

    async fn flatpak_updates(&self) -> Option<usize> {
        if !self.include_flatpak || !crate::flatpak::is_available() {
            return None;
        }

        match crate::flatpak::pending_updates().await {
            Ok(ids) => Some(ids.len()),
            Err(e) => {
                warn!("Flatpak update check failed: {}", e);
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    Complete,
    /// Sync or query failed; reported as no updates
    Failed { reason: String },
    ToolMissing { tool: String },
}

/// Result of one check cycle
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub checked_at: DateTime<Local>,
    #[serde(flatten)]
    pub status: CheckStatus,
    pub pending: usize,
    pub upgrades: Vec<PendingUpgrade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flatpak: Option<usize>,
}

impl CheckReport {
    fn from_output(output: &str, status: CheckStatus, flatpak: Option<usize>) -> Self {
        Self {
            checked_at: Local::now(),
            status,
            pending: pacman::count_upgrades(output),
            upgrades: pacman::parse_upgrades(output),
            flatpak,
        }
    }

    pub fn notification(&self) -> Notification {
        let notification = Notification::for_count(self.pending);
        match self.flatpak {
            Some(count) if count > 0 => {
                notification.with_line(format!("{} Flatpak updates available", count))
            }
            _ => notification,
        }
    }
}

pub struct UpdateChecker<S, N> {
    source: S,
    notifier: N,
    missing_tool_reported: bool,
}

impl<S: PackageSource, N: Notifier> UpdateChecker<S, N> {
    pub fn new(source: S, notifier: N) -> Self {
        Self {
            source,
            notifier,
            missing_tool_reported: false,
        }
    }

    /// Run one check without notifying
    pub async fn check(&self) -> CheckReport {
        let (output, status) = match self.pending_output().await {
            Ok(output) => (output, CheckStatus::Complete),
            Err(PactopacError::ToolMissing(tool)) => (String::new(), CheckStatus::ToolMissing { tool }),
            Err(e) => {
                warn!("Update check failed, reporting no updates: {}", e);
                (String::new(), CheckStatus::Failed { reason: e.to_string() })
            }
        };

        let flatpak = self.source.flatpak_updates().await;
        CheckReport::from_output(&output, status, flatpak)
    }

    async fn pending_output(&self) -> Result<String> {
        self.source.preflight()?;
        let snapshot = self.source.snapshot()?;
        self.source.sync(&snapshot).await?;
        self.source.query(&snapshot).await
    }

    /// One full cycle: check, then notify
    pub async fn cycle(&mut self) -> CheckReport {
        let report = self.check().await;

        if let CheckStatus::ToolMissing { tool } = &report.status {
            if !self.missing_tool_reported {
                error!("{} is not installed; pending upgrades cannot be checked", tool);
                self.notifier
                    .notify(&Notification::new("Update checker", format!("{} is not installed", tool)))
                    .await;
                self.missing_tool_reported = true;
            } else {
                debug!("{} still missing", tool);
            }
        }

        let notification = report.notification();
        info!(pending = report.pending, "{}", notification);
        self.notifier.notify(&notification).await;
        report
    }

    /// Check, notify, sleep, forever
    pub async fn run(&mut self, interval: Duration) {
        loop {
            self.cycle().await;
            debug!("Next check in {:?}", interval);
            tokio::time::sleep(interval).await;
        }
    }
}
