use super::{DesktopNotifier, SystemSource, UpdateChecker};
use crate::config::Config;
use crate::error::Result;
use crate::pacman;
use std::future::Future;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, info};

/// Snapshots older than this are leftovers from a killed daemon
const STALE_SNAPSHOT_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Run the update checker until SIGINT, SIGTERM or SIGHUP
pub async fn run(config: &Config, interval: Duration) -> Result<()> {
    let shutdown = shutdown_signal()?;

    for path in pacman::sweep_stale(&std::env::temp_dir(), STALE_SNAPSHOT_AGE) {
        info!("Removed stale snapshot {}", path.display());
    }

    let source = SystemSource::new(config.db_path.clone(), config.include_flatpak);
    let notifier = DesktopNotifier::detect(&config.app_name);
    let mut checker = UpdateChecker::new(source, notifier);

    info!(interval_secs = interval.as_secs(), "Update checker started");
    run_until(checker.run(interval), shutdown).await;
    info!("Update checker stopped");

    Ok(())
}

/// Drive `work` until `shutdown` resolves.
///
/// `work` is dropped before returning, which releases the in-flight
/// snapshot and kills any child process it spawned.
pub async fn run_until<W, S>(work: W, shutdown: S)
where
    W: Future<Output = ()>,
    S: Future<Output = ()>,
{
    tokio::select! {
        _ = work => {}
        _ = shutdown => {}
    }
}

/// Register signal handlers now and resolve on the first one received
pub fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => debug!("Received SIGINT"),
            _ = terminate.recv() => debug!("Received SIGTERM"),
            _ = hangup.recv() => debug!("Received SIGHUP"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_drops_in_flight_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();

        let root = tmp.path().to_path_buf();
        let work = async move {
            let snapshot = tempfile::Builder::new()
                .prefix(pacman::SNAPSHOT_PREFIX)
                .tempdir_in(&root)
                .unwrap();
            let _ = tx.send(snapshot.path().to_path_buf());
            std::future::pending::<()>().await;
        };

        let shutdown = async {
            let path = rx.await.unwrap();
            assert!(path.exists());
            path
        };

        let (path_tx, path_rx) = tokio::sync::oneshot::channel();
        run_until(work, async move {
            let _ = path_tx.send(shutdown.await);
        })
        .await;

        let path = path_rx.await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn signal_handlers_register() {
        assert!(shutdown_signal().is_ok());
    }
}
