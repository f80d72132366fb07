use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

pub const UPDATES_TITLE: &str = "Updates";
pub const UP_TO_DATE: &str = "System up to date";

/// A (title, body) pair sent to the desktop notification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Summary for a pending-upgrade count
    pub fn for_count(count: usize) -> Self {
        if count == 0 {
            Self::new(UPDATES_TITLE, UP_TO_DATE)
        } else {
            Self::new(UPDATES_TITLE, format!("{} packages available", count))
        }
    }

    pub fn with_line(mut self, line: impl AsRef<str>) -> Self {
        self.body.push('\n');
        self.body.push_str(line.as_ref());
        self
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.body)
    }
}

pub trait Notifier {
    /// Deliver a notification; never fails, falls back to plain output
    async fn notify(&self, notification: &Notification);
}

/// `notify-send` can hang on D-Bus early in a session
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends through `notify-send`, or prints to stdout when it is missing or fails
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    sender: Option<PathBuf>,
    app_name: String,
    timeout: Duration,
}

impl DesktopNotifier {
    pub fn detect(app_name: &str) -> Self {
        let sender = which::which("notify-send").ok();
        if sender.is_none() {
            debug!("notify-send not found, notifications go to stdout");
        }
        Self {
            sender,
            app_name: app_name.to_string(),
            timeout: SEND_TIMEOUT,
        }
    }

    async fn send(&self, sender: &Path, notification: &Notification) -> bool {
        let mut cmd = Command::new(sender);
        if !self.app_name.is_empty() {
            cmd.arg("--app-name").arg(&self.app_name);
        }
        cmd.arg(&notification.title)
            .arg(&notification.body)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        match timeout(self.timeout, cmd.status()).await {
            Ok(Ok(status)) if status.success() => true,
            Ok(Ok(status)) => {
                warn!("notify-send exited with {}", status);
                false
            }
            Ok(Err(e)) => {
                warn!("Could not run notify-send: {}", e);
                false
            }
            Err(_) => {
                warn!("notify-send did not finish within {:?}", self.timeout);
                false
            }
        }
    }
}

impl Notifier for DesktopNotifier {
    async fn notify(&self, notification: &Notification) {
        if let Some(sender) = &self.sender {
            if self.send(sender, notification).await {
                return;
            }
        }
        println!("{}", notification);
    }
}
