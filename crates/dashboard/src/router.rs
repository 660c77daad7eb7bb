use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scenario_core::DashboardError;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;

/// Who produced the failure being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    /// Text the backend sent with a non-success status.
    Backend,
    /// Anything raised on this side: transport, payload shape, bad input.
    Client,
}

/// An operator-visible error notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// What [`ErrorRouter::report`] accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorReason {
    Backend(String),
    Client(String),
}

impl From<&DashboardError> for ErrorReason {
    fn from(err: &DashboardError) -> Self {
        if err.is_backend() {
            ErrorReason::Backend(err.user_message())
        } else {
            ErrorReason::Client(err.user_message())
        }
    }
}

impl From<DashboardError> for ErrorReason {
    fn from(err: DashboardError) -> Self {
        ErrorReason::from(&err)
    }
}

impl From<String> for ErrorReason {
    fn from(description: String) -> Self {
        ErrorReason::Client(description)
    }
}

impl From<&str> for ErrorReason {
    fn from(description: &str) -> Self {
        ErrorReason::Client(description.to_string())
    }
}

impl From<ErrorReason> for Alert {
    fn from(reason: ErrorReason) -> Self {
        match reason {
            ErrorReason::Backend(message) => Alert::new(AlertKind::Backend, message),
            ErrorReason::Client(message) => Alert::new(AlertKind::Client, message),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Channel unavailable: {0}")]
    Unavailable(String),
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Where alerts end up in front of the operator.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, alert: &Alert) -> Result<(), NotificationError>;
    fn name(&self) -> &str;
}

/// Terminal banner for the CLI.
#[derive(Debug, Default, Clone)]
pub struct StderrChannel;

#[async_trait]
impl NotificationChannel for StderrChannel {
    async fn send(&self, alert: &Alert) -> Result<(), NotificationError> {
        let line = format!("Error: {}\n", alert.message);
        let mut stderr = tokio::io::stderr();
        stderr.write_all(line.as_bytes()).await?;
        stderr.flush().await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stderr"
    }
}

/// In-process banner: keeps alerts until dismissed.
///
/// Clones share the same store, so an embedder can hand one clone to the
/// router and read from the other.
#[derive(Debug, Default, Clone)]
pub struct MemoryChannel {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn latest(&self) -> Option<Alert> {
        self.alerts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    pub fn dismiss(&self) {
        self.alerts.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[async_trait]
impl NotificationChannel for MemoryChannel {
    async fn send(&self, alert: &Alert) -> Result<(), NotificationError> {
        self.alerts
            .lock()
            .map_err(|_| NotificationError::Unavailable("alert store poisoned".to_string()))?
            .push(alert.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Single exit for every failure the operator has to see.
///
/// Exactly one channel is active; it does not classify or retry.
pub struct ErrorRouter {
    channel: Box<dyn NotificationChannel>,
}

impl ErrorRouter {
    pub fn new(channel: impl NotificationChannel + 'static) -> Self {
        Self {
            channel: Box::new(channel),
        }
    }

    pub fn channel_name(&self) -> &str {
        self.channel.name()
    }

    /// Coerce `reason` to an alert and deliver it. Returns what was sent.
    pub async fn report(&self, reason: impl Into<ErrorReason>) -> Alert {
        let alert = Alert::from(reason.into());
        tracing::warn!("Reporting {:?} error: {}", alert.kind, alert.message);
        if let Err(e) = self.channel.send(&alert).await {
            tracing::error!(
                "Failed to show error via {}: {} (message was: {})",
                self.channel.name(),
                e,
                alert.message
            );
        }
        alert
    }
}
