//! Best-effort selection alerts behind a permission-gated platform capability.
//!
//! [`SelectionNotifier`] is constructed once at startup and shared by
//! reference; its permission flag lives for the whole session. Nothing in
//! here ever returns an error to the caller: a missing capability, a denied
//! permission, or a failing platform only ends up in the log.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_DISMISS_AFTER;
use crate::error::AlertError;
use crate::utils::capitalize;

pub const DEFAULT_ICON: &str = "/pwa-192x192.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// The user has not been asked yet.
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
    /// Correlation tag; a platform may replace a visible alert with the same tag.
    pub tag: Option<String>,
}

impl Alert {
    pub fn selection(name: &str) -> Self {
        Self {
            title: "Pokémon selected".to_string(),
            body: format!("You selected {}", capitalize(name)),
            icon: Some(DEFAULT_ICON.to_string()),
            tag: Some(format!("pokemon-{}", name)),
        }
    }

    pub fn icon(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_ICON)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertHandle(pub u64);

/// The host's alerting capability.
#[async_trait]
pub trait AlertPlatform: Send + Sync {
    /// Current permission, without prompting.
    fn permission(&self) -> Permission;

    /// Ask the user. Only called while `permission()` is [`Permission::Default`].
    async fn request_permission(&self) -> Permission;

    fn show(&self, alert: &Alert) -> Result<AlertHandle, AlertError>;

    fn dismiss(&self, handle: AlertHandle) -> Result<(), AlertError>;
}

pub struct SelectionNotifier {
    platform: Option<Arc<dyn AlertPlatform>>,
    granted: AtomicBool,
    dismiss_after: Duration,
}

impl SelectionNotifier {
    /// `platform` is `None` when the host has no alert capability.
    pub fn new(platform: Option<Arc<dyn AlertPlatform>>) -> Self {
        Self::with_dismiss_after(platform, DEFAULT_DISMISS_AFTER)
    }

    pub fn with_dismiss_after(platform: Option<Arc<dyn AlertPlatform>>, dismiss_after: Duration) -> Self {
        Self {
            platform,
            granted: AtomicBool::new(false),
            dismiss_after,
        }
    }

    pub fn permission_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    /// Announce the selection of `name`. Dismissal is scheduled on the tokio
    /// runtime and happens after the configured delay.
    pub async fn notify(&self, name: &str) {
        let Some(platform) = self.platform.as_ref() else {
            debug!("no alert capability; skipping selection alert");
            return;
        };

        if !self.ensure_permission(platform.as_ref()).await {
            debug!(name, "alert permission not granted");
            return;
        }

        let alert = Alert::selection(name);
        match platform.show(&alert) {
            Ok(handle) => self.schedule_dismiss(Arc::clone(platform), handle),
            Err(e) => warn!(name, error = %e, "failed to show selection alert"),
        }
    }

    async fn ensure_permission(&self, platform: &dyn AlertPlatform) -> bool {
        if self.permission_granted() {
            return true;
        }
        let granted = match platform.permission() {
            Permission::Granted => true,
            Permission::Denied => false,
            Permission::Default => {
                let answer = platform.request_permission().await;
                info!(?answer, "alert permission requested");
                answer == Permission::Granted
            }
        };
        self.granted.store(granted, Ordering::SeqCst);
        granted
    }

    fn schedule_dismiss(&self, platform: Arc<dyn AlertPlatform>, handle: AlertHandle) {
        let delay = self.dismiss_after;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = platform.dismiss(handle) {
                debug!(handle = handle.0, error = %e, "alert dismissal failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_alert_contents() {
        let a = Alert::selection("pikachu");
        assert_eq!(a.title, "Pokémon selected");
        assert_eq!(a.body, "You selected Pikachu");
        assert_eq!(a.tag.as_deref(), Some("pokemon-pikachu"));
        assert_eq!(a.icon(), DEFAULT_ICON);
    }

    #[test]
    fn icon_defaults_when_absent() {
        let a = Alert {
            icon: None,
            ..Alert::selection("mew")
        };
        assert_eq!(a.icon(), "/pwa-192x192.png");
    }

    #[tokio::test]
    async fn missing_capability_is_silent() {
        let n = SelectionNotifier::new(None);
        n.notify("pikachu").await;
        assert!(!n.permission_granted());
    }
}
