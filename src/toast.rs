//! Alert platform for the terminal UI: alerts become a toast drawn by the UI,
//! and permission prompts are answered with an inline y/n question.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::config::AlertMode;
use crate::error::AlertError;
use crate::notify::{Alert, AlertHandle, AlertPlatform, Permission};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub handle: AlertHandle,
    pub alert: Alert,
}

pub struct TerminalAlerts {
    permission: Mutex<Permission>,
    toast: Mutex<Option<Toast>>,
    prompt: Mutex<Option<oneshot::Sender<bool>>>,
    next_handle: AtomicU64,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl TerminalAlerts {
    /// `None` for [`AlertMode::Off`], meaning the host has no alert capability.
    pub fn for_mode(mode: AlertMode) -> Option<Self> {
        let permission = match mode {
            AlertMode::Prompt => Permission::Default,
            AlertMode::Granted => Permission::Granted,
            AlertMode::Denied => Permission::Denied,
            AlertMode::Off => return None,
        };
        Some(Self::new(permission))
    }

    pub fn new(permission: Permission) -> Self {
        Self {
            permission: Mutex::new(permission),
            toast: Mutex::new(None),
            prompt: Mutex::new(None),
            next_handle: AtomicU64::new(1),
        }
    }

    /// Toast currently on screen.
    pub fn visible(&self) -> Option<Toast> {
        lock(&self.toast).clone()
    }

    /// Whether a permission question is waiting for an answer.
    pub fn prompt_pending(&self) -> bool {
        lock(&self.prompt).is_some()
    }

    /// Answer the pending permission question. Returns false if none was pending.
    pub fn answer_prompt(&self, allow: bool) -> bool {
        match lock(&self.prompt).take() {
            Some(tx) => tx.send(allow).is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl AlertPlatform for TerminalAlerts {
    fn permission(&self) -> Permission {
        *lock(&self.permission)
    }

    async fn request_permission(&self) -> Permission {
        let (tx, rx) = oneshot::channel();
        // a newer question replaces an unanswered one; the old asker sees Denied
        *lock(&self.prompt) = Some(tx);
        let answer = match rx.await {
            Ok(true) => Permission::Granted,
            Ok(false) => Permission::Denied,
            // replaced by a newer question; the user has not decided yet
            Err(_) => return Permission::Denied,
        };
        *lock(&self.permission) = answer;
        answer
    }

    fn show(&self, alert: &Alert) -> Result<AlertHandle, AlertError> {
        if alert.title.is_empty() {
            return Err(AlertError::Rejected("alert without title".to_string()));
        }
        let handle = AlertHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        *lock(&self.toast) = Some(Toast {
            handle,
            alert: alert.clone(),
        });
        Ok(handle)
    }

    fn dismiss(&self, handle: AlertHandle) -> Result<(), AlertError> {
        let mut toast = lock(&self.toast);
        match toast.as_ref() {
            Some(t) if t.handle == handle => {
                *toast = None;
                Ok(())
            }
            _ => Err(AlertError::UnknownHandle(handle.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn modes_map_to_permission() {
        assert!(TerminalAlerts::for_mode(AlertMode::Off).is_none());
        let p = TerminalAlerts::for_mode(AlertMode::Denied).unwrap();
        assert_eq!(p.permission(), Permission::Denied);
        let p = TerminalAlerts::for_mode(AlertMode::Prompt).unwrap();
        assert_eq!(p.permission(), Permission::Default);
    }

    #[test]
    fn newer_toast_replaces_older_and_stale_dismiss_fails() {
        let p = TerminalAlerts::new(Permission::Granted);
        let first = p.show(&Alert::selection("bulbasaur")).unwrap();
        let second = p.show(&Alert::selection("bulbasaur")).unwrap();
        assert_ne!(first, second);
        assert!(p.dismiss(first).is_err());
        assert_eq!(p.visible().unwrap().handle, second);
        p.dismiss(second).unwrap();
        assert!(p.visible().is_none());
    }

    #[tokio::test]
    async fn prompt_answer_resolves_request() {
        let p = Arc::new(TerminalAlerts::new(Permission::Default));
        let asker = Arc::clone(&p);
        let task = tokio::spawn(async move { asker.request_permission().await });
        while !p.prompt_pending() {
            tokio::task::yield_now().await;
        }
        assert!(p.answer_prompt(true));
        assert_eq!(task.await.unwrap(), Permission::Granted);
        assert_eq!(p.permission(), Permission::Granted);
        assert!(!p.answer_prompt(false));
    }

    #[tokio::test]
    async fn replaced_prompt_leaves_permission_undecided() {
        let p = Arc::new(TerminalAlerts::new(Permission::Default));
        let first = Arc::clone(&p);
        let first = tokio::spawn(async move { first.request_permission().await });
        while !p.prompt_pending() {
            tokio::task::yield_now().await;
        }
        let second = Arc::clone(&p);
        let second = tokio::spawn(async move { second.request_permission().await });

        assert_eq!(first.await.unwrap(), Permission::Denied);
        assert_eq!(p.permission(), Permission::Default);

        while !p.prompt_pending() {
            tokio::task::yield_now().await;
        }
        assert!(p.answer_prompt(true));
        assert_eq!(second.await.unwrap(), Permission::Granted);
        assert_eq!(p.permission(), Permission::Granted);
    }
}
