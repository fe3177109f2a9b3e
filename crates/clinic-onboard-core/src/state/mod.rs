//! Application-wide session state and user-facing notices.
//!
//! [`AppState`] is an explicit container passed to whoever needs it. The
//! session is a `watch` value (latest wins); notices are a `broadcast`
//! stream so every subscriber sees every toast and alert.

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};

const NOTICE_CAPACITY: usize = 64;

/// Who is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub logged_in: bool,
    pub user_name: Option<String>,
    pub clinic_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    Toast { level: ToastLevel, message: String },
    Alert { title: String, message: String },
}

#[derive(Debug)]
pub struct AppState {
    session: watch::Sender<Session>,
    notices: broadcast::Sender<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let (session, _) = watch::channel(Session::default());
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self { session, notices }
    }

    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub fn sign_in(&self, user_name: impl Into<String>) {
        let user_name = user_name.into();
        tracing::info!(user = %user_name, "signed in");
        self.session.send_modify(|s| {
            s.logged_in = true;
            s.user_name = Some(user_name);
        });
    }

    pub fn sign_out(&self) {
        tracing::info!("signed out");
        self.session.send_replace(Session::default());
    }

    pub fn update_session(&self, update: impl FnOnce(&mut Session)) {
        self.session.send_modify(update);
    }

    /// Publish a notice. Returns how many subscribers received it.
    pub fn notify(&self, notice: Notice) -> usize {
        // No subscribers is not an error
        self.notices.send(notice).unwrap_or(0)
    }

    pub fn toast(&self, level: ToastLevel, message: impl Into<String>) -> usize {
        self.notify(Notice::Toast {
            level,
            message: message.into(),
        })
    }

    pub fn toast_error(&self, message: impl Into<String>) -> usize {
        self.toast(ToastLevel::Error, message)
    }

    pub fn alert(&self, title: impl Into<String>, message: impl Into<String>) -> usize {
        self.notify(Notice::Alert {
            title: title.into(),
            message: message.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_sign_in_and_out() {
        let state = AppState::new();
        let rx = state.subscribe_session();
        assert!(!rx.borrow().logged_in);

        state.sign_in("Dr. Mehta");
        assert!(rx.borrow().logged_in);
        assert_eq!(state.session().user_name.as_deref(), Some("Dr. Mehta"));

        state.update_session(|s| s.clinic_id = Some("clinic-1".into()));
        assert_eq!(state.session().clinic_id.as_deref(), Some("clinic-1"));

        state.sign_out();
        assert_eq!(state.session(), Session::default());
    }

    #[tokio::test]
    async fn test_notices_reach_every_subscriber() {
        let state = AppState::new();
        let mut a = state.subscribe_notices();
        let mut b = state.subscribe_notices();

        assert_eq!(state.toast_error("Upload failed"), 2);
        state.alert("Permission needed", "Allow photo access in Settings");

        for rx in [&mut a, &mut b] {
            assert_eq!(
                rx.recv().await.unwrap(),
                Notice::Toast {
                    level: ToastLevel::Error,
                    message: "Upload failed".into()
                }
            );
            assert!(matches!(rx.recv().await.unwrap(), Notice::Alert { .. }));
        }
    }

    #[test]
    fn test_notify_without_subscribers() {
        let state = AppState::new();
        assert_eq!(state.toast(ToastLevel::Info, "hello"), 0);
    }
}
