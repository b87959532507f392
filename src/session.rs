use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;

use crate::native::NativeSession;

/// The authenticated user's token/secret/identity tuple. Created on
/// successful authorization, replaced wholesale, never mutated field by
/// field. Serializes to the channel map keys (`userId` string-encoded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub secret: String,
    pub user_id: String,
    pub username: String,
}

impl Session {
    /// Project the session into the map shape replies carry.
    pub fn to_reply_map(&self) -> Value {
        serde_json::to_value(self).expect("session serializes to a map")
    }
}

impl From<NativeSession> for Session {
    fn from(native: NativeSession) -> Self {
        Self {
            token: native.token,
            secret: native.secret,
            user_id: native.user_id.to_string(),
            username: native.username,
        }
    }
}

/// Holds at most one currently active session.
#[derive(Default)]
pub struct SessionStore {
    active: Mutex<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the active session, if any.
    pub fn active(&self) -> Option<Session> {
        self.active.lock().expect("session slot lock").clone()
    }

    /// Replace the active session.
    pub fn set_active(&self, session: Session) {
        tracing::debug!(username = %session.username, "Session activated");
        *self.active.lock().expect("session slot lock") = Some(session);
    }

    /// Clear the active session.
    pub fn clear_active(&self) {
        let previous = self.active.lock().expect("session slot lock").take();
        if previous.is_some() {
            tracing::debug!("Session cleared");
        }
    }
}
