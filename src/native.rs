use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Session data as reported by the native SDK on a successful flow. The
/// user id is numeric here; it is string-encoded before crossing the
/// channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeSession {
    pub token: String,
    pub secret: String,
    pub user_id: i64,
    pub username: String,
}

/// Failure reported by the native SDK for an authorization flow.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct NativeAuthError {
    pub message: String,
}

impl NativeAuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A platform-level activity result event: request code, result code and
/// an opaque data payload, forwarded transparently from the host.
#[derive(Debug, Clone, Default)]
pub struct ActivityResult {
    pub request_code: i32,
    pub result_code: i32,
    pub data: Option<Vec<u8>>,
}

/// How the native SDK reports the outcome of an authorization flow. The
/// callback fires at an arbitrary later time, on an arbitrary task.
pub trait AuthFlowCallback: Send + Sync {
    fn on_success(&self, session: NativeSession);
    fn on_failure(&self, error: NativeAuthError);
}

/// The opaque vendor SDK component performing the actual OAuth handshake.
/// Token exchange and secure storage live entirely behind this seam.
pub trait NativeAuthClient: Send + Sync {
    /// Start the native authorization UI flow. Must not block; the
    /// outcome arrives later through `callback`.
    fn authorize(&self, callback: Arc<dyn AuthFlowCallback>);

    /// The activity request code this client expects forwarded events for.
    fn request_code(&self) -> i32;

    /// Feed a forwarded platform activity result into the in-flight flow.
    fn on_activity_result(&self, result: &ActivityResult);
}

/// The platform web-view cookie jar. Logging out clears its session
/// cookies so a subsequent authorize starts from a clean slate.
pub trait CookieStore: Send + Sync {
    fn clear_session_cookies(&self);
}
