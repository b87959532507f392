use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use uuid::Uuid;

use crate::channel::{MethodCall, ReplyHandle};
use crate::hub::{ActivityResultHub, ActivityResultListener};
use crate::native::{
    ActivityResult, AuthFlowCallback, CookieStore, NativeAuthClient, NativeAuthError,
    NativeSession,
};
use crate::session::{Session, SessionStore};

const METHOD_GET_CURRENT_SESSION: &str = "getCurrentSession";
const METHOD_AUTHORIZE: &str = "authorize";
const METHOD_LOG_OUT: &str = "logOut";

/// Channel error code returned when `authorize` is called while another
/// login flow is still awaiting its native callback.
pub const ERROR_AUTH_IN_PROGRESS: &str = "AUTH_IN_PROGRESS";

/// Payload delivered to the authorize caller once the flow settles. OAuth
/// failures travel through the `Error` variant of a *successful* reply,
/// not through a channel-level error; callers inspect `status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status")]
pub enum AuthResult {
    #[serde(rename = "loggedIn")]
    LoggedIn { session: Session },
    #[serde(rename = "error", rename_all = "camelCase")]
    Error { error_message: String },
}

impl AuthResult {
    fn into_reply(self) -> Value {
        serde_json::to_value(self).expect("auth result serializes to a map")
    }
}

/// The one in-flight reply handle awaiting an asynchronous authorization
/// outcome. The id ties the abandonment watchdog to its own cycle.
struct PendingRequest {
    id: Uuid,
    reply: ReplyHandle,
}

/// Translates host commands into native SDK calls and back.
///
/// Three methods arrive over the channel: `getCurrentSession`,
/// `authorize` and `logOut`. Authorization completes asynchronously; the
/// caller's reply handle is parked in a singleton pending slot until the
/// native callback (or the abandonment watchdog) resolves it. A single
/// cycle moves `Idle → AwaitingNativeCallback → Idle`.
pub struct AuthBridge {
    auth_client: Arc<dyn NativeAuthClient>,
    cookie_store: Arc<dyn CookieStore>,
    session_store: SessionStore,
    pending: Mutex<Option<PendingRequest>>,
    authorize_timeout: Duration,
    hub: Arc<ActivityResultHub>,
    registration: Mutex<Option<u64>>,
}

impl AuthBridge {
    /// Build the bridge and subscribe it to the hub's activity-result
    /// events. The subscription lasts until the bridge is dropped.
    pub fn new(
        auth_client: Arc<dyn NativeAuthClient>,
        cookie_store: Arc<dyn CookieStore>,
        hub: Arc<ActivityResultHub>,
        authorize_timeout: Duration,
    ) -> Arc<Self> {
        let bridge = Arc::new(Self {
            auth_client,
            cookie_store,
            session_store: SessionStore::new(),
            pending: Mutex::new(None),
            authorize_timeout,
            hub: Arc::clone(&hub),
            registration: Mutex::new(None),
        });

        let id = hub.register(Arc::downgrade(&bridge) as Weak<dyn ActivityResultListener>);
        *bridge.registration.lock().expect("registration lock") = Some(id);

        tracing::info!("Initialized");
        bridge
    }

    /// Dispatch one inbound method call. Never blocks; `authorize`
    /// replies later, everything else replies before returning.
    pub fn handle(self: &Arc<Self>, call: MethodCall, reply: ReplyHandle) {
        tracing::info!(method = %call.method, "Received method call");

        match call.method.as_str() {
            METHOD_GET_CURRENT_SESSION => self.get_current_session(reply),
            METHOD_AUTHORIZE => self.authorize(&call, reply),
            METHOD_LOG_OUT => self.log_out(reply),
            _ => reply.not_implemented(),
        }
    }

    fn get_current_session(&self, reply: ReplyHandle) {
        let value = match self.session_store.active() {
            Some(session) => session.to_reply_map(),
            None => Value::Null,
        };
        reply.success(value);
    }

    fn authorize(self: &Arc<Self>, call: &MethodCall, reply: ReplyHandle) {
        // Credentials are configured at initialization and belong to the
        // native client; the arguments are accepted for channel
        // compatibility and otherwise unused.
        let _ = call.argument("consumerKey");
        let _ = call.argument("consumerSecret");

        let id = Uuid::new_v4();
        {
            let mut pending = self.pending.lock().expect("pending slot lock");
            if pending.is_some() {
                tracing::warn!(
                    "authorize called while another Twitter login operation was in progress"
                );
                reply.error(
                    ERROR_AUTH_IN_PROGRESS,
                    "authorize called while another Twitter login operation was in progress",
                );
                return;
            }
            *pending = Some(PendingRequest { id, reply });
        }

        tracing::debug!(request_id = %id, "Awaiting native callback");
        self.spawn_watchdog(id);
        self.auth_client
            .authorize(Arc::clone(self) as Arc<dyn AuthFlowCallback>);
    }

    fn log_out(&self, reply: ReplyHandle) {
        self.cookie_store.clear_session_cookies();
        self.session_store.clear_active();
        reply.success(Value::Null);
    }

    /// Bounded wait on the native callback. Holds only a weak reference
    /// so an outstanding watchdog never keeps a dropped bridge alive.
    fn spawn_watchdog(self: &Arc<Self>, id: Uuid) {
        let bridge = Arc::downgrade(self);
        let timeout = self.authorize_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(bridge) = bridge.upgrade() {
                bridge.expire_pending(id);
            }
        });
    }

    /// Resolve the pending request as abandoned, but only if it is still
    /// the cycle this watchdog was started for.
    fn expire_pending(&self, id: Uuid) {
        let expired = {
            let mut pending = self.pending.lock().expect("pending slot lock");
            match pending.as_ref() {
                Some(request) if request.id == id => pending.take(),
                _ => None,
            }
        };

        if let Some(request) = expired {
            tracing::warn!(request_id = %id, "Authorization flow abandoned");
            request.reply.success(
                AuthResult::Error {
                    error_message: format!(
                        "authorization abandoned: no response from the native flow within {}s",
                        self.authorize_timeout.as_secs()
                    ),
                }
                .into_reply(),
            );
        }
    }

    fn take_pending(&self) -> Option<PendingRequest> {
        self.pending.lock().expect("pending slot lock").take()
    }
}

impl AuthFlowCallback for AuthBridge {
    fn on_success(&self, native: NativeSession) {
        let Some(request) = self.take_pending() else {
            tracing::debug!("Native success with no pending request, discarding");
            return;
        };

        let session = Session::from(native);
        let result = AuthResult::LoggedIn {
            session: session.clone(),
        };
        self.session_store.set_active(session);

        tracing::info!(request_id = %request.id, "Authorization succeeded");
        request.reply.success(result.into_reply());
    }

    fn on_failure(&self, error: NativeAuthError) {
        let Some(request) = self.take_pending() else {
            tracing::debug!("Native failure with no pending request, discarding");
            return;
        };

        tracing::info!(request_id = %request.id, error = %error, "Authorization failed");
        request.reply.success(
            AuthResult::Error {
                error_message: error.message,
            }
            .into_reply(),
        );
    }
}

impl ActivityResultListener for AuthBridge {
    fn on_activity_result(&self, result: &ActivityResult) -> bool {
        if result.request_code == self.auth_client.request_code() {
            tracing::debug!(
                request_code = result.request_code,
                "Forwarding activity result to the native auth client"
            );
            self.auth_client.on_activity_result(result);
        }

        // Forwarding never claims the event; other listeners may also
        // want to observe it.
        false
    }
}

impl Drop for AuthBridge {
    fn drop(&mut self) {
        if let Some(id) = self.registration.lock().expect("registration lock").take() {
            self.hub.unregister(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn logged_in_result_shape() {
        let result = AuthResult::LoggedIn {
            session: Session {
                token: "t1".to_string(),
                secret: "s1".to_string(),
                user_id: "111".to_string(),
                username: "alice".to_string(),
            },
        };

        assert_eq!(
            result.into_reply(),
            json!({
                "status": "loggedIn",
                "session": {
                    "token": "t1",
                    "secret": "s1",
                    "userId": "111",
                    "username": "alice",
                },
            })
        );
    }

    #[test]
    fn error_result_shape() {
        let result = AuthResult::Error {
            error_message: "cancelled".to_string(),
        };

        assert_eq!(
            result.into_reply(),
            json!({
                "status": "error",
                "errorMessage": "cancelled",
            })
        );
    }
}
