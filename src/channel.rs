use serde_json::Value;
use tokio::sync::oneshot;

/// Name of the command channel the host runtime addresses this bridge on.
pub const CHANNEL_NAME: &str = "com.roughike/flutter_twitter_login";

/// An inbound command from the host runtime: a method name plus a map of
/// named arguments.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Look up a named string argument.
    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }
}

/// The reply delivered back over the channel for one method call.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodReply {
    Success(Value),
    Error { code: String, message: String },
    NotImplemented,
}

/// Single-use handle through which one method call is answered. Consumed
/// by whichever of success/error/not-implemented fires first.
#[derive(Debug)]
pub struct ReplyHandle {
    tx: oneshot::Sender<MethodReply>,
}

impl ReplyHandle {
    /// Create a handle together with the receiving half the host awaits.
    pub fn channel() -> (Self, oneshot::Receiver<MethodReply>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    pub fn success(self, value: Value) {
        self.send(MethodReply::Success(value));
    }

    pub fn error(self, code: &str, message: impl Into<String>) {
        self.send(MethodReply::Error {
            code: code.to_string(),
            message: message.into(),
        });
    }

    pub fn not_implemented(self) {
        self.send(MethodReply::NotImplemented);
    }

    fn send(self, reply: MethodReply) {
        if self.tx.send(reply).is_err() {
            tracing::warn!("Reply receiver dropped before the reply was delivered");
        }
    }
}
