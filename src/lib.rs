// Bridge between a host command channel and a native Twitter auth SDK.
// The OAuth handshake itself lives behind the NativeAuthClient seam.

mod bridge;
mod channel;
mod error;
mod hub;
mod native;
mod session;
mod settings;

pub use bridge::{AuthBridge, AuthResult, ERROR_AUTH_IN_PROGRESS};
pub use channel::{MethodCall, MethodReply, ReplyHandle, CHANNEL_NAME};
pub use error::BridgeError;
pub use hub::{ActivityResultHub, ActivityResultListener};
pub use native::{
    ActivityResult, AuthFlowCallback, CookieStore, NativeAuthClient, NativeAuthError,
    NativeSession,
};
pub use session::{Session, SessionStore};
pub use settings::{Settings, DEFAULT_AUTHORIZE_TIMEOUT_SECS};
