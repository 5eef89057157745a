//! The session contract shared by primary and secondary contexts.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::BoxFuture;
use ndiag_protocol::{EventName, Method};
use serde_json::Value;

use crate::error::Result;

/// Identifier of a secondary session, as assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(Arc<str>);

impl SessionId {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for SessionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for SessionId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for SessionId {
	fn from(id: &str) -> Self {
		Self(Arc::from(id))
	}
}

impl From<String> for SessionId {
	fn from(id: String) -> Self {
		Self(Arc::from(id))
	}
}

impl From<&SessionId> for SessionId {
	fn from(id: &SessionId) -> Self {
		id.clone()
	}
}

/// Unique identifier for a registered event listener.
pub type ListenerId = u64;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Returns a new globally-unique listener ID.
pub fn next_listener_id() -> ListenerId {
	NEXT_LISTENER_ID.fetch_add(1, Ordering::SeqCst)
}

/// Event handler receiving the raw event parameters.
pub type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Request/response and event surface of one execution context.
///
/// Implemented by the transport for the primary context and for every
/// attached secondary context, so the diagnostics layer drives both the same
/// way. Listener registration is synchronous: adding or removing a listener
/// never suspends.
pub trait Session: Send + Sync {
	/// Short name used in logs (`"primary"`, or the session id).
	fn label(&self) -> &str;

	/// Sends a request and resolves with its result mapping.
	///
	/// A rejection from the engine surfaces as
	/// [`Error::Protocol`](crate::Error::Protocol) carrying the engine's message.
	fn post_request(&self, method: Method, params: Value) -> BoxFuture<'_, Result<Value>>;

	/// Registers `listener` for `event` and returns its id.
	fn add_listener(&self, event: EventName, listener: Listener) -> ListenerId;

	/// Removes a listener. Returns false if it was not registered.
	fn remove_listener(&self, event: EventName, id: ListenerId) -> bool;

	/// Number of listeners currently registered for `event`.
	fn listener_count(&self, event: EventName) -> usize;
}
