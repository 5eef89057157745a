//! Error types for the diagnostics runtime.

use ndiag_protocol::Method;
use thiserror::Error;

use crate::session::SessionId;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving an instrumentation session.
#[derive(Debug, Error)]
pub enum Error {
	/// Secondary session id has no entry in the registry.
	#[error("sessionId({0}) invalid")]
	UnknownSession(SessionId),

	/// The session rejected a request.
	///
	/// Displays the downstream message verbatim so callers can match on it.
	#[error("{message}")]
	Protocol {
		/// Method whose request was rejected
		method: Method,
		/// Message reported by the engine
		message: String,
	},

	/// The session went away while a request was in flight.
	#[error("Session closed: {0}")]
	SessionClosed(String),

	/// Lifecycle call on an inspector that was never started.
	#[error("Inspector not started")]
	NotStarted,

	/// Timeout waiting for an event or a session.
	#[error("Timeout: {0}")]
	Timeout(String),

	/// Channel closed unexpectedly.
	#[error("Channel closed unexpectedly")]
	ChannelClosed,

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Builds a [`Error::Protocol`] for a rejected request.
	pub fn protocol(method: Method, message: impl Into<String>) -> Self {
		Error::Protocol {
			method,
			message: message.into(),
		}
	}

	/// Returns true if this is an unknown session error.
	pub fn is_unknown_session(&self) -> bool {
		matches!(self, Error::UnknownSession(_))
	}

	/// Returns true if the session rejected a request.
	pub fn is_protocol(&self) -> bool {
		matches!(self, Error::Protocol { .. })
	}

	/// Returns true if this is a timeout error.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::Timeout(_))
	}

	/// Returns the rejected method if this is a protocol error.
	pub fn method(&self) -> Option<Method> {
		match self {
			Error::Protocol { method, .. } => Some(*method),
			_ => None,
		}
	}

	/// Returns the downstream message if this is a protocol error.
	pub fn message(&self) -> Option<&str> {
		match self {
			Error::Protocol { message, .. } => Some(message),
			_ => None,
		}
	}
}
