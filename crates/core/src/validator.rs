//! Target resolution and secondary session validation.

use std::fmt;
use std::sync::Arc;

use ndiag_runtime::{Error, Result, Session, SessionId, SessionRegistry};

/// Where an operation runs.
///
/// The primary session is its own variant and is never looked up by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
	/// The controller's own session.
	Primary,
	/// A secondary session attached to a spawned context.
	Session(SessionId),
}

impl Target {
	pub fn is_primary(&self) -> bool {
		matches!(self, Self::Primary)
	}

	pub fn session_id(&self) -> Option<&SessionId> {
		match self {
			Self::Primary => None,
			Self::Session(id) => Some(id),
		}
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Primary => f.write_str("primary"),
			Self::Session(id) => write!(f, "session {id}"),
		}
	}
}

impl From<SessionId> for Target {
	fn from(id: SessionId) -> Self {
		Self::Session(id)
	}
}

impl From<&SessionId> for Target {
	fn from(id: &SessionId) -> Self {
		Self::Session(id.clone())
	}
}

impl From<&str> for Target {
	fn from(id: &str) -> Self {
		Self::Session(SessionId::from(id))
	}
}

impl From<String> for Target {
	fn from(id: String) -> Self {
		Self::Session(SessionId::from(id))
	}
}

/// Resolves secondary session ids against the registry.
///
/// Lookup only: validation never mutates the registry and never talks to a
/// session, so a failed validation leaves no side effects behind.
#[derive(Debug, Clone)]
pub struct SessionValidator {
	registry: Arc<SessionRegistry>,
}

impl SessionValidator {
	pub fn new(registry: Arc<SessionRegistry>) -> Self {
		Self { registry }
	}

	/// Returns the session registered under `id`.
	///
	/// # Errors
	///
	/// [`Error::UnknownSession`] carrying `id` when nothing is registered.
	pub fn validate(&self, id: &SessionId) -> Result<Arc<dyn Session>> {
		self.registry.get(id.as_str()).ok_or_else(|| {
			tracing::debug!(session_id = %id, "Rejected unknown session");
			Error::UnknownSession(id.clone())
		})
	}

	pub fn registry(&self) -> &Arc<SessionRegistry> {
		&self.registry
	}
}

#[cfg(test)]
mod tests {
	use ndiag_runtime::MemorySession;

	use super::*;

	#[test]
	fn validate_returns_registered_session() {
		let registry = Arc::new(SessionRegistry::new());
		registry.attach("worker-1", Arc::new(MemorySession::new("worker-1")));
		let validator = SessionValidator::new(registry);

		let session = validator.validate(&SessionId::from("worker-1")).ok().unwrap();
		assert_eq!(session.label(), "worker-1");
	}

	#[test]
	fn unknown_id_fails_without_touching_sessions() {
		let registry = Arc::new(SessionRegistry::new());
		let other = Arc::new(MemorySession::new("worker-1"));
		registry.attach("worker-1", other.clone());
		let validator = SessionValidator::new(Arc::clone(&registry));

		let err = validator.validate(&SessionId::from("worker-9")).err().unwrap();
		assert!(matches!(&err, Error::UnknownSession(id) if id.as_str() == "worker-9"));
		assert_eq!(other.call_count(), 0);
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn target_conversions() {
		assert!(Target::Primary.is_primary());
		assert_eq!(
			Target::from("w1"),
			Target::Session(SessionId::from("w1"))
		);
		assert_eq!(
			Target::from(String::from("w1")).session_id().map(SessionId::as_str),
			Some("w1")
		);
		assert_eq!(Target::Primary.to_string(), "primary");
		assert_eq!(Target::from("w1").to_string(), "session w1");
	}
}
