//! Event subscriptions scoped to a single operation.

use std::sync::Arc;

use ndiag_protocol::{EventName, EventPayload};
use ndiag_runtime::{Listener, ListenerId, Session};
use serde_json::Value;

/// RAII handle that removes an event listener when released or dropped.
///
/// Each acquisition registers exactly one listener. Release happens once:
/// either through [`release`](Self::release) or, on any early exit (a `?`,
/// a panic unwinding through the owning operation), through `Drop`. Release
/// never suspends.
///
/// Events are delivered forward only; nothing emitted before acquisition is
/// replayed and nothing is buffered.
pub struct ScopedSubscription {
	session: Arc<dyn Session>,
	event: EventName,
	id: Option<ListenerId>,
}

impl ScopedSubscription {
	/// Registers `consumer` for the event named by `E`.
	///
	/// Payloads that fail to decode are logged and skipped; they do not fail
	/// the owning operation.
	pub fn acquire<E, F>(session: &Arc<dyn Session>, consumer: F) -> Self
	where
		E: EventPayload,
		F: Fn(E) + Send + Sync + 'static,
	{
		let label = session.label().to_string();
		let listener: Listener = Arc::new(move |params: &Value| match E::deserialize(params) {
			Ok(payload) => consumer(payload),
			Err(e) => {
				tracing::warn!(session = %label, event = %E::NAME, error = %e, "Dropping undecodable event");
			}
		});
		Self::acquire_raw(session, E::NAME, listener)
	}

	/// Registers an untyped listener for `event`.
	pub fn acquire_raw(session: &Arc<dyn Session>, event: EventName, listener: Listener) -> Self {
		let id = session.add_listener(event, listener);
		tracing::debug!(session = session.label(), %event, listener_id = id, "Subscribed");
		Self {
			session: Arc::clone(session),
			event,
			id: Some(id),
		}
	}

	pub fn event(&self) -> EventName {
		self.event
	}

	/// True until the listener has been removed.
	pub fn is_active(&self) -> bool {
		self.id.is_some()
	}

	/// Removes the listener. Equivalent to dropping.
	pub fn release(mut self) {
		self.release_listener();
	}

	fn release_listener(&mut self) {
		if let Some(id) = self.id.take() {
			if !self.session.remove_listener(self.event, id) {
				tracing::debug!(session = self.session.label(), event = %self.event, listener_id = id, "Listener already removed");
			}
		}
	}
}

impl Drop for ScopedSubscription {
	fn drop(&mut self) {
		self.release_listener();
	}
}

impl std::fmt::Debug for ScopedSubscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ScopedSubscription")
			.field("session", &self.session.label())
			.field("event", &self.event)
			.field("active", &self.is_active())
			.finish()
	}
}
