//! Thread-safe registry of secondary sessions with attach/detach events.
//!
//! Uses [`DashMap`] for lock-free concurrent access. Per-id [`Notify`]
//! ensures only relevant waiters wake up, and [`SessionRegistry::wait_for`]
//! registers waiters before checking to prevent lost wakeups.
//!
//! The transport owns the registry's contents: it calls
//! [`attach`](SessionRegistry::attach) and [`detach`](SessionRegistry::detach)
//! as contexts come and go. Everyone else only reads from it or observes the
//! [`SessionEvent`] stream.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Notify, broadcast};

use crate::error::{Error, Result};
use crate::session::{Session, SessionId};

const EVENT_CAPACITY: usize = 64;

/// Change in the set of secondary sessions.
#[derive(Clone)]
pub enum SessionEvent {
	/// A secondary context attached and its session is ready for requests.
	Attached {
		id: SessionId,
		session: Arc<dyn Session>,
	},
	/// A secondary context went away.
	Detached { id: SessionId },
}

impl SessionEvent {
	pub fn id(&self) -> &SessionId {
		match self {
			Self::Attached { id, .. } | Self::Detached { id } => id,
		}
	}
}

impl std::fmt::Debug for SessionEvent {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Attached { id, .. } => f.debug_struct("Attached").field("id", id).finish(),
			Self::Detached { id } => f.debug_struct("Detached").field("id", id).finish(),
		}
	}
}

/// Registry of attached secondary sessions by id.
pub struct SessionRegistry {
	sessions: DashMap<SessionId, Arc<dyn Session>>,
	waiters: DashMap<SessionId, Arc<Notify>>,
	events: broadcast::Sender<SessionEvent>,
}

impl Default for SessionRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl SessionRegistry {
	pub fn new() -> Self {
		let (events, _) = broadcast::channel(EVENT_CAPACITY);
		Self {
			sessions: DashMap::new(),
			waiters: DashMap::new(),
			events,
		}
	}

	/// Registers a session, notifies waiters for its id, and publishes
	/// [`SessionEvent::Attached`]. Returns the session previously held under
	/// the same id, if any.
	pub fn attach(
		&self,
		id: impl Into<SessionId>,
		session: Arc<dyn Session>,
	) -> Option<Arc<dyn Session>> {
		let id = id.into();
		let previous = self.sessions.insert(id.clone(), Arc::clone(&session));
		if let Some((_, notify)) = self.waiters.remove(&id) {
			notify.notify_waiters();
		}

		tracing::debug!(session_id = %id, "Secondary session attached");
		let _ = self.events.send(SessionEvent::Attached { id, session });
		previous
	}

	/// Removes a session and publishes [`SessionEvent::Detached`] if it was present.
	pub fn detach(&self, id: &str) -> Option<Arc<dyn Session>> {
		let (id, session) = self.sessions.remove(id)?;
		tracing::debug!(session_id = %id, "Secondary session detached");
		let _ = self.events.send(SessionEvent::Detached { id });
		Some(session)
	}

	/// Synchronous lookup.
	pub fn get(&self, id: &str) -> Option<Arc<dyn Session>> {
		self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
	}

	pub fn contains(&self, id: &str) -> bool {
		self.sessions.contains_key(id)
	}

	/// Ids of the currently attached sessions, sorted.
	pub fn ids(&self) -> Vec<SessionId> {
		let mut ids: Vec<SessionId> = self.sessions.iter().map(|e| e.key().clone()).collect();
		ids.sort();
		ids
	}

	pub fn len(&self) -> usize {
		self.sessions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sessions.is_empty()
	}

	/// Subscribes to attach/detach events published after this call.
	pub fn subscribe(&self) -> SessionEvents {
		SessionEvents::new(self.events.subscribe())
	}

	/// Waits for a session to be attached, with timeout.
	///
	/// Registers waiter before checking to prevent lost wakeups.
	pub async fn wait_for(&self, id: &str, timeout: Duration) -> Result<Arc<dyn Session>> {
		let key = SessionId::from(id);
		let deadline = tokio::time::Instant::now() + timeout;

		loop {
			let notify = self
				.waiters
				.entry(key.clone())
				.or_insert_with(|| Arc::new(Notify::new()))
				.clone();
			let notified = notify.notified();

			if let Some(session) = self.get(id) {
				self.forget_waiter(&key);
				return Ok(session);
			}

			let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
			if remaining.is_zero() {
				self.forget_waiter(&key);
				return Err(Self::timeout_error(id));
			}

			tokio::select! {
				biased;
				_ = notified => {}
				_ = tokio::time::sleep(remaining) => {
					self.forget_waiter(&key);
					return Err(Self::timeout_error(id));
				}
			}
		}
	}

	/// Drops the waiter entry for `key` unless another `wait_for` still holds it.
	///
	/// The caller must hold its own clone of the entry's `Notify`, so a count
	/// of two means the map and the caller are the only owners.
	fn forget_waiter(&self, key: &SessionId) {
		self.waiters
			.remove_if(key, |_, notify| Arc::strong_count(notify) <= 2);
	}

	fn timeout_error(id: &str) -> Error {
		Error::Timeout(format!("Timeout waiting for session: {id}"))
	}
}

impl std::fmt::Debug for SessionRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SessionRegistry")
			.field("ids", &self.ids())
			.finish()
	}
}

/// Stream of [`SessionEvent`]s with automatic lag handling.
///
/// Lagging is logged and skipped rather than surfaced, so a slow observer
/// never breaks its receive loop.
pub struct SessionEvents {
	rx: broadcast::Receiver<SessionEvent>,
}

impl SessionEvents {
	fn new(rx: broadcast::Receiver<SessionEvent>) -> Self {
		Self { rx }
	}

	/// Receives the next event, or `None` once the registry is dropped.
	pub async fn recv(&mut self) -> Option<SessionEvent> {
		loop {
			match self.rx.recv().await {
				Ok(event) => return Some(event),
				Err(broadcast::error::RecvError::Lagged(n)) => {
					tracing::warn!(dropped = n, "Session event stream lagged, dropped events");
				}
				Err(broadcast::error::RecvError::Closed) => return None,
			}
		}
	}

	/// Attempts to receive an event without blocking.
	pub fn try_recv(&mut self) -> Option<SessionEvent> {
		loop {
			match self.rx.try_recv() {
				Ok(event) => return Some(event),
				Err(broadcast::error::TryRecvError::Lagged(n)) => {
					tracing::warn!(dropped = n, "Session event stream lagged, dropped events");
				}
				Err(
					broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
				) => return None,
			}
		}
	}

	/// Waits for the next [`SessionEvent::Attached`], skipping detach events.
	pub async fn next_attached(&mut self) -> Option<(SessionId, Arc<dyn Session>)> {
		while let Some(event) = self.recv().await {
			if let SessionEvent::Attached { id, session } = event {
				return Some((id, session));
			}
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory::MemorySession;

	fn session(label: &str) -> Arc<dyn Session> {
		Arc::new(MemorySession::new(label))
	}

	#[test]
	fn attach_get_detach() {
		let registry = SessionRegistry::new();
		assert!(registry.is_empty());

		assert!(registry.attach("a", session("a")).is_none());
		assert!(registry.contains("a"));
		assert_eq!(registry.get("a").unwrap().label(), "a");

		assert!(registry.detach("a").is_some());
		assert!(registry.get("a").is_none());
		assert!(registry.detach("a").is_none());
	}

	#[test]
	fn reattach_returns_previous() {
		let registry = SessionRegistry::new();
		registry.attach("a", session("first"));
		let previous = registry.attach("a", session("second")).unwrap();
		assert_eq!(previous.label(), "first");
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn ids_are_sorted() {
		let registry = SessionRegistry::new();
		registry.attach("c", session("c"));
		registry.attach("a", session("a"));
		registry.attach("b", session("b"));
		let ids: Vec<String> = registry.ids().iter().map(ToString::to_string).collect();
		assert_eq!(ids, ["a", "b", "c"]);
	}

	#[tokio::test]
	async fn events_follow_attach_and_detach() {
		let registry = SessionRegistry::new();
		let mut events = registry.subscribe();

		registry.attach("w1", session("w1"));
		registry.detach("w1");

		match events.recv().await.unwrap() {
			SessionEvent::Attached { id, session } => {
				assert_eq!(id.as_str(), "w1");
				assert_eq!(session.label(), "w1");
			}
			other => panic!("expected Attached, got {other:?}"),
		}
		assert!(matches!(events.try_recv(), Some(SessionEvent::Detached { .. })));
		assert!(events.try_recv().is_none());
	}

	#[tokio::test]
	async fn detach_of_unknown_id_publishes_nothing() {
		let registry = SessionRegistry::new();
		let mut events = registry.subscribe();
		registry.detach("ghost");
		assert!(events.try_recv().is_none());
	}

	#[tokio::test]
	async fn next_attached_skips_detach_events() {
		let registry = Arc::new(SessionRegistry::new());
		let mut events = registry.subscribe();

		registry.attach("old", session("old"));
		registry.detach("old");
		registry.attach("new", session("new"));

		let (id, _) = events.next_attached().await.unwrap();
		assert_eq!(id.as_str(), "old");
		let (id, _) = events.next_attached().await.unwrap();
		assert_eq!(id.as_str(), "new");
	}

	#[tokio::test]
	async fn wait_for_resolves_on_later_attach() {
		let registry = Arc::new(SessionRegistry::new());

		let registry_ref = Arc::clone(&registry);
		tokio::spawn(async move {
			tokio::time::sleep(Duration::from_millis(10)).await;
			registry_ref.attach("late", session("late"));
		});

		let found = registry
			.wait_for("late", Duration::from_secs(5))
			.await
			.unwrap();
		assert_eq!(found.label(), "late");
	}

	#[tokio::test(start_paused = true)]
	async fn timed_out_waits_leave_no_waiters_behind() {
		let registry = SessionRegistry::new();

		for i in 0..100 {
			let result = registry
				.wait_for(&format!("never-{i}"), Duration::from_millis(1))
				.await;
			assert!(result.err().unwrap().is_timeout());
		}
		assert_eq!(registry.waiters.len(), 0);

		registry.attach("a", session("a"));
		registry.detach("a");
		assert_eq!(registry.waiters.len(), 0);
	}

	#[tokio::test]
	async fn satisfied_wait_leaves_no_waiter_behind() {
		let registry = SessionRegistry::new();
		registry.attach("present", session("present"));

		let found = registry
			.wait_for("present", Duration::from_millis(10))
			.await
			.unwrap();
		assert_eq!(found.label(), "present");
		assert_eq!(registry.waiters.len(), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn concurrent_waiter_keeps_shared_entry() {
		let registry = Arc::new(SessionRegistry::new());

		let long = {
			let registry = Arc::clone(&registry);
			tokio::spawn(async move {
				registry
					.wait_for("shared", Duration::from_secs(5))
					.await
					.map(|session| session.label().to_string())
			})
		};
		tokio::task::yield_now().await;

		let short = registry.wait_for("shared", Duration::from_millis(10)).await;
		assert!(short.err().unwrap().is_timeout());
		assert_eq!(registry.waiters.len(), 1);

		registry.attach("shared", session("shared"));
		assert_eq!(long.await.unwrap().unwrap(), "shared");
		assert_eq!(registry.waiters.len(), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn wait_for_times_out() {
		let registry = SessionRegistry::new();
		let err = registry
			.wait_for("never", Duration::from_millis(50))
			.await
			.err()
			.unwrap();
		assert!(err.is_timeout());
		assert!(err.to_string().contains("never"));
	}
}
