//! In-process [`Session`] and [`Inspector`] implementations.
//!
//! [`MemorySession`] answers requests through a caller-supplied responder
//! and records every request it receives. Responders get the session itself,
//! so they can emit events before answering, the way an engine streams
//! snapshot chunks ahead of the response to the request that produced them.
//!
//! These types back embedders that host the engine in-process and the test
//! suites of the diagnostics crates.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::BoxFuture;
use ndiag_protocol::{EventName, Method};
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::inspector::Inspector;
use crate::listeners::Listeners;
use crate::registry::SessionRegistry;
use crate::session::{Listener, ListenerId, Session};

/// Produces the result for one request.
pub type Responder = Arc<dyn Fn(&MemorySession, Method, &Value) -> Result<Value> + Send + Sync>;

/// A request received by a [`MemorySession`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
	pub method: Method,
	pub params: Value,
}

pub struct MemorySession {
	label: String,
	listeners: Listeners,
	calls: Mutex<Vec<RecordedCall>>,
	responder: Responder,
}

impl MemorySession {
	/// Creates a session that answers every request with an empty mapping.
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			listeners: Listeners::new(),
			calls: Mutex::new(Vec::new()),
			responder: Arc::new(|_, _, _| Ok(json!({}))),
		}
	}

	/// Replaces the responder.
	pub fn with_responder<F>(mut self, responder: F) -> Self
	where
		F: Fn(&MemorySession, Method, &Value) -> Result<Value> + Send + Sync + 'static,
	{
		self.responder = Arc::new(responder);
		self
	}

	/// Delivers an event to the listeners registered for it.
	pub fn emit(&self, event: EventName, params: Value) -> usize {
		self.listeners.emit(event, &params)
	}

	/// Requests received so far, in arrival order.
	pub fn calls(&self) -> Vec<RecordedCall> {
		self.calls.lock().clone()
	}

	pub fn call_count(&self) -> usize {
		self.calls.lock().len()
	}

	/// Methods received so far, in arrival order.
	pub fn methods(&self) -> Vec<Method> {
		self.calls.lock().iter().map(|call| call.method).collect()
	}

	/// Listeners registered across all events.
	pub fn total_listeners(&self) -> usize {
		self.listeners.total()
	}
}

impl Session for MemorySession {
	fn label(&self) -> &str {
		&self.label
	}

	fn post_request(&self, method: Method, params: Value) -> BoxFuture<'_, Result<Value>> {
		Box::pin(async move {
			self.calls.lock().push(RecordedCall {
				method,
				params: params.clone(),
			});
			tokio::task::yield_now().await;
			(self.responder)(self, method, &params)
		})
	}

	fn add_listener(&self, event: EventName, listener: Listener) -> ListenerId {
		self.listeners.add(event, listener)
	}

	fn remove_listener(&self, event: EventName, id: ListenerId) -> bool {
		self.listeners.remove(event, id)
	}

	fn listener_count(&self, event: EventName) -> usize {
		self.listeners.count(event)
	}
}

impl std::fmt::Debug for MemorySession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemorySession")
			.field("label", &self.label)
			.field("listeners", &self.listeners)
			.field("calls", &self.call_count())
			.finish()
	}
}

/// [`Inspector`] over an in-process primary [`MemorySession`].
pub struct MemoryInspector {
	primary: Arc<MemorySession>,
	registry: Arc<SessionRegistry>,
	started: AtomicBool,
}

impl MemoryInspector {
	pub fn new(primary: MemorySession) -> Self {
		Self {
			primary: Arc::new(primary),
			registry: Arc::new(SessionRegistry::new()),
			started: AtomicBool::new(false),
		}
	}

	/// The primary session with its concrete type, for emitting events and
	/// inspecting recorded calls.
	pub fn primary_session(&self) -> &Arc<MemorySession> {
		&self.primary
	}

	pub fn is_started(&self) -> bool {
		self.started.load(Ordering::SeqCst)
	}
}

impl Inspector for MemoryInspector {
	fn start(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			if !self.started.swap(true, Ordering::SeqCst) {
				tracing::debug!(session = self.primary.label(), "In-process inspector started");
			}
			Ok(())
		})
	}

	fn stop(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			if !self.started.swap(false, Ordering::SeqCst) {
				return Err(Error::NotStarted);
			}
			for id in self.registry.ids() {
				self.registry.detach(id.as_str());
			}
			tracing::debug!(session = self.primary.label(), "In-process inspector stopped");
			Ok(())
		})
	}

	fn primary(&self) -> Arc<dyn Session> {
		self.primary.clone()
	}

	fn registry(&self) -> Arc<SessionRegistry> {
		Arc::clone(&self.registry)
	}
}
