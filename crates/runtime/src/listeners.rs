//! Listener table for [`Session`](crate::Session) implementations.
//!
//! Handlers are stored per [`EventName`] in an [`IndexMap`] for O(1) removal
//! and stable insertion order, so delivery follows registration order.

use std::collections::HashMap;

use indexmap::IndexMap;
use ndiag_protocol::EventName;
use parking_lot::Mutex;
use serde_json::Value;

use crate::session::{Listener, ListenerId, next_listener_id};

#[derive(Default)]
pub struct Listeners {
	table: Mutex<HashMap<EventName, IndexMap<ListenerId, Listener>>>,
}

impl Listeners {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&self, event: EventName, listener: Listener) -> ListenerId {
		let id = next_listener_id();
		self.table
			.lock()
			.entry(event)
			.or_default()
			.insert(id, listener);
		id
	}

	pub fn remove(&self, event: EventName, id: ListenerId) -> bool {
		let mut table = self.table.lock();
		let Some(handlers) = table.get_mut(&event) else {
			return false;
		};
		let removed = handlers.shift_remove(&id).is_some();
		if handlers.is_empty() {
			table.remove(&event);
		}
		removed
	}

	pub fn count(&self, event: EventName) -> usize {
		self.table.lock().get(&event).map_or(0, IndexMap::len)
	}

	/// Listeners registered across all events.
	pub fn total(&self) -> usize {
		self.table.lock().values().map(IndexMap::len).sum()
	}

	/// Delivers `params` to every listener of `event`, returning how many ran.
	///
	/// Handlers are snapshotted before the lock is released, so a handler may
	/// add or remove listeners without deadlocking.
	pub fn emit(&self, event: EventName, params: &Value) -> usize {
		let handlers: Vec<Listener> = {
			let table = self.table.lock();
			match table.get(&event) {
				Some(handlers) => handlers.values().cloned().collect(),
				None => return 0,
			}
		};

		for handler in &handlers {
			handler(params);
		}
		handlers.len()
	}
}

impl std::fmt::Debug for Listeners {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Listeners")
			.field("total", &self.total())
			.finish()
	}
}
