//! Channel - typed request proxy over a [`Session`].
//!
//! The Channel turns a [`Command`] into the untyped `post_request` call the
//! session understands and decodes the result into the command's response.

use std::sync::Arc;

use ndiag_protocol::Command;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::session::Session;

/// Channel provides typed RPC for one session.
#[derive(Clone)]
pub struct Channel {
	session: Arc<dyn Session>,
}

impl Channel {
	/// Creates a new Channel for the given session.
	pub fn new(session: Arc<dyn Session>) -> Self {
		Self { session }
	}

	/// Sends a command and awaits its typed response.
	///
	/// Unit commands serialize to `null`; they are sent as an empty mapping.
	/// A `null` result is decoded as an empty mapping for the same reason.
	pub async fn send<C>(&self, command: C) -> Result<C::Response>
	where
		C: Command + Send,
	{
		let params = empty_if_null(serde_json::to_value(&command)?);
		tracing::debug!(session = self.label(), method = %C::METHOD, "Sending request");

		let response = self.session.post_request(C::METHOD, params).await?;
		serde_json::from_value(empty_if_null(response)).map_err(Into::into)
	}

	/// Sends a command whose result carries nothing of interest.
	pub async fn send_no_result<C>(&self, command: C) -> Result<()>
	where
		C: Command + Send,
	{
		let params = empty_if_null(serde_json::to_value(&command)?);
		tracing::debug!(session = self.label(), method = %C::METHOD, "Sending request");

		self.session.post_request(C::METHOD, params).await?;
		Ok(())
	}

	/// Returns the session this channel talks to.
	pub fn session(&self) -> &Arc<dyn Session> {
		&self.session
	}

	/// Returns the session label used in logs.
	pub fn label(&self) -> &str {
		self.session.label()
	}
}

fn empty_if_null(value: Value) -> Value {
	match value {
		Value::Null => Value::Object(Map::new()),
		other => other,
	}
}

impl std::fmt::Debug for Channel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Channel")
			.field("session", &self.label())
			.finish()
	}
}
