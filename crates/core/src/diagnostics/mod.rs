//! [`Diagnostics`] controller over the primary and secondary sessions.
//!
//! Every operation resolves its [`Target`] first: the primary session is
//! used directly, a secondary id goes through the [`SessionValidator`] before
//! any request is issued. Operations that stream data hold a
//! [`ScopedSubscription`](crate::ScopedSubscription) for exactly their own
//! duration.
//!
//! Two concurrent operations on the same session that listen to the same
//! event both see every matching event. Avoiding that overlap is up to the
//! caller.

mod cpu;
mod eval;
mod heap;
mod trace;

use std::sync::Arc;

use ndiag_runtime::{
	Channel, Error, Inspector, Result, Session, SessionEvents, SessionId, SessionRegistry,
};

use crate::config::DiagnosticsConfig;
use crate::validator::{SessionValidator, Target};

/// Heap, CPU, evaluation, and trace diagnostics over an [`Inspector`].
///
/// The controller borrows sessions from the inspector; it never attaches,
/// detaches, or closes them.
pub struct Diagnostics {
	inspector: Arc<dyn Inspector>,
	primary: Arc<dyn Session>,
	validator: SessionValidator,
	config: DiagnosticsConfig,
}

impl Diagnostics {
	/// Creates a controller with the default [`DiagnosticsConfig`].
	pub fn new(inspector: Arc<dyn Inspector>) -> Self {
		Self::with_config(inspector, DiagnosticsConfig::default())
	}

	pub fn with_config(inspector: Arc<dyn Inspector>, config: DiagnosticsConfig) -> Self {
		let primary = inspector.primary();
		let validator = SessionValidator::new(inspector.registry());
		Self {
			inspector,
			primary,
			validator,
			config,
		}
	}

	/// Starts the underlying inspector.
	pub async fn start(&self) -> Result<()> {
		self.inspector.start().await?;
		tracing::info!(session = self.primary.label(), "Diagnostics started");
		Ok(())
	}

	/// Stops the underlying inspector.
	pub async fn stop(&self) -> Result<()> {
		self.inspector.stop().await?;
		tracing::info!(session = self.primary.label(), "Diagnostics stopped");
		Ok(())
	}

	pub fn config(&self) -> &DiagnosticsConfig {
		&self.config
	}

	pub fn registry(&self) -> &Arc<SessionRegistry> {
		self.validator.registry()
	}

	/// Ids of the currently attached secondary sessions.
	pub fn sessions(&self) -> Vec<SessionId> {
		self.registry().ids()
	}

	/// Attach/detach events published from now on.
	pub fn session_events(&self) -> SessionEvents {
		self.registry().subscribe()
	}

	/// Waits until a secondary session with `id` is attached, bounded by the
	/// configured session wait timeout.
	pub async fn wait_for_session(&self, id: impl Into<SessionId>) -> Result<Target> {
		let id = id.into();
		self.registry()
			.wait_for(id.as_str(), self.config.session_wait_timeout_duration())
			.await?;
		Ok(Target::Session(id))
	}

	/// Waits for the next secondary session to attach after this call,
	/// bounded by the configured session wait timeout.
	///
	/// Sessions attached before the call are not reported; use
	/// [`sessions`](Self::sessions) for those.
	pub async fn next_attached(&self) -> Result<Target> {
		let mut events = self.session_events();
		let timeout = self.config.session_wait_timeout_duration();

		match tokio::time::timeout(timeout, events.next_attached()).await {
			Ok(Some((id, _))) => Ok(Target::Session(id)),
			Ok(None) => Err(Error::ChannelClosed),
			Err(_) => Err(Error::Timeout(
				"Timeout waiting for a session to attach".to_string(),
			)),
		}
	}

	/// Resolves `target` to a channel. Secondary ids are validated here, before
	/// any request is issued.
	fn resolve(&self, target: &Target) -> Result<Channel> {
		let session = match target {
			Target::Primary => Arc::clone(&self.primary),
			Target::Session(id) => self.validator.validate(id)?,
		};
		Ok(Channel::new(session))
	}
}

impl std::fmt::Debug for Diagnostics {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Diagnostics")
			.field("primary", &self.primary.label())
			.field("sessions", &self.sessions())
			.field("config", &self.config)
			.finish()
	}
}
