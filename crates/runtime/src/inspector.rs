//! Handle to a running instrumentation endpoint.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::Result;
use crate::registry::SessionRegistry;
use crate::session::Session;

/// What the diagnostics layer needs from the transport that owns the
/// sessions: lifecycle control, the primary session, and the registry of
/// secondary sessions.
///
/// The primary session is handed out directly and never looked up by id.
pub trait Inspector: Send + Sync {
	/// Opens the primary session.
	fn start(&self) -> BoxFuture<'_, Result<()>>;

	/// Closes the primary session and drops attached secondary sessions.
	fn stop(&self) -> BoxFuture<'_, Result<()>>;

	fn primary(&self) -> Arc<dyn Session>;

	fn registry(&self) -> Arc<SessionRegistry>;
}
