//! Controller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default time [`Diagnostics::wait_for_session`](crate::Diagnostics::wait_for_session)
/// waits for a secondary session to attach.
pub const DEFAULT_SESSION_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Trace category collected when a request names none.
pub const DEFAULT_TRACE_CATEGORY: &str = "node";

/// Defaults applied by the [`Diagnostics`](crate::Diagnostics) controller.
///
/// Deserializes from a partial mapping; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticsConfig {
	/// Default for `includeCommandLineAPI` on evaluation requests.
	pub include_command_line_api: bool,
	/// Categories traced when a trace request passes an empty list.
	pub default_trace_categories: Vec<String>,
	/// Upper bound on waits for secondary sessions, in milliseconds.
	pub session_wait_timeout_ms: u64,
}

impl Default for DiagnosticsConfig {
	fn default() -> Self {
		Self {
			include_command_line_api: true,
			default_trace_categories: vec![DEFAULT_TRACE_CATEGORY.to_string()],
			session_wait_timeout_ms: DEFAULT_SESSION_WAIT_TIMEOUT_MS,
		}
	}
}

impl DiagnosticsConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn include_command_line_api(mut self, include: bool) -> Self {
		self.include_command_line_api = include;
		self
	}

	pub fn default_trace_categories<I, S>(mut self, categories: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.default_trace_categories = categories.into_iter().map(Into::into).collect();
		self
	}

	pub fn session_wait_timeout(mut self, timeout: Duration) -> Self {
		self.session_wait_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
		self
	}

	pub fn session_wait_timeout_duration(&self) -> Duration {
		Duration::from_millis(self.session_wait_timeout_ms)
	}
}
