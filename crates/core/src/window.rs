//! Duration windows for sampling and tracing operations.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Wall-clock interval an operation stays active, independent of how much
/// data it produces.
///
/// Serializes as whole milliseconds. A zero window is legal and elapses
/// immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct DurationWindow(Duration);

impl DurationWindow {
	pub const ZERO: Self = Self(Duration::ZERO);

	pub const fn from_millis(millis: u64) -> Self {
		Self(Duration::from_millis(millis))
	}

	pub fn as_duration(self) -> Duration {
		self.0
	}

	pub fn as_millis(self) -> u64 {
		u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
	}

	pub fn is_zero(self) -> bool {
		self.0.is_zero()
	}

	/// Waits out the window on the runtime timer without blocking other tasks.
	pub async fn elapse(self) {
		if self.is_zero() {
			return;
		}
		tokio::time::sleep(self.0).await;
	}
}

impl From<Duration> for DurationWindow {
	fn from(duration: Duration) -> Self {
		Self(duration)
	}
}

impl From<u64> for DurationWindow {
	fn from(millis: u64) -> Self {
		Self::from_millis(millis)
	}
}

impl From<DurationWindow> for u64 {
	fn from(window: DurationWindow) -> Self {
		window.as_millis()
	}
}

impl From<DurationWindow> for Duration {
	fn from(window: DurationWindow) -> Self {
		window.0
	}
}
