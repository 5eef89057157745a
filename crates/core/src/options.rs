//! Option structs for controller operations.

use serde::{Deserialize, Serialize};

use crate::window::DurationWindow;

/// Options for [`Diagnostics::take_snapshot_with`](crate::Diagnostics::take_snapshot_with).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotOptions {
	/// Ask the engine for progress events while serializing.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub report_progress: Option<bool>,
	/// Include numeric values in the snapshot.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub capture_numeric_value: Option<bool>,
}

/// Options for [`Diagnostics::track_objects`](crate::Diagnostics::track_objects).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackOptions {
	pub duration: DurationWindow,
	/// Record allocation stacks while tracking.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub track_allocations: Option<bool>,
	/// Ask for progress events while the tracked snapshot is written out.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub report_progress: Option<bool>,
}

impl TrackOptions {
	pub fn new(duration: impl Into<DurationWindow>) -> Self {
		Self {
			duration: duration.into(),
			track_allocations: None,
			report_progress: None,
		}
	}

	pub fn track_allocations(mut self, track: bool) -> Self {
		self.track_allocations = Some(track);
		self
	}

	pub fn report_progress(mut self, report: bool) -> Self {
		self.report_progress = Some(report);
		self
	}
}

/// Options for CPU and heap profile capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileOptions {
	/// Sampling interval: microseconds for CPU profiles, bytes for heap
	/// profiles. `None` or zero keeps the engine default.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub interval: Option<u64>,
	pub duration: DurationWindow,
}

impl ProfileOptions {
	pub fn new(duration: impl Into<DurationWindow>) -> Self {
		Self {
			interval: None,
			duration: duration.into(),
		}
	}

	pub fn interval(mut self, interval: u64) -> Self {
		self.interval = Some(interval);
		self
	}

	/// The interval to send, if any.
	pub(crate) fn effective_interval(&self) -> Option<u64> {
		self.interval.filter(|interval| *interval > 0)
	}
}

/// Options for [`Diagnostics::collect_trace_events`](crate::Diagnostics::collect_trace_events).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TraceOptions {
	pub duration: DurationWindow,
	/// Categories to include. Empty falls back to the configured defaults.
	pub categories: Vec<String>,
}

impl TraceOptions {
	pub fn new(duration: impl Into<DurationWindow>) -> Self {
		Self {
			duration: duration.into(),
			categories: Vec::new(),
		}
	}

	pub fn categories<I, S>(mut self, categories: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.categories = categories.into_iter().map(Into::into).collect();
		self
	}
}
