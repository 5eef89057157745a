//! `Profiler` domain: sampling CPU profiler.

use serde::{Deserialize, Serialize};

use crate::method::{Command, Empty, Method};

/// Location of a function in a script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
	pub function_name: String,
	pub script_id: String,
	pub url: String,
	pub line_number: i64,
	pub column_number: i64,
}

/// Sample count for a single source line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionTickInfo {
	pub line: i64,
	pub ticks: i64,
}

/// A node in the CPU profile call tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileNode {
	pub id: i64,
	pub call_frame: CallFrame,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hit_count: Option<i64>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub deopt_reason: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub position_ticks: Vec<PositionTickInfo>,
}

/// CPU profile artifact returned by `Profiler.stop`.
///
/// Serializes back to the `.cpuprofile` JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuProfile {
	pub nodes: Vec<ProfileNode>,
	/// Profiling start timestamp in microseconds.
	pub start_time: f64,
	/// Profiling end timestamp in microseconds.
	pub end_time: f64,
	/// Ids of the sampled top nodes.
	#[serde(default)]
	pub samples: Vec<i64>,
	/// Intervals between adjacent samples in microseconds.
	#[serde(default)]
	pub time_deltas: Vec<i64>,
}

impl CpuProfile {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Wall-clock span covered by the profile, in microseconds.
	pub fn duration_micros(&self) -> f64 {
		(self.end_time - self.start_time).max(0.0)
	}
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Enable;

impl Command for Enable {
	const METHOD: Method = Method::ProfilerEnable;
	type Response = Empty;
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Disable;

impl Command for Disable {
	const METHOD: Method = Method::ProfilerDisable;
	type Response = Empty;
}

/// Changes the sampling interval. Must be sent before `Profiler.start`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SetSamplingInterval {
	/// Sampling interval in microseconds.
	pub interval: u64,
}

impl Command for SetSamplingInterval {
	const METHOD: Method = Method::ProfilerSetSamplingInterval;
	type Response = Empty;
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Start;

impl Command for Start {
	const METHOD: Method = Method::ProfilerStart;
	type Response = Empty;
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Stop;

#[derive(Debug, Clone, Deserialize)]
pub struct StopResponse {
	pub profile: CpuProfile,
}

impl Command for Stop {
	const METHOD: Method = Method::ProfilerStop;
	type Response = StopResponse;
}
