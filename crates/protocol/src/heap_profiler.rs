//! `HeapProfiler` domain: heap snapshots, allocation tracking, and sampling.

use serde::{Deserialize, Serialize};

use crate::method::{Command, Empty, EventName, EventPayload, Method};
use crate::profiler::CallFrame;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Enable;

impl Command for Enable {
	const METHOD: Method = Method::HeapProfilerEnable;
	type Response = Empty;
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Disable;

impl Command for Disable {
	const METHOD: Method = Method::HeapProfilerDisable;
	type Response = Empty;
}

/// Serializes the heap as a stream of [`AddHeapSnapshotChunk`] events.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeHeapSnapshot {
	/// Emit [`ReportHeapSnapshotProgress`] events while taking the snapshot.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub report_progress: Option<bool>,
	/// Include numeric values in the snapshot.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub capture_numeric_value: Option<bool>,
}

impl Command for TakeHeapSnapshot {
	const METHOD: Method = Method::HeapProfilerTakeHeapSnapshot;
	type Response = Empty;
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTrackingHeapObjects {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub track_allocations: Option<bool>,
}

impl Command for StartTrackingHeapObjects {
	const METHOD: Method = Method::HeapProfilerStartTrackingHeapObjects;
	type Response = Empty;
}

/// Stops tracking; the engine emits the tracked snapshot as chunk events
/// before responding.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTrackingHeapObjects {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub report_progress: Option<bool>,
}

impl Command for StopTrackingHeapObjects {
	const METHOD: Method = Method::HeapProfilerStopTrackingHeapObjects;
	type Response = Empty;
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSampling {
	/// Average sample interval in bytes.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sampling_interval: Option<u64>,
}

impl Command for StartSampling {
	const METHOD: Method = Method::HeapProfilerStartSampling;
	type Response = Empty;
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StopSampling;

#[derive(Debug, Clone, Deserialize)]
pub struct StopSamplingResponse {
	pub profile: SamplingHeapProfile,
}

impl Command for StopSampling {
	const METHOD: Method = Method::HeapProfilerStopSampling;
	type Response = StopSamplingResponse;
}

/// Node of the sampled allocation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingHeapProfileNode {
	pub call_frame: CallFrame,
	/// Allocations attributed directly to this node, in bytes.
	pub self_size: f64,
	pub id: i64,
	#[serde(default)]
	pub children: Vec<SamplingHeapProfileNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingHeapProfileSample {
	pub size: f64,
	pub node_id: i64,
	pub ordinal: f64,
}

/// Heap profile artifact returned by `HeapProfiler.stopSampling`.
///
/// Serializes back to the `.heapprofile` JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingHeapProfile {
	pub head: SamplingHeapProfileNode,
	#[serde(default)]
	pub samples: Vec<SamplingHeapProfileSample>,
}

impl SamplingHeapProfile {
	/// True when nothing was sampled below the root.
	pub fn is_empty(&self) -> bool {
		self.head.children.is_empty() && self.head.self_size == 0.0 && self.samples.is_empty()
	}

	/// Total sampled bytes across the tree.
	pub fn total_size(&self) -> f64 {
		fn walk(node: &SamplingHeapProfileNode) -> f64 {
			node.self_size + node.children.iter().map(walk).sum::<f64>()
		}
		walk(&self.head)
	}
}

/// A fragment of a serialized heap snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddHeapSnapshotChunk {
	pub chunk: String,
}

impl EventPayload for AddHeapSnapshotChunk {
	const NAME: EventName = EventName::HeapSnapshotChunk;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportHeapSnapshotProgress {
	pub done: u64,
	pub total: u64,
	#[serde(default)]
	pub finished: Option<bool>,
}

impl EventPayload for ReportHeapSnapshotProgress {
	const NAME: EventName = EventName::HeapSnapshotProgress;
}
