//! `NodeTracing` domain: trace event collection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::method::{Command, Empty, EventName, EventPayload, Method};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceConfig {
	/// Buffering mode (`recordUntilFull`, `recordContinuously`, `recordAsMuchAsPossible`).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub record_mode: Option<String>,
	pub included_categories: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Start {
	pub trace_config: TraceConfig,
}

impl Start {
	pub fn categories(categories: Vec<String>) -> Self {
		Self {
			trace_config: TraceConfig {
				record_mode: None,
				included_categories: categories,
			},
		}
	}
}

impl Command for Start {
	const METHOD: Method = Method::NodeTracingStart;
	type Response = Empty;
}

/// Stops tracing; buffered data is flushed as [`DataCollected`] events
/// followed by [`TracingComplete`].
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Stop;

impl Command for Stop {
	const METHOD: Method = Method::NodeTracingStop;
	type Response = Empty;
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GetCategories;

#[derive(Debug, Clone, Deserialize)]
pub struct GetCategoriesResponse {
	pub categories: Vec<String>,
}

impl Command for GetCategories {
	const METHOD: Method = Method::NodeTracingGetCategories;
	type Response = GetCategoriesResponse;
}

/// A batch of trace events in Trace Event Format.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataCollected {
	pub value: Vec<Value>,
}

impl EventPayload for DataCollected {
	const NAME: EventName = EventName::TraceDataCollected;
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TracingComplete {}

impl EventPayload for TracingComplete {
	const NAME: EventName = EventName::TracingComplete;
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn start_wraps_categories_in_trace_config() {
		let params = serde_json::to_value(Start::categories(vec!["node".to_string()])).unwrap();
		assert_eq!(params, json!({"traceConfig": {"includedCategories": ["node"]}}));
	}

	#[test]
	fn data_collected_keeps_raw_events() {
		let data: DataCollected = serde_json::from_value(json!({
			"value": [{"name": "RunTask", "cat": "node", "ph": "X", "ts": 1, "pid": 1, "tid": 1}]
		}))
		.unwrap();
		assert_eq!(data.value.len(), 1);
		assert_eq!(data.value[0]["cat"], "node");
	}

	#[test]
	fn tracing_complete_accepts_empty_params() {
		let done: TracingComplete = serde_json::from_value(json!({})).unwrap();
		assert_eq!(done, TracingComplete::default());
	}
}
