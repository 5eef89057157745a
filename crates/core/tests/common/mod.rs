//! Scripted in-process engine shared by the integration tests.
//!
//! The responder mimics how an engine answers the diagnostics domains: heap
//! snapshot chunks stream ahead of the response that produced them, trace
//! batches flush while `NodeTracing.stop` is in flight, and evaluation of an
//! undeclared identifier reports a `ReferenceError`.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use ndiag::{
	Diagnostics, DiagnosticsConfig, EventName, Inspector, MemoryInspector, MemorySession, Method,
	Result,
};
use serde_json::{Value, json};

pub const SNAPSHOT_CHUNKS: [&str; 3] = [
	r#"{"snapshot":{"meta":{},"node_count":2},"#,
	r#""nodes":[0,1,2,3],"edges":[],"#,
	r#""strings":["(root)","Object"]}"#,
];

/// Primary session plus the controller driving it.
pub struct Fixture {
	pub inspector: Arc<MemoryInspector>,
	pub diagnostics: Diagnostics,
}

impl Fixture {
	pub fn new() -> Self {
		Self::with_config(DiagnosticsConfig::default())
	}

	pub fn with_config(config: DiagnosticsConfig) -> Self {
		init_tracing();
		let inspector = Arc::new(MemoryInspector::new(engine("primary")));
		let diagnostics = Diagnostics::with_config(inspector.clone(), config);
		Self {
			inspector,
			diagnostics,
		}
	}

	pub fn primary(&self) -> &Arc<MemorySession> {
		self.inspector.primary_session()
	}

	/// Attaches a scripted secondary session under `id`.
	pub fn attach_worker(&self, id: &str) -> Arc<MemorySession> {
		let worker = Arc::new(engine(id));
		self.inspector.registry().attach(id, worker.clone());
		worker
	}
}

/// A session scripted like a live engine.
pub fn engine(label: &str) -> MemorySession {
	MemorySession::new(label).with_responder(respond)
}

/// A session that rejects `method` and otherwise behaves like [`engine`].
pub fn failing_engine(label: &str, method: Method, message: &'static str) -> MemorySession {
	MemorySession::new(label).with_responder(move |session, called, params| {
		if called == method {
			return Err(ndiag::Error::protocol(called, message));
		}
		respond(session, called, params)
	})
}

fn respond(session: &MemorySession, method: Method, params: &Value) -> Result<Value> {
	match method {
		Method::HeapProfilerTakeHeapSnapshot => {
			let total = SNAPSHOT_CHUNKS.len();
			let report_progress = params["reportProgress"] == json!(true);
			for (done, chunk) in SNAPSHOT_CHUNKS.into_iter().enumerate() {
				if report_progress {
					session.emit(
						EventName::HeapSnapshotProgress,
						json!({ "done": done, "total": total }),
					);
				}
				session.emit(EventName::HeapSnapshotChunk, json!({ "chunk": chunk }));
			}
			if report_progress {
				session.emit(
					EventName::HeapSnapshotProgress,
					json!({ "done": total, "total": total, "finished": true }),
				);
			}
			Ok(json!({}))
		}
		Method::HeapProfilerStopTrackingHeapObjects => {
			for chunk in SNAPSHOT_CHUNKS {
				session.emit(EventName::HeapSnapshotChunk, json!({ "chunk": chunk }));
			}
			Ok(json!({}))
		}
		Method::ProfilerStop => Ok(json!({ "profile": cpu_profile() })),
		Method::HeapProfilerStopSampling => Ok(json!({ "profile": heap_profile() })),
		Method::RuntimeEvaluate => Ok(evaluate(params)),
		Method::NodeTracingStop => {
			let categories = session
				.calls()
				.iter()
				.rev()
				.find(|call| call.method == Method::NodeTracingStart)
				.map(|call| call.params["traceConfig"]["includedCategories"].clone())
				.unwrap_or_else(|| json!([]));
			session.emit(
				EventName::TraceDataCollected,
				json!({ "value": [
					{"cat": categories[0], "name": "Environment", "ph": "I", "pid": 1, "tid": 1, "ts": 10},
					{"cat": categories[0], "name": "RunTimers", "ph": "X", "pid": 1, "tid": 1, "ts": 20, "dur": 5},
				]}),
			);
			session.emit(EventName::TracingComplete, json!({}));
			Ok(json!({}))
		}
		Method::NodeTracingGetCategories => Ok(json!({ "categories": ["node", "node.async_hooks", "v8"] })),
		_ => Ok(json!({})),
	}
}

fn evaluate(params: &Value) -> Value {
	let expression = params["expression"].as_str().unwrap_or_default();
	match expression {
		"1 + 1" => json!({ "result": { "type": "number", "value": 2, "description": "2" } }),
		"x.a" => json!({
			"result": {
				"type": "object",
				"subtype": "error",
				"className": "ReferenceError",
				"description": "ReferenceError: x is not defined\n    at <anonymous>:1:1",
			},
			"exceptionDetails": {
				"exceptionId": 1,
				"text": "Uncaught",
				"lineNumber": 0,
				"columnNumber": 0,
				"exception": {
					"type": "object",
					"subtype": "error",
					"className": "ReferenceError",
					"description": "ReferenceError: x is not defined\n    at <anonymous>:1:1",
				},
			},
		}),
		_ => json!({ "result": { "type": "undefined" } }),
	}
}

fn call_frame(name: &str, line: i64) -> Value {
	json!({
		"functionName": name,
		"scriptId": "42",
		"url": "file:///app/index.js",
		"lineNumber": line,
		"columnNumber": 4,
	})
}

fn cpu_profile() -> Value {
	json!({
		"nodes": [
			{"id": 1, "callFrame": call_frame("(root)", -1), "hitCount": 0, "children": [2]},
			{"id": 2, "callFrame": call_frame("work", 10), "hitCount": 7},
		],
		"startTime": 1_000.0,
		"endTime": 501_000.0,
		"samples": [2, 2, 2, 2, 2, 2, 2],
		"timeDeltas": [100, 100, 100, 100, 100, 100, 100],
	})
}

fn heap_profile() -> Value {
	json!({
		"head": {
			"callFrame": call_frame("(root)", -1),
			"selfSize": 0.0,
			"id": 1,
			"children": [
				{"callFrame": call_frame("allocate", 20), "selfSize": 65_536.0, "id": 2},
			],
		},
		"samples": [{"size": 65_536.0, "nodeId": 2, "ordinal": 1.0}],
	})
}

/// Installs a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
	static INIT: Once = Once::new();
	INIT.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_env_filter(
				tracing_subscriber::EnvFilter::try_from_default_env()
					.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
			)
			.with_test_writer()
			.try_init();
	});
}
