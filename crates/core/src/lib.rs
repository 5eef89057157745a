//! ndiag: heap, CPU, evaluation, and trace diagnostics over inspector sessions
//!
//! This crate drives the instrumentation protocol of a running engine through
//! a primary session and any secondary sessions attached to spawned execution
//! contexts (workers). It does not speak the wire protocol itself; sessions
//! come from an [`Inspector`] implementation.
//!
//! # Examples
//!
//! ## CPU profile of the primary context
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use ndiag::{Diagnostics, ProfileOptions, Target};
//!
//! async fn profile(inspector: Arc<dyn ndiag::Inspector>) -> ndiag::Result<()> {
//!     let diagnostics = Diagnostics::new(inspector);
//!     diagnostics.start().await?;
//!
//!     let profile = diagnostics
//!         .get_cpu_profile(Target::Primary, ProfileOptions::new(500u64).interval(100))
//!         .await?;
//!     println!("{} nodes", profile.nodes.len());
//!
//!     diagnostics.stop().await
//! }
//! ```
//!
//! ## Heap snapshot of a worker
//!
//! ```ignore
//! let target = diagnostics.next_attached().await?;
//! let chunks = Arc::new(parking_lot::Mutex::new(String::new()));
//! let sink = Arc::clone(&chunks);
//! diagnostics
//!     .take_snapshot(target, move |event| sink.lock().push_str(&event.chunk))
//!     .await?;
//! ```
//!
//! Consumers run synchronously on the session's event dispatch path and
//! should hand data off rather than block.

pub mod config;
mod diagnostics;
pub mod options;
pub mod subscription;
pub mod validator;
pub mod window;

pub use config::DiagnosticsConfig;
pub use diagnostics::Diagnostics;
pub use ndiag_protocol::heap_profiler::{AddHeapSnapshotChunk, ReportHeapSnapshotProgress};
pub use ndiag_protocol::node_tracing::DataCollected;
pub use ndiag_protocol::{
	CpuProfile, Evaluate, EventName, ExceptionDetails, Method, RemoteObject, RemoteObjectType,
	SamplingHeapProfile,
};
pub use ndiag_runtime::{
	Error, Inspector, MemoryInspector, MemorySession, Result, Session, SessionEvent,
	SessionEvents, SessionId, SessionRegistry,
};
pub use options::{ProfileOptions, SnapshotOptions, TraceOptions, TrackOptions};
pub use subscription::ScopedSubscription;
pub use validator::{SessionValidator, Target};
pub use window::DurationWindow;

/// Protocol wire types, re-exported for callers that build raw requests.
pub mod protocol {
	pub use ndiag_protocol::*;
}
