//! Closed sets of protocol methods and events.
//!
//! Every request the diagnostics layer can issue is a [`Method`] variant and
//! every event it can listen for is an [`EventName`] variant. Typed command
//! structs bind a method to its parameter and response shapes through the
//! [`Command`] trait; typed event payloads bind to their name through
//! [`EventPayload`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Protocol domain a method or event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
	Profiler,
	HeapProfiler,
	Runtime,
	NodeTracing,
}

impl Domain {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Profiler => "Profiler",
			Self::HeapProfiler => "HeapProfiler",
			Self::Runtime => "Runtime",
			Self::NodeTracing => "NodeTracing",
		}
	}
}

impl fmt::Display for Domain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when a wire name is not part of the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName(pub String);

impl fmt::Display for UnknownName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unsupported protocol name: {}", self.0)
	}
}

impl std::error::Error for UnknownName {}

macro_rules! wire_names {
	(
		$(#[$meta:meta])*
		pub enum $name:ident {
			$( $(#[$vmeta:meta])* $variant:ident => ($domain:ident, $wire:literal), )+
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		pub enum $name {
			$( $(#[$vmeta])* $variant, )+
		}

		impl $name {
			/// Every supported variant, in declaration order.
			pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

			/// Returns the `"<Domain>.<action>"` wire name.
			pub fn as_str(self) -> &'static str {
				match self {
					$( Self::$variant => $wire, )+
				}
			}

			pub fn domain(self) -> Domain {
				match self {
					$( Self::$variant => Domain::$domain, )+
				}
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(self.as_str())
			}
		}

		impl FromStr for $name {
			type Err = UnknownName;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s {
					$( $wire => Ok(Self::$variant), )+
					other => Err(UnknownName(other.to_string())),
				}
			}
		}
	};
}

wire_names! {
	/// Request methods issued by the diagnostics layer.
	pub enum Method {
		ProfilerEnable => (Profiler, "Profiler.enable"),
		ProfilerDisable => (Profiler, "Profiler.disable"),
		ProfilerSetSamplingInterval => (Profiler, "Profiler.setSamplingInterval"),
		ProfilerStart => (Profiler, "Profiler.start"),
		ProfilerStop => (Profiler, "Profiler.stop"),
		HeapProfilerEnable => (HeapProfiler, "HeapProfiler.enable"),
		HeapProfilerDisable => (HeapProfiler, "HeapProfiler.disable"),
		HeapProfilerTakeHeapSnapshot => (HeapProfiler, "HeapProfiler.takeHeapSnapshot"),
		HeapProfilerStartTrackingHeapObjects => (HeapProfiler, "HeapProfiler.startTrackingHeapObjects"),
		HeapProfilerStopTrackingHeapObjects => (HeapProfiler, "HeapProfiler.stopTrackingHeapObjects"),
		HeapProfilerStartSampling => (HeapProfiler, "HeapProfiler.startSampling"),
		HeapProfilerStopSampling => (HeapProfiler, "HeapProfiler.stopSampling"),
		RuntimeEvaluate => (Runtime, "Runtime.evaluate"),
		NodeTracingStart => (NodeTracing, "NodeTracing.start"),
		NodeTracingStop => (NodeTracing, "NodeTracing.stop"),
		NodeTracingGetCategories => (NodeTracing, "NodeTracing.getCategories"),
	}
}

wire_names! {
	/// Events the diagnostics layer subscribes to.
	pub enum EventName {
		/// A serialized heap snapshot fragment ("chunk produced").
		HeapSnapshotChunk => (HeapProfiler, "HeapProfiler.addHeapSnapshotChunk"),
		HeapSnapshotProgress => (HeapProfiler, "HeapProfiler.reportHeapSnapshotProgress"),
		/// A batch of trace events ("data collected").
		TraceDataCollected => (NodeTracing, "NodeTracing.dataCollected"),
		TracingComplete => (NodeTracing, "NodeTracing.tracingComplete"),
	}
}

/// A typed protocol request.
///
/// Implementors serialize to the request's parameter mapping; unit structs
/// serialize to `null`, which sessions send as an empty mapping.
pub trait Command: Serialize {
	const METHOD: Method;
	type Response: DeserializeOwned;
}

/// A typed event payload decoded from an event's parameter mapping.
pub trait EventPayload: DeserializeOwned + Send + 'static {
	const NAME: EventName;
}

/// Response shape for methods that return nothing of interest.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct Empty {}
