//! Wire types for the inspector diagnostics protocol.
//!
//! This crate contains the serde-serializable shapes exchanged with an
//! instrumentation session: request parameters, responses, event payloads,
//! and the profile artifacts returned by stop calls.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization
//! - **Closed**: Every supported method is a [`Method`] variant and every
//!   supported event an [`EventName`] variant, so dispatch is checked at
//!   compile time instead of matched on strings
//! - **Typed**: Each command struct names its response shape via [`Command`]
//!
//! The orchestration built on these types lives in `ndiag`.

pub mod heap_profiler;
pub mod merge;
pub mod method;
pub mod node_tracing;
pub mod profiler;
pub mod runtime;

pub use heap_profiler::SamplingHeapProfile;
pub use merge::merge_params;
pub use method::{Command, Domain, Empty, EventName, EventPayload, Method, UnknownName};
pub use profiler::CpuProfile;
pub use runtime::{Evaluate, EvaluateResponse, ExceptionDetails, RemoteObject, RemoteObjectType};
