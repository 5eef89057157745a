//! Diagnostics Runtime - session contract, listeners, and registry
//!
//! This crate defines what the diagnostics layer expects from the transport
//! that talks to an instrumented engine:
//!
//! - **Session**: request/response calls and event listeners for one context
//! - **Listeners**: the per-event handler table session implementations host
//! - **Registry**: secondary sessions by id, plus an attach/detach event stream
//! - **Inspector**: lifecycle of the endpoint and access to its sessions
//! - **Channel**: typed requests on top of the untyped session surface
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │    ndiag     │  Diagnostics controller
//! └──────┬───────┘
//!        │ drives dyn Session
//! ┌──────▼───────┐
//! │ndiag-runtime │  This crate
//! │  ┌────────┐  │
//! │  │Session │  │  post / listen
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │Registry│  │  secondary sessions
//! │  └────────┘  │
//! └──────┬───────┘
//!        │ implemented by
//! ┌──────▼───────┐
//! │  transport   │  framing, sockets, worker attachment (external)
//! └──────────────┘
//! ```
//!
//! [`memory`] provides in-process implementations of [`Session`] and
//! [`Inspector`].

pub mod channel;
pub mod error;
pub mod inspector;
pub mod listeners;
pub mod memory;
pub mod registry;
pub mod session;

// Re-export key types at crate root
pub use channel::Channel;
pub use error::{Error, Result};
pub use inspector::Inspector;
pub use listeners::Listeners;
pub use memory::{MemoryInspector, MemorySession, RecordedCall, Responder};
pub use registry::{SessionEvent, SessionEvents, SessionRegistry};
pub use session::{Listener, ListenerId, Session, SessionId, next_listener_id};
