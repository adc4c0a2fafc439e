//! Device session abstraction and resource lifecycle orchestration.
//!
//! This crate provides:
//! - the [`Session`] trait: synchronous command execution and batched
//!   set-line application
//! - [`MemorySession`]: a deterministic in-memory reference transport
//! - [`ResourceClient`]: validate → build → apply and query → parse flows
//!   with pre-check/post-check existence verification
//!
//! The core never retries, cancels, or times out; those concerns belong to
//! the transport behind the [`Session`] implementation.
//!
//! # Example
//!
//! ```rust
//! use confset_model::{ConfigNode, Value};
//! use confset_resources::bgp_group;
//! use confset_session::{MemorySession, ResourceClient};
//!
//! let schema = bgp_group();
//! let mut session = MemorySession::new();
//! let mut client = ResourceClient::new(&mut session, &schema);
//!
//! let node = ConfigNode::new().with_field("group_type", Value::str("internal"));
//! client.create("CORE", &node).expect("create");
//! assert_eq!(client.read("CORE").expect("read"), node);
//! ```

mod client;
mod memory;

use thiserror::Error;

pub use client::{ApplyError, ResourceClient};
pub use memory::MemorySession;

/// Synchronous device session.
///
/// `config_set` applies an ordered batch of `set`/`delete` lines as a unit;
/// `command` executes a read-only query and returns raw text including the
/// envelope markers.
pub trait Session {
    fn command(&mut self, query: &str) -> Result<String, SessionError>;
    fn config_set(&mut self, lines: &[String]) -> Result<(), SessionError>;
}

/// Transport-level failure, propagated unchanged by the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("commit failed: {0}")]
    CommitFailed(String),
}
