//! Bidirectional transcoding between `confset_model` trees and Junos
//! set-line text.
//!
//! This crate provides the three directions every resource schema shares:
//! - [`build`] — tree to ordered set lines, all-or-nothing
//! - [`read`] / [`read_with_envelope`] — dump text to tree, with
//!   longest-keyword-match dispatch and in-place entry merging
//! - [`validate`] — tri-state cross-field validation into a diagnostics sink
//!
//! # Example
//!
//! ```rust
//! use confset_engine::build;
//! use confset_model::{BlockSchema, ConfigNode, FieldKind, FieldSchema, ResourceSchema, Value};
//!
//! let schema = ResourceSchema {
//!     type_name: "event_options_policy",
//!     keyword_path: "event-options policy",
//!     name_quoted: true,
//!     block: BlockSchema {
//!         fields: vec![FieldSchema {
//!             name: "events",
//!             keyword: "events",
//!             kind: FieldKind::Strs { quoted: true },
//!         }],
//!         ..BlockSchema::default()
//!     },
//! };
//!
//! let node = ConfigNode::new().with_field("events", Value::strs(["ev1"]));
//! let lines = build(&schema, "R1", &node).expect("resolved node");
//! assert_eq!(lines, ["set event-options policy \"R1\" events \"ev1\""]);
//! ```

mod build;
mod dispatch;
mod error;
mod read;
mod upsert;
mod validate;


pub use build::build;
pub use error::{BuildError, ReadError};
pub use read::{Envelope, read, read_with_envelope};
pub use upsert::upsert_entry;
pub use validate::validate;
