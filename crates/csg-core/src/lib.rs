//! # csg-core
//!
//! Converter between a textual **CSG** (constructive solid geometry) scene
//! dialect and **CSGJS**, the same scene as a JSON tree.
//!
//! A document is an array of nodes. A node is either a leaf object
//! (`{"type", "properties"}`) or an instruction with a nested block
//! (`{"type", "properties", "objects"}`). Properties are named arguments in
//! source order; `multmatrix` may instead carry a bare matrix array.
//!
//! ## Quick start
//!
//! ```rust
//! use csg_core::{csg_to_json, json_to_csg};
//!
//! // CSG → CSGJS
//! let json = csg_to_json("sphere(r = 5, $fn = 32);").unwrap();
//! assert_eq!(json, r#"[{"type":"sphere","properties":{"r":5.0,"$fn":32.0}}]"#);
//!
//! // CSGJS → CSG
//! let csg = json_to_csg(&json).unwrap();
//! assert_eq!(csg, "sphere(r = 5, $fn = 32);\n");
//! ```
//!
//! ## Modules
//!
//! - [`parser`] — CSG text → document tree (pest grammar + tree builder)
//! - [`writer`] — document tree → canonical CSG text
//! - [`convert`] — string-level CSG ⇄ CSGJS helpers
//! - [`types`] — `NodeKind` and the per-kind structural contracts
//! - [`error`] — `ParseError`, `WriteError` and the crate `CsgError`

pub mod convert;
pub mod error;
pub mod parser;
pub mod types;
pub mod writer;

pub use convert::{csg_to_json, csg_to_json_pretty, json_to_csg, parse_json};
pub use error::{CsgError, ParseError, Result, WriteError};
pub use parser::parse;
pub use types::{Contract, Form, NodeKind};
pub use writer::{write, write_indented};
