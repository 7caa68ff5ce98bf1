//! modelpath Access - visitors that read and write through parsed paths
//!
//! A [`Path`](modelpath_dsl::Path) is walked by a [`PathVisitor`]; the three
//! visitors here implement read, single write and bulk rewrite over a
//! `serde_json::Value` model:
//!
//! ```text
//! Path ──walk──► GetPathVisitor     (focus: borrowed or projected value)
//!          ├───► PutPathVisitor     (focus: &mut slot, pending key)
//!          └───► PutAllPathVisitor  (focus: every &mut slot reached)
//! ```
//!
//! [`map_util`] wraps parse + walk into one call.

mod filter;
pub mod get;
pub mod map_util;
pub mod put;
pub mod put_all;
pub mod visitor;

pub use get::GetPathVisitor;
pub use map_util::{get, get_path, put, put_all, put_all_path, put_path, ModelPaths};
pub use put::PutPathVisitor;
pub use put_all::PutAllPathVisitor;
pub use visitor::{walk, PathVisitor};

pub use modelpath_core::{ModelPathError, ModelPathResult, ParseError, PathConfig, TraversalError};
pub use modelpath_dsl::{ListFilter, Path, PathExpression};
