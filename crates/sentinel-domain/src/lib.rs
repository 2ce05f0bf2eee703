//! Sentinel Domain Layer
//!
//! This crate contains the value types and trait seams shared by every other
//! Sentinel crate. It carries no I/O: storage, the model
//! provider, and the pipeline live in the infrastructure and application
//! crates.
//!
//! ## Key Concepts
//!
//! - **Record**: one discovered fact, a mapping of field name to value
//! - **RecordSet**: the ordered, duplicate-free records persisted for a job
//! - **Shape**: declarative description of what a valid record contains
//! - **Job**: one configured unit of work (instruction, file, shape, format)
//!
//! ## Architecture
//!
//! - Pure data and canonicalization logic only
//! - Trait definitions for the search capability and the record store

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod job;
pub mod record;
pub mod shape;
pub mod traits;

// Re-exports for convenience
pub use job::{Job, OutputFormat};
pub use record::{canonical_key, Record, RecordSet};
pub use shape::{FieldType, Shape};
