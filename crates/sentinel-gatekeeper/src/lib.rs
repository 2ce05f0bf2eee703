//! Sentinel Gatekeeper
//!
//! Decides what a model reply is allowed to add to a record file.
//!
//! The Gatekeeper provides:
//! - Shape validation (container type, required fields, text and date kinds)
//! - Date normalization to `YYYY-MM-DD`
//! - Duplicate-free merging of new records into an existing set
//!
//! # Examples
//!
//! ```
//! use sentinel_domain::Shape;
//! use sentinel_gatekeeper::{into_records, merge, validate};
//! use serde_json::json;
//!
//! let shape = Shape::array([("title", "string"), ("date", "YYYY-MM-DD")]);
//! let mut reply = json!([{"title": "X", "date": "2024-01-05"}]);
//!
//! let result = validate(&mut reply, &shape);
//! assert!(result.is_accepted());
//!
//! let incoming = into_records(reply).unwrap();
//! let merged = merge(&[], &incoming);
//! assert_eq!(merged.added, 1);
//! ```

#![warn(missing_docs)]

mod dedup;
mod validator;

pub use dedup::{merge, MergeOutcome};
pub use validator::{
    into_records, normalize_date, validate, RejectionReason, ValidationResult, ValidationStatus,
};
