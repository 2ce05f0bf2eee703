//! Shape validation logic

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use sentinel_domain::{FieldType, RecordSet, Shape};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

/// Three hyphen-separated numeric groups
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+-[0-9]+-[0-9]+$").expect("valid date regex"));

/// Datetime layouts that collapse to their calendar date
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Result of shape validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the value conforms to the shape
    pub status: ValidationStatus,

    /// Rejection reasons (empty when accepted)
    pub reasons: Vec<RejectionReason>,
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Value accepted
    Accepted,

    /// Value rejected
    Rejected,
}

/// Reasons for rejection
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// The shape itself declares something other than an array
    UnsupportedShape {
        /// Declared container type
        declared: String,
    },

    /// The value is not a sequence
    NotASequence {
        /// Kind of value found instead
        found: &'static str,
    },

    /// A sequence element is not a field mapping
    ElementNotMapping {
        /// Element index
        index: usize,
        /// Kind of value found instead
        found: &'static str,
    },

    /// A declared field is absent
    MissingField {
        /// Element index
        index: usize,
        /// Field name
        field: String,
    },

    /// A text field holds a non-text value
    ExpectedText {
        /// Element index
        index: usize,
        /// Field name
        field: String,
        /// Kind of value found instead
        found: &'static str,
    },

    /// A date field does not look like `YYYY-MM-DD`
    ExpectedDate {
        /// Element index
        index: usize,
        /// Field name
        field: String,
        /// Offending value, rendered as JSON
        found: String,
    },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::UnsupportedShape { declared } => {
                write!(f, "schema type must be 'array', got '{}'", declared)
            }
            RejectionReason::NotASequence { found } => {
                write!(f, "expected a list of items, got {}", found)
            }
            RejectionReason::ElementNotMapping { index, found } => {
                write!(f, "item {}: expected an object, got {}", index, found)
            }
            RejectionReason::MissingField { index, field } => {
                write!(f, "item {}: missing field '{}'", index, field)
            }
            RejectionReason::ExpectedText { index, field, found } => {
                write!(f, "item {}: field '{}' expected text, got {}", index, field, found)
            }
            RejectionReason::ExpectedDate { index, field, found } => write!(
                f,
                "item {}: field '{}' expected date in YYYY-MM-DD format, got {}",
                index, field, found
            ),
        }
    }
}

impl ValidationResult {
    fn from_reasons(reasons: Vec<RejectionReason>) -> Self {
        let status = if reasons.is_empty() {
            ValidationStatus::Accepted
        } else {
            ValidationStatus::Rejected
        };
        Self { status, reasons }
    }

    /// Whether the value was accepted
    pub fn is_accepted(&self) -> bool {
        self.status == ValidationStatus::Accepted
    }

    /// Human-readable summary of the outcome
    pub fn message(&self) -> String {
        if self.reasons.is_empty() {
            return "ok".to_string();
        }
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validate a structured value against a shape
///
/// Never fails: the outcome is carried by the returned status and reasons.
/// Every element is checked so the message lists all problems at once.
/// Date fields holding a full timestamp are rewritten in place to their
/// `YYYY-MM-DD` form before they are checked; nothing else is modified.
pub fn validate(value: &mut Value, shape: &Shape) -> ValidationResult {
    if !shape.is_array() {
        return ValidationResult::from_reasons(vec![RejectionReason::UnsupportedShape {
            declared: shape.kind.clone(),
        }]);
    }

    let items = match value {
        Value::Array(items) => items,
        other => {
            return ValidationResult::from_reasons(vec![RejectionReason::NotASequence {
                found: kind_of(other),
            }])
        }
    };

    let fields: Vec<(&str, FieldType)> = shape.fields().collect();
    let mut reasons = Vec::new();

    for (index, item) in items.iter_mut().enumerate() {
        let map = match item {
            Value::Object(map) => map,
            other => {
                reasons.push(RejectionReason::ElementNotMapping {
                    index,
                    found: kind_of(other),
                });
                continue;
            }
        };

        for (field, field_type) in &fields {
            let Some(field_value) = map.get_mut(*field) else {
                reasons.push(RejectionReason::MissingField {
                    index,
                    field: field.to_string(),
                });
                continue;
            };

            if field_type.is_date() {
                if let Some(reason) = check_date(index, field, field_value) {
                    reasons.push(reason);
                }
            } else if !field_value.is_string() {
                reasons.push(RejectionReason::ExpectedText {
                    index,
                    field: field.to_string(),
                    found: kind_of(field_value),
                });
            }
        }
    }

    ValidationResult::from_reasons(reasons)
}

fn check_date(index: usize, field: &str, value: &mut Value) -> Option<RejectionReason> {
    if let Value::String(text) = value {
        if let Some(normalized) = normalize_date(text) {
            *text = normalized;
        }
        if DATE_PATTERN.is_match(text) {
            return None;
        }
    }

    Some(RejectionReason::ExpectedDate {
        index,
        field: field.to_string(),
        found: value.to_string(),
    })
}

/// Collapse a timestamp to its calendar date
///
/// Accepts RFC 3339 timestamps and common naive datetime layouts. Returns
/// `None` when the text is not a timestamp (including when it already is a
/// bare date).
///
/// # Examples
///
/// ```
/// use sentinel_gatekeeper::normalize_date;
///
/// assert_eq!(normalize_date("2024-01-05T10:30:00Z").as_deref(), Some("2024-01-05"));
/// assert_eq!(normalize_date("2024-01-05 08:00:00").as_deref(), Some("2024-01-05"));
/// assert_eq!(normalize_date("2024-01-05"), None);
/// ```
pub fn normalize_date(text: &str) -> Option<String> {
    let trimmed = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }

    DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(trimmed, layout).ok())
        .map(|dt| dt.date().format("%Y-%m-%d").to_string())
}

/// Convert an accepted value into records
///
/// Returns `None` unless the value is an array whose elements are all
/// objects, which is guaranteed after a successful `validate`.
pub fn into_records(value: Value) -> Option<RecordSet> {
    let Value::Array(items) = value else {
        return None;
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
