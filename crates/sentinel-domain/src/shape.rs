//! Shape module - declarative description of the records a job expects

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Expected structure of a job's output
///
/// Mirrors the `schema` block of a job's configuration:
///
/// ```yaml
/// type: array
/// items:
///   title: string
///   date: YYYY-MM-DD
///   image: example.png
/// ```
///
/// The tag system is open-ended. Anything that is not a recognised date tag
/// is treated as text, so literals like `example.png` work as human-readable
/// hints for the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Declared container type; only `"array"` is valid
    #[serde(rename = "type")]
    pub kind: String,

    /// Field name to type tag, in declaration order
    #[serde(default)]
    pub items: serde_json::Map<String, Value>,
}

/// Kind of value a field must hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Plain text (`"string"`)
    Text,

    /// Calendar date rendered as `YYYY-MM-DD`
    Date,

    /// Free-form literal used as a type hint; validated as text
    Hint(String),
}

impl FieldType {
    /// Classify a type tag
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_domain::FieldType;
    ///
    /// assert_eq!(FieldType::from_tag("string"), FieldType::Text);
    /// assert_eq!(FieldType::from_tag("YYYY-MM-DD"), FieldType::Date);
    /// assert_eq!(FieldType::from_tag("example.png"), FieldType::Hint("example.png".into()));
    /// ```
    pub fn from_tag(tag: &str) -> Self {
        let trimmed = tag.trim();
        if trimmed.eq_ignore_ascii_case("string") {
            FieldType::Text
        } else if trimmed.eq_ignore_ascii_case("date") || trimmed.eq_ignore_ascii_case("yyyy-mm-dd") {
            FieldType::Date
        } else {
            FieldType::Hint(trimmed.to_string())
        }
    }

    /// Whether values of this type are dates
    pub fn is_date(&self) -> bool {
        matches!(self, FieldType::Date)
    }
}

impl Shape {
    /// Create an array shape from `(field, tag)` pairs
    pub fn array<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let items = fields
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        Self {
            kind: "array".to_string(),
            items,
        }
    }

    /// Whether the declared container type is an array
    pub fn is_array(&self) -> bool {
        self.kind.trim().eq_ignore_ascii_case("array")
    }

    /// Declared fields with their classified types, in declaration order
    ///
    /// Non-string tags (a number or a nested map in a hand-written config)
    /// are rendered back to text and treated as hints.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldType)> + '_ {
        self.items.iter().map(|(name, tag)| {
            let field_type = match tag {
                Value::String(s) => FieldType::from_tag(s),
                other => FieldType::Hint(other.to_string()),
            };
            (name.as_str(), field_type)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_classification_is_case_insensitive() {
        assert_eq!(FieldType::from_tag("String"), FieldType::Text);
        assert_eq!(FieldType::from_tag("DATE"), FieldType::Date);
        assert_eq!(FieldType::from_tag(" yyyy-mm-dd "), FieldType::Date);
    }

    #[test]
    fn test_unknown_tags_are_hints() {
        let t = FieldType::from_tag("https://example.com/image.png");
        assert!(matches!(t, FieldType::Hint(_)));
        assert!(!t.is_date());
    }

    #[test]
    fn test_shape_from_yaml_preserves_field_order() {
        let yaml = "type: array\nitems:\n  title: string\n  date: YYYY-MM-DD\n  image: example.png\n";
        let shape: Shape = serde_yaml::from_str(yaml).unwrap();

        assert!(shape.is_array());
        let fields: Vec<_> = shape.fields().collect();
        assert_eq!(
            fields,
            vec![
                ("title", FieldType::Text),
                ("date", FieldType::Date),
                ("image", FieldType::Hint("example.png".to_string())),
            ]
        );
    }

    #[test]
    fn test_shape_serializes_type_key() {
        let shape = Shape::array([("title", "string")]);
        let json = serde_json::to_string(&shape).unwrap();
        assert_eq!(json, r#"{"type":"array","items":{"title":"string"}}"#);
    }

    #[test]
    fn test_non_string_tag_is_hint() {
        let shape: Shape = serde_json::from_str(r#"{"type":"array","items":{"count":3}}"#).unwrap();
        let fields: Vec<_> = shape.fields().collect();
        assert_eq!(fields, vec![("count", FieldType::Hint("3".to_string()))]);
    }
}
