//! Recover structured data from a model's free-text reply
//!
//! Models are told to answer with bare JSON or YAML, but they still wrap
//! answers in prose or markdown fences. Extraction runs an ordered list of
//! strategies and takes the first value one of them can parse.

use crate::error::ExtractorError;
use regex::Regex;
use sentinel_domain::OutputFormat;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

/// Fenced code block with an optional language label
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([A-Za-z0-9_+-]*)[ \t]*\r?\n?(.*?)```").expect("valid fence regex")
});

/// One way of pulling a structured value out of reply text
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this strategy applies to `format`
    fn supports(&self, format: OutputFormat) -> bool;

    /// Attempt extraction; `None` means "try the next strategy"
    fn extract(&self, raw: &str, format: OutputFormat) -> Option<Value>;
}

/// Parse the whole reply as the target format
///
/// Only arrays and objects count; a bare scalar is not a structured answer.
pub struct DirectParse;

/// Parse the interior of the first fenced code block that parses
///
/// Unlabelled fences and fences labelled with the target format qualify. A
/// YAML job also accepts a `json` fence, since YAML reads JSON.
pub struct FencedBlock;

/// Parse a balanced `{...}` or `[...]` span that is valid JSON
///
/// Web-search replies cite sources as `[1]`, so the first span holding
/// records (an object, or an array with an object in it) is preferred. With
/// none, the first span that parses is returned.
pub struct BracketSpan;

/// Last resort for YAML: the whole reply as a YAML document
///
/// Any non-null value is accepted so that a reply of the wrong shape reaches
/// validation and is reported as such, rather than as unparseable.
pub struct YamlDocument;

impl ExtractionStrategy for DirectParse {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn supports(&self, _format: OutputFormat) -> bool {
        true
    }

    fn extract(&self, raw: &str, format: OutputFormat) -> Option<Value> {
        parse_as(raw.trim(), format).filter(is_structured)
    }
}

impl ExtractionStrategy for FencedBlock {
    fn name(&self) -> &'static str {
        "fenced-block"
    }

    fn supports(&self, _format: OutputFormat) -> bool {
        true
    }

    fn extract(&self, raw: &str, format: OutputFormat) -> Option<Value> {
        FENCE
            .captures_iter(raw)
            .filter(|caps| fence_label_matches(caps.get(1).map_or("", |m| m.as_str()), format))
            .filter_map(|caps| caps.get(2))
            .find_map(|body| parse_as(body.as_str().trim(), format).filter(is_structured))
    }
}

impl ExtractionStrategy for BracketSpan {
    fn name(&self) -> &'static str {
        "bracket-span"
    }

    fn supports(&self, format: OutputFormat) -> bool {
        format == OutputFormat::Json
    }

    fn extract(&self, raw: &str, _format: OutputFormat) -> Option<Value> {
        let mut first_parsed = None;
        let candidates = raw
            .char_indices()
            .filter(|(_, c)| *c == '{' || *c == '[')
            .filter_map(|(start, _)| balanced_span(raw, start))
            .filter_map(|span| serde_json::from_str::<Value>(span).ok());

        for value in candidates {
            if holds_records(&value) {
                return Some(value);
            }
            first_parsed.get_or_insert(value);
        }
        first_parsed
    }
}

impl ExtractionStrategy for YamlDocument {
    fn name(&self) -> &'static str {
        "yaml-document"
    }

    fn supports(&self, format: OutputFormat) -> bool {
        format == OutputFormat::Yaml
    }

    fn extract(&self, raw: &str, _format: OutputFormat) -> Option<Value> {
        serde_yaml::from_str::<Value>(raw)
            .ok()
            .filter(|value| !value.is_null())
    }
}

/// Ordered chain of extraction strategies
pub struct TextExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl TextExtractor {
    /// Create an extractor from an explicit strategy list
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Append a strategy after the existing ones
    pub fn with_strategy(mut self, strategy: impl ExtractionStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Names of the strategies, in the order they are tried
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Extract a structured value from `raw`
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Extraction` when no strategy succeeds.
    pub fn extract(&self, raw: &str, format: OutputFormat) -> Result<Value, ExtractorError> {
        for strategy in self.strategies.iter().filter(|s| s.supports(format)) {
            if let Some(value) = strategy.extract(raw, format) {
                debug!("Extracted {} with strategy '{}'", format, strategy.name());
                return Ok(value);
            }
        }

        Err(ExtractorError::Extraction(format!(
            "no {} found in reply ({} chars): {}",
            format.display_name(),
            raw.len(),
            preview(raw)
        )))
    }
}

impl Default for TextExtractor {
    /// Direct parse, then fenced block, then bracket span (JSON) or whole
    /// document (YAML)
    fn default() -> Self {
        Self::new(vec![
            Box::new(DirectParse),
            Box::new(FencedBlock),
            Box::new(BracketSpan),
            Box::new(YamlDocument),
        ])
    }
}

/// Extract with the default strategy chain
pub fn extract_structured(raw: &str, format: OutputFormat) -> Result<Value, ExtractorError> {
    TextExtractor::default().extract(raw, format)
}

fn parse_as(text: &str, format: OutputFormat) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    match format {
        OutputFormat::Json => serde_json::from_str(text).ok(),
        OutputFormat::Yaml => serde_yaml::from_str(text).ok(),
    }
}

fn is_structured(value: &Value) -> bool {
    value.is_array() || value.is_object()
}

fn holds_records(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => items.iter().any(Value::is_object),
        _ => false,
    }
}

fn fence_label_matches(label: &str, format: OutputFormat) -> bool {
    let label = label.to_ascii_lowercase();
    match format {
        OutputFormat::Json => label.is_empty() || label == "json",
        OutputFormat::Yaml => matches!(label.as_str(), "" | "yaml" | "yml" | "json"),
    }
}

/// The balanced bracket span starting at byte `start`, if it closes
///
/// Brackets inside JSON strings are ignored.
fn balanced_span(text: &str, start: usize) -> Option<&str> {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.pop() != Some(c) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

fn preview(raw: &str) -> String {
    const LIMIT: usize = 120;
    let flat: String = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= LIMIT {
        flat
    } else {
        let cut: String = flat.chars().take(LIMIT).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json_array() {
        let value = extract_structured(r#"[{"a": 1}]"#, OutputFormat::Json).unwrap();
        assert_eq!(value, json!([{"a": 1}]));
    }

    #[test]
    fn test_json_in_fence_after_prose() {
        let raw = "Sure! ```json\n[{\"a\":1}]\n```";
        let value = extract_structured(raw, OutputFormat::Json).unwrap();
        assert_eq!(value, json!([{"a": 1}]));
    }

    #[test]
    fn test_unlabelled_fence() {
        let raw = "Results:\n```\n{\"key\": \"value\"}\n```\nHope this helps.";
        let value = extract_structured(raw, OutputFormat::Json).unwrap();
        assert_eq!(value, json!({"key": "value"}));
    }

    #[test]
    fn test_skips_fence_that_does_not_parse() {
        let raw = "```json\nnot json\n```\nthen\n```json\n[1, 2]\n```";
        let value = FencedBlock.extract(raw, OutputFormat::Json).unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn test_json_job_ignores_yaml_fence() {
        let raw = "```yaml\n- a: 1\n```";
        assert!(FencedBlock.extract(raw, OutputFormat::Json).is_none());
    }

    #[test]
    fn test_bracket_span_in_prose() {
        let raw = "I found these items: [{\"title\": \"X [draft]\", \"url\": \"http://x\"}] - let me know!";
        let value = extract_structured(raw, OutputFormat::Json).unwrap();
        assert_eq!(value, json!([{"title": "X [draft]", "url": "http://x"}]));
    }

    #[test]
    fn test_bracket_span_skips_unparseable_candidates() {
        let raw = "Notes [see below] and {broken: yes}. Data: {\"a\": \"b\"}";
        let value = BracketSpan.extract(raw, OutputFormat::Json).unwrap();
        assert_eq!(value, json!({"a": "b"}));
    }

    #[test]
    fn test_bracket_span_passes_over_citation_markers() {
        let raw = "Based on my searches [1], here are the items:\n[{\"title\": \"X\", \"date\": \"2024-01-05\"}]\nSources: [2] [3]";
        let value = extract_structured(raw, OutputFormat::Json).unwrap();
        assert_eq!(value, json!([{"title": "X", "date": "2024-01-05"}]));
    }

    #[test]
    fn test_bracket_span_falls_back_to_first_parsed() {
        let raw = "Nothing new [1] beyond what you have: []";
        let value = BracketSpan.extract(raw, OutputFormat::Json).unwrap();
        assert_eq!(value, json!([1]));
    }

    #[test]
    fn test_balanced_span_respects_escapes() {
        let text = r#"{"q": "a \"}\" b"} tail"#;
        assert_eq!(balanced_span(text, 0), Some(r#"{"q": "a \"}\" b"}"#));
    }

    #[test]
    fn test_balanced_span_mismatch() {
        assert_eq!(balanced_span("[}", 0), None);
        assert_eq!(balanced_span("[[]", 0), None);
    }

    #[test]
    fn test_direct_parse_rejects_scalar() {
        assert!(DirectParse.extract("42", OutputFormat::Json).is_none());
        assert!(DirectParse.extract("just words", OutputFormat::Yaml).is_none());
    }

    #[test]
    fn test_yaml_sequence() {
        let raw = "- title: X\n  date: 2024-01-05\n";
        let value = extract_structured(raw, OutputFormat::Yaml).unwrap();
        assert_eq!(value, json!([{"title": "X", "date": "2024-01-05"}]));
    }

    #[test]
    fn test_yaml_in_fence_after_prose() {
        let raw = "Here you go:\n\n```yaml\n- title: X\n  url: http://x\n```\n";
        let value = extract_structured(raw, OutputFormat::Yaml).unwrap();
        assert_eq!(value, json!([{"title": "X", "url": "http://x"}]));
    }

    #[test]
    fn test_yaml_reads_json_reply() {
        let value = extract_structured(r#"[{"title": "X"}]"#, OutputFormat::Yaml).unwrap();
        assert_eq!(value, json!([{"title": "X"}]));
    }

    #[test]
    fn test_yaml_fallback_keeps_scalar_for_validation() {
        let value = extract_structured("no results today", OutputFormat::Yaml).unwrap();
        assert_eq!(value, json!("no results today"));
    }

    #[test]
    fn test_json_failure_is_extraction_error() {
        let result = extract_structured("I could not find anything.", OutputFormat::Json);
        match result {
            Err(ExtractorError::Extraction(msg)) => {
                assert!(msg.contains("JSON"));
                assert!(msg.contains("I could not find anything."));
            }
            other => panic!("Expected Extraction error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_reply_fails() {
        assert!(extract_structured("   ", OutputFormat::Json).is_err());
        assert!(extract_structured("", OutputFormat::Yaml).is_err());
    }

    #[test]
    fn test_strategy_order() {
        let extractor = TextExtractor::default();
        assert_eq!(
            extractor.strategy_names(),
            vec!["direct", "fenced-block", "bracket-span", "yaml-document"]
        );
    }

    #[test]
    fn test_custom_strategy_is_additive() {
        struct Tilde;
        impl ExtractionStrategy for Tilde {
            fn name(&self) -> &'static str {
                "tilde-fence"
            }
            fn supports(&self, _format: OutputFormat) -> bool {
                true
            }
            fn extract(&self, raw: &str, _format: OutputFormat) -> Option<Value> {
                let body = raw.split("~~~").nth(1)?;
                serde_json::from_str(body.trim()).ok()
            }
        }

        let raw = "Output ~~~ [\"a\"] ~~~ end";
        let base = TextExtractor::new(vec![Box::new(DirectParse)]);
        assert!(base.extract(raw, OutputFormat::Json).is_err());

        let extended = TextExtractor::new(vec![Box::new(DirectParse)]).with_strategy(Tilde);
        assert_eq!(extended.extract(raw, OutputFormat::Json).unwrap(), json!(["a"]));
    }
}
