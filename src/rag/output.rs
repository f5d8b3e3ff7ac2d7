//! Defensive parsing of model output
//!
//! The model is asked for a single raw JSON object but answers with free-form
//! text: fenced code blocks, surrounding prose, malformed resource entries.
//! Everything here recovers what it can and never errors - a `None` from the
//! extractor is the fallback trigger.

use serde_json::Value;
use tracing::debug;
use tracing::error;
use tracing::warn;

use crate::models::Resource;

/// Extract a JSON object from raw model output
///
/// Prefers a fenced ```json block; otherwise takes the substring between the
/// first `{` and the last `}`. Parse failures are logged and yield `None`.
pub fn extract_json(text: &str) -> Option<Value> {
    let json_text = match fenced_block(text) {
        Some(inner) => inner,
        None => {
            let start = text.find('{');
            let end = text.rfind('}');
            match (start, end) {
                (Some(start), Some(end)) if start <= end => &text[start..=end],
                _ => {
                    warn!("[extract_json] No JSON boundaries found");
                    return None;
                }
            }
        }
    };

    match serde_json::from_str::<Value>(json_text) {
        Ok(value @ Value::Object(_)) => Some(value),
        Ok(_) => {
            warn!("[extract_json] Parsed JSON is not an object");
            None
        }
        Err(e) => {
            error!("[extract_json] JSON parse error: {e}");
            debug!("Raw model output: {text}");
            None
        }
    }
}

/// Locate the object between the first pair of ``` fences, if any
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let inner = &text[open + 3..];
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let close = inner.find("```")?;
    let inner = &inner[..close];

    let start = inner.find('{')?;
    let end = inner.rfind('}')?;
    (start <= end).then(|| &inner[start..=end])
}

/// Coerce a `resources` value into well-formed title/url pairs
///
/// Bare strings become `{title: s, url: s}`, objects carrying a `url` pass
/// through (title defaults to the url), anything else is dropped. Applying
/// this twice yields the same result as once.
pub fn normalize_resources(value: &Value) -> Vec<Resource> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(Resource {
                title: s.clone(),
                url: s.clone(),
            }),
            Value::Object(map) => {
                let url = map.get("url")?.as_str()?;
                let title = map.get("title").and_then(Value::as_str).unwrap_or(url);
                Some(Resource {
                    title: title.to_string(),
                    url: url.to_string(),
                })
            }
            _ => None,
        })
        .collect()
}

/// Rewrite the `resources` field of a parsed report with its normalized form
pub fn normalize_report(report: &mut Value) {
    if let Some(obj) = report.as_object_mut() {
        let resources = obj
            .get("resources")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        let normalized = normalize_resources(&resources);
        obj.insert(
            "resources".to_string(),
            serde_json::to_value(normalized).unwrap_or_else(|_| Value::Array(Vec::new())),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_fenced_json() {
        let text = "Here is the result:\n```json\n{\"score\": 85}\n```\nGood luck!";
        let value = extract_json(text).unwrap();
        assert_eq!(value["score"], 85);
    }

    #[test]
    fn extracts_fenced_json_without_language_tag() {
        let text = "```\n{\"score\": 42}\n```";
        let value = extract_json(text).unwrap();
        assert_eq!(value["score"], 42);
    }

    #[test]
    fn extracts_bare_object_with_surrounding_prose() {
        let text = "Sure! {\"score\": 70, \"advice\": \"learn Rust\"} Hope this helps.";
        let value = extract_json(text).unwrap();
        assert_eq!(value["advice"], "learn Rust");
    }

    #[test]
    fn no_braces_yields_none() {
        assert!(extract_json("no json here at all").is_none());
    }

    #[test]
    fn malformed_json_yields_none() {
        assert!(extract_json("{score: not json}").is_none());
    }

    #[test]
    fn non_object_json_yields_none() {
        // Bare-brace slicing around an array still fails the object check
        assert!(extract_json("{} trailing {").is_some());
        assert!(extract_json("[1, 2, 3]").is_none());
    }

    #[test]
    fn normalize_coerces_bare_strings() {
        let value = json!(["https://doc.rust-lang.org/book/"]);
        let resources = normalize_resources(&value);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].title, "https://doc.rust-lang.org/book/");
        assert_eq!(resources[0].url, "https://doc.rust-lang.org/book/");
    }

    #[test]
    fn normalize_keeps_well_formed_pairs_and_drops_junk() {
        let value = json!([
            {"title": "The Book", "url": "https://doc.rust-lang.org/book/"},
            {"title": "no url field"},
            42,
            null,
        ]);
        let resources = normalize_resources(&value);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].title, "The Book");
    }

    #[test]
    fn normalize_is_idempotent() {
        let value = json!(["X", {"title": "T", "url": "U"}, false]);
        let once = normalize_resources(&value);
        let again = normalize_resources(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, again);
    }

    #[test]
    fn normalize_non_array_yields_empty() {
        assert!(normalize_resources(&json!("not a list")).is_empty());
        assert!(normalize_resources(&json!(null)).is_empty());
    }

    #[test]
    fn normalize_report_defaults_missing_resources() {
        let mut report = json!({"score": 50});
        normalize_report(&mut report);
        assert_eq!(report["resources"], json!([]));
    }
}
