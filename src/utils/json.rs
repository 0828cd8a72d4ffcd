//! Defensive access to loosely-typed JSON documents.
//!
//! Vendor payloads without a stable schema are walked as `serde_json::Value`.
//! Every accessor returns `None` for missing, null, empty, or mistyped values.

use serde_json::{Map, Value};

/// First non-empty string among the named fields of an object.
pub fn first_str<'a, S: AsRef<str>>(value: &'a Value, fields: &[S]) -> Option<&'a str> {
    first_str_in(value.as_object()?, fields)
}

/// [`first_str`] over an already-unwrapped object.
pub fn first_str_in<'a, S: AsRef<str>>(
    obj: &'a Map<String, Value>,
    fields: &[S],
) -> Option<&'a str> {
    fields.iter().find_map(|field| {
        obj.get(field.as_ref())
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    })
}

/// A string or number field rendered as text.
pub fn scalar_string(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Depth-first search for the first array-valued field whose name is listed.
///
/// Object fields are visited in document order; a field's own name is tested
/// before descending into its value. Nodes deeper than `max_depth` are
/// skipped.
pub fn find_list_field<'a, S: AsRef<str>>(
    value: &'a Value,
    names: &[S],
    max_depth: usize,
) -> Option<&'a Vec<Value>> {
    if max_depth == 0 {
        return None;
    }
    match value {
        Value::Object(map) => map.iter().find_map(|(key, child)| {
            if let Value::Array(items) = child {
                if names.iter().any(|n| n.as_ref() == key) {
                    return Some(items);
                }
            }
            find_list_field(child, names, max_depth - 1)
        }),
        Value::Array(items) => items
            .iter()
            .find_map(|item| find_list_field(item, names, max_depth - 1)),
        _ => None,
    }
}

/// Visit every object in the tree, parents before children, up to `max_depth`.
pub fn visit_objects<'a, F>(value: &'a Value, max_depth: usize, visit: &mut F)
where
    F: FnMut(&'a Map<String, Value>),
{
    if max_depth == 0 {
        return;
    }
    match value {
        Value::Object(map) => {
            visit(map);
            for child in map.values() {
                visit_objects(child, max_depth - 1, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                visit_objects(item, max_depth - 1, visit);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_str_skips_empty_and_mistyped() {
        let v = json!({"title": "", "name": 7, "jobTitle": " ML Engineer "});
        assert_eq!(first_str(&v, &["title", "name", "jobTitle"]), Some("ML Engineer"));
        assert_eq!(first_str(&v, &["missing"]), None);
        assert_eq!(first_str(&json!([1, 2]), &["title"]), None);
    }

    #[test]
    fn test_scalar_string() {
        let v = json!({"id": 42, "slug": "abc", "none": null});
        assert_eq!(scalar_string(&v, "id"), Some("42".to_string()));
        assert_eq!(scalar_string(&v, "slug"), Some("abc".to_string()));
        assert_eq!(scalar_string(&v, "none"), None);
    }

    #[test]
    fn test_find_list_field_returns_first_in_document_order() {
        let v = json!({
            "props": {
                "pageProps": {
                    "meta": {"jobs": "not a list"},
                    "results": {"jobs": [{"title": "first"}]},
                },
            },
            "jobs": [{"title": "second"}],
        });
        let jobs = find_list_field(&v, &["jobs"], 32).unwrap();
        assert_eq!(jobs[0]["title"], "first");
    }

    #[test]
    fn test_find_list_field_inside_arrays() {
        let v = json!([{"a": 1}, {"b": {"jobs": [1, 2, 3]}}]);
        assert_eq!(find_list_field(&v, &["jobs"], 32).unwrap().len(), 3);
    }

    #[test]
    fn test_find_list_field_respects_depth_cap() {
        let v = json!({"a": {"b": {"c": {"jobs": []}}}});
        assert!(find_list_field(&v, &["jobs"], 3).is_none());
        assert!(find_list_field(&v, &["jobs"], 4).is_some());
    }

    #[test]
    fn test_deeply_nested_input_is_bounded() {
        let mut v = json!({"jobs": [1]});
        for _ in 0..100 {
            v = json!({ "next": v });
        }
        assert!(find_list_field(&v, &["jobs"], 32).is_none());
    }

    #[test]
    fn test_visit_objects() {
        let v = json!({"a": {"title": "x"}, "list": [{"title": "y"}, 3]});
        let mut titles = Vec::new();
        visit_objects(&v, 8, &mut |obj: &Map<String, Value>| {
            if let Some(t) = obj.get("title").and_then(Value::as_str) {
                titles.push(t.to_string());
            }
        });
        assert_eq!(titles, vec!["x", "y"]);
    }
}
