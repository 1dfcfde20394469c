//! Line helpers for kubectl's tabular output.

use serde_json::Value;

/// Lines with visible content.
pub fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !line.trim().is_empty())
}

/// Rows of a kubectl table, header dropped.
pub fn data_rows(text: &str) -> Vec<&str> {
    non_empty_lines(text).skip(1).collect()
}

/// First `n` non-empty lines.
pub fn head(text: &str, n: usize) -> Vec<&str> {
    non_empty_lines(text).take(n).collect()
}

/// Last `n` non-empty lines.
pub fn tail(text: &str, n: usize) -> Vec<&str> {
    let lines: Vec<&str> = non_empty_lines(text).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].to_vec()
}

/// Count ready addresses across an Endpoints object's subsets.
///
/// `None` when the object has no subsets at all, which kubectl reports for
/// services without a selector match.
pub fn ready_endpoint_addresses(endpoints: &Value) -> Option<usize> {
    let subsets = endpoints.get("subsets")?.as_array()?;
    if subsets.is_empty() {
        return None;
    }
    Some(
        subsets
            .iter()
            .filter_map(|s| s.get("addresses").and_then(Value::as_array))
            .map(Vec::len)
            .sum(),
    )
}

/// `(namespace, name)` of every item in a kubectl list document.
pub fn item_names(list: &Value) -> Vec<(String, String)> {
    list.get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let meta = item.get("metadata")?;
                    let name = meta.get("name")?.as_str()?;
                    let namespace = meta.get("namespace").and_then(Value::as_str).unwrap_or("default");
                    Some((namespace.to_string(), name.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}
