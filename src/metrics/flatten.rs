use serde_json::{Map, Value};

pub const SEPARATOR: &str = ".";

/// Collapse nested objects into a single level keyed by their joined path.
///
/// Arrays are leaves and keep their contents. Empty objects vanish.
#[must_use]
pub fn flatten(value: &Value, sep: &str) -> Map<String, Value> {
    let mut out = Map::new();
    if let Value::Object(map) = value {
        flatten_into("", map, sep, &mut out);
    }
    out
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, sep: &str, out: &mut Map<String, Value>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{sep}{key}")
        };
        match value {
            Value::Object(inner) => flatten_into(&path, inner, sep, out),
            leaf => {
                out.insert(path, leaf.clone());
            }
        }
    }
}
