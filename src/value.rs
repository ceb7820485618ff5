//! Dotted-path access into request data
//!
//! Data objects are plain `serde_json::Value` objects. Field names in rule
//! specs may use dotted paths (`profile.address.city`); the helpers here walk
//! them without ever mutating the source object.

use serde_json::Value;

/// Resolve a possibly dotted field path against a data object.
///
/// Returns `None` when the path is absent, which is distinct from a present
/// `null` value (`Some(&Value::Null)`). Presence rules depend on the
/// difference.
pub fn get_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Write a value at a possibly dotted path, creating intermediate objects as
/// needed. Non-object intermediates are replaced.
pub fn set_path(data: &mut Value, path: &str, new_value: Value) {
    let mut current = data;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(serde_json::Map::new());
        }
        let map = match current.as_object_mut() {
            Some(map) => map,
            None => return,
        };
        if segments.peek().is_none() {
            map.insert(segment.to_string(), new_value);
            return;
        }
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
    }
}

/// Shallow-merge `overlay` over a clone of `base`; overlay wins on key
/// collision. Used to combine a request body with a validator's custom data.
pub fn merge_objects(base: &Value, overlay: &Value) -> Value {
    match (base.as_object(), overlay.as_object()) {
        (Some(base_map), Some(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                merged.insert(key.clone(), value.clone());
            }
            Value::Object(merged)
        }
        (None, Some(_)) => overlay.clone(),
        _ => base.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_paths() {
        let data = json!({"profile": {"address": {"city": "Oslo"}}});
        assert_eq!(
            get_path(&data, "profile.address.city"),
            Some(&json!("Oslo"))
        );
        assert_eq!(get_path(&data, "profile.address.zip"), None);
    }

    #[test]
    fn absent_is_not_null() {
        let data = json!({"nickname": null});
        assert_eq!(get_path(&data, "nickname"), Some(&Value::Null));
        assert_eq!(get_path(&data, "missing"), None);
    }

    #[test]
    fn set_path_creates_intermediates() {
        let mut data = json!({});
        set_path(&mut data, "profile.city", json!("Oslo"));
        assert_eq!(data, json!({"profile": {"city": "Oslo"}}));
    }

    #[test]
    fn set_path_overwrites_leaf() {
        let mut data = json!({"email": "  A@B.COM "});
        set_path(&mut data, "email", json!("a@b.com"));
        assert_eq!(data, json!({"email": "a@b.com"}));
    }

    #[test]
    fn merge_prefers_overlay() {
        let base = json!({"email": "a@b.com", "age": 30});
        let overlay = json!({"age": 31, "role": "admin"});
        assert_eq!(
            merge_objects(&base, &overlay),
            json!({"email": "a@b.com", "age": 31, "role": "admin"})
        );
    }
}
