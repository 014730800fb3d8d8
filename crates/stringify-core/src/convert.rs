//! Building host values from `serde_json` trees.

use crate::value::{ObjectRef, Value};

/// Convert a parsed JSON document to a fresh host graph. Object key order
/// follows the map (insertion order with `preserve_order`).
impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::string(s),
            serde_json::Value::Array(items) => {
                Value::Object(ObjectRef::array(items.iter().map(Value::from)))
            }
            serde_json::Value::Object(map) => {
                let obj = ObjectRef::new();
                for (key, item) in map {
                    obj.set(key.as_str(), Value::from(item));
                }
                Value::Object(obj)
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}
