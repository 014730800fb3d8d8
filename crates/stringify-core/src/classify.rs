//! Value classification shared by both encoders.

use crate::descriptor::{PropertyDescriptor, PropertyKind};
use crate::value::{ObjectRef, Value};

/// Name of the serialization hook looked up on every object.
pub const TO_JSON: &str = "toJSON";

/// What a value is for JSON purposes, after auto-unboxing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// null, boolean, number or string.
    Primitive,
    /// Carries a callable `toJSON` (own or inherited), or an accessor named
    /// `toJSON` whose result cannot be known without running it.
    HasToJSON,
    PlainObject,
    PlainArray,
    /// `undefined`, functions and opaque values without `toJSON`: omitted as
    /// an object member, `null` as an array element, no text at the root.
    Unserializable,
}

/// Replace a Number, String or Boolean wrapper by its primitive. Everything
/// else is returned unchanged.
pub fn unbox(value: &Value) -> Value {
    if let Value::Object(obj) = value {
        if let Some(primitive) = obj.boxed_primitive() {
            return primitive.to_value();
        }
    }
    value.clone()
}

/// Classify `value`. Never runs a getter or any other callable.
pub fn classify(value: &Value) -> Category {
    let value = unbox(value);
    if has_to_json(&value) {
        return Category::HasToJSON;
    }
    shape(&value)
}

/// Category ignoring `toJSON`. Used on values that already went through
/// `toJSON` resolution.
pub(crate) fn shape(value: &Value) -> Category {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Category::Primitive,
        Value::Object(obj) if obj.is_array() => Category::PlainArray,
        Value::Object(_) => Category::PlainObject,
        Value::Undefined | Value::Function(_) | Value::Opaque(_) => Category::Unserializable,
    }
}

/// Where `toJSON` would be looked up for `value`, if anywhere.
pub(crate) fn lookup_root(value: &Value) -> Option<ObjectRef> {
    match value {
        Value::Object(obj) => Some(obj.clone()),
        Value::Function(f) => f.prototype().cloned(),
        Value::Opaque(o) => o.prototype().cloned(),
        _ => None,
    }
}

/// Descriptor-only `toJSON` check.
pub(crate) fn has_to_json(value: &Value) -> bool {
    let Some(root) = lookup_root(value) else {
        return false;
    };
    match root.lookup(TO_JSON) {
        Some(PropertyDescriptor {
            kind: PropertyKind::Data(Value::Function(_)),
            ..
        }) => true,
        Some(PropertyDescriptor {
            kind: PropertyKind::Accessor(_),
            ..
        }) => true,
        _ => false,
    }
}
