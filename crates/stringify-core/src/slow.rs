//! Slow-path encoder: the canonical recursive stringify algorithm.
//!
//! Per node: read the value from its holder (running a getter if it is an
//! accessor), unbox, call `toJSON`, call the replacer function, unbox again,
//! then write. Containers are entered through a [`CycleTracker`], so a true
//! cycle fails the call instead of recursing forever.

use crate::buffer::OutputBuffer;
use crate::classify::{lookup_root, shape, unbox, Category, TO_JSON};
use crate::descriptor::own_enumerable_properties;
use crate::error::Result;
use crate::guard::CycleTracker;
use crate::replacer::{Indent, Replacer};
use crate::value::{NativeFn, ObjectRef, Value};

/// Serialize `value` with full semantics.
///
/// Returns `Ok(None)` when the root resolves to something with no JSON
/// text (`undefined`, a function, an opaque value).
pub fn encode(
    value: &Value,
    replacer: Option<&Replacer>,
    indent: Option<&Indent>,
    max_depth: usize,
) -> Result<Option<String>> {
    let mut encoder = SlowEncoder {
        replacer: replacer.and_then(Replacer::as_function),
        property_list: replacer.and_then(Replacer::as_keys),
        gap: indent.map(Indent::gap).unwrap_or_default(),
        tracker: CycleTracker::new(max_depth),
        out: OutputBuffer::with_capacity(64),
    };

    let wrapper = ObjectRef::new();
    wrapper.set("", value.clone());
    let holder = Value::Object(wrapper);

    let root = encoder.resolve(&holder, "", value.clone())?;
    if is_unserializable(&root) {
        return Ok(None);
    }
    encoder.write(&root, "")?;
    Ok(Some(encoder.out.finish()))
}

struct SlowEncoder<'a> {
    replacer: Option<&'a NativeFn>,
    property_list: Option<&'a [String]>,
    gap: String,
    tracker: CycleTracker,
    out: OutputBuffer,
}

impl SlowEncoder<'_> {
    /// Apply unboxing, `toJSON` and the replacer to a value read from
    /// `holder[key]`.
    fn resolve(&mut self, holder: &Value, key: &str, value: Value) -> Result<Value> {
        let mut value = unbox(&value);

        if let Some(root) = lookup_root(&value) {
            if let Value::Function(to_json) = root.get_with_receiver(TO_JSON, &value)? {
                value = to_json.call(&value, &[Value::string(key)])?;
            }
        }

        if let Some(replacer) = self.replacer {
            value = replacer(holder, &[Value::string(key), value])?;
        }

        Ok(unbox(&value))
    }

    /// Write a resolved, serializable value reached through `key`.
    fn write(&mut self, value: &Value, key: &str) -> Result<()> {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.out.push_number(*n),
            Value::String(s) => self.out.push_quoted(s),
            Value::Object(obj) if obj.is_array() => self.write_array(obj, key)?,
            Value::Object(obj) => self.write_object(obj, key)?,
            // Callers check is_unserializable() first.
            Value::Undefined | Value::Function(_) | Value::Opaque(_) => self.out.push_str("null"),
        }
        Ok(())
    }

    fn write_object(&mut self, obj: &ObjectRef, key: &str) -> Result<()> {
        self.tracker.enter(key, obj.identity(), false)?;
        let depth = self.tracker.depth();

        // Keys are fixed up front; values are read one at a time so that a
        // getter's mutation is seen by later members.
        let keys: Vec<String> = match self.property_list {
            Some(list) => list.to_vec(),
            None => own_enumerable_properties(obj)
                .into_iter()
                .map(|(k, _)| k)
                .collect(),
        };
        let holder = Value::Object(obj.clone());

        self.out.push('{');
        let mut any = false;
        for member_key in &keys {
            let member = obj.get(member_key)?;
            let member = self.resolve(&holder, member_key, member)?;
            if is_unserializable(&member) {
                continue;
            }
            if any {
                self.out.push(',');
            }
            any = true;
            if !self.gap.is_empty() {
                self.out.push_newline_indent(&self.gap, depth);
            }
            self.out.push_quoted(member_key);
            self.out.push(':');
            if !self.gap.is_empty() {
                self.out.push(' ');
            }
            self.write(&member, member_key)?;
        }
        if any && !self.gap.is_empty() {
            self.out.push_newline_indent(&self.gap, depth - 1);
        }
        self.out.push('}');

        self.tracker.exit();
        Ok(())
    }

    fn write_array(&mut self, obj: &ObjectRef, key: &str) -> Result<()> {
        self.tracker.enter(key, obj.identity(), true)?;
        let depth = self.tracker.depth();
        let length = obj.array_length();
        let holder = Value::Object(obj.clone());

        self.out.push('[');
        for index in 0..length {
            if index > 0 {
                self.out.push(',');
            }
            if !self.gap.is_empty() {
                self.out.push_newline_indent(&self.gap, depth);
            }
            let index_key = index.to_string();
            // Holes read as undefined and so become null.
            let element = obj.get(&index_key)?;
            let element = self.resolve(&holder, &index_key, element)?;
            if is_unserializable(&element) {
                self.out.push_str("null");
            } else {
                self.write(&element, &index_key)?;
            }
        }
        if length > 0 && !self.gap.is_empty() {
            self.out.push_newline_indent(&self.gap, depth - 1);
        }
        self.out.push(']');

        self.tracker.exit();
        Ok(())
    }
}

fn is_unserializable(value: &Value) -> bool {
    shape(value) == Category::Unserializable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StringifyError;
    use crate::guard::DEFAULT_MAX_DEPTH;

    fn plain(value: &Value) -> Result<Option<String>> {
        encode(value, None, None, DEFAULT_MAX_DEPTH)
    }

    #[test]
    fn holes_become_null() {
        let arr = ObjectRef::array_with_length(3);
        arr.set("1", true);
        assert_eq!(plain(&arr.into()), Ok(Some("[null,true,null]".to_string())));
    }

    #[test]
    fn getter_runs_once() {
        let calls = std::rc::Rc::new(std::cell::Cell::new(0));
        let obj = ObjectRef::new();
        let counter = calls.clone();
        obj.define_getter("g", move |_| {
            counter.set(counter.get() + 1);
            Ok(Value::from(7))
        });
        assert_eq!(plain(&obj.into()), Ok(Some(r#"{"g":7}"#.to_string())));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn indented_layout() {
        let obj = ObjectRef::new();
        obj.set("a", ObjectRef::array([Value::from(1), Value::from(2)]));
        obj.set("b", ObjectRef::new());
        obj.set("c", ObjectRef::array([]));
        let indent = Indent::Spaces(2);
        let text = encode(&obj.into(), None, Some(&indent), DEFAULT_MAX_DEPTH)
            .unwrap()
            .unwrap();
        assert_eq!(
            text,
            "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {},\n  \"c\": []\n}"
        );
    }

    #[test]
    fn depth_limit() {
        let mut deep = ObjectRef::new();
        for _ in 0..5 {
            let next = ObjectRef::new();
            next.set("d", deep);
            deep = next;
        }
        assert_eq!(
            encode(&deep.into(), None, None, 3),
            Err(StringifyError::DepthExceeded { limit: 3 })
        );
    }
}
