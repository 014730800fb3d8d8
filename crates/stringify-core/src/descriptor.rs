//! Descriptor inspection: what kind of property a key is, without reading it.
//!
//! Both encoders enumerate objects through this module. The fast path only
//! ever looks at [`PropertyKind`]; it never calls the getter inside an
//! accessor descriptor.

use crate::value::{NativeFn, ObjectKind, ObjectRef, Value};
use std::fmt;

/// Where a property's value comes from.
#[derive(Clone)]
pub enum PropertyKind {
    /// A stored value. Reading it has no side effects.
    Data(Value),
    /// A computed value. `None` is an accessor with no getter (reads as
    /// `undefined`).
    Accessor(Option<NativeFn>),
}

/// An own property's attributes as far as serialization cares.
#[derive(Clone)]
pub struct PropertyDescriptor {
    pub enumerable: bool,
    pub kind: PropertyKind,
}

impl PropertyDescriptor {
    /// Enumerable data property.
    pub fn data(value: impl Into<Value>) -> Self {
        PropertyDescriptor {
            enumerable: true,
            kind: PropertyKind::Data(value.into()),
        }
    }

    /// Non-enumerable data property.
    pub fn hidden(value: impl Into<Value>) -> Self {
        PropertyDescriptor {
            enumerable: false,
            kind: PropertyKind::Data(value.into()),
        }
    }

    /// Enumerable accessor property.
    pub fn accessor(getter: Option<NativeFn>) -> Self {
        PropertyDescriptor {
            enumerable: true,
            kind: PropertyKind::Accessor(getter),
        }
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, PropertyKind::Accessor(_))
    }

    /// The stored value of a data property.
    pub fn data_value(&self) -> Option<&Value> {
        match &self.kind {
            PropertyKind::Data(value) => Some(value),
            PropertyKind::Accessor(_) => None,
        }
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            PropertyKind::Data(value) => format!("Data({:?})", value),
            PropertyKind::Accessor(Some(_)) => "Accessor(getter)".to_string(),
            PropertyKind::Accessor(None) => "Accessor(none)".to_string(),
        };
        f.debug_struct("PropertyDescriptor")
            .field("enumerable", &self.enumerable)
            .field("kind", &kind)
            .finish()
    }
}

/// Snapshot of `obj`'s own enumerable string-keyed properties in own-keys
/// order. Array elements come first as data entries keyed by index. No
/// getter is invoked.
pub fn own_enumerable_properties(obj: &ObjectRef) -> Vec<(String, PropertyDescriptor)> {
    let inner = obj.borrow();
    let mut out = Vec::new();
    if let ObjectKind::Array(elements) = &inner.kind {
        for (index, element) in elements.iter().enumerate() {
            if let Some(value) = element {
                out.push((index.to_string(), PropertyDescriptor::data(value.clone())));
            }
        }
    }
    out.extend(
        enumerable(&inner.properties).map(|(key, desc)| (key.to_string(), desc.clone())),
    );
    out
}

/// Enumerable entries of a borrowed property table, in table order.
pub(crate) fn enumerable(
    properties: &[(String, PropertyDescriptor)],
) -> impl Iterator<Item = (&str, &PropertyDescriptor)> {
    properties
        .iter()
        .filter(|(_, desc)| desc.enumerable)
        .map(|(key, desc)| (key.as_str(), desc))
}

/// Key of the first enumerable accessor, if any.
pub fn first_accessor(properties: &[(String, PropertyDescriptor)]) -> Option<&str> {
    enumerable(properties)
        .find(|(_, desc)| desc.is_accessor())
        .map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn snapshot_skips_hidden_and_keeps_order() {
        let obj = ObjectRef::new();
        obj.set("a", 1);
        obj.define_property("hidden", PropertyDescriptor::hidden(2));
        obj.set("b", 3);
        let keys: Vec<String> = own_enumerable_properties(&obj)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn snapshot_does_not_run_getters() {
        let calls = Rc::new(Cell::new(0));
        let obj = ObjectRef::new();
        let counter = calls.clone();
        obj.define_getter("g", move |_| {
            counter.set(counter.get() + 1);
            Ok(Value::Null)
        });
        let props = own_enumerable_properties(&obj);
        assert_eq!(props.len(), 1);
        assert!(props[0].1.is_accessor());
        assert_eq!(first_accessor(&props), Some("g"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn array_elements_are_listed_first() {
        let arr = ObjectRef::array_with_length(3);
        arr.set("2", "two");
        arr.set("name", "extra");
        let keys: Vec<String> = own_enumerable_properties(&arr)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["2", "name"]);
    }
}
