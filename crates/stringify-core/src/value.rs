//! Host runtime value model.
//!
//! The serializer never sees a real engine heap. Instead the host graph is
//! expressed as a tagged [`Value`] whose reference variants are shared,
//! interior-mutable handles. Identity is the address of the shared allocation,
//! which is what both ancestor guards track.
//!
//! Property access is split in two: descriptor inspection (free of side
//! effects, see [`crate::descriptor`]) and [`ObjectRef::get`], which runs
//! getters.

use crate::descriptor::{PropertyDescriptor, PropertyKind};
use crate::error::Result;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// A host callable: `(this, args) -> value`. Used for getters, `toJSON`
/// methods and replacer functions.
pub type NativeFn = Rc<dyn Fn(&Value, &[Value]) -> Result<Value>>;

/// A runtime value as seen by the serializer.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Object(ObjectRef),
    Function(FunctionRef),
    Opaque(OpaqueRef),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    /// `new Number(n)`
    pub fn boxed_number(n: f64) -> Self {
        Value::Object(ObjectRef::boxed(Primitive::Number(n)))
    }

    /// `new String(s)`
    pub fn boxed_string(s: impl AsRef<str>) -> Self {
        Value::Object(ObjectRef::boxed(Primitive::String(Rc::from(s.as_ref()))))
    }

    /// `new Boolean(b)`
    pub fn boxed_bool(b: bool) -> Self {
        Value::Object(ObjectRef::boxed(Primitive::Boolean(b)))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionRef> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueRef> {
        match self {
            Value::Opaque(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    // Shallow on purpose: graphs may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Object(obj) if obj.is_array() => {
                write!(f, "Array(len={}, #{:x})", obj.array_length(), obj.identity())
            }
            Value::Object(obj) => write!(f, "Object(#{:x})", obj.identity()),
            Value::Function(func) => write!(f, "Function({})", func.name()),
            Value::Opaque(o) => write!(f, "Opaque({})", o.kind()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<FunctionRef> for Value {
    fn from(f: FunctionRef) -> Self {
        Value::Function(f)
    }
}

impl From<OpaqueRef> for Value {
    fn from(o: OpaqueRef) -> Self {
        Value::Opaque(o)
    }
}

/// The primitive held by a Number, String or Boolean wrapper object.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Number(f64),
    String(Rc<str>),
    Boolean(bool),
}

impl Primitive {
    pub fn to_value(&self) -> Value {
        match self {
            Primitive::Number(n) => Value::Number(*n),
            Primitive::String(s) => Value::String(s.clone()),
            Primitive::Boolean(b) => Value::Bool(*b),
        }
    }
}

#[derive(Clone)]
pub(crate) enum ObjectKind {
    Ordinary,
    /// Dense storage with `None` for holes. The vector length is the array
    /// `length`.
    Array(Vec<Option<Value>>),
    Boxed(Primitive),
}

pub(crate) struct JsObject {
    pub(crate) kind: ObjectKind,
    /// Own properties in own-keys order: array-index keys ascending first,
    /// then the rest in insertion order. Array elements are not stored here.
    pub(crate) properties: Vec<(String, PropertyDescriptor)>,
    pub(crate) prototype: Option<ObjectRef>,
}

/// Shared handle to an object, array or boxed primitive.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<JsObject>>);

impl Default for ObjectRef {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectRef {
    fn from_kind(kind: ObjectKind) -> Self {
        ObjectRef(Rc::new(RefCell::new(JsObject {
            kind,
            properties: Vec::new(),
            prototype: None,
        })))
    }

    /// A fresh ordinary object with no prototype.
    pub fn new() -> Self {
        Self::from_kind(ObjectKind::Ordinary)
    }

    pub fn with_prototype(proto: &ObjectRef) -> Self {
        let obj = Self::new();
        obj.0.borrow_mut().prototype = Some(proto.clone());
        obj
    }

    /// A dense array holding `items`.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::from_kind(ObjectKind::Array(items.into_iter().map(Some).collect()))
    }

    /// An array of the given length with every index a hole.
    pub fn array_with_length(length: usize) -> Self {
        Self::from_kind(ObjectKind::Array(vec![None; length]))
    }

    pub fn boxed(primitive: Primitive) -> Self {
        Self::from_kind(ObjectKind::Boxed(primitive))
    }

    pub(crate) fn borrow(&self) -> Ref<'_, JsObject> {
        self.0.borrow()
    }

    /// Address of the shared allocation.
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_array(&self) -> bool {
        matches!(self.0.borrow().kind, ObjectKind::Array(_))
    }

    pub fn boxed_primitive(&self) -> Option<Primitive> {
        match &self.0.borrow().kind {
            ObjectKind::Boxed(p) => Some(p.clone()),
            _ => None,
        }
    }

    pub fn prototype(&self) -> Option<ObjectRef> {
        self.0.borrow().prototype.clone()
    }

    /// Replace the prototype. Refuses (returns `false`) if the change would
    /// make the prototype chain circular.
    pub fn set_prototype(&self, proto: Option<&ObjectRef>) -> bool {
        let mut cursor = proto.cloned();
        while let Some(p) = cursor {
            if p.ptr_eq(self) {
                return false;
            }
            cursor = p.prototype();
        }
        self.0.borrow_mut().prototype = proto.cloned();
        true
    }

    /// Array `length`, or 0 for non-arrays.
    pub fn array_length(&self) -> usize {
        match &self.0.borrow().kind {
            ObjectKind::Array(elements) => elements.len(),
            _ => 0,
        }
    }

    /// Number of indices that actually hold an element.
    pub fn present_count(&self) -> usize {
        match &self.0.borrow().kind {
            ObjectKind::Array(elements) => elements.iter().filter(|e| e.is_some()).count(),
            _ => 0,
        }
    }

    /// Element at `index`; `None` for a hole or out of range.
    pub fn element(&self, index: usize) -> Option<Value> {
        match &self.0.borrow().kind {
            ObjectKind::Array(elements) => elements.get(index).cloned().flatten(),
            _ => None,
        }
    }

    /// Append to an array. No-op on non-arrays.
    pub fn push(&self, value: impl Into<Value>) {
        if let ObjectKind::Array(elements) = &mut self.0.borrow_mut().kind {
            elements.push(Some(value.into()));
        }
    }

    /// Truncate or extend (with holes) an array.
    pub fn set_length(&self, length: usize) {
        if let ObjectKind::Array(elements) = &mut self.0.borrow_mut().kind {
            elements.resize(length, None);
        }
    }

    /// Plain assignment: creates or overwrites an enumerable data property.
    /// On arrays an index key writes the element, growing `length` as needed.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        {
            let mut inner = self.0.borrow_mut();
            if let (ObjectKind::Array(elements), Some(index)) =
                (&mut inner.kind, array_index(&key))
            {
                let index = index as usize;
                if index >= elements.len() {
                    elements.resize(index + 1, None);
                }
                elements[index] = Some(value);
                return;
            }
        }
        self.define_property(key, PropertyDescriptor::data(value));
    }

    /// Define or redefine an own property. A redefined key keeps its
    /// position in the own-keys order.
    pub fn define_property(&self, key: impl Into<String>, descriptor: PropertyDescriptor) {
        let key = key.into();
        let mut inner = self.0.borrow_mut();
        if let Some(slot) = inner.properties.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = descriptor;
            return;
        }
        let position = match array_index(&key) {
            Some(index) => inner
                .properties
                .iter()
                .position(|(k, _)| array_index(k).is_none_or(|other| other > index))
                .unwrap_or(inner.properties.len()),
            None => inner.properties.len(),
        };
        inner.properties.insert(position, (key, descriptor));
    }

    /// Define an enumerable accessor property backed by `getter`.
    pub fn define_getter<F>(&self, key: impl Into<String>, getter: F)
    where
        F: Fn(&Value) -> Result<Value> + 'static,
    {
        let getter: NativeFn = Rc::new(move |this: &Value, _args: &[Value]| getter(this));
        self.define_property(key, PropertyDescriptor::accessor(Some(getter)));
    }

    /// Delete an own property (or array element, leaving a hole).
    pub fn remove(&self, key: &str) -> bool {
        let mut inner = self.0.borrow_mut();
        if let (ObjectKind::Array(elements), Some(index)) = (&mut inner.kind, array_index(key)) {
            return match elements.get_mut(index as usize) {
                Some(slot) => slot.take().is_some(),
                None => false,
            };
        }
        let before = inner.properties.len();
        inner.properties.retain(|(k, _)| k != key);
        inner.properties.len() != before
    }

    /// Own descriptor for `key`, with array elements reported as enumerable
    /// data properties.
    pub fn own_property(&self, key: &str) -> Option<PropertyDescriptor> {
        let inner = self.0.borrow();
        if let (ObjectKind::Array(elements), Some(index)) = (&inner.kind, array_index(key)) {
            return elements
                .get(index as usize)
                .cloned()
                .flatten()
                .map(PropertyDescriptor::data);
        }
        inner
            .properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, d)| d.clone())
    }

    /// Find `key` on this object or its prototype chain without running
    /// any getter.
    pub fn lookup(&self, key: &str) -> Option<PropertyDescriptor> {
        let mut cursor = Some(self.clone());
        while let Some(obj) = cursor {
            if let Some(desc) = obj.own_property(key) {
                return Some(desc);
            }
            cursor = obj.prototype();
        }
        None
    }

    /// `[[Get]]` with this object as receiver. Runs the getter if `key`
    /// resolves to an accessor.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.get_with_receiver(key, &Value::Object(self.clone()))
    }

    /// `[[Get]]` looking `key` up here but calling any getter with
    /// `receiver` as `this`.
    pub fn get_with_receiver(&self, key: &str, receiver: &Value) -> Result<Value> {
        // The descriptor is cloned out so no borrow is held while a getter runs.
        match self.lookup(key) {
            Some(PropertyDescriptor {
                kind: PropertyKind::Data(value),
                ..
            }) => Ok(value),
            Some(PropertyDescriptor {
                kind: PropertyKind::Accessor(Some(getter)),
                ..
            }) => getter(receiver, &[]),
            _ => Ok(Value::Undefined),
        }
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef(#{:x})", self.identity())
    }
}

struct JsFunction {
    name: String,
    call: NativeFn,
    prototype: Option<ObjectRef>,
}

/// Shared handle to a host function.
#[derive(Clone)]
pub struct FunctionRef(Rc<JsFunction>);

impl FunctionRef {
    /// A function with no prototype: it is known not to carry `toJSON`.
    pub fn new<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + 'static,
    {
        FunctionRef(Rc::new(JsFunction {
            name: name.into(),
            call: Rc::new(call),
            prototype: None,
        }))
    }

    /// A function that inherits from `proto`, like a built-in inheriting
    /// from `Function.prototype`.
    pub fn with_prototype<F>(name: impl Into<String>, proto: &ObjectRef, call: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + 'static,
    {
        FunctionRef(Rc::new(JsFunction {
            name: name.into(),
            call: Rc::new(call),
            prototype: Some(proto.clone()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn prototype(&self) -> Option<&ObjectRef> {
        self.0.prototype.as_ref()
    }

    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value> {
        (self.0.call)(this, args)
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionRef({})", self.0.name)
    }
}

struct OpaqueValue {
    kind: String,
    data: Vec<u8>,
    prototype: Option<ObjectRef>,
}

/// An exotic host value with no JSON shape of its own (raw buffers,
/// pointers). Only an inherited `toJSON` makes it serializable.
#[derive(Clone)]
pub struct OpaqueRef(Rc<OpaqueValue>);

impl OpaqueRef {
    pub fn new(kind: impl Into<String>, data: Vec<u8>) -> Self {
        OpaqueRef(Rc::new(OpaqueValue {
            kind: kind.into(),
            data,
            prototype: None,
        }))
    }

    pub fn with_prototype(kind: impl Into<String>, data: Vec<u8>, proto: &ObjectRef) -> Self {
        OpaqueRef(Rc::new(OpaqueValue {
            kind: kind.into(),
            data,
            prototype: Some(proto.clone()),
        }))
    }

    pub fn kind(&self) -> &str {
        &self.0.kind
    }

    pub fn data(&self) -> &[u8] {
        &self.0.data
    }

    pub fn prototype(&self) -> Option<&ObjectRef> {
        self.0.prototype.as_ref()
    }
}

impl fmt::Debug for OpaqueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueRef({}, {} bytes)", self.0.kind, self.0.data.len())
    }
}

/// Parse a canonical array index: `"0"` or digits without a leading zero,
/// below `2^32 - 1`.
pub fn array_index(key: &str) -> Option<u32> {
    let bytes = key.as_bytes();
    if bytes.is_empty() || (bytes.len() > 1 && bytes[0] == b'0') {
        return None;
    }
    if !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    match key.parse::<u32>() {
        Ok(index) if index != u32::MAX => Some(index),
        _ => None,
    }
}
