//! Fast-path encoder.
//!
//! Serializes by enumerating property tables in place: no snapshot, no
//! callable ever invoked. Anything it cannot handle without a visible side
//! effect (`toJSON`, accessors, foreign prototype chains on exotic values)
//! or without extra bookkeeping (holes, deep or cyclic graphs) aborts the
//! whole attempt. The caller then reruns the canonical slow path.

use crate::buffer::OutputBuffer;
use crate::classify::{has_to_json, unbox};
use crate::descriptor::{enumerable, first_accessor, PropertyKind};
use crate::guard::LoopGuard;
use crate::value::{ObjectKind, ObjectRef, Value};
use std::fmt;
use tracing::trace;

/// Why a fast-path attempt gave up. Never surfaced as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbortReason {
    /// A `toJSON` hook is reachable on a visited object or array.
    HasToJSON,
    /// A function or opaque value inherits from a prototype chain the fast
    /// path does not inspect.
    OpaqueValue,
    /// An enumerable accessor property.
    Accessor,
    /// An array with holes.
    Sparse,
    /// The fixed ancestor array is full.
    TooDeep,
    /// A container was reached again while still open.
    Cycle,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AbortReason::HasToJSON => "value has toJSON",
            AbortReason::OpaqueValue => "opaque value with prototype",
            AbortReason::Accessor => "accessor property",
            AbortReason::Sparse => "sparse array",
            AbortReason::TooDeep => "ancestor stack full",
            AbortReason::Cycle => "cycle",
        };
        f.write_str(s)
    }
}

type Attempt<T> = std::result::Result<T, AbortReason>;

/// Serialize `value` without a replacer or indentation.
///
/// `Ok(None)` means the root resolves to `undefined` (no text). On `Err`
/// the partial output has already been discarded.
pub fn encode(value: &Value) -> Attempt<Option<String>> {
    let mut encoder = FastEncoder::new();
    match encoder.write_root(value) {
        Ok(true) => Ok(Some(encoder.out.finish())),
        Ok(false) => Ok(None),
        Err(reason) => {
            encoder.out.discard();
            Err(reason)
        }
    }
}

struct FastEncoder {
    guard: LoopGuard,
    out: OutputBuffer,
}

impl FastEncoder {
    fn new() -> Self {
        FastEncoder {
            guard: LoopGuard::new(),
            out: OutputBuffer::with_capacity(64),
        }
    }

    fn write_root(&mut self, value: &Value) -> Attempt<bool> {
        match resolve(value)? {
            Some(value) => {
                self.write(&value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Write an already resolved value.
    fn write(&mut self, value: &Value) -> Attempt<()> {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.out.push_number(*n),
            Value::String(s) => self.out.push_quoted(s),
            Value::Object(obj) => {
                if has_to_json(value) {
                    return Err(AbortReason::HasToJSON);
                }
                if obj.is_array() {
                    self.write_array(obj)?;
                } else {
                    self.write_object(obj)?;
                }
            }
            // resolve() filters these out.
            Value::Undefined | Value::Function(_) | Value::Opaque(_) => self.out.push_str("null"),
        }
        Ok(())
    }

    fn write_object(&mut self, obj: &ObjectRef) -> Attempt<()> {
        self.guard.enter(obj.identity())?;
        let inner = obj.borrow();
        if let Some(key) = first_accessor(&inner.properties) {
            trace!(key, "fast path: accessor property");
            return Err(AbortReason::Accessor);
        }

        self.out.push('{');
        let mut first = true;
        for (key, desc) in enumerable(&inner.properties) {
            let PropertyKind::Data(member) = &desc.kind else {
                return Err(AbortReason::Accessor);
            };
            let Some(member) = resolve(member)? else {
                continue;
            };
            if !first {
                self.out.push(',');
            }
            first = false;
            self.out.push_quoted(key);
            self.out.push(':');
            self.write(&member)?;
        }
        self.out.push('}');

        drop(inner);
        self.guard.exit();
        Ok(())
    }

    fn write_array(&mut self, obj: &ObjectRef) -> Attempt<()> {
        self.guard.enter(obj.identity())?;
        let inner = obj.borrow();
        let ObjectKind::Array(elements) = &inner.kind else {
            return Err(AbortReason::Sparse);
        };
        if elements.iter().any(Option::is_none) {
            trace!(
                length = elements.len(),
                "fast path: array has holes"
            );
            return Err(AbortReason::Sparse);
        }

        self.out.push('[');
        for (index, element) in elements.iter().flatten().enumerate() {
            if index > 0 {
                self.out.push(',');
            }
            match resolve(element)? {
                Some(element) => self.write(&element)?,
                None => self.out.push_str("null"),
            }
        }
        self.out.push(']');

        drop(inner);
        self.guard.exit();
        Ok(())
    }
}

/// Unbox and decide whether `value` produces text. `None` is the
/// acts-like-`undefined` case. Exotic values with a prototype abort, since
/// ruling out an inherited `toJSON` would mean walking a foreign chain.
fn resolve(value: &Value) -> Attempt<Option<Value>> {
    let value = unbox(value);
    match &value {
        Value::Undefined => Ok(None),
        Value::Function(f) if f.prototype().is_some() => Err(AbortReason::OpaqueValue),
        Value::Opaque(o) if o.prototype().is_some() => Err(AbortReason::OpaqueValue),
        Value::Function(_) | Value::Opaque(_) => Ok(None),
        _ => Ok(Some(value)),
    }
}
