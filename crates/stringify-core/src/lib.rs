//! # stringify-core
//!
//! `JSON.stringify` for host runtime values, built as two cooperating encoders.
//!
//! The **fast path** walks property tables directly and never runs user code.
//! The moment it meets something it can't serialize without a possible side
//! effect (a `toJSON` hook, an accessor) or without extra bookkeeping (holes,
//! more than 32 nested containers, a cycle), it aborts and discards its
//! output. The **slow path** then serializes the original value from scratch
//! with the canonical algorithm: getters, `toJSON`, replacers, indentation,
//! hole filling and true cycle detection. The final text is identical to
//! what the slow path alone would produce and every getter runs at most once.
//!
//! ## Quick start
//!
//! ```rust
//! use stringify_core::{stringify, ObjectRef, Value};
//!
//! let point = ObjectRef::new();
//! point.set("x", 1);
//! point.set("y", Value::boxed_number(2.5));
//! point.set("label", Value::Undefined);
//!
//! let text = stringify(&point.into(), None, None).unwrap();
//! assert_eq!(text.as_deref(), Some(r#"{"x":1,"y":2.5}"#));
//! ```
//!
//! ## Modules
//!
//! - [`value`] — host value model (`Value`, `ObjectRef`, `FunctionRef`, `OpaqueRef`)
//! - [`descriptor`] — side-effect-free property inspection
//! - [`classify`] — auto-unboxing and JSON categories
//! - [`fast`] — aborting fast-path encoder
//! - [`slow`] — canonical slow-path encoder
//! - [`guard`] — ancestor tracking for both paths
//! - [`dispatch`] — `stringify` entry points and fallback
//! - [`replacer`] — replacer and indent arguments
//! - [`options`] — configuration
//! - [`error`] — error types

pub mod buffer;
pub mod classify;
pub mod convert;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod fast;
pub mod guard;
pub mod number;
pub mod options;
pub mod quote;
pub mod replacer;
pub mod slow;
pub mod value;

pub use classify::{classify, Category};
pub use descriptor::{own_enumerable_properties, PropertyDescriptor, PropertyKind};
pub use dispatch::{stringify, EncodePath, Report, Stringifier};
pub use error::StringifyError;
pub use fast::AbortReason;
pub use options::Options;
pub use replacer::{Indent, Replacer};
pub use value::{FunctionRef, NativeFn, ObjectRef, OpaqueRef, Primitive, Value};
