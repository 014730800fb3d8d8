//! Dispatch between the two encoders.
//!
//! Calls with no replacer and no indent try the fast path first. If it
//! aborts, its buffer is already gone and the slow path starts over from
//! the original root value. The fallback happens at most once per call.

use crate::error::Result;
use crate::fast::{self, AbortReason};
use crate::options::Options;
use crate::replacer::{Indent, Replacer};
use crate::slow;
use crate::value::Value;
use tracing::{debug, trace};

/// Which encoder produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodePath {
    Fast,
    Slow,
}

/// A stringify result with diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// The JSON text, or `None` when the root has no JSON representation.
    pub text: Option<String>,
    pub path: EncodePath,
    /// Set when the fast path was tried and gave up.
    pub abort: Option<AbortReason>,
}

/// A configured stringify entry point.
#[derive(Debug, Clone, Default)]
pub struct Stringifier {
    options: Options,
}

impl Stringifier {
    pub fn new(options: Options) -> Self {
        Stringifier { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// `JSON.stringify(value, replacer, indent)`.
    pub fn stringify(
        &self,
        value: &Value,
        replacer: Option<&Replacer>,
        indent: Option<&Indent>,
    ) -> Result<Option<String>> {
        self.stringify_with_report(value, replacer, indent)
            .map(|report| report.text)
    }

    /// Like [`stringify`](Self::stringify) but also reports which path
    /// produced the text.
    pub fn stringify_with_report(
        &self,
        value: &Value,
        replacer: Option<&Replacer>,
        indent: Option<&Indent>,
    ) -> Result<Report> {
        let eligible = self.options.fast_path && replacer.is_none() && indent.is_none();
        trace!(
            eligible,
            has_replacer = replacer.is_some(),
            has_indent = indent.is_some(),
            "stringify"
        );

        let mut abort = None;
        if eligible {
            match fast::encode(value) {
                Ok(text) => {
                    return Ok(Report {
                        text,
                        path: EncodePath::Fast,
                        abort: None,
                    });
                }
                Err(reason) => {
                    debug!(%reason, "fast path aborted, falling back to slow path");
                    abort = Some(reason);
                }
            }
        }

        let text = slow::encode(value, replacer, indent, self.options.max_depth)?;
        Ok(Report {
            text,
            path: EncodePath::Slow,
            abort,
        })
    }
}

/// Serialize `value` to JSON text with default [`Options`].
///
/// Returns `Ok(None)` when the root value has no JSON text (e.g. a function),
/// and an error for circular structures or a failing callback.
///
/// # Example
/// ```
/// use stringify_core::{stringify, ObjectRef, Value};
///
/// let obj = ObjectRef::new();
/// obj.set("a", 1);
/// obj.set("b", ObjectRef::array([Value::from(true), Value::Null]));
/// let text = stringify(&obj.into(), None, None).unwrap();
/// assert_eq!(text.as_deref(), Some(r#"{"a":1,"b":[true,null]}"#));
/// ```
pub fn stringify(
    value: &Value,
    replacer: Option<&Replacer>,
    indent: Option<&Indent>,
) -> Result<Option<String>> {
    Stringifier::default().stringify(value, replacer, indent)
}
