//! Stringify configuration.

use crate::guard::DEFAULT_MAX_DEPTH;
use serde::Deserialize;

/// Knobs for a [`Stringifier`](crate::Stringifier).
///
/// Deserializes from partial JSON; missing fields take their defaults.
///
/// ```
/// use stringify_core::Options;
/// let opts: Options = serde_json::from_str(r#"{"max_depth": 64}"#).unwrap();
/// assert!(opts.fast_path);
/// assert_eq!(opts.max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Try the fast path on eligible calls. Turning it off forces every call
    /// through the slow path.
    pub fast_path: bool,
    /// Slow-path nesting bound.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            fast_path: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Options {
    /// Options that skip the fast path.
    pub fn slow_only() -> Self {
        Options {
            fast_path: false,
            ..Self::default()
        }
    }
}
