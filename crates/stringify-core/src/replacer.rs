//! The optional `replacer` and `space` arguments of `stringify`.

use crate::error::Result;
use crate::value::{NativeFn, Value};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Longest gap honoured, in characters.
pub const MAX_GAP: usize = 10;

/// A replacer: either a transform `(holder, [key, value]) -> value` or an
/// allow-list of object keys.
#[derive(Clone)]
pub enum Replacer {
    Function(NativeFn),
    Keys(Vec<String>),
}

impl Replacer {
    /// Transform replacer. The callable gets the holder as `this` and
    /// `[key, value]` as arguments.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + 'static,
    {
        Replacer::Function(Rc::new(f))
    }

    /// Allow-list replacer. Duplicates are dropped keeping the first
    /// occurrence.
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut list = Vec::new();
        for key in keys {
            let key = key.into();
            if seen.insert(key.clone()) {
                list.push(key);
            }
        }
        Replacer::Keys(list)
    }

    pub(crate) fn as_function(&self) -> Option<&NativeFn> {
        match self {
            Replacer::Function(f) => Some(f),
            Replacer::Keys(_) => None,
        }
    }

    pub(crate) fn as_keys(&self) -> Option<&[String]> {
        match self {
            Replacer::Keys(keys) => Some(keys),
            Replacer::Function(_) => None,
        }
    }
}

impl fmt::Debug for Replacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacer::Function(_) => f.write_str("Replacer::Function"),
            Replacer::Keys(keys) => f.debug_tuple("Replacer::Keys").field(keys).finish(),
        }
    }
}

/// The `space` argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Indent {
    /// That many spaces, clamped to `0..=10`.
    Spaces(i64),
    /// The first ten characters of the string.
    Text(String),
}

impl Indent {
    /// The per-level gap string. Empty means compact output.
    pub fn gap(&self) -> String {
        match self {
            Indent::Spaces(n) => " ".repeat((*n).clamp(0, MAX_GAP as i64) as usize),
            Indent::Text(s) => s.chars().take(MAX_GAP).collect(),
        }
    }
}

impl From<i64> for Indent {
    fn from(n: i64) -> Self {
        Indent::Spaces(n)
    }
}

impl From<&str> for Indent {
    fn from(s: &str) -> Self {
        Indent::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_is_clamped() {
        assert_eq!(Indent::Spaces(2).gap(), "  ");
        assert_eq!(Indent::Spaces(-3).gap(), "");
        assert_eq!(Indent::Spaces(40).gap().len(), MAX_GAP);
        assert_eq!(Indent::from("\t").gap(), "\t");
        assert_eq!(Indent::from("abcdefghijklmnop").gap(), "abcdefghij");
    }

    #[test]
    fn key_list_dedups_in_order() {
        let Replacer::Keys(keys) = Replacer::keys(["b", "a", "b", "c", "a"]) else {
            panic!("expected key list");
        };
        assert_eq!(keys, ["b", "a", "c"]);
    }
}
