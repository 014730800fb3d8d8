//! Ancestor tracking for both encoders.
//!
//! The two paths use different strategies on purpose. [`LoopGuard`] is a
//! fixed array scanned linearly; running out of slots is "too deep for the
//! fast path", not a cycle. [`CycleTracker`] keeps the full chain with an
//! identity index and reports real cycles with a readable path.

use crate::error::{Result, StringifyError};
use crate::fast::AbortReason;
use std::collections::HashMap;

/// Slots in the fast-path ancestor array.
pub const FAST_PATH_ANCESTORS: usize = 32;

/// Default slow-path nesting bound. Only there to keep the native stack
/// bounded; it is never reported as a cycle.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Fixed-capacity ancestor stack for the fast path.
#[derive(Debug)]
pub struct LoopGuard {
    slots: [usize; FAST_PATH_ANCESTORS],
    len: usize,
}

impl Default for LoopGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopGuard {
    pub fn new() -> Self {
        LoopGuard {
            slots: [0; FAST_PATH_ANCESTORS],
            len: 0,
        }
    }

    /// Push `identity`. A repeat is `Cycle`; a full stack is `TooDeep`.
    pub fn enter(&mut self, identity: usize) -> std::result::Result<(), AbortReason> {
        if self.slots[..self.len].contains(&identity) {
            return Err(AbortReason::Cycle);
        }
        if self.len == FAST_PATH_ANCESTORS {
            return Err(AbortReason::TooDeep);
        }
        self.slots[self.len] = identity;
        self.len += 1;
        Ok(())
    }

    pub fn exit(&mut self) {
        debug_assert!(self.len > 0, "LoopGuard::exit without enter");
        self.len = self.len.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.len
    }
}

/// Growable ancestor chain for the slow path.
#[derive(Debug)]
pub struct CycleTracker {
    /// Identity -> index into `path`.
    visited: HashMap<usize, usize>,
    /// From the root: (key the node was reached by, identity, is_array).
    path: Vec<(String, usize, bool)>,
    max_depth: usize,
}

impl CycleTracker {
    pub fn new(max_depth: usize) -> Self {
        CycleTracker {
            visited: HashMap::new(),
            path: Vec::new(),
            max_depth,
        }
    }

    /// Enter a container reached through `key`.
    pub fn enter(&mut self, key: &str, identity: usize, is_array: bool) -> Result<()> {
        if let Some(&cycle_start) = self.visited.get(&identity) {
            return Err(StringifyError::Circular {
                message: self.format_circular(key, cycle_start),
            });
        }
        if self.path.len() >= self.max_depth {
            return Err(StringifyError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        self.visited.insert(identity, self.path.len());
        self.path.push((key.to_string(), identity, is_array));
        Ok(())
    }

    pub fn exit(&mut self) {
        if let Some((_, identity, _)) = self.path.pop() {
            self.visited.remove(&identity);
        }
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    fn format_circular(&self, closing_key: &str, cycle_start: usize) -> String {
        let mut msg = String::from("Converting circular structure to JSON");
        let constructor = |is_array: bool| if is_array { "Array" } else { "Object" };

        let (start_key, _, start_is_array) = &self.path[cycle_start];
        if cycle_start == 0 {
            msg.push_str(&format!(
                "\n    --> starting at object with constructor '{}'",
                constructor(*start_is_array)
            ));
        } else {
            msg.push_str(&format!(
                "\n    --> starting at object with constructor '{}' (property '{}')",
                constructor(*start_is_array),
                start_key
            ));
        }
        for (key, _, is_array) in &self.path[cycle_start + 1..] {
            msg.push_str(&format!(
                "\n    |     property '{}' -> object with constructor '{}'",
                key,
                constructor(*is_array)
            ));
        }
        msg.push_str(&format!(
            "\n    --- property '{}' closes the circle",
            closing_key
        ));
        msg
    }
}
