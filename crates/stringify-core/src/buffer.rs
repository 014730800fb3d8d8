//! Append-only output accumulator.
//!
//! Each encoder attempt owns exactly one buffer. An aborted fast-path attempt
//! hands its buffer to [`OutputBuffer::discard`]; nothing written to it is
//! reachable afterwards.

use crate::number::write_number;
use crate::quote::write_quoted;

#[derive(Debug, Default)]
pub struct OutputBuffer {
    text: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        OutputBuffer {
            text: String::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    pub fn push_number(&mut self, n: f64) {
        write_number(n, &mut self.text);
    }

    pub fn push_quoted(&mut self, s: &str) {
        write_quoted(s, &mut self.text);
    }

    /// Newline followed by `depth` copies of `gap`.
    pub fn push_newline_indent(&mut self, gap: &str, depth: usize) {
        self.text.push('\n');
        for _ in 0..depth {
            self.text.push_str(gap);
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text written so far.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the buffer, yielding its text.
    pub fn finish(self) -> String {
        self.text
    }

    /// Consume the buffer and drop its contents.
    pub fn discard(self) {
        drop(self.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_tokens() {
        let mut buf = OutputBuffer::new();
        buf.push('[');
        buf.push_number(1.5);
        buf.push(',');
        buf.push_quoted("x");
        buf.push(']');
        assert_eq!(buf.len(), 9);
        assert_eq!(buf.finish(), r#"[1.5,"x"]"#);
    }

    #[test]
    fn indent() {
        let mut buf = OutputBuffer::new();
        buf.push('{');
        buf.push_newline_indent("  ", 2);
        assert_eq!(buf.as_str(), "{\n    ");
    }
}
