//! Cursor-relative insertion into the content buffer.
//!
//! Offsets count characters, not bytes. Offsets past the end clamp to the
//! end and a reversed selection is read front to back. The buffer is never
//! parsed; fragments are spliced in as text.

use crate::content::Fragment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentBuffer {
    text: String,
}

impl ContentBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    fn byte_offset(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn byte_range(&self, selection: Selection) -> std::ops::Range<usize> {
        let selection = Selection::new(selection.start, selection.end);
        self.byte_offset(selection.start)..self.byte_offset(selection.end)
    }

    /// The selected text.
    pub fn selected(&self, selection: Selection) -> &str {
        &self.text[self.byte_range(selection)]
    }

    fn splice(&self, range: std::ops::Range<usize>, insert: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + insert.len());
        out.push_str(&self.text[..range.start]);
        out.push_str(insert);
        out.push_str(&self.text[range.end..]);
        out
    }

    /// Insert `fragment` at `caret`. Block fragments are surrounded by
    /// newlines so they do not run into adjacent prose.
    pub fn insert(&mut self, caret: usize, fragment: &Fragment) {
        let at = self.byte_offset(caret);
        self.text = if fragment.is_block() {
            self.splice(at..at, &format!("\n{}\n", fragment.html))
        } else {
            self.splice(at..at, &fragment.html)
        };
    }

    /// Replace the selected range with `fragment`.
    pub fn replace(&mut self, selection: Selection, fragment: &Fragment) {
        let range = self.byte_range(selection);
        self.text = self.splice(range, &fragment.html);
    }
}

impl std::fmt::Display for ContentBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
