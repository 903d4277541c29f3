//! Open-tag stack used to validate table nesting.

use crate::token::TagName;

/// Last-in-first-out stack of currently open structural tags.
///
/// `Vec<TagName>` is the production implementation; tests substitute
/// scripted stacks to drive the extractor into states that well-formed
/// markup cannot reach.
pub trait TagStack {
    fn push(&mut self, tag: TagName);

    fn pop(&mut self) -> Option<TagName>;

    fn len(&self) -> usize;

    /// Most recently pushed tag, without removing it.
    fn peek(&self) -> Option<&TagName>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TagStack for Vec<TagName> {
    fn push(&mut self, tag: TagName) {
        Vec::push(self, tag);
    }

    fn pop(&mut self) -> Option<TagName> {
        Vec::pop(self)
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn peek(&self) -> Option<&TagName> {
        self.last()
    }
}
