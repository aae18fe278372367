//! Reusable text accumulator for rendered frames

use std::ops::{Deref, DerefMut};

/// Text buffer owned by a single renderer
///
/// The buffer is only reachable through [`RenderBuffer::scope`], which clears
/// it on entry and again when the scope is dropped, so no frame's text ever
/// survives into the next render call regardless of how that call exits.
#[derive(Debug, Default)]
pub struct RenderBuffer {
    text: String,
    /// Length of the largest frame rendered so far
    last_len: usize,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the buffer for one render call
    pub fn scope(&mut self) -> BufferScope<'_> {
        self.text.clear();
        BufferScope { buffer: self }
    }

    /// Release capacity beyond the size of the last frame
    ///
    /// Called between animation frames to bound memory to one frame's text.
    pub fn truncate(&mut self) {
        self.text.clear();
        self.text.shrink_to(self.last_len);
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.text.capacity()
    }
}

/// Exclusive access to a [`RenderBuffer`] for the duration of one render
pub struct BufferScope<'a> {
    buffer: &'a mut RenderBuffer,
}

impl Deref for BufferScope<'_> {
    type Target = String;

    fn deref(&self) -> &String {
        &self.buffer.text
    }
}

impl DerefMut for BufferScope<'_> {
    fn deref_mut(&mut self) -> &mut String {
        &mut self.buffer.text
    }
}

impl Drop for BufferScope<'_> {
    fn drop(&mut self) {
        self.buffer.last_len = self.buffer.last_len.max(self.buffer.text.len());
        self.buffer.text.clear();
    }
}
