use std::ops::Deref;
use std::sync::Arc;

/// An immutable window onto a shared buffer of code points.
///
/// Splitting a chunk never copies: both halves keep the same buffer and narrow the window.
#[derive(Clone)]
pub(crate) struct Chunk {
    buf: Arc<[char]>,
    start: usize,
    end: usize,
}

impl Chunk {
    pub(crate) fn empty() -> Self {
        Self { buf: Arc::from(Vec::<char>::new()), start: 0, end: 0 }
    }

    pub(crate) fn from_chars(chars: Vec<char>) -> Self {
        let end = chars.len();
        Self { buf: Arc::from(chars), start: 0, end }
    }

    pub(crate) fn len(&self) -> usize {
        self.end - self.start
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub(crate) fn as_slice(&self) -> &[char] {
        &self.buf[self.start..self.end]
    }

    /// Sub-window `[from, to)` relative to this chunk.
    pub(crate) fn window(&self, from: usize, to: usize) -> Self {
        debug_assert!(from <= to && to <= self.len());
        Self { buf: self.buf.clone(), start: self.start + from, end: self.start + to }
    }

    pub(crate) fn split_at(&self, offset: usize) -> (Self, Self) {
        (self.window(0, offset), self.window(offset, self.len()))
    }

    /// Breaks the chunk into `ceil(len / max)` windows of near-equal size.
    pub(crate) fn split_even(&self, max: usize) -> Vec<Self> {
        let len = self.len();
        if len <= max {
            return vec![self.clone()];
        }

        let pieces = len.div_ceil(max);
        let (base, extra) = (len / pieces, len % pieces);

        let mut out = Vec::with_capacity(pieces);
        let mut from = 0;
        for i in 0..pieces {
            let to = from + base + usize::from(i < extra);
            out.push(self.window(from, to));
            from = to;
        }

        out
    }
}

impl Deref for Chunk {
    type Target = [char];

    fn deref(&self) -> &[char] {
        self.as_slice()
    }
}
