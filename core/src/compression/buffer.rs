//! compression/buffer.rs
//! Fixed-capacity byte buffer with a readable window and a writable tail.
//!
//! Layout: `[consumed | pending (start..end) | spare (end..cap)]`.
//! Consumed bytes are reclaimed by sliding the pending window to the front.

#[derive(Debug)]
pub struct StreamBuffer {
    buf: Box<[u8]>,
    start: usize,
    end: usize,
}

impl StreamBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "stream buffer capacity must be non-zero");
        Self { buf: vec![0u8; capacity].into_boxed_slice(), start: 0, end: 0 }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes written but not yet consumed.
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.buf[self.start..self.end]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// No room left even after compaction.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Room available for new bytes once consumed space is reclaimed.
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Mark `n` pending bytes as consumed.
    pub fn consume(&mut self, n: usize) {
        assert!(n <= self.len(), "consume {} > pending {}", n, self.len());
        self.start += n;
        if self.start == self.end {
            self.start = 0;
            self.end = 0;
        }
    }

    /// Writable tail, compacting first so all available room is contiguous.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        self.compact();
        &mut self.buf[self.end..]
    }

    /// Mark `n` bytes of the spare tail as written.
    pub fn commit(&mut self, n: usize) {
        assert!(self.end + n <= self.capacity(), "commit past capacity");
        self.end += n;
    }

    /// Copy as much of `src` as fits; returns the number of bytes taken.
    pub fn fill_from(&mut self, src: &[u8]) -> usize {
        let spare = self.spare_mut();
        let n = spare.len().min(src.len());
        spare[..n].copy_from_slice(&src[..n]);
        self.commit(n);
        n
    }

    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
    }

    fn compact(&mut self) {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_consume_and_compact() {
        let mut b = StreamBuffer::with_capacity(8);
        assert_eq!(b.fill_from(b"abcdefghij"), 8);
        assert!(b.is_full());

        b.consume(3);
        assert_eq!(b.pending(), b"defgh");
        assert_eq!(b.available(), 3);

        assert_eq!(b.fill_from(b"xyz!"), 3);
        assert_eq!(b.pending(), b"defghxyz");

        b.consume(8);
        assert!(b.is_empty());
        assert_eq!(b.spare_mut().len(), 8);
    }
}
