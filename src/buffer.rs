/// Cursor over a chunk of input bytes.
pub(crate) struct BytesReader<'a> {
    buf: &'a [u8],
    idx: usize,
}

impl<'a> BytesReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, idx: 0 }
    }

    pub fn next(&mut self) -> Option<u8> {
        let val = *self.buf.get(self.idx)?;
        self.idx += 1;
        Some(val)
    }

    /// Bytes not consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.idx..]
    }
}

/// Fixed-capacity byte buffer, filled in arrival order.
pub(crate) struct Buf<const C: usize> {
    buf: [u8; C],
    len: usize,
}

impl<const C: usize> Buf<C> {
    pub const fn new() -> Self {
        Self {
            buf: [0; C],
            len: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.len == C
    }

    /// Appends a byte, returns `false` when the buffer is already full.
    pub fn push(&mut self, c: u8) -> bool {
        if let Some(v) = self.buf.get_mut(self.len) {
            *v = c;
            self.len += 1;
            true
        } else {
            false
        }
    }

    /// The collected bytes, once all `C` of them have been pushed.
    pub fn full(&self) -> Option<&[u8; C]> {
        self.is_full().then_some(&self.buf)
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}
