//! Bounded contiguous stream buffer.
//!
//! A single owned byte region with a read cursor (`head`) and write cursor
//! (`tail`). Bytes in `[head, tail)` are unread input; appending past the end
//! of the region first compacts (when the unread content plus the new bytes
//! fit) and otherwise grows, capped at `max_buffer_size`.
use alloc::vec::Vec;

use crate::error::DecodeError;

#[derive(Debug)]
pub(crate) struct StreamBuffer {
    buf: Vec<u8>,
    head: usize,
    tail: usize,
    max_buffer_size: usize,
}

impl StreamBuffer {
    pub(crate) fn new(max_buffer_size: usize) -> Self {
        Self {
            buf: Vec::new(),
            head: 0,
            tail: 0,
            max_buffer_size,
        }
    }

    pub(crate) fn max_buffer_size(&self) -> usize {
        self.max_buffer_size
    }

    /// Unread byte count, `tail - head`.
    pub(crate) fn unread(&self) -> usize {
        self.tail - self.head
    }

    /// The unread input, `[head, tail)`.
    pub(crate) fn readable(&self) -> &[u8] {
        &self.buf[self.head..self.tail]
    }

    /// Moves `head` forward over `n` consumed bytes.
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.unread());
        self.head += n;
        if self.head == self.tail {
            self.head = 0;
            self.tail = 0;
        }
    }

    /// Appends `src` behind `tail`, compacting or growing as needed.
    ///
    /// Growth allocates the replacement region before the old one is
    /// touched, so an allocation failure leaves the buffer intact.
    pub(crate) fn append(&mut self, src: &[u8]) -> Result<(), DecodeError> {
        if src.is_empty() {
            return Ok(());
        }
        if self.tail + src.len() > self.buf.len() {
            let unread = self.unread();
            let required = unread + src.len();
            if required <= self.buf.len() {
                self.buf.copy_within(self.head..self.tail, 0);
            } else {
                if required > self.max_buffer_size {
                    return Err(DecodeError::BufferFull {
                        needed: required,
                        max_buffer_size: self.max_buffer_size,
                    });
                }
                let new_size = required.saturating_mul(2).min(self.max_buffer_size);
                let mut next = Vec::new();
                next.try_reserve_exact(new_size)
                    .map_err(|_| DecodeError::AllocationFailed)?;
                next.extend_from_slice(&self.buf[self.head..self.tail]);
                next.resize(new_size, 0);
                self.buf = next;
            }
            self.head = 0;
            self.tail = unread;
        }
        self.buf[self.tail..self.tail + src.len()].copy_from_slice(src);
        self.tail += src.len();
        Ok(())
    }

    /// Takes the unread input out of the buffer, leaving it empty.
    pub(crate) fn take_unread(&mut self) -> Vec<u8> {
        let out = self.readable().to_vec();
        self.head = 0;
        self.tail = 0;
        out
    }

    #[cfg(test)]
    pub(crate) fn region_len(&self) -> usize {
        self.buf.len()
    }
}
