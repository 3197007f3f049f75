//! Fixed-size rechunking of upstream body frames.
//!
//! HTTP body frames arrive in whatever sizes the network produces. The
//! client expects messages of exactly `chunk_size` bytes, with only the
//! last message of a stream allowed to be shorter.

use bytes::{Bytes, BytesMut};

/// Accumulates body frames and hands out full chunks.
#[derive(Debug)]
pub struct ChunkBuffer {
    chunk_size: usize,
    pending: BytesMut,
}

impl ChunkBuffer {
    /// Create a buffer emitting chunks of `chunk_size` bytes.
    ///
    /// A zero size is rejected by config validation; it is clamped to 1 here.
    pub fn new(chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            pending: BytesMut::with_capacity(chunk_size),
        }
    }

    /// Configured chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Bytes held back waiting for a full chunk.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Append a body frame.
    pub fn push(&mut self, frame: &[u8]) {
        self.pending.extend_from_slice(frame);
    }

    /// Take the next full chunk, if one is available.
    pub fn next_chunk(&mut self) -> Option<Bytes> {
        if self.pending.len() >= self.chunk_size {
            Some(self.pending.split_to(self.chunk_size).freeze())
        } else {
            None
        }
    }

    /// Take whatever remains once the body is exhausted.
    pub fn finish(&mut self) -> Option<Bytes> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.split().freeze())
        }
    }
}
