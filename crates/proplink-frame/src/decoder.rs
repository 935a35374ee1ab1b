use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::codec::{
    DEFAULT_MAX_FRAME_SIZE, ESCAPE, ESCAPED_END, ESCAPED_ESCAPE, FRAME_END,
};

/// Incremental frame decoder.
///
/// Consumes the wire stream one byte at a time and reassembles payloads.
/// Escape state is carried across calls, so a terminator or escape pair
/// split between two deliveries decodes exactly as it would in one.
///
/// One long-lived instance per connection. Feeding a single decoder from
/// multiple threads is not supported; independent decoders share nothing
/// and may run in parallel.
///
/// Recovery rules:
/// - An escape introducer followed by anything other than the two
///   defined substitutes discards the whole partial frame; decoding
///   resumes in the normal state, so the next terminator restores
///   synchronization.
/// - A terminator with nothing accumulated is idle-line filler and is
///   ignored.
/// - A frame that outgrows `max_frame_size` is dropped, and everything
///   up to (and including) the next terminator is discarded with it.
#[derive(Debug)]
pub struct SlipDecoder {
    buf: BytesMut,
    escaped: bool,
    overflowed: bool,
    max_frame_size: usize,
}

impl SlipDecoder {
    /// Create a decoder with the default maximum frame size.
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Create a decoder with an explicit maximum frame size.
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            escaped: false,
            overflowed: false,
            max_frame_size,
        }
    }

    /// Consume one byte; returns the completed frame if this byte
    /// terminated one.
    pub fn feed(&mut self, byte: u8) -> Option<Bytes> {
        if self.escaped {
            self.escaped = false;
            match byte {
                ESCAPED_END => self.accumulate(FRAME_END),
                ESCAPED_ESCAPE => self.accumulate(ESCAPE),
                other => {
                    // Malformed escape: drop the partial frame, keep the
                    // stream position. The next terminator resyncs.
                    debug!(byte = other, "malformed escape sequence, dropping partial frame");
                    self.buf.clear();
                }
            }
            return None;
        }

        match byte {
            FRAME_END => {
                let overflowed = std::mem::take(&mut self.overflowed);
                if overflowed {
                    self.buf.clear();
                    None
                } else if self.buf.is_empty() {
                    // Idle-line filler between frames.
                    None
                } else {
                    Some(self.buf.split().freeze())
                }
            }
            // While discarding an overflowed run, an escape introducer is
            // dropped like any other byte; entering the escape state there
            // would let a malformed pair swallow the resyncing terminator.
            ESCAPE if !self.overflowed => {
                self.escaped = true;
                None
            }
            other => {
                self.accumulate(other);
                None
            }
        }
    }

    /// Consume a chunk, invoking `on_frame` for each completed frame in
    /// the order their terminators appear.
    pub fn feed_with(&mut self, data: &[u8], mut on_frame: impl FnMut(Bytes)) {
        for &byte in data {
            if let Some(frame) = self.feed(byte) {
                on_frame(frame);
            }
        }
    }

    /// Consume a chunk, collecting completed frames.
    pub fn feed_slice(&mut self, data: &[u8]) -> Vec<Bytes> {
        let mut frames = Vec::new();
        self.feed_with(data, |frame| frames.push(frame));
        frames
    }

    /// Clear all state back to a freshly constructed decoder.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.escaped = false;
        self.overflowed = false;
    }

    /// Number of bytes accumulated toward the in-progress frame.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    /// True when the last consumed byte was an escape introducer.
    pub fn is_escaping(&self) -> bool {
        self.escaped
    }

    fn accumulate(&mut self, byte: u8) {
        if self.overflowed {
            return;
        }
        if self.buf.len() >= self.max_frame_size {
            debug!(
                max = self.max_frame_size,
                "frame exceeds maximum size, dropping until next terminator"
            );
            self.buf.clear();
            self.overflowed = true;
            return;
        }
        self.buf.put_u8(byte);
    }
}

impl Default for SlipDecoder {
    fn default() -> Self {
        Self::new()
    }
}
