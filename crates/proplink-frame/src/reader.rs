use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use bytes::Bytes;
use proplink_transport::LinkStream;

use crate::codec::FrameConfig;
use crate::decoder::SlipDecoder;
use crate::error::{FrameError, Result};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete
/// payloads, however the transport chunks them. Frames are returned in
/// the order their terminators appear on the wire.
pub struct FrameReader<T> {
    inner: T,
    decoder: SlipDecoder,
    ready: VecDeque<Bytes>,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            decoder: SlipDecoder::with_max_frame_size(config.max_frame_size),
            ready: VecDeque::new(),
            config,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        loop {
            if let Some(frame) = self.ready.pop_front() {
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            let ready = &mut self.ready;
            self.decoder
                .feed_with(&chunk[..read], |frame| ready.push_back(frame));
        }
    }

    /// Drop any partially accumulated frame and queued complete frames.
    pub fn reset(&mut self) {
        self.decoder.reset();
        self.ready.clear();
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameReader<LinkStream> {
    /// Create a frame reader for [`LinkStream`] and apply the read
    /// timeout from config.
    pub fn with_config_link(inner: LinkStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}

fn transport_to_frame_error(err: proplink_transport::TransportError) -> FrameError {
    match err {
        proplink_transport::TransportError::Io(io)
        | proplink_transport::TransportError::Accept(io) => FrameError::Io(io),
        proplink_transport::TransportError::Bind { source, .. }
        | proplink_transport::TransportError::Connect { source, .. } => FrameError::Io(source),
    }
}
