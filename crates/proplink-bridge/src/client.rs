use std::time::{Duration, Instant};

use proplink_command::Command;
use proplink_directory::{PropertyDirectory, PropertyValue};
use proplink_frame::{FrameConfig, FrameError, FrameReader, FrameWriter};
use proplink_transport::{LinkStream, TcpServer};
use tracing::{debug, info};

use crate::error::{BridgeError, Result};
use crate::route::Inbound;
use crate::session::is_timeout;

/// Client side of a bridge connection.
///
/// Discovers the peer's property directory, then addresses properties
/// by name; the wire only ever sees ids.
pub struct BridgeClient {
    reader: FrameReader<LinkStream>,
    writer: FrameWriter<LinkStream>,
    directory: Option<PropertyDirectory>,
}

impl BridgeClient {
    /// Connect to a listening bridge.
    pub fn connect(addr: impl std::net::ToSocketAddrs + std::fmt::Debug) -> Result<Self> {
        Self::connect_with_config(addr, FrameConfig::default())
    }

    /// Connect with explicit framing configuration.
    pub fn connect_with_config(
        addr: impl std::net::ToSocketAddrs + std::fmt::Debug,
        config: FrameConfig,
    ) -> Result<Self> {
        let stream = TcpServer::connect(addr)?;
        let reader_stream = stream.try_clone()?;
        let reader = FrameReader::with_config_link(reader_stream, config.clone())?;
        let writer = FrameWriter::with_config_link(stream, config)?;
        Ok(Self {
            reader,
            writer,
            directory: None,
        })
    }

    /// Send a directory request without waiting for the reply.
    pub fn request_listing(&mut self) -> Result<()> {
        self.writer.send(&Command::GetPropertyList.encode())?;
        Ok(())
    }

    /// Request the directory and wait for the listing reply.
    ///
    /// Heartbeats and reload notices arriving in between are skipped.
    pub fn fetch_directory(&mut self, timeout: Duration) -> Result<&PropertyDirectory> {
        self.request_listing()?;

        let deadline = Instant::now() + timeout;
        let fetched = self.await_listing(deadline, timeout);

        // Restore the configured timeout; awaiting used the deadline.
        self.reader
            .get_ref()
            .set_read_timeout(self.reader.config().read_timeout)?;

        let directory = fetched?;
        info!(properties = directory.len(), "property directory fetched");
        Ok(self.directory.insert(directory))
    }

    fn await_listing(
        &mut self,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<PropertyDirectory> {
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Err(BridgeError::ListingTimeout(timeout));
            }
            self.reader
                .get_ref()
                .set_read_timeout(Some(deadline - now))?;

            match self.reader.read_frame() {
                Ok(frame) => match Inbound::classify(frame) {
                    Inbound::Listing(payload) => {
                        return Ok(PropertyDirectory::parse_listing(&payload)?);
                    }
                    other => {
                        debug!(?other, "skipping frame while awaiting listing");
                    }
                },
                Err(FrameError::Io(err)) if is_timeout(&err) => {
                    return Err(BridgeError::ListingTimeout(timeout));
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// The directory from the last successful fetch.
    pub fn directory(&self) -> Option<&PropertyDirectory> {
        self.directory.as_ref()
    }

    /// Set a named property on the peer.
    ///
    /// Requires a fetched directory; the value's type must match the
    /// directory entry.
    pub fn set(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        let command = self
            .directory
            .as_ref()
            .ok_or(BridgeError::NoDirectory)?
            .set_command(name, value)?;
        self.send_command(&command)
    }

    /// Send an already constructed command.
    pub fn send_command(&mut self, command: &Command) -> Result<()> {
        self.writer.send(&command.encode())?;
        Ok(())
    }

    /// Read and classify the next bridge-originated frame (blocking).
    pub fn next_event(&mut self) -> Result<Inbound> {
        let frame = self.reader.read_frame()?;
        Ok(Inbound::classify(frame))
    }
}
