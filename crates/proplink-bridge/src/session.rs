use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use proplink_command::Command;
use proplink_directory::{HEARTBEAT, RELOAD_NOTICE};
use proplink_frame::{FrameConfig, FrameError, FrameReader, FrameWriter};
use proplink_transport::{LinkStream, TcpServer};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::route::Inbound;
use crate::table::{PropertyTable, PropertyUpdate};

/// Keep-alive cadence (the reference peer's timer interval).
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// A property table shared between concurrent sessions.
pub type SharedTable = Arc<Mutex<PropertyTable>>;

/// Server side of one accepted connection.
///
/// Owns its own framing state — sessions never share decoders, so a
/// corrupt stream on one connection cannot desynchronize another.
pub struct BridgeSession {
    id: String,
    reader: FrameReader<LinkStream>,
    writer: FrameWriter<LinkStream>,
}

impl BridgeSession {
    /// Accept the next connection on `server`.
    pub fn accept(server: &TcpServer, id: impl Into<String>, config: &FrameConfig) -> Result<Self> {
        let stream = server.accept()?;
        Self::from_stream(stream, id, config)
    }

    /// Build a session from an already connected stream.
    pub fn from_stream(
        stream: LinkStream,
        id: impl Into<String>,
        config: &FrameConfig,
    ) -> Result<Self> {
        let reader_stream = stream.try_clone()?;
        let reader = FrameReader::with_config_link(reader_stream, config.clone())?;
        let writer = FrameWriter::with_config_link(stream, config.clone())?;
        Ok(Self {
            id: id.into(),
            reader,
            writer,
        })
    }

    /// Session identifier for diagnostics.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Read and classify the next frame (blocking).
    pub fn next_inbound(&mut self) -> Result<Inbound> {
        let frame = self.reader.read_frame()?;
        Ok(Inbound::classify(frame))
    }

    /// Dispatch one command frame against the table.
    ///
    /// Malformed commands and commands the table rejects are logged and
    /// dropped — the session keeps serving. A corrupt command frame
    /// means version mismatch or corruption on the peer's side; hanging
    /// up would not fix either.
    pub fn handle_command(
        &mut self,
        frame: &[u8],
        table: &mut PropertyTable,
    ) -> Result<Option<PropertyUpdate>> {
        let command = match Command::decode(frame) {
            Ok(command) => command,
            Err(err) => {
                warn!(session = %self.id, %err, "dropping malformed command frame");
                return Ok(None);
            }
        };

        match command {
            Command::GetPropertyList => {
                self.send_listing(table)?;
                Ok(None)
            }
            set => match table.apply(set) {
                Ok(update) => {
                    debug!(
                        session = %self.id,
                        property = %update.name,
                        value = %update.value,
                        "property updated"
                    );
                    Ok(Some(update))
                }
                Err(err) => {
                    warn!(session = %self.id, %err, "dropping command");
                    Ok(None)
                }
            },
        }
    }

    /// Send the table's directory listing.
    pub fn send_listing(&mut self, table: &PropertyTable) -> Result<()> {
        let payload = table.listing_payload()?;
        self.writer.send(&payload)?;
        Ok(())
    }

    /// Send a keep-alive frame.
    pub fn send_heartbeat(&mut self) -> Result<()> {
        self.writer.send(&HEARTBEAT)?;
        Ok(())
    }

    /// Notify the peer that the hosted property source was reloaded.
    pub fn send_reload_notice(&mut self) -> Result<()> {
        self.writer.send(RELOAD_NOTICE)?;
        Ok(())
    }

    /// Serve until the peer disconnects or `running` clears.
    ///
    /// Heartbeats are emitted between reads. The configured read
    /// timeout is the tick — choose one no longer than
    /// `heartbeat_interval` or an idle line will not tick.
    pub fn serve(
        &mut self,
        table: &SharedTable,
        running: &AtomicBool,
        heartbeat_interval: Duration,
    ) -> Result<()> {
        let mut last_heartbeat = Instant::now();

        while running.load(Ordering::SeqCst) {
            match self.reader.read_frame() {
                Ok(frame) => match Inbound::classify(frame) {
                    Inbound::Command(payload) => {
                        let mut table = table
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner());
                        self.handle_command(&payload, &mut table)?;
                    }
                    other => {
                        debug!(session = %self.id, ?other, "ignoring non-command frame");
                    }
                },
                Err(FrameError::Io(err)) if is_timeout(&err) => {}
                Err(FrameError::ConnectionClosed) => {
                    info!(session = %self.id, "peer disconnected");
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            }

            if last_heartbeat.elapsed() >= heartbeat_interval {
                self.send_heartbeat()?;
                last_heartbeat = Instant::now();
            }
        }
        Ok(())
    }
}

pub(crate) fn is_timeout(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

#[cfg(test)]
mod tests {
    use proplink_directory::{PropertyDirectory, PropertyValue};
    use proplink_frame::{FrameReader, FrameWriter};
    use proplink_transport::TcpServer;

    use super::*;

    fn sample_table() -> PropertyTable {
        let mut table = PropertyTable::new();
        table.host("rpm", PropertyValue::Int(0)).unwrap();
        table.host("alarm", PropertyValue::Bool(false)).unwrap();
        table
    }

    #[test]
    fn get_property_list_replies_with_listing() {
        let server = TcpServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr();

        let client = std::thread::spawn(move || {
            let stream = TcpServer::connect(addr).unwrap();
            let reader_stream = stream.try_clone().unwrap();
            let mut writer = FrameWriter::new(stream);
            let mut reader = FrameReader::new(reader_stream);

            writer.send(&Command::GetPropertyList.encode()).unwrap();
            let frame = reader.read_frame().unwrap();
            PropertyDirectory::parse_listing(&frame).unwrap()
        });

        let mut session =
            BridgeSession::accept(&server, "s-1", &FrameConfig::default()).unwrap();
        let mut table = sample_table();

        match session.next_inbound().unwrap() {
            Inbound::Command(payload) => {
                let update = session.handle_command(&payload, &mut table).unwrap();
                assert!(update.is_none());
            }
            other => panic!("expected command frame, got {other:?}"),
        }

        let directory = client.join().unwrap();
        assert_eq!(directory.len(), 2);
        assert!(directory.get("rpm").is_some());
    }

    #[test]
    fn set_command_updates_table() {
        let server = TcpServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr();

        let client = std::thread::spawn(move || {
            let stream = TcpServer::connect(addr).unwrap();
            let mut writer = FrameWriter::new(stream);
            writer
                .send(&Command::set_int(0, 3200).unwrap().encode())
                .unwrap();
        });

        let mut session =
            BridgeSession::accept(&server, "s-1", &FrameConfig::default()).unwrap();
        let mut table = sample_table();

        match session.next_inbound().unwrap() {
            Inbound::Command(payload) => {
                let update = session.handle_command(&payload, &mut table).unwrap();
                assert_eq!(update.unwrap().name, "rpm");
            }
            other => panic!("expected command frame, got {other:?}"),
        }

        assert_eq!(table.get("rpm"), Some(PropertyValue::Int(3200)));
        client.join().unwrap();
    }

    #[test]
    fn malformed_command_does_not_kill_the_session() {
        let server = TcpServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr();

        let client = std::thread::spawn(move || {
            let stream = TcpServer::connect(addr).unwrap();
            let mut writer = FrameWriter::new(stream);
            // Unknown kind byte, then a valid set.
            writer.send(&[0x07, 0x00]).unwrap();
            writer.send(&Command::set_bool(1, true).encode()).unwrap();
        });

        let mut session =
            BridgeSession::accept(&server, "s-1", &FrameConfig::default()).unwrap();
        let mut table = sample_table();

        for _ in 0..2 {
            match session.next_inbound().unwrap() {
                Inbound::Command(payload) => {
                    session.handle_command(&payload, &mut table).unwrap();
                }
                other => panic!("expected command frame, got {other:?}"),
            }
        }

        assert_eq!(table.get("alarm"), Some(PropertyValue::Bool(true)));
        client.join().unwrap();
    }

    #[test]
    fn serve_emits_heartbeats_and_applies_sets() {
        let server = TcpServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr();

        let table: SharedTable = Arc::new(Mutex::new(sample_table()));
        let running = Arc::new(AtomicBool::new(true));

        let server_table = Arc::clone(&table);
        let server_running = Arc::clone(&running);
        let server_thread = std::thread::spawn(move || {
            let config = FrameConfig {
                read_timeout: Some(Duration::from_millis(10)),
                ..FrameConfig::default()
            };
            let mut session = BridgeSession::accept(&server, "s-1", &config).unwrap();
            session
                .serve(
                    &server_table,
                    &server_running,
                    Duration::from_millis(30),
                )
                .unwrap();
        });

        let stream = TcpServer::connect(addr).unwrap();
        let reader_stream = stream.try_clone().unwrap();
        let mut writer = FrameWriter::new(stream);
        let mut reader = FrameReader::new(reader_stream);

        writer
            .send(&Command::set_int(0, 999).unwrap().encode())
            .unwrap();

        // The serve loop must keep ticking heartbeats while idle.
        let frame = reader.read_frame().unwrap();
        assert_eq!(Inbound::classify(frame), Inbound::Heartbeat);

        running.store(false, Ordering::SeqCst);
        server_thread.join().unwrap();

        let table = table.lock().unwrap();
        assert_eq!(table.get("rpm"), Some(PropertyValue::Int(999)));
    }

    #[test]
    fn reload_notice_reaches_the_peer() {
        let server = TcpServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr();

        let client = std::thread::spawn(move || {
            let stream = TcpServer::connect(addr).unwrap();
            let mut reader = FrameReader::new(stream);
            Inbound::classify(reader.read_frame().unwrap())
        });

        let mut session =
            BridgeSession::accept(&server, "s-1", &FrameConfig::default()).unwrap();
        session.send_reload_notice().unwrap();

        assert_eq!(client.join().unwrap(), Inbound::Reload);
    }

    #[test]
    fn serve_returns_cleanly_on_disconnect() {
        let server = TcpServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr();

        let client = std::thread::spawn(move || {
            let stream = TcpServer::connect(addr).unwrap();
            drop(stream);
        });

        let table: SharedTable = Arc::new(Mutex::new(sample_table()));
        let running = AtomicBool::new(true);
        let config = FrameConfig {
            read_timeout: Some(Duration::from_millis(10)),
            ..FrameConfig::default()
        };
        let mut session = BridgeSession::accept(&server, "s-1", &config).unwrap();
        session
            .serve(&table, &running, HEARTBEAT_INTERVAL)
            .unwrap();

        client.join().unwrap();
    }
}
