use std::net::{SocketAddr, TcpListener, ToSocketAddrs};

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::LinkStream;

/// TCP server transport.
///
/// Binds a listening socket and accepts one [`LinkStream`] per client.
/// Every accepted stream gets `TCP_NODELAY` — command frames are a
/// handful of bytes and must not sit in Nagle's buffer.
pub struct TcpServer {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl TcpServer {
    /// Bind and listen on a TCP address.
    pub fn bind(addr: impl ToSocketAddrs + std::fmt::Debug) -> Result<Self> {
        let listener = TcpListener::bind(&addr).map_err(|e| TransportError::Bind {
            addr: format!("{addr:?}"),
            source: e,
        })?;
        let local_addr = listener.local_addr()?;

        info!(%local_addr, "listening on tcp socket");

        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Accept an incoming connection (blocking).
    pub fn accept(&self) -> Result<LinkStream> {
        let (stream, peer) = self.listener.accept().map_err(TransportError::Accept)?;
        stream.set_nodelay(true).map_err(TransportError::Accept)?;
        debug!(%peer, "accepted connection");
        Ok(LinkStream::from_tcp(stream))
    }

    /// Connect to a listening bridge (blocking).
    pub fn connect(addr: impl ToSocketAddrs + std::fmt::Debug) -> Result<LinkStream> {
        let stream =
            std::net::TcpStream::connect(&addr).map_err(|e| TransportError::Connect {
                addr: format!("{addr:?}"),
                source: e,
            })?;
        stream.set_nodelay(true)?;
        debug!(?addr, "connected to tcp socket");
        Ok(LinkStream::from_tcp(stream))
    }

    /// The address this server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        "tcp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn bind_accept_connect() {
        let server = TcpServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr();

        let handle = std::thread::spawn(move || {
            let mut client = TcpServer::connect(addr).unwrap();
            client.write_all(b"hello").unwrap();
        });

        let mut accepted = server.accept().unwrap();
        let mut buf = [0u8; 5];
        accepted.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"hello");

        handle.join().unwrap();
    }

    #[test]
    fn connect_refused_reports_address() {
        // Port 1 on loopback is never listening in the test environment.
        let err = TcpServer::connect("127.0.0.1:1").unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
        assert!(err.to_string().contains("127.0.0.1"));
    }

    #[test]
    fn try_clone_gives_independent_handles() {
        let server = TcpServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr();

        let handle = std::thread::spawn(move || {
            let client = TcpServer::connect(addr).unwrap();
            let mut reader = client.try_clone().unwrap();
            let mut writer = client;
            writer.write_all(b"ping").unwrap();
            let mut buf = [0u8; 4];
            reader.read_exact(&mut buf).unwrap();
            buf
        });

        let mut accepted = server.accept().unwrap();
        let mut buf = [0u8; 4];
        accepted.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");
        accepted.write_all(b"pong").unwrap();

        assert_eq!(&handle.join().unwrap(), b"pong");
    }

    #[test]
    fn read_timeout_applies() {
        let server = TcpServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr();

        let _client = TcpServer::connect(addr).unwrap();
        let accepted = server.accept().unwrap();
        accepted
            .set_read_timeout(Some(std::time::Duration::from_millis(20)))
            .unwrap();

        let mut accepted = accepted;
        let mut buf = [0u8; 1];
        let err = accepted.read(&mut buf).unwrap_err();
        assert!(matches!(
            err.kind(),
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
        ));
    }
}
