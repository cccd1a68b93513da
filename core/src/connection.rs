//! One TCP connection carrying exactly one request/response cycle.
//!
//! # Framing
//! The reply is read until the peer closes the connection. No
//! `Content-Length` or chunked framing is applied on the read side, so a
//! server that keeps the connection open after responding blocks
//! `receive_all` indefinitely. There is no timeout.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

use crate::endpoint::Endpoint;
use crate::error::ClientError;

/// Bytes requested from the socket per read.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// An open connection to an `Endpoint`.
///
/// `receive_all` and `close` consume the connection, so a second cycle on the
/// same socket cannot be expressed. Dropping it also closes the socket.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    authority: String,
    chunk_size: usize,
}

impl Connection {
    /// Resolve `endpoint` and connect to the first address that accepts.
    pub fn open(endpoint: &Endpoint) -> Result<Self, ClientError> {
        let authority = endpoint.authority();
        let stream = TcpStream::connect(authority.as_str()).map_err(|source| ClientError::Connect {
            authority: authority.clone(),
            source,
        })?;
        log::debug!("connected to {authority}");
        Ok(Self {
            stream,
            authority,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Read size used by `receive_all`. Zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Write the whole request, then shut down the write half so the peer
    /// sees end of input.
    pub fn transmit(&mut self, bytes: &[u8]) -> Result<(), ClientError> {
        self.stream.write_all(bytes)?;
        self.stream.flush()?;
        self.stream.shutdown(Shutdown::Write)?;
        log::debug!("sent {} bytes to {}", bytes.len(), self.authority);
        Ok(())
    }

    /// Read until the peer closes, then close the socket.
    ///
    /// Only a zero-length read ends the loop; interrupted reads are retried.
    pub fn receive_all(mut self) -> Result<Vec<u8>, ClientError> {
        let mut buffer = Vec::new();
        let mut chunk = vec![0u8; self.chunk_size];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    log::trace!("read {n} bytes from {}", self.authority);
                    buffer.extend_from_slice(&chunk[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.close();
                    return Err(e.into());
                }
            }
        }
        log::debug!("received {} bytes from {}", buffer.len(), self.authority);
        self.close();
        Ok(buffer)
    }

    /// Tear the socket down without reading the reply.
    pub fn close(self) {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotConnected => {}
            Err(e) => log::debug!("shutdown of {} failed: {e}", self.authority),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    fn local_endpoint(listener: &TcpListener) -> Endpoint {
        let port = listener.local_addr().unwrap().port();
        Endpoint::parse(&format!("http://127.0.0.1:{port}/")).unwrap()
    }

    #[test]
    fn transmit_half_closes_and_receive_reads_until_eof() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = local_endpoint(&listener);

        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            socket.read_to_end(&mut request).unwrap();
            for part in [&b"first "[..], &b"second "[..], &b"third"[..]] {
                socket.write_all(part).unwrap();
                socket.flush().unwrap();
                thread::sleep(Duration::from_millis(20));
            }
            request
        });

        let mut conn = Connection::open(&endpoint).unwrap().with_chunk_size(4);
        conn.transmit(b"ping").unwrap();
        let reply = conn.receive_all().unwrap();

        assert_eq!(reply, b"first second third");
        assert_eq!(server.join().unwrap(), b"ping");
    }

    #[test]
    fn peer_closing_without_reply_yields_empty_buffer() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = local_endpoint(&listener);

        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            socket.read_to_end(&mut request).unwrap();
        });

        let mut conn = Connection::open(&endpoint).unwrap();
        conn.transmit(b"").unwrap();
        assert!(conn.receive_all().unwrap().is_empty());
        server.join().unwrap();
    }

    #[test]
    fn refused_connection_is_a_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = local_endpoint(&listener);
        drop(listener);

        let err = Connection::open(&endpoint).unwrap_err();
        assert!(err.is_connect(), "{err}");
    }

    #[test]
    fn close_after_open_is_quiet() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = local_endpoint(&listener);
        let conn = Connection::open(&endpoint).unwrap();
        conn.close();
        let (mut socket, _) = listener.accept().unwrap();
        let mut rest = Vec::new();
        socket.read_to_end(&mut rest).unwrap();
        assert!(rest.is_empty());
    }
}
