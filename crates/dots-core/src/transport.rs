//! Transport abstraction for the line-oriented client protocol.
//!
//! Decouples the client from any specific byte stream. A [`Connector`] opens
//! a [`Transport`] to a `(host, port)` pair, and the transport is then split
//! into independent read and write halves so the reader can run on its own
//! task while the caller keeps sending.

use std::future::Future;

use thiserror::Error;

/// Errors that can occur during transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The remote peer closed the connection.
    #[error("connection closed")]
    ConnectionClosed,

    /// A send was attempted without an open connection.
    #[error("not connected")]
    NotConnected,

    /// The operation did not finish within its deadline.
    #[error("timed out")]
    Timeout,

    /// The payload contains a line terminator and would split into several
    /// messages on the wire.
    #[error("payload must be a single line")]
    MultiLinePayload,

    /// An I/O or protocol-level error.
    #[error("{0}")]
    Io(String),
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::UnexpectedEof => TransportError::ConnectionClosed,
            std::io::ErrorKind::TimedOut => TransportError::Timeout,
            _ => TransportError::Io(e.to_string()),
        }
    }
}

/// Fail with [`TransportError::MultiLinePayload`] if `text` contains `\n`
/// or `\r`. Writers call this before putting anything on the wire.
pub fn ensure_single_line(text: &str) -> Result<(), TransportError> {
    if text.contains(['\n', '\r']) {
        return Err(TransportError::MultiLinePayload);
    }
    Ok(())
}

/// Read half of a transport connection.
///
/// Yields one text payload per call, without its line terminator.
pub trait TransportReader: Send + 'static {
    /// Receive the next payload.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(&mut self) -> impl Future<Output = Result<Option<String>, TransportError>> + Send;
}

/// Write half of a transport connection.
pub trait TransportWriter: Send + 'static {
    /// Send one text payload to the remote peer.
    fn send(&mut self, text: &str) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Close the write side. Further sends fail.
    fn close(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// A bidirectional transport that can be split into independent read and
/// write halves.
pub trait Transport: Send + 'static {
    /// The read half produced by [`split`](Transport::split).
    type Reader: TransportReader;
    /// The write half produced by [`split`](Transport::split).
    type Writer: TransportWriter;

    /// Split the transport into independent read and write halves.
    fn split(self) -> (Self::Reader, Self::Writer);
}

/// Opens transports to a remote endpoint.
pub trait Connector: Send + Sync + 'static {
    /// The transport produced by a successful [`open`](Connector::open).
    type Transport: Transport;

    /// Open a connection to `host:port`.
    fn open(
        &self,
        host: &str,
        port: u16,
    ) -> impl Future<Output = Result<Self::Transport, TransportError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_transport_kinds() {
        let closed = std::io::Error::from(std::io::ErrorKind::BrokenPipe);
        assert!(matches!(
            TransportError::from(closed),
            TransportError::ConnectionClosed
        ));

        let timeout = std::io::Error::from(std::io::ErrorKind::TimedOut);
        assert!(matches!(TransportError::from(timeout), TransportError::Timeout));

        let other = std::io::Error::other("boom");
        match TransportError::from(other) {
            TransportError::Io(msg) => assert_eq!(msg, "boom"),
            e => panic!("unexpected {e:?}"),
        }
    }

    #[test]
    fn line_terminators_are_not_single_line() {
        assert!(ensure_single_line("#move 1 1").is_ok());
        assert!(ensure_single_line("").is_ok());
        assert!(matches!(
            ensure_single_line("#move 1 1\n#KICKbob"),
            Err(TransportError::MultiLinePayload)
        ));
        assert!(matches!(
            ensure_single_line("trailing\r"),
            Err(TransportError::MultiLinePayload)
        ));
    }
}
