//! In-process transport used to drive the client without a socket.
//!
//! [`MemoryConnector::pair`] returns a connector and the [`MemoryPeer`] that
//! plays the server side. The peer sees every line the client writes, can
//! push lines back, can close the stream, and can make the client's sends
//! fail on demand.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, mpsc};

use crate::transport::{
    Connector, Transport, TransportError, TransportReader, TransportWriter, ensure_single_line,
};

/// Connector that hands out a single prepared [`MemoryTransport`].
pub struct MemoryConnector {
    transport: Mutex<Option<MemoryTransport>>,
    opened_at: Arc<Mutex<Option<(String, u16)>>>,
    refuse: bool,
}

impl MemoryConnector {
    /// Create a connector and the server-side peer for its one connection.
    pub fn pair() -> (Self, MemoryPeer) {
        let (to_server_tx, to_server_rx) = mpsc::unbounded_channel();
        let (to_client_tx, to_client_rx) = mpsc::unbounded_channel();
        let fail_sends = Arc::new(AtomicBool::new(false));
        let opened_at = Arc::new(Mutex::new(None));

        let transport = MemoryTransport {
            rx: to_client_rx,
            tx: to_server_tx,
            fail_sends: Arc::clone(&fail_sends),
        };
        let peer = MemoryPeer {
            rx: to_server_rx,
            tx: Some(to_client_tx),
            fail_sends,
            opened_at: Arc::clone(&opened_at),
        };
        let connector = Self {
            transport: Mutex::new(Some(transport)),
            opened_at,
            refuse: false,
        };
        (connector, peer)
    }

    /// A connector whose every `open` is refused.
    pub fn refusing() -> Self {
        Self {
            transport: Mutex::new(None),
            opened_at: Arc::new(Mutex::new(None)),
            refuse: true,
        }
    }
}

impl Connector for MemoryConnector {
    type Transport = MemoryTransport;

    async fn open(&self, host: &str, port: u16) -> Result<MemoryTransport, TransportError> {
        if self.refuse {
            return Err(TransportError::Io(format!(
                "connection to {host}:{port} refused"
            )));
        }
        let transport = self
            .transport
            .lock()
            .await
            .take()
            .ok_or_else(|| TransportError::Io("memory transport already opened".to_string()))?;
        *self.opened_at.lock().await = Some((host.to_string(), port));
        Ok(transport)
    }
}

/// Client side of an in-memory connection.
pub struct MemoryTransport {
    rx: mpsc::UnboundedReceiver<String>,
    tx: mpsc::UnboundedSender<String>,
    fail_sends: Arc<AtomicBool>,
}

impl Transport for MemoryTransport {
    type Reader = MemoryReader;
    type Writer = MemoryWriter;

    fn split(self) -> (Self::Reader, Self::Writer) {
        (
            MemoryReader { rx: self.rx },
            MemoryWriter {
                tx: Some(self.tx),
                fail_sends: self.fail_sends,
            },
        )
    }
}

pub struct MemoryReader {
    rx: mpsc::UnboundedReceiver<String>,
}

impl TransportReader for MemoryReader {
    async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        Ok(self.rx.recv().await)
    }
}

pub struct MemoryWriter {
    tx: Option<mpsc::UnboundedSender<String>>,
    fail_sends: Arc<AtomicBool>,
}

impl TransportWriter for MemoryWriter {
    async fn send(&mut self, text: &str) -> Result<(), TransportError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::Io("injected send failure".to_string()));
        }
        ensure_single_line(text)?;
        let tx = self.tx.as_ref().ok_or(TransportError::ConnectionClosed)?;
        tx.send(text.to_string())
            .map_err(|_| TransportError::ConnectionClosed)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.tx = None;
        Ok(())
    }
}

/// Server side of an in-memory connection.
pub struct MemoryPeer {
    rx: mpsc::UnboundedReceiver<String>,
    tx: Option<mpsc::UnboundedSender<String>>,
    fail_sends: Arc<AtomicBool>,
    opened_at: Arc<Mutex<Option<(String, u16)>>>,
}

impl MemoryPeer {
    /// Wait for the next line written by the client. `None` once the client
    /// has closed its write side.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Take every line the client has written so far without waiting.
    pub fn drain(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = self.rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    /// Push a line to the client. Returns `false` if the client reader is gone.
    pub fn send(&self, text: &str) -> bool {
        self.tx
            .as_ref()
            .is_some_and(|tx| tx.send(text.to_string()).is_ok())
    }

    /// Close the server-to-client direction, as a server hanging up would.
    pub fn close(&mut self) {
        self.tx = None;
    }

    /// Make every subsequent client send fail (or succeed again).
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// The `(host, port)` the client opened, if it has.
    pub async fn opened_at(&self) -> Option<(String, u16)> {
        self.opened_at.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pair_carries_lines_and_records_endpoint() {
        let (connector, mut peer) = MemoryConnector::pair();
        let transport = connector.open("game.example", 5555).await.unwrap();
        let (mut reader, mut writer) = transport.split();

        writer.send("#Login bob").await.unwrap();
        assert_eq!(peer.recv().await.as_deref(), Some("#Login bob"));

        assert!(peer.send("welcome"));
        assert_eq!(reader.recv().await.unwrap().as_deref(), Some("welcome"));

        assert_eq!(
            peer.opened_at().await,
            Some(("game.example".to_string(), 5555))
        );

        peer.close();
        assert!(reader.recv().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn connector_opens_only_once() {
        let (connector, _peer) = MemoryConnector::pair();
        assert!(connector.open("h", 1).await.is_ok());
        assert!(connector.open("h", 1).await.is_err());
    }

    #[tokio::test]
    async fn injected_failure_and_close_reject_sends() {
        let (connector, mut peer) = MemoryConnector::pair();
        let (_reader, mut writer) = connector.open("h", 1).await.unwrap().split();

        peer.fail_sends(true);
        assert!(matches!(
            writer.send("x").await,
            Err(TransportError::Io(_))
        ));
        peer.fail_sends(false);

        writer.close().await.unwrap();
        assert!(matches!(
            writer.send("x").await,
            Err(TransportError::ConnectionClosed)
        ));
        assert!(peer.drain().is_empty());
    }

    #[tokio::test]
    async fn multi_line_payload_is_refused() {
        let (connector, mut peer) = MemoryConnector::pair();
        let (_reader, mut writer) = connector.open("h", 1).await.unwrap().split();

        assert!(matches!(
            writer.send("a\r\nb").await,
            Err(TransportError::MultiLinePayload)
        ));
        assert!(peer.drain().is_empty());
    }

    #[test]
    fn refusing_connector_never_opens() {
        let connector = MemoryConnector::refusing();
        let result = tokio_test::block_on(connector.open("h", 1));
        assert!(result.is_err());
    }
}
