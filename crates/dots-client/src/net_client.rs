//! Generic network client over any [`Connector`].
//!
//! Opening a connection splits the transport: a background reader task
//! hands every inbound payload to the [`Console`] untouched, while sends are
//! awaited directly on the write half so their failures reach the caller.
//! The write half sits behind an async mutex, which makes [`NetClient::send`]
//! safe to call while the reader is delivering.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dots_core::command::local_echo;
use dots_core::transport::{Connector, Transport, TransportError, TransportReader, TransportWriter};
use tokio::task::JoinHandle;

use crate::console::Console;

/// Shown when the server ends the connection on its own.
pub const CONNECTION_CLOSED_NOTICE: &str = "The connection to the server was closed.";

type WriterOf<C> = <<C as Connector>::Transport as Transport>::Writer;

/// One outbound connection at a time, opened through `C`.
pub struct NetClient<C: Connector> {
    connector: C,
    writer: tokio::sync::Mutex<Option<WriterOf<C>>>,
    reader_task: Mutex<Option<JoinHandle<()>>>,
    connected: Arc<AtomicBool>,
}

impl<C: Connector> NetClient<C> {
    /// `connected` is set on open and cleared on close or when the server
    /// hangs up.
    pub fn new(connector: C, connected: Arc<AtomicBool>) -> Self {
        Self {
            connector,
            writer: tokio::sync::Mutex::new(None),
            reader_task: Mutex::new(None),
            connected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Open the connection and start delivering inbound payloads to
    /// `console`. Does nothing if already connected.
    pub async fn open(
        &self,
        host: &str,
        port: u16,
        console: Arc<dyn Console>,
    ) -> Result<(), TransportError> {
        let mut writer_slot = self.writer.lock().await;
        if self.is_connected() {
            return Ok(());
        }

        let transport = self.connector.open(host, port).await?;
        let (reader, writer) = transport.split();
        *writer_slot = Some(writer);
        self.connected.store(true, Ordering::SeqCst);

        let handle = Self::spawn_reader_task(reader, Arc::clone(&self.connected), console);
        let previous = self
            .reader_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }

        tracing::info!(host, port, "Connected to server");
        Ok(())
    }

    /// Send one payload. Fails with [`TransportError::NotConnected`] without
    /// touching the transport when no connection is open.
    pub async fn send(&self, text: &str) -> Result<(), TransportError> {
        let mut writer_slot = self.writer.lock().await;
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        let writer = writer_slot.as_mut().ok_or(TransportError::NotConnected)?;
        writer.send(text).await?;
        tracing::trace!(payload = text, "Sent to server");
        Ok(())
    }

    /// Close the connection. Closing an already closed client is a no-op.
    pub async fn close(&self) -> Result<(), TransportError> {
        let mut writer_slot = self.writer.lock().await;
        self.connected.store(false, Ordering::SeqCst);

        let reader_task = self
            .reader_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = reader_task {
            handle.abort();
        }

        match writer_slot.take() {
            Some(mut writer) => {
                tracing::info!("Closing connection to server");
                writer.close().await
            }
            None => Ok(()),
        }
    }

    // -- private -----------------------------------------------------------

    fn spawn_reader_task<R: TransportReader>(
        mut reader: R,
        connected: Arc<AtomicBool>,
        console: Arc<dyn Console>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match reader.recv().await {
                    Ok(Some(payload)) => console.display(&payload),
                    Ok(None) => {
                        tracing::info!("Server closed the connection");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Connection to server lost");
                        break;
                    }
                }
            }
            connected.store(false, Ordering::SeqCst);
            console.display(&local_echo(CONNECTION_CLOSED_NOTICE));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ChannelConsole;
    use dots_core::memory_transport::MemoryConnector;

    fn client(connector: MemoryConnector) -> NetClient<MemoryConnector> {
        NetClient::new(connector, Arc::new(AtomicBool::new(false)))
    }

    #[tokio::test]
    async fn send_before_open_is_rejected() {
        let (connector, mut peer) = MemoryConnector::pair();
        let net = client(connector);

        let err = net.send("#hello").await.unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));
        assert!(peer.drain().is_empty());
    }

    #[tokio::test]
    async fn inbound_payloads_are_displayed_verbatim() {
        let (connector, mut peer) = MemoryConnector::pair();
        let net = client(connector);
        let (console, mut rx) = ChannelConsole::new();
        net.open("h", 1, Arc::new(console)).await.unwrap();

        peer.send("#Login accepted");
        peer.send("  spaced  ");
        assert_eq!(rx.recv().await.unwrap(), "#Login accepted");
        assert_eq!(rx.recv().await.unwrap(), "  spaced  ");

        net.send("#move a1").await.unwrap();
        assert_eq!(peer.recv().await.as_deref(), Some("#move a1"));
    }

    #[tokio::test]
    async fn server_hangup_clears_connected() {
        let (connector, mut peer) = MemoryConnector::pair();
        let net = client(connector);
        let (console, mut rx) = ChannelConsole::new();
        net.open("h", 1, Arc::new(console)).await.unwrap();
        assert!(net.is_connected());

        peer.close();
        assert_eq!(
            rx.recv().await.unwrap(),
            local_echo(CONNECTION_CLOSED_NOTICE)
        );
        assert!(!net.is_connected());
        assert!(matches!(
            net.send("#x").await,
            Err(TransportError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let (connector, mut peer) = MemoryConnector::pair();
        let net = client(connector);
        let (console, _rx) = ChannelConsole::new();
        net.open("h", 1, Arc::new(console)).await.unwrap();

        net.close().await.unwrap();
        net.close().await.unwrap();
        assert!(!net.is_connected());
        assert_eq!(peer.recv().await, None);
    }

    #[tokio::test]
    async fn failed_open_leaves_client_closed() {
        let net = client(MemoryConnector::refusing());
        let (console, _rx) = ChannelConsole::new();
        assert!(net.open("h", 1, Arc::new(console)).await.is_err());
        assert!(!net.is_connected());
    }
}
