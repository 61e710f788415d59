//! Newline-delimited TCP transport.
//!
//! Each payload travels as one line of UTF-8 text terminated by `\n`. A
//! trailing `\r` on inbound lines is stripped so peers that write CRLF are
//! accepted too.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::transport::{
    Connector, Transport, TransportError, TransportReader, TransportWriter, ensure_single_line,
};

/// Opens [`TcpTransport`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Transport = TcpTransport;

    async fn open(&self, host: &str, port: u16) -> Result<TcpTransport, TransportError> {
        let stream = TcpStream::connect((host, port)).await?;
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "Could not disable Nagle on client socket");
        }
        Ok(TcpTransport::new(stream))
    }
}

/// A connected TCP stream carrying one payload per line.
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl Transport for TcpTransport {
    type Reader = TcpReader;
    type Writer = TcpWriter;

    fn split(self) -> (Self::Reader, Self::Writer) {
        let (read_half, write_half) = self.stream.into_split();
        (
            TcpReader {
                reader: BufReader::new(read_half),
                line: String::new(),
            },
            TcpWriter {
                writer: write_half,
            },
        )
    }
}

/// Read half of a [`TcpTransport`].
pub struct TcpReader {
    reader: BufReader<OwnedReadHalf>,
    line: String,
}

impl TransportReader for TcpReader {
    async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        self.line.clear();
        let n = self.reader.read_line(&mut self.line).await?;
        if n == 0 {
            return Ok(None);
        }
        let payload = self.line.trim_end_matches('\n').trim_end_matches('\r');
        Ok(Some(payload.to_string()))
    }
}

/// Write half of a [`TcpTransport`].
pub struct TcpWriter {
    writer: OwnedWriteHalf,
}

impl TransportWriter for TcpWriter {
    async fn send(&mut self, text: &str) -> Result<(), TransportError> {
        ensure_single_line(text)?;
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
