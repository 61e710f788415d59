use dots_core::transport::TransportError;
use thiserror::Error;

/// Errors surfaced by the client core.
///
/// None of these cross [`GameClient::connect`](crate::GameClient::connect) or
/// [`GameClient::handle_message_from_console`](crate::GameClient::handle_message_from_console);
/// both turn them into an operator report instead.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The session parameters can never produce a connection.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Opening the connection or sending the login line failed.
    #[error("could not connect: {0}")]
    Connect(#[source] TransportError),

    /// A send on an established session failed.
    #[error("send failed: {0}")]
    Send(#[source] TransportError),

    /// A stored configuration could not be parsed or written.
    #[error("configuration format: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}
