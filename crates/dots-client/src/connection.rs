//! Connection manager.
//!
//! [`GameClient`] owns the [`Session`] and its [`NetClient`]. It opens the
//! connection and logs in at construction, and it gives normal logoff and
//! error paths a single way to tear the session down.

use std::sync::Arc;

use dots_core::command::login_line;
use dots_core::transport::{Connector, TransportError};

use crate::config::ClientConfig;
use crate::console::Console;
use crate::error::ClientError;
use crate::net_client::NetClient;
use crate::owner::SessionOwner;
use crate::session::Session;

pub const CONNECT_ERROR_TITLE: &str = "Error connecting to server";
pub const CONNECT_ERROR_MESSAGE: &str =
    "Can't setup connection to server. Host name or port number may be invalid.";

/// Client half of a Dots session.
pub struct GameClient<C: Connector> {
    config: ClientConfig,
    session: Session,
    net: NetClient<C>,
    pub(crate) owner: Arc<dyn SessionOwner>,
    pub(crate) console: Arc<dyn Console>,
}

impl<C: Connector> GameClient<C> {
    /// Build a client and try to connect and log in.
    ///
    /// Never fails: if the parameters are invalid, the open fails or times
    /// out, or the login line cannot be sent, the owner gets one error
    /// report and the client is returned unconnected.
    pub async fn connect(
        config: ClientConfig,
        connector: C,
        owner: Arc<dyn SessionOwner>,
        console: Arc<dyn Console>,
    ) -> Self {
        let session = Session::new(&config);
        let net = NetClient::new(connector, session.connected_flag());
        let client = Self {
            config,
            session,
            net,
            owner,
            console,
        };

        if let Err(e) = client.connect_to_server().await {
            tracing::warn!(
                host = client.session.host(),
                port = client.session.port(),
                error = %e,
                "Could not connect to server"
            );
            client
                .owner
                .display_error_message(CONNECT_ERROR_TITLE, CONNECT_ERROR_MESSAGE, &e);
        }
        client
    }

    /// Send one payload to the server.
    pub async fn send(&self, payload: &str) -> Result<(), ClientError> {
        self.net.send(payload).await.map_err(ClientError::Send)
    }

    /// Close this client's connection, then let the owner shut down any
    /// local server. Safe to call when already disconnected.
    pub async fn disconnect(&self, graceful: bool) {
        if let Err(e) = self.net.close().await {
            tracing::debug!(error = %e, "Error while closing connection");
        }
        tracing::info!(graceful, "Session closed");
        self.owner.close_client_and_server(graceful);
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// Read fresh from the owner on every call.
    pub fn is_host(&self) -> bool {
        self.owner.is_server_host()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn login_id(&self) -> &str {
        self.session.login_id()
    }

    pub fn host(&self) -> &str {
        self.session.host()
    }

    pub fn port(&self) -> u16 {
        self.session.port()
    }

    // -- private -----------------------------------------------------------

    async fn connect_to_server(&self) -> Result<(), ClientError> {
        self.config.validate()?;

        let open = self.net.open(
            self.session.host(),
            self.session.port(),
            Arc::clone(&self.console),
        );
        tokio::time::timeout(self.config.connect_timeout(), open)
            .await
            .map_err(|_| ClientError::Connect(TransportError::Timeout))?
            .map_err(ClientError::Connect)?;

        if self.net.is_connected() {
            let login = login_line(self.session.login_id());
            if let Err(e) = self.net.send(&login).await {
                if let Err(close_err) = self.net.close().await {
                    tracing::debug!(error = %close_err, "Error while closing connection");
                }
                return Err(ClientError::Connect(e));
            }
        }
        Ok(())
    }
}
