//! Command interpreter.
//!
//! Turns one line of operator input into network traffic, a local reply,
//! or a teardown, following [`classify`]. Send failures are handled here and
//! never returned to the frontend: the session is torn down non-gracefully
//! and the owner gets a report.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use dots_core::command::{Command, INVALID_MESSAGE, QUIT_LOGOFF_PAYLOAD, classify, local_echo};
use dots_core::transport::Connector;

use crate::connection::GameClient;
use crate::error::ClientError;

pub const SEND_ERROR_TITLE: &str = "Error sending to server";
pub const SEND_ERROR_MESSAGE: &str =
    "An error has occurred while sending a message to the server. You have been disconnected.";

impl<C: Connector> GameClient<C> {
    /// Handle one line typed by the operator.
    pub async fn handle_message_from_console(&self, line: &str) {
        let command = classify(line, self.is_host());
        if command == Command::Invalid {
            self.console.display(INVALID_MESSAGE);
            return;
        }

        if let Err(e) = self.perform_command(command).await {
            tracing::warn!(error = %e, "Send failed, closing session");
            self.disconnect(false).await;
            self.owner
                .display_error_message(SEND_ERROR_TITLE, SEND_ERROR_MESSAGE, &e);
        }
    }

    async fn perform_command(&self, command: Command<'_>) -> Result<(), ClientError> {
        match command {
            Command::Invalid => {}
            Command::HostPassthrough(line) | Command::Forward(line) => self.send(line).await?,
            Command::Logoff(line) => {
                self.send(line).await?;
                // The server has been told, so this teardown is graceful.
                self.disconnect(true).await;
            }
            Command::GetHost => {
                let host = if self.is_host() {
                    local_address().to_string()
                } else {
                    self.host().to_string()
                };
                self.console
                    .display(&local_echo(&format!("The current hostname is: {host}")));
            }
            Command::GetPort => {
                self.console
                    .display(&local_echo(&format!("The current port is: {}", self.port())));
            }
            Command::Quit => {
                self.send(QUIT_LOGOFF_PAYLOAD).await?;
                self.disconnect(true).await;
            }
        }
        Ok(())
    }
}

/// Address other machines on the network would use to reach this one.
///
/// Connecting a UDP socket only selects a route; no packet is sent. Falls
/// back to loopback on hosts without a usable route.
fn local_address() -> IpAddr {
    let probe = || -> std::io::Result<IpAddr> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9))?;
        Ok(socket.local_addr()?.ip())
    };
    probe().unwrap_or_else(|e| {
        tracing::debug!(error = %e, "No routable local address, using loopback");
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    })
}
