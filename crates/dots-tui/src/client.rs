//! Client orchestrator: connects the Dots client core to the TUI frontend.
//!
//! Owns the event loop and drives:
//! - [`dots_client::GameClient`], which interprets each submitted line
//! - [`crate::tui::Tui`], the ratatui frontend
//!
//! Everything the core wants shown, server payloads and local replies alike,
//! arrives through a [`ChannelConsole`].
//!
//! This binary only joins games. Hosting is wired in by whatever process
//! embeds the server, through [`LocalSessionOwner::attach_server`].

use std::sync::Arc;

use dots_client::{ChannelConsole, ClientConfig, Console, GameClient, LocalSessionOwner};
use dots_core::tcp_transport::TcpConnector;
use tokio::sync::mpsc;

use crate::tui::{Status, Tui, UserIntent};

/// Connect with `config` and run the TUI until the operator quits.
///
/// A failed connection does not end the program: the error report shows up
/// in the log pane and the operator can still read it before leaving.
pub async fn start_client(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (console, mut lines) = ChannelConsole::new();
    let console: Arc<dyn Console> = Arc::new(console);
    let owner = Arc::new(LocalSessionOwner::new(Arc::clone(&console)));

    tracing::info!(
        host = %config.host,
        port = config.port,
        login_id = %config.login_id,
        "Starting client"
    );
    let client = GameClient::connect(config, TcpConnector, owner, console).await;

    let mut tui = Tui::setup()?;
    let result = run_event_loop(&mut tui, &client, &mut lines).await;
    tui.teardown()?;

    if client.is_connected() {
        tracing::info!("Operator quit while connected, closing session");
        client.disconnect(false).await;
    }
    tracing::info!("Client stopped");
    result
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

async fn run_event_loop(
    tui: &mut Tui,
    client: &GameClient<TcpConnector>,
    lines: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tui.render(&status_of(client))?;

        let timeout = tokio::time::Duration::from_millis(50);

        tokio::select! {
            Some(line) = lines.recv() => {
                tui.push_line(line);
            }

            _ = tokio::time::sleep(timeout) => {
                match tui.poll_and_handle_input()? {
                    UserIntent::Quit => break,
                    UserIntent::Submit(line) => {
                        client.handle_message_from_console(&line).await;
                    }
                    UserIntent::None => {}
                }
            }
        }
    }

    Ok(())
}

fn status_of(client: &GameClient<TcpConnector>) -> Status {
    Status {
        connected: client.is_connected(),
        host: client.host().to_string(),
        port: client.port(),
        login_id: client.login_id().to_string(),
        is_host: client.is_host(),
    }
}
