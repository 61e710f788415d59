//! Session ownership: host status, local server shutdown, operator reports.
//!
//! The client never reaches for global state. Whoever builds a
//! [`GameClient`](crate::GameClient) injects a [`SessionOwner`], and the
//! client asks it on every command whether this process is hosting.

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dots_core::command::local_echo;

use crate::console::Console;

/// Process-level collaborator the client reports to.
pub trait SessionOwner: Send + Sync {
    /// Whether this process is also running the game server. May change
    /// while connected.
    fn is_server_host(&self) -> bool;

    /// Called once the client has closed its own connection. Shuts down the
    /// locally hosted server, if any. `graceful` is true when the server was
    /// told about the logoff beforehand.
    fn close_client_and_server(&self, graceful: bool);

    /// Surface a session-ending error to the operator.
    fn display_error_message(&self, title: &str, message: &str, cause: &(dyn Error + 'static));
}

/// Handle on a game server running inside this process.
pub trait LocalServer: Send + Sync {
    fn close(&self, graceful: bool);
}

/// [`SessionOwner`] for a single frontend process.
///
/// Hosting is tied to an attached [`LocalServer`]: attaching one makes this
/// process the host, and closing the session shuts it down and clears the
/// flag. Error reports are logged and echoed to the console.
pub struct LocalSessionOwner {
    console: Arc<dyn Console>,
    host: AtomicBool,
    server: Mutex<Option<Box<dyn LocalServer>>>,
}

impl LocalSessionOwner {
    pub fn new(console: Arc<dyn Console>) -> Self {
        Self {
            console,
            host: AtomicBool::new(false),
            server: Mutex::new(None),
        }
    }

    /// Record a locally started server. Any previous one is closed first.
    pub fn attach_server(&self, server: Box<dyn LocalServer>) {
        let previous = self
            .server
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(server);
        if let Some(previous) = previous {
            previous.close(false);
        }
        self.host.store(true, Ordering::SeqCst);
    }

    /// Forget the local server without closing it, e.g. after it stopped on
    /// its own.
    pub fn detach_server(&self) -> Option<Box<dyn LocalServer>> {
        self.host.store(false, Ordering::SeqCst);
        self.server
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl SessionOwner for LocalSessionOwner {
    fn is_server_host(&self) -> bool {
        self.host.load(Ordering::SeqCst)
    }

    fn close_client_and_server(&self, graceful: bool) {
        if let Some(server) = self.detach_server() {
            tracing::info!(graceful, "Closing local server");
            server.close(graceful);
        }
    }

    fn display_error_message(&self, title: &str, message: &str, cause: &(dyn Error + 'static)) {
        tracing::error!(title, error = %cause, "{message}");
        self.console
            .display(&local_echo(&format!("{title}: {message} ({cause})")));
    }
}
