//! The one logical connection a client holds.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::ClientConfig;

/// Target endpoint, login id and connected flag of a client.
///
/// The flag is shared with the inbound reader task, which clears it when the
/// server hangs up.
#[derive(Debug)]
pub struct Session {
    host: String,
    port: u16,
    login_id: String,
    connected: Arc<AtomicBool>,
}

impl Session {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            login_id: config.login_id.clone(),
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn login_id(&self) -> &str {
        &self.login_id
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub(crate) fn connected_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected_and_shares_flag() {
        let session = Session::new(&ClientConfig::new("h", 4000, "amy"));
        assert_eq!(session.host(), "h");
        assert_eq!(session.port(), 4000);
        assert_eq!(session.login_id(), "amy");
        assert!(!session.is_connected());

        session.connected_flag().store(true, Ordering::SeqCst);
        assert!(session.is_connected());
    }
}
