//! Recording collaborators shared by the client tests.

use std::error::Error;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::console::Console;
use crate::owner::SessionOwner;

#[derive(Default)]
pub struct RecordingConsole {
    lines: Mutex<Vec<String>>,
}

impl RecordingConsole {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Console for RecordingConsole {
    fn display(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub message: String,
    pub cause: String,
}

#[derive(Default)]
pub struct RecordingOwner {
    host: AtomicBool,
    teardowns: Mutex<Vec<bool>>,
    reports: Mutex<Vec<Report>>,
}

impl RecordingOwner {
    pub fn set_host(&self, host: bool) {
        self.host.store(host, Ordering::SeqCst);
    }

    pub fn teardowns(&self) -> Vec<bool> {
        self.teardowns.lock().unwrap().clone()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }
}

impl SessionOwner for RecordingOwner {
    fn is_server_host(&self) -> bool {
        self.host.load(Ordering::SeqCst)
    }

    fn close_client_and_server(&self, graceful: bool) {
        self.teardowns.lock().unwrap().push(graceful);
    }

    fn display_error_message(&self, title: &str, message: &str, cause: &(dyn Error + 'static)) {
        self.reports.lock().unwrap().push(Report {
            title: title.to_string(),
            message: message.to_string(),
            cause: cause.to_string(),
        });
    }
}
