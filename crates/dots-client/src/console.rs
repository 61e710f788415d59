//! Presentation collaborator.

use tokio::sync::mpsc;

/// Where text meant for the operator goes.
///
/// Called from the inbound reader task as well as from command handling, so
/// implementations must tolerate concurrent calls.
pub trait Console: Send + Sync {
    fn display(&self, text: &str);
}

/// A [`Console`] that queues lines for a frontend's own event loop.
///
/// Lines displayed after the receiver is dropped are discarded.
pub struct ChannelConsole {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelConsole {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Console for ChannelConsole {
    fn display(&self, text: &str) {
        let _ = self.tx.send(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_arrive_in_order() {
        let (console, mut rx) = ChannelConsole::new();
        console.display("one");
        console.display("two");
        assert_eq!(rx.try_recv().unwrap(), "one");
        assert_eq!(rx.try_recv().unwrap(), "two");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn display_after_receiver_drop_is_silent() {
        let (console, rx) = ChannelConsole::new();
        drop(rx);
        console.display("lost");
    }
}
