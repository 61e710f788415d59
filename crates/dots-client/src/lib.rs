pub mod config;
pub mod connection;
pub mod console;
pub mod error;
pub mod interpreter;
pub mod net_client;
pub mod owner;
pub mod session;

#[cfg(test)]
mod test_support;

pub use config::ClientConfig;
pub use connection::GameClient;
pub use console::{ChannelConsole, Console};
pub use error::ClientError;
pub use owner::{LocalServer, LocalSessionOwner, SessionOwner};
