pub mod command;
pub mod memory_transport;
pub mod tcp_transport;
pub mod transport;
