//! UDP receive loop for VMC senders.
//!
//! `UdpReceiver` owns the socket and a reusable read buffer. Each call to
//! `recv` performs one read, decodes every packet in the datagram and hands
//! each VMC message to a callback. Decoded values borrow from the receive
//! buffer and are only valid for the duration of that callback; copy what
//! must be kept.

pub mod config;
pub mod error;
pub mod udp;

pub use config::{BUF_SIZE_HUGE, BUF_SIZE_LARGE, BUF_SIZE_MAX_MTU, DEFAULT_PORT, ReceiverConfig};
pub use error::TransportError;
pub use udp::UdpReceiver;
