//! UDP datagram extraction from captured link-layer frames.

pub mod error;
pub mod layout;
pub mod parser;

pub use parser::{UdpDatagram, parse_udp_datagram};
