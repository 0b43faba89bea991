use thiserror::Error;

use crate::protocols::osc::OscError;
use crate::protocols::vmc::VmcError;

/// Errors returned by the UDP receive loop.
///
/// Decode errors abort the rest of the datagram; the next `recv` starts
/// fresh.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid receiver configuration: {0}")]
    Config(&'static str),
    #[error("read timed out")]
    Timeout,
    #[error("failed to parse OSC packet: {0}")]
    Osc(#[from] OscError),
    #[error("failed to parse VMC message: {0}")]
    Vmc(#[from] VmcError),
    #[error("failed handling VMC message: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// True for a read that hit its deadline without data.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}
