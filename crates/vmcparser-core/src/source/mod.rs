//! Frame sources for replaying recorded VMC traffic.
//!
//! A source hands out captured link-layer frames one at a time, in file
//! order. The analysis layer strips the frame down to its UDP payload and
//! runs the OSC and VMC decoders over it, exactly as a live receiver would.

mod pcap;

pub use pcap::PcapFileSource;

use pcap_parser::Linktype;
use thiserror::Error;

/// A recorded frame as it was seen on the wire.
#[derive(Debug, Clone)]
pub struct PacketEvent {
    /// Seconds since the Unix epoch; `None` for sources without timing.
    pub ts: Option<f64>,
    /// Framing of `data`, needed to find the IP header.
    pub linktype: Linktype,
    pub data: Vec<u8>,
}

/// Anything that can replay frames into the analyzer.
pub trait PacketSource {
    /// The next recorded frame, or `None` once the recording is exhausted.
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError>;
}

/// Failure to replay a recording.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The recording could not be opened, or ended inside its file header.
    #[error("cannot read recording: {0}")]
    Read(#[from] std::io::Error),
    /// A block of the recording is not valid in its container format.
    #[error("malformed {format} recording: {detail}")]
    Malformed {
        /// `"pcap"` or `"pcapng"`.
        format: &'static str,
        detail: String,
    },
}

impl SourceError {
    pub(crate) fn malformed(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Malformed {
            format,
            detail: err.to_string(),
        }
    }

    /// Name of the container format for `Malformed`, `None` for read failures.
    pub fn format(&self) -> Option<&'static str> {
        match self {
            Self::Read(_) => None,
            Self::Malformed { format, .. } => Some(*format),
        }
    }
}
