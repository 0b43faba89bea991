//! PCAP and PCAPNG capture files.
//!
//! The container format is detected from the magic bytes; both formats are
//! streamed block by block through `pcap-parser`.

pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
