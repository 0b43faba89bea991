/// Section header block type, the first four bytes of every PCAPNG file.
pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];

/// Initial buffer size handed to the `pcap-parser` readers.
pub const READER_BUFFER_SIZE: usize = 64 * 1024;

pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Format names carried by `SourceError::Malformed`.
pub const FORMAT_LEGACY: &str = "pcap";
pub const FORMAT_NG: &str = "pcapng";
