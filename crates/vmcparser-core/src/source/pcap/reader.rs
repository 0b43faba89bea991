use std::io::{self, Read, Seek, SeekFrom};

use pcap_parser::Linktype;

use super::layout;

/// Container format of a capture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Legacy,
    Ng,
}

/// Peek at the magic bytes to pick the container format, leaving the
/// reader at the start of the file.
///
/// # Errors
/// Fails with `UnexpectedEof` for files shorter than the magic.
pub fn detect_format<R: Read + Seek>(reader: &mut R) -> io::Result<CaptureFormat> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    if magic == layout::PCAPNG_MAGIC {
        Ok(CaptureFormat::Ng)
    } else {
        Ok(CaptureFormat::Legacy)
    }
}

/// Link type of PCAPNG interface `if_id`; frames on undeclared interfaces
/// are treated as Ethernet.
pub fn interface_linktype(linktypes: &[Linktype], if_id: u32) -> Linktype {
    usize::try_from(if_id)
        .ok()
        .and_then(|idx| linktypes.get(idx))
        .copied()
        .unwrap_or(Linktype::ETHERNET)
}

/// Legacy PCAP seconds + microseconds to fractional seconds.
pub fn legacy_ts(ts_sec: u32, ts_usec: u32) -> f64 {
    f64::from(ts_sec) + f64::from(ts_usec) / layout::MICROS_PER_SECOND
}

/// PCAPNG 64-bit microsecond timestamp split in two halves.
pub fn ng_ts(ts_high: u32, ts_low: u32) -> f64 {
    let micros = (u64::from(ts_high) << 32) | u64::from(ts_low);
    micros as f64 / layout::MICROS_PER_SECOND
}
