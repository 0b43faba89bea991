use std::fs::File;
use std::path::Path;

use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader};

use crate::source::{PacketEvent, PacketSource, SourceError};

use super::layout;
use super::reader::{CaptureFormat, detect_format, interface_linktype, legacy_ts, ng_ts};

/// Streaming reader over a PCAP or PCAPNG file.
pub struct PcapFileSource {
    inner: Inner,
}

enum Inner {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Linktype,
    },
    Ng {
        reader: PcapNGReader<File>,
        linktypes: Vec<Linktype>,
    },
}

impl PcapFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let mut file = File::open(path)?;
        let inner = match detect_format(&mut file)? {
            CaptureFormat::Ng => Inner::Ng {
                reader: PcapNGReader::new(layout::READER_BUFFER_SIZE, file)
                    .map_err(|e| SourceError::malformed(layout::FORMAT_NG, e))?,
                linktypes: Vec::new(),
            },
            CaptureFormat::Legacy => Inner::Legacy {
                reader: LegacyPcapReader::new(layout::READER_BUFFER_SIZE, file)
                    .map_err(|e| SourceError::malformed(layout::FORMAT_LEGACY, e))?,
                linktype: Linktype::ETHERNET,
            },
        };
        Ok(Self { inner })
    }
}

impl PacketSource for PcapFileSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        let event = match &mut self.inner {
            Inner::Legacy { reader, linktype } => pump(reader, layout::FORMAT_LEGACY, |block| match block {
                PcapBlockOwned::LegacyHeader(header) => {
                    *linktype = header.network;
                    None
                }
                PcapBlockOwned::Legacy(packet) => Some(PacketEvent {
                    ts: Some(legacy_ts(packet.ts_sec, packet.ts_usec)),
                    linktype: *linktype,
                    data: packet.data.to_vec(),
                }),
                _ => None,
            }),
            Inner::Ng { reader, linktypes } => pump(reader, layout::FORMAT_NG, |block| match block {
                PcapBlockOwned::NG(Block::InterfaceDescription(interface)) => {
                    linktypes.push(interface.linktype);
                    None
                }
                PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => Some(PacketEvent {
                    ts: Some(ng_ts(packet.ts_high, packet.ts_low)),
                    linktype: interface_linktype(linktypes, packet.if_id),
                    data: packet.data.to_vec(),
                }),
                _ => None,
            }),
        };
        event
    }
}

/// Pull blocks until `on_block` turns one into a packet event or the file
/// ends. Header blocks update reader state through `on_block` and yield
/// nothing.
fn pump<R, F>(
    reader: &mut R,
    format: &'static str,
    mut on_block: F,
) -> Result<Option<PacketEvent>, SourceError>
where
    R: PcapReaderIterator,
    F: FnMut(PcapBlockOwned<'_>) -> Option<PacketEvent>,
{
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let event = on_block(block);
                reader.consume(offset);
                if event.is_some() {
                    return Ok(event);
                }
            }
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader
                    .refill()
                    .map_err(|e| SourceError::malformed(format, e))?;
            }
            Err(e) => return Err(SourceError::malformed(format, e)),
        }
    }
}
