//! Offline replay of captured VMC traffic.
//!
//! Frames from a `PacketSource` are reduced to UDP datagrams; datagrams that
//! start like an OSC packet are decoded exactly as the receive loop would
//! decode them and the outcomes are aggregated into a `Report`.

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, warn};

use crate::protocols::osc::{is_bundle, is_message, read_packet};
use crate::protocols::vmc::{AddressFilter, Decoded, VmcError, decode_message};
use crate::source::{PacketEvent, PacketSource, PcapFileSource, SourceError};
use crate::{CaptureSummary, DEFAULT_GENERATED_AT, Report, make_stub_report};

mod flows;
mod stats;
mod udp;

use flows::FlowTable;
use stats::{AddressCounts, ErrorLog};
use udp::parse_udp_datagram;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Analyze a PCAP or PCAPNG file.
///
/// Only messages whose address passes `filter` are decoded; the others are
/// counted as filtered.
pub fn analyze_pcap_file(path: &Path, filter: &AddressFilter) -> Result<Report, AnalysisError> {
    let source = PcapFileSource::open(path)?;
    analyze_source(path, source, filter)
}

/// Analyze any packet source. `path` is only used for the report metadata.
pub fn analyze_source<S: PacketSource>(
    path: &Path,
    mut source: S,
    filter: &AddressFilter,
) -> Result<Report, AnalysisError> {
    let mut analyzer = Analyzer::new(filter);
    while let Some(PacketEvent { ts, linktype, data }) = source.next_packet()? {
        analyzer.summary.packets_total += 1;
        analyzer.update_ts_bounds(ts);
        match parse_udp_datagram(linktype, &data) {
            Ok(Some(datagram)) => {
                analyzer.summary.udp_packets += 1;
                if is_message(datagram.payload) || is_bundle(datagram.payload) {
                    analyzer
                        .flows
                        .record(datagram.src, datagram.dst, datagram.payload.len());
                    analyzer.decode_datagram(datagram.src, datagram.payload, ts);
                }
            }
            Ok(None) => {}
            Err(err) => debug!(error = %err, "skipping undecodable frame"),
        }
    }

    let report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    Ok(analyzer.finish(report))
}

struct Analyzer<'f> {
    filter: &'f AddressFilter,
    summary: CaptureSummary,
    first_ts: Option<f64>,
    last_ts: Option<f64>,
    flows: FlowTable,
    messages: AddressCounts,
    errors: ErrorLog,
}

impl<'f> Analyzer<'f> {
    fn new(filter: &'f AddressFilter) -> Self {
        Self {
            filter,
            summary: CaptureSummary::default(),
            first_ts: None,
            last_ts: None,
            flows: FlowTable::default(),
            messages: AddressCounts::default(),
            errors: ErrorLog::default(),
        }
    }

    fn update_ts_bounds(&mut self, ts: Option<f64>) {
        let Some(ts) = ts else {
            return;
        };
        if self.first_ts.is_none_or(|first| ts < first) {
            self.first_ts = Some(ts);
        }
        if self.last_ts.is_none_or(|last| ts > last) {
            self.last_ts = Some(ts);
        }
    }

    /// Decode every packet of one datagram. The first error ends the
    /// datagram, like the receive loop.
    fn decode_datagram(&mut self, src: SocketAddr, payload: &[u8], ts: Option<f64>) {
        let filter = self.filter;
        let mut rest = payload;
        while !rest.is_empty() {
            let (packet, next) = match read_packet(rest) {
                Ok(read) => read,
                Err(err) => {
                    self.record_error(err.code(), src, ts, &err);
                    return;
                }
            };
            rest = next;
            self.summary.osc_packets += 1;

            let summary = &mut self.summary;
            let messages = &mut self.messages;
            let outcome = packet.for_each_message(|message| {
                match decode_message(message.address, message.type_tags, message.payload, filter)? {
                    Decoded::Message(vmc) => {
                        summary.vmc_messages += 1;
                        messages.record(message.address, Some(vmc.kind()));
                    }
                    Decoded::Unknown => {
                        summary.unknown_messages += 1;
                        messages.record(message.address, None);
                    }
                    Decoded::Filtered => summary.filtered_messages += 1,
                }
                Ok::<(), VmcError>(())
            });
            if let Err(err) = outcome {
                self.record_error(err.code(), src, ts, &err);
                return;
            }
        }
    }

    fn record_error(
        &mut self,
        code: &'static str,
        src: SocketAddr,
        ts: Option<f64>,
        err: &dyn std::fmt::Display,
    ) {
        let timestamp = ts_to_rfc3339(ts).unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
        warn!(code, source = %src, error = %err, "decode error in capture");
        self.errors.record(code, src, &timestamp, err);
    }

    fn finish(self, mut report: Report) -> Report {
        let mut summary = self.summary;
        summary.time_start = ts_to_rfc3339(self.first_ts);
        summary.time_end = ts_to_rfc3339(self.last_ts);

        report.generated_at = summary
            .time_end
            .clone()
            .or_else(|| summary.time_start.clone())
            .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
        report.capture_summary = Some(summary);

        let duration_s = match (self.first_ts, self.last_ts) {
            (Some(start), Some(end)) if end > start => Some(end - start),
            _ => None,
        };
        report.flows = self.flows.into_summaries(duration_s);
        report.messages = self.messages.into_summaries();
        if self.errors.total() > 0 {
            debug!(errors = self.errors.total(), "capture contained decode errors");
        }
        report.errors = self.errors.into_summaries();
        report
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let nanos = (ts? * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use super::ts_to_rfc3339;

    #[test]
    fn formats_capture_time() {
        assert_eq!(
            ts_to_rfc3339(Some(60.0)).as_deref(),
            Some("1970-01-01T00:01:00Z")
        );
        assert_eq!(ts_to_rfc3339(None), None);
    }
}
