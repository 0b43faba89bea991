//! VMC (Virtual Motion Capture) decoding over OSC.
//!
//! The crate is layered:
//! - [`osc`] decodes OSC packets (messages and nested bundles) from a byte
//!   buffer without copying;
//! - [`vmc`] turns OSC messages into typed VMC records, validating type tag
//!   signatures, payload lengths and enum ranges;
//! - [`transport`] is a blocking UDP receive loop on top of both;
//! - capture analysis replays PCAP/PCAPNG files through the decoders and
//!   aggregates a deterministic JSON report.
//!
//! Decoders are pure functions from a byte view to a result and the
//! remaining bytes. Decoded strings and blobs borrow from the input buffer
//! and must be copied before the buffer is reused.
//!
//! # Examples
//! ```
//! use vmcparser_core::vmc::{AddressFilter, CalibrationMode, Decoded, VmcMessage, read_message};
//!
//! let buf = b"/VMC/Ext/OK\0,iii\0\0\0\0\0\0\0\x01\0\0\0\x03\0\0\0\x01";
//! let Decoded::Message(VmcMessage::Available(available)) =
//!     read_message(buf, &AddressFilter::all())?
//! else {
//!     panic!("expected availability");
//! };
//! assert_eq!(available.calibration_mode, Some(CalibrationMode::MrNormal));
//! # Ok::<(), vmcparser_core::vmc::VmcError>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
mod protocols;
mod source;
pub mod transport;

pub use analysis::{AnalysisError, analyze_pcap_file, analyze_source};
pub use protocols::{osc, vmc};
pub use source::{PacketEvent, PacketSource, PcapFileSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Capture analysis report with deterministic ordering.
///
/// # Examples
/// ```
/// use vmcparser_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.report_version, vmcparser_core::REPORT_VERSION);
/// assert!(report.messages.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 time of the last captured packet, or the epoch.
    pub generated_at: String,
    pub input: InputInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// UDP flows that carried OSC, sorted by source then destination.
    pub flows: Vec<FlowSummary>,
    /// Decoded message counts per address, sorted by address.
    pub messages: Vec<AddressSummary>,
    /// Decode errors grouped by code, sorted by code.
    pub errors: Vec<ErrorSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    pub bytes: u64,
}

/// Packet totals for the whole capture.
///
/// # Examples
/// ```
/// use vmcparser_core::CaptureSummary;
///
/// let summary = CaptureSummary {
///     packets_total: 10,
///     udp_packets: 8,
///     osc_packets: 6,
///     vmc_messages: 12,
///     unknown_messages: 0,
///     filtered_messages: 2,
///     time_start: None,
///     time_end: None,
/// };
/// assert_eq!(summary.osc_packets, 6);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Frames in the capture file.
    pub packets_total: u64,
    /// Frames that carried a UDP datagram.
    pub udp_packets: u64,
    /// Top-level OSC packets decoded without error.
    pub osc_packets: u64,
    /// Messages decoded into VMC records.
    pub vmc_messages: u64,
    /// Messages whose address is not in the VMC catalogue.
    pub unknown_messages: u64,
    /// Messages skipped by the address filter.
    pub filtered_messages: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Traffic of one UDP endpoint pair that carried OSC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSummary {
    /// Source endpoint in `ip:port` form.
    pub src: String,
    /// Destination endpoint in `ip:port` form.
    pub dst: String,
    pub packets: u64,
    /// UDP payload bytes.
    pub bytes: u64,
    /// Packets per second over the capture duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pps: Option<f64>,
    /// Payload bytes per second over the capture duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bps: Option<f64>,
}

/// Message count for one OSC address.
///
/// # Examples
/// ```
/// use vmcparser_core::AddressSummary;
///
/// let summary = AddressSummary {
///     address: "/VMC/Ext/Bone/Pos".to_string(),
///     kind: Some("BoneTransform".to_string()),
///     count: 55,
/// };
/// assert_eq!(summary.count, 55);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressSummary {
    pub address: String,
    /// VMC record kind, absent for addresses outside the catalogue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub count: u64,
}

/// Decode errors sharing one code.
///
/// # Examples
/// ```
/// use vmcparser_core::ErrorSummary;
///
/// let summary = ErrorSummary {
///     id: "VMC-INVALID-TYPE-TAGS".to_string(),
///     message: "type tags match no signature of the address".to_string(),
///     count: 1,
///     examples: vec![
///         "source 10.0.0.1:39540 @ 1970-01-01T00:00:00Z: invalid type tags `i`, expected `f`"
///             .to_string(),
///     ],
/// };
/// assert_eq!(summary.count, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorSummary {
    /// Stable error code (e.g., `OSC-MISSING-TERMINATOR`).
    pub id: String,
    pub message: String,
    pub count: u64,
    /// At most three example contexts, formatted as `source ip:port @ ts: error`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Build a report with base fields filled and empty aggregates.
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "vmcparser".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        flows: Vec::new(),
        messages: Vec::new(),
        errors: Vec::new(),
    }
}
