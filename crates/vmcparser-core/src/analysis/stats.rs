use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;

use crate::{AddressSummary, ErrorSummary};

const MAX_EXAMPLES: usize = 3;

/// Per-address message counters.
#[derive(Debug, Default)]
pub(crate) struct AddressCounts {
    counts: HashMap<Vec<u8>, (Option<&'static str>, u64)>,
}

impl AddressCounts {
    /// Count one message; `kind` is `None` for addresses outside the catalogue.
    pub(crate) fn record(&mut self, address: &[u8], kind: Option<&'static str>) {
        match self.counts.get_mut(address) {
            Some((_, count)) => *count += 1,
            None => {
                self.counts.insert(address.to_vec(), (kind, 1));
            }
        }
    }

    pub(crate) fn into_summaries(self) -> Vec<AddressSummary> {
        let mut summaries: Vec<AddressSummary> = self
            .counts
            .into_iter()
            .map(|(address, (kind, count))| AddressSummary {
                address: String::from_utf8_lossy(&address).into_owned(),
                kind: kind.map(str::to_string),
                count,
            })
            .collect();
        summaries.sort_by(|a, b| a.address.cmp(&b.address));
        summaries
    }
}

#[derive(Debug, Default)]
struct ErrorEntry {
    count: u64,
    examples: Vec<String>,
}

/// Decode errors grouped by code, keeping the first few occurrences.
#[derive(Debug, Default)]
pub(crate) struct ErrorLog {
    entries: BTreeMap<&'static str, ErrorEntry>,
}

impl ErrorLog {
    pub(crate) fn record(
        &mut self,
        code: &'static str,
        source: SocketAddr,
        timestamp: &str,
        error: &dyn std::fmt::Display,
    ) {
        let entry = self.entries.entry(code).or_default();
        entry.count += 1;
        if entry.examples.len() < MAX_EXAMPLES {
            entry
                .examples
                .push(format!("source {source} @ {timestamp}: {error}"));
        }
    }

    pub(crate) fn total(&self) -> u64 {
        self.entries.values().map(|entry| entry.count).sum()
    }

    pub(crate) fn into_summaries(self) -> Vec<ErrorSummary> {
        self.entries
            .into_iter()
            .map(|(code, entry)| ErrorSummary {
                id: code.to_string(),
                message: describe(code).to_string(),
                count: entry.count,
                examples: entry.examples,
            })
            .collect()
    }
}

fn describe(code: &str) -> &'static str {
    match code {
        "OSC-INPUT-EMPTY" => "empty OSC packet",
        "OSC-TOO-SHORT" => "value truncated by the end of the packet",
        "OSC-MISSING-TERMINATOR" => "string without zero terminator",
        "OSC-NEGATIVE-LENGTH" => "blob or element with negative length",
        "OSC-BLOB-TOO-SHORT" => "blob longer than the remaining packet",
        "OSC-INVALID-PACKET" => "packet is neither a message nor a bundle",
        "OSC-INVALID-BUNDLE-IDENTIFIER" => "bundle does not start with #bundle",
        "OSC-ELEMENT-TOO-SHORT" => "bundle element longer than the remaining packet",
        "OSC-TYPE-TAGS-MISSING" => "message without type tag string",
        "OSC-UNKNOWN-TYPE-TAG" => "unknown OSC type tag",
        "OSC-ARRAYS-NOT-SUPPORTED" => "OSC array arguments are not supported",
        "VMC-INVALID-TYPE-TAGS" => "type tags match no signature of the address",
        "VMC-INVALID-BUFFER-LENGTH" => "payload length does not match the signature",
        "VMC-INVALID-ENUM-VALUE" => "enumerated field out of range",
        "VMC-INVALID-UTF8" => "string field is not valid UTF-8",
        "VMC-ARGUMENT-MISMATCH" => "argument does not match its type tag",
        _ => "decode error",
    }
}
