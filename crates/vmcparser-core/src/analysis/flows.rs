use std::collections::HashMap;
use std::net::SocketAddr;

use crate::FlowSummary;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub(crate) struct FlowKey {
    pub src: SocketAddr,
    pub dst: SocketAddr,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct FlowStats {
    pub packets: u64,
    pub bytes: u64,
}

#[derive(Debug, Default)]
pub(crate) struct FlowTable {
    flows: HashMap<FlowKey, FlowStats>,
}

impl FlowTable {
    pub(crate) fn record(&mut self, src: SocketAddr, dst: SocketAddr, payload_len: usize) {
        let entry = self.flows.entry(FlowKey { src, dst }).or_default();
        entry.packets += 1;
        entry.bytes += payload_len as u64;
    }

    /// Summaries sorted by source then destination; rates only when the
    /// capture spans a positive duration.
    pub(crate) fn into_summaries(self, duration_s: Option<f64>) -> Vec<FlowSummary> {
        let mut flows: Vec<(FlowKey, FlowStats)> = self.flows.into_iter().collect();
        flows.sort_by(|(a, _), (b, _)| {
            a.src
                .cmp(&b.src)
                .then_with(|| a.dst.cmp(&b.dst))
        });

        flows
            .into_iter()
            .map(|(key, stats)| {
                let rate = |count: u64| duration_s.map(|d| count as f64 / d);
                FlowSummary {
                    src: key.src.to_string(),
                    dst: key.dst.to_string(),
                    packets: stats.packets,
                    bytes: stats.bytes,
                    pps: rate(stats.packets),
                    bps: rate(stats.bytes),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::FlowTable;

    fn addr(s: &str) -> SocketAddr {
        s.parse().unwrap()
    }

    #[test]
    fn summaries_are_sorted_without_rates() {
        let mut table = FlowTable::default();
        table.record(addr("10.0.0.2:1000"), addr("10.0.0.3:39539"), 10);
        table.record(addr("10.0.0.1:1000"), addr("10.0.0.3:39539"), 20);
        table.record(addr("10.0.0.1:1000"), addr("10.0.0.3:39539"), 20);

        let summaries = table.into_summaries(None);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].src, "10.0.0.1:1000");
        assert_eq!(summaries[0].packets, 2);
        assert_eq!(summaries[0].bytes, 40);
        assert!(summaries[0].pps.is_none());
        assert!(summaries[1].bps.is_none());
    }

    #[test]
    fn rates_use_capture_duration() {
        let mut table = FlowTable::default();
        for _ in 0..10 {
            table.record(addr("[::1]:5000"), addr("[::1]:39539"), 10);
        }

        let summaries = table.into_summaries(Some(2.0));
        assert_eq!(summaries[0].src, "[::1]:5000");
        assert_eq!(summaries[0].pps, Some(5.0));
        assert_eq!(summaries[0].bps, Some(50.0));
    }
}
