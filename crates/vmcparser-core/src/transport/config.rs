use std::time::Duration;

/// Maximum transmission unit for Ethernet II; one read fetches a full frame.
pub const BUF_SIZE_MAX_MTU: usize = 1536;
/// 16 KiB, for senders that bundle more than one frame per datagram.
pub const BUF_SIZE_LARGE: usize = 16384;
/// Largest possible UDP payload.
pub const BUF_SIZE_HUGE: usize = 65535;

/// Port VMC performers send to by default.
pub const DEFAULT_PORT: u16 = 39539;

/// Receive loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverConfig {
    /// Size of the reusable receive buffer. Longer datagrams are truncated
    /// by the OS.
    pub buffer_size: usize,
    /// Deadline for a single read, `None` blocks until data arrives.
    pub read_timeout: Option<Duration>,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            buffer_size: BUF_SIZE_MAX_MTU,
            read_timeout: Some(Duration::from_secs(1)),
        }
    }
}

impl ReceiverConfig {
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_mtu_buffer_and_one_second() {
        let config = ReceiverConfig::default();
        assert_eq!(config.buffer_size, 1536);
        assert_eq!(config.read_timeout, Some(Duration::from_secs(1)));
    }

    #[test]
    fn builders_override_fields() {
        let config = ReceiverConfig::default()
            .with_buffer_size(BUF_SIZE_HUGE)
            .with_read_timeout(None);
        assert_eq!(config.buffer_size, 65535);
        assert_eq!(config.read_timeout, None);
    }
}
