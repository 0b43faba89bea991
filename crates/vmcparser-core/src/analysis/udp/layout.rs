pub const UDP_HEADER_LEN: usize = 8;

/// BSD loopback (`NULL` / `LOOP`) frames start with a 4-byte address family.
pub const LOOPBACK_HEADER_LEN: usize = 4;
