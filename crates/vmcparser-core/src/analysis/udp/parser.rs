use std::net::{IpAddr, SocketAddr};

use etherparse::{NetSlice, SlicedPacket, TransportSlice};
use pcap_parser::Linktype;

use super::error::UdpError;
use super::layout;

/// A UDP datagram with its endpoints. The payload borrows from the frame.
#[derive(Debug, Clone, Copy)]
pub struct UdpDatagram<'a> {
    pub src: SocketAddr,
    pub dst: SocketAddr,
    pub payload: &'a [u8],
}

/// Extract the UDP datagram from a link-layer frame.
///
/// Returns `Ok(None)` for non-UDP traffic and unsupported link types.
pub fn parse_udp_datagram(
    linktype: Linktype,
    frame: &[u8],
) -> Result<Option<UdpDatagram<'_>>, UdpError> {
    let sliced = match linktype {
        Linktype::ETHERNET => {
            SlicedPacket::from_ethernet(frame).map_err(|e| UdpError::Slice(e.to_string()))?
        }
        Linktype::RAW | Linktype::IPV4 | Linktype::IPV6 => {
            SlicedPacket::from_ip(frame).map_err(|e| UdpError::Slice(e.to_string()))?
        }
        Linktype::NULL | Linktype::LOOP => {
            let ip = frame
                .get(layout::LOOPBACK_HEADER_LEN..)
                .ok_or(UdpError::TooShort {
                    needed: layout::LOOPBACK_HEADER_LEN,
                    actual: frame.len(),
                })?;
            SlicedPacket::from_ip(ip).map_err(|e| UdpError::Slice(e.to_string()))?
        }
        _ => return Ok(None),
    };

    let net = sliced.net.ok_or(UdpError::MissingNetworkLayer)?;
    let Some(TransportSlice::Udp(udp)) = sliced.transport else {
        return Ok(None);
    };

    let (src_ip, dst_ip) = match net {
        NetSlice::Ipv4(ref ipv4) => (
            IpAddr::V4(ipv4.header().source_addr()),
            IpAddr::V4(ipv4.header().destination_addr()),
        ),
        NetSlice::Ipv6(ref ipv6) => (
            IpAddr::V6(ipv6.header().source_addr()),
            IpAddr::V6(ipv6.header().destination_addr()),
        ),
    };

    let ip_payload = net.ip_payload_ref().ok_or(UdpError::MissingIpPayload)?;
    let segment = ip_payload.payload;
    let payload = segment
        .get(layout::UDP_HEADER_LEN..)
        .ok_or(UdpError::TooShort {
            needed: layout::UDP_HEADER_LEN,
            actual: segment.len(),
        })?;

    Ok(Some(UdpDatagram {
        src: SocketAddr::new(src_ip, udp.source_port()),
        dst: SocketAddr::new(dst_ip, udp.destination_port()),
        payload,
    }))
}

#[cfg(test)]
mod tests {
    use etherparse::PacketBuilder;
    use pcap_parser::Linktype;

    use super::parse_udp_datagram;
    use crate::analysis::udp::error::UdpError;

    const OSC: &[u8] = b"/VMC/Ext/T\0\0,f\0\0\x40\xA0\x00\x00";

    #[test]
    fn extracts_ethernet_udp() {
        let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
            .ipv4([192, 168, 0, 1], [192, 168, 0, 2], 64)
            .udp(39540, 39539);
        let mut frame = Vec::with_capacity(builder.size(OSC.len()));
        builder.write(&mut frame, OSC).unwrap();

        let datagram = parse_udp_datagram(Linktype::ETHERNET, &frame)
            .unwrap()
            .unwrap();
        assert_eq!(datagram.src.to_string(), "192.168.0.1:39540");
        assert_eq!(datagram.dst.to_string(), "192.168.0.2:39539");
        assert_eq!(datagram.payload, OSC);
    }

    #[test]
    fn extracts_loopback_udp() {
        let builder = PacketBuilder::ipv4([127, 0, 0, 1], [127, 0, 0, 1], 64).udp(5000, 39539);
        let mut frame = 2u32.to_le_bytes().to_vec();
        builder.write(&mut frame, OSC).unwrap();

        let datagram = parse_udp_datagram(Linktype::NULL, &frame).unwrap().unwrap();
        assert_eq!(datagram.dst.port(), 39539);
        assert_eq!(datagram.payload, OSC);
    }

    #[test]
    fn ignores_tcp() {
        let builder = PacketBuilder::ethernet2([1; 6], [2; 6])
            .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
            .tcp(1000, 1001, 0, 0);
        let mut frame = Vec::with_capacity(builder.size(4));
        builder.write(&mut frame, &[0u8; 4]).unwrap();

        assert!(parse_udp_datagram(Linktype::ETHERNET, &frame)
            .unwrap()
            .is_none());
    }

    #[test]
    fn ignores_unsupported_linktype() {
        assert!(parse_udp_datagram(Linktype(9), &[0u8; 40]).unwrap().is_none());
    }

    #[test]
    fn empty_frame_is_slice_error() {
        let result = parse_udp_datagram(Linktype::ETHERNET, &[]);
        assert!(matches!(result, Err(UdpError::Slice(_))));
    }
}
