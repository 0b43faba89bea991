use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::{debug, trace};

use crate::protocols::osc::{is_message, message_len, read_packet, read_string};
use crate::protocols::vmc::{AddressFilter, Decoded, VmcMessage, decode_message, read_message};

use super::config::ReceiverConfig;
use super::error::TransportError;

/// VMC receiver over a UDP socket with a reusable read buffer.
///
/// # Examples
/// ```no_run
/// use vmcparser_core::transport::{ReceiverConfig, UdpReceiver};
/// use vmcparser_core::vmc::AddressFilter;
///
/// let mut receiver = UdpReceiver::bind("0.0.0.0:39539", ReceiverConfig::default())?;
/// let filter = AddressFilter::new(["/VMC/Ext/Root/Pos", "/VMC/Ext/Bone/Pos"]);
/// loop {
///     match receiver.recv(&filter, |peer, _raw, message| {
///         println!("{peer}: {}", message.kind());
///         Ok::<(), std::io::Error>(())
///     }) {
///         Ok(_) => {}
///         Err(err) if err.is_timeout() => continue,
///         Err(err) => return Err(err.into()),
///     }
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct UdpReceiver {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl UdpReceiver {
    /// Bind a new socket and wrap it.
    pub fn bind<A: ToSocketAddrs>(addr: A, config: ReceiverConfig) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(addr)?;
        Self::new(socket, config)
    }

    /// Wrap an existing socket. The socket's read timeout is replaced by the
    /// configured one.
    pub fn new(socket: UdpSocket, config: ReceiverConfig) -> Result<Self, TransportError> {
        if config.buffer_size == 0 {
            return Err(TransportError::Config("buffer size must be non-zero"));
        }
        if config.read_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(TransportError::Config("read timeout must be non-zero"));
        }
        socket.set_read_timeout(config.read_timeout)?;
        Ok(Self {
            socket,
            buf: vec![0; config.buffer_size],
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive one datagram and hand every VMC message in it to `handler`.
    ///
    /// A datagram may hold several back-to-back packets and bundles may nest;
    /// messages are visited in wire order. Unknown and filtered addresses are
    /// skipped. `raw` is the complete OSC message the record was decoded
    /// from. An error from `handler` stops processing of the datagram.
    ///
    /// With a non-empty filter, unbundled messages are split off by length
    /// and checked against the filter before their type tags are read, so
    /// rejected messages cost no argument decoding.
    ///
    /// Returns the number of messages passed to `handler`.
    ///
    /// # Errors
    /// `Timeout` when the read deadline passes without data; decode errors
    /// for malformed packets; `Handler` when the callback fails.
    pub fn recv<F, E>(&mut self, filter: &AddressFilter, mut handler: F) -> Result<usize, TransportError>
    where
        F: FnMut(SocketAddr, &[u8], &VmcMessage<'_>) -> Result<(), E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (len, peer) = match self.socket.recv_from(&mut self.buf) {
            Ok(read) => read,
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Err(TransportError::Timeout);
            }
            Err(err) => return Err(err.into()),
        };
        trace!(%peer, len, "datagram received");

        let mut handled = 0;
        let mut datagram = &self.buf[..len];
        while !datagram.is_empty() {
            if !filter.is_empty() && is_message(datagram) {
                let (raw, rest) = datagram.split_at(message_len(datagram)?);
                datagram = rest;
                let decoded = read_message(raw, filter)?;
                handled += deliver(peer, raw, decoded, &mut handler)?;
                continue;
            }

            let (packet, rest) = read_packet(datagram)?;
            datagram = rest;
            packet.for_each_message(|message| {
                let decoded =
                    decode_message(message.address, message.type_tags, message.payload, filter)?;
                handled += deliver(peer, message.raw, decoded, &mut handler)?;
                Ok::<(), TransportError>(())
            })?;
        }
        Ok(handled)
    }
}

fn deliver<F, E>(
    peer: SocketAddr,
    raw: &[u8],
    decoded: Decoded<'_>,
    handler: &mut F,
) -> Result<usize, TransportError>
where
    F: FnMut(SocketAddr, &[u8], &VmcMessage<'_>) -> Result<(), E>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match decoded {
        Decoded::Message(vmc) => {
            handler(peer, raw, &vmc).map_err(|err| TransportError::Handler(err.into()))?;
            return Ok(1);
        }
        Decoded::Unknown => debug!(
            %peer,
            address = %String::from_utf8_lossy(address_of(raw)),
            "skipping unknown address"
        ),
        Decoded::Filtered => trace!(
            %peer,
            address = %String::from_utf8_lossy(address_of(raw)),
            "skipping filtered address"
        ),
    }
    Ok(0)
}

fn address_of(raw: &[u8]) -> &[u8] {
    read_string(raw).map_or(raw, |(address, _)| address)
}
