use std::convert::Infallible;

use super::error::OscError;
use super::layout;
use super::reader::OscReader;

/// A complete OSC packet: exactly one message or one bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet<'a> {
    Message(Message<'a>),
    Bundle(Bundle<'a>),
}

/// A single OSC message.
///
/// All byte fields are views into the decoded buffer. `raw` spans the
/// message from the first address byte to the end of the last argument and
/// can be forwarded verbatim; `payload` is the argument part of `raw`.
#[derive(Debug, Clone, PartialEq)]
pub struct Message<'a> {
    pub address: &'a [u8],
    /// Type tags without the leading `,`.
    pub type_tags: &'a [u8],
    pub arguments: Vec<Argument<'a>>,
    pub raw: &'a [u8],
    pub payload: &'a [u8],
}

/// An OSC bundle. Contents keep wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle<'a> {
    /// Opaque 64-bit fixed-point time tag.
    pub time_tag: u64,
    pub contents: Vec<Packet<'a>>,
}

/// One decoded message argument.
///
/// `s` and `S` both decode to `String`; `T`, `F`, `N` and `|` carry no
/// payload bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Argument<'a> {
    Int(i32),
    Float(f32),
    String(&'a [u8]),
    Blob(&'a [u8]),
    Int64(i64),
    TimeTag(u64),
    Double(f64),
    Char(u32),
    Rgba([u8; 4]),
    Midi([u8; 4]),
    True,
    False,
    Nil,
    Infinitum,
}

impl<'a> Argument<'a> {
    /// The canonical type tag for this value.
    pub fn tag(&self) -> u8 {
        match self {
            Argument::Int(_) => layout::TAG_INT,
            Argument::Float(_) => layout::TAG_FLOAT,
            Argument::String(_) => layout::TAG_STRING,
            Argument::Blob(_) => layout::TAG_BLOB,
            Argument::Int64(_) => layout::TAG_INT64,
            Argument::TimeTag(_) => layout::TAG_TIME_TAG,
            Argument::Double(_) => layout::TAG_DOUBLE,
            Argument::Char(_) => layout::TAG_CHAR,
            Argument::Rgba(_) => layout::TAG_RGBA,
            Argument::Midi(_) => layout::TAG_MIDI,
            Argument::True => layout::TAG_TRUE,
            Argument::False => layout::TAG_FALSE,
            Argument::Nil => layout::TAG_NIL,
            Argument::Infinitum => layout::TAG_INFINITUM,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match *self {
            Argument::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self {
            Argument::Float(value) => Some(value),
            _ => None,
        }
    }

    /// String content as UTF-8, `None` for other kinds or invalid UTF-8.
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Argument::String(value) => std::str::from_utf8(value).ok(),
            _ => None,
        }
    }

    /// Raw bytes of a string or blob argument.
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            Argument::String(value) | Argument::Blob(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Argument::True => Some(true),
            Argument::False => Some(false),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match *self {
            Argument::Char(code) => char::from_u32(code),
            _ => None,
        }
    }
}

impl<'a> Message<'a> {
    /// Address as UTF-8, `None` when it is not valid UTF-8.
    pub fn address_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.address).ok()
    }
}

impl<'a> Packet<'a> {
    /// Visit every message in wire order, descending into nested bundles.
    ///
    /// The first error returned by `handler` stops the walk and is returned.
    pub fn for_each_message<'p, E, F>(&'p self, mut handler: F) -> Result<(), E>
    where
        F: FnMut(&'p Message<'a>) -> Result<(), E>,
    {
        let bundle = match self {
            Packet::Message(message) => return handler(message),
            Packet::Bundle(bundle) => bundle,
        };

        let mut open = vec![bundle.contents.iter()];
        while let Some(iter) = open.last_mut() {
            match iter.next() {
                Some(Packet::Message(message)) => handler(message)?,
                Some(Packet::Bundle(inner)) => open.push(inner.contents.iter()),
                None => {
                    open.pop();
                }
            }
        }
        Ok(())
    }

    /// All messages of the packet flattened in wire order.
    pub fn messages(&self) -> Vec<&Message<'a>> {
        let mut messages = Vec::new();
        let _ = self.for_each_message(|message| {
            messages.push(message);
            Ok::<(), Infallible>(())
        });
        messages
    }
}

/// Decode one packet from the start of `buf`.
///
/// Returns the packet together with the bytes that follow it, so several
/// packets sent back to back can be read in a loop.
///
/// # Examples
/// ```
/// use vmcparser_core::osc::{Argument, Packet, read_packet};
///
/// let (packet, rest) = read_packet(b"/\0\0\0,i\0\0\0\0\0\x05").unwrap();
/// assert!(rest.is_empty());
/// let Packet::Message(message) = packet else { panic!("expected message") };
/// assert_eq!(message.arguments, vec![Argument::Int(5)]);
/// ```
///
/// # Errors
/// Returns `OscError` for empty input, unknown packet markers and any
/// structural violation inside the packet.
pub fn read_packet(buf: &[u8]) -> Result<(Packet<'_>, &[u8]), OscError> {
    let mut reader = OscReader::new(buf);
    let packet = match reader.peek() {
        None => return Err(OscError::InputEmpty),
        Some(layout::ADDRESS_PREFIX) => Packet::Message(read_message(&mut reader)?),
        Some(layout::BUNDLE_PREFIX) => Packet::Bundle(read_bundle(&mut reader)?),
        Some(marker) => return Err(OscError::InvalidPacket { marker }),
    };
    Ok((packet, reader.rest()))
}

/// Read the `,`-prefixed type tag string, returning the tags without the
/// marker and the remaining bytes.
pub fn read_type_tags(buf: &[u8]) -> Result<(&[u8], &[u8]), OscError> {
    let mut reader = OscReader::new(buf);
    let tags = read_tags(&mut reader)?;
    Ok((tags, reader.rest()))
}

/// Byte length of the message at the start of `buf`.
///
/// Walks the arguments the way `read_packet` does but keeps none of them,
/// so a message can be split off a buffer without allocating.
///
/// # Examples
/// ```
/// use vmcparser_core::osc::message_len;
///
/// let buf = b"/a\0\0,s\0\0hi\0\0/b\0\0,\0\0\0";
/// assert_eq!(message_len(buf).unwrap(), 12);
/// ```
pub fn message_len(buf: &[u8]) -> Result<usize, OscError> {
    let mut reader = OscReader::new(buf);
    match reader.peek() {
        None => return Err(OscError::InputEmpty),
        Some(layout::ADDRESS_PREFIX) => {}
        Some(marker) => return Err(OscError::InvalidPacket { marker }),
    }
    reader.read_string()?;
    for &tag in read_tags(&mut reader)? {
        read_argument(&mut reader, tag)?;
    }
    Ok(reader.position())
}

pub fn is_message(buf: &[u8]) -> bool {
    buf.first() == Some(&layout::ADDRESS_PREFIX)
}

pub fn is_bundle(buf: &[u8]) -> bool {
    buf.first() == Some(&layout::BUNDLE_PREFIX)
}

pub(crate) fn read_tags<'a>(reader: &mut OscReader<'a>) -> Result<&'a [u8], OscError> {
    if reader.peek() != Some(layout::TYPE_TAGS_PREFIX) {
        return Err(OscError::TypeTagsStartMissing);
    }
    let tags = reader.read_string()?;
    Ok(&tags[1..])
}

fn read_message<'a>(reader: &mut OscReader<'a>) -> Result<Message<'a>, OscError> {
    let start = *reader;
    let address = reader.read_string()?;
    let type_tags = read_tags(reader)?;
    let payload_offset = reader.position() - start.position();

    let mut arguments = Vec::with_capacity(type_tags.len());
    for &tag in type_tags {
        arguments.push(read_argument(reader, tag)?);
    }

    let raw = &start.rest()[..reader.position() - start.position()];
    Ok(Message {
        address,
        type_tags,
        arguments,
        raw,
        payload: &raw[payload_offset..],
    })
}

fn read_argument<'a>(reader: &mut OscReader<'a>, tag: u8) -> Result<Argument<'a>, OscError> {
    let argument = match tag {
        layout::TAG_INT => Argument::Int(reader.read_int()?),
        layout::TAG_FLOAT => Argument::Float(reader.read_float()?),
        layout::TAG_STRING | layout::TAG_SYMBOL => Argument::String(reader.read_string()?),
        layout::TAG_BLOB => Argument::Blob(reader.read_blob()?),
        layout::TAG_INT64 => Argument::Int64(reader.read_int64()?),
        layout::TAG_TIME_TAG => Argument::TimeTag(reader.read_time_tag()?),
        layout::TAG_DOUBLE => Argument::Double(reader.read_double()?),
        layout::TAG_CHAR => Argument::Char(reader.read_char()?),
        layout::TAG_RGBA => Argument::Rgba(reader.read_rgba()?),
        layout::TAG_MIDI => Argument::Midi(reader.read_midi()?),
        layout::TAG_TRUE => Argument::True,
        layout::TAG_FALSE => Argument::False,
        layout::TAG_NIL => Argument::Nil,
        layout::TAG_INFINITUM => Argument::Infinitum,
        layout::TAG_ARRAY_START | layout::TAG_ARRAY_END => {
            return Err(OscError::ArraysNotSupported);
        }
        other => {
            return Err(OscError::UnknownTypeTag {
                tag: char::from(other),
            });
        }
    };
    Ok(argument)
}

fn read_bundle_header<'a>(reader: &mut OscReader<'a>) -> Result<Bundle<'a>, OscError> {
    let ident = reader.read_string()?;
    if ident != layout::BUNDLE_ID {
        return Err(OscError::InvalidBundleIdentifier);
    }
    let time_tag = reader.read_time_tag()?;
    Ok(Bundle {
        time_tag,
        contents: Vec::new(),
    })
}

// Nested bundles are tracked on an explicit stack rather than by recursion,
// so nesting depth is bounded by heap memory. An inner bundle keeps reading
// elements while more than a length prefix remains in the buffer, then hands
// control back to its parent.
fn read_bundle<'a>(reader: &mut OscReader<'a>) -> Result<Bundle<'a>, OscError> {
    let mut current = read_bundle_header(reader)?;
    let mut parents: Vec<Bundle<'a>> = Vec::new();

    loop {
        if reader.remaining() > layout::LENGTH_LEN {
            let length = reader.read_length()?;
            if reader.remaining() < length {
                return Err(OscError::ElementTooShort {
                    needed: length,
                    actual: reader.remaining(),
                });
            }

            match reader.peek() {
                Some(layout::ADDRESS_PREFIX) => {
                    let message = read_message(reader)?;
                    current.contents.push(Packet::Message(message));
                }
                Some(layout::BUNDLE_PREFIX) => {
                    let inner = read_bundle_header(reader)?;
                    parents.push(std::mem::replace(&mut current, inner));
                }
                Some(marker) => return Err(OscError::InvalidPacket { marker }),
                None => return Err(OscError::InputEmpty),
            }
            continue;
        }

        match parents.pop() {
            Some(mut parent) => {
                parent.contents.push(Packet::Bundle(current));
                current = parent;
            }
            None => return Ok(current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Argument, Packet, is_bundle, is_message, message_len, read_packet, read_type_tags,
    };
    use crate::protocols::osc::error::{OscError, ValueKind};

    fn message(input: &[u8]) -> super::Message<'_> {
        let (packet, rest) = read_packet(input).unwrap();
        assert!(rest.is_empty());
        match packet {
            Packet::Message(message) => message,
            Packet::Bundle(_) => panic!("expected message"),
        }
    }

    #[test]
    fn parse_each_argument_kind() {
        let cases: &[(&[u8], Argument<'_>)] = &[
            (b"/\0\0\0,i\0\0\0\0\0\x05", Argument::Int(5)),
            (b"/\0\0\0,f\0\0\x40\xa0\0\0", Argument::Float(5.0)),
            (b"/\0\0\0,s\0\0tst\0", Argument::String(b"tst")),
            (b"/\0\0\0,S\0\0tst\0", Argument::String(b"tst")),
            (b"/\0\0\0,b\0\0\0\0\0\x03\x01\x02\x03\0", Argument::Blob(&[1, 2, 3])),
            (b"/\0\0\0,h\0\0\0\0\0\0\0\0\0\x05", Argument::Int64(5)),
            (b"/\0\0\0,t\0\0\0\0\0\0\0\0\0\x05", Argument::TimeTag(5)),
            (b"/\0\0\0,d\0\0\x40\x14\0\0\0\0\0\0", Argument::Double(5.0)),
            (b"/\0\0\0,c\0\0\0\0\0a", Argument::Char(u32::from('a'))),
            (b"/\0\0\0,r\0\0\x01\x02\x03\x04", Argument::Rgba([1, 2, 3, 4])),
            (b"/\0\0\0,m\0\0\x01\x02\x03\x04", Argument::Midi([1, 2, 3, 4])),
            (b"/\0\0\0,T\0\0", Argument::True),
            (b"/\0\0\0,F\0\0", Argument::False),
            (b"/\0\0\0,N\0\0", Argument::Nil),
            (b"/\0\0\0,|\0\0", Argument::Infinitum),
        ];
        for (input, expected) in cases {
            let parsed = message(input);
            assert_eq!(parsed.address, b"/");
            assert_eq!(parsed.arguments, vec![*expected]);
            assert_eq!(parsed.raw, *input);
        }
    }

    #[test]
    fn raw_and_payload_spans() {
        let input = b"/a\0\0,if\0\0\0\0\x01\x3f\x80\0\0trailing";
        let (packet, rest) = read_packet(input).unwrap();
        assert_eq!(rest, b"trailing");
        let Packet::Message(message) = packet else {
            panic!("expected message");
        };
        assert_eq!(message.type_tags, b"if");
        assert_eq!(message.raw, &input[..input.len() - 8]);
        assert_eq!(message.payload, &input[8..16]);
    }

    #[test]
    fn empty_input() {
        assert_eq!(read_packet(b"").unwrap_err(), OscError::InputEmpty);
    }

    #[test]
    fn invalid_packet_marker() {
        assert_eq!(
            read_packet(b"x\0\0\0").unwrap_err(),
            OscError::InvalidPacket { marker: b'x' }
        );
    }

    #[test]
    fn missing_type_tags() {
        assert_eq!(
            read_packet(b"/a\0\0i\0\0\0").unwrap_err(),
            OscError::TypeTagsStartMissing
        );
        assert_eq!(
            read_packet(b"/a\0\0").unwrap_err(),
            OscError::TypeTagsStartMissing
        );
    }

    #[test]
    fn arrays_are_rejected() {
        assert_eq!(
            read_packet(b"/\0\0\0,[i]\0\0\0\0\0\0\x01").unwrap_err(),
            OscError::ArraysNotSupported
        );
    }

    #[test]
    fn unknown_type_tag() {
        assert_eq!(
            read_packet(b"/\0\0\0,x\0\0").unwrap_err(),
            OscError::UnknownTypeTag { tag: 'x' }
        );
    }

    #[test]
    fn argument_too_short_stops_decoding() {
        let err = read_packet(b"/\0\0\0,ii\0\0\0\0\x01").unwrap_err();
        assert!(matches!(
            err,
            OscError::TooShort {
                kind: ValueKind::Int,
                ..
            }
        ));
    }

    #[test]
    fn bundle_with_two_messages() {
        let mut input = b"#bundle\0".to_vec();
        input.extend_from_slice(&7u64.to_be_bytes());
        for body in [&b"/a\0\0,i\0\0\0\0\0\x01"[..], &b"/b\0\0,\0\0\0"[..]] {
            input.extend_from_slice(&(body.len() as i32).to_be_bytes());
            input.extend_from_slice(body);
        }
        let (packet, rest) = read_packet(&input).unwrap();
        assert!(rest.is_empty());
        let Packet::Bundle(bundle) = &packet else {
            panic!("expected bundle");
        };
        assert_eq!(bundle.time_tag, 7);
        let addresses: Vec<_> = packet.messages().iter().map(|m| m.address).collect();
        assert_eq!(addresses, vec![&b"/a"[..], &b"/b"[..]]);
    }

    #[test]
    fn bundle_identifier_must_match() {
        let mut input = b"#bundlx\0".to_vec();
        input.extend_from_slice(&0u64.to_be_bytes());
        assert_eq!(
            read_packet(&input).unwrap_err(),
            OscError::InvalidBundleIdentifier
        );
    }

    #[test]
    fn bundle_element_too_short() {
        let mut input = b"#bundle\0".to_vec();
        input.extend_from_slice(&0u64.to_be_bytes());
        input.extend_from_slice(&64i32.to_be_bytes());
        input.extend_from_slice(b"/a\0\0,\0\0\0");
        assert_eq!(
            read_packet(&input).unwrap_err(),
            OscError::ElementTooShort {
                needed: 64,
                actual: 8
            }
        );
    }

    #[test]
    fn bundle_negative_element_length() {
        let mut input = b"#bundle\0".to_vec();
        input.extend_from_slice(&0u64.to_be_bytes());
        input.extend_from_slice(&(-4i32).to_be_bytes());
        input.extend_from_slice(b"/a\0\0,\0\0\0");
        assert_eq!(
            read_packet(&input).unwrap_err(),
            OscError::NegativeLength { length: -4 }
        );
    }

    #[test]
    fn for_each_message_stops_on_error() {
        let mut input = b"#bundle\0".to_vec();
        input.extend_from_slice(&0u64.to_be_bytes());
        for _ in 0..3 {
            let body = b"/a\0\0,\0\0\0";
            input.extend_from_slice(&(body.len() as i32).to_be_bytes());
            input.extend_from_slice(body);
        }
        let (packet, _) = read_packet(&input).unwrap();
        let mut seen = 0;
        let result = packet.for_each_message(|_| {
            seen += 1;
            if seen == 2 { Err("stop") } else { Ok(()) }
        });
        assert_eq!(result, Err("stop"));
        assert_eq!(seen, 2);
    }

    #[test]
    fn type_tag_helpers() {
        let (tags, rest) = read_type_tags(b",sf\0xyz").unwrap();
        assert_eq!(tags, b"sf");
        assert_eq!(rest, b"xyz");
        assert_eq!(
            read_type_tags(b"sf\0\0").unwrap_err(),
            OscError::TypeTagsStartMissing
        );
        assert!(is_message(b"/a"));
        assert!(is_bundle(b"#bundle"));
        assert!(!is_bundle(b""));
    }

    #[test]
    fn message_len_matches_read_packet() {
        let mut buf = b"/a\0\0,ifs\0\0\0\0\0\0\0\x07\x3f\x80\0\0ok\0\0".to_vec();
        let first = buf.len();
        buf.extend_from_slice(b"/b\0\0,\0\0\0");

        assert_eq!(message_len(&buf).unwrap(), first);
        let (packet, rest) = read_packet(&buf).unwrap();
        assert_eq!(buf.len() - rest.len(), first);
        let Packet::Message(message) = packet else {
            panic!("expected message");
        };
        assert_eq!(message.raw.len(), first);
    }

    #[test]
    fn message_len_reports_structural_errors() {
        assert_eq!(message_len(b"").unwrap_err(), OscError::InputEmpty);
        assert_eq!(
            message_len(b"#bundle\0").unwrap_err(),
            OscError::InvalidPacket { marker: b'#' }
        );
        assert!(matches!(
            message_len(b"/a\0\0,i\0\0\0\0").unwrap_err(),
            OscError::TooShort { .. }
        ));
    }

    #[test]
    fn argument_accessors() {
        assert_eq!(Argument::Int(3).as_int(), Some(3));
        assert_eq!(Argument::Int(3).as_float(), None);
        assert_eq!(Argument::String(b"abc").as_str(), Some("abc"));
        assert_eq!(Argument::Blob(&[1]).as_bytes(), Some(&[1u8][..]));
        assert_eq!(Argument::True.as_bool(), Some(true));
        assert_eq!(Argument::Char(0x41).as_char(), Some('A'));
        assert_eq!(Argument::Nil.tag(), b'N');
    }
}
