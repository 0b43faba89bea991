use super::error::{OscError, ValueKind};
use super::layout;

/// Position-advancing cursor over an OSC byte view.
///
/// Reads never copy: strings and blobs are returned as sub-slices of the
/// underlying buffer. A failed read leaves the cursor where it was.
#[derive(Debug, Clone, Copy)]
pub struct OscReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> OscReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread part of the view.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Everything read so far.
    pub fn consumed(&self) -> &'a [u8] {
        &self.buf[..self.pos]
    }

    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    pub fn require(&self, kind: ValueKind, needed: usize) -> Result<(), OscError> {
        if self.remaining() < needed {
            return Err(OscError::TooShort {
                kind,
                needed,
                actual: self.remaining(),
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self, kind: ValueKind) -> Result<[u8; N], OscError> {
        self.require(kind, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    fn take_slice(&mut self, len: usize) -> &'a [u8] {
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        slice
    }

    pub fn read_int(&mut self) -> Result<i32, OscError> {
        self.take::<{ layout::INT_LEN }>(ValueKind::Int)
            .map(i32::from_be_bytes)
    }

    pub fn read_float(&mut self) -> Result<f32, OscError> {
        self.take::<{ layout::FLOAT_LEN }>(ValueKind::Float)
            .map(|bytes| f32::from_bits(u32::from_be_bytes(bytes)))
    }

    pub fn read_int64(&mut self) -> Result<i64, OscError> {
        self.take::<{ layout::INT64_LEN }>(ValueKind::Int64)
            .map(i64::from_be_bytes)
    }

    pub fn read_time_tag(&mut self) -> Result<u64, OscError> {
        self.take::<{ layout::TIME_TAG_LEN }>(ValueKind::TimeTag)
            .map(u64::from_be_bytes)
    }

    pub fn read_double(&mut self) -> Result<f64, OscError> {
        self.take::<{ layout::DOUBLE_LEN }>(ValueKind::Double)
            .map(|bytes| f64::from_bits(u64::from_be_bytes(bytes)))
    }

    pub fn read_char(&mut self) -> Result<u32, OscError> {
        self.take::<{ layout::CHAR_LEN }>(ValueKind::Char)
            .map(u32::from_be_bytes)
    }

    pub fn read_rgba(&mut self) -> Result<[u8; 4], OscError> {
        self.take::<{ layout::RGBA_LEN }>(ValueKind::Rgba)
    }

    pub fn read_midi(&mut self) -> Result<[u8; 4], OscError> {
        self.take::<{ layout::MIDI_LEN }>(ValueKind::Midi)
    }

    /// Read a big-endian length prefix, rejecting negative values.
    pub fn read_length(&mut self) -> Result<usize, OscError> {
        let mut probe = *self;
        let length = probe
            .take::<{ layout::LENGTH_LEN }>(ValueKind::Length)
            .map(i32::from_be_bytes)?;
        let length = usize::try_from(length).map_err(|_| OscError::NegativeLength { length })?;
        *self = probe;
        Ok(length)
    }

    /// Read a zero-terminated, 4-byte padded string. The terminator is not
    /// part of the returned content.
    pub fn read_string(&mut self) -> Result<&'a [u8], OscError> {
        let rest = self.rest();
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(OscError::MissingTerminator)?;
        let consumed = layout::padded_len(len);
        self.require(ValueKind::String, consumed)?;
        let value = self.take_slice(consumed);
        Ok(&value[..len])
    }

    /// Read a length-prefixed, 4-byte padded blob.
    pub fn read_blob(&mut self) -> Result<&'a [u8], OscError> {
        let mut probe = *self;
        let len = probe.read_length()?;
        let consumed = layout::padded_len(len);
        if probe.remaining() < consumed {
            return Err(OscError::BlobTooShort {
                needed: consumed,
                actual: probe.remaining(),
            });
        }
        let value = probe.take_slice(consumed);
        *self = probe;
        Ok(&value[..len])
    }
}

/// Read a single OSC string from `buf`, returning the content and the
/// remaining bytes after terminator and padding.
///
/// # Examples
/// ```
/// use vmcparser_core::osc::read_string;
///
/// let (value, rest) = read_string(b"tst\0rest").unwrap();
/// assert_eq!(value, b"tst");
/// assert_eq!(rest, b"rest");
/// ```
pub fn read_string(buf: &[u8]) -> Result<(&[u8], &[u8]), OscError> {
    let mut reader = OscReader::new(buf);
    let value = reader.read_string()?;
    Ok((value, reader.rest()))
}

#[cfg(test)]
mod tests {
    use super::{OscReader, read_string};
    use crate::protocols::osc::error::{OscError, ValueKind};

    #[test]
    fn reads_big_endian_scalars() {
        let bytes = [
            0x00, 0x00, 0x00, 0x05, // int
            0x3f, 0x8c, 0xcc, 0xcd, // float 1.1
            0x40, 0x14, 0, 0, 0, 0, 0, 0, // double 5.0
        ];
        let mut reader = OscReader::new(&bytes);
        assert_eq!(reader.read_int().unwrap(), 5);
        assert_eq!(reader.read_float().unwrap().to_bits(), 0x3f8c_cccd);
        assert_eq!(reader.read_double().unwrap(), 5.0);
        assert!(reader.is_empty());
    }

    #[test]
    fn short_read_consumes_nothing() {
        let bytes = [0u8; 6];
        let mut reader = OscReader::new(&bytes);
        let err = reader.read_int64().unwrap_err();
        assert_eq!(
            err,
            OscError::TooShort {
                kind: ValueKind::Int64,
                needed: 8,
                actual: 6
            }
        );
        assert_eq!(reader.position(), 0);
        assert!(reader.read_int().is_ok());
    }

    #[test]
    fn too_short_names_the_value_kind() {
        let bytes = [0u8; 2];
        let kinds = [
            (OscReader::new(&bytes).read_float().unwrap_err(), "float"),
            (OscReader::new(&bytes).read_char().unwrap_err(), "char"),
            (OscReader::new(&bytes).read_rgba().unwrap_err(), "rgba"),
            (OscReader::new(&bytes).read_midi().unwrap_err(), "midi"),
            (OscReader::new(&bytes).read_time_tag().unwrap_err(), "time tag"),
        ];
        for (err, name) in kinds {
            assert!(err.to_string().contains(name), "{err}");
        }
    }

    #[test]
    fn string_consumption_follows_padding_law() {
        for (len, consumed) in [(0, 4), (1, 4), (3, 4), (4, 8), (5, 8), (7, 8), (8, 12)] {
            let mut bytes = vec![b'a'; len];
            bytes.resize(consumed, 0);
            bytes.extend_from_slice(b"next");
            let mut reader = OscReader::new(&bytes);
            let value = reader.read_string().unwrap();
            assert_eq!(value.len(), len);
            assert_eq!(reader.position(), consumed, "length {len}");
            assert_eq!(reader.rest(), b"next");
        }
    }

    #[test]
    fn string_without_terminator() {
        let err = read_string(b"abcd").unwrap_err();
        assert_eq!(err, OscError::MissingTerminator);
    }

    #[test]
    fn string_with_truncated_padding() {
        let mut reader = OscReader::new(b"abcd\0");
        let err = reader.read_string().unwrap_err();
        assert!(matches!(
            err,
            OscError::TooShort {
                kind: ValueKind::String,
                needed: 8,
                actual: 5
            }
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn blob_consumption_follows_padding_law() {
        for (len, consumed) in [(0, 4), (1, 4), (3, 4), (4, 8), (5, 8), (7, 8), (8, 12)] {
            let mut bytes = (len as i32).to_be_bytes().to_vec();
            bytes.extend(std::iter::repeat_n(7u8, len));
            bytes.resize(4 + consumed, 0);
            let mut reader = OscReader::new(&bytes);
            let value = reader.read_blob().unwrap();
            assert_eq!(value, vec![7u8; len].as_slice());
            assert_eq!(reader.position(), 4 + consumed, "length {len}");
        }
    }

    #[test]
    fn blob_negative_length() {
        let bytes = (-1i32).to_be_bytes();
        let mut reader = OscReader::new(&bytes);
        assert_eq!(
            reader.read_blob().unwrap_err(),
            OscError::NegativeLength { length: -1 }
        );
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn blob_too_short() {
        let mut bytes = 8i32.to_be_bytes().to_vec();
        bytes.extend_from_slice(&[1, 2, 3]);
        let mut reader = OscReader::new(&bytes);
        assert!(matches!(
            reader.read_blob().unwrap_err(),
            OscError::BlobTooShort { needed: 12, actual: 3 }
        ));
        assert_eq!(reader.position(), 0);
    }
}
