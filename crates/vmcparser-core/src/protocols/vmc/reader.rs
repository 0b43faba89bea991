use crate::protocols::osc::{Argument, OscReader, read_string};

use super::error::VmcError;
use super::layout::FIXED_FIELD_LEN;
use super::types::{Vec3, Vec4, VmcEnum};

/// Sequential access to the fields of one VMC message.
///
/// Record builders are written once against this trait and fed either from
/// raw payload bytes or from already decoded OSC arguments.
pub(crate) trait FieldSource<'a> {
    fn int(&mut self) -> Result<i32, VmcError>;

    fn float(&mut self) -> Result<f32, VmcError>;

    fn string(&mut self, field: &'static str) -> Result<&'a str, VmcError>;

    /// Integer flag, set only when exactly `1`.
    fn flag(&mut self) -> Result<bool, VmcError> {
        Ok(self.int()? == 1)
    }

    fn enumeration<E: VmcEnum>(&mut self) -> Result<E, VmcError> {
        let value = self.int()?;
        E::from_raw(value).ok_or(VmcError::InvalidEnumValue {
            field: E::FIELD,
            value,
        })
    }

    fn vec3(&mut self) -> Result<Vec3, VmcError> {
        Ok(Vec3::new(self.float()?, self.float()?, self.float()?))
    }

    fn vec4(&mut self) -> Result<Vec4, VmcError> {
        Ok(Vec4::new(
            self.float()?,
            self.float()?,
            self.float()?,
            self.float()?,
        ))
    }
}

/// Fields read straight from payload bytes that follow the type tags.
pub(crate) struct PayloadFields<'a> {
    reader: OscReader<'a>,
}

impl<'a> PayloadFields<'a> {
    pub(crate) fn new(payload: &'a [u8]) -> Self {
        Self {
            reader: OscReader::new(payload),
        }
    }
}

impl<'a> FieldSource<'a> for PayloadFields<'a> {
    fn int(&mut self) -> Result<i32, VmcError> {
        Ok(self.reader.read_int()?)
    }

    fn float(&mut self) -> Result<f32, VmcError> {
        Ok(self.reader.read_float()?)
    }

    fn string(&mut self, field: &'static str) -> Result<&'a str, VmcError> {
        let bytes = self.reader.read_string()?;
        std::str::from_utf8(bytes).map_err(|_| VmcError::InvalidUtf8 { field })
    }
}

/// Fields taken from the arguments of a decoded OSC message.
pub(crate) struct ArgumentFields<'m, 'a> {
    arguments: &'m [Argument<'a>],
    index: usize,
}

impl<'m, 'a> ArgumentFields<'m, 'a> {
    pub(crate) fn new(arguments: &'m [Argument<'a>]) -> Self {
        Self {
            arguments,
            index: 0,
        }
    }

    fn next(&mut self) -> (usize, Option<Argument<'a>>) {
        let index = self.index;
        self.index += 1;
        (index, self.arguments.get(index).copied())
    }
}

impl<'a> FieldSource<'a> for ArgumentFields<'_, 'a> {
    fn int(&mut self) -> Result<i32, VmcError> {
        match self.next() {
            (_, Some(Argument::Int(value))) => Ok(value),
            (index, _) => Err(VmcError::ArgumentMismatch { index }),
        }
    }

    fn float(&mut self) -> Result<f32, VmcError> {
        match self.next() {
            (_, Some(Argument::Float(value))) => Ok(value),
            (index, _) => Err(VmcError::ArgumentMismatch { index }),
        }
    }

    fn string(&mut self, field: &'static str) -> Result<&'a str, VmcError> {
        match self.next() {
            (_, Some(Argument::String(bytes))) => {
                std::str::from_utf8(bytes).map_err(|_| VmcError::InvalidUtf8 { field })
            }
            (index, _) => Err(VmcError::ArgumentMismatch { index }),
        }
    }
}

/// Payload length implied by `signature` for this payload.
///
/// `i` and `f` fields are fixed width; `s` fields are located by scanning
/// for their terminator. When the fixed fields already run past the end of
/// the payload the scan stops and the returned length is a lower bound.
pub(crate) fn expected_len(signature: &str, payload: &[u8]) -> Result<usize, VmcError> {
    let mut expected = 0;
    for tag in signature.bytes() {
        if tag != b's' {
            expected += FIXED_FIELD_LEN;
            continue;
        }
        let Some(rest) = payload.get(expected..) else {
            break;
        };
        let (_, after) = read_string(rest)?;
        expected = payload.len() - after.len();
    }
    Ok(expected)
}
