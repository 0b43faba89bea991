use thiserror::Error;

use crate::protocols::osc::OscError;

/// Errors returned by VMC message decoding.
///
/// Unknown and filtered addresses are not errors; see `Decoded`.
///
/// # Examples
/// ```
/// use vmcparser_core::vmc::{AddressFilter, VmcError, decode_message};
///
/// let err = decode_message(b"/VMC/Ext/T", b"i", &[0, 0, 0, 1], &AddressFilter::all())
///     .unwrap_err();
/// assert!(matches!(err, VmcError::InvalidTypeTags { .. }));
/// assert_eq!(err.to_string(), "invalid type tags `i`, expected `f`");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmcError {
    #[error(transparent)]
    Osc(#[from] OscError),
    #[error("invalid type tags `{found}`, expected {}", format_signatures(.expected))]
    InvalidTypeTags {
        found: String,
        expected: &'static [&'static str],
    },
    #[error("invalid buffer length {found}, expected {expected}")]
    InvalidBufferLength { found: usize, expected: usize },
    #[error("invalid value for {field}: {value}")]
    InvalidEnumValue { field: &'static str, value: i32 },
    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },
    #[error("argument {index} does not match its type tag")]
    ArgumentMismatch { index: usize },
}

impl VmcError {
    /// Stable identifier used in analysis reports. Structural string errors
    /// keep their OSC code.
    pub fn code(&self) -> &'static str {
        match self {
            VmcError::Osc(err) => err.code(),
            VmcError::InvalidTypeTags { .. } => "VMC-INVALID-TYPE-TAGS",
            VmcError::InvalidBufferLength { .. } => "VMC-INVALID-BUFFER-LENGTH",
            VmcError::InvalidEnumValue { .. } => "VMC-INVALID-ENUM-VALUE",
            VmcError::InvalidUtf8 { .. } => "VMC-INVALID-UTF8",
            VmcError::ArgumentMismatch { .. } => "VMC-ARGUMENT-MISMATCH",
        }
    }
}

fn format_signatures(signatures: &[&str]) -> String {
    signatures
        .iter()
        .map(|signature| match *signature {
            "" => "none".to_string(),
            signature => format!("`{signature}`"),
        })
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::VmcError;
    use crate::protocols::osc::OscError;

    #[test]
    fn lists_every_accepted_signature() {
        let err = VmcError::InvalidTypeTags {
            found: "ii".to_string(),
            expected: &["i", "iii", "iiii"],
        };
        assert_eq!(
            err.to_string(),
            "invalid type tags `ii`, expected `i` or `iii` or `iiii`"
        );
    }

    #[test]
    fn codes_keep_osc_origin() {
        assert_eq!(
            VmcError::from(OscError::MissingTerminator).code(),
            "OSC-MISSING-TERMINATOR"
        );
        assert_eq!(
            VmcError::InvalidUtf8 { field: "name" }.code(),
            "VMC-INVALID-UTF8"
        );
    }

    #[test]
    fn empty_signature_reads_as_none() {
        let err = VmcError::InvalidTypeTags {
            found: "f".to_string(),
            expected: &[""],
        };
        assert_eq!(err.to_string(), "invalid type tags `f`, expected none");
    }
}
