pub const ADDRESS_PREFIX: u8 = b'/';
pub const BUNDLE_PREFIX: u8 = b'#';
pub const TYPE_TAGS_PREFIX: u8 = b',';

pub const BUNDLE_ID: &[u8] = b"#bundle";

/// Strings and blobs are padded to this boundary.
pub const ALIGNMENT: usize = 4;

pub const INT_LEN: usize = 4;
pub const FLOAT_LEN: usize = 4;
pub const INT64_LEN: usize = 8;
pub const TIME_TAG_LEN: usize = 8;
pub const DOUBLE_LEN: usize = 8;
pub const CHAR_LEN: usize = 4;
pub const RGBA_LEN: usize = 4;
pub const MIDI_LEN: usize = 4;
pub const LENGTH_LEN: usize = 4;

// Standard type tags.
pub const TAG_INT: u8 = b'i';
pub const TAG_FLOAT: u8 = b'f';
pub const TAG_STRING: u8 = b's';
pub const TAG_BLOB: u8 = b'b';

// Extended (non-standard) type tags.
pub const TAG_INT64: u8 = b'h';
pub const TAG_TIME_TAG: u8 = b't';
pub const TAG_DOUBLE: u8 = b'd';
pub const TAG_SYMBOL: u8 = b'S';
pub const TAG_CHAR: u8 = b'c';
pub const TAG_RGBA: u8 = b'r';
pub const TAG_MIDI: u8 = b'm';
pub const TAG_TRUE: u8 = b'T';
pub const TAG_FALSE: u8 = b'F';
pub const TAG_NIL: u8 = b'N';
pub const TAG_INFINITUM: u8 = b'|';
pub const TAG_ARRAY_START: u8 = b'[';
pub const TAG_ARRAY_END: u8 = b']';

/// Bytes consumed by a zero-terminated string (or a blob body) of `len`
/// content bytes, including terminator and padding.
///
/// A length that is already aligned still takes a full padding word.
pub const fn padded_len(len: usize) -> usize {
    len + (ALIGNMENT - len % ALIGNMENT)
}

#[cfg(test)]
mod tests {
    use super::padded_len;

    #[test]
    fn padding_law() {
        assert_eq!(padded_len(0), 4);
        assert_eq!(padded_len(1), 4);
        assert_eq!(padded_len(3), 4);
        assert_eq!(padded_len(4), 8);
        assert_eq!(padded_len(5), 8);
        assert_eq!(padded_len(7), 8);
        assert_eq!(padded_len(8), 12);
    }
}
