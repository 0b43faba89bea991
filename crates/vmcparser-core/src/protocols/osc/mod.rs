//! OSC (Open Sound Control) packet decoding, read-only.
//!
//! `read_packet` dispatches on the first byte: `/` starts a message, `#` a
//! bundle. Messages carry an address, a `,`-prefixed type tag string and one
//! argument per tag; bundles carry a time tag and length-prefixed elements
//! that are themselves packets. All multi-byte values are big-endian and
//! strings/blobs are padded to 4 bytes.
//!
//! Decoded values borrow from the input buffer; copy what must outlive it.
//! Array tags (`[`, `]`) are rejected rather than skipped.
//!
//! Wire constants live in `layout`, bounds-checked reads in `reader`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::{OscError, ValueKind};
pub use parser::{
    Argument, Bundle, Message, Packet, is_bundle, is_message, message_len, read_packet,
    read_type_tags,
};
pub use reader::{OscReader, read_string};
