//! Byte builders shared by the integration tests.
#![allow(dead_code)]

pub enum Arg<'a> {
    Int(i32),
    Float(f32),
    Str(&'a str),
    Int64(i64),
    Blob(&'a [u8]),
}

/// Zero-terminated, padded OSC string.
pub fn osc_string(value: &[u8]) -> Vec<u8> {
    let mut out = value.to_vec();
    let padded = value.len() + (4 - value.len() % 4);
    out.resize(padded, 0);
    out
}

pub fn osc_blob(value: &[u8]) -> Vec<u8> {
    let mut out = (value.len() as i32).to_be_bytes().to_vec();
    out.extend_from_slice(value);
    out.resize(4 + value.len() + (4 - value.len() % 4), 0);
    out
}

/// Argument bytes only, without address or tags.
pub fn payload(args: &[Arg<'_>]) -> Vec<u8> {
    let mut out = Vec::new();
    for arg in args {
        match arg {
            Arg::Int(value) => out.extend_from_slice(&value.to_be_bytes()),
            Arg::Float(value) => out.extend_from_slice(&value.to_be_bytes()),
            Arg::Str(value) => out.extend_from_slice(&osc_string(value.as_bytes())),
            Arg::Int64(value) => out.extend_from_slice(&value.to_be_bytes()),
            Arg::Blob(value) => out.extend_from_slice(&osc_blob(value)),
        }
    }
    out
}

/// A complete message; `tags` excludes the leading comma.
pub fn message(address: &str, tags: &str, args: &[Arg<'_>]) -> Vec<u8> {
    let mut out = osc_string(address.as_bytes());
    out.extend_from_slice(&osc_string(format!(",{tags}").as_bytes()));
    out.extend_from_slice(&payload(args));
    out
}

/// A bundle holding `elements` in order.
pub fn bundle(time_tag: u64, elements: &[Vec<u8>]) -> Vec<u8> {
    let mut out = osc_string(b"#bundle");
    out.extend_from_slice(&time_tag.to_be_bytes());
    for element in elements {
        out.extend_from_slice(&(element.len() as i32).to_be_bytes());
        out.extend_from_slice(element);
    }
    out
}

/// Arguments matching `signature`: ints are 1, floats 1.1, strings "name".
pub fn args_for(signature: &str) -> Vec<Arg<'static>> {
    signature
        .chars()
        .map(|tag| match tag {
            'i' => Arg::Int(1),
            'f' => Arg::Float(1.1),
            's' => Arg::Str("name"),
            other => panic!("no test value for tag {other}"),
        })
        .collect()
}

const DISTINCT_STRINGS: [&str; 16] = [
    "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "s12", "s13",
    "s14", "s15",
];

/// Float stored at `position` by `distinct_args`.
pub fn distinct_float(position: usize) -> f32 {
    position as f32 + 0.5
}

/// String stored at `position` by `distinct_args`.
pub fn distinct_str(position: usize) -> &'static str {
    DISTINCT_STRINGS[position]
}

/// Arguments for `signature` with a different value at every position.
///
/// Floats and strings derive from their position; ints are taken from
/// `ints` in order, since int fields are often flags or enumerations with a
/// small valid range.
pub fn distinct_args(signature: &str, ints: &[i32]) -> Vec<Arg<'static>> {
    let mut ints = ints.iter().copied();
    let args = signature
        .chars()
        .enumerate()
        .map(|(position, tag)| match tag {
            'i' => Arg::Int(ints.next().expect("an int for every `i`")),
            'f' => Arg::Float(distinct_float(position)),
            's' => Arg::Str(distinct_str(position)),
            other => panic!("no test value for tag {other}"),
        })
        .collect();
    assert!(ints.next().is_none(), "more ints than `i` tags in `{signature}`");
    args
}
