//! String decoding helpers

use std::io::Read;

use crate::error::{BtagError, Result};

use super::primitives::{read_bytes, read_u8, read_varint};

fn utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| BtagError::InvalidUtf8)
}

/// Decode a compound key: one length byte, then the raw UTF-8 bytes.
pub fn read_key<R: Read>(reader: &mut R) -> Result<String> {
    let len = read_u8(reader)?;
    utf8(read_bytes(reader, u64::from(len))?)
}

/// Decode a string value: varint length, then the raw UTF-8 bytes.
pub fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    let len = read_varint(reader)?;
    utf8(read_bytes(reader, len)?)
}
