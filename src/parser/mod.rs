//! Binary decoder for the btag format
//!
//! Decoding is strict: unknown discriminants, duplicate keys, invalid UTF-8
//! and short reads all surface as errors, and an error discards the partial
//! compound rather than returning it.

pub(crate) mod primitives;
mod string;
mod value;

pub use string::{read_key, read_string};
pub use value::{MAX_DECODE_DEPTH, read_compound, read_value};

use std::io::Read;

use log::trace;

use crate::error::Result;
use crate::types::Compound;

/// Decode one compound from a reader.
///
/// The result owns all of its data (`Compound<'static>`).
pub fn parse<R: Read>(reader: &mut R) -> Result<Compound<'static>> {
    let compound = read_compound(reader)?;
    trace!("deserialized compound with {} entries", compound.len());
    Ok(compound)
}

/// Decode one compound from a byte slice.
pub fn from_bytes(bytes: &[u8]) -> Result<Compound<'static>> {
    let mut reader = bytes;
    parse(&mut reader)
}
