//! Serialization of btag compounds
//!
//! A serialized stream is exactly one compound: no magic bytes, no version
//! field. All fixed-width integers are little-endian.

pub(crate) mod primitives;
mod value;

pub use value::{write_compound, write_key, write_string, write_value};

use std::io::Write;

use log::trace;

use crate::error::Result;
use crate::types::Compound;

/// Serialize a compound to a writer.
pub fn write<W: Write>(writer: &mut W, compound: &Compound<'_>) -> Result<()> {
    trace!("serializing compound with {} entries", compound.len());
    write_compound(writer, compound)
}

/// Serialize a compound to a byte vector.
pub fn to_bytes(compound: &Compound<'_>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write(&mut buf, compound)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_compound() {
        let bytes = to_bytes(&Compound::new()).unwrap();
        // just a varint zero entry count
        assert_eq!(bytes, vec![0, 0]);
    }

    #[test]
    fn test_write_to_stream() {
        let mut c = Compound::new();
        c.set_value("k", 1u8).unwrap();
        let mut buf = Vec::new();
        write(&mut buf, &c).unwrap();
        assert_eq!(buf, to_bytes(&c).unwrap());
    }
}
