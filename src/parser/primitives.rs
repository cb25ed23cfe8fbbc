//! Primitive binary decoders
//!
//! Counterparts to `writer::primitives`. A short read anywhere surfaces as
//! `TruncatedStream`, never as zero-filled data.

use std::io::Read;

use crate::error::{BtagError, Result};

/// Upper bound on up-front buffer allocation for length-prefixed payloads.
/// Lengths come from the stream and cannot be trusted until the bytes are
/// actually there.
pub(crate) const ALLOC_CAP: usize = 4096;

/// Read exactly `n` bytes into a fresh buffer.
///
/// The length is stream-controlled, so the buffer grows while reading rather
/// than being allocated up front; an overstated length runs out of stream and
/// fails with `TruncatedStream` instead of exhausting memory.
pub fn read_bytes<R: Read>(reader: &mut R, n: u64) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(n.min(ALLOC_CAP as u64) as usize);
    let got = reader
        .by_ref()
        .take(n)
        .read_to_end(&mut buf)
        .map_err(BtagError::from_read)?;
    if (got as u64) < n {
        return Err(BtagError::TruncatedStream);
    }
    Ok(buf)
}

pub fn read_u8<R: Read>(reader: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf).map_err(BtagError::from_read)?;
    Ok(buf[0])
}

pub fn read_u16<R: Read>(reader: &mut R) -> Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf).map_err(BtagError::from_read)?;
    Ok(u16::from_le_bytes(buf))
}

pub fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(BtagError::from_read)?;
    Ok(u32::from_le_bytes(buf))
}

pub fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf).map_err(BtagError::from_read)?;
    Ok(u64::from_le_bytes(buf))
}

/// Decode a variable-width integer: selector byte, then the fixed-width
/// payload of the indicated size, widened to 64 bits.
///
/// Decoding is driven entirely by the selector, so any encoder boundary
/// policy decodes correctly; selectors above 3 are an error.
pub fn read_varint<R: Read>(reader: &mut R) -> Result<u64> {
    match read_u8(reader)? {
        0 => Ok(u64::from(read_u8(reader)?)),
        1 => Ok(u64::from(read_u16(reader)?)),
        2 => Ok(u64::from(read_u32(reader)?)),
        3 => read_u64(reader),
        sel => Err(BtagError::InvalidWidthSelector(sel)),
    }
}

pub fn read_f32<R: Read>(reader: &mut R) -> Result<f32> {
    Ok(f32::from_bits(read_u32(reader)?))
}

pub fn read_f64<R: Read>(reader: &mut R) -> Result<f64> {
    Ok(f64::from_bits(read_u64(reader)?))
}
