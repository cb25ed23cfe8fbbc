//! Primitive binary encoders
//!
//! All fixed-width integers go out little-endian regardless of host byte
//! order.

use std::io::Write;

use crate::error::Result;

pub fn write_u8<W: Write>(writer: &mut W, v: u8) -> Result<()> {
    writer.write_all(&[v])?;
    Ok(())
}

pub fn write_u16<W: Write>(writer: &mut W, v: u16) -> Result<()> {
    writer.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_u32<W: Write>(writer: &mut W, v: u32) -> Result<()> {
    writer.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_u64<W: Write>(writer: &mut W, v: u64) -> Result<()> {
    writer.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Encode a variable-width integer: a selector byte (0..=3) followed by the
/// narrowest of a u8/u16/u32/u64 payload that holds the value.
///
/// Boundaries are inclusive: 255 still fits the 1-byte payload, 65535 the
/// 2-byte one, and so on.
pub fn write_varint<W: Write>(writer: &mut W, v: u64) -> Result<()> {
    if v <= u64::from(u8::MAX) {
        write_u8(writer, 0)?;
        write_u8(writer, v as u8)
    } else if v <= u64::from(u16::MAX) {
        write_u8(writer, 1)?;
        write_u16(writer, v as u16)
    } else if v <= u64::from(u32::MAX) {
        write_u8(writer, 2)?;
        write_u32(writer, v as u32)
    } else {
        write_u8(writer, 3)?;
        write_u64(writer, v)
    }
}

/// Canonical quiet-NaN bit pattern: sign preserved, exponent saturated, top
/// mantissa bit set, rest of the mantissa zero.
fn canonical_f32_bits(v: f32) -> u32 {
    if v.is_nan() {
        (v.to_bits() & 0x8000_0000) | 0x7FC0_0000
    } else {
        v.to_bits()
    }
}

fn canonical_f64_bits(v: f64) -> u64 {
    if v.is_nan() {
        (v.to_bits() & 0x8000_0000_0000_0000) | 0x7FF8_0000_0000_0000
    } else {
        v.to_bits()
    }
}

/// Encode an f32 as its IEEE-754 binary32 bit pattern, written as a
/// fixed-width u32. NaN is canonicalized to the quiet form.
pub fn write_f32<W: Write>(writer: &mut W, v: f32) -> Result<()> {
    write_u32(writer, canonical_f32_bits(v))
}

/// Encode an f64 as its IEEE-754 binary64 bit pattern, written as a
/// fixed-width u64. NaN is canonicalized to the quiet form.
pub fn write_f64<W: Write>(writer: &mut W, v: f64) -> Result<()> {
    write_u64(writer, canonical_f64_bits(v))
}
