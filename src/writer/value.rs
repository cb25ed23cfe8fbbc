//! Value serialization

use std::io::Write;

use crate::error::{BtagError, Result};
use crate::types::{Compound, MAX_KEY_LEN, Tag};

use super::primitives::{
    write_f32, write_f64, write_u8, write_u16, write_u32, write_u64, write_varint,
};

/// Write a compound key: one length byte followed by the raw UTF-8 bytes.
pub fn write_key<W: Write>(writer: &mut W, key: &str) -> Result<()> {
    let bytes = key.as_bytes();
    if bytes.len() > MAX_KEY_LEN {
        return Err(BtagError::KeyTooLong { len: bytes.len() });
    }
    write_u8(writer, bytes.len() as u8)?;
    writer.write_all(bytes)?;
    Ok(())
}

/// Write a string value: varint length followed by the raw UTF-8 bytes.
pub fn write_string<W: Write>(writer: &mut W, s: &str) -> Result<()> {
    let bytes = s.as_bytes();
    write_varint(writer, bytes.len() as u64)?;
    writer.write_all(bytes)?;
    Ok(())
}

/// Write an array payload: varint length, then each element.
fn write_array<W, T, F>(writer: &mut W, data: &[T], encode: F) -> Result<()>
where
    W: Write,
    F: Fn(&mut W, &T) -> Result<()>,
{
    write_varint(writer, data.len() as u64)?;
    for item in data {
        encode(writer, item)?;
    }
    Ok(())
}

/// Write a value payload. The discriminant byte is written by the compound
/// entry loop, not here.
pub fn write_value<W: Write>(writer: &mut W, tag: &Tag<'_>) -> Result<()> {
    match tag {
        Tag::U8(v) => write_u8(writer, *v),
        Tag::U16(v) => write_u16(writer, *v),
        Tag::U32(v) => write_u32(writer, *v),
        Tag::U64(v) => write_u64(writer, *v),
        Tag::F32(v) => write_f32(writer, *v),
        Tag::F64(v) => write_f64(writer, *v),
        Tag::Str(s) => write_string(writer, s),
        Tag::Compound(c) => write_compound(writer, c),
        Tag::StrArr(v) => write_array(writer, v, |w, s| write_string(w, s)),
        Tag::U8Arr(v) => write_array(writer, v, |w, x| write_u8(w, *x)),
        Tag::U16Arr(v) => write_array(writer, v, |w, x| write_u16(w, *x)),
        Tag::U32Arr(v) => write_array(writer, v, |w, x| write_u32(w, *x)),
        Tag::U64Arr(v) => write_array(writer, v, |w, x| write_u64(w, *x)),
        Tag::F32Arr(v) => write_array(writer, v, |w, x| write_f32(w, *x)),
        Tag::F64Arr(v) => write_array(writer, v, |w, x| write_f64(w, *x)),
    }
}

/// Write a compound payload: varint entry count, then per entry in insertion
/// order the key, the discriminant byte and the value payload.
pub fn write_compound<W: Write>(writer: &mut W, compound: &Compound<'_>) -> Result<()> {
    write_varint(writer, compound.len() as u64)?;
    for (key, tag) in compound.iter() {
        write_key(writer, key)?;
        write_u8(writer, tag.tag_type() as u8)?;
        write_value(writer, tag)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagType;

    #[test]
    fn test_write_key() {
        let mut buf = Vec::new();
        write_key(&mut buf, "ab").unwrap();
        assert_eq!(buf, vec![2, b'a', b'b']);
    }

    #[test]
    fn test_write_key_too_long() {
        let mut buf = Vec::new();
        let key = "x".repeat(300);
        assert!(matches!(
            write_key(&mut buf, &key),
            Err(BtagError::KeyTooLong { len: 300 })
        ));
    }

    #[test]
    fn test_write_empty_string() {
        let mut buf = Vec::new();
        write_string(&mut buf, "").unwrap();
        // lone varint zero, no payload
        assert_eq!(buf, vec![0, 0]);
    }

    #[test]
    fn test_write_empty_array() {
        let mut buf = Vec::new();
        write_value(&mut buf, &Tag::U32Arr(vec![].into())).unwrap();
        assert_eq!(buf, vec![0, 0]);
    }

    #[test]
    fn test_scalar_payload_layout() {
        let mut buf = Vec::new();
        write_value(&mut buf, &Tag::U16(0x1234)).unwrap();
        assert_eq!(buf, vec![0x34, 0x12]);
    }

    #[test]
    fn test_entry_layout() {
        let mut c = Compound::new();
        c.set_value("n", 0xABu8).unwrap();
        let mut buf = Vec::new();
        write_compound(&mut buf, &c).unwrap();
        assert_eq!(
            buf,
            vec![
                0,
                1, // varint count = 1
                1,
                b'n', // string8 key
                TagType::U8 as u8,
                0xAB, // discriminant + payload
            ]
        );
    }
}
