//! Value decoding

use std::io::Read;

use crate::error::{BtagError, Result};
use crate::types::{Compound, Tag, TagType};

use super::primitives::{
    ALLOC_CAP, read_f32, read_f64, read_u8, read_u16, read_u32, read_u64, read_varint,
};
use super::string::{read_key, read_string};

/// Maximum compound nesting the decoder accepts. Recursion past this depth
/// would risk exhausting the stack on a malformed stream.
pub const MAX_DECODE_DEPTH: usize = 128;

/// Decode an array payload: varint length, then that many elements.
///
/// The capacity hint is capped so a corrupt length cannot trigger a huge
/// up-front allocation; an overstated length runs out of stream while reading
/// elements and fails with `TruncatedStream`.
fn read_array<R, T, F>(reader: &mut R, decode: F) -> Result<Vec<T>>
where
    R: Read,
    F: Fn(&mut R) -> Result<T>,
{
    let len = read_varint(reader)?;
    let mut items = Vec::with_capacity(len.min(ALLOC_CAP as u64) as usize);
    for _ in 0..len {
        items.push(decode(reader)?);
    }
    Ok(items)
}

/// Decode the value payload for a known discriminant. Nested compounds
/// recurse through the compound decoder, bounded by `MAX_DECODE_DEPTH`.
pub fn read_value<R: Read>(reader: &mut R, tag_type: TagType) -> Result<Tag<'static>> {
    read_value_at(reader, tag_type, 0)
}

fn read_value_at<R: Read>(reader: &mut R, tag_type: TagType, depth: usize) -> Result<Tag<'static>> {
    let tag = match tag_type {
        TagType::U8 => Tag::U8(read_u8(reader)?),
        TagType::U16 => Tag::U16(read_u16(reader)?),
        TagType::U32 => Tag::U32(read_u32(reader)?),
        TagType::U64 => Tag::U64(read_u64(reader)?),
        TagType::F32 => Tag::F32(read_f32(reader)?),
        TagType::F64 => Tag::F64(read_f64(reader)?),
        TagType::Str => Tag::Str(read_string(reader)?),
        TagType::Compound => Tag::Compound(read_compound_at(reader, depth + 1)?),
        TagType::StrArr => Tag::StrArr(read_array(reader, read_string)?.into()),
        TagType::U8Arr => Tag::U8Arr(read_array(reader, read_u8)?.into()),
        TagType::U16Arr => Tag::U16Arr(read_array(reader, read_u16)?.into()),
        TagType::U32Arr => Tag::U32Arr(read_array(reader, read_u32)?.into()),
        TagType::U64Arr => Tag::U64Arr(read_array(reader, read_u64)?.into()),
        TagType::F32Arr => Tag::F32Arr(read_array(reader, read_f32)?.into()),
        TagType::F64Arr => Tag::F64Arr(read_array(reader, read_f64)?.into()),
    };
    Ok(tag)
}

/// Decode a compound payload: varint entry count, then per entry the key,
/// the discriminant byte and the value payload.
pub fn read_compound<R: Read>(reader: &mut R) -> Result<Compound<'static>> {
    read_compound_at(reader, 0)
}

fn read_compound_at<R: Read>(reader: &mut R, depth: usize) -> Result<Compound<'static>> {
    if depth > MAX_DECODE_DEPTH {
        return Err(BtagError::NestingTooDeep {
            limit: MAX_DECODE_DEPTH,
        });
    }
    let count = read_varint(reader)?;
    let mut compound = Compound::new();
    for _ in 0..count {
        let key = read_key(reader)?;
        let id = read_u8(reader)?;
        let tag_type = TagType::from_u8(id).ok_or(BtagError::UnknownTypeTag(id))?;
        let tag = read_value_at(reader, tag_type, depth)?;
        compound.insert_unique(key, tag)?;
    }
    Ok(compound)
}
