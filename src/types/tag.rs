//! Type discriminants for tagged values

/// One-byte type discriminant carried by every tagged value.
///
/// The byte values are part of the wire format and must not change. Scalar
/// types occupy the low range, array types start at 64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TagType {
    Compound = 0,
    Str = 1,
    U8 = 2,
    U16 = 3,
    U32 = 4,
    U64 = 5,
    F32 = 6,
    F64 = 7,
    StrArr = 64,
    U8Arr = 65,
    U16Arr = 66,
    U32Arr = 67,
    U64Arr = 68,
    F32Arr = 69,
    F64Arr = 70,
}

impl TagType {
    /// Try to convert from the wire discriminant byte.
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(TagType::Compound),
            1 => Some(TagType::Str),
            2 => Some(TagType::U8),
            3 => Some(TagType::U16),
            4 => Some(TagType::U32),
            5 => Some(TagType::U64),
            6 => Some(TagType::F32),
            7 => Some(TagType::F64),
            64 => Some(TagType::StrArr),
            65 => Some(TagType::U8Arr),
            66 => Some(TagType::U16Arr),
            67 => Some(TagType::U32Arr),
            68 => Some(TagType::U64Arr),
            69 => Some(TagType::F32Arr),
            70 => Some(TagType::F64Arr),
            _ => None,
        }
    }

    /// Get the type name as a string (for error messages).
    pub fn name(self) -> &'static str {
        match self {
            TagType::Compound => "compound",
            TagType::Str => "str",
            TagType::U8 => "u8",
            TagType::U16 => "u16",
            TagType::U32 => "u32",
            TagType::U64 => "u64",
            TagType::F32 => "f32",
            TagType::F64 => "f64",
            TagType::StrArr => "str array",
            TagType::U8Arr => "u8 array",
            TagType::U16Arr => "u16 array",
            TagType::U32Arr => "u32 array",
            TagType::U64Arr => "u64 array",
            TagType::F32Arr => "f32 array",
            TagType::F64Arr => "f64 array",
        }
    }

    /// Whether this discriminant names an array variant.
    pub fn is_array(self) -> bool {
        (self as u8) >= 64
    }
}
