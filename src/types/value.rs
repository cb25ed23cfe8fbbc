//! Tagged value type - the unit of storage inside a compound

use std::borrow::Cow;

use super::{Compound, TagType};

/// One tagged value: a scalar, a string, a homogeneous array, or a nested
/// compound.
///
/// Array payloads are `Cow` slices: `set_array` stores a `Cow::Borrowed` over
/// caller-owned data, `put_array` stores a `Cow::Owned` buffer. The lifetime
/// `'a` bounds the borrowed case; decoded values are always fully owned
/// (`Tag<'static>`).
#[derive(Debug, Clone, PartialEq)]
pub enum Tag<'a> {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Compound(Compound<'a>),
    StrArr(Cow<'a, [String]>),
    U8Arr(Cow<'a, [u8]>),
    U16Arr(Cow<'a, [u16]>),
    U32Arr(Cow<'a, [u32]>),
    U64Arr(Cow<'a, [u64]>),
    F32Arr(Cow<'a, [f32]>),
    F64Arr(Cow<'a, [f64]>),
}

impl<'a> Tag<'a> {
    /// The discriminant for this value, as written on the wire.
    pub fn tag_type(&self) -> TagType {
        match self {
            Tag::U8(_) => TagType::U8,
            Tag::U16(_) => TagType::U16,
            Tag::U32(_) => TagType::U32,
            Tag::U64(_) => TagType::U64,
            Tag::F32(_) => TagType::F32,
            Tag::F64(_) => TagType::F64,
            Tag::Str(_) => TagType::Str,
            Tag::Compound(_) => TagType::Compound,
            Tag::StrArr(_) => TagType::StrArr,
            Tag::U8Arr(_) => TagType::U8Arr,
            Tag::U16Arr(_) => TagType::U16Arr,
            Tag::U32Arr(_) => TagType::U32Arr,
            Tag::U64Arr(_) => TagType::U64Arr,
            Tag::F32Arr(_) => TagType::F32Arr,
            Tag::F64Arr(_) => TagType::F64Arr,
        }
    }

    /// Borrow the nested compound, if this is one.
    pub fn as_compound(&self) -> Option<&Compound<'a>> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Mutably borrow the nested compound, if this is one.
    pub fn as_compound_mut(&mut self) -> Option<&mut Compound<'a>> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Render as `id,value` for the compound tree printer. Arrays print
    /// their length only; nested compounds recurse.
    pub(crate) fn fmt_indented(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        indent: usize,
    ) -> std::fmt::Result {
        let id = self.tag_type() as u8;
        match self {
            Tag::U8(v) => write!(f, "{id},{v}"),
            Tag::U16(v) => write!(f, "{id},{v}"),
            Tag::U32(v) => write!(f, "{id},{v}"),
            Tag::U64(v) => write!(f, "{id},{v}"),
            Tag::F32(v) => write!(f, "{id},{v}"),
            Tag::F64(v) => write!(f, "{id},{v}"),
            Tag::Str(s) => write!(f, "{id},'{s}'"),
            Tag::Compound(c) => c.fmt_indented(f, indent),
            Tag::StrArr(v) => write!(f, "{id},[{}]", v.len()),
            Tag::U8Arr(v) => write!(f, "{id},[{}]", v.len()),
            Tag::U16Arr(v) => write!(f, "{id},[{}]", v.len()),
            Tag::U32Arr(v) => write!(f, "{id},[{}]", v.len()),
            Tag::U64Arr(v) => write!(f, "{id},[{}]", v.len()),
            Tag::F32Arr(v) => write!(f, "{id},[{}]", v.len()),
            Tag::F64Arr(v) => write!(f, "{id},[{}]", v.len()),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for String {}
}

/// Types storable as scalar tagged values.
///
/// Sealed: the wire format has a closed variant set.
pub trait Scalar: sealed::Sealed + Sized {
    /// Discriminant of the matching scalar variant.
    const TYPE: TagType;

    fn into_tag(self) -> Tag<'static>;
    fn from_tag<'t>(tag: &'t Tag<'_>) -> Option<&'t Self>;
    fn from_tag_mut<'t>(tag: &'t mut Tag<'_>) -> Option<&'t mut Self>;
}

/// Types storable as elements of array tagged values.
///
/// Sealed: the wire format has a closed variant set.
pub trait Element: sealed::Sealed + Clone {
    /// Discriminant of the matching array variant.
    const ARRAY_TYPE: TagType;

    fn wrap(data: Cow<'_, [Self]>) -> Tag<'_>;
    fn slice<'t, 'a>(tag: &'t Tag<'a>) -> Option<&'t Cow<'a, [Self]>>;
    fn slice_mut<'t, 'a>(tag: &'t mut Tag<'a>) -> Option<&'t mut Cow<'a, [Self]>>;
}

macro_rules! impl_scalar {
    ($ty:ty, $variant:ident) => {
        impl Scalar for $ty {
            const TYPE: TagType = TagType::$variant;

            fn into_tag(self) -> Tag<'static> {
                Tag::$variant(self)
            }

            fn from_tag<'t>(tag: &'t Tag<'_>) -> Option<&'t Self> {
                match tag {
                    Tag::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn from_tag_mut<'t>(tag: &'t mut Tag<'_>) -> Option<&'t mut Self> {
                match tag {
                    Tag::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Tag<'static> {
            fn from(v: $ty) -> Self {
                Tag::$variant(v)
            }
        }
    };
}

impl_scalar!(u8, U8);
impl_scalar!(u16, U16);
impl_scalar!(u32, U32);
impl_scalar!(u64, U64);
impl_scalar!(f32, F32);
impl_scalar!(f64, F64);
impl_scalar!(String, Str);

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const ARRAY_TYPE: TagType = TagType::$variant;

            fn wrap(data: Cow<'_, [Self]>) -> Tag<'_> {
                Tag::$variant(data)
            }

            fn slice<'t, 'a>(tag: &'t Tag<'a>) -> Option<&'t Cow<'a, [Self]>> {
                match tag {
                    Tag::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn slice_mut<'t, 'a>(tag: &'t mut Tag<'a>) -> Option<&'t mut Cow<'a, [Self]>> {
                match tag {
                    Tag::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<Vec<$ty>> for Tag<'static> {
            fn from(v: Vec<$ty>) -> Self {
                Tag::$variant(Cow::Owned(v))
            }
        }

        impl<'a> From<&'a [$ty]> for Tag<'a> {
            fn from(v: &'a [$ty]) -> Self {
                Tag::$variant(Cow::Borrowed(v))
            }
        }
    };
}

impl_element!(u8, U8Arr);
impl_element!(u16, U16Arr);
impl_element!(u32, U32Arr);
impl_element!(u64, U64Arr);
impl_element!(f32, F32Arr);
impl_element!(f64, F64Arr);
impl_element!(String, StrArr);

impl From<&str> for Tag<'static> {
    fn from(v: &str) -> Self {
        Tag::Str(v.to_string())
    }
}

impl<'a> From<Compound<'a>> for Tag<'a> {
    fn from(v: Compound<'a>) -> Self {
        Tag::Compound(v)
    }
}
