//! Compound container - an insertion-ordered map of tagged values

use std::borrow::Cow;
use std::fmt;
use std::io::{Read, Write};

use crate::error::{BtagError, Result};

use super::{Element, Scalar, Tag, TagType};

/// Longest permitted key, in bytes. Keys are written with a one-byte length
/// prefix on the wire.
pub const MAX_KEY_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entry<'a> {
    pub key: String,
    pub tag: Tag<'a>,
}

/// An ordered map from string keys to tagged values.
///
/// Entries keep their insertion order for iteration, printing and
/// serialization. A second list of entry positions, sorted by key bytes,
/// backs binary-search lookup; it is an internal accelerator, never part of
/// the external contract.
///
/// Re-setting an existing key replaces the value in place and does not move
/// the entry.
#[derive(Debug, Clone, Default)]
pub struct Compound<'a> {
    entries: Vec<Entry<'a>>,
    // Entry positions sorted by key for binary search.
    index: Vec<usize>,
}

impl<'a> Compound<'a> {
    /// Create an empty compound.
    pub fn new() -> Self {
        Compound {
            entries: Vec::new(),
            index: Vec::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// The discriminant stored under `key`, if present.
    pub fn type_of(&self, key: &str) -> Option<TagType> {
        self.find(key).map(|pos| self.entries[pos].tag.tag_type())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag<'a>)> {
        self.entries.iter().map(|e| (e.key.as_str(), &e.tag))
    }

    /// Slot of `key` in the sorted index: `Ok` if present, `Err` with the
    /// insertion slot otherwise. Byte-wise key ordering, lower bound.
    fn slot(&self, key: &str) -> std::result::Result<usize, usize> {
        self.index
            .binary_search_by(|&pos| self.entries[pos].key.as_str().cmp(key))
    }

    /// Entry position for `key`, if present.
    fn find(&self, key: &str) -> Option<usize> {
        self.slot(key).ok().map(|slot| self.index[slot])
    }

    fn check_key(key: &str) -> Result<()> {
        if key.len() > MAX_KEY_LEN {
            return Err(BtagError::KeyTooLong { len: key.len() });
        }
        Ok(())
    }

    /// Insert or replace the entry under `key`.
    ///
    /// A new key appends to the entry list and slots its position into the
    /// sorted index; an existing key has its value replaced in place.
    pub fn set_tag(&mut self, key: &str, tag: Tag<'a>) -> Result<()> {
        Self::check_key(key)?;
        match self.slot(key) {
            Ok(slot) => {
                let pos = self.index[slot];
                self.entries[pos].tag = tag;
            }
            Err(slot) => {
                self.entries.push(Entry {
                    key: key.to_string(),
                    tag,
                });
                self.index.insert(slot, self.entries.len() - 1);
            }
        }
        Ok(())
    }

    /// Append a decoded entry, rejecting keys already present.
    pub(crate) fn insert_unique(&mut self, key: String, tag: Tag<'a>) -> Result<()> {
        match self.slot(&key) {
            Ok(_) => Err(BtagError::DuplicateKey { key }),
            Err(slot) => {
                self.entries.push(Entry { key, tag });
                self.index.insert(slot, self.entries.len() - 1);
                Ok(())
            }
        }
    }

    /// Borrow the entry under `key`.
    pub fn get_tag(&self, key: &str) -> Result<&Tag<'a>> {
        self.find(key)
            .map(|pos| &self.entries[pos].tag)
            .ok_or_else(|| BtagError::TagNotFound {
                key: key.to_string(),
            })
    }

    /// Mutably borrow the entry under `key`.
    pub fn get_tag_mut(&mut self, key: &str) -> Result<&mut Tag<'a>> {
        match self.find(key) {
            Some(pos) => Ok(&mut self.entries[pos].tag),
            None => Err(BtagError::TagNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// Remove and return the entry under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Tag<'a>> {
        let slot = self.slot(key).ok()?;
        let pos = self.index.remove(slot);
        let entry = self.entries.remove(pos);
        // Entries after the removed one shifted down by one.
        for p in &mut self.index {
            if *p > pos {
                *p -= 1;
            }
        }
        Some(entry.tag)
    }

    /// Insert or replace a scalar value.
    pub fn set_value<T: Scalar>(&mut self, key: &str, value: T) -> Result<()> {
        self.set_tag(key, value.into_tag())
    }

    /// Borrow a scalar value. Strict type match: no numeric coercion.
    pub fn get_value<T: Scalar>(&self, key: &str) -> Result<&T> {
        let tag = self.get_tag(key)?;
        T::from_tag(tag).ok_or_else(|| BtagError::WrongType {
            key: key.to_string(),
            expected: T::TYPE.name(),
            found: tag.tag_type().name(),
        })
    }

    /// Mutably borrow a scalar value. Strict type match.
    pub fn get_value_mut<T: Scalar>(&mut self, key: &str) -> Result<&mut T> {
        let tag = self.get_tag_mut(key)?;
        let found = tag.tag_type();
        T::from_tag_mut(tag).ok_or_else(|| BtagError::WrongType {
            key: key.to_string(),
            expected: T::TYPE.name(),
            found: found.name(),
        })
    }

    /// Insert or replace an array entry borrowing caller-owned data.
    ///
    /// The compound never frees or copies the slice; it must outlive every
    /// use of this compound (the `'a` bound enforces it).
    pub fn set_array<T: Element>(&mut self, key: &str, data: &'a [T]) -> Result<()> {
        self.set_tag(key, T::wrap(Cow::Borrowed(data)))
    }

    /// Insert or replace an array entry, taking ownership of the buffer.
    pub fn put_array<T: Element + 'a>(&mut self, key: &str, data: Vec<T>) -> Result<()> {
        self.set_tag(key, T::wrap(Cow::Owned(data)))
    }

    /// Borrow an array without transferring ownership.
    pub fn get_array<T: Element>(&self, key: &str) -> Result<&[T]> {
        let tag = self.get_tag(key)?;
        T::slice(tag)
            .map(|cow| cow.as_ref())
            .ok_or_else(|| BtagError::WrongType {
                key: key.to_string(),
                expected: T::ARRAY_TYPE.name(),
                found: tag.tag_type().name(),
            })
    }

    /// Transfer an array's buffer out to the caller.
    ///
    /// The entry stays behind as an empty borrowed slice, so clearing or
    /// dropping the compound afterwards cannot touch the returned buffer. A
    /// borrowed entry is cloned into an owned buffer.
    pub fn retrieve_array<T: Element + 'a>(&mut self, key: &str) -> Result<Vec<T>> {
        let tag = self.get_tag_mut(key)?;
        let found = tag.tag_type();
        let cow = T::slice_mut(tag).ok_or_else(|| BtagError::WrongType {
            key: key.to_string(),
            expected: T::ARRAY_TYPE.name(),
            found: found.name(),
        })?;
        let data = std::mem::replace(cow, Cow::Borrowed(&[]));
        Ok(data.into_owned())
    }

    /// Serialize this compound to a byte stream.
    pub fn serialize<W: Write>(&self, writer: &mut W) -> Result<()> {
        crate::writer::write(writer, self)
    }

    /// Serialize this compound to a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        crate::writer::to_bytes(self)
    }

    /// Decode one compound from a byte stream.
    pub fn deserialize<R: Read>(reader: &mut R) -> Result<Compound<'static>> {
        crate::parser::parse(reader)
    }

    /// Decode one compound from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Compound<'static>> {
        crate::parser::from_bytes(bytes)
    }
}

macro_rules! scalar_accessors {
    ($set:ident, $get:ident, $ty:ty) => {
        pub fn $set(&mut self, key: &str, value: $ty) -> Result<()> {
            self.set_value(key, value)
        }

        pub fn $get(&self, key: &str) -> Result<&$ty> {
            self.get_value(key)
        }
    };
}

macro_rules! array_accessors {
    ($lt:lifetime, $set:ident, $put:ident, $get:ident, $retrieve:ident, $ty:ty) => {
        pub fn $set(&mut self, key: &str, data: &$lt [$ty]) -> Result<()> {
            self.set_array(key, data)
        }

        pub fn $put(&mut self, key: &str, data: Vec<$ty>) -> Result<()> {
            self.put_array(key, data)
        }

        pub fn $get(&self, key: &str) -> Result<&[$ty]> {
            self.get_array(key)
        }

        pub fn $retrieve(&mut self, key: &str) -> Result<Vec<$ty>> {
            self.retrieve_array(key)
        }
    };
}

/// Typed convenience accessors delegating to the generic operations.
impl<'a> Compound<'a> {
    scalar_accessors!(set_u8, get_u8, u8);
    scalar_accessors!(set_u16, get_u16, u16);
    scalar_accessors!(set_u32, get_u32, u32);
    scalar_accessors!(set_u64, get_u64, u64);
    scalar_accessors!(set_f32, get_f32, f32);
    scalar_accessors!(set_f64, get_f64, f64);

    pub fn set_str(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value.to_string())
    }

    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.get_value::<String>(key).map(String::as_str)
    }

    array_accessors!(
        'a,
        set_u8_array,
        put_u8_array,
        get_u8_array,
        retrieve_u8_array,
        u8
    );
    array_accessors!(
        'a,
        set_u16_array,
        put_u16_array,
        get_u16_array,
        retrieve_u16_array,
        u16
    );
    array_accessors!(
        'a,
        set_u32_array,
        put_u32_array,
        get_u32_array,
        retrieve_u32_array,
        u32
    );
    array_accessors!(
        'a,
        set_u64_array,
        put_u64_array,
        get_u64_array,
        retrieve_u64_array,
        u64
    );
    array_accessors!(
        'a,
        set_f32_array,
        put_f32_array,
        get_f32_array,
        retrieve_f32_array,
        f32
    );
    array_accessors!(
        'a,
        set_f64_array,
        put_f64_array,
        get_f64_array,
        retrieve_f64_array,
        f64
    );
    array_accessors!(
        'a,
        set_str_array,
        put_str_array,
        get_str_array,
        retrieve_str_array,
        String
    );

    /// Insert or replace a nested compound.
    pub fn set_compound(&mut self, key: &str, value: Compound<'a>) -> Result<()> {
        self.set_tag(key, Tag::Compound(value))
    }

    /// Borrow a nested compound.
    pub fn get_compound(&self, key: &str) -> Result<&Compound<'a>> {
        let tag = self.get_tag(key)?;
        tag.as_compound().ok_or_else(|| BtagError::WrongType {
            key: key.to_string(),
            expected: TagType::Compound.name(),
            found: tag.tag_type().name(),
        })
    }

    /// Mutably borrow a nested compound.
    pub fn get_compound_mut(&mut self, key: &str) -> Result<&mut Compound<'a>> {
        let tag = self.get_tag_mut(key)?;
        let found = tag.tag_type();
        tag.as_compound_mut().ok_or_else(|| BtagError::WrongType {
            key: key.to_string(),
            expected: TagType::Compound.name(),
            found: found.name(),
        })
    }
}

// Equality is defined by the entries in insertion order; the lookup index is
// derived state.
impl PartialEq for Compound<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<'a> Compound<'a> {
    pub(crate) fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{},{{", TagType::Compound as u8)?;
        if self.entries.is_empty() {
            return write!(f, "}}");
        }
        for (i, entry) in self.entries.iter().enumerate() {
            write!(
                f,
                "\n{:pad$}({i},'{key}'):",
                "",
                pad = (indent + 1) * 2,
                key = entry.key
            )?;
            entry.tag.fmt_indented(f, indent + 1)?;
        }
        write!(f, "\n{:pad$}}}", "", pad = indent * 2)
    }
}

impl fmt::Display for Compound<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_scalar() {
        let mut c = Compound::new();
        c.set_value("answer", 42u32).unwrap();
        assert_eq!(c.get_value::<u32>("answer").unwrap(), &42);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut c = Compound::new();
        c.set_value("a", 1u8).unwrap();
        c.set_value("b", 2u8).unwrap();
        c.set_value("c", 3u8).unwrap();
        // replace first entry, including with a different type
        c.set_value("a", 9u64).unwrap();
        assert_eq!(c.len(), 3);
        let keys: Vec<&str> = c.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(c.get_value::<u64>("a").unwrap(), &9);
    }

    #[test]
    fn test_insertion_order_not_sorted_order() {
        let mut c = Compound::new();
        for key in ["zebra", "apple", "mango", "beet"] {
            c.set_value(key, 0u8).unwrap();
        }
        let keys: Vec<&str> = c.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zebra", "apple", "mango", "beet"]);
        // lookups work regardless of order
        for key in ["zebra", "apple", "mango", "beet"] {
            assert!(c.get_tag(key).is_ok());
        }
    }

    #[test]
    fn test_missing_key() {
        let c = Compound::new();
        assert!(matches!(
            c.get_value::<f64>("nonexistent"),
            Err(BtagError::TagNotFound { .. })
        ));
        assert_eq!(c.type_of("nonexistent"), None);
    }

    #[test]
    fn test_wrong_type_is_strict() {
        let mut c = Compound::new();
        c.set_value("k", 7u16).unwrap();
        match c.get_value::<u32>("k") {
            Err(BtagError::WrongType {
                expected, found, ..
            }) => {
                assert_eq!(expected, "u32");
                assert_eq!(found, "u16");
            }
            other => panic!("expected WrongType, got {other:?}"),
        }
    }

    #[test]
    fn test_key_too_long() {
        let mut c = Compound::new();
        let key = "x".repeat(256);
        assert!(matches!(
            c.set_value(&key, 1u8),
            Err(BtagError::KeyTooLong { len: 256 })
        ));
        // 255 is still fine
        let key = "x".repeat(255);
        c.set_value(&key, 1u8).unwrap();
    }

    #[test]
    fn test_borrowed_array() {
        let data = [1u32, 2, 3];
        let mut c = Compound::new();
        c.set_array("arr", &data[..]).unwrap();
        assert_eq!(c.get_array::<u32>("arr").unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn test_owned_array() {
        let mut c = Compound::new();
        c.put_array("arr", vec![1.0f64, 2.0]).unwrap();
        assert_eq!(c.get_array::<f64>("arr").unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_retrieve_array_transfers_out() {
        let mut c = Compound::new();
        c.put_array("arr", vec![5u16, 6]).unwrap();
        let buf = c.retrieve_array::<u16>("arr").unwrap();
        assert_eq!(buf, vec![5, 6]);
        // entry remains but no longer holds the buffer
        assert_eq!(c.len(), 1);
        assert_eq!(c.get_array::<u16>("arr").unwrap(), &[] as &[u16]);
        c.clear();
        drop(c);
        // buf still valid after the compound is gone
        assert_eq!(buf, vec![5, 6]);
    }

    #[test]
    fn test_retrieve_borrowed_clones() {
        let data = [9u8, 8];
        let mut c = Compound::new();
        c.set_array("arr", &data[..]).unwrap();
        let buf = c.retrieve_array::<u8>("arr").unwrap();
        assert_eq!(buf, vec![9, 8]);
        assert_eq!(data, [9, 8]);
    }

    #[test]
    fn test_mixed_borrowed_and_owned_arrays() {
        // one compound holding a local borrow alongside owned buffers, with
        // ownership transferred in and back out
        let local = vec![1u16, 2, 3];
        let mut c = Compound::new();
        c.set_array("borrowed", local.as_slice()).unwrap();
        c.put_array("owned", vec![4u16, 5]).unwrap();
        c.put_array("floats", vec![1.5f64]).unwrap();
        assert_eq!(c.get_array::<u16>("borrowed").unwrap(), local.as_slice());
        assert_eq!(c.retrieve_array::<u16>("owned").unwrap(), vec![4, 5]);
        assert_eq!(c.retrieve_array::<f64>("floats").unwrap(), vec![1.5]);
    }

    #[test]
    fn test_array_wrong_element_type() {
        let mut c = Compound::new();
        c.put_array("arr", vec![1u32, 2]).unwrap();
        assert!(matches!(
            c.get_array::<u16>("arr"),
            Err(BtagError::WrongType { .. })
        ));
        assert!(matches!(
            c.retrieve_array::<f64>("arr"),
            Err(BtagError::WrongType { .. })
        ));
    }

    #[test]
    fn test_remove() {
        let mut c = Compound::new();
        c.set_value("a", 1u8).unwrap();
        c.set_value("b", 2u8).unwrap();
        c.set_value("c", 3u8).unwrap();
        assert_eq!(c.remove("b"), Some(Tag::U8(2)));
        assert_eq!(c.remove("b"), None);
        assert_eq!(c.len(), 2);
        // remaining entries still reachable through the fixed-up index
        assert_eq!(c.get_value::<u8>("a").unwrap(), &1);
        assert_eq!(c.get_value::<u8>("c").unwrap(), &3);
        let keys: Vec<&str> = c.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_insert_unique_rejects_duplicates() {
        let mut c = Compound::new();
        c.insert_unique("k".into(), Tag::U8(1)).unwrap();
        assert!(matches!(
            c.insert_unique("k".into(), Tag::U8(2)),
            Err(BtagError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_nested_compound_access() {
        let mut inner = Compound::new();
        inner.set_value("x", 1u8).unwrap();
        let mut outer = Compound::new();
        outer.set_compound("inner", inner).unwrap();
        assert_eq!(
            outer
                .get_compound("inner")
                .unwrap()
                .get_value::<u8>("x")
                .unwrap(),
            &1
        );
        outer
            .get_compound_mut("inner")
            .unwrap()
            .set_value("y", 2u8)
            .unwrap();
        assert_eq!(outer.get_compound("inner").unwrap().len(), 2);
    }

    #[test]
    fn test_typed_wrappers() {
        let mut c = Compound::new();
        c.set_u8("b", 1).unwrap();
        c.set_f64("d", 0.5).unwrap();
        c.set_str("s", "hi").unwrap();
        c.put_u32_array("arr", vec![1, 2]).unwrap();
        assert_eq!(c.get_u8("b").unwrap(), &1);
        assert_eq!(c.get_f64("d").unwrap(), &0.5);
        assert_eq!(c.get_str("s").unwrap(), "hi");
        assert_eq!(c.retrieve_u32_array("arr").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_clear() {
        let mut c = Compound::new();
        c.set_value("a", 1u8).unwrap();
        c.clear();
        assert!(c.is_empty());
        assert!(c.get_tag("a").is_err());
    }

    #[test]
    fn test_display_format() {
        let mut c = Compound::new();
        c.set_value("num", 7u32).unwrap();
        c.set_str("name", "abc").unwrap();
        let printed = c.to_string();
        assert_eq!(printed, "0,{\n  (0,'num'):4,7\n  (1,'name'):1,'abc'\n}");
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(Compound::new().to_string(), "0,{}");
    }
}
