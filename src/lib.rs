//! btag - compact self-describing binary tag-compound format
//!
//! An insertion-ordered tree of tagged key-value entries (in the spirit of
//! NBT or CBOR) plus the codec that serializes and deserializes it. Each
//! entry is a string key mapped to a scalar, a string, a homogeneous array or
//! a nested compound, with a one-byte type discriminant on the wire.
//!
//! # Features
//!
//! - Little-endian wire format, identical across host architectures
//! - Variable-width integer encoding for lengths and counts
//! - Bit-exact float round-trips, including signed zero and infinities
//! - Borrowed or owned array payloads, tracked by the type system
//! - Strict decoding: truncation, unknown tags and duplicate keys are errors
//!
//! # Example
//!
//! ```rust
//! use btag::{Compound, TagType};
//!
//! let mut inner = Compound::new();
//! inner.set_value("bla", 20u16)?;
//! inner.put_array("doubarr", (0..20).map(f64::from).collect::<Vec<_>>())?;
//!
//! let mut root = Compound::new();
//! root.set_value("integer", 1u32)?;
//! root.set_value("float", 1.4f32)?;
//! root.set_compound("inner_tag", inner)?;
//!
//! let bytes = root.to_bytes()?;
//! let parsed = Compound::from_bytes(&bytes)?;
//! assert_eq!(parsed, root);
//! assert_eq!(parsed.type_of("integer"), Some(TagType::U32));
//! # Ok::<(), btag::BtagError>(())
//! ```

pub mod error;
pub mod parser;
pub mod types;
pub mod writer;

// Re-export common types at crate root
pub use error::{BtagError, Result};
pub use parser::{from_bytes, parse};
pub use types::{Compound, Element, MAX_KEY_LEN, Scalar, Tag, TagType};
pub use writer::{to_bytes, write};
