//! Core types for the btag format

mod compound;
mod tag;
mod value;

pub use compound::{Compound, MAX_KEY_LEN};
pub use tag::TagType;
pub use value::{Element, Scalar, Tag};
