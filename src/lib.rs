//! nbtree reads and writes NBT (Named Binary Tag) data as an owned tree of
//! [`Tag`] values. The format is used by *Minecraft* and similar programs to
//! store nested save-game data, usually wrapped in GZip.
//!
//! * For the tree itself see [`Tag`], [`List`] and [`Compound`].
//! * For reading see [`from_reader`], [`from_stream`] and [`from_bytes`],
//!   configured by [`ReadOpts`].
//! * For writing see [`to_writer`] and [`to_bytes`], configured by
//!   [`WriteOpts`].
//! * For the compression envelope see [`compression`].
//!
//! # Quick example
//!
//! ```
//! use nbtree::{Compression, ReadOpts, Tag, Compound, WriteOpts};
//!
//! # fn main() -> nbtree::error::Result<()> {
//! let mut player = Compound::new();
//! player.insert("Name", Tag::from("copygirl"))?;
//! player.insert("Health", Tag::Float(20.0))?;
//!
//! let bytes = nbtree::to_bytes("", &Tag::Compound(player), &WriteOpts::new(Compression::Gzip))?;
//!
//! // Compression is detected from the first bytes when it isn't given.
//! let (name, root) = nbtree::from_bytes(&bytes, &ReadOpts::new())?;
//! assert_eq!(name, "");
//! assert_eq!(root.get("Name")?.map(|n| n.as_str()).transpose()?, Some("copygirl"));
//! # Ok(())
//! # }
//! ```
//!
//! # Byte order and text
//!
//! Java edition data is big endian with strings stored in Java's "Modified
//! UTF-8". Other variants of the format use little endian numbers, set with
//! [`ReadOpts::endian`]/[`WriteOpts::endian`]. See [`mutf8`] for the string
//! encoding.
//!
//! # Ownership of streams
//!
//! Nothing in this crate closes a stream it was handed. The reading and
//! writing functions take `&mut` references, so the caller that opened a file
//! remains the one that closes it.

use std::fmt;

pub mod compression;
pub mod de;
pub mod endian;
pub mod error;
pub mod mutf8;
pub mod ser;

mod value;

pub use compression::Compression;
pub use de::{from_bytes, from_reader, from_stream, ReadOpts};
pub use endian::Endian;
pub use mutf8::TextEncoding;
pub use ser::{to_bytes, to_writer, WriteOpts};
pub use value::*;

#[cfg(test)]
mod test;

/// The type of an NBT tag. This does not carry the value or the name of the
/// data.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
pub enum TagType {
    /// Represents the end of a Compound object, or the element type of an
    /// empty list that has no type yet.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64.
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents an array of raw bytes.
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other tags, all of the same type.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents an array of Int (i32).
    IntArray = 11,
}

impl TagType {
    /// Byte, Short, Int, Long, Float, Double, String, ByteArray and IntArray.
    pub const PRIMITIVES: [TagType; 9] = [
        TagType::Byte,
        TagType::Short,
        TagType::Int,
        TagType::Long,
        TagType::Float,
        TagType::Double,
        TagType::ByteArray,
        TagType::String,
        TagType::IntArray,
    ];

    pub const ARRAYS: [TagType; 2] = [TagType::ByteArray, TagType::IntArray];

    pub const COLLECTIONS: [TagType; 2] = [TagType::List, TagType::Compound];

    /// Whether `code` is a tag type. `End` only counts when
    /// `allow_terminator` is set.
    pub fn is_valid(code: u8, allow_terminator: bool) -> bool {
        let lowest = if allow_terminator { 0 } else { 1 };
        (lowest..=11).contains(&code)
    }

    /// Parse a type byte read from the input.
    pub fn from_code(code: u8, allow_terminator: bool) -> error::Result<TagType> {
        match TagType::try_from(code) {
            Ok(TagType::End) if !allow_terminator => Err(error::Error::invalid_tag(code)),
            Ok(t) => Ok(t),
            Err(()) => Err(error::Error::invalid_tag(code)),
        }
    }

    pub fn is_primitive(self) -> bool {
        use TagType::*;
        matches!(
            self,
            Byte | Short | Int | Long | Float | Double | ByteArray | String | IntArray
        )
    }

    pub fn is_array(self) -> bool {
        matches!(self, TagType::ByteArray | TagType::IntArray)
    }

    pub fn is_collection(self) -> bool {
        matches!(self, TagType::List | TagType::Compound)
    }

    pub fn is_terminator(self) -> bool {
        self == TagType::End
    }

    pub fn name(self) -> &'static str {
        match self {
            TagType::End => "End",
            TagType::Byte => "Byte",
            TagType::Short => "Short",
            TagType::Int => "Int",
            TagType::Long => "Long",
            TagType::Float => "Float",
            TagType::Double => "Double",
            TagType::ByteArray => "ByteArray",
            TagType::String => "String",
            TagType::List => "List",
            TagType::Compound => "Compound",
            TagType::IntArray => "IntArray",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Written out by hand rather than derived, the set of tags very rarely
// changes.
impl TryFrom<u8> for TagType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use TagType::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12..=u8::MAX => return Err(()),
        })
    }
}

impl From<TagType> for u8 {
    fn from(tag: TagType) -> Self {
        tag as u8
    }
}

#[cfg(feature = "arbitrary1")]
impl<'a> arbitrary::Arbitrary<'a> for TagType {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let code = u.int_in_range(1..=11u8)?;
        TagType::try_from(code).map_err(|_| arbitrary::Error::IncorrectFormat)
    }
}
