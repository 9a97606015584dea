mod compound;
mod list;
mod ser;

use crate::{
    error::{Error, Result},
    TagType,
};

pub use self::compound::Compound;
pub use self::list::List;

/// Tag is a complete NBT value. It owns its data, Lists and Compounds own
/// their children.
///
/// The variant of a tag is its type, and decides which accessors work on it.
/// Using the wrong one fails with a
/// [`TypeMismatch`][crate::error::ErrorKind::TypeMismatch] rather than
/// converting the value.
///
/// # Conversions
///
/// Each variant converts to and from one native type. `From` always
/// succeeds, `TryFrom` fails on any other variant.
///
/// | Variant     | Native type              |
/// |-------------|--------------------------|
/// | `Byte`      | `i8` (also from `u8`, `bool`) |
/// | `Short`     | `i16` (also from `u16`)  |
/// | `Int`       | `i32` (also from `u32`)  |
/// | `Long`      | `i64` (also from `u64`)  |
/// | `Float`     | `f32`                    |
/// | `Double`    | `f64`                    |
/// | `ByteArray` | `Vec<u8>`, `&[u8]`       |
/// | `String`    | `String`, `&str`         |
/// | `List`      | [`List`]                 |
/// | `Compound`  | [`Compound`]             |
/// | `IntArray`  | `Vec<i32>`, `&[i32]`     |
///
/// # Strings
///
/// `String` payloads and compound names are Rust strings, so must be valid
/// Unicode. Modified UTF-8 can hold a surrogate half without its partner,
/// which Java writes for such strings, and decoding one fails with
/// [`Malformed`][crate::error::ErrorKind::Malformed]. The code units are
/// still available from [`mutf8::decode_units`][crate::mutf8::decode_units].
///
/// ```
/// # use nbtree::Tag;
/// let tag = Tag::from(42i32);
/// assert_eq!(i32::try_from(&tag).unwrap(), 42);
/// assert!(i64::try_from(&tag).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
}

impl Tag {
    /// Create an empty or zero valued tag of the given type. Fails for
    /// `End`, which is not a tag on its own.
    pub fn create_default(tag_type: TagType) -> Result<Tag> {
        Ok(match tag_type {
            TagType::End => {
                return Err(Error::invalid_argument(
                    "can't create a tag of type 'End'",
                ))
            }
            TagType::Byte => Tag::Byte(0),
            TagType::Short => Tag::Short(0),
            TagType::Int => Tag::Int(0),
            TagType::Long => Tag::Long(0),
            TagType::Float => Tag::Float(0.0),
            TagType::Double => Tag::Double(0.0),
            TagType::ByteArray => Tag::ByteArray(Vec::new()),
            TagType::String => Tag::String(String::new()),
            TagType::List => Tag::List(List::new()),
            TagType::Compound => Tag::Compound(Compound::new()),
            TagType::IntArray => Tag::IntArray(Vec::new()),
        })
    }

    pub fn tag_type(&self) -> TagType {
        match self {
            Tag::Byte(_) => TagType::Byte,
            Tag::Short(_) => TagType::Short,
            Tag::Int(_) => TagType::Int,
            Tag::Long(_) => TagType::Long,
            Tag::Float(_) => TagType::Float,
            Tag::Double(_) => TagType::Double,
            Tag::ByteArray(_) => TagType::ByteArray,
            Tag::String(_) => TagType::String,
            Tag::List(_) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
            Tag::IntArray(_) => TagType::IntArray,
        }
    }

    fn mismatch(&self, expected: &[TagType]) -> Error {
        Error::wrong_variant(expected, self.tag_type())
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Tag::String(s) => Ok(s),
            other => Err(other.mismatch(&[TagType::String])),
        }
    }

    pub fn set_string(&mut self, value: impl Into<String>) -> Result<()> {
        match self {
            Tag::String(s) => {
                *s = value.into();
                Ok(())
            }
            other => Err(other.mismatch(&[TagType::String])),
        }
    }

    pub fn as_byte_array(&self) -> Result<&[u8]> {
        match self {
            Tag::ByteArray(v) => Ok(v),
            other => Err(other.mismatch(&[TagType::ByteArray])),
        }
    }

    pub fn as_byte_array_mut(&mut self) -> Result<&mut Vec<u8>> {
        match self {
            Tag::ByteArray(v) => Ok(v),
            other => Err(other.mismatch(&[TagType::ByteArray])),
        }
    }

    pub fn as_int_array(&self) -> Result<&[i32]> {
        match self {
            Tag::IntArray(v) => Ok(v),
            other => Err(other.mismatch(&[TagType::IntArray])),
        }
    }

    pub fn as_int_array_mut(&mut self) -> Result<&mut Vec<i32>> {
        match self {
            Tag::IntArray(v) => Ok(v),
            other => Err(other.mismatch(&[TagType::IntArray])),
        }
    }

    pub fn as_list(&self) -> Result<&List> {
        match self {
            Tag::List(l) => Ok(l),
            other => Err(other.mismatch(&[TagType::List])),
        }
    }

    pub fn as_list_mut(&mut self) -> Result<&mut List> {
        match self {
            Tag::List(l) => Ok(l),
            other => Err(other.mismatch(&[TagType::List])),
        }
    }

    pub fn as_compound(&self) -> Result<&Compound> {
        match self {
            Tag::Compound(c) => Ok(c),
            other => Err(other.mismatch(&[TagType::Compound])),
        }
    }

    pub fn as_compound_mut(&mut self) -> Result<&mut Compound> {
        match self {
            Tag::Compound(c) => Ok(c),
            other => Err(other.mismatch(&[TagType::Compound])),
        }
    }

    // ------------- Shorthands for List and Compound -------------

    /// Number of children of a List or Compound.
    pub fn len(&self) -> Result<usize> {
        match self {
            Tag::List(l) => Ok(l.len()),
            Tag::Compound(c) => Ok(c.len()),
            other => Err(other.mismatch(&TagType::COLLECTIONS)),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }

    /// Remove all children of a List or Compound.
    pub fn clear(&mut self) -> Result<()> {
        match self {
            Tag::List(l) => l.clear(),
            Tag::Compound(c) => c.clear(),
            other => return Err(other.mismatch(&TagType::COLLECTIONS)),
        }
        Ok(())
    }

    pub fn get_at(&self, index: usize) -> Result<Option<&Tag>> {
        Ok(self.as_list()?.get(index))
    }

    pub fn set_at(&mut self, index: usize, tag: Tag) -> Result<Tag> {
        self.as_list_mut()?.set(index, tag)
    }

    pub fn push(&mut self, tag: Tag) -> Result<()> {
        self.as_list_mut()?.push(tag)
    }

    pub fn insert_at(&mut self, index: usize, tag: Tag) -> Result<()> {
        self.as_list_mut()?.insert(index, tag)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Tag> {
        self.as_list_mut()?.remove(index)
    }

    pub fn get(&self, name: &str) -> Result<Option<&Tag>> {
        Ok(self.as_compound()?.get(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<Option<&mut Tag>> {
        Ok(self.as_compound_mut()?.get_mut(name))
    }

    pub fn contains_key(&self, name: &str) -> Result<bool> {
        Ok(self.as_compound()?.contains_key(name))
    }

    /// Add an entry to a Compound, failing if it is already present.
    pub fn insert(&mut self, name: impl Into<String>, tag: Tag) -> Result<()> {
        self.as_compound_mut()?.insert(name, tag)
    }

    /// Set an entry of a Compound, overwriting any existing one.
    pub fn set(&mut self, name: impl Into<String>, tag: Tag) -> Result<Option<Tag>> {
        Ok(self.as_compound_mut()?.set(name, tag))
    }

    pub fn remove(&mut self, name: &str) -> Result<Option<Tag>> {
        Ok(self.as_compound_mut()?.remove(name))
    }
}

// ------------- Scalars -------------

macro_rules! scalar {
    ($($variant:ident($type:ty) => $as:ident, $set:ident;)*) => {
        impl Tag {
            $(
                pub fn $as(&self) -> Result<$type> {
                    match *self {
                        Tag::$variant(v) => Ok(v),
                        ref other => Err(other.mismatch(&[TagType::$variant])),
                    }
                }

                pub fn $set(&mut self, value: $type) -> Result<()> {
                    match self {
                        Tag::$variant(v) => {
                            *v = value;
                            Ok(())
                        }
                        other => Err(other.mismatch(&[TagType::$variant])),
                    }
                }
            )*
        }

        $(
            impl From<$type> for Tag {
                fn from(val: $type) -> Self {
                    Tag::$variant(val)
                }
            }

            impl TryFrom<&Tag> for $type {
                type Error = Error;

                fn try_from(tag: &Tag) -> Result<Self> {
                    tag.$as()
                }
            }

            impl TryFrom<Tag> for $type {
                type Error = Error;

                fn try_from(tag: Tag) -> Result<Self> {
                    tag.$as()
                }
            }
        )*
    };
}

scalar! {
    Byte(i8) => as_byte, set_byte;
    Short(i16) => as_short, set_short;
    Int(i32) => as_int, set_int;
    Long(i64) => as_long, set_long;
    Float(f32) => as_float, set_float;
    Double(f64) => as_double, set_double;
}

// ------------- Owned payloads -------------

macro_rules! owned {
    ($($variant:ident($type:ty), $borrowed:ty => $as:ident;)*) => {
        $(
            impl From<$type> for Tag {
                fn from(val: $type) -> Self {
                    Tag::$variant(val)
                }
            }

            impl TryFrom<Tag> for $type {
                type Error = Error;

                fn try_from(tag: Tag) -> Result<Self> {
                    match tag {
                        Tag::$variant(v) => Ok(v),
                        other => Err(other.mismatch(&[TagType::$variant])),
                    }
                }
            }

            impl<'a> TryFrom<&'a Tag> for &'a $borrowed {
                type Error = Error;

                fn try_from(tag: &'a Tag) -> Result<Self> {
                    tag.$as()
                }
            }
        )*
    };
}

owned! {
    ByteArray(Vec<u8>), [u8] => as_byte_array;
    String(String), str => as_str;
    List(List), List => as_list;
    Compound(Compound), Compound => as_compound;
    IntArray(Vec<i32>), [i32] => as_int_array;
}

macro_rules! from_unsigned {
    ($($type:ty => $variant:ident as $signed:ty),*) => {
        $(
            impl From<$type> for Tag {
                fn from(val: $type) -> Self {
                    Tag::$variant(val as $signed)
                }
            }
        )*
    };
}

from_unsigned!(u8 => Byte as i8, u16 => Short as i16, u32 => Int as i32, u64 => Long as i64);

impl From<bool> for Tag {
    fn from(val: bool) -> Self {
        Tag::Byte(i8::from(val))
    }
}

impl From<&str> for Tag {
    fn from(val: &str) -> Self {
        Tag::String(val.to_owned())
    }
}

impl From<&[u8]> for Tag {
    fn from(val: &[u8]) -> Self {
        Tag::ByteArray(val.to_vec())
    }
}

impl From<&[i32]> for Tag {
    fn from(val: &[i32]) -> Self {
        Tag::IntArray(val.to_vec())
    }
}

// ------------- Arbitrary -------------

/// Lists and compounds deeper than this only hold primitives, keeping
/// generated trees inside the reader's default depth limit.
#[cfg(feature = "arbitrary1")]
const ARBITRARY_DEPTH: usize = 8;

#[cfg(feature = "arbitrary1")]
fn arb_type(u: &mut arbitrary::Unstructured, depth: usize) -> arbitrary::Result<TagType> {
    if depth >= ARBITRARY_DEPTH {
        Ok(*u.choose(&TagType::PRIMITIVES)?)
    } else {
        u.arbitrary()
    }
}

#[cfg(feature = "arbitrary1")]
fn arb_tag(
    u: &mut arbitrary::Unstructured,
    tag_type: TagType,
    depth: usize,
) -> arbitrary::Result<Tag> {
    use arbitrary::Error::IncorrectFormat;

    Ok(match tag_type {
        TagType::End => return Err(IncorrectFormat),
        TagType::Byte => Tag::Byte(u.arbitrary()?),
        TagType::Short => Tag::Short(u.arbitrary()?),
        TagType::Int => Tag::Int(u.arbitrary()?),
        TagType::Long => Tag::Long(u.arbitrary()?),
        TagType::Float => Tag::Float(u.arbitrary()?),
        TagType::Double => Tag::Double(u.arbitrary()?),
        TagType::ByteArray => Tag::ByteArray(u.arbitrary()?),
        TagType::String => Tag::String(u.arbitrary()?),
        TagType::IntArray => Tag::IntArray(u.arbitrary()?),
        TagType::List => {
            // Lists need to all be the same type.
            let element = arb_type(u, depth + 1)?;
            let len = u.arbitrary_len::<u8>()?;
            let mut list = List::with_element_type(element).map_err(|_| IncorrectFormat)?;
            for _ in 0..len {
                let tag = arb_tag(u, element, depth + 1)?;
                list.push(tag).map_err(|_| IncorrectFormat)?;
            }
            Tag::List(list)
        }
        TagType::Compound => {
            let len = u.arbitrary_len::<u8>()?;
            let mut compound = Compound::new();
            for _ in 0..len {
                let name: String = u.arbitrary()?;
                let element = arb_type(u, depth + 1)?;
                compound.set(name, arb_tag(u, element, depth + 1)?);
            }
            Tag::Compound(compound)
        }
    })
}

#[cfg(feature = "arbitrary1")]
impl<'a> arbitrary::Arbitrary<'a> for Tag {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let tag_type = u.arbitrary()?;
        arb_tag(u, tag_type, 0)
    }
}
