//! Writing a [`Tag`] tree as NBT.
//!
//! [`to_writer`] and [`to_bytes`] write a named root tag inside the
//! compression envelope chosen in [`WriteOpts`]. There is no default
//! compression, callers pick one explicitly.
//!
//! ```
//! use nbtree::{Compound, Compression, Tag, WriteOpts};
//!
//! let mut root = Compound::new();
//! root.insert("foo", Tag::Byte(42)).unwrap();
//!
//! let bytes = nbtree::to_bytes("", &Tag::Compound(root), &WriteOpts::new(Compression::Uncompressed)).unwrap();
//! assert_eq!(bytes, [0x0A, 0x00, 0x00, 0x01, 0x00, 0x03, b'f', b'o', b'o', 0x2A, 0x00]);
//! ```

use std::io::Write;

use byteorder::WriteBytesExt;
use log::trace;

use crate::{
    compression::Compression,
    endian::{Endian, EndianWrite},
    error::{Error, Result},
    mutf8::TextEncoding,
    Compound, List, Tag, TagType,
};

/// Options for writing NBT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOpts {
    compression: Compression,
    endian: Endian,
    encoding: TextEncoding,
    ensure_compound: bool,
}

impl WriteOpts {
    /// Big endian, Modified UTF-8, root must be a compound.
    pub fn new(compression: Compression) -> Self {
        Self {
            compression,
            endian: Endian::Big,
            encoding: TextEncoding::ModifiedUtf8,
            ensure_compound: true,
        }
    }

    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Whether a root tag other than a compound is refused.
    pub fn ensure_compound(mut self, ensure: bool) -> Self {
        self.ensure_compound = ensure;
        self
    }
}

/// Write `tag` as the root of an NBT document called `name`.
///
/// The compressed stream is finished and the writer flushed before
/// returning, but the writer itself is only borrowed and is left open.
pub fn to_writer<W: Write>(writer: &mut W, name: &str, tag: &Tag, opts: &WriteOpts) -> Result<()> {
    if opts.ensure_compound && tag.tag_type() != TagType::Compound {
        return Err(Error::invalid_argument(format!(
            "root tag must be a compound, but is '{}'",
            tag.tag_type()
        )));
    }

    let mut encoder = Encoder::with_opts(opts.compression.wrap_for_write(writer), opts);
    encoder.write_named(name, tag)?;
    encoder.into_inner().finish()?;
    trace!("wrote root {} named {:?}", tag.tag_type(), name);

    Ok(())
}

/// Write `tag` as the root of an NBT document called `name` into a new
/// buffer.
pub fn to_bytes(name: &str, tag: &Tag, opts: &WriteOpts) -> Result<Vec<u8>> {
    let mut result = vec![];
    to_writer(&mut result, name, tag, opts)?;
    Ok(result)
}

/// Writes tags to a stream as uncompressed NBT.
pub struct Encoder<W: Write> {
    writer: W,
    endian: Endian,
    encoding: TextEncoding,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W, endian: Endian, encoding: TextEncoding) -> Self {
        Self {
            writer,
            endian,
            encoding,
        }
    }

    /// Create an encoder using the byte order and encoding of `opts`.
    pub fn with_opts(writer: W, opts: &WriteOpts) -> Self {
        Self::new(writer, opts.endian, opts.encoding)
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_tag_type(&mut self, tag_type: TagType) -> Result<()> {
        self.writer.write_u8(tag_type.into())?;
        Ok(())
    }

    /// Write a string prefixed with its length in bytes as a u16. Fails for
    /// strings longer than that can describe.
    pub fn write_string(&mut self, s: &str) -> Result<()> {
        let bytes = self.encoding.encode(s);
        let len = u16::try_from(bytes.len()).map_err(|_| {
            Error::invalid_argument(format!(
                "string of {} bytes is too long for nbt, the maximum is {}",
                bytes.len(),
                u16::MAX
            ))
        })?;
        self.writer.write_u16_endian(len, self.endian)?;
        self.writer.write_all(&bytes)?;
        Ok(())
    }

    /// Write a full tag: its type, name and payload.
    pub fn write_named(&mut self, name: &str, tag: &Tag) -> Result<()> {
        self.write_tag_type(tag.tag_type())?;
        self.write_string(name)?;
        self.write_payload(tag)
    }

    /// Write the payload of a tag, which is all of it bar the type and name.
    pub fn write_payload(&mut self, tag: &Tag) -> Result<()> {
        match tag {
            Tag::Byte(v) => self.writer.write_i8(*v)?,
            Tag::Short(v) => self.writer.write_i16_endian(*v, self.endian)?,
            Tag::Int(v) => self.writer.write_i32_endian(*v, self.endian)?,
            Tag::Long(v) => self.writer.write_i64_endian(*v, self.endian)?,
            Tag::Float(v) => self.writer.write_f32_endian(*v, self.endian)?,
            Tag::Double(v) => self.writer.write_f64_endian(*v, self.endian)?,
            Tag::ByteArray(v) => {
                self.write_len(v.len())?;
                self.writer.write_all(v)?;
            }
            Tag::String(v) => self.write_string(v)?,
            Tag::List(v) => self.write_list(v)?,
            Tag::Compound(v) => self.write_compound(v)?,
            Tag::IntArray(v) => {
                self.write_len(v.len())?;
                for i in v {
                    self.writer.write_i32_endian(*i, self.endian)?;
                }
            }
        }
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len).map_err(|_| {
            Error::invalid_argument(format!("length {} is too long for nbt", len))
        })?;
        self.writer.write_i32_endian(len, self.endian)?;
        Ok(())
    }

    fn write_list(&mut self, list: &List) -> Result<()> {
        // An empty dynamic list has no type yet and is written as a list of
        // End.
        let element_type = list.element_type().unwrap_or(TagType::End);
        self.write_tag_type(element_type)?;
        self.write_len(list.len())?;

        for tag in list {
            // Elements can be swapped through List::get_mut.
            if tag.tag_type() != element_type {
                return Err(Error::list_element(element_type, tag.tag_type()));
            }
            self.write_payload(tag)?;
        }
        Ok(())
    }

    fn write_compound(&mut self, compound: &Compound) -> Result<()> {
        for (name, tag) in compound {
            self.write_named(name, tag)?;
        }
        self.write_tag_type(TagType::End)
    }
}
