//! Reading NBT into a [`Tag`] tree.
//!
//! The usual entry points are [`from_reader`] for files and other seekable
//! streams, [`from_stream`] for streams that can't seek, and [`from_bytes`].
//! Each returns the name of the root tag alongside the tree, since the name
//! isn't part of the root's value.
//!
//! ```
//! use nbtree::{from_bytes, ReadOpts, Tag};
//!
//! // An unnamed compound holding the byte "foo" = 42.
//! let data = [0x0A, 0x00, 0x00, 0x01, 0x00, 0x03, b'f', b'o', b'o', 0x2A, 0x00];
//!
//! let (name, root) = from_bytes(&data, &ReadOpts::new()).unwrap();
//! assert_eq!(name, "");
//! assert_eq!(root.get("foo").unwrap(), Some(&Tag::Byte(42)));
//! ```
//!
//! A decode is all or nothing: any error aborts it and no partial tree is
//! returned.
//!
//! [`Decoder`] reads single tags or payloads without the compression
//! envelope or the root checks.

use std::io::{Cursor, Read, Seek};

use byteorder::ReadBytesExt;
use log::trace;

use crate::{
    compression::{Compression, DecompressReader},
    endian::{Endian, EndianRead},
    error::{Error, Result},
    mutf8::TextEncoding,
    Compound, List, Tag, TagType,
};

/// Lengths read from the input are not trusted for preallocation beyond
/// this many elements.
const PREALLOC_LIMIT: usize = 4096;

/// Options for reading NBT.
///
/// ```
/// use nbtree::{Compression, Endian, ReadOpts};
///
/// let opts = ReadOpts::new()
///     .compression(Compression::Uncompressed)
///     .endian(Endian::Little)
///     .ensure_compound(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOpts {
    endian: Endian,
    encoding: TextEncoding,
    compression: Option<Compression>,
    ensure_compound: bool,
    max_depth: usize,
}

impl Default for ReadOpts {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadOpts {
    /// Big endian, Modified UTF-8, compression detected from the input, root
    /// must be a compound.
    pub fn new() -> Self {
        Self {
            endian: Endian::Big,
            encoding: TextEncoding::ModifiedUtf8,
            compression: None,
            ensure_compound: true,
            max_depth: 512,
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

    /// Use the given compression rather than detecting it.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Whether a root tag other than a compound is an error.
    pub fn ensure_compound(mut self, ensure: bool) -> Self {
        self.ensure_compound = ensure;
        self
    }

    /// Maximum nesting of lists and compounds. Deeper input is treated as
    /// malformed.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Read NBT from a seekable stream such as a file, detecting the compression
/// unless [`ReadOpts::compression`] was set.
///
/// The stream is only borrowed and is left open. Uncompressed data is read
/// field by field straight from the stream, so wrap a `File` in a
/// [`BufReader`][std::io::BufReader] first. No buffer is added here, so an
/// uncompressed stream is left positioned just after the NBT.
///
/// GZip data is read to its end so that the trailer's checksum is verified.
pub fn from_reader<R: Read + Seek>(reader: &mut R, opts: &ReadOpts) -> Result<(String, Tag)> {
    let compression = match opts.compression {
        Some(compression) => compression,
        None => Compression::detect(reader)?,
    };
    read_root(compression.wrap_for_read(reader), opts)
}

/// Read NBT from a stream that can't seek. The compression can't be
/// detected without seeking, so must be given in `opts`.
pub fn from_stream<R: Read>(reader: R, opts: &ReadOpts) -> Result<(String, Tag)> {
    let compression = opts.compression.ok_or_else(|| {
        Error::unsupported(
            "can't detect nbt compression of a stream that doesn't support seeking, \
             set the compression explicitly",
        )
    })?;
    read_root(compression.wrap_for_read(reader), opts)
}

/// Read NBT from a byte slice, detecting the compression unless
/// [`ReadOpts::compression`] was set.
pub fn from_bytes(bytes: &[u8], opts: &ReadOpts) -> Result<(String, Tag)> {
    from_reader(&mut Cursor::new(bytes), opts)
}

fn read_root<R: Read>(reader: DecompressReader<R>, opts: &ReadOpts) -> Result<(String, Tag)> {
    let mut decoder = Decoder::with_opts(reader, opts);

    let tag_type = decoder.read_tag_type(false)?;
    if opts.ensure_compound && tag_type != TagType::Compound {
        return Err(Error::malformed("invalid nbt: no root compound"));
    }

    let name = decoder.read_string()?;
    let tag = decoder.read_payload(tag_type)?;
    decoder.into_inner().finish()?;
    trace!("read root {} named {:?}", tag_type, name);

    Ok((name, tag))
}

/// Reads tags from a stream of uncompressed NBT.
pub struct Decoder<R: Read> {
    reader: R,
    endian: Endian,
    encoding: TextEncoding,
    max_depth: usize,
    depth: usize,
    scratch: Vec<u8>,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R, endian: Endian, encoding: TextEncoding) -> Self {
        Self::with_opts(reader, &ReadOpts::new().endian(endian).encoding(encoding))
    }

    /// Create a decoder using the byte order, encoding and depth limit of
    /// `opts`. Compression and root options don't apply at this level.
    pub fn with_opts(reader: R, opts: &ReadOpts) -> Self {
        Self {
            reader,
            endian: opts.endian,
            encoding: opts.encoding,
            max_depth: opts.max_depth,
            depth: 0,
            scratch: Vec::new(),
        }
    }

    /// Gets a reference to the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Gets a mutable reference to the underlying stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consumes this decoder, returning the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }

    pub fn read_tag_type(&mut self, allow_end: bool) -> Result<TagType> {
        let code = self.reader.read_u8()?;
        TagType::from_code(code, allow_end)
    }

    /// Read a string prefixed with its length in bytes as a u16.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.reader.read_u16_endian(self.endian)? as usize;
        self.scratch.clear();
        self.scratch.resize(len, 0);
        self.reader.read_exact(&mut self.scratch)?;
        self.encoding.decode(&self.scratch)
    }

    /// Read a full tag: its type, name and payload. An `End` tag is not
    /// valid here.
    pub fn read_named(&mut self) -> Result<(String, Tag)> {
        let tag_type = self.read_tag_type(false)?;
        let name = self.read_string()?;
        let tag = self.read_payload(tag_type)?;
        Ok((name, tag))
    }

    /// Read the payload of a tag of the given type.
    pub fn read_payload(&mut self, tag_type: TagType) -> Result<Tag> {
        let mut tag = Tag::create_default(tag_type)?;

        match &mut tag {
            Tag::Byte(v) => *v = self.reader.read_i8()?,
            Tag::Short(v) => *v = self.reader.read_i16_endian(self.endian)?,
            Tag::Int(v) => *v = self.reader.read_i32_endian(self.endian)?,
            Tag::Long(v) => *v = self.reader.read_i64_endian(self.endian)?,
            Tag::Float(v) => *v = self.reader.read_f32_endian(self.endian)?,
            Tag::Double(v) => *v = self.reader.read_f64_endian(self.endian)?,
            Tag::ByteArray(v) => *v = self.read_byte_array()?,
            Tag::String(v) => *v = self.read_string()?,
            Tag::IntArray(v) => *v = self.read_int_array()?,
            Tag::List(v) => {
                self.enter()?;
                let list = self.read_list();
                self.depth -= 1;
                *v = list?;
            }
            Tag::Compound(v) => {
                self.enter()?;
                let compound = self.read_compound();
                self.depth -= 1;
                *v = compound?;
            }
        }

        Ok(tag)
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::malformed(format!(
                "invalid nbt: nested deeper than {} levels",
                self.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn read_len(&mut self) -> Result<usize> {
        let len = self.reader.read_i32_endian(self.endian)?;
        usize::try_from(len)
            .map_err(|_| Error::malformed(format!("invalid nbt: negative length {}", len)))
    }

    fn read_byte_array(&mut self) -> Result<Vec<u8>> {
        let len = self.read_len()?;
        let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        self.reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
        if buf.len() != len {
            return Err(Error::unexpected_eof());
        }
        Ok(buf)
    }

    fn read_int_array(&mut self) -> Result<Vec<i32>> {
        let len = self.read_len()?;
        let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        for _ in 0..len {
            buf.push(self.reader.read_i32_endian(self.endian)?);
        }
        Ok(buf)
    }

    fn read_list(&mut self) -> Result<List> {
        let element_type = self.read_tag_type(true)?;
        let len = self.read_len()?;

        if element_type == TagType::End {
            if len != 0 {
                return Err(Error::malformed(format!(
                    "invalid nbt: list of 'End' with length {}",
                    len
                )));
            }
            return Ok(List::new());
        }

        // Elements have no type or name of their own, both come from the
        // list header.
        let mut tags = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        for _ in 0..len {
            tags.push(self.read_payload(element_type)?);
        }

        // An empty list keeps its element type so that it writes back the
        // same way.
        Ok(List::from_parts(Some(element_type), tags))
    }

    fn read_compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::new();

        loop {
            let tag_type = self.read_tag_type(true)?;
            if tag_type == TagType::End {
                break;
            }

            let name = self.read_string()?;
            if compound.contains_key(&name) {
                return Err(Error::malformed(format!(
                    "invalid nbt: multiple occurrences of key '{}' in compound",
                    name
                )));
            }

            let tag = self.read_payload(tag_type)?;
            compound.set(name, tag);
        }

        Ok(compound)
    }
}
