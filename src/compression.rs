//! The optional compression around NBT data.
//!
//! NBT files are usually GZip compressed, but uncompressed data is common
//! too, eg. inside other containers. [`Compression`] wraps a stream so that
//! the tag reader and writer only ever see raw NBT.
//!
//! The wrappers take their stream by value, so passing `&mut stream` lends
//! it for one pass: dropping the wrapper ends the borrow and never closes the
//! stream, which stays with whoever opened it.
//!
//! ```
//! use nbtree::Compression;
//! use std::io::{Cursor, Read, Write};
//!
//! # fn main() -> nbtree::error::Result<()> {
//! let mut file = Cursor::new(Vec::new());
//!
//! let mut writer = Compression::Gzip.wrap_for_write(&mut file);
//! writer.write_all(&[10, 0, 0, 0])?;
//! writer.finish()?;
//!
//! file.set_position(0);
//! let compression = Compression::detect(&mut file)?;
//! assert_eq!(compression, Compression::Gzip);
//!
//! let mut raw = vec![];
//! compression.wrap_for_read(&mut file).read_to_end(&mut raw)?;
//! assert_eq!(raw, [10, 0, 0, 0]);
//! # Ok(())
//! # }
//! ```

use std::io::{self, Read, Seek, SeekFrom, Write};

use flate2::{read::GzDecoder, write::GzEncoder};
use log::debug;

use crate::{
    error::{Error, Result},
    TagType,
};

/// The first two bytes of any GZip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// How a stream of NBT is compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Raw NBT.
    Uncompressed,
    /// DEFLATE with a GZip header.
    Gzip,
}

impl Compression {
    /// Wrap a stream to read the NBT inside it.
    pub fn wrap_for_read<R: Read>(self, reader: R) -> DecompressReader<R> {
        match self {
            Compression::Uncompressed => DecompressReader::Uncompressed(reader),
            Compression::Gzip => DecompressReader::Gzip(GzDecoder::new(reader)),
        }
    }

    /// Wrap a stream to write NBT into it. [`CompressWriter::finish`] must be
    /// called once everything has been written.
    pub fn wrap_for_write<W: Write>(self, writer: W) -> CompressWriter<W> {
        match self {
            Compression::Uncompressed => CompressWriter::Uncompressed(writer),
            Compression::Gzip => {
                CompressWriter::Gzip(GzEncoder::new(writer, flate2::Compression::default()))
            }
        }
    }

    /// Work out the compression of a stream from its first two bytes, without
    /// consuming them.
    ///
    /// GZip is recognised by its magic number. Otherwise a first byte that is
    /// a tag type (other than `End`) means the stream is raw NBT. Anything
    /// else is a [`Malformed`][crate::error::ErrorKind::Malformed] error. A
    /// stream that fails to seek can't be rewound after peeking, so is an
    /// [`Unsupported`][crate::error::ErrorKind::Unsupported] error whatever
    /// its content.
    pub fn detect<R: Read + Seek>(reader: &mut R) -> Result<Compression> {
        reader.stream_position().map_err(|e| {
            Error::unsupported(format!(
                "can't detect nbt compression, stream doesn't support seeking: {}",
                e
            ))
        })?;

        let mut magic = [0u8; 2];
        let read = read_up_to(reader, &mut magic)?;
        reader.seek(SeekFrom::Current(-(read as i64)))?;

        let compression = match &magic[..read] {
            m if m == GZIP_MAGIC => Compression::Gzip,
            [first, ..] if TagType::is_valid(*first, false) => Compression::Uncompressed,
            _ => {
                return Err(Error::malformed(
                    "couldn't detect nbt compression, invalid magic numbers",
                ))
            }
        };

        debug!("detected nbt compression: {:?}", compression);
        Ok(compression)
    }
}

/// Fill as much of `buf` as the stream allows, stopping early at EOF.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut read = 0;
    while read < buf.len() {
        match reader.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(read)
}

/// A stream being read through a [`Compression`].
pub enum DecompressReader<R: Read> {
    Uncompressed(R),
    Gzip(GzDecoder<R>),
}

impl<R: Read> DecompressReader<R> {
    /// Unwrap the underlying stream. A GZip decoder may have read ahead of
    /// the end of the compressed data.
    pub fn into_inner(self) -> R {
        match self {
            DecompressReader::Uncompressed(r) => r,
            DecompressReader::Gzip(d) => d.into_inner(),
        }
    }
}

impl<R: Read> DecompressReader<R> {
    /// Read to the end of the compressed data so that the GZip trailer is
    /// checked, then unwrap the underlying stream.
    ///
    /// A checksum or length that doesn't match the data is
    /// [`Malformed`][crate::error::ErrorKind::Malformed], a missing trailer
    /// is [`UnexpectedEof`][crate::error::ErrorKind::UnexpectedEof].
    pub fn finish(self) -> Result<R> {
        match self {
            DecompressReader::Uncompressed(r) => Ok(r),
            DecompressReader::Gzip(mut d) => {
                io::copy(&mut d, &mut io::sink()).map_err(|e| match e.kind() {
                    io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => {
                        Error::malformed(format!("corrupt gzip stream: {}", e))
                    }
                    _ => Error::from(e),
                })?;
                Ok(d.into_inner())
            }
        }
    }
}

impl<R: Read> Read for DecompressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            DecompressReader::Uncompressed(r) => r.read(buf),
            DecompressReader::Gzip(d) => d.read(buf),
        }
    }
}

/// A stream being written through a [`Compression`].
pub enum CompressWriter<W: Write> {
    Uncompressed(W),
    Gzip(GzEncoder<W>),
}

impl<W: Write> CompressWriter<W> {
    /// Write any remaining compressed data and trailer, flush, and give back
    /// the underlying stream.
    pub fn finish(self) -> io::Result<W> {
        match self {
            CompressWriter::Uncompressed(mut w) => {
                w.flush()?;
                Ok(w)
            }
            CompressWriter::Gzip(e) => {
                let mut w = e.finish()?;
                w.flush()?;
                Ok(w)
            }
        }
    }
}

impl<W: Write> Write for CompressWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            CompressWriter::Uncompressed(w) => w.write(buf),
            CompressWriter::Gzip(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            CompressWriter::Uncompressed(w) => w.flush(),
            CompressWriter::Gzip(e) => e.flush(),
        }
    }
}
