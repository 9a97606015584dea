//! Fixed width numbers in a byte order chosen at runtime.
//!
//! Java edition NBT is big endian (network order). Some other editions of
//! the format use little endian. The extension traits here pick between
//! `byteorder`'s [`BigEndian`] and [`LittleEndian`], which only swap bytes
//! when the requested order differs from the platform's.

use std::io::{Read, Write};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Result;

/// Byte order of the numbers in a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Most significant byte first. Also called network byte order.
    #[default]
    Big,
    /// Least significant byte first.
    Little,
}

macro_rules! read_endian {
    ($($name:ident => $read:ident: $ty:ty),* $(,)?) => {
        $(
            fn $name(&mut self, endian: Endian) -> Result<$ty> {
                Ok(match endian {
                    Endian::Big => self.$read::<BigEndian>()?,
                    Endian::Little => self.$read::<LittleEndian>()?,
                })
            }
        )*
    };
}

macro_rules! write_endian {
    ($($name:ident => $write:ident: $ty:ty),* $(,)?) => {
        $(
            fn $name(&mut self, v: $ty, endian: Endian) -> Result<()> {
                match endian {
                    Endian::Big => self.$write::<BigEndian>(v)?,
                    Endian::Little => self.$write::<LittleEndian>(v)?,
                }
                Ok(())
            }
        )*
    };
}

/// Reads numbers in a given byte order. Running out of input produces an
/// [`UnexpectedEof`][crate::error::ErrorKind::UnexpectedEof] error.
pub trait EndianRead: Read {
    read_endian! {
        read_i16_endian => read_i16: i16,
        read_u16_endian => read_u16: u16,
        read_i32_endian => read_i32: i32,
        read_u32_endian => read_u32: u32,
        read_i64_endian => read_i64: i64,
        read_u64_endian => read_u64: u64,
        read_f32_endian => read_f32: f32,
        read_f64_endian => read_f64: f64,
    }
}

impl<T> EndianRead for T where T: Read {}

/// Writes numbers in a given byte order.
pub trait EndianWrite: Write {
    write_endian! {
        write_i16_endian => write_i16: i16,
        write_u16_endian => write_u16: u16,
        write_i32_endian => write_i32: i32,
        write_u32_endian => write_u32: u32,
        write_i64_endian => write_i64: i64,
        write_u64_endian => write_u64: u64,
        write_f32_endian => write_f32: f32,
        write_f64_endian => write_f64: f64,
    }
}

impl<T> EndianWrite for T where T: Write {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn big_endian_is_network_order() -> Result<()> {
        let mut out = vec![];
        out.write_i32_endian(0x01020304, Endian::Big)?;
        assert_eq!(out, [1, 2, 3, 4]);
        assert_eq!(out.as_slice().read_i32_endian(Endian::Big)?, 0x01020304);
        Ok(())
    }

    #[test]
    fn little_endian_reverses() -> Result<()> {
        let mut out = vec![];
        out.write_u16_endian(0xABCD, Endian::Little)?;
        out.write_i64_endian(-2, Endian::Little)?;
        assert_eq!(out[..2], [0xCD, 0xAB]);
        assert_eq!(out[2..], [0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);

        let mut input = out.as_slice();
        assert_eq!(input.read_u16_endian(Endian::Little)?, 0xABCD);
        assert_eq!(input.read_i64_endian(Endian::Little)?, -2);
        Ok(())
    }

    #[test]
    fn floats_keep_their_bits() -> Result<()> {
        for endian in [Endian::Big, Endian::Little] {
            let mut out = vec![];
            out.write_f64_endian(1.23456, endian)?;
            out.write_f32_endian(-0.5, endian)?;
            out.write_u64_endian(u64::MAX - 1, endian)?;
            out.write_u32_endian(7, endian)?;

            let mut input = out.as_slice();
            assert_eq!(input.read_f64_endian(endian)?, 1.23456);
            assert_eq!(input.read_f32_endian(endian)?, -0.5);
            assert_eq!(input.read_u64_endian(endian)?, u64::MAX - 1);
            assert_eq!(input.read_u32_endian(endian)?, 7);
        }
        Ok(())
    }

    #[test]
    fn short_input_is_eof() {
        let mut input = &[1u8, 2, 3][..];
        let err = input.read_i32_endian(Endian::Big).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }
}
