use crate::{Endian, TagType};

/// Builder for NBT data. This is to create test data. It specifically does
/// *not* guarantee the resulting data is valid NBT. Creating invalid NBT is
/// useful for testing.
pub struct Builder {
    payload: Vec<u8>,
    endian: Endian,
}

impl Builder {
    pub fn new() -> Self {
        Self::with_endian(Endian::Big)
    }

    pub fn with_endian(endian: Endian) -> Self {
        Builder {
            payload: Vec::new(),
            endian,
        }
    }

    pub fn tag(mut self, t: TagType) -> Self {
        self.payload.push(t as u8);
        self
    }

    pub fn name(self, name: &str) -> Self {
        let name = cesu8::to_java_cesu8(name);
        self.raw_str_len(name.len()).raw_bytes(&name)
    }

    pub fn start_compound(self, name: &str) -> Self {
        self.tag(TagType::Compound).name(name)
    }

    pub fn end_compound(self) -> Self {
        self.tag(TagType::End)
    }

    pub fn start_list(self, name: &str, element_tag: TagType, size: i32) -> Self {
        self.tag(TagType::List)
            .name(name)
            .tag(element_tag)
            .int_payload(size)
    }

    pub fn start_anon_list(self, element_tag: TagType, size: i32) -> Self {
        self.tag(element_tag).int_payload(size)
    }

    pub fn byte(self, name: &str, b: i8) -> Self {
        self.tag(TagType::Byte).name(name).byte_payload(b)
    }

    pub fn short(self, name: &str, b: i16) -> Self {
        self.tag(TagType::Short).name(name).short_payload(b)
    }

    pub fn int(self, name: &str, b: i32) -> Self {
        self.tag(TagType::Int).name(name).int_payload(b)
    }

    pub fn long(self, name: &str, b: i64) -> Self {
        self.tag(TagType::Long).name(name).long_payload(b)
    }

    pub fn string(self, name: &str, s: &str) -> Self {
        self.tag(TagType::String).name(name).string_payload(s)
    }

    pub fn float(self, name: &str, n: f32) -> Self {
        self.tag(TagType::Float).name(name).float_payload(n)
    }

    pub fn double(self, name: &str, n: f64) -> Self {
        self.tag(TagType::Double).name(name).double_payload(n)
    }

    pub fn byte_array(self, name: &str, bs: &[u8]) -> Self {
        self.tag(TagType::ByteArray)
            .name(name)
            .int_payload(bs.len().try_into().unwrap())
            .raw_bytes(bs)
    }

    pub fn int_array(self, name: &str, arr: &[i32]) -> Self {
        self.tag(TagType::IntArray)
            .name(name)
            .int_payload(arr.len().try_into().unwrap())
            .int_array_payload(arr)
    }

    pub fn string_payload(self, s: &str) -> Self {
        self.name(s)
    }

    pub fn byte_payload(mut self, b: i8) -> Self {
        self.payload.push(b as u8);
        self
    }

    pub fn short_payload(self, i: i16) -> Self {
        let bytes = match self.endian {
            Endian::Big => i.to_be_bytes(),
            Endian::Little => i.to_le_bytes(),
        };
        self.raw_bytes(&bytes)
    }

    pub fn int_payload(self, i: i32) -> Self {
        let bytes = match self.endian {
            Endian::Big => i.to_be_bytes(),
            Endian::Little => i.to_le_bytes(),
        };
        self.raw_bytes(&bytes)
    }

    pub fn int_array_payload(mut self, is: &[i32]) -> Self {
        for i in is {
            self = self.int_payload(*i);
        }
        self
    }

    pub fn long_payload(self, i: i64) -> Self {
        let bytes = match self.endian {
            Endian::Big => i.to_be_bytes(),
            Endian::Little => i.to_le_bytes(),
        };
        self.raw_bytes(&bytes)
    }

    pub fn float_payload(self, f: f32) -> Self {
        let bytes = match self.endian {
            Endian::Big => f.to_be_bytes(),
            Endian::Little => f.to_le_bytes(),
        };
        self.raw_bytes(&bytes)
    }

    pub fn double_payload(self, f: f64) -> Self {
        let bytes = match self.endian {
            Endian::Big => f.to_be_bytes(),
            Endian::Little => f.to_le_bytes(),
        };
        self.raw_bytes(&bytes)
    }

    pub fn raw_str_len(self, len: usize) -> Self {
        let len: u16 = len.try_into().expect("test given length beyond u16");
        let bytes = match self.endian {
            Endian::Big => len.to_be_bytes(),
            Endian::Little => len.to_le_bytes(),
        };
        self.raw_bytes(&bytes)
    }

    /// Straight up add some bytes to the payload. For very corner-case tests
    /// that are not worth a specific builder method.
    pub fn raw_bytes(mut self, bs: &[u8]) -> Self {
        self.payload.extend_from_slice(bs);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.payload
    }
}
