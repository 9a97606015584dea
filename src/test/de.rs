use std::io::{BufReader, Cursor};

use super::builder::Builder;
use crate::{
    de::Decoder,
    error::{ErrorKind, Result},
    from_bytes, from_reader, from_stream, Compression, Endian, ReadOpts, Tag, TagType,
    TextEncoding,
};

fn raw() -> ReadOpts {
    ReadOpts::new().compression(Compression::Uncompressed)
}

/// Wrap tag bytes in an unnamed root compound and read it.
fn read_in_root(inner: Builder) -> Result<Tag> {
    let payload = inner.end_compound().build();
    let mut data = Builder::new().start_compound("").build();
    data.extend_from_slice(&payload);
    from_bytes(&data, &raw()).map(|(_, tag)| tag)
}

#[test]
fn minimal_compound() -> Result<()> {
    let data = [0x0a, 0x00, 0x00, 0x01, 0x00, 0x03, b'f', b'o', b'o', 0x2a, 0x00];
    let (name, root) = from_bytes(&data, &raw())?;

    assert_eq!(name, "");
    assert_eq!(root.len()?, 1);
    assert_eq!(root.get("foo")?, Some(&Tag::Byte(42)));
    Ok(())
}

#[test]
fn root_name_is_returned() -> Result<()> {
    let data = Builder::new().start_compound("hello world").end_compound().build();
    let (name, root) = from_bytes(&data, &raw())?;

    assert_eq!(name, "hello world");
    assert!(root.is_empty()?);
    Ok(())
}

#[test]
fn simple_scalars() -> Result<()> {
    let root = read_in_root(
        Builder::new()
            .byte("b", -12)
            .short("s", 1234)
            .int("i", 50345)
            .long("l", i32::MAX as i64 + 1)
            .float("f", 1.23)
            .double("d", 1.23),
    )?;

    assert_eq!(root.get("b")?, Some(&Tag::Byte(-12)));
    assert_eq!(root.get("s")?, Some(&Tag::Short(1234)));
    assert_eq!(root.get("i")?, Some(&Tag::Int(50345)));
    assert_eq!(root.get("l")?, Some(&Tag::Long(i32::MAX as i64 + 1)));
    assert_eq!(root.get("f")?.unwrap().as_float()?, 1.23);
    assert_eq!(root.get("d")?.unwrap().as_double()?, 1.23);
    Ok(())
}

#[test]
fn arrays_and_strings() -> Result<()> {
    let root = read_in_root(
        Builder::new()
            .byte_array("ba", &[1, 2, 255])
            .int_array("ia", &[-1, 0, i32::MAX])
            .string("s", "Hello, 世界"),
    )?;

    assert_eq!(root.get("ba")?.unwrap().as_byte_array()?, &[1, 2, 255][..]);
    assert_eq!(root.get("ia")?.unwrap().as_int_array()?, &[-1, 0, i32::MAX][..]);
    assert_eq!(root.get("s")?.unwrap().as_str()?, "Hello, 世界");
    Ok(())
}

#[test]
fn modified_utf8_names() -> Result<()> {
    let root = read_in_root(Builder::new().int("a\0😀", 1))?;
    assert!(root.contains_key("a\0😀")?);
    Ok(())
}

#[test]
fn keys_keep_input_order() -> Result<()> {
    let root = read_in_root(Builder::new().int("z", 1).int("a", 2).int("m", 3))?;
    let keys: Vec<_> = root.as_compound()?.keys().cloned().collect();
    assert_eq!(keys, ["z", "a", "m"]);
    Ok(())
}

#[test]
fn list_of_ints() -> Result<()> {
    let root = read_in_root(
        Builder::new()
            .start_list("list", TagType::Int, 3)
            .int_payload(1)
            .int_payload(2)
            .int_payload(3),
    )?;

    let list = root.get("list")?.unwrap().as_list()?;
    assert_eq!(list.element_type(), Some(TagType::Int));
    assert!(!list.is_dynamic());
    assert_eq!(list.as_slice(), &[Tag::Int(1), Tag::Int(2), Tag::Int(3)]);
    Ok(())
}

#[test]
fn list_of_compounds() -> Result<()> {
    let root = read_in_root(
        Builder::new()
            .start_list("list", TagType::Compound, 2)
            .int("a", 1)
            .end_compound()
            .end_compound(),
    )?;

    let list = root.get("list")?.unwrap().as_list()?;
    assert_eq!(list.len(), 2);
    assert_eq!(list.get(0).unwrap().get("a")?, Some(&Tag::Int(1)));
    assert!(list.get(1).unwrap().is_empty()?);
    Ok(())
}

#[test]
fn nested_lists() -> Result<()> {
    let root = read_in_root(
        Builder::new()
            .start_list("outer", TagType::List, 2)
            .start_anon_list(TagType::Byte, 1)
            .byte_payload(7)
            .start_anon_list(TagType::End, 0),
    )?;

    let outer = root.get("outer")?.unwrap();
    assert_eq!(outer.get_at(0)?.unwrap().get_at(0)?, Some(&Tag::Byte(7)));
    assert!(outer.get_at(1)?.unwrap().as_list()?.is_dynamic());
    Ok(())
}

#[test]
fn empty_list_of_end_is_dynamic() -> Result<()> {
    let root = read_in_root(Builder::new().start_list("e", TagType::End, 0))?;

    let list = root.get("e")?.unwrap().as_list()?;
    assert!(list.is_empty());
    assert!(list.is_dynamic());
    assert_eq!(list.element_type(), None);
    Ok(())
}

#[test]
fn empty_typed_list_stays_fixed() -> Result<()> {
    let root = read_in_root(Builder::new().start_list("e", TagType::String, 0))?;

    let list = root.get("e")?.unwrap().as_list()?;
    assert!(list.is_empty());
    assert!(!list.is_dynamic());
    assert_eq!(list.element_type(), Some(TagType::String));
    Ok(())
}

#[test]
fn list_of_end_with_length_is_malformed() {
    let err = read_in_root(Builder::new().start_list("e", TagType::End, 1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn negative_lengths_are_malformed() {
    let err = read_in_root(Builder::new().start_list("e", TagType::Int, -1)).unwrap_err();
    assert!(err.is_malformed());

    let err = read_in_root(
        Builder::new()
            .tag(TagType::ByteArray)
            .name("ba")
            .int_payload(-5),
    )
    .unwrap_err();
    assert!(err.is_malformed());

    let err = read_in_root(
        Builder::new()
            .tag(TagType::IntArray)
            .name("ia")
            .int_payload(i32::MIN),
    )
    .unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn duplicate_key_is_malformed() {
    let err = read_in_root(Builder::new().int("x", 1).byte("x", 2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn invalid_tag_type_is_malformed() {
    let err = read_in_root(Builder::new().raw_bytes(&[12]).name("x")).unwrap_err();
    assert!(err.is_malformed());

    let err = read_in_root(Builder::new().start_list("l", TagType::Int, 0).raw_bytes(&[0xff]))
        .unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn invalid_string_is_malformed() {
    let err = read_in_root(
        Builder::new()
            .tag(TagType::String)
            .name("s")
            .raw_str_len(2)
            .raw_bytes(&[0xc3, 0x28]),
    )
    .unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn lone_surrogate_string_is_malformed() {
    // The high half of U+1F600 with no low half after it.
    let err = read_in_root(
        Builder::new()
            .tag(TagType::String)
            .name("s")
            .raw_str_len(3)
            .raw_bytes(&[0xed, 0xa0, 0xbd]),
    )
    .unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn buffered_file_like_reader() -> Result<()> {
    let data = Builder::new()
        .start_compound("")
        .int("a", 1)
        .end_compound()
        .build();

    let mut reader = BufReader::new(Cursor::new(data));
    let (_, root) = from_reader(&mut reader, &ReadOpts::new())?;
    assert_eq!(root.get("a")?, Some(&Tag::Int(1)));
    Ok(())
}

#[test]
fn empty_input_is_eof() {
    let err = from_bytes(&[], &raw()).unwrap_err();
    assert!(err.is_eof());
}

#[test]
fn truncated_input_is_eof() {
    let data = Builder::new()
        .start_compound("")
        .int("abc", 5)
        .end_compound()
        .build();

    for len in 1..data.len() {
        let err = from_bytes(&data[..len], &raw()).unwrap_err();
        assert!(err.is_eof(), "cut at {}: {:?}", len, err);
    }
}

#[test]
fn truncated_byte_array_is_eof() {
    let data = Builder::new()
        .start_compound("")
        .tag(TagType::ByteArray)
        .name("ba")
        .int_payload(1_000_000)
        .raw_bytes(&[1, 2, 3])
        .build();

    assert!(from_bytes(&data, &raw()).unwrap_err().is_eof());
}

#[test]
fn huge_list_length_does_not_allocate_up_front() {
    let data = Builder::new()
        .start_compound("")
        .start_list("l", TagType::Long, i32::MAX)
        .long_payload(1)
        .build();

    assert!(from_bytes(&data, &raw()).unwrap_err().is_eof());
}

#[test]
fn root_must_be_compound() {
    let data = Builder::new().int("root", 1).build();
    let err = from_bytes(&data, &raw()).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn root_of_any_type_when_allowed() -> Result<()> {
    let data = Builder::new().int("root", 1).build();
    let (name, tag) = from_bytes(&data, &raw().ensure_compound(false))?;
    assert_eq!(name, "root");
    assert_eq!(tag, Tag::Int(1));
    Ok(())
}

#[test]
fn root_of_end_is_malformed() {
    let err = from_bytes(&[0], &raw().ensure_compound(false)).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn little_endian() -> Result<()> {
    let data = Builder::with_endian(Endian::Little)
        .start_compound("le")
        .short("s", 0x0102)
        .int("i", 0x01020304)
        .start_list("l", TagType::Long, 1)
        .long_payload(-2)
        .end_compound()
        .build();

    let (name, root) = from_bytes(&data, &raw().endian(Endian::Little))?;
    assert_eq!(name, "le");
    assert_eq!(root.get("s")?, Some(&Tag::Short(0x0102)));
    assert_eq!(root.get("i")?, Some(&Tag::Int(0x01020304)));
    assert_eq!(root.get("l")?.unwrap().get_at(0)?, Some(&Tag::Long(-2)));
    Ok(())
}

#[test]
fn standard_utf8_strings() -> Result<()> {
    // A four byte sequence is not valid Modified UTF-8.
    let emoji = "😀".as_bytes();
    let data = Builder::new()
        .start_compound("")
        .tag(TagType::String)
        .name("s")
        .raw_str_len(emoji.len())
        .raw_bytes(emoji)
        .end_compound()
        .build();

    assert!(from_bytes(&data, &raw()).unwrap_err().is_malformed());

    let (_, root) = from_bytes(&data, &raw().encoding(TextEncoding::Utf8))?;
    assert_eq!(root.get("s")?.unwrap().as_str()?, "😀");
    Ok(())
}

#[test]
fn nesting_up_to_max_depth() -> Result<()> {
    let nested = |depth: usize| {
        let mut b = Builder::new().start_compound("");
        for _ in 1..depth {
            b = b.start_compound("c");
        }
        for _ in 0..depth {
            b = b.end_compound();
        }
        b.build()
    };

    let opts = raw().max_depth(4);
    from_bytes(&nested(4), &opts)?;
    assert!(from_bytes(&nested(5), &opts).unwrap_err().is_malformed());

    // Deeply nested input is rejected by the default limit rather than
    // overflowing the stack.
    assert!(from_bytes(&nested(10_000), &raw()).unwrap_err().is_malformed());
    Ok(())
}

#[test]
fn stream_needs_explicit_compression() -> Result<()> {
    let data = Builder::new().start_compound("").end_compound().build();

    let err = from_stream(data.as_slice(), &ReadOpts::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);

    let (_, root) = from_stream(data.as_slice(), &raw())?;
    assert!(root.is_empty()?);
    Ok(())
}

#[test]
fn decoder_reads_consecutive_tags() -> Result<()> {
    let data = Builder::new().int("a", 1).string("b", "two").build();
    let mut decoder = Decoder::new(Cursor::new(data), Endian::Big, TextEncoding::ModifiedUtf8);

    assert_eq!(decoder.read_named()?, ("a".to_owned(), Tag::Int(1)));
    assert_eq!(decoder.read_named()?, ("b".to_owned(), Tag::from("two")));
    assert!(decoder.read_named().unwrap_err().is_eof());
    Ok(())
}

#[test]
fn decoder_reads_bare_payloads() -> Result<()> {
    let data = Builder::new().int_payload(-7).string_payload("x").build();
    let mut decoder = Decoder::new(data.as_slice(), Endian::Big, TextEncoding::ModifiedUtf8);

    assert_eq!(decoder.read_payload(TagType::Int)?, Tag::Int(-7));
    assert_eq!(decoder.read_payload(TagType::String)?, Tag::from("x"));
    assert_eq!(
        decoder.read_payload(TagType::End).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert!(decoder.into_inner().is_empty());
    Ok(())
}
