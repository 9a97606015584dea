use crate::TagType;

pub mod builder;

#[allow(clippy::float_cmp)]
mod de;

macro_rules! check_tags {
    {$($tag:ident = $val:literal),* $(,)?} => {
        $(
            assert_eq!(u8::from(TagType::$tag), $val);
            assert_eq!(TagType::try_from($val), Ok(TagType::$tag));
        )*
    };
}

#[test]
fn exhaustive_tag_check() {
    check_tags! {
        End = 0,
        Byte = 1,
        Short = 2,
        Int = 3,
        Long = 4,
        Float = 5,
        Double = 6,
        ByteArray = 7,
        String = 8,
        List = 9,
        Compound = 10,
        IntArray = 11,
    }

    for value in 12..=u8::MAX {
        assert!(TagType::try_from(value).is_err());
        assert!(!TagType::is_valid(value, true));
    }
}

#[test]
fn end_is_only_valid_as_terminator() {
    assert!(TagType::is_valid(0, true));
    assert!(!TagType::is_valid(0, false));
    assert!(TagType::from_code(0, false).unwrap_err().is_malformed());
    assert_eq!(TagType::from_code(0, true), Ok(TagType::End));
    assert!(TagType::from_code(12, true).unwrap_err().is_malformed());
}

#[test]
fn tag_type_categories() {
    for t in TagType::PRIMITIVES {
        assert!(t.is_primitive());
        assert!(!t.is_collection());
    }
    for t in TagType::ARRAYS {
        assert!(t.is_array());
        assert!(t.is_primitive());
    }
    for t in TagType::COLLECTIONS {
        assert!(t.is_collection());
        assert!(!t.is_primitive());
    }
    assert!(TagType::End.is_terminator());
    assert!(!TagType::End.is_primitive());
    assert!(!TagType::End.is_collection());
    assert!(!TagType::String.is_array());
}

#[test]
fn tag_type_display() {
    assert_eq!(TagType::IntArray.to_string(), "IntArray");
    assert_eq!(TagType::End.to_string(), "End");
}
