//! Contains the Error and Result type used throughout the crate.
use std::fmt::Display;

use crate::TagType;

/// Various errors that can occur while building, reading or writing NBT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input was not valid NBT: a bad tag type byte, a list of `End` tags
    /// with a non-zero length, a repeated compound key, an unknown compression
    /// magic number and so on.
    Malformed,

    /// The input ran out part way through a value.
    UnexpectedEof,

    /// An argument given by the caller was out of range, eg. an `End` tag type
    /// given to a constructor or a string too long for its length prefix.
    InvalidArgument,

    /// An operation was called on a tag of the wrong variant, or a tag was
    /// added to a list with a different element type.
    TypeMismatch,

    /// The element type of a non-empty list was changed in a way that would
    /// break its lock.
    InvalidOperation,

    /// The operation is not possible on this input, such as detecting the
    /// compression of a stream that cannot seek.
    Unsupported,

    /// Any other IO error from the underlying stream.
    Io,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Self {
                msg: "eof: unexpectedly ran out of input".to_owned(),
                kind: ErrorKind::UnexpectedEof,
            },
            _ => Self {
                msg: format!("io error: {}", e),
                kind: ErrorKind::Io,
            },
        }
    }
}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_eof(&self) -> bool {
        self.kind == ErrorKind::UnexpectedEof
    }

    pub fn is_malformed(&self) -> bool {
        self.kind == ErrorKind::Malformed
    }

    pub fn is_type_mismatch(&self) -> bool {
        self.kind == ErrorKind::TypeMismatch
    }

    fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind,
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Malformed, msg)
    }

    pub(crate) fn invalid_tag(tag: u8) -> Self {
        Self::malformed(format!("invalid nbt tag value: {}", tag))
    }

    pub(crate) fn unexpected_eof() -> Self {
        Self::new(ErrorKind::UnexpectedEof, "eof: unexpectedly ran out of input")
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, msg)
    }

    pub(crate) fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOperation, msg)
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsupported, msg)
    }

    /// A shorthand operation was used on the wrong variant of tag.
    pub(crate) fn wrong_variant(expected: &[TagType], found: TagType) -> Self {
        let expected: Vec<_> = expected.iter().map(|t| format!("'{}'", t)).collect();
        Self::new(
            ErrorKind::TypeMismatch,
            format!(
                "tag expected to be {} for this operation, but is '{}'",
                expected.join(" or "),
                found
            ),
        )
    }

    /// A tag was put into a list locked to another element type.
    pub(crate) fn list_element(expected: TagType, found: TagType) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!(
                "can't add tag of type '{}' to list of type '{}'",
                found, expected
            ),
        )
    }
}
