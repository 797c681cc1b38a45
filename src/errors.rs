use crate::encoding::Kind;
use failure::Fail;
use std::io;

/// An error encountered while encoding or decoding.
#[derive(Debug, Fail)]
pub enum Error {
    /// The sink or source failed.
    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] io::Error),

    /// The source ran out before the value was complete.
    #[fail(display = "input ended in the middle of a value")]
    Truncated,

    /// The format byte is not assigned to any value family.
    #[fail(display = "unknown format byte {:#04x}", _0)]
    UnknownFormat(u8),

    /// A complete value was decoded but input remains.
    #[fail(display = "{} bytes left over after decoding", _0)]
    TrailingBytes(usize),

    /// The wire value cannot be stored in the destination type.
    #[fail(display = "expected {}, found {}", expected, found)]
    TypeMismatch {
        /// What the destination accepts.
        expected: &'static str,
        /// What the stream held.
        found: Kind,
    },

    /// A number does not fit the destination type.
    #[fail(display = "value out of range for `{}`", target)]
    OutOfRange {
        /// The destination type.
        target: &'static str,
    },

    /// A string destination received bytes that are not UTF-8.
    #[fail(display = "string is not valid UTF-8")]
    InvalidUtf8,

    /// A record was framed with the wrong number of fields.
    #[fail(display = "`{}` has {} fields, found {}", record, expected, found)]
    FieldCount {
        record: &'static str,
        expected: usize,
        found: usize,
    },

    /// An enum variant index with no matching variant.
    #[fail(display = "`{}` has no variant with index {}", record, index)]
    UnknownVariant { record: &'static str, index: u64 },

    /// The value has no representation in the format.
    #[fail(display = "cannot encode {}", _0)]
    UnsupportedType(&'static str),

    /// A string, array, or map is too long for a 32-bit length.
    #[fail(display = "length {} does not fit a 32-bit length prefix", _0)]
    LengthOverflow(usize),

    /// Containers are nested deeper than the decoder allows.
    #[fail(display = "nesting exceeds the limit of {}", _0)]
    DepthLimit(usize),

    /// Decoding was asked to fill no destination.
    #[fail(display = "cannot decode into a nil destination")]
    NilDestination,
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::Truncated
        } else {
            Error::Io(e)
        }
    }
}

impl Error {
    pub(crate) fn mismatch(expected: &'static str, found: Kind) -> Self {
        Error::TypeMismatch { expected, found }
    }

    pub(crate) fn out_of_range(target: &'static str) -> Self { Error::OutOfRange { target } }
}
