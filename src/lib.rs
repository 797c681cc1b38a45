//! # msgpack
//!
//! A compact, self-describing binary serialization format. Every value starts
//! with a format byte that says what it is, so a stream can be read without
//! knowing its schema, and integers and short containers take as few bytes as
//! their value allows.
//!
//! # Usage
//!
//! The traits [`Ser`] and [`De`] say how a type is written and read. They are
//! implemented for the primitive and standard library types, and can be
//! derived for your own:
//!
//! ```
//! use msgpack::prelude::*;
//!
//! #[derive(Ser, De, Debug, PartialEq)]
//! struct Inner {
//!     name: String,
//! }
//!
//! #[derive(Ser, De, Debug, PartialEq)]
//! struct Outer {
//!     name: String,
//!     inner: Option<Box<Inner>>,
//! }
//!
//! let present = Outer {
//!     name: "hello".into(),
//!     inner: Some(Box::new(Inner { name: "world".into() })),
//! };
//!
//! let encoded = encode_full(&present).unwrap();
//! let decoded: Outer = decode_full(&encoded).unwrap();
//! assert_eq!(present, decoded);
//!
//! // an absent reference is written as nil
//! let absent = Outer { name: "alone".into(), inner: None };
//! assert_eq!(*encode_full(&absent).unwrap().last().unwrap(), 0xc0);
//! ```
//!
//! Streams whose shape is not known ahead of time decode into [`Value`]:
//!
//! ```
//! use msgpack::prelude::*;
//!
//! let v: Value = decode_full(&[0x92, 0x01, 0xa1, b'x']).unwrap();
//! assert_eq!(v, Value::from(vec![Value::from(1u8), Value::from("x")]));
//! ```
//!
//! # Encoding and decoding
//!
//! [`Encoder`] writes to any [`std::io::Write`] and [`Decoder`] reads from any
//! [`std::io::BufRead`]. Each handles one caller at a time and holds no global
//! state, so independent instances can be used freely from separate threads.
//! The free functions in [`encoding`] cover the common cases of encoding to a
//! buffer and decoding a buffer that holds exactly one value.
//!
//! Decoding is forgiving in one direction: a nil decodes into any scalar,
//! string, sequence, map, or time destination as that type's zero value.
//! Everything else that doesn't fit the destination is an [`Error`].
//!
//! # Specification
//!
//! This section describes the binary format.
//!
//! ## Format bytes
//!
//! The first byte of every value is its *format byte*. Some format bytes
//! carry the whole value (small integers, nil, booleans) or a short length;
//! the rest announce a fixed-width, big-endian payload.
//!
//! | Byte(s)       | Format                          |
//! | ---           | ---                             |
//! | `0x00`–`0x7f` | positive fixint (the value)     |
//! | `0x80`–`0x8f` | fixmap (low 4 bits are length)  |
//! | `0x90`–`0x9f` | fixarray (low 4 bits are length)|
//! | `0xa0`–`0xbf` | fixstr (low 5 bits are length)  |
//! | `0xc0`        | nil                             |
//! | `0xc2`/`0xc3` | false / true                    |
//! | `0xca`/`0xcb` | float32 / float64               |
//! | `0xcc`–`0xcf` | uint8 / 16 / 32 / 64            |
//! | `0xd0`–`0xd3` | int8 / 16 / 32 / 64             |
//! | `0xd9`–`0xdb` | str8 / str16 / str32            |
//! | `0xdc`/`0xdd` | array16 / array32               |
//! | `0xde`/`0xdf` | map16 / map32                   |
//! | `0xe0`–`0xff` | negative fixint (`-32..=-1`)    |
//!
//! Any other byte is rejected with [`Error::UnknownFormat`].
//!
//! ## Integers
//!
//! Unsigned integers use the narrowest of fixint, uint8, uint16, uint32, and
//! uint64 that holds them. Signed integers in `-32..=127` use a fixint, and
//! otherwise the narrowest signed format whose range holds them. Note that
//! `128` is written as int16 (`d1 00 80`), even though `-128` fits in int8.
//!
//! ## Strings
//!
//! Strings are raw bytes behind a length prefix: fixstr up to 31 bytes, str16
//! up to 65535 and str32 beyond. With [`EncoderOptions::str8`] set, strings of
//! 32 to 255 bytes use str8 instead. Decoders always accept all four.
//!
//! ## Arrays and maps
//!
//! Arrays are a length followed by that many values; maps are a length
//! followed by that many key, value pairs. Records (derived structs) are
//! arrays of their fields in declaration order. Enums are their variant index,
//! or an array of the index and the variant's fields.
//!
//! ## Times
//!
//! A [`std::time::SystemTime`] is an array of two integers: the signed
//! seconds since the Unix epoch (rounded down), then the nanoseconds within
//! that second. Nil reads as the epoch.

#![warn(
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_copy_implementations,
    missing_debug_implementations,
    macro_use_extern_crate,
    trivial_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]

// derived impls name this crate by its absolute path
extern crate self as msgpack;

#[macro_use]
mod util;

pub mod encoding;
pub mod errors;
pub mod options;
pub mod prelude;
pub mod rep;

pub use encoding::{
    decode, decode_buf, decode_full, encode, encode_bytes, encode_full, De, Decoder, Encoder,
    Kind, Number, Ser, Tag,
};
pub use errors::Error;
pub use options::{DecoderOptions, EncoderOptions};

/// Procedural macros for deriving [`Ser`] and [`De`].
#[cfg(feature = "derive")]
pub use msgpack_derive::{De, Ser};

use bytes::Bytes;
use std::{fmt, iter::FromIterator};

/// Any value the format can express.
///
/// Unsigned and signed integers are kept apart as they were read, but compare
/// equal when they hold the same number, since a non-negative integer is
/// written the same way from either side.
///
/// # Example
///
/// ```
/// use msgpack::Value;
///
/// let v = Value::from(vec![1u8, 2, 3]);
///
/// let total: u64 = v
///     .to_array()
///     .unwrap()
///     .iter()
///     .map(|x| x.to_u64().unwrap())
///     .sum();
///
/// assert_eq!(total, 6);
/// ```
#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Bool(bool),
    Uint(u64),
    Int(i64),
    F32(f32),
    F64(f64),
    /// A string, which need not be UTF-8.
    Str(Bytes),
    Array(Vec<Value>),
    /// Entries in the order they were read.
    Map(Vec<(Value, Value)>),
}

use Value::*;

impl Value {
    /// The wire family this value belongs to.
    pub fn kind(&self) -> Kind {
        match self {
            Nil => Kind::Nil,
            Bool(_) => Kind::Bool,
            Uint(_) => Kind::Uint,
            Int(_) => Kind::Int,
            F32(_) | F64(_) => Kind::Float,
            Str(_) => Kind::Str,
            Array(_) => Kind::Array,
            Map(_) => Kind::Map,
        }
    }

    pub fn is_nil(&self) -> bool { matches!(self, Nil) }

    pub fn to_bool(&self) -> Result<bool, Error> {
        match self {
            Bool(b) => Ok(*b),
            v => Err(Error::mismatch("bool", v.kind())),
        }
    }

    pub fn to_u64(&self) -> Result<u64, Error> {
        match self {
            Uint(u) => Ok(*u),
            Int(i) if *i >= 0 => Ok(*i as u64),
            Int(_) => Err(Error::out_of_range("u64")),
            v => Err(Error::mismatch("unsigned integer", v.kind())),
        }
    }

    pub fn to_i64(&self) -> Result<i64, Error> {
        match self {
            Int(i) => Ok(*i),
            Uint(u) if *u <= i64::MAX as u64 => Ok(*u as i64),
            Uint(_) => Err(Error::out_of_range("i64")),
            v => Err(Error::mismatch("signed integer", v.kind())),
        }
    }

    /// Either float width, widened to `f64`.
    pub fn to_f64(&self) -> Result<f64, Error> {
        match self {
            F32(f) => Ok(*f as f64),
            F64(f) => Ok(*f),
            v => Err(Error::mismatch("float", v.kind())),
        }
    }

    pub fn to_bytes(&self) -> Result<&Bytes, Error> {
        match self {
            Str(bs) => Ok(bs),
            v => Err(Error::mismatch("string", v.kind())),
        }
    }

    pub fn to_str(&self) -> Result<&str, Error> {
        std::str::from_utf8(self.to_bytes()?).map_err(|_| Error::InvalidUtf8)
    }

    pub fn to_array(&self) -> Result<&Vec<Value>, Error> {
        match self {
            Array(a) => Ok(a),
            v => Err(Error::mismatch("array", v.kind())),
        }
    }

    pub fn into_array(self) -> Result<Vec<Value>, Error> {
        match self {
            Array(a) => Ok(a),
            v => Err(Error::mismatch("array", v.kind())),
        }
    }

    pub fn to_map(&self) -> Result<&Vec<(Value, Value)>, Error> {
        match self {
            Map(m) => Ok(m),
            v => Err(Error::mismatch("map", v.kind())),
        }
    }

    /// Looks up the first entry whose key is the string `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.to_map().ok()?.iter().find_map(|(k, v)| match k {
            Str(bs) if bs.as_ref() == key.as_bytes() => Some(v),
            _ => None,
        })
    }

    /// Converts into any decodable type, by the same rules a [`Decoder`]
    /// applies to the encoded form.
    ///
    /// # Example
    ///
    /// ```
    /// use msgpack::Value;
    ///
    /// let v = Value::from(vec![Value::from(-1i8), Value::Nil]);
    /// let pair: (i32, String) = v.into_rep().unwrap();
    ///
    /// assert_eq!(pair, (-1, String::new()));
    /// ```
    pub fn into_rep<T: De>(self) -> Result<T, Error> { decode_full(encode_full(&self)?) }

    /// A string value over static bytes, without copying them.
    pub fn from_static(bytes: &'static [u8]) -> Value { Str(Bytes::from_static(bytes)) }
}

impl Default for Value {
    fn default() -> Self { Nil }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Nil, Nil) => true,
            (Bool(a), Bool(b)) => a == b,
            (Uint(a), Uint(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Uint(u), Int(i)) | (Int(i), Uint(u)) => *i >= 0 && *i as u64 == *u,
            (F32(a), F32(b)) => a == b,
            (F64(a), F64(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Nil => f.write_str("nil"),
            Bool(b) => write!(f, "{}", b),
            Uint(u) => write!(f, "{}", u),
            Int(i) => write!(f, "{}", i),
            F32(x) => write!(f, "{}", x),
            F64(x) => write!(f, "{}", x),
            Str(bs) => util::fmt_str(bs, f),
            Array(a) => {
                f.write_str("[")?;
                for (i, v) in a.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
            Map(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
        }
    }
}

from_fn!(Value, bool, Bool);
from_fn!(Value, u64, Uint);
from_fn!(Value, i64, Int);
from_fn!(Value, f32, F32);
from_fn!(Value, f64, F64);
from_fn!(Value, Bytes, Str);

from_as!(Value, u8, u64);
from_as!(Value, u16, u64);
from_as!(Value, u32, u64);
from_as!(Value, usize, u64);
from_as!(Value, i8, i64);
from_as!(Value, i16, i64);
from_as!(Value, i32, i64);
from_as!(Value, isize, i64);

impl From<&str> for Value {
    fn from(s: &str) -> Value { Str(Bytes::copy_from_slice(s.as_bytes())) }
}

impl From<String> for Value {
    fn from(s: String) -> Value { Str(Bytes::from(s)) }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Value { Array(v.into_iter().map(T::into).collect()) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(o: Option<T>) -> Value { o.map_or(Nil, T::into) }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Value {
        Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
