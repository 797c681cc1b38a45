//! # Binary encoder and decoder
//!
//! Encode and decode functions for the wire format.
//!
//! # Example
//!
//! ```
//! use msgpack::prelude::*;
//!
//! // a struct that will store some data
//! #[derive(Ser, De, PartialEq, Debug, Clone)]
//! struct SomeData {
//!     x: usize,
//!     y: i32,
//! }
//!
//! // here it is storing some data
//! let some_data = SomeData { x: 1, y: -2 };
//!
//! // and we've encoded it
//! let enc_full = encode_full(&some_data).unwrap();
//!
//! // let's encode it a different way too
//! let mut out = Vec::new();
//! encode(&some_data, &mut out).unwrap();
//!
//! // but they are equivalent
//! assert_eq!(out, enc_full);
//!
//! // fields are written in order, as an array
//! assert_eq!(enc_full, [0x92, 0x01, 0xfe]);
//!
//! let dec: SomeData = decode_full(&enc_full).unwrap();
//! assert_eq!(dec, some_data);
//! ```

pub mod constants;
pub mod de;
pub mod ser;
mod tag;

pub use de::{De, Decoder, Number};
pub use ser::{Encoder, Ser};
pub use tag::{Kind, Tag};

use crate::errors::Error;
use bytes::{buf::BufMut, Buf, Bytes, BytesMut};
use std::io::{BufRead, Write};
use tracing::debug;

/// Encodes `t`, appending the bytes to `out`.
///
/// # Example
///
/// ```
/// use msgpack::encoding::encode;
///
/// let mut out = Vec::new();
/// encode(&"hi", &mut out).unwrap();
///
/// assert_eq!(out, [0xa2, b'h', b'i']);
/// ```
pub fn encode<T: Ser + ?Sized, W: Write>(t: &T, out: W) -> Result<(), Error> {
    Encoder::new(out).encode(t)
}

/// Encodes `t` into a new buffer.
pub fn encode_full<T: Ser + ?Sized>(t: &T) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    encode(t, &mut out)?;
    Ok(out)
}

/// Encodes `t` into a new [`Bytes`].
///
/// # Example
///
/// ```
/// use msgpack::encoding::encode_bytes;
///
/// let bs = encode_bytes(&vec![1u8, 2]).unwrap();
/// assert_eq!(&bs[..], &[0x92, 0x01, 0x02]);
/// ```
pub fn encode_bytes<T: Ser + ?Sized>(t: &T) -> Result<Bytes, Error> {
    let mut out = BytesMut::new().writer();
    encode(t, &mut out)?;
    Ok(out.into_inner().freeze())
}

/// Decodes one value from the front of `data`, leaving whatever follows it
/// unread.
///
/// # Example
///
/// ```
/// use msgpack::encoding::decode;
///
/// let mut data: &[u8] = &[0x01, 0x02];
/// let a: u8 = decode(&mut data).unwrap();
///
/// assert_eq!(a, 1);
/// assert_eq!(data, [0x02]);
/// ```
pub fn decode<T: De, R: BufRead>(data: R) -> Result<T, Error> { Decoder::new(data).decode() }

/// Decodes a value that must occupy all of `bs`.
///
/// # Errors
///
/// Fails with [`Error::TrailingBytes`] if anything is left once the value is
/// complete, as well as for the reasons [`Decoder::decode`] fails.
pub fn decode_full<T: De>(bs: impl AsRef<[u8]>) -> Result<T, Error> {
    let mut rest = bs.as_ref();
    let t = decode(&mut rest)?;
    finish(rest.len()).map(|()| t)
}

/// Like [`decode_full`], for any [`Buf`].
pub fn decode_buf<T: De, B: Buf>(buf: B) -> Result<T, Error> {
    let mut rd = buf.reader();
    let t = decode(&mut rd)?;
    finish(rd.get_ref().remaining()).map(|()| t)
}

fn finish(left: usize) -> Result<(), Error> {
    if left == 0 {
        Ok(())
    } else {
        debug!(left, "trailing bytes after value");
        Err(Error::TrailingBytes(left))
    }
}
