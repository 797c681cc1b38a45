use super::constants::*;
use crate::{errors::Error, options::EncoderOptions};
use smallvec::SmallVec;
use std::{
    io::Write,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::trace;

/// A format byte plus up to eight payload bytes, written in one call.
type Header = SmallVec<[u8; 9]>;

#[inline]
fn header(tag: u8, payload: &[u8]) -> Header {
    let mut out = Header::new();
    out.push(tag);
    out.extend_from_slice(payload);
    out
}

/// Writes values to a byte sink.
///
/// An `Encoder` never reads its sink, and never buffers beyond a single
/// format byte and its fixed-width payload.
///
/// # Example
///
/// ```
/// use msgpack::Encoder;
///
/// let mut enc = Encoder::new(Vec::new());
/// enc.encode(&128u32).unwrap();
///
/// assert_eq!(enc.into_inner(), vec![0xcc, 0x80]);
/// ```
#[derive(Debug)]
pub struct Encoder<W> {
    wr: W,
    opts: EncoderOptions,
}

impl<W: Write> Encoder<W> {
    /// Creates an encoder with default options.
    pub fn new(wr: W) -> Self { Self::with_options(wr, EncoderOptions::default()) }

    /// Creates an encoder with the given options.
    pub fn with_options(wr: W, opts: EncoderOptions) -> Self { Encoder { wr, opts } }

    /// The options in effect.
    pub fn options(&self) -> EncoderOptions { self.opts }

    pub fn get_ref(&self) -> &W { &self.wr }

    pub fn get_mut(&mut self) -> &mut W { &mut self.wr }

    pub fn into_inner(self) -> W { self.wr }

    /// Appends the encoding of `value` to the sink.
    ///
    /// # Errors
    ///
    /// Fails if the sink fails, or if `value` has no representation in the
    /// format (an integer wider than 64 bits, or a length above `u32::MAX`).
    /// On error, some bytes of the value may already have been written.
    pub fn encode<T: Ser + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        trace!(ty = std::any::type_name::<T>(), "encode");
        value.ser(self)
    }

    #[inline]
    fn put_header(&mut self, h: &[u8]) -> Result<(), Error> {
        self.wr.write_all(h)?;
        Ok(())
    }

    pub fn put_nil(&mut self) -> Result<(), Error> { self.put_header(&[NIL]) }

    pub fn put_bool(&mut self, b: bool) -> Result<(), Error> {
        self.put_header(&[if b { TRUE } else { FALSE }])
    }

    /// Writes an unsigned integer in the narrowest unsigned tier.
    pub fn put_u64(&mut self, u: u64) -> Result<(), Error> {
        let h = if u <= POS_FIXINT_MAX as u64 {
            header(u as u8, &[])
        } else if u <= u8::MAX as u64 {
            header(UINT8, &[u as u8])
        } else if u <= u16::MAX as u64 {
            header(UINT16, &(u as u16).to_be_bytes())
        } else if u <= u32::MAX as u64 {
            header(UINT32, &(u as u32).to_be_bytes())
        } else {
            header(UINT64, &u.to_be_bytes())
        };
        self.put_header(&h)
    }

    /// Writes a signed integer.
    ///
    /// Values in `-32..=127` use a fixint. Everything else takes the
    /// narrowest signed tag whose range holds it, so `128` needs int16 even
    /// though `-128` fits int8.
    pub fn put_i64(&mut self, i: i64) -> Result<(), Error> {
        let h = if NEG_FIXINT_MIN <= i && i <= POS_FIXINT_MAX as i64 {
            header(i as u8, &[])
        } else if i8::MIN as i64 <= i && i <= i8::MAX as i64 {
            header(INT8, &[i as u8])
        } else if i16::MIN as i64 <= i && i <= i16::MAX as i64 {
            header(INT16, &(i as i16).to_be_bytes())
        } else if i32::MIN as i64 <= i && i <= i32::MAX as i64 {
            header(INT32, &(i as i32).to_be_bytes())
        } else {
            header(INT64, &i.to_be_bytes())
        };
        self.put_header(&h)
    }

    pub fn put_f32(&mut self, f: f32) -> Result<(), Error> {
        self.put_header(&header(FLOAT32, &f.to_bits().to_be_bytes()))
    }

    pub fn put_f64(&mut self, f: f64) -> Result<(), Error> {
        self.put_header(&header(FLOAT64, &f.to_bits().to_be_bytes()))
    }

    /// Writes the header of a string of `len` bytes.
    pub fn put_str_len(&mut self, len: usize) -> Result<(), Error> {
        let h = if len <= FIXSTR_MAX_LEN {
            header(FIXSTR | len as u8, &[])
        } else if len <= LEN8_MAX && self.opts.str8 {
            header(STR8, &[len as u8])
        } else if len <= LEN16_MAX {
            header(STR16, &(len as u16).to_be_bytes())
        } else {
            header(STR32, &len32(len)?.to_be_bytes())
        };
        self.put_header(&h)
    }

    pub fn put_bytes(&mut self, bs: &[u8]) -> Result<(), Error> {
        self.put_str_len(bs.len())?;
        self.wr.write_all(bs)?;
        Ok(())
    }

    pub fn put_str(&mut self, s: &str) -> Result<(), Error> { self.put_bytes(s.as_bytes()) }

    /// Writes the header of an array of `len` elements. The caller encodes the
    /// elements next.
    pub fn put_array_len(&mut self, len: usize) -> Result<(), Error> {
        let h = if len <= FIXCOL_MAX_LEN {
            header(FIXARRAY | len as u8, &[])
        } else if len <= LEN16_MAX {
            header(ARRAY16, &(len as u16).to_be_bytes())
        } else {
            header(ARRAY32, &len32(len)?.to_be_bytes())
        };
        self.put_header(&h)
    }

    /// Writes the header of a map of `len` entries. The caller encodes the
    /// keys and values next, alternating.
    pub fn put_map_len(&mut self, len: usize) -> Result<(), Error> {
        let h = if len <= FIXCOL_MAX_LEN {
            header(FIXMAP | len as u8, &[])
        } else if len <= LEN16_MAX {
            header(MAP16, &(len as u16).to_be_bytes())
        } else {
            header(MAP32, &len32(len)?.to_be_bytes())
        };
        self.put_header(&h)
    }

    /// Writes a point in time as a two-element array: signed seconds since the
    /// Unix epoch, then the nanoseconds within that second.
    pub fn put_time(&mut self, t: SystemTime) -> Result<(), Error> {
        let (secs, nanos) = match t.duration_since(UNIX_EPOCH) {
            Ok(d) => (d.as_secs() as i128, d.subsec_nanos()),
            Err(e) => {
                let d = e.duration();
                match d.subsec_nanos() {
                    0 => (-(d.as_secs() as i128), 0),
                    n => (-(d.as_secs() as i128) - 1, 1_000_000_000 - n),
                }
            }
        };
        if secs < i64::MIN as i128 || secs > i64::MAX as i128 {
            return Err(Error::UnsupportedType("time beyond 64-bit seconds"));
        }
        self.put_array_len(2)?;
        self.put_i64(secs as i64)?;
        self.put_u64(nanos as u64)
    }
}

#[inline]
fn len32(len: usize) -> Result<u32, Error> {
    if len as u64 <= LEN32_MAX {
        Ok(len as u32)
    } else {
        Err(Error::LengthOverflow(len))
    }
}

/// A value that can be encoded.
///
/// Scalars, strings, and std containers are covered here and in
/// [`rep`](crate::rep); records get an implementation from `#[derive(Ser)]`.
pub trait Ser {
    /// Writes `self` to `e`.
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error>;
}

impl<T: Ser + ?Sized> Ser for &T {
    #[inline]
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { (**self).ser(e) }
}

impl<T: Ser + ?Sized> Ser for &mut T {
    #[inline]
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { (**self).ser(e) }
}

impl Ser for () {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { e.put_nil() }
}

impl Ser for bool {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { e.put_bool(*self) }
}

macro_rules! unsigned_ser {
    ($($t:ty),*) => {$(
        impl Ser for $t {
            #[inline]
            fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
                e.put_u64(*self as u64)
            }
        }
    )*};
}

macro_rules! signed_ser {
    ($($t:ty),*) => {$(
        impl Ser for $t {
            #[inline]
            fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
                e.put_i64(*self as i64)
            }
        }
    )*};
}

unsigned_ser!(u8, u16, u32, u64, usize);
signed_ser!(i8, i16, i32, i64, isize);

impl Ser for u128 {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
        if *self <= u64::MAX as u128 {
            e.put_u64(*self as u64)
        } else {
            Err(Error::UnsupportedType("integer wider than 64 bits"))
        }
    }
}

impl Ser for i128 {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
        if i64::MIN as i128 <= *self && *self <= i64::MAX as i128 {
            e.put_i64(*self as i64)
        } else if *self > 0 && *self <= u64::MAX as i128 {
            e.put_u64(*self as u64)
        } else {
            Err(Error::UnsupportedType("integer wider than 64 bits"))
        }
    }
}

impl Ser for f32 {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { e.put_f32(*self) }
}

impl Ser for f64 {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { e.put_f64(*self) }
}

impl Ser for str {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { e.put_str(self) }
}

impl Ser for String {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { e.put_str(self) }
}

impl Ser for char {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
        e.put_str(self.encode_utf8(&mut [0; 4]))
    }
}

impl Ser for SystemTime {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { e.put_time(*self) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc<T: Ser + ?Sized>(t: &T) -> Vec<u8> {
        let mut e = Encoder::new(Vec::new());
        e.encode(t).unwrap();
        e.into_inner()
    }

    #[test]
    fn unsigned_tiers() {
        assert_eq!(enc(&0u8), [0x00]);
        assert_eq!(enc(&127u64), [0x7f]);
        assert_eq!(enc(&128u64), [0xcc, 0x80]);
        assert_eq!(enc(&255u64), [0xcc, 0xff]);
        assert_eq!(enc(&256u64), [0xcd, 0x01, 0x00]);
        assert_eq!(enc(&65535u64), [0xcd, 0xff, 0xff]);
        assert_eq!(enc(&65536u64), [0xce, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(
            enc(&4294967296u64),
            [0xcf, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn signed_tiers() {
        assert_eq!(enc(&-1i8), [0xff]);
        assert_eq!(enc(&-32i64), [0xe0]);
        assert_eq!(enc(&-33i64), [0xd0, 0xdf]);
        assert_eq!(enc(&-128i64), [0xd0, 0x80]);
        assert_eq!(enc(&-129i64), [0xd1, 0xff, 0x7f]);
        assert_eq!(enc(&127i64), [0x7f]);
        assert_eq!(enc(&128i64), [0xd1, 0x00, 0x80]);
        assert_eq!(enc(&32768i64), [0xd2, 0x00, 0x00, 0x80, 0x00]);
        assert_eq!(enc(&-2147483648i64), [0xd2, 0x80, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn wide_integers() {
        assert_eq!(enc(&(u64::MAX as u128)), enc(&u64::MAX));
        assert_eq!(enc(&-5i128), [0xfb]);

        let mut e = Encoder::new(Vec::new());
        match e.encode(&(u64::MAX as u128 + 1)) {
            Err(Error::UnsupportedType(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert!(e.get_ref().is_empty());
    }

    #[test]
    fn str8_option() {
        let s = "x".repeat(40);

        assert_eq!(enc(s.as_str())[..3], [0xda, 0x00, 40]);

        let mut e = Encoder::with_options(Vec::new(), EncoderOptions::default().str8(true));
        e.encode(s.as_str()).unwrap();
        assert_eq!(e.get_ref()[..2], [0xd9, 40]);
        assert_eq!(e.get_ref().len(), 42);
    }

    #[test]
    fn char_as_string() {
        assert_eq!(enc(&'a'), [0xa1, b'a']);
        assert_eq!(enc(&'é'), [0xa2, 0xc3, 0xa9]);
    }

    #[test]
    fn time_before_epoch() {
        use std::time::Duration;

        let t = UNIX_EPOCH - Duration::new(1, 500_000_000);
        // -2 seconds, then half a second forward
        assert_eq!(enc(&t), [0x92, 0xfe, 0xce, 0x1d, 0xcd, 0x65, 0x00]);
    }
}
