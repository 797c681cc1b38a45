use super::{constants::*, tag::*};
use crate::{errors::Error, options::DecoderOptions};
use byteorder::{BigEndian, ReadBytesExt};
use num_traits::{Float, FromPrimitive};
use std::{
    io::{BufRead, Read},
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tracing::{debug, trace};

/// A number as it appeared on the wire.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Number {
    Uint(u64),
    Int(i64),
    F32(f32),
    F64(f64),
}

impl Number {
    /// Converts to `T` if the value fits exactly; floats only convert to
    /// integers when they have no fractional part.
    pub fn convert<T: FromPrimitive>(self, target: &'static str) -> Result<T, Error> {
        let out = match self {
            Number::Uint(u) => T::from_u64(u),
            Number::Int(i) => T::from_i64(i),
            Number::F32(f) => T::from_f32(f),
            Number::F64(f) => T::from_f64(f),
        };
        out.ok_or_else(|| Error::out_of_range(target))
    }

    /// Like [`Number::convert`], for float destinations. A finite value that
    /// only fits as an infinity is out of range.
    pub fn to_float<T: Float + FromPrimitive>(self, target: &'static str) -> Result<T, Error> {
        let finite = match self {
            Number::F32(f) => f.is_finite(),
            Number::F64(f) => f.is_finite(),
            _ => true,
        };
        let out: T = self.convert(target)?;
        if finite && out.is_infinite() {
            Err(Error::out_of_range(target))
        } else {
            Ok(out)
        }
    }

    /// Like [`Number::convert`], for integer destinations.
    pub fn to_integer<T: FromPrimitive>(self, target: &'static str) -> Result<T, Error> {
        match self {
            Number::F32(f) if f.fract() != 0.0 => Err(Error::out_of_range(target)),
            Number::F64(f) if f.fract() != 0.0 => Err(Error::out_of_range(target)),
            n => n.convert(target),
        }
    }
}

/// Reads values from a buffered byte source.
///
/// # Example
///
/// ```
/// use msgpack::Decoder;
///
/// let bytes: &[u8] = &[0xd1, 0x00, 0x80];
/// let mut dec = Decoder::new(bytes);
/// let n: u8 = dec.decode().unwrap();
///
/// assert_eq!(n, 128);
/// ```
#[derive(Debug)]
pub struct Decoder<R> {
    rd: R,
    opts: DecoderOptions,
    depth: usize,
}

impl<R: BufRead> Decoder<R> {
    /// Creates a decoder with default options.
    pub fn new(rd: R) -> Self { Self::with_options(rd, DecoderOptions::default()) }

    /// Creates a decoder with the given options.
    pub fn with_options(rd: R, opts: DecoderOptions) -> Self { Decoder { rd, opts, depth: 0 } }

    /// The options in effect.
    pub fn options(&self) -> DecoderOptions { self.opts }

    pub fn get_ref(&self) -> &R { &self.rd }

    pub fn get_mut(&mut self) -> &mut R { &mut self.rd }

    pub fn into_inner(self) -> R { self.rd }

    /// Reads one value.
    ///
    /// # Errors
    ///
    /// Fails on an unassigned format byte, on input that ends early, or when
    /// the value does not fit `T`.
    pub fn decode<T: De>(&mut self) -> Result<T, Error> {
        trace!(ty = std::any::type_name::<T>(), "decode");
        T::de(self)
    }

    /// Reads one value into `dest`.
    ///
    /// `None` stands for a missing destination and always fails with
    /// [`Error::NilDestination`] without consuming input.
    pub fn decode_into<T: De>(&mut self, dest: Option<&mut T>) -> Result<(), Error> {
        match dest {
            Some(d) => {
                *d = self.decode()?;
                Ok(())
            }
            None => Err(Error::NilDestination),
        }
    }

    /// Returns the next format byte without consuming it.
    pub fn peek_tag(&mut self) -> Result<Tag, Error> {
        let byte = match self.rd.fill_buf()?.first() {
            Some(b) => *b,
            None => return Err(Error::Truncated),
        };
        Tag::from_byte(byte).map_err(|e| {
            debug!(byte, "unknown format byte");
            e
        })
    }

    pub fn peek_kind(&mut self) -> Result<Kind, Error> { Ok(self.peek_tag()?.kind()) }

    /// Consumes the next format byte.
    pub fn read_tag(&mut self) -> Result<Tag, Error> {
        let tag = self.peek_tag()?;
        self.rd.consume(1);
        trace!(?tag, "tag");
        Ok(tag)
    }

    /// Consumes a nil if one is next. Returns whether it did.
    pub fn take_nil(&mut self) -> Result<bool, Error> {
        if self.peek_tag()? == Tag::Nil {
            self.rd.consume(1);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn read_nil(&mut self) -> Result<(), Error> {
        match self.read_tag()? {
            Tag::Nil => Ok(()),
            t => Err(Error::mismatch("nil", t.kind())),
        }
    }

    /// Reads a bool; nil reads as `false`.
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        match self.read_tag()? {
            Tag::Bool(b) => Ok(b),
            Tag::Nil => Ok(false),
            t => Err(Error::mismatch("bool", t.kind())),
        }
    }

    fn read_payload(&mut self, tag: Tag) -> Result<Option<Number>, Error> {
        let rd = &mut self.rd;
        let n = match tag {
            Tag::PosFixint(u) => Number::Uint(u as u64),
            Tag::NegFixint(i) => Number::Int(i as i64),
            Tag::U8 => Number::Uint(rd.read_u8()? as u64),
            Tag::U16 => Number::Uint(rd.read_u16::<BigEndian>()? as u64),
            Tag::U32 => Number::Uint(rd.read_u32::<BigEndian>()? as u64),
            Tag::U64 => Number::Uint(rd.read_u64::<BigEndian>()?),
            Tag::I8 => Number::Int(rd.read_i8()? as i64),
            Tag::I16 => Number::Int(rd.read_i16::<BigEndian>()? as i64),
            Tag::I32 => Number::Int(rd.read_i32::<BigEndian>()? as i64),
            Tag::I64 => Number::Int(rd.read_i64::<BigEndian>()?),
            Tag::F32 => Number::F32(f32::from_bits(rd.read_u32::<BigEndian>()?)),
            Tag::F64 => Number::F64(f64::from_bits(rd.read_u64::<BigEndian>()?)),
            _ => return Ok(None),
        };
        Ok(Some(n))
    }

    /// Reads any integer or float. Nil reads as zero.
    pub fn read_number(&mut self, expected: &'static str) -> Result<Number, Error> {
        match self.read_tag()? {
            Tag::Nil => Ok(Number::Uint(0)),
            tag => self
                .read_payload(tag)?
                .ok_or_else(|| Error::mismatch(expected, tag.kind())),
        }
    }

    fn read_len(&mut self, tag: Tag) -> Result<usize, Error> {
        let rd = &mut self.rd;
        let len = match tag {
            Tag::FixStr(l) | Tag::FixArray(l) | Tag::FixMap(l) => l as usize,
            Tag::Str8 => rd.read_u8()? as usize,
            Tag::Str16 | Tag::Array16 | Tag::Map16 => rd.read_u16::<BigEndian>()? as usize,
            Tag::Str32 | Tag::Array32 | Tag::Map32 => rd.read_u32::<BigEndian>()? as usize,
            t => unreachable!("{:?} carries no length", t),
        };
        Ok(len)
    }

    /// Reads a string header, returning the byte length. Nil reads as an
    /// empty string.
    pub fn read_str_len(&mut self) -> Result<usize, Error> {
        match self.read_tag()? {
            Tag::Nil => Ok(0),
            t if t.kind() == Kind::Str => self.read_len(t),
            t => Err(Error::mismatch("string", t.kind())),
        }
    }

    /// Reads a raw string payload.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let len = self.read_str_len()?;
        self.read_exact_vec(len)
    }

    /// Reads a string payload as UTF-8.
    pub fn read_string(&mut self) -> Result<String, Error> {
        String::from_utf8(self.read_bytes()?).map_err(|_| Error::InvalidUtf8)
    }

    /// Reads exactly `len` bytes, growing the buffer as data arrives rather
    /// than trusting the declared length up front.
    fn read_exact_vec(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(len.min(PREALLOC_MAX));
        (&mut self.rd).take(len as u64).read_to_end(&mut out)?;
        if out.len() == len {
            Ok(out)
        } else {
            Err(Error::Truncated)
        }
    }

    /// Reads an array header, returning the element count. Nil reads as an
    /// empty array.
    pub fn read_array_len(&mut self) -> Result<usize, Error> {
        match self.read_tag()? {
            Tag::Nil => Ok(0),
            t if t.kind() == Kind::Array => self.read_len(t),
            t => Err(Error::mismatch("array", t.kind())),
        }
    }

    /// Reads a map header, returning the entry count. Nil reads as an empty
    /// map.
    pub fn read_map_len(&mut self) -> Result<usize, Error> {
        match self.read_tag()? {
            Tag::Nil => Ok(0),
            t if t.kind() == Kind::Map => self.read_len(t),
            t => Err(Error::mismatch("map", t.kind())),
        }
    }

    /// Reads the array header framing a record and checks its field count.
    pub fn read_record_len(&mut self, record: &'static str, fields: usize) -> Result<(), Error> {
        let found = match self.read_tag()? {
            t if t.kind() == Kind::Array => self.read_len(t)?,
            t => return Err(Error::mismatch(record, t.kind())),
        };
        check_field_count(record, fields, found)
    }

    /// Reads the head of an enum value: either a bare variant index, or an
    /// array holding the index followed by the variant's fields.
    ///
    /// Returns the index and the number of fields that follow it. Unlike a
    /// numeric destination, a variant index never reads nil as zero.
    pub fn read_variant(&mut self, record: &'static str) -> Result<(u64, usize), Error> {
        if self.peek_kind()? != Kind::Array {
            return Ok((self.read_variant_index(record)?, 0));
        }
        match self.read_array_len()? {
            0 => Err(Error::FieldCount {
                record,
                expected: 1,
                found: 0,
            }),
            len => Ok((self.read_variant_index(record)?, len - 1)),
        }
    }

    fn read_variant_index(&mut self, record: &'static str) -> Result<u64, Error> {
        match self.peek_kind()? {
            Kind::Nil => {
                debug!(record, "nil enum variant");
                Err(Error::mismatch(record, Kind::Nil))
            }
            _ => self.read_number(record)?.to_integer(record),
        }
    }

    /// Runs `f` one container level deeper, failing if that exceeds
    /// [`DecoderOptions::max_depth`].
    pub fn nested<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Self) -> Result<T, Error>,
    {
        if self.depth >= self.opts.max_depth {
            debug!(max_depth = self.opts.max_depth, "depth limit reached");
            return Err(Error::DepthLimit(self.opts.max_depth));
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    /// Reads a point in time written by
    /// [`Encoder::put_time`](crate::Encoder::put_time). Nil reads as the
    /// Unix epoch.
    pub fn read_time(&mut self) -> Result<SystemTime, Error> {
        if self.take_nil()? {
            return Ok(UNIX_EPOCH);
        }
        let fields = self.read_array_len()?;
        check_field_count("time", 2, fields)?;
        let secs: i64 = self.read_number("time")?.to_integer("time")?;
        let nanos: u32 = self.read_number("time")?.to_integer("time")?;
        if nanos >= 1_000_000_000 {
            return Err(Error::out_of_range("time"));
        }
        let t = if secs >= 0 {
            UNIX_EPOCH.checked_add(Duration::new(secs as u64, nanos))
        } else {
            UNIX_EPOCH
                .checked_sub(Duration::from_secs(secs.unsigned_abs()))
                .and_then(|t| t.checked_add(Duration::from_nanos(nanos as u64)))
        };
        t.ok_or_else(|| Error::out_of_range("time"))
    }
}

/// Fails with [`Error::FieldCount`] unless `found == expected`.
pub fn check_field_count(record: &'static str, expected: usize, found: usize) -> Result<(), Error> {
    if found == expected {
        Ok(())
    } else {
        debug!(record, expected, found, "field count mismatch");
        Err(Error::FieldCount {
            record,
            expected,
            found,
        })
    }
}

/// A value that can be decoded.
///
/// Scalars, strings, and std containers are covered here and in
/// [`rep`](crate::rep); records get an implementation from `#[derive(De)]`.
pub trait De: Sized {
    /// Reads a value of type `Self` from `d`.
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error>;
}

impl De for () {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> { d.read_nil() }
}

impl De for bool {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> { d.read_bool() }
}

macro_rules! integer_de {
    ($($t:ty),*) => {$(
        impl De for $t {
            #[inline]
            fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> {
                d.read_number(stringify!($t))?.to_integer(stringify!($t))
            }
        }
    )*};
}

macro_rules! float_de {
    ($($t:ty),*) => {$(
        impl De for $t {
            #[inline]
            fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> {
                d.read_number(stringify!($t))?.to_float(stringify!($t))
            }
        }
    )*};
}

integer_de!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
float_de!(f32, f64);

impl De for String {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> { d.read_string() }
}

impl De for char {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> {
        let s = d.read_string()?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::out_of_range("char")),
        }
    }
}

impl De for SystemTime {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> { d.read_time() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec<T: De>(bs: &[u8]) -> Result<T, Error> { Decoder::new(bs).decode() }

    #[test]
    fn widths_and_signs() {
        assert_eq!(dec::<u64>(&[0xcc, 0x80]).unwrap(), 128);
        assert_eq!(dec::<i64>(&[0xd0, 0xdf]).unwrap(), -33);
        assert_eq!(dec::<u8>(&[0xd1, 0x00, 0x80]).unwrap(), 128);
        assert_eq!(dec::<i16>(&[0xcd, 0x7f, 0xff]).unwrap(), i16::MAX);
        assert_eq!(dec::<f64>(&[0x05]).unwrap(), 5.0);
        assert_eq!(dec::<i32>(&[0xcb, 0x40, 0x14, 0, 0, 0, 0, 0, 0]).unwrap(), 5);
    }

    #[test]
    fn out_of_range() {
        match dec::<u8>(&[0xcd, 0x01, 0x00]) {
            Err(Error::OutOfRange { target }) => assert_eq!(target, "u8"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(dec::<u32>(&[0xff]).is_err());
        // 2.5
        assert!(dec::<i32>(&[0xcb, 0x40, 0x04, 0, 0, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn float_narrowing() {
        // 1e300
        match dec::<f32>(&[0xcb, 0x7e, 0x37, 0xe4, 0x3c, 0x88, 0x00, 0x75, 0x9c]) {
            Err(Error::OutOfRange { target }) => assert_eq!(target, "f32"),
            other => panic!("unexpected {:?}", other),
        }
        // f64 infinity stays infinite
        let inf = dec::<f32>(&[0xcb, 0x7f, 0xf0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert!(inf.is_infinite() && inf > 0.0);
        assert!(dec::<f32>(&[0xcb, 0x7f, 0xf8, 0, 0, 0, 0, 0, 0]).unwrap().is_nan());
        // u64::MAX is finite in f32
        let big = dec::<f32>(&[0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]).unwrap();
        assert!(big.is_finite());
        assert_eq!(dec::<f32>(&[0xcb, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]).unwrap(), 1.5);
        assert_eq!(dec::<f64>(&[0xca, 0x7f, 0x80, 0, 0]).unwrap(), f64::INFINITY);
    }

    #[test]
    fn nil_is_zero() {
        assert_eq!(dec::<u32>(&[0xc0]).unwrap(), 0);
        assert_eq!(dec::<bool>(&[0xc0]).unwrap(), false);
        assert_eq!(dec::<String>(&[0xc0]).unwrap(), "");
        assert_eq!(dec::<SystemTime>(&[0xc0]).unwrap(), UNIX_EPOCH);
    }

    #[test]
    fn time_is_framed() {
        let t = dec::<SystemTime>(&[0x92, 0x01, 0xcd, 0x01, 0xf4]).unwrap();
        assert_eq!(t, UNIX_EPOCH + Duration::new(1, 500));
        match dec::<SystemTime>(&[0x93, 0x01, 0x00, 0x00]) {
            Err(Error::FieldCount { record, expected, found }) => {
                assert_eq!((record, expected, found), ("time", 2, 3));
            }
            other => panic!("unexpected {:?}", other),
        }
        // bare seconds without the array
        assert!(matches!(dec::<SystemTime>(&[0x01, 0x00]), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn truncated() {
        assert!(matches!(dec::<u64>(&[]), Err(Error::Truncated)));
        assert!(matches!(dec::<u64>(&[0xcd, 0x01]), Err(Error::Truncated)));
        assert!(matches!(dec::<String>(&[0xa3, b'a']), Err(Error::Truncated)));
        // the length prefix itself is cut short
        assert!(matches!(dec::<String>(&[0xda, 0x00]), Err(Error::Truncated)));
    }

    #[test]
    fn type_mismatch() {
        match dec::<String>(&[0x01]) {
            Err(Error::TypeMismatch { expected, found }) => {
                assert_eq!(expected, "string");
                assert_eq!(found, Kind::Uint);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(dec::<u8>(&[0xa0]).is_err());
    }

    #[test]
    fn str8_accepted() {
        assert_eq!(dec::<String>(&[0xd9, 0x02, b'h', b'i']).unwrap(), "hi");
    }

    #[test]
    fn invalid_utf8() {
        match dec::<String>(&[0xa1, 0xff]) {
            Err(Error::InvalidUtf8) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn nil_destination() {
        let mut d = Decoder::new(&b"\x01"[..]);
        match d.decode_into::<u8>(None) {
            Err(Error::NilDestination) => (),
            other => panic!("unexpected {:?}", other),
        }
        let mut n = 0u8;
        d.decode_into(Some(&mut n)).unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn variant_heads() {
        let mut d = Decoder::new(&b"\x02\x92\x01\xa1x"[..]);
        assert_eq!(d.read_variant("E").unwrap(), (2, 0));
        assert_eq!(d.read_variant("E").unwrap(), (1, 1));
        assert_eq!(d.read_string().unwrap(), "x");

        match Decoder::new(&b"\x90"[..]).read_variant("E") {
            Err(Error::FieldCount { found: 0, .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn nil_variant_rejected() {
        for bs in [&b"\xc0"[..], &b"\x91\xc0"[..]] {
            match Decoder::new(bs).read_variant("E") {
                Err(Error::TypeMismatch { expected, found }) => {
                    assert_eq!(expected, "E");
                    assert_eq!(found, Kind::Nil);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn depth_limit() {
        let mut d = Decoder::with_options(&b""[..], DecoderOptions::default().max_depth(1));
        let r = d.nested(|d| d.nested(|_| Ok(())));
        match r {
            Err(Error::DepthLimit(1)) => (),
            other => panic!("unexpected {:?}", other),
        }
        d.nested(|_| Ok(())).unwrap();
    }
}
