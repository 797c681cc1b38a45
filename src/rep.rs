//! Representations of composite and library types.
//!
//! Sequences encode as arrays, maps as maps, `Option` as nil or the value
//! itself, and tuples as positional arrays. User records get the same
//! treatment from `#[derive(Ser, De)]`.

use crate::{
    encoding::{constants::PREALLOC_MAX, Kind, Number},
    Decoder, De, Encoder, Error, Ser, Value,
};
use bytes::Bytes;
use half::f16;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    hash::{BuildHasher, Hash},
    io::{BufRead, Write},
    net::{Ipv4Addr, SocketAddrV4},
};

impl<T: Ser> Ser for [T] {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
        e.put_array_len(self.len())?;
        for t in self {
            t.ser(e)?;
        }
        Ok(())
    }
}

impl<T: Ser, const N: usize> Ser for [T; N] {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { self[..].ser(e) }
}

impl<T: Ser> Ser for Vec<T> {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { self[..].ser(e) }
}

impl<T: Ser> Ser for VecDeque<T> {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
        e.put_array_len(self.len())?;
        for t in self {
            t.ser(e)?;
        }
        Ok(())
    }
}

/// Reads an array of `len` elements into anything that can be extended.
fn de_seq<R, T, C>(d: &mut Decoder<R>, mut out: C) -> Result<C, Error>
where
    R: BufRead,
    T: De,
    C: Extend<T>,
{
    let len = d.read_array_len()?;
    d.nested(|d| {
        for _ in 0..len {
            out.extend(Some(T::de(d)?));
        }
        Ok(out)
    })
}

impl<T: De> De for Vec<T> {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> {
        let len = d.read_array_len()?;
        d.nested(|d| {
            let mut out = Vec::with_capacity(len.min(PREALLOC_MAX));
            for _ in 0..len {
                out.push(T::de(d)?);
            }
            Ok(out)
        })
    }
}

impl<T: De> De for VecDeque<T> {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> { de_seq(d, VecDeque::new()) }
}

fn ser_map<'a, W, K, V, I>(e: &mut Encoder<W>, len: usize, entries: I) -> Result<(), Error>
where
    W: Write,
    K: Ser + 'a,
    V: Ser + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    e.put_map_len(len)?;
    for (k, v) in entries {
        k.ser(e)?;
        v.ser(e)?;
    }
    Ok(())
}

fn de_map<R, K, V, C>(d: &mut Decoder<R>, mut out: C) -> Result<C, Error>
where
    R: BufRead,
    K: De,
    V: De,
    C: Extend<(K, V)>,
{
    let len = d.read_map_len()?;
    d.nested(|d| {
        for _ in 0..len {
            let k = K::de(d)?;
            let v = V::de(d)?;
            out.extend(Some((k, v)));
        }
        Ok(out)
    })
}

impl<K: Ser, V: Ser, S> Ser for HashMap<K, V, S> {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
        ser_map(e, self.len(), self.iter())
    }
}

impl<K, V, S> De for HashMap<K, V, S>
where
    K: De + Eq + Hash,
    V: De,
    S: BuildHasher + Default,
{
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> {
        de_map(d, HashMap::with_hasher(S::default()))
    }
}

impl<K: Ser, V: Ser> Ser for BTreeMap<K, V> {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
        ser_map(e, self.len(), self.iter())
    }
}

impl<K: De + Ord, V: De> De for BTreeMap<K, V> {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> { de_map(d, BTreeMap::new()) }
}

impl<T: Ser> Ser for Option<T> {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
        match self {
            Some(t) => t.ser(e),
            None => e.put_nil(),
        }
    }
}

impl<T: De> De for Option<T> {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> {
        if d.take_nil()? {
            Ok(None)
        } else {
            T::de(d).map(Some)
        }
    }
}

impl<T: Ser + ?Sized> Ser for Box<T> {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { (**self).ser(e) }
}

impl<T: De> De for Box<T> {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> { T::de(d).map(Box::new) }
}

macro_rules! tuple_rep {
    ($len:expr, $($typ:ident . $idx:tt),*) => {
        impl<$($typ: Ser),*> Ser for ($($typ,)*) {
            fn ser<Wr: Write>(&self, e: &mut Encoder<Wr>) -> Result<(), Error> {
                e.put_array_len($len)?;
                $(self.$idx.ser(e)?;)*
                Ok(())
            }
        }

        impl<$($typ: De),*> De for ($($typ,)*) {
            fn de<Rd: BufRead>(d: &mut Decoder<Rd>) -> Result<Self, Error> {
                d.read_record_len("tuple", $len)?;
                d.nested(|d| Ok(($($typ::de(d)?,)*)))
            }
        }
    };
}

tuple_rep!(1, A.0);
tuple_rep!(2, A.0, B.1);
tuple_rep!(3, A.0, B.1, C.2);
tuple_rep!(4, A.0, B.1, C.2, D.3);
tuple_rep!(5, A.0, B.1, C.2, D.3, E.4);
tuple_rep!(6, A.0, B.1, C.2, D.3, E.4, F.5);
tuple_rep!(7, A.0, B.1, C.2, D.3, E.4, F.5, G.6);
tuple_rep!(8, A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7);

impl Ser for Bytes {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { e.put_bytes(self) }
}

impl De for Bytes {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> { d.read_bytes().map(Bytes::from) }
}

impl Ser for f16 {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> { e.put_f32(self.to_f32()) }
}

impl De for f16 {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> {
        let f: f32 = d.read_number("f16")?.to_float("f16")?;
        let h = f16::from_f32(f);
        if f.is_finite() && h.is_infinite() {
            Err(Error::out_of_range("f16"))
        } else {
            Ok(h)
        }
    }
}

impl Ser for BigInt {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
        if let Some(i) = self.to_i64() {
            e.put_i64(i)
        } else if let Some(u) = self.to_u64() {
            e.put_u64(u)
        } else {
            Err(Error::UnsupportedType("integer wider than 64 bits"))
        }
    }
}

impl De for BigInt {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> {
        d.read_number("BigInt")?.to_integer("BigInt")
    }
}

impl Ser for Ipv4Addr {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
        e.put_bytes(&self.octets())
    }
}

impl De for Ipv4Addr {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> {
        let bs = d.read_bytes()?;
        if bs.len() == 4 {
            Ok(Ipv4Addr::new(bs[0], bs[1], bs[2], bs[3]))
        } else {
            Err(Error::out_of_range("Ipv4Addr"))
        }
    }
}

impl Ser for SocketAddrV4 {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
        (*self.ip(), self.port()).ser(e)
    }
}

impl De for SocketAddrV4 {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> {
        let (ip, port) = <(Ipv4Addr, u16)>::de(d)?;
        Ok(SocketAddrV4::new(ip, port))
    }
}

impl Ser for Value {
    fn ser<W: Write>(&self, e: &mut Encoder<W>) -> Result<(), Error> {
        match self {
            Value::Nil => e.put_nil(),
            Value::Bool(b) => e.put_bool(*b),
            Value::Uint(u) => e.put_u64(*u),
            Value::Int(i) => e.put_i64(*i),
            Value::F32(f) => e.put_f32(*f),
            Value::F64(f) => e.put_f64(*f),
            Value::Str(bs) => e.put_bytes(bs),
            Value::Array(a) => a.ser(e),
            Value::Map(m) => {
                e.put_map_len(m.len())?;
                for (k, v) in m {
                    k.ser(e)?;
                    v.ser(e)?;
                }
                Ok(())
            }
        }
    }
}

impl De for Value {
    fn de<R: BufRead>(d: &mut Decoder<R>) -> Result<Self, Error> {
        match d.peek_kind()? {
            Kind::Nil => d.read_nil().map(|()| Value::Nil),
            Kind::Bool => d.read_bool().map(Value::Bool),
            Kind::Uint | Kind::Int | Kind::Float => {
                let n = match d.read_number("number")? {
                    Number::Uint(u) => Value::Uint(u),
                    Number::Int(i) => Value::Int(i),
                    Number::F32(f) => Value::F32(f),
                    Number::F64(f) => Value::F64(f),
                };
                Ok(n)
            }
            Kind::Str => Bytes::de(d).map(Value::Str),
            Kind::Array => Vec::de(d).map(Value::Array),
            Kind::Map => de_map(d, Vec::new()).map(Value::Map),
        }
    }
}
