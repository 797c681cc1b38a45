use msgpack::prelude::*;
use std::io::{self, BufReader, Read};

#[test]
fn many_values_one_stream() {
    let mut enc = Encoder::new(Vec::new());
    enc.encode(&true).unwrap();
    enc.encode("hello").unwrap();
    enc.encode(&vec![1u16, 300]).unwrap();
    enc.encode(&()).unwrap();
    let bytes = enc.into_inner();

    let mut dec = Decoder::new(&bytes[..]);
    assert!(dec.decode::<bool>().unwrap());
    assert_eq!(dec.decode::<String>().unwrap(), "hello");
    assert_eq!(dec.decode::<Vec<u16>>().unwrap(), [1, 300]);

    // the trailing nil reads as an empty string
    assert_eq!(dec.decode::<String>().unwrap(), "");
    assert!(dec.get_ref().is_empty());
}

#[test]
fn decode_into_destination() {
    let bytes = encode_full("world").unwrap();
    let mut dec = Decoder::new(&bytes[..]);

    assert!(matches!(
        dec.decode_into::<String>(None),
        Err(Error::NilDestination)
    ));

    let mut s = String::from("old");
    dec.decode_into(Some(&mut s)).unwrap();
    assert_eq!(s, "world");
}

/// Hands out one byte per read, to exercise refills.
struct Trickle<'a>(&'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match (self.0.split_first(), buf.first_mut()) {
            (Some((b, rest)), Some(slot)) => {
                *slot = *b;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[test]
fn slow_source() {
    let v = (
        "x".repeat(1000),
        vec![u64::MAX, 0, 1 << 40],
        -1.5f64,
        Some(vec![Some(1i8), None]),
    );
    let bytes = encode_full(&v).unwrap();

    let mut dec = Decoder::new(BufReader::with_capacity(3, Trickle(&bytes)));
    let back: (String, Vec<u64>, f64, Option<Vec<Option<i8>>>) = dec.decode().unwrap();
    assert_eq!(back, v);
}

#[test]
fn failing_sink() {
    struct Broken;

    impl io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }

        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    match encode(&1u8, Broken) {
        Err(Error::Io(e)) => assert_eq!(e.to_string(), "disk on fire"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn huge_declared_length() {
    // a str32 claiming four gigabytes, followed by nothing
    let bytes = [0xdb, 0xff, 0xff, 0xff, 0xff];
    assert!(matches!(
        decode_full::<String>(bytes),
        Err(Error::Truncated)
    ));

    // and an array32 likewise
    let bytes = [0xdd, 0xff, 0xff, 0xff, 0xff, 0x01];
    assert!(matches!(
        decode_full::<Vec<u8>>(bytes),
        Err(Error::Truncated)
    ));
}

#[test]
fn errors_display() {
    let e = decode_full::<u8>([0xc1]).unwrap_err();
    assert_eq!(e.to_string(), "unknown format byte 0xc1");

    let e = decode_full::<u8>([0xcd, 0x01, 0x00]).unwrap_err();
    assert_eq!(e.to_string(), "value out of range for `u8`");
}
