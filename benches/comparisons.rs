#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use msgpack::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Ser, De, Serialize, Deserialize, Clone)]
struct BenchmarkStruct {
    name: String,
    age: i64,
    tm: SystemTime,
}

fn sample() -> BenchmarkStruct {
    BenchmarkStruct {
        name: "Hello World".into(),
        age: i32::MAX as i64,
        tm: UNIX_EPOCH + std::time::Duration::new(1_500_000_000, 123_456_789),
    }
}

fn msgpack_bool(c: &mut Criterion) {
    c.bench_function("msgpack bool round trip", |b| {
        b.iter(|| {
            let enc = encode_full(black_box(&true)).unwrap();
            decode_full::<bool>(&enc).unwrap()
        })
    });
}

fn msgpack_i64_encode(c: &mut Criterion) {
    c.bench_function("msgpack i64 encode", |b| {
        b.iter(|| encode_full(black_box(&1_000_000i64)))
    });
}

fn msgpack_i64_put(c: &mut Criterion) {
    c.bench_function("msgpack i64 put", |b| {
        let mut enc = Encoder::new(Vec::with_capacity(128));
        b.iter(|| {
            enc.get_mut().clear();
            enc.put_i64(black_box(1_000_000))
        })
    });
}

fn json_i64_encode(c: &mut Criterion) {
    c.bench_function("JSON i64 encode", |b| {
        b.iter(|| serde_json::to_string(&black_box(1_000_000i64)))
    });
}

fn msgpack_i64_decode(c: &mut Criterion) {
    c.bench_function("msgpack i64 decode", |b| {
        let buf = encode_bytes(&1_000_000i64).unwrap();
        b.iter(|| decode_buf::<i64, _>(black_box(buf.clone())).unwrap())
    });
}

fn json_i64_decode(c: &mut Criterion) {
    c.bench_function("JSON i64 decode", |b| {
        let s = serde_json::to_string(&1_000_000i64).unwrap();
        b.iter(|| serde_json::from_str::<i64>(black_box(&s)).unwrap())
    });
}

fn msgpack_str_encode(c: &mut Criterion) {
    c.bench_function("msgpack string encode", |b| {
        let s: String = (0..10_000).map(|x| (b'a' + (x % 26) as u8) as char).collect();
        b.iter(|| encode_full(black_box(&s)))
    });
}

fn json_str_encode(c: &mut Criterion) {
    c.bench_function("JSON string encode", |b| {
        let s: String = (0..10_000).map(|x| (b'a' + (x % 26) as u8) as char).collect();
        b.iter(|| serde_json::to_string(black_box(&s)))
    });
}

fn msgpack_map(c: &mut Criterion) {
    c.bench_function("msgpack map round trip", |b| {
        let mut m = std::collections::HashMap::new();
        m.insert("hello".to_string(), "world".to_string());
        m.insert("foo".to_string(), "bar".to_string());
        b.iter(|| {
            let enc = encode_full(black_box(&m)).unwrap();
            decode_full::<std::collections::HashMap<String, String>>(&enc).unwrap()
        })
    });
}

fn msgpack_struct(c: &mut Criterion) {
    c.bench_function("msgpack struct round trip", |b| {
        let v = sample();
        b.iter(|| {
            let enc = encode_full(black_box(&v)).unwrap();
            decode_full::<BenchmarkStruct>(&enc).unwrap()
        })
    });
}

fn json_struct(c: &mut Criterion) {
    c.bench_function("JSON struct round trip", |b| {
        let v = sample();
        b.iter(|| {
            let enc = serde_json::to_vec(black_box(&v)).unwrap();
            serde_json::from_slice::<BenchmarkStruct>(&enc).unwrap()
        })
    });
}

criterion_group!(
    benches,
    msgpack_bool,
    msgpack_i64_encode,
    msgpack_i64_put,
    json_i64_encode,
    msgpack_i64_decode,
    json_i64_decode,
    msgpack_str_encode,
    json_str_encode,
    msgpack_map,
    msgpack_struct,
    json_struct,
);

criterion_main!(benches);
