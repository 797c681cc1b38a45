#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use msgpack::prelude::*;

const N_BIG_ARR: usize = 2000;

fn big_arr() -> Value {
    let v: Vec<Value> = (0..N_BIG_ARR).map(|i| Value::from(i as i64 * 1000)).collect();
    Value::from(v)
}

const N_ARR: usize = 10;
const N_MAP: usize = 10;

fn big_v() -> Value {
    let v0: Vec<Value> = (0..N_ARR).map(|i| Value::from(i as i64)).collect();
    let m: Value = (0..N_MAP)
        .map(|i| (format!("key{}", i), Value::from(v0.clone())))
        .collect();
    let v: Vec<Value> = std::iter::repeat(m).take(N_ARR).collect();
    Value::from(v)
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function(
        &format!(
            "Creating a Value of size {}",
            encode_full(&big_v()).unwrap().len()
        ),
        |b| b.iter(|| black_box(big_v())),
    );
}

fn bench_enc(c: &mut Criterion) {
    let big_v = big_v();
    let enc_len = encode_full(&big_v).unwrap().len();
    c.bench_function(
        &format!("Encoding a Value, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode_full(black_box(&big_v))),
    );
}

fn bench_enc_single_alloc(c: &mut Criterion) {
    let big_v = big_v();
    let enc_len = encode_full(&big_v).unwrap().len();
    c.bench_function(
        &format!(
            "Encoding a Value, output size of {} bytes, buffer preallocated",
            enc_len
        ),
        move |b| {
            b.iter(|| {
                let mut out = Vec::with_capacity(enc_len * 2);
                encode(black_box(&big_v), &mut out)
            })
        },
    );
}

fn bench_dec(c: &mut Criterion) {
    let enc = encode_full(&big_v()).unwrap();
    c.bench_function(
        &format!("Decoding a Value, input size of {} bytes", enc.len()),
        move |b| b.iter(|| decode_full::<Value>(black_box(&enc)).unwrap()),
    );
}

fn bench_enc_flat(c: &mut Criterion) {
    let big_arr = big_arr();
    let enc_len = encode_full(&big_arr).unwrap().len();
    c.bench_function(
        &format!("Encoding a Value array, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode_full(black_box(&big_arr))),
    );
}

fn bench_dec_flat(c: &mut Criterion) {
    let enc = encode_full(&big_arr()).unwrap();
    c.bench_function(
        &format!("Decoding a Value array of length {}", enc.len()),
        move |b| b.iter(|| decode_full::<Value>(black_box(&enc)).unwrap()),
    );
}

fn bench_dec_typed_flat(c: &mut Criterion) {
    let enc = encode_full(&big_arr()).unwrap();
    c.bench_function(
        &format!("Decoding a Vec<i64> of length {}", enc.len()),
        move |b| b.iter(|| decode_full::<Vec<i64>>(black_box(&enc)).unwrap()),
    );
}

criterion_group!(
    benches,
    bench_construction,
    bench_enc,
    bench_enc_single_alloc,
    bench_dec,
    bench_enc_flat,
    bench_dec_flat,
    bench_dec_typed_flat
);
criterion_main!(benches);
