pub use crate::{
    encoding::{decode, decode_buf, decode_full, encode, encode_bytes, encode_full, Kind},
    errors::Error,
    options::{DecoderOptions, EncoderOptions},
    De, Decoder, Encoder, Ser, Value,
};
pub use bytes::Bytes;
pub use half::f16;
pub use num_bigint::BigInt;
