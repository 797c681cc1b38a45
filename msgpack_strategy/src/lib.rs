use bytes::Bytes;
use msgpack::Value;
use proptest::prelude::*;

/// arbitrary string payload for use with proptest, not always UTF-8
pub fn arb_str() -> impl Strategy<Value = Bytes> {
    prop_oneof![
        ".*".prop_map(Bytes::from),
        prop::collection::vec(any::<u8>(), 0..300).prop_map(Bytes::from),
    ]
}

/// arbitrary scalar `Value` for use with proptest
pub fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        // integers, biased towards the width boundaries
        any::<u64>().prop_map(Value::Uint),
        any::<i64>().prop_map(Value::Int),
        (-40i64..300).prop_map(Value::Int),
        any::<u16>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        // floats, NaN excluded since it never equals itself
        any::<f32>()
            .prop_filter("NaN", |f| !f.is_nan())
            .prop_map(Value::F32),
        any::<f64>()
            .prop_filter("NaN", |f| !f.is_nan())
            .prop_map(Value::F64),
        arb_str().prop_map(Value::Str),
    ]
}

/// arbitrary `Value` for use with proptest
pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(
        8,  // max depth
        64, // max nodes
        20, // max items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..20).prop_map(Value::Array),
                prop::collection::vec((inner.clone(), inner), 0..20).prop_map(Value::Map),
            ]
        },
    )
}
