use msgpack::encoding::*;
use msgpack_strategy::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig { cases: 1_000, ..ProptestConfig::default() })]

    #[test]
    fn encode_decode(v in arb_value()) {
        let enc = encode_full(&v).unwrap();
        let dec: msgpack::Value = decode_full(&enc).unwrap();
        prop_assert_eq!(&dec, &v);

        // decoding and re-encoding settles on the same bytes
        prop_assert_eq!(encode_full(&dec).unwrap(), enc);
    }

    #[test]
    fn truncated_input_fails(v in arb_value()) {
        let enc = encode_full(&v).unwrap();
        for cut in 0..enc.len() {
            prop_assert!(decode_full::<msgpack::Value>(&enc[..cut]).is_err());
        }
    }
}
