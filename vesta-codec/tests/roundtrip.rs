use std::collections::BTreeMap;

use proptest::prelude::*;

use vesta_codec::utils::{Bytes, Int, MaybeIndefArray};
use vesta_codec::{from_slice, to_vec};

proptest! {
    #[test]
    fn uints(v: u64) {
        let bytes = to_vec(&v).unwrap();
        let back: u64 = from_slice(&bytes).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn ints(v: i64) {
        let bytes = to_vec(&v).unwrap();
        let back: i64 = from_slice(&bytes).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn native_int_range(v in -(1i128 << 64)..(1i128 << 64)) {
        let v = Int::try_from(v).unwrap();
        let bytes = to_vec(&v).unwrap();
        let back: Int = from_slice(&bytes).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn byte_strings(v: Vec<u8>) {
        let v = Bytes::from(v);
        let bytes = to_vec(&v).unwrap();
        let back: Bytes = from_slice(&bytes).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn text_strings(v: String) {
        let bytes = to_vec(&v).unwrap();
        let back: String = from_slice(&bytes).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn arrays(v: Vec<u64>) {
        let bytes = to_vec(&v).unwrap();
        let back: Vec<u64> = from_slice(&bytes).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn indef_arrays(v: Vec<u64>) {
        let v = MaybeIndefArray::Indef(v);
        let bytes = to_vec(&v).unwrap();
        let back: MaybeIndefArray<u64> = from_slice(&bytes).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn maps(v: BTreeMap<u64, i64>) {
        let bytes = to_vec(&v).unwrap();
        let back: BTreeMap<u64, i64> = from_slice(&bytes).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn bignums(v: Vec<u8>, negative: bool) {
        use vesta_codec::num_bigint::{BigInt, BigUint, Sign};

        let magnitude = BigInt::from_biguint(Sign::Plus, BigUint::from_bytes_be(&v));
        let v = if negative { -magnitude - 1 } else { magnitude };

        let bytes = to_vec(&v).unwrap();
        let back: BigInt = from_slice(&bytes).unwrap();
        prop_assert_eq!(back, v);
    }
}
