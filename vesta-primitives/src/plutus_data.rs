use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};

use vesta_codec::num_bigint::BigInt;
use vesta_codec::{Decode, Decoder, Encode, Encoder, Error, Type};

use crate::KeyValuePairs;

const TAG_POS_BIGNUM: u64 = 2;
const TAG_NEG_BIGNUM: u64 = 3;
const TAG_ANY_CONSTR: u64 = 102;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub enum PlutusData {
    Constr(Constr<PlutusData>),
    Map(KeyValuePairs<PlutusData, PlutusData>),
    BigInt(BigInt),
    BoundedBytes(BoundedBytes),
    Array(Vec<PlutusData>),
}

impl Decode for PlutusData {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        match d.datatype()? {
            Type::Tag => {
                let tag = d.peek_tag()?;

                match tag {
                    TAG_POS_BIGNUM | TAG_NEG_BIGNUM => Ok(Self::BigInt(d.bignum()?)),
                    (121..=127) | (1280..=1400) | TAG_ANY_CONSTR => {
                        Ok(Self::Constr(Constr::decode(d)?))
                    }
                    tag => Err(Error::unknown_variant("plutus data tag", tag)),
                }
            }
            Type::UnsignedInt | Type::NegativeInt => Ok(Self::BigInt(d.bignum()?)),
            Type::Map | Type::MapIndef => Ok(Self::Map(KeyValuePairs::decode(d)?)),
            Type::Bytes | Type::BytesIndef => Ok(Self::BoundedBytes(BoundedBytes::decode(d)?)),
            Type::Array | Type::ArrayIndef => Ok(Self::Array(Vec::decode(d)?)),
            found => Err(Error::TypeMismatch {
                expected: "plutus data",
                found,
                pos: d.position(),
            }),
        }
    }
}

impl Encode for PlutusData {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            Self::Constr(constr) => {
                constr.encode(e)?;
            }
            Self::Map(map) => {
                // definite maps, matching the canonical haskell plutus
                // implementation regardless of the wire form we read
                e.map(map.len() as u64)?;

                for (k, v) in map.iter() {
                    k.encode(e)?;
                    v.encode(e)?;
                }
            }
            Self::BigInt(n) => {
                e.bignum(n)?;
            }
            Self::BoundedBytes(bytes) => {
                bytes.encode(e)?;
            }
            Self::Array(array) => {
                encode_list(array, e)?;
            }
        }

        Ok(())
    }
}

/// A constructor application: alternative index plus its fields.
///
/// Alternatives 0..=6 ride on tags 121..=127, alternatives 7..=127 on tags
/// 1280..=1400, and anything larger falls back to tag 102 carrying an
/// `[alternative, fields]` pair. Decoding applies the reverse mapping.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct Constr<A> {
    pub alternative: u64,
    pub fields: Vec<A>,
}

impl<A: Decode> Decode for Constr<A> {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let tag = d.tag()?;

        match tag {
            121..=127 => Ok(Constr {
                alternative: tag - 121,
                fields: Vec::decode(d)?,
            }),
            1280..=1400 => Ok(Constr {
                alternative: tag - 1280 + 7,
                fields: Vec::decode(d)?,
            }),
            TAG_ANY_CONSTR => {
                d.array()?;
                let alternative = d.u64()?;
                let fields = Vec::decode(d)?;
                d.expect_end_array("constr")?;

                Ok(Constr {
                    alternative,
                    fields,
                })
            }
            tag => Err(Error::unknown_variant("constr tag", tag)),
        }
    }
}

impl<A: Encode> Encode for Constr<A> {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self.alternative {
            alt @ 0..=6 => {
                e.tag(121 + alt)?;
                encode_list(&self.fields, e)?;
            }
            alt @ 7..=127 => {
                e.tag(1280 + alt - 7)?;
                encode_list(&self.fields, e)?;
            }
            alt => {
                e.tag(TAG_ANY_CONSTR)?;
                e.array(2)?;
                e.u64(alt)?;
                encode_list(&self.fields, e)?;
            }
        }

        Ok(())
    }
}

/// Defined to encode PlutusData bytestring as it is done in the canonical
/// plutus implementation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(into = "String")]
#[serde(try_from = "String")]
pub struct BoundedBytes(Vec<u8>);

impl From<Vec<u8>> for BoundedBytes {
    fn from(xs: Vec<u8>) -> Self {
        BoundedBytes(xs)
    }
}

impl From<BoundedBytes> for Vec<u8> {
    fn from(b: BoundedBytes) -> Self {
        b.0
    }
}

impl Deref for BoundedBytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<String> for BoundedBytes {
    type Error = hex::FromHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let v = hex::decode(value)?;
        Ok(BoundedBytes(v))
    }
}

impl From<BoundedBytes> for String {
    fn from(b: BoundedBytes) -> Self {
        hex::encode(b.deref())
    }
}

impl fmt::Display for BoundedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl Decode for BoundedBytes {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.bytes().map(BoundedBytes)
    }
}

impl Encode for BoundedBytes {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        // byte strings longer than 64 bytes turn into indefinite strings of
        // 64-byte chunks, as the haskell implementation emits them
        const CHUNK_SIZE: usize = 64;

        if self.0.len() <= CHUNK_SIZE {
            e.bytes(&self.0)?;
        } else {
            e.begin_bytes()?;
            for chunk in self.0.chunks(CHUNK_SIZE) {
                e.bytes(chunk)?;
            }
            e.end()?;
        }

        Ok(())
    }
}

/// Mimics the default haskell list encoding from cborg: indefinite arrays
/// for non-empty lists, a definite zero-length array otherwise.
fn encode_list<A: Encode>(list: &[A], e: &mut Encoder) -> Result<(), Error> {
    if list.is_empty() {
        e.array(0)?;
    } else {
        e.begin_array()?;
        for item in list {
            item.encode(e)?;
        }
        e.end()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use vesta_codec::{from_slice, to_vec};

    fn constr(alternative: u64) -> PlutusData {
        PlutusData::Constr(Constr {
            alternative,
            fields: vec![],
        })
    }

    #[test_case(0 => "d87980".to_string(); "alternative 0 rides on tag 121")]
    #[test_case(3 => "d87c80".to_string(); "alternative 3 rides on tag 124")]
    #[test_case(6 => "d87f80".to_string(); "alternative 6 rides on tag 127")]
    #[test_case(7 => "d9050080".to_string(); "alternative 7 rides on tag 1280")]
    #[test_case(10 => "d9050380".to_string(); "alternative 10 rides on tag 1283")]
    #[test_case(127 => "d9057880".to_string(); "alternative 127 rides on tag 1400")]
    #[test_case(200 => "d8668218c880".to_string(); "large alternatives fall back to tag 102")]
    fn constr_tag_mapping(alternative: u64) -> String {
        hex::encode(to_vec(&constr(alternative)).unwrap())
    }

    #[test_case("d87980" => 0)]
    #[test_case("d87c80" => 3)]
    #[test_case("d9050380" => 10)]
    #[test_case("d8668218c880" => 200)]
    fn constr_reverse_mapping(payload: &str) -> u64 {
        let bytes = hex::decode(payload).unwrap();
        let data: PlutusData = from_slice(&bytes).unwrap();

        match data {
            PlutusData::Constr(constr) => constr.alternative,
            _ => panic!("expected a constr"),
        }
    }

    #[test]
    fn non_empty_fields_use_indefinite_arrays() {
        let data = PlutusData::Constr(Constr {
            alternative: 1,
            fields: vec![PlutusData::BigInt(BigInt::from(42u8))],
        });

        assert_eq!(hex::encode(to_vec(&data).unwrap()), "d87a9f182aff");
    }

    #[test]
    fn long_bytes_are_chunked() {
        let data = PlutusData::BoundedBytes(BoundedBytes::from(vec![7u8; 100]));
        let bytes = to_vec(&data).unwrap();

        assert_eq!(bytes[0], 0x5f);
        assert_eq!(bytes[1], 0x58);
        assert_eq!(bytes[2], 64);
        assert_eq!(*bytes.last().unwrap(), 0xff);

        let back: PlutusData = from_slice(&bytes).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn bignums_narrow_on_encode() {
        let small: PlutusData = from_slice(&hex::decode("c24105").unwrap()).unwrap();
        assert_eq!(small, PlutusData::BigInt(BigInt::from(5u8)));

        // a value that fits in 64 bits comes back as a native int
        assert_eq!(hex::encode(to_vec(&small).unwrap()), "05");
    }

    #[test]
    fn map_entries_keep_their_order() {
        let data = PlutusData::Map(KeyValuePairs::Def(vec![
            (constr(1), constr(0)),
            (constr(0), constr(1)),
        ]));

        let bytes = to_vec(&data).unwrap();
        let back: PlutusData = from_slice(&bytes).unwrap();

        assert_eq!(back, data);
    }
}
