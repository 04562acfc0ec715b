use serde::{Deserialize, Serialize};

use vesta_codec::{Decode, Decoder, Encode, Encoder, Error, Type};

use crate::{Bytes, Int, KeyValuePairs, NativeScript, PlutusScript};

/// Hard ledger limit for metadatum byte strings and text strings, enforced
/// on write; reading is lenient so that historical on-chain data survives.
pub const MAX_METADATUM_STRING_LENGTH: usize = 64;

pub type MetadatumLabel = u64;

pub type Metadata = KeyValuePairs<MetadatumLabel, Metadatum>;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub enum Metadatum {
    Int(Int),
    Bytes(Bytes),
    Text(String),
    Array(Vec<Metadatum>),
    Map(KeyValuePairs<Metadatum, Metadatum>),
}

impl Decode for Metadatum {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        match d.datatype()? {
            Type::UnsignedInt | Type::NegativeInt => Ok(Metadatum::Int(d.int()?)),
            Type::Bytes | Type::BytesIndef => Ok(Metadatum::Bytes(Bytes::decode(d)?)),
            Type::String | Type::StringIndef => Ok(Metadatum::Text(d.str()?)),
            Type::Array | Type::ArrayIndef => Ok(Metadatum::Array(Vec::decode(d)?)),
            Type::Map | Type::MapIndef => Ok(Metadatum::Map(KeyValuePairs::decode(d)?)),
            found => Err(Error::TypeMismatch {
                expected: "metadatum",
                found,
                pos: d.position(),
            }),
        }
    }
}

impl Encode for Metadatum {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            Metadatum::Int(i) => {
                i.encode(e)?;
            }
            Metadatum::Bytes(bytes) => {
                if bytes.len() > MAX_METADATUM_STRING_LENGTH {
                    return Err(Error::MaxLength {
                        what: "metadatum bytes",
                        len: bytes.len(),
                        max: MAX_METADATUM_STRING_LENGTH,
                    });
                }

                bytes.encode(e)?;
            }
            Metadatum::Text(text) => {
                if text.len() > MAX_METADATUM_STRING_LENGTH {
                    return Err(Error::MaxLength {
                        what: "metadatum text",
                        len: text.len(),
                        max: MAX_METADATUM_STRING_LENGTH,
                    });
                }

                text.encode(e)?;
            }
            Metadatum::Array(items) => {
                items.encode(e)?;
            }
            Metadatum::Map(entries) => {
                entries.encode(e)?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct PostAlonzoAuxiliaryData {
    pub metadata: Option<Metadata>,
    pub native_scripts: Option<Vec<NativeScript>>,
    pub plutus_v1_scripts: Option<Vec<PlutusScript<1>>>,
    pub plutus_v2_scripts: Option<Vec<PlutusScript<2>>>,
    pub plutus_v3_scripts: Option<Vec<PlutusScript<3>>>,
}

impl Decode for PostAlonzoAuxiliaryData {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let mut metadata = None;
        let mut native_scripts = None;
        let mut plutus_v1_scripts = None;
        let mut plutus_v2_scripts = None;
        let mut plutus_v3_scripts = None;

        d.map()?;

        while d.datatype()? != Type::EndMap {
            match d.u64()? {
                0 => crate::decode_entry(&mut metadata, d, "auxiliary metadata")?,
                1 => crate::decode_entry(&mut native_scripts, d, "auxiliary native scripts")?,
                2 => crate::decode_entry(&mut plutus_v1_scripts, d, "auxiliary plutus v1")?,
                3 => crate::decode_entry(&mut plutus_v2_scripts, d, "auxiliary plutus v2")?,
                4 => crate::decode_entry(&mut plutus_v3_scripts, d, "auxiliary plutus v3")?,
                key => return Err(Error::unknown_variant("auxiliary data", key)),
            }
        }

        d.end_map()?;

        Ok(PostAlonzoAuxiliaryData {
            metadata,
            native_scripts,
            plutus_v1_scripts,
            plutus_v2_scripts,
            plutus_v3_scripts,
        })
    }
}

impl Encode for PostAlonzoAuxiliaryData {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        let present = [
            self.metadata.is_some(),
            self.native_scripts.is_some(),
            self.plutus_v1_scripts.is_some(),
            self.plutus_v2_scripts.is_some(),
            self.plutus_v3_scripts.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count();

        e.map(present as u64)?;

        if let Some(metadata) = &self.metadata {
            e.u8(0)?;
            metadata.encode(e)?;
        }

        if let Some(scripts) = &self.native_scripts {
            e.u8(1)?;
            scripts.encode(e)?;
        }

        if let Some(scripts) = &self.plutus_v1_scripts {
            e.u8(2)?;
            scripts.encode(e)?;
        }

        if let Some(scripts) = &self.plutus_v2_scripts {
            e.u8(3)?;
            scripts.encode(e)?;
        }

        if let Some(scripts) = &self.plutus_v3_scripts {
            e.u8(4)?;
            scripts.encode(e)?;
        }

        Ok(())
    }
}

const TAG_POST_ALONZO_AUXILIARY: u64 = 259;

/// Auxiliary data kept its Shelley and Shelley-MA wire forms alive across
/// the eras, so all three shapes decode and re-encode as themselves.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum AuxiliaryData {
    Shelley(Metadata),
    ShelleyMa {
        transaction_metadata: Metadata,
        auxiliary_scripts: Option<Vec<NativeScript>>,
    },
    PostAlonzo(PostAlonzoAuxiliaryData),
}

impl Decode for AuxiliaryData {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        match d.datatype()? {
            Type::Map | Type::MapIndef => Ok(AuxiliaryData::Shelley(Metadata::decode(d)?)),
            Type::Array | Type::ArrayIndef => {
                d.array()?;
                let transaction_metadata = Metadata::decode(d)?;

                let auxiliary_scripts = if d.datatype()? != Type::EndArray {
                    Some(Vec::decode(d)?)
                } else {
                    None
                };

                d.expect_end_array("auxiliary data")?;

                Ok(AuxiliaryData::ShelleyMa {
                    transaction_metadata,
                    auxiliary_scripts,
                })
            }
            Type::Tag => {
                d.expect_tag("auxiliary data", TAG_POST_ALONZO_AUXILIARY)?;
                Ok(AuxiliaryData::PostAlonzo(PostAlonzoAuxiliaryData::decode(
                    d,
                )?))
            }
            found => Err(Error::TypeMismatch {
                expected: "auxiliary data",
                found,
                pos: d.position(),
            }),
        }
    }
}

impl Encode for AuxiliaryData {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            AuxiliaryData::Shelley(metadata) => {
                metadata.encode(e)?;
            }
            AuxiliaryData::ShelleyMa {
                transaction_metadata,
                auxiliary_scripts,
            } => match auxiliary_scripts {
                Some(scripts) => {
                    e.array(2)?;
                    transaction_metadata.encode(e)?;
                    scripts.encode(e)?;
                }
                None => {
                    e.array(1)?;
                    transaction_metadata.encode(e)?;
                }
            },
            AuxiliaryData::PostAlonzo(data) => {
                e.tag(TAG_POST_ALONZO_AUXILIARY)?;
                data.encode(e)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_codec::{from_hex, to_hex, to_vec};

    #[test]
    fn oversized_bytes_fail_to_serialize() {
        let metadatum = Metadatum::Bytes(vec![0u8; 65].into());
        let result = to_vec(&metadatum);

        assert!(matches!(
            result,
            Err(Error::MaxLength {
                what: "metadatum bytes",
                ..
            })
        ));
    }

    #[test]
    fn oversized_text_fails_to_serialize() {
        let metadatum = Metadatum::Text("x".repeat(65));
        let result = to_vec(&metadatum);

        assert!(matches!(
            result,
            Err(Error::MaxLength {
                what: "metadatum text",
                ..
            })
        ));
    }

    #[test]
    fn sixty_four_bytes_are_still_fine() {
        let metadatum = Metadatum::Bytes(vec![0u8; 64].into());
        assert!(to_vec(&metadatum).is_ok());
    }

    #[test]
    fn oversized_values_still_decode() {
        let payload = format!("5841{}", "00".repeat(65));
        let metadatum: Metadatum = from_hex(&payload).unwrap();

        assert!(matches!(metadatum, Metadatum::Bytes(_)));
    }

    #[test]
    fn shelley_metadata_round_trip() {
        // {674: {"msg": ["hello"]}}
        let payload = "a11902a2a1636d7367816568656c6c6f";
        let aux: AuxiliaryData = from_hex(payload).unwrap();

        assert!(matches!(aux, AuxiliaryData::Shelley(_)));
        assert_eq!(to_hex(&aux).unwrap(), payload);
    }

    #[test]
    fn post_alonzo_auxiliary_data_keeps_its_tag() {
        // tag 259, {0: {674: "msg"}}
        let payload = "d90103a100a11902a2636d7367";
        let aux: AuxiliaryData = from_hex(payload).unwrap();

        assert!(matches!(aux, AuxiliaryData::PostAlonzo(_)));
        assert_eq!(to_hex(&aux).unwrap(), payload);
    }
}
