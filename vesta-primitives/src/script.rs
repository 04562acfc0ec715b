use serde::{Deserialize, Serialize};

use vesta_codec::{Decode, Decoder, Encode, Encoder, Error};

use crate::{AddrKeyhash, CborWrap, KeepCbor, PlutusScript, Slot};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub enum NativeScript {
    ScriptPubkey(AddrKeyhash),
    ScriptAll(Vec<NativeScript>),
    ScriptAny(Vec<NativeScript>),
    ScriptNOfK(u32, Vec<NativeScript>),
    InvalidBefore(Slot),
    InvalidHereafter(Slot),
}

impl Decode for NativeScript {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let script = match d.u64()? {
            0 => NativeScript::ScriptPubkey(crate::Hash::decode(d)?),
            1 => NativeScript::ScriptAll(Vec::decode(d)?),
            2 => NativeScript::ScriptAny(Vec::decode(d)?),
            3 => NativeScript::ScriptNOfK(d.u32()?, Vec::decode(d)?),
            4 => NativeScript::InvalidBefore(d.u64()?),
            5 => NativeScript::InvalidHereafter(d.u64()?),
            id => return Err(Error::unknown_variant("native script", id)),
        };

        d.expect_end_array("native script")?;

        Ok(script)
    }
}

impl Encode for NativeScript {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            NativeScript::ScriptPubkey(hash) => {
                e.array(2)?;
                e.u8(0)?;
                hash.encode(e)?;
            }
            NativeScript::ScriptAll(scripts) => {
                e.array(2)?;
                e.u8(1)?;
                scripts.encode(e)?;
            }
            NativeScript::ScriptAny(scripts) => {
                e.array(2)?;
                e.u8(2)?;
                scripts.encode(e)?;
            }
            NativeScript::ScriptNOfK(required, scripts) => {
                e.array(3)?;
                e.u8(3)?;
                e.u32(*required)?;
                scripts.encode(e)?;
            }
            NativeScript::InvalidBefore(slot) => {
                e.array(2)?;
                e.u8(4)?;
                e.u64(*slot)?;
            }
            NativeScript::InvalidHereafter(slot) => {
                e.array(2)?;
                e.u8(5)?;
                e.u64(*slot)?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Language {
    PlutusV1,
    PlutusV2,
    PlutusV3,
}

impl Decode for Language {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        match d.u64()? {
            0 => Ok(Language::PlutusV1),
            1 => Ok(Language::PlutusV2),
            2 => Ok(Language::PlutusV3),
            id => Err(Error::unknown_variant("script language", id)),
        }
    }
}

impl Encode for Language {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            Language::PlutusV1 => e.u8(0)?,
            Language::PlutusV2 => e.u8(1)?,
            Language::PlutusV3 => e.u8(2)?,
        };

        Ok(())
    }
}

// script = [0, native_script // 1, plutus_v1_script // 2, plutus_v2_script //
// 3, plutus_v3_script]
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum Script {
    NativeScript(KeepCbor<NativeScript>),
    PlutusV1Script(PlutusScript<1>),
    PlutusV2Script(PlutusScript<2>),
    PlutusV3Script(PlutusScript<3>),
}

impl Script {
    /// The plutus language of this script; native scripts have none.
    pub fn language(&self) -> Option<Language> {
        match self {
            Script::NativeScript(_) => None,
            Script::PlutusV1Script(_) => Some(Language::PlutusV1),
            Script::PlutusV2Script(_) => Some(Language::PlutusV2),
            Script::PlutusV3Script(_) => Some(Language::PlutusV3),
        }
    }
}

impl Decode for Script {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let script = match d.u64()? {
            0 => Script::NativeScript(KeepCbor::decode(d)?),
            1 => Script::PlutusV1Script(PlutusScript::decode(d)?),
            2 => Script::PlutusV2Script(PlutusScript::decode(d)?),
            3 => Script::PlutusV3Script(PlutusScript::decode(d)?),
            id => return Err(Error::unknown_variant("script", id)),
        };

        d.expect_end_array("script")?;

        Ok(script)
    }
}

impl Encode for Script {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;

        match self {
            Script::NativeScript(script) => {
                e.u8(0)?;
                script.encode(e)?;
            }
            Script::PlutusV1Script(script) => {
                e.u8(1)?;
                script.encode(e)?;
            }
            Script::PlutusV2Script(script) => {
                e.u8(2)?;
                script.encode(e)?;
            }
            Script::PlutusV3Script(script) => {
                e.u8(3)?;
                script.encode(e)?;
            }
        }

        Ok(())
    }
}

// script_ref = #6.24(bytes .cbor script)
pub type ScriptRef = CborWrap<Script>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hash;
    use std::str::FromStr;
    use vesta_codec::{from_slice, to_vec};

    #[test]
    fn n_of_k_uses_a_three_element_array() {
        let script = NativeScript::ScriptNOfK(
            2,
            vec![
                NativeScript::ScriptPubkey(
                    Hash::from_str("4d04380dcb9fbad5aff8e2f4e19394ef4e5e11b37932838f01984a12")
                        .unwrap(),
                ),
                NativeScript::InvalidBefore(4000),
            ],
        );

        let bytes = to_vec(&script).unwrap();
        assert_eq!(bytes[0], 0x83);
        assert_eq!(bytes[1], 0x03);
        assert_eq!(bytes[2], 0x02);

        let back: NativeScript = from_slice(&bytes).unwrap();
        assert_eq!(back, script);
    }

    #[test]
    fn script_ref_round_trips_through_tag_24() {
        let script = Script::PlutusV2Script(PlutusScript(vec![0xde, 0xad].into()));
        assert_eq!(script.language(), Some(Language::PlutusV2));

        let wrapped: ScriptRef = CborWrap(script);

        let bytes = to_vec(&wrapped).unwrap();
        assert_eq!(bytes[0], 0xd8);
        assert_eq!(bytes[1], 0x18);

        let back: ScriptRef = from_slice(&bytes).unwrap();
        assert_eq!(back, wrapped);
    }
}
