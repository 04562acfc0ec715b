//! Ledger primitives and cbor codec for the Cardano on-chain data model
//!
//! Handcrafted, idiomatic rust artifacts based on the Conway CDDL published
//! in the IntersectMBO cardano-ledger repo.

mod certificate;
mod crypto;
mod governance;
mod json;
mod metadata;
mod plutus_data;
mod script;
mod tx;
mod value;

pub use certificate::*;
pub use governance::*;
pub use json::*;
pub use metadata::*;
pub use plutus_data::*;
pub use script::*;
pub use tx::*;
pub use value::*;

pub use vesta_codec::utils::{
    Bytes, CborWrap, Int, KeepCbor, KeyValuePairs, MaybeIndefArray, NonZeroInt, Nullable,
    PositiveCoin, Set,
};
pub use vesta_crypto::hash::Hash;

use serde::{Deserialize, Serialize};
use vesta_codec::{Decode, Decoder, Encode, Encoder, Error};

// ----- Common type definitions

pub type AddrKeyhash = Hash<28>;

pub type Coin = u64;

pub type CostModel = Vec<i64>;

pub type DatumHash = Hash<32>;

pub type DnsName = String;

pub type Epoch = u64;

pub type PolicyId = Hash<28>;

pub type PoolKeyhash = Hash<28>;

pub type PoolMetadataHash = Hash<32>;

pub type Port = u32;

pub type ProtocolVersion = (u64, u64);

pub type RewardAccount = Bytes;

pub type ScriptHash = Hash<28>;

pub type Slot = u64;

pub type TransactionId = Hash<32>;

pub type VrfKeyhash = Hash<32>;

pub type IPv4 = Bytes;

pub type IPv6 = Bytes;

/// Values that hash to a known digest size, honoring the CBOR cache of the
/// original bytes when one is attached.
pub trait ToHash<const BYTES: usize> {
    fn to_hash(&self) -> Result<Hash<BYTES>, Error>;
}

/// Values with a canonical JSON rendering.
pub trait ToCanonicalJson {
    fn to_json(&self) -> serde_json::Value;
}

/// Fills an optional struct field while decoding an integer-keyed map,
/// rejecting keys that appear twice.
pub(crate) fn decode_entry<T: Decode>(
    slot: &mut Option<T>,
    d: &mut Decoder<'_>,
    what: &'static str,
) -> Result<(), Error> {
    if slot.is_some() {
        return Err(Error::DuplicateKey { what });
    }

    *slot = Some(T::decode(d)?);

    Ok(())
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct ExUnits {
    pub mem: u64,
    pub steps: u64,
}

impl Decode for ExUnits {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let mem = d.u64()?;
        let steps = d.u64()?;
        d.expect_end_array("ex units")?;

        Ok(ExUnits { mem, steps })
    }
}

impl Encode for ExUnits {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;
        e.u64(self.mem)?;
        e.u64(self.steps)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ExUnitPrices {
    pub mem_price: RationalNumber,
    pub step_price: RationalNumber,
}

impl Decode for ExUnitPrices {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let mem_price = RationalNumber::decode(d)?;
        let step_price = RationalNumber::decode(d)?;
        d.expect_end_array("ex unit prices")?;

        Ok(ExUnitPrices {
            mem_price,
            step_price,
        })
    }
}

impl Encode for ExUnitPrices {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;
        self.mem_price.encode(e)?;
        self.step_price.encode(e)?;

        Ok(())
    }
}

/// rational numbers use tag 30 and a numerator / denominator pair
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct RationalNumber {
    pub numerator: u64,
    pub denominator: u64,
}

pub type UnitInterval = RationalNumber;

pub type PositiveInterval = RationalNumber;

const TAG_RATIONAL: u64 = 30;

impl Decode for RationalNumber {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.expect_tag("rational number", TAG_RATIONAL)?;
        d.expect_array("rational number", 2)?;
        let numerator = d.u64()?;
        let denominator = d.u64()?;
        d.end_array()?;

        Ok(RationalNumber {
            numerator,
            denominator,
        })
    }
}

impl Encode for RationalNumber {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.tag(TAG_RATIONAL)?;
        e.array(2)?;
        e.u64(self.numerator)?;
        e.u64(self.denominator)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum NetworkId {
    Testnet,
    Mainnet,
}

impl From<NetworkId> for u8 {
    fn from(network_id: NetworkId) -> u8 {
        match network_id {
            NetworkId::Testnet => 0,
            NetworkId::Mainnet => 1,
        }
    }
}

impl TryFrom<u8> for NetworkId {
    type Error = ();

    fn try_from(i: u8) -> Result<Self, Self::Error> {
        match i {
            0 => Ok(Self::Testnet),
            1 => Ok(Self::Mainnet),
            _ => Err(()),
        }
    }
}

impl Decode for NetworkId {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        match d.u64()? {
            0 => Ok(Self::Testnet),
            1 => Ok(Self::Mainnet),
            id => Err(Error::unknown_variant("network id", id)),
        }
    }
}

impl Encode for NetworkId {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.u8(u8::from(*self))?;
        Ok(())
    }
}

#[derive(
    Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, std::hash::Hash,
)]
// The script variant deliberately comes first: the Haskell reference
// codebase declares ScriptHash before KeyHash and the derived ordering of
// maps keyed by credentials must match it, even though the wire ids go the
// other way around.
pub enum StakeCredential {
    ScriptHash(ScriptHash),
    AddrKeyhash(AddrKeyhash),
}

pub type DRepCredential = StakeCredential;

pub type CommitteeColdCredential = StakeCredential;

pub type CommitteeHotCredential = StakeCredential;

impl Decode for StakeCredential {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let credential = match d.u64()? {
            0 => StakeCredential::AddrKeyhash(Hash::decode(d)?),
            1 => StakeCredential::ScriptHash(Hash::decode(d)?),
            id => return Err(Error::unknown_variant("credential", id)),
        };

        d.expect_end_array("credential")?;

        Ok(credential)
    }
}

impl Encode for StakeCredential {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;

        match self {
            StakeCredential::AddrKeyhash(hash) => {
                e.u8(0)?;
                hash.encode(e)?;
            }
            StakeCredential::ScriptHash(hash) => {
                e.u8(1)?;
                hash.encode(e)?;
            }
        }

        Ok(())
    }
}

#[derive(
    Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, std::hash::Hash,
)]
pub struct TransactionInput {
    pub transaction_id: TransactionId,
    pub index: u64,
}

impl Decode for TransactionInput {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let transaction_id = Hash::decode(d)?;
        let index = d.u64()?;
        d.expect_end_array("transaction input")?;

        Ok(TransactionInput {
            transaction_id,
            index,
        })
    }
}

impl Encode for TransactionInput {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;
        self.transaction_id.encode(e)?;
        e.u64(self.index)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
#[serde(transparent)]
pub struct PlutusScript<const VERSION: usize>(pub Bytes);

impl<const VERSION: usize> AsRef<[u8]> for PlutusScript<VERSION> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<const VERSION: usize> Decode for PlutusScript<VERSION> {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        Bytes::decode(d).map(PlutusScript)
    }
}

impl<const VERSION: usize> Encode for PlutusScript<VERSION> {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        self.0.encode(e)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum Relay {
    SingleHostAddr(Nullable<Port>, Nullable<IPv4>, Nullable<IPv6>),
    SingleHostName(Nullable<Port>, DnsName),
    MultiHostName(DnsName),
}

impl Decode for Relay {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let relay = match d.u64()? {
            0 => Relay::SingleHostAddr(
                Nullable::decode(d)?,
                Nullable::decode(d)?,
                Nullable::decode(d)?,
            ),
            1 => Relay::SingleHostName(Nullable::decode(d)?, d.str()?),
            2 => Relay::MultiHostName(d.str()?),
            id => return Err(Error::unknown_variant("relay", id)),
        };

        d.expect_end_array("relay")?;

        Ok(relay)
    }
}

impl Encode for Relay {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            Relay::SingleHostAddr(port, ipv4, ipv6) => {
                e.array(4)?;
                e.u8(0)?;
                port.encode(e)?;
                ipv4.encode(e)?;
                ipv6.encode(e)?;
            }
            Relay::SingleHostName(port, dns) => {
                e.array(3)?;
                e.u8(1)?;
                port.encode(e)?;
                dns.encode(e)?;
            }
            Relay::MultiHostName(dns) => {
                e.array(2)?;
                e.u8(2)?;
                dns.encode(e)?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct PoolMetadata {
    pub url: String,
    pub hash: PoolMetadataHash,
}

impl Decode for PoolMetadata {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let url = d.str()?;
        let hash = Hash::decode(d)?;
        d.expect_end_array("pool metadata")?;

        Ok(PoolMetadata { url, hash })
    }
}

impl Encode for PoolMetadata {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;
        self.url.encode(e)?;
        self.hash.encode(e)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct VKeyWitness {
    pub vkey: Bytes,
    pub signature: Bytes,
}

impl Decode for VKeyWitness {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let vkey = Bytes::decode(d)?;
        let signature = Bytes::decode(d)?;
        d.expect_end_array("vkey witness")?;

        Ok(VKeyWitness { vkey, signature })
    }
}

impl Encode for VKeyWitness {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;
        self.vkey.encode(e)?;
        self.signature.encode(e)?;

        Ok(())
    }
}

/* bootstrap_witness =
[ public_key : $vkey
, signature  : $signature
, chain_code : bytes .size 32
, attributes : bytes
] */

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct BootstrapWitness {
    pub public_key: Bytes,
    pub signature: Bytes,
    pub chain_code: Bytes,
    pub attributes: Bytes,
}

impl Decode for BootstrapWitness {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let public_key = Bytes::decode(d)?;
        let signature = Bytes::decode(d)?;
        let chain_code = Bytes::decode(d)?;
        let attributes = Bytes::decode(d)?;
        d.expect_end_array("bootstrap witness")?;

        Ok(BootstrapWitness {
            public_key,
            signature,
            chain_code,
            attributes,
        })
    }
}

impl Encode for BootstrapWitness {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(4)?;
        self.public_key.encode(e)?;
        self.signature.encode(e)?;
        self.chain_code.encode(e)?;
        self.attributes.encode(e)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_codec::{from_hex, to_hex};

    #[test]
    fn credential_wire_ids_and_ordering_disagree() {
        let key = StakeCredential::AddrKeyhash(Hash::new([0; 28]));
        let script = StakeCredential::ScriptHash(Hash::new([0; 28]));

        // script credentials sort first, matching the reference ledger
        assert!(script < key);

        // while on the wire the key variant takes id 0
        assert!(to_hex(&key).unwrap().starts_with("8200"));
        assert!(to_hex(&script).unwrap().starts_with("8201"));
    }

    #[test]
    fn rational_number_round_trip() {
        let r: RationalNumber = from_hex("d81e82011864").unwrap();
        assert_eq!(r.numerator, 1);
        assert_eq!(r.denominator, 100);
        assert_eq!(to_hex(&r).unwrap(), "d81e82011864");
    }

    #[test]
    fn transaction_input_round_trip() {
        let payload = format!("8258 20{} 03", "11".repeat(32)).replace(' ', "");
        let input: TransactionInput = from_hex(&payload).unwrap();
        assert_eq!(input.index, 3);
        assert_eq!(to_hex(&input).unwrap(), payload);
    }
}
