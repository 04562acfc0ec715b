use std::collections::BTreeMap;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use vesta_codec::{Decode, Decoder, Encode, Encoder, Error, Type};

use crate::{Bytes, NonZeroInt, PolicyId};

/// The name of a native asset under some policy, at most 32 bytes.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
#[serde(transparent)]
pub struct AssetName(Bytes);

pub const MAX_ASSET_NAME_LENGTH: usize = 32;

impl AssetName {
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl TryFrom<Bytes> for AssetName {
    type Error = Error;

    fn try_from(value: Bytes) -> Result<Self, Self::Error> {
        if value.len() > MAX_ASSET_NAME_LENGTH {
            return Err(Error::MaxLength {
                what: "asset name",
                len: value.len(),
                max: MAX_ASSET_NAME_LENGTH,
            });
        }

        Ok(AssetName(value))
    }
}

impl TryFrom<Vec<u8>> for AssetName {
    type Error = Error;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        AssetName::try_from(Bytes::from(value))
    }
}

impl From<AssetName> for Bytes {
    fn from(value: AssetName) -> Self {
        value.0
    }
}

impl Deref for AssetName {
    type Target = Bytes;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Decode for AssetName {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        AssetName::try_from(Bytes::decode(d)?)
    }
}

impl Encode for AssetName {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        self.0.encode(e)
    }
}

/// Identifies an asset class: the ada coin itself or a policy / name pair.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub enum AssetId {
    Lovelace,
    Asset(PolicyId, AssetName),
}

impl AssetId {
    /// Parses a provider-style unit: the literal `lovelace`, or the hex
    /// concatenation of a policy id and an asset name.
    pub fn from_unit(unit: &str) -> Result<Self, Error> {
        if unit == "lovelace" {
            return Ok(AssetId::Lovelace);
        }

        let bytes = hex::decode(unit)
            .map_err(|e| Error::message(format!("invalid asset unit: {e}")))?;

        if bytes.len() < 28 {
            return Err(Error::message("asset unit shorter than a policy id"));
        }

        let policy = PolicyId::from(&bytes[..28]);
        let name = AssetName::try_from(bytes[28..].to_vec())?;

        Ok(AssetId::Asset(policy, name))
    }

    pub fn is_lovelace(&self) -> bool {
        matches!(self, AssetId::Lovelace)
    }

    pub fn policy_id(&self) -> Option<&PolicyId> {
        match self {
            AssetId::Lovelace => None,
            AssetId::Asset(policy, _) => Some(policy),
        }
    }

    pub fn asset_name(&self) -> Option<&AssetName> {
        match self {
            AssetId::Lovelace => None,
            AssetId::Asset(_, name) => Some(name),
        }
    }
}

/// Nested policy to asset-name to quantity mapping. Keys are unique and the
/// backing map re-canonicalizes their order on write, regardless of the
/// order found on the wire.
pub type Multiasset<A> = BTreeMap<PolicyId, BTreeMap<AssetName, A>>;

pub type Mint = Multiasset<NonZeroInt>;

/// A coin amount paired with whatever native assets ride along with it.
///
/// Every quantity is signed, the coin included: arithmetic over values
/// produces transient negative amounts (mint bookkeeping, change deltas),
/// and the ledger's non-negativity rules are enforced by the transaction
/// builder rather than here. The wire form stays unsigned; coins beyond
/// the `i64` range fail to decode and negative values fail to encode.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum Value {
    Coin(i64),
    Multiasset(i64, Multiasset<i64>),
}

impl Value {
    pub fn coin(&self) -> i64 {
        match self {
            Value::Coin(coin) => *coin,
            Value::Multiasset(coin, _) => *coin,
        }
    }

    pub fn set_coin(&mut self, value: i64) {
        match self {
            Value::Coin(coin) => *coin = value,
            Value::Multiasset(coin, _) => *coin = value,
        }
    }

    pub fn multiasset(&self) -> Option<&Multiasset<i64>> {
        match self {
            Value::Coin(_) => None,
            Value::Multiasset(_, multiasset) => Some(multiasset),
        }
    }

    fn assets(&self) -> Multiasset<i64> {
        match self {
            Value::Coin(_) => BTreeMap::new(),
            Value::Multiasset(_, multiasset) => multiasset.clone(),
        }
    }

    fn from_parts(coin: i64, assets: Multiasset<i64>) -> Value {
        if assets.is_empty() {
            Value::Coin(coin)
        } else {
            Value::Multiasset(coin, assets)
        }
    }

    /// Componentwise sum. Asset entries present on only one side are
    /// copied; zero quantities stay around until [`Value::normalize`].
    pub fn add(&self, other: &Value) -> Value {
        let coin = self.coin() + other.coin();
        let mut assets = self.assets();

        if let Value::Multiasset(_, additions) = other {
            for (policy, names) in additions {
                let policy_assets = assets.entry(*policy).or_default();

                for (name, quantity) in names {
                    *policy_assets.entry(name.clone()).or_insert(0) += quantity;
                }
            }
        }

        Value::from_parts(coin, assets)
    }

    /// Componentwise difference, the dual of [`Value::add`]. The coin goes
    /// negative just like any asset quantity when the subtrahend is larger.
    pub fn subtract(&self, other: &Value) -> Value {
        let coin = self.coin() - other.coin();
        let mut assets = self.assets();

        if let Value::Multiasset(_, subtractions) = other {
            for (policy, names) in subtractions {
                let policy_assets = assets.entry(*policy).or_default();

                for (name, quantity) in names {
                    *policy_assets.entry(name.clone()).or_insert(0) -= quantity;
                }
            }
        }

        Value::from_parts(coin, assets)
    }

    /// Drops zero quantities and empty policies, collapsing back to a bare
    /// coin when nothing is left.
    pub fn normalize(self) -> Value {
        match self {
            Value::Coin(coin) => Value::Coin(coin),
            Value::Multiasset(coin, assets) => {
                let assets: Multiasset<i64> = assets
                    .into_iter()
                    .map(|(policy, names)| {
                        let names: BTreeMap<_, _> =
                            names.into_iter().filter(|(_, q)| *q != 0).collect();
                        (policy, names)
                    })
                    .filter(|(_, names)| !names.is_empty())
                    .collect();

                Value::from_parts(coin, assets)
            }
        }
    }
}

impl From<i64> for Value {
    fn from(coin: i64) -> Self {
        Value::Coin(coin)
    }
}

fn decode_coin(d: &mut Decoder<'_>) -> Result<i64, Error> {
    i64::try_from(d.u64()?).map_err(|_| Error::IntOverflow { what: "coin" })
}

fn encode_coin(coin: i64, e: &mut Encoder) -> Result<(), Error> {
    if coin < 0 {
        return Err(Error::message(
            "negative coin amounts have no wire representation",
        ));
    }

    e.u64(coin as u64)?;

    Ok(())
}

impl Decode for Value {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        match d.datatype()? {
            Type::UnsignedInt => Ok(Value::Coin(decode_coin(d)?)),
            Type::Array | Type::ArrayIndef => {
                d.array()?;
                let coin = decode_coin(d)?;
                let multiasset = Multiasset::decode(d)?;
                d.expect_end_array("value")?;

                Ok(Value::Multiasset(coin, multiasset))
            }
            found => Err(Error::TypeMismatch {
                expected: "value",
                found,
                pos: d.position(),
            }),
        }
    }
}

impl Encode for Value {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            Value::Coin(coin) => {
                encode_coin(*coin, e)?;
            }
            Value::Multiasset(coin, multiasset) => {
                e.array(2)?;
                encode_coin(*coin, e)?;

                // empty policies carry no information and are dropped
                let policies: Vec<_> = multiasset
                    .iter()
                    .filter(|(_, names)| !names.is_empty())
                    .collect();

                e.map(policies.len() as u64)?;

                for (policy, names) in policies {
                    policy.encode(e)?;
                    names.encode(e)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hash;
    use vesta_codec::{from_hex, from_slice, to_hex, to_vec};

    fn policy(fill: u8) -> PolicyId {
        Hash::new([fill; 28])
    }

    fn name(text: &str) -> AssetName {
        AssetName::try_from(text.as_bytes().to_vec()).unwrap()
    }

    fn token_value(coin: i64, fill: u8, asset: &str, quantity: i64) -> Value {
        let mut assets = Multiasset::new();
        assets
            .entry(policy(fill))
            .or_default()
            .insert(name(asset), quantity);

        Value::Multiasset(coin, assets)
    }

    #[test]
    fn bare_coin_encodes_as_a_single_uint() {
        assert_eq!(to_hex(&Value::Coin(1000000)).unwrap(), "1a000f4240");
    }

    #[test]
    fn add_is_commutative() {
        let a = token_value(5, 1, "skull", 7);
        let b = token_value(3, 2, "bone", 2);

        assert_eq!(a.add(&b), b.add(&a));
    }

    #[test]
    fn add_zero_is_identity() {
        let a = token_value(5, 1, "skull", 7);

        assert_eq!(a.add(&Value::Coin(0)), a);
    }

    #[test]
    fn add_then_subtract_round_trips_modulo_normalization() {
        let a = token_value(5, 1, "skull", 7);
        let b = token_value(3, 2, "bone", 2);

        assert_eq!(a.add(&b).subtract(&b).normalize(), a);
    }

    #[test]
    fn subtraction_can_go_negative() {
        let a = token_value(5, 1, "skull", 2);
        let b = token_value(0, 1, "skull", 7);

        let delta = a.subtract(&b);
        let quantity = delta.multiasset().unwrap()[&policy(1)][&name("skull")];

        assert_eq!(quantity, -5);
    }

    #[test]
    fn coin_subtraction_surfaces_the_signed_delta() {
        let a = Value::Coin(3);
        let b = Value::Coin(10);

        assert_eq!(a.subtract(&b), Value::Coin(-7));

        // and the delta cancels back out, no clamping anywhere
        assert_eq!(a.subtract(&b).add(&b), a);
    }

    #[test]
    fn negative_coins_refuse_to_serialize() {
        let delta = Value::Coin(5).subtract(&Value::Coin(6));

        assert!(matches!(to_vec(&delta), Err(Error::Message(_))));
    }

    #[test]
    fn oversized_coins_fail_to_decode() {
        // 2^63, one past the signed range
        let result: Result<Value, _> = from_hex("1b8000000000000000");
        assert!(matches!(result, Err(Error::IntOverflow { .. })));
    }

    #[test]
    fn normalize_prunes_zero_quantities() {
        let a = token_value(5, 1, "skull", 7);
        let b = token_value(0, 1, "skull", 7);

        assert_eq!(a.subtract(&b).normalize(), Value::Coin(5));
    }

    #[test]
    fn non_canonical_policy_order_is_recomputed_on_write() {
        // policy 02 before policy 01 on the wire
        let payload = format!(
            "82 05 a2 581c{} a1 43 626f6e 01 581c{} a1 45 736b756c6c 02",
            "02".repeat(28),
            "01".repeat(28)
        )
        .replace(' ', "");

        let value: Value = from_hex(&payload).unwrap();
        let bytes = to_vec(&value).unwrap();

        let canonical = format!(
            "82 05 a2 581c{} a1 45 736b756c6c 02 581c{} a1 43 626f6e 01",
            "01".repeat(28),
            "02".repeat(28)
        )
        .replace(' ', "");

        assert_eq!(hex::encode(&bytes), canonical);

        let reparsed: Value = from_slice(&bytes).unwrap();
        assert_eq!(reparsed, value);
    }

    #[test]
    fn duplicate_policies_are_rejected() {
        let payload = format!(
            "82 05 a2 581c{} a1 43 626f6e 01 581c{} a1 45 736b756c6c 02",
            "01".repeat(28),
            "01".repeat(28)
        )
        .replace(' ', "");

        let result: Result<Value, _> = from_hex(&payload);
        assert!(matches!(result, Err(Error::DuplicateKey { .. })));
    }

    #[test]
    fn asset_names_longer_than_32_bytes_are_rejected() {
        let result = AssetName::try_from(vec![0u8; 33]);
        assert!(matches!(result, Err(Error::MaxLength { .. })));
    }

    #[test]
    fn asset_ids_parse_from_provider_units() {
        assert!(AssetId::from_unit("lovelace").unwrap().is_lovelace());

        let unit = format!("{}736b756c6c", "01".repeat(28));
        let asset = AssetId::from_unit(&unit).unwrap();

        assert_eq!(asset.policy_id(), Some(&policy(1)));
        assert_eq!(asset.asset_name(), Some(&name("skull")));

        assert!(AssetId::from_unit("00ff").is_err());
    }
}
