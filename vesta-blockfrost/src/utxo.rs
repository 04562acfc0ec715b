use serde::Deserialize;

use vesta_primitives::{
    AssetId, Bytes, CborWrap, DatumOption, Hash, KeepCbor, Multiasset, PlutusData, Script,
    ScriptHash, TransactionInput, TransactionOutput, Value,
};

use crate::Error;

/// One element of a Blockfrost `addresses/{address}/utxos` response.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UtxoEntry {
    pub address: String,
    pub tx_hash: String,
    pub output_index: u64,
    pub amount: Vec<AmountEntry>,
    #[serde(default)]
    pub data_hash: Option<String>,
    #[serde(default)]
    pub inline_datum: Option<String>,
    #[serde(default)]
    pub reference_script_hash: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AmountEntry {
    pub unit: String,
    pub quantity: String,
}

/// Pieces the utxo listing references without inlining. Addresses come back
/// as bech32 text and belong to the address codec of the caller; reference
/// scripts require an extra provider round-trip, so both are resolved
/// through callbacks.
pub trait UtxoResolver {
    fn decode_address(&mut self, address: &str) -> Result<Vec<u8>, Error>;

    fn resolve_script(&mut self, script_hash: &ScriptHash) -> Result<Option<Script>, Error>;
}

/// Turns a utxo listing into domain `(input, output)` pairs.
pub fn parse_utxos<R: UtxoResolver>(
    payload: &str,
    resolver: &mut R,
) -> Result<Vec<(TransactionInput, TransactionOutput)>, Error> {
    let entries: Vec<UtxoEntry> = serde_json::from_str(payload)?;

    entries
        .into_iter()
        .map(|entry| parse_utxo(entry, resolver))
        .collect()
}

fn parse_utxo<R: UtxoResolver>(
    entry: UtxoEntry,
    resolver: &mut R,
) -> Result<(TransactionInput, TransactionOutput), Error> {
    let transaction_id = entry
        .tx_hash
        .parse::<Hash<32>>()
        .map_err(Error::Hex)?;

    let input = TransactionInput {
        transaction_id,
        index: entry.output_index,
    };

    let address = Bytes::from(resolver.decode_address(&entry.address)?);
    let value = value_from_amounts(&entry.amount)?;

    let datum = match (&entry.inline_datum, &entry.data_hash) {
        (Some(inline), _) => {
            let data: KeepCbor<PlutusData> = vesta_codec::from_hex(inline)?;
            Some(DatumOption::Data(CborWrap(data)))
        }
        (None, Some(hash)) => Some(DatumOption::Hash(hash.parse().map_err(Error::Hex)?)),
        (None, None) => None,
    };

    let script_ref = match &entry.reference_script_hash {
        Some(hash) => {
            let hash: ScriptHash = hash.parse().map_err(Error::Hex)?;
            resolver.resolve_script(&hash)?.map(CborWrap)
        }
        None => None,
    };

    Ok((input, TransactionOutput::new(address, value, datum, script_ref)))
}

/// Folds a Blockfrost `amount` array into a value; `lovelace` is the coin,
/// every other unit is the hex concatenation of a policy id and an asset
/// name.
fn value_from_amounts(amounts: &[AmountEntry]) -> Result<Value, Error> {
    let mut coin = 0i64;
    let mut assets: Multiasset<i64> = Multiasset::new();

    for amount in amounts {
        let asset = AssetId::from_unit(&amount.unit)
            .map_err(|_| Error::UnknownUnit(amount.unit.clone()))?;

        match asset {
            AssetId::Lovelace => {
                coin = amount
                    .quantity
                    .parse::<u64>()
                    .ok()
                    .and_then(|quantity| i64::try_from(quantity).ok())
                    .ok_or_else(|| Error::InvalidQuantity(amount.quantity.clone()))?;
            }
            AssetId::Asset(policy, name) => {
                let quantity = amount
                    .quantity
                    .parse::<i64>()
                    .map_err(|_| Error::InvalidQuantity(amount.quantity.clone()))?;

                assets.entry(policy).or_default().insert(name, quantity);
            }
        }
    }

    if assets.is_empty() {
        Ok(Value::Coin(coin))
    } else {
        Ok(Value::Multiasset(coin, assets))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use vesta_primitives::AssetName;

    use super::*;

    struct FakeResolver;

    impl UtxoResolver for FakeResolver {
        fn decode_address(&mut self, address: &str) -> Result<Vec<u8>, Error> {
            // the tests ship addresses as hex to keep bech32 out of scope
            Ok(hex::decode(address)?)
        }

        fn resolve_script(&mut self, _script_hash: &ScriptHash) -> Result<Option<Script>, Error> {
            Ok(None)
        }
    }

    #[test]
    fn utxo_listing_parses_into_domain_pairs() {
        let payload = format!(
            r#"[
              {{
                "address": "6111111111111111111111111111111111111111111111111111111111",
                "tx_hash": "{}",
                "output_index": 2,
                "amount": [
                  {{ "unit": "lovelace", "quantity": "42000000" }},
                  {{ "unit": "{}736b756c6c", "quantity": "12" }}
                ],
                "data_hash": "{}"
              }}
            ]"#,
            "ab".repeat(32),
            "cd".repeat(28),
            "ef".repeat(32),
        );

        let utxos = parse_utxos(&payload, &mut FakeResolver).unwrap();
        assert_eq!(utxos.len(), 1);

        let (input, output) = &utxos[0];

        assert_eq!(input.transaction_id, Hash::new([0xab; 32]));
        assert_eq!(input.index, 2);

        assert_eq!(output.value().coin(), 42000000);

        let assets = output.value().multiasset().unwrap();
        let names = assets.get(&Hash::new([0xcd; 28])).unwrap();
        let quantity = names
            .get(&AssetName::try_from(b"skull".to_vec()).unwrap())
            .unwrap();
        assert_eq!(*quantity, 12);

        assert_eq!(
            output.datum(),
            Some(DatumOption::Hash(Hash::new([0xef; 32])))
        );
    }

    #[test]
    fn inline_datum_wins_over_the_hash() {
        let payload = format!(
            r#"[
              {{
                "address": "61",
                "tx_hash": "{}",
                "output_index": 0,
                "amount": [ {{ "unit": "lovelace", "quantity": "1" }} ],
                "data_hash": "{}",
                "inline_datum": "d87980"
              }}
            ]"#,
            "ab".repeat(32),
            "ef".repeat(32),
        );

        let utxos = parse_utxos(&payload, &mut FakeResolver).unwrap();
        let (_, output) = &utxos[0];

        assert!(matches!(output.datum(), Some(DatumOption::Data(_))));
    }

    #[test]
    fn garbage_quantities_are_rejected() {
        let payload = format!(
            r#"[
              {{
                "address": "61",
                "tx_hash": "{}",
                "output_index": 0,
                "amount": [ {{ "unit": "lovelace", "quantity": "many" }} ]
              }}
            ]"#,
            "ab".repeat(32),
        );

        let result = parse_utxos(&payload, &mut FakeResolver);
        assert!(matches!(result, Err(Error::InvalidQuantity(_))));
    }
}
