use serde_json::{json, Map as JsonMap, Value as JsonValue};

use vesta_primitives::{
    DatumOption, ExUnits, RedeemerTag, Redeemers, Script, ToCanonicalJson, TransactionInput,
    TransactionOutput,
};

use crate::Error;

/// Builds the request body for the script evaluation endpoint: the
/// transaction CBOR plus any utxos the provider does not know about yet.
///
/// Addresses travel as text and belong to the caller's address codec, hence
/// the rendering callback.
pub fn evaluation_payload(
    tx_hex: &str,
    additional_utxos: &[(TransactionInput, TransactionOutput)],
    mut render_address: impl FnMut(&[u8]) -> String,
) -> Result<JsonValue, Error> {
    let utxos: Result<Vec<_>, Error> = additional_utxos
        .iter()
        .map(|(input, output)| {
            let mut entry = JsonMap::new();

            entry.insert(
                "transaction".into(),
                json!({ "id": input.transaction_id.to_string() }),
            );
            entry.insert("index".into(), json!(input.index));
            entry.insert(
                "address".into(),
                json!(render_address(output.address().as_ref())),
            );
            entry.insert("value".into(), value_payload(output)?);

            if let Some(script) = output.script_ref() {
                entry.insert("script".into(), script_payload(script)?);
            }

            match output.datum() {
                Some(DatumOption::Data(data)) => {
                    entry.insert("datum".into(), json!(vesta_codec::to_hex(&*data)?));
                }
                Some(DatumOption::Hash(hash)) => {
                    entry.insert("datumHash".into(), json!(hash.to_string()));
                }
                None => {}
            }

            Ok(JsonValue::Object(entry))
        })
        .collect();

    Ok(json!({
        "cbor": tx_hex,
        "additionalUtxo": utxos?,
    }))
}

fn value_payload(output: &TransactionOutput) -> Result<JsonValue, Error> {
    let value = output.value();

    let mut payload = JsonMap::new();
    payload.insert("ada".into(), json!({ "lovelace": value.coin() }));

    if let Some(multiasset) = value.multiasset() {
        for (policy, names) in multiasset {
            let mut assets = JsonMap::new();

            for (name, quantity) in names {
                assets.insert(hex::encode(name.as_slice()), json!(quantity));
            }

            payload.insert(policy.to_string(), JsonValue::Object(assets));
        }
    }

    Ok(JsonValue::Object(payload))
}

fn script_payload(script: &Script) -> Result<JsonValue, Error> {
    let payload = match script {
        Script::NativeScript(native) => {
            json!({ "language": "native", "json": native.to_json() })
        }
        Script::PlutusV1Script(script) => {
            json!({ "language": "plutus:v1", "cbor": hex::encode(script.as_ref()) })
        }
        Script::PlutusV2Script(script) => {
            json!({ "language": "plutus:v2", "cbor": hex::encode(script.as_ref()) })
        }
        Script::PlutusV3Script(script) => {
            json!({ "language": "plutus:v3", "cbor": hex::encode(script.as_ref()) })
        }
    };

    Ok(payload)
}

/// Applies an evaluation response to a redeemer collection: every
/// recognized `"<tag>:<index>"` key copies its memory / steps pair onto the
/// matching redeemer. Keys that name no known tag or no present redeemer
/// are skipped, matching observed provider behavior.
pub fn apply_evaluation(response: &JsonValue, redeemers: &mut Redeemers) -> Result<(), Error> {
    let result = response
        .get("result")
        .ok_or_else(|| Error::InvalidResponse("response without a result field".into()))?;

    if let Some(failure) = result.get("EvaluationFailure") {
        return Err(Error::EvaluationFailure(failure.clone()));
    }

    let evaluations = result
        .get("EvaluationResult")
        .and_then(|v| v.as_object())
        .ok_or_else(|| Error::InvalidResponse("response without an EvaluationResult".into()))?;

    for (key, units) in evaluations {
        let (tag, index) = match parse_redeemer_key(key) {
            Some(pointer) => pointer,
            None => continue,
        };

        let mem = units
            .get("memory")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| Error::InvalidResponse(format!("bad memory units for {key}")))?;

        let steps = units
            .get("steps")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| Error::InvalidResponse(format!("bad step units for {key}")))?;

        redeemers.set_ex_units(tag, index, ExUnits { mem, steps });
    }

    Ok(())
}

fn parse_redeemer_key(key: &str) -> Option<(RedeemerTag, u64)> {
    let (tag, index) = key.split_once(':')?;

    let tag = match tag {
        "spend" => RedeemerTag::Spend,
        "mint" => RedeemerTag::Mint,
        "certificate" => RedeemerTag::Cert,
        "withdrawal" => RedeemerTag::Reward,
        "vote" => RedeemerTag::Vote,
        "propose" => RedeemerTag::Propose,
        _ => return None,
    };

    let index = index.parse().ok()?;

    Some((tag, index))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use vesta_primitives::{PlutusData, Redeemer};

    use super::*;

    fn spend_redeemer() -> Redeemers {
        Redeemers::List(vec![Redeemer {
            tag: RedeemerTag::Spend,
            index: 0,
            data: PlutusData::Array(vec![]),
            ex_units: ExUnits { mem: 0, steps: 0 },
        }])
    }

    #[test]
    fn evaluation_result_fills_in_ex_units() {
        let response = json!({
            "result": {
                "EvaluationResult": {
                    "spend:0": { "memory": 2000, "steps": 500000 }
                }
            }
        });

        let mut redeemers = spend_redeemer();
        apply_evaluation(&response, &mut redeemers).unwrap();

        match redeemers {
            Redeemers::List(redeemers) => {
                assert_eq!(
                    redeemers[0].ex_units,
                    ExUnits {
                        mem: 2000,
                        steps: 500000
                    }
                );
            }
            _ => panic!("expected the list form"),
        }
    }

    #[test]
    fn unknown_keys_are_silently_skipped() {
        let response = json!({
            "result": {
                "EvaluationResult": {
                    "spend:0": { "memory": 2000, "steps": 500000 },
                    "unknown:7": { "memory": 1, "steps": 1 }
                }
            }
        });

        let mut redeemers = spend_redeemer();
        assert!(apply_evaluation(&response, &mut redeemers).is_ok());
    }

    #[test]
    fn evaluation_failure_surfaces_as_an_error() {
        let response = json!({
            "result": {
                "EvaluationFailure": { "ScriptFailures": {} }
            }
        });

        let mut redeemers = spend_redeemer();
        let result = apply_evaluation(&response, &mut redeemers);

        assert!(matches!(result, Err(Error::EvaluationFailure(_))));
    }

    #[test]
    fn payload_carries_the_transaction_and_extra_utxos() {
        use vesta_primitives::{Hash, TransactionOutput, Value};

        let input = TransactionInput {
            transaction_id: Hash::new([0xab; 32]),
            index: 1,
        };

        let output = TransactionOutput::new(
            vec![0x61, 0x62].into(),
            Value::Coin(7000000),
            None,
            None,
        );

        let payload =
            evaluation_payload("84a300", &[(input, output)], |address| hex::encode(address))
                .unwrap();

        assert_eq!(payload["cbor"], json!("84a300"));
        assert_eq!(payload["additionalUtxo"][0]["index"], json!(1));
        assert_eq!(payload["additionalUtxo"][0]["address"], json!("6162"));
        assert_eq!(
            payload["additionalUtxo"][0]["value"]["ada"]["lovelace"],
            json!(7000000)
        );
    }
}
