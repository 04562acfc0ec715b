use std::str::FromStr;

use serde_json::{json, Value as JsonValue};
use thiserror::Error as ThisError;

use vesta_codec::num_bigint::{BigInt, Sign};
use vesta_codec::utils::Int;

use crate::{Hash, KeyValuePairs, Metadatum, NativeScript, PlutusData, ToCanonicalJson};

/// Containers nested deeper than this are rejected instead of recursing
/// further, mirroring the limit the CBOR decoder applies.
pub const MAX_JSON_DEPTH: usize = 256;

#[derive(ThisError, Debug)]
pub enum JsonError {
    #[error("invalid json: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("metadatum bytes cannot be represented as json")]
    UnrepresentableBytes,

    #[error("metadatum map keys must be text to be represented as json")]
    UnrepresentableKey,

    #[error("json value {0} cannot be converted without loss of precision")]
    LossOfPrecision(serde_json::Number),

    #[error("metadatum int cannot be represented as a json number")]
    UnrepresentableInt,

    #[error("json nesting deeper than {MAX_JSON_DEPTH} levels")]
    TooDeep,

    #[error("json {0:?} has no metadatum equivalent")]
    NoMetadatumEquivalent(JsonValue),

    #[error("unknown native script type {0:?}")]
    UnknownScriptType(String),

    #[error("missing field {0} in native script json")]
    MissingField(&'static str),

    #[error("invalid field {0} in native script json")]
    InvalidField(&'static str),
}

// inferred from the canonical mapping used by the cardano-api ScriptData
// module
impl ToCanonicalJson for PlutusData {
    fn to_json(&self) -> JsonValue {
        match self {
            PlutusData::Constr(x) => {
                let fields: Vec<_> = x.fields.iter().map(|i| i.to_json()).collect();
                json!({ "constructor": x.alternative, "fields": fields })
            }
            PlutusData::Map(x) => {
                let map: Vec<_> = x
                    .iter()
                    .map(|(k, v)| json!({ "k": k.to_json(), "v": v.to_json() }))
                    .collect();
                json!({ "map": map })
            }
            PlutusData::BigInt(n) => {
                if let Ok(v) = i64::try_from(n) {
                    json!({ "int": v })
                } else if let Ok(v) = u64::try_from(n) {
                    json!({ "int": v })
                } else if n.sign() == Sign::Minus {
                    // no json rendering exists for bignums in the haskell
                    // tooling; fall back to hex of the wire magnitude
                    let magnitude: BigInt = -n - 1;
                    json!({ "bignint": hex::encode(magnitude.magnitude().to_bytes_be()) })
                } else {
                    json!({ "biguint": hex::encode(n.magnitude().to_bytes_be()) })
                }
            }
            PlutusData::BoundedBytes(x) => json!({ "bytes": hex::encode(x.as_slice()) }),
            PlutusData::Array(x) => {
                let list: Vec<_> = x.iter().map(|i| i.to_json()).collect();
                json!({ "list": list })
            }
        }
    }
}

impl ToCanonicalJson for NativeScript {
    fn to_json(&self) -> JsonValue {
        match self {
            NativeScript::ScriptPubkey(x) => {
                json!({ "type": "sig", "keyHash": x.to_string() })
            }
            NativeScript::ScriptAll(x) => {
                let scripts: Vec<_> = x.iter().map(|i| i.to_json()).collect();
                json!({ "type": "all", "scripts": scripts })
            }
            NativeScript::ScriptAny(x) => {
                let scripts: Vec<_> = x.iter().map(|i| i.to_json()).collect();
                json!({ "type": "any", "scripts": scripts })
            }
            NativeScript::ScriptNOfK(n, k) => {
                let scripts: Vec<_> = k.iter().map(|i| i.to_json()).collect();
                json!({ "type": "atLeast", "required": n, "scripts": scripts })
            }
            NativeScript::InvalidBefore(slot) => json!({ "type": "before", "slot": slot }),
            NativeScript::InvalidHereafter(slot) => json!({ "type": "after", "slot": slot }),
        }
    }
}

impl NativeScript {
    /// Parses the JSON form of a native script, the shape produced by
    /// [`ToCanonicalJson::to_json`] and understood by script evaluators.
    pub fn from_json(value: &JsonValue) -> Result<Self, JsonError> {
        native_script_from_json(value, 0)
    }

    /// Like [`NativeScript::from_json`], starting from raw JSON text.
    pub fn from_json_str(payload: &str) -> Result<Self, JsonError> {
        let value: JsonValue = serde_json::from_str(payload)?;
        native_script_from_json(&value, 0)
    }
}

fn script_list(value: &JsonValue, depth: usize) -> Result<Vec<NativeScript>, JsonError> {
    value
        .get("scripts")
        .ok_or(JsonError::MissingField("scripts"))?
        .as_array()
        .ok_or(JsonError::InvalidField("scripts"))?
        .iter()
        .map(|script| native_script_from_json(script, depth + 1))
        .collect()
}

fn native_script_from_json(value: &JsonValue, depth: usize) -> Result<NativeScript, JsonError> {
    if depth > MAX_JSON_DEPTH {
        return Err(JsonError::TooDeep);
    }

    let kind = value
        .get("type")
        .ok_or(JsonError::MissingField("type"))?
        .as_str()
        .ok_or(JsonError::InvalidField("type"))?;

    match kind {
        "sig" => {
            let key_hash = value
                .get("keyHash")
                .ok_or(JsonError::MissingField("keyHash"))?
                .as_str()
                .ok_or(JsonError::InvalidField("keyHash"))?;

            let key_hash =
                Hash::<28>::from_str(key_hash).map_err(|_| JsonError::InvalidField("keyHash"))?;

            Ok(NativeScript::ScriptPubkey(key_hash))
        }
        "all" => Ok(NativeScript::ScriptAll(script_list(value, depth)?)),
        "any" => Ok(NativeScript::ScriptAny(script_list(value, depth)?)),
        "atLeast" => {
            let required = value
                .get("required")
                .ok_or(JsonError::MissingField("required"))?
                .as_u64()
                .ok_or(JsonError::InvalidField("required"))?;

            let required =
                u32::try_from(required).map_err(|_| JsonError::InvalidField("required"))?;

            Ok(NativeScript::ScriptNOfK(
                required,
                script_list(value, depth)?,
            ))
        }
        "before" => Ok(NativeScript::InvalidBefore(slot_field(value)?)),
        "after" => Ok(NativeScript::InvalidHereafter(slot_field(value)?)),
        other => Err(JsonError::UnknownScriptType(other.to_string())),
    }
}

fn slot_field(value: &JsonValue) -> Result<u64, JsonError> {
    value
        .get("slot")
        .ok_or(JsonError::MissingField("slot"))?
        .as_u64()
        .ok_or(JsonError::InvalidField("slot"))
}

/// Maps a JSON document onto a metadatum: objects become maps, arrays
/// become lists, numbers become ints and strings become text. Booleans,
/// nulls and fractional numbers have no on-chain equivalent.
pub fn metadatum_from_json(value: &JsonValue) -> Result<Metadatum, JsonError> {
    metadatum_from_json_at(value, 0)
}

fn metadatum_from_json_at(value: &JsonValue, depth: usize) -> Result<Metadatum, JsonError> {
    if depth > MAX_JSON_DEPTH {
        return Err(JsonError::TooDeep);
    }

    match value {
        JsonValue::Number(n) => {
            if let Some(v) = n.as_i64() {
                Ok(Metadatum::Int(Int::from(v)))
            } else if let Some(v) = n.as_u64() {
                Ok(Metadatum::Int(Int::from(v)))
            } else {
                Err(JsonError::LossOfPrecision(n.clone()))
            }
        }
        JsonValue::String(s) => Ok(Metadatum::Text(s.clone())),
        JsonValue::Array(items) => {
            let items: Result<Vec<_>, _> = items
                .iter()
                .map(|item| metadatum_from_json_at(item, depth + 1))
                .collect();

            Ok(Metadatum::Array(items?))
        }
        JsonValue::Object(entries) => {
            let entries: Result<Vec<_>, _> = entries
                .iter()
                .map(|(key, value)| {
                    metadatum_from_json_at(value, depth + 1)
                        .map(|value| (Metadatum::Text(key.clone()), value))
                })
                .collect();

            Ok(Metadatum::Map(KeyValuePairs::Def(entries?)))
        }
        other => Err(JsonError::NoMetadatumEquivalent(other.clone())),
    }
}

/// The inverse of [`metadatum_from_json`]. Byte strings and non-text map
/// keys have no JSON rendering and fail the conversion.
pub fn metadatum_to_json(metadatum: &Metadatum) -> Result<JsonValue, JsonError> {
    match metadatum {
        Metadatum::Int(i) => {
            let i = i128::from(*i);

            if let Ok(v) = i64::try_from(i) {
                Ok(json!(v))
            } else if let Ok(v) = u64::try_from(i) {
                Ok(json!(v))
            } else {
                Err(JsonError::UnrepresentableInt)
            }
        }
        Metadatum::Bytes(_) => Err(JsonError::UnrepresentableBytes),
        Metadatum::Text(s) => Ok(json!(s)),
        Metadatum::Array(items) => {
            let items: Result<Vec<_>, _> = items.iter().map(metadatum_to_json).collect();
            Ok(JsonValue::Array(items?))
        }
        Metadatum::Map(entries) => {
            let mut object = serde_json::Map::new();

            for (key, value) in entries.iter() {
                let key = match key {
                    Metadatum::Text(s) => s.clone(),
                    _ => return Err(JsonError::UnrepresentableKey),
                };

                object.insert(key, metadatum_to_json(value)?);
            }

            Ok(JsonValue::Object(object))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bytes, Constr};
    use vesta_codec::num_bigint::BigInt;

    #[test]
    fn n_of_k_parses_from_json() {
        let payload = r#"{
            "type": "atLeast",
            "required": 2,
            "scripts": [
                { "type": "sig", "keyHash": "966e394a544f242081e41d1965137b1bb412ac230d40ed5407821c37" },
                { "type": "before", "slot": 4000 }
            ]
        }"#;

        let script = NativeScript::from_json_str(payload).unwrap();

        match &script {
            NativeScript::ScriptNOfK(required, scripts) => {
                assert_eq!(*required, 2);
                assert_eq!(scripts.len(), 2);
            }
            _ => panic!("expected an at-least script"),
        }

        // parsing the same json again yields an equal script
        assert_eq!(NativeScript::from_json_str(payload).unwrap(), script);

        // a different script is not equal
        let different = r#"{
            "type": "atLeast",
            "required": 2,
            "scripts": [
                { "type": "sig", "keyHash": "966e394a544f242081e41d1965137b1bb412ac230d40ed5407821c37" },
                { "type": "before", "slot": 4000 },
                { "type": "after", "slot": 7000 }
            ]
        }"#;

        assert_ne!(NativeScript::from_json_str(different).unwrap(), script);
    }

    #[test]
    fn script_json_round_trips() {
        let payload = r#"{"type":"all","scripts":[{"type":"sig","keyHash":"966e394a544f242081e41d1965137b1bb412ac230d40ed5407821c37"}]}"#;
        let script = NativeScript::from_json_str(payload).unwrap();

        assert_eq!(NativeScript::from_json(&script.to_json()).unwrap(), script);
    }

    #[test]
    fn unknown_script_types_are_rejected() {
        let result = NativeScript::from_json_str(r#"{"type":"threshold"}"#);
        assert!(matches!(result, Err(JsonError::UnknownScriptType(_))));
    }

    #[test]
    fn metadatum_bridge_round_trips() {
        let payload = r#"{"k":[1,"two",{"nested":3}]}"#;
        let value: serde_json::Value = serde_json::from_str(payload).unwrap();

        let metadatum = metadatum_from_json(&value).unwrap();
        let back = metadatum_to_json(&metadatum).unwrap();

        assert_eq!(back, value);
    }

    #[test]
    fn metadatum_bytes_do_not_serialize_to_json() {
        let metadatum = Metadatum::Map(KeyValuePairs::Def(vec![(
            Metadatum::Text("payload".into()),
            Metadatum::Bytes(Bytes::from(vec![1, 2, 3])),
        )]));

        let result = metadatum_to_json(&metadatum);
        assert!(matches!(result, Err(JsonError::UnrepresentableBytes)));
    }

    #[test]
    fn fractional_numbers_lose_precision() {
        let value: serde_json::Value = serde_json::from_str("1.5").unwrap();
        let result = metadatum_from_json(&value);

        assert!(matches!(result, Err(JsonError::LossOfPrecision(_))));
    }

    #[test]
    fn plutus_data_canonical_json() {
        let data = PlutusData::Constr(Constr {
            alternative: 0,
            fields: vec![
                PlutusData::BigInt(BigInt::from(42)),
                PlutusData::BoundedBytes(vec![0xca, 0xfe].into()),
            ],
        });

        assert_eq!(
            data.to_json(),
            serde_json::json!({
                "constructor": 0,
                "fields": [ { "int": 42 }, { "bytes": "cafe" } ]
            })
        );
    }
}
