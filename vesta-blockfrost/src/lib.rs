//! Parsers for the JSON payloads exchanged with a Blockfrost-compatible
//! provider: utxo listings coming in, script evaluation requests going out
//! and their responses coming back.
//!
//! No networking lives here; callers hand over payload text and receive
//! domain values from vesta-primitives.

mod evaluate;
mod utxo;

pub use evaluate::{apply_evaluation, evaluation_payload};
pub use utxo::{parse_utxos, AmountEntry, UtxoEntry, UtxoResolver};

use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid hex payload: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid cbor payload: {0}")]
    Codec(#[from] vesta_codec::Error),

    #[error("unexpected response shape: {0}")]
    InvalidResponse(String),

    #[error("unknown asset unit {0:?}")]
    UnknownUnit(String),

    #[error("invalid quantity {0:?}")]
    InvalidQuantity(String),

    #[error("script evaluation failed: {0}")]
    EvaluationFailure(serde_json::Value),
}
