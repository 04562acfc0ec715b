use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vesta_codec::{Decode, Decoder, Encode, Encoder, Error, Type};

use crate::{
    decode_entry, AddrKeyhash, AuxiliaryData, BootstrapWitness, Bytes, Certificate, Coin,
    DatumHash, ExUnits, Hash, KeepCbor, KeyValuePairs, Mint, NativeScript, NetworkId, Nullable,
    PlutusData, PlutusScript, PositiveCoin, ProposalProcedure, RewardAccount, ScriptRef, Set,
    TransactionInput, Value, VKeyWitness, VotingProcedures,
};

pub type Withdrawals = BTreeMap<RewardAccount, Coin>;

pub type RequiredSigners = Set<AddrKeyhash>;

/// An output datum: either the hash of the data or the data itself carried
/// inline (tag 24 wrapped, with the original bytes cached for hashing).
///
/// datum_option = [ 0, $hash32 // 1, data ]
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum DatumOption {
    Hash(DatumHash),
    Data(Data),
}

pub type Data = vesta_codec::utils::CborWrap<KeepCbor<PlutusData>>;

impl Decode for DatumOption {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let datum = match d.u64()? {
            0 => DatumOption::Hash(Hash::decode(d)?),
            1 => DatumOption::Data(Data::decode(d)?),
            id => return Err(Error::unknown_variant("datum option", id)),
        };

        d.expect_end_array("datum option")?;

        Ok(datum)
    }
}

impl Encode for DatumOption {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;

        match self {
            DatumOption::Hash(hash) => {
                e.u8(0)?;
                hash.encode(e)?;
            }
            DatumOption::Data(data) => {
                e.u8(1)?;
                data.encode(e)?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct LegacyTransactionOutput {
    pub address: Bytes,
    pub amount: Value,
    pub datum_hash: Option<DatumHash>,
}

impl Decode for LegacyTransactionOutput {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let address = Bytes::decode(d)?;
        let amount = Value::decode(d)?;

        let datum_hash = if d.datatype()? != Type::EndArray {
            Some(Hash::decode(d)?)
        } else {
            None
        };

        d.expect_end_array("transaction output")?;

        Ok(LegacyTransactionOutput {
            address,
            amount,
            datum_hash,
        })
    }
}

impl Encode for LegacyTransactionOutput {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match &self.datum_hash {
            Some(hash) => {
                e.array(3)?;
                self.address.encode(e)?;
                self.amount.encode(e)?;
                hash.encode(e)?;
            }
            None => {
                e.array(2)?;
                self.address.encode(e)?;
                self.amount.encode(e)?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct PostAlonzoTransactionOutput {
    pub address: Bytes,
    pub value: Value,
    pub datum_option: Option<DatumOption>,
    pub script_ref: Option<ScriptRef>,
}

impl Decode for PostAlonzoTransactionOutput {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let mut address = None;
        let mut value = None;
        let mut datum_option = None;
        let mut script_ref = None;

        d.map()?;

        while d.datatype()? != Type::EndMap {
            match d.u64()? {
                0 => decode_entry(&mut address, d, "output address")?,
                1 => decode_entry(&mut value, d, "output value")?,
                2 => decode_entry(&mut datum_option, d, "output datum")?,
                3 => decode_entry(&mut script_ref, d, "output script ref")?,
                key => return Err(Error::unknown_variant("transaction output", key)),
            }
        }

        d.end_map()?;

        Ok(PostAlonzoTransactionOutput {
            address: address.ok_or(Error::message("transaction output without an address"))?,
            value: value.ok_or(Error::message("transaction output without a value"))?,
            datum_option,
            script_ref,
        })
    }
}

impl Encode for PostAlonzoTransactionOutput {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        let present = 2
            + usize::from(self.datum_option.is_some())
            + usize::from(self.script_ref.is_some());

        e.map(present as u64)?;

        e.u8(0)?;
        self.address.encode(e)?;

        e.u8(1)?;
        self.value.encode(e)?;

        if let Some(datum) = &self.datum_option {
            e.u8(2)?;
            datum.encode(e)?;
        }

        if let Some(script_ref) = &self.script_ref {
            e.u8(3)?;
            script_ref.encode(e)?;
        }

        Ok(())
    }
}

/// Both output shapes that coexist on-chain. Decoding keeps whichever form
/// the bytes used; [`TransactionOutput::new`] picks the smallest form that
/// can carry the requested fields, which makes a legacy output holding an
/// inline datum or a script reference unrepresentable on write.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum TransactionOutput {
    Legacy(LegacyTransactionOutput),
    PostAlonzo(PostAlonzoTransactionOutput),
}

impl TransactionOutput {
    pub fn new(
        address: Bytes,
        value: Value,
        datum: Option<DatumOption>,
        script_ref: Option<ScriptRef>,
    ) -> Self {
        match (datum, script_ref) {
            (None, None) => TransactionOutput::Legacy(LegacyTransactionOutput {
                address,
                amount: value,
                datum_hash: None,
            }),
            (Some(DatumOption::Hash(hash)), None) => {
                TransactionOutput::Legacy(LegacyTransactionOutput {
                    address,
                    amount: value,
                    datum_hash: Some(hash),
                })
            }
            (datum, script_ref) => TransactionOutput::PostAlonzo(PostAlonzoTransactionOutput {
                address,
                value,
                datum_option: datum,
                script_ref,
            }),
        }
    }

    pub fn address(&self) -> &Bytes {
        match self {
            TransactionOutput::Legacy(output) => &output.address,
            TransactionOutput::PostAlonzo(output) => &output.address,
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            TransactionOutput::Legacy(output) => &output.amount,
            TransactionOutput::PostAlonzo(output) => &output.value,
        }
    }

    pub fn datum(&self) -> Option<DatumOption> {
        match self {
            TransactionOutput::Legacy(output) => output.datum_hash.map(DatumOption::Hash),
            TransactionOutput::PostAlonzo(output) => output.datum_option.clone(),
        }
    }

    pub fn script_ref(&self) -> Option<&ScriptRef> {
        match self {
            TransactionOutput::Legacy(_) => None,
            TransactionOutput::PostAlonzo(output) => output.script_ref.as_ref(),
        }
    }
}

impl Decode for TransactionOutput {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        match d.datatype()? {
            Type::Array | Type::ArrayIndef => {
                Ok(TransactionOutput::Legacy(LegacyTransactionOutput::decode(
                    d,
                )?))
            }
            Type::Map | Type::MapIndef => Ok(TransactionOutput::PostAlonzo(
                PostAlonzoTransactionOutput::decode(d)?,
            )),
            found => Err(Error::TypeMismatch {
                expected: "transaction output",
                found,
                pos: d.position(),
            }),
        }
    }
}

impl Encode for TransactionOutput {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            TransactionOutput::Legacy(output) => output.encode(e),
            TransactionOutput::PostAlonzo(output) => output.encode(e),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum RedeemerTag {
    Spend,
    Mint,
    Cert,
    Reward,
    Vote,
    Propose,
}

impl Decode for RedeemerTag {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        match d.u64()? {
            0 => Ok(RedeemerTag::Spend),
            1 => Ok(RedeemerTag::Mint),
            2 => Ok(RedeemerTag::Cert),
            3 => Ok(RedeemerTag::Reward),
            4 => Ok(RedeemerTag::Vote),
            5 => Ok(RedeemerTag::Propose),
            id => Err(Error::unknown_variant("redeemer tag", id)),
        }
    }
}

impl Encode for RedeemerTag {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        let id = match self {
            RedeemerTag::Spend => 0,
            RedeemerTag::Mint => 1,
            RedeemerTag::Cert => 2,
            RedeemerTag::Reward => 3,
            RedeemerTag::Vote => 4,
            RedeemerTag::Propose => 5,
        };

        e.u8(id)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Redeemer {
    pub tag: RedeemerTag,
    pub index: u64,
    pub data: PlutusData,
    pub ex_units: ExUnits,
}

impl Decode for Redeemer {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let redeemer = Redeemer {
            tag: RedeemerTag::decode(d)?,
            index: d.u64()?,
            data: PlutusData::decode(d)?,
            ex_units: ExUnits::decode(d)?,
        };

        d.expect_end_array("redeemer")?;

        Ok(redeemer)
    }
}

impl Encode for Redeemer {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(4)?;
        self.tag.encode(e)?;
        e.u64(self.index)?;
        self.data.encode(e)?;
        self.ex_units.encode(e)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct RedeemersKey {
    pub tag: RedeemerTag,
    pub index: u64,
}

impl Decode for RedeemersKey {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let tag = RedeemerTag::decode(d)?;
        let index = d.u64()?;
        d.expect_end_array("redeemers key")?;

        Ok(RedeemersKey { tag, index })
    }
}

impl Encode for RedeemersKey {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;
        self.tag.encode(e)?;
        e.u64(self.index)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct RedeemersValue {
    pub data: PlutusData,
    pub ex_units: ExUnits,
}

impl Decode for RedeemersValue {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let data = PlutusData::decode(d)?;
        let ex_units = ExUnits::decode(d)?;
        d.expect_end_array("redeemers value")?;

        Ok(RedeemersValue { data, ex_units })
    }
}

impl Encode for RedeemersValue {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;
        self.data.encode(e)?;
        self.ex_units.encode(e)?;

        Ok(())
    }
}

/// Redeemers kept both their historical list form and the map form that
/// replaced it; each re-encodes as itself.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum Redeemers {
    List(Vec<Redeemer>),
    Map(KeyValuePairs<RedeemersKey, RedeemersValue>),
}

impl Redeemers {
    pub fn len(&self) -> usize {
        match self {
            Redeemers::List(redeemers) => redeemers.len(),
            Redeemers::Map(redeemers) => redeemers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrites the execution units of the redeemer addressed by
    /// `(tag, index)`. Returns whether such a redeemer exists.
    pub fn set_ex_units(&mut self, tag: RedeemerTag, index: u64, ex_units: ExUnits) -> bool {
        match self {
            Redeemers::List(redeemers) => {
                for redeemer in redeemers.iter_mut() {
                    if redeemer.tag == tag && redeemer.index == index {
                        redeemer.ex_units = ex_units;
                        return true;
                    }
                }

                false
            }
            Redeemers::Map(redeemers) => {
                let entries = match redeemers {
                    KeyValuePairs::Def(entries) => entries,
                    KeyValuePairs::Indef(entries) => entries,
                };

                let mut found = false;

                for (key, value) in entries.iter_mut() {
                    if key.tag == tag && key.index == index {
                        value.ex_units = ex_units;
                        found = true;
                    }
                }

                found
            }
        }
    }
}

impl Decode for Redeemers {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        match d.datatype()? {
            Type::Array | Type::ArrayIndef => Ok(Redeemers::List(Vec::decode(d)?)),
            Type::Map | Type::MapIndef => Ok(Redeemers::Map(KeyValuePairs::decode(d)?)),
            found => Err(Error::TypeMismatch {
                expected: "redeemers",
                found,
                pos: d.position(),
            }),
        }
    }
}

impl Encode for Redeemers {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            Redeemers::List(redeemers) => redeemers.encode(e),
            Redeemers::Map(redeemers) => redeemers.encode(e),
        }
    }
}

/// transaction witness set, an integer-keyed map with fields 0..=7.
///
/// Every set-valued field remembers whether its wire form carried the 258
/// set tag; the flag travels per field so re-encoding is byte-exact.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct WitnessSet {
    pub vkeywitness: Option<Set<VKeyWitness>>,
    pub native_script: Option<Set<KeepCbor<NativeScript>>>,
    pub bootstrap_witness: Option<Set<BootstrapWitness>>,
    pub plutus_v1_script: Option<Set<PlutusScript<1>>>,
    pub plutus_data: Option<KeepCbor<Set<KeepCbor<PlutusData>>>>,
    pub redeemer: Option<KeepCbor<Redeemers>>,
    pub plutus_v2_script: Option<Set<PlutusScript<2>>>,
    pub plutus_v3_script: Option<Set<PlutusScript<3>>>,
}

impl Decode for WitnessSet {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let mut witness_set = WitnessSet::default();

        d.map()?;

        while d.datatype()? != Type::EndMap {
            match d.u64()? {
                0 => decode_entry(&mut witness_set.vkeywitness, d, "vkey witnesses")?,
                1 => decode_entry(&mut witness_set.native_script, d, "native scripts")?,
                2 => decode_entry(&mut witness_set.bootstrap_witness, d, "bootstrap witnesses")?,
                3 => decode_entry(&mut witness_set.plutus_v1_script, d, "plutus v1 scripts")?,
                4 => decode_entry(&mut witness_set.plutus_data, d, "plutus data")?,
                5 => decode_entry(&mut witness_set.redeemer, d, "redeemers")?,
                6 => decode_entry(&mut witness_set.plutus_v2_script, d, "plutus v2 scripts")?,
                7 => decode_entry(&mut witness_set.plutus_v3_script, d, "plutus v3 scripts")?,
                key => return Err(Error::unknown_variant("witness set", key)),
            }
        }

        d.end_map()?;

        Ok(witness_set)
    }
}

impl Encode for WitnessSet {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        let present = [
            self.vkeywitness.is_some(),
            self.native_script.is_some(),
            self.bootstrap_witness.is_some(),
            self.plutus_v1_script.is_some(),
            self.plutus_data.is_some(),
            self.redeemer.is_some(),
            self.plutus_v2_script.is_some(),
            self.plutus_v3_script.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count();

        e.map(present as u64)?;

        if let Some(witnesses) = &self.vkeywitness {
            e.u8(0)?;
            witnesses.encode(e)?;
        }

        if let Some(scripts) = &self.native_script {
            e.u8(1)?;
            scripts.encode(e)?;
        }

        if let Some(witnesses) = &self.bootstrap_witness {
            e.u8(2)?;
            witnesses.encode(e)?;
        }

        if let Some(scripts) = &self.plutus_v1_script {
            e.u8(3)?;
            scripts.encode(e)?;
        }

        if let Some(data) = &self.plutus_data {
            e.u8(4)?;
            data.encode(e)?;
        }

        if let Some(redeemers) = &self.redeemer {
            e.u8(5)?;
            redeemers.encode(e)?;
        }

        if let Some(scripts) = &self.plutus_v2_script {
            e.u8(6)?;
            scripts.encode(e)?;
        }

        if let Some(scripts) = &self.plutus_v3_script {
            e.u8(7)?;
            scripts.encode(e)?;
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct TransactionBody {
    pub inputs: Set<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub fee: Coin,
    pub ttl: Option<u64>,
    pub certificates: Option<Set<Certificate>>,
    pub withdrawals: Option<Withdrawals>,
    pub auxiliary_data_hash: Option<Hash<32>>,
    pub validity_interval_start: Option<u64>,
    pub mint: Option<Mint>,
    pub script_data_hash: Option<Hash<32>>,
    pub collateral: Option<Set<TransactionInput>>,
    pub required_signers: Option<RequiredSigners>,
    pub network_id: Option<NetworkId>,
    pub collateral_return: Option<TransactionOutput>,
    pub total_collateral: Option<Coin>,
    pub reference_inputs: Option<Set<TransactionInput>>,
    pub voting_procedures: Option<VotingProcedures>,
    pub proposal_procedures: Option<Set<ProposalProcedure>>,
    pub treasury_value: Option<Coin>,
    pub donation: Option<PositiveCoin>,
}

impl TransactionBody {
    pub fn new(inputs: Set<TransactionInput>, outputs: Vec<TransactionOutput>, fee: Coin) -> Self {
        TransactionBody {
            inputs,
            outputs,
            fee,
            ttl: None,
            certificates: None,
            withdrawals: None,
            auxiliary_data_hash: None,
            validity_interval_start: None,
            mint: None,
            script_data_hash: None,
            collateral: None,
            required_signers: None,
            network_id: None,
            collateral_return: None,
            total_collateral: None,
            reference_inputs: None,
            voting_procedures: None,
            proposal_procedures: None,
            treasury_value: None,
            donation: None,
        }
    }
}

impl Decode for TransactionBody {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let mut inputs = None;
        let mut outputs = None;
        let mut fee = None;
        let mut ttl = None;
        let mut certificates = None;
        let mut withdrawals = None;
        let mut auxiliary_data_hash = None;
        let mut validity_interval_start = None;
        let mut mint = None;
        let mut script_data_hash = None;
        let mut collateral = None;
        let mut required_signers = None;
        let mut network_id = None;
        let mut collateral_return = None;
        let mut total_collateral = None;
        let mut reference_inputs = None;
        let mut voting_procedures = None;
        let mut proposal_procedures = None;
        let mut treasury_value = None;
        let mut donation = None;

        d.map()?;

        while d.datatype()? != Type::EndMap {
            match d.u64()? {
                0 => decode_entry(&mut inputs, d, "inputs")?,
                1 => decode_entry(&mut outputs, d, "outputs")?,
                2 => decode_entry(&mut fee, d, "fee")?,
                3 => decode_entry(&mut ttl, d, "ttl")?,
                4 => decode_entry(&mut certificates, d, "certificates")?,
                5 => decode_entry(&mut withdrawals, d, "withdrawals")?,
                7 => decode_entry(&mut auxiliary_data_hash, d, "auxiliary data hash")?,
                8 => decode_entry(&mut validity_interval_start, d, "validity interval start")?,
                9 => decode_entry(&mut mint, d, "mint")?,
                11 => decode_entry(&mut script_data_hash, d, "script data hash")?,
                13 => decode_entry(&mut collateral, d, "collateral")?,
                14 => decode_entry(&mut required_signers, d, "required signers")?,
                15 => decode_entry(&mut network_id, d, "network id")?,
                16 => decode_entry(&mut collateral_return, d, "collateral return")?,
                17 => decode_entry(&mut total_collateral, d, "total collateral")?,
                18 => decode_entry(&mut reference_inputs, d, "reference inputs")?,
                19 => decode_entry(&mut voting_procedures, d, "voting procedures")?,
                20 => decode_entry(&mut proposal_procedures, d, "proposal procedures")?,
                21 => decode_entry(&mut treasury_value, d, "treasury value")?,
                22 => decode_entry(&mut donation, d, "donation")?,
                key => return Err(Error::unknown_variant("transaction body", key)),
            }
        }

        d.end_map()?;

        Ok(TransactionBody {
            inputs: inputs.ok_or(Error::message("transaction body without inputs"))?,
            outputs: outputs.ok_or(Error::message("transaction body without outputs"))?,
            fee: fee.ok_or(Error::message("transaction body without a fee"))?,
            ttl,
            certificates,
            withdrawals,
            auxiliary_data_hash,
            validity_interval_start,
            mint,
            script_data_hash,
            collateral,
            required_signers,
            network_id,
            collateral_return,
            total_collateral,
            reference_inputs,
            voting_procedures,
            proposal_procedures,
            treasury_value,
            donation,
        })
    }
}

impl Encode for TransactionBody {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        let present = 3
            + [
                self.ttl.is_some(),
                self.certificates.is_some(),
                self.withdrawals.is_some(),
                self.auxiliary_data_hash.is_some(),
                self.validity_interval_start.is_some(),
                self.mint.is_some(),
                self.script_data_hash.is_some(),
                self.collateral.is_some(),
                self.required_signers.is_some(),
                self.network_id.is_some(),
                self.collateral_return.is_some(),
                self.total_collateral.is_some(),
                self.reference_inputs.is_some(),
                self.voting_procedures.is_some(),
                self.proposal_procedures.is_some(),
                self.treasury_value.is_some(),
                self.donation.is_some(),
            ]
            .iter()
            .filter(|p| **p)
            .count();

        e.map(present as u64)?;

        e.u8(0)?;
        self.inputs.encode(e)?;

        e.u8(1)?;
        self.outputs.encode(e)?;

        e.u8(2)?;
        e.u64(self.fee)?;

        encode_body_entry(e, 3, &self.ttl)?;
        encode_body_entry(e, 4, &self.certificates)?;
        encode_body_entry(e, 5, &self.withdrawals)?;
        encode_body_entry(e, 7, &self.auxiliary_data_hash)?;
        encode_body_entry(e, 8, &self.validity_interval_start)?;
        encode_body_entry(e, 9, &self.mint)?;
        encode_body_entry(e, 11, &self.script_data_hash)?;
        encode_body_entry(e, 13, &self.collateral)?;
        encode_body_entry(e, 14, &self.required_signers)?;
        encode_body_entry(e, 15, &self.network_id)?;
        encode_body_entry(e, 16, &self.collateral_return)?;
        encode_body_entry(e, 17, &self.total_collateral)?;
        encode_body_entry(e, 18, &self.reference_inputs)?;
        encode_body_entry(e, 19, &self.voting_procedures)?;
        encode_body_entry(e, 20, &self.proposal_procedures)?;
        encode_body_entry(e, 21, &self.treasury_value)?;
        encode_body_entry(e, 22, &self.donation)?;

        Ok(())
    }
}

fn encode_body_entry<T: Encode>(e: &mut Encoder, key: u64, value: &Option<T>) -> Result<(), Error> {
    if let Some(value) = value {
        e.u64(key)?;
        value.encode(e)?;
    }

    Ok(())
}

/// A full transaction: body, witnesses, the validity flag and auxiliary
/// data. The hashable parts keep their original bytes so that the computed
/// transaction id matches what exists on-chain.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Tx {
    pub transaction_body: KeepCbor<TransactionBody>,
    pub transaction_witness_set: KeepCbor<WitnessSet>,
    pub success: bool,
    pub auxiliary_data: Nullable<KeepCbor<AuxiliaryData>>,
}

impl Decode for Tx {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let tx = Tx {
            transaction_body: KeepCbor::decode(d)?,
            transaction_witness_set: KeepCbor::decode(d)?,
            success: d.bool()?,
            auxiliary_data: Nullable::decode(d)?,
        };

        d.expect_end_array("transaction")?;

        Ok(tx)
    }
}

impl Encode for Tx {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(4)?;
        self.transaction_body.encode(e)?;
        self.transaction_witness_set.encode(e)?;
        e.bool(self.success)?;
        self.auxiliary_data.encode(e)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_codec::{from_hex, from_slice, to_hex, to_vec};

    fn input(fill: u8, index: u64) -> TransactionInput {
        TransactionInput {
            transaction_id: Hash::new([fill; 32]),
            index,
        }
    }

    #[test]
    fn minimal_body_round_trips() {
        let body = TransactionBody::new(
            vec![input(1, 0)].into(),
            vec![TransactionOutput::new(
                vec![0x61; 29].into(),
                Value::Coin(5000000),
                None,
                None,
            )],
            170000,
        );

        let bytes = to_vec(&body).unwrap();
        let back: TransactionBody = from_slice(&bytes).unwrap();

        assert_eq!(back, body);
    }

    #[test]
    fn output_writer_picks_the_minimal_form() {
        let plain = TransactionOutput::new(vec![0x61; 29].into(), Value::Coin(1), None, None);
        assert!(matches!(plain, TransactionOutput::Legacy(_)));

        let hashed = TransactionOutput::new(
            vec![0x61; 29].into(),
            Value::Coin(1),
            Some(DatumOption::Hash(Hash::new([0; 32]))),
            None,
        );
        assert!(matches!(hashed, TransactionOutput::Legacy(_)));

        let inline = TransactionOutput::new(
            vec![0x61; 29].into(),
            Value::Coin(1),
            Some(DatumOption::Data(vesta_codec::utils::CborWrap(
                KeepCbor::from(PlutusData::Array(vec![])),
            ))),
            None,
        );
        assert!(matches!(inline, TransactionOutput::PostAlonzo(_)));
    }

    #[test]
    fn witness_set_preserves_the_set_tag_per_field() {
        // {0: 258([[h'aa', h'bb']]), 1: [[5, 100]]}
        let payload = "a2 00 d90102 81 82 41aa 41bb 01 81 82 05 1864".replace(' ', "");

        let witness_set: WitnessSet = from_hex(&payload).unwrap();

        assert!(witness_set.vkeywitness.as_ref().unwrap().uses_tag());
        assert!(!witness_set.native_script.as_ref().unwrap().uses_tag());
        assert_eq!(to_hex(&witness_set).unwrap(), payload);
    }

    #[test]
    fn redeemers_ex_units_can_be_replaced() {
        let mut redeemers = Redeemers::List(vec![Redeemer {
            tag: RedeemerTag::Spend,
            index: 0,
            data: PlutusData::Array(vec![]),
            ex_units: ExUnits { mem: 0, steps: 0 },
        }]);

        assert!(redeemers.set_ex_units(
            RedeemerTag::Spend,
            0,
            ExUnits {
                mem: 2000,
                steps: 500000
            }
        ));

        assert!(!redeemers.set_ex_units(
            RedeemerTag::Mint,
            7,
            ExUnits { mem: 1, steps: 1 }
        ));
    }

    #[test]
    fn duplicate_body_keys_are_rejected() {
        // {2: 1, 2: 2}
        let result: Result<TransactionBody, _> = from_hex("a2020102021864");
        assert!(matches!(result, Err(Error::DuplicateKey { .. })));
    }

    #[test]
    fn unknown_body_keys_are_rejected() {
        let result: Result<TransactionBody, _> = from_hex("a1186401");
        assert!(matches!(result, Err(Error::UnknownVariant { .. })));
    }
}
