use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vesta_codec::{Decode, Decoder, Encode, Encoder, Error, Type};

use crate::{
    decode_entry, AddrKeyhash, Anchor, Coin, CommitteeColdCredential, CostModel, Epoch, ExUnits,
    ExUnitPrices, Hash, ProtocolVersion, RewardAccount, ScriptHash, Set, TransactionId,
    UnitInterval,
};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Vote {
    No,
    Yes,
    Abstain,
}

impl Decode for Vote {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        match d.u64()? {
            0 => Ok(Vote::No),
            1 => Ok(Vote::Yes),
            2 => Ok(Vote::Abstain),
            id => Err(Error::unknown_variant("vote", id)),
        }
    }
}

impl Encode for Vote {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            Vote::No => e.u8(0)?,
            Vote::Yes => e.u8(1)?,
            Vote::Abstain => e.u8(2)?,
        };

        Ok(())
    }
}

// The declaration order is deliberate: script voters sort before key voters
// of the same role in the reference ledger, while the wire ids pair them the
// other way around.
#[derive(Serialize, Deserialize, Debug, PartialEq, PartialOrd, Eq, Ord, Clone)]
pub enum Voter {
    ConstitutionalCommitteeScript(ScriptHash),
    ConstitutionalCommitteeKey(AddrKeyhash),
    DRepScript(ScriptHash),
    DRepKey(AddrKeyhash),
    StakePoolKey(AddrKeyhash),
}

impl Decode for Voter {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let voter = match d.u64()? {
            0 => Voter::ConstitutionalCommitteeKey(Hash::decode(d)?),
            1 => Voter::ConstitutionalCommitteeScript(Hash::decode(d)?),
            2 => Voter::DRepKey(Hash::decode(d)?),
            3 => Voter::DRepScript(Hash::decode(d)?),
            4 => Voter::StakePoolKey(Hash::decode(d)?),
            id => return Err(Error::unknown_variant("voter", id)),
        };

        d.expect_end_array("voter")?;

        Ok(voter)
    }
}

impl Encode for Voter {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;

        match self {
            Voter::ConstitutionalCommitteeKey(hash) => {
                e.u8(0)?;
                hash.encode(e)?;
            }
            Voter::ConstitutionalCommitteeScript(hash) => {
                e.u8(1)?;
                hash.encode(e)?;
            }
            Voter::DRepKey(hash) => {
                e.u8(2)?;
                hash.encode(e)?;
            }
            Voter::DRepScript(hash) => {
                e.u8(3)?;
                hash.encode(e)?;
            }
            Voter::StakePoolKey(hash) => {
                e.u8(4)?;
                hash.encode(e)?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct GovActionId {
    pub transaction_id: TransactionId,
    pub action_index: u32,
}

impl Decode for GovActionId {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let transaction_id = Hash::decode(d)?;
        let action_index = d.u32()?;
        d.expect_end_array("governance action id")?;

        Ok(GovActionId {
            transaction_id,
            action_index,
        })
    }
}

impl Encode for GovActionId {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;
        self.transaction_id.encode(e)?;
        e.u32(self.action_index)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct VotingProcedure {
    pub vote: Vote,
    pub anchor: Option<Anchor>,
}

impl Decode for VotingProcedure {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let vote = Vote::decode(d)?;
        let anchor = Option::decode(d)?;
        d.expect_end_array("voting procedure")?;

        Ok(VotingProcedure { vote, anchor })
    }
}

impl Encode for VotingProcedure {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;
        self.vote.encode(e)?;
        self.anchor.encode(e)?;

        Ok(())
    }
}

pub type VotingProcedures = BTreeMap<Voter, BTreeMap<GovActionId, VotingProcedure>>;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ProposalProcedure {
    pub deposit: Coin,
    pub reward_account: RewardAccount,
    pub gov_action: GovAction,
    pub anchor: Anchor,
}

impl Decode for ProposalProcedure {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let deposit = d.u64()?;
        let reward_account = RewardAccount::decode(d)?;
        let gov_action = GovAction::decode(d)?;
        let anchor = Anchor::decode(d)?;
        d.expect_end_array("proposal procedure")?;

        Ok(ProposalProcedure {
            deposit,
            reward_account,
            gov_action,
            anchor,
        })
    }
}

impl Encode for ProposalProcedure {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(4)?;
        e.u64(self.deposit)?;
        self.reward_account.encode(e)?;
        self.gov_action.encode(e)?;
        self.anchor.encode(e)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum GovAction {
    ParameterChange(
        Option<GovActionId>,
        Box<ProtocolParamUpdate>,
        Option<ScriptHash>,
    ),
    HardForkInitiation(Option<GovActionId>, ProtocolVersion),
    TreasuryWithdrawals(BTreeMap<RewardAccount, Coin>, Option<ScriptHash>),
    NoConfidence(Option<GovActionId>),
    UpdateCommittee(
        Option<GovActionId>,
        Set<CommitteeColdCredential>,
        BTreeMap<CommitteeColdCredential, Epoch>,
        UnitInterval,
    ),
    NewConstitution(Option<GovActionId>, Constitution),
    Information,
}

impl Decode for GovAction {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let action = match d.u64()? {
            0 => GovAction::ParameterChange(
                Option::decode(d)?,
                Box::decode(d)?,
                Option::decode(d)?,
            ),
            1 => GovAction::HardForkInitiation(Option::decode(d)?, ProtocolVersion::decode(d)?),
            2 => GovAction::TreasuryWithdrawals(BTreeMap::decode(d)?, Option::decode(d)?),
            3 => GovAction::NoConfidence(Option::decode(d)?),
            4 => GovAction::UpdateCommittee(
                Option::decode(d)?,
                Set::decode(d)?,
                BTreeMap::decode(d)?,
                UnitInterval::decode(d)?,
            ),
            5 => GovAction::NewConstitution(Option::decode(d)?, Constitution::decode(d)?),
            6 => GovAction::Information,
            id => return Err(Error::unknown_variant("governance action", id)),
        };

        d.expect_end_array("governance action")?;

        Ok(action)
    }
}

impl Encode for GovAction {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            GovAction::ParameterChange(previous, update, guardrail) => {
                e.array(4)?;
                e.u8(0)?;
                previous.encode(e)?;
                update.encode(e)?;
                guardrail.encode(e)?;
            }
            GovAction::HardForkInitiation(previous, version) => {
                e.array(3)?;
                e.u8(1)?;
                previous.encode(e)?;
                version.encode(e)?;
            }
            GovAction::TreasuryWithdrawals(withdrawals, guardrail) => {
                e.array(3)?;
                e.u8(2)?;
                withdrawals.encode(e)?;
                guardrail.encode(e)?;
            }
            GovAction::NoConfidence(previous) => {
                e.array(2)?;
                e.u8(3)?;
                previous.encode(e)?;
            }
            GovAction::UpdateCommittee(previous, removed, added, threshold) => {
                e.array(5)?;
                e.u8(4)?;
                previous.encode(e)?;
                removed.encode(e)?;
                added.encode(e)?;
                threshold.encode(e)?;
            }
            GovAction::NewConstitution(previous, constitution) => {
                e.array(3)?;
                e.u8(5)?;
                previous.encode(e)?;
                constitution.encode(e)?;
            }
            GovAction::Information => {
                e.array(1)?;
                e.u8(6)?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Constitution {
    pub anchor: Anchor,
    pub guardrail_script: Option<ScriptHash>,
}

impl Decode for Constitution {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let anchor = Anchor::decode(d)?;
        let guardrail_script = Option::decode(d)?;
        d.expect_end_array("constitution")?;

        Ok(Constitution {
            anchor,
            guardrail_script,
        })
    }
}

impl Encode for Constitution {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;
        self.anchor.encode(e)?;
        self.guardrail_script.encode(e)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct CostModels {
    pub plutus_v1: Option<CostModel>,
    pub plutus_v2: Option<CostModel>,
    pub plutus_v3: Option<CostModel>,
    pub unknown: BTreeMap<u64, CostModel>,
}

impl Decode for CostModels {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let models: BTreeMap<u64, CostModel> = BTreeMap::decode(d)?;

        let mut plutus_v1 = None;
        let mut plutus_v2 = None;
        let mut plutus_v3 = None;
        let mut unknown = BTreeMap::new();

        for (k, v) in models {
            match k {
                0 => plutus_v1 = Some(v),
                1 => plutus_v2 = Some(v),
                2 => plutus_v3 = Some(v),
                _ => {
                    unknown.insert(k, v);
                }
            }
        }

        Ok(CostModels {
            plutus_v1,
            plutus_v2,
            plutus_v3,
            unknown,
        })
    }
}

impl Encode for CostModels {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        let known = [&self.plutus_v1, &self.plutus_v2, &self.plutus_v3]
            .iter()
            .filter(|model| model.is_some())
            .count();

        e.map((known + self.unknown.len()) as u64)?;

        if let Some(model) = &self.plutus_v1 {
            e.u8(0)?;
            model.encode(e)?;
        }

        if let Some(model) = &self.plutus_v2 {
            e.u8(1)?;
            model.encode(e)?;
        }

        if let Some(model) = &self.plutus_v3 {
            e.u8(2)?;
            model.encode(e)?;
        }

        for (k, v) in &self.unknown {
            e.u64(*k)?;
            v.encode(e)?;
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct PoolVotingThresholds {
    pub motion_no_confidence: UnitInterval,
    pub committee_normal: UnitInterval,
    pub committee_no_confidence: UnitInterval,
    pub hard_fork_initiation: UnitInterval,
    pub security_voting_threshold: UnitInterval,
}

impl Decode for PoolVotingThresholds {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let thresholds = PoolVotingThresholds {
            motion_no_confidence: UnitInterval::decode(d)?,
            committee_normal: UnitInterval::decode(d)?,
            committee_no_confidence: UnitInterval::decode(d)?,
            hard_fork_initiation: UnitInterval::decode(d)?,
            security_voting_threshold: UnitInterval::decode(d)?,
        };

        d.expect_end_array("pool voting thresholds")?;

        Ok(thresholds)
    }
}

impl Encode for PoolVotingThresholds {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(5)?;
        self.motion_no_confidence.encode(e)?;
        self.committee_normal.encode(e)?;
        self.committee_no_confidence.encode(e)?;
        self.hard_fork_initiation.encode(e)?;
        self.security_voting_threshold.encode(e)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct DRepVotingThresholds {
    pub motion_no_confidence: UnitInterval,
    pub committee_normal: UnitInterval,
    pub committee_no_confidence: UnitInterval,
    pub update_constitution: UnitInterval,
    pub hard_fork_initiation: UnitInterval,
    pub pp_network_group: UnitInterval,
    pub pp_economic_group: UnitInterval,
    pub pp_technical_group: UnitInterval,
    pub pp_governance_group: UnitInterval,
    pub treasury_withdrawal: UnitInterval,
}

impl Decode for DRepVotingThresholds {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let thresholds = DRepVotingThresholds {
            motion_no_confidence: UnitInterval::decode(d)?,
            committee_normal: UnitInterval::decode(d)?,
            committee_no_confidence: UnitInterval::decode(d)?,
            update_constitution: UnitInterval::decode(d)?,
            hard_fork_initiation: UnitInterval::decode(d)?,
            pp_network_group: UnitInterval::decode(d)?,
            pp_economic_group: UnitInterval::decode(d)?,
            pp_technical_group: UnitInterval::decode(d)?,
            pp_governance_group: UnitInterval::decode(d)?,
            treasury_withdrawal: UnitInterval::decode(d)?,
        };

        d.expect_end_array("drep voting thresholds")?;

        Ok(thresholds)
    }
}

impl Encode for DRepVotingThresholds {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(10)?;
        self.motion_no_confidence.encode(e)?;
        self.committee_normal.encode(e)?;
        self.committee_no_confidence.encode(e)?;
        self.update_constitution.encode(e)?;
        self.hard_fork_initiation.encode(e)?;
        self.pp_network_group.encode(e)?;
        self.pp_economic_group.encode(e)?;
        self.pp_technical_group.encode(e)?;
        self.pp_governance_group.encode(e)?;
        self.treasury_withdrawal.encode(e)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct ProtocolParamUpdate {
    pub minfee_a: Option<u64>,
    pub minfee_b: Option<u64>,
    pub max_block_body_size: Option<u64>,
    pub max_transaction_size: Option<u64>,
    pub max_block_header_size: Option<u64>,
    pub key_deposit: Option<Coin>,
    pub pool_deposit: Option<Coin>,
    pub maximum_epoch: Option<Epoch>,
    pub desired_number_of_stake_pools: Option<u64>,
    pub pool_pledge_influence: Option<UnitInterval>,
    pub expansion_rate: Option<UnitInterval>,
    pub treasury_growth_rate: Option<UnitInterval>,
    pub min_pool_cost: Option<Coin>,
    pub ada_per_utxo_byte: Option<Coin>,
    pub cost_models_for_script_languages: Option<CostModels>,
    pub execution_costs: Option<ExUnitPrices>,
    pub max_tx_ex_units: Option<ExUnits>,
    pub max_block_ex_units: Option<ExUnits>,
    pub max_value_size: Option<u64>,
    pub collateral_percentage: Option<u64>,
    pub max_collateral_inputs: Option<u64>,
    pub pool_voting_thresholds: Option<PoolVotingThresholds>,
    pub drep_voting_thresholds: Option<DRepVotingThresholds>,
    pub min_committee_size: Option<u64>,
    pub committee_term_limit: Option<Epoch>,
    pub governance_action_validity_period: Option<Epoch>,
    pub governance_action_deposit: Option<Coin>,
    pub drep_deposit: Option<Coin>,
    pub drep_inactivity_period: Option<Epoch>,
    pub minfee_refscript_cost_per_byte: Option<UnitInterval>,
}

impl Decode for ProtocolParamUpdate {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let mut x = ProtocolParamUpdate::default();

        d.map()?;

        while d.datatype()? != Type::EndMap {
            match d.u64()? {
                0 => decode_entry(&mut x.minfee_a, d, "minfee a")?,
                1 => decode_entry(&mut x.minfee_b, d, "minfee b")?,
                2 => decode_entry(&mut x.max_block_body_size, d, "max block body size")?,
                3 => decode_entry(&mut x.max_transaction_size, d, "max transaction size")?,
                4 => decode_entry(&mut x.max_block_header_size, d, "max block header size")?,
                5 => decode_entry(&mut x.key_deposit, d, "key deposit")?,
                6 => decode_entry(&mut x.pool_deposit, d, "pool deposit")?,
                7 => decode_entry(&mut x.maximum_epoch, d, "maximum epoch")?,
                8 => decode_entry(
                    &mut x.desired_number_of_stake_pools,
                    d,
                    "desired number of stake pools",
                )?,
                9 => decode_entry(&mut x.pool_pledge_influence, d, "pool pledge influence")?,
                10 => decode_entry(&mut x.expansion_rate, d, "expansion rate")?,
                11 => decode_entry(&mut x.treasury_growth_rate, d, "treasury growth rate")?,
                16 => decode_entry(&mut x.min_pool_cost, d, "min pool cost")?,
                17 => decode_entry(&mut x.ada_per_utxo_byte, d, "ada per utxo byte")?,
                18 => decode_entry(
                    &mut x.cost_models_for_script_languages,
                    d,
                    "cost models for script languages",
                )?,
                19 => decode_entry(&mut x.execution_costs, d, "execution costs")?,
                20 => decode_entry(&mut x.max_tx_ex_units, d, "max tx ex units")?,
                21 => decode_entry(&mut x.max_block_ex_units, d, "max block ex units")?,
                22 => decode_entry(&mut x.max_value_size, d, "max value size")?,
                23 => decode_entry(&mut x.collateral_percentage, d, "collateral percentage")?,
                24 => decode_entry(&mut x.max_collateral_inputs, d, "max collateral inputs")?,
                25 => decode_entry(&mut x.pool_voting_thresholds, d, "pool voting thresholds")?,
                26 => decode_entry(&mut x.drep_voting_thresholds, d, "drep voting thresholds")?,
                27 => decode_entry(&mut x.min_committee_size, d, "min committee size")?,
                28 => decode_entry(&mut x.committee_term_limit, d, "committee term limit")?,
                29 => decode_entry(
                    &mut x.governance_action_validity_period,
                    d,
                    "governance action validity period",
                )?,
                30 => decode_entry(
                    &mut x.governance_action_deposit,
                    d,
                    "governance action deposit",
                )?,
                31 => decode_entry(&mut x.drep_deposit, d, "drep deposit")?,
                32 => decode_entry(&mut x.drep_inactivity_period, d, "drep inactivity period")?,
                33 => decode_entry(
                    &mut x.minfee_refscript_cost_per_byte,
                    d,
                    "minfee refscript cost per byte",
                )?,
                key => return Err(Error::unknown_variant("protocol param update", key)),
            }
        }

        d.end_map()?;

        Ok(x)
    }
}

impl Encode for ProtocolParamUpdate {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        let present = [
            self.minfee_a.is_some(),
            self.minfee_b.is_some(),
            self.max_block_body_size.is_some(),
            self.max_transaction_size.is_some(),
            self.max_block_header_size.is_some(),
            self.key_deposit.is_some(),
            self.pool_deposit.is_some(),
            self.maximum_epoch.is_some(),
            self.desired_number_of_stake_pools.is_some(),
            self.pool_pledge_influence.is_some(),
            self.expansion_rate.is_some(),
            self.treasury_growth_rate.is_some(),
            self.min_pool_cost.is_some(),
            self.ada_per_utxo_byte.is_some(),
            self.cost_models_for_script_languages.is_some(),
            self.execution_costs.is_some(),
            self.max_tx_ex_units.is_some(),
            self.max_block_ex_units.is_some(),
            self.max_value_size.is_some(),
            self.collateral_percentage.is_some(),
            self.max_collateral_inputs.is_some(),
            self.pool_voting_thresholds.is_some(),
            self.drep_voting_thresholds.is_some(),
            self.min_committee_size.is_some(),
            self.committee_term_limit.is_some(),
            self.governance_action_validity_period.is_some(),
            self.governance_action_deposit.is_some(),
            self.drep_deposit.is_some(),
            self.drep_inactivity_period.is_some(),
            self.minfee_refscript_cost_per_byte.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count();

        e.map(present as u64)?;

        encode_param(e, 0, &self.minfee_a)?;
        encode_param(e, 1, &self.minfee_b)?;
        encode_param(e, 2, &self.max_block_body_size)?;
        encode_param(e, 3, &self.max_transaction_size)?;
        encode_param(e, 4, &self.max_block_header_size)?;
        encode_param(e, 5, &self.key_deposit)?;
        encode_param(e, 6, &self.pool_deposit)?;
        encode_param(e, 7, &self.maximum_epoch)?;
        encode_param(e, 8, &self.desired_number_of_stake_pools)?;
        encode_param(e, 9, &self.pool_pledge_influence)?;
        encode_param(e, 10, &self.expansion_rate)?;
        encode_param(e, 11, &self.treasury_growth_rate)?;
        encode_param(e, 16, &self.min_pool_cost)?;
        encode_param(e, 17, &self.ada_per_utxo_byte)?;
        encode_param(e, 18, &self.cost_models_for_script_languages)?;
        encode_param(e, 19, &self.execution_costs)?;
        encode_param(e, 20, &self.max_tx_ex_units)?;
        encode_param(e, 21, &self.max_block_ex_units)?;
        encode_param(e, 22, &self.max_value_size)?;
        encode_param(e, 23, &self.collateral_percentage)?;
        encode_param(e, 24, &self.max_collateral_inputs)?;
        encode_param(e, 25, &self.pool_voting_thresholds)?;
        encode_param(e, 26, &self.drep_voting_thresholds)?;
        encode_param(e, 27, &self.min_committee_size)?;
        encode_param(e, 28, &self.committee_term_limit)?;
        encode_param(e, 29, &self.governance_action_validity_period)?;
        encode_param(e, 30, &self.governance_action_deposit)?;
        encode_param(e, 31, &self.drep_deposit)?;
        encode_param(e, 32, &self.drep_inactivity_period)?;
        encode_param(e, 33, &self.minfee_refscript_cost_per_byte)?;

        Ok(())
    }
}

fn encode_param<T: Encode>(e: &mut Encoder, key: u64, value: &Option<T>) -> Result<(), Error> {
    if let Some(value) = value {
        e.u64(key)?;
        value.encode(e)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;
    use test_case::test_case;
    use vesta_codec::{from_hex, from_slice, to_hex, to_vec};

    fn fake_hash(prefix: &str) -> Hash<28> {
        let null_hash: [u8; 28] = [0; 28];
        Hash::from(&[prefix.as_bytes(), &null_hash].concat()[0..28])
    }

    fn cc_script(prefix: &str) -> Voter {
        Voter::ConstitutionalCommitteeScript(fake_hash(prefix))
    }

    fn cc_key(prefix: &str) -> Voter {
        Voter::ConstitutionalCommitteeKey(fake_hash(prefix))
    }

    fn drep_script(prefix: &str) -> Voter {
        Voter::DRepScript(fake_hash(prefix))
    }

    fn drep_key(prefix: &str) -> Voter {
        Voter::DRepKey(fake_hash(prefix))
    }

    fn spo(prefix: &str) -> Voter {
        Voter::StakePoolKey(fake_hash(prefix))
    }

    #[test_case(cc_script("alice"), cc_script("alice") => Ordering::Equal)]
    #[test_case(cc_script("alice"), cc_key("alice") => Ordering::Less)]
    #[test_case(cc_script("alice"), drep_script("alice") => Ordering::Less)]
    #[test_case(cc_script("alice"), drep_key("alice") => Ordering::Less)]
    #[test_case(cc_script("alice"), spo("alice") => Ordering::Less)]
    #[test_case(cc_script("bob"), cc_script("alice") => Ordering::Greater)]
    #[test_case(drep_script("alice"), cc_script("alice") => Ordering::Greater)]
    #[test_case(drep_script("alice"), cc_key("alice") => Ordering::Greater)]
    #[test_case(drep_script("alice"), drep_script("alice") => Ordering::Equal)]
    #[test_case(drep_script("alice"), drep_key("alice") => Ordering::Less)]
    #[test_case(drep_script("alice"), spo("alice") => Ordering::Less)]
    #[test_case(drep_script("bob"), drep_script("alice") => Ordering::Greater)]
    fn voter_ordering(left: Voter, right: Voter) -> Ordering {
        left.cmp(&right)
    }

    #[test]
    fn voting_procedure_round_trip() {
        // [1, null]
        let procedure: VotingProcedure = from_hex("8201f6").unwrap();
        assert_eq!(procedure.vote, Vote::Yes);
        assert_eq!(procedure.anchor, None);
        assert_eq!(to_hex(&procedure).unwrap(), "8201f6");
    }

    #[test]
    fn information_action_is_a_singleton_array() {
        let action = GovAction::Information;
        assert_eq!(to_hex(&action).unwrap(), "8106");

        let back: GovAction = from_hex("8106").unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn param_update_encodes_present_fields_in_key_order() {
        let update = ProtocolParamUpdate {
            minfee_a: Some(44),
            max_value_size: Some(5000),
            drep_deposit: Some(500000000),
            ..Default::default()
        };

        let bytes = to_vec(&update).unwrap();
        assert_eq!(hex::encode(&bytes), "a300182c16191388181f1a1dcd6500");

        let back: ProtocolParamUpdate = from_slice(&bytes).unwrap();
        assert_eq!(back, update);
    }

    #[test]
    fn duplicate_param_keys_are_rejected() {
        let result: Result<ProtocolParamUpdate, _> = from_hex("a200182c00182d");
        assert!(matches!(result, Err(Error::DuplicateKey { .. })));
    }

    #[test]
    fn cost_models_keep_unknown_languages() {
        // {2: [1, 2], 9: [3]}
        let models: CostModels = from_hex("a202820102098103").unwrap();

        assert_eq!(models.plutus_v3, Some(vec![1, 2]));
        assert_eq!(models.unknown.get(&9), Some(&vec![3]));
        assert_eq!(to_hex(&models).unwrap(), "a202820102098103");
    }
}
