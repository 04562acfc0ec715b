use serde::{Deserialize, Serialize};

use vesta_codec::{Decode, Decoder, Encode, Encoder, Error};

use crate::{
    AddrKeyhash, Coin, CommitteeColdCredential, CommitteeHotCredential, DRepCredential, Epoch,
    Hash, PoolKeyhash, PoolMetadata, Relay, RewardAccount, ScriptHash, Set, StakeCredential,
    UnitInterval, VrfKeyhash,
};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum Certificate {
    StakeRegistration(StakeCredential),
    StakeDeregistration(StakeCredential),
    StakeDelegation(StakeCredential, PoolKeyhash),
    PoolRegistration {
        operator: PoolKeyhash,
        vrf_keyhash: VrfKeyhash,
        pledge: Coin,
        cost: Coin,
        margin: UnitInterval,
        reward_account: RewardAccount,
        pool_owners: Set<AddrKeyhash>,
        relays: Vec<Relay>,
        pool_metadata: Option<PoolMetadata>,
    },
    PoolRetirement(PoolKeyhash, Epoch),

    Reg(StakeCredential, Coin),
    UnReg(StakeCredential, Coin),
    VoteDeleg(StakeCredential, DRep),
    StakeVoteDeleg(StakeCredential, PoolKeyhash, DRep),
    StakeRegDeleg(StakeCredential, PoolKeyhash, Coin),
    VoteRegDeleg(StakeCredential, DRep, Coin),
    StakeVoteRegDeleg(StakeCredential, PoolKeyhash, DRep, Coin),

    AuthCommitteeHot(CommitteeColdCredential, CommitteeHotCredential),
    ResignCommitteeCold(CommitteeColdCredential, Option<Anchor>),
    RegDRepCert(DRepCredential, Coin, Option<Anchor>),
    UnRegDRepCert(DRepCredential, Coin),
    UpdateDRepCert(DRepCredential, Option<Anchor>),
}

impl Decode for Certificate {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let certificate = match d.u64()? {
            0 => Certificate::StakeRegistration(StakeCredential::decode(d)?),
            1 => Certificate::StakeDeregistration(StakeCredential::decode(d)?),
            2 => Certificate::StakeDelegation(StakeCredential::decode(d)?, Hash::decode(d)?),
            3 => Certificate::PoolRegistration {
                operator: Hash::decode(d)?,
                vrf_keyhash: Hash::decode(d)?,
                pledge: d.u64()?,
                cost: d.u64()?,
                margin: UnitInterval::decode(d)?,
                reward_account: RewardAccount::decode(d)?,
                pool_owners: Set::decode(d)?,
                relays: Vec::decode(d)?,
                pool_metadata: Option::decode(d)?,
            },
            4 => Certificate::PoolRetirement(Hash::decode(d)?, d.u64()?),
            7 => Certificate::Reg(StakeCredential::decode(d)?, d.u64()?),
            8 => Certificate::UnReg(StakeCredential::decode(d)?, d.u64()?),
            9 => Certificate::VoteDeleg(StakeCredential::decode(d)?, DRep::decode(d)?),
            10 => Certificate::StakeVoteDeleg(
                StakeCredential::decode(d)?,
                Hash::decode(d)?,
                DRep::decode(d)?,
            ),
            11 => Certificate::StakeRegDeleg(
                StakeCredential::decode(d)?,
                Hash::decode(d)?,
                d.u64()?,
            ),
            12 => Certificate::VoteRegDeleg(
                StakeCredential::decode(d)?,
                DRep::decode(d)?,
                d.u64()?,
            ),
            13 => Certificate::StakeVoteRegDeleg(
                StakeCredential::decode(d)?,
                Hash::decode(d)?,
                DRep::decode(d)?,
                d.u64()?,
            ),
            14 => Certificate::AuthCommitteeHot(
                StakeCredential::decode(d)?,
                StakeCredential::decode(d)?,
            ),
            15 => Certificate::ResignCommitteeCold(
                StakeCredential::decode(d)?,
                Option::decode(d)?,
            ),
            16 => Certificate::RegDRepCert(
                StakeCredential::decode(d)?,
                d.u64()?,
                Option::decode(d)?,
            ),
            17 => Certificate::UnRegDRepCert(StakeCredential::decode(d)?, d.u64()?),
            18 => Certificate::UpdateDRepCert(StakeCredential::decode(d)?, Option::decode(d)?),
            id => return Err(Error::unknown_variant("certificate", id)),
        };

        d.expect_end_array("certificate")?;

        Ok(certificate)
    }
}

impl Encode for Certificate {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            Certificate::StakeRegistration(credential) => {
                e.array(2)?;
                e.u8(0)?;
                credential.encode(e)?;
            }
            Certificate::StakeDeregistration(credential) => {
                e.array(2)?;
                e.u8(1)?;
                credential.encode(e)?;
            }
            Certificate::StakeDelegation(credential, pool) => {
                e.array(3)?;
                e.u8(2)?;
                credential.encode(e)?;
                pool.encode(e)?;
            }
            Certificate::PoolRegistration {
                operator,
                vrf_keyhash,
                pledge,
                cost,
                margin,
                reward_account,
                pool_owners,
                relays,
                pool_metadata,
            } => {
                e.array(10)?;
                e.u8(3)?;
                operator.encode(e)?;
                vrf_keyhash.encode(e)?;
                e.u64(*pledge)?;
                e.u64(*cost)?;
                margin.encode(e)?;
                reward_account.encode(e)?;
                pool_owners.encode(e)?;
                relays.encode(e)?;
                pool_metadata.encode(e)?;
            }
            Certificate::PoolRetirement(pool, epoch) => {
                e.array(3)?;
                e.u8(4)?;
                pool.encode(e)?;
                e.u64(*epoch)?;
            }
            Certificate::Reg(credential, deposit) => {
                e.array(3)?;
                e.u8(7)?;
                credential.encode(e)?;
                e.u64(*deposit)?;
            }
            Certificate::UnReg(credential, deposit) => {
                e.array(3)?;
                e.u8(8)?;
                credential.encode(e)?;
                e.u64(*deposit)?;
            }
            Certificate::VoteDeleg(credential, drep) => {
                e.array(3)?;
                e.u8(9)?;
                credential.encode(e)?;
                drep.encode(e)?;
            }
            Certificate::StakeVoteDeleg(credential, pool, drep) => {
                e.array(4)?;
                e.u8(10)?;
                credential.encode(e)?;
                pool.encode(e)?;
                drep.encode(e)?;
            }
            Certificate::StakeRegDeleg(credential, pool, deposit) => {
                e.array(4)?;
                e.u8(11)?;
                credential.encode(e)?;
                pool.encode(e)?;
                e.u64(*deposit)?;
            }
            Certificate::VoteRegDeleg(credential, drep, deposit) => {
                e.array(4)?;
                e.u8(12)?;
                credential.encode(e)?;
                drep.encode(e)?;
                e.u64(*deposit)?;
            }
            Certificate::StakeVoteRegDeleg(credential, pool, drep, deposit) => {
                e.array(5)?;
                e.u8(13)?;
                credential.encode(e)?;
                pool.encode(e)?;
                drep.encode(e)?;
                e.u64(*deposit)?;
            }
            Certificate::AuthCommitteeHot(cold, hot) => {
                e.array(3)?;
                e.u8(14)?;
                cold.encode(e)?;
                hot.encode(e)?;
            }
            Certificate::ResignCommitteeCold(cold, anchor) => {
                e.array(3)?;
                e.u8(15)?;
                cold.encode(e)?;
                anchor.encode(e)?;
            }
            Certificate::RegDRepCert(credential, deposit, anchor) => {
                e.array(4)?;
                e.u8(16)?;
                credential.encode(e)?;
                e.u64(*deposit)?;
                anchor.encode(e)?;
            }
            Certificate::UnRegDRepCert(credential, deposit) => {
                e.array(3)?;
                e.u8(17)?;
                credential.encode(e)?;
                e.u64(*deposit)?;
            }
            Certificate::UpdateDRepCert(credential, anchor) => {
                e.array(3)?;
                e.u8(18)?;
                credential.encode(e)?;
                anchor.encode(e)?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, PartialOrd, Eq, Ord, Clone)]
pub enum DRep {
    Key(AddrKeyhash),
    Script(ScriptHash),
    Abstain,
    NoConfidence,
}

impl Decode for DRep {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let drep = match d.u64()? {
            0 => DRep::Key(Hash::decode(d)?),
            1 => DRep::Script(Hash::decode(d)?),
            2 => DRep::Abstain,
            3 => DRep::NoConfidence,
            id => return Err(Error::unknown_variant("drep", id)),
        };

        d.expect_end_array("drep")?;

        Ok(drep)
    }
}

impl Encode for DRep {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            DRep::Key(hash) => {
                e.array(2)?;
                e.u8(0)?;
                hash.encode(e)?;
            }
            DRep::Script(hash) => {
                e.array(2)?;
                e.u8(1)?;
                hash.encode(e)?;
            }
            DRep::Abstain => {
                e.array(1)?;
                e.u8(2)?;
            }
            DRep::NoConfidence => {
                e.array(1)?;
                e.u8(3)?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, PartialOrd, Eq, Ord, Clone)]
pub struct Anchor {
    pub url: String,
    pub content_hash: Hash<32>,
}

impl Decode for Anchor {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let url = d.str()?;
        let content_hash = Hash::decode(d)?;
        d.expect_end_array("anchor")?;

        Ok(Anchor { url, content_hash })
    }
}

impl Encode for Anchor {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;
        self.url.encode(e)?;
        self.content_hash.encode(e)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_codec::{from_hex, to_hex};

    fn zero_credential() -> StakeCredential {
        StakeCredential::AddrKeyhash(Hash::new([0; 28]))
    }

    #[test]
    fn drep_update_without_anchor() {
        // [18, [0, h'00..00'], null]
        let payload = format!("8312 8200 581c{} f6", "00".repeat(28)).replace(' ', "");

        let cert: Certificate = from_hex(&payload).unwrap();

        assert_eq!(
            cert,
            Certificate::UpdateDRepCert(zero_credential(), None)
        );

        assert_eq!(to_hex(&cert).unwrap(), payload);
    }

    #[test]
    fn drep_update_with_anchor() {
        // [18, [0, h'00..00'], ["https://www.someurl.io", h'00..00']]
        let payload = format!(
            "8312 8200 581c{} 82 76{} 5820{}",
            "00".repeat(28),
            hex::encode("https://www.someurl.io"),
            "00".repeat(32)
        )
        .replace(' ', "");

        let cert: Certificate = from_hex(&payload).unwrap();

        assert_eq!(
            cert,
            Certificate::UpdateDRepCert(
                zero_credential(),
                Some(Anchor {
                    url: "https://www.someurl.io".into(),
                    content_hash: Hash::new([0; 32]),
                })
            )
        );

        assert_eq!(to_hex(&cert).unwrap(), payload);
    }

    #[test]
    fn stake_vote_delegation_round_trip() {
        // [10, [0, h'11..11'], h'22..22', [3]]
        let payload = format!(
            "84 0a 8200 581c{} 581c{} 8103",
            "11".repeat(28),
            "22".repeat(28)
        )
        .replace(' ', "");

        let cert: Certificate = from_hex(&payload).unwrap();

        assert_eq!(
            cert,
            Certificate::StakeVoteDeleg(
                StakeCredential::AddrKeyhash(Hash::new([0x11; 28])),
                Hash::new([0x22; 28]),
                DRep::NoConfidence,
            )
        );

        assert_eq!(to_hex(&cert).unwrap(), payload);
    }

    #[test]
    fn unknown_certificate_ids_are_rejected() {
        let result: Result<Certificate, _> = from_hex("821b0000000000000063f6");
        assert!(matches!(result, Err(Error::UnknownVariant { .. })));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        // stake registration with a stray trailing element
        let payload = format!("8300 8200 581c{} 00", "00".repeat(28)).replace(' ', "");
        let result: Result<Certificate, _> = from_hex(&payload);

        assert!(matches!(result, Err(Error::TrailingElements { .. })));
    }
}
