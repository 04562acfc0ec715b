use std::collections::BTreeMap;

use vesta_codec::num_bigint::BigInt;
use vesta_codec::{from_slice, to_vec};
use vesta_primitives::*;

fn input(fill: u8, index: u64) -> TransactionInput {
    TransactionInput {
        transaction_id: Hash::new([fill; 32]),
        index,
    }
}

fn sample_body() -> TransactionBody {
    let mut body = TransactionBody::new(
        vec![input(0x11, 0), input(0x22, 1)].into(),
        vec![
            TransactionOutput::new(vec![0x61; 29].into(), Value::Coin(5000000), None, None),
            TransactionOutput::new(
                vec![0x62; 29].into(),
                Value::Coin(2000000),
                Some(DatumOption::Data(CborWrap(KeepCbor::from(
                    PlutusData::Constr(Constr {
                        alternative: 0,
                        fields: vec![PlutusData::BigInt(BigInt::from(42))],
                    }),
                )))),
                None,
            ),
        ],
        180000,
    );

    body.ttl = Some(90000000);
    body.certificates = Some(
        vec![
            Certificate::Reg(
                StakeCredential::AddrKeyhash(Hash::new([0x33; 28])),
                2000000,
            ),
            Certificate::VoteDeleg(
                StakeCredential::AddrKeyhash(Hash::new([0x33; 28])),
                DRep::Abstain,
            ),
        ]
        .into(),
    );

    let mut withdrawals = BTreeMap::new();
    withdrawals.insert(Bytes::from(vec![0xe1; 29]), 1500000u64);
    body.withdrawals = Some(withdrawals);

    let mut mint: Mint = BTreeMap::new();
    mint.entry(Hash::new([0x44; 28])).or_default().insert(
        AssetName::try_from(b"skull".to_vec()).unwrap(),
        NonZeroInt::try_from(-3i64).unwrap(),
    );
    body.mint = Some(mint);

    body.reference_inputs = Some(vec![input(0x55, 7)].into());
    body.network_id = Some(NetworkId::Mainnet);
    body.donation = Some(PositiveCoin::try_from(1000000u64).unwrap());

    let mut votes: VotingProcedures = BTreeMap::new();
    votes
        .entry(Voter::DRepKey(Hash::new([0x66; 28])))
        .or_default()
        .insert(
        GovActionId {
            transaction_id: Hash::new([0x77; 32]),
            action_index: 0,
        },
        VotingProcedure {
            vote: Vote::Yes,
            anchor: None,
        },
    );
    body.voting_procedures = Some(votes);

    body
}

fn sample_witness_set() -> WitnessSet {
    WitnessSet {
        vkeywitness: Some(
            vec![VKeyWitness {
                vkey: vec![0xaa; 32].into(),
                signature: vec![0xbb; 64].into(),
            }]
            .into(),
        ),
        native_script: Some(
            vec![KeepCbor::from(NativeScript::ScriptAny(vec![
                NativeScript::ScriptPubkey(Hash::new([0x88; 28])),
                NativeScript::InvalidHereafter(120000000),
            ]))]
            .into(),
        ),
        redeemer: Some(KeepCbor::from(Redeemers::List(vec![Redeemer {
            tag: RedeemerTag::Mint,
            index: 0,
            data: PlutusData::Array(vec![]),
            ex_units: ExUnits {
                mem: 1500,
                steps: 300000,
            },
        }]))),
        ..WitnessSet::default()
    }
}

#[test]
fn transaction_isomorphic_decoding_encoding() {
    let tx = Tx {
        transaction_body: KeepCbor::from(sample_body()),
        transaction_witness_set: KeepCbor::from(sample_witness_set()),
        success: true,
        auxiliary_data: Nullable::Null,
    };

    let bytes = to_vec(&tx).unwrap();

    let decoded: Tx = from_slice(&bytes).unwrap();
    assert_eq!(decoded, tx);

    // the decoded copy carries byte caches, so re-encoding is exact
    let bytes2 = to_vec(&decoded).unwrap();
    assert_eq!(bytes, bytes2);
}

#[test]
fn transaction_id_is_stable_across_reencoding() {
    let tx = Tx {
        transaction_body: KeepCbor::from(sample_body()),
        transaction_witness_set: KeepCbor::from(sample_witness_set()),
        success: true,
        auxiliary_data: Nullable::Null,
    };

    let bytes = to_vec(&tx).unwrap();
    let decoded: Tx = from_slice(&bytes).unwrap();

    assert_eq!(
        tx.transaction_body.to_hash().unwrap(),
        decoded.transaction_body.to_hash().unwrap()
    );
}

#[test]
fn auxiliary_data_hash_check_fails_loud_on_oversized_metadata() {
    let aux = AuxiliaryData::Shelley(KeyValuePairs::Def(vec![(
        674,
        Metadatum::Text("x".repeat(65)),
    )]));

    assert!(aux.to_hash().is_err());
}
