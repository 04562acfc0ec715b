use vesta_codec::Error;
use vesta_crypto::hash::{Hash, Hasher};

use crate::{
    AuxiliaryData, KeepCbor, NativeScript, PlutusData, PlutusScript, ToHash, TransactionBody,
};

impl ToHash<28> for NativeScript {
    fn to_hash(&self) -> Result<Hash<28>, Error> {
        Hasher::<224>::hash_tagged_cbor(self, 0)
    }
}

impl<const VERSION: usize> ToHash<28> for PlutusScript<VERSION> {
    fn to_hash(&self) -> Result<Hash<28>, Error> {
        Hasher::<224>::hash_tagged_cbor(self, VERSION as u8)
    }
}

impl ToHash<32> for PlutusData {
    fn to_hash(&self) -> Result<Hash<32>, Error> {
        Hasher::<256>::hash_cbor(self)
    }
}

impl ToHash<32> for TransactionBody {
    fn to_hash(&self) -> Result<Hash<32>, Error> {
        Hasher::<256>::hash_cbor(self)
    }
}

impl ToHash<32> for AuxiliaryData {
    fn to_hash(&self) -> Result<Hash<32>, Error> {
        Hasher::<256>::hash_cbor(self)
    }
}

impl ToHash<32> for KeepCbor<PlutusData> {
    fn to_hash(&self) -> Result<Hash<32>, Error> {
        match self.raw_cbor() {
            Some(raw) => Ok(Hasher::<256>::hash(raw)),
            None => (**self).to_hash(),
        }
    }
}

impl ToHash<28> for KeepCbor<NativeScript> {
    fn to_hash(&self) -> Result<Hash<28>, Error> {
        match self.raw_cbor() {
            Some(raw) => Ok(Hasher::<224>::hash_tagged(raw, 0)),
            None => (**self).to_hash(),
        }
    }
}

impl ToHash<32> for KeepCbor<TransactionBody> {
    fn to_hash(&self) -> Result<Hash<32>, Error> {
        match self.raw_cbor() {
            Some(raw) => Ok(Hasher::<256>::hash(raw)),
            None => (**self).to_hash(),
        }
    }
}

#[cfg(test)]
mod tests {
    use vesta_codec::num_bigint::BigInt;

    use super::*;
    use crate::Constr;

    #[test]
    fn native_script_hashes_prefix_a_zero_tag_byte() {
        let script = NativeScript::ScriptAny(vec![
            NativeScript::ScriptPubkey(Hash::new([7; 28])),
            NativeScript::InvalidHereafter(4000),
        ]);

        // [2, [[0, h'07..07'], [5, 4000]]], assembled by hand
        let wire =
            hex::decode(format!("8202828200581c{}8205190fa0", "07".repeat(28))).unwrap();
        assert_eq!(vesta_codec::to_vec(&script).unwrap(), wire);

        // the digest covers a 0x00 discriminant followed by those bytes
        let preimage = [&[0u8][..], &wire].concat();
        assert_eq!(script.to_hash().unwrap(), Hasher::<224>::hash(&preimage));
    }

    #[test]
    fn plutus_script_hashes_use_the_version_byte() {
        let script: PlutusScript<2> = PlutusScript(vec![0x4e, 0x4d, 0x01].into());

        // 0x02 discriminant, then the cbor byte string 43 4e4d01
        let preimage = hex::decode("02434e4d01").unwrap();
        assert_eq!(script.to_hash().unwrap(), Hasher::<224>::hash(&preimage));
    }

    #[test]
    fn plutus_data_hashes_cover_the_wire_encoding() {
        let datum = PlutusData::Constr(Constr::<PlutusData> {
            alternative: 1,
            fields: vec![
                PlutusData::BigInt(BigInt::from(-99)),
                PlutusData::BoundedBytes(vec![0x0b, 0x0e, 0x0e, 0x0f].into()),
            ],
        });

        // tag 122 carrying an indefinite field list: (_ -99, h'0b0e0e0f')
        let wire = hex::decode("d87a9f3862440b0e0e0fff").unwrap();
        assert_eq!(vesta_codec::to_vec(&datum).unwrap(), wire);

        // no discriminant for datums; the digest is over the bytes as-is
        assert_eq!(datum.to_hash().unwrap(), Hasher::<256>::hash(&wire));
    }

    #[test]
    fn cached_bytes_win_over_the_canonical_form() {
        // 1000 with a non-canonical four-byte argument
        let source = hex::decode("1a000003e8").unwrap();
        let cached: KeepCbor<PlutusData> = vesta_codec::from_slice(&source).unwrap();

        assert_eq!(cached.to_hash().unwrap(), Hasher::<256>::hash(&source));

        let fresh = KeepCbor::from(PlutusData::BigInt(BigInt::from(1000)));
        assert_eq!(
            fresh.to_hash().unwrap(),
            Hasher::<256>::hash(&hex::decode("1903e8").unwrap())
        );
    }
}
