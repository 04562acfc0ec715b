use cryptoxide::blake2b::Blake2b;

use crate::hash::Hash;

/// handy method to create a hash of given `SIZE` bit size.
///
/// The hash algorithm is `Blake2b` and the constant parameter is the number
/// of bits to generate. Cardano uses `256` (transaction ids, datum hashes)
/// and `224` (key hashes, script hashes, policy ids).
///
/// # Generate a cryptographic hash with Blake2b 256
///
/// ```
/// # use vesta_crypto::hash::Hasher;
/// let mut hasher = Hasher::<256>::new();
/// hasher.input(b"My transaction");
///
/// let digest = hasher.finalize();
/// # assert_eq!(
/// #   "0d8d00cdd4657ac84d82f0a56067634a7adfdf43da41cb534bcaa45060973d21",
/// #   hex::encode(digest)
/// # );
/// ```
pub struct Hasher<const BITS: usize>(Blake2b);

impl<const BITS: usize> Hasher<BITS> {
    /// update the [`Hasher`] with the given inputs
    #[inline]
    pub fn input(&mut self, bytes: &[u8]) {
        use cryptoxide::digest::Digest as _;
        self.0.input(bytes);
    }
}

macro_rules! common_hasher {
    ($size:literal) => {
        impl Hasher<$size> {
            /// create a new [`Hasher`]
            #[inline]
            pub fn new() -> Self {
                Self(Blake2b::new($size / 8))
            }

            /// convenient function to directly generate the hash of the
            /// given bytes.
            #[inline]
            pub fn hash(bytes: &[u8]) -> Hash<{ $size / 8 }> {
                let mut hasher = Self::new();
                hasher.input(bytes);
                hasher.finalize()
            }

            /// like [`Self::hash`] but prefixing the input with a
            /// discriminant byte, as done for script hashes.
            #[inline]
            pub fn hash_tagged(bytes: &[u8], tag: u8) -> Hash<{ $size / 8 }> {
                let mut hasher = Self::new();
                hasher.input(&[tag]);
                hasher.input(bytes);
                hasher.finalize()
            }

            /// convenient function to hash the CBOR encoding of the given
            /// value.
            #[inline]
            pub fn hash_cbor(
                data: &impl vesta_codec::Encode,
            ) -> Result<Hash<{ $size / 8 }>, vesta_codec::Error> {
                let mut hasher = Self::new();
                hasher.input(&vesta_codec::to_vec(data)?);
                Ok(hasher.finalize())
            }

            /// like [`Self::hash_cbor`] with a discriminant byte prefix.
            #[inline]
            pub fn hash_tagged_cbor(
                data: &impl vesta_codec::Encode,
                tag: u8,
            ) -> Result<Hash<{ $size / 8 }>, vesta_codec::Error> {
                let mut hasher = Self::new();
                hasher.input(&[tag]);
                hasher.input(&vesta_codec::to_vec(data)?);
                Ok(hasher.finalize())
            }

            /// consume the [`Hasher`] and returns the computed digest
            pub fn finalize(mut self) -> Hash<{ $size / 8 }> {
                use cryptoxide::digest::Digest as _;
                let mut hash = [0; $size / 8];
                self.0.result(&mut hash);
                Hash::new(hash)
            }
        }

        impl Default for Hasher<$size> {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

common_hasher!(224);
common_hasher!(256);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_224() {
        let digest = Hasher::<224>::hash(b"My Public Key");

        assert_eq!(
            hex::encode(digest),
            "c123c9bc0e9e31a20a4aa23518836ec5fb54bdc85735c56b38eb79a5"
        );
    }

    #[test]
    fn blake2b_256() {
        let digest = Hasher::<256>::hash(b"My transaction");

        assert_eq!(
            hex::encode(digest),
            "0d8d00cdd4657ac84d82f0a56067634a7adfdf43da41cb534bcaa45060973d21"
        );
    }
}
