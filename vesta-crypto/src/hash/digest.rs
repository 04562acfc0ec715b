use std::{fmt, ops::Deref, str::FromStr};

use vesta_codec::{Decode, Decoder, Encode, Encoder, Error};

/// data that is a cryptographic [`struct@Hash`] of `BYTES` long.
///
/// Possible values with Cardano are 32 bytes long (block hash or transaction
/// hash) or 28 bytes long (as used in addresses and policy ids).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash<const BYTES: usize>([u8; BYTES]);

impl<const BYTES: usize> Hash<BYTES> {
    #[inline]
    pub const fn new(bytes: [u8; BYTES]) -> Self {
        Self(bytes)
    }
}

impl<const BYTES: usize> From<[u8; BYTES]> for Hash<BYTES> {
    #[inline]
    fn from(bytes: [u8; BYTES]) -> Self {
        Self::new(bytes)
    }
}

impl<const BYTES: usize> From<&'_ [u8]> for Hash<BYTES> {
    fn from(bytes: &'_ [u8]) -> Self {
        let mut hash = [0; BYTES];
        hash.copy_from_slice(bytes);
        Self::new(hash)
    }
}

impl<const BYTES: usize> AsRef<[u8]> for Hash<BYTES> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const BYTES: usize> Deref for Hash<BYTES> {
    type Target = [u8; BYTES];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const BYTES: usize> PartialEq<[u8]> for Hash<BYTES> {
    fn eq(&self, other: &[u8]) -> bool {
        self.0.eq(other)
    }
}

impl<const BYTES: usize> fmt::Debug for Hash<BYTES> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(&format!("Hash<{size}>", size = BYTES))
            .field(&hex::encode(self))
            .finish()
    }
}

impl<const BYTES: usize> fmt::Display for Hash<BYTES> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self))
    }
}

impl<const BYTES: usize> FromStr for Hash<BYTES> {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0; BYTES];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self::new(bytes))
    }
}

impl<const BYTES: usize> Decode for Hash<BYTES> {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let bytes = d.bytes()?;

        if bytes.len() == BYTES {
            let mut hash = [0; BYTES];
            hash.copy_from_slice(&bytes);
            Ok(Self::new(hash))
        } else {
            Err(Error::message(format!(
                "invalid hash size, expected {BYTES} bytes, found {}",
                bytes.len()
            )))
        }
    }
}

impl<const BYTES: usize> Encode for Hash<BYTES> {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.bytes(&self.0)?;
        Ok(())
    }
}
