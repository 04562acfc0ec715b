//! Streaming CBOR codec shared across all vesta crates.
//!
//! The decoder exposes a peek-first cursor over a borrowed slice; the
//! encoder writes shortest-form heads into an owned buffer. Everything that
//! crosses the wire implements [`Decode`] / [`Encode`] on top of them.

mod decoder;
mod encoder;
mod error;

/// Round-trip friendly common helper structs
pub mod utils;

pub use decoder::{Decoder, Type, MAX_DEPTH};
pub use encoder::Encoder;
pub use error::Error;

/// Shared re-export of the bignum backend across all vesta crates.
pub use num_bigint;

use std::collections::BTreeMap;

pub trait Decode: Sized {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error>;
}

pub trait Encode {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error>;
}

pub trait Fragment: Decode + Encode {}

impl<T> Fragment for T where T: Decode + Encode {}

/// Encodes a value into a fresh buffer.
pub fn to_vec<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    let mut e = Encoder::new();
    value.encode(&mut e)?;

    Ok(e.into_vec())
}

/// Encodes a value and renders it as lowercase hex.
pub fn to_hex<T: Encode + ?Sized>(value: &T) -> Result<String, Error> {
    Ok(hex::encode(to_vec(value)?))
}

/// Decodes a single data item, requiring the whole input to be consumed.
pub fn from_slice<T: Decode>(bytes: &[u8]) -> Result<T, Error> {
    let mut d = Decoder::new(bytes);
    let value = T::decode(&mut d)?;

    match d.datatype()? {
        Type::Finished => Ok(value),
        _ => Err(Error::TrailingData(d.position())),
    }
}

/// Decodes a single data item out of a hex payload.
pub fn from_hex<T: Decode>(payload: &str) -> Result<T, Error> {
    let bytes =
        hex::decode(payload).map_err(|e| Error::message(format!("invalid hex payload: {e}")))?;

    from_slice(&bytes)
}

impl Decode for u8 {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.u8()
    }
}

impl Decode for u16 {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.u16()
    }
}

impl Decode for u32 {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.u32()
    }
}

impl Decode for u64 {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.u64()
    }
}

impl Decode for i64 {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.i64()
    }
}

impl Decode for bool {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.bool()
    }
}

impl Decode for String {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.str()
    }
}

impl Decode for num_bigint::BigInt {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.bignum()
    }
}

impl Encode for u8 {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.u8(*self)?;
        Ok(())
    }
}

impl Encode for u16 {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.u16(*self)?;
        Ok(())
    }
}

impl Encode for u32 {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.u32(*self)?;
        Ok(())
    }
}

impl Encode for u64 {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.u64(*self)?;
        Ok(())
    }
}

impl Encode for i64 {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.i64(*self)?;
        Ok(())
    }
}

impl Encode for bool {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.bool(*self)?;
        Ok(())
    }
}

impl Encode for String {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.str(self)?;
        Ok(())
    }
}

impl Encode for str {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.str(self)?;
        Ok(())
    }
}

impl Encode for num_bigint::BigInt {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.bignum(self)?;
        Ok(())
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;

        let mut out = Vec::new();

        while d.datatype()? != Type::EndArray {
            out.push(T::decode(d)?);
        }

        d.end_array()?;

        Ok(out)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(self.len() as u64)?;

        for item in self {
            item.encode(e)?;
        }

        Ok(())
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        match d.datatype()? {
            Type::Null => {
                d.null()?;
                Ok(None)
            }
            _ => Ok(Some(T::decode(d)?)),
        }
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            Some(x) => x.encode(e),
            None => {
                e.null()?;
                Ok(())
            }
        }
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        T::decode(d).map(Box::new)
    }
}

impl<T: Encode> Encode for Box<T> {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        self.as_ref().encode(e)
    }
}

impl<A: Decode, B: Decode> Decode for (A, B) {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.array()?;
        let a = A::decode(d)?;
        let b = B::decode(d)?;
        d.expect_end_array("pair")?;

        Ok((a, b))
    }
}

impl<A: Encode, B: Encode> Encode for (A, B) {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.array(2)?;
        self.0.encode(e)?;
        self.1.encode(e)?;

        Ok(())
    }
}

impl<K, V> Decode for BTreeMap<K, V>
where
    K: Decode + Ord,
    V: Decode,
{
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.map()?;

        let mut out = BTreeMap::new();

        while d.datatype()? != Type::EndMap {
            let k = K::decode(d)?;
            let v = V::decode(d)?;

            if out.insert(k, v).is_some() {
                return Err(Error::DuplicateKey { what: "map" });
            }
        }

        d.end_map()?;

        Ok(out)
    }
}

impl<K, V> Encode for BTreeMap<K, V>
where
    K: Encode,
    V: Encode,
{
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.map(self.len() as u64)?;

        for (k, v) in self {
            k.encode(e)?;
            v.encode(e)?;
        }

        Ok(())
    }
}
