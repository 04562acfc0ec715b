use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};

use crate::{Decode, Decoder, Encode, Encoder, Error, Type};

static TAG_SET: u64 = 258;
static TAG_CBOR: u64 = 24;

/// An owned byte string, displayed and serialized as hex.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String")]
#[serde(try_from = "String")]
pub struct Bytes(Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(xs: Vec<u8>) -> Self {
        Bytes(xs)
    }
}

impl From<&[u8]> for Bytes {
    fn from(xs: &[u8]) -> Self {
        Bytes(xs.to_vec())
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(b: Bytes) -> Self {
        b.0
    }
}

impl Deref for Bytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<String> for Bytes {
    type Error = hex::FromHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let v = hex::decode(value)?;
        Ok(Bytes(v))
    }
}

impl From<Bytes> for String {
    fn from(b: Bytes) -> Self {
        hex::encode(b.deref())
    }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl Decode for Bytes {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.bytes().map(Bytes)
    }
}

impl Encode for Bytes {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.bytes(&self.0)?;
        Ok(())
    }
}

/// A native CBOR int: the full range of major types 0 and 1, one bit wider
/// than `i64` on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i128")]
#[serde(try_from = "i128")]
pub struct Int(pub(crate) i128);

impl Int {
    pub const MIN: Int = Int(-(1i128 << 64));
    pub const MAX: Int = Int((1i128 << 64) - 1);
}

impl From<Int> for i128 {
    fn from(value: Int) -> Self {
        value.0
    }
}

impl From<u64> for Int {
    fn from(x: u64) -> Self {
        Int(x as i128)
    }
}

impl From<i64> for Int {
    fn from(x: i64) -> Self {
        Int(x as i128)
    }
}

impl From<u32> for Int {
    fn from(x: u32) -> Self {
        Int(x as i128)
    }
}

impl From<i32> for Int {
    fn from(x: i32) -> Self {
        Int(x as i128)
    }
}

impl TryFrom<i128> for Int {
    type Error = Error;

    fn try_from(value: i128) -> Result<Self, Self::Error> {
        if value < Int::MIN.0 || value > Int::MAX.0 {
            return Err(Error::IntOverflow { what: "cbor int" });
        }

        Ok(Int(value))
    }
}

impl TryFrom<Int> for i64 {
    type Error = Error;

    fn try_from(value: Int) -> Result<Self, Self::Error> {
        i64::try_from(value.0).map_err(|_| Error::IntOverflow { what: "i64" })
    }
}

impl TryFrom<Int> for u64 {
    type Error = Error;

    fn try_from(value: Int) -> Result<Self, Self::Error> {
        u64::try_from(value.0).map_err(|_| Error::IntOverflow { what: "u64" })
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Decode for Int {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.int()
    }
}

impl Encode for Int {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.int(*self)?;
        Ok(())
    }
}

/// Map entries held in their arrival order.
///
/// Nothing forces on-chain maps to be sorted, and hashing works over the
/// exact bytes that arrived, so a tree- or hash-backed map that re-sorts
/// entries would break re-serialization. A plain vector of pairs keeps the
/// wire order untouched, and the `Def` / `Indef` split records which map
/// framing to emit again. Duplicate keys are rejected on decode.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "Vec::<(K, V)>", into = "Vec::<(K, V)>")]
pub enum KeyValuePairs<K, V>
where
    K: Clone,
    V: Clone,
{
    Def(Vec<(K, V)>),
    Indef(Vec<(K, V)>),
}

impl<K, V> KeyValuePairs<K, V>
where
    K: Clone,
    V: Clone,
{
    pub fn to_vec(self) -> Vec<(K, V)> {
        self.into()
    }
}

impl<K, V> From<KeyValuePairs<K, V>> for Vec<(K, V)>
where
    K: Clone,
    V: Clone,
{
    fn from(other: KeyValuePairs<K, V>) -> Self {
        match other {
            KeyValuePairs::Def(x) => x,
            KeyValuePairs::Indef(x) => x,
        }
    }
}

impl<K, V> From<Vec<(K, V)>> for KeyValuePairs<K, V>
where
    K: Clone,
    V: Clone,
{
    fn from(other: Vec<(K, V)>) -> Self {
        KeyValuePairs::Def(other)
    }
}

impl<K, V> Deref for KeyValuePairs<K, V>
where
    K: Clone,
    V: Clone,
{
    type Target = Vec<(K, V)>;

    fn deref(&self) -> &Self::Target {
        match self {
            KeyValuePairs::Def(x) => x,
            KeyValuePairs::Indef(x) => x,
        }
    }
}

impl<K, V> Decode for KeyValuePairs<K, V>
where
    K: Decode + PartialEq + Clone,
    V: Decode + Clone,
{
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = d.map()?;

        let mut items: Vec<(K, V)> = Vec::new();

        while d.datatype()? != Type::EndMap {
            let k = K::decode(d)?;
            let v = V::decode(d)?;

            if items.iter().any(|(seen, _)| *seen == k) {
                return Err(Error::DuplicateKey {
                    what: "key-value pairs",
                });
            }

            items.push((k, v));
        }

        d.end_map()?;

        match len {
            Some(_) => Ok(KeyValuePairs::Def(items)),
            None => Ok(KeyValuePairs::Indef(items)),
        }
    }
}

impl<K, V> Encode for KeyValuePairs<K, V>
where
    K: Encode + Clone,
    V: Encode + Clone,
{
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            KeyValuePairs::Def(x) => {
                e.map(x.len() as u64)?;

                for (k, v) in x.iter() {
                    k.encode(e)?;
                    v.encode(e)?;
                }
            }
            KeyValuePairs::Indef(x) => {
                e.begin_map()?;

                for (k, v) in x.iter() {
                    k.encode(e)?;
                    v.encode(e)?;
                }

                e.end()?;
            }
        }

        Ok(())
    }
}

/// An array that recalls which of the two CBOR framings it arrived with,
/// so definite and indefinite originals each re-encode as themselves.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub enum MaybeIndefArray<A> {
    Def(Vec<A>),
    Indef(Vec<A>),
}

impl<A> MaybeIndefArray<A> {
    pub fn to_vec(self) -> Vec<A> {
        self.into()
    }
}

impl<A> Deref for MaybeIndefArray<A> {
    type Target = Vec<A>;

    fn deref(&self) -> &Self::Target {
        match self {
            MaybeIndefArray::Def(x) => x,
            MaybeIndefArray::Indef(x) => x,
        }
    }
}

impl<A> From<MaybeIndefArray<A>> for Vec<A> {
    fn from(other: MaybeIndefArray<A>) -> Self {
        match other {
            MaybeIndefArray::Def(x) => x,
            MaybeIndefArray::Indef(x) => x,
        }
    }
}

impl<A: Decode> Decode for MaybeIndefArray<A> {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = d.array()?;

        let mut items = Vec::new();

        while d.datatype()? != Type::EndArray {
            items.push(A::decode(d)?);
        }

        d.end_array()?;

        match len {
            Some(_) => Ok(MaybeIndefArray::Def(items)),
            None => Ok(MaybeIndefArray::Indef(items)),
        }
    }
}

impl<A: Encode> Encode for MaybeIndefArray<A> {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            MaybeIndefArray::Def(x) => {
                x.encode(e)?;
            }
            MaybeIndefArray::Indef(x) => {
                e.begin_array()?;

                for v in x.iter() {
                    v.encode(e)?;
                }

                e.end()?;
            }
        }

        Ok(())
    }
}

/// Set
///
/// Unique, order-preserving collection. The wire form may carry tag 258;
/// whether it did is remembered per value and restored verbatim on encode,
/// so re-serialization stays byte-compatible with the source. Freshly built
/// sets use the tagged form.
#[derive(Debug, PartialEq, Eq, Clone, PartialOrd, Serialize, Deserialize)]
pub struct Set<T> {
    items: Vec<T>,
    tagged: bool,
}

impl<T> Set<T> {
    pub fn to_vec(self) -> Vec<T> {
        self.items
    }

    /// Whether the source encoding carried tag 258.
    pub fn uses_tag(&self) -> bool {
        self.tagged
    }

    /// Builds a set with the plain (untagged) wire form.
    pub fn untagged(items: Vec<T>) -> Self {
        Set {
            items,
            tagged: false,
        }
    }
}

impl<T> Deref for Set<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> From<Vec<T>> for Set<T> {
    fn from(value: Vec<T>) -> Self {
        Set {
            items: value,
            tagged: true,
        }
    }
}

impl<'a, T> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> Decode for Set<T>
where
    T: Decode + PartialEq,
{
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let tagged = if d.datatype()? == Type::Tag {
            d.expect_tag("set", TAG_SET)?;
            true
        } else {
            false
        };

        let items: Vec<T> = Vec::decode(d)?;

        for (i, item) in items.iter().enumerate() {
            if items[..i].contains(item) {
                return Err(Error::DuplicateKey { what: "set" });
            }
        }

        Ok(Set { items, tagged })
    }
}

impl<T> Encode for Set<T>
where
    T: Encode,
{
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        if self.tagged {
            e.tag(TAG_SET)?;
        }

        self.items.encode(e)?;

        Ok(())
    }
}

/// Decodes a struct while keeping hold of its original CBOR
///
/// Ledger rules hash the bytes that exist on-chain, which are not always the
/// canonical form this codec would emit. When a cache is present, encoding
/// re-emits the captured bytes verbatim; any mutation must go through
/// [`KeepCbor::to_mut`], which drops the cache first. Equality looks at the
/// decoded value only.
#[derive(Debug, Clone)]
pub struct KeepCbor<T> {
    inner: T,
    raw: Option<Vec<u8>>,
}

impl<T> KeepCbor<T> {
    /// The captured source bytes, if this value came from a decode.
    pub fn raw_cbor(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    pub fn unwrap(self) -> T {
        self.inner
    }

    /// Mutable access to the inner value; invalidates the cache since the
    /// captured bytes no longer describe the value.
    pub fn to_mut(&mut self) -> &mut T {
        self.raw = None;
        &mut self.inner
    }

    pub fn clear_cbor_cache(&mut self) {
        self.raw = None;
    }
}

impl<T> From<T> for KeepCbor<T> {
    fn from(inner: T) -> Self {
        KeepCbor { inner, raw: None }
    }
}

impl<T: PartialEq> PartialEq for KeepCbor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: Eq> Eq for KeepCbor<T> {}

impl<T> Deref for KeepCbor<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Decode> Decode for KeepCbor<T> {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let all = d.input();
        let start = d.position();
        let inner = T::decode(d)?;
        let end = d.position();

        Ok(KeepCbor {
            inner,
            raw: Some(all[start..end].to_vec()),
        })
    }
}

impl<T: Encode> Encode for KeepCbor<T> {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match &self.raw {
            Some(raw) => {
                e.raw(raw)?;
                Ok(())
            }
            None => self.inner.encode(e),
        }
    }
}

impl<T: Serialize> Serialize for KeepCbor<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for KeepCbor<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(KeepCbor::from)
    }
}

/// Wraps a struct so that it is encoded/decoded as cbor-in-bytes (tag 24)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct CborWrap<T>(pub T);

impl<T> CborWrap<T> {
    pub fn unwrap(self) -> T {
        self.0
    }
}

impl<T: Decode> Decode for CborWrap<T> {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        d.expect_tag("cbor-wrapped value", TAG_CBOR)?;
        let cbor = d.bytes()?;
        let wrapped = crate::from_slice(&cbor)?;

        Ok(CborWrap(wrapped))
    }
}

impl<T: Encode> Encode for CborWrap<T> {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        let buf = crate::to_vec(&self.0)?;

        e.tag(TAG_CBOR)?;
        e.bytes(&buf)?;

        Ok(())
    }
}

impl<T> Deref for CborWrap<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "Option::<T>", into = "Option::<T>")]
pub enum Nullable<T>
where
    T: Clone,
{
    Some(T),
    Null,
    Undefined,
}

impl<T> Nullable<T>
where
    T: Clone,
{
    pub fn map<F, O>(self, f: F) -> Nullable<O>
    where
        O: Clone,
        F: Fn(T) -> O,
    {
        match self {
            Nullable::Some(x) => Nullable::Some(f(x)),
            Nullable::Null => Nullable::Null,
            Nullable::Undefined => Nullable::Undefined,
        }
    }
}

impl<T: Decode + Clone> Decode for Nullable<T> {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        match d.datatype()? {
            Type::Null => {
                d.null()?;
                Ok(Nullable::Null)
            }
            Type::Undefined => {
                d.undefined()?;
                Ok(Nullable::Undefined)
            }
            _ => Ok(Nullable::Some(T::decode(d)?)),
        }
    }
}

impl<T: Encode + Clone> Encode for Nullable<T> {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        match self {
            Nullable::Some(x) => x.encode(e),
            Nullable::Null => {
                e.null()?;
                Ok(())
            }
            Nullable::Undefined => {
                e.undefined()?;
                Ok(())
            }
        }
    }
}

impl<T> From<Option<T>> for Nullable<T>
where
    T: Clone,
{
    fn from(x: Option<T>) -> Self {
        match x {
            Some(x) => Nullable::Some(x),
            None => Nullable::Null,
        }
    }
}

impl<T> From<Nullable<T>> for Option<T>
where
    T: Clone,
{
    fn from(other: Nullable<T>) -> Self {
        match other {
            Nullable::Some(x) => Some(x),
            _ => None,
        }
    }
}

/// positive_coin = 1 .. 18446744073709551615
#[derive(Debug, PartialEq, Copy, Clone, PartialOrd, Eq, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositiveCoin(u64);

impl TryFrom<u64> for PositiveCoin {
    type Error = u64;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err(value);
        }

        Ok(Self(value))
    }
}

impl From<PositiveCoin> for u64 {
    fn from(value: PositiveCoin) -> Self {
        value.0
    }
}

impl From<&PositiveCoin> for u64 {
    fn from(value: &PositiveCoin) -> Self {
        value.0
    }
}

impl Decode for PositiveCoin {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let n = d.u64()?;

        if n == 0 {
            return Err(Error::message("decoding 0 as PositiveCoin"));
        }

        Ok(Self(n))
    }
}

impl Encode for PositiveCoin {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.u64(self.0)?;
        Ok(())
    }
}

/// nonZeroInt64 = negInt64 / posInt64 ; the int64 range without zero
#[derive(Debug, PartialEq, Copy, Clone, PartialOrd, Eq, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NonZeroInt(i64);

impl TryFrom<i64> for NonZeroInt {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err(value);
        }

        Ok(Self(value))
    }
}

impl From<NonZeroInt> for i64 {
    fn from(value: NonZeroInt) -> Self {
        value.0
    }
}

impl From<&NonZeroInt> for i64 {
    fn from(value: &NonZeroInt) -> Self {
        value.0
    }
}

impl Decode for NonZeroInt {
    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let n = d.i64()?;

        if n == 0 {
            return Err(Error::message("decoding 0 as NonZeroInt"));
        }

        Ok(Self(n))
    }
}

impl Encode for NonZeroInt {
    fn encode(&self, e: &mut Encoder) -> Result<(), Error> {
        e.i64(self.0)?;
        Ok(())
    }
}
