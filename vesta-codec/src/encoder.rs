use num_bigint::{BigInt, Sign};

use crate::error::Error;
use crate::utils::Int;

const TAG_POS_BIGNUM: u64 = 2;
const TAG_NEG_BIGNUM: u64 = 3;

/// Streaming CBOR writer over an owned growable buffer.
///
/// Every emitted head uses the shortest form that fits its argument, and
/// definite lengths are preferred throughout; `begin_array` / `begin_map`
/// plus [`Encoder::end`] exist for callers that must reproduce an
/// indefinite-length original.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    buffer: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Encoder::default()
    }

    fn head(&mut self, major: u8, value: u64) {
        let major = major << 5;

        if value <= 23 {
            self.buffer.push(major | value as u8);
        } else if value <= u8::MAX as u64 {
            self.buffer.push(major | 24);
            self.buffer.push(value as u8);
        } else if value <= u16::MAX as u64 {
            self.buffer.push(major | 25);
            self.buffer.extend_from_slice(&(value as u16).to_be_bytes());
        } else if value <= u32::MAX as u64 {
            self.buffer.push(major | 26);
            self.buffer.extend_from_slice(&(value as u32).to_be_bytes());
        } else {
            self.buffer.push(major | 27);
            self.buffer.extend_from_slice(&value.to_be_bytes());
        }
    }

    pub fn u64(&mut self, value: u64) -> Result<&mut Self, Error> {
        self.head(0, value);
        Ok(self)
    }

    pub fn u32(&mut self, value: u32) -> Result<&mut Self, Error> {
        self.u64(value as u64)
    }

    pub fn u16(&mut self, value: u16) -> Result<&mut Self, Error> {
        self.u64(value as u64)
    }

    pub fn u8(&mut self, value: u8) -> Result<&mut Self, Error> {
        self.u64(value as u64)
    }

    /// Picks major type 0 or 1 by sign.
    pub fn i64(&mut self, value: i64) -> Result<&mut Self, Error> {
        if value >= 0 {
            self.head(0, value as u64);
        } else {
            self.head(1, (-(value + 1)) as u64);
        }

        Ok(self)
    }

    /// Emits the full 65-bit native int range.
    pub fn int(&mut self, value: Int) -> Result<&mut Self, Error> {
        let value = i128::from(value);

        if value >= 0 {
            self.head(0, value as u64);
        } else {
            self.head(1, (-(value + 1)) as u64);
        }

        Ok(self)
    }

    /// Emits an arbitrary-precision integer, narrowing to a native int
    /// whenever the value fits in 64 bits; otherwise falls back to the
    /// bignum tags with a base-256 big-endian magnitude.
    pub fn bignum(&mut self, value: &BigInt) -> Result<&mut Self, Error> {
        match value.sign() {
            Sign::NoSign | Sign::Plus => {
                if let Ok(small) = u64::try_from(value) {
                    self.u64(small)
                } else {
                    self.tag(TAG_POS_BIGNUM)?;
                    self.bytes(&value.magnitude().to_bytes_be())
                }
            }
            Sign::Minus => {
                // value = -1 - n
                let n: BigInt = -value - 1;

                if let Ok(n) = u64::try_from(&n) {
                    self.head(1, n);
                    Ok(self)
                } else {
                    self.tag(TAG_NEG_BIGNUM)?;
                    self.bytes(&n.magnitude().to_bytes_be())
                }
            }
        }
    }

    pub fn bytes(&mut self, value: &[u8]) -> Result<&mut Self, Error> {
        self.head(2, value.len() as u64);
        self.buffer.extend_from_slice(value);
        Ok(self)
    }

    pub fn str(&mut self, value: &str) -> Result<&mut Self, Error> {
        self.head(3, value.len() as u64);
        self.buffer.extend_from_slice(value.as_bytes());
        Ok(self)
    }

    pub fn array(&mut self, len: u64) -> Result<&mut Self, Error> {
        self.head(4, len);
        Ok(self)
    }

    pub fn begin_array(&mut self) -> Result<&mut Self, Error> {
        self.buffer.push(0x9f);
        Ok(self)
    }

    pub fn map(&mut self, len: u64) -> Result<&mut Self, Error> {
        self.head(5, len);
        Ok(self)
    }

    pub fn begin_map(&mut self) -> Result<&mut Self, Error> {
        self.buffer.push(0xbf);
        Ok(self)
    }

    pub fn begin_bytes(&mut self) -> Result<&mut Self, Error> {
        self.buffer.push(0x5f);
        Ok(self)
    }

    /// Closes the innermost indefinite-length container.
    pub fn end(&mut self) -> Result<&mut Self, Error> {
        self.buffer.push(0xff);
        Ok(self)
    }

    pub fn tag(&mut self, tag: u64) -> Result<&mut Self, Error> {
        self.head(6, tag);
        Ok(self)
    }

    pub fn bool(&mut self, value: bool) -> Result<&mut Self, Error> {
        self.buffer.push(if value { 0xf5 } else { 0xf4 });
        Ok(self)
    }

    pub fn null(&mut self) -> Result<&mut Self, Error> {
        self.buffer.push(0xf6);
        Ok(self)
    }

    pub fn undefined(&mut self) -> Result<&mut Self, Error> {
        self.buffer.push(0xf7);
        Ok(self)
    }

    /// Splices an already-encoded data item into the output verbatim.
    pub fn raw(&mut self, item: &[u8]) -> Result<&mut Self, Error> {
        self.buffer.extend_from_slice(item);
        Ok(self)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortest_form_heads() {
        let mut e = Encoder::new();
        e.u64(0).unwrap();
        e.u64(23).unwrap();
        e.u64(24).unwrap();
        e.u64(256).unwrap();
        e.u64(65536).unwrap();
        e.u64(1 << 32).unwrap();

        assert_eq!(
            hex::encode(e.as_slice()),
            "001718181901001a000100001b0000000100000000"
        );
    }

    #[test]
    fn negatives_pick_major_type_one() {
        let mut e = Encoder::new();
        e.i64(-1).unwrap();
        e.i64(-1000).unwrap();
        e.i64(i64::MIN).unwrap();

        assert_eq!(hex::encode(e.as_slice()), "203903e73b7fffffffffffffff");
    }

    #[test]
    fn empty_map_is_two_bytes() {
        let mut e = Encoder::new();
        e.map(0).unwrap();

        assert_eq!(hex::encode(e.as_slice()), "a0");
    }

    #[test]
    fn huge_array_header_uses_eight_byte_length() {
        let mut e = Encoder::new();
        e.array(1 << 32).unwrap();

        assert_eq!(hex::encode(e.as_slice()), "9b0000000100000000");
    }

    #[test]
    fn bignum_narrows_when_it_fits() {
        let mut e = Encoder::new();
        e.bignum(&BigInt::from(u64::MAX)).unwrap();
        assert_eq!(hex::encode(e.as_slice()), "1bffffffffffffffff");

        let mut e = Encoder::new();
        e.bignum(&(BigInt::from(u64::MAX) + 1)).unwrap();
        assert_eq!(hex::encode(e.as_slice()), "c249010000000000000000");

        let mut e = Encoder::new();
        e.bignum(&(-BigInt::from(u64::MAX) - 2)).unwrap();
        assert_eq!(hex::encode(e.as_slice()), "c349010000000000000000");

        // most negative value still expressible as a native int
        let mut e = Encoder::new();
        e.bignum(&(-BigInt::from(u64::MAX) - 1)).unwrap();
        assert_eq!(hex::encode(e.as_slice()), "3bffffffffffffffff");
    }
}
