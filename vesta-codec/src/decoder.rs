use std::fmt;

use num_bigint::{BigInt, BigUint, Sign};

use crate::error::Error;
use crate::utils::Int;

/// Maximum nesting of arrays, maps and indefinite containers. Inputs deeper
/// than this are rejected with [`Error::MaxDepthExceeded`] instead of
/// exhausting the stack.
pub const MAX_DEPTH: usize = 256;

const TAG_POS_BIGNUM: u64 = 2;
const TAG_NEG_BIGNUM: u64 = 3;

/// The type of the next data item under the cursor.
///
/// `EndArray` / `EndMap` are reported when a definite-length container ran
/// out of items or when the break code of an indefinite one is reached.
/// `Finished` is reported once the whole input has been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Type {
    UnsignedInt,
    NegativeInt,
    Bytes,
    BytesIndef,
    String,
    StringIndef,
    Array,
    ArrayIndef,
    Map,
    MapIndef,
    Tag,
    Bool,
    Null,
    Undefined,
    Float,
    Simple,
    EndArray,
    EndMap,
    Finished,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::UnsignedInt => "unsigned int",
            Type::NegativeInt => "negative int",
            Type::Bytes => "byte string",
            Type::BytesIndef => "start of indefinite byte string",
            Type::String => "text string",
            Type::StringIndef => "start of indefinite text string",
            Type::Array => "start of array",
            Type::ArrayIndef => "start of indefinite array",
            Type::Map => "start of map",
            Type::MapIndef => "start of indefinite map",
            Type::Tag => "tag",
            Type::Bool => "bool",
            Type::Null => "null",
            Type::Undefined => "undefined",
            Type::Float => "float",
            Type::Simple => "simple value",
            Type::EndArray => "end of array",
            Type::EndMap => "end of map",
            Type::Finished => "end of input",
        };

        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Array,
    Map,
}

/// An open container. `remaining` counts pending items (map entries count
/// twice); `None` marks the indefinite-length form, closed by a break code.
#[derive(Debug, Clone, Copy)]
struct Scope {
    kind: ScopeKind,
    remaining: Option<u64>,
}

/// Single-pass streaming CBOR reader over a borrowed byte slice.
///
/// The decoder keeps a stack of open containers so that [`Decoder::datatype`]
/// can report the end of a definite-length array or map without the caller
/// tracking counts by hand. Every read either consumes one complete data item
/// or leaves the cursor where it was; failed reads never stop half-way
/// through an item.
#[derive(Debug, Clone)]
pub struct Decoder<'b> {
    input: &'b [u8],
    pos: usize,
    scopes: Vec<Scope>,
}

impl<'b> Decoder<'b> {
    pub fn new(input: &'b [u8]) -> Self {
        Decoder {
            input,
            pos: 0,
            scopes: Vec::new(),
        }
    }

    /// The full input slice this decoder was created over.
    pub fn input(&self) -> &'b [u8] {
        self.input
    }

    /// Current offset into the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// An independent cursor at the same offset, useful to look ahead
    /// without consuming.
    pub fn probe(&self) -> Decoder<'b> {
        self.clone()
    }

    fn peek_byte(&self) -> Result<u8, Error> {
        self.input
            .get(self.pos)
            .copied()
            .ok_or(Error::UnexpectedEof(self.pos))
    }

    /// The type of the next item, without consuming anything.
    pub fn datatype(&self) -> Result<Type, Error> {
        if let Some(scope) = self.scopes.last() {
            if scope.remaining == Some(0) {
                return Ok(match scope.kind {
                    ScopeKind::Array => Type::EndArray,
                    ScopeKind::Map => Type::EndMap,
                });
            }
        }

        if self.pos >= self.input.len() {
            return if self.scopes.is_empty() {
                Ok(Type::Finished)
            } else {
                Err(Error::UnexpectedEof(self.pos))
            };
        }

        let b = self.input[self.pos];

        if b == 0xff {
            return match self.scopes.last() {
                Some(Scope {
                    kind: ScopeKind::Array,
                    remaining: None,
                }) => Ok(Type::EndArray),
                Some(Scope {
                    kind: ScopeKind::Map,
                    remaining: None,
                }) => Ok(Type::EndMap),
                _ => Err(Error::InvalidValue {
                    msg: "unexpected break code".into(),
                    pos: self.pos,
                }),
            };
        }

        match (b >> 5, b & 0x1f) {
            (0, _) => Ok(Type::UnsignedInt),
            (1, _) => Ok(Type::NegativeInt),
            (2, 31) => Ok(Type::BytesIndef),
            (2, _) => Ok(Type::Bytes),
            (3, 31) => Ok(Type::StringIndef),
            (3, _) => Ok(Type::String),
            (4, 31) => Ok(Type::ArrayIndef),
            (4, _) => Ok(Type::Array),
            (5, 31) => Ok(Type::MapIndef),
            (5, _) => Ok(Type::Map),
            (6, _) => Ok(Type::Tag),
            (7, 20) | (7, 21) => Ok(Type::Bool),
            (7, 22) => Ok(Type::Null),
            (7, 23) => Ok(Type::Undefined),
            (7, 25) | (7, 26) | (7, 27) => Ok(Type::Float),
            (7, 28..=30) => Err(Error::InvalidValue {
                msg: "reserved simple value".into(),
                pos: self.pos,
            }),
            (7, _) => Ok(Type::Simple),
            _ => unreachable!("three-bit major type"),
        }
    }

    fn expect(&self, accepted: &[Type], expected: &'static str) -> Result<Type, Error> {
        let found = self.datatype()?;

        if accepted.contains(&found) {
            Ok(found)
        } else {
            Err(Error::TypeMismatch {
                expected,
                found,
                pos: self.pos,
            })
        }
    }

    /// Marks one complete item as consumed within the enclosing container.
    fn item_consumed(&mut self) {
        if let Some(Scope {
            remaining: Some(n), ..
        }) = self.scopes.last_mut()
        {
            *n -= 1;
        }
    }

    /// Reads the head of the next item: major type plus argument. `None`
    /// stands for the indefinite-length marker.
    fn read_head(&mut self) -> Result<(u8, Option<u64>), Error> {
        let b = self.peek_byte()?;
        let (major, info) = (b >> 5, b & 0x1f);

        let trailing = match info {
            0..=23 => 0,
            24 => 1,
            25 => 2,
            26 => 4,
            27 => 8,
            31 => {
                self.pos += 1;
                return Ok((major, None));
            }
            _ => {
                return Err(Error::InvalidValue {
                    msg: "reserved length code".into(),
                    pos: self.pos,
                })
            }
        };

        if self.input.len() - self.pos <= trailing {
            return Err(Error::UnexpectedEof(self.input.len()));
        }

        let value = if trailing == 0 {
            info as u64
        } else {
            let mut v: u64 = 0;
            for i in 0..trailing {
                v = (v << 8) | self.input[self.pos + 1 + i] as u64;
            }
            v
        };

        self.pos += 1 + trailing;

        Ok((major, Some(value)))
    }

    /// Like [`Decoder::read_head`] but rejects the indefinite-length marker,
    /// leaving the cursor untouched when it does.
    fn read_definite_head(&mut self) -> Result<(u8, u64), Error> {
        let pos = self.pos;

        match self.read_head()? {
            (major, Some(v)) => Ok((major, v)),
            (_, None) => {
                self.pos = pos;
                Err(Error::InvalidValue {
                    msg: "unexpected indefinite length".into(),
                    pos,
                })
            }
        }
    }

    pub fn u64(&mut self) -> Result<u64, Error> {
        self.expect(&[Type::UnsignedInt], "unsigned int")?;
        let (_, v) = self.read_definite_head()?;
        self.item_consumed();

        Ok(v)
    }

    pub fn u32(&mut self) -> Result<u32, Error> {
        let mut probe = self.probe();
        let v = probe.u64()?;

        u32::try_from(v).map_err(|_| Error::IntOverflow { what: "u32" })?;
        self.u64().map(|v| v as u32)
    }

    pub fn u16(&mut self) -> Result<u16, Error> {
        let mut probe = self.probe();
        let v = probe.u64()?;

        u16::try_from(v).map_err(|_| Error::IntOverflow { what: "u16" })?;
        self.u64().map(|v| v as u16)
    }

    pub fn u8(&mut self) -> Result<u8, Error> {
        let mut probe = self.probe();
        let v = probe.u64()?;

        u8::try_from(v).map_err(|_| Error::IntOverflow { what: "u8" })?;
        self.u64().map(|v| v as u8)
    }

    pub fn i64(&mut self) -> Result<i64, Error> {
        let kind = self.expect(&[Type::UnsignedInt, Type::NegativeInt], "int")?;

        let mut probe = self.probe();
        let (_, raw) = probe.read_definite_head()?;

        let value = match kind {
            Type::UnsignedInt => {
                i64::try_from(raw).map_err(|_| Error::IntOverflow { what: "i64" })?
            }
            _ => {
                if raw > i64::MAX as u64 {
                    return Err(Error::IntOverflow { what: "i64" });
                }
                -1 - (raw as i64)
            }
        };

        self.read_definite_head()?;
        self.item_consumed();

        Ok(value)
    }

    /// Reads any native CBOR int (major type 0 or 1, the full 65-bit range).
    pub fn int(&mut self) -> Result<Int, Error> {
        let kind = self.expect(&[Type::UnsignedInt, Type::NegativeInt], "int")?;
        let (_, raw) = self.read_definite_head()?;
        self.item_consumed();

        Ok(match kind {
            Type::UnsignedInt => Int(raw as i128),
            _ => Int(-1 - raw as i128),
        })
    }

    /// Reads an arbitrary-precision integer: either a native int or a bignum
    /// under tag 2/3 (base-256 big-endian magnitude).
    pub fn bignum(&mut self) -> Result<BigInt, Error> {
        match self.datatype()? {
            Type::UnsignedInt | Type::NegativeInt => Ok(BigInt::from(i128::from(self.int()?))),
            Type::Tag => {
                let pos = self.pos;
                let tag = self.tag()?;

                if tag != TAG_POS_BIGNUM && tag != TAG_NEG_BIGNUM {
                    self.pos = pos;
                    return Err(Error::UnexpectedTag {
                        what: "bignum",
                        expected: TAG_POS_BIGNUM,
                        found: tag,
                    });
                }

                let magnitude = match self.bytes() {
                    Ok(m) => m,
                    Err(e) => {
                        self.pos = pos;
                        return Err(e);
                    }
                };

                let n = BigInt::from_biguint(Sign::Plus, BigUint::from_bytes_be(&magnitude));

                Ok(match tag {
                    TAG_POS_BIGNUM => n,
                    _ => -n - 1,
                })
            }
            found => Err(Error::TypeMismatch {
                expected: "bignum",
                found,
                pos: self.pos,
            }),
        }
    }

    fn definite_chunk(&mut self) -> Result<Vec<u8>, Error> {
        let (_, len) = self.read_definite_head()?;

        let len = usize::try_from(len).map_err(|_| Error::UnexpectedEof(self.input.len()))?;

        if self.input.len() - self.pos < len {
            return Err(Error::UnexpectedEof(self.input.len()));
        }

        let chunk = self.input[self.pos..self.pos + len].to_vec();
        self.pos += len;

        Ok(chunk)
    }

    fn indefinite_chunks(&mut self, major: u8) -> Result<Vec<u8>, Error> {
        self.pos += 1;

        let mut out = Vec::new();

        loop {
            let b = self.peek_byte()?;

            if b == 0xff {
                self.pos += 1;
                return Ok(out);
            }

            if b >> 5 != major || b & 0x1f == 31 {
                return Err(Error::InvalidValue {
                    msg: "invalid chunk inside indefinite-length string".into(),
                    pos: self.pos,
                });
            }

            let chunk = self.definite_chunk()?;
            out.extend_from_slice(&chunk);
        }
    }

    /// Reads a byte string. Chunks of an indefinite-length string are
    /// concatenated.
    pub fn bytes(&mut self) -> Result<Vec<u8>, Error> {
        let kind = self.expect(&[Type::Bytes, Type::BytesIndef], "byte string")?;
        let start = self.pos;

        let out = match kind {
            Type::Bytes => self.definite_chunk(),
            _ => self.indefinite_chunks(2),
        };

        match out {
            Ok(v) => {
                self.item_consumed();
                Ok(v)
            }
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }

    /// Reads a text string. Chunks of an indefinite-length string are
    /// concatenated before utf-8 validation.
    pub fn str(&mut self) -> Result<String, Error> {
        let kind = self.expect(&[Type::String, Type::StringIndef], "text string")?;
        let start = self.pos;

        let out = match kind {
            Type::String => self.definite_chunk(),
            _ => self.indefinite_chunks(3),
        };

        let out = out.and_then(|v| {
            String::from_utf8(v).map_err(|_| Error::InvalidValue {
                msg: "text string is not valid utf-8".into(),
                pos: start,
            })
        });

        match out {
            Ok(s) => {
                self.item_consumed();
                Ok(s)
            }
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }

    /// Opens an array scope. Returns the element count, or `None` for the
    /// indefinite-length form. Must be paired with [`Decoder::end_array`].
    pub fn array(&mut self) -> Result<Option<u64>, Error> {
        self.expect(&[Type::Array, Type::ArrayIndef], "array")?;

        if self.scopes.len() >= MAX_DEPTH {
            return Err(Error::MaxDepthExceeded { max: MAX_DEPTH });
        }

        let (_, len) = self.read_head()?;

        self.scopes.push(Scope {
            kind: ScopeKind::Array,
            remaining: len,
        });

        Ok(len)
    }

    /// Opens a map scope. Returns the entry count, or `None` for the
    /// indefinite-length form. Must be paired with [`Decoder::end_map`].
    pub fn map(&mut self) -> Result<Option<u64>, Error> {
        self.expect(&[Type::Map, Type::MapIndef], "map")?;

        if self.scopes.len() >= MAX_DEPTH {
            return Err(Error::MaxDepthExceeded { max: MAX_DEPTH });
        }

        let pos = self.pos;
        let (_, len) = self.read_head()?;

        let remaining = match len {
            Some(n) => Some(n.checked_mul(2).ok_or(Error::InvalidValue {
                msg: "map size overflows the item counter".into(),
                pos,
            })?),
            None => None,
        };

        self.scopes.push(Scope {
            kind: ScopeKind::Map,
            remaining,
        });

        Ok(len)
    }

    /// Closes the innermost array. For the definite form all declared items
    /// must have been consumed; for the indefinite form the break code must
    /// be under the cursor. Misuse is an error, never a panic.
    pub fn end_array(&mut self) -> Result<(), Error> {
        match self.scopes.last() {
            Some(Scope {
                kind: ScopeKind::Array,
                remaining,
            }) => match remaining {
                Some(0) => {
                    self.scopes.pop();
                    self.item_consumed();
                    Ok(())
                }
                Some(_) => Err(Error::InvalidValue {
                    msg: "closing array with items remaining".into(),
                    pos: self.pos,
                }),
                None => {
                    if self.peek_byte()? == 0xff {
                        self.pos += 1;
                        self.scopes.pop();
                        self.item_consumed();
                        Ok(())
                    } else {
                        Err(Error::InvalidValue {
                            msg: "expected break code to close indefinite array".into(),
                            pos: self.pos,
                        })
                    }
                }
            },
            _ => Err(Error::InvalidValue {
                msg: "no open array to close".into(),
                pos: self.pos,
            }),
        }
    }

    /// Dual of [`Decoder::end_array`] for maps.
    pub fn end_map(&mut self) -> Result<(), Error> {
        match self.scopes.last() {
            Some(Scope {
                kind: ScopeKind::Map,
                remaining,
            }) => match remaining {
                Some(0) => {
                    self.scopes.pop();
                    self.item_consumed();
                    Ok(())
                }
                Some(_) => Err(Error::InvalidValue {
                    msg: "closing map with entries remaining".into(),
                    pos: self.pos,
                }),
                None => {
                    if self.peek_byte()? == 0xff {
                        self.pos += 1;
                        self.scopes.pop();
                        self.item_consumed();
                        Ok(())
                    } else {
                        Err(Error::InvalidValue {
                            msg: "expected break code to close indefinite map".into(),
                            pos: self.pos,
                        })
                    }
                }
            },
            _ => Err(Error::InvalidValue {
                msg: "no open map to close".into(),
                pos: self.pos,
            }),
        }
    }

    /// Consumes a tag head. The tagged item that follows is read separately.
    pub fn tag(&mut self) -> Result<u64, Error> {
        self.expect(&[Type::Tag], "tag")?;
        let (_, v) = self.read_definite_head()?;

        Ok(v)
    }

    /// Reads the next tag without consuming it.
    pub fn peek_tag(&self) -> Result<u64, Error> {
        self.probe().tag()
    }

    pub fn bool(&mut self) -> Result<bool, Error> {
        self.expect(&[Type::Bool], "bool")?;
        let v = self.input[self.pos] == 0xf5;
        self.pos += 1;
        self.item_consumed();

        Ok(v)
    }

    pub fn null(&mut self) -> Result<(), Error> {
        self.expect(&[Type::Null], "null")?;
        self.pos += 1;
        self.item_consumed();

        Ok(())
    }

    pub fn undefined(&mut self) -> Result<(), Error> {
        self.expect(&[Type::Undefined], "undefined")?;
        self.pos += 1;
        self.item_consumed();

        Ok(())
    }

    pub fn simple(&mut self) -> Result<u8, Error> {
        self.expect(&[Type::Simple], "simple value")?;
        let (_, v) = self.read_definite_head()?;
        self.item_consumed();

        Ok(v as u8)
    }

    /// Reads any float width (half, single or double) as `f64`.
    pub fn f64(&mut self) -> Result<f64, Error> {
        self.expect(&[Type::Float], "float")?;

        let info = self.input[self.pos] & 0x1f;
        let trailing = 1usize << (info - 24);

        if self.input.len() - self.pos <= trailing {
            return Err(Error::UnexpectedEof(self.input.len()));
        }

        let payload = &self.input[self.pos + 1..self.pos + 1 + trailing];

        let value = match info {
            25 => half_to_f64(u16::from_be_bytes([payload[0], payload[1]])),
            26 => f32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as f64,
            _ => f64::from_be_bytes([
                payload[0], payload[1], payload[2], payload[3], payload[4], payload[5], payload[6],
                payload[7],
            ]),
        };

        self.pos += 1 + trailing;
        self.item_consumed();

        Ok(value)
    }

    /// Returns the raw bytes of the next complete data item and consumes it.
    /// This is how callers capture the original encoding of a value.
    pub fn raw_slice(&mut self) -> Result<&'b [u8], Error> {
        match self.datatype()? {
            Type::EndArray | Type::EndMap | Type::Finished => {
                return Err(Error::TypeMismatch {
                    expected: "data item",
                    found: self.datatype()?,
                    pos: self.pos,
                })
            }
            _ => {}
        }

        let end = measure_item(self.input, self.pos)?;
        let out = &self.input[self.pos..end];

        self.pos = end;
        self.item_consumed();

        Ok(out)
    }

    /// Skips the next complete data item, including all nested structure.
    /// Linear in the number of bytes consumed; bounded recursion-free walk.
    pub fn skip(&mut self) -> Result<(), Error> {
        self.raw_slice().map(|_| ())
    }

    /// Opens an array that must hold exactly `expected` elements.
    pub fn expect_array(&mut self, what: &'static str, expected: u64) -> Result<(), Error> {
        let pos = self.pos;

        match self.array()? {
            Some(n) if n == expected => Ok(()),
            found => {
                self.scopes.pop();
                self.pos = pos;
                Err(Error::InvalidArrayLength {
                    what,
                    expected,
                    found,
                })
            }
        }
    }

    /// Opens a map that must hold exactly `expected` entries.
    pub fn expect_map(&mut self, what: &'static str, expected: u64) -> Result<(), Error> {
        let pos = self.pos;

        match self.map()? {
            Some(n) if n == expected => Ok(()),
            found => {
                self.scopes.pop();
                self.pos = pos;
                Err(Error::InvalidMapLength {
                    what,
                    expected,
                    found,
                })
            }
        }
    }

    /// Closes an array, reporting leftover elements against `what`.
    pub fn expect_end_array(&mut self, what: &'static str) -> Result<(), Error> {
        match self.datatype()? {
            Type::EndArray => self.end_array(),
            _ => Err(Error::TrailingElements { what }),
        }
    }

    /// Closes a map, reporting leftover entries against `what`.
    pub fn expect_end_map(&mut self, what: &'static str) -> Result<(), Error> {
        match self.datatype()? {
            Type::EndMap => self.end_map(),
            _ => Err(Error::TrailingElements { what }),
        }
    }

    /// Consumes a tag that must equal `expected`.
    pub fn expect_tag(&mut self, what: &'static str, expected: u64) -> Result<(), Error> {
        let pos = self.pos;
        let found = self.tag()?;

        if found == expected {
            Ok(())
        } else {
            self.pos = pos;
            Err(Error::UnexpectedTag {
                what,
                expected,
                found,
            })
        }
    }
}

/// Walks one complete data item starting at `start` and returns the offset
/// one past its end. Uses an explicit stack of pending item counts, so the
/// cost is linear in the bytes walked and the recursion depth is constant.
fn measure_item(input: &[u8], start: usize) -> Result<usize, Error> {
    let mut pos = start;

    // each entry is the number of items left in an open container,
    // None for the indefinite form; the bottom entry is the item itself
    let mut stack: Vec<Option<u64>> = vec![Some(1)];

    loop {
        while let Some(Some(0)) = stack.last() {
            stack.pop();
            match stack.last_mut() {
                Some(Some(n)) => *n -= 1,
                Some(None) => {}
                None => return Ok(pos),
            }
        }

        let b = *input.get(pos).ok_or(Error::UnexpectedEof(pos))?;

        if b == 0xff {
            match stack.last() {
                Some(None) => {
                    pos += 1;
                    stack.pop();
                    match stack.last_mut() {
                        Some(Some(n)) => *n -= 1,
                        Some(None) => {}
                        None => return Ok(pos),
                    }
                }
                _ => {
                    return Err(Error::InvalidValue {
                        msg: "unexpected break code".into(),
                        pos,
                    })
                }
            }
            continue;
        }

        let (major, info) = (b >> 5, b & 0x1f);

        let (arg, head) = match info {
            n @ 0..=23 => (Some(n as u64), 1usize),
            24..=27 => {
                let trailing = 1usize << (info - 24);
                if input.len() - pos <= trailing {
                    return Err(Error::UnexpectedEof(input.len()));
                }
                let mut v: u64 = 0;
                for i in 0..trailing {
                    v = (v << 8) | input[pos + 1 + i] as u64;
                }
                (Some(v), 1 + trailing)
            }
            31 if matches!(major, 2..=5) => (None, 1usize),
            _ => {
                return Err(Error::InvalidValue {
                    msg: "reserved length code".into(),
                    pos,
                })
            }
        };

        pos += head;

        match major {
            0 | 1 | 6 | 7 => {
                // ints, simple values and floats are fully covered by their
                // head; a tag prefixes the next item without counting
                if major != 6 {
                    note_item(&mut stack);
                }
            }
            2 | 3 => match arg {
                Some(len) => {
                    let len =
                        usize::try_from(len).map_err(|_| Error::UnexpectedEof(input.len()))?;
                    if input.len() - pos < len {
                        return Err(Error::UnexpectedEof(input.len()));
                    }
                    pos += len;
                    note_item(&mut stack);
                }
                None => {
                    loop {
                        let c = *input.get(pos).ok_or(Error::UnexpectedEof(pos))?;
                        if c == 0xff {
                            pos += 1;
                            break;
                        }
                        if c >> 5 != major || c & 0x1f >= 28 {
                            return Err(Error::InvalidValue {
                                msg: "invalid chunk inside indefinite-length string".into(),
                                pos,
                            });
                        }
                        let (chunk_len, chunk_head) = match c & 0x1f {
                            n @ 0..=23 => (n as u64, 1usize),
                            i @ 24..=27 => {
                                let trailing = 1usize << (i - 24);
                                if input.len() - pos <= trailing {
                                    return Err(Error::UnexpectedEof(input.len()));
                                }
                                let mut v: u64 = 0;
                                for k in 0..trailing {
                                    v = (v << 8) | input[pos + 1 + k] as u64;
                                }
                                (v, 1 + trailing)
                            }
                            _ => unreachable!("indefinite chunk rejected above"),
                        };
                        pos += chunk_head;
                        let chunk_len = usize::try_from(chunk_len)
                            .map_err(|_| Error::UnexpectedEof(input.len()))?;
                        if input.len() - pos < chunk_len {
                            return Err(Error::UnexpectedEof(input.len()));
                        }
                        pos += chunk_len;
                    }
                    note_item(&mut stack);
                }
            },
            4 => {
                if stack.len() >= MAX_DEPTH {
                    return Err(Error::MaxDepthExceeded { max: MAX_DEPTH });
                }
                stack.push(arg);
            }
            5 => {
                if stack.len() >= MAX_DEPTH {
                    return Err(Error::MaxDepthExceeded { max: MAX_DEPTH });
                }
                let entries = match arg {
                    Some(n) => Some(n.checked_mul(2).ok_or(Error::InvalidValue {
                        msg: "map size overflows the item counter".into(),
                        pos,
                    })?),
                    None => None,
                };
                stack.push(entries);
            }
            _ => unreachable!("three-bit major type"),
        }
    }
}

fn note_item(stack: &mut [Option<u64>]) {
    if let Some(Some(n)) = stack.last_mut() {
        *n -= 1;
    }
}

/// Half-precision decode per RFC 8949 appendix D.
fn half_to_f64(h: u16) -> f64 {
    let exp = (h >> 10) & 0x1f;
    let mant = (h & 0x3ff) as f64;

    let value = match exp {
        0 => mant * (-24f64).exp2(),
        31 => {
            if mant == 0.0 {
                f64::INFINITY
            } else {
                f64::NAN
            }
        }
        _ => (mant + 1024.0) * f64::from(exp as i32 - 25).exp2(),
    };

    if h & 0x8000 != 0 {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder(hex_str: &str) -> Decoder<'static> {
        let bytes = hex::decode(hex_str).unwrap();
        Decoder::new(Box::leak(bytes.into_boxed_slice()))
    }

    #[test]
    fn uints_of_every_width() {
        let mut d = decoder("00");
        assert_eq!(d.u64().unwrap(), 0);

        let mut d = decoder("17");
        assert_eq!(d.u64().unwrap(), 23);

        let mut d = decoder("1818");
        assert_eq!(d.u64().unwrap(), 24);

        let mut d = decoder("190100");
        assert_eq!(d.u64().unwrap(), 256);

        let mut d = decoder("1a00010000");
        assert_eq!(d.u64().unwrap(), 65536);

        let mut d = decoder("1bffffffffffffffff");
        assert_eq!(d.u64().unwrap(), u64::MAX);
    }

    #[test]
    fn negative_ints() {
        let mut d = decoder("20");
        assert_eq!(d.i64().unwrap(), -1);

        let mut d = decoder("3903e7");
        assert_eq!(d.i64().unwrap(), -1000);

        let mut d = decoder("3b7fffffffffffffff");
        assert_eq!(d.i64().unwrap(), i64::MIN);

        // one below i64::MIN still reads through the 65-bit path
        let mut d = decoder("3b8000000000000000");
        assert!(matches!(d.i64(), Err(Error::IntOverflow { .. })));

        let mut d = decoder("3b8000000000000000");
        assert_eq!(i128::from(d.int().unwrap()), -(1i128 << 63) - 1);
    }

    #[test]
    fn indefinite_bytestring_concatenates_chunks() {
        // (_ h'0102', h'030405')
        let mut d = decoder("5f42010243030405ff");
        assert_eq!(d.datatype().unwrap(), Type::BytesIndef);
        assert_eq!(d.bytes().unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(d.datatype().unwrap(), Type::Finished);
    }

    #[test]
    fn definite_scopes_report_their_end() {
        // [1, [2, 3]]
        let mut d = decoder("8201820203");
        assert_eq!(d.array().unwrap(), Some(2));
        assert_eq!(d.u64().unwrap(), 1);
        assert_eq!(d.array().unwrap(), Some(2));
        assert_eq!(d.u64().unwrap(), 2);
        assert_eq!(d.u64().unwrap(), 3);
        assert_eq!(d.datatype().unwrap(), Type::EndArray);
        d.end_array().unwrap();
        assert_eq!(d.datatype().unwrap(), Type::EndArray);
        d.end_array().unwrap();
        assert_eq!(d.datatype().unwrap(), Type::Finished);
    }

    #[test]
    fn closing_early_is_an_error_not_a_panic() {
        let mut d = decoder("820102");
        d.array().unwrap();
        assert!(matches!(d.end_array(), Err(Error::InvalidValue { .. })));

        // the cursor is still usable after the failed close
        assert_eq!(d.u64().unwrap(), 1);
        assert_eq!(d.u64().unwrap(), 2);
        d.end_array().unwrap();
    }

    #[test]
    fn indefinite_containers_close_on_break() {
        // {_ 1: 2}
        let mut d = decoder("bf0102ff");
        assert_eq!(d.map().unwrap(), None);
        assert_eq!(d.u64().unwrap(), 1);
        assert_eq!(d.u64().unwrap(), 2);
        assert_eq!(d.datatype().unwrap(), Type::EndMap);
        d.end_map().unwrap();
        assert_eq!(d.datatype().unwrap(), Type::Finished);
    }

    #[test]
    fn skip_walks_nested_structure() {
        // [[1, [2]], {3: 4}], then 5
        let mut d = decoder("8282018102a1030405");
        d.skip().unwrap();
        assert_eq!(d.u64().unwrap(), 5);
        assert_eq!(d.datatype().unwrap(), Type::Finished);
    }

    #[test]
    fn skip_terminates_on_truncated_input() {
        let mut d = decoder("8282018102a103");
        assert!(matches!(d.skip(), Err(Error::UnexpectedEof(_))));
        assert_eq!(d.position(), 0);
    }

    #[test]
    fn raw_slice_returns_the_exact_item() {
        let mut d = decoder("820182020300");
        assert_eq!(d.raw_slice().unwrap(), hex::decode("8201820203").unwrap());
        assert_eq!(d.u64().unwrap(), 0);
    }

    #[test]
    fn bignum_tags() {
        // 18446744073709551616 = 2^64, tag 2
        let mut d = decoder("c249010000000000000000");
        assert_eq!(
            d.bignum().unwrap(),
            BigInt::from(u64::MAX) + BigInt::from(1u8)
        );

        // -18446744073709551617 = -2 - u64::MAX, tag 3
        let mut d = decoder("c349010000000000000000");
        assert_eq!(
            d.bignum().unwrap(),
            -(BigInt::from(u64::MAX) + BigInt::from(2u8))
        );

        // plain ints read through the same entry point
        let mut d = decoder("187b");
        assert_eq!(d.bignum().unwrap(), BigInt::from(123u8));
    }

    #[test]
    fn huge_definite_array_header_is_accepted() {
        // array header declaring 2^32 elements; only the header is read
        let mut d = decoder("9b0000000100000000");
        assert_eq!(d.array().unwrap(), Some(1 << 32));
    }

    #[test]
    fn errors_leave_the_cursor_at_the_offending_byte() {
        let mut d = decoder("61ff");
        assert!(d.str().is_err());
        assert_eq!(d.position(), 0);

        let mut d = decoder("ff");
        assert!(d.datatype().is_err());
        assert_eq!(d.position(), 0);
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut bytes = vec![0x81u8; 300];
        bytes.push(0x00);

        let mut d = Decoder::new(&bytes);
        let mut result = Ok(());

        for _ in 0..300 {
            if let Err(e) = d.array().map(|_| ()) {
                result = Err(e);
                break;
            }
        }

        assert!(matches!(result, Err(Error::MaxDepthExceeded { .. })));

        let mut d = Decoder::new(&bytes);
        assert!(matches!(d.skip(), Err(Error::MaxDepthExceeded { .. })));
    }

    #[test]
    fn simple_values_read_back() {
        let mut d = decoder("f0");
        assert_eq!(d.datatype().unwrap(), Type::Simple);
        assert_eq!(d.simple().unwrap(), 16);

        let mut d = decoder("f8ff");
        assert_eq!(d.simple().unwrap(), 255);
    }

    #[test]
    fn map_validator_checks_the_entry_count() {
        let mut d = decoder("a10102");
        d.expect_map("pairs", 1).unwrap();
        assert_eq!(d.u64().unwrap(), 1);
        assert_eq!(d.u64().unwrap(), 2);
        d.expect_end_map("pairs").unwrap();

        let mut d = decoder("a10102");
        assert!(matches!(
            d.expect_map("pairs", 2),
            Err(Error::InvalidMapLength { .. })
        ));
    }

    #[test]
    fn floats_of_every_width() {
        let mut d = decoder("f93c00");
        assert_eq!(d.f64().unwrap(), 1.0);

        let mut d = decoder("fa47c35000");
        assert_eq!(d.f64().unwrap(), 100000.0);

        let mut d = decoder("fb3ff199999999999a");
        assert_eq!(d.f64().unwrap(), 1.1);
    }

    #[test]
    fn validators_report_the_symbolic_name() {
        let mut d = decoder("8201");
        let err = d.expect_array("redeemer", 4).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArrayLength {
                what: "redeemer",
                expected: 4,
                found: Some(2),
            }
        );

        let mut d = decoder("d87a80");
        let err = d.expect_tag("rational", 30).unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedTag {
                what: "rational",
                expected: 30,
                found: 122,
            }
        );
    }
}
