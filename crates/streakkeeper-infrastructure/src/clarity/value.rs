//! Consensus serialization of Clarity values.

use super::c32::{c32_address, c32_address_decode, C32Error};

const TYPE_INT: u8 = 0x00;
const TYPE_UINT: u8 = 0x01;
const TYPE_BUFFER: u8 = 0x02;
const TYPE_TRUE: u8 = 0x03;
const TYPE_FALSE: u8 = 0x04;
const TYPE_STANDARD_PRINCIPAL: u8 = 0x05;
const TYPE_CONTRACT_PRINCIPAL: u8 = 0x06;
const TYPE_RESPONSE_OK: u8 = 0x07;
const TYPE_RESPONSE_ERR: u8 = 0x08;
const TYPE_OPTIONAL_NONE: u8 = 0x09;
const TYPE_OPTIONAL_SOME: u8 = 0x0a;
const TYPE_LIST: u8 = 0x0b;
const TYPE_TUPLE: u8 = 0x0c;
const TYPE_STRING_ASCII: u8 = 0x0d;
const TYPE_STRING_UTF8: u8 = 0x0e;

/// Nesting bound for decoding untrusted payloads
const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClarityError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEnd(usize),

    #[error("unknown type prefix 0x{0:02x}")]
    UnknownType(u8),

    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    #[error("invalid utf-8 in string value")]
    InvalidUtf8,

    #[error("invalid hex payload: {0}")]
    InvalidHex(String),

    #[error("value nested too deeply")]
    TooDeep,

    #[error("name of {0} bytes does not fit a one-byte length prefix")]
    NameTooLong(usize),

    #[error("principal error: {0}")]
    Principal(#[from] C32Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardPrincipal {
    pub version: u8,
    pub hash160: [u8; 20],
}

impl StandardPrincipal {
    pub fn from_address(address: &str) -> Result<Self, C32Error> {
        let (version, hash160) = c32_address_decode(address)?;
        Ok(Self { version, hash160 })
    }

    pub fn to_address(&self) -> Result<String, C32Error> {
        c32_address(self.version, &self.hash160)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClarityValue {
    Int(i128),
    UInt(u128),
    Buffer(Vec<u8>),
    Bool(bool),
    StandardPrincipal(StandardPrincipal),
    ContractPrincipal(StandardPrincipal, String),
    ResponseOk(Box<ClarityValue>),
    ResponseErr(Box<ClarityValue>),
    OptionalNone,
    OptionalSome(Box<ClarityValue>),
    List(Vec<ClarityValue>),
    /// Fields in serialized (sorted) order
    Tuple(Vec<(String, ClarityValue)>),
    StringAscii(String),
    StringUtf8(String),
}

impl ClarityValue {
    pub fn principal(address: &str) -> Result<Self, C32Error> {
        StandardPrincipal::from_address(address).map(ClarityValue::StandardPrincipal)
    }

    /// Look up a tuple field by name
    pub fn field(&self, name: &str) -> Option<&ClarityValue> {
        match self {
            ClarityValue::Tuple(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u128> {
        match self {
            ClarityValue::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClarityValue::StringAscii(s) | ClarityValue::StringUtf8(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ClarityValue::Int(_) => "int",
            ClarityValue::UInt(_) => "uint",
            ClarityValue::Buffer(_) => "buffer",
            ClarityValue::Bool(_) => "bool",
            ClarityValue::StandardPrincipal(_) => "principal",
            ClarityValue::ContractPrincipal(_, _) => "contract-principal",
            ClarityValue::ResponseOk(_) => "ok",
            ClarityValue::ResponseErr(_) => "err",
            ClarityValue::OptionalNone => "none",
            ClarityValue::OptionalSome(_) => "some",
            ClarityValue::List(_) => "list",
            ClarityValue::Tuple(_) => "tuple",
            ClarityValue::StringAscii(_) => "string-ascii",
            ClarityValue::StringUtf8(_) => "string-utf8",
        }
    }

    /// Fails only when a tuple field or contract name exceeds 255 bytes
    pub fn serialize(&self) -> Result<Vec<u8>, ClarityError> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// `0x`-prefixed hex, the form the node API expects for arguments
    pub fn to_hex(&self) -> Result<String, ClarityError> {
        Ok(format!("0x{}", hex::encode(self.serialize()?)))
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<(), ClarityError> {
        match self {
            ClarityValue::Int(v) => {
                out.push(TYPE_INT);
                out.extend_from_slice(&v.to_be_bytes());
            }
            ClarityValue::UInt(v) => {
                out.push(TYPE_UINT);
                out.extend_from_slice(&v.to_be_bytes());
            }
            ClarityValue::Buffer(bytes) => {
                out.push(TYPE_BUFFER);
                write_len_prefixed(out, bytes);
            }
            ClarityValue::Bool(true) => out.push(TYPE_TRUE),
            ClarityValue::Bool(false) => out.push(TYPE_FALSE),
            ClarityValue::StandardPrincipal(p) => {
                out.push(TYPE_STANDARD_PRINCIPAL);
                write_principal(out, p);
            }
            ClarityValue::ContractPrincipal(p, name) => {
                out.push(TYPE_CONTRACT_PRINCIPAL);
                write_principal(out, p);
                write_name(out, name)?;
            }
            ClarityValue::ResponseOk(inner) => {
                out.push(TYPE_RESPONSE_OK);
                inner.write_to(out)?;
            }
            ClarityValue::ResponseErr(inner) => {
                out.push(TYPE_RESPONSE_ERR);
                inner.write_to(out)?;
            }
            ClarityValue::OptionalNone => out.push(TYPE_OPTIONAL_NONE),
            ClarityValue::OptionalSome(inner) => {
                out.push(TYPE_OPTIONAL_SOME);
                inner.write_to(out)?;
            }
            ClarityValue::List(items) => {
                out.push(TYPE_LIST);
                out.extend_from_slice(&(items.len() as u32).to_be_bytes());
                for item in items {
                    item.write_to(out)?;
                }
            }
            ClarityValue::Tuple(fields) => {
                out.push(TYPE_TUPLE);
                out.extend_from_slice(&(fields.len() as u32).to_be_bytes());
                for (name, value) in fields {
                    write_name(out, name)?;
                    value.write_to(out)?;
                }
            }
            ClarityValue::StringAscii(s) => {
                out.push(TYPE_STRING_ASCII);
                write_len_prefixed(out, s.as_bytes());
            }
            ClarityValue::StringUtf8(s) => {
                out.push(TYPE_STRING_UTF8);
                write_len_prefixed(out, s.as_bytes());
            }
        }
        Ok(())
    }

    /// Decode exactly one value; trailing bytes are an error
    pub fn deserialize(bytes: &[u8]) -> Result<Self, ClarityError> {
        let mut reader = Reader { bytes, pos: 0 };
        let value = reader.read_value(0)?;

        let remaining = bytes.len() - reader.pos;
        if remaining > 0 {
            return Err(ClarityError::TrailingBytes(remaining));
        }
        Ok(value)
    }

    /// Accepts hex with or without the `0x` prefix
    pub fn from_hex(input: &str) -> Result<Self, ClarityError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|e| ClarityError::InvalidHex(e.to_string()))?;
        Self::deserialize(&bytes)
    }
}

fn write_len_prefixed(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
}

fn write_principal(out: &mut Vec<u8>, principal: &StandardPrincipal) {
    out.push(principal.version);
    out.extend_from_slice(&principal.hash160);
}

fn write_name(out: &mut Vec<u8>, name: &str) -> Result<(), ClarityError> {
    let bytes = name.as_bytes();
    let len = u8::try_from(bytes.len()).map_err(|_| ClarityError::NameTooLong(bytes.len()))?;
    out.push(len);
    out.extend_from_slice(bytes);
    Ok(())
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], ClarityError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(ClarityError::UnexpectedEnd(self.pos))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, ClarityError> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32, ClarityError> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_be_bytes(buf))
    }

    fn read_16(&mut self) -> Result<[u8; 16], ClarityError> {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(self.take(16)?);
        Ok(buf)
    }

    fn read_principal(&mut self) -> Result<StandardPrincipal, ClarityError> {
        let version = self.read_u8()?;
        let mut hash160 = [0u8; 20];
        hash160.copy_from_slice(self.take(20)?);
        Ok(StandardPrincipal { version, hash160 })
    }

    fn read_name(&mut self) -> Result<String, ClarityError> {
        let len = self.read_u8()? as usize;
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec()).map_err(|_| ClarityError::InvalidUtf8)
    }

    fn read_string(&mut self) -> Result<String, ClarityError> {
        let len = self.read_u32()? as usize;
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec()).map_err(|_| ClarityError::InvalidUtf8)
    }

    fn read_value(&mut self, depth: usize) -> Result<ClarityValue, ClarityError> {
        if depth > MAX_DEPTH {
            return Err(ClarityError::TooDeep);
        }

        let prefix = self.read_u8()?;
        let value = match prefix {
            TYPE_INT => ClarityValue::Int(i128::from_be_bytes(self.read_16()?)),
            TYPE_UINT => ClarityValue::UInt(u128::from_be_bytes(self.read_16()?)),
            TYPE_BUFFER => {
                let len = self.read_u32()? as usize;
                ClarityValue::Buffer(self.take(len)?.to_vec())
            }
            TYPE_TRUE => ClarityValue::Bool(true),
            TYPE_FALSE => ClarityValue::Bool(false),
            TYPE_STANDARD_PRINCIPAL => ClarityValue::StandardPrincipal(self.read_principal()?),
            TYPE_CONTRACT_PRINCIPAL => {
                let principal = self.read_principal()?;
                let name = self.read_name()?;
                ClarityValue::ContractPrincipal(principal, name)
            }
            TYPE_RESPONSE_OK => ClarityValue::ResponseOk(Box::new(self.read_value(depth + 1)?)),
            TYPE_RESPONSE_ERR => ClarityValue::ResponseErr(Box::new(self.read_value(depth + 1)?)),
            TYPE_OPTIONAL_NONE => ClarityValue::OptionalNone,
            TYPE_OPTIONAL_SOME => {
                ClarityValue::OptionalSome(Box::new(self.read_value(depth + 1)?))
            }
            TYPE_LIST => {
                let len = self.read_u32()? as usize;
                // Each item is at least one byte; cap the allocation by what is left
                let mut items = Vec::with_capacity(len.min(self.bytes.len() - self.pos));
                for _ in 0..len {
                    items.push(self.read_value(depth + 1)?);
                }
                ClarityValue::List(items)
            }
            TYPE_TUPLE => {
                let len = self.read_u32()? as usize;
                let mut fields = Vec::with_capacity(len.min(self.bytes.len() - self.pos));
                for _ in 0..len {
                    let name = self.read_name()?;
                    let value = self.read_value(depth + 1)?;
                    fields.push((name, value));
                }
                ClarityValue::Tuple(fields)
            }
            TYPE_STRING_ASCII => ClarityValue::StringAscii(self.read_string()?),
            TYPE_STRING_UTF8 => ClarityValue::StringUtf8(self.read_string()?),
            other => return Err(ClarityError::UnknownType(other)),
        };

        Ok(value)
    }
}
