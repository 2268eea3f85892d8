//! c32check address codec used by Stacks principals.

use sha2::{Digest, Sha256};

const C32_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

pub const MAINNET_SINGLE_SIG: u8 = 22;
pub const MAINNET_MULTI_SIG: u8 = 20;
pub const TESTNET_SINGLE_SIG: u8 = 26;
pub const TESTNET_MULTI_SIG: u8 = 21;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum C32Error {
    #[error("invalid c32 character '{0}'")]
    InvalidCharacter(char),

    #[error("address must start with 'S' followed by a version character")]
    InvalidPrefix,

    #[error("decoded payload has {0} bytes, expected 24")]
    InvalidLength(usize),

    #[error("address checksum mismatch")]
    ChecksumMismatch,

    #[error("version {0} does not fit in one c32 character")]
    InvalidVersion(u8),
}

fn c32_digit(c: char) -> Result<u8, C32Error> {
    let normalized = match c.to_ascii_uppercase() {
        'O' => '0',
        'I' | 'L' => '1',
        other => other,
    };

    C32_ALPHABET
        .iter()
        .position(|&b| b as char == normalized)
        .map(|p| p as u8)
        .ok_or(C32Error::InvalidCharacter(c))
}

/// Encode bytes as c32, one leading '0' per leading zero byte
pub fn c32_encode(input: &[u8]) -> String {
    let mut result: Vec<u8> = Vec::with_capacity(input.len() * 8 / 5 + 1);
    let mut carry: u8 = 0;
    let mut carry_bits: u8 = 0;

    for &byte in input.iter().rev() {
        let low_bits_to_take = 5 - carry_bits;
        let low_bits = byte & ((1u8 << low_bits_to_take) - 1);
        let value = (low_bits << carry_bits) + carry;
        result.push(C32_ALPHABET[value as usize]);

        carry_bits = (8 + carry_bits) - 5;
        carry = byte >> (8 - carry_bits);

        if carry_bits >= 5 {
            result.push(C32_ALPHABET[(carry & 0x1f) as usize]);
            carry_bits -= 5;
            carry >>= 5;
        }
    }

    if carry_bits > 0 {
        result.push(C32_ALPHABET[carry as usize]);
    }

    while result.last() == Some(&C32_ALPHABET[0]) {
        result.pop();
    }

    for &byte in input {
        if byte != 0 {
            break;
        }
        result.push(C32_ALPHABET[0]);
    }

    result.reverse();
    result.into_iter().map(char::from).collect()
}

pub fn c32_decode(input: &str) -> Result<Vec<u8>, C32Error> {
    let digits = input
        .chars()
        .map(c32_digit)
        .collect::<Result<Vec<u8>, C32Error>>()?;

    let mut result: Vec<u8> = Vec::with_capacity(digits.len() * 5 / 8 + 1);
    let mut carry: u16 = 0;
    let mut carry_bits: u16 = 0;

    for &digit in digits.iter().rev() {
        carry += (digit as u16) << carry_bits;
        carry_bits += 5;

        if carry_bits >= 8 {
            result.push((carry & 0xff) as u8);
            carry_bits -= 8;
            carry >>= 8;
        }
    }

    if carry_bits > 0 {
        result.push(carry as u8);
    }

    while result.last() == Some(&0) {
        result.pop();
    }

    for &digit in &digits {
        if digit != 0 {
            break;
        }
        result.push(0);
    }

    result.reverse();
    Ok(result)
}

fn checksum(version: u8, hash160: &[u8]) -> [u8; 4] {
    let mut hasher = Sha256::new();
    hasher.update([version]);
    hasher.update(hash160);
    let first = hasher.finalize();
    let second = Sha256::digest(first);

    let mut out = [0u8; 4];
    out.copy_from_slice(&second[..4]);
    out
}

/// Render a principal as `S{version}{c32(hash160 ++ checksum)}`
pub fn c32_address(version: u8, hash160: &[u8; 20]) -> Result<String, C32Error> {
    if version >= 32 {
        return Err(C32Error::InvalidVersion(version));
    }

    let mut payload = hash160.to_vec();
    payload.extend_from_slice(&checksum(version, hash160));

    Ok(format!(
        "S{}{}",
        C32_ALPHABET[version as usize] as char,
        c32_encode(&payload)
    ))
}

/// Parse an address into its version byte and hash160, verifying the checksum
pub fn c32_address_decode(address: &str) -> Result<(u8, [u8; 20]), C32Error> {
    let address = address.trim();
    let mut chars = address.chars();

    match chars.next() {
        Some('S') | Some('s') => {}
        _ => return Err(C32Error::InvalidPrefix),
    }
    let version = chars.next().ok_or(C32Error::InvalidPrefix).and_then(c32_digit)?;

    let payload = c32_decode(chars.as_str())?;
    if payload.len() != 24 {
        return Err(C32Error::InvalidLength(payload.len()));
    }

    let (hash, check) = payload.split_at(20);
    if checksum(version, hash) != check {
        return Err(C32Error::ChecksumMismatch);
    }

    let mut hash160 = [0u8; 20];
    hash160.copy_from_slice(hash);
    Ok((version, hash160))
}
