//! Encoded hash format.
//!
//! ```text
//! $<variant>$v=<version>$m=<memory_cost>,t=<time_cost>,p=<parallelism>$<salt>$<key>
//! ```
//!
//! Salt and key use standard base64 without padding. Decoding is all or
//! nothing: any deviation from this layout is a [`HashError::Format`].

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

use crate::error::{HashError, Result};
use crate::kdf::DerivedKey;
use crate::params::{HashParameters, Variant};

const FIELD_COUNT: usize = 6;

/// A fully parsed stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHash {
    /// Parameters embedded in the record. `salt_length` and `key_length`
    /// are the decoded byte lengths.
    pub params: HashParameters,
    pub salt: Vec<u8>,
    pub key: Vec<u8>,
}

/// Render the canonical encoded form.
pub fn encode(params: &HashParameters, salt: &[u8], key: &[u8]) -> String {
    format!(
        "${}$v={}$m={},t={},p={}${}${}",
        params.variant(),
        params.version(),
        params.memory_cost(),
        params.time_cost(),
        params.parallelism(),
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(key)
    )
}

pub(crate) fn encode_key(params: &HashParameters, salt: &[u8], key: &DerivedKey) -> String {
    encode(params, salt, key.as_bytes())
}

/// Parse an encoded hash.
pub fn decode(encoded: &str) -> Result<DecodedHash> {
    let fields: Vec<&str> = encoded.split('$').collect();
    if fields.len() != FIELD_COUNT {
        return Err(HashError::Format(format!(
            "Expected {} '$'-delimited fields, found {}",
            FIELD_COUNT,
            fields.len()
        )));
    }
    if !fields[0].is_empty() {
        return Err(HashError::Format(
            "Encoded hash must start with '$'".to_string(),
        ));
    }

    let variant: Variant = fields[1]
        .parse()
        .map_err(|_| HashError::Format(format!("Unknown variant \"{}\"", fields[1])))?;

    let version = fields[2]
        .strip_prefix("v=")
        .ok_or_else(|| HashError::Format("Version field must be v=<number>".to_string()))
        .and_then(|value| parse_uint("version", value))?;

    let (memory_cost, time_cost, parallelism) = parse_cost_block(fields[3])?;

    let salt = decode_b64("salt", fields[4])?;
    let key = decode_b64("key", fields[5])?;

    let params = HashParameters::new(
        variant,
        version,
        memory_cost,
        time_cost,
        parallelism,
        key.len(),
        salt.len(),
    )
    .map_err(|e| HashError::Format(format!("Invalid embedded parameters: {}", e)))?;

    Ok(DecodedHash { params, salt, key })
}

/// Parse `m=<uint>,t=<uint>,p=<uint>`, in that order and nothing else.
fn parse_cost_block(block: &str) -> Result<(u32, u32, u32)> {
    let parts: Vec<&str> = block.split(',').collect();
    let [m, t, p] = parts.as_slice() else {
        return Err(HashError::Format(
            "Parameter block must be m=<number>,t=<number>,p=<number>".to_string(),
        ));
    };

    let field = |part: &str, prefix: &str, name: &str| -> Result<u32> {
        let value = part.strip_prefix(prefix).ok_or_else(|| {
            HashError::Format(format!("Parameter block is missing {}", prefix))
        })?;
        parse_uint(name, value)
    };

    Ok((
        field(*m, "m=", "memory cost")?,
        field(*t, "t=", "time cost")?,
        field(*p, "p=", "parallelism")?,
    ))
}

/// Unsigned decimal, ASCII digits only. Rejects signs and whitespace that
/// `str::parse` alone would let through, and leading zeros so that only the
/// canonical spelling decodes.
fn parse_uint(name: &str, value: &str) -> Result<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HashError::Format(format!(
            "{} must be an unsigned integer (got \"{}\")",
            name, value
        )));
    }
    if value.len() > 1 && value.starts_with('0') {
        return Err(HashError::Format(format!(
            "{} has a leading zero (got \"{}\")",
            name, value
        )));
    }
    value
        .parse::<u32>()
        .map_err(|_| HashError::Format(format!("{} is out of range (got \"{}\")", name, value)))
}

fn decode_b64(name: &str, value: &str) -> Result<Vec<u8>> {
    if value.is_empty() {
        return Err(HashError::Format(format!("{} segment is empty", name)));
    }
    STANDARD_NO_PAD
        .decode(value)
        .map_err(|e| HashError::Format(format!("Invalid base64 in {}: {}", name, e)))
}
