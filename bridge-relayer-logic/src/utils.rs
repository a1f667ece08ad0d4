use std::str::FromStr;

use alloy::primitives::{Bytes, U256};
use anyhow::{Context, anyhow};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Deserializer, de};
use serde_json::value::RawValue;

/// Parses an integer encoded either as a decimal string or as a `0x`-prefixed hex string.
pub fn parse_u256(value: &str) -> anyhow::Result<U256> {
    let value = value.trim();
    if let Some(hex_str) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        if hex_str.is_empty() {
            return Ok(U256::ZERO);
        }
        return U256::from_str_radix(hex_str, 16)
            .with_context(|| format!("invalid hex integer: {value}"));
    }
    U256::from_str(value).with_context(|| format!("invalid decimal integer: {value}"))
}

/// Decodes a message payload. The indexer emits Go `[]byte` values as base64,
/// while chain tooling uses `0x` hex; both are accepted.
pub fn parse_payload(value: &str) -> anyhow::Result<Bytes> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Bytes::new());
    }
    if let Some(hex_str) = value.strip_prefix("0x") {
        let bytes = hex::decode(hex_str).context("failed to decode hex payload")?;
        return Ok(bytes.into());
    }
    BASE64
        .decode(value)
        .map(Bytes::from)
        .map_err(|e| anyhow!("payload is neither hex nor base64: {e}"))
}

/// Reads an integer from its JSON text. Bare numbers are taken digit for digit, so
/// values wider than u64 survive; `null` and `""` mean "absent".
pub fn u256_from_raw_json(raw: &RawValue) -> anyhow::Result<Option<U256>> {
    let text = raw.get().trim();
    if text == "null" {
        return Ok(None);
    }
    if text.starts_with('"') {
        let value: String =
            serde_json::from_str(text).with_context(|| format!("invalid JSON string: {text}"))?;
        if value.trim().is_empty() {
            return Ok(None);
        }
        return parse_u256(&value).map(Some);
    }
    parse_u256(text).map(Some)
}

pub fn deserialize_u256<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    u256_from_raw_json(&raw)
        .and_then(|value| value.ok_or_else(|| anyhow!("integer value is required")))
        .map_err(|e| de::Error::custom(format!("{e:#}")))
}

pub fn deserialize_opt_u256<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Box<RawValue>>::deserialize(deserializer)? {
        Some(raw) => u256_from_raw_json(&raw).map_err(|e| de::Error::custom(format!("{e:#}"))),
        None => Ok(None),
    }
}

pub fn deserialize_payload<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        Some(value) => parse_payload(&value).map_err(|e| de::Error::custom(format!("{e:#}"))),
        None => Ok(Bytes::new()),
    }
}
