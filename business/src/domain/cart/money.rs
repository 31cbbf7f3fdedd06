//! Serde helpers for currency amounts.
//!
//! Amounts are written as JSON numbers carrying the exact decimal digits
//! (trailing zeros dropped, so `20.00` is written `20`) and read back from
//! either numbers or numeric strings, since the catalog stores prices as text.
//! Both directions work on the raw JSON text, so an amount never passes
//! through a float on its way to or from storage.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
use serde_json::value::RawValue;

/// Converts a float into a decimal using its shortest round-trip representation,
/// so `9.99` becomes exactly `9.99` rather than its binary approximation.
///
/// Returns `None` for non-finite floats and for magnitudes a decimal cannot hold.
pub fn amount_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    parse_amount(&value.to_string()).ok()
}

/// Parses a textual amount, plain or in exponent form. Blank text counts as zero.
pub fn parse_amount(text: &str) -> Result<Decimal, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let parsed = if trimmed.contains(['e', 'E']) {
        Decimal::from_scientific(trimmed)
    } else {
        Decimal::from_str(trimmed)
    };
    parsed.map_err(|_| format!("cart.invalid_amount: {}", trimmed))
}

fn decode(raw: &RawValue) -> Result<Decimal, String> {
    let text = raw.get();
    if text.starts_with('"') {
        let inner: String = serde_json::from_str(text).map_err(|err| err.to_string())?;
        return parse_amount(&inner);
    }
    parse_amount(text)
}

pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    RawValue::from_string(amount.normalize().to_string())
        .map_err(ser::Error::custom)?
        .serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = <Box<RawValue>>::deserialize(deserializer)?;
    decode(&raw).map_err(de::Error::custom)
}
