//! Decimal reward strings to integer base units (18-decimal fixed point).

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

pub const REWARD_DECIMALS: u32 = 18;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RewardError {
    #[error("reward amount {0} exceeds the representable range")]
    OutOfRange(String),
}

/// Keep only ASCII digits and `.`.
pub fn sanitize_amount(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Convert a decimal reward string to base units.
///
/// Non-numeric characters are stripped first. Empty or malformed amounts are
/// zero. Fractional digits past the 18th are truncated, never rounded.
pub fn to_base_units(raw: &str) -> Result<u128, RewardError> {
    let cleaned = sanitize_amount(raw);
    let Some(normalized) = normalize(&cleaned) else {
        debug!(raw, "reward amount not a decimal, treating as zero");
        return Ok(0);
    };

    let value = Decimal::from_str_exact(&normalized)
        .map_err(|_| RewardError::OutOfRange(raw.to_string()))?;
    let mantissa = u128::try_from(value.mantissa())
        .map_err(|_| RewardError::OutOfRange(raw.to_string()))?;

    // `normalize` caps the fraction, so the scale never exceeds REWARD_DECIMALS.
    10u128
        .checked_pow(REWARD_DECIMALS.saturating_sub(value.scale()))
        .and_then(|factor| mantissa.checked_mul(factor))
        .ok_or_else(|| RewardError::OutOfRange(raw.to_string()))
}

/// Shape check on a sanitized amount: at least one digit and at most one
/// point. Returns `whole[.fraction]` with the fraction cut to
/// [`REWARD_DECIMALS`] digits and its trailing zeros dropped.
fn normalize(cleaned: &str) -> Option<String> {
    if !cleaned.chars().any(|c| c.is_ascii_digit()) || cleaned.matches('.').count() > 1 {
        return None;
    }
    let (whole, fraction) = cleaned.split_once('.').unwrap_or((cleaned, ""));
    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = &fraction[..fraction.len().min(REWARD_DECIMALS as usize)];
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        Some(whole.to_string())
    } else {
        Some(format!("{whole}.{fraction}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn whole_and_fractional_amounts() {
        assert_eq!(to_base_units("1"), Ok(ONE));
        assert_eq!(to_base_units("1.5"), Ok(ONE + ONE / 2));
        assert_eq!(to_base_units("0.000000000000000001"), Ok(1));
        assert_eq!(to_base_units(".25"), Ok(ONE / 4));
        assert_eq!(to_base_units("2."), Ok(2 * ONE));
    }

    #[test]
    fn strips_units_and_separators() {
        assert_eq!(to_base_units(" 1.5 BNB "), Ok(ONE + ONE / 2));
        assert_eq!(to_base_units("1,000"), Ok(1000 * ONE));
    }

    #[test]
    fn empty_or_malformed_is_zero() {
        assert_eq!(to_base_units(""), Ok(0));
        assert_eq!(to_base_units("BNB"), Ok(0));
        assert_eq!(to_base_units("."), Ok(0));
        assert_eq!(to_base_units("1.2.3"), Ok(0));
    }

    #[test]
    fn negative_sign_is_stripped() {
        assert_eq!(to_base_units("-3"), Ok(3 * ONE));
    }

    #[test]
    fn excess_precision_is_truncated() {
        assert_eq!(to_base_units("0.0000000000000000019"), Ok(1));
    }

    #[test]
    fn long_fractions_never_round_up() {
        assert_eq!(to_base_units("0.99999999999999999999999999999"), Ok(ONE - 1));
        assert_eq!(to_base_units(&format!("1.{}", "9".repeat(29))), Ok(2 * ONE - 1));
        assert_eq!(to_base_units("12.50000000000000000000000000001"), Ok(12 * ONE + ONE / 2));
    }

    #[test]
    fn huge_amounts_are_rejected() {
        assert!(matches!(
            to_base_units("1000000000000000000000000"),
            Err(RewardError::OutOfRange(_))
        ));
    }
}
