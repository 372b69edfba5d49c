//! Marketplace currency amounts with 18-decimal fixed-point precision.
//!
//! Amounts are stored as wei (base units, 10^-18 GEM) in a `u128`. Parsing
//! from a decimal string and formatting back are exact and invertible for
//! any value with at most 18 fractional digits; floating point is never
//! involved.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::{GEM_DECIMALS, WEI_PER_GEM};

/// A non-negative amount of the marketplace currency.
///
/// Internally stored as wei (1 GEM = 10^18 wei).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u128);

impl Amount {
    /// Zero GEM.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount (`u128::MAX` wei).
    pub const MAX: Self = Self(u128::MAX);

    /// Create an amount from wei (base units).
    #[must_use]
    pub const fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    /// Create an amount from whole GEM.
    #[must_use]
    pub const fn from_gem(gem: u64) -> Self {
        Self(gem as u128 * WEI_PER_GEM)
    }

    /// Create an amount from whole GEM, checking for overflow.
    #[must_use]
    pub const fn checked_from_gem(gem: u128) -> Option<Self> {
        match gem.checked_mul(WEI_PER_GEM) {
            Some(wei) => Some(Self(wei)),
            None => None,
        }
    }

    /// Get the amount in wei.
    #[must_use]
    pub const fn as_wei(self) -> u128 {
        self.0
    }

    /// Check if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(wei) => Some(Self(wei)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.0.checked_sub(rhs.0) {
            Some(wei) => Some(Self(wei)),
            None => None,
        }
    }

    /// Format as the minimal decimal string.
    ///
    /// No trailing fractional zeros, and no decimal point when the
    /// fractional part is zero. The output round-trips through
    /// [`Amount::from_str`].
    #[must_use]
    pub fn to_decimal_string(self) -> String {
        let whole = self.0 / WEI_PER_GEM;
        let frac = self.0 % WEI_PER_GEM;
        if frac == 0 {
            whole.to_string()
        } else {
            let frac_str = format!("{frac:018}");
            format!("{whole}.{}", frac_str.trim_end_matches('0'))
        }
    }
}

impl FromStr for Amount {
    type Err = CoreError;

    /// Parse a decimal string into chain units.
    ///
    /// Accepts `"1"`, `"1.5"`, `".5"` and `"5."`. Rejects empty input,
    /// negative values, non-digit characters, more than one decimal point,
    /// more than 18 fractional digits, and values that overflow `u128`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CoreError::invalid_amount("empty amount"));
        }
        if s.starts_with('-') {
            return Err(CoreError::invalid_amount("negative values not allowed"));
        }

        let (whole_str, frac_str) = match s.split_once('.') {
            None => (s, ""),
            Some((whole, frac)) => {
                if frac.contains('.') {
                    return Err(CoreError::invalid_amount(format!(
                        "more than one decimal point in {s:?}"
                    )));
                }
                (whole, frac)
            }
        };

        if whole_str.is_empty() && frac_str.is_empty() {
            return Err(CoreError::invalid_amount("no digits"));
        }
        if !whole_str.bytes().all(|b| b.is_ascii_digit())
            || !frac_str.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(CoreError::invalid_amount(format!("not a number: {s:?}")));
        }
        if frac_str.len() > GEM_DECIMALS as usize {
            return Err(CoreError::invalid_amount(format!(
                "more than {GEM_DECIMALS} decimal places"
            )));
        }

        let whole: u128 = if whole_str.is_empty() {
            0
        } else {
            whole_str
                .parse()
                .map_err(|_| CoreError::invalid_amount(format!("overflow in {s:?}")))?
        };

        // Pad the fractional part to 18 digits so it parses as wei.
        let frac: u128 = if frac_str.is_empty() {
            0
        } else {
            format!("{frac_str:0<18}")
                .parse()
                .map_err(|_| CoreError::invalid_amount(format!("not a number: {s:?}")))?
        };

        whole
            .checked_mul(WEI_PER_GEM)
            .and_then(|wei| wei.checked_add(frac))
            .map(Amount)
            .ok_or_else(|| CoreError::invalid_amount(format!("overflow in {s:?}")))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} GEM", self.to_decimal_string())
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn parses_whole_number() {
        let amount: Amount = "3".parse().expect("should parse");
        assert_eq!(amount.as_wei(), 3 * WEI_PER_GEM);
    }

    #[test]
    fn parses_fractional_number() {
        let amount: Amount = "1.5".parse().expect("should parse");
        assert_eq!(amount.as_wei(), 1_500_000_000_000_000_000);
    }

    #[test]
    fn parses_bare_fraction() {
        let amount: Amount = ".5".parse().expect("should parse");
        assert_eq!(amount.as_wei(), WEI_PER_GEM / 2);
    }

    #[test]
    fn parses_trailing_point() {
        let amount: Amount = "5.".parse().expect("should parse");
        assert_eq!(amount.as_wei(), 5 * WEI_PER_GEM);
    }

    #[test]
    fn parses_full_precision() {
        let amount: Amount = "0.000000000000000001".parse().expect("should parse");
        assert_eq!(amount.as_wei(), 1);
    }

    #[test_case("-1"; "negative")]
    #[test_case("abc"; "alphabetic")]
    #[test_case(""; "empty")]
    #[test_case("."; "lone point")]
    #[test_case("1.2.3"; "two points")]
    #[test_case("1.0000000000000000001"; "nineteen decimals")]
    #[test_case("1,5"; "comma separator")]
    #[test_case("+1"; "explicit sign")]
    #[test_case("1e18"; "scientific notation")]
    fn rejects_invalid_input(input: &str) {
        let result: Result<Amount, _> = input.parse();
        assert!(
            matches!(result, Err(CoreError::InvalidAmount { .. })),
            "expected InvalidAmount for {input:?}"
        );
    }

    #[test]
    fn rejects_overflow() {
        // u128::MAX wei is ~3.4e20 GEM; one more whole GEM overflows.
        let result: Result<Amount, _> = "400000000000000000000".parse();
        assert!(matches!(result, Err(CoreError::InvalidAmount { .. })));
    }

    #[test]
    fn formats_minimal_representation() {
        assert_eq!(Amount::from_gem(3).to_decimal_string(), "3");
        assert_eq!(
            Amount::from_wei(1_500_000_000_000_000_000).to_decimal_string(),
            "1.5"
        );
        assert_eq!(Amount::from_wei(1).to_decimal_string(), "0.000000000000000001");
        assert_eq!(Amount::ZERO.to_decimal_string(), "0");
    }

    #[test]
    fn display_includes_currency() {
        let s = format!("{}", Amount::from_gem(2));
        assert!(s.contains("2"));
        assert!(s.contains("GEM"));
    }

    #[test]
    fn checked_from_gem_detects_overflow() {
        assert_eq!(
            Amount::checked_from_gem(2),
            Some(Amount::from_gem(2))
        );
        assert_eq!(Amount::checked_from_gem(u128::MAX), None);
    }

    #[test]
    fn checked_add_detects_overflow() {
        assert_eq!(Amount::MAX.checked_add(Amount::from_wei(1)), None);
        assert_eq!(
            Amount::from_gem(1).checked_add(Amount::from_gem(2)),
            Some(Amount::from_gem(3))
        );
    }

    #[test]
    fn checked_sub_detects_underflow() {
        assert_eq!(Amount::ZERO.checked_sub(Amount::from_wei(1)), None);
        assert_eq!(
            Amount::from_gem(3).checked_sub(Amount::from_gem(1)),
            Some(Amount::from_gem(2))
        );
    }

    #[test]
    fn ordering_follows_value() {
        let small: Amount = "0.1".parse().expect("should parse");
        let large: Amount = "1".parse().expect("should parse");
        assert!(small < large);
    }

    #[test]
    fn serde_round_trips_as_decimal_string() {
        let amount: Amount = "12.25".parse().expect("should parse");
        let json = serde_json::to_string(&amount).expect("serialize");
        assert_eq!(json, "\"12.25\"");
        let parsed: Amount = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(amount, parsed);
    }

    proptest! {
        /// parse(format(x)) == x for every representable amount.
        #[test]
        fn format_then_parse_round_trips(wei in any::<u128>()) {
            let amount = Amount::from_wei(wei);
            let parsed: Amount = amount
                .to_decimal_string()
                .parse()
                .expect("formatted amount should parse");
            prop_assert_eq!(parsed, amount);
        }

        /// Any valid decimal string with <= 18 fractional digits preserves
        /// its numeric value through a parse/format cycle.
        #[test]
        fn parse_preserves_value(
            whole in 0u128..=1_000_000_000_000,
            frac_digits in "[0-9]{0,18}",
        ) {
            let input = if frac_digits.is_empty() {
                whole.to_string()
            } else {
                format!("{whole}.{frac_digits}")
            };
            let amount: Amount = input.parse().expect("valid input should parse");
            let reparsed: Amount = amount
                .to_decimal_string()
                .parse()
                .expect("round trip should parse");
            prop_assert_eq!(amount, reparsed);

            // The numeric value matches the input digits exactly.
            let frac_padded = format!("{frac_digits:0<18}");
            let expected = whole * WEI_PER_GEM
                + frac_padded.parse::<u128>().expect("digits");
            prop_assert_eq!(amount.as_wei(), expected);
        }
    }
}
