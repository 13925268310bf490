//! Monetary amounts using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount.
///
/// Campaign goals and funding totals are a single implicit currency, so this
/// wraps a bare [`Decimal`] rather than carrying a currency code. Floats are
/// never used for money.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    ///
    /// Contribution amounts and campaign goals must be positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checked addition.
    #[must_use]
    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Funding progress towards `goal` as a percentage, rounded to one
    /// decimal place and clamped to 100.
    ///
    /// A goal of 50000 with 32400 raised displays as 64.8; an overfunded
    /// campaign displays as 100. A non-positive goal yields 0 rather than
    /// dividing by zero.
    #[must_use]
    pub fn percent_of(&self, goal: Self) -> Decimal {
        if !goal.is_positive() {
            return Decimal::ZERO;
        }

        let percent = (self.0 / goal.0 * Decimal::ONE_HUNDRED).round_dp(1);
        percent.min(Decimal::ONE_HUNDRED)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Money {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Money {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn money(n: i64) -> Money {
        Money::new(Decimal::from(n))
    }

    #[test]
    fn test_is_positive() {
        assert!(money(1).is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(!money(-5).is_positive());
    }

    #[test]
    fn test_percent_of() {
        // goal=50000, currentFunding=32400 -> 64.8%
        let percent = money(32_400).percent_of(money(50_000));
        assert_eq!(percent, "64.8".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_percent_of_clamps_overfunding() {
        let percent = money(75_000).percent_of(money(50_000));
        assert_eq!(percent, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_percent_of_zero_goal() {
        assert_eq!(money(100).percent_of(Money::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_percent_of_rounds_to_one_decimal() {
        // 1/3 of the goal -> 33.3, not 33.333...
        let percent = money(1).percent_of(money(3));
        assert_eq!(percent, "33.3".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_checked_add() {
        assert_eq!(money(10).checked_add(money(5)), Some(money(15)));
        assert_eq!(Money::new(Decimal::MAX).checked_add(money(1)), None);
    }

    #[test]
    fn test_serde_transparent() {
        let m = money(50_000);
        let json = serde_json::to_string(&m).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_deserialize_from_number() {
        // Clients send {"amount": 100} as a bare JSON number.
        let m: Money = serde_json::from_str("100").unwrap();
        assert_eq!(m, money(100));
    }
}
