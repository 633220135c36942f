//! # Monetary Types — Integer Minor Units
//!
//! Quoted prices travel through pricing negotiation, approval, and
//! reporting, so they must compare exactly. Floats never enter the
//! picture: `Money` stores an amount in integer minor units (cents,
//! pence, fils) alongside a validated ISO-4217 currency code, and a
//! non-positive amount is unconstructible.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A three-letter uppercase ISO-4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validate and construct a currency code.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is exactly three ASCII
    /// uppercase letters.
    pub fn new(code: &str) -> Result<Self, CoreError> {
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(code.to_string()))
        } else {
            Err(CoreError::InvalidCurrency(code.to_string()))
        }
    }

    /// The code as a string slice (e.g., `"USD"`).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A strictly positive monetary amount in minor units of its currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount_minor: i64,
    currency: CurrencyCode,
}

impl Money {
    /// Construct a monetary amount.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount_minor` is zero or negative.
    pub fn new(amount_minor: i64, currency: CurrencyCode) -> Result<Self, CoreError> {
        if amount_minor <= 0 {
            return Err(CoreError::NonPositiveAmount(amount_minor));
        }
        Ok(Self {
            amount_minor,
            currency,
        })
    }

    /// The amount in minor units.
    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    /// The currency of this amount.
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount_minor, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> CurrencyCode {
        CurrencyCode::new("USD").unwrap()
    }

    #[test]
    fn test_currency_accepts_iso_codes() {
        assert_eq!(CurrencyCode::new("USD").unwrap().as_str(), "USD");
        assert_eq!(CurrencyCode::new("EUR").unwrap().as_str(), "EUR");
        assert_eq!(CurrencyCode::new("GBP").unwrap().as_str(), "GBP");
    }

    #[test]
    fn test_currency_rejects_malformed_codes() {
        assert!(CurrencyCode::new("usd").is_err());
        assert!(CurrencyCode::new("US").is_err());
        assert!(CurrencyCode::new("USDX").is_err());
        assert!(CurrencyCode::new("U$D").is_err());
        assert!(CurrencyCode::new("").is_err());
    }

    #[test]
    fn test_money_requires_positive_amount() {
        assert!(Money::new(1, usd()).is_ok());
        assert!(Money::new(0, usd()).is_err());
        assert!(Money::new(-500, usd()).is_err());
    }

    #[test]
    fn test_money_display() {
        let m = Money::new(1_250_000, usd()).unwrap();
        assert_eq!(m.to_string(), "1250000 USD");
    }

    #[test]
    fn test_money_serde_roundtrip() {
        let m = Money::new(99_900, usd()).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let parsed: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, parsed);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Currency validation accepts exactly the three-uppercase-letter
        /// alphabet and nothing else.
        #[test]
        fn currency_validation_is_exact(s in "[A-Za-z0-9]{0,5}") {
            let well_formed =
                s.len() == 3 && s.bytes().all(|b| b.is_ascii_uppercase());
            prop_assert_eq!(CurrencyCode::new(&s).is_ok(), well_formed);
        }

        /// Money construction succeeds exactly for positive amounts.
        #[test]
        fn money_positivity(amount in i64::MIN..i64::MAX) {
            let result = Money::new(amount, CurrencyCode::new("USD").unwrap());
            prop_assert_eq!(result.is_ok(), amount > 0);
        }
    }
}
