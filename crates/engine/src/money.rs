use std::{
    fmt,
    ops::Sub,
};

use crate::{EngineError, ResultEngine};

/// Money amount represented as **integer cents**.
///
/// Balances and transaction amounts are stored with exactly two decimals, so
/// the engine never does arithmetic on floating-point values: wire amounts
/// are converted once, with [`MoneyCents::from_major`], and everything after
/// that is integer math.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(1_234);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Converting from a decimal amount rounds to the nearest cent, ties away
/// from zero:
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!(MoneyCents::from_major(10.999).unwrap().cents(), 1100);
/// assert_eq!(MoneyCents::from_major(0.125).unwrap().cents(), 13);
/// assert!(MoneyCents::from_major(f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Converts an amount in major units (e.g. `10.5`) into cents.
    ///
    /// `amount * 100` is rounded half away from zero before the conversion.
    pub fn from_major(amount: f64) -> ResultEngine<Self> {
        if !amount.is_finite() {
            return Err(EngineError::InvalidAmount(
                "amount must be a finite number".to_string(),
            ));
        }

        let scaled = (amount * 100.0).round();
        // `i64::MAX as f64` is 2^63, which is already out of range.
        if scaled >= i64::MAX as f64 || scaled < i64::MIN as f64 {
            return Err(EngineError::InvalidAmount("amount too large".to_string()));
        }

        Ok(Self(scaled as i64))
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns the amount in major units, for presentation only.
    #[must_use]
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}
