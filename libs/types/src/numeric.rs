//! Fixed-point integer amounts
//!
//! Balances and order quantities are integers denominated in the asset's
//! smallest unit, with 18 implied decimal places for the native asset and
//! tokens alike. No floating point anywhere; every operation is checked and
//! fee rounding is floor division.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Implied decimal places for all assets in this system.
pub const DECIMALS: u32 = 18;

/// One whole unit (10^18 smallest units).
pub const ONE: u128 = 1_000_000_000_000_000_000;

/// A non-negative asset amount in smallest units.
///
/// Non-negativity holds by construction (`u128`). Arithmetic is exposed only
/// through checked operations so overflow surfaces as an error at the call
/// site instead of wrapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    /// The zero amount
    pub const ZERO: Amount = Amount(0);

    /// Create from a raw smallest-unit value
    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Create from a whole-unit count (scaled by 10^18)
    ///
    /// Convenience mirror of the deployment fixtures, which express balances
    /// as whole tokens/ether.
    pub const fn units(n: u64) -> Self {
        Self(n as u128 * ONE)
    }

    /// Get the raw smallest-unit value
    pub const fn value(&self) -> u128 {
        self.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction; `None` if the result would go negative
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Integer percentage with floor rounding: `floor(self * pct / 100)`.
    ///
    /// `None` only on multiplication overflow. This is the sole rounding
    /// rule used for fee computation.
    pub fn percent_floor(self, pct: u32) -> Option<Amount> {
        self.0.checked_mul(pct as u128).map(|v| Amount(v / 100))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}
