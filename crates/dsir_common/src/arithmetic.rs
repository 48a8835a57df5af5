//! Integer overflow policy for compile-time folding.

use serde::{Deserialize, Serialize};

/// How constant folding treats `i64` overflow.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arithmetic {
    /// Two's-complement wraparound.
    #[default]
    Wrapping,
    /// Overflow is an error.
    Checked,
}

impl Arithmetic {
    /// Adds two values under this policy. `None` means a checked overflow.
    pub fn add(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            Arithmetic::Wrapping => Some(lhs.wrapping_add(rhs)),
            Arithmetic::Checked => lhs.checked_add(rhs),
        }
    }

    /// Subtracts two values under this policy.
    pub fn sub(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            Arithmetic::Wrapping => Some(lhs.wrapping_sub(rhs)),
            Arithmetic::Checked => lhs.checked_sub(rhs),
        }
    }

    /// Multiplies two values under this policy.
    pub fn mul(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            Arithmetic::Wrapping => Some(lhs.wrapping_mul(rhs)),
            Arithmetic::Checked => lhs.checked_mul(rhs),
        }
    }
}
