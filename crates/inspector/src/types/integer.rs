// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use primitive_types::U512;
use std::fmt;

/// Largest magnitude an IEEE-754 double holds without rounding (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Sign-magnitude integer wide enough for every TVM integer (`int257`,
/// `uint256`) and for dictionary keys up to 512 bits.
///
/// Zero is always stored as non-negative so equality is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Integer {
    negative: bool,
    magnitude: U512,
}

impl Integer {
    pub fn zero() -> Self {
        Self {
            negative: false,
            magnitude: U512::zero(),
        }
    }

    pub fn from_parts(negative: bool, magnitude: U512) -> Self {
        Self {
            negative: negative && !magnitude.is_zero(),
            magnitude,
        }
    }

    pub fn unsigned(magnitude: U512) -> Self {
        Self::from_parts(false, magnitude)
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn magnitude(&self) -> U512 {
        self.magnitude
    }

    /// The value as `i64` if it lies within the double-safe range.
    pub fn as_safe_i64(&self) -> Option<i64> {
        if self.magnitude > U512::from(MAX_SAFE_INTEGER) {
            return None;
        }
        let value = self.magnitude.low_u64() as i64;
        Some(if self.negative { -value } else { value })
    }

}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self::unsigned(U512::from(value))
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::from_parts(value < 0, U512::from(value.unsigned_abs()))
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_zero_normalizes() {
        assert_eq!(Integer::from_parts(true, U512::zero()), Integer::zero());
        assert!(!Integer::from_parts(true, U512::zero()).is_negative());
    }

    #[test]
    fn test_display() {
        assert_eq!(Integer::from(42u64).to_string(), "42");
        assert_eq!(Integer::from(-7i64).to_string(), "-7");
        assert_eq!(Integer::from(i64::MIN).to_string(), "-9223372036854775808");
    }

    #[test]
    fn test_display_wide_values() {
        let max_u256 = Integer::unsigned((U512::one() << 256) - U512::one());
        assert_eq!(
            max_u256.to_string(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
    }

    #[test]
    fn test_safe_range() {
        assert_eq!(Integer::from(MAX_SAFE_INTEGER).as_safe_i64(), Some(9007199254740991));
        assert_eq!(Integer::from(MAX_SAFE_INTEGER + 1).as_safe_i64(), None);
        assert_eq!(Integer::from(-9007199254740991i64).as_safe_i64(), Some(-9007199254740991));
        assert_eq!(Integer::from(-9007199254740992i64).as_safe_i64(), None);
    }
}
