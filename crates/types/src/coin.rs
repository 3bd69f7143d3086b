//! Stake amounts in a single denomination.
//!
//! Amounts are arbitrary precision. The weighted selection takes a SHA-256
//! digest modulo the total stake, and fixed-width arithmetic would make the
//! result platform-dependent once stakes overflow the word size.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stake amount in a single denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination name, e.g. `"umesh"`.
    pub denom: String,
    /// Non-negative amount.
    pub amount: BigUint,
}

impl Coin {
    /// Create a coin from a `u128` amount.
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount: BigUint::from(amount),
        }
    }

    /// The zero coin of a denomination.
    pub fn zero(denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: BigUint::zero(),
        }
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Add another coin of the same denomination.
    pub fn checked_add(&self, other: &Coin) -> Result<Coin, CoinError> {
        self.require_denom(other)?;
        Ok(Coin {
            denom: self.denom.clone(),
            amount: &self.amount + &other.amount,
        })
    }

    /// Subtract another coin of the same denomination.
    pub fn checked_sub(&self, other: &Coin) -> Result<Coin, CoinError> {
        self.require_denom(other)?;
        if other.amount > self.amount {
            return Err(CoinError::Underflow);
        }
        Ok(Coin {
            denom: self.denom.clone(),
            amount: &self.amount - &other.amount,
        })
    }

    fn require_denom(&self, other: &Coin) -> Result<(), CoinError> {
        if self.denom != other.denom {
            return Err(CoinError::DenomMismatch {
                expected: self.denom.clone(),
                found: other.denom.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Coin arithmetic errors.
#[derive(Debug, thiserror::Error)]
pub enum CoinError {
    /// Operands have different denominations.
    #[error("denomination mismatch: expected {expected}, found {found}")]
    DenomMismatch {
        /// Denomination of the left operand.
        expected: String,
        /// Denomination of the right operand.
        found: String,
    },

    /// Subtraction would produce a negative amount.
    #[error("coin subtraction underflow")]
    Underflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_add_same_denom() {
        let a = Coin::new("umesh", 100);
        let b = Coin::new("umesh", 250);
        let sum = a.checked_add(&b).expect("same denom");
        assert_eq!(sum, Coin::new("umesh", 350));
    }

    #[test]
    fn test_coin_add_denom_mismatch() {
        let a = Coin::new("umesh", 100);
        let b = Coin::new("uatom", 100);
        assert!(matches!(
            a.checked_add(&b),
            Err(CoinError::DenomMismatch { .. })
        ));
    }

    #[test]
    fn test_coin_sub_underflow() {
        let a = Coin::new("umesh", 10);
        let b = Coin::new("umesh", 11);
        assert!(matches!(a.checked_sub(&b), Err(CoinError::Underflow)));
    }

    #[test]
    fn test_coin_zero() {
        assert!(Coin::zero("umesh").is_zero());
        assert!(!Coin::new("umesh", 1).is_zero());
    }
}
