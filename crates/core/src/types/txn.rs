//! Buyer-reported UPI transaction references.
//!
//! Payment is confirmed manually: the buyer pays out of band and types the
//! UPI reference into the payment form. Nothing here verifies it; the seller
//! reconciles it against their bank statement.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TxnId`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnIdError {
    #[error("Please enter your UPI transaction/reference ID")]
    Empty,
    #[error("transaction reference must be at most {max} characters")]
    TooLong { max: usize },
}

/// A trimmed, non-empty UPI transaction or reference ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxnId(String);

impl TxnId {
    pub const MAX_LENGTH: usize = 64;

    /// # Errors
    ///
    /// Returns `TxnIdError::Empty` for blank input and `TxnIdError::TooLong`
    /// past [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, TxnIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TxnIdError::Empty);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(TxnIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TxnId {
    type Error = TxnIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TxnId> for String {
    fn from(txn: TxnId) -> Self {
        txn.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_reference() {
        assert_eq!(TxnId::parse("  1234567890@upi ").unwrap().as_str(), "1234567890@upi");
    }

    #[test]
    fn test_blank_reference_is_rejected() {
        assert_eq!(TxnId::parse(""), Err(TxnIdError::Empty));
        assert_eq!(TxnId::parse(" \t "), Err(TxnIdError::Empty));
    }

    #[test]
    fn test_overlong_reference_is_rejected() {
        let long = "9".repeat(TxnId::MAX_LENGTH + 1);
        assert!(matches!(TxnId::parse(&long), Err(TxnIdError::TooLong { .. })));
    }
}
