//! Contract-specific error types
//!
//! Every rejected precondition maps to exactly one variant so callers and
//! tests can assert on cause. All failures are atomic: the triggering call
//! leaves ledger, order-store, and event-log state untouched.

use thiserror::Error;
use types::asset::Asset;
use types::ids::OrderId;
use types::numeric::Amount;

/// Token-collaborator errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Insufficient token balance: required {required}, available {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("Insufficient allowance: required {required}, approved {approved}")]
    InsufficientAllowance { required: Amount, approved: Amount },

    #[error("Arithmetic overflow in token balance calculation")]
    Overflow,
}

/// Exchange-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Insufficient balance for {asset}: required {required}, available {available}")]
    InsufficientBalance {
        asset: Asset,
        required: Amount,
        available: Amount,
    },

    #[error("Cannot use the native asset where a token asset is required")]
    InvalidAsset,

    #[error("Invalid order: {order_id}")]
    InvalidOrder { order_id: OrderId },

    #[error("Not authorized: caller is not the order's creator")]
    NotAuthorized,

    #[error("Order {order_id} already {}", terminal_state(.filled))]
    AlreadyFinalized { order_id: OrderId, filled: bool },

    #[error("Order amounts must be strictly positive")]
    InvalidAmount,

    #[error("Unsolicited native transfer rejected: use deposit_native")]
    UnsolicitedTransfer,

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

fn terminal_state(filled: &bool) -> &'static str {
    if *filled {
        "filled"
    } else {
        "cancelled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_balance_display() {
        let err = ExchangeError::InsufficientBalance {
            asset: Asset::Native,
            required: Amount::new(100),
            available: Amount::new(40),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance for native: required 100, available 40"
        );
    }

    #[test]
    fn test_already_finalized_display_distinguishes_state() {
        let filled = ExchangeError::AlreadyFinalized {
            order_id: OrderId::new(1),
            filled: true,
        };
        assert_eq!(filled.to_string(), "Order 1 already filled");

        let cancelled = ExchangeError::AlreadyFinalized {
            order_id: OrderId::new(2),
            filled: false,
        };
        assert_eq!(cancelled.to_string(), "Order 2 already cancelled");
    }

    #[test]
    fn test_exchange_error_from_token() {
        let token_err = TokenError::InsufficientAllowance {
            required: Amount::new(10),
            approved: Amount::ZERO,
        };
        let err: ExchangeError = token_err.into();
        assert!(matches!(err, ExchangeError::Token(_)));
    }

    #[test]
    fn test_token_error_display() {
        let err = TokenError::InsufficientBalance {
            required: Amount::new(5),
            available: Amount::new(3),
        };
        assert!(err.to_string().contains("required 5"));
    }
}
