//! Order Store — immutable order records and their terminal flags
//!
//! Orders are created only here, never deleted. The record itself is
//! immutable once stored; the only post-creation mutation is setting the
//! `cancelled` or `filled` flag, each at most once and mutually exclusively
//! (the `Open -> {Filled | Cancelled}` state machine, both terminal).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use types::asset::Asset;
use types::ids::{AccountId, OrderId};
use types::numeric::Amount;

use crate::errors::ExchangeError;

/// An immutable trade offer: `user` wants `amount_get` of `token_get` in
/// exchange for `amount_give` of `token_give`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// The creator (maker)
    pub user: AccountId,
    pub token_get: Asset,
    pub amount_get: Amount,
    pub token_give: Asset,
    pub amount_give: Amount,
    pub timestamp: i64,
}

/// The set of orders ever created, plus per-order terminal flags.
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: HashMap<OrderId, Order>,
    cancelled: HashSet<OrderId>,
    filled: HashSet<OrderId>,
    /// Monotonic counter; equals the highest assigned order id
    order_count: u64,
}

impl OrderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new order, allocating the next id (ids start at 1).
    ///
    /// Both amounts must be strictly positive; no balance check happens at
    /// creation time — balances are validated at fill time.
    pub fn create(
        &mut self,
        user: AccountId,
        token_get: Asset,
        amount_get: Amount,
        token_give: Asset,
        amount_give: Amount,
        timestamp: i64,
    ) -> Result<&Order, ExchangeError> {
        if amount_get.is_zero() || amount_give.is_zero() {
            return Err(ExchangeError::InvalidAmount);
        }

        self.order_count += 1;
        let id = OrderId::new(self.order_count);
        let order = Order {
            id,
            user,
            token_get,
            amount_get,
            token_give,
            amount_give,
            timestamp,
        };

        Ok(self.orders.entry(id).or_insert(order))
    }

    /// Look up an order by id. Pure read.
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// Number of orders ever created (equals the highest assigned id).
    pub fn order_count(&self) -> u64 {
        self.order_count
    }

    /// Check the `cancelled` flag.
    pub fn is_cancelled(&self, id: OrderId) -> bool {
        self.cancelled.contains(&id)
    }

    /// Check the `filled` flag.
    pub fn is_filled(&self, id: OrderId) -> bool {
        self.filled.contains(&id)
    }

    /// Set the `cancelled` flag. Terminal transition.
    ///
    /// Fails on an unknown id or an order already filled or cancelled.
    pub fn mark_cancelled(&mut self, id: OrderId) -> Result<(), ExchangeError> {
        self.check_open(id)?;
        self.cancelled.insert(id);
        Ok(())
    }

    /// Set the `filled` flag. Terminal transition.
    ///
    /// Fails on an unknown id or an order already filled or cancelled.
    pub fn mark_filled(&mut self, id: OrderId) -> Result<(), ExchangeError> {
        self.check_open(id)?;
        self.filled.insert(id);
        Ok(())
    }

    /// Verify the order exists and is still open, checking `cancelled`
    /// before `filled`.
    pub fn check_open(&self, id: OrderId) -> Result<(), ExchangeError> {
        if !self.orders.contains_key(&id) {
            return Err(ExchangeError::InvalidOrder { order_id: id });
        }
        if self.cancelled.contains(&id) {
            return Err(ExchangeError::AlreadyFinalized {
                order_id: id,
                filled: false,
            });
        }
        if self.filled.contains(&id) {
            return Err(ExchangeError::AlreadyFinalized {
                order_id: id,
                filled: true,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order(store: &mut OrderStore) -> OrderId {
        store
            .create(
                AccountId::new("user1"),
                Asset::token("0xTOK"),
                Amount::units(1),
                Asset::Native,
                Amount::units(1),
                1708123456,
            )
            .unwrap()
            .id
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut store = OrderStore::new();
        assert_eq!(sample_order(&mut store), OrderId::new(1));
        assert_eq!(sample_order(&mut store), OrderId::new(2));
        assert_eq!(store.order_count(), 2);
    }

    #[test]
    fn test_create_stores_all_fields() {
        let mut store = OrderStore::new();
        let id = sample_order(&mut store);

        let order = store.get(id).unwrap();
        assert_eq!(order.id, OrderId::new(1));
        assert_eq!(order.user, AccountId::new("user1"));
        assert_eq!(order.token_get, Asset::token("0xTOK"));
        assert_eq!(order.amount_get, Amount::units(1));
        assert_eq!(order.token_give, Asset::Native);
        assert_eq!(order.amount_give, Amount::units(1));
        assert_eq!(order.timestamp, 1708123456);
        assert!(!store.is_cancelled(id));
        assert!(!store.is_filled(id));
    }

    #[test]
    fn test_create_rejects_zero_amounts() {
        let mut store = OrderStore::new();
        let result = store.create(
            AccountId::new("user1"),
            Asset::token("0xTOK"),
            Amount::ZERO,
            Asset::Native,
            Amount::units(1),
            0,
        );
        assert_eq!(result.err(), Some(ExchangeError::InvalidAmount));

        let result = store.create(
            AccountId::new("user1"),
            Asset::token("0xTOK"),
            Amount::units(1),
            Asset::Native,
            Amount::ZERO,
            0,
        );
        assert_eq!(result.err(), Some(ExchangeError::InvalidAmount));
        // Counter does not advance on rejection
        assert_eq!(store.order_count(), 0);
    }

    #[test]
    fn test_get_unknown_order() {
        let store = OrderStore::new();
        assert!(store.get(OrderId::new(99_999)).is_none());
    }

    #[test]
    fn test_mark_cancelled_is_terminal() {
        let mut store = OrderStore::new();
        let id = sample_order(&mut store);

        store.mark_cancelled(id).unwrap();
        assert!(store.is_cancelled(id));
        assert_eq!(
            store.mark_filled(id),
            Err(ExchangeError::AlreadyFinalized {
                order_id: id,
                filled: false,
            })
        );
        assert_eq!(
            store.mark_cancelled(id),
            Err(ExchangeError::AlreadyFinalized {
                order_id: id,
                filled: false,
            })
        );
        assert!(!store.is_filled(id));
    }

    #[test]
    fn test_mark_filled_is_terminal() {
        let mut store = OrderStore::new();
        let id = sample_order(&mut store);

        store.mark_filled(id).unwrap();
        assert!(store.is_filled(id));
        assert_eq!(
            store.mark_cancelled(id),
            Err(ExchangeError::AlreadyFinalized {
                order_id: id,
                filled: true,
            })
        );
        assert!(!store.is_cancelled(id));
    }

    #[test]
    fn test_mark_unknown_order() {
        let mut store = OrderStore::new();
        let id = OrderId::new(42);
        assert_eq!(
            store.mark_cancelled(id),
            Err(ExchangeError::InvalidOrder { order_id: id })
        );
    }
}
