//! Exchange events and the append-only event log
//!
//! Events are immutable records emitted by contract operations, one per
//! state-changing call. The log is the external audit trail: consumers
//! (UIs, indexers) rely on the field sets and the sequence ordering being
//! exactly as recorded here. The core never mutates or prunes the log;
//! retention and indexing are a downstream concern.

use serde::{Deserialize, Serialize};
use types::asset::Asset;
use types::ids::{AccountId, OrderId};
use types::numeric::Amount;

/// Funds credited to the ledger via a deposit entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub asset: Asset,
    pub user: AccountId,
    pub amount: Amount,
    /// Ledger balance of `(asset, user)` after the credit
    pub balance: Amount,
}

/// Funds debited from the ledger and paid out to the owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdraw {
    pub asset: Asset,
    pub user: AccountId,
    pub amount: Amount,
    /// Ledger balance of `(asset, user)` after the debit
    pub balance: Amount,
}

/// A new order entered the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub id: OrderId,
    pub user: AccountId,
    pub token_get: Asset,
    pub amount_get: Amount,
    pub token_give: Asset,
    pub amount_give: Amount,
    pub timestamp: i64,
}

/// An open order was cancelled by its creator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancel {
    pub id: OrderId,
    pub user: AccountId,
    pub token_get: Asset,
    pub amount_get: Amount,
    pub token_give: Asset,
    pub amount_give: Amount,
    pub timestamp: i64,
}

/// An order was filled: balances moved between taker and maker, fee routed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: OrderId,
    /// The order's creator
    pub maker: AccountId,
    pub token_get: Asset,
    pub amount_get: Amount,
    pub token_give: Asset,
    pub amount_give: Amount,
    /// The identity that filled the order
    pub taker: AccountId,
    pub timestamp: i64,
}

/// Enum wrapper for all exchange events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeEvent {
    Deposit(Deposit),
    Withdraw(Withdraw),
    Order(OrderPlaced),
    Cancel(Cancel),
    Trade(Trade),
}

/// One log record: an event plus its sequence position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Zero-based, strictly increasing, gap-free
    pub seq: u64,
    pub event: ExchangeEvent,
}

/// Append-only, ordered, immutable sequence of exchange events.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an event, assigning the next sequence number. Returns the
    /// assigned sequence position.
    pub fn append(&mut self, event: ExchangeEvent) -> u64 {
        let seq = self.entries.len() as u64;
        self.entries.push(LogEntry { seq, event });
        seq
    }

    /// All recorded entries in sequence order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_deposit(user: &str, raw: u128) -> ExchangeEvent {
        ExchangeEvent::Deposit(Deposit {
            asset: Asset::Native,
            user: AccountId::new(user),
            amount: Amount::new(raw),
            balance: Amount::new(raw),
        })
    }

    #[test]
    fn test_append_assigns_sequence() {
        let mut log = EventLog::new();
        assert_eq!(log.append(sample_deposit("user1", 1)), 0);
        assert_eq!(log.append(sample_deposit("user2", 2)), 1);
        assert_eq!(log.append(sample_deposit("user1", 3)), 2);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_entries_preserve_order() {
        let mut log = EventLog::new();
        log.append(sample_deposit("a", 1));
        log.append(sample_deposit("b", 2));

        let seqs: Vec<u64> = log.entries().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
    }

    #[test]
    fn test_trade_event_serialization() {
        let event = ExchangeEvent::Trade(Trade {
            id: OrderId::new(1),
            maker: AccountId::new("user1"),
            token_get: Asset::token("0xTOK"),
            amount_get: Amount::units(1),
            token_give: Asset::Native,
            amount_give: Amount::units(1),
            taker: AccountId::new("user2"),
            timestamp: 1708123456,
        });
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: ExchangeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }

    #[test]
    fn test_order_placed_serialization() {
        let event = OrderPlaced {
            id: OrderId::new(1),
            user: AccountId::new("user1"),
            token_get: Asset::token("0xTOK"),
            amount_get: Amount::units(1),
            token_give: Asset::Native,
            amount_give: Amount::units(1),
            timestamp: 1708123456,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: OrderPlaced = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
