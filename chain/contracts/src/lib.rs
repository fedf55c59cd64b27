//! Contract Logic for Custody & Settlement
//!
//! This crate implements the exchange's contract layer: a custodial balance
//! ledger for the native asset and fungible tokens, an order store with a
//! terminal-flag lifecycle, a settlement engine that fills orders atomically
//! and routes the taker fee, and an append-only event log for external
//! observers.
//!
//! # Modules
//! - `errors`: Exchange and token error taxonomy
//! - `events`: Event records and the append-only event log
//! - `token`: Fungible-token collaborator (transferable balances + allowances)
//! - `ledger`: Per-(asset, owner) balance accounting
//! - `orders`: Immutable order records and terminal cancelled/filled flags
//! - `settlement`: Fill validation, balance movement, and fee routing
//! - `exchange`: Facade wiring ledger, orders, settlement, and the event log
//!
//! # Version
//! v0.1.0 — Initial implementation

pub mod errors;
pub mod events;
pub mod exchange;
pub mod ledger;
pub mod orders;
pub mod settlement;
pub mod token;

/// Contract ABI version — frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
