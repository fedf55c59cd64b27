//! Exchange facade — entry points wiring ledger, orders, settlement, events
//!
//! One `Exchange` instance owns the whole mutable state: the balance
//! ledger, the order store, the settlement configuration, and the event
//! log. Every entry point takes `&mut self`, so calls are serialized by
//! construction; each call either fully applies and appends exactly one
//! event, or fully fails and appends nothing.
//!
//! Outbound paths follow debit-then-transfer ordering: the ledger reaches
//! its final value before the token collaborator (or native payout) is
//! invoked, so nothing re-entering through the collaborator can observe a
//! stale balance.

use tracing::{debug, info};
use types::asset::Asset;
use types::ids::{AccountId, OrderId};
use types::numeric::Amount;

use crate::errors::ExchangeError;
use crate::events::{Cancel, Deposit, EventLog, ExchangeEvent, LogEntry, OrderPlaced, Withdraw};
use crate::ledger::Ledger;
use crate::orders::{Order, OrderStore};
use crate::settlement::SettlementEngine;
use crate::token::Token;

/// Custodial exchange: balances, orders, settlement, audit log.
#[derive(Debug)]
pub struct Exchange {
    /// The exchange's own identity on token contracts (custody account)
    address: AccountId,
    ledger: Ledger,
    orders: OrderStore,
    settlement: SettlementEngine,
    log: EventLog,
}

impl Exchange {
    /// Create an exchange. Fee account and fee rate are immutable after
    /// construction.
    pub fn new(address: AccountId, fee_account: AccountId, fee_rate: u32) -> Self {
        info!(address = %address, fee_account = %fee_account, fee_rate, "exchange created");
        Self {
            address,
            ledger: Ledger::new(),
            orders: OrderStore::new(),
            settlement: SettlementEngine::new(fee_account, fee_rate),
            log: EventLog::new(),
        }
    }

    // ───────────────────────── Configuration Reads ─────────────────────────

    /// The exchange's custody identity on token contracts.
    pub fn address(&self) -> &AccountId {
        &self.address
    }

    /// The designated fee-revenue identity.
    pub fn fee_account(&self) -> &AccountId {
        self.settlement.fee_account()
    }

    /// The fee rate as an integer percent.
    pub fn fee_rate(&self) -> u32 {
        self.settlement.fee_rate()
    }

    // ───────────────────────── Ledger Entry Points ─────────────────────────

    /// Credit the caller's native-asset balance with value transferred in.
    pub fn deposit_native(
        &mut self,
        caller: &AccountId,
        amount: Amount,
    ) -> Result<ExchangeEvent, ExchangeError> {
        let balance = self.ledger.credit(&Asset::Native, caller, amount)?;
        debug!(user = %caller, amount = %amount, balance = %balance, "native deposit");
        Ok(self.emit(ExchangeEvent::Deposit(Deposit {
            asset: Asset::Native,
            user: caller.clone(),
            amount,
            balance,
        })))
    }

    /// Reject a bare native-value transfer that bypasses `deposit_native`.
    pub fn receive_native(
        &self,
        caller: &AccountId,
        amount: Amount,
    ) -> Result<(), ExchangeError> {
        debug!(user = %caller, amount = %amount, "unsolicited native transfer rejected");
        Err(ExchangeError::UnsolicitedTransfer)
    }

    /// Pull `amount` of `asset` from the caller via the token collaborator's
    /// transfer-from, then credit the caller's ledger balance.
    ///
    /// The caller must have approved the exchange for at least `amount`.
    /// A failed pull leaves the ledger untouched.
    pub fn deposit_token(
        &mut self,
        caller: &AccountId,
        asset: &Asset,
        token: &mut Token,
        amount: Amount,
    ) -> Result<ExchangeEvent, ExchangeError> {
        if asset.is_native() || *asset != token.asset() {
            return Err(ExchangeError::InvalidAsset);
        }

        // Reject an unrepresentable credit before pulling custody, so the
        // pull and the credit succeed or fail together
        let current = self.ledger.balance_of(asset, caller);
        current
            .checked_add(amount)
            .ok_or(ExchangeError::Overflow)?;

        token.transfer_from(&self.address, caller, &self.address, amount)?;

        let balance = self.ledger.credit(asset, caller, amount)?;
        debug!(user = %caller, asset = %asset, amount = %amount, balance = %balance, "token deposit");
        Ok(self.emit(ExchangeEvent::Deposit(Deposit {
            asset: asset.clone(),
            user: caller.clone(),
            amount,
            balance,
        })))
    }

    /// Debit the caller's native balance and pay the value out.
    pub fn withdraw_native(
        &mut self,
        caller: &AccountId,
        amount: Amount,
    ) -> Result<ExchangeEvent, ExchangeError> {
        // Debit before the outbound value transfer
        let balance = self.ledger.debit(&Asset::Native, caller, amount)?;
        debug!(user = %caller, amount = %amount, balance = %balance, "native withdraw");
        Ok(self.emit(ExchangeEvent::Withdraw(Withdraw {
            asset: Asset::Native,
            user: caller.clone(),
            amount,
            balance,
        })))
    }

    /// Debit the caller's token balance, then transfer the tokens out of
    /// custody to the caller.
    pub fn withdraw_token(
        &mut self,
        caller: &AccountId,
        asset: &Asset,
        token: &mut Token,
        amount: Amount,
    ) -> Result<ExchangeEvent, ExchangeError> {
        if asset.is_native() || *asset != token.asset() {
            return Err(ExchangeError::InvalidAsset);
        }

        // Debit first: the ledger reaches its final value before the token
        // contract runs
        let balance = self.ledger.debit(asset, caller, amount)?;

        if let Err(err) = token.transfer(&self.address, caller, amount) {
            // Restore the debit so the rejected call has no effect. The
            // credit cannot overflow: the balance held this amount until
            // the debit above.
            let _ = self.ledger.credit(asset, caller, amount);
            return Err(err.into());
        }

        debug!(user = %caller, asset = %asset, amount = %amount, balance = %balance, "token withdraw");
        Ok(self.emit(ExchangeEvent::Withdraw(Withdraw {
            asset: asset.clone(),
            user: caller.clone(),
            amount,
            balance,
        })))
    }

    /// Current ledger balance of `(asset, owner)`. Pure read, never fails.
    pub fn balance_of(&self, asset: &Asset, owner: &AccountId) -> Amount {
        self.ledger.balance_of(asset, owner)
    }

    // ───────────────────────── Order Entry Points ─────────────────────────

    /// Create an order offering `amount_give` of `token_give` for
    /// `amount_get` of `token_get`. No balance check until fill time.
    pub fn make_order(
        &mut self,
        caller: &AccountId,
        token_get: Asset,
        amount_get: Amount,
        token_give: Asset,
        amount_give: Amount,
        timestamp: i64,
    ) -> Result<OrderId, ExchangeError> {
        let order = self.orders.create(
            caller.clone(),
            token_get,
            amount_get,
            token_give,
            amount_give,
            timestamp,
        )?;
        let event = OrderPlaced {
            id: order.id,
            user: order.user.clone(),
            token_get: order.token_get.clone(),
            amount_get: order.amount_get,
            token_give: order.token_give.clone(),
            amount_give: order.amount_give,
            timestamp: order.timestamp,
        };
        let id = order.id;

        info!(order_id = %id, user = %caller, "order placed");
        self.emit(ExchangeEvent::Order(event));
        Ok(id)
    }

    /// Cancel an open order. Only the creator may cancel; the transition is
    /// terminal.
    pub fn cancel_order(
        &mut self,
        caller: &AccountId,
        order_id: OrderId,
        timestamp: i64,
    ) -> Result<ExchangeEvent, ExchangeError> {
        let order = self
            .orders
            .get(order_id)
            .ok_or(ExchangeError::InvalidOrder { order_id })?;
        if order.user != *caller {
            return Err(ExchangeError::NotAuthorized);
        }
        let event = Cancel {
            id: order.id,
            user: order.user.clone(),
            token_get: order.token_get.clone(),
            amount_get: order.amount_get,
            token_give: order.token_give.clone(),
            amount_give: order.amount_give,
            timestamp,
        };

        self.orders.mark_cancelled(order_id)?;
        info!(order_id = %order_id, user = %caller, "order cancelled");
        Ok(self.emit(ExchangeEvent::Cancel(event)))
    }

    /// Fill an open order as the taker. Settlement is atomic; the taker
    /// pays `amount_get` plus the fee, the maker receives `amount_get`.
    pub fn fill_order(
        &mut self,
        caller: &AccountId,
        order_id: OrderId,
        timestamp: i64,
    ) -> Result<ExchangeEvent, ExchangeError> {
        let trade = self.settlement.fill(
            &mut self.ledger,
            &mut self.orders,
            caller,
            order_id,
            timestamp,
        )?;
        info!(order_id = %order_id, taker = %caller, "order filled");
        Ok(self.emit(ExchangeEvent::Trade(trade)))
    }

    // ───────────────────────── Order Reads ─────────────────────────

    /// Look up an order by id. Pure read.
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Number of orders ever created.
    pub fn order_count(&self) -> u64 {
        self.orders.order_count()
    }

    /// Check an order's `filled` flag.
    pub fn order_filled(&self, id: OrderId) -> bool {
        self.orders.is_filled(id)
    }

    /// Check an order's `cancelled` flag.
    pub fn order_cancelled(&self, id: OrderId) -> bool {
        self.orders.is_cancelled(id)
    }

    // ───────────────────────── Event Log ─────────────────────────

    /// All recorded events in sequence order.
    pub fn events(&self) -> &[LogEntry] {
        self.log.entries()
    }

    fn emit(&mut self, event: ExchangeEvent) -> ExchangeEvent {
        self.log.append(event.clone());
        event
    }
}
