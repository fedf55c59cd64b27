//! Settlement Engine — validates and executes order fills
//!
//! A fill moves `amount_get` of `token_get` from the taker to the maker,
//! `amount_give` of `token_give` from the maker to the taker, and routes the
//! taker fee — `floor(amount_get * fee_rate / 100)`, denominated in
//! `token_get` — to the fee account. The maker always receives exactly
//! `amount_get`; the fee is auditable as the extra `token_get` debited from
//! the taker.
//!
//! Execution is atomic: every resulting balance is computed and validated on
//! scratch cells first, then committed in one pass, so a rejected fill
//! leaves the ledger and order store untouched.

use std::collections::HashMap;

use tracing::debug;
use types::asset::Asset;
use types::ids::{AccountId, OrderId};
use types::numeric::Amount;

use crate::errors::ExchangeError;
use crate::events::Trade;
use crate::ledger::Ledger;
use crate::orders::OrderStore;

/// Fill executor, configured once at exchange creation.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    /// Identity that accumulates fee revenue
    fee_account: AccountId,
    /// Integer percentage of the `amount_get` side of a fill
    fee_rate: u32,
}

/// Balance cells touched by one fill, keyed by `(asset, owner)`.
///
/// Keying by cell means aliased parties — a self-trade, or a maker that is
/// also the fee account — resolve to the same cell and are settled exactly.
type BalancePlan = HashMap<(Asset, AccountId), Amount>;

impl SettlementEngine {
    /// Create an engine with the given fee configuration.
    pub fn new(fee_account: AccountId, fee_rate: u32) -> Self {
        Self {
            fee_account,
            fee_rate,
        }
    }

    /// The configured fee account identity.
    pub fn fee_account(&self) -> &AccountId {
        &self.fee_account
    }

    /// The configured fee rate (integer percent).
    pub fn fee_rate(&self) -> u32 {
        self.fee_rate
    }

    /// Fee charged on an order's `amount_get`: `floor(amount_get * rate / 100)`.
    pub fn fee(&self, amount_get: Amount) -> Result<Amount, ExchangeError> {
        amount_get
            .percent_floor(self.fee_rate)
            .ok_or(ExchangeError::Overflow)
    }

    /// Execute a fill of `order_id` by `taker`.
    ///
    /// Preconditions, checked in order: order exists, order not cancelled,
    /// order not already filled. The taker's `token_get` balance must cover
    /// `amount_get + fee` (the balance check deferred from order creation);
    /// the maker's `token_give` balance must still cover `amount_give` (the
    /// stale-order failure mode). On success the order is marked filled and
    /// the resulting `Trade` record is returned for the event log.
    pub fn fill(
        &self,
        ledger: &mut Ledger,
        orders: &mut OrderStore,
        taker: &AccountId,
        order_id: OrderId,
        timestamp: i64,
    ) -> Result<Trade, ExchangeError> {
        orders.check_open(order_id)?;
        let order = orders
            .get(order_id)
            .ok_or(ExchangeError::InvalidOrder { order_id })?
            .clone();

        let fee = self.fee(order.amount_get)?;
        let taker_cost = order
            .amount_get
            .checked_add(fee)
            .ok_or(ExchangeError::Overflow)?;

        // Plan every balance movement before mutating anything.
        let mut plan = BalancePlan::new();

        // Taker pays amount_get plus the fee surcharge
        Self::plan_debit(&mut plan, ledger, &order.token_get, taker, taker_cost)?;
        // Maker receives exactly amount_get
        Self::plan_credit(&mut plan, ledger, &order.token_get, &order.user, order.amount_get)?;
        // Fee account receives the surcharge
        Self::plan_credit(&mut plan, ledger, &order.token_get, &self.fee_account, fee)?;
        // Maker gives amount_give (fails here if the order went stale)
        Self::plan_debit(&mut plan, ledger, &order.token_give, &order.user, order.amount_give)?;
        // Taker receives amount_give
        Self::plan_credit(&mut plan, ledger, &order.token_give, taker, order.amount_give)?;

        // Terminal transition; cannot fail after check_open above
        orders.mark_filled(order_id)?;

        for ((asset, owner), amount) in plan {
            ledger.set_balance(asset, owner, amount);
        }

        debug!(
            order_id = %order_id,
            maker = %order.user,
            taker = %taker,
            fee = %fee,
            "order filled"
        );

        Ok(Trade {
            id: order.id,
            maker: order.user,
            token_get: order.token_get,
            amount_get: order.amount_get,
            token_give: order.token_give,
            amount_give: order.amount_give,
            taker: taker.clone(),
            timestamp,
        })
    }

    /// Current planned balance of a cell, seeded from the ledger on first
    /// touch.
    fn planned(plan: &mut BalancePlan, ledger: &Ledger, asset: &Asset, owner: &AccountId) -> Amount {
        *plan
            .entry((asset.clone(), owner.clone()))
            .or_insert_with(|| ledger.balance_of(asset, owner))
    }

    fn plan_debit(
        plan: &mut BalancePlan,
        ledger: &Ledger,
        asset: &Asset,
        owner: &AccountId,
        amount: Amount,
    ) -> Result<(), ExchangeError> {
        let current = Self::planned(plan, ledger, asset, owner);
        let next = current
            .checked_sub(amount)
            .ok_or(ExchangeError::InsufficientBalance {
                asset: asset.clone(),
                required: amount,
                available: current,
            })?;
        plan.insert((asset.clone(), owner.clone()), next);
        Ok(())
    }

    fn plan_credit(
        plan: &mut BalancePlan,
        ledger: &Ledger,
        asset: &Asset,
        owner: &AccountId,
        amount: Amount,
    ) -> Result<(), ExchangeError> {
        let current = Self::planned(plan, ledger, asset, owner);
        let next = current.checked_add(amount).ok_or(ExchangeError::Overflow)?;
        plan.insert((asset.clone(), owner.clone()), next);
        Ok(())
    }
}
