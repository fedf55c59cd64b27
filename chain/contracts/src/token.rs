//! Fungible-token collaborator
//!
//! A standard transferable-balance asset consumed by the exchange's deposit
//! and withdraw paths: `transfer`, `transfer_from`, `approve`, plus pure
//! reads, with insufficient-balance and insufficient-allowance rejection.
//! The full supply is minted to the deployer at construction; the exchange
//! never issues tokens.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use types::asset::Asset;
use types::ids::{AccountId, TokenId};
use types::numeric::{Amount, DECIMALS};

use crate::errors::TokenError;

/// Token deployment parameters.
pub const TOKEN_NAME: &str = "Anon";
pub const TOKEN_SYMBOL: &str = "AN";
/// Fixed total supply, in whole tokens.
pub const TOKEN_SUPPLY_UNITS: u64 = 100_000;

/// Emitted on every balance-moving success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: AccountId,
    pub to: AccountId,
    pub value: Amount,
}

/// Fungible token with transferable balances and spender allowances.
#[derive(Debug)]
pub struct Token {
    address: TokenId,
    name: String,
    symbol: String,
    decimals: u32,
    total_supply: Amount,
    /// owner -> balance
    balances: HashMap<AccountId, Amount>,
    /// (owner, spender) -> approved amount
    allowances: HashMap<(AccountId, AccountId), Amount>,
    /// Emitted Transfer events (append-only)
    events: Vec<Transfer>,
}

impl Token {
    /// Deploy the token: fixed supply minted to `deployer`.
    pub fn new(address: impl Into<TokenId>, deployer: AccountId) -> Self {
        let total_supply = Amount::units(TOKEN_SUPPLY_UNITS);
        let mut balances = HashMap::new();
        balances.insert(deployer, total_supply);
        Self {
            address: address.into(),
            name: TOKEN_NAME.to_string(),
            symbol: TOKEN_SYMBOL.to_string(),
            decimals: DECIMALS,
            total_supply,
            balances,
            allowances: HashMap::new(),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Pure Reads ─────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// The token's deployment address.
    pub fn address(&self) -> &TokenId {
        &self.address
    }

    /// This token as a ledger asset identifier.
    pub fn asset(&self) -> Asset {
        Asset::Token(self.address.clone())
    }

    /// Balance of `owner`; zero if the owner has never held the token.
    pub fn balance_of(&self, owner: &AccountId) -> Amount {
        self.balances.get(owner).copied().unwrap_or(Amount::ZERO)
    }

    /// Remaining amount `spender` may pull from `owner`.
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    // ───────────────────────── Transfers ─────────────────────────

    /// Move `amount` from the caller to `to`.
    pub fn transfer(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.move_balance(caller, to, amount)
    }

    /// Set `spender`'s allowance from the caller, overwriting any prior value.
    pub fn approve(&mut self, caller: &AccountId, spender: &AccountId, amount: Amount) {
        debug!(owner = %caller, spender = %spender, amount = %amount, "token approve");
        self.allowances
            .insert((caller.clone(), spender.clone()), amount);
    }

    /// Move `amount` from `from` to `to` on behalf of the caller, consuming
    /// the caller's allowance from `from`.
    pub fn transfer_from(
        &mut self,
        caller: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let approved = self.allowance(from, caller);
        if approved < amount {
            return Err(TokenError::InsufficientAllowance {
                required: amount,
                approved,
            });
        }

        self.move_balance(from, to, amount)?;

        // Balance check passed; decrement the allowance by the amount spent
        let remaining = approved
            .checked_sub(amount)
            .ok_or(TokenError::Overflow)?;
        self.allowances
            .insert((from.clone(), caller.clone()), remaining);
        Ok(())
    }

    /// All emitted Transfer events.
    pub fn events(&self) -> &[Transfer] {
        &self.events
    }

    /// Internal balance move with underflow/overflow protection.
    ///
    /// Verifies both sides before mutating either, so a rejected move leaves
    /// no partial state.
    fn move_balance(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let from_balance = self.balance_of(from);
        let debited =
            from_balance
                .checked_sub(amount)
                .ok_or(TokenError::InsufficientBalance {
                    required: amount,
                    available: from_balance,
                })?;
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        self.balances.insert(from.clone(), debited);
        self.balances.insert(to.clone(), credited);

        self.events.push(Transfer {
            from: from.clone(),
            to: to.clone(),
            value: amount,
        });
        Ok(())
    }
}
