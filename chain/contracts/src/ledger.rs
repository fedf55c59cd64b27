//! Ledger — per-(asset, owner) balance accounting
//!
//! One accounting structure for the native asset and every token asset.
//! Balances are created implicitly (default zero) and mutated only through
//! `credit` and `debit`; they can never go negative because debits are
//! checked against the current balance before applying.

use std::collections::HashMap;

use types::asset::Asset;
use types::ids::AccountId;
use types::numeric::Amount;

use crate::errors::ExchangeError;

/// Custodial balance ledger.
///
/// Balances are stored as `HashMap<AccountId, HashMap<Asset, Amount>>`;
/// the outer key is the owner, the inner key the asset identifier.
#[derive(Debug, Default)]
pub struct Ledger {
    /// Balances: owner -> (asset -> amount)
    balances: HashMap<AccountId, HashMap<Asset, Amount>>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Current balance of `(asset, owner)`; zero if never credited.
    ///
    /// Pure read, never fails, never allocates an entry.
    pub fn balance_of(&self, asset: &Asset, owner: &AccountId) -> Amount {
        self.balances
            .get(owner)
            .and_then(|assets| assets.get(asset))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Credit `(asset, owner)` by `amount` with overflow protection.
    ///
    /// Returns the new balance.
    pub fn credit(
        &mut self,
        asset: &Asset,
        owner: &AccountId,
        amount: Amount,
    ) -> Result<Amount, ExchangeError> {
        let account_balances = self.balances.entry(owner.clone()).or_default();
        let current = account_balances
            .entry(asset.clone())
            .or_insert(Amount::ZERO);

        let new_balance = current
            .checked_add(amount)
            .ok_or(ExchangeError::Overflow)?;

        *current = new_balance;
        Ok(new_balance)
    }

    /// Debit `(asset, owner)` by `amount`.
    ///
    /// Fails with `InsufficientBalance` if the balance would go negative.
    /// Returns the new balance.
    pub fn debit(
        &mut self,
        asset: &Asset,
        owner: &AccountId,
        amount: Amount,
    ) -> Result<Amount, ExchangeError> {
        let current = self.balance_of(asset, owner);
        let new_balance =
            current
                .checked_sub(amount)
                .ok_or(ExchangeError::InsufficientBalance {
                    asset: asset.clone(),
                    required: amount,
                    available: current,
                })?;

        // The entry exists whenever current > 0; a zero-amount debit of an
        // untouched account is a no-op either way
        self.balances
            .entry(owner.clone())
            .or_default()
            .insert(asset.clone(), new_balance);
        Ok(new_balance)
    }

    /// Overwrite one balance cell with a pre-validated value.
    ///
    /// Settlement computes every resulting balance on scratch cells, then
    /// commits through here so a fill is all-or-nothing.
    pub(crate) fn set_balance(&mut self, asset: Asset, owner: AccountId, amount: Amount) {
        self.balances.entry(owner).or_default().insert(asset, amount);
    }

    /// Sum of all owners' balances for one asset.
    ///
    /// Used by conservation checks: for a token asset this never exceeds the
    /// amount the exchange holds in custody on the token contract.
    pub fn total_for_asset(&self, asset: &Asset) -> Amount {
        let total = self
            .balances
            .values()
            .filter_map(|assets| assets.get(asset))
            .fold(0u128, |acc, amount| acc.saturating_add(amount.value()));
        Amount::new(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> AccountId {
        AccountId::new(name)
    }

    #[test]
    fn test_balance_defaults_to_zero() {
        let ledger = Ledger::new();
        assert_eq!(
            ledger.balance_of(&Asset::Native, &user("user1")),
            Amount::ZERO
        );
    }

    #[test]
    fn test_credit_accumulates() {
        let mut ledger = Ledger::new();
        ledger
            .credit(&Asset::Native, &user("user1"), Amount::units(1))
            .unwrap();
        let new_balance = ledger
            .credit(&Asset::Native, &user("user1"), Amount::units(2))
            .unwrap();

        assert_eq!(new_balance, Amount::units(3));
        assert_eq!(
            ledger.balance_of(&Asset::Native, &user("user1")),
            Amount::units(3)
        );
    }

    #[test]
    fn test_assets_are_isolated() {
        let mut ledger = Ledger::new();
        let token = Asset::token("0xTOK");
        ledger
            .credit(&Asset::Native, &user("user1"), Amount::units(1))
            .unwrap();
        ledger
            .credit(&token, &user("user1"), Amount::units(5))
            .unwrap();

        assert_eq!(
            ledger.balance_of(&Asset::Native, &user("user1")),
            Amount::units(1)
        );
        assert_eq!(ledger.balance_of(&token, &user("user1")), Amount::units(5));
    }

    #[test]
    fn test_owners_are_isolated() {
        let mut ledger = Ledger::new();
        ledger
            .credit(&Asset::Native, &user("user1"), Amount::units(10))
            .unwrap();
        ledger
            .credit(&Asset::Native, &user("user2"), Amount::units(5))
            .unwrap();

        assert_eq!(
            ledger.balance_of(&Asset::Native, &user("user1")),
            Amount::units(10)
        );
        assert_eq!(
            ledger.balance_of(&Asset::Native, &user("user2")),
            Amount::units(5)
        );
    }

    #[test]
    fn test_debit_success() {
        let mut ledger = Ledger::new();
        ledger
            .credit(&Asset::Native, &user("user1"), Amount::units(10))
            .unwrap();
        let new_balance = ledger
            .debit(&Asset::Native, &user("user1"), Amount::units(3))
            .unwrap();

        assert_eq!(new_balance, Amount::units(7));
    }

    #[test]
    fn test_debit_insufficient() {
        let mut ledger = Ledger::new();
        ledger
            .credit(&Asset::Native, &user("user1"), Amount::units(1))
            .unwrap();

        let result = ledger.debit(&Asset::Native, &user("user1"), Amount::units(5));
        assert_eq!(
            result,
            Err(ExchangeError::InsufficientBalance {
                asset: Asset::Native,
                required: Amount::units(5),
                available: Amount::units(1),
            })
        );
        // Balance unchanged after rejection
        assert_eq!(
            ledger.balance_of(&Asset::Native, &user("user1")),
            Amount::units(1)
        );
    }

    #[test]
    fn test_debit_untouched_account() {
        let mut ledger = Ledger::new();
        let result = ledger.debit(&Asset::Native, &user("nobody"), Amount::units(1));
        assert!(matches!(
            result,
            Err(ExchangeError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_credit_overflow_rejected() {
        let mut ledger = Ledger::new();
        ledger
            .credit(&Asset::Native, &user("user1"), Amount::new(u128::MAX))
            .unwrap();

        let result = ledger.credit(&Asset::Native, &user("user1"), Amount::new(1));
        assert_eq!(result, Err(ExchangeError::Overflow));
        assert_eq!(
            ledger.balance_of(&Asset::Native, &user("user1")),
            Amount::new(u128::MAX)
        );
    }

    #[test]
    fn test_total_for_asset() {
        let mut ledger = Ledger::new();
        let token = Asset::token("0xTOK");
        ledger
            .credit(&token, &user("user1"), Amount::units(2))
            .unwrap();
        ledger
            .credit(&token, &user("user2"), Amount::units(3))
            .unwrap();
        ledger
            .credit(&Asset::Native, &user("user1"), Amount::units(100))
            .unwrap();

        assert_eq!(ledger.total_for_asset(&token), Amount::units(5));
    }
}
