use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::LedgerError;

/// Per-identity bookkeeping kept by the ledger itself.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountEntry {
    pub credit_balance: u64,
    /// Set on the first successful redemption and never cleared. Does not say
    /// which certificate was redeemed.
    pub has_redeemed: bool,
}

/// Credit balances and redemption flags, tracked in parallel with the credit
/// registry's own balances.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountLedger {
    entries: BTreeMap<Pubkey, AccountEntry>,
}

impl AccountLedger {
    pub fn entry(&self, account: &Pubkey) -> AccountEntry {
        self.entries.get(account).copied().unwrap_or_default()
    }

    pub fn balance_of(&self, account: &Pubkey) -> u64 {
        self.entry(account).credit_balance
    }

    pub fn is_redeemed(&self, account: &Pubkey) -> bool {
        self.entry(account).has_redeemed
    }

    /// Fails with `NumericalOverflow` if `account` cannot absorb `amount` more.
    pub fn check_credit(&self, account: &Pubkey, amount: u64) -> Result<u64, LedgerError> {
        self.balance_of(account)
            .checked_add(amount)
            .ok_or(LedgerError::NumericalOverflow)
    }

    /// Fails with `InsufficientBalance` if debiting `amount` would go below zero.
    pub fn check_debit(&self, account: &Pubkey, amount: u64) -> Result<u64, LedgerError> {
        let balance = self.balance_of(account);
        balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: *account,
                balance,
                required: amount,
            })
    }

    pub fn credit(&mut self, account: Pubkey, amount: u64) -> Result<(), LedgerError> {
        let updated = self.check_credit(&account, amount)?;
        self.entries.entry(account).or_default().credit_balance = updated;
        Ok(())
    }

    pub fn debit(&mut self, account: Pubkey, amount: u64) -> Result<(), LedgerError> {
        let updated = self.check_debit(&account, amount)?;
        self.entries.entry(account).or_default().credit_balance = updated;
        Ok(())
    }

    pub fn mark_redeemed(&mut self, account: Pubkey) {
        self.entries.entry(account).or_default().has_redeemed = true;
    }
}
