//! The ledger context every operation runs against.
//!
//! A `Ledger` owns the configuration, the reward catalog, the account ledger
//! and both registries. Operations take `&mut self`, so they run one at a
//! time; each validates before it mutates, and callers that need all-or-nothing
//! semantics across an external boundary work on a copy and keep it only when
//! the operation returned `Ok` (see `Processor`).

use solana_program::pubkey::Pubkey;

use crate::{
    account::AccountLedger,
    authority::AuthorityGuard,
    catalog::{RewardCatalog, RewardDefinition},
    error::LedgerError,
    registry::{CertificateBook, CertificateRegistry, CreditBook, CreditRegistry},
    state::{ConfigAccount, LedgerState},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger<C = CertificateBook, F = CreditBook> {
    pub(crate) config: ConfigAccount,
    pub(crate) catalog: RewardCatalog,
    pub(crate) accounts: AccountLedger,
    pub(crate) certificates: C,
    pub(crate) credits: F,
}

impl Ledger {
    /// Fresh ledger with redemption disabled. Redemptions settle into
    /// `treasury`.
    pub fn new(authority: Pubkey, treasury: Pubkey) -> Self {
        Self::from_state(ConfigAccount::new(authority, treasury), LedgerState::default())
    }

    pub fn from_state(config: ConfigAccount, state: LedgerState) -> Self {
        Self {
            config,
            catalog: state.catalog,
            accounts: state.accounts,
            certificates: state.certificates,
            credits: state.credits,
        }
    }

    pub fn into_state(self) -> (ConfigAccount, LedgerState) {
        (
            self.config,
            LedgerState {
                catalog: self.catalog,
                accounts: self.accounts,
                certificates: self.certificates,
                credits: self.credits,
            },
        )
    }
}

impl<C: CertificateRegistry, F: CreditRegistry> Ledger<C, F> {
    /// Ledger over externally provided registries, starting with an empty
    /// catalog and account ledger.
    pub fn with_registries(config: ConfigAccount, certificates: C, credits: F) -> Self {
        Self {
            config,
            catalog: RewardCatalog::default(),
            accounts: AccountLedger::default(),
            certificates,
            credits,
        }
    }

    pub fn config(&self) -> &ConfigAccount {
        &self.config
    }

    pub fn catalog(&self) -> &RewardCatalog {
        &self.catalog
    }

    pub fn certificates(&self) -> &C {
        &self.certificates
    }

    pub fn credits(&self) -> &F {
        &self.credits
    }

    pub fn add_reward(
        &mut self,
        caller: &Pubkey,
        name: String,
        credit_amount: u64,
        description: String,
    ) -> Result<u64, LedgerError> {
        self.config.require_authority(caller)?;
        Ok(self.catalog.push(RewardDefinition {
            name,
            credit_amount,
            description,
        }))
    }

    pub fn get_reward(&self, index: u64) -> Result<&RewardDefinition, LedgerError> {
        self.catalog.get(index)
    }

    pub fn set_transferability(&mut self, caller: &Pubkey, enabled: bool) -> Result<(), LedgerError> {
        self.config.require_authority(caller)?;
        self.config.transferable = enabled;
        Ok(())
    }

    pub fn is_transferable(&self) -> bool {
        self.config.transferable
    }

    pub fn is_redeemed(&self, account: &Pubkey) -> bool {
        self.accounts.is_redeemed(account)
    }

    pub fn get_balance(&self, account: &Pubkey) -> u64 {
        self.accounts.balance_of(account)
    }

    /// True when the ledger's own balance for `account` matches the credit
    /// registry's.
    pub fn is_reconciled(&self, account: &Pubkey) -> bool {
        self.accounts.balance_of(account) == self.credits.balance_of(account)
    }

    /// Lets `delegate` redeem `certificate_id` on the owner's behalf.
    pub fn approve(
        &mut self,
        caller: &Pubkey,
        certificate_id: u64,
        delegate: Pubkey,
    ) -> Result<(), LedgerError> {
        self.certificates.approve(caller, certificate_id, delegate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_reward_is_authority_only_and_append_only() {
        let authority = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();
        let mut ledger = Ledger::new(authority, Pubkey::new_unique());

        let coffee = ledger
            .add_reward(&authority, "Coffee".into(), 10, "Free coffee".into())
            .unwrap();
        assert_eq!(coffee, 0);

        assert_eq!(
            ledger.add_reward(&stranger, "Bagel".into(), 5, "Free bagel".into()),
            Err(LedgerError::Unauthorized { caller: stranger })
        );
        assert_eq!(ledger.catalog().len(), 1);

        let lunch = ledger
            .add_reward(&authority, "Lunch".into(), 40, "Free lunch".into())
            .unwrap();
        assert_eq!(lunch, 1);
        assert_eq!(ledger.get_reward(coffee).unwrap().name, "Coffee");
        assert_eq!(ledger.get_reward(lunch).unwrap().credit_amount, 40);
        assert_eq!(
            ledger.get_reward(2),
            Err(LedgerError::OutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn transferability_is_authority_only() {
        let authority = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();
        let mut ledger = Ledger::new(authority, Pubkey::new_unique());
        assert!(!ledger.is_transferable());

        assert_eq!(
            ledger.set_transferability(&stranger, true),
            Err(LedgerError::Unauthorized { caller: stranger })
        );
        assert!(!ledger.is_transferable());

        ledger.set_transferability(&authority, true).unwrap();
        assert!(ledger.is_transferable());
    }

    #[test]
    fn queries_on_unknown_accounts_do_not_fail() {
        let ledger = Ledger::new(Pubkey::new_unique(), Pubkey::new_unique());
        let nobody = Pubkey::new_unique();
        assert_eq!(ledger.get_balance(&nobody), 0);
        assert!(!ledger.is_redeemed(&nobody));
        assert!(ledger.is_reconciled(&nobody));
    }

    #[test]
    fn state_round_trip_preserves_everything() {
        let authority = Pubkey::new_unique();
        let mut ledger = Ledger::new(authority, Pubkey::new_unique());
        ledger
            .add_reward(&authority, "Coffee".into(), 10, "Free coffee".into())
            .unwrap();
        ledger.set_transferability(&authority, true).unwrap();

        let (config, state) = ledger.clone().into_state();
        assert_eq!(Ledger::from_state(config, state), ledger);
    }
}
