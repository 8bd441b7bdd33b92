//! Certificate and credit registries the ledger settles against.
//!
//! The ledger only talks to these through [`CertificateRegistry`] and
//! [`CreditRegistry`]. `CertificateBook` and `CreditBook` are the in-program
//! implementations persisted alongside the rest of the ledger state.

use std::collections::{BTreeMap, BTreeSet};

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::LedgerError;

/// Id handed to the first certificate ever minted.
pub const FIRST_CERTIFICATE_ID: u64 = 1;

/// Non-fungible bookkeeping: ownership, approvals, burning.
pub trait CertificateRegistry {
    /// Id the next `mint` will assign.
    fn next_id(&self) -> u64;

    fn mint(
        &mut self,
        to: Pubkey,
        metadata_uri: String,
        reward_index: u64,
    ) -> Result<u64, LedgerError>;

    fn burn(&mut self, certificate_id: u64) -> Result<(), LedgerError>;

    fn certificate(&self, certificate_id: u64) -> Option<&Certificate>;

    fn approve(
        &mut self,
        owner: &Pubkey,
        certificate_id: u64,
        delegate: Pubkey,
    ) -> Result<(), LedgerError>;

    fn exists(&self, certificate_id: u64) -> bool {
        self.certificate(certificate_id).is_some()
    }

    fn owner_of(&self, certificate_id: u64) -> Option<Pubkey> {
        self.certificate(certificate_id).map(|c| c.owner)
    }

    fn is_approved_or_owner(&self, spender: &Pubkey, certificate_id: u64) -> bool {
        self.certificate(certificate_id)
            .map(|c| c.owner == *spender || c.approved.as_ref() == Some(spender))
            .unwrap_or(false)
    }
}

/// Fungible bookkeeping: balances and total supply.
pub trait CreditRegistry {
    fn balance_of(&self, account: &Pubkey) -> u64;

    fn total_supply(&self) -> u64;

    fn issue(&mut self, to: Pubkey, amount: u64) -> Result<(), LedgerError>;

    fn move_credits(&mut self, from: &Pubkey, to: Pubkey, amount: u64)
        -> Result<(), LedgerError>;
}

/// A live (unburned) certificate.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub owner: Pubkey,
    /// Opaque metadata reference, e.g. an `ipfs://` URI.
    pub metadata_uri: String,
    /// Catalog entry this certificate settles against, fixed at mint.
    pub reward_index: u64,
    pub approved: Option<Pubkey>,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CertificateBook {
    next_id: u64,
    live: BTreeMap<u64, Certificate>,
    burned: BTreeSet<u64>,
}

impl Default for CertificateBook {
    fn default() -> Self {
        Self {
            next_id: FIRST_CERTIFICATE_ID,
            live: BTreeMap::new(),
            burned: BTreeSet::new(),
        }
    }
}

impl CertificateBook {
    pub fn is_burned(&self, certificate_id: u64) -> bool {
        self.burned.contains(&certificate_id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl CertificateRegistry for CertificateBook {
    fn next_id(&self) -> u64 {
        self.next_id
    }

    fn mint(
        &mut self,
        to: Pubkey,
        metadata_uri: String,
        reward_index: u64,
    ) -> Result<u64, LedgerError> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(LedgerError::NumericalOverflow)?;
        self.live.insert(
            id,
            Certificate {
                owner: to,
                metadata_uri,
                reward_index,
                approved: None,
            },
        );
        Ok(id)
    }

    fn burn(&mut self, certificate_id: u64) -> Result<(), LedgerError> {
        self.live
            .remove(&certificate_id)
            .ok_or(LedgerError::UnknownCertificate(certificate_id))?;
        self.burned.insert(certificate_id);
        Ok(())
    }

    fn certificate(&self, certificate_id: u64) -> Option<&Certificate> {
        self.live.get(&certificate_id)
    }

    fn approve(
        &mut self,
        owner: &Pubkey,
        certificate_id: u64,
        delegate: Pubkey,
    ) -> Result<(), LedgerError> {
        let certificate = self
            .live
            .get_mut(&certificate_id)
            .ok_or(LedgerError::UnknownCertificate(certificate_id))?;
        if certificate.owner != *owner {
            return Err(LedgerError::NotApprovedOrOwner {
                caller: *owner,
                certificate_id,
            });
        }
        certificate.approved = Some(delegate);
        Ok(())
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CreditBook {
    balances: BTreeMap<Pubkey, u64>,
    total_supply: u64,
}

impl CreditRegistry for CreditBook {
    fn balance_of(&self, account: &Pubkey) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u64 {
        self.total_supply
    }

    fn issue(&mut self, to: Pubkey, amount: u64) -> Result<(), LedgerError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::NumericalOverflow)?;
        let balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(LedgerError::NumericalOverflow)?;
        self.total_supply = supply;
        self.balances.insert(to, balance);
        Ok(())
    }

    fn move_credits(
        &mut self,
        from: &Pubkey,
        to: Pubkey,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(from);
        let remaining =
            from_balance
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientBalance {
                    account: *from,
                    balance: from_balance,
                    required: amount,
                })?;
        if *from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(LedgerError::NumericalOverflow)?;
        self.balances.insert(*from, remaining);
        self.balances.insert(to, credited);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_assigns_sequential_ids_from_one() {
        let mut book = CertificateBook::default();
        let alice = Pubkey::new_unique();
        assert_eq!(book.next_id(), FIRST_CERTIFICATE_ID);
        assert_eq!(book.mint(alice, "ipfs://a".into(), 0).unwrap(), 1);
        assert_eq!(book.mint(alice, "ipfs://b".into(), 1).unwrap(), 2);
        assert_eq!(book.owner_of(2), Some(alice));
        assert_eq!(book.certificate(1).unwrap().metadata_uri, "ipfs://a");
    }

    #[test]
    fn burn_is_final_and_ids_are_not_reused() {
        let mut book = CertificateBook::default();
        let alice = Pubkey::new_unique();
        let id = book.mint(alice, "ipfs://a".into(), 0).unwrap();

        book.burn(id).unwrap();
        assert!(!book.exists(id));
        assert!(book.is_burned(id));
        assert_eq!(book.burn(id), Err(LedgerError::UnknownCertificate(id)));

        let next = book.mint(alice, "ipfs://b".into(), 1).unwrap();
        assert_ne!(next, id);
        assert_eq!(book.live_count(), 1);
    }

    #[test]
    fn approval_extends_to_delegate_only() {
        let mut book = CertificateBook::default();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let carol = Pubkey::new_unique();
        let id = book.mint(alice, "ipfs://a".into(), 0).unwrap();

        assert!(book.is_approved_or_owner(&alice, id));
        assert!(!book.is_approved_or_owner(&bob, id));

        assert_eq!(
            book.approve(&bob, id, carol),
            Err(LedgerError::NotApprovedOrOwner {
                caller: bob,
                certificate_id: id
            })
        );
        book.approve(&alice, id, bob).unwrap();
        assert!(book.is_approved_or_owner(&bob, id));
        assert!(!book.is_approved_or_owner(&carol, id));
        assert!(!book.is_approved_or_owner(&alice, 42));
    }

    #[test]
    fn credit_moves_conserve_supply() {
        let mut credits = CreditBook::default();
        let alice = Pubkey::new_unique();
        let shop = Pubkey::new_unique();
        credits.issue(alice, 25).unwrap();
        credits.move_credits(&alice, shop, 10).unwrap();

        assert_eq!(credits.balance_of(&alice), 15);
        assert_eq!(credits.balance_of(&shop), 10);
        assert_eq!(credits.total_supply(), 25);
    }

    #[test]
    fn move_beyond_balance_is_rejected() {
        let mut credits = CreditBook::default();
        let alice = Pubkey::new_unique();
        let shop = Pubkey::new_unique();
        credits.issue(alice, 5).unwrap();

        assert!(matches!(
            credits.move_credits(&alice, shop, 6),
            Err(LedgerError::InsufficientBalance { balance: 5, required: 6, .. })
        ));
        assert_eq!(credits.balance_of(&alice), 5);
        assert_eq!(credits.balance_of(&shop), 0);
    }

    #[test]
    fn issue_overflow_leaves_supply_untouched() {
        let mut credits = CreditBook::default();
        let alice = Pubkey::new_unique();
        credits.issue(alice, u64::MAX).unwrap();
        assert_eq!(
            credits.issue(Pubkey::new_unique(), 1),
            Err(LedgerError::NumericalOverflow)
        );
        assert_eq!(credits.total_supply(), u64::MAX);
    }
}
