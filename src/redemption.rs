use solana_program::pubkey::Pubkey;

use crate::{
    error::LedgerError,
    ledger::Ledger,
    registry::{CertificateRegistry, CreditRegistry},
};

/// What a successful [`Ledger::redeem`] settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redemption {
    pub certificate_id: u64,
    pub reward_index: u64,
    pub credits_spent: u64,
}

impl<C: CertificateRegistry, F: CreditRegistry> Ledger<C, F> {
    /// Whether `caller` may redeem `certificate_id`: it must own the
    /// certificate or be its approved delegate.
    pub fn can_redeem(&self, caller: &Pubkey, certificate_id: u64) -> bool {
        self.certificates.is_approved_or_owner(caller, certificate_id)
    }

    /// Burns `certificate_id` and debits the linked reward's credit cost from
    /// the caller, moving the credits into the treasury. Both the credit
    /// registry and the account ledger record the move.
    ///
    /// Every check runs before the burn, so a rejected redemption leaves the
    /// certificate live and all balances untouched.
    pub fn redeem(&mut self, caller: Pubkey, certificate_id: u64) -> Result<Redemption, LedgerError> {
        let reward_index = self
            .certificates
            .certificate(certificate_id)
            .map(|c| c.reward_index)
            .ok_or(LedgerError::UnknownCertificate(certificate_id))?;

        if !self.config.transferable {
            return Err(LedgerError::RedemptionDisabled);
        }

        // Redemption requires the caller to hold or be approved for the
        // certificate.
        if !self.can_redeem(&caller, certificate_id) {
            return Err(LedgerError::NotApprovedOrOwner {
                caller,
                certificate_id,
            });
        }

        // A treasury redemption would be a self-transfer and cost nothing.
        let treasury = self.config.treasury;
        if caller == treasury {
            return Err(LedgerError::InvalidTreasury { account: treasury });
        }

        let cost = self.catalog.get(reward_index)?.credit_amount;
        self.accounts.check_debit(&caller, cost)?;
        self.accounts.check_credit(&treasury, cost)?;
        self.check_settlement(&caller, &treasury, cost)?;

        self.certificates.burn(certificate_id)?;
        self.accounts.mark_redeemed(caller);
        self.credits.move_credits(&caller, treasury, cost)?;
        self.accounts.debit(caller, cost)?;
        self.accounts.credit(treasury, cost)?;

        Ok(Redemption {
            certificate_id,
            reward_index,
            credits_spent: cost,
        })
    }

    /// The registry side of the balance check: `from` must hold `amount`
    /// and `to` must be able to receive it.
    fn check_settlement(&self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<(), LedgerError> {
        let balance = self.credits.balance_of(from);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: *from,
                balance,
                required: amount,
            });
        }
        self.credits
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::NumericalOverflow)?;
        Ok(())
    }
}
