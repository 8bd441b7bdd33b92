use solana_program::pubkey::Pubkey;

use crate::{
    authority::AuthorityGuard,
    error::LedgerError,
    ledger::Ledger,
    registry::{CertificateRegistry, CreditRegistry, FIRST_CERTIFICATE_ID},
};

/// What a call to [`Ledger::issue`] actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Issuance {
    /// Id of the minted certificate, if a metadata URI was given.
    pub certificate_id: Option<u64>,
    pub credits: u64,
}

impl Issuance {
    pub fn is_noop(&self) -> bool {
        self.certificate_id.is_none() && self.credits == 0
    }
}

impl<C: CertificateRegistry, F: CreditRegistry> Ledger<C, F> {
    /// Mints a certificate to `to` when `metadata_uri` is non-empty and grants
    /// `credit_amount` credits when it is non-zero. Either, both or neither may
    /// happen; neither is not an error.
    ///
    /// The certificate is linked to catalog entry `id - 1`. Whether that entry
    /// exists is only checked at redemption.
    pub fn issue(
        &mut self,
        caller: &Pubkey,
        to: Pubkey,
        metadata_uri: String,
        credit_amount: u64,
    ) -> Result<Issuance, LedgerError> {
        self.config.require_authority(caller)?;

        if credit_amount > 0 {
            self.accounts.check_credit(&to, credit_amount)?;
            self.credits
                .balance_of(&to)
                .checked_add(credit_amount)
                .and(self.credits.total_supply().checked_add(credit_amount))
                .ok_or(LedgerError::NumericalOverflow)?;
        }

        let certificate_id = if metadata_uri.is_empty() {
            None
        } else {
            let reward_index = self
                .certificates
                .next_id()
                .checked_sub(FIRST_CERTIFICATE_ID)
                .ok_or(LedgerError::NumericalOverflow)?;
            Some(self.certificates.mint(to, metadata_uri, reward_index)?)
        };

        if credit_amount > 0 {
            self.credits.issue(to, credit_amount)?;
            self.accounts.credit(to, credit_amount)?;
        }

        Ok(Issuance {
            certificate_id,
            credits: credit_amount,
        })
    }
}
