use solana_program::{msg, pubkey::Pubkey};

use crate::error::LedgerError;

/// Decides whether a caller may perform privileged operations.
pub trait AuthorityGuard {
    fn is_authority(&self, caller: &Pubkey) -> bool;

    fn require_authority(&self, caller: &Pubkey) -> Result<(), LedgerError> {
        if !self.is_authority(caller) {
            msg!("Error: Signer {} is not the configured authority", caller);
            return Err(LedgerError::Unauthorized { caller: *caller });
        }
        Ok(())
    }
}
