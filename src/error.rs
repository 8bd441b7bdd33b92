use solana_program::{program_error::ProgramError, pubkey::Pubkey};
use thiserror::Error;

/// Every way a ledger operation can be rejected. A rejected operation leaves
/// the ledger exactly as it was.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Caller {caller} is not the issuing authority")]
    Unauthorized { caller: Pubkey },
    #[error("Certificate {0} does not exist or was already redeemed")]
    UnknownCertificate(u64),
    #[error("Redemption is currently disabled")]
    RedemptionDisabled,
    #[error("Caller {caller} is neither owner nor approved for certificate {certificate_id}")]
    NotApprovedOrOwner { caller: Pubkey, certificate_id: u64 },
    #[error("Catalog index {index} out of range (catalog holds {len} rewards)")]
    OutOfRange { index: u64, len: u64 },
    #[error("Account {account} holds {balance} credits, {required} required")]
    InsufficientBalance {
        account: Pubkey,
        balance: u64,
        required: u64,
    },
    #[error("Numerical overflow error")]
    NumericalOverflow,
    #[error("Invalid Instruction Data")]
    InvalidInstruction,
    #[error("Account Not Initialized")]
    NotInitialized,
    #[error("Account Already Initialized")]
    AlreadyInitialized,
    #[error("State account is not owned by this program")]
    InvalidStateAccountOwner,
    #[error("Account Not Rent Exempt")]
    NotRentExempt,
    #[error("Treasury {account} cannot act as authority or redeemer")]
    InvalidTreasury { account: Pubkey },
}

impl LedgerError {
    /// Stable code reported through `ProgramError::Custom`.
    pub fn code(&self) -> u32 {
        match self {
            LedgerError::Unauthorized { .. } => 0,
            LedgerError::UnknownCertificate(_) => 1,
            LedgerError::RedemptionDisabled => 2,
            LedgerError::NotApprovedOrOwner { .. } => 3,
            LedgerError::OutOfRange { .. } => 4,
            LedgerError::InsufficientBalance { .. } => 5,
            LedgerError::NumericalOverflow => 6,
            LedgerError::InvalidInstruction => 7,
            LedgerError::NotInitialized => 8,
            LedgerError::AlreadyInitialized => 9,
            LedgerError::InvalidStateAccountOwner => 10,
            LedgerError::NotRentExempt => 11,
            LedgerError::InvalidTreasury { .. } => 12,
        }
    }
}

impl From<LedgerError> for ProgramError {
    fn from(e: LedgerError) -> Self {
        ProgramError::Custom(e.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_custom_program_error() {
        let err: ProgramError = LedgerError::UnknownCertificate(999).into();
        assert_eq!(err, ProgramError::Custom(1));

        let err: ProgramError = LedgerError::OutOfRange { index: 4, len: 1 }.into();
        assert_eq!(err, ProgramError::Custom(4));
    }

    #[test]
    fn message_names_the_offending_value() {
        let msg = LedgerError::UnknownCertificate(999).to_string();
        assert!(msg.contains("999"));

        let msg = LedgerError::OutOfRange { index: 7, len: 2 }.to_string();
        assert!(msg.contains('7') && msg.contains('2'));
    }
}
