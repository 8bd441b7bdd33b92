use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    msg,
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::Pubkey,
};

use crate::{
    account::AccountLedger,
    authority::AuthorityGuard,
    catalog::RewardCatalog,
    registry::{CertificateBook, CreditBook},
};

/// Configuration state account for the reward ledger.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigAccount {
    /// Tracks if the account is initialized.
    pub is_initialized: bool,
    /// The issuing authority: defines rewards, issues certificates and
    /// credits, toggles redemption.
    pub authority: Pubkey,
    /// Receives the credits spent on redemptions. Never the authority and
    /// never allowed to redeem.
    pub treasury: Pubkey,
    /// Whether certificates may currently be redeemed.
    pub transferable: bool,
}

impl ConfigAccount {
    pub fn new(authority: Pubkey, treasury: Pubkey) -> Self {
        Self {
            is_initialized: true,
            authority,
            treasury,
            transferable: false,
        }
    }
}

impl AuthorityGuard for ConfigAccount {
    fn is_authority(&self, caller: &Pubkey) -> bool {
        self.is_initialized && self.authority == *caller
    }
}

impl Sealed for ConfigAccount {}
impl IsInitialized for ConfigAccount {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}
impl Pack for ConfigAccount {
    // LEN: bool (1) + Pubkey (32) + Pubkey (32) + bool (1)
    const LEN: usize = 1 + 32 + 32 + 1;

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let mut writer = std::io::Cursor::new(dst);
        self.serialize(&mut writer).unwrap();
    }

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let mut reader = src;
        ConfigAccount::deserialize(&mut reader).map_err(|_| ProgramError::InvalidAccountData)
    }
}

/// Everything the ledger owns besides its configuration. Stored Borsh-encoded
/// at the start of the program-owned ledger account; the account is allocated
/// up front, so the encoding may be followed by unused bytes.
///
/// The account size is fixed at `Initialize` and never grows. Catalog entries,
/// account entries, live certificates and burned certificate ids all stay in
/// the encoding forever, so once it no longer fits every mutating instruction
/// fails with `AccountDataTooSmall`. Size the account for the ledger's
/// lifetime.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    pub catalog: RewardCatalog,
    pub accounts: AccountLedger,
    pub certificates: CertificateBook,
    pub credits: CreditBook,
}

impl LedgerState {
    pub fn load(src: &[u8]) -> Result<Self, ProgramError> {
        let mut reader = src;
        LedgerState::deserialize(&mut reader).map_err(|e| {
            msg!("Error: Ledger account data is malformed: {}", e);
            ProgramError::InvalidAccountData
        })
    }

    pub fn store(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        let mut writer = dst;
        self.serialize(&mut writer).map_err(|_| {
            msg!("Error: Ledger account too small for current state");
            ProgramError::AccountDataTooSmall
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::RewardDefinition, registry::CertificateRegistry};

    #[test]
    fn config_pack_round_trips_through_fixed_buffer() {
        let config = ConfigAccount {
            transferable: true,
            ..ConfigAccount::new(Pubkey::new_unique(), Pubkey::new_unique())
        };
        let mut buf = [0u8; ConfigAccount::LEN];
        ConfigAccount::pack(config, &mut buf).unwrap();
        assert_eq!(ConfigAccount::unpack(&buf).unwrap(), config);
    }

    #[test]
    fn zeroed_config_is_uninitialized() {
        let buf = [0u8; ConfigAccount::LEN];
        let config = ConfigAccount::unpack_unchecked(&buf).unwrap();
        assert!(!config.is_initialized());
        assert!(ConfigAccount::unpack(&buf).is_err());
        assert!(!config.is_authority(&Pubkey::default()));
    }

    #[test]
    fn ledger_state_survives_trailing_space() {
        let mut state = LedgerState::default();
        state.catalog.push(RewardDefinition {
            name: "Coffee".into(),
            credit_amount: 10,
            description: "Free coffee".into(),
        });
        let alice = Pubkey::new_unique();
        state.certificates.mint(alice, "ipfs://coffee1".into(), 0).unwrap();
        state.accounts.credit(alice, 10).unwrap();

        let mut buf = vec![0u8; 1024];
        state.store(&mut buf).unwrap();
        assert_eq!(LedgerState::load(&buf).unwrap(), state);
    }

    #[test]
    fn store_into_short_buffer_fails() {
        let mut state = LedgerState::default();
        state.catalog.push(RewardDefinition {
            name: "A very long reward name".into(),
            credit_amount: 1,
            description: "and an equally long description".into(),
        });
        let mut buf = vec![0u8; 16];
        assert_eq!(state.store(&mut buf), Err(ProgramError::AccountDataTooSmall));
    }
}
