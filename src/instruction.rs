use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

/// Defines the instructions for the reward ledger program.
///
/// Every instruction expects the same accounts:
/// 0. `[signer]` Caller. Queries do not require a signature.
/// 1. `[writable]` Config account (authority, treasury, transferability flag).
/// 2. `[writable]` Ledger account (catalog, balances, certificates).
///
/// `Initialize` additionally expects:
/// 3. `[]` Rent sysvar.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum LedgerInstruction {
    /// Sets up the config and an empty ledger. Must be called once.
    Initialize {
        /// The issuing authority. Cannot be changed later.
        authority: Pubkey,
        /// Account that redeemed credits settle into. Must differ from
        /// `authority`.
        treasury: Pubkey,
    },

    /// Appends a reward to the catalog. Authority only.
    AddReward {
        name: String,
        credit_amount: u64,
        description: String,
    },

    /// Mints a certificate (non-empty `metadata_uri`) and/or grants credits
    /// (non-zero `credit_amount`) to `to`. Authority only.
    Issue {
        to: Pubkey,
        metadata_uri: String,
        credit_amount: u64,
    },

    /// Burns a certificate the caller holds or is approved for and debits the
    /// linked reward's cost from the caller.
    Redeem { certificate_id: u64 },

    /// Turns redemption on or off for everyone. Authority only.
    SetTransferability { enabled: bool },

    /// Allows `delegate` to redeem the caller's certificate.
    Approve {
        certificate_id: u64,
        delegate: Pubkey,
    },

    /// Returns the Borsh-encoded `RewardDefinition` at `index` as return data.
    GetReward { index: u64 },

    /// Returns a Borsh-encoded `bool` as return data.
    IsRedeemed { account: Pubkey },

    /// Returns a Borsh-encoded `u64` as return data.
    GetBalance { account: Pubkey },
}
