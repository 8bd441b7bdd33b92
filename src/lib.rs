//! Loyalty-program ledger: an issuing authority grants reward certificates and
//! credits, and holders redeem certificates against a catalog of rewards.

pub mod account;
pub mod authority;
pub mod catalog;
#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;
pub mod error;
pub mod instruction;
pub mod issuance;
pub mod ledger;
pub mod processor;
pub mod redemption;
pub mod registry;
pub mod state;

pub use catalog::RewardDefinition;
pub use error::LedgerError;
pub use issuance::Issuance;
pub use ledger::Ledger;
pub use redemption::Redemption;
