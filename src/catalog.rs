use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::LedgerError;

/// A reward a certificate can be redeemed against.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RewardDefinition {
    pub name: String,
    /// Credits debited from the redeemer's balance.
    pub credit_amount: u64,
    pub description: String,
}

/// Append-only list of reward definitions, addressed by insertion index.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardCatalog {
    rewards: Vec<RewardDefinition>,
}

impl RewardCatalog {
    /// Appends `reward` and returns the index it will keep forever.
    pub fn push(&mut self, reward: RewardDefinition) -> u64 {
        self.rewards.push(reward);
        self.len() - 1
    }

    pub fn get(&self, index: u64) -> Result<&RewardDefinition, LedgerError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.rewards.get(i))
            .ok_or(LedgerError::OutOfRange {
                index,
                len: self.len(),
            })
    }

    pub fn len(&self) -> u64 {
        self.rewards.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reward(name: &str, credit_amount: u64) -> RewardDefinition {
        RewardDefinition {
            name: name.to_string(),
            credit_amount,
            description: format!("{name} reward"),
        }
    }

    #[test]
    fn indices_are_dense_and_stable() {
        let mut catalog = RewardCatalog::default();
        assert_eq!(catalog.push(reward("Coffee", 10)), 0);
        assert_eq!(catalog.push(reward("Bagel", 15)), 1);
        assert_eq!(catalog.push(reward("Lunch", 40)), 2);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(0).unwrap(), &reward("Coffee", 10));
        assert_eq!(catalog.get(1).unwrap().credit_amount, 15);
    }

    #[test]
    fn get_past_the_end_is_out_of_range() {
        let mut catalog = RewardCatalog::default();
        assert!(catalog.is_empty());
        assert_eq!(
            catalog.get(0),
            Err(LedgerError::OutOfRange { index: 0, len: 0 })
        );

        catalog.push(reward("Coffee", 10));
        assert_eq!(
            catalog.get(u64::MAX),
            Err(LedgerError::OutOfRange {
                index: u64::MAX,
                len: 1
            })
        );
    }
}
