//! Per-role sales policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::SalesRole;

/// A salary reward tier: reaching `min_sales` pays `basic_share` of the contracted basic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTier {
    /// Minimum number of sales needed to reach this tier.
    pub min_sales: u32,
    /// Share of the contracted basic paid as reward (0.5 = 50%).
    pub basic_share: Decimal,
}

/// Reward parameters for a sales role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPolicy {
    /// The role this policy applies to.
    pub role: SalesRole,
    /// Reward tiers. The highest tier reached applies.
    #[serde(default)]
    pub reward_tiers: Vec<RewardTier>,
}

impl SalesPolicy {
    /// The built-in policy for sales executives: half the basic from 3 sales.
    pub fn sales_executive() -> Self {
        Self {
            role: SalesRole::SalesExecutive,
            reward_tiers: vec![RewardTier {
                min_sales: 3,
                basic_share: Decimal::new(5, 1),
            }],
        }
    }

    /// The built-in policy for managers: 10% of basic from 1 sale, 50% from 3.
    pub fn manager() -> Self {
        Self {
            role: SalesRole::Manager,
            reward_tiers: vec![
                RewardTier {
                    min_sales: 3,
                    basic_share: Decimal::new(5, 1),
                },
                RewardTier {
                    min_sales: 1,
                    basic_share: Decimal::new(1, 1),
                },
            ],
        }
    }

    /// Returns the highest tier reached by `sales_count`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::SalesPolicy;
    /// use rust_decimal::Decimal;
    ///
    /// let policy = SalesPolicy::manager();
    /// assert_eq!(policy.tier_for(2).unwrap().basic_share, Decimal::new(1, 1));
    /// assert!(policy.tier_for(0).is_none());
    /// ```
    pub fn tier_for(&self, sales_count: u32) -> Option<&RewardTier> {
        self.reward_tiers
            .iter()
            .filter(|tier| sales_count >= tier.min_sales)
            .max_by_key(|tier| tier.min_sales)
    }
}
