//! Sales transaction ("deal") model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classification of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DealType {
    /// A regular sale.
    #[default]
    Normal,
    /// An NPL sale. Incentive treatment differs only through the revenue ratio tiers.
    #[serde(rename = "NPL")]
    Npl,
}

/// A sales transaction credited to an employee.
///
/// Deals accumulate for the whole tenure of an employee. Whether a deal's
/// incentive can be paid depends on later deals existing, so the incentive
/// engine always receives the full history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Unique identifier for the deal.
    pub id: String,
    /// The employee credited with the deal.
    pub employee_id: String,
    /// The booking date of the deal.
    pub date: NaiveDate,
    /// Revenue realised from the deal.
    pub deal_value: Decimal,
    /// Consideration value: the notional size of the deal and the incentive base.
    pub cv_count: Decimal,
    /// Normal or NPL.
    #[serde(default, rename = "type")]
    pub deal_type: DealType,
    /// Whether the sale was made jointly with another employee.
    #[serde(default)]
    pub is_supportive: bool,
    /// Number of sales attributable to this record; zero when missing.
    #[serde(
        default,
        deserialize_with = "crate::calculation::deserialize_lenient_count"
    )]
    pub number_of_sales: u32,
    /// Whether the builder's payment for the deal has been received.
    #[serde(default)]
    pub builder_payment_received: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_deal_with_defaults() {
        let json = r#"{
            "id": "deal_001",
            "employee_id": "emp_001",
            "date": "2025-03-10",
            "deal_value": "6000",
            "cv_count": "1000000"
        }"#;

        let deal: Deal = serde_json::from_str(json).unwrap();
        assert_eq!(deal.deal_type, DealType::Normal);
        assert!(!deal.is_supportive);
        assert!(!deal.builder_payment_received);
        assert_eq!(deal.number_of_sales, 0);
        assert_eq!(deal.cv_count, Decimal::new(1_000_000, 0));
    }

    #[test]
    fn test_deserialize_npl_deal() {
        let json = r#"{
            "id": "deal_002",
            "employee_id": "emp_001",
            "date": "2025-03-12",
            "deal_value": "2500",
            "cv_count": "800000",
            "type": "NPL",
            "is_supportive": true,
            "number_of_sales": 2,
            "builder_payment_received": true
        }"#;

        let deal: Deal = serde_json::from_str(json).unwrap();
        assert_eq!(deal.deal_type, DealType::Npl);
        assert!(deal.is_supportive);
        assert_eq!(deal.number_of_sales, 2);
    }
}
