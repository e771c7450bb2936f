//! Sales incentive calculation.
//!
//! This module classifies each deal into an incentive tier by its revenue
//! ratio, applies the holdback rule that keeps a deal locked until a later
//! deal exists, and sums the incentive payable for a payroll month.

use rust_decimal::Decimal;

use crate::config::IncentiveRates;
use crate::models::{AuditStep, AuditWarning, Deal, DealIncentive, IncentiveTier, PayMonth};

use super::rounding::round_cents;

/// The result of an incentive calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct IncentiveSummary {
    /// Per-deal evaluation, ordered by date.
    pub deals: Vec<DealIncentive>,
    /// Incentive payable for the month.
    pub total_incentive: Decimal,
    /// Sales dated inside the month.
    pub sales_count: u32,
    /// Sales across the whole history.
    pub lifetime_sales_count: u32,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Data-quality warnings.
    pub warnings: Vec<AuditWarning>,
}

/// A provider of payable incentive for a payroll month.
///
/// [`DealIncentiveEngine`] is the built-in implementation. A payroll engine
/// configured without a custom provider uses it.
pub trait IncentiveCalculator: Send + Sync {
    /// Evaluates an employee's full deal history for `period`.
    fn calculate(&self, deals: &[Deal], period: PayMonth, step_number: u32) -> IncentiveSummary;
}

/// Revenue ratio of a deal; zero when `cv_count` is zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::revenue_ratio;
/// use rust_decimal::Decimal;
///
/// assert_eq!(revenue_ratio(Decimal::new(6000, 0), Decimal::new(1_000_000, 0)), Decimal::new(6, 3));
/// assert_eq!(revenue_ratio(Decimal::new(6000, 0), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn revenue_ratio(deal_value: Decimal, cv_count: Decimal) -> Decimal {
    if cv_count.is_zero() {
        Decimal::ZERO
    } else {
        deal_value / cv_count
    }
}

/// Maps a revenue ratio to its tier and rate.
pub fn classify_ratio(ratio: Decimal, rates: &IncentiveRates) -> (IncentiveTier, Decimal) {
    if ratio > rates.standard_threshold {
        (IncentiveTier::Standard, rates.standard_rate)
    } else if ratio >= rates.reduced_threshold {
        (IncentiveTier::Reduced, rates.reduced_rate)
    } else {
        (IncentiveTier::Excluded, Decimal::ZERO)
    }
}

/// The built-in deal incentive rules.
#[derive(Debug, Clone)]
pub struct DealIncentiveEngine {
    rates: IncentiveRates,
}

impl DealIncentiveEngine {
    /// Creates an engine with the given tier rates.
    pub fn new(rates: IncentiveRates) -> Self {
        Self { rates }
    }

    /// Incentive amount of a single deal before the unlock rule.
    ///
    /// `rate * cv_count`, halved (by the supportive share) for joint sales.
    pub fn deal_amount(&self, deal: &Deal) -> (Decimal, IncentiveTier, Decimal, Decimal) {
        let ratio = revenue_ratio(deal.deal_value, deal.cv_count);
        let (tier, rate) = classify_ratio(ratio, &self.rates);

        let mut amount = rate * deal.cv_count;
        if deal.is_supportive {
            amount *= self.rates.supportive_share;
        }

        (round_cents(amount), tier, rate, ratio)
    }
}

impl IncentiveCalculator for DealIncentiveEngine {
    /// Evaluates the full history.
    ///
    /// Deals are ordered by date (ties keep their input order). The deal at
    /// position `i` is unlocked iff a deal exists at some position after
    /// `i`, so the most recent deal is always locked. An amount is payable
    /// only when the deal is unlocked, the builder payment was received and
    /// the deal is dated inside the month.
    fn calculate(&self, deals: &[Deal], period: PayMonth, step_number: u32) -> IncentiveSummary {
        let mut ordered: Vec<&Deal> = deals.iter().collect();
        ordered.sort_by_key(|deal| deal.date);

        let last_index = ordered.len().saturating_sub(1);
        let mut warnings = Vec::new();
        let mut evaluated = Vec::with_capacity(ordered.len());

        for (index, deal) in ordered.iter().enumerate() {
            if deal.cv_count.is_zero() {
                warnings.push(AuditWarning::new(
                    "ZERO_CV_DEAL",
                    format!("Deal '{}' has zero cv_count; no incentive", deal.id),
                    "low",
                ));
            }

            let (amount, tier, rate, ratio) = self.deal_amount(deal);
            let unlocked = index < last_index;
            let in_period = period.contains(deal.date);
            let payable = unlocked && deal.builder_payment_received && in_period;

            evaluated.push(DealIncentive {
                deal_id: deal.id.clone(),
                date: deal.date,
                deal_type: deal.deal_type,
                revenue_ratio: ratio,
                tier,
                rate,
                amount,
                unlocked,
                in_period,
                payable,
            });
        }

        let total_incentive: Decimal = evaluated
            .iter()
            .filter(|d| d.payable)
            .map(|d| d.amount)
            .sum();

        let sales_count = ordered
            .iter()
            .filter(|deal| period.contains(deal.date))
            .fold(0u32, |total, deal| total.saturating_add(deal.number_of_sales));
        let lifetime_sales_count = ordered
            .iter()
            .fold(0u32, |total, deal| total.saturating_add(deal.number_of_sales));

        let payable_ids: Vec<&str> = evaluated
            .iter()
            .filter(|d| d.payable)
            .map(|d| d.deal_id.as_str())
            .collect();
        let locked_in_period = evaluated
            .iter()
            .filter(|d| d.in_period && !d.unlocked)
            .count();

        let audit_step = AuditStep {
            step_number,
            rule_id: "deal_incentive".to_string(),
            rule_name: "Deal Incentive".to_string(),
            input: serde_json::json!({
                "deals_in_history": ordered.len(),
                "period": format!("{}-{:02}", period.year(), period.month()),
                "standard_threshold": self.rates.standard_threshold.normalize().to_string(),
                "reduced_threshold": self.rates.reduced_threshold.normalize().to_string()
            }),
            output: serde_json::json!({
                "payable_deals": payable_ids,
                "locked_in_period": locked_in_period,
                "total_incentive": total_incentive.normalize().to_string(),
                "sales_count": sales_count,
                "lifetime_sales_count": lifetime_sales_count
            }),
            reasoning: format!(
                "{} of {} deals payable for {}-{:02}, total {}",
                payable_ids.len(),
                ordered.len(),
                period.year(),
                period.month(),
                total_incentive.normalize()
            ),
        };

        IncentiveSummary {
            deals: evaluated,
            total_incentive,
            sales_count,
            lifetime_sales_count,
            audit_step,
            warnings,
        }
    }
}
