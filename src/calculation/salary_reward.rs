//! Role-based salary reward.

use rust_decimal::Decimal;

use crate::config::PayrollPolicy;
use crate::models::{AuditStep, AuditWarning, Employee, RewardTier, SalesPolicy, SalesRole};

use super::rounding::round_currency;

/// The result of a salary reward calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct SalaryRewardResult {
    /// Role the employee was classified as.
    pub role: SalesRole,
    /// The reward paid on top of net pay.
    pub reward: Decimal,
    /// The tier reached, if any.
    pub tier: Option<RewardTier>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Set when the role had no configured policy.
    pub warnings: Vec<AuditWarning>,
}

/// Calculates the salary reward for a sales count.
///
/// The role comes from [`Employee::sales_role`]. A role without a configured
/// policy falls back to the built-in Sales Executive policy. The reward is
/// the tier's share of the contracted (not earned) basic, rounded to a
/// whole currency unit.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_salary_reward;
/// use payroll_engine::config::PayrollPolicy;
/// use payroll_engine::models::{Employee, EmployeeCategory};
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     category: EmployeeCategory::Skilled,
///     position: "Sales Manager".to_string(),
///     monthly_ctc: Decimal::new(35000, 0),
/// };
///
/// let result = calculate_salary_reward(&employee, 2, Decimal::new(17500, 0), &PayrollPolicy::default(), 5);
/// assert_eq!(result.reward, Decimal::new(1750, 0));
/// ```
pub fn calculate_salary_reward(
    employee: &Employee,
    sales_count: u32,
    contracted_basic: Decimal,
    policy: &PayrollPolicy,
    step_number: u32,
) -> SalaryRewardResult {
    let role = employee.sales_role();
    let mut warnings = Vec::new();

    let fallback;
    let sales_policy = match policy.sales_policy(role) {
        Some(found) => found,
        None => {
            warnings.push(AuditWarning::new(
                "SALES_POLICY_FALLBACK",
                format!(
                    "No sales policy for role '{}'; using Sales Executive rules",
                    role.as_str()
                ),
                "low",
            ));
            fallback = SalesPolicy::sales_executive();
            &fallback
        }
    };

    let tier = sales_policy.tier_for(sales_count).cloned();
    let reward = match &tier {
        Some(t) => round_currency(contracted_basic * t.basic_share),
        None => Decimal::ZERO,
    };

    let reasoning = match &tier {
        Some(t) => format!(
            "{} with {} sales reaches the {}-sale tier: {} x {} = {}",
            role.as_str(),
            sales_count,
            t.min_sales,
            contracted_basic.normalize(),
            t.basic_share.normalize(),
            reward
        ),
        None => format!(
            "{} with {} sales reaches no reward tier",
            role.as_str(),
            sales_count
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "salary_reward".to_string(),
        rule_name: "Salary Reward".to_string(),
        input: serde_json::json!({
            "position": employee.position,
            "role": role.as_str(),
            "sales_count": sales_count,
            "contracted_basic": contracted_basic.normalize().to_string()
        }),
        output: serde_json::json!({
            "tier_min_sales": tier.as_ref().map(|t| t.min_sales),
            "basic_share": tier.as_ref().map(|t| t.basic_share.normalize().to_string()),
            "salary_reward": reward.to_string()
        }),
        reasoning,
    };

    SalaryRewardResult {
        role,
        reward,
        tier,
        audit_step,
        warnings,
    }
}
