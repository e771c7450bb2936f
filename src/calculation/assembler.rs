//! Payroll assembly.
//!
//! [`PayrollEngine`] runs the calculation components in order, feeding the
//! attendance proration factor into the structure and statutory steps, and
//! merges the incentive and reward outputs into net pay. The result carries
//! every intermediate figure and the audit trace of each step.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::PayrollPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, Deal, EmployeeDeductions, EmployerContributions, IncentiveDetails,
    PayMonth, Payroll, SalaryComponents,
};

use super::attendance::aggregate_attendance;
use super::incentive::{DealIncentiveEngine, IncentiveCalculator, IncentiveSummary};
use super::input::{PayrollInput, sanitize};
use super::rounding::round_currency;
use super::salary_reward::calculate_salary_reward;
use super::salary_structure::resolve_salary_structure;
use super::statutory::calculate_statutory;

/// Largest allowed difference between `total_ctc` and its components.
pub const CTC_TOLERANCE: Decimal = Decimal::ONE;

/// Checks a reported total CTC against the named parts it is made of.
///
/// The earned components must sum to the earned gross, the statutory cost
/// must equal the employer contributions, and `total_ctc` must be within
/// [`CTC_TOLERANCE`] of `components + employer contributions + variable_part`.
///
/// # Errors
///
/// Returns `CalculationError` when a subtotal disagrees with its parts and
/// `CtcMismatch` when `total_ctc` is out of tolerance.
pub fn verify_ctc(
    total_ctc: Decimal,
    earnings: &SalaryComponents,
    employer: &EmployerContributions,
    statutory_cost: Decimal,
    variable_part: Decimal,
) -> EngineResult<()> {
    let components = earnings.component_sum();
    if components != earnings.gross_salary {
        return Err(EngineError::CalculationError {
            message: format!(
                "earned gross {} differs from its components {}",
                earnings.gross_salary, components
            ),
        });
    }

    let employer_total = employer.total();
    if employer_total != statutory_cost {
        return Err(EngineError::CalculationError {
            message: format!(
                "statutory cost {} differs from employer contributions {}",
                statutory_cost, employer_total
            ),
        });
    }

    let expected = components + employer_total + variable_part;
    if (total_ctc - expected).abs() > CTC_TOLERANCE {
        return Err(EngineError::CtcMismatch {
            total_ctc,
            expected,
        });
    }
    Ok(())
}

fn checked(label: &str, value: Option<Decimal>) -> EngineResult<Decimal> {
    value.ok_or_else(|| EngineError::CalculationError {
        message: format!("{} is out of range", label),
    })
}

/// The payroll calculation engine.
///
/// Holds the policy and an optional custom incentive provider. Without a
/// provider the built-in [`DealIncentiveEngine`] is used. The engine holds
/// no mutable state, so a single instance can compute payrolls for many
/// employees in parallel.
#[derive(Clone)]
pub struct PayrollEngine {
    policy: Arc<PayrollPolicy>,
    incentive_calculator: Option<Arc<dyn IncentiveCalculator>>,
}

impl std::fmt::Debug for PayrollEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayrollEngine")
            .field("policy", &self.policy)
            .field("custom_incentive_calculator", &self.incentive_calculator.is_some())
            .finish()
    }
}

impl PayrollEngine {
    /// Creates an engine using the built-in incentive rules.
    pub fn new(policy: PayrollPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
            incentive_calculator: None,
        }
    }

    /// Replaces the incentive provider.
    pub fn with_incentive_calculator(mut self, calculator: Arc<dyn IncentiveCalculator>) -> Self {
        self.incentive_calculator = Some(calculator);
        self
    }

    /// Returns the policy in use.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }

    fn calculate_incentives(
        &self,
        deals: &[Deal],
        period: PayMonth,
        step_number: u32,
    ) -> IncentiveSummary {
        match &self.incentive_calculator {
            Some(calculator) => calculator.calculate(deals, period, step_number),
            None => DealIncentiveEngine::new(self.policy.incentive.clone())
                .calculate(deals, period, step_number),
        }
    }

    /// Computes the payroll for one employee and month.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when boundary sanitisation rejects the input,
    /// `CalculationError` when an assembled sum is out of range, and the
    /// errors of [`verify_ctc`] if the total CTC does not reconcile.
    pub fn calculate(&self, input: &PayrollInput<'_>) -> EngineResult<Payroll> {
        let input = sanitize(input)?;
        let policy = self.policy.as_ref();
        let mut steps: Vec<AuditStep> = Vec::with_capacity(6);
        let mut warnings = Vec::new();

        let attendance = aggregate_attendance(input.attendance, input.period, 1);
        debug!(
            employee_id = %input.employee.id,
            paid_days = %attendance.details.paid_days,
            proration_factor = %attendance.details.proration_factor,
            "Attendance aggregated"
        );
        let proration_factor = attendance.details.proration_factor;
        steps.push(attendance.audit_step);
        warnings.extend(attendance.warnings);

        let structure = resolve_salary_structure(
            input.employee.category,
            input.employee.monthly_ctc,
            proration_factor,
            input.overrides.special_allowance,
            policy,
            2,
        );
        debug!(
            employee_id = %input.employee.id,
            source = ?structure.source,
            earned_gross = %structure.earned.gross_salary,
            "Salary structure resolved"
        );
        let earned = structure.earned;
        let contracted = structure.contracted;
        steps.push(structure.audit_step);
        warnings.extend(structure.warnings);

        let statutory = calculate_statutory(
            earned.basic_salary,
            earned.gross_salary,
            proration_factor,
            &policy.statutory,
            3,
        );
        debug!(
            employee_id = %input.employee.id,
            pf = %statutory.pf_employee,
            esi = %statutory.esi_employee,
            statutory_cost = %statutory.statutory_cost,
            "Statutory contributions calculated"
        );
        steps.push(statutory.audit_step.clone());

        let incentives = self.calculate_incentives(&input.deals, input.period, 4);
        debug!(
            employee_id = %input.employee.id,
            deals = incentives.deals.len(),
            total_incentive = %incentives.total_incentive,
            "Incentives calculated"
        );
        steps.push(incentives.audit_step);
        warnings.extend(incentives.warnings);

        let reward = calculate_salary_reward(
            &input.employee,
            incentives.sales_count,
            contracted.basic_salary,
            policy,
            5,
        );
        steps.push(reward.audit_step);
        warnings.extend(reward.warnings);

        let employee_deductions = EmployeeDeductions {
            pf: statutory.pf_employee,
            esi: statutory.esi_employee,
            lwf: statutory.lwf_employee,
            professional_tax: statutory.professional_tax,
            other_deductions: input.overrides.other_deductions,
        };
        let deductions = employee_deductions.total();
        let total = checked(
            "net pay",
            earned
                .gross_salary
                .checked_sub(deductions)
                .and_then(|v| v.checked_add(incentives.total_incentive))
                .and_then(|v| v.checked_add(reward.reward)),
        )?;

        let variable_part = input.overrides.variable_pay;
        let total_ctc = round_currency(checked(
            "total CTC",
            earned
                .gross_salary
                .checked_add(statutory.statutory_cost)
                .and_then(|v| v.checked_add(variable_part)),
        )?);
        verify_ctc(
            total_ctc,
            &earned,
            &statutory.employer,
            statutory.statutory_cost,
            variable_part,
        )?;

        steps.push(AuditStep {
            step_number: 6,
            rule_id: "payroll_assembly".to_string(),
            rule_name: "Payroll Assembly".to_string(),
            input: serde_json::json!({
                "earned_gross": earned.gross_salary.to_string(),
                "employee_deductions": deductions.to_string(),
                "total_incentive": incentives.total_incentive.to_string(),
                "salary_reward": reward.reward.to_string(),
                "statutory_cost": statutory.statutory_cost.to_string(),
                "variable_part": variable_part.to_string()
            }),
            output: serde_json::json!({
                "net_pay": total.to_string(),
                "total_ctc": total_ctc.to_string()
            }),
            reasoning: format!(
                "Net {} = {} - {} + {} + {}; CTC {} = {} + {} + {}",
                total,
                earned.gross_salary,
                deductions,
                incentives.total_incentive,
                reward.reward,
                total_ctc,
                earned.gross_salary,
                statutory.statutory_cost,
                variable_part
            ),
        });

        debug!(
            employee_id = %input.employee.id,
            net_pay = %total,
            total_ctc = %total_ctc,
            warnings = warnings.len(),
            "Payroll assembled"
        );

        Ok(Payroll {
            employee_id: input.employee.id.clone(),
            month: input.period.month(),
            year: input.period.year(),
            earnings: earned,
            employee_deductions,
            deductions,
            total,
            employer_side: statutory.employer,
            statutory_cost: statutory.statutory_cost,
            variable_part,
            total_ctc,
            contracted,
            incentive_details: IncentiveDetails {
                role: reward.role,
                sales_count: incentives.sales_count,
                lifetime_sales_count: incentives.lifetime_sales_count,
                unlocked_amount: incentives.total_incentive,
                salary_reward: reward.reward,
                deals: incentives.deals,
            },
            attendance_details: attendance.details,
            audit_trace: AuditTrace { steps, warnings },
        })
    }
}
