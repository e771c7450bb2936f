//! Payroll result models.
//!
//! This module contains the [`Payroll`] type and its associated structures
//! that capture every output of a payroll run: earned components, employee
//! deductions, employer-side statutory cost, incentive and attendance
//! sub-summaries, and the audit trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DealType, SalesRole};

/// The five named salary components and their gross.
///
/// Used both for the contracted (full-month) structure and for the earned
/// (prorated) amounts.
///
/// # Example
///
/// ```
/// use payroll_engine::models::SalaryComponents;
/// use rust_decimal::Decimal;
///
/// let components = SalaryComponents {
///     basic_salary: Decimal::new(17500, 0),
///     hra: Decimal::new(8750, 0),
///     conveyance: Decimal::new(1600, 0),
///     special_allowance: Decimal::ZERO,
///     other_allowance: Decimal::new(7150, 0),
///     gross_salary: Decimal::new(35000, 0),
/// };
/// assert_eq!(components.component_sum(), components.gross_salary);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponents {
    /// Basic salary.
    pub basic_salary: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Conveyance allowance.
    pub conveyance: Decimal,
    /// Special allowance.
    pub special_allowance: Decimal,
    /// Other allowance.
    pub other_allowance: Decimal,
    /// Gross salary.
    pub gross_salary: Decimal,
}

impl SalaryComponents {
    /// Sum of the five components, excluding the gross field itself.
    pub fn component_sum(&self) -> Decimal {
        self.basic_salary
            + self.hra
            + self.conveyance
            + self.special_allowance
            + self.other_allowance
    }
}

/// Employee-side statutory and other deductions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDeductions {
    /// Employee provident fund contribution.
    pub pf: Decimal,
    /// Employee state insurance contribution.
    pub esi: Decimal,
    /// Employee labour welfare fund contribution.
    pub lwf: Decimal,
    /// Professional tax.
    pub professional_tax: Decimal,
    /// Caller-supplied deductions (advances, recoveries).
    pub other_deductions: Decimal,
}

impl EmployeeDeductions {
    /// Total deducted from the employee's earned gross.
    pub fn total(&self) -> Decimal {
        self.pf + self.esi + self.lwf + self.professional_tax + self.other_deductions
    }
}

/// Employer-side statutory contributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerContributions {
    /// Employer provident fund contribution.
    pub pf: Decimal,
    /// Provident fund administration charge.
    pub pf_admin: Decimal,
    /// Employer state insurance contribution.
    pub esi: Decimal,
    /// Employer labour welfare fund contribution.
    pub lwf: Decimal,
    /// Statutory bonus accrual.
    pub bonus: Decimal,
    /// Gratuity accrual.
    pub gratuity: Decimal,
}

impl EmployerContributions {
    /// Total employer statutory cost.
    pub fn total(&self) -> Decimal {
        self.pf + self.pf_admin + self.esi + self.lwf + self.bonus + self.gratuity
    }
}

/// The rate tier a deal falls into based on its revenue ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncentiveTier {
    /// Ratio above the upper threshold: full rate.
    Standard,
    /// Ratio between the thresholds (inclusive): reduced rate.
    Reduced,
    /// Ratio below the lower threshold: no incentive.
    Excluded,
}

/// Incentive evaluation of a single deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealIncentive {
    /// The deal identifier.
    pub deal_id: String,
    /// The deal date.
    pub date: chrono::NaiveDate,
    /// Normal or NPL.
    pub deal_type: DealType,
    /// deal_value / cv_count, zero when cv_count is zero.
    pub revenue_ratio: Decimal,
    /// The tier the ratio falls into.
    pub tier: IncentiveTier,
    /// The rate applied to cv_count.
    pub rate: Decimal,
    /// The incentive amount after any supportive split.
    pub amount: Decimal,
    /// Whether a later deal exists in the employee's history.
    pub unlocked: bool,
    /// Whether the deal date is inside the payroll month.
    pub in_period: bool,
    /// Whether the amount was counted towards this month's payout.
    pub payable: bool,
}

/// Incentive and reward sub-summary of a payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncentiveDetails {
    /// Role the reward rules were applied for.
    pub role: SalesRole,
    /// Sales counted for the reward threshold (deals dated in the payroll month).
    pub sales_count: u32,
    /// Sales across the entire deal history.
    pub lifetime_sales_count: u32,
    /// Incentive paid this month from unlocked, builder-paid deals.
    pub unlocked_amount: Decimal,
    /// Role-based salary reward.
    pub salary_reward: Decimal,
    /// Per-deal evaluation, ordered by date.
    pub deals: Vec<DealIncentive>,
}

/// Attendance sub-summary of a payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceDetails {
    /// Days marked present.
    pub present_days: Decimal,
    /// Weekly off days.
    pub weekly_off_days: Decimal,
    /// Leave days.
    pub leave_days: Decimal,
    /// Half days.
    pub half_days: Decimal,
    /// Absent days.
    pub absent_days: Decimal,
    /// Late arrivals.
    pub late_marks: u32,
    /// Paid days deducted for late arrivals.
    pub late_deduction: Decimal,
    /// Days paid for.
    pub paid_days: Decimal,
    /// Calendar days in the month.
    pub days_in_month: u32,
    /// paid_days / days_in_month.
    pub proration_factor: Decimal,
    /// True when no records existed and full attendance was assumed.
    pub assumed_full_attendance: bool,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag fallbacks and clamps that did not stop the calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(code: &str, message: impl Into<String>, severity: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: severity.to_string(),
        }
    }
}

/// The complete audit trace for a payroll run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The computed payroll for one employee and month.
///
/// Every total is carried alongside its components, so the CTC identity
/// `total_ctc == gross_salary + statutory_cost + variable_part` can be
/// checked from the record alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    /// The employee the payroll is for.
    pub employee_id: String,
    /// Payroll month (1-12).
    pub month: u32,
    /// Payroll year.
    pub year: i32,
    /// Earned (prorated) salary components.
    #[serde(flatten)]
    pub earnings: SalaryComponents,
    /// Employee-side deductions.
    #[serde(flatten)]
    pub employee_deductions: EmployeeDeductions,
    /// Total employee deductions.
    pub deductions: Decimal,
    /// Net pay.
    pub total: Decimal,
    /// Employer-side statutory contributions.
    pub employer_side: EmployerContributions,
    /// Total employer statutory cost.
    pub statutory_cost: Decimal,
    /// Caller-supplied variable pay, passed through into CTC.
    pub variable_part: Decimal,
    /// Total cost to company for the month.
    pub total_ctc: Decimal,
    /// The full-month contracted structure before proration.
    pub contracted: SalaryComponents,
    /// Incentive and reward sub-summary.
    pub incentive_details: IncentiveDetails,
    /// Attendance sub-summary.
    pub attendance_details: AttendanceDetails,
    /// Audit trace of every rule applied.
    pub audit_trace: AuditTrace,
}

impl Payroll {
    /// Gross salary plus statutory cost plus variable part.
    pub fn expected_ctc(&self) -> Decimal {
        self.earnings.gross_salary + self.statutory_cost + self.variable_part
    }
}
