//! Calculation logic for the payroll engine.
//!
//! This module contains one component per stage of a payroll run: attendance
//! aggregation, salary structure resolution, statutory contributions, deal
//! incentives and the role-based salary reward, plus the [`PayrollEngine`]
//! that assembles them into a [`Payroll`](crate::models::Payroll).

mod assembler;
mod attendance;
mod incentive;
mod input;
mod rounding;
mod salary_reward;
mod salary_structure;
mod statutory;

pub use assembler::{CTC_TOLERANCE, PayrollEngine, verify_ctc};
pub use attendance::{
    AttendanceSummary, LATE_DEDUCTION_DAYS, LATE_MARKS_PER_DEDUCTION, aggregate_attendance,
};
pub use incentive::{
    DealIncentiveEngine, IncentiveCalculator, IncentiveSummary, classify_ratio, revenue_ratio,
};
pub use input::{
    MAX_AMOUNT, PayrollInput, PayrollOverrides, SanitizedInput, coerce_amount, coerce_count,
    deserialize_lenient_amount, deserialize_lenient_count, sanitize, sanitize_amount,
};
pub use rounding::{round_cents, round_currency};
pub use salary_reward::{SalaryRewardResult, calculate_salary_reward};
pub use salary_structure::{SalaryStructureResult, StructureSource, resolve_salary_structure};
pub use statutory::{StatutoryResult, calculate_statutory, provident_fund};
