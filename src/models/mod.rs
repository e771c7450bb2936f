//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod deal;
mod employee;
mod pay_month;
mod payroll;
mod sales_policy;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use deal::{Deal, DealType};
pub use employee::{Employee, EmployeeCategory, SalesRole};
pub use pay_month::PayMonth;
pub use payroll::{
    AttendanceDetails, AuditStep, AuditTrace, AuditWarning, DealIncentive, EmployeeDeductions,
    EmployerContributions, IncentiveDetails, IncentiveTier, Payroll, SalaryComponents,
};
pub use sales_policy::{RewardTier, SalesPolicy};
