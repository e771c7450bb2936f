//! Payroll and Sales-Incentive Calculation Engine
//!
//! This crate turns an employee's contracted compensation, a month's attendance
//! records and the employee's full sales history into a reconciled payslip,
//! including statutory deductions, employer-side cost and payable incentives.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
