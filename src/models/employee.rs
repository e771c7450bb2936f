//! Employee model and related types.
//!
//! This module defines the Employee struct, the EmployeeCategory enum that
//! selects the minimum-wage floor, and the SalesRole classification used
//! by the salary reward rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The skill category of an employee, which selects the minimum-wage floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeCategory {
    /// Skilled worker (higher minimum-wage floor).
    Skilled,
    /// Unskilled worker.
    Unskilled,
}

/// The sales role an employee is treated as when rewards are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalesRole {
    /// Individual contributor on the sales floor. Default classification.
    #[serde(rename = "Sales Executive")]
    SalesExecutive,
    /// Manager of a sales team.
    #[serde(rename = "Manager")]
    Manager,
}

impl SalesRole {
    /// Returns the display name used in sales policies and audit output.
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesRole::SalesExecutive => "Sales Executive",
            SalesRole::Manager => "Manager",
        }
    }
}

/// Represents an employee whose payroll is being computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Skill category, used for the minimum-wage floor.
    pub category: EmployeeCategory,
    /// Free-text job position (e.g. "Area Sales Manager").
    #[serde(default)]
    pub position: String,
    /// Contracted monthly cost-to-company.
    #[serde(alias = "salary")]
    pub monthly_ctc: Decimal,
}

impl Employee {
    /// Infers the sales role from the free-text position.
    ///
    /// Any position containing "manager" (case-insensitive) is a Manager;
    /// everything else, including an empty position, is a Sales Executive.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Employee, EmployeeCategory, SalesRole};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     category: EmployeeCategory::Skilled,
    ///     position: "Regional SALES Manager".to_string(),
    ///     monthly_ctc: Decimal::new(35000, 0),
    /// };
    /// assert_eq!(employee.sales_role(), SalesRole::Manager);
    /// ```
    pub fn sales_role(&self) -> SalesRole {
        if self.position.to_lowercase().contains("manager") {
            SalesRole::Manager
        } else {
            SalesRole::SalesExecutive
        }
    }
}
