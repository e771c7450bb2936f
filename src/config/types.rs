//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed policy structures that are
//! deserialized from YAML configuration files. Every type has a `Default`
//! carrying the built-in business constants, so a policy can also be
//! constructed without any files.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::models::{EmployeeCategory, SalaryComponents, SalesPolicy, SalesRole};

/// Statutory contribution rates, caps and thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatutoryRates {
    /// Provident fund rate on earned basic, both sides.
    pub pf_rate: Decimal,
    /// Provident fund cap, both sides.
    pub pf_cap: Decimal,
    /// Provident fund admin charge rate on earned basic.
    pub pf_admin_rate: Decimal,
    /// ESI applies only when earned gross is at or below this figure.
    pub esi_gross_threshold: Decimal,
    /// Employee ESI rate on earned gross.
    pub esi_employee_rate: Decimal,
    /// Employer ESI rate on earned gross.
    pub esi_employer_rate: Decimal,
    /// Employee LWF rate on earned gross.
    pub lwf_employee_rate: Decimal,
    /// Employer LWF rate on earned gross.
    pub lwf_employer_rate: Decimal,
    /// Professional tax per month.
    pub professional_tax: Decimal,
    /// Bonus rate on earned basic.
    pub bonus_rate: Decimal,
    /// Monthly bonus floor, prorated by attendance.
    pub bonus_floor: Decimal,
    /// Gratuity rate on earned basic.
    pub gratuity_rate: Decimal,
}

impl Default for StatutoryRates {
    fn default() -> Self {
        Self {
            pf_rate: Decimal::new(12, 2),
            pf_cap: Decimal::new(1800, 0),
            pf_admin_rate: Decimal::new(1, 2),
            esi_gross_threshold: Decimal::new(21000, 0),
            esi_employee_rate: Decimal::new(75, 4),
            esi_employer_rate: Decimal::new(325, 4),
            lwf_employee_rate: Decimal::new(20, 4),
            lwf_employer_rate: Decimal::new(40, 4),
            professional_tax: Decimal::ZERO,
            bonus_rate: Decimal::new(833, 4),
            bonus_floor: Decimal::new(7000, 0),
            gratuity_rate: Decimal::new(481, 4),
        }
    }
}

/// Rules for the proportional salary structure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StructureRules {
    /// Basic as a share of gross.
    pub basic_share_of_gross: Decimal,
    /// HRA as a share of basic.
    pub hra_share_of_basic: Decimal,
    /// Fixed monthly conveyance allowance.
    pub conveyance: Decimal,
}

impl Default for StructureRules {
    fn default() -> Self {
        Self {
            basic_share_of_gross: Decimal::new(5, 1),
            hra_share_of_basic: Decimal::new(5, 1),
            conveyance: Decimal::new(1600, 0),
        }
    }
}

/// Revenue-ratio tiers for deal incentives.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IncentiveRates {
    /// Ratios strictly above this earn the standard rate.
    pub standard_threshold: Decimal,
    /// Rate applied to cv_count in the standard tier.
    pub standard_rate: Decimal,
    /// Ratios at or above this (and at or below the standard threshold) earn the reduced rate.
    pub reduced_threshold: Decimal,
    /// Rate applied to cv_count in the reduced tier.
    pub reduced_rate: Decimal,
    /// Share of the incentive kept on a supportive (split) deal.
    pub supportive_share: Decimal,
}

impl Default for IncentiveRates {
    fn default() -> Self {
        Self {
            standard_threshold: Decimal::new(5, 3),
            standard_rate: Decimal::new(1, 2),
            reduced_threshold: Decimal::new(25, 4),
            reduced_rate: Decimal::new(4, 3),
            supportive_share: Decimal::new(5, 1),
        }
    }
}

/// Monthly minimum-wage floors by category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MinimumWages {
    /// Floor for skilled employees.
    pub skilled: Decimal,
    /// Floor for unskilled employees.
    pub unskilled: Decimal,
}

impl MinimumWages {
    /// Returns the floor for a category.
    pub fn for_category(&self, category: EmployeeCategory) -> Decimal {
        match category {
            EmployeeCategory::Skilled => self.skilled,
            EmployeeCategory::Unskilled => self.unskilled,
        }
    }
}

impl Default for MinimumWages {
    fn default() -> Self {
        Self {
            skilled: Decimal::new(12000, 0),
            unskilled: Decimal::new(10000, 0),
        }
    }
}

/// A row of the fixed salary structure table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixedStructure {
    /// The contracted CTC this row applies to.
    pub ctc: Decimal,
    /// The component breakdown for that CTC.
    #[serde(flatten)]
    pub components: SalaryComponents,
}

/// Explicit table of CTC values with a hard-coded component breakdown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryStructureTable {
    rows: BTreeMap<Decimal, SalaryComponents>,
}

impl SalaryStructureTable {
    /// Builds a table from its rows. A later row for the same CTC replaces an earlier one.
    pub fn new(rows: Vec<FixedStructure>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| (row.ctc.normalize(), row.components))
                .collect(),
        }
    }

    /// Looks up the fixed breakdown for an exact CTC value.
    pub fn lookup(&self, ctc: Decimal) -> Option<&SalaryComponents> {
        self.rows.get(&ctc.normalize())
    }

    /// Iterates rows in ascending CTC order.
    pub fn iter(&self) -> impl Iterator<Item = (&Decimal, &SalaryComponents)> {
        self.rows.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// policy.yaml file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyFile {
    /// Statutory rates.
    pub statutory: StatutoryRates,
    /// Proportional structure rules.
    pub structure: StructureRules,
    /// Incentive tiers.
    pub incentive: IncentiveRates,
    /// Minimum wage floors.
    pub minimum_wages: MinimumWages,
}

/// salary_structures.yaml file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct SalaryStructuresFile {
    /// Table rows.
    pub structures: Vec<FixedStructure>,
}

/// sales_policies.yaml file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct SalesPoliciesFile {
    /// Per-role policies.
    pub policies: Vec<SalesPolicy>,
}

/// The complete payroll policy.
///
/// This struct aggregates all configuration consulted by the calculation
/// components.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollPolicy {
    /// Statutory rates.
    pub statutory: StatutoryRates,
    /// Proportional structure rules.
    pub structure: StructureRules,
    /// Incentive tiers.
    pub incentive: IncentiveRates,
    /// Minimum wage floors.
    pub minimum_wages: MinimumWages,
    /// Fixed CTC structure table.
    pub salary_structures: SalaryStructureTable,
    /// Per-role sales policies.
    pub sales_policies: Vec<SalesPolicy>,
}

impl PayrollPolicy {
    /// Returns the sales policy configured for a role, if any.
    pub fn sales_policy(&self, role: SalesRole) -> Option<&SalesPolicy> {
        self.sales_policies.iter().find(|policy| policy.role == role)
    }
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            statutory: StatutoryRates::default(),
            structure: StructureRules::default(),
            incentive: IncentiveRates::default(),
            minimum_wages: MinimumWages::default(),
            salary_structures: SalaryStructureTable::default(),
            sales_policies: vec![SalesPolicy::sales_executive(), SalesPolicy::manager()],
        }
    }
}
