//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load the payroll policy from YAML
//! files: statutory rates, the fixed salary structure table, incentive tiers,
//! minimum wages and per-role sales policies.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Fixed structures: {}", config.policy().salary_structures.len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    FixedStructure, IncentiveRates, MinimumWages, PayrollPolicy, PolicyFile, SalaryStructureTable,
    SalaryStructuresFile, SalesPoliciesFile, StatutoryRates, StructureRules,
};
