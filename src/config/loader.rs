//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! policies from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{
    PayrollPolicy, PolicyFile, SalaryStructureTable, SalaryStructuresFile, SalesPoliciesFile,
};

/// Loads and provides access to the payroll policy.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// ├── policy.yaml             # Statutory rates, structure rules, incentive tiers, minimum wages
/// ├── salary_structures.yaml  # Fixed CTC -> component breakdown table
/// └── sales_policies.yaml     # Per-role reward tiers
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("PF cap: {}", loader.policy().statutory.pf_cap);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: PayrollPolicy,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A fixed salary structure row does not add up to its gross
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy_file = Self::load_yaml::<PolicyFile>(&path.join("policy.yaml"))?;

        let structures_path = path.join("salary_structures.yaml");
        let structures = Self::load_yaml::<SalaryStructuresFile>(&structures_path)?;
        for row in &structures.structures {
            let components = &row.components;
            if components.component_sum() != components.gross_salary {
                return Err(EngineError::ConfigParseError {
                    path: structures_path.display().to_string(),
                    message: format!(
                        "structure for CTC {} sums to {} but declares gross {}",
                        row.ctc,
                        components.component_sum(),
                        components.gross_salary
                    ),
                });
            }
        }

        let sales = Self::load_yaml::<SalesPoliciesFile>(&path.join("sales_policies.yaml"))?;

        let policy = PayrollPolicy {
            statutory: policy_file.statutory,
            structure: policy_file.structure,
            incentive: policy_file.incentive,
            minimum_wages: policy_file.minimum_wages,
            salary_structures: SalaryStructureTable::new(structures.structures),
            sales_policies: sales.policies,
        };

        debug!(
            path = %path.display(),
            fixed_structures = policy.salary_structures.len(),
            sales_policies = policy.sales_policies.len(),
            "Loaded payroll policy"
        );

        Ok(Self { policy })
    }

    /// Wraps an already-built policy.
    pub fn from_policy(policy: PayrollPolicy) -> Self {
        Self { policy }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded payroll policy.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }
}
