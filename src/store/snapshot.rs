//! Repository snapshots loaded from YAML.
//!
//! A snapshot directory seeds an [`InMemoryRepository`] with the employee,
//! attendance and deal records a payroll run reads:
//!
//! ```text
//! data/sample/
//! ├── employees.yaml   # employees: [...]
//! ├── attendance.yaml  # attendance: { <employee_id>: [...] }   (optional)
//! └── deals.yaml       # deals: [...]                           (optional)
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, Deal, Employee};

use super::InMemoryRepository;

#[derive(Debug, Deserialize)]
struct EmployeesFile {
    employees: Vec<Employee>,
}

#[derive(Debug, Default, Deserialize)]
struct AttendanceFile {
    #[serde(default)]
    attendance: HashMap<String, Vec<AttendanceRecord>>,
}

#[derive(Debug, Default, Deserialize)]
struct DealsFile {
    #[serde(default)]
    deals: Vec<Deal>,
}

/// Employee, attendance and deal records to seed a repository with.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Employees.
    pub employees: Vec<Employee>,
    /// Attendance records keyed by employee id.
    pub attendance: HashMap<String, Vec<AttendanceRecord>>,
    /// Deals of every employee.
    pub deals: Vec<Deal>,
}

impl Snapshot {
    /// Loads a snapshot directory.
    ///
    /// `employees.yaml` is required; a missing `attendance.yaml` or
    /// `deals.yaml` means no records of that kind.
    ///
    /// # Errors
    ///
    /// `ConfigNotFound` when `employees.yaml` is missing, `ConfigParseError`
    /// for invalid YAML, and `InvalidInput` when a record refers to an
    /// employee the snapshot does not contain.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let employees = load_yaml::<EmployeesFile>(&path.join("employees.yaml"))?.employees;
        let attendance = load_optional_yaml::<AttendanceFile>(&path.join("attendance.yaml"))?
            .attendance;
        let deals = load_optional_yaml::<DealsFile>(&path.join("deals.yaml"))?.deals;

        let snapshot = Self {
            employees,
            attendance,
            deals,
        };
        snapshot.validate()?;

        debug!(
            path = %path.display(),
            employees = snapshot.employees.len(),
            deals = snapshot.deals.len(),
            "Loaded repository snapshot"
        );

        Ok(snapshot)
    }

    /// Checks that every attendance list and deal belongs to a known employee.
    pub fn validate(&self) -> EngineResult<()> {
        let known = |id: &str| self.employees.iter().any(|e| e.id == id);

        if let Some(id) = self.attendance.keys().find(|id| !known(id.as_str())) {
            return Err(EngineError::InvalidInput {
                field: "attendance".to_string(),
                message: format!("attendance recorded for unknown employee '{}'", id),
            });
        }
        if let Some(deal) = self.deals.iter().find(|d| !known(d.employee_id.as_str())) {
            return Err(EngineError::InvalidInput {
                field: "deals".to_string(),
                message: format!(
                    "deal '{}' credited to unknown employee '{}'",
                    deal.id, deal.employee_id
                ),
            });
        }
        Ok(())
    }
}

impl InMemoryRepository {
    /// Creates a repository holding the records of a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let repo = Self::new();
        for employee in snapshot.employees {
            repo.insert_employee(employee);
        }
        for (employee_id, records) in snapshot.attendance {
            repo.add_attendance(&employee_id, records);
        }
        for deal in snapshot.deals {
            repo.add_deal(deal);
        }
        repo
    }

    /// Loads and validates a snapshot directory into a new repository.
    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        Snapshot::load(path).map(Self::from_snapshot)
    }
}

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

fn load_optional_yaml<T: serde::de::DeserializeOwned + Default>(path: &Path) -> EngineResult<T> {
    if path.exists() {
        load_yaml(path)
    } else {
        Ok(T::default())
    }
}
