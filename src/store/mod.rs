//! Persistence collaborator for payroll runs.
//!
//! The calculation engine performs no I/O. This module defines the contract
//! a caller implements to supply employee snapshots and persist results, and
//! an in-memory implementation used by the HTTP service and tests. The
//! in-memory repository can be seeded from a YAML [`Snapshot`] directory.

mod snapshot;

pub use snapshot::Snapshot;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculation::{PayrollEngine, PayrollInput, PayrollOverrides};
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, Deal, Employee, PayMonth, Payroll};

/// Identifies the single payroll record of an employee for a month.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayrollKey {
    /// The employee.
    pub employee_id: String,
    /// Month (1-12).
    pub month: u32,
    /// Year.
    pub year: i32,
}

impl PayrollKey {
    /// The key a payroll is stored under.
    pub fn of(payroll: &Payroll) -> Self {
        Self {
            employee_id: payroll.employee_id.clone(),
            month: payroll.month,
            year: payroll.year,
        }
    }
}

/// Whether an upsert created a new record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// No record existed for the key.
    Created,
    /// An existing record was replaced.
    Updated,
}

/// Source of input snapshots and sink for computed payrolls.
pub trait PayrollRepository: Send + Sync {
    /// Looks up an employee.
    fn employee(&self, employee_id: &str) -> Option<Employee>;

    /// Attendance records of an employee dated inside `period`.
    fn attendance(&self, employee_id: &str, period: PayMonth) -> Vec<AttendanceRecord>;

    /// The employee's entire deal history.
    fn deals(&self, employee_id: &str) -> Vec<Deal>;

    /// Stores a payroll, replacing any record with the same key.
    ///
    /// Implementations must perform the lookup and write as one atomic step.
    fn upsert_payroll(&self, payroll: Payroll) -> UpsertOutcome;

    /// Fetches a stored payroll.
    fn payroll(&self, key: &PayrollKey) -> Option<Payroll>;
}

/// Lock-guarded in-memory repository.
///
/// Locks are never held across `.await` points, so `parking_lot` locks are
/// used rather than async ones. Clones share the same underlying maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    employees: Arc<RwLock<HashMap<String, Employee>>>,
    attendance: Arc<RwLock<HashMap<String, Vec<AttendanceRecord>>>>,
    deals: Arc<RwLock<HashMap<String, Vec<Deal>>>>,
    payrolls: Arc<RwLock<HashMap<PayrollKey, Payroll>>>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an employee.
    pub fn insert_employee(&self, employee: Employee) {
        self.employees.write().insert(employee.id.clone(), employee);
    }

    /// Appends attendance records for an employee.
    pub fn add_attendance(
        &self,
        employee_id: &str,
        records: impl IntoIterator<Item = AttendanceRecord>,
    ) {
        self.attendance
            .write()
            .entry(employee_id.to_string())
            .or_default()
            .extend(records);
    }

    /// Appends a deal to its employee's history.
    pub fn add_deal(&self, deal: Deal) {
        self.deals
            .write()
            .entry(deal.employee_id.clone())
            .or_default()
            .push(deal);
    }

    /// Number of stored payrolls.
    pub fn payroll_count(&self) -> usize {
        self.payrolls.read().len()
    }
}

impl PayrollRepository for InMemoryRepository {
    fn employee(&self, employee_id: &str) -> Option<Employee> {
        self.employees.read().get(employee_id).cloned()
    }

    fn attendance(&self, employee_id: &str, period: PayMonth) -> Vec<AttendanceRecord> {
        self.attendance
            .read()
            .get(employee_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| period.contains(r.date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn deals(&self, employee_id: &str) -> Vec<Deal> {
        self.deals
            .read()
            .get(employee_id)
            .cloned()
            .unwrap_or_default()
    }

    fn upsert_payroll(&self, payroll: Payroll) -> UpsertOutcome {
        let key = PayrollKey::of(&payroll);
        match self.payrolls.write().insert(key, payroll) {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Created,
        }
    }

    fn payroll(&self, key: &PayrollKey) -> Option<Payroll> {
        self.payrolls.read().get(key).cloned()
    }
}

/// Loads an employee's snapshots, computes the payroll and stores it.
///
/// # Errors
///
/// Returns `EmployeeNotFound` when the repository has no such employee, and
/// any error raised by [`PayrollEngine::calculate`]. Nothing is stored on
/// error.
pub fn run_payroll(
    engine: &PayrollEngine,
    repository: &dyn PayrollRepository,
    employee_id: &str,
    period: PayMonth,
    overrides: PayrollOverrides,
) -> EngineResult<(Payroll, UpsertOutcome)> {
    let employee = repository
        .employee(employee_id)
        .ok_or_else(|| EngineError::EmployeeNotFound {
            employee_id: employee_id.to_string(),
        })?;
    let attendance = repository.attendance(employee_id, period);
    let deals = repository.deals(employee_id);

    let payroll = engine.calculate(&PayrollInput {
        employee: &employee,
        attendance: &attendance,
        deals: &deals,
        period,
        overrides,
    })?;

    let outcome = repository.upsert_payroll(payroll.clone());
    info!(
        employee_id = %employee_id,
        month = period.month(),
        year = period.year(),
        outcome = ?outcome,
        "Payroll stored"
    );

    Ok((payroll, outcome))
}
