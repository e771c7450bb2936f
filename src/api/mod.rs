//! HTTP API module for the payroll engine.
//!
//! This module exposes the payroll calculation over REST: ad hoc
//! calculation from request snapshots, persisted payroll runs, and lookup
//! of stored payrolls.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AttendanceRequest, CalculationRequest, DealRequest, EmployeeRequest, RunPayrollRequest,
};
pub use response::{ApiError, ApiErrorResponse, ENGINE_VERSION, PayrollResponse};
pub use state::AppState;
