//! Request types for the payroll API.
//!
//! This module defines the JSON request structures for the `/calculate` and
//! `/payroll/run` endpoints. Numeric fields are lenient: numbers, numeric
//! strings, `null` and garbage are all accepted, with anything non-numeric
//! coerced to zero.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{PayrollOverrides, deserialize_lenient_amount, deserialize_lenient_count};
use crate::models::{
    AttendanceRecord, AttendanceStatus, Deal, DealType, Employee, EmployeeCategory,
};

/// Request body for the `/calculate` endpoint.
///
/// Carries complete snapshots: the employee, that month's attendance and the
/// employee's full deal history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The employee information.
    pub employee: EmployeeRequest,
    /// Attendance records for the month.
    #[serde(default)]
    pub attendance: Vec<AttendanceRequest>,
    /// The employee's entire deal history.
    #[serde(default)]
    pub deals: Vec<DealRequest>,
    /// Payroll month (1-12).
    pub month: u32,
    /// Payroll year.
    pub year: i32,
    /// Caller-supplied amounts.
    #[serde(default)]
    pub overrides: PayrollOverrides,
}

/// Employee information in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Unique identifier for the employee.
    pub id: String,
    /// Skill category.
    pub category: EmployeeCategory,
    /// Free-text position.
    #[serde(default)]
    pub position: String,
    /// Contracted monthly CTC. Also accepted as `salary`.
    #[serde(default, alias = "salary", deserialize_with = "deserialize_lenient_amount")]
    pub monthly_ctc: Decimal,
}

/// Attendance record in a calculation request.
///
/// When `status` is absent it is inferred from the timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRequest {
    /// The calendar day.
    pub date: NaiveDate,
    /// Check-in time.
    #[serde(default)]
    pub check_in_time: Option<NaiveTime>,
    /// Check-out time.
    #[serde(default)]
    pub check_out_time: Option<NaiveTime>,
    /// Explicit status.
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
    /// Whether the employee arrived late.
    #[serde(default)]
    pub late_arrival: bool,
}

/// Deal in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealRequest {
    /// Unique identifier for the deal.
    pub id: String,
    /// Credited employee; defaults to the employee in the request.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Booking date.
    pub date: NaiveDate,
    /// Revenue realised from the deal.
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub deal_value: Decimal,
    /// Consideration value.
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub cv_count: Decimal,
    /// Normal or NPL.
    #[serde(default, rename = "type")]
    pub deal_type: DealType,
    /// Joint sale.
    #[serde(default)]
    pub is_supportive: bool,
    /// Sales attributable to this record.
    #[serde(default, deserialize_with = "deserialize_lenient_count")]
    pub number_of_sales: u32,
    /// Builder payment received.
    #[serde(default)]
    pub builder_payment_received: bool,
}

impl DealRequest {
    /// Converts to a domain deal, crediting `employee_id` when none is given.
    pub fn into_deal(self, employee_id: &str) -> Deal {
        Deal {
            id: self.id,
            employee_id: self.employee_id.unwrap_or_else(|| employee_id.to_string()),
            date: self.date,
            deal_value: self.deal_value,
            cv_count: self.cv_count,
            deal_type: self.deal_type,
            is_supportive: self.is_supportive,
            number_of_sales: self.number_of_sales,
            builder_payment_received: self.builder_payment_received,
        }
    }
}

/// Request body for the `/payroll/run` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPayrollRequest {
    /// The employee to run payroll for.
    pub employee_id: String,
    /// Payroll month (1-12).
    pub month: u32,
    /// Payroll year.
    pub year: i32,
    /// Caller-supplied amounts.
    #[serde(default)]
    pub overrides: PayrollOverrides,
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            id: req.id,
            category: req.category,
            position: req.position,
            monthly_ctc: req.monthly_ctc,
        }
    }
}

impl From<AttendanceRequest> for AttendanceRecord {
    fn from(req: AttendanceRequest) -> Self {
        let status = req.status.unwrap_or_else(|| {
            AttendanceStatus::from_timestamps(req.check_in_time, req.check_out_time)
        });

        AttendanceRecord {
            date: req.date,
            check_in_time: req.check_in_time,
            check_out_time: req.check_out_time,
            status,
            late_arrival: req.late_arrival,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_calculation_request() {
        let json = r#"{
            "employee": {
                "id": "emp_001",
                "category": "skilled",
                "position": "Sales Executive",
                "monthly_ctc": 35000
            },
            "attendance": [
                { "date": "2025-03-03", "status": "present", "late_arrival": true }
            ],
            "deals": [
                {
                    "id": "deal_001",
                    "date": "2025-03-10",
                    "deal_value": "6000",
                    "cv_count": 1000000,
                    "type": "NPL",
                    "builder_payment_received": true
                }
            ],
            "month": 3,
            "year": 2025
        }"#;

        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employee.monthly_ctc, dec("35000"));
        assert_eq!(request.attendance.len(), 1);
        assert_eq!(request.deals[0].deal_type, DealType::Npl);
        assert_eq!(request.deals[0].deal_value, dec("6000"));
        assert_eq!(request.overrides, PayrollOverrides::default());
    }

    #[test]
    fn test_salary_alias_and_lenient_amount() {
        let json = r#"{ "id": "emp_002", "category": "unskilled", "salary": "18000.456" }"#;
        let employee: EmployeeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(employee.monthly_ctc, dec("18000.46"));
        assert_eq!(employee.position, "");

        let json = r#"{ "id": "emp_003", "category": "skilled", "monthly_ctc": "n/a" }"#;
        let employee: EmployeeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(employee.monthly_ctc, Decimal::ZERO);
    }

    #[test]
    fn test_missing_deal_amounts_coerce_to_zero() {
        let json = r#"{ "id": "d1", "date": "2025-03-10", "cv_count": null }"#;
        let deal: DealRequest = serde_json::from_str(json).unwrap();
        assert_eq!(deal.deal_value, Decimal::ZERO);
        assert_eq!(deal.cv_count, Decimal::ZERO);
    }

    #[test]
    fn test_deal_defaults_to_request_employee() {
        let json = r#"{ "id": "d1", "date": "2025-03-10", "deal_value": 1, "cv_count": 2 }"#;
        let deal = serde_json::from_str::<DealRequest>(json)
            .unwrap()
            .into_deal("emp_001");

        assert_eq!(deal.employee_id, "emp_001");
        assert_eq!(deal.number_of_sales, 0);
    }

    #[test]
    fn test_number_of_sales_is_lenient() {
        let parse = |extra: &str| {
            let json = format!(r#"{{ "id": "d1", "date": "2025-03-10"{} }}"#, extra);
            serde_json::from_str::<DealRequest>(&json)
                .unwrap()
                .number_of_sales
        };

        assert_eq!(parse(r#", "number_of_sales": "2""#), 2);
        assert_eq!(parse(r#", "number_of_sales": 3"#), 3);
        assert_eq!(parse(r#", "number_of_sales": null"#), 0);
        assert_eq!(parse(r#", "number_of_sales": "many""#), 0);
        assert_eq!(parse(""), 0);
    }

    #[test]
    fn test_attendance_status_inferred_from_timestamps() {
        let json = r#"{ "date": "2025-03-03", "check_in_time": "09:05:00" }"#;
        let record: AttendanceRecord = serde_json::from_str::<AttendanceRequest>(json)
            .unwrap()
            .into();
        assert_eq!(record.status, AttendanceStatus::HalfDay);

        let json =
            r#"{ "date": "2025-03-03", "check_in_time": "09:05:00", "check_out_time": "18:00:00" }"#;
        let record: AttendanceRecord = serde_json::from_str::<AttendanceRequest>(json)
            .unwrap()
            .into();
        assert_eq!(record.status, AttendanceStatus::Present);

        let json = r#"{ "date": "2025-03-03" }"#;
        let record: AttendanceRecord = serde_json::from_str::<AttendanceRequest>(json)
            .unwrap()
            .into();
        assert_eq!(record.status, AttendanceStatus::Absent);
    }

    #[test]
    fn test_explicit_status_wins() {
        let json = r#"{ "date": "2025-03-03", "status": "leave" }"#;
        let record: AttendanceRecord = serde_json::from_str::<AttendanceRequest>(json)
            .unwrap()
            .into();
        assert_eq!(record.status, AttendanceStatus::Leave);
    }
}
