//! Attendance aggregation.
//!
//! This module reduces a month's attendance records into a single paid-days
//! figure and the proration factor that scales every earned component.

use rust_decimal::Decimal;

use crate::models::{
    AttendanceDetails, AttendanceRecord, AttendanceStatus, AuditStep, AuditWarning, PayMonth,
};

/// Number of late marks that cost one deduction.
pub const LATE_MARKS_PER_DEDUCTION: u32 = 3;

/// Paid days lost for each complete group of late marks.
pub const LATE_DEDUCTION_DAYS: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// The result of aggregating attendance, including the audit step.
#[derive(Debug, Clone)]
pub struct AttendanceSummary {
    /// Day counts, paid days and proration factor.
    pub details: AttendanceDetails,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
    /// Fallbacks and clamps applied.
    pub warnings: Vec<AuditWarning>,
}

/// Aggregates attendance records into paid days for a month.
///
/// Only records dated inside `[month_start, month_end)` are counted. Each
/// record contributes according to its status (Present, WeeklyOff and Leave
/// count 1, HalfDay 0.5, Absent 0). Every complete group of three late marks
/// deducts half a paid day, and the result is floored at zero and capped at
/// the number of days in the month.
///
/// When no records fall inside the month, full attendance is assumed and
/// paid days equal the number of days in the month.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::aggregate_attendance;
/// use payroll_engine::models::PayMonth;
/// use rust_decimal::Decimal;
///
/// let period = PayMonth::new(4, 2025).unwrap();
/// let summary = aggregate_attendance(&[], period, 1);
///
/// assert_eq!(summary.details.paid_days, Decimal::new(30, 0));
/// assert_eq!(summary.details.proration_factor, Decimal::ONE);
/// assert!(summary.details.assumed_full_attendance);
/// ```
pub fn aggregate_attendance(
    records: &[AttendanceRecord],
    period: PayMonth,
    step_number: u32,
) -> AttendanceSummary {
    let days_in_month = period.days_in_month();
    let month_days = Decimal::from(days_in_month);
    let mut warnings = Vec::new();

    let in_period: Vec<&AttendanceRecord> = records
        .iter()
        .filter(|r| period.contains(r.date))
        .collect();

    if in_period.is_empty() {
        warnings.push(AuditWarning::new(
            "ATTENDANCE_FALLBACK",
            format!(
                "No attendance records for {}-{:02}; assuming full attendance",
                period.year(),
                period.month()
            ),
            "medium",
        ));

        let details = AttendanceDetails {
            present_days: Decimal::ZERO,
            weekly_off_days: Decimal::ZERO,
            leave_days: Decimal::ZERO,
            half_days: Decimal::ZERO,
            absent_days: Decimal::ZERO,
            late_marks: 0,
            late_deduction: Decimal::ZERO,
            paid_days: month_days,
            days_in_month,
            proration_factor: Decimal::ONE,
            assumed_full_attendance: true,
        };

        let audit_step = AuditStep {
            step_number,
            rule_id: "attendance_aggregation".to_string(),
            rule_name: "Attendance Aggregation".to_string(),
            input: serde_json::json!({
                "records_in_period": 0,
                "days_in_month": days_in_month
            }),
            output: serde_json::json!({
                "paid_days": month_days.to_string(),
                "proration_factor": "1",
                "assumed_full_attendance": true
            }),
            reasoning: format!(
                "No attendance records; paid days default to all {} days",
                days_in_month
            ),
        };

        return AttendanceSummary {
            details,
            audit_step,
            warnings,
        };
    }

    let count = |status: AttendanceStatus| {
        Decimal::from(in_period.iter().filter(|r| r.status == status).count())
    };

    let present_days = count(AttendanceStatus::Present);
    let weekly_off_days = count(AttendanceStatus::WeeklyOff);
    let leave_days = count(AttendanceStatus::Leave);
    let half_days = count(AttendanceStatus::HalfDay);
    let absent_days = count(AttendanceStatus::Absent);

    let late_marks = in_period.iter().filter(|r| r.late_arrival).count() as u32;
    let late_deduction =
        Decimal::from(late_marks / LATE_MARKS_PER_DEDUCTION) * LATE_DEDUCTION_DAYS;

    let credited: Decimal = in_period.iter().map(|r| r.status.paid_fraction()).sum();
    let raw_paid_days = credited - late_deduction;

    let mut paid_days = raw_paid_days.max(Decimal::ZERO);
    if paid_days > month_days {
        warnings.push(AuditWarning::new(
            "PAID_DAYS_CLAMPED",
            format!(
                "Attendance credits {} days in a {}-day month; capped",
                paid_days.normalize(),
                days_in_month
            ),
            "high",
        ));
        paid_days = month_days;
    }

    let proration_factor = paid_days / month_days;

    let audit_step = AuditStep {
        step_number,
        rule_id: "attendance_aggregation".to_string(),
        rule_name: "Attendance Aggregation".to_string(),
        input: serde_json::json!({
            "records_in_period": in_period.len(),
            "days_in_month": days_in_month,
            "present": present_days.to_string(),
            "weekly_off": weekly_off_days.to_string(),
            "leave": leave_days.to_string(),
            "half_day": half_days.to_string(),
            "absent": absent_days.to_string(),
            "late_marks": late_marks
        }),
        output: serde_json::json!({
            "late_deduction": late_deduction.normalize().to_string(),
            "paid_days": paid_days.normalize().to_string(),
            "proration_factor": proration_factor.normalize().to_string(),
            "assumed_full_attendance": false
        }),
        reasoning: format!(
            "{} + {} + {} + {} x 0.5 - {} late deduction = {} paid of {} days",
            present_days,
            weekly_off_days,
            leave_days,
            half_days,
            late_deduction.normalize(),
            paid_days.normalize(),
            days_in_month
        ),
    };

    AttendanceSummary {
        details: AttendanceDetails {
            present_days,
            weekly_off_days,
            leave_days,
            half_days,
            absent_days,
            late_marks,
            late_deduction,
            paid_days,
            days_in_month,
            proration_factor,
            assumed_full_attendance: false,
        },
        audit_step,
        warnings,
    }
}
