//! Attendance record model and related types.
//!
//! This module defines the AttendanceRecord struct and the AttendanceStatus
//! enum used to decide how much of a day counts towards paid days.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The status of a single attendance day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// The employee worked a full day.
    Present,
    /// A scheduled weekly off day (paid).
    WeeklyOff,
    /// Approved leave (paid).
    Leave,
    /// The employee worked half a day.
    HalfDay,
    /// The employee was absent (unpaid).
    Absent,
}

impl AttendanceStatus {
    /// Returns the fraction of a paid day this status is worth.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::AttendanceStatus;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(AttendanceStatus::HalfDay.paid_fraction(), Decimal::new(5, 1));
    /// assert_eq!(AttendanceStatus::Absent.paid_fraction(), Decimal::ZERO);
    /// ```
    pub fn paid_fraction(&self) -> Decimal {
        match self {
            AttendanceStatus::Present | AttendanceStatus::WeeklyOff | AttendanceStatus::Leave => {
                Decimal::ONE
            }
            AttendanceStatus::HalfDay => Decimal::new(5, 1),
            AttendanceStatus::Absent => Decimal::ZERO,
        }
    }

    /// Infers a status from raw check-in/check-out timestamps.
    ///
    /// Used once when records enter the system without an explicit status:
    /// both timestamps mean Present, a check-in alone means HalfDay and no
    /// check-in means Absent.
    pub fn from_timestamps(check_in: Option<NaiveTime>, check_out: Option<NaiveTime>) -> Self {
        match (check_in, check_out) {
            (Some(_), Some(_)) => AttendanceStatus::Present,
            (Some(_), None) => AttendanceStatus::HalfDay,
            (None, _) => AttendanceStatus::Absent,
        }
    }
}

/// A single day's attendance for an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The calendar day this record covers.
    pub date: NaiveDate,
    /// Time the employee checked in, if they did.
    #[serde(default)]
    pub check_in_time: Option<NaiveTime>,
    /// Time the employee checked out, if they did.
    #[serde(default)]
    pub check_out_time: Option<NaiveTime>,
    /// The status of the day.
    pub status: AttendanceStatus,
    /// Whether the employee arrived late.
    #[serde(default)]
    pub late_arrival: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M:%S").unwrap()
    }

    #[test]
    fn test_paid_fraction_for_each_status() {
        assert_eq!(AttendanceStatus::Present.paid_fraction(), Decimal::ONE);
        assert_eq!(AttendanceStatus::WeeklyOff.paid_fraction(), Decimal::ONE);
        assert_eq!(AttendanceStatus::Leave.paid_fraction(), Decimal::ONE);
        assert_eq!(AttendanceStatus::HalfDay.paid_fraction(), Decimal::new(5, 1));
        assert_eq!(AttendanceStatus::Absent.paid_fraction(), Decimal::ZERO);
    }

    #[test]
    fn test_status_inferred_from_timestamps() {
        assert_eq!(
            AttendanceStatus::from_timestamps(Some(time("09:00:00")), Some(time("18:00:00"))),
            AttendanceStatus::Present
        );
        assert_eq!(
            AttendanceStatus::from_timestamps(Some(time("09:00:00")), None),
            AttendanceStatus::HalfDay
        );
        assert_eq!(
            AttendanceStatus::from_timestamps(None, None),
            AttendanceStatus::Absent
        );
        assert_eq!(
            AttendanceStatus::from_timestamps(None, Some(time("18:00:00"))),
            AttendanceStatus::Absent
        );
    }

    #[test]
    fn test_deserialize_attendance_record() {
        let json = r#"{
            "date": "2025-03-04",
            "check_in_time": "09:42:00",
            "check_out_time": "18:05:00",
            "status": "present",
            "late_arrival": true
        }"#;

        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(record.status, AttendanceStatus::Present);
        assert!(record.late_arrival);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::WeeklyOff).unwrap(),
            "\"weekly_off\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"half_day\""
        );
    }
}
