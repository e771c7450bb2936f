//! Input boundary for a payroll run.
//!
//! Numeric inputs are sanitised exactly once, here, before any formula runs:
//! non-numeric or missing values become zero and every amount is rounded to
//! two decimal places. Amounts above [`MAX_AMOUNT`] and sale counts whose
//! total does not fit a `u32` are rejected, so no formula downstream can
//! overflow.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, Deal, Employee, PayMonth};

use super::rounding::round_cents;

/// Largest amount accepted for any monetary input (one trillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Caller-supplied amounts that are not derived from the employee record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollOverrides {
    /// Special allowance used by the proportional structure.
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub special_allowance: Decimal,
    /// Negotiated variable pay, passed through into total CTC.
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub variable_pay: Decimal,
    /// Extra deductions (advances, recoveries) taken from net pay.
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub other_deductions: Decimal,
}

/// Everything a payroll run needs, as provided by the caller.
#[derive(Debug, Clone)]
pub struct PayrollInput<'a> {
    /// The employee being paid.
    pub employee: &'a Employee,
    /// Attendance records; records outside the month are ignored.
    pub attendance: &'a [AttendanceRecord],
    /// The employee's entire deal history, in any order.
    pub deals: &'a [Deal],
    /// The payroll month.
    pub period: PayMonth,
    /// Caller-supplied amounts.
    pub overrides: PayrollOverrides,
}

/// A payroll input after boundary sanitisation.
#[derive(Debug, Clone)]
pub struct SanitizedInput<'a> {
    /// The employee with a sanitised contracted figure.
    pub employee: Employee,
    /// Attendance records, untouched.
    pub attendance: &'a [AttendanceRecord],
    /// Deals with sanitised amounts.
    pub deals: Vec<Deal>,
    /// The payroll month.
    pub period: PayMonth,
    /// Sanitised overrides.
    pub overrides: PayrollOverrides,
}

/// Coerces an arbitrary JSON value to an amount rounded to two decimal places.
///
/// Numbers and numeric strings are parsed; anything else becomes zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::coerce_amount;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// assert_eq!(coerce_amount(&json!("1250.456")), Decimal::new(125046, 2));
/// assert_eq!(coerce_amount(&json!(42)), Decimal::new(42, 0));
/// assert_eq!(coerce_amount(&json!("n/a")), Decimal::ZERO);
/// assert_eq!(coerce_amount(&json!(null)), Decimal::ZERO);
/// ```
pub fn coerce_amount(value: &serde_json::Value) -> Decimal {
    let parsed = match value {
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .ok()
        }
        _ => None,
    };
    round_cents(parsed.unwrap_or(Decimal::ZERO))
}

/// Serde adapter applying [`coerce_amount`] to a field.
pub fn deserialize_lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

/// Coerces an arbitrary JSON value to a sale count.
///
/// Non-negative integers and integer strings are parsed; anything else,
/// including values that do not fit a `u32`, becomes zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::coerce_count;
/// use serde_json::json;
///
/// assert_eq!(coerce_count(&json!(2)), 2);
/// assert_eq!(coerce_count(&json!("3")), 3);
/// assert_eq!(coerce_count(&json!(null)), 0);
/// assert_eq!(coerce_count(&json!(-1)), 0);
/// ```
pub fn coerce_count(value: &serde_json::Value) -> u32 {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.unwrap_or(0)
}

/// Serde adapter applying [`coerce_count`] to a field.
pub fn deserialize_lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_count(&value))
}

/// Rounds an amount to two decimal places, rejecting negatives and amounts
/// above [`MAX_AMOUNT`].
pub fn sanitize_amount(field: &str, amount: Decimal) -> EngineResult<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(EngineError::InvalidInput {
            field: field.to_string(),
            message: format!("amount cannot be negative: {}", amount),
        });
    }
    if amount > MAX_AMOUNT {
        return Err(EngineError::InvalidInput {
            field: field.to_string(),
            message: format!("amount {} exceeds the maximum of {}", amount, MAX_AMOUNT),
        });
    }
    Ok(round_cents(amount))
}

/// Applies boundary sanitisation to a payroll input.
///
/// # Errors
///
/// Returns `InvalidInput` when an amount is negative or too large, a deal
/// belongs to a different employee, or the deal history records more sales
/// than a `u32` can count.
pub fn sanitize<'a>(input: &PayrollInput<'a>) -> EngineResult<SanitizedInput<'a>> {
    let mut employee = input.employee.clone();
    employee.monthly_ctc = sanitize_amount("monthly_ctc", employee.monthly_ctc)?;

    input
        .deals
        .iter()
        .try_fold(0u32, |total, deal| total.checked_add(deal.number_of_sales))
        .ok_or_else(|| EngineError::InvalidInput {
            field: "number_of_sales".to_string(),
            message: format!("total sales across the deal history exceed {}", u32::MAX),
        })?;

    let deals = input
        .deals
        .iter()
        .map(|deal| {
            if deal.employee_id != employee.id {
                return Err(EngineError::InvalidInput {
                    field: "deals".to_string(),
                    message: format!(
                        "deal '{}' belongs to employee '{}', not '{}'",
                        deal.id, deal.employee_id, employee.id
                    ),
                });
            }
            let mut deal = deal.clone();
            deal.deal_value = sanitize_amount("deal_value", deal.deal_value)?;
            deal.cv_count = sanitize_amount("cv_count", deal.cv_count)?;
            Ok(deal)
        })
        .collect::<EngineResult<Vec<_>>>()?;

    let overrides = PayrollOverrides {
        special_allowance: sanitize_amount(
            "special_allowance",
            input.overrides.special_allowance,
        )?,
        variable_pay: sanitize_amount("variable_pay", input.overrides.variable_pay)?,
        other_deductions: sanitize_amount(
            "other_deductions",
            input.overrides.other_deductions,
        )?,
    };

    Ok(SanitizedInput {
        employee,
        attendance: input.attendance,
        deals,
        period: input.period,
        overrides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DealType, EmployeeCategory};
    use chrono::NaiveDate;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn employee(ctc: &str) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            category: EmployeeCategory::Skilled,
            position: "Sales Executive".to_string(),
            monthly_ctc: dec(ctc),
        }
    }

    fn deal(employee_id: &str, cv: &str) -> Deal {
        Deal {
            id: "deal_001".to_string(),
            employee_id: employee_id.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            deal_value: dec("6000.126"),
            cv_count: dec(cv),
            deal_type: DealType::Normal,
            is_supportive: false,
            number_of_sales: 1,
            builder_payment_received: true,
        }
    }

    #[test]
    fn test_coerce_amount_variants() {
        assert_eq!(coerce_amount(&json!(1500.555)), dec("1500.56"));
        assert_eq!(coerce_amount(&json!(" 300 ")), dec("300"));
        assert_eq!(coerce_amount(&json!("1e3")), dec("1000"));
        assert_eq!(coerce_amount(&json!(true)), Decimal::ZERO);
        assert_eq!(coerce_amount(&json!([1, 2])), Decimal::ZERO);
    }

    #[test]
    fn test_overrides_deserialize_leniently() {
        let overrides: PayrollOverrides = serde_json::from_value(json!({
            "special_allowance": "abc",
            "variable_pay": 2500.499
        }))
        .unwrap();

        assert_eq!(overrides.special_allowance, Decimal::ZERO);
        assert_eq!(overrides.variable_pay, dec("2500.50"));
        assert_eq!(overrides.other_deductions, Decimal::ZERO);
    }

    #[test]
    fn test_sanitize_rounds_amounts() {
        let emp = employee("35000.004");
        let deals = vec![deal("emp_001", "1000000")];
        let input = PayrollInput {
            employee: &emp,
            attendance: &[],
            deals: &deals,
            period: PayMonth::new(3, 2025).unwrap(),
            overrides: PayrollOverrides::default(),
        };

        let sanitized = sanitize(&input).unwrap();
        assert_eq!(sanitized.employee.monthly_ctc, dec("35000.00"));
        assert_eq!(sanitized.deals[0].deal_value, dec("6000.13"));
    }

    #[test]
    fn test_sanitize_rejects_negative_amount() {
        let emp = employee("-1");
        let input = PayrollInput {
            employee: &emp,
            attendance: &[],
            deals: &[],
            period: PayMonth::new(3, 2025).unwrap(),
            overrides: PayrollOverrides::default(),
        };

        match sanitize(&input) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "monthly_ctc"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_coerce_count_variants() {
        assert_eq!(coerce_count(&json!(4)), 4);
        assert_eq!(coerce_count(&json!(" 2 ")), 2);
        assert_eq!(coerce_count(&json!("two")), 0);
        assert_eq!(coerce_count(&json!(1.5)), 0);
        assert_eq!(coerce_count(&json!(5_000_000_000u64)), 0);
        assert_eq!(coerce_count(&json!(true)), 0);
    }

    #[test]
    fn test_max_amount_is_one_trillion() {
        assert_eq!(MAX_AMOUNT, dec("1000000000000"));
    }

    #[test]
    fn test_sanitize_rejects_amount_above_maximum() {
        let emp = Employee {
            monthly_ctc: Decimal::MAX,
            ..employee("0")
        };
        let input = PayrollInput {
            employee: &emp,
            attendance: &[],
            deals: &[],
            period: PayMonth::new(3, 2025).unwrap(),
            overrides: PayrollOverrides::default(),
        };

        match sanitize(&input) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "monthly_ctc"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_sanitize_accepts_amount_at_maximum() {
        assert_eq!(sanitize_amount("variable_pay", MAX_AMOUNT).unwrap(), MAX_AMOUNT);
        assert!(sanitize_amount("variable_pay", MAX_AMOUNT + dec("0.01")).is_err());
    }

    #[test]
    fn test_sanitize_rejects_sales_count_overflow() {
        let emp = employee("35000");
        let mut first = deal("emp_001", "1000000");
        first.number_of_sales = u32::MAX;
        let mut second = deal("emp_001", "1000000");
        second.id = "deal_002".to_string();
        let deals = vec![first, second];
        let input = PayrollInput {
            employee: &emp,
            attendance: &[],
            deals: &deals,
            period: PayMonth::new(3, 2025).unwrap(),
            overrides: PayrollOverrides::default(),
        };

        match sanitize(&input) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "number_of_sales"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_sanitize_rejects_foreign_deal() {
        let emp = employee("35000");
        let deals = vec![deal("emp_999", "1000000")];
        let input = PayrollInput {
            employee: &emp,
            attendance: &[],
            deals: &deals,
            period: PayMonth::new(3, 2025).unwrap(),
            overrides: PayrollOverrides::default(),
        };

        match sanitize(&input) {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "deals");
                assert!(message.contains("emp_999"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
