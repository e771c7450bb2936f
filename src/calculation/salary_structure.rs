//! Salary structure resolution.
//!
//! This module expands an employee's contracted monthly figure into the five
//! named salary components and scales them by the attendance proration
//! factor to produce the earned amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollPolicy;
use crate::models::{AuditStep, AuditWarning, EmployeeCategory, SalaryComponents};

use super::rounding::{round_cents, round_currency};

/// Where the contracted breakdown came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureSource {
    /// An exact row of the fixed structure table.
    FixedTable,
    /// The proportional rule (basic 50% of gross, HRA 50% of basic).
    Proportional,
}

/// The result of resolving a salary structure, including the audit step.
#[derive(Debug, Clone)]
pub struct SalaryStructureResult {
    /// The contracted figure after the minimum-wage floor.
    pub contracted_figure: Decimal,
    /// Which path produced the breakdown.
    pub source: StructureSource,
    /// Full-month components.
    pub contracted: SalaryComponents,
    /// Components scaled by the proration factor and rounded to whole units.
    pub earned: SalaryComponents,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
    /// Floors and overflows applied.
    pub warnings: Vec<AuditWarning>,
}

/// Resolves the contracted and earned salary structure.
///
/// The contracted figure is first lifted to the category's minimum wage if
/// it falls below it. An exact match in the fixed structure table supplies
/// the breakdown verbatim; otherwise the figure is treated as gross and
/// split proportionally: basic is half of gross, HRA half of basic,
/// conveyance fixed, special allowance caller-supplied, and other allowance
/// the remainder (never negative).
///
/// Each component is then multiplied by `proration_factor` and rounded to a
/// whole currency unit; earned gross is the sum of the rounded components.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::resolve_salary_structure;
/// use payroll_engine::config::PayrollPolicy;
/// use payroll_engine::models::EmployeeCategory;
/// use rust_decimal::Decimal;
///
/// let policy = PayrollPolicy::default();
/// let result = resolve_salary_structure(
///     EmployeeCategory::Skilled,
///     Decimal::new(35000, 0),
///     Decimal::ONE,
///     Decimal::ZERO,
///     &policy,
///     1,
/// );
///
/// assert_eq!(result.earned.basic_salary, Decimal::new(17500, 0));
/// assert_eq!(result.earned.hra, Decimal::new(8750, 0));
/// assert_eq!(result.earned.other_allowance, Decimal::new(7150, 0));
/// ```
pub fn resolve_salary_structure(
    category: EmployeeCategory,
    monthly_ctc: Decimal,
    proration_factor: Decimal,
    special_allowance: Decimal,
    policy: &PayrollPolicy,
    step_number: u32,
) -> SalaryStructureResult {
    let mut warnings = Vec::new();

    let floor = policy.minimum_wages.for_category(category);
    let contracted_figure = if monthly_ctc < floor {
        warnings.push(AuditWarning::new(
            "MINIMUM_WAGE_FLOOR",
            format!(
                "Contracted figure {} is below the {:?} minimum wage {}; using the floor",
                monthly_ctc.normalize(),
                category,
                floor.normalize()
            ),
            "medium",
        ));
        floor
    } else {
        monthly_ctc
    };

    let (source, contracted) = match policy.salary_structures.lookup(contracted_figure) {
        Some(fixed) => (StructureSource::FixedTable, fixed.clone()),
        None => {
            let contracted = proportional_structure(contracted_figure, special_allowance, policy);
            if contracted.gross_salary > contracted_figure {
                warnings.push(AuditWarning::new(
                    "STRUCTURE_OVERFLOW",
                    format!(
                        "Fixed components exceed gross {}; other allowance set to 0",
                        contracted_figure.normalize()
                    ),
                    "high",
                ));
            }
            (StructureSource::Proportional, contracted)
        }
    };

    let earned = prorate(&contracted, proration_factor);

    let source_str = match source {
        StructureSource::FixedTable => "fixed_table",
        StructureSource::Proportional => "proportional",
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "salary_structure".to_string(),
        rule_name: "Salary Structure Resolution".to_string(),
        input: serde_json::json!({
            "category": category,
            "monthly_ctc": monthly_ctc.normalize().to_string(),
            "contracted_figure": contracted_figure.normalize().to_string(),
            "special_allowance": special_allowance.normalize().to_string(),
            "proration_factor": proration_factor.normalize().to_string()
        }),
        output: serde_json::json!({
            "source": source_str,
            "contracted_gross": contracted.gross_salary.normalize().to_string(),
            "earned_basic": earned.basic_salary.to_string(),
            "earned_hra": earned.hra.to_string(),
            "earned_conveyance": earned.conveyance.to_string(),
            "earned_special_allowance": earned.special_allowance.to_string(),
            "earned_other_allowance": earned.other_allowance.to_string(),
            "earned_gross": earned.gross_salary.to_string()
        }),
        reasoning: format!(
            "{} structure for {}: gross {} x {} = earned gross {}",
            source_str,
            contracted_figure.normalize(),
            contracted.gross_salary.normalize(),
            proration_factor.round_dp(4).normalize(),
            earned.gross_salary
        ),
    };

    SalaryStructureResult {
        contracted_figure,
        source,
        contracted,
        earned,
        audit_step,
        warnings,
    }
}

fn proportional_structure(
    gross: Decimal,
    special_allowance: Decimal,
    policy: &PayrollPolicy,
) -> SalaryComponents {
    let rules = &policy.structure;

    let basic_salary = round_cents(gross * rules.basic_share_of_gross);
    let hra = round_cents(basic_salary * rules.hra_share_of_basic);
    let conveyance = rules.conveyance;
    let other_allowance =
        (gross - basic_salary - hra - conveyance - special_allowance).max(Decimal::ZERO);

    SalaryComponents {
        basic_salary,
        hra,
        conveyance,
        special_allowance,
        other_allowance,
        gross_salary: basic_salary + hra + conveyance + special_allowance + other_allowance,
    }
}

fn prorate(contracted: &SalaryComponents, factor: Decimal) -> SalaryComponents {
    let scale = |amount: Decimal| round_currency(amount * factor);

    let basic_salary = scale(contracted.basic_salary);
    let hra = scale(contracted.hra);
    let conveyance = scale(contracted.conveyance);
    let special_allowance = scale(contracted.special_allowance);
    let other_allowance = scale(contracted.other_allowance);

    SalaryComponents {
        basic_salary,
        hra,
        conveyance,
        special_allowance,
        other_allowance,
        gross_salary: basic_salary + hra + conveyance + special_allowance + other_allowance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FixedStructure, SalaryStructureTable};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn policy_with_fixed_row() -> PayrollPolicy {
        PayrollPolicy {
            salary_structures: SalaryStructureTable::new(vec![FixedStructure {
                ctc: dec("15000"),
                components: SalaryComponents {
                    basic_salary: dec("7000"),
                    hra: dec("3500"),
                    conveyance: dec("1600"),
                    special_allowance: dec("500"),
                    other_allowance: dec("0"),
                    gross_salary: dec("12600"),
                },
            }]),
            ..PayrollPolicy::default()
        }
    }

    fn resolve(
        ctc: &str,
        factor: &str,
        special: &str,
        policy: &PayrollPolicy,
    ) -> SalaryStructureResult {
        resolve_salary_structure(
            EmployeeCategory::Skilled,
            dec(ctc),
            dec(factor),
            dec(special),
            policy,
            1,
        )
    }

    #[test]
    fn test_proportional_35000() {
        let result = resolve("35000", "1", "0", &PayrollPolicy::default());

        assert_eq!(result.source, StructureSource::Proportional);
        assert_eq!(result.earned.basic_salary, dec("17500"));
        assert_eq!(result.earned.hra, dec("8750"));
        assert_eq!(result.earned.conveyance, dec("1600"));
        assert_eq!(result.earned.special_allowance, dec("0"));
        assert_eq!(result.earned.other_allowance, dec("7150"));
        assert_eq!(result.earned.gross_salary, dec("35000"));
    }

    #[test]
    fn test_special_allowance_reduces_other() {
        let result = resolve("35000", "1", "2000", &PayrollPolicy::default());

        assert_eq!(result.contracted.special_allowance, dec("2000"));
        assert_eq!(result.contracted.other_allowance, dec("5150"));
        assert_eq!(result.contracted.gross_salary, dec("35000"));
    }

    #[test]
    fn test_fixed_table_row_used_verbatim() {
        let policy = policy_with_fixed_row();
        let result = resolve("15000", "1", "9999", &policy);

        assert_eq!(result.source, StructureSource::FixedTable);
        assert_eq!(result.contracted.basic_salary, dec("7000"));
        assert_eq!(result.contracted.special_allowance, dec("500"));
        assert_eq!(result.earned.gross_salary, dec("12600"));
    }

    #[test]
    fn test_components_prorated_and_rounded() {
        // 15 of 30 days
        let result = resolve("35000", "0.5", "0", &PayrollPolicy::default());

        assert_eq!(result.earned.basic_salary, dec("8750"));
        assert_eq!(result.earned.hra, dec("4375"));
        assert_eq!(result.earned.conveyance, dec("800"));
        assert_eq!(result.earned.other_allowance, dec("3575"));
        assert_eq!(result.earned.gross_salary, dec("17500"));
    }

    #[test]
    fn test_rounding_after_scaling() {
        // 29.5 of 31 days
        let factor = dec("29.5") / dec("31");
        let result = resolve_salary_structure(
            EmployeeCategory::Skilled,
            dec("35000"),
            factor,
            Decimal::ZERO,
            &PayrollPolicy::default(),
            1,
        );

        // 17500 * 29.5 / 31 = 16653.22...
        assert_eq!(result.earned.basic_salary, dec("16653"));
        // 8750 * 29.5 / 31 = 8326.61...
        assert_eq!(result.earned.hra, dec("8327"));
        assert_eq!(
            result.earned.gross_salary,
            result.earned.component_sum()
        );
    }

    #[test]
    fn test_minimum_wage_floor_lifts_figure() {
        let result = resolve_salary_structure(
            EmployeeCategory::Unskilled,
            dec("8000"),
            Decimal::ONE,
            Decimal::ZERO,
            &PayrollPolicy::default(),
            1,
        );

        assert_eq!(result.contracted_figure, dec("10000"));
        assert_eq!(result.contracted.basic_salary, dec("5000"));
        assert!(result.warnings.iter().any(|w| w.code == "MINIMUM_WAGE_FLOOR"));
    }

    #[test]
    fn test_other_allowance_never_negative() {
        let result = resolve("21000", "1", "20000", &PayrollPolicy::default());

        assert_eq!(result.contracted.other_allowance, Decimal::ZERO);
        assert!(result.contracted.gross_salary > dec("21000"));
        assert!(result.warnings.iter().any(|w| w.code == "STRUCTURE_OVERFLOW"));
    }

    #[test]
    fn test_audit_step_records_source() {
        let result = resolve("35000", "1", "0", &PayrollPolicy::default());
        assert_eq!(result.audit_step.rule_id, "salary_structure");
        assert_eq!(
            result.audit_step.output["source"].as_str().unwrap(),
            "proportional"
        );
        assert_eq!(
            result.audit_step.output["earned_basic"].as_str().unwrap(),
            "17500"
        );
    }
}
