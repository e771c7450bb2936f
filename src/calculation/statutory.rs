//! Statutory deduction and employer cost calculation.
//!
//! This module derives the employee-side deductions (PF, ESI, LWF,
//! professional tax) and the employer-side statutory cost (PF, PF admin,
//! ESI, LWF, bonus, gratuity) from the earned basic and gross.

use rust_decimal::Decimal;

use crate::config::StatutoryRates;
use crate::models::{AuditStep, EmployerContributions};

use super::rounding::round_currency;

/// The result of the statutory calculation, including the audit step.
///
/// Every contribution is a named field so it can be audited on its own.
#[derive(Debug, Clone)]
pub struct StatutoryResult {
    /// Employee provident fund contribution.
    pub pf_employee: Decimal,
    /// Employee ESI contribution.
    pub esi_employee: Decimal,
    /// Employee LWF contribution.
    pub lwf_employee: Decimal,
    /// Professional tax.
    pub professional_tax: Decimal,
    /// Employer-side contributions.
    pub employer: EmployerContributions,
    /// Sum of employer-side contributions.
    pub statutory_cost: Decimal,
    /// Whether the PF cap was reached.
    pub pf_capped: bool,
    /// Whether earned gross is within the ESI threshold.
    pub esi_applicable: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

impl StatutoryResult {
    /// Employee statutory deductions (excluding caller-supplied deductions).
    pub fn employee_statutory_total(&self) -> Decimal {
        self.pf_employee + self.esi_employee + self.lwf_employee + self.professional_tax
    }
}

/// Provident fund on earned basic, capped.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::provident_fund;
/// use payroll_engine::config::StatutoryRates;
/// use rust_decimal::Decimal;
///
/// let rates = StatutoryRates::default();
/// assert_eq!(provident_fund(Decimal::new(10500, 0), &rates), Decimal::new(1260, 0));
/// assert_eq!(provident_fund(Decimal::new(17500, 0), &rates), Decimal::new(1800, 0));
/// ```
pub fn provident_fund(earned_basic: Decimal, rates: &StatutoryRates) -> Decimal {
    round_currency(earned_basic * rates.pf_rate).min(rates.pf_cap)
}

/// Calculates employee deductions and employer statutory cost.
///
/// The PF cap applies to the contribution computed on the earned (prorated)
/// basic. ESI applies on both sides only when earned gross is at or below
/// the threshold. The bonus accrual is the larger of the bonus rate on
/// earned basic and the bonus floor scaled by the proration factor.
pub fn calculate_statutory(
    earned_basic: Decimal,
    earned_gross: Decimal,
    proration_factor: Decimal,
    rates: &StatutoryRates,
    step_number: u32,
) -> StatutoryResult {
    let uncapped_pf = round_currency(earned_basic * rates.pf_rate);
    let pf = provident_fund(earned_basic, rates);
    let pf_capped = uncapped_pf > rates.pf_cap;

    let pf_admin = round_currency(earned_basic * rates.pf_admin_rate);

    let esi_applicable = earned_gross <= rates.esi_gross_threshold;
    let (esi_employee, esi_employer) = if esi_applicable {
        (
            round_currency(earned_gross * rates.esi_employee_rate),
            round_currency(earned_gross * rates.esi_employer_rate),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let lwf_employee = round_currency(earned_gross * rates.lwf_employee_rate);
    let lwf_employer = round_currency(earned_gross * rates.lwf_employer_rate);

    let bonus = round_currency(
        (earned_basic * rates.bonus_rate).max(rates.bonus_floor * proration_factor),
    );
    let gratuity = round_currency(earned_basic * rates.gratuity_rate);

    let employer = EmployerContributions {
        pf,
        pf_admin,
        esi: esi_employer,
        lwf: lwf_employer,
        bonus,
        gratuity,
    };
    let statutory_cost = employer.total();

    let audit_step = AuditStep {
        step_number,
        rule_id: "statutory_contributions".to_string(),
        rule_name: "Statutory Contributions".to_string(),
        input: serde_json::json!({
            "earned_basic": earned_basic.normalize().to_string(),
            "earned_gross": earned_gross.normalize().to_string(),
            "proration_factor": proration_factor.normalize().to_string()
        }),
        output: serde_json::json!({
            "pf_employee": pf.to_string(),
            "pf_capped": pf_capped,
            "esi_applicable": esi_applicable,
            "esi_employee": esi_employee.to_string(),
            "lwf_employee": lwf_employee.to_string(),
            "professional_tax": rates.professional_tax.to_string(),
            "pf_employer": pf.to_string(),
            "pf_admin": pf_admin.to_string(),
            "esi_employer": esi_employer.to_string(),
            "lwf_employer": lwf_employer.to_string(),
            "bonus": bonus.to_string(),
            "gratuity": gratuity.to_string(),
            "statutory_cost": statutory_cost.to_string()
        }),
        reasoning: if pf_capped {
            format!(
                "PF {} on basic {} capped at {}; employer statutory cost {}",
                uncapped_pf,
                earned_basic.normalize(),
                rates.pf_cap.normalize(),
                statutory_cost
            )
        } else {
            format!(
                "PF {} on basic {}; employer statutory cost {}",
                pf,
                earned_basic.normalize(),
                statutory_cost
            )
        },
    };

    StatutoryResult {
        pf_employee: pf,
        esi_employee,
        lwf_employee,
        professional_tax: rates.professional_tax,
        employer,
        statutory_cost,
        pf_capped,
        esi_applicable,
        audit_step,
    }
}
