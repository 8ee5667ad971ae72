//! Social charges and income tax simulator.
//!
//! # Invariants
//! - Rates are stored per mille so that round figures stay exact
//!   (50 000 at 222 ‰ is exactly 11 100).
//! - Percentages are `0.0` when revenue is zero.
//! - Estimates only; the brackets are the 2024 income tax scale.

use serde::Serialize;

/// Regime a status key belongs to; drives the charges formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Charges on turnover, flat allowance for the taxable base.
    MicroEnterprise,
    /// Majority manager: charges on remuneration.
    Manager,
    /// Assimilated employee: input is the total employer cost.
    SalariedPresident,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargesRate {
    pub key: &'static str,
    pub per_mille: u32,
    pub label: &'static str,
    pub description: &'static str,
}

impl ChargesRate {
    pub fn regime(&self) -> Regime {
        if self.key.starts_with("auto-entrepreneur") {
            Regime::MicroEnterprise
        } else if self.key.contains("sas") {
            Regime::SalariedPresident
        } else {
            Regime::Manager
        }
    }

    /// Label of the amount the user types in.
    pub fn revenue_label(&self) -> &'static str {
        match self.regime() {
            Regime::MicroEnterprise => "Chiffre d'affaires annuel (€)",
            Regime::Manager | Regime::SalariedPresident => "Rémunération brute annuelle (€)",
        }
    }
}

pub const CHARGES_RATES: [ChargesRate; 7] = [
    ChargesRate {
        key: "auto-entrepreneur-services",
        per_mille: 222,
        label: "Auto-entrepreneur (Services)",
        description: "Prestations de services BIC et BNC",
    },
    ChargesRate {
        key: "auto-entrepreneur-commerce",
        per_mille: 128,
        label: "Auto-entrepreneur (Commerce)",
        description: "Achat/revente de marchandises",
    },
    ChargesRate {
        key: "auto-entrepreneur-liberal",
        per_mille: 222,
        label: "Auto-entrepreneur (Libéral CIPAV)",
        description: "Professions libérales relevant de la CIPAV",
    },
    ChargesRate {
        key: "eurl-is",
        per_mille: 450,
        label: "EURL à l'IS (gérant majoritaire)",
        description: "Charges sur rémunération du gérant",
    },
    ChargesRate {
        key: "sarl",
        per_mille: 450,
        label: "SARL (gérant majoritaire)",
        description: "Charges sur rémunération du gérant",
    },
    ChargesRate {
        key: "sasu",
        per_mille: 820,
        label: "SASU (président salarié)",
        description: "Charges patronales + salariales",
    },
    ChargesRate {
        key: "sas",
        per_mille: 820,
        label: "SAS (président salarié)",
        description: "Charges patronales + salariales",
    },
];

pub const DEFAULT_STATUS_KEY: &str = "auto-entrepreneur-services";

/// Upper bound (inclusive) and marginal rate of each taxed bracket.
const TAX_BRACKETS: [(f64, f64); 4] = [
    (28_797.0, 0.11),
    (82_341.0, 0.30),
    (177_106.0, 0.41),
    (f64::INFINITY, 0.45),
];
const TAX_FREE_THRESHOLD: f64 = 11_294.0;

const COMMERCE_ALLOWANCE: f64 = 0.71;
const DEFAULT_ALLOWANCE: f64 = 0.34;
const EMPLOYER_COST_FACTOR: f64 = 1.45;
const NET_TAXABLE_SHARE: f64 = 0.78;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Simulation {
    pub social_charges: f64,
    pub income_tax: f64,
    pub net_before_tax: f64,
    pub net_after_tax: f64,
    pub charges_rate_percent: f64,
    pub total_rate_percent: f64,
}

impl Simulation {
    pub fn monthly_net(&self) -> f64 {
        self.net_after_tax / 12.0
    }
}

pub fn charges_rate(key: &str) -> Option<&'static ChargesRate> {
    CHARGES_RATES.iter().find(|rate| rate.key == key)
}

/// Runs the simulation for `revenue` under status `key`.
///
/// Returns `None` for an unknown status key.
pub fn simulate(revenue: f64, key: &str) -> Option<Simulation> {
    let rate = charges_rate(key)?;
    let (social_charges, taxable_base) = match rate.regime() {
        Regime::MicroEnterprise => {
            let allowance = if key.contains("commerce") {
                COMMERCE_ALLOWANCE
            } else {
                DEFAULT_ALLOWANCE
            };
            (
                revenue * f64::from(rate.per_mille) / 1000.0,
                revenue * (1.0 - allowance),
            )
        }
        Regime::SalariedPresident => {
            let gross = revenue / EMPLOYER_COST_FACTOR;
            (revenue - gross, gross * NET_TAXABLE_SHARE)
        }
        Regime::Manager => {
            let charges = revenue * f64::from(rate.per_mille) / 1000.0;
            (charges, revenue - charges)
        }
    };

    let income_tax = income_tax(taxable_base);
    let net_before_tax = revenue - social_charges;
    Some(Simulation {
        social_charges,
        income_tax,
        net_before_tax,
        net_after_tax: net_before_tax - income_tax,
        charges_rate_percent: percent_of(social_charges, revenue),
        total_rate_percent: percent_of(social_charges + income_tax, revenue),
    })
}

/// Progressive income tax on `taxable_base`.
pub fn income_tax(taxable_base: f64) -> f64 {
    let mut tax = 0.0;
    let mut lower = TAX_FREE_THRESHOLD;
    for (upper, rate) in TAX_BRACKETS {
        if taxable_base <= lower {
            break;
        }
        tax += (taxable_base.min(upper) - lower) * rate;
        lower = upper;
    }
    tax
}

/// Amount typed in the form; unparsable input counts as zero.
pub fn parse_revenue(value: &str) -> f64 {
    match value.trim().replace(',', ".").parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed,
        _ => 0.0,
    }
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::{charges_rate, income_tax, parse_revenue, simulate, Regime};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn services_micro_enterprise_charges_are_exact() {
        let result = simulate(50_000.0, "auto-entrepreneur-services").unwrap();
        assert_eq!(result.social_charges, 11_100.0);
        assert!(close(result.charges_rate_percent, 22.2));
        // Base 33 000: (28 797 - 11 294) * 0.11 + (33 000 - 28 797) * 0.30
        assert!(close(result.income_tax, 1_925.33 + 1_260.9));
    }

    #[test]
    fn salaried_president_splits_employer_cost() {
        let result = simulate(145_000.0, "sasu").unwrap();
        assert!(close(result.social_charges, 45_000.0));
        assert!(close(result.net_before_tax, 100_000.0));
    }

    #[test]
    fn manager_regime_uses_remuneration_rate() {
        let result = simulate(10_000.0, "sarl").unwrap();
        assert!(close(result.social_charges, 4_500.0));
        assert_eq!(result.income_tax, 0.0);
        assert_eq!(charges_rate("eurl-is").unwrap().regime(), Regime::Manager);
    }

    #[test]
    fn zero_revenue_and_unknown_status() {
        let result = simulate(0.0, "sas").unwrap();
        assert_eq!(result.charges_rate_percent, 0.0);
        assert_eq!(result.total_rate_percent, 0.0);
        assert!(simulate(1_000.0, "sci").is_none());
    }

    #[test]
    fn tax_brackets_accumulate() {
        assert_eq!(income_tax(11_294.0), 0.0);
        assert!(close(income_tax(28_797.0), 1_925.33));
        assert!(close(
            income_tax(200_000.0),
            1_925.33 + 16_063.2 + 38_853.65 + 22_894.0 * 0.45
        ));
    }

    #[test]
    fn revenue_parsing_falls_back_to_zero() {
        assert_eq!(parse_revenue("50000"), 50_000.0);
        assert_eq!(parse_revenue("1234,5"), 1_234.5);
        assert_eq!(parse_revenue(""), 0.0);
        assert_eq!(parse_revenue("beaucoup"), 0.0);
    }
}
