//! Financing aid directory, its search filter and the incubator list.

use crate::model::catalog::{AmountRange, FinancingAid, FinancingKind, Incubator};

static FINANCING_AIDS: [FinancingAid; 6] = [
    FinancingAid {
        id: "acre",
        name: "ACRE - Aide aux Créateurs et Repreneurs d'Entreprise",
        kind: FinancingKind::Exoneration,
        provider: "Urssaf",
        amount: AmountRange { min: 0, max: 0 },
        eligibility: &["Demandeur d'emploi", "Moins de 26 ans", "RSA", "ASS"],
        sectors: &["Tous secteurs"],
        region: "France entière",
        description: "Exonération partielle de charges sociales pendant 12 mois pour les créateurs d'entreprise.",
        link: "https://www.urssaf.fr",
    },
    FinancingAid {
        id: "nacre",
        name: "NACRE - Nouvel Accompagnement pour la Création et la Reprise d'Entreprise",
        kind: FinancingKind::Pret,
        provider: "Région Île-de-France",
        amount: AmountRange {
            min: 1_000,
            max: 10_000,
        },
        eligibility: &["Demandeur d'emploi", "RSA", "ASS"],
        sectors: &["Tous secteurs"],
        region: "Île-de-France",
        description: "Accompagnement et prêt à taux zéro pour la création ou reprise d'entreprise.",
        link: "https://www.iledefrance.fr",
    },
    FinancingAid {
        id: "pret-honneur",
        name: "Prêt d'Honneur Initiative France",
        kind: FinancingKind::Pret,
        provider: "Initiative France",
        amount: AmountRange {
            min: 3_000,
            max: 50_000,
        },
        eligibility: &["Créateur d'entreprise", "Projet viable"],
        sectors: &["Tous secteurs"],
        region: "France entière",
        description: "Prêt personnel à taux zéro sans garantie pour renforcer vos fonds propres.",
        link: "https://www.initiative-france.fr",
    },
    FinancingAid {
        id: "bpi-creation",
        name: "Garantie Création Bpifrance",
        kind: FinancingKind::Garantie,
        provider: "Bpifrance",
        amount: AmountRange { min: 0, max: 0 },
        eligibility: &["TPE/PME de moins de 3 ans"],
        sectors: &["Tous secteurs"],
        region: "France entière",
        description: "Garantie jusqu'à 60% du montant du prêt bancaire pour faciliter l'accès au crédit.",
        link: "https://www.bpifrance.fr",
    },
    FinancingAid {
        id: "paris-innovation",
        name: "Paris Innovation Amorçage",
        kind: FinancingKind::Subvention,
        provider: "Ville de Paris / Bpifrance",
        amount: AmountRange {
            min: 30_000,
            max: 90_000,
        },
        eligibility: &["Startup innovante", "Siège à Paris", "Moins de 2 ans"],
        sectors: &["Tech", "Innovation", "Deeptech"],
        region: "Paris",
        description: "Subvention pour les startups parisiennes en phase d'amorçage.",
        link: "https://www.paris.fr",
    },
    FinancingAid {
        id: "aide-idf-emergence",
        name: "Aide à l'Émergence Île-de-France",
        kind: FinancingKind::Subvention,
        provider: "Région Île-de-France",
        amount: AmountRange {
            min: 10_000,
            max: 30_000,
        },
        eligibility: &["Projet innovant", "Basé en IDF"],
        sectors: &["Innovation", "ESS", "Industrie"],
        region: "Île-de-France",
        description: "Soutien aux projets émergents innovants en Île-de-France.",
        link: "https://www.iledefrance.fr",
    },
];

static PARIS_INCUBATORS: [Incubator; 5] = [
    Incubator {
        name: "Station F",
        area: "13e arrondissement",
        speciality: "Startups tous secteurs",
    },
    Incubator {
        name: "Paris&Co",
        area: "Paris",
        speciality: "Innovation urbaine",
    },
    Incubator {
        name: "La Ruche",
        area: "Plusieurs sites",
        speciality: "ESS et impact",
    },
    Incubator {
        name: "Agoranov",
        area: "5e arrondissement",
        speciality: "Deep tech",
    },
    Incubator {
        name: "Le Cargo",
        area: "19e arrondissement",
        speciality: "Startups numériques",
    },
];

pub fn financing_aids() -> &'static [FinancingAid] {
    &FINANCING_AIDS
}

pub fn paris_incubators() -> &'static [Incubator] {
    &PARIS_INCUBATORS
}

/// "Station F • 13e arrondissement • Startups tous secteurs" style card line.
pub fn incubator_label(incubator: &Incubator) -> String {
    format!(
        "{} • {} • {}",
        incubator.name, incubator.area, incubator.speciality
    )
}

/// Search box plus the two dropdowns. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinancingFilter {
    pub query: String,
    pub kind: Option<FinancingKind>,
    pub region: Option<String>,
}

impl FinancingFilter {
    pub fn matches(&self, aid: &FinancingAid) -> bool {
        let query = self.query.to_lowercase();
        let matches_query = aid.name.to_lowercase().contains(&query)
            || aid.description.to_lowercase().contains(&query);
        let matches_kind = self.kind.map_or(true, |kind| aid.kind == kind);
        let matches_region = self
            .region
            .as_deref()
            .map_or(true, |region| aid.region.contains(region));
        matches_query && matches_kind && matches_region
    }
}

/// Aids matching `filter`, in directory order.
pub fn filter_aids(filter: &FinancingFilter) -> Vec<&'static FinancingAid> {
    FINANCING_AIDS
        .iter()
        .filter(|aid| filter.matches(aid))
        .collect()
}

/// "1 000 € - 10 000 €" style amount, `None` when the aid has no fixed amount.
pub fn amount_label(amount: AmountRange) -> Option<String> {
    if amount.max == 0 {
        return None;
    }
    Some(format!(
        "{} € - {} €",
        group_thousands(amount.min),
        group_thousands(amount.max)
    ))
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::{amount_label, filter_aids, FinancingFilter};
    use crate::model::catalog::{AmountRange, FinancingKind};

    #[test]
    fn empty_filter_returns_everything() {
        assert_eq!(filter_aids(&FinancingFilter::default()).len(), 6);
    }

    #[test]
    fn query_is_case_insensitive_on_name_and_description() {
        let filter = FinancingFilter {
            query: "TAUX ZÉRO".to_string(),
            ..FinancingFilter::default()
        };
        let ids: Vec<&str> = filter_aids(&filter).iter().map(|aid| aid.id).collect();
        assert_eq!(ids, vec!["nacre", "pret-honneur"]);
    }

    #[test]
    fn kind_and_region_combine() {
        let filter = FinancingFilter {
            query: String::new(),
            kind: Some(FinancingKind::Subvention),
            region: Some("Île-de-France".to_string()),
        };
        let ids: Vec<&str> = filter_aids(&filter).iter().map(|aid| aid.id).collect();
        assert_eq!(ids, vec!["aide-idf-emergence"]);
    }

    #[test]
    fn amount_labels_group_thousands() {
        assert_eq!(
            amount_label(AmountRange {
                min: 1_000,
                max: 10_000
            })
            .as_deref(),
            Some("1 000 € - 10 000 €")
        );
        assert_eq!(amount_label(AmountRange { min: 0, max: 0 }), None);
    }
}
