//! Legal forms compared on the legal-status page.

use crate::model::catalog::LegalStatus;

static LEGAL_STATUSES: [LegalStatus; 5] = [
    LegalStatus {
        id: "auto-entrepreneur",
        name: "Auto-entrepreneur (Micro-entreprise)",
        short_name: "Auto-entrepreneur",
        description: "Régime simplifié idéal pour tester une activité ou exercer en complément.",
        min_capital: 0,
        max_associates: Some(1),
        social_charges_rate: 22,
        taxation_type: "IR (versement libératoire possible)",
        liability: "Illimitée sur patrimoine personnel",
        advantages: &[
            "Création simple et rapide",
            "Comptabilité allégée",
            "Pas de TVA jusqu'à un certain seuil",
            "Cotisations proportionnelles au CA",
        ],
        disadvantages: &[
            "Plafonds de chiffre d'affaires",
            "Pas de déduction des charges",
            "Responsabilité illimitée",
            "Image moins professionnelle",
        ],
        best_for: &["Activité secondaire", "Test de marché", "Freelance débutant"],
    },
    LegalStatus {
        id: "eurl",
        name: "Entreprise Unipersonnelle à Responsabilité Limitée",
        short_name: "EURL",
        description: "SARL à associé unique, adaptée pour un entrepreneur seul souhaitant protéger son patrimoine.",
        min_capital: 1,
        max_associates: Some(1),
        social_charges_rate: 45,
        taxation_type: "IR ou IS (sur option)",
        liability: "Limitée aux apports",
        advantages: &[
            "Responsabilité limitée",
            "Patrimoine personnel protégé",
            "Crédibilité auprès des partenaires",
            "Possibilité d'évolution en SARL",
        ],
        disadvantages: &[
            "Formalités de création plus lourdes",
            "Charges sociales élevées",
            "Comptabilité plus complexe",
            "Coûts de fonctionnement",
        ],
        best_for: &[
            "Entrepreneur solo",
            "Activité à risque",
            "Projet d'investissement",
        ],
    },
    LegalStatus {
        id: "sasu",
        name: "Société par Actions Simplifiée Unipersonnelle",
        short_name: "SASU",
        description: "Forme juridique flexible pour un entrepreneur unique, avec un régime social avantageux.",
        min_capital: 1,
        max_associates: Some(1),
        social_charges_rate: 65,
        taxation_type: "IS (IR temporaire possible)",
        liability: "Limitée aux apports",
        advantages: &[
            "Grande flexibilité statutaire",
            "Statut assimilé salarié",
            "Image professionnelle",
            "Facilité pour lever des fonds",
        ],
        disadvantages: &[
            "Charges sociales très élevées",
            "Formalités complexes",
            "Coût de fonctionnement élevé",
            "Pas de chômage en cas de cessation",
        ],
        best_for: &["Startup", "Levée de fonds prévue", "Dirigeant salarié"],
    },
    LegalStatus {
        id: "sarl",
        name: "Société à Responsabilité Limitée",
        short_name: "SARL",
        description: "Forme juridique classique pour les projets à plusieurs associés avec un cadre sécurisé.",
        min_capital: 1,
        max_associates: Some(100),
        social_charges_rate: 45,
        taxation_type: "IS (IR possible sous conditions)",
        liability: "Limitée aux apports",
        advantages: &[
            "Cadre juridique sécurisé",
            "Responsabilité limitée",
            "Adaptée aux projets familiaux",
            "Cession de parts encadrée",
        ],
        disadvantages: &[
            "Statut TNS du gérant majoritaire",
            "Rigidité des statuts",
            "Formalisme important",
            "Moins attractive pour investisseurs",
        ],
        best_for: &["Projet familial", "PME traditionnelle", "Associés stables"],
    },
    LegalStatus {
        id: "sas",
        name: "Société par Actions Simplifiée",
        short_name: "SAS",
        description: "Forme la plus flexible, idéale pour les projets innovants et les levées de fonds.",
        min_capital: 1,
        max_associates: None,
        social_charges_rate: 65,
        taxation_type: "IS",
        liability: "Limitée aux apports",
        advantages: &[
            "Liberté statutaire totale",
            "Facilité pour investisseurs",
            "Image moderne et dynamique",
            "Transmission simplifiée",
        ],
        disadvantages: &[
            "Charges sociales élevées",
            "Complexité de rédaction des statuts",
            "Coût de fonctionnement",
            "Pas de protection chômage dirigeant",
        ],
        best_for: &[
            "Startup",
            "Investisseurs multiples",
            "Projet tech/innovation",
        ],
    },
];

pub fn legal_statuses() -> &'static [LegalStatus] {
    &LEGAL_STATUSES
}

pub fn legal_status(id: &str) -> Option<&'static LegalStatus> {
    LEGAL_STATUSES.iter().find(|status| status.id == id)
}

/// One line of the comparison table: a criterion and one cell per status,
/// in `legal_statuses()` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub label: &'static str,
    pub values: Vec<String>,
}

pub fn comparison_rows() -> Vec<ComparisonRow> {
    let row = |label: &'static str, cell: fn(&LegalStatus) -> String| ComparisonRow {
        label,
        values: LEGAL_STATUSES.iter().map(cell).collect(),
    };
    vec![
        row("Capital minimum", |status| capital_label(status.min_capital)),
        row("Charges sociales", |status| {
            format!("{}%", status.social_charges_rate)
        }),
        row("Fiscalité", |status| status.taxation_type.to_string()),
        row("Responsabilité", |status| {
            liability_label(status.liability).to_string()
        }),
        row("Associés max", |status| {
            associates_label(status.max_associates)
        }),
    ]
}

pub fn capital_label(min_capital: u32) -> String {
    if min_capital == 0 {
        "Aucun".to_string()
    } else {
        format!("{min_capital} €")
    }
}

/// Short form of the liability text.
pub fn liability_label(liability: &str) -> &'static str {
    if liability.contains("Limitée") {
        "Limitée"
    } else {
        "Illimitée"
    }
}

pub fn associates_label(max_associates: Option<u32>) -> String {
    match max_associates {
        Some(max) => max.to_string(),
        None => "Illimité".to_string(),
    }
}
