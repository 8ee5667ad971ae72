//! Company-creation checklist and its session-local tracker.

use crate::model::catalog::{AdminStep, AdminStepStatus, StepLink};

const fn link(label: &'static str, url: &'static str) -> StepLink {
    StepLink { label, url }
}

static ADMIN_STEPS: [AdminStep; 8] = [
    AdminStep {
        id: "1",
        title: "Définir votre projet et étude de marché",
        description: "Validez votre idée avec une étude de marché approfondie et un business plan solide.",
        status: AdminStepStatus::Todo,
        documents: &["Business plan", "Étude de marché", "Prévisionnel financier"],
        links: &[link("Guide CCI Paris", "https://www.cci-paris-idf.fr")],
        estimated_duration: "2-4 semaines",
        order: 1,
    },
    AdminStep {
        id: "2",
        title: "Choisir le statut juridique",
        description: "Sélectionnez la forme juridique adaptée à votre projet et votre situation.",
        status: AdminStepStatus::Todo,
        documents: &["Comparatif des statuts", "Simulation charges"],
        links: &[link("Bpifrance Création", "https://bpifrance-creation.fr")],
        estimated_duration: "1 semaine",
        order: 2,
    },
    AdminStep {
        id: "3",
        title: "Domicilier l'entreprise",
        description: "Choisissez l'adresse du siège social de votre entreprise.",
        status: AdminStepStatus::Todo,
        documents: &[
            "Justificatif de domiciliation",
            "Contrat de domiciliation",
        ],
        links: &[link("Domiciliation Paris", "https://www.service-public.fr")],
        estimated_duration: "1-2 jours",
        order: 3,
    },
    AdminStep {
        id: "4",
        title: "Rédiger les statuts",
        description: "Rédigez les statuts de votre société avec toutes les mentions obligatoires.",
        status: AdminStepStatus::Todo,
        documents: &["Statuts signés", "Modèle de statuts"],
        links: &[link("Modèles officiels", "https://www.service-public.fr")],
        estimated_duration: "1 semaine",
        order: 4,
    },
    AdminStep {
        id: "5",
        title: "Déposer le capital social",
        description: "Déposez le capital sur un compte bloqué et obtenez l'attestation de dépôt.",
        status: AdminStepStatus::Todo,
        documents: &["Attestation de dépôt de capital"],
        links: &[link("Banques partenaires", "https://www.qonto.com")],
        estimated_duration: "2-3 jours",
        order: 5,
    },
    AdminStep {
        id: "6",
        title: "Publier l'annonce légale",
        description: "Publiez l'avis de constitution dans un journal d'annonces légales.",
        status: AdminStepStatus::Todo,
        documents: &["Attestation de parution"],
        links: &[link("Annonces légales", "https://www.legifrance.gouv.fr")],
        estimated_duration: "1-2 jours",
        order: 6,
    },
    AdminStep {
        id: "7",
        title: "Immatriculer l'entreprise",
        description: "Déposez votre dossier sur le Guichet Unique de l'INPI pour l'immatriculation.",
        status: AdminStepStatus::Todo,
        documents: &[
            "Formulaire M0/P0",
            "Pièce d'identité",
            "Justificatif de domicile",
        ],
        links: &[link("Guichet Unique INPI", "https://procedures.inpi.fr")],
        estimated_duration: "1-2 semaines",
        order: 7,
    },
    AdminStep {
        id: "8",
        title: "Recevoir le Kbis et numéros",
        description: "Obtenez votre extrait Kbis, numéro SIREN et code APE.",
        status: AdminStepStatus::Todo,
        documents: &["Extrait Kbis", "Avis SIREN"],
        links: &[link("Infogreffe", "https://www.infogreffe.fr")],
        estimated_duration: "1-2 semaines",
        order: 8,
    },
];

/// Checklist in its initial state, ordered by `order`.
pub fn admin_steps() -> &'static [AdminStep] {
    &ADMIN_STEPS
}

/// Status changes made during the session. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminStepTracker {
    steps: Vec<AdminStep>,
}

impl Default for AdminStepTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminStepTracker {
    pub fn new() -> Self {
        Self {
            steps: ADMIN_STEPS.to_vec(),
        }
    }

    pub fn steps(&self) -> &[AdminStep] {
        &self.steps
    }

    /// Sets the status of step `id`; returns whether the step exists.
    pub fn update_status(&mut self, id: &str, status: AdminStepStatus) -> bool {
        match self.steps.iter_mut().find(|step| step.id == id) {
            Some(step) => {
                step.status = status;
                true
            }
            None => false,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.status == AdminStepStatus::Completed)
            .count()
    }

    /// Rounded share of completed steps.
    pub fn progress_percent(&self) -> u32 {
        if self.steps.is_empty() {
            return 0;
        }
        let completed = self.completed_count() as f64;
        (completed / self.steps.len() as f64 * 100.0).round() as u32
    }
}
