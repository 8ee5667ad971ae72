//! Default onboarding tasks inserted for a user with an empty board.

use crate::model::account::UserId;
use crate::model::clock::MILLIS_PER_DAY;
use crate::model::task::{NewTask, TaskStatus};

struct SeedTask {
    key: &'static str,
    title: &'static str,
    description: &'static str,
    category: &'static str,
    due_in_days: Option<i64>,
}

const DEFAULT_TASKS: [SeedTask; 8] = [
    SeedTask {
        key: "complete_project",
        title: "Compléter mon projet",
        description: "Finalisez la définition de votre projet entrepreneurial",
        category: "project",
        due_in_days: None,
    },
    SeedTask {
        key: "business_plan",
        title: "Créer le business plan",
        description: "Construisez votre business plan complet",
        category: "business",
        due_in_days: None,
    },
    SeedTask {
        key: "choose_legal_status",
        title: "Choisir le statut juridique",
        description: "Comparez et sélectionnez le meilleur statut",
        category: "legal",
        due_in_days: None,
    },
    SeedTask {
        key: "market_study",
        title: "Finaliser l'étude de marché",
        description: "Analysez votre marché cible",
        category: "project",
        due_in_days: Some(7),
    },
    SeedTask {
        key: "register_business",
        title: "Immatriculer l'entreprise",
        description: "Effectuez les démarches d'immatriculation",
        category: "admin",
        due_in_days: Some(30),
    },
    SeedTask {
        key: "find_financing",
        title: "Rechercher des financements",
        description: "Identifiez les aides et financements disponibles",
        category: "financing",
        due_in_days: None,
    },
    SeedTask {
        key: "prepare_statutes",
        title: "Rédiger les statuts",
        description: "Préparez les statuts de votre entreprise",
        category: "legal",
        due_in_days: Some(14),
    },
    SeedTask {
        key: "open_bank_account",
        title: "Ouvrir un compte bancaire professionnel",
        description: "Créez votre compte bancaire entreprise",
        category: "admin",
        due_in_days: None,
    },
];

/// Builds the default task set for `user_id`; due dates are relative to `now_ms`.
pub fn default_tasks(user_id: UserId, now_ms: i64) -> Vec<NewTask> {
    DEFAULT_TASKS
        .iter()
        .map(|seed| NewTask {
            user_id,
            task_key: seed.key.to_string(),
            title: seed.title.to_string(),
            description: Some(seed.description.to_string()),
            category: seed.category.to_string(),
            status: TaskStatus::Pending,
            due_at_ms: seed.due_in_days.map(|days| now_ms + days * MILLIS_PER_DAY),
            completed_at_ms: None,
        })
        .collect()
}
