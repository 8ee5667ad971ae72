//! Legal-status recommendation quiz.
//!
//! # Invariants
//! - Every option scores all five statuses, in `STATUSES` order.
//! - Ranking is a stable descending sort: ties keep `STATUSES` order.
//! - Unanswered questions contribute nothing.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Statuses scored by the quiz, in display order.
pub const STATUSES: [&str; 5] = ["Auto-entrepreneur", "EURL", "SASU", "SARL", "SAS"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOption {
    pub label: &'static str,
    /// Points per status, indexed like `STATUSES`.
    pub scores: [u32; 5],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: &'static str,
    pub options: &'static [QuizOption],
}

const fn option(label: &'static str, scores: [u32; 5]) -> QuizOption {
    QuizOption { label, scores }
}

pub const QUESTIONS: [QuizQuestion; 7] = [
    QuizQuestion {
        id: 1,
        question: "Souhaitez-vous vous associer avec d'autres personnes ?",
        options: &[
            option("Non, je veux être seul(e)", [3, 3, 3, 0, 0]),
            option("Oui, avec 1 ou 2 associés", [0, 0, 0, 3, 2]),
            option("Oui, avec plusieurs associés", [0, 0, 0, 2, 3]),
        ],
    },
    QuizQuestion {
        id: 2,
        question: "Quel est votre chiffre d'affaires prévisionnel annuel ?",
        options: &[
            option("Moins de 77 700 € (services)", [3, 1, 1, 1, 0]),
            option("Entre 77 700 € et 188 700 €", [1, 2, 2, 2, 1]),
            option("Plus de 188 700 €", [0, 2, 3, 2, 3]),
        ],
    },
    QuizQuestion {
        id: 3,
        question: "Quelle protection sociale souhaitez-vous ?",
        options: &[
            option("Protection minimale, cotisations réduites", [3, 2, 0, 2, 0]),
            option("Protection équivalente au régime salarié", [0, 0, 3, 0, 3]),
            option("Peu importe, je m'adapterai", [1, 1, 1, 1, 1]),
        ],
    },
    QuizQuestion {
        id: 4,
        question: "Comment souhaitez-vous vous rémunérer ?",
        options: &[
            option("Prélèvements simples sur le bénéfice", [3, 2, 0, 2, 0]),
            option("Salaires + dividendes", [0, 1, 3, 1, 3]),
            option("Principalement des dividendes", [0, 2, 2, 2, 2]),
        ],
    },
    QuizQuestion {
        id: 5,
        question: "Quel niveau de formalités administratives acceptez-vous ?",
        options: &[
            option("Le minimum possible", [3, 1, 0, 0, 0]),
            option("Comptabilité simplifiée", [1, 2, 1, 1, 1]),
            option("Comptabilité complète, pas de problème", [0, 2, 2, 2, 2]),
        ],
    },
    QuizQuestion {
        id: 6,
        question: "Prévoyez-vous de lever des fonds ou d'accueillir des investisseurs ?",
        options: &[
            option("Non, pas du tout", [3, 2, 1, 2, 0]),
            option("Peut-être à moyen terme", [0, 1, 2, 1, 2]),
            option("Oui, c'est prévu", [0, 0, 3, 0, 3]),
        ],
    },
    QuizQuestion {
        id: 7,
        question: "Quel est votre secteur d'activité ?",
        options: &[
            option("Services / Conseil / Freelance", [3, 2, 2, 1, 1]),
            option("Commerce / E-commerce", [2, 2, 2, 2, 2]),
            option("Tech / Startup innovante", [0, 0, 3, 0, 3]),
            option("Artisanat / Production", [2, 2, 1, 2, 1]),
        ],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDetails {
    pub status: &'static str,
    pub description: &'static str,
    pub pros: [&'static str; 3],
    pub cons: [&'static str; 3],
}

const STATUS_DETAILS: [StatusDetails; 5] = [
    StatusDetails {
        status: "Auto-entrepreneur",
        description: "Idéal pour démarrer une activité avec peu de formalités et des charges proportionnelles au CA.",
        pros: [
            "Création simple et rapide",
            "Charges proportionnelles au CA",
            "Comptabilité ultra-simplifiée",
        ],
        cons: [
            "Plafonds de CA",
            "Pas de déduction des charges",
            "Protection sociale limitée",
        ],
    },
    StatusDetails {
        status: "EURL",
        description: "Société unipersonnelle offrant une protection du patrimoine et une fiscalité flexible.",
        pros: ["Patrimoine protégé", "Choix IR ou IS", "Crédibilité renforcée"],
        cons: [
            "Formalités de création",
            "Comptabilité obligatoire",
            "Charges sociales élevées",
        ],
    },
    StatusDetails {
        status: "SASU",
        description: "Société flexible avec protection sociale du dirigeant assimilé salarié.",
        pros: [
            "Protection sociale optimale",
            "Grande flexibilité statutaire",
            "Idéale pour lever des fonds",
        ],
        cons: [
            "Charges sociales élevées",
            "Formalités administratives",
            "Coût de création",
        ],
    },
    StatusDetails {
        status: "SARL",
        description: "Forme classique pour les projets à plusieurs, avec un cadre juridique sécurisant.",
        pros: [
            "Cadre juridique sécurisé",
            "Adaptée aux projets familiaux",
            "Charges sociales modérées",
        ],
        cons: [
            "Statuts rigides",
            "Cession de parts encadrée",
            "Moins attractive pour investisseurs",
        ],
    },
    StatusDetails {
        status: "SAS",
        description: "Structure moderne et flexible, parfaite pour les startups et projets ambitieux.",
        pros: [
            "Flexibilité maximale",
            "Attractive pour investisseurs",
            "Pas de capital minimum",
        ],
        cons: [
            "Charges sociales élevées",
            "Rédaction des statuts complexe",
            "Coût de fonctionnement",
        ],
    },
];

pub fn status_details(status: &str) -> Option<&'static StatusDetails> {
    STATUS_DETAILS.iter().find(|details| details.status == status)
}

/// One row of the result ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusScore {
    pub status: &'static str,
    pub score: u32,
    /// Bar width relative to the top score, rounded percent.
    pub relative_percent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizError {
    InvalidOption { question: usize, option: usize },
    AlreadyFinished,
}

impl Display for QuizError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOption { question, option } => {
                write!(f, "question {} has no option {}", question + 1, option)
            }
            Self::AlreadyFinished => write!(f, "quiz already finished"),
        }
    }
}

impl Error for QuizError {}

/// Scores `answers` (option index per question) and ranks the statuses.
///
/// Out-of-range question or option indexes are skipped.
pub fn rank_statuses(answers: &[Option<usize>]) -> Vec<StatusScore> {
    let mut totals = [0u32; 5];
    for (question, answer) in QUESTIONS.iter().zip(answers) {
        let Some(option) = answer.and_then(|index| question.options.get(index)) else {
            continue;
        };
        for (total, points) in totals.iter_mut().zip(option.scores) {
            *total += points;
        }
    }

    let mut ranking: Vec<(&'static str, u32)> = STATUSES.into_iter().zip(totals).collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1));
    let top = ranking.first().map_or(0, |entry| entry.1).max(1);

    ranking
        .into_iter()
        .map(|(status, score)| StatusScore {
            status,
            score,
            relative_percent: (score * 200 + top) / (2 * top),
        })
        .collect()
}

/// Question-by-question quiz state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quiz {
    current: usize,
    answers: Vec<Option<usize>>,
    finished: bool,
}

impl Quiz {
    pub fn new() -> Self {
        Self {
            current: 0,
            answers: vec![None; QUESTIONS.len()],
            finished: false,
        }
    }

    pub fn current_question(&self) -> &'static QuizQuestion {
        &QUESTIONS[self.current]
    }

    /// Zero-based index of the question on screen.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Answers the current question and moves on (or finishes).
    pub fn answer(&mut self, option: usize) -> Result<(), QuizError> {
        if self.finished {
            return Err(QuizError::AlreadyFinished);
        }
        if option >= QUESTIONS[self.current].options.len() {
            return Err(QuizError::InvalidOption {
                question: self.current,
                option,
            });
        }
        self.answers[self.current] = Some(option);
        if self.current + 1 < QUESTIONS.len() {
            self.current += 1;
        } else {
            self.finished = true;
        }
        Ok(())
    }

    /// Goes back one question, keeping the recorded answer.
    pub fn previous(&mut self) {
        self.finished = false;
        self.current = self.current.saturating_sub(1);
    }

    pub fn selected(&self, question: usize) -> Option<usize> {
        self.answers.get(question).copied().flatten()
    }

    /// Shown progress, `(current + 1) / 7` as a rounded percent.
    pub fn progress_percent(&self) -> u32 {
        let total = QUESTIONS.len() as u32;
        let position = self.current as u32 + 1;
        (position * 200 + total) / (2 * total)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Ranking, available once every question has been answered.
    pub fn results(&self) -> Option<Vec<StatusScore>> {
        self.finished.then(|| rank_statuses(&self.answers))
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
