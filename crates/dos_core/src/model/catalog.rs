//! Static reference records: legal statuses, financing aids, admin steps,
//! library resources and incubators.

/// Company legal form compared on the legal-status page.
#[derive(Debug, Clone, PartialEq)]
pub struct LegalStatus {
    pub id: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    pub description: &'static str,
    /// Minimum share capital in euros.
    pub min_capital: u32,
    /// `None` means no upper bound.
    pub max_associates: Option<u32>,
    /// Approximate social charges, percent of remuneration.
    pub social_charges_rate: u32,
    pub taxation_type: &'static str,
    pub liability: &'static str,
    pub advantages: &'static [&'static str],
    pub disadvantages: &'static [&'static str],
    pub best_for: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinancingKind {
    Subvention,
    Pret,
    Garantie,
    Exoneration,
}

impl FinancingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subvention => "subvention",
            Self::Pret => "pret",
            Self::Garantie => "garantie",
            Self::Exoneration => "exoneration",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "subvention" => Some(Self::Subvention),
            "pret" => Some(Self::Pret),
            "garantie" => Some(Self::Garantie),
            "exoneration" => Some(Self::Exoneration),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Subvention => "Subvention",
            Self::Pret => "Prêt",
            Self::Garantie => "Garantie",
            Self::Exoneration => "Exonération",
        }
    }
}

/// Amount range in euros; `0..0` means "not a fixed amount".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinancingAid {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: FinancingKind,
    pub provider: &'static str,
    pub amount: AmountRange,
    pub eligibility: &'static [&'static str],
    pub sectors: &'static [&'static str],
    pub region: &'static str,
    pub description: &'static str,
    pub link: &'static str,
}

/// Paris-area incubator listed next to the financing directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incubator {
    pub name: &'static str,
    pub area: &'static str,
    pub speciality: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Article,
    Template,
    Video,
    Guide,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Template => "template",
            Self::Video => "video",
            Self::Guide => "guide",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Article => "Article",
            Self::Template => "Template",
            Self::Video => "Vidéo",
            Self::Guide => "Guide",
        }
    }
}

/// Where a resource card points: a download or an external page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLink {
    Download(&'static str),
    External(&'static str),
}

/// Entry of the resource library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: ResourceKind,
    pub category: &'static str,
    pub description: &'static str,
    pub link: ResourceLink,
    pub tags: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminStepStatus {
    Todo,
    InProgress,
    Completed,
}

impl AdminStepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "À faire",
            Self::InProgress => "En cours",
            Self::Completed => "Terminé",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepLink {
    pub label: &'static str,
    pub url: &'static str,
}

/// One administrative formality in the company-creation checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminStep {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub status: AdminStepStatus,
    pub documents: &'static [&'static str],
    pub links: &'static [StepLink],
    pub estimated_duration: &'static str,
    pub order: u32,
}
