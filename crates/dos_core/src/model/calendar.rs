//! Calendar event records (session-scoped, never persisted).

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

pub type CalendarEventId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Appointment.
    Rdv,
    /// Deadline.
    Echeance,
    Formation,
    Admin,
}

impl EventCategory {
    pub const ALL: [EventCategory; 4] = [Self::Rdv, Self::Echeance, Self::Formation, Self::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rdv => "rdv",
            Self::Echeance => "echeance",
            Self::Formation => "formation",
            Self::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Rdv => "Rendez-vous",
            Self::Echeance => "Échéance",
            Self::Formation => "Formation",
            Self::Admin => "Administratif",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: CalendarEventId,
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub category: EventCategory,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// Form state for a new event; required fields are checked on add.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub category: Option<EventCategory>,
    pub description: Option<String>,
    pub location: Option<String>,
}
