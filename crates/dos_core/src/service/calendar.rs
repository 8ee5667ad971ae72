//! Session-scoped calendar of appointments and deadlines.
//!
//! # Invariants
//! - The displayed month is always anchored on its first day.
//! - Events are kept in insertion order; month views sort by date then time.
//! - Nothing is persisted.

use crate::model::calendar::{CalendarEvent, CalendarEventId, EventDraft};
use chrono::{Datelike, Months, NaiveDate, NaiveTime};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const MONTH_NAMES: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

/// Grid column headers, Monday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarError {
    /// A required draft field is absent or blank.
    MissingField(&'static str),
    /// Month navigation left chrono's supported range.
    OutOfRange,
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::OutOfRange => write!(f, "date out of supported range"),
        }
    }
}

impl Error for CalendarError {}

#[derive(Debug, Clone)]
pub struct Calendar {
    month: NaiveDate,
    events: Vec<CalendarEvent>,
    selected: Option<NaiveDate>,
}

impl Calendar {
    /// Empty calendar showing the month that contains `day`.
    pub fn new(day: NaiveDate) -> Self {
        Self {
            month: first_of_month(day),
            events: Vec::new(),
            selected: None,
        }
    }

    /// Adds an event from a form draft.
    ///
    /// # Errors
    /// `MissingField` for the first of title, date, time, category that is
    /// absent (a blank title counts as absent).
    pub fn add(&mut self, draft: EventDraft) -> Result<CalendarEventId, CalendarError> {
        let title = draft
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or(CalendarError::MissingField("title"))?;
        let date = draft.date.ok_or(CalendarError::MissingField("date"))?;
        let time = draft.time.ok_or(CalendarError::MissingField("time"))?;
        let category = draft
            .category
            .ok_or(CalendarError::MissingField("category"))?;

        let event = CalendarEvent {
            id: Uuid::new_v4(),
            title,
            date,
            time,
            category,
            description: draft.description.filter(|value| !value.trim().is_empty()),
            location: draft.location.filter(|value| !value.trim().is_empty()),
        };
        let id = event.id;
        debug!(
            "event=calendar_add module=service status=ok category={}",
            category.as_str()
        );
        self.events.push(event);
        Ok(id)
    }

    /// Removes an event; returns whether it existed.
    pub fn delete(&mut self, id: CalendarEventId) -> bool {
        let before = self.events.len();
        self.events.retain(|event| event.id != id);
        self.events.len() != before
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|event| event.date == date).collect()
    }

    /// Events of the displayed month, by date then time.
    pub fn month_events(&self) -> Vec<&CalendarEvent> {
        let mut events: Vec<&CalendarEvent> = self
            .events
            .iter()
            .filter(|event| {
                event.date.year() == self.month.year() && event.date.month() == self.month.month()
            })
            .collect();
        events.sort_by_key(|event| (event.date, event.time));
        events
    }

    /// Day cells of the displayed month: leading `None`s up to the first
    /// weekday (Monday-first), then `Some(1..=days_in_month)`.
    pub fn month_grid(&self) -> Vec<Option<u32>> {
        let leading = self.month.weekday().num_days_from_monday() as usize;
        let mut cells = vec![None; leading];
        cells.extend((1..=days_in_month(self.month)).map(Some));
        cells
    }

    pub fn month(&self) -> NaiveDate {
        self.month
    }

    /// "Janvier 2024" style heading.
    pub fn month_label(&self) -> String {
        format!(
            "{} {}",
            MONTH_NAMES[self.month.month0() as usize],
            self.month.year()
        )
    }

    pub fn previous_month(&mut self) -> Result<NaiveDate, CalendarError> {
        self.month = self
            .month
            .checked_sub_months(Months::new(1))
            .ok_or(CalendarError::OutOfRange)?;
        Ok(self.month)
    }

    pub fn next_month(&mut self) -> Result<NaiveDate, CalendarError> {
        self.month = self
            .month
            .checked_add_months(Months::new(1))
            .ok_or(CalendarError::OutOfRange)?;
        Ok(self.month)
    }

    pub fn select(&mut self, date: Option<NaiveDate>) {
        self.selected = date;
    }

    pub fn selected_events(&self) -> Vec<&CalendarEvent> {
        match self.selected {
            Some(date) => self.events_on(date),
            None => Vec::new(),
        }
    }
}

/// Parses the `HH:MM` value of a time input.
pub fn parse_time_input(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

fn days_in_month(first: NaiveDate) -> u32 {
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        None => 31,
    }
}
