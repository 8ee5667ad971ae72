//! Project report export.
//!
//! # Responsibility
//! - Lay out the wizard answers as a paginated report (`layout`).
//! - Render that layout to PDF bytes (`pdf`).
//! - Name the downloaded file.
//!
//! Writing the bytes somewhere is left to the caller.

pub mod layout;
pub mod pdf;

use crate::model::project::ProjectAnswers;
use chrono::NaiveDate;
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use layout::{layout_project_report, ReportLayout};
pub use pdf::render_pdf;

static WHITESPACE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// First name, project name or target clients is still blank.
    Incomplete,
    /// The PDF backend failed.
    Render(String),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incomplete => write!(f, "project answers are incomplete"),
            Self::Render(message) => write!(f, "pdf rendering failed: {message}"),
        }
    }
}

impl Error for ExportError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// `DOS_Projet_<name>_<yyyy-mm-dd>.pdf`, whitespace runs in the name
/// replaced by `_`.
pub fn export_file_name(answers: &ProjectAnswers, date: NaiveDate) -> String {
    let collapsed = WHITESPACE_RUN_RE.replace_all(&answers.project_idea.name, "_");
    let name: &str = if collapsed.is_empty() {
        "MonProjet"
    } else {
        &collapsed
    };
    format!("DOS_Projet_{}_{}.pdf", name, date.format("%Y-%m-%d"))
}

/// Builds the report PDF for `answers`, dated `generated_on`.
///
/// # Errors
/// - `Incomplete` when the answers are not exportable yet.
/// - `Render` when printpdf fails.
pub fn export_project_pdf(
    answers: &ProjectAnswers,
    generated_on: NaiveDate,
) -> ExportResult<ExportedDocument> {
    if !answers.is_exportable() {
        return Err(ExportError::Incomplete);
    }

    let layout = layout_project_report(answers, generated_on);
    let bytes = render_pdf(&layout).map_err(|err| {
        error!("event=pdf_export module=export status=error error={err}");
        err
    })?;
    info!(
        "event=pdf_export module=export status=ok pages={} bytes={}",
        layout.page_count(),
        bytes.len()
    );
    Ok(ExportedDocument {
        file_name: export_file_name(answers, generated_on),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::export_file_name;
    use crate::model::project::ProjectAnswers;
    use chrono::NaiveDate;

    #[test]
    fn file_name_collapses_whitespace_runs() {
        let mut answers = ProjectAnswers::default();
        answers.project_idea.name = "Ma  belle\tBoutique".to_string();
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            export_file_name(&answers, date),
            "DOS_Projet_Ma_belle_Boutique_2024-03-09.pdf"
        );
    }

    #[test]
    fn file_name_falls_back_when_unnamed() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            export_file_name(&ProjectAnswers::default(), date),
            "DOS_Projet_MonProjet_2024-12-31.pdf"
        );
    }
}
