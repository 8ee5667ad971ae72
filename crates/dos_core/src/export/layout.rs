//! Page layout of the project report.
//!
//! # Responsibility
//! - Turn the wizard answers into positioned drawing operations, page by page.
//! - Stay free of any PDF dependency so pagination can be tested directly.
//!
//! # Invariants
//! - Coordinates are millimetres from the top-left corner of an A4 page.
//! - Every page ends with exactly one footer line carrying `Page i/n`.

use crate::model::project::ProjectAnswers;
use chrono::NaiveDate;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;
pub const TOP_MM: f32 = 20.0;
pub const LINE_HEIGHT_MM: f32 = 7.0;
/// Cursor position past which sections 3 and 4 start on a new page.
pub const SECTION_BREAK_MM: f32 = 240.0;
/// Lowest baseline any body line may use.
pub const BOTTOM_MARGIN_MM: f32 = 277.0;
pub const FOOTER_Y_MM: f32 = PAGE_HEIGHT_MM - 10.0;

pub const REPORT_TITLE: &str = "DOS - Dossier de Projet";
pub const DEFAULT_PROJECT_NAME: &str = "Mon Projet";
pub const MISSING_VALUE: &str = "Non renseigné";
pub const FOOTER_LABEL: &str = "DOS - Accompagnement Entrepreneurial";

const PT_TO_MM: f32 = 0.352_778;
/// Mean Helvetica glyph advance, in em.
const MEAN_GLYPH_EM: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

pub const PRIMARY: Rgb8 = Rgb8(30, 64, 175);
pub const BODY: Rgb8 = Rgb8(60, 60, 60);
pub const MUTED: Rgb8 = Rgb8(120, 120, 120);
pub const ACCENT: Rgb8 = Rgb8(200, 180, 120);
pub const FOOTER: Rgb8 = Rgb8(150, 150, 150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    /// `x_mm` is the centre of the line.
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub text: String,
    pub x_mm: f32,
    /// Baseline.
    pub y_mm: f32,
    pub size_pt: f32,
    pub bold: bool,
    pub color: Rgb8,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextOp),
    Rule {
        x1_mm: f32,
        x2_mm: f32,
        y_mm: f32,
        thickness_mm: f32,
        color: Rgb8,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
}

impl PageLayout {
    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(text) => Some(text),
            DrawOp::Rule { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub title: String,
    pub pages: Vec<PageLayout>,
}

impl ReportLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Whether any page carries a text op equal to `text`.
    pub fn contains_text(&self, text: &str) -> bool {
        self.pages
            .iter()
            .any(|page| page.texts().any(|op| op.text == text))
    }
}

#[derive(Debug, Clone, Copy)]
struct Style {
    size_pt: f32,
    bold: bool,
    color: Rgb8,
}

const HEADING: Style = Style {
    size_pt: 14.0,
    bold: true,
    color: PRIMARY,
};
const LABEL: Style = Style {
    size_pt: 11.0,
    bold: true,
    color: BODY,
};
const TEXT: Style = Style {
    size_pt: 11.0,
    bold: false,
    color: BODY,
};

struct Cursor {
    pages: Vec<PageLayout>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![PageLayout::default()],
            y: TOP_MM,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.y = TOP_MM;
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, text: impl Into<String>, style: Style, align: Align) {
        let x_mm = match align {
            Align::Left => MARGIN_MM,
            Align::Center => PAGE_WIDTH_MM / 2.0,
        };
        let y_mm = self.y;
        self.push(DrawOp::Text(TextOp {
            text: text.into(),
            x_mm,
            y_mm,
            size_pt: style.size_pt,
            bold: style.bold,
            color: style.color,
            align,
        }));
    }

    fn line(&mut self, text: impl Into<String>, style: Style, advance: f32) {
        self.text(text, style, Align::Left);
        self.y += advance;
    }

    /// Wrapped body text; moves to a new page before any line that would
    /// sit below the bottom margin.
    fn paragraph(&mut self, text: &str) {
        let columns = wrap_columns(TEXT.size_pt, PAGE_WIDTH_MM - 2.0 * MARGIN_MM);
        for line in wrap_text(text, columns) {
            self.ensure_room();
            self.text(line, TEXT, Align::Left);
            self.y += LINE_HEIGHT_MM;
        }
    }

    fn labelled_paragraph(&mut self, label: &str, text: &str) {
        self.ensure_room();
        self.line(label, LABEL, LINE_HEIGHT_MM);
        self.paragraph(text);
    }

    /// Starts a new page when the cursor is below the bottom margin.
    fn ensure_room(&mut self) {
        if self.y > BOTTOM_MARGIN_MM {
            self.new_page();
        }
    }

    fn break_if_low(&mut self) {
        if self.y > SECTION_BREAK_MM {
            self.new_page();
        }
    }
}

/// Lays out the project report generated on `generated_on`.
pub fn layout_project_report(answers: &ProjectAnswers, generated_on: NaiveDate) -> ReportLayout {
    let personal = &answers.personal_info;
    let idea = &answers.project_idea;
    let market = &answers.target_market;
    let resources = &answers.resources;
    let mut cursor = Cursor::new();

    cursor.text(
        REPORT_TITLE,
        Style {
            size_pt: 24.0,
            bold: true,
            color: PRIMARY,
        },
        Align::Center,
    );
    cursor.y += 15.0;
    cursor.text(
        or_default(&idea.name, DEFAULT_PROJECT_NAME),
        Style {
            size_pt: 18.0,
            bold: true,
            color: BODY,
        },
        Align::Center,
    );
    cursor.y += 10.0;
    cursor.text(
        format!("Généré le {}", generated_on.format("%d/%m/%Y")),
        Style {
            size_pt: 10.0,
            bold: false,
            color: MUTED,
        },
        Align::Center,
    );
    cursor.y += 20.0;
    let rule_y = cursor.y;
    cursor.push(DrawOp::Rule {
        x1_mm: MARGIN_MM,
        x2_mm: PAGE_WIDTH_MM - MARGIN_MM,
        y_mm: rule_y,
        thickness_mm: 0.5,
        color: ACCENT,
    });
    cursor.y += 15.0;

    cursor.line("1. Informations Personnelles", HEADING, 10.0);
    cursor.line(
        format!("Nom : {} {}", personal.first_name, personal.last_name),
        TEXT,
        LINE_HEIGHT_MM,
    );
    cursor.line(format!("Email : {}", personal.email), TEXT, LINE_HEIGHT_MM);
    cursor.line(format!("Téléphone : {}", personal.phone), TEXT, 15.0);

    cursor.line("2. Idée de Projet", HEADING, 10.0);
    cursor.line(format!("Secteur d'activité : {}", idea.sector), TEXT, 10.0);
    cursor.labelled_paragraph("Description :", or_default(&idea.description, MISSING_VALUE));
    cursor.y += 5.0;
    if !idea.innovation.is_empty() {
        cursor.labelled_paragraph("Éléments innovants :", &idea.innovation);
    }
    cursor.y += 10.0;

    cursor.break_if_low();
    cursor.line("3. Marché Cible", HEADING, 10.0);
    cursor.labelled_paragraph(
        "Clients cibles :",
        or_default(&market.target_clients, MISSING_VALUE),
    );
    cursor.y += 5.0;
    cursor.labelled_paragraph(
        "Analyse de la concurrence :",
        or_default(&market.competition, MISSING_VALUE),
    );
    cursor.y += 5.0;
    cursor.labelled_paragraph(
        "Positionnement :",
        or_default(&market.positioning, MISSING_VALUE),
    );
    cursor.y += 10.0;

    cursor.break_if_low();
    cursor.line("4. Ressources Nécessaires", HEADING, 10.0);
    if !resources.team.is_empty() {
        cursor.labelled_paragraph("Équipe :", &resources.team);
        cursor.y += 5.0;
    }
    if !resources.initial_budget.is_empty() {
        cursor.ensure_room();
        cursor.line(
            format!("Budget initial estimé : {}", resources.initial_budget),
            TEXT,
            LINE_HEIGHT_MM,
        );
    }
    if !resources.material_needs.is_empty() {
        cursor.labelled_paragraph("Besoins matériels :", &resources.material_needs);
    }

    let mut pages = cursor.pages;
    let total = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        page.ops.push(DrawOp::Text(TextOp {
            text: format!("{FOOTER_LABEL} | Page {}/{}", index + 1, total),
            x_mm: PAGE_WIDTH_MM / 2.0,
            y_mm: FOOTER_Y_MM,
            size_pt: 9.0,
            bold: false,
            color: FOOTER,
            align: Align::Center,
        }));
    }

    ReportLayout {
        title: format!("{REPORT_TITLE} - {}", or_default(&idea.name, DEFAULT_PROJECT_NAME)),
        pages,
    }
}

/// Approximate rendered width of `text` in the builtin Helvetica.
pub fn estimate_text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * MEAN_GLYPH_EM * PT_TO_MM
}

fn wrap_columns(size_pt: f32, width_mm: f32) -> usize {
    let glyph_mm = size_pt * MEAN_GLYPH_EM * PT_TO_MM;
    ((width_mm / glyph_mm).floor() as usize).max(1)
}

/// Greedy word wrap on `columns` characters; explicit newlines are kept and
/// words longer than a line are split.
pub fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        let mut line = String::new();
        let mut line_len = 0;
        for word in raw_line.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > columns {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = word.split_off(columns);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            if word.is_empty() {
                continue;
            }
            if line_len > 0 && line_len + 1 + word.len() > columns {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line_len += word.len();
            line.extend(word);
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::{wrap_columns, wrap_text, PAGE_WIDTH_MM};

    #[test]
    fn wrap_respects_columns_and_newlines() {
        let lines = wrap_text("un deux trois\nquatre", 8);
        assert_eq!(lines, vec!["un deux", "trois", "quatre"]);
    }

    #[test]
    fn wrap_splits_overlong_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn body_text_fits_about_eighty_seven_columns() {
        assert_eq!(wrap_columns(11.0, PAGE_WIDTH_MM - 40.0), 87);
    }
}
