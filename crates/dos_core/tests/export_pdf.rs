use chrono::NaiveDate;
use dos_core::export::layout::{
    layout_project_report, DrawOp, BOTTOM_MARGIN_MM, DEFAULT_PROJECT_NAME, FOOTER_LABEL,
    FOOTER_Y_MM, MISSING_VALUE, REPORT_TITLE,
};
use dos_core::export::render_pdf;
use dos_core::{export_project_pdf, ExportError, ProjectAnswers};

#[test]
fn short_report_fits_one_page_with_defaults() {
    let layout = layout_project_report(&ProjectAnswers::default(), report_date());

    assert_eq!(layout.page_count(), 1);
    assert_eq!(layout.title, format!("{REPORT_TITLE} - {DEFAULT_PROJECT_NAME}"));
    assert!(layout.contains_text(REPORT_TITLE));
    assert!(layout.contains_text(DEFAULT_PROJECT_NAME));
    assert!(layout.contains_text("Généré le 02/05/2024"));
    assert!(layout.contains_text(MISSING_VALUE));
    assert!(layout.contains_text(&format!("{FOOTER_LABEL} | Page 1/1")));
    // Empty optional sections are skipped.
    assert!(!layout.contains_text("Éléments innovants :"));
    assert!(!layout.contains_text("Équipe :"));
}

#[test]
fn long_answers_paginate_and_number_every_page() {
    let mut answers = complete_answers();
    answers.project_idea.description = "Atelier de réparation participatif. ".repeat(60);
    answers.target_market.competition = "Enseignes spécialisées et plateformes. ".repeat(40);
    answers.resources.material_needs = "Établis, outillage, pièces détachées. ".repeat(30);

    let layout = layout_project_report(&answers, report_date());
    let total = layout.page_count();
    assert!(total >= 2, "expected pagination, got {total} page(s)");

    for (index, page) in layout.pages.iter().enumerate() {
        let footers: Vec<_> = page
            .texts()
            .filter(|op| op.text.starts_with(FOOTER_LABEL))
            .collect();
        assert_eq!(footers.len(), 1);
        assert_eq!(
            footers[0].text,
            format!("{FOOTER_LABEL} | Page {}/{}", index + 1, total)
        );
        assert_eq!(footers[0].y_mm, FOOTER_Y_MM);

        for op in page.texts().filter(|op| !op.text.starts_with(FOOTER_LABEL)) {
            assert!(op.y_mm <= BOTTOM_MARGIN_MM, "text in the footer: {}", op.y_mm);
        }
    }
    assert!(layout.pages[0]
        .ops
        .iter()
        .any(|op| matches!(op, DrawOp::Rule { .. })));
}

#[test]
fn labels_and_budget_never_reach_the_footer() {
    for repeat in 1..=90 {
        let mut answers = complete_answers();
        answers.target_market.competition = "Enseignes et plateformes. ".repeat(repeat);
        answers.resources.team = "Mécaniciens et vendeurs. ".repeat(repeat);
        answers.resources.material_needs = "Établis".to_string();

        let layout = layout_project_report(&answers, report_date());
        for page in &layout.pages {
            for op in page.texts().filter(|op| !op.text.starts_with(FOOTER_LABEL)) {
                assert!(
                    op.y_mm <= BOTTOM_MARGIN_MM,
                    "`{}` at {} mm with repeat {repeat}",
                    op.text,
                    op.y_mm
                );
            }
        }
    }
}

#[test]
fn rendered_report_is_a_pdf_document() {
    let layout = layout_project_report(&complete_answers(), report_date());
    let bytes = render_pdf(&layout).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn export_rejects_incomplete_answers() {
    let mut answers = complete_answers();
    answers.target_market.target_clients = "   ".to_string();
    assert_eq!(
        export_project_pdf(&answers, report_date()).unwrap_err(),
        ExportError::Incomplete
    );

    let document = export_project_pdf(&complete_answers(), report_date()).unwrap();
    assert_eq!(document.file_name, "DOS_Projet_Atelier_Vélo_2024-05-02.pdf");
    assert!(!document.bytes.is_empty());
}

fn report_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
}

fn complete_answers() -> ProjectAnswers {
    let mut answers = ProjectAnswers::default();
    answers.personal_info.first_name = "Jeanne".to_string();
    answers.personal_info.last_name = "Martin".to_string();
    answers.personal_info.email = "jeanne.martin@example.fr".to_string();
    answers.personal_info.phone = "0612345678".to_string();
    answers.project_idea.name = "Atelier Vélo".to_string();
    answers.project_idea.sector = "Commerce".to_string();
    answers.project_idea.description = "Réparation de vélos reconditionnés".to_string();
    answers.target_market.target_clients = "Cyclistes urbains".to_string();
    answers.target_market.competition = "Enseignes nationales".to_string();
    answers.target_market.positioning = "Service rapide".to_string();
    answers.resources.team = "Deux mécaniciens".to_string();
    answers.resources.initial_budget = "15000".to_string();
    answers
}
