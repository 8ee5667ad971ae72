//! printpdf backend for report layouts.

use crate::export::layout::{
    estimate_text_width_mm, Align, DrawOp, ReportLayout, Rgb8, TextOp, PAGE_HEIGHT_MM,
    PAGE_WIDTH_MM,
};
use crate::export::{ExportError, ExportResult};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};

/// Draws `layout` on A4 pages with the builtin Helvetica fonts.
pub fn render_pdf(layout: &ReportLayout) -> ExportResult<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        layout.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| ExportError::Render(format!("font error: {err}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| ExportError::Render(format!("font error: {err}")))?;

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };

        for op in &page.ops {
            match op {
                DrawOp::Text(text) => {
                    let font = if text.bold { &bold } else { &regular };
                    draw_text(&layer, text, font);
                }
                DrawOp::Rule {
                    x1_mm,
                    x2_mm,
                    y_mm,
                    thickness_mm,
                    color,
                } => {
                    let y = Mm(PAGE_HEIGHT_MM - y_mm);
                    layer.set_outline_color(color_of(*color));
                    layer.set_outline_thickness(mm_to_pt(*thickness_mm));
                    layer.add_line(Line {
                        points: vec![
                            (Point::new(Mm(*x1_mm), y), false),
                            (Point::new(Mm(*x2_mm), y), false),
                        ],
                        is_closed: false,
                    });
                }
            }
        }
    }

    doc.save_to_bytes()
        .map_err(|err| ExportError::Render(format!("save error: {err}")))
}

fn draw_text(layer: &PdfLayerReference, text: &TextOp, font: &IndirectFontRef) {
    let x_mm = match text.align {
        Align::Left => text.x_mm,
        Align::Center => text.x_mm - estimate_text_width_mm(&text.text, text.size_pt) / 2.0,
    };
    layer.set_fill_color(color_of(text.color));
    layer.use_text(
        text.text.as_str(),
        text.size_pt,
        Mm(x_mm.max(0.0)),
        Mm(PAGE_HEIGHT_MM - text.y_mm),
        font,
    );
}

fn color_of(color: Rgb8) -> Color {
    let Rgb8(r, g, b) = color;
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}
