use std::path::Path;

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
    Polygon, Rgb,
};

use crate::models::RiskTier;

use super::{format_percentage, patient_rows, Report};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const HEADER_H: f32 = 58.0;

type Rgb3 = (f32, f32, f32);

const ACCENT_BLU: Rgb3 = (0.20, 0.46, 0.95);
const ACCENT_PUR: Rgb3 = (0.52, 0.30, 0.95);
const PANEL: Rgb3 = (1.00, 1.00, 1.00);
const PANEL_ALT: Rgb3 = (0.95, 0.96, 0.99);
const PANEL_BORDER: Rgb3 = (0.85, 0.87, 0.92);
const TEXT_PRI: Rgb3 = (0.07, 0.08, 0.14);
const TEXT_SEC: Rgb3 = (0.36, 0.40, 0.52);
const TEXT_MUT: Rgb3 = (0.58, 0.63, 0.72);
const WHITE: Rgb3 = (1.00, 1.00, 1.00);
const WHITE_DIM: Rgb3 = (0.82, 0.89, 1.00);

const R_PANEL: f32 = 2.5;
const ROW_H: f32 = 5.5;
const FACTOR_ROW_H: f32 = 5.5;
const FACTOR_COLUMNS: usize = 2;
const FOOTER_RULE_Y: f32 = 22.0;
const FOOTER_TEXT_Y: f32 = 15.0;

/// Background and foreground colors for a tier badge.
fn tier_palette(tier: RiskTier) -> (Rgb3, Rgb3) {
    match tier {
        RiskTier::Low => ((0.90, 0.98, 0.92), (0.07, 0.52, 0.22)),
        RiskTier::Moderate => ((1.00, 0.95, 0.87), (0.70, 0.40, 0.02)),
        RiskTier::High => ((1.00, 0.91, 0.91), (0.76, 0.09, 0.13)),
    }
}

/// Write a one-page PDF report to `output_path`.
pub fn render(report: &Report, output_path: &Path) -> Result<()> {
    let (doc, page, layer) =
        PdfDocument::new("Reoperation Risk Report", Mm(PAGE_W), Mm(PAGE_H), "Report");
    let layer = doc.get_page(page).get_layer(layer);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let fonts = Fonts {
        regular: &font_r,
        bold: &font_b,
    };

    draw_body(&layer, &fonts, report);
    draw_footer(&layer, &fonts, report);

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    println!("PDF report written to: {}", output_path.display());
    Ok(())
}

struct Fonts<'a> {
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
}

/// Draw everything above the footer and return the lowest baseline used.
fn draw_body(layer: &PdfLayerReference, fonts: &Fonts, report: &Report) -> f32 {
    let y = draw_header(layer, fonts);
    let y = draw_stat_cards(layer, fonts, report, y);
    let y = draw_advisory(layer, fonts, report, y);
    let y = draw_patient_table(layer, fonts, report, y);
    draw_factor_list(layer, fonts, report, y)
}

// ── Sections ──────────────────────────────────────────────────────────────────
// Each section takes the y coordinate of its top edge and returns the next one.

fn draw_header(layer: &PdfLayerReference, fonts: &Fonts) -> f32 {
    let bottom = PAGE_H - HEADER_H;
    gradient_band(layer, bottom, HEADER_H, ACCENT_BLU, ACCENT_PUR, 28);

    text(layer, fonts.regular, WHITE_DIM, 7.5, PAGE_W - MARGIN - 30.0, PAGE_H - 10.5,
         &format!("reop-risk v{}", env!("CARGO_PKG_VERSION")));
    text(layer, fonts.bold, WHITE, 24.0, MARGIN, PAGE_H - 26.0, "Reoperation Risk");
    text(layer, fonts.regular, WHITE_DIM, 11.0, MARGIN, PAGE_H - 38.0,
         "Within one year after lumbar spinal fusion");

    bottom - 10.0
}

fn draw_stat_cards(layer: &PdfLayerReference, fonts: &Fonts, report: &Report, top: f32) -> f32 {
    let est = report.estimate;
    let (_, tier_fg) = tier_palette(est.tier);

    let card_h = 26.0f32;
    let gap = 4.0f32;
    let card_w = (PAGE_W - 2.0 * MARGIN - gap * 3.0) / 4.0;
    let y = top - card_h;

    let cards: [(&str, String, Rgb3); 4] = [
        ("CALIBRATED RISK", format_percentage(est.percentage), tier_fg),
        ("TIER", est.tier.to_string().to_uppercase(), tier_fg),
        ("RISK FACTORS", format!("{}/10", est.risk_factor_count()), ACCENT_BLU),
        ("RAW MODEL RISK", format_percentage(est.raw_percentage), ACCENT_PUR),
    ];

    for (i, (label, value, accent)) in cards.iter().enumerate() {
        let x = MARGIN + (card_w + gap) * i as f32;
        rounded_rect(layer, x, y, card_w, card_h, R_PANEL, PANEL, PaintMode::Fill);
        rounded_rect(layer, x, y, card_w, card_h, R_PANEL, PANEL_BORDER, PaintMode::Stroke);
        rect(layer, x, y + card_h - 2.0, card_w, 2.0, *accent);
        text(layer, fonts.bold, *accent, 16.0, x + 4.0, y + card_h * 0.40, value);
        text(layer, fonts.regular, TEXT_MUT, 6.0, x + 4.0, y + 3.5, label);
    }

    y - 8.0
}

fn draw_advisory(layer: &PdfLayerReference, fonts: &Fonts, report: &Report, top: f32) -> f32 {
    let (bg, fg) = tier_palette(report.estimate.tier);
    let lines = wrap_text(report.advisory, 80);
    let h = 9.0 + lines.len() as f32 * 5.0;
    let y = top - h;

    rounded_rect(layer, MARGIN, y, PAGE_W - 2.0 * MARGIN, h, R_PANEL, bg, PaintMode::Fill);
    rect(layer, MARGIN, y, 2.5, h, fg);
    text(layer, fonts.bold, fg, 6.5, MARGIN + 6.0, top - 5.0, "ADVISORY");
    for (i, line) in lines.iter().enumerate() {
        text(layer, fonts.bold, TEXT_PRI, 10.0, MARGIN + 6.0, top - 11.0 - i as f32 * 5.0, line);
    }

    y - 10.0
}

fn draw_patient_table(layer: &PdfLayerReference, fonts: &Fonts, report: &Report, top: f32) -> f32 {
    section_title(layer, fonts, top, "PATIENT");

    let rows = patient_rows(report.case);
    let mut y = top - 8.0;
    for (i, (label, value)) in rows.iter().enumerate() {
        y -= ROW_H;
        if i % 2 == 1 {
            rect(layer, MARGIN, y, PAGE_W - 2.0 * MARGIN, ROW_H, PANEL_ALT);
        }
        text(layer, fonts.regular, TEXT_SEC, 8.5, MARGIN + 3.0, y + 2.0, label);
        text(layer, fonts.bold, TEXT_PRI, 8.5, MARGIN + 70.0, y + 2.0, value);
    }

    y - 8.0
}

/// Factors fill two columns row by row; returns the baseline of the closing
/// calibration line.
fn draw_factor_list(layer: &PdfLayerReference, fonts: &Fonts, report: &Report, top: f32) -> f32 {
    let est = report.estimate;
    section_title(layer, fonts, top, "RISK FACTORS PRESENT");

    let first = top - 14.0;
    let column_w = (PAGE_W - 2.0 * MARGIN) / FACTOR_COLUMNS as f32;
    if est.risk_factors.is_empty() {
        text(layer, fonts.regular, TEXT_SEC, 8.5, MARGIN + 3.0, first, "None");
    }
    for (i, factor) in est.risk_factors.iter().enumerate() {
        let x = MARGIN + column_w * (i % FACTOR_COLUMNS) as f32;
        let y = first - FACTOR_ROW_H * (i / FACTOR_COLUMNS) as f32;
        rounded_rect(layer, x + 1.0, y + 0.8, 2.0, 2.0, 1.0, ACCENT_BLU, PaintMode::Fill);
        text(layer, fonts.regular, TEXT_PRI, 8.5, x + 5.0, y, &factor.to_string());
    }

    let rows = est.risk_factors.len().div_ceil(FACTOR_COLUMNS).max(1);
    let y = first - FACTOR_ROW_H * rows as f32 - 3.0;
    text(layer, fonts.regular, TEXT_MUT, 7.5, MARGIN, y, &format!(
        "Raw model risk {} x calibration factor {} = {} (capped at 50%)",
        format_percentage(est.raw_percentage),
        est.calibration_factor,
        format_percentage(est.percentage),
    ));
    y
}

fn draw_footer(layer: &PdfLayerReference, fonts: &Fonts, report: &Report) {
    hline(layer, MARGIN, PAGE_W - MARGIN, FOOTER_RULE_Y, PANEL_BORDER);
    text(layer, fonts.regular, TEXT_MUT, 7.5, MARGIN, FOOTER_TEXT_Y,
         &truncate(&format!("Model: {}", report.model), 110));
}

fn section_title(layer: &PdfLayerReference, fonts: &Fonts, top: f32, title: &str) {
    hline(layer, MARGIN, PAGE_W - MARGIN, top, PANEL_BORDER);
    text(layer, fonts.bold, TEXT_MUT, 6.5, MARGIN, top - 6.0, title);
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn rgb((r, g, b): Rgb3) -> Color {
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

#[allow(clippy::too_many_arguments)]
fn text(layer: &PdfLayerReference, font: &IndirectFontRef, color: Rgb3, size: f32,
        x: f32, y: f32, content: &str) {
    layer.set_fill_color(rgb(color));
    layer.use_text(content, size, Mm(x), Mm(y), font);
}

fn polygon(layer: &PdfLayerReference, ring: Vec<(Point, bool)>, color: Rgb3, mode: PaintMode) {
    match mode {
        PaintMode::Stroke => {
            layer.set_outline_color(rgb(color));
            layer.set_outline_thickness(0.4);
        }
        _ => layer.set_fill_color(rgb(color)),
    }
    layer.add_polygon(Polygon {
        rings: vec![ring],
        mode,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_outline_thickness(1.0);
}

fn rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: Rgb3) {
    let ring = vec![
        (Point::new(Mm(x), Mm(y)), false),
        (Point::new(Mm(x + w), Mm(y)), false),
        (Point::new(Mm(x + w), Mm(y + h)), false),
        (Point::new(Mm(x), Mm(y + h)), false),
    ];
    polygon(layer, ring, color, PaintMode::Fill);
}

/// Rounded rectangle approximated with 8 segments per corner arc.
#[allow(clippy::too_many_arguments)]
fn rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, r: f32,
                color: Rgb3, mode: PaintMode) {
    const SEGS: usize = 8;
    let r = r.min(w / 2.0).min(h / 2.0);
    let corners = [
        (x + w - r, y + r, 270.0f32),
        (x + w - r, y + h - r, 0.0f32),
        (x + r, y + h - r, 90.0f32),
        (x + r, y + r, 180.0f32),
    ];

    let ring = corners
        .iter()
        .flat_map(|&(cx, cy, start)| {
            (0..=SEGS).map(move |i| {
                let angle = (start + 90.0 * i as f32 / SEGS as f32).to_radians();
                (Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())), false)
            })
        })
        .collect();
    polygon(layer, ring, color, mode);
}

fn hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, color: Rgb3) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_thickness(1.0);
}

/// Full-width left-to-right gradient built from vertical strips.
fn gradient_band(layer: &PdfLayerReference, y: f32, h: f32, from: Rgb3, to: Rgb3, steps: usize) {
    let step_w = PAGE_W / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        // strips overlap to hide rounding seams
        rect(layer, i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
