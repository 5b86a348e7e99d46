use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::estimator::calibration::MAX_RISK_PERCENT;
use crate::models::{RiskFactor, RiskTier, FEATURE_NAMES};

use super::{format_percentage, patient_rows, Report};

/// Render a colored terminal report.
pub fn render(report: &Report, verbose: bool, quiet: bool) -> Result<()> {
    let est = report.estimate;
    let risk = format_percentage(est.percentage);

    if quiet {
        println!(
            "Risk: {}  Tier: {}  Factors: {}/10",
            paint_tier(&risk, est.tier),
            paint_tier(&est.tier.to_string(), est.tier),
            est.risk_factor_count(),
        );
        return Ok(());
    }

    println!("\n {} v{}", "reop-risk".bold(), env!("CARGO_PKG_VERSION"));
    println!(" Model: {}\n", report.model);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<49} │", "REOPERATION RISK WITHIN 1 YEAR".bold());
    println!(" │  {:<49} │", format!("Calibrated risk : {:>6}", risk));
    println!(" │  {:<49} │", format!("Tier            : {:>6}", est.tier));
    println!(
        " │  {:<49} │",
        format!("Risk factors    : {:>6}", format!("{}/10", est.risk_factor_count()))
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    println!(" {}\n", paint_tier(report.advisory, est.tier).bold());

    if verbose {
        println!(" {} Patient:\n", "[INPUT]".cyan().bold());
        render_patient_table(report);
        println!();

        println!(" {} Risk factors present:\n", "[FACTORS]".cyan().bold());
        render_factor_table(&est.risk_factors);
        println!();

        println!(" {} Classifier input:\n", "[FEATURES]".cyan().bold());
        render_feature_table(report);
        println!();

        println!(" {} Calibration:\n", "[CALIBRATION]".cyan().bold());
        render_calibration_table(report);
        println!();
    }

    Ok(())
}

fn paint_tier(text: &str, tier: RiskTier) -> ColoredString {
    match tier {
        RiskTier::Low => text.green(),
        RiskTier::Moderate => text.yellow(),
        RiskTier::High => text.red(),
    }
}

fn tier_cell_color(tier: RiskTier) -> Color {
    match tier {
        RiskTier::Low => Color::Green,
        RiskTier::Moderate => Color::Yellow,
        RiskTier::High => Color::Red,
    }
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn render_patient_table(report: &Report) {
    let mut table = new_table(&["Attribute", "Value"]);
    for (label, value) in patient_rows(report.case) {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    println!("{}", table);
}

fn render_factor_table(factors: &[RiskFactor]) {
    if factors.is_empty() {
        println!("   none");
        return;
    }
    let mut table = new_table(&["#", "Risk factor"]);
    for (i, factor) in factors.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(factor.to_string()),
        ]);
    }
    println!("{}", table);
}

fn render_feature_table(report: &Report) {
    let mut table = new_table(&["Column", "Value"]);
    let row = report.estimate.features.as_row();
    for (name, value) in FEATURE_NAMES.iter().zip(row.iter()) {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{:.4}", value)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}", table);
}

fn render_calibration_table(report: &Report) {
    let est = report.estimate;
    let capped = est.raw_percentage * est.calibration_factor > MAX_RISK_PERCENT;

    let mut table = new_table(&["Step", "Value"]);
    table.add_row(vec![
        Cell::new("Positive-class probability"),
        Cell::new(format!("{:.4}", est.positive_probability)),
    ]);
    table.add_row(vec![
        Cell::new("Raw risk"),
        Cell::new(format_percentage(est.raw_percentage)),
    ]);
    table.add_row(vec![
        Cell::new(format!("Factor ({} risk factors)", est.risk_factor_count())),
        Cell::new(format!("x {}", est.calibration_factor)),
    ]);
    table.add_row(vec![
        Cell::new(if capped {
            "Calibrated risk (capped)"
        } else {
            "Calibrated risk"
        }),
        Cell::new(format_percentage(est.percentage)).fg(tier_cell_color(est.tier)),
    ]);
    println!("{}", table);
}
