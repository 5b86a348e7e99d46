//! `reop-risk` — estimate the risk of reoperation within one year after lumbar
//! spinal fusion.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]).
//! 3. Collect the patient from flags or a case file and hold it to the intake
//!    form's ranges ([`intake`]).
//! 4. Load the classifier artifact once ([`classifier::artifact::load_model`]).
//! 5. Estimate and calibrate the risk ([`estimator::estimate`]).
//! 6. Render the requested report ([`report`]).
//! 7. Exit `0`, or `1` when `--fail-on` is given and the tier reaches it.
//!
//! Uses structured logging via [`tracing`]; set `RUST_LOG` (e.g.
//! `RUST_LOG=reop_risk=debug`) to see intermediate values on stderr.

mod classifier;
mod cli;
mod config;
mod error;
mod estimator;
mod intake;
mod models;
mod report;

use anyhow::Result;
use clap::Parser;

use classifier::artifact::load_model;
use cli::{Cli, ReportFormat};
use config::load_config;
use error::EstimateError;
use models::{Assessment, PatientCase};
use report::Report;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let case = match &cli.case {
        Some(path) => intake::load_case(path)?,
        None => PatientCase::from(&cli.patient),
    };
    intake::enforce_form_bounds(&case)?;

    let model_path = cli
        .model
        .clone()
        .or_else(|| config.model.path.clone())
        .ok_or_else(|| {
            EstimateError::ClassifierUnavailable(
                "no model artifact given (use --model or set [model] path in the config)"
                    .to_string(),
            )
        })?;
    let model = load_model(&model_path)?;

    let estimate = estimator::estimate(model.classifier.as_ref(), &case)?;
    let advisory = config.advisory.message_for(estimate.tier);

    // --pdf implies PDF format
    let report_format = match &cli.pdf {
        Some(_) => ReportFormat::Pdf,
        None => cli.report.clone(),
    };
    let pdf_path = cli
        .pdf
        .clone()
        .unwrap_or_else(|| std::path::PathBuf::from("reop-risk-report.pdf"));

    let model_label = match &model.description {
        Some(desc) => format!("{} ({})", model.classifier.kind(), desc),
        None => model.classifier.kind().to_string(),
    };
    let report = Report {
        case: &case,
        estimate: &estimate,
        advisory,
        model: model_label,
    };

    match report_format {
        ReportFormat::Terminal => report::terminal::render(&report, cli.verbose, cli.quiet)?,
        ReportFormat::Json => {
            let assessment = Assessment {
                patient: &case,
                estimate: &estimate,
                advisory,
            };
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
        ReportFormat::Pdf => report::pdf::render(&report, &pdf_path)?,
    }

    if cli.fails_on(estimate.tier) {
        std::process::exit(1);
    }

    Ok(())
}
