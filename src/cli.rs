use std::path::PathBuf;

use clap::{Args, Parser};

use crate::models::{PatientCase, RiskTier};

#[derive(Parser, Debug)]
#[command(
    name = "reop-risk",
    about = "Estimate the risk of reoperation within one year after lumbar spinal fusion",
    version
)]
pub struct Cli {
    /// Read the patient from a .toml or .json case file instead of flags
    #[arg(long, value_name = "FILE", conflicts_with = "patient")]
    pub case: Option<PathBuf>,

    /// Model artifact (JSON) [default: `[model] path` from the config]
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// Config file [default: ./.reop-risk/config.toml, fallback ~/.config/reop-risk/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// PDF output path; use without value to default to reop-risk-report.pdf
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "reop-risk-report.pdf")]
    pub pdf: Option<PathBuf>,

    /// Exit with status 1 when the tier is at or above this level
    #[arg(long, value_name = "TIER")]
    pub fail_on: Option<TierArg>,

    /// Show risk factors, features and the calibration breakdown
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print the summary line
    #[arg(short, long)]
    pub quiet: bool,

    #[command(flatten)]
    pub patient: PatientArgs,
}

/// Patient attributes, with the intake form's defaults.
impl Cli {
    /// True when `--fail-on` is set and `tier` is at or above it.
    pub fn fails_on(&self, tier: RiskTier) -> bool {
        self.fail_on
            .as_ref()
            .is_some_and(|threshold| tier >= RiskTier::from(threshold))
    }
}

#[derive(Args, Debug)]
#[group(id = "patient", multiple = true)]
pub struct PatientArgs {
    /// Age in years
    #[arg(long, default_value_t = 65, value_name = "YEARS")]
    pub age: u32,

    #[arg(long, default_value = "white")]
    pub race: RaceArg,

    #[arg(long, default_value = "private")]
    pub insurance: InsuranceArg,

    /// Discharge location
    #[arg(long, default_value = "home")]
    pub discharge: DischargeArg,

    /// Hospital stay in days
    #[arg(long, default_value_t = 5, value_name = "DAYS")]
    pub los: u32,

    /// Number of fused levels
    #[arg(long, default_value_t = 2, value_name = "N")]
    pub fusion_levels: u32,

    /// Charlson comorbidity index
    #[arg(long, default_value_t = 0, value_name = "SCORE")]
    pub charlson: u32,

    /// Heart failure
    #[arg(long)]
    pub chf: bool,

    /// Current smoker
    #[arg(long)]
    pub smoking: bool,

    /// Obesity (BMI >= 30)
    #[arg(long)]
    pub obesity: bool,

    /// ICU stay during hospitalization
    #[arg(long)]
    pub icu_stay: bool,

    /// Steroid use
    #[arg(long)]
    pub steroid_use: bool,

    /// Surgical site infection
    #[arg(long)]
    pub ssi: bool,
}

impl From<&PatientArgs> for PatientCase {
    fn from(args: &PatientArgs) -> Self {
        PatientCase {
            age: f64::from(args.age),
            race_white: matches!(args.race, RaceArg::White),
            insurance_private: matches!(args.insurance, InsuranceArg::Private),
            discharge_home: matches!(args.discharge, DischargeArg::Home),
            length_of_stay_days: f64::from(args.los),
            fusion_levels: args.fusion_levels,
            charlson_score: args.charlson,
            chf: args.chf,
            smoking: args.smoking,
            obesity: args.obesity,
            icu_stay: args.icu_stay,
            steroid_use: args.steroid_use,
            ssi: args.ssi,
        }
    }
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Pdf,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum RaceArg {
    White,
    Other,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum InsuranceArg {
    Private,
    Other,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum DischargeArg {
    Home,
    Other,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum TierArg {
    Low,
    Moderate,
    High,
}

impl From<&TierArg> for RiskTier {
    fn from(arg: &TierArg) -> Self {
        match arg {
            TierArg::Low => RiskTier::Low,
            TierArg::Moderate => RiskTier::Moderate,
            TierArg::High => RiskTier::High,
        }
    }
}
