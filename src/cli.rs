use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "provenance-audit",
    about = "Audit dataset manifests for training-data copyright risk",
    version
)]
pub struct Cli {
    /// Manifest CSV to audit
    pub manifest: PathBuf,

    /// Risk database file [default: ./.provenance-audit/riskdb.toml, fallback ~/.config/provenance-audit/riskdb.toml, then built-in]
    #[arg(long)]
    pub riskdb: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// PDF output path; use without value to default to disclosure-form.pdf
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "disclosure-form.pdf")]
    pub pdf: Option<PathBuf>,

    /// Organization name printed on the disclosure form
    #[arg(long, value_name = "NAME")]
    pub org: Option<String>,

    /// AI model / system name printed on the disclosure form
    #[arg(long = "model-name", value_name = "NAME")]
    pub model_name: Option<String>,

    /// Contact name printed on the disclosure form
    #[arg(long, value_name = "NAME")]
    pub contact: Option<String>,

    /// Contact email printed on the disclosure form
    #[arg(long, value_name = "EMAIL")]
    pub email: Option<String>,

    /// Show all rows (not just high/medium risk)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Pdf,
}
