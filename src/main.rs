//! `provenance-audit` — classify dataset manifest sources against a curated
//! publisher risk database and produce an audit report.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load the risk database ([`risk::db`]): `--riskdb` override, project or
//!    home config file, or the built-in curated table.
//! 3. Read the manifest and run the audit pipeline ([`audit`]): load
//!    ([`manifest`]) → classify per row ([`risk::classifier`], consulting
//!    [`domain`]) → aggregate ([`aggregate`]).
//! 4. Store the completed audit ([`store`]).
//! 5. Render the requested report ([`report`]).
//! 6. Exit `0` (clean) or `1` (at least one high-risk source).

mod aggregate;
mod audit;
mod cli;
mod domain;
mod error;
mod manifest;
mod models;
mod report;
mod risk;
mod store;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, ReportFormat};
use report::pdf::FilerInfo;
use risk::db::RiskDb;
use store::{AuditStore, MemoryAuditStore};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let base_dir = cli.manifest.parent().unwrap_or_else(|| Path::new("."));
    let db = RiskDb::load_or_builtin(cli.riskdb.as_deref(), base_dir)?;

    let manifest_text = std::fs::read_to_string(&cli.manifest)
        .with_context(|| format!("Failed to read manifest {}", cli.manifest.display()))?;

    let (rows, summary) = audit::run_audit(&manifest_text, &db, cli.quiet)?;

    let store = MemoryAuditStore::new();
    let record = store.create(rows, summary);

    // Resolve effective report format: --pdf implies PDF format
    let report_format = match &cli.pdf {
        Some(_) => ReportFormat::Pdf,
        None => cli.report,
    };
    let pdf_path = cli
        .pdf
        .unwrap_or_else(|| std::path::PathBuf::from("disclosure-form.pdf"));

    match report_format {
        ReportFormat::Terminal => {
            report::terminal::render(&record, &cli.manifest, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        ReportFormat::Pdf => {
            let filer = FilerInfo {
                organization: cli.org.unwrap_or_default(),
                model_name: cli.model_name.unwrap_or_default(),
                contact_name: cli.contact.unwrap_or_default(),
                contact_email: cli.email.unwrap_or_default(),
            };
            report::pdf::render(&record, &filer, &pdf_path)?;
        }
    }

    // Exit code: 1 if any high-risk source found
    if record.summary.high_risk_count > 0 {
        std::process::exit(1);
    }

    Ok(())
}
