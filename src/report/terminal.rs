use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{AuditRecord, ClassifiedRow, RiskTier};

/// Render a colored terminal report for a completed audit.
pub fn render(record: &AuditRecord, manifest_path: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let s = &record.summary;

    if quiet {
        println!(
            "Total: {}  High: {}  Medium: {}  Low: {}  Unknown: {}",
            s.total_sources,
            s.high_risk_count.to_string().red(),
            s.medium_risk_count.to_string().yellow(),
            s.low_risk_count.to_string().green(),
            s.unknown_count.to_string().dimmed(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "provenance-audit".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Auditing: {}", manifest_path.display());
    println!(" Audit ID: {}\n", record.audit_id);

    let high_domains = summarize_domains(&record.rows, RiskTier::High);
    let medium_domains = summarize_domains(&record.rows, RiskTier::Medium);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!("Total sources : {}", s.total_sources)
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  High     : {:>4} ({:>5.1}%)  {}",
            "✗".red(),
            s.high_risk_count,
            s.high_risk_pct,
            high_domains
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Medium   : {:>4} ({:>5.1}%)  {}",
            "⚠".yellow(),
            s.medium_risk_count,
            s.medium_risk_pct,
            medium_domains
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Low      : {:>4} ({:>5.1}%)",
            "✓".green(),
            s.low_risk_count,
            s.low_risk_pct
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Unknown  : {:>4} ({:>5.1}%)",
            "?".dimmed(),
            s.unknown_count,
            s.unknown_pct
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if s.high_risk_count > 0 {
        println!(" {} High-risk sources:\n", "[HIGH]".red().bold());
        render_table(&record.rows, RiskTier::High);
        println!();
    }

    if s.medium_risk_count > 0 {
        println!(" {} Medium-risk sources:\n", "[MEDIUM]".yellow().bold());
        render_table(&record.rows, RiskTier::Medium);
        println!();
    }

    if verbose && s.low_risk_count > 0 {
        println!(" {} Low-risk sources:\n", "[LOW]".green().bold());
        render_table(&record.rows, RiskTier::Low);
        println!();
    }

    if verbose && s.unknown_count > 0 {
        println!(" {} Unclassified sources:\n", "[UNKNOWN]".dimmed().bold());
        render_table(&record.rows, RiskTier::Unknown);
        println!();
    }

    if !s.recommendations.is_empty() {
        println!(" {}", "Recommendations:".bold());
        for rec in &s.recommendations {
            println!("  {} {}", "→".cyan(), rec);
        }
        println!();
    }

    Ok(())
}

fn render_table(rows: &[ClassifiedRow], tier_filter: RiskTier) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Domain").add_attribute(Attribute::Bold),
            Cell::new("Publisher").add_attribute(Attribute::Bold),
            Cell::new("Content Type").add_attribute(Attribute::Bold),
            Cell::new("Words").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
            Cell::new("Reason").add_attribute(Attribute::Bold),
        ]);

    for row in rows.iter().filter(|r| r.risk_level == tier_filter) {
        let risk_color = match row.risk_level {
            RiskTier::High => Color::Red,
            RiskTier::Medium => Color::Yellow,
            RiskTier::Low => Color::Green,
            RiskTier::Unknown => Color::DarkGrey,
        };

        let domain = if row.domain.is_empty() {
            row.url.as_str()
        } else {
            row.domain.as_str()
        };

        table.add_row(vec![
            Cell::new(domain),
            Cell::new(row.publisher.as_deref().unwrap_or("—")),
            Cell::new(&row.content_type),
            Cell::new(row.word_count).set_alignment(CellAlignment::Right),
            Cell::new(row.risk_level.to_string())
                .fg(risk_color)
                .set_alignment(CellAlignment::Center),
            Cell::new(&row.risk_reason),
        ]);
    }

    println!("{}", table);
}

fn summarize_domains(rows: &[ClassifiedRow], tier: RiskTier) -> String {
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for row in rows.iter().filter(|r| r.risk_level == tier) {
        *counts.entry(row.domain.as_str()).or_insert(0) += 1;
    }

    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(domain, cnt)| format!("{} ({})", domain, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}
