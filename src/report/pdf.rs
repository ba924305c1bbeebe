use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon, Rgb,
};

use crate::models::{AuditRecord, ClassifiedRow, RiskTier};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;

// ── Form colour palette ───────────────────────────────────────────────────────
const BG:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL_ALT: (f32, f32, f32) = (0.96, 0.96, 0.96);
const RULE:      (f32, f32, f32) = (0.80, 0.80, 0.80);
const HEADER_BG: (f32, f32, f32) = (0.18, 0.18, 0.18);
const TEXT_PRI:  (f32, f32, f32) = (0.10, 0.10, 0.10);
const TEXT_SEC:  (f32, f32, f32) = (0.35, 0.35, 0.35);
const TEXT_MUT:  (f32, f32, f32) = (0.60, 0.60, 0.60);
const WHITE:     (f32, f32, f32) = (1.00, 1.00, 1.00);

const HIGH_BG:   (f32, f32, f32) = (0.55, 0.00, 0.00);
const HIGH_ROW:  (f32, f32, f32) = (1.00, 0.96, 0.96);
const HIGH_FG:   (f32, f32, f32) = (0.76, 0.09, 0.13);
const MED_FG:    (f32, f32, f32) = (0.70, 0.40, 0.02);

const REASON_WRAP: usize = 40;
const BODY_WRAP: usize = 108;

/// Caller-supplied filing metadata printed on the form.
#[derive(Debug, Clone)]
pub struct FilerInfo {
    pub organization: String,
    pub model_name: String,
    pub contact_name: String,
    pub contact_email: String,
}

/// Render the disclosure form: filer page → high-risk detail pages →
/// attestation page.
pub fn render(record: &AuditRecord, filer: &FilerInfo, output_path: &Path) -> Result<()> {
    let doc = PdfDocument::empty("Training Data Disclosure");

    add_form_page(&doc, record, filer)?;
    add_high_risk_pages(&doc, record)?;
    add_attestation_page(&doc, record, filer)?;

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    println!("Disclosure form written to: {}", output_path.display());
    Ok(())
}

// ── Page 1: header, filer information, source summary ─────────────────────────

fn add_form_page(
    doc: &PdfDocumentReference,
    record: &AuditRecord,
    filer: &FilerInfo,
) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Form");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);

    // Header
    set_color(&layer, TEXT_MUT);
    layer.use_text("FEDERAL REGISTER", 8.0, Mm(MARGIN), Mm(PAGE_H - 14.0), &font_r);
    set_color(&layer, TEXT_PRI);
    layer.use_text(
        "AI TRAINING DATA DISCLOSURE FORM",
        17.0,
        Mm(MARGIN),
        Mm(PAGE_H - 23.0),
        &font_b,
    );
    set_color(&layer, TEXT_SEC);
    layer.use_text(
        "Source provenance audit of a dataset manifest, filed for regulatory disclosure",
        8.5,
        Mm(MARGIN),
        Mm(PAGE_H - 29.5),
        &font_r,
    );
    set_color(&layer, TEXT_MUT);
    layer.use_text(
        format!("Audit ID {}  |  Generated {}", record.audit_id, Utc::now().format("%Y-%m-%d %H:%M UTC")),
        7.0,
        Mm(MARGIN),
        Mm(PAGE_H - 34.5),
        &font_r,
    );
    fill_rect(&layer, MARGIN, PAGE_H - 38.0, PAGE_W - 2.0 * MARGIN, 0.8, HEADER_BG);

    // Section 1 — filer information
    let s1_y = PAGE_H - 50.0;
    section_header(&layer, s1_y, "SECTION 1 — ORGANIZATION INFORMATION", &font_b);

    let fields = [
        ("Organization", filer.organization.as_str()),
        ("AI model / system", filer.model_name.as_str()),
        ("Prepared by", filer.contact_name.as_str()),
        ("Contact email", filer.contact_email.as_str()),
    ];
    for (i, (label, value)) in fields.iter().enumerate() {
        let col = i % 2;
        let row = i / 2;
        let fx = MARGIN + col as f32 * 88.0;
        let fy = s1_y - 11.0 - row as f32 * 13.0;

        set_color(&layer, TEXT_MUT);
        layer.use_text(*label, 7.0, Mm(fx), Mm(fy), &font_r);
        set_color(&layer, TEXT_PRI);
        let shown = if value.is_empty() { "N/A" } else { value };
        layer.use_text(truncate(shown, 40), 9.5, Mm(fx), Mm(fy - 4.5), &font_b);
        draw_hline(&layer, fx, fx + 80.0, fy - 6.5, RULE);
    }

    // Section 2 — source summary table
    let s2_y = s1_y - 44.0;
    section_header(&layer, s2_y, "SECTION 2 — TRAINING DATA SOURCE SUMMARY", &font_b);

    let s = &record.summary;
    let rows: [(&str, String, String); 5] = [
        ("Total data sources reviewed", s.total_sources.to_string(), "100%".to_string()),
        ("High-risk sources (copyrighted / litigious)", s.high_risk_count.to_string(), format!("{:.1}%", s.high_risk_pct)),
        ("Medium-risk sources (restricted / TOS)", s.medium_risk_count.to_string(), format!("{:.1}%", s.medium_risk_pct)),
        ("Low-risk sources (open / permissive)", s.low_risk_count.to_string(), format!("{:.1}%", s.low_risk_pct)),
        ("Unclassified sources", s.unknown_count.to_string(), format!("{:.1}%", s.unknown_pct)),
    ];

    let table_w = PAGE_W - 2.0 * MARGIN;
    let col_count = MARGIN + 118.0;
    let col_pct = MARGIN + 150.0;
    let row_h = 8.0;

    // Header band
    let hdr_y = s2_y - 10.0;
    fill_rect(&layer, MARGIN, hdr_y - 2.5, table_w, row_h, HEADER_BG);
    set_color(&layer, WHITE);
    layer.use_text("METRIC", 7.5, Mm(MARGIN + 2.0), Mm(hdr_y), &font_b);
    layer.use_text("COUNT", 7.5, Mm(col_count), Mm(hdr_y), &font_b);
    layer.use_text("PERCENTAGE", 7.5, Mm(col_pct), Mm(hdr_y), &font_b);

    for (i, (metric, count, pct)) in rows.iter().enumerate() {
        let ry = hdr_y - row_h * (i as f32 + 1.0);
        if i % 2 == 1 {
            fill_rect(&layer, MARGIN, ry - 2.5, table_w, row_h, PANEL_ALT);
        }
        set_color(&layer, TEXT_PRI);
        layer.use_text(*metric, 8.5, Mm(MARGIN + 2.0), Mm(ry), &font_r);
        set_color(&layer, TEXT_SEC);
        layer.use_text(count.as_str(), 8.5, Mm(col_count), Mm(ry), &font_r);
        layer.use_text(pct.as_str(), 8.5, Mm(col_pct), Mm(ry), &font_r);
        draw_hline(&layer, MARGIN, PAGE_W - MARGIN, ry - 2.5, RULE);
    }

    // Recommendations
    let recs_y = hdr_y - row_h * 6.0 - 8.0;
    section_header(&layer, recs_y, "COMPLIANCE RECOMMENDATIONS", &font_b);
    for (i, rec) in s.recommendations.iter().enumerate() {
        let ry = recs_y - 10.0 - i as f32 * 6.5;
        fill_rounded_rect(&layer, MARGIN, ry + 0.8, 1.8, 1.8, 0.9, HEADER_BG);
        set_color(&layer, TEXT_SEC);
        layer.use_text(truncate(rec, 100), 8.5, Mm(MARGIN + 4.5), Mm(ry), &font_r);
    }

    footer(&layer, &font_r);
    Ok(())
}

// ── High-risk detail pages ────────────────────────────────────────────────────

fn add_high_risk_pages(doc: &PdfDocumentReference, record: &AuditRecord) -> Result<()> {
    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    let high_rows: Vec<&ClassifiedRow> = record
        .rows
        .iter()
        .filter(|r| r.risk_level == RiskTier::High)
        .collect();

    const BASE_ROW_H: f32 = 7.0;
    const EXTRA_LINE_H: f32 = 3.5;
    const HDR_Y: f32 = 264.0;
    const FIRST_Y: f32 = 255.0;
    const BOT_MARGIN: f32 = 25.0;

    //  #      DOMAIN     PUBLISHER   TYPE       WORDS      REASON
    let col_x = [MARGIN, MARGIN + 8.0, MARGIN + 48.0, MARGIN + 88.0, MARGIN + 108.0, MARGIN + 124.0];
    let headers = ["#", "DOMAIN", "PUBLISHER", "TYPE", "WORDS", "RISK REASON"];

    let row_data: Vec<(Vec<String>, f32)> = high_rows
        .iter()
        .map(|row| {
            let lines = wrap_text(&row.risk_reason, REASON_WRAP);
            let extra = lines.len().saturating_sub(1);
            (lines, BASE_ROW_H + extra as f32 * EXTRA_LINE_H)
        })
        .collect();

    let mut cur_y = FIRST_Y;
    let mut page_state: Option<(PdfPageIndex, PdfLayerIndex)> = None;
    let mut page_num: u32 = 0;

    let new_page = |doc: &PdfDocumentReference, page_num: u32| -> Result<(PdfPageIndex, PdfLayerIndex)> {
        let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "High Risk");
        let layer = doc.get_page(pi).get_layer(li);

        fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
        set_color(&layer, TEXT_PRI);
        layer.use_text(
            "SECTION 3 — HIGH-RISK SOURCE DETAILS",
            12.0,
            Mm(MARGIN),
            Mm(282.5),
            &font_b,
        );
        set_color(&layer, TEXT_MUT);
        layer.use_text(format!("Page {}", page_num), 8.0, Mm(PAGE_W - MARGIN - 14.0), Mm(283.0), &font_r);
        draw_hline(&layer, MARGIN, PAGE_W - MARGIN, 277.5, RULE);

        fill_rect(&layer, MARGIN, HDR_Y - 5.0, PAGE_W - 2.0 * MARGIN, 7.5, HIGH_BG);
        set_color(&layer, WHITE);
        for (i, h) in headers.iter().enumerate() {
            layer.use_text(*h, 7.0, Mm(col_x[i] + 1.5), Mm(HDR_Y - 2.5), &font_b);
        }

        footer(&layer, &font_r);
        Ok((pi, li))
    };

    if high_rows.is_empty() {
        page_num += 1;
        let (pi, li) = new_page(doc, page_num)?;
        let layer = doc.get_page(pi).get_layer(li);
        set_color(&layer, TEXT_SEC);
        layer.use_text(
            "No high-risk sources identified in this audit.",
            9.0,
            Mm(MARGIN),
            Mm(FIRST_Y - 4.0),
            &font_r,
        );
        return Ok(());
    }

    for (row_idx, row) in high_rows.iter().enumerate() {
        let (reason_lines, row_h) = &row_data[row_idx];
        let row_h = *row_h;

        if page_state.is_none() || cur_y - row_h < BOT_MARGIN {
            page_num += 1;
            page_state = Some(new_page(doc, page_num)?);
            cur_y = FIRST_Y;
        }

        let (pi, li) = page_state.unwrap();
        let layer = doc.get_page(pi).get_layer(li);

        if row_idx % 2 == 0 {
            fill_rect(&layer, MARGIN, cur_y - row_h + 1.5, PAGE_W - 2.0 * MARGIN, row_h, HIGH_ROW);
        }

        let text_y = cur_y - 4.0;

        set_color(&layer, TEXT_MUT);
        layer.use_text((row_idx + 1).to_string(), 8.0, Mm(col_x[0] + 1.5), Mm(text_y), &font_r);
        set_color(&layer, TEXT_PRI);
        layer.use_text(truncate(&row.domain, 24), 8.0, Mm(col_x[1] + 1.5), Mm(text_y), &font_r);
        set_color(&layer, TEXT_SEC);
        layer.use_text(
            truncate(row.publisher.as_deref().unwrap_or("Unknown"), 24),
            8.0,
            Mm(col_x[2] + 1.5),
            Mm(text_y),
            &font_r,
        );
        layer.use_text(truncate(&row.content_type, 12), 8.0, Mm(col_x[3] + 1.5), Mm(text_y), &font_r);
        layer.use_text(row.word_count.to_string(), 8.0, Mm(col_x[4] + 1.5), Mm(text_y), &font_r);

        for (j, line) in reason_lines.iter().enumerate() {
            let line_y = text_y - j as f32 * EXTRA_LINE_H;
            layer.use_text(line.as_str(), 8.0, Mm(col_x[5] + 1.5), Mm(line_y), &font_r);
        }

        draw_hline(&layer, MARGIN, PAGE_W - MARGIN, cur_y - row_h + 1.5, RULE);
        cur_y -= row_h;
    }

    Ok(())
}

// ── Attestation page ──────────────────────────────────────────────────────────

fn add_attestation_page(
    doc: &PdfDocumentReference,
    record: &AuditRecord,
    filer: &FilerInfo,
) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Attestation");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);

    // Section 4 — medium-risk rollup
    let s4_y = PAGE_H - 20.0;
    section_header(&layer, s4_y, "SECTION 4 — MEDIUM-RISK SOURCE SUMMARY", &font_b);

    let medium: Vec<String> = record
        .summary
        .top_risk_domains
        .iter()
        .filter(|d| d.risk_level == RiskTier::Medium)
        .map(|d| format!("{} ({})", d.domain, d.count))
        .collect();

    let body = if medium.is_empty() {
        "No medium-risk sources identified.".to_string()
    } else {
        format!(
            "{} medium-risk source(s) identified from the following domains: {}. \
             These sources require attribution verification and Terms-of-Service compliance review.",
            record.summary.medium_risk_count,
            medium.join(", ")
        )
    };

    let color = if medium.is_empty() { TEXT_SEC } else { MED_FG };
    set_color(&layer, color);
    for (i, line) in wrap_text(&body, BODY_WRAP).iter().enumerate() {
        layer.use_text(line.as_str(), 8.5, Mm(MARGIN), Mm(s4_y - 10.0 - i as f32 * 5.0), &font_r);
    }

    // Section 5 — attestation
    let s5_y = s4_y - 42.0;
    section_header(&layer, s5_y, "SECTION 5 — ATTESTATION AND CERTIFICATION", &font_b);

    let attestation = "I hereby certify that the information provided in this disclosure form is \
        true, accurate, and complete to the best of my knowledge, and that the audit identified \
        above was produced from the dataset manifest without modification of its classification \
        results.";

    set_color(&layer, TEXT_SEC);
    for (i, line) in wrap_text(attestation, BODY_WRAP).iter().enumerate() {
        layer.use_text(line.as_str(), 8.5, Mm(MARGIN), Mm(s5_y - 10.0 - i as f32 * 5.0), &font_r);
    }

    let sig_y = s5_y - 40.0;
    let sig_fields = [
        ("Signature", ""),
        ("Date", ""),
        ("Name", filer.contact_name.as_str()),
        ("Organization", filer.organization.as_str()),
    ];
    for (i, (label, value)) in sig_fields.iter().enumerate() {
        let col = i % 2;
        let row = i / 2;
        let fx = MARGIN + col as f32 * 88.0;
        let fy = sig_y - row as f32 * 16.0;

        set_color(&layer, TEXT_PRI);
        if !value.is_empty() {
            layer.use_text(truncate(value, 38), 9.0, Mm(fx), Mm(fy + 2.0), &font_r);
        }
        draw_hline(&layer, fx, fx + 80.0, fy, HEADER_BG);
        set_color(&layer, TEXT_MUT);
        layer.use_text(*label, 7.0, Mm(fx), Mm(fy - 4.0), &font_r);
    }

    // High-risk callout when the filing needs attention
    if record.summary.high_risk_count > 0 {
        let warn_y = sig_y - 45.0;
        set_color(&layer, HIGH_FG);
        layer.use_text(
            format!(
                "{} high-risk source(s) disclosed in Section 3 require licensing or removal.",
                record.summary.high_risk_count
            ),
            8.5,
            Mm(MARGIN),
            Mm(warn_y),
            &font_b,
        );
    }

    footer(&layer, &font_r);
    Ok(())
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn section_header(layer: &PdfLayerReference, y: f32, title: &str, font_b: &IndirectFontRef) {
    set_color(layer, TEXT_PRI);
    layer.use_text(title, 10.0, Mm(MARGIN), Mm(y), font_b);
    draw_hline(layer, MARGIN, PAGE_W - MARGIN, y - 2.5, RULE);
}

fn footer(layer: &PdfLayerReference, font_r: &IndirectFontRef) {
    draw_hline(layer, MARGIN, PAGE_W - MARGIN, 22.0, RULE);
    set_color(layer, TEXT_MUT);
    layer.use_text(
        format!("Generated by provenance-audit v{}", env!("CARGO_PKG_VERSION")),
        7.5,
        Mm(MARGIN),
        Mm(15.0),
        font_r,
    );
    layer.use_text(
        Utc::now().format("%Y-%m-%d").to_string(),
        7.5,
        Mm(PAGE_W - MARGIN - 22.0),
        Mm(15.0),
        font_r,
    );
}

fn set_color(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
             (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(x),     Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x),     Mm(y + h)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
}

/// Build a clockwise polygon ring approximating a rounded rectangle.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    let r = r.min(w / 2.0).min(h / 2.0);
    const SEGS: usize = 8;
    let mut pts = Vec::with_capacity(4 * (SEGS + 1));

    let corners = [
        (x + w - r, y + r,     270.0f32, 360.0f32),
        (x + w - r, y + h - r, 0.0f32,   90.0f32),
        (x + r,     y + h - r, 90.0f32,  180.0f32),
        (x + r,     y + r,     180.0f32, 270.0f32),
    ];

    for (cx, cy, start, end) in &corners {
        for i in 0..=SEGS {
            let t = i as f32 / SEGS as f32;
            let angle = (start + (end - start) * t).to_radians();
            pts.push((
                Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())),
                false,
            ));
        }
    }
    pts
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                     r: f32, (cr, cg, cb): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb { r: cr, g: cg, b: cb, icc_profile: None }));
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32,
              (r, g, b): (f32, f32, f32)) {
    layer.set_outline_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
    layer.set_outline_thickness(1.0);
}

// ── Text helpers ──────────────────────────────────────────────────────────────

fn truncate(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        format!("{}…", chars[..max - 1].iter().collect::<String>())
    } else {
        s.to_string()
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.len() <= max_chars {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() > max_chars {
            lines.push(current.clone());
            current = word.to_string();
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
