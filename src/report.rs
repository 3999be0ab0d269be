//! Plain-text rendering of a dashboard view for the terminal

use crate::dashboard::DashboardView;
use crate::filters::FacetOptions;
use crate::schema::{
    BRAND, CATEGORY, FIELD_AVG_PROFIT, FIELD_DSI, FIELD_DSI_MEAN, FIELD_SKU_COUNT, LABEL_BRAND,
    LABEL_CATEGORY, LABEL_DIVISION, LABEL_SUBCATEGORY, NO_DATA, PRODUCT_NAME,
    TOP_SLOW_MOVERS_TITLE,
};
use chrono::{DateTime, Utc};
use std::fmt::Write;

fn number(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_else(|| NO_DATA.to_string())
}

/// Left-aligned columns padded to the widest cell
fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(idx) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&line(rule.iter().map(String::as_str).collect()));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

pub fn render_text(view: &DashboardView, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let selection = &view.selection;

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "Generado: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}: {}", LABEL_DIVISION, selection.division);
    let _ = writeln!(
        out,
        "{}: {} | {}: {} | {}: {}",
        LABEL_CATEGORY,
        selection.category,
        LABEL_SUBCATEGORY,
        selection.subcategory,
        LABEL_BRAND,
        selection.brand
    );
    let _ = writeln!(out, "Registros: {}", view.row_count);
    let _ = writeln!(out);

    for card in &view.kpi_cards {
        let _ = writeln!(out, "{:<25} {}", card.label, card.value);
    }
    let _ = writeln!(out);

    let dsi_rows: Vec<Vec<String>> = view
        .dsi_by_category
        .iter()
        .map(|r| vec![r.category.clone(), number(r.avg_dsi)])
        .collect();
    out.push_str(&format_table(&[CATEGORY, FIELD_DSI_MEAN], &dsi_rows));
    let _ = writeln!(out);

    let sku_rows: Vec<Vec<String>> = view
        .sku_distribution
        .iter()
        .map(|r| vec![r.category.clone(), r.sku_count.to_string()])
        .collect();
    out.push_str(&format_table(&[CATEGORY, FIELD_SKU_COUNT], &sku_rows));
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", TOP_SLOW_MOVERS_TITLE);
    let top_rows: Vec<Vec<String>> = view
        .top_slow_movers
        .iter()
        .map(|r| {
            vec![
                r.product_name.clone().unwrap_or_default(),
                r.brand.clone().unwrap_or_default(),
                number(r.dsi),
                number(r.avg_profit),
            ]
        })
        .collect();
    out.push_str(&format_table(
        &[PRODUCT_NAME, BRAND, FIELD_DSI, FIELD_AVG_PROFIT],
        &top_rows,
    ));

    out
}

/// Option lists as printed by `--facets`
pub fn render_facets(options: &FacetOptions) -> String {
    let mut out = String::new();
    for (label, values) in [
        (LABEL_CATEGORY, &options.categories),
        (LABEL_SUBCATEGORY, &options.subcategories),
        (LABEL_BRAND, &options.brands),
    ] {
        let _ = writeln!(out, "{}:", label);
        for value in values {
            let _ = writeln!(out, "  {}", value);
        }
    }
    out
}
