//! Division filter, facet option builder and record filter
//!
//! Each step takes a `&DataFrame` and returns a new one; inputs are never
//! modified and row order is preserved.

use crate::error::Result;
use crate::schema::{ALL_SENTINEL, BRAND, CATEGORY, DIVISION, SUBCATEGORY};
use crate::selection::{Division, FacetChoice, FilterSelection};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Normalize a stored division value: first character uppercase, the rest
/// lowercase. Applied to the whole string, so `"ALMACEN CENTRAL"` becomes
/// `"Almacen central"`. Whitespace is kept as is.
pub fn normalize_division(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Keep the rows whose normalized `COMERCIO` equals the division label
pub fn filter_by_division(df: &DataFrame, division: Division) -> Result<DataFrame> {
    let label = division.label();
    let divisions = df.column(DIVISION)?.str()?;

    let mask: BooleanChunked = divisions
        .into_iter()
        .map(|value| Some(value.map_or(false, |v| normalize_division(v) == label)))
        .collect();

    let filtered = df.filter(&mask)?;
    debug!("Division {}: {} of {} rows", label, filtered.height(), df.height());
    Ok(filtered)
}

/// Option lists for the three facet controls, each starting with "Todas"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    pub categories: Vec<String>,
    pub subcategories: Vec<String>,
    pub brands: Vec<String>,
}

impl FacetOptions {
    pub fn build(df: &DataFrame) -> Result<Self> {
        Ok(Self {
            categories: facet_options(df, CATEGORY)?,
            subcategories: facet_options(df, SUBCATEGORY)?,
            brands: facet_options(df, BRAND)?,
        })
    }
}

/// Sorted distinct non-null values of `column`, with the sentinel prepended
pub fn facet_options(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let values = df.column(column)?.str()?;
    let distinct: BTreeSet<&str> = values.into_iter().flatten().collect();

    let mut options = Vec::with_capacity(distinct.len() + 1);
    options.push(ALL_SENTINEL.to_string());
    options.extend(distinct.into_iter().map(str::to_string));
    Ok(options)
}

/// Equality predicate for one facet, `None` for the "Todas" choice
fn facet_predicate(column: &str, choice: &FacetChoice) -> Option<Expr> {
    choice.value().map(|v| col(column).eq(lit(v)))
}

/// Apply a single facet constraint
pub fn filter_facet(df: &DataFrame, column: &str, choice: &FacetChoice) -> Result<DataFrame> {
    match facet_predicate(column, choice) {
        Some(predicate) => Ok(df.clone().lazy().filter(predicate).collect()?),
        None => Ok(df.clone()),
    }
}

/// Apply every non-"Todas" facet of the selection conjunctively
///
/// The division is not applied here; callers pass the division-filtered
/// table.
pub fn filter_records(df: &DataFrame, selection: &FilterSelection) -> Result<DataFrame> {
    let predicate = [
        facet_predicate(CATEGORY, &selection.category),
        facet_predicate(SUBCATEGORY, &selection.subcategory),
        facet_predicate(BRAND, &selection.brand),
    ]
    .into_iter()
    .flatten()
    .reduce(|acc, p| acc.and(p));

    let filtered = match predicate {
        Some(predicate) => df.clone().lazy().filter(predicate).collect()?,
        None => df.clone(),
    };

    debug!("Facet filters: {} of {} rows", filtered.height(), df.height());
    Ok(filtered)
}
