//! KPI and per-category aggregation over the working subset

use crate::error::Result;
use crate::schema::{
    AVG_DAYS_OF_SALES, AVG_PROFIT_PER_PRODUCT, CATEGORY, CODE, FIELD_DSI_MEAN, FIELD_SKU_COUNT,
    GROSS_MARGIN_PCT,
};
use polars::prelude::*;
use serde::Serialize;

/// Round to one decimal place, ties to even
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Scalar metrics shown as KPI cards
///
/// A mean over zero rows (or only null values) is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub avg_dsi: Option<f64>,
    pub margin_pct: Option<f64>,
    pub avg_profit: Option<f64>,
    pub total_skus: usize,
}

impl KpiSummary {
    pub fn compute(df: &DataFrame) -> Result<Self> {
        Ok(Self {
            avg_dsi: rounded_mean(df, AVG_DAYS_OF_SALES)?,
            margin_pct: rounded_mean(df, GROSS_MARGIN_PCT)?,
            avg_profit: rounded_mean(df, AVG_PROFIT_PER_PRODUCT)?,
            total_skus: distinct_count(df, CODE)?,
        })
    }
}

fn rounded_mean(df: &DataFrame, column: &str) -> Result<Option<f64>> {
    let mean = df.column(column)?.mean();
    Ok(mean.filter(|m| m.is_finite()).map(round1))
}

/// Number of distinct non-null values; duplicates count once
pub fn distinct_count(df: &DataFrame, column: &str) -> Result<usize> {
    Ok(df.column(column)?.drop_nulls().n_unique()?)
}

/// Bar chart row: mean DSI of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDsi {
    #[serde(rename = "CATEGORIA")]
    pub category: String,
    #[serde(rename = "DSI Promedio")]
    pub avg_dsi: Option<f64>,
}

/// Donut chart row: distinct SKUs of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySkuCount {
    #[serde(rename = "CATEGORIA")]
    pub category: String,
    #[serde(rename = "Conteo_SKU")]
    pub sku_count: u64,
}

/// Group by category (null categories dropped) with a single aggregation
fn group_by_category(df: &DataFrame, aggregation: Expr) -> Result<DataFrame> {
    Ok(df
        .clone()
        .lazy()
        .filter(col(CATEGORY).is_not_null())
        .group_by_stable([col(CATEGORY)])
        .agg([aggregation])
        .collect()?)
}

/// Mean DSI per category, ordered by category
pub fn dsi_by_category(df: &DataFrame) -> Result<Vec<CategoryDsi>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let grouped = group_by_category(df, col(AVG_DAYS_OF_SALES).mean().alias(FIELD_DSI_MEAN))?;
    let categories = grouped.column(CATEGORY)?.str()?;
    let means = grouped.column(FIELD_DSI_MEAN)?.cast(&DataType::Float64)?;
    let means = means.f64()?;

    let mut rows: Vec<CategoryDsi> = categories
        .into_iter()
        .zip(means.into_iter())
        .filter_map(|(category, mean)| {
            category.map(|c| CategoryDsi {
                category: c.to_string(),
                avg_dsi: mean.filter(|m| m.is_finite()),
            })
        })
        .collect();

    rows.sort_by(|a, b| a.category.cmp(&b.category));
    Ok(rows)
}

/// Distinct SKU count per category, ordered by category
pub fn sku_distribution_by_category(df: &DataFrame) -> Result<Vec<CategorySkuCount>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let grouped = group_by_category(
        df,
        col(CODE).drop_nulls().n_unique().alias(FIELD_SKU_COUNT),
    )?;
    let categories = grouped.column(CATEGORY)?.str()?;
    let counts = grouped.column(FIELD_SKU_COUNT)?.cast(&DataType::UInt64)?;
    let counts = counts.u64()?;

    let mut rows: Vec<CategorySkuCount> = categories
        .into_iter()
        .zip(counts.into_iter())
        .filter_map(|(category, count)| {
            category.map(|c| CategorySkuCount {
                category: c.to_string(),
                sku_count: count.unwrap_or(0),
            })
        })
        .collect();

    rows.sort_by(|a, b| a.category.cmp(&b.category));
    Ok(rows)
}
