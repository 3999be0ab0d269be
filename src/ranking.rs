//! Slow movers ranking: highest days-of-sales first

use crate::error::Result;
use crate::schema::{
    AVG_DAYS_OF_SALES, AVG_PROFIT_PER_PRODUCT, BRAND, FIELD_AVG_PROFIT, FIELD_DSI, PRODUCT_NAME,
};
use polars::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;

/// One row of the "Top Slow Movers" table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlowMover {
    #[serde(rename = "PRODUCTO")]
    pub product_name: Option<String>,
    #[serde(rename = "MARCA")]
    pub brand: Option<String>,
    #[serde(rename = "DSI")]
    pub dsi: Option<f64>,
    #[serde(rename = "BENEFICIO PROMEDIO")]
    pub avg_profit: Option<f64>,
}

/// Descending by DSI, missing values last
fn by_dsi_descending(a: &SlowMover, b: &SlowMover) -> Ordering {
    match (a.dsi, b.dsi) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Project the display columns and return the `n` rows with the highest DSI
///
/// The sort is stable: rows with equal DSI keep their original order.
/// Shorter tables yield fewer rows.
pub fn top_slow_movers(df: &DataFrame, n: usize) -> Result<Vec<SlowMover>> {
    let projected = df
        .clone()
        .lazy()
        .select([
            col(PRODUCT_NAME),
            col(BRAND),
            col(AVG_DAYS_OF_SALES).alias(FIELD_DSI),
            col(AVG_PROFIT_PER_PRODUCT).alias(FIELD_AVG_PROFIT),
        ])
        .collect()?;

    let products = projected.column(PRODUCT_NAME)?.str()?;
    let brands = projected.column(BRAND)?.str()?;
    let dsi = projected.column(FIELD_DSI)?.f64()?;
    let profit = projected.column(FIELD_AVG_PROFIT)?.f64()?;

    let mut rows: Vec<SlowMover> = products
        .into_iter()
        .zip(brands.into_iter())
        .zip(dsi.into_iter().zip(profit.into_iter()))
        .map(|((product, brand), (dsi, profit))| SlowMover {
            product_name: product.map(str::to_string),
            brand: brand.map(str::to_string),
            dsi: dsi.filter(|v| !v.is_nan()),
            avg_profit: profit,
        })
        .collect();

    rows.sort_by(by_dsi_descending);
    rows.truncate(n);
    Ok(rows)
}
