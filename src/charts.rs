//! Vega-Lite chart specifications
//!
//! Both charts embed their data inline so the JSON can be handed straight to
//! vega-embed.

use crate::aggregates::{CategoryDsi, CategorySkuCount};
use crate::error::Result;
use crate::schema::{CATEGORY, FIELD_DSI_MEAN, FIELD_SKU_COUNT, LABEL_CATEGORY};
use serde_json::{json, Value};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Bar chart of mean DSI per category
pub fn dsi_bar_chart(rows: &[CategoryDsi]) -> Result<Value> {
    Ok(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "data": { "values": serde_json::to_value(rows)? },
        "mark": {
            "type": "bar",
            "cornerRadiusTopLeft": 3,
            "cornerRadiusTopRight": 3
        },
        "encoding": {
            "x": { "field": CATEGORY, "type": "nominal", "title": LABEL_CATEGORY },
            "y": { "field": FIELD_DSI_MEAN, "type": "quantitative", "title": "Promedio DSI" },
            "tooltip": [
                { "field": CATEGORY, "type": "nominal" },
                { "field": FIELD_DSI_MEAN, "type": "quantitative" }
            ]
        },
        "height": 250,
        "width": "container"
    }))
}

/// Donut chart of distinct SKUs per category
pub fn sku_donut_chart(rows: &[CategorySkuCount]) -> Result<Value> {
    Ok(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "data": { "values": serde_json::to_value(rows)? },
        "mark": { "type": "arc", "innerRadius": 50 },
        "encoding": {
            "theta": { "field": FIELD_SKU_COUNT, "type": "quantitative" },
            "color": {
                "field": CATEGORY,
                "type": "nominal",
                "legend": { "title": LABEL_CATEGORY }
            },
            "tooltip": [
                { "field": CATEGORY, "type": "nominal" },
                { "field": FIELD_SKU_COUNT, "type": "quantitative" }
            ]
        },
        "height": 300,
        "width": "container"
    }))
}
