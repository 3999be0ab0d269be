//! Render pipeline
//!
//! `render` is a pure function of the canonical table and the current
//! selection: division filter, facet options, record filter, then KPIs,
//! category aggregates and the slow movers ranking. `Dashboard` pairs it
//! with the dataset cache for callers that re-render on every interaction.

use crate::aggregates::{
    dsi_by_category, sku_distribution_by_category, CategoryDsi, CategorySkuCount, KpiSummary,
};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::filters::{filter_by_division, filter_records, FacetOptions};
use crate::loader::DatasetCache;
use crate::ranking::{top_slow_movers, SlowMover};
use crate::schema::{
    DASHBOARD_TITLE, DEFAULT_TOP_N, LABEL_AVG_DSI, LABEL_AVG_PROFIT, LABEL_MARGIN_PCT,
    LABEL_TOTAL_SKUS, NO_DATA,
};
use crate::selection::{Division, FilterSelection};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Length of the slow movers ranking
    pub top_n: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

/// How a KPI value is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardFormat {
    Plain,
    Percent,
    Currency,
    Count,
}

/// A formatted KPI card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub format: CardFormat,
}

impl MetricCard {
    fn mean(label: &'static str, value: Option<f64>, format: CardFormat) -> Self {
        let value = match (value, format) {
            (None, _) => NO_DATA.to_string(),
            (Some(v), CardFormat::Percent) => format!("{:.1}%", v),
            (Some(v), CardFormat::Currency) => format!("${:.1}", v),
            (Some(v), _) => format!("{:.1}", v),
        };
        Self { label, value, format }
    }
}

/// Cards in display order: DSI, margin, profit, SKU count
pub fn kpi_cards(kpis: &KpiSummary) -> Vec<MetricCard> {
    vec![
        MetricCard::mean(LABEL_AVG_DSI, kpis.avg_dsi, CardFormat::Plain),
        MetricCard::mean(LABEL_MARGIN_PCT, kpis.margin_pct, CardFormat::Percent),
        MetricCard::mean(LABEL_AVG_PROFIT, kpis.avg_profit, CardFormat::Currency),
        MetricCard {
            label: LABEL_TOTAL_SKUS,
            value: kpis.total_skus.to_string(),
            format: CardFormat::Count,
        },
    ]
}

/// Everything the presentation layer needs for one render pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: &'static str,
    pub selection: FilterSelection,
    pub facet_options: FacetOptions,
    /// Rows in the working subset
    pub row_count: usize,
    pub kpis: KpiSummary,
    pub kpi_cards: Vec<MetricCard>,
    pub dsi_by_category: Vec<CategoryDsi>,
    pub sku_distribution: Vec<CategorySkuCount>,
    pub top_slow_movers: Vec<SlowMover>,
}

/// Run the full filter and aggregation pipeline for one selection
pub fn render(
    table: &DataFrame,
    selection: &FilterSelection,
    options: &RenderOptions,
) -> Result<DashboardView> {
    let division_table = filter_by_division(table, selection.division)?;
    let facet_options = FacetOptions::build(&division_table)?;
    let working = filter_records(&division_table, selection)?;

    let kpis = KpiSummary::compute(&working)?;
    let kpi_cards = kpi_cards(&kpis);

    Ok(DashboardView {
        title: DASHBOARD_TITLE,
        selection: selection.clone(),
        facet_options,
        row_count: working.height(),
        kpis,
        kpi_cards,
        dsi_by_category: dsi_by_category(&working)?,
        sku_distribution: sku_distribution_by_category(&working)?,
        top_slow_movers: top_slow_movers(&working, options.top_n)?,
    })
}

/// Facet option lists for a division, as shown before any facet is chosen
pub fn facet_options_for(table: &DataFrame, division: Division) -> Result<FacetOptions> {
    let division_table = filter_by_division(table, division)?;
    FacetOptions::build(&division_table)
}

/// Cached dataset plus render settings
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    cache: DatasetCache,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The canonical table, read from disk only on first access
    pub fn table(&mut self) -> Result<DataFrame> {
        self.cache.load_or_fetch(&self.config.data_path)
    }

    pub fn render(&mut self, selection: &FilterSelection) -> Result<DashboardView> {
        let table = self.table()?;
        let options = RenderOptions {
            top_n: self.config.top_n,
        };
        let view = render(&table, selection, &options)?;
        info!(
            "Rendered {:?}: {} rows, {} categories",
            selection,
            view.row_count,
            view.dsi_by_category.len()
        );
        Ok(view)
    }

    pub fn facet_options(&mut self, division: Division) -> Result<FacetOptions> {
        let table = self.table()?;
        facet_options_for(&table, division)
    }
}
