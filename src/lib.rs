//! Inventory and sales dashboard
//!
//! Loads an inventory spreadsheet, narrows it by division and three facet
//! filters, and derives KPIs, per-category aggregates and a slow movers
//! ranking for display.

pub mod aggregates;
pub mod api;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filters;
pub mod loader;
pub mod observability;
pub mod ranking;
pub mod report;
pub mod schema;
pub mod selection;

pub use dashboard::{render, Dashboard, DashboardView, RenderOptions};
pub use error::{DashboardError, Result};
pub use selection::{Division, FacetChoice, FilterSelection};
