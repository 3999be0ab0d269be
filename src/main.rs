use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use inventory_dashboard::charts::{dsi_bar_chart, sku_donut_chart};
use inventory_dashboard::config::DashboardConfig;
use inventory_dashboard::observability::init_tracing;
use inventory_dashboard::report::{render_facets, render_text};
use inventory_dashboard::{Dashboard, Division, FacetChoice, FilterSelection};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "inventory-dashboard")]
#[command(about = "Inventory and sales dashboard over a spreadsheet dataset")]
struct Args {
    /// Source file (.xlsx, .csv or .parquet); defaults to DASHBOARD_DATA_PATH or Data_Dashboard.xlsx
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Division: Almacen or Taller (any capitalization)
    #[arg(long, default_value = "Almacen")]
    division: String,

    /// Category filter ("Todas" for all)
    #[arg(long, default_value = "Todas")]
    category: String,

    /// Subcategory filter ("Todas" for all)
    #[arg(long, default_value = "Todas")]
    subcategory: String,

    /// Brand filter ("Todas" for all)
    #[arg(long, default_value = "Todas")]
    brand: String,

    /// Rows in the slow movers ranking
    #[arg(long)]
    top_n: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Only print the facet options of the division
    #[arg(long)]
    facets: bool,

    /// Also write the Vega-Lite chart specs into this directory
    #[arg(long)]
    charts_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let args = Args::parse();

    let config = DashboardConfig::from_env()
        .context("Failed to read configuration")?
        .with_overrides(args.data.clone(), args.top_n, None)
        .context("Invalid command line option")?;

    info!("Dataset: {}", config.data_path.display());

    let division: Division = args.division.parse()?;
    let mut dashboard = Dashboard::new(config);

    if args.facets {
        let options = dashboard
            .facet_options(division)
            .context("Failed to load dataset")?;
        match args.format {
            OutputFormat::Text => print!("{}", render_facets(&options)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
        }
        return Ok(());
    }

    let selection = FilterSelection {
        division,
        category: FacetChoice::from(args.category.as_str()),
        subcategory: FacetChoice::from(args.subcategory.as_str()),
        brand: FacetChoice::from(args.brand.as_str()),
    };

    let view = dashboard
        .render(&selection)
        .context("Failed to render dashboard")?;

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&view, chrono::Utc::now())),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }

    if let Some(dir) = args.charts_dir {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let charts = [
            ("dsi_by_category.vl.json", dsi_bar_chart(&view.dsi_by_category)?),
            ("sku_distribution.vl.json", sku_donut_chart(&view.sku_distribution)?),
        ];
        for (name, spec) in charts {
            let path = dir.join(name);
            std::fs::write(&path, serde_json::to_string_pretty(&spec)?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
    }

    Ok(())
}
