//! Column names and display labels of the inventory dataset
//!
//! Header names follow the spreadsheet convention used by the source
//! workbook; display labels are the Spanish captions shown on the dashboard.

/// Top-level business unit (`Almacen` / `Taller`)
pub const DIVISION: &str = "COMERCIO";
pub const CATEGORY: &str = "CATEGORIA";
pub const SUBCATEGORY: &str = "SUBCATEGORIA";
pub const BRAND: &str = "MARCA";
/// SKU identifier, the unit of distinct counts
pub const CODE: &str = "CODIGO";
pub const PRODUCT_NAME: &str = "PRODUCTO";
/// Days-of-sales indicator (DSI)
pub const AVG_DAYS_OF_SALES: &str = "PROMEDIO_DIAS_VENTAS";
pub const GROSS_MARGIN_PCT: &str = "margen_bruto_%";
pub const AVG_PROFIT_PER_PRODUCT: &str = "beneficio_promedio_por_producto";

/// Columns conformed to `String` after loading.
pub const TEXT_COLUMNS: [&str; 6] = [DIVISION, CATEGORY, SUBCATEGORY, BRAND, CODE, PRODUCT_NAME];

/// Columns conformed to `Float64` after loading.
pub const METRIC_COLUMNS: [&str; 3] = [AVG_DAYS_OF_SALES, GROSS_MARGIN_PCT, AVG_PROFIT_PER_PRODUCT];

/// Every column a source file must provide.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    TEXT_COLUMNS.into_iter().chain(METRIC_COLUMNS)
}

/// Synthetic "all values" option prepended to every facet list
pub const ALL_SENTINEL: &str = "Todas";

/// Placeholder shown on a KPI card when its mean is undefined
pub const NO_DATA: &str = "N/D";

pub const DASHBOARD_TITLE: &str = "Dashboard de Inventario y Ventas";
pub const TOP_SLOW_MOVERS_TITLE: &str = "Top Slow Movers";

// KPI card captions
pub const LABEL_AVG_DSI: &str = "DSI Promedio";
pub const LABEL_MARGIN_PCT: &str = "Margen Bruto %";
pub const LABEL_AVG_PROFIT: &str = "Beneficio Neto Promedio";
pub const LABEL_TOTAL_SKUS: &str = "Total SKUs";

// Grouped aggregate fields
pub const FIELD_DSI_MEAN: &str = "DSI Promedio";
pub const FIELD_SKU_COUNT: &str = "Conteo_SKU";

// Ranked table fields
pub const FIELD_DSI: &str = "DSI";
pub const FIELD_AVG_PROFIT: &str = "BENEFICIO PROMEDIO";

// Facet captions
pub const LABEL_DIVISION: &str = "División";
pub const LABEL_CATEGORY: &str = "Categoría";
pub const LABEL_SUBCATEGORY: &str = "Subcategoría";
pub const LABEL_BRAND: &str = "Marca";

/// Default length of the slow movers ranking
pub const DEFAULT_TOP_N: usize = 5;

/// Default dataset location, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "Data_Dashboard.xlsx";
