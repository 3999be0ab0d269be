use inventory_dashboard::aggregates::{
    dsi_by_category, sku_distribution_by_category, CategoryDsi, KpiSummary,
};
use inventory_dashboard::filters::{
    facet_options, filter_by_division, filter_facet, filter_records, FacetOptions,
};
use inventory_dashboard::ranking::top_slow_movers;
use inventory_dashboard::{render, Division, FacetChoice, FilterSelection, RenderOptions};
use polars::prelude::*;
use std::collections::HashSet;

/// Mixed-case divisions, two categories sharing one SKU code
fn inventory() -> DataFrame {
    df! [
        "COMERCIO" => ["ALMACEN", "almacen", "Taller", "Almacen", "TALLER", "Almacen", "almacen", "Almacen"],
        "CATEGORIA" => ["Frenos", "Frenos", "Motor", "Filtros", "Motor", "Frenos", "Filtros", "Filtros"],
        "SUBCATEGORIA" => ["Pastillas", "Discos", "Juntas", "Aceite", "Juntas", "Pastillas", "Aire", "Aceite"],
        "MARCA" => ["Bosch", "Brembo", "Elring", "Mann", "Victor", "Bosch", "Mann", "Bosch"],
        "CODIGO" => ["F-1", "F-2", "M-1", "A-1", "M-2", "F-1", "A-2", "F-2"],
        "PRODUCTO" => ["Pastilla del.", "Disco 280", "Junta culata", "Filtro aceite", "Junta tapa", "Pastilla tras.", "Filtro aire", "Filtro X"],
        "PROMEDIO_DIAS_VENTAS" => [40.0, 90.0, 15.0, 30.0, 60.0, 40.0, 10.0, 120.0],
        "margen_bruto_%" => [25.0, 30.0, 20.0, 35.0, 22.0, 27.0, 40.0, 18.0],
        "beneficio_promedio_por_producto" => [12.5, 30.0, 8.0, 4.25, 9.0, 11.0, 3.5, 6.0]
    ]
    .unwrap()
}

fn column_strings(df: &DataFrame, name: &str) -> Vec<String> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_division_filter_keeps_matching_rows_in_order() {
    let df = inventory();
    let almacen = filter_by_division(&df, Division::Almacen).unwrap();

    assert_eq!(almacen.height(), 6);
    assert_eq!(
        column_strings(&almacen, "PRODUCTO"),
        vec!["Pastilla del.", "Disco 280", "Filtro aceite", "Pastilla tras.", "Filtro aire", "Filtro X"]
    );

    let taller = filter_by_division(&df, Division::Taller).unwrap();
    assert_eq!(column_strings(&taller, "CODIGO"), vec!["M-1", "M-2"]);

    // Input is untouched
    assert_eq!(df.height(), 8);
}

#[test]
fn test_division_filter_without_matches_is_empty() {
    let df = inventory();
    let almacen_only = filter_by_division(&df, Division::Almacen).unwrap();
    let none = filter_by_division(&almacen_only, Division::Taller).unwrap();

    assert_eq!(none.height(), 0);
    assert_eq!(none.width(), df.width());
}

#[test]
fn test_facet_options_are_sorted_distinct_with_sentinel() {
    let almacen = filter_by_division(&inventory(), Division::Almacen).unwrap();
    let options = FacetOptions::build(&almacen).unwrap();

    assert_eq!(options.categories, vec!["Todas", "Filtros", "Frenos"]);
    assert_eq!(options.subcategories, vec!["Todas", "Aceite", "Aire", "Discos", "Pastillas"]);
    assert_eq!(options.brands, vec!["Todas", "Bosch", "Brembo", "Mann"]);

    for list in [&options.categories, &options.subcategories, &options.brands] {
        let rest = &list[1..];
        let unique: HashSet<&String> = rest.iter().collect();
        assert_eq!(unique.len(), rest.len());
        assert!(rest.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_facet_options_on_empty_table() {
    let empty = inventory().head(Some(0));
    let options = FacetOptions::build(&empty).unwrap();

    assert_eq!(options.categories, vec!["Todas"]);
    assert_eq!(options.subcategories, vec!["Todas"]);
    assert_eq!(options.brands, vec!["Todas"]);
}

#[test]
fn test_record_filter_is_idempotent() {
    let df = inventory();
    let selection = FilterSelection::new(Division::Almacen)
        .with_category("Frenos")
        .with_brand("Bosch");

    let once = filter_records(&df, &selection).unwrap();
    let twice = filter_records(&once, &selection).unwrap();

    assert_eq!(once.height(), 2);
    assert!(once.equals(&twice));
}

#[test]
fn test_record_filter_order_independent() {
    let df = inventory();
    let category = FacetChoice::from("Filtros");
    let brand = FacetChoice::from("Bosch");

    let category_then_brand =
        filter_facet(&filter_facet(&df, "CATEGORIA", &category).unwrap(), "MARCA", &brand).unwrap();
    let brand_then_category =
        filter_facet(&filter_facet(&df, "MARCA", &brand).unwrap(), "CATEGORIA", &category).unwrap();

    assert!(category_then_brand.equals(&brand_then_category));
    assert_eq!(column_strings(&category_then_brand, "PRODUCTO"), vec!["Filtro X"]);
}

#[test]
fn test_subcategory_only_selection() {
    let df = inventory();
    let selection = FilterSelection::new(Division::Almacen).with_subcategory("Aceite");

    let filtered = filter_records(&df, &selection).unwrap();
    assert_eq!(filtered.height(), 2);
    assert!(column_strings(&filtered, "SUBCATEGORIA").iter().all(|s| s == "Aceite"));
    // Both brands of the subcategory stay represented
    let brands: HashSet<String> = column_strings(&filtered, "MARCA").into_iter().collect();
    assert_eq!(brands, HashSet::from(["Mann".to_string(), "Bosch".to_string()]));
}

#[test]
fn test_record_filter_unknown_value_is_empty() {
    let df = inventory();
    let selection = FilterSelection::new(Division::Almacen).with_brand("Desconocida");
    let filtered = filter_records(&df, &selection).unwrap();
    assert_eq!(filtered.height(), 0);
}

#[test]
fn test_dsi_by_category_means() {
    let df = df! [
        "CATEGORIA" => ["A", "A", "A", "B", "B", "B"],
        "CODIGO" => ["1", "2", "3", "4", "5", "6"],
        "PROMEDIO_DIAS_VENTAS" => [10.0, 20.0, 30.0, 5.0, 15.0, 25.0]
    ]
    .unwrap();

    let rows = dsi_by_category(&df).unwrap();
    assert_eq!(
        rows,
        vec![
            CategoryDsi { category: "A".to_string(), avg_dsi: Some(20.0) },
            CategoryDsi { category: "B".to_string(), avg_dsi: Some(15.0) },
        ]
    );
}

#[test]
fn test_sku_distribution_one_row_per_category() {
    let df = inventory();
    let rows = sku_distribution_by_category(&df).unwrap();

    let categories: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(categories, vec!["Filtros", "Frenos", "Motor"]);

    let counts: Vec<u64> = rows.iter().map(|r| r.sku_count).collect();
    // Frenos repeats F-1; Filtros has F-2 which Frenos also uses
    assert_eq!(counts, vec![3, 2, 2]);

    let total = KpiSummary::compute(&df).unwrap().total_skus as u64;
    let summed: u64 = counts.iter().sum();
    assert_eq!(total, 6);
    // F-2 is shared between categories, so the per-category sum exceeds the total
    assert!(summed >= total);
}

#[test]
fn test_sku_distribution_sums_to_total_when_categories_partition() {
    let df = df! [
        "CATEGORIA" => ["Frenos", "Frenos", "Motor", "Filtros", "Filtros", "Frenos"],
        "CODIGO" => ["F-1", "F-2", "M-1", "A-1", "A-2", "F-1"],
        "PROMEDIO_DIAS_VENTAS" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        "margen_bruto_%" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        "beneficio_promedio_por_producto" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
    ]
    .unwrap();

    let rows = sku_distribution_by_category(&df).unwrap();
    let counts: Vec<u64> = rows.iter().map(|r| r.sku_count).collect();
    assert_eq!(counts, vec![2, 2, 1]);

    let summed: u64 = counts.iter().sum();
    let total = KpiSummary::compute(&df).unwrap().total_skus as u64;
    assert_eq!(total, 5);
    assert_eq!(summed, total);
}

#[test]
fn test_total_skus_counts_distinct_codes() {
    let df = df! [
        "CODIGO" => ["a", "b", "c"],
        "PROMEDIO_DIAS_VENTAS" => [1.0, 2.0, 3.0],
        "margen_bruto_%" => [1.0, 2.0, 3.0],
        "beneficio_promedio_por_producto" => [1.0, 2.0, 3.0]
    ]
    .unwrap();
    assert_eq!(KpiSummary::compute(&df).unwrap().total_skus, 3);

    let extra = df! [
        "CODIGO" => ["b"],
        "PROMEDIO_DIAS_VENTAS" => [4.0],
        "margen_bruto_%" => [4.0],
        "beneficio_promedio_por_producto" => [4.0]
    ]
    .unwrap();
    let with_duplicate = df.vstack(&extra).unwrap();
    assert_eq!(with_duplicate.height(), 4);
    assert_eq!(KpiSummary::compute(&with_duplicate).unwrap().total_skus, 3);
}

#[test]
fn test_kpis_rounded_to_one_decimal() {
    let almacen = filter_by_division(&inventory(), Division::Almacen).unwrap();
    let kpis = KpiSummary::compute(&almacen).unwrap();

    // DSI: (40 + 90 + 30 + 40 + 10 + 120) / 6 = 55.0
    assert_eq!(kpis.avg_dsi, Some(55.0));
    // Margin: (25 + 30 + 35 + 27 + 40 + 18) / 6 = 29.1666..
    assert_eq!(kpis.margin_pct, Some(29.2));
    // Profit: (12.5 + 30 + 4.25 + 11 + 3.5 + 6) / 6 = 11.208..
    assert_eq!(kpis.avg_profit, Some(11.2));
    assert_eq!(kpis.total_skus, 4);
}

#[test]
fn test_ranker_sorted_descending_and_bounded() {
    let almacen = filter_by_division(&inventory(), Division::Almacen).unwrap();
    let top = top_slow_movers(&almacen, 5).unwrap();

    assert_eq!(top.len(), 5);
    let dsi: Vec<f64> = top.iter().map(|r| r.dsi.unwrap()).collect();
    assert_eq!(dsi, vec![120.0, 90.0, 40.0, 40.0, 30.0]);

    // Equal DSI keeps the original order
    assert_eq!(top[2].product_name.as_deref(), Some("Pastilla del."));
    assert_eq!(top[3].product_name.as_deref(), Some("Pastilla tras."));
    assert_eq!(top[0].brand.as_deref(), Some("Bosch"));
    assert_eq!(top[0].avg_profit, Some(6.0));
}

#[test]
fn test_ranker_short_table() {
    let taller = filter_by_division(&inventory(), Division::Taller).unwrap();
    let top = top_slow_movers(&taller, 5).unwrap();

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].product_name.as_deref(), Some("Junta tapa"));
}

#[test]
fn test_ranker_ties_preserve_order() {
    let df = df! [
        "PRODUCTO" => ["a", "b", "c", "d", "e", "f", "g"],
        "MARCA" => ["m", "m", "m", "m", "m", "m", "m"],
        "PROMEDIO_DIAS_VENTAS" => [5.0, 7.0, 5.0, 7.0, 5.0, 1.0, 7.0],
        "beneficio_promedio_por_producto" => [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
    ]
    .unwrap();

    let names: Vec<String> = top_slow_movers(&df, 5)
        .unwrap()
        .into_iter()
        .filter_map(|r| r.product_name)
        .collect();
    assert_eq!(names, vec!["b", "d", "g", "a", "c"]);
}

#[test]
fn test_empty_working_subset() {
    let empty = inventory().head(Some(0));

    let kpis = KpiSummary::compute(&empty).unwrap();
    assert_eq!(kpis.avg_dsi, None);
    assert_eq!(kpis.margin_pct, None);
    assert_eq!(kpis.avg_profit, None);
    assert_eq!(kpis.total_skus, 0);

    assert!(top_slow_movers(&empty, 5).unwrap().is_empty());
    assert!(dsi_by_category(&empty).unwrap().is_empty());
    assert!(sku_distribution_by_category(&empty).unwrap().is_empty());
}

#[test]
fn test_render_full_pipeline() {
    let df = inventory();
    let selection = FilterSelection::new(Division::Almacen).with_category("Filtros");

    let view = render(&df, &selection, &RenderOptions::default()).unwrap();

    // Facet options come from the division, not from the facet selection
    assert_eq!(view.facet_options.categories, vec!["Todas", "Filtros", "Frenos"]);
    assert_eq!(view.row_count, 3);
    assert_eq!(view.kpis.avg_dsi, Some(53.3));
    assert_eq!(view.kpis.total_skus, 3);
    assert_eq!(view.dsi_by_category.len(), 1);
    assert_eq!(view.sku_distribution[0].sku_count, 3);
    assert_eq!(view.top_slow_movers.len(), 3);
    assert_eq!(view.kpi_cards[0].value, "53.3");
    assert_eq!(view.kpi_cards[1].value, "31.0%");
}

#[test]
fn test_render_empty_selection_does_not_fail() {
    let df = inventory();
    let selection = FilterSelection::new(Division::Taller).with_category("Frenos");

    let view = render(&df, &selection, &RenderOptions { top_n: 5 }).unwrap();
    assert_eq!(view.row_count, 0);
    assert!(view.top_slow_movers.is_empty());
    assert!(view.dsi_by_category.is_empty());
    assert_eq!(view.kpi_cards[0].value, "N/D");
    assert_eq!(view.kpi_cards[3].value, "0");

    let json = serde_json::to_value(&view).unwrap();
    assert!(json["kpis"]["avg_dsi"].is_null());
}

#[test]
fn test_facet_options_helper_matches_builder() {
    let almacen = filter_by_division(&inventory(), Division::Almacen).unwrap();
    assert_eq!(
        facet_options(&almacen, "MARCA").unwrap(),
        FacetOptions::build(&almacen).unwrap().brands
    );
}
