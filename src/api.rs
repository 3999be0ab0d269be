//! HTTP routing over the render pipeline
//!
//! `route` maps a request line and body to a JSON response without touching
//! sockets; the server binary owns the connection handling.

use crate::charts::{dsi_bar_chart, sku_donut_chart};
use crate::dashboard::Dashboard;
use crate::error::{DashboardError, Result};
use crate::selection::{Division, FacetChoice, FilterSelection};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn json(status: u16, value: &Value) -> Self {
        Self {
            status,
            body: value.to_string(),
        }
    }

    pub fn status_text(&self) -> &'static str {
        match self.status {
            200 => "OK",
            204 => "No Content",
            400 => "Bad Request",
            404 => "Not Found",
            408 => "Request Timeout",
            _ => "Internal Server Error",
        }
    }

    /// Serialize as an HTTP/1.1 response
    pub fn to_http(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: application/json\r\n\
             Access-Control-Allow-Origin: *\r\n\
             Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
             Access-Control-Allow-Headers: Content-Type\r\n\
             Content-Length: {}\r\n\
             \r\n\
             {}",
            self.status,
            self.status_text(),
            self.body.len(),
            self.body
        )
    }
}

impl From<DashboardError> for ApiResponse {
    fn from(err: DashboardError) -> Self {
        let status = if err.is_load_failure() {
            error!("Request failed: {}", err);
            500
        } else {
            400
        };
        ApiResponse::json(status, &json!({ "error": err.to_string() }))
    }
}

/// Split `path?query` and decode the query into a map
pub fn parse_target(target: &str) -> (String, HashMap<String, String>) {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    let mut path = path.trim_end_matches('/').to_string();
    if path.is_empty() {
        path = "/".to_string();
    }

    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect();

    (path, params)
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.replace('+', " "))
}

/// Build a selection from query parameters; the division defaults to the
/// first option when absent
pub fn selection_from_params(params: &HashMap<String, String>) -> Result<FilterSelection> {
    let division = match params.get("division") {
        Some(raw) => raw.parse::<Division>()?,
        None => Division::default(),
    };

    Ok(FilterSelection {
        division,
        category: FacetChoice::from(params.get("category").map(String::as_str)),
        subcategory: FacetChoice::from(params.get("subcategory").map(String::as_str)),
        brand: FacetChoice::from(params.get("brand").map(String::as_str)),
    })
}

pub fn route(dashboard: &mut Dashboard, method: &str, target: &str, body: &str) -> ApiResponse {
    let (path, params) = parse_target(target);
    debug!("Request: {} {}", method, path);

    match handle(dashboard, method, &path, &params, body) {
        Ok(response) => response,
        Err(err) => ApiResponse::from(err),
    }
}

fn handle(
    dashboard: &mut Dashboard,
    method: &str,
    path: &str,
    params: &HashMap<String, String>,
    body: &str,
) -> Result<ApiResponse> {
    let response = match (method, path) {
        ("OPTIONS", _) => ApiResponse {
            status: 204,
            body: String::new(),
        },
        ("GET", "/api/health") => ApiResponse::json(200, &json!({ "status": "ok" })),
        ("GET", "/api/divisions") => {
            let divisions: Vec<&str> = Division::ALL.iter().map(|d| d.label()).collect();
            ApiResponse::json(200, &json!({ "divisions": divisions }))
        }
        ("GET", "/api/facets") => {
            let selection = selection_from_params(params)?;
            let options = dashboard.facet_options(selection.division)?;
            ApiResponse::json(200, &serde_json::to_value(&options)?)
        }
        ("GET", "/api/dashboard") => {
            let selection = selection_from_params(params)?;
            let view = dashboard.render(&selection)?;
            ApiResponse::json(200, &serde_json::to_value(&view)?)
        }
        ("POST", "/api/dashboard") => {
            let selection: FilterSelection = serde_json::from_str(body.trim())?;
            let view = dashboard.render(&selection)?;
            ApiResponse::json(200, &serde_json::to_value(&view)?)
        }
        ("GET", "/api/charts/dsi") => {
            let selection = selection_from_params(params)?;
            let view = dashboard.render(&selection)?;
            ApiResponse::json(200, &dsi_bar_chart(&view.dsi_by_category)?)
        }
        ("GET", "/api/charts/skus") => {
            let selection = selection_from_params(params)?;
            let view = dashboard.render(&selection)?;
            ApiResponse::json(200, &sku_donut_chart(&view.sku_distribution)?)
        }
        _ => ApiResponse::json(
            404,
            &json!({ "error": format!("no route for {} {}", method, path) }),
        ),
    };

    Ok(response)
}
