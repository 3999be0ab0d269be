//! Dashboard configuration
//!
//! Defaults, overridden by `DASHBOARD_*` environment variables (a `.env`
//! file is honoured by the binaries), overridden again by explicit flags.

use crate::error::{DashboardError, Result};
use crate::schema::{DEFAULT_DATA_PATH, DEFAULT_TOP_N};
use std::path::PathBuf;

pub const ENV_DATA_PATH: &str = "DASHBOARD_DATA_PATH";
pub const ENV_TOP_N: &str = "DASHBOARD_TOP_N";
pub const ENV_BIND_ADDR: &str = "DASHBOARD_BIND_ADDR";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Source spreadsheet (`.xlsx`, `.csv` or `.parquet`)
    pub data_path: PathBuf,
    /// Length of the slow movers ranking
    pub top_n: usize,
    /// Listen address of the HTTP server
    pub bind_addr: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_n: DEFAULT_TOP_N,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATA_PATH).filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_TOP_N) {
            config.top_n = parse_top_n(&raw)?;
        }
        if let Some(addr) = lookup(ENV_BIND_ADDR).filter(|a| !a.trim().is_empty()) {
            config.bind_addr = addr;
        }

        Ok(config)
    }

    /// Apply explicit overrides (CLI flags) on top of the loaded values
    pub fn with_overrides(
        mut self,
        data_path: Option<PathBuf>,
        top_n: Option<usize>,
        bind_addr: Option<String>,
    ) -> Result<Self> {
        if let Some(path) = data_path {
            self.data_path = path;
        }
        if let Some(n) = top_n {
            if n == 0 {
                return Err(DashboardError::Config("top_n must be at least 1".to_string()));
            }
            self.top_n = n;
        }
        if let Some(addr) = bind_addr {
            self.bind_addr = addr;
        }
        Ok(self)
    }
}

fn parse_top_n(raw: &str) -> Result<usize> {
    let n: usize = raw.trim().parse().map_err(|_| {
        DashboardError::Config(format!("{} must be a positive integer, got '{}'", ENV_TOP_N, raw))
    })?;
    if n == 0 {
        return Err(DashboardError::Config(format!("{} must be at least 1", ENV_TOP_N)));
    }
    Ok(n)
}
