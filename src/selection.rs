//! Filter selection supplied by the controls on each render

use crate::error::{DashboardError, Result};
use crate::schema::ALL_SENTINEL;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Top-level business unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Division {
    #[default]
    Almacen,
    Taller,
}

impl Division {
    pub const ALL: [Division; 2] = [Division::Almacen, Division::Taller];

    /// Label as stored in the normalized `COMERCIO` column
    pub fn label(&self) -> &'static str {
        match self {
            Division::Almacen => "Almacen",
            Division::Taller => "Taller",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Division {
    type Err = DashboardError;

    /// Accepts any capitalization of the label
    fn from_str(s: &str) -> Result<Self> {
        let normalized = crate::filters::normalize_division(s.trim());
        Division::ALL
            .into_iter()
            .find(|d| d.label() == normalized)
            .ok_or_else(|| {
                DashboardError::InvalidSelection(format!(
                    "unknown division '{}', expected one of: Almacen, Taller",
                    s
                ))
            })
    }
}

// Same spellings as `FromStr`, so JSON bodies and query strings agree
impl<'de> Deserialize<'de> for Division {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Division>().map_err(serde::de::Error::custom)
    }
}

/// One facet control: either the "Todas" sentinel or a concrete value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FacetChoice {
    #[default]
    All,
    Value(String),
}

impl FacetChoice {
    pub fn value(&self) -> Option<&str> {
        match self {
            FacetChoice::All => None,
            FacetChoice::Value(v) => Some(v.as_str()),
        }
    }
}

impl From<&str> for FacetChoice {
    fn from(s: &str) -> Self {
        if s == ALL_SENTINEL || s.is_empty() {
            FacetChoice::All
        } else {
            FacetChoice::Value(s.to_string())
        }
    }
}

impl From<Option<&str>> for FacetChoice {
    fn from(s: Option<&str>) -> Self {
        s.map(FacetChoice::from).unwrap_or_default()
    }
}

impl fmt::Display for FacetChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetChoice::All => f.write_str(ALL_SENTINEL),
            FacetChoice::Value(v) => f.write_str(v),
        }
    }
}

// Serialized as the plain option string, "Todas" included
impl Serialize for FacetChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FacetChoice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(FacetChoice::from(raw.as_deref()))
    }
}

/// The full control state for one render pass
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    pub division: Division,
    #[serde(default)]
    pub category: FacetChoice,
    #[serde(default)]
    pub subcategory: FacetChoice,
    #[serde(default)]
    pub brand: FacetChoice,
}

impl FilterSelection {
    pub fn new(division: Division) -> Self {
        Self {
            division,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, choice: impl Into<FacetChoice>) -> Self {
        self.category = choice.into();
        self
    }

    pub fn with_subcategory(mut self, choice: impl Into<FacetChoice>) -> Self {
        self.subcategory = choice.into();
        self
    }

    pub fn with_brand(mut self, choice: impl Into<FacetChoice>) -> Self {
        self.brand = choice.into();
        self
    }
}
