//! Query criteria for the school directory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A single-valued category selection with an "all" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Whether `value` passes this selection.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Only(trimmed.to_string())
        }
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        Selection::from(value.as_str())
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "all"),
            Selection::Only(value) => write!(f, "{value}"),
        }
    }
}

/// Inclusive budget bounds. A school matches when its own range lies inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

impl BudgetRange {
    /// Build a validated range.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if min.is_nan() || max.is_nan() {
            return Err(AppError::validation("budget bounds must be numbers"));
        }
        if min < 0.0 || max < 0.0 {
            return Err(AppError::validation("budget bounds must be non-negative"));
        }
        if min > max {
            return Err(AppError::validation(format!(
                "budget minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Containment test: `min <= lo && hi <= max`.
    pub fn contains(&self, lo: f64, hi: f64) -> bool {
        self.min <= lo && hi <= self.max
    }
}

/// Unbounded in both directions.
impl Default for BudgetRange {
    fn default() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }
}

/// The active local filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryFilterCriteria {
    /// Free-text query; blank means no text filtering
    pub search: String,
    pub school_type: Selection,
    pub location: Selection,
    pub budget: BudgetRange,
}

impl DirectoryFilterCriteria {
    /// Lowercased query, or `None` when blank.
    pub fn normalized_query(&self) -> Option<String> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }
}

/// Fields the directory can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    SubCity,
    Tag,
    BudgetMin,
    BudgetMax,
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "subcity" | "sub-city" | "sub_city" | "location" => Ok(SortField::SubCity),
            "tag" | "tags" => Ok(SortField::Tag),
            "budget-min" | "budgetmin" | "budget_min" => Ok(SortField::BudgetMin),
            "budget-max" | "budgetmax" | "budget_max" => Ok(SortField::BudgetMax),
            other => Err(AppError::validation(format!("unknown sort field '{other}'"))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::Name => "name",
            SortField::SubCity => "sub-city",
            SortField::Tag => "tag",
            SortField::BudgetMin => "budget-min",
            SortField::BudgetMax => "budget-max",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(AppError::validation(format!(
                "unknown sort direction '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortCriteria {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Body of the server-side filter request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFilterCriteria {
    pub address: RemoteAddressFilter,
    pub budget_min: f64,
    pub budget_max: f64,
    pub school_type: Vec<String>,
    pub google_ratings: f64,
    pub gender: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAddressFilter {
    pub city: String,
    pub sub_city: String,
}
