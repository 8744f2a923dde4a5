//! School record data structures.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// School types the remote API is known to emit.
///
/// The list is informational: the remote source is authoritative and new
/// values are accepted as-is.
pub const KNOWN_SCHOOL_TYPES: &[&str] = &[
    "Public",
    "Private",
    "International",
    "Community",
    "Religious",
];

/// Gender admission modes the remote API is known to emit.
pub const KNOWN_GENDER_MODES: &[&str] = &["co-ed", "boys", "girls"];

/// A school in the directory, as served by the remote API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRecord {
    /// Opaque identifier, unique within a collection
    #[serde(alias = "_id")]
    pub id: String,

    /// Display name
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub website: String,

    #[serde(default)]
    pub description: String,

    /// Open enumeration, see [`KNOWN_SCHOOL_TYPES`]
    #[serde(default)]
    pub school_type: String,

    /// Division / grade-band tags (e.g. "KG", "Primary")
    #[serde(default)]
    pub divisions: Vec<String>,

    /// Free-form descriptive tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Open enumeration, see [`KNOWN_GENDER_MODES`]
    #[serde(default)]
    pub gender: String,

    #[serde(default, alias = "address")]
    pub addresses: Vec<Address>,

    #[serde(default)]
    pub facilities: Vec<Facility>,

    #[serde(default)]
    pub student_count: u32,

    /// Zero when unknown
    #[serde(default)]
    pub year_established: i32,

    #[serde(default)]
    pub budget_min: f64,

    #[serde(default)]
    pub budget_max: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A physical location of a school.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub sub_city: String,
}

impl Address {
    pub fn new(city: impl Into<String>, sub_city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            sub_city: sub_city.into(),
        }
    }
}

/// A facility listing (library, lab, pool, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Facility {
    pub name: String,

    /// Image references (URLs or upload keys)
    #[serde(default)]
    pub images: Vec<String>,
}

impl SchoolRecord {
    /// Sub-city of the first address, or `""`.
    pub fn primary_sub_city(&self) -> &str {
        self.addresses
            .first()
            .map(|a| a.sub_city.as_str())
            .unwrap_or("")
    }

    /// First descriptive tag, or `""`.
    pub fn primary_tag(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or("")
    }

    /// Every address sub-city of this school.
    pub fn sub_cities(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(|a| a.sub_city.as_str())
    }

    /// Whether the school type is one of [`KNOWN_SCHOOL_TYPES`].
    pub fn has_known_type(&self) -> bool {
        KNOWN_SCHOOL_TYPES
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&self.school_type))
    }

    /// Check the record invariants.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::validation("school id is empty"));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::validation(format!(
                "school {} has an empty name",
                self.id
            )));
        }
        if self.addresses.is_empty() {
            return Err(AppError::validation(format!(
                "school {} has no address",
                self.id
            )));
        }
        if self.budget_min < 0.0 || self.budget_max < 0.0 {
            return Err(AppError::validation(format!(
                "school {} has a negative budget",
                self.id
            )));
        }
        if self.budget_min > self.budget_max {
            return Err(AppError::validation(format!(
                "school {} budget_min {} exceeds budget_max {}",
                self.id, self.budget_min, self.budget_max
            )));
        }
        let next_year = Utc::now().year() + 1;
        if self.year_established != 0 && !(1800..=next_year).contains(&self.year_established) {
            return Err(AppError::validation(format!(
                "school {} has implausible year_established {}",
                self.id, self.year_established
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_school() -> SchoolRecord {
        SchoolRecord {
            id: "s1".to_string(),
            name: "Bole Academy".to_string(),
            school_type: "Private".to_string(),
            tags: vec!["STEM".to_string(), "Bilingual".to_string()],
            addresses: vec![Address::new("Addis Ababa", "Bole")],
            year_established: 1998,
            budget_min: 10_000.0,
            budget_max: 25_000.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_deserialize_remote_shape() {
        let json = r#"{
            "_id": "64f0c1",
            "name": "Yeka International",
            "schoolType": "International",
            "address": [{"city": "Addis Ababa", "subCity": "Yeka"}],
            "facilities": [{"name": "Library", "images": ["lib.jpg"]}],
            "studentCount": 420,
            "budgetMin": 30000,
            "budgetMax": 60000,
            "createdAt": "2024-03-01T08:00:00Z"
        }"#;

        let school: SchoolRecord = serde_json::from_str(json).unwrap();
        assert_eq!(school.id, "64f0c1");
        assert_eq!(school.primary_sub_city(), "Yeka");
        assert_eq!(school.facilities[0].images, vec!["lib.jpg"]);
        assert_eq!(school.student_count, 420);
        assert_eq!(school.budget_max, 60000.0);
        assert!(school.created_at.is_some());
        assert!(school.tags.is_empty());
    }

    #[test]
    fn test_missing_numbers_default_to_zero() {
        let school: SchoolRecord = serde_json::from_str(r#"{"id": "x", "name": "X"}"#).unwrap();
        assert_eq!(school.budget_min, 0.0);
        assert_eq!(school.year_established, 0);
        assert_eq!(school.primary_tag(), "");
    }

    #[test]
    fn test_unknown_type_is_accepted() {
        let mut school = sample_school();
        school.school_type = "Montessori".to_string();
        assert!(!school.has_known_type());
        assert!(school.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_budget() {
        let mut school = sample_school();
        school.budget_min = 30_000.0;
        assert!(school.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_address() {
        let mut school = sample_school();
        school.addresses.clear();
        assert!(school.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_implausible_year() {
        let mut school = sample_school();
        school.year_established = 1066;
        assert!(school.validate().is_err());
    }
}
