// src/services/fallback.rs

//! Bundled fallback dataset.
//!
//! Served when the remote API is unreachable or returns a malformed payload,
//! so the directory is never empty.

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Address, Facility, RemoteFilterCriteria, SchoolRecord};
use crate::services::SchoolSource;

struct Seed {
    id: &'static str,
    name: &'static str,
    school_type: &'static str,
    sub_city: &'static str,
    gender: &'static str,
    divisions: &'static [&'static str],
    tags: &'static [&'static str],
    facilities: &'static [&'static str],
    student_count: u32,
    year_established: i32,
    budget: (f64, f64),
    description: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "fallback-bole-international",
        name: "Bole International Academy",
        school_type: "International",
        sub_city: "Bole",
        gender: "co-ed",
        divisions: &["KG", "Primary", "Secondary"],
        tags: &["IB", "Bilingual"],
        facilities: &["Library", "Science Lab", "Swimming Pool"],
        student_count: 860,
        year_established: 2004,
        budget: (90_000.0, 180_000.0),
        description: "IB continuum school close to the airport with boarding options.",
    },
    Seed {
        id: "fallback-yeka-community",
        name: "Yeka Community School",
        school_type: "Community",
        sub_city: "Yeka",
        gender: "co-ed",
        divisions: &["Primary"],
        tags: &["Affordable", "Arts"],
        facilities: &["Library", "Playground"],
        student_count: 540,
        year_established: 1989,
        budget: (3_000.0, 8_000.0),
        description: "Neighbourhood primary school run with parent committees.",
    },
    Seed {
        id: "fallback-kirkos-prep",
        name: "Kirkos Preparatory School",
        school_type: "Private",
        sub_city: "Kirkos",
        gender: "co-ed",
        divisions: &["Secondary", "Preparatory"],
        tags: &["STEM", "Exam Prep"],
        facilities: &["Computer Lab", "Science Lab"],
        student_count: 720,
        year_established: 1997,
        budget: (25_000.0, 45_000.0),
        description: "Preparatory school with a strong national exam record.",
    },
    Seed {
        id: "fallback-arada-public",
        name: "Arada Public Primary",
        school_type: "Public",
        sub_city: "Arada",
        gender: "co-ed",
        divisions: &["KG", "Primary"],
        tags: &["Affordable"],
        facilities: &["Library"],
        student_count: 1_150,
        year_established: 1962,
        budget: (0.0, 1_500.0),
        description: "Historic government school near Piazza.",
    },
    Seed {
        id: "fallback-lideta-girls",
        name: "Lideta Girls Secondary",
        school_type: "Religious",
        sub_city: "Lideta",
        gender: "girls",
        divisions: &["Secondary"],
        tags: &["Leadership", "Sports"],
        facilities: &["Chapel", "Basketball Court", "Library"],
        student_count: 480,
        year_established: 1975,
        budget: (12_000.0, 20_000.0),
        description: "Faith-based secondary school for girls with a leadership program.",
    },
    Seed {
        id: "fallback-nifas-silk-stem",
        name: "Nifas Silk STEM Academy",
        school_type: "Private",
        sub_city: "Nifas Silk-Lafto",
        gender: "co-ed",
        divisions: &["Primary", "Secondary"],
        tags: &["STEM", "Robotics"],
        facilities: &["Robotics Lab", "Computer Lab", "Football Field"],
        student_count: 630,
        year_established: 2012,
        budget: (30_000.0, 55_000.0),
        description: "Project-based STEM curriculum from grade 1.",
    },
    Seed {
        id: "fallback-bole-montessori",
        name: "Bole Montessori House",
        school_type: "Private",
        sub_city: "Bole",
        gender: "co-ed",
        divisions: &["KG"],
        tags: &["Montessori", "Early Years"],
        facilities: &["Garden", "Playground"],
        student_count: 140,
        year_established: 2016,
        budget: (40_000.0, 70_000.0),
        description: "Small Montessori kindergarten with mixed-age classrooms.",
    },
    Seed {
        id: "fallback-kolfe-boys",
        name: "Kolfe Keranio Boys School",
        school_type: "Public",
        sub_city: "Kolfe Keranio",
        gender: "boys",
        divisions: &["Secondary"],
        tags: &["Sports", "Technical"],
        facilities: &["Workshop", "Football Field"],
        student_count: 990,
        year_established: 1981,
        budget: (0.0, 2_000.0),
        description: "Government secondary school with technical and vocational tracks.",
    },
];

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Seed {
    fn record(&self) -> SchoolRecord {
        let slug = self.id.trim_start_matches("fallback-");
        SchoolRecord {
            id: self.id.to_string(),
            name: self.name.to_string(),
            email: format!("info@{slug}.edu.et"),
            phone: "+251 11 000 0000".to_string(),
            website: format!("https://{slug}.edu.et"),
            description: self.description.to_string(),
            school_type: self.school_type.to_string(),
            divisions: to_strings(self.divisions),
            tags: to_strings(self.tags),
            gender: self.gender.to_string(),
            addresses: vec![Address::new("Addis Ababa", self.sub_city)],
            facilities: self
                .facilities
                .iter()
                .map(|name| Facility {
                    name: name.to_string(),
                    images: Vec::new(),
                })
                .collect(),
            student_count: self.student_count,
            year_established: self.year_established,
            budget_min: self.budget.0,
            budget_max: self.budget.1,
            created_at: None,
            updated_at: None,
        }
    }
}

/// The full fallback collection.
pub fn schools() -> Vec<SchoolRecord> {
    SEEDS.iter().map(Seed::record).collect()
}

/// Look up a fallback record by id.
pub fn find(id: &str) -> Option<SchoolRecord> {
    SEEDS.iter().find(|s| s.id == id).map(Seed::record)
}

/// [`SchoolSource`] serving only the bundled dataset, for offline sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSource;

#[async_trait]
impl SchoolSource for FallbackSource {
    async fn fetch_all(&self) -> Result<Vec<SchoolRecord>> {
        Ok(schools())
    }

    async fn fetch_by_id(&self, id: &str) -> Result<SchoolRecord> {
        find(id).ok_or_else(|| AppError::not_found(format!("school {id}")))
    }

    async fn filter(&self, _criteria: &RemoteFilterCriteria) -> Result<Vec<SchoolRecord>> {
        Err(AppError::config("server-side filtering is unavailable offline"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fallback_is_non_empty_and_valid() {
        let schools = schools();
        assert!(!schools.is_empty());
        for school in &schools {
            school.validate().unwrap();
        }
    }

    #[test]
    fn test_records_carry_seed_facilities() {
        for (seed, school) in SEEDS.iter().zip(schools()) {
            let names: Vec<&str> = school.facilities.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names, seed.facilities);
        }
    }

    #[test]
    fn test_fallback_ids_unique() {
        let ids: HashSet<_> = SEEDS.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), SEEDS.len());
    }

    #[test]
    fn test_fallback_spans_several_sub_cities() {
        let sub_cities: HashSet<_> = SEEDS.iter().map(|s| s.sub_city).collect();
        assert!(sub_cities.len() >= 5);
    }

    #[test]
    fn test_find() {
        let school = find("fallback-kirkos-prep").unwrap();
        assert_eq!(school.primary_sub_city(), "Kirkos");
        assert!(find("nope").is_none());
    }

    #[tokio::test]
    async fn test_fallback_source() {
        let source = FallbackSource;
        assert_eq!(source.fetch_all().await.unwrap().len(), SEEDS.len());
        assert!(
            source
                .fetch_by_id("missing")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            source
                .filter(&RemoteFilterCriteria::default())
                .await
                .is_err()
        );
    }
}
