// src/pipeline/filter.rs

//! Filter engine.
//!
//! Predicates AND together:
//! 1. text: query found in name, description, or any sub-city (skipped when blank)
//! 2. school type equality (skipped for "all")
//! 3. location equality against any address sub-city (skipped for "all")
//! 4. budget containment (always applied)

use crate::models::{DirectoryFilterCriteria, SchoolRecord};

/// Return the records matching `criteria`, preserving input order.
pub fn filter(schools: &[SchoolRecord], criteria: &DirectoryFilterCriteria) -> Vec<SchoolRecord> {
    let query = criteria.normalized_query();
    schools
        .iter()
        .filter(|school| matches_with_query(school, criteria, query.as_deref()))
        .cloned()
        .collect()
}

/// Whether a single record passes `criteria`.
pub fn matches(school: &SchoolRecord, criteria: &DirectoryFilterCriteria) -> bool {
    let query = criteria.normalized_query();
    matches_with_query(school, criteria, query.as_deref())
}

fn matches_with_query(
    school: &SchoolRecord,
    criteria: &DirectoryFilterCriteria,
    query: Option<&str>,
) -> bool {
    if let Some(query) = query {
        if !matches_text(school, query) {
            return false;
        }
    }

    if !criteria.school_type.accepts(&school.school_type) {
        return false;
    }

    if !criteria.location.is_all() && !school.sub_cities().any(|sc| criteria.location.accepts(sc)) {
        return false;
    }

    criteria.budget.contains(school.budget_min, school.budget_max)
}

/// `query` must already be lowercased.
fn matches_text(school: &SchoolRecord, query: &str) -> bool {
    school.name.to_lowercase().contains(query)
        || school.description.to_lowercase().contains(query)
        || school
            .sub_cities()
            .any(|sc| sc.to_lowercase().contains(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetRange, Selection};
    use crate::pipeline::fixtures::{names, school, trio};

    fn criteria() -> DirectoryFilterCriteria {
        DirectoryFilterCriteria::default()
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let c = DirectoryFilterCriteria {
            search: "school".to_string(),
            ..criteria()
        };
        assert_eq!(names(&filter(&trio(), &c)), vec!["Zebra School", "Mid School"]);
    }

    #[test]
    fn test_search_matches_description_and_sub_city() {
        let mut schools = trio();
        schools[1].description = "Bilingual campus near the airport".to_string();

        let by_description = DirectoryFilterCriteria {
            search: "AIRPORT".to_string(),
            ..criteria()
        };
        assert_eq!(names(&filter(&schools, &by_description)), vec!["Alpha Academy"]);

        let by_sub_city = DirectoryFilterCriteria {
            search: "yek".to_string(),
            ..criteria()
        };
        assert_eq!(names(&filter(&schools, &by_sub_city)), vec!["Alpha Academy"]);
    }

    #[test]
    fn test_empty_query_is_noop() {
        let schools = trio();
        let typed = DirectoryFilterCriteria {
            school_type: Selection::from("Public"),
            ..criteria()
        };
        let typed_blank_query = DirectoryFilterCriteria {
            search: "  ".to_string(),
            ..typed.clone()
        };
        assert_eq!(filter(&schools, &typed), filter(&schools, &typed_blank_query));
        assert_eq!(filter(&schools, &criteria()).len(), schools.len());
    }

    #[test]
    fn test_type_and_location() {
        let mut schools = trio();
        schools.push(school("s4", "Kirkos Prep", "Public", "Kirkos", (0.0, 100.0)));

        let c = DirectoryFilterCriteria {
            school_type: Selection::from("Public"),
            location: Selection::from("Bole"),
            ..criteria()
        };
        assert_eq!(names(&filter(&schools, &c)), vec!["Zebra School", "Mid School"]);
    }

    #[test]
    fn test_location_matches_any_address() {
        let mut schools = trio();
        schools[1]
            .addresses
            .push(crate::models::Address::new("Addis Ababa", "Bole"));

        let c = DirectoryFilterCriteria {
            location: Selection::from("Bole"),
            ..criteria()
        };
        assert_eq!(filter(&schools, &c).len(), 3);
    }

    #[test]
    fn test_budget_containment() {
        let c = DirectoryFilterCriteria {
            budget: BudgetRange::new(0.0, 1800.0).unwrap(),
            ..criteria()
        };
        assert_eq!(names(&filter(&trio(), &c)), vec!["Alpha Academy"]);
    }

    #[test]
    fn test_budget_bounds_inclusive() {
        let c = DirectoryFilterCriteria {
            budget: BudgetRange::new(1000.0, 2000.0).unwrap(),
            ..criteria()
        };
        assert_eq!(names(&filter(&trio(), &c)), vec!["Zebra School"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let c = DirectoryFilterCriteria {
            search: "o".to_string(),
            school_type: Selection::from("Public"),
            ..criteria()
        };
        let once = filter(&trio(), &c);
        let twice = filter(&once, &c);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_matches_single_record() {
        let schools = trio();
        let c = DirectoryFilterCriteria {
            school_type: Selection::from("Private"),
            ..criteria()
        };
        assert!(!matches(&schools[0], &c));
        assert!(matches(&schools[1], &c));
    }
}
