// src/pipeline/sort.rs

//! Normalization & sort engine.
//!
//! String fields compare case-insensitively, numeric fields numerically.
//! Records with equal keys keep their input order in both directions.

use std::cmp::Ordering;

use crate::models::{SchoolRecord, SortDirection, SortField};

/// Return a sorted copy of `schools`.
pub fn sort(schools: &[SchoolRecord], field: SortField, direction: SortDirection) -> Vec<SchoolRecord> {
    let mut sorted = schools.to_vec();
    sort_in_place(&mut sorted, field, direction);
    sorted
}

/// Stable in-place sort.
pub fn sort_in_place(schools: &mut [SchoolRecord], field: SortField, direction: SortDirection) {
    // `sort_by` is stable; descending flips the comparator, not the output,
    // so equal keys never swap.
    schools.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &SchoolRecord, b: &SchoolRecord, field: SortField) -> Ordering {
    match field {
        SortField::Name => compare_text(&a.name, &b.name),
        SortField::SubCity => compare_text(a.primary_sub_city(), b.primary_sub_city()),
        SortField::Tag => compare_text(a.primary_tag(), b.primary_tag()),
        SortField::BudgetMin => a.budget_min.total_cmp(&b.budget_min),
        SortField::BudgetMax => a.budget_max.total_cmp(&b.budget_max),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
