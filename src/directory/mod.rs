// src/directory/mod.rs

//! School directory state machine.
//!
//! [`DirectoryState`] is the single owner of the loaded collection, the active
//! filter/sort/page criteria, and the derived view. Every criteria change
//! recomputes the view inside the same `&mut self` call, so callers never see
//! new criteria paired with a stale view.
//!
//! Remote failures never escape as errors; they are recorded in
//! [`DirectoryState::error`] for display.

pub mod favorites;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{
    BudgetRange, DirectoryFilterCriteria, RemoteFilterCriteria, SchoolRecord, Selection,
    SortCriteria, SortDirection, SortField,
};
use crate::pipeline::{filter, page_slice, sort_in_place, total_pages};
use crate::services::{SchoolSource, fallback};

pub use favorites::FavoritesLedger;

/// Identifies one `load_all` request. Only the newest ticket may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// The single-record slot filled by `load_by_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectedSchool {
    #[default]
    Empty,
    Loaded(SchoolRecord),
    NotFound,
}

/// Distinct category values present in the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub school_types: Vec<String>,
    pub sub_cities: Vec<String>,
}

impl Facets {
    pub fn from_schools(schools: &[SchoolRecord]) -> Self {
        let school_types = distinct(
            schools
                .iter()
                .map(|s| s.school_type.as_str())
                .filter(|t| !t.trim().is_empty()),
        );
        let sub_cities = distinct(
            schools
                .iter()
                .flat_map(|s| s.sub_cities())
                .filter(|sc| !sc.trim().is_empty()),
        );
        Self {
            school_types,
            sub_cities,
        }
    }
}

/// Exact-value dedupe, sorted case-insensitively.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out.sort_by_key(|v| v.to_lowercase());
    out
}

#[derive(Debug)]
pub struct DirectoryState {
    catalog: Vec<SchoolRecord>,
    filtered: Vec<SchoolRecord>,
    fallback: Vec<SchoolRecord>,
    filters: DirectoryFilterCriteria,
    sort: Option<SortCriteria>,
    page: usize,
    page_size: usize,
    facets: Facets,
    selected: SelectedSchool,
    loading: bool,
    error: Option<String>,
    last_fetched: Option<DateTime<Utc>>,
    favorites: FavoritesLedger,
    generation: u64,
}

impl DirectoryState {
    /// Fresh state with the bundled fallback dataset.
    pub fn new(page_size: usize, favorites: FavoritesLedger) -> Self {
        Self {
            catalog: Vec::new(),
            filtered: Vec::new(),
            fallback: fallback::schools(),
            filters: DirectoryFilterCriteria::default(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
            facets: Facets::default(),
            selected: SelectedSchool::Empty,
            loading: false,
            error: None,
            last_fetched: None,
            favorites,
            generation: 0,
        }
    }

    /// Replace the fallback dataset.
    pub fn with_fallback(mut self, schools: Vec<SchoolRecord>) -> Self {
        self.fallback = schools;
        self
    }

    // --- Loading ---

    /// Fetch the full collection, falling back to the bundled dataset on failure.
    pub async fn load_all(&mut self, source: &dyn SchoolSource) -> bool {
        let ticket = self.begin_load_all();
        let result = source.fetch_all().await;
        self.finish_load_all(ticket, result)
    }

    /// Mark a `load_all` request as in flight.
    pub fn begin_load_all(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        log::info!("Loading schools (request #{})", self.generation);
        LoadTicket(self.generation)
    }

    /// Apply the outcome of a `load_all` request.
    ///
    /// Returns `false` when a newer request was issued after `ticket`; the
    /// outcome is then discarded.
    pub fn finish_load_all(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<SchoolRecord>>,
    ) -> bool {
        if ticket.0 != self.generation {
            log::warn!(
                "Discarding stale response for request #{} (latest #{})",
                ticket.0,
                self.generation
            );
            return false;
        }

        self.loading = false;
        self.last_fetched = Some(Utc::now());

        match result {
            Ok(schools) if !schools.is_empty() => {
                let invalid = schools.iter().filter(|s| s.validate().is_err()).count();
                if invalid > 0 {
                    log::warn!("{} of {} schools failed validation", invalid, schools.len());
                }
                for school in schools.iter().filter(|s| !s.has_known_type()) {
                    log::debug!("School {} has unlisted type '{}'", school.id, school.school_type);
                }
                log::info!("Loaded {} schools", schools.len());
                self.catalog = schools;
                self.error = None;
            }
            Ok(_) => {
                log::warn!("Remote returned no schools, using fallback dataset");
                self.catalog = self.fallback.clone();
                self.error = Some("No schools were returned; showing offline data".to_string());
            }
            Err(e) => {
                log::warn!("Failed to load schools, using fallback dataset: {}", e);
                self.catalog = self.fallback.clone();
                self.error = Some(format!("Could not load schools ({e}); showing offline data"));
            }
        }

        self.facets = Facets::from_schools(&self.catalog);
        self.recompute();
        true
    }

    /// Fetch a single school; falls back to the bundled dataset, then `NotFound`.
    pub async fn load_by_id(&mut self, source: &dyn SchoolSource, id: &str) {
        self.loading = true;
        self.selected = SelectedSchool::Empty;
        let result = source.fetch_by_id(id).await;
        self.loading = false;

        match result {
            Ok(school) => {
                self.selected = SelectedSchool::Loaded(school);
                self.error = None;
            }
            Err(e) => match self.fallback.iter().find(|s| s.id == id) {
                Some(school) => {
                    log::warn!("Failed to load school {}, using fallback: {}", id, e);
                    self.selected = SelectedSchool::Loaded(school.clone());
                    self.error = Some(format!("Could not load school ({e}); showing offline data"));
                }
                None if e.is_not_found() => {
                    log::info!("School {} not found: {}", id, e);
                    self.selected = SelectedSchool::NotFound;
                    self.error = None;
                }
                None => {
                    log::warn!("Failed to load school {}: {}", id, e);
                    self.selected = SelectedSchool::NotFound;
                    self.error = Some(format!("Could not load school ({e}); try again"));
                }
            },
        }
    }

    /// Server-side filtering. On failure the current view is kept as-is.
    pub async fn remote_filter(
        &mut self,
        source: &dyn SchoolSource,
        criteria: &RemoteFilterCriteria,
    ) -> bool {
        self.loading = true;
        let result = source.filter(criteria).await;
        self.loading = false;

        match result {
            Ok(mut schools) => {
                if let Some(s) = self.sort {
                    sort_in_place(&mut schools, s.field, s.direction);
                }
                log::info!("Remote filter matched {} schools", schools.len());
                self.filtered = schools;
                self.page = 1;
                self.error = None;
                true
            }
            Err(e) => {
                log::error!("Remote filter failed: {}", e);
                self.error = Some(format!("Filtering failed: {e}"));
                false
            }
        }
    }

    // --- Criteria ---

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filters.search = query.into();
        self.criteria_changed();
    }

    pub fn set_selected_type(&mut self, school_type: impl Into<Selection>) {
        self.filters.school_type = school_type.into();
        self.criteria_changed();
    }

    pub fn set_selected_location(&mut self, location: impl Into<Selection>) {
        self.filters.location = location.into();
        self.criteria_changed();
    }

    /// Set the inclusive budget range. An invalid range leaves state untouched.
    pub fn set_budget_range(&mut self, min: f64, max: f64) -> Result<()> {
        self.filters.budget = BudgetRange::new(min, max)?;
        self.criteria_changed();
        Ok(())
    }

    /// Reorder the view; membership is unchanged.
    pub fn set_sort_by(&mut self, field: SortField, direction: SortDirection) {
        self.sort = Some(SortCriteria { field, direction });
        sort_in_place(&mut self.filtered, field, direction);
    }

    /// Move to a 1-based page. Pages past the end yield an empty slice.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Reset every filter dimension. The sort order is kept.
    pub fn clear_filters(&mut self) {
        self.filters = DirectoryFilterCriteria::default();
        self.criteria_changed();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Flip a favorite. Returns the resulting membership.
    pub async fn toggle_favorite(&mut self, id: &str) -> bool {
        match self.favorites.toggle(id).await {
            Ok(is_favorite) => is_favorite,
            Err(e) => {
                log::error!("Failed to save favorites: {}", e);
                self.error = Some(format!("Could not save favorite ({e})"));
                self.favorites.contains(id)
            }
        }
    }

    fn criteria_changed(&mut self) {
        self.page = 1;
        self.recompute();
    }

    /// Filter, then sort.
    fn recompute(&mut self) {
        let mut view = filter(&self.catalog, &self.filters);
        if let Some(s) = self.sort {
            sort_in_place(&mut view, s.field, s.direction);
        }
        self.filtered = view;
    }

    // --- Accessors ---

    /// Canonical collection in source order.
    pub fn schools(&self) -> &[SchoolRecord] {
        &self.catalog
    }

    /// Canonical collection in the active sort order.
    pub fn sorted_catalog(&self) -> Vec<SchoolRecord> {
        let mut sorted = self.catalog.clone();
        if let Some(s) = self.sort {
            sort_in_place(&mut sorted, s.field, s.direction);
        }
        sorted
    }

    /// The derived (filtered and sorted) view.
    pub fn filtered(&self) -> &[SchoolRecord] {
        &self.filtered
    }

    /// Records on the current page.
    pub fn current_page(&self) -> &[SchoolRecord] {
        page_slice(&self.filtered, self.page, self.page_size)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), self.page_size)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filters(&self) -> &DirectoryFilterCriteria {
        &self.filters
    }

    pub fn sort(&self) -> Option<SortCriteria> {
        self.sort
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn selected(&self) -> &SelectedSchool {
        &self.selected
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.last_fetched
    }

    pub fn favorites(&self) -> &FavoritesLedger {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Favorited schools present in the loaded collection.
    pub fn favorite_schools(&self) -> Vec<&SchoolRecord> {
        self.catalog
            .iter()
            .filter(|s| self.favorites.contains(&s.id))
            .collect()
    }
}
