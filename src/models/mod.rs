// src/models/mod.rs

//! Domain models for the school directory.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod criteria;
mod school;

// Re-export all public types
pub use config::{ApiConfig, Config, DirectoryConfig, LoggingConfig};
pub use criteria::{
    BudgetRange, DirectoryFilterCriteria, RemoteAddressFilter, RemoteFilterCriteria, Selection,
    SortCriteria, SortDirection, SortField,
};
pub use school::{Address, Facility, KNOWN_GENDER_MODES, KNOWN_SCHOOL_TYPES, SchoolRecord};
