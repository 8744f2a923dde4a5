//! Service layer for the directory client.
//!
//! - Remote school API access (`SchoolSource`, `HttpSchoolSource`)
//! - Bundled fallback dataset (`fallback`, `FallbackSource`)

pub mod fallback;
mod remote;

pub use fallback::FallbackSource;
pub use remote::{
    HttpSchoolSource, SchoolSource, parse_filter_result, parse_school, parse_school_list,
};
