// src/lib.rs

//! SchoolNet directory client library

pub mod directory;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
