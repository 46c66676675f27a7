//! Veterinary directory: the eligible-professional roster, cabinet listings
//! with geocoding, and per-user profiles. Fed by XLSX imports.

pub mod api;
pub mod contract;
pub mod domain;
pub mod import;
pub mod infra;
