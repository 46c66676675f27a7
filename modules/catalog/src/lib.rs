//! Product catalog: CRUD, category/stock filters, and best-effort image
//! backfill from a product's details page.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;
