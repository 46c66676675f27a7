//! User accounts: registration against the professional roster, login and
//! token issuance, password reset, and the request authorization gate.

pub mod api;
pub mod auth;
pub mod contract;
pub mod domain;
pub mod infra;
