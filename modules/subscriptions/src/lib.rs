//! Subscription lifecycle: assignment, renewal, deletion, and the daily
//! expiry-reminder sweep.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;
pub mod job;
