pub mod cabinets;
pub mod error;
pub mod ports;
pub mod profiles;
pub mod repo;
pub mod roster;
