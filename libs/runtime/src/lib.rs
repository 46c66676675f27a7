//! Runtime support for the VitalFeed server: layered configuration and
//! per-subsystem logging.

pub mod config;
pub mod logging;

pub use config::{
    AdminBootstrapConfig, AppConfig, AuthConfig, CliArgs, DatabaseConfig, GeocoderConfig,
    LoggingConfig, MailConfig, Section, ServerConfig,
};
