//! vocadrill-client — drill-metadata service integration.
//!
//! Implements the `DrillApi` trait over HTTP for the drill-metadata
//! service, plus configuration loading and a mock implementation for tests.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{load_config, load_config_from, AppConfig};
pub use http::MetadataClient;
pub use mock::MockDrillApi;
