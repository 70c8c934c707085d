//! vocadrill-core — Session engine, question generator, and scoring model.
//!
//! This crate defines the data model, the `DrillApi` seam to the remote
//! drill-metadata service, the per-variant question generator, and the
//! session state machine that the rest of the vocadrill system builds on.

pub mod engine;
pub mod error;
pub mod generator;
pub mod mailbox;
pub mod model;
pub mod report;
pub mod session;
pub mod traits;
