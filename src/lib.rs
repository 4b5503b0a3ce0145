//! Star type prediction service
//!
//! Serves a pre-trained stellar classifier over HTTP. A single observation
//! (temperature, luminosity, radius, absolute magnitude) or a batch CSV of
//! observations goes in; predicted star-type labels with confidence come out.
//!
//! # Modules
//!
//! - [`schema`] - The feature schema contract: wire column names, the
//!   [`schema::StarRecord`] domain type, and CSV validation helpers
//! - [`model`] - The classifier artifact: loaded once at startup, exposing
//!   `predict` and `predict_proba` over a feature table
//! - [`server`] - HTTP inference service with REST API
//! - [`client`] - HTTP client for the service plus confidence tiering
//! - [`cli`] - Command-line interface (serve, single and bulk prediction)

pub mod error;

pub mod schema;
pub mod model;

pub mod server;
pub mod client;
pub mod cli;

pub use error::{Result, StarError};
