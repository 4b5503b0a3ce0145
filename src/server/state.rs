//! Application state management

use std::sync::Arc;

use crate::error::Result;
use crate::model::StarClassifier;

use super::ServerConfig;

/// State shared across handlers.
///
/// The classifier is loaded once at startup and treated as immutable; it is
/// the only shared resource, so no per-request locking is needed.
pub struct AppState {
    pub config: ServerConfig,
    pub classifier: Arc<StarClassifier>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let classifier = StarClassifier::load(&config.model_path)?;
        Ok(Self {
            config: config.clone(),
            classifier: Arc::new(classifier),
        })
    }
}
