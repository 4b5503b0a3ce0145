//! Classifier artifact
//!
//! The pre-trained star-type model. Loaded once from a fixed path at process
//! start and shared read-only across requests; exposes exactly two
//! operations, `predict` and `predict_proba`, over a feature table.

mod classifier;

pub use classifier::StarClassifier;
