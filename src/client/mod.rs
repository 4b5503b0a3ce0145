//! HTTP client for the prediction service
//!
//! The presentation layer's view of the API: one call per endpoint, no
//! retries, every transport failure or non-success status surfaced to the
//! caller as a [`ClientError`] rather than a panic. Also home to the
//! confidence tiering policy used when rendering results.

use serde::Deserialize;
use thiserror::Error;

use crate::schema::StarRecord;

/// Client-side failure: either the transport broke or the server answered
/// with a non-success status (carried verbatim).
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("status code {0}")]
    Status(reqwest::StatusCode),
}

/// A single prediction as returned by `/predict`.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub predicted_type: String,
    pub predicted_probability: f64,
}

/// Presentation-only bucketing of the maximum class posterior.
///
/// Does not alter the prediction, only how it is framed for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// Fixed policy: high at p >= 0.47, medium at p >= 0.27, low below.
    pub fn from_probability(p: f64) -> Self {
        if p >= 0.47 {
            ConfidenceTier::High
        } else if p >= 0.27 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
        }
    }
}

/// Thin client over the inference service.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Liveness probe; returns the server's status message.
    pub async fn health(&self) -> Result<String, ClientError> {
        let resp = self.http.get(&self.base_url).send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::Status(resp.status()));
        }
        #[derive(Deserialize)]
        struct Health {
            message: String,
        }
        Ok(resp.json::<Health>().await?.message)
    }

    /// Single prediction for one observation.
    pub async fn predict(&self, record: &StarRecord) -> Result<Prediction, ClientError> {
        let resp = self
            .http
            .post(format!("{}/predict", self.base_url))
            .json(record)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ClientError::Status(resp.status()));
        }
        Ok(resp.json().await?)
    }

    /// Bulk prediction; forwards the raw file bytes and returns the
    /// augmented CSV text.
    pub async fn bulk_predict(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ClientError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(format!("{}/bulk_predict", self.base_url))
            .multipart(form)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ClientError::Status(resp.status()));
        }
        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ConfidenceTier::from_probability(0.47), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_probability(0.5), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_probability(0.4699), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_probability(0.30), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_probability(0.27), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_probability(0.2699), ConfidenceTier::Low);
        assert_eq!(ConfidenceTier::from_probability(0.10), ConfidenceTier::Low);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}
