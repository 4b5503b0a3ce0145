//! Pre-trained star-type classifier

use std::path::Path;

use ndarray::Array2;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StarError};
use crate::schema;

/// Opaque multinomial classifier over the four stellar features.
///
/// The artifact holds the label set, per-feature standardization parameters,
/// and one weight vector plus intercept per class; probabilities come from a
/// softmax over the standardized linear scores. All fields are fixed at
/// training time and never mutated after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarClassifier {
    labels: Vec<String>,
    means: Vec<f64>,
    stds: Vec<f64>,
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

impl StarClassifier {
    /// Assemble a classifier from trained parameters.
    pub fn from_parts(
        labels: Vec<String>,
        means: Vec<f64>,
        stds: Vec<f64>,
        weights: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    ) -> Result<Self> {
        let clf = Self { labels, means, stds, weights, intercepts };
        clf.validate()?;
        Ok(clf)
    }

    /// Load the artifact from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let clf: Self = serde_json::from_str(&json)?;
        clf.validate()?;
        Ok(clf)
    }

    /// Save the artifact to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let n_features = schema::REQUIRED_COLUMNS.len();
        let n_classes = self.labels.len();
        if n_classes == 0 {
            return Err(StarError::ModelError("artifact has no class labels".to_string()));
        }
        if self.means.len() != n_features || self.stds.len() != n_features {
            return Err(StarError::ModelError(format!(
                "artifact expects {n_features} standardization parameters"
            )));
        }
        if self.stds.iter().any(|s| *s <= 0.0) {
            return Err(StarError::ModelError(
                "standardization scale must be positive".to_string(),
            ));
        }
        if self.weights.len() != n_classes || self.intercepts.len() != n_classes {
            return Err(StarError::ModelError(format!(
                "artifact must carry one weight vector and intercept per class ({n_classes})"
            )));
        }
        if self.weights.iter().any(|w| w.len() != n_features) {
            return Err(StarError::ModelError(format!(
                "every weight vector must have {n_features} entries"
            )));
        }
        Ok(())
    }

    /// Class labels, in the order `predict_proba` columns are laid out.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Predict one label per row of the feature table.
    pub fn predict(&self, features: &DataFrame) -> Result<Vec<String>> {
        let proba = self.predict_proba(features)?;
        Ok(proba
            .outer_iter()
            .map(|row| {
                let (best, _) = row.iter().enumerate().fold(
                    (0, f64::NEG_INFINITY),
                    |(bj, bv), (j, &v)| if v > bv { (j, v) } else { (bj, bv) },
                );
                self.labels[best].clone()
            })
            .collect())
    }

    /// Per-row class posterior vectors; each row sums to 1.
    pub fn predict_proba(&self, features: &DataFrame) -> Result<Array2<f64>> {
        let x = schema::feature_matrix(features)?;
        let n_rows = x.nrows();
        let n_classes = self.labels.len();
        let mut proba = Array2::zeros((n_rows, n_classes));

        for (i, row) in x.outer_iter().enumerate() {
            let z: Vec<f64> = row
                .iter()
                .zip(&self.means)
                .zip(&self.stds)
                .map(|((value, mean), std)| (value - mean) / std)
                .collect();

            let mut scores: Vec<f64> = self
                .weights
                .iter()
                .zip(&self.intercepts)
                .map(|(w, b)| w.iter().zip(&z).map(|(wi, zi)| wi * zi).sum::<f64>() + b)
                .collect();

            // Shift by the max score for numerical stability
            let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let mut total = 0.0;
            for s in scores.iter_mut() {
                *s = (*s - max).exp();
                total += *s;
            }
            for (j, s) in scores.iter().enumerate() {
                proba[[i, j]] = s / total;
            }
        }

        Ok(proba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StarRecord;
    use polars::prelude::*;

    fn fixture() -> StarClassifier {
        StarClassifier::from_parts(
            vec![
                "Red Dwarf".to_string(),
                "Main Sequence".to_string(),
                "Supergiant".to_string(),
            ],
            vec![10500.0, 107000.0, 237.0, 4.4],
            vec![9500.0, 179000.0, 517.0, 10.5],
            vec![
                vec![-1.2, -0.7, -0.5, 1.4],
                vec![0.4, 0.1, -0.2, -0.1],
                vec![0.2, 1.1, 0.9, -1.3],
            ],
            vec![0.3, 0.4, -0.2],
        )
        .unwrap()
    }

    fn sun() -> DataFrame {
        StarRecord {
            temperature: 5770,
            luminosity: 1.0,
            radius: 1.0,
            absolute_magnitude: 4.83,
        }
        .to_dataframe()
        .unwrap()
    }

    #[test]
    fn test_proba_rows_sum_to_one() {
        let clf = fixture();
        let proba = clf.predict_proba(&sun()).unwrap();
        assert_eq!(proba.shape(), &[1, 3]);
        let total: f64 = proba.row(0).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_predict_is_argmax_of_proba() {
        let clf = fixture();
        let df = sun();
        let labels = clf.predict(&df).unwrap();
        let proba = clf.predict_proba(&df).unwrap();
        let best = proba
            .row(0)
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(j, _)| j)
            .unwrap();
        assert_eq!(labels[0], clf.labels()[best]);
    }

    #[test]
    fn test_predict_vectorized_over_rows() {
        let clf = fixture();
        let df = crate::schema::feature_frame(
            &DataFrame::new(vec![
                Series::new(crate::schema::REQUIRED_COLUMNS[0].into(), &[3042.0, 30000.0]).into(),
                Series::new(crate::schema::REQUIRED_COLUMNS[1].into(), &[0.0005, 500000.0]).into(),
                Series::new(crate::schema::REQUIRED_COLUMNS[2].into(), &[0.15, 1200.0]).into(),
                Series::new(crate::schema::REQUIRED_COLUMNS[3].into(), &[16.65, -8.2]).into(),
            ])
            .unwrap(),
        )
        .unwrap();

        let labels = clf.predict(&df).unwrap();
        assert_eq!(labels.len(), 2);
        // Cool dim tiny star vs hot luminous enormous star land in different classes
        assert_eq!(labels[0], "Red Dwarf");
        assert_eq!(labels[1], "Supergiant");
    }

    #[test]
    fn test_save_load_round_trip() {
        let clf = fixture();
        let path = std::env::temp_dir().join("star-classifier-roundtrip.json");
        clf.save(&path).unwrap();
        let loaded = StarClassifier::load(&path).unwrap();
        assert_eq!(loaded.labels(), clf.labels());
        let a = clf.predict_proba(&sun()).unwrap();
        let b = loaded.predict_proba(&sun()).unwrap();
        assert_eq!(a, b);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_validate_rejects_ragged_weights() {
        let err = StarClassifier::from_parts(
            vec!["A".to_string()],
            vec![0.0; 4],
            vec![1.0; 4],
            vec![vec![0.0; 3]],
            vec![0.0],
        )
        .unwrap_err();
        assert!(matches!(err, StarError::ModelError(_)));
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let err = StarClassifier::from_parts(
            vec!["A".to_string()],
            vec![0.0; 4],
            vec![1.0, 0.0, 1.0, 1.0],
            vec![vec![0.0; 4]],
            vec![0.0],
        )
        .unwrap_err();
        assert!(matches!(err, StarError::ModelError(_)));
    }
}
