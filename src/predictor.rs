//! Price predictor - loads the fitted scorer artifact and applies it to
//! featurized listings
//!
//! The artifact is a JSON description of a linear scorer over the
//! canonical feature row: an intercept, per-column numeric weights, and
//! per-category weights for the string columns. Training the scorer is a
//! separate concern; this module only locates, loads and applies it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::features::{self, FeatureError, FeatureRow, RawListing};

/// Conventional artifact locations, probed in order after the env override
const CANDIDATE_PATHS: [&str; 2] = ["models/housing_model.json", "housing_model.json"];

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact not found; tried {tried:?}")]
    NotFound { tried: Vec<PathBuf> },

    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model artifact {path} is not a valid scorer: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Features(#[from] FeatureError),
}

/// Fitted linear scorer over the canonical feature row. Unknown categories
/// and unweighted columns contribute nothing.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceModel {
    pub intercept: f64,
    #[serde(default)]
    pub numeric_weights: HashMap<String, f64>,
    #[serde(default)]
    pub categorical_weights: HashMap<String, HashMap<String, f64>>,
}

impl PriceModel {
    pub fn score(&self, row: &FeatureRow) -> f64 {
        let mut price = self.intercept;
        for (column, value) in row.numeric_values() {
            if let Some(weight) = self.numeric_weights.get(column) {
                price += weight * value;
            }
        }
        for (column, category) in row.categorical_values() {
            if let Some(weight) = self
                .categorical_weights
                .get(column)
                .and_then(|weights| weights.get(category))
            {
                price += weight;
            }
        }
        price
    }
}

/// Summary of the loaded artifact, reported on the service root
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_path: String,
    pub numeric_weight_count: usize,
    pub categorical_weight_count: usize,
}

pub struct PricePredictor {
    model: PriceModel,
    model_path: PathBuf,
}

impl PricePredictor {
    /// Load the artifact from an explicit path
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: PriceModel =
            serde_json::from_str(&contents).map_err(|source| ModelError::Invalid {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            model,
            model_path: path.to_path_buf(),
        })
    }

    /// Locate and load the artifact: `MODEL_PATH` env override first, then
    /// the conventional locations
    pub fn load() -> Result<Self, ModelError> {
        let mut tried = Vec::new();
        if let Ok(path) = std::env::var("MODEL_PATH") {
            tried.push(PathBuf::from(path));
        }
        tried.extend(CANDIDATE_PATHS.iter().copied().map(PathBuf::from));

        for path in &tried {
            if path.exists() {
                info!("Loading model artifact from {:?}", path);
                return Self::from_path(path);
            }
        }
        Err(ModelError::NotFound { tried })
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_path: self.model_path.display().to_string(),
            numeric_weight_count: self.model.numeric_weights.len(),
            categorical_weight_count: self.model.categorical_weights.len(),
        }
    }

    /// Predict the price for one raw listing
    pub fn predict(&self, listing: &RawListing) -> Result<f64, ModelError> {
        let row = features::build_features_single(listing)?;
        Ok(self.model.score(&row))
    }

    /// Predict prices for a batch, preserving input order
    pub fn predict_batch(&self, listings: &[RawListing]) -> Result<Vec<f64>, ModelError> {
        let rows = features::build_features(listings)?;
        Ok(rows.iter().map(|row| self.model.score(row)).collect())
    }

    /// Smoke-test prediction used by the health endpoint
    pub fn health_check(&self) -> bool {
        let sample = RawListing {
            status: Some("active".to_string()),
            property_type: Some("single_family".to_string()),
            beds: Some("3".to_string()),
            baths: Some("2.5".to_string()),
            sqft: Some("1800".to_string()),
            ..Default::default()
        };
        self.predict(&sample)
            .map(|price| price.is_finite())
            .unwrap_or(false)
    }
}
