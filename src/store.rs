//! Model Store
//!
//! One-time load of the three fitted artifacts. The store is immutable
//! after construction and shared behind `Arc`; predictors never mutate.

use crate::models::{DbscanModel, IsolationForest, KMeansModel};
use crate::FlowscopeError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Artifact file name for the K-Means model.
pub const KMEANS_ARTIFACT: &str = "kmeans.json";
/// Artifact file name for the DBSCAN model.
pub const DBSCAN_ARTIFACT: &str = "dbscan.json";
/// Artifact file name for the Isolation Forest model.
pub const FOREST_ARTIFACT: &str = "isolation_forest.json";

/// Read-only handles to the three fitted models
#[derive(Debug, Clone)]
pub struct ModelStore {
    /// Partition clustering model
    pub kmeans: KMeansModel,
    /// Density clustering model
    pub dbscan: DbscanModel,
    /// Anomaly scorer
    pub forest: IsolationForest,
}

impl ModelStore {
    /// Load and validate all three artifacts from `dir`.
    ///
    /// Any missing, unreadable, or invalid artifact is an error; the caller
    /// must not start serving on failure.
    pub fn load(dir: &Path) -> Result<Self, FlowscopeError> {
        tracing::info!("loading model artifacts from {}", dir.display());

        let kmeans: KMeansModel = read_artifact(dir, KMEANS_ARTIFACT)?;
        kmeans.validate()?;
        tracing::info!("kmeans model loaded ({} clusters)", kmeans.centroids.len());

        let dbscan: DbscanModel = read_artifact(dir, DBSCAN_ARTIFACT)?;
        dbscan.validate()?;
        tracing::info!(
            "dbscan model loaded (tolerance {}, min_points {})",
            dbscan.tolerance,
            dbscan.min_points
        );

        let forest: IsolationForest = read_artifact(dir, FOREST_ARTIFACT)?;
        forest.validate()?;
        tracing::info!("isolation forest loaded ({} trees)", forest.trees.len());

        Ok(Self { kmeans, dbscan, forest })
    }
}

fn read_artifact<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, FlowscopeError> {
    let path = dir.join(name);
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| FlowscopeError::Artifact(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| FlowscopeError::Artifact(format!("{}: {}", path.display(), e)))
}
