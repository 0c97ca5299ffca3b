//! Flowscope - Network Flow Clustering & Anomaly Labeling
//!
//! Serves cluster/anomaly labels for single network flows from three
//! pre-fitted unsupervised models behind a small web form.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        FLOWSCOPE                            │
//! │                                                             │
//! │   HTML form ──► /predict ──► FlowFeatures (1×4 row)         │
//! │                                  │                          │
//! │       ┌──────────────┬───────────┴──────┬──────────────┐    │
//! │       ▼              ▼                  ▼              │    │
//! │  ┌──────────┐  ┌──────────┐  ┌──────────────────┐      │    │
//! │  │ K-Means  │  │  DBSCAN  │  │ Isolation Forest │      │    │
//! │  │ cluster  │  │ cluster/ │  │  anomaly ∈{-1,1} │      │    │
//! │  │    id    │  │  noise   │  │                  │      │    │
//! │  └──────────┘  └──────────┘  └──────────────────┘      │    │
//! │       └──────────────┴──────────────────┴── result page │   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Model artifacts are deserialized once at startup into a read-only
//! [`ModelStore`](store::ModelStore); a missing or invalid artifact is
//! fatal before the listener binds.

#![warn(missing_docs)]

pub mod config;
pub mod features;
pub mod models;
pub mod predict;
pub mod server;
pub mod store;

use thiserror::Error;

pub use config::ServerConfig;
pub use features::{FlowFeatures, FEATURE_COLUMNS};
pub use models::{DbscanModel, IsolationForest, KMeansModel, Predictor};
pub use predict::{label_flow, FlowLabels};
pub use server::build_router;
pub use store::ModelStore;

/// Flowscope error types
#[derive(Debug, Error)]
pub enum FlowscopeError {
    /// Model artifact missing, unreadable, or failing validation
    #[error("artifact error: {0}")]
    Artifact(String),
    /// Prediction call failed
    #[error("model error: {0}")]
    Model(String),
}
