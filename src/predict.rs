//! Prediction Facade

use crate::features::FlowFeatures;
use crate::models::Predictor;
use crate::store::ModelStore;
use crate::FlowscopeError;

/// Labels produced for one flow, one per model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowLabels {
    /// K-Means cluster id
    pub partition: i64,
    /// DBSCAN cluster id, -1 for noise
    pub density: i64,
    /// Isolation Forest label: -1 anomaly, 1 normal
    pub anomaly: i64,
}

/// Label one flow with all three models.
///
/// The row is adapted once and fanned out; no state is touched.
pub fn label_flow(store: &ModelStore, flow: &FlowFeatures) -> Result<FlowLabels, FlowscopeError> {
    let row = flow.to_row();
    Ok(FlowLabels {
        partition: store.kmeans.predict(&row)?,
        density: store.dbscan.predict(&row)?,
        anomaly: store.forest.predict(&row)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COLUMNS;
    use crate::models::{DbscanModel, IsolationForest, KMeansModel, TreeNode};

    fn test_store() -> ModelStore {
        let columns: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
        ModelStore {
            kmeans: KMeansModel {
                columns: columns.clone(),
                centroids: vec![vec![0.0, 0.0, 0.0, 0.0], vec![100.0, 1000.0, 1e6, 5e5]],
            },
            dbscan: DbscanModel { columns: columns.clone(), tolerance: 0.5, min_points: 4 },
            forest: IsolationForest {
                columns,
                max_samples: 16,
                threshold: 0.5,
                trees: vec![TreeNode::Split {
                    feature: 2,
                    threshold: 1e5,
                    left: Box::new(TreeNode::Leaf { size: 15 }),
                    right: Box::new(TreeNode::Leaf { size: 1 }),
                }],
            },
        }
    }

    #[test]
    fn test_label_flow_produces_three_labels() {
        let store = test_store();
        let flow = FlowFeatures { dur: 0.5, tot_pkts: 12.0, tot_bytes: 3000.0, src_bytes: 900.0 };
        let labels = label_flow(&store, &flow).unwrap();
        assert_eq!(labels.partition, 0);
        assert_eq!(labels.density, -1);
        assert_eq!(labels.anomaly, 1);
    }

    #[test]
    fn test_label_flow_is_deterministic() {
        let store = test_store();
        let flow = FlowFeatures { dur: 80.0, tot_pkts: 900.0, tot_bytes: 9e5, src_bytes: 4e5 };
        let first = label_flow(&store, &flow).unwrap();
        for _ in 0..5 {
            assert_eq!(label_flow(&store, &flow).unwrap(), first);
        }
    }

    #[test]
    fn test_huge_flow_is_flagged_anomalous() {
        let store = test_store();
        let flow = FlowFeatures { dur: 2.0, tot_pkts: 5e4, tot_bytes: 5e7, src_bytes: 4e7 };
        let labels = label_flow(&store, &flow).unwrap();
        assert_eq!(labels.partition, 1);
        assert_eq!(labels.anomaly, -1);
    }
}
