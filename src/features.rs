//! Flow Feature Adapter

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Column order every predictor was fitted against.
///
/// Each artifact records the columns it was fitted with and the loader
/// rejects any mismatch; a reordered row would produce meaningless labels
/// without any error, so the order is pinned in exactly one place.
pub const FEATURE_COLUMNS: [&str; 4] = ["dur", "tot_pkts", "tot_bytes", "src_bytes"];

/// Single network-flow feature vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowFeatures {
    /// Flow duration (seconds)
    pub dur: f64,
    /// Total packet count
    pub tot_pkts: f64,
    /// Total byte count
    pub tot_bytes: f64,
    /// Bytes sent by the source
    pub src_bytes: f64,
}

impl FlowFeatures {
    /// Adapt to the single-row tabular shape the predictors consume.
    ///
    /// Values are passed through untouched; callers are trusted to supply
    /// them on the scale the models were fitted at.
    pub fn to_row(&self) -> Array2<f64> {
        Array2::from_shape_vec(
            (1, FEATURE_COLUMNS.len()),
            vec![self.dur, self.tot_pkts, self.tot_bytes, self.src_bytes],
        )
        .expect("shape (1, 4) always matches a 4-element vec")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_shape_and_order() {
        let flow = FlowFeatures {
            dur: 1.5,
            tot_pkts: 20.0,
            tot_bytes: 4800.0,
            src_bytes: 1200.0,
        };
        let row = flow.to_row();
        assert_eq!(row.dim(), (1, 4));
        // Order must match FEATURE_COLUMNS: dur, tot_pkts, tot_bytes, src_bytes
        assert_eq!(row[[0, 0]], 1.5);
        assert_eq!(row[[0, 1]], 20.0);
        assert_eq!(row[[0, 2]], 4800.0);
        assert_eq!(row[[0, 3]], 1200.0);
    }
}
