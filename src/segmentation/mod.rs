//! Member segmentation: standardization, k-means and cluster labeling

mod standardize;
mod kmeans;
mod profile;
mod labeler;
mod pipeline;

pub use standardize::{standardize, Scaler};
pub use kmeans::{
    ClusterAssignment, Clusterer, ClusteringBackend, FixedIterationKMeans, LloydKMeans,
    FIXED_ITERATIONS,
};
pub use profile::{build_profiles, median, ClusterProfile, FeatureStats, FEATURE_NAMES};
pub use labeler::{label, Playbook, SegmentLabel, AGGRESSIVE_RISK_SCORE, CONSERVATIVE_RISK_SCORE};
pub use pipeline::{members_in_cluster, segment, SegmentationFilters, SegmentationResult};
