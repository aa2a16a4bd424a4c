//! Filter, standardize, cluster, profile and label a member population

use super::kmeans::ClusterAssignment;
use super::labeler::{label, Playbook, SegmentLabel};
use super::profile::{build_profiles, median, ClusterProfile};
use super::standardize::{standardize, Scaler};
use crate::config::SegmentationConfig;
use crate::error::SegmentationError;
use crate::member::{MemberRecord, RiskTolerance};
use log::{debug, info};
use serde::Serialize;
use std::collections::HashSet;

/// Population filters; `None` or an empty risk list means no restriction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentationFilters {
    /// Inclusive age bounds
    pub age: Option<(u32, u32)>,
    /// Inclusive annual income bounds
    pub income: Option<(f64, f64)>,
    pub risk_tolerance: Vec<RiskTolerance>,
}

impl SegmentationFilters {
    /// Members without age, income and savings never pass
    pub fn accepts(&self, member: &MemberRecord) -> bool {
        let (Some(age), Some(income), Some(_)) = (member.age, member.annual_income, member.current_savings) else {
            return false;
        };
        if let Some((lo, hi)) = self.age {
            if age < lo || age > hi {
                return false;
            }
        }
        if let Some((lo, hi)) = self.income {
            if income < lo || income > hi {
                return false;
            }
        }
        self.risk_tolerance.is_empty() || self.risk_tolerance.contains(&member.risk_tolerance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentationResult {
    /// Member id per clustered row, aligned with `assignment.labels`
    pub member_ids: Vec<String>,
    pub assignment: ClusterAssignment,
    pub profiles: Vec<ClusterProfile>,
    pub labels: Vec<SegmentLabel>,
    pub playbooks: Vec<Playbook>,
    pub scaler: Scaler,
    pub median_income: f64,
    pub median_savings: f64,
    /// Members that passed the filters and were clustered
    pub total_members: usize,
}

impl SegmentationResult {
    pub fn cluster_of(&self, member_id: &str) -> Option<usize> {
        self.member_ids
            .iter()
            .position(|id| id == member_id)
            .map(|row| self.assignment.labels[row])
    }

    /// Cluster centroid mapped back to feature units, in `FEATURE_NAMES` order
    pub fn centroid_in_units(&self, cluster: usize) -> Option<Vec<f64>> {
        let centroid = self.assignment.centroids.get(cluster)?;
        Some(
            centroid
                .iter()
                .enumerate()
                .map(|(column, &z)| self.scaler.invert(column, z))
                .collect(),
        )
    }
}

/// Feature row: age, annual income, current savings, risk score
fn features(member: &MemberRecord) -> Vec<f64> {
    vec![
        member.age.map(f64::from).unwrap_or(0.0),
        member.annual_income.unwrap_or(0.0),
        member.current_savings.unwrap_or(0.0),
        member.risk_tolerance.score(),
    ]
}

/// Segment the members that pass `filters` into `config.clusters` groups
pub fn segment(
    members: &[MemberRecord],
    filters: &SegmentationFilters,
    config: &SegmentationConfig,
) -> Result<SegmentationResult, SegmentationError> {
    let k = config.clusters;
    if k == 0 {
        return Err(SegmentationError::ZeroClusters);
    }

    let selected: Vec<&MemberRecord> = members.iter().filter(|m| filters.accepts(m)).collect();
    debug!("{} of {} members pass segmentation filters", selected.len(), members.len());
    if selected.len() < k {
        return Err(SegmentationError::TooFewPoints {
            points: selected.len(),
            clusters: k,
        });
    }

    let raw: Vec<Vec<f64>> = selected.iter().map(|m| features(m)).collect();
    let (scaled, scaler) = standardize(&raw)?;

    let clusterer = config.backend.build(config);
    let assignment = clusterer.cluster(&scaled, k)?;

    let profiles = build_profiles(&raw, &assignment);
    let incomes: Vec<f64> = raw.iter().map(|r| r[1]).collect();
    let savings: Vec<f64> = raw.iter().map(|r| r[2]).collect();
    let median_income = median(&incomes).unwrap_or(0.0);
    let median_savings = median(&savings).unwrap_or(0.0);

    let labels: Vec<SegmentLabel> = profiles
        .iter()
        .map(|p| label(p, median_savings, median_income))
        .collect();
    let playbooks = labels.iter().map(SegmentLabel::playbook).collect();

    info!(
        "Segmented {} members into {} clusters with {} backend",
        selected.len(),
        k,
        clusterer.name()
    );

    Ok(SegmentationResult {
        member_ids: selected.iter().map(|m| m.member_id.clone()).collect(),
        assignment,
        profiles,
        labels,
        playbooks,
        scaler,
        median_income,
        median_savings,
        total_members: selected.len(),
    })
}

/// Members of one cluster, highest savings first
pub fn members_in_cluster<'a>(
    result: &SegmentationResult,
    members: &'a [MemberRecord],
    cluster: usize,
) -> Vec<&'a MemberRecord> {
    let ids: HashSet<&str> = result
        .assignment
        .rows_in(cluster)
        .into_iter()
        .map(|row| result.member_ids[row].as_str())
        .collect();

    let mut found: Vec<&MemberRecord> = members
        .iter()
        .filter(|m| ids.contains(m.member_id.as_str()))
        .collect();
    found.sort_by(|a, b| {
        b.current_savings
            .unwrap_or(0.0)
            .total_cmp(&a.current_savings.unwrap_or(0.0))
    });
    found
}
