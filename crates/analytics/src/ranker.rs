//! Ranker — totally orders campaigns by profitability.

use std::cmp::Ordering;

use adlens_core::error::{AnalyzerError, AnalyzerResult};
use adlens_core::types::{CampaignMetrics, Quintile, RankedCampaign};

/// Order campaigns by descending ROI and assign ranks `1..=N`.
///
/// Campaigns with undefined ROI sort below every campaign with a
/// finite one. Ties break by descending revenue, then ascending name,
/// so the resulting order is a reproducible total order: identical
/// input always yields identical ranks. Quintile labels and pattern
/// flags are left at their defaults for the segment classifier.
pub fn rank_campaigns(metrics: Vec<CampaignMetrics>) -> AnalyzerResult<Vec<RankedCampaign>> {
    if metrics.is_empty() {
        return Err(AnalyzerError::Config(
            "cannot rank an empty campaign set".to_string(),
        ));
    }

    let mut ordered = metrics;
    ordered.sort_by(ranking_order);

    Ok(ordered
        .into_iter()
        .enumerate()
        .map(|(i, metrics)| RankedCampaign {
            metrics,
            rank: i + 1,
            quintile: Quintile::default(),
            flags: Vec::new(),
        })
        .collect())
}

/// Descending ROI, undefined last, then descending revenue, then
/// ascending name. ROI and revenue are finite by construction, so the
/// `partial_cmp` fallbacks never fire on valid data.
fn ranking_order(a: &CampaignMetrics, b: &CampaignMetrics) -> Ordering {
    let by_roi = match (a.roi, b.roi) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_roi
        .then_with(|| b.revenue.partial_cmp(&a.revenue).unwrap_or(Ordering::Equal))
        .then_with(|| a.record.name.cmp(&b.record.name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
