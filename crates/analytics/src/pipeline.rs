//! Full analysis pipeline: records → metrics → ranking → segments → plan.

use adlens_core::config::AnalysisConfig;
use adlens_core::error::AnalyzerResult;
use adlens_core::types::{AnalysisOutcome, CampaignRecord};
use tracing::info;

use crate::{metrics, ranker, reallocation, segments};

/// Run the four core stages over one input set.
///
/// Validates the configuration before touching any data, then applies
/// each stage in order. The whole computation is deterministic and
/// side-effect free: the same input always produces the same ranking,
/// labels, and plan, so a failed run fails identically on retry.
pub fn run_analysis(
    records: Vec<CampaignRecord>,
    config: &AnalysisConfig,
) -> AnalyzerResult<AnalysisOutcome> {
    config.validate()?;

    let metrics = metrics::compute_metrics(&records, config)?;
    let mut ranked = ranker::rank_campaigns(metrics)?;
    segments::classify(&mut ranked, config);
    let plan = reallocation::simulate(&ranked, config)?;

    info!(
        campaigns = ranked.len(),
        total_reallocated = plan.total_reallocated,
        "Analysis complete"
    );

    Ok(AnalysisOutcome { ranked, plan })
}
