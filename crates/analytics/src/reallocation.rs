//! Reallocation simulator — proposes moving budget from the bottom
//! quintile to the top one and projects the effect.

use std::collections::HashMap;

use adlens_core::config::AnalysisConfig;
use adlens_core::error::{AnalyzerError, AnalyzerResult};
use adlens_core::types::{
    BudgetChange, ProjectedImpact, Quintile, RankedCampaign, ReallocationPlan,
};
use chrono::Utc;
use tracing::info;

/// Build a [`ReallocationPlan`] from the labeled ranking.
///
/// Cut phase: every `Bottom` campaign loses `cut_fraction` of its
/// budget; the cuts sum to `total_reallocated`. Add phase: that total
/// is distributed across the `Top` campaigns proportional to their
/// current spend share, preserving the group's existing budget
/// weighting. The projection assumes each touched campaign's
/// conversions-per-dollar efficiency holds at the margin.
///
/// Fewer than two campaigns (or a ranking with no donor/recipient
/// split, as after the N = 1 shrink rule) yields an empty plan. A top
/// set with zero total spend is a degenerate allocation: the input was
/// valid but proportional distribution has no meaningful solution.
/// The input is never mutated; the plan is a proposal only.
pub fn simulate(
    ranked: &[RankedCampaign],
    config: &AnalysisConfig,
) -> AnalyzerResult<ReallocationPlan> {
    if ranked.len() < 2 {
        return Ok(ReallocationPlan::empty());
    }

    let donors: Vec<&RankedCampaign> = ranked
        .iter()
        .filter(|c| c.quintile == Quintile::Bottom)
        .collect();
    let recipients: Vec<&RankedCampaign> = ranked
        .iter()
        .filter(|c| c.quintile == Quintile::Top)
        .collect();
    if donors.is_empty() || recipients.is_empty() {
        return Ok(ReallocationPlan::empty());
    }

    // Cut phase. Donors appear in rank order because `ranked` does.
    let mut cuts = Vec::with_capacity(donors.len());
    let mut total_reallocated = 0.0;
    for donor in &donors {
        let old_budget = donor.metrics.record.spend;
        let cut = old_budget * config.cut_fraction;
        total_reallocated += cut;
        cuts.push(BudgetChange {
            campaign: donor.name().to_string(),
            old_budget,
            new_budget: old_budget - cut,
            delta: -cut,
        });
    }

    // Add phase, proportional to current spend share within the top set.
    let top_spend: f64 = recipients.iter().map(|r| r.metrics.record.spend).sum();
    if top_spend <= 0.0 {
        return Err(AnalyzerError::DegenerateAllocation(
            "top quintile has zero total spend; cannot distribute proportionally".to_string(),
        ));
    }

    let mut additions = Vec::with_capacity(recipients.len());
    for recipient in &recipients {
        let old_budget = recipient.metrics.record.spend;
        let add = total_reallocated * old_budget / top_spend;
        additions.push(BudgetChange {
            campaign: recipient.name().to_string(),
            old_budget,
            new_budget: old_budget + add,
            delta: add,
        });
    }

    let impact = project_impact(ranked, &additions, config);

    info!(
        total_reallocated,
        donors = cuts.len(),
        recipients = additions.len(),
        "Simulated budget reallocation"
    );

    Ok(ReallocationPlan {
        cuts,
        additions,
        total_reallocated,
        impact,
        computed_at: Utc::now(),
    })
}

/// Portfolio-level projection: additional conversions at the margin,
/// the shift in spend-share-weighted average ROI, and the portfolio
/// CPA saving. Top and bottom campaigns use projected revenue at their
/// new budget levels; everything else is unchanged.
fn project_impact(
    ranked: &[RankedCampaign],
    additions: &[BudgetChange],
    config: &AnalysisConfig,
) -> ProjectedImpact {
    let add_by_name: HashMap<&str, f64> = additions
        .iter()
        .map(|a| (a.campaign.as_str(), a.delta))
        .collect();

    // (spend, revenue) per campaign, before and after the plan.
    let mut pre = Vec::with_capacity(ranked.len());
    let mut post = Vec::with_capacity(ranked.len());
    let mut additional_conversions = 0.0;
    let (mut spend_pre, mut conversions_pre) = (0.0, 0.0);
    let (mut spend_post, mut conversions_post) = (0.0, 0.0);

    for campaign in ranked {
        let spend = campaign.metrics.record.spend;
        let conversions = campaign.metrics.record.conversions as f64;
        let revenue = campaign.metrics.revenue;

        pre.push((spend, revenue));
        spend_pre += spend;
        conversions_pre += conversions;

        let (new_spend, new_conversions) = match campaign.quintile {
            Quintile::Top => {
                let add = add_by_name.get(campaign.name()).copied().unwrap_or(0.0);
                // A zero-spend recipient gets a zero proportional share,
                // so no marginal efficiency is needed for it.
                let extra = if spend > 0.0 { add * conversions / spend } else { 0.0 };
                additional_conversions += extra;
                (spend + add, conversions + extra)
            }
            Quintile::Bottom => {
                let keep = 1.0 - config.cut_fraction;
                (spend * keep, conversions * keep)
            }
            Quintile::Middle => (spend, conversions),
        };

        post.push((new_spend, new_conversions * config.average_order_value));
        spend_post += new_spend;
        conversions_post += new_conversions;
    }

    let roi_delta = weighted_average_roi(&post).unwrap_or(0.0)
        - weighted_average_roi(&pre).unwrap_or(0.0);

    let cpa_delta = match (
        portfolio_cpa(spend_pre, conversions_pre),
        portfolio_cpa(spend_post, conversions_post),
    ) {
        (Some(old), Some(new)) => Some(old - new),
        _ => None,
    };

    ProjectedImpact {
        additional_conversions,
        roi_delta,
        cpa_delta,
    }
}

/// Spend-share-weighted average ROI (%) over `(spend, revenue)` pairs.
/// Zero-spend campaigns have undefined ROI and zero weight, so they
/// drop out; `None` when the whole portfolio has zero spend.
fn weighted_average_roi(entries: &[(f64, f64)]) -> Option<f64> {
    let total_spend: f64 = entries.iter().map(|(spend, _)| spend).sum();
    if total_spend <= 0.0 {
        return None;
    }
    let weighted = entries
        .iter()
        .filter(|(spend, _)| *spend > 0.0)
        .map(|(spend, revenue)| (spend / total_spend) * ((revenue - spend) / spend * 100.0))
        .sum();
    Some(weighted)
}

/// Portfolio CPA = total spend / total conversions; `None` with zero
/// conversions.
fn portfolio_cpa(spend: f64, conversions: f64) -> Option<f64> {
    if conversions > 0.0 {
        Some(spend / conversions)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
