//! Shared data model for the analysis pipeline.
//!
//! Every stage consumes an immutable snapshot produced by its
//! predecessor and produces a new structure; nothing here is mutated
//! after construction except by the stage that owns it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row of spend/engagement data for a single campaign.
///
/// `clicks <= impressions` is expected of real data but not enforced
/// here; the ratios stay well defined either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    /// Unique campaign name; downstream structures reference campaigns
    /// by this name.
    pub name: String,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: f64,
}

// ---------------------------------------------------------------------------
// Derived metrics
// ---------------------------------------------------------------------------

/// Performance ratios derived from one [`CampaignRecord`].
///
/// Percentage metrics (`ctr`, `conversion_rate`, `roi`) are already
/// scaled by 100: a `ctr` of 4.5 means 4.5%. `cpa` and `roi` are
/// `None` when the denominator makes the ratio meaningless (zero
/// conversions, zero spend) — never NaN or infinity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignMetrics {
    pub record: CampaignRecord,
    /// Clicks per impression, %. 0 when there are no impressions.
    pub ctr: f64,
    /// Spend per click. 0 when there are no clicks; spend with zero
    /// clicks is a valid, flaggable state.
    pub cpc: f64,
    /// Spend per conversion. `None` when conversions = 0.
    pub cpa: Option<f64>,
    /// Conversions per click, %. 0 when there are no clicks.
    pub conversion_rate: f64,
    /// `conversions * average_order_value`.
    pub revenue: f64,
    /// `(revenue - spend) / spend`, %. `None` when spend = 0.
    pub roi: Option<f64>,
}

impl CampaignMetrics {
    pub fn name(&self) -> &str {
        &self.record.name
    }
}

// ---------------------------------------------------------------------------
// Ranking and segmentation
// ---------------------------------------------------------------------------

/// ROI-rank band a campaign falls into. Not a statistical quintile:
/// `Top`/`Bottom` are the 20%-sized bands at either end of the
/// ranking, everything else is `Middle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quintile {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Qualitative annotation attached by the segment classifier.
/// Informational only — never affects ranking or quintile membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternFlag {
    /// CTR at or above the "good" threshold while the conversion rate
    /// sits below the "needs work" threshold — traffic arrives but
    /// does not convert.
    HighTrafficLowConversion,
    /// Below-median ROI but above-median conversion rate — an
    /// efficient campaign that looks underfunded or underpriced.
    QuickWin,
}

/// A campaign with its metrics, stable rank, quintile band, and flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCampaign {
    pub metrics: CampaignMetrics,
    /// 1 = highest ROI. Ranks are a gapless permutation of `1..=N`.
    pub rank: usize,
    pub quintile: Quintile,
    pub flags: Vec<PatternFlag>,
}

impl RankedCampaign {
    pub fn name(&self) -> &str {
        self.metrics.name()
    }
}

// ---------------------------------------------------------------------------
// Reallocation plan
// ---------------------------------------------------------------------------

/// One proposed budget move for a single campaign. `delta` is negative
/// for cuts and positive for additions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetChange {
    pub campaign: String,
    pub old_budget: f64,
    pub new_budget: f64,
    pub delta: f64,
}

/// Portfolio-level projection of what the plan would achieve if the
/// per-dollar efficiency of each touched campaign held at the margin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectedImpact {
    pub additional_conversions: f64,
    /// Post-plan minus pre-plan spend-share-weighted average ROI, in
    /// percentage points.
    pub roi_delta: f64,
    /// Pre-plan minus post-plan portfolio CPA (positive = savings).
    /// `None` when the portfolio has zero conversions on either side.
    pub cpa_delta: Option<f64>,
}

/// The terminal artifact of an analysis run: a proposed, unapplied
/// transfer of budget from the bottom quintile to the top one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReallocationPlan {
    /// Bottom-quintile reductions, in rank order.
    pub cuts: Vec<BudgetChange>,
    /// Top-quintile additions, in rank order.
    pub additions: Vec<BudgetChange>,
    pub total_reallocated: f64,
    pub impact: ProjectedImpact,
    pub computed_at: DateTime<Utc>,
}

impl ReallocationPlan {
    /// A plan that moves nothing. Produced when there are fewer than
    /// two campaigns or no donor/recipient split exists.
    pub fn empty() -> Self {
        Self {
            cuts: Vec::new(),
            additions: Vec::new(),
            total_reallocated: 0.0,
            impact: ProjectedImpact {
                additional_conversions: 0.0,
                roi_delta: 0.0,
                cpa_delta: None,
            },
            computed_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty() && self.additions.is_empty()
    }
}

/// Everything one analysis run produces, in the order external
/// reporting consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub ranked: Vec<RankedCampaign>,
    pub plan: ReallocationPlan,
}
