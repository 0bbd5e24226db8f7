//! Optimization recommendations and the reallocation report.

use std::fmt::Write;

use adlens_core::types::{PatternFlag, Quintile, RankedCampaign, ReallocationPlan};

const RULE_WIDTH: usize = 100;

/// Render the actionable recommendation report: top performers to
/// scale, underperformers to fix, pattern-flag call-outs, and
/// portfolio-level budget insights.
pub fn render_recommendations(ranked: &[RankedCampaign]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "OPTIMIZATION RECOMMENDATIONS");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    // Top performers.
    let _ = writeln!(out, "\nTOP PERFORMERS (scale up):");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    for campaign in ranked.iter().filter(|c| c.quintile == Quintile::Top) {
        let m = &campaign.metrics;
        let _ = writeln!(
            out,
            "   {}. {} — ROI {} | CPA {} | conversion rate {:.2}%",
            campaign.rank,
            campaign.name(),
            fmt_pct(m.roi),
            fmt_money(m.cpa),
            m.conversion_rate,
        );
    }

    // Underperformers, with metric-specific hints against the
    // portfolio medians.
    let ctr_median = median(&ranked.iter().map(|c| c.metrics.ctr).collect::<Vec<_>>());
    let conversion_median = median(
        &ranked
            .iter()
            .map(|c| c.metrics.conversion_rate)
            .collect::<Vec<_>>(),
    );

    let _ = writeln!(out, "\nUNDERPERFORMERS (optimize or pause):");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    for campaign in ranked.iter().filter(|c| c.quintile == Quintile::Bottom) {
        let m = &campaign.metrics;
        let _ = writeln!(
            out,
            "   {}. {} — ROI {} | CPA {} | conversion rate {:.2}%",
            campaign.rank,
            campaign.name(),
            fmt_pct(m.roi),
            fmt_money(m.cpa),
            m.conversion_rate,
        );
        if matches!(ctr_median, Some(med) if m.ctr < med) {
            let _ = writeln!(
                out,
                "      low CTR ({:.2}%): test new ad creative, headlines, or targeting",
                m.ctr
            );
        }
        if matches!(conversion_median, Some(med) if m.conversion_rate < med) {
            let _ = writeln!(
                out,
                "      low conversion rate ({:.2}%): optimize landing page or audience targeting",
                m.conversion_rate
            );
        }
        if matches!(m.roi, Some(roi) if roi < 0.0) {
            let _ = writeln!(out, "      negative ROI: consider pausing and reallocating");
        }
    }

    // Pattern-flag sections.
    let high_traffic: Vec<&RankedCampaign> = ranked
        .iter()
        .filter(|c| c.flags.contains(&PatternFlag::HighTrafficLowConversion))
        .collect();
    if !high_traffic.is_empty() {
        let _ = writeln!(out, "\nHIGH TRAFFIC, LOW CONVERSION (landing-page work needed):");
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
        for campaign in high_traffic {
            let m = &campaign.metrics;
            let _ = writeln!(
                out,
                "   - {} — CTR {:.2}% (good) | conversion rate {:.2}% (needs work)",
                campaign.name(),
                m.ctr,
                m.conversion_rate,
            );
        }
    }

    let quick_wins: Vec<&RankedCampaign> = ranked
        .iter()
        .filter(|c| c.flags.contains(&PatternFlag::QuickWin))
        .collect();
    let _ = writeln!(out, "\nQUICK WINS:");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    if quick_wins.is_empty() {
        let _ = writeln!(out, "   none identified; focus on the underperformers");
    } else {
        for campaign in quick_wins {
            let m = &campaign.metrics;
            let _ = writeln!(
                out,
                "   - {}: converts at {:.2}% on only {} spend",
                campaign.name(),
                m.conversion_rate,
                fmt_money(Some(m.record.spend)),
            );
        }
    }

    // Portfolio insights.
    let total_spend: f64 = ranked.iter().map(|c| c.metrics.record.spend).sum();
    let total_conversions: u64 = ranked.iter().map(|c| c.metrics.record.conversions).sum();
    let portfolio_cpa = (total_conversions > 0).then(|| total_spend / total_conversions as f64);

    let _ = writeln!(out, "\nBUDGET ALLOCATION INSIGHTS:");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(out, "   total spend:       {}", fmt_money(Some(total_spend)));
    let _ = writeln!(out, "   total conversions: {total_conversions}");
    let _ = writeln!(out, "   portfolio CPA:     {}", fmt_money(portfolio_cpa));
    if let Some(avg_cpa) = portfolio_cpa {
        // Campaigns with undefined CPA (zero conversions) fall in
        // neither count.
        let efficient = ranked
            .iter()
            .filter(|c| matches!(c.metrics.cpa, Some(cpa) if cpa < avg_cpa))
            .count();
        let inefficient = ranked
            .iter()
            .filter(|c| matches!(c.metrics.cpa, Some(cpa) if cpa > avg_cpa))
            .count();
        let _ = writeln!(
            out,
            "   {efficient} campaigns above average (CPA < {})",
            fmt_money(Some(avg_cpa))
        );
        let _ = writeln!(
            out,
            "   {inefficient} campaigns below average (CPA > {})",
            fmt_money(Some(avg_cpa))
        );
        let _ = writeln!(
            out,
            "   shift budget from below-average to above-average campaigns to reduce overall CPA"
        );
    }
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    out
}

/// Median of a slice; the mean of the two middle values for even
/// lengths, `None` for an empty slice.
fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Render the what-to-cut / what-to-add report with the projected
/// impact. An empty plan renders a single explanatory line.
pub fn render_reallocation(plan: &ReallocationPlan) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "BUDGET REALLOCATION PLAN");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    if plan.is_empty() {
        let _ = writeln!(
            out,
            "   no reallocation possible: need at least one donor and one recipient"
        );
        let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
        return out;
    }

    let _ = writeln!(out, "\nCUT (bottom quintile):");
    for change in &plan.cuts {
        let _ = writeln!(
            out,
            "   {:<24} {:>11.2} -> {:>11.2}  ({:+.2})",
            change.campaign, change.old_budget, change.new_budget, change.delta
        );
    }

    let _ = writeln!(out, "\nADD (top quintile, proportional to current spend):");
    for change in &plan.additions {
        let _ = writeln!(
            out,
            "   {:<24} {:>11.2} -> {:>11.2}  ({:+.2})",
            change.campaign, change.old_budget, change.new_budget, change.delta
        );
    }

    let _ = writeln!(out, "\n   total reallocated: {:.2}", plan.total_reallocated);
    let _ = writeln!(out, "\nPROJECTED IMPACT:");
    let _ = writeln!(
        out,
        "   additional conversions: {:+.1}",
        plan.impact.additional_conversions
    );
    let _ = writeln!(
        out,
        "   portfolio ROI change:   {:+.2} pts",
        plan.impact.roi_delta
    );
    match plan.impact.cpa_delta {
        Some(delta) => {
            let _ = writeln!(out, "   portfolio CPA savings:  {delta:+.2}");
        }
        None => {
            let _ = writeln!(out, "   portfolio CPA savings:  n/a (no conversions)");
        }
    }
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    out
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "n/a".to_string(),
    }
}

fn fmt_money(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${v:.2}"),
        None => "n/a".to_string(),
    }
}
