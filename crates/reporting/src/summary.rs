//! Ranked performance summary table.

use std::fmt::Write;

use adlens_core::types::{Quintile, RankedCampaign};

const RULE_WIDTH: usize = 112;

/// Render the ranked campaign table. Undefined ratios (CPA/ROI) show
/// as `-`.
pub fn render_summary(ranked: &[RankedCampaign]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "CAMPAIGN PERFORMANCE SUMMARY");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "{:>4}  {:<24} {:>12} {:>8} {:>6} {:>11} {:>7} {:>8} {:>9} {:>9} {:>9}  {}",
        "rank",
        "campaign",
        "impressions",
        "clicks",
        "conv",
        "spend",
        "ctr%",
        "cpc",
        "cpa",
        "conv%",
        "roi%",
        "band"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for campaign in ranked {
        let r = &campaign.metrics.record;
        let m = &campaign.metrics;
        let _ = writeln!(
            out,
            "{:>4}  {:<24} {:>12} {:>8} {:>6} {:>11.2} {:>7.2} {:>8.2} {:>9} {:>9.2} {:>9}  {}",
            campaign.rank,
            r.name,
            r.impressions,
            r.clicks,
            r.conversions,
            r.spend,
            m.ctr,
            m.cpc,
            fmt_opt(m.cpa),
            m.conversion_rate,
            fmt_opt(m.roi),
            band_label(campaign.quintile),
        );
    }
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    out
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn band_label(quintile: Quintile) -> &'static str {
    match quintile {
        Quintile::Top => "top",
        Quintile::Middle => "middle",
        Quintile::Bottom => "bottom",
    }
}
