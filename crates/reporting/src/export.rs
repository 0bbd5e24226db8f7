//! CSV export of the ranked results.

use std::fmt::Write as _;
use std::path::Path;

use adlens_core::error::AnalyzerResult;
use adlens_core::types::{PatternFlag, Quintile, RankedCampaign};
use tracing::info;

const HEADER: &str =
    "rank,campaign_name,impressions,clicks,conversions,spend,ctr,cpc,cpa,conversion_rate,revenue,roi,band,flags";

/// Serialize the ranked results as CSV text. Undefined ratios export
/// as empty fields; pattern flags are joined with `;`.
pub fn ranked_to_csv(ranked: &[RankedCampaign]) -> String {
    let mut out = String::with_capacity(64 * (ranked.len() + 1));
    out.push_str(HEADER);
    out.push('\n');

    for campaign in ranked {
        let r = &campaign.metrics.record;
        let m = &campaign.metrics;
        let _ = writeln!(
            out,
            "{},{},{},{},{},{:.2},{:.4},{:.4},{},{:.4},{:.2},{},{},{}",
            campaign.rank,
            escape(&r.name),
            r.impressions,
            r.clicks,
            r.conversions,
            r.spend,
            m.ctr,
            m.cpc,
            fmt_opt(m.cpa),
            m.conversion_rate,
            m.revenue,
            fmt_opt(m.roi),
            band(campaign.quintile),
            flags(&campaign.flags),
        );
    }

    out
}

/// Write the ranked results to a CSV file.
pub fn write_results_csv(path: impl AsRef<Path>, ranked: &[RankedCampaign]) -> AnalyzerResult<()> {
    let path = path.as_ref();
    std::fs::write(path, ranked_to_csv(ranked))?;
    info!(path = %path.display(), campaigns = ranked.len(), "Exported results CSV");
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}

fn band(quintile: Quintile) -> &'static str {
    match quintile {
        Quintile::Top => "top",
        Quintile::Middle => "middle",
        Quintile::Bottom => "bottom",
    }
}

fn flags(flags: &[PatternFlag]) -> String {
    flags
        .iter()
        .map(|f| match f {
            PatternFlag::HighTrafficLowConversion => "high_traffic_low_conversion",
            PatternFlag::QuickWin => "quick_win",
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Quote a name that would break the row structure.
fn escape(name: &str) -> String {
    if name.contains(',') || name.contains('"') || name.contains('\n') || name.contains('\r') {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}
