//! Minimal CSV reader for the fixed campaign-data column layout.

use std::collections::HashSet;
use std::path::Path;

use adlens_core::error::{AnalyzerError, AnalyzerResult};
use adlens_core::types::CampaignRecord;
use tracing::info;

/// Expected header, in column order.
const EXPECTED_HEADER: [&str; 5] = [
    "campaign_name",
    "impressions",
    "clicks",
    "conversions",
    "spend",
];

/// Load and parse a campaign CSV file.
pub fn load_campaigns(path: impl AsRef<Path>) -> AnalyzerResult<Vec<CampaignRecord>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let records = parse_campaigns(&text)?;
    info!(campaigns = records.len(), path = %path.display(), "Loaded campaign data");
    Ok(records)
}

/// Parse campaign CSV text. The first non-blank line must be the
/// header `campaign_name,impressions,clicks,conversions,spend`; blank
/// lines are skipped. Names must be non-empty and unique; counts must
/// be non-negative integers and spend a non-negative decimal amount.
pub fn parse_campaigns(text: &str) -> AnalyzerResult<Vec<CampaignRecord>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| AnalyzerError::Ingest("input is empty".to_string()))?;
    validate_header(header)?;

    let mut records = Vec::new();
    let mut seen_names: HashSet<String> = HashSet::new();

    for (line_no, line) in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != EXPECTED_HEADER.len() {
            return Err(AnalyzerError::Ingest(format!(
                "line {line_no}: expected {} fields, got {}",
                EXPECTED_HEADER.len(),
                fields.len()
            )));
        }

        let name = fields[0];
        if name.is_empty() {
            return Err(AnalyzerError::Ingest(format!(
                "line {line_no}: campaign_name is empty"
            )));
        }
        if !seen_names.insert(name.to_string()) {
            return Err(AnalyzerError::Ingest(format!(
                "line {line_no}: duplicate campaign name '{name}'"
            )));
        }

        records.push(CampaignRecord {
            name: name.to_string(),
            impressions: parse_count(name, "impressions", fields[1])?,
            clicks: parse_count(name, "clicks", fields[2])?,
            conversions: parse_count(name, "conversions", fields[3])?,
            spend: parse_spend(name, fields[4])?,
        });
    }

    Ok(records)
}

fn validate_header(header: &str) -> AnalyzerResult<()> {
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    if columns != EXPECTED_HEADER {
        return Err(AnalyzerError::Ingest(format!(
            "unexpected header '{}'; expected '{}'",
            header.trim(),
            EXPECTED_HEADER.join(",")
        )));
    }
    Ok(())
}

/// Counts are parsed through i64 first so a negative value is reported
/// as a validation failure rather than a generic parse error.
fn parse_count(campaign: &str, field: &'static str, raw: &str) -> AnalyzerResult<u64> {
    let value: i64 = raw.parse().map_err(|_| AnalyzerError::Ingest(format!(
        "campaign '{campaign}': {field} is not an integer ('{raw}')"
    )))?;
    u64::try_from(value).map_err(|_| AnalyzerError::InvalidRecord {
        campaign: campaign.to_string(),
        field,
        reason: format!("must be non-negative, got {value}"),
    })
}

fn parse_spend(campaign: &str, raw: &str) -> AnalyzerResult<f64> {
    let value: f64 = raw.parse().map_err(|_| AnalyzerError::Ingest(format!(
        "campaign '{campaign}': spend is not a number ('{raw}')"
    )))?;
    if !value.is_finite() || value < 0.0 {
        return Err(AnalyzerError::InvalidRecord {
            campaign: campaign.to_string(),
            field: "spend",
            reason: format!("must be a non-negative amount, got {raw}"),
        });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
