//! Metrics engine — derives the five performance ratios per campaign.

use adlens_core::config::AnalysisConfig;
use adlens_core::error::{AnalyzerError, AnalyzerResult};
use adlens_core::types::{CampaignMetrics, CampaignRecord};
use tracing::debug;

/// Compute one [`CampaignMetrics`] per record, preserving input order.
///
/// Every division-by-zero situation has a defined result: CTR, CPC and
/// conversion rate fall back to 0, while CPA and ROI become `None`
/// (cost per zero acquisitions and return on zero spend are not finite
/// numbers). Rejects an empty input set and records with negative or
/// non-finite spend before computing anything.
pub fn compute_metrics(
    records: &[CampaignRecord],
    config: &AnalysisConfig,
) -> AnalyzerResult<Vec<CampaignMetrics>> {
    if records.is_empty() {
        return Err(AnalyzerError::Config(
            "campaign set is empty; nothing to analyze".to_string(),
        ));
    }

    for record in records {
        validate_record(record)?;
    }

    let metrics: Vec<CampaignMetrics> = records
        .iter()
        .map(|record| derive_one(record, config))
        .collect();

    debug!(campaigns = metrics.len(), "Derived campaign metrics");
    Ok(metrics)
}

fn validate_record(record: &CampaignRecord) -> AnalyzerResult<()> {
    if !record.spend.is_finite() {
        return Err(AnalyzerError::InvalidRecord {
            campaign: record.name.clone(),
            field: "spend",
            reason: format!("must be a finite amount, got {}", record.spend),
        });
    }
    if record.spend < 0.0 {
        return Err(AnalyzerError::InvalidRecord {
            campaign: record.name.clone(),
            field: "spend",
            reason: format!("must be non-negative, got {}", record.spend),
        });
    }
    Ok(())
}

fn derive_one(record: &CampaignRecord, config: &AnalysisConfig) -> CampaignMetrics {
    let impressions = record.impressions as f64;
    let clicks = record.clicks as f64;
    let conversions = record.conversions as f64;
    let spend = record.spend;

    let ctr = if record.impressions > 0 {
        clicks / impressions * 100.0
    } else {
        0.0
    };
    let cpc = if record.clicks > 0 { spend / clicks } else { 0.0 };
    let cpa = if record.conversions > 0 {
        Some(spend / conversions)
    } else {
        None
    };
    let conversion_rate = if record.clicks > 0 {
        conversions / clicks * 100.0
    } else {
        0.0
    };

    let revenue = conversions * config.average_order_value;
    let roi = if spend > 0.0 {
        Some((revenue - spend) / spend * 100.0)
    } else {
        None
    };

    CampaignMetrics {
        record: record.clone(),
        ctr,
        cpc,
        cpa,
        conversion_rate,
        revenue,
        roi,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn record(name: &str, impressions: u64, clicks: u64, conversions: u64, spend: f64) -> CampaignRecord {
        CampaignRecord {
            name: name.to_string(),
            impressions,
            clicks,
            conversions,
            spend,
        }
    }

    // 1. Formula checks -----------------------------------------------------

    #[test]
    fn test_ratio_formulas() {
        let config = AnalysisConfig::default();
        let records = vec![record("summer-sale", 50_000, 2_000, 150, 3_000.0)];

        let metrics = compute_metrics(&records, &config).unwrap();
        let m = &metrics[0];

        assert!((m.ctr - 4.0).abs() < TOLERANCE);
        assert!((m.cpc - 1.5).abs() < TOLERANCE);
        assert!((m.cpa.unwrap() - 20.0).abs() < TOLERANCE);
        assert!((m.conversion_rate - 7.5).abs() < TOLERANCE);
        // 150 conversions x $50 AOV = $7 500 revenue
        assert!((m.revenue - 7_500.0).abs() < TOLERANCE);
        // (7 500 - 3 000) / 3 000 * 100 = 150%
        assert!((m.roi.unwrap() - 150.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_ctr_invariant_under_scaling() {
        let config = AnalysisConfig::default();
        let base = compute_metrics(&[record("a", 10_000, 400, 10, 100.0)], &config).unwrap();
        let scaled = compute_metrics(&[record("a", 70_000, 2_800, 10, 100.0)], &config).unwrap();

        assert!((base[0].ctr - scaled[0].ctr).abs() < TOLERANCE);
    }

    #[test]
    fn test_order_preserved() {
        let config = AnalysisConfig::default();
        let records = vec![
            record("c", 100, 10, 1, 10.0),
            record("a", 100, 10, 1, 10.0),
            record("b", 100, 10, 1, 10.0),
        ];

        let metrics = compute_metrics(&records, &config).unwrap();
        let names: Vec<&str> = metrics.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    // 2. Zero-division definitions ------------------------------------------

    #[test]
    fn test_zero_impressions_and_clicks() {
        let config = AnalysisConfig::default();
        let metrics = compute_metrics(&[record("dormant", 0, 0, 0, 0.0)], &config).unwrap();
        let m = &metrics[0];

        assert!((m.ctr).abs() < TOLERANCE);
        assert!((m.cpc).abs() < TOLERANCE);
        assert!((m.conversion_rate).abs() < TOLERANCE);
        assert!(m.cpa.is_none());
        assert!(m.roi.is_none());
    }

    #[test]
    fn test_spend_with_zero_clicks_is_valid() {
        // Spend without clicks is a flaggable state, not an error.
        let config = AnalysisConfig::default();
        let metrics = compute_metrics(&[record("ghost", 5_000, 0, 0, 250.0)], &config).unwrap();
        let m = &metrics[0];

        assert!((m.cpc).abs() < TOLERANCE);
        assert!(m.cpa.is_none());
        // Spend > 0, so ROI is defined (and deeply negative).
        assert!((m.roi.unwrap() - (-100.0)).abs() < TOLERANCE);
    }

    #[test]
    fn test_zero_conversions_with_spend() {
        let config = AnalysisConfig::default();
        let metrics = compute_metrics(&[record("leaky", 10_000, 500, 0, 400.0)], &config).unwrap();
        let m = &metrics[0];

        assert!(m.cpa.is_none());
        assert!((m.roi.unwrap() - (-100.0)).abs() < TOLERANCE);
    }

    // 3. Input validation ---------------------------------------------------

    #[test]
    fn test_empty_input_rejected() {
        let config = AnalysisConfig::default();
        assert!(matches!(
            compute_metrics(&[], &config),
            Err(AnalyzerError::Config(_))
        ));
    }

    #[test]
    fn test_negative_spend_rejected_with_context() {
        let config = AnalysisConfig::default();
        let err = compute_metrics(&[record("broken", 100, 10, 1, -5.0)], &config).unwrap_err();

        match err {
            AnalyzerError::InvalidRecord { campaign, field, .. } => {
                assert_eq!(campaign, "broken");
                assert_eq!(field, "spend");
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_spend_rejected() {
        let config = AnalysisConfig::default();
        assert!(compute_metrics(&[record("nan", 100, 10, 1, f64::NAN)], &config).is_err());
    }

    // 4. Configurable order value -------------------------------------------

    #[test]
    fn test_custom_average_order_value() {
        let config = AnalysisConfig {
            average_order_value: 120.0,
            ..AnalysisConfig::default()
        };
        let metrics = compute_metrics(&[record("premium", 1_000, 100, 10, 600.0)], &config).unwrap();

        assert!((metrics[0].revenue - 1_200.0).abs() < TOLERANCE);
        assert!((metrics[0].roi.unwrap() - 100.0).abs() < TOLERANCE);
    }
}
