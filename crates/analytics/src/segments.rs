//! Segment classifier — quintile banding and qualitative pattern flags.

use adlens_core::config::AnalysisConfig;
use adlens_core::types::{PatternFlag, Quintile, RankedCampaign};
use tracing::debug;

/// Label the ranked set with quintile bands and pattern flags.
///
/// Quintile size is `k = round(0.2 * N)`, at least 1, shrunk to
/// `floor(N / 2)` whenever `2k > N` so the top and bottom bands can
/// never overlap. The first `k` ranked campaigns become `Top`, the
/// last `k` become `Bottom`, everything else `Middle`. Flags are
/// evaluated independently of quintile membership and never influence
/// the ranking.
pub fn classify(ranked: &mut [RankedCampaign], config: &AnalysisConfig) {
    let n = ranked.len();
    if n == 0 {
        return;
    }

    let k = quintile_size(n);
    for (i, campaign) in ranked.iter_mut().enumerate() {
        campaign.quintile = if i < k {
            Quintile::Top
        } else if i >= n - k {
            Quintile::Bottom
        } else {
            Quintile::Middle
        };
    }

    apply_pattern_flags(ranked, config);

    debug!(campaigns = n, quintile_size = k, "Classified campaign segments");
}

/// `round(0.2 * N)` clamped to at least 1, shrunk to `floor(N / 2)`
/// when the bands would otherwise overlap. Yields 0 only for N = 1,
/// where the single campaign stays `Middle`.
fn quintile_size(n: usize) -> usize {
    let k = ((0.2 * n as f64).round() as usize).max(1);
    if 2 * k > n {
        n / 2
    } else {
        k
    }
}

fn apply_pattern_flags(ranked: &mut [RankedCampaign], config: &AnalysisConfig) {
    let finite_rois: Vec<f64> = ranked.iter().filter_map(|c| c.metrics.roi).collect();
    let roi_median = median(&finite_rois);
    let conversion_rates: Vec<f64> = ranked.iter().map(|c| c.metrics.conversion_rate).collect();
    let conversion_median = median(&conversion_rates);

    for campaign in ranked.iter_mut() {
        let m = &campaign.metrics;

        if m.ctr >= config.good_ctr_threshold
            && m.conversion_rate < config.needs_work_conversion_rate
        {
            campaign.flags.push(PatternFlag::HighTrafficLowConversion);
        }

        if let (Some(roi), Some(roi_med), Some(conv_med)) = (m.roi, roi_median, conversion_median) {
            if roi < roi_med && m.conversion_rate > conv_med {
                campaign.flags.push(PatternFlag::QuickWin);
            }
        }
    }
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

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use adlens_core::types::{CampaignMetrics, CampaignRecord};

    fn ranked_set(count: usize) -> Vec<RankedCampaign> {
        (0..count)
            .map(|i| ranked_campaign(&format!("c{i:02}"), i + 1, Some(500.0 - i as f64 * 10.0), 2.0, 8.0))
            .collect()
    }

    fn ranked_campaign(
        name: &str,
        rank: usize,
        roi: Option<f64>,
        ctr: f64,
        conversion_rate: f64,
    ) -> RankedCampaign {
        RankedCampaign {
            metrics: CampaignMetrics {
                record: CampaignRecord {
                    name: name.to_string(),
                    impressions: 10_000,
                    clicks: 200,
                    conversions: 16,
                    spend: 400.0,
                },
                ctr,
                cpc: 2.0,
                cpa: Some(25.0),
                conversion_rate,
                revenue: 800.0,
                roi,
            },
            rank,
            quintile: Quintile::default(),
            flags: Vec::new(),
        }
    }

    fn count_quintile(set: &[RankedCampaign], quintile: Quintile) -> usize {
        set.iter().filter(|c| c.quintile == quintile).count()
    }

    // 1. Quintile sizing ----------------------------------------------------

    #[test]
    fn test_fifteen_campaigns_get_three_per_band() {
        let mut set = ranked_set(15);
        classify(&mut set, &AnalysisConfig::default());

        assert_eq!(count_quintile(&set, Quintile::Top), 3);
        assert_eq!(count_quintile(&set, Quintile::Bottom), 3);
        assert_eq!(count_quintile(&set, Quintile::Middle), 9);
        // Bands follow rank order.
        assert_eq!(set[0].quintile, Quintile::Top);
        assert_eq!(set[14].quintile, Quintile::Bottom);
    }

    #[test]
    fn test_four_campaigns_do_not_overlap() {
        let mut set = ranked_set(4);
        classify(&mut set, &AnalysisConfig::default());

        assert_eq!(count_quintile(&set, Quintile::Top), 1);
        assert_eq!(count_quintile(&set, Quintile::Bottom), 1);
        assert_eq!(count_quintile(&set, Quintile::Middle), 2);
    }

    #[test]
    fn test_three_campaigns_leave_one_middle() {
        let mut set = ranked_set(3);
        classify(&mut set, &AnalysisConfig::default());

        assert_eq!(count_quintile(&set, Quintile::Top), 1);
        assert_eq!(count_quintile(&set, Quintile::Middle), 1);
        assert_eq!(count_quintile(&set, Quintile::Bottom), 1);
    }

    #[test]
    fn test_two_campaigns_split_top_bottom() {
        let mut set = ranked_set(2);
        classify(&mut set, &AnalysisConfig::default());

        assert_eq!(set[0].quintile, Quintile::Top);
        assert_eq!(set[1].quintile, Quintile::Bottom);
    }

    #[test]
    fn test_single_campaign_stays_middle() {
        let mut set = ranked_set(1);
        classify(&mut set, &AnalysisConfig::default());

        assert_eq!(set[0].quintile, Quintile::Middle);
    }

    #[test]
    fn test_quintile_size_table() {
        assert_eq!(quintile_size(1), 0);
        assert_eq!(quintile_size(2), 1);
        assert_eq!(quintile_size(4), 1);
        assert_eq!(quintile_size(5), 1);
        assert_eq!(quintile_size(10), 2);
        assert_eq!(quintile_size(15), 3);
        assert_eq!(quintile_size(23), 5);
    }

    // 2. Pattern flags ------------------------------------------------------

    #[test]
    fn test_high_traffic_low_conversion_flag() {
        let mut set = vec![
            ranked_campaign("clicky", 1, Some(100.0), 5.5, 2.0),
            ranked_campaign("steady", 2, Some(50.0), 1.0, 9.0),
        ];
        classify(&mut set, &AnalysisConfig::default());

        assert!(set[0].flags.contains(&PatternFlag::HighTrafficLowConversion));
        assert!(!set[1].flags.contains(&PatternFlag::HighTrafficLowConversion));
    }

    #[test]
    fn test_ctr_exactly_at_threshold_counts() {
        let mut set = vec![
            ranked_campaign("edge", 1, Some(100.0), 4.0, 5.9),
            ranked_campaign("pad", 2, Some(50.0), 1.0, 9.0),
        ];
        classify(&mut set, &AnalysisConfig::default());

        assert!(set[0].flags.contains(&PatternFlag::HighTrafficLowConversion));
    }

    #[test]
    fn test_quick_win_flag() {
        // ROIs: 400, 300, 100, 50 -> median 200. Conversion rates:
        // 2, 2, 12, 2 -> median 2. Only "sleeper" is below the ROI
        // median with an above-median conversion rate.
        let mut set = vec![
            ranked_campaign("lead", 1, Some(400.0), 2.0, 2.0),
            ranked_campaign("second", 2, Some(300.0), 2.0, 2.0),
            ranked_campaign("sleeper", 3, Some(100.0), 2.0, 12.0),
            ranked_campaign("trail", 4, Some(50.0), 2.0, 2.0),
        ];
        classify(&mut set, &AnalysisConfig::default());

        assert!(set[2].flags.contains(&PatternFlag::QuickWin));
        assert!(!set[0].flags.contains(&PatternFlag::QuickWin));
        assert!(!set[3].flags.contains(&PatternFlag::QuickWin));
    }

    #[test]
    fn test_undefined_roi_never_quick_win() {
        let mut set = vec![
            ranked_campaign("scored", 1, Some(100.0), 2.0, 3.0),
            ranked_campaign("unscored", 2, None, 2.0, 50.0),
        ];
        classify(&mut set, &AnalysisConfig::default());

        assert!(!set[1].flags.contains(&PatternFlag::QuickWin));
    }

    #[test]
    fn test_flags_do_not_change_bands() {
        let mut flagged = vec![
            ranked_campaign("a", 1, Some(300.0), 9.0, 1.0),
            ranked_campaign("b", 2, Some(200.0), 9.0, 1.0),
            ranked_campaign("c", 3, Some(100.0), 9.0, 1.0),
        ];
        let mut plain = vec![
            ranked_campaign("a", 1, Some(300.0), 1.0, 9.0),
            ranked_campaign("b", 2, Some(200.0), 1.0, 9.0),
            ranked_campaign("c", 3, Some(100.0), 1.0, 9.0),
        ];
        let config = AnalysisConfig::default();
        classify(&mut flagged, &config);
        classify(&mut plain, &config);

        for (f, p) in flagged.iter().zip(plain.iter()) {
            assert_eq!(f.quintile, p.quintile);
        }
    }

    // 3. Median helper ------------------------------------------------------

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0]), Some(3.0));
        assert_eq!(median(&[1.0, 9.0]), Some(5.0));
        assert_eq!(median(&[5.0, 1.0, 9.0]), Some(5.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
    }
}
