use serde::Deserialize;

use crate::error::{AnalyzerError, AnalyzerResult};

/// Tunable analysis assumptions. Passed explicitly into each pipeline
/// stage so analyses with different assumptions can run side by side
/// without interfering.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Revenue assumed per conversion. Revenue is never derived from
    /// the input data.
    #[serde(default = "default_average_order_value")]
    pub average_order_value: f64,
    /// Fraction of each bottom-quintile budget moved to the top
    /// quintile. Must lie in `[0, 1]`.
    #[serde(default = "default_cut_fraction")]
    pub cut_fraction: f64,
    /// CTR (in %) at or above which a campaign counts as "good
    /// traffic" for pattern flagging.
    #[serde(default = "default_good_ctr_threshold")]
    pub good_ctr_threshold: f64,
    /// Conversion rate (in %) below which a campaign counts as
    /// "needs work" for pattern flagging.
    #[serde(default = "default_needs_work_conversion_rate")]
    pub needs_work_conversion_rate: f64,
}

fn default_average_order_value() -> f64 {
    50.0
}
fn default_cut_fraction() -> f64 {
    0.5
}
fn default_good_ctr_threshold() -> f64 {
    4.0
}
fn default_needs_work_conversion_rate() -> f64 {
    6.0
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            average_order_value: default_average_order_value(),
            cut_fraction: default_cut_fraction(),
            good_ctr_threshold: default_good_ctr_threshold(),
            needs_work_conversion_rate: default_needs_work_conversion_rate(),
        }
    }
}

impl AnalysisConfig {
    /// Reject invalid thresholds before any data is processed.
    pub fn validate(&self) -> AnalyzerResult<()> {
        if !self.cut_fraction.is_finite() || !(0.0..=1.0).contains(&self.cut_fraction) {
            return Err(AnalyzerError::Config(format!(
                "cut_fraction must be within [0, 1], got {}",
                self.cut_fraction
            )));
        }
        if !self.average_order_value.is_finite() || self.average_order_value <= 0.0 {
            return Err(AnalyzerError::Config(format!(
                "average_order_value must be positive, got {}",
                self.average_order_value
            )));
        }
        if !self.good_ctr_threshold.is_finite() || self.good_ctr_threshold < 0.0 {
            return Err(AnalyzerError::Config(format!(
                "good_ctr_threshold must be non-negative, got {}",
                self.good_ctr_threshold
            )));
        }
        if !self.needs_work_conversion_rate.is_finite() || self.needs_work_conversion_rate < 0.0 {
            return Err(AnalyzerError::Config(format!(
                "needs_work_conversion_rate must be non-negative, got {}",
                self.needs_work_conversion_rate
            )));
        }
        Ok(())
    }
}

/// Root application configuration for the CLI binary. Loaded from
/// environment variables with the prefix `ADLENS__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Input CSV path; the CLI positional argument overrides it.
    #[serde(default)]
    pub input_path: Option<String>,
    /// Optional path to export the ranked results as CSV.
    #[serde(default)]
    pub output_csv: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("ADLENS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
