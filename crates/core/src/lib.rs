pub mod config;
pub mod error;
pub mod types;

pub use config::{AnalysisConfig, AppConfig};
pub use error::{AnalyzerError, AnalyzerResult};
