//! Textual reporting and CSV export over the analysis output.
//!
//! Everything here consumes the core's structures read-only and builds
//! strings; nothing feeds back into the analysis.

pub mod export;
pub mod recommendations;
pub mod summary;

pub use export::{ranked_to_csv, write_results_csv};
pub use recommendations::{render_reallocation, render_recommendations};
pub use summary::render_summary;
