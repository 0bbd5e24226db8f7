//! Analytics core — per-campaign metric derivation, ROI ranking,
//! quintile segmentation, and the budget-reallocation simulation.
//!
//! Every stage is a pure transformation over an in-memory collection:
//! no I/O, no shared mutable state, no suspension points. Data flows
//! strictly forward: records → metrics → ranking → segments → plan.

pub mod metrics;
pub mod pipeline;
pub mod ranker;
pub mod reallocation;
pub mod segments;

pub use pipeline::run_analysis;
