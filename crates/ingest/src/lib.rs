//! CSV ingestion — turns tabular spend/engagement data into validated
//! [`adlens_core::types::CampaignRecord`] values, or fails the load
//! with the offending line and field named.

pub mod csv;

pub use csv::{load_campaigns, parse_campaigns};
