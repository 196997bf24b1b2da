pub mod aggregate;
pub mod asset;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod error;
pub mod format;
pub mod metrics;
pub mod narrative;
pub mod pipeline;
pub mod report;
