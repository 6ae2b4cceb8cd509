//! coin-pulse: crypto spot price collector and dashboard
//!
//! This library provides the components for:
//! - Polling exchange ticker endpoints (Gate.io, CoinCap)
//! - Appending price samples to a Parquet file or a hosted table
//! - A threshold-based paper trading rule over simulated balances
//! - A text dashboard with chart, change metric and AI commentary
//! - Logging and Prometheus textfile metrics

pub mod analyst;
pub mod cli;
pub mod collector;
pub mod config;
pub mod dashboard;
pub mod execution;
pub mod feed;
pub mod store;
pub mod telemetry;
