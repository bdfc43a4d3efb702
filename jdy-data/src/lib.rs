//! Dependable-yield and threshold analysis for junction flow series.
//!
//! - [`percentile`]: per-date percentile across year columns (the 75%
//!   dependable yield) and the date × junction aggregate table
//! - [`stats`]: min/max/mean companions and whole-season overviews
//! - [`threshold`]: runs of dates at or above each capacity threshold
//! - [`period`]: "Early Jun – Late Oct" style labels
//! - [`summary`]: the Capacity / Days / Period table built from the runs

pub mod percentile;
pub mod period;
pub mod stats;
pub mod summary;
pub mod threshold;
