//! Core types for junction dependable-yield analysis.
//!
//! A [`series::Series`] holds one junction's dated flow values; an
//! [`table::ObservationTable`] holds several columns over a shared date axis
//! (years for a junction sheet, junctions for a flow or output sheet).

pub mod date_range;
pub mod error;
pub mod series;
pub mod table;

pub use error::{Result, YieldError};
pub use series::{DataPoint, Series};
pub use table::{Column, ObservationTable};
