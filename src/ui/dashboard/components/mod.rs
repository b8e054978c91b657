//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod chart;
pub mod emergency;
pub mod footer;
pub mod header;
pub mod info_panel;
pub mod kpi;
pub mod logs;
pub mod overlay;
pub mod positions;
