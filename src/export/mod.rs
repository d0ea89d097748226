//! Export utilities for analysis outputs

pub mod csv_export;

pub use csv_export::{TraceRecord, write_comparison_csv, write_max_q_trace};
