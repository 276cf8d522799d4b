//! Export adapter. Writes resolved ticket sales as CSV reports.

pub mod csv_report;

pub use csv_report::{tickets_to_csv, write_sales_report};
