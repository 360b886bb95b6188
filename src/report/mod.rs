//! Report aggregation and emission
//!
//! Every valid case becomes exactly one CSV row, whatever happened to its
//! fragments during analysis. Process-level counters live in
//! [`RunSummary`].

mod aggregate;
mod summary;
mod writer;

pub use aggregate::{
    CaseReport, FragmentReport, ReportAggregator, REPORT_COLUMNS, STATUS_ERROR, STATUS_NOT_FOUND,
};
pub use summary::RunSummary;
pub use writer::{write_report, write_report_file};
