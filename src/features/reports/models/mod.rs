mod line_snapshot;
mod report;

pub use line_snapshot::LineSnapshot;
pub use report::{Report, ReportHeader, ReportLineItem, ReportSummary};
