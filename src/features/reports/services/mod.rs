pub mod line_aggregator;
mod report_service;

pub use report_service::ReportService;
