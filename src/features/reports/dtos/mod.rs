pub mod report_dto;

pub use report_dto::{
    EntryStatus, LineOutcome, LineRequestDto, RejectReason, ReportDetailDto, ReportLineDto,
    ReportRequestDto, ReportSavedDto, ReportSummaryDto,
};
