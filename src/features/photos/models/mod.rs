mod report_photo;

pub use report_photo::ReportPhoto;
