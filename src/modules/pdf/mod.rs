pub mod layout;
pub mod renderer;
pub mod text;

pub use layout::{DocumentLine, ReportDocument};
pub use renderer::ReportPdfRenderer;
