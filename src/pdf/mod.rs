pub mod document;
pub mod merge;
pub mod overlay;
pub mod stamp;
pub mod writer;

pub use document::PdfDocument;
