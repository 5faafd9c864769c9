use crate::page_range::PageRange;
use anyhow::{ensure, Context, Result};
use lopdf::{Document, ObjectId};
use std::io::Read;
use std::path::Path;

pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    /// Parse a PDF from an already opened stream.
    ///
    /// The stream is consumed and dropped before this returns.
    pub fn from_reader<R: Read, P: AsRef<Path>>(mut reader: R, path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();

        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .with_context(|| format!("Failed to read PDF: {}", path_str))?;
        drop(reader);

        let doc =
            Document::load_mem(&bytes).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        ensure!(
            !doc.trailer.has(b"Encrypt"),
            "Encrypted PDFs are not supported: {}",
            path_str
        );

        Ok(PdfDocument {
            doc,
            path: path_str,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        self.doc.get_pages().into_iter().collect()
    }

    /// Copy pages `range.start..=range.end` into a new document, in order.
    ///
    /// An empty range (end just before start) gives a document without pages.
    pub fn extract_range(&self, range: PageRange) -> Result<Document> {
        let total = self.page_count();
        let in_bounds = range.start >= 1 && range.start <= total && range.end <= total;
        ensure!(
            in_bounds && range.end + 1 >= range.start,
            "Page range {} is out of range (1-{})",
            range,
            total
        );

        let pages_to_delete: Vec<u32> = self
            .page_ids()
            .into_iter()
            .map(|(num, _)| num)
            .filter(|num| *num < range.start || *num > range.end)
            .collect();

        let mut new_doc = self.doc.clone();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
            new_doc.prune_objects();
        }

        Ok(new_doc)
    }
}
