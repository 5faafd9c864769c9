use crate::error::UsageError;
use crate::page_range::PageRange;
use crate::pdf::stamp::{stamp_page_numbers, StampStyle};
use crate::pdf::writer::write_into;
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

pub struct RenumberOptions {
    pub input: PathBuf,
    pub pages: String,
    pub out_dir: PathBuf,
    pub style: StampStyle,
}

/// Extract the requested pages, number them from 1 and write the result.
///
/// User mistakes come back as a [`UsageError`] inside the `anyhow::Error`;
/// nothing is written in that case. Returns the path of the new file.
pub fn run(options: &RenumberOptions) -> Result<PathBuf> {
    let input = &options.input;
    if !input.exists() {
        return Err(UsageError::MissingFile(input.clone()).into());
    }
    if !input.is_file() {
        return Err(UsageError::Unreadable {
            path: input.clone(),
            reason: "not a regular file".to_string(),
        }
        .into());
    }
    let file = File::open(input).map_err(|err| UsageError::Unreadable {
        path: input.clone(),
        reason: err.to_string(),
    })?;

    let requested = PageRange::parse(&options.pages)?;

    let source = PdfDocument::from_reader(file, input)?;
    let total_pages = source.page_count();
    info!(path = %source.path, pages = total_pages, "opened document");

    let range = requested.bound_to(total_pages)?;
    if requested.is_clamped_by(&range) {
        info!(requested_end = requested.end, end = range.end, "end page clamped to document size");
    }
    if range.is_empty() {
        info!(%range, "range is empty after clamping");
    }
    info!(%range, pages = range.len(), "extracting pages");

    let mut doc = source.extract_range(range)?;
    drop(source);

    let stamped = stamp_page_numbers(&mut doc, &options.style)?;
    info!(pages = stamped, "stamped page numbers");

    let path = write_into(&mut doc, &options.out_dir, &range.output_file_name())?;
    info!(path = %path.display(), "wrote document");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::{sample_pdf, stamped_numbers};
    use lopdf::Document;
    use std::fs;
    use std::path::Path;

    fn options(input: &Path, pages: &str, out_dir: &Path) -> RenumberOptions {
        RenumberOptions {
            input: input.to_path_buf(),
            pages: pages.to_string(),
            out_dir: out_dir.to_path_buf(),
            style: StampStyle::default(),
        }
    }

    fn usage_error(result: Result<PathBuf>) -> UsageError {
        result
            .unwrap_err()
            .downcast::<UsageError>()
            .expect("expected a usage error")
    }

    #[test]
    fn test_extract_and_number() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("doc.pdf");
        fs::write(&input, sample_pdf(20)).unwrap();
        let out_dir = tmp.path().join("out");

        let path = run(&options(&input, "5-12", &out_dir)).unwrap();

        assert_eq!(path, out_dir.join("out_5-12.pdf"));
        let doc = Document::load(&path).unwrap();
        let expected: Vec<String> = (1..=8).map(|n| n.to_string()).collect();
        assert_eq!(stamped_numbers(&doc), expected);
    }

    #[test]
    fn test_clamped_end_names_file() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("doc.pdf");
        fs::write(&input, sample_pdf(20)).unwrap();

        let path = run(&options(&input, "15-100", tmp.path())).unwrap();
        assert!(path.ends_with("out_15-20.pdf"));
    }

    #[test]
    fn test_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("nope.pdf");
        let err = usage_error(run(&options(&input, "1-2", tmp.path())));
        assert_eq!(err, UsageError::MissingFile(input));
    }

    #[test]
    fn test_directory_input() {
        let tmp = tempfile::tempdir().unwrap();
        let err = usage_error(run(&options(tmp.path(), "1-2", tmp.path())));
        assert_eq!(
            err,
            UsageError::Unreadable {
                path: tmp.path().to_path_buf(),
                reason: "not a regular file".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_range_writes_empty_document() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("doc.pdf");
        fs::write(&input, sample_pdf(20)).unwrap();

        let path = run(&options(&input, "0-0", tmp.path())).unwrap();

        assert!(path.ends_with("out_1-0.pdf"));
        assert!(Document::load(&path).unwrap().get_pages().is_empty());
    }

    #[test]
    fn test_errors_write_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("doc.pdf");
        fs::write(&input, sample_pdf(20)).unwrap();
        let out_dir = tmp.path().join("out");

        for (pages, expected) in [
            ("abc", UsageError::Format),
            ("10-3", UsageError::Order),
            ("25-30", UsageError::Bounds(20)),
        ] {
            let err = usage_error(run(&options(&input, pages, &out_dir)));
            assert_eq!(err, expected, "{pages}");
        }
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_corrupt_input_is_internal() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("broken.pdf");
        fs::write(&input, b"%PDF-1.4 garbage").unwrap();

        let err = run(&options(&input, "1-2", tmp.path())).unwrap_err();
        assert!(err.downcast_ref::<UsageError>().is_none());
    }
}
