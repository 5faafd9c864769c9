use anyhow::{Context, Result};
use lopdf::Document;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Save `doc` as `out_dir/file_name`, creating `out_dir` if needed.
///
/// An existing file with the same name is overwritten. The data has been
/// flushed and synced to disk when this returns.
pub fn write_into(doc: &mut Document, out_dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create directory: {}", out_dir.display()))?;

    let path = out_dir.join(file_name);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    doc.save_to(&mut writer)
        .with_context(|| format!("Failed to save PDF: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write PDF: {}", path.display()))?;
    writer
        .get_ref()
        .sync_all()
        .with_context(|| format!("Failed to sync PDF: {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::sample_document;

    #[test]
    fn test_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let out_dir = tmp.path().join("out");

        let path = write_into(&mut sample_document(2), &out_dir, "out_1-2.pdf").unwrap();

        assert_eq!(path, out_dir.join("out_1-2.pdf"));
        let written = Document::load(&path).unwrap();
        assert_eq!(written.get_pages().len(), 2);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("out_1-1.pdf");
        fs::write(&target, b"stale").unwrap();

        write_into(&mut sample_document(1), tmp.path(), "out_1-1.pdf").unwrap();

        let bytes = fs::read(&target).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn test_directory_blocked_by_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("out");
        fs::write(&blocker, b"not a directory").unwrap();

        let err = write_into(&mut sample_document(1), &blocker, "out_1-1.pdf").unwrap_err();
        assert!(err.to_string().contains("Failed to create directory"));
    }
}
