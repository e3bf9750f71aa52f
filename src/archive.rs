//! Output bundling
//!
//! Packs every file in the output directory into a single flat ZIP archive
//! with Deflate compression, in sorted name order so archives are
//! reproducible across runs.

use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Errors that can occur while bundling the output directory
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to read output directory: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Output file name is not valid UTF-8: {0}")]
    InvalidFileName(String),
}

type Result<T> = core::result::Result<T, ArchiveError>;

/// Bundles all regular files in `output_dir` into the archive at
/// `zip_path`
///
/// Entries are stored flat (no directory prefix) and sorted by name.
/// Subdirectories are not expected in the output layout and are skipped.
pub fn create_archive(output_dir: &Path, zip_path: &Path) -> Result<()> {
    let mut names: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(output_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry
            .file_name()
            .into_string()
            .map_err(|raw| ArchiveError::InvalidFileName(raw.to_string_lossy().into_owned()))?;
        names.push(name);
    }
    names.sort_unstable();

    let mut writer = ZipWriter::new(File::create(zip_path)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for name in &names {
        writer.start_file(name, options)?;
        let mut file = File::open(output_dir.join(name))?;
        io::copy(&mut file, &mut writer)?;
    }

    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_create_archive_sorted_and_flat() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("out");
        std::fs::create_dir(&output_dir).unwrap();
        std::fs::write(output_dir.join("b.txt"), b"second").unwrap();
        std::fs::write(output_dir.join("a.txt"), b"first").unwrap();
        // Subdirectories are skipped
        std::fs::create_dir(output_dir.join("nested")).unwrap();

        let zip_path = dir.path().join("out.zip");
        create_archive(&output_dir, &zip_path).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "a.txt");
        assert_eq!(archive.by_index(1).unwrap().name(), "b.txt");

        let mut contents = String::new();
        archive
            .by_name("a.txt")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "first");
    }

    #[test]
    fn test_create_archive_empty_dir() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("out");
        std::fs::create_dir(&output_dir).unwrap();

        let zip_path = dir.path().join("out.zip");
        create_archive(&output_dir, &zip_path).unwrap();

        let archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
