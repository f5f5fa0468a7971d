//! Readers for raw genotype exports.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::debug;
use xz2::read::XzDecoder;

use crate::types::Compression;

pub mod twentythree;

pub use twentythree::TwentyThreeAndMeParser;

/// Upper bound on the buffer reserved from a zip entry's declared size
const MAX_ZIP_PREALLOC: u64 = 64 << 20;

/// Errors that can occur while reading a raw data export
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Zip archive {0} contains no raw data text file")]
    EmptyArchive(String),

    #[error("File {0} does not appear to be 23andMe raw data")]
    NotTwentyThreeAndMe(String),

    #[error("Invalid line format at line {line}: {details}")]
    InvalidFormat { line: usize, details: String },

    #[error("Invalid position value at line {line}: {value}")]
    InvalidPosition { line: usize, value: String },
}

/// Open a raw data file, transparently decompressing by extension.
/// Zip archives yield their first `.txt` entry.
pub fn open_file(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let compression = path
        .extension()
        .and_then(|e| e.to_str())
        .map(Compression::from_extension)
        .unwrap_or(Compression::None);

    debug!("Opening {} ({:?})", path.display(), compression);
    let file = File::open(path)?;

    let reader: Box<dyn BufRead> = match compression {
        Compression::None => Box::new(BufReader::new(file)),
        Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        Compression::Bzip2 => Box::new(BufReader::new(BzDecoder::new(file))),
        Compression::Xz => Box::new(BufReader::new(XzDecoder::new(file))),
        Compression::Zip => Box::new(Cursor::new(read_zip_entry(file, path)?)),
    };

    Ok(reader)
}

fn read_zip_entry(file: File, path: &Path) -> Result<Vec<u8>, ParseError> {
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_file() && entry.name().to_lowercase().ends_with(".txt") {
            debug!("Reading {} from {}", entry.name(), path.display());
            // Header sizes are untrusted; cap the preallocation
            let capacity = entry.size().min(MAX_ZIP_PREALLOC) as usize;
            let mut contents = Vec::with_capacity(capacity);
            entry.read_to_end(&mut contents)?;
            return Ok(contents);
        }
    }

    Err(ParseError::EmptyArchive(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bzip2::write::BzEncoder;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::TempDir;
    use xz2::write::XzEncoder;

    fn read_all(mut reader: Box<dyn BufRead>) -> String {
        let mut contents = String::new();
        reader.read_to_string(&mut contents).unwrap();
        contents
    }

    #[test]
    fn test_open_gzip() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("genome.txt.gz");

        let mut encoder = GzEncoder::new(File::create(&path)?, flate2::Compression::default());
        encoder.write_all(b"rs1\t1\t100\tAA\n")?;
        encoder.finish()?;

        assert_eq!(read_all(open_file(&path)?), "rs1\t1\t100\tAA\n");
        Ok(())
    }

    #[test]
    fn test_open_bzip2() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("genome.txt.bz2");

        let mut encoder = BzEncoder::new(File::create(&path)?, bzip2::Compression::default());
        encoder.write_all(b"rs3\t3\t300\tGG\n")?;
        encoder.finish()?;

        assert_eq!(read_all(open_file(&path)?), "rs3\t3\t300\tGG\n");
        Ok(())
    }

    #[test]
    fn test_open_xz() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("genome.txt.xz");

        let mut encoder = XzEncoder::new(File::create(&path)?, 6);
        encoder.write_all(b"rs4\tX\t400\tA\n")?;
        encoder.finish()?;

        assert_eq!(read_all(open_file(&path)?), "rs4\tX\t400\tA\n");
        Ok(())
    }

    #[test]
    fn test_open_zip_picks_text_entry() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("genome_download.zip");

        let mut writer = zip::ZipWriter::new(File::create(&path)?);
        let options = zip::write::FileOptions::default();
        writer.start_file("README.pdf", options)?;
        writer.write_all(b"%PDF")?;
        writer.start_file("genome_Jane_Doe_v5_Full.txt", options)?;
        writer.write_all(b"rs2\t2\t200\tCT\n")?;
        writer.finish()?;

        assert_eq!(read_all(open_file(&path)?), "rs2\t2\t200\tCT\n");
        Ok(())
    }

    #[test]
    fn test_zip_without_text_entry() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("empty.zip");

        let mut writer = zip::ZipWriter::new(File::create(&path)?);
        writer.start_file("notes.md", zip::write::FileOptions::default())?;
        writer.write_all(b"nothing here")?;
        writer.finish()?;

        assert!(matches!(open_file(&path), Err(ParseError::EmptyArchive(_))));
        Ok(())
    }
}
