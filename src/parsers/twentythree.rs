use std::io::BufRead;
use std::path::Path;

use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::parsers::{open_file, ParseError};
use crate::store::RecordStore;
use crate::types::{chromosome_pair, FileFormat, GenotypeRecord};

/// Records between progress updates
const PROGRESS_STEP: usize = 1000;

/// 23andMe parser for raw DNA data files
///
/// The first line must be the `# This data file generated by 23andMe ...`
/// banner unless header checking is turned off. Remaining `#` lines are
/// comments. Data lines are whitespace-delimited:
///
/// ```text
/// rs548049170    1    69869    TT
/// rs13328684     1    74792    --
/// i713426        Y    2655180  A
/// ```
#[derive(Clone)]
pub struct TwentyThreeAndMeParser {
    check_header: bool,
    progress: Option<ProgressBar>,
}

impl Default for TwentyThreeAndMeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TwentyThreeAndMeParser {
    pub fn new() -> Self {
        Self {
            check_header: true,
            progress: None,
        }
    }

    pub fn check_header(mut self, check: bool) -> Self {
        self.check_header = check;
        self
    }

    /// Report progress on `bar` while parsing
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    pub fn parse(&self, path: &Path) -> Result<RecordStore, ParseError> {
        let reader = open_file(path)?;
        let source = path.display().to_string();
        let store = self.parse_reader(reader, &source)?;

        info!("Parsed {} SNPs from {}", store.len(), source);
        Ok(store)
    }

    pub fn parse_reader<R: BufRead>(
        &self,
        mut reader: R,
        source: &str,
    ) -> Result<RecordStore, ParseError> {
        let mut store = RecordStore::new();
        let mut current_chromosome = String::new();
        let mut line = String::new();
        let mut line_number = 0;

        while reader.read_line(&mut line)? > 0 {
            line_number += 1;

            if line_number == 1 && self.is_header(&line, source)? {
                line.clear();
                continue;
            }

            if let Some(record) = self.parse_line(&line, line_number)? {
                if record.chromosome_pair() != current_chromosome {
                    current_chromosome = chromosome_pair(&record.chromosome).to_string();
                    debug!("Reading chromosome {}", current_chromosome);
                    if let Some(bar) = &self.progress {
                        bar.set_message(format!("chromosome {}", current_chromosome));
                    }
                }

                store.insert(record);
                if store.len() % PROGRESS_STEP == 0 {
                    if let Some(bar) = &self.progress {
                        bar.set_position(store.len() as u64);
                    }
                }
            }
            line.clear();
        }

        if let Some(bar) = &self.progress {
            bar.set_position(store.len() as u64);
        }

        if store.overwrites() > 0 {
            debug!(
                "{} duplicate identifiers in {}; later records kept",
                store.overwrites(),
                source
            );
        }

        Ok(store)
    }

    /// Whether the first line is a banner to skip
    fn is_header(&self, line: &str, source: &str) -> Result<bool, ParseError> {
        match FileFormat::detect(line) {
            FileFormat::AndMe => Ok(true),
            FileFormat::Unknown if self.check_header => {
                Err(ParseError::NotTwentyThreeAndMe(source.to_string()))
            }
            FileFormat::Unknown => {
                warn!("{} has no 23andMe banner; parsing anyway", source);
                Ok(line.trim_start().starts_with('#'))
            }
        }
    }

    fn parse_line(
        &self,
        line: &str,
        line_number: usize,
    ) -> Result<Option<GenotypeRecord>, ParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(ParseError::InvalidFormat {
                line: line_number,
                details: format!("expected 4 fields, found {}", fields.len()),
            });
        }

        let position = fields[2]
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidPosition {
                line: line_number,
                value: fields[2].to_string(),
            })?;

        Ok(Some(GenotypeRecord::new(
            fields[0], fields[1], position, fields[3],
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
# This data file generated by 23andMe at: Fri Oct 03 16:02:44 2025
#
# rsid\tchromosome\tposition\tgenotype
rs548049170\t1\t69869\tTT
rs13328684\t1\t74792\t--
i713426\tY\t2655180\tA

rs9283150\t1\t565508\tAA
";

    fn parse(contents: &str) -> Result<RecordStore, ParseError> {
        TwentyThreeAndMeParser::new().parse_reader(Cursor::new(contents), "sample")
    }

    #[test]
    fn test_parse_valid_file() {
        let store = parse(SAMPLE).unwrap();
        assert_eq!(store.len(), 4);

        let record = store.get("rs13328684").unwrap();
        assert_eq!(record.chromosome, "1");
        assert_eq!(record.position, 74792);
        assert_eq!(record.genotype, "--");

        // Raw label is kept; folding happens downstream
        assert_eq!(store.get("i713426").unwrap().chromosome, "Y");

        let ids: Vec<&str> = store.iter().map(|r| r.variant_id.as_str()).collect();
        assert_eq!(ids, vec!["rs548049170", "rs13328684", "i713426", "rs9283150"]);
    }

    #[test]
    fn test_spaces_as_delimiters() {
        let contents = "# generated by 23andMe\nrs1   11  100   AG\n";
        let store = parse(contents).unwrap();
        assert_eq!(store.get("rs1").unwrap().genotype, "AG");
    }

    #[test]
    fn test_rejects_foreign_header() {
        let contents = "#AncestryDNA raw data download\nrs1\t1\t100\tA\tG\n";
        assert!(matches!(
            parse(contents),
            Err(ParseError::NotTwentyThreeAndMe(_))
        ));
    }

    #[test]
    fn test_header_check_disabled() {
        let contents = "rs1\t1\t100\tAA\nrs2\t1\t200\tCC\n";
        let store = TwentyThreeAndMeParser::new()
            .check_header(false)
            .parse_reader(Cursor::new(contents), "sample")
            .unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_short_line_reports_line_number() {
        let contents = "# 23andMe\nrs1\t1\t100\tAA\nrs2\t1\n";
        match parse(contents) {
            Err(ParseError::InvalidFormat { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_position() {
        let contents = "# 23andMe\nrs1\t1\tabc\tAA\n";
        match parse(contents) {
            Err(ParseError::InvalidPosition { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_identifiers_last_write_wins() {
        let contents = "# 23andMe\nrs1\t1\t100\tAA\nrs1\t1\t100\tAG\n";
        let store = parse(contents).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.overwrites(), 1);
        assert_eq!(store.get("rs1").unwrap().genotype, "AG");
    }

    #[test]
    fn test_parse_from_disk() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(SAMPLE.as_bytes())?;
        file.flush()?;

        let bar = ProgressBar::hidden();
        let store = TwentyThreeAndMeParser::new()
            .with_progress(bar.clone())
            .parse(file.path())?;

        assert_eq!(store.len(), 4);
        assert_eq!(bar.position(), 4);
        Ok(())
    }
}
