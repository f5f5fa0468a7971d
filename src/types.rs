use serde::{Deserialize, Serialize};

/// Genotype value reported when the platform could not call the alleles
pub const NO_CALL: &str = "--";

/// Prefix of identifiers taken from the public reference-SNP database
pub const RSID_PREFIX: &str = "rs";

/// Combined label for the sex chromosomes. Male samples report X and Y
/// separately for positions that are otherwise treated as one pair.
pub const SEX_PAIR_LABEL: &str = "XY";

/// Marker prepended to the key of a second curated row for the same variant
pub const DISAMBIGUATION_MARKER: char = '*';

/// Fold a raw chromosome label into its chromosome pair label
pub fn chromosome_pair(chromosome: &str) -> &str {
    match chromosome {
        "X" | "Y" => SEX_PAIR_LABEL,
        other => other,
    }
}

/// Whether an identifier follows the reference-SNP (`rs`) convention
pub fn is_reference_id(variant_id: &str) -> bool {
    variant_id.starts_with(RSID_PREFIX)
}

/// A single genotype call from a raw data export
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenotypeRecord {
    pub variant_id: String,
    pub chromosome: String,
    pub position: u64,
    pub genotype: String,
}

impl GenotypeRecord {
    pub fn new(
        variant_id: impl Into<String>,
        chromosome: impl Into<String>,
        position: u64,
        genotype: impl Into<String>,
    ) -> Self {
        Self {
            variant_id: variant_id.into(),
            chromosome: chromosome.into(),
            position,
            genotype: genotype.into(),
        }
    }

    /// Chromosome label with X and Y folded together
    pub fn chromosome_pair(&self) -> &str {
        chromosome_pair(&self.chromosome)
    }

    pub fn is_no_call(&self) -> bool {
        self.genotype == NO_CALL
    }

    pub fn has_reference_id(&self) -> bool {
        is_reference_id(&self.variant_id)
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.chromosome_pair(), self.position)
    }
}

/// A row of the curated noteworthy-variant table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// Raw table key, possibly carrying the disambiguation marker
    #[serde(rename = "variant_id")]
    pub key: String,
    pub gene: String,
    pub genotype: String,
    pub note: String,
}

impl ReferenceEntry {
    pub fn new(
        key: impl Into<String>,
        gene: impl Into<String>,
        genotype: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            gene: gene.into(),
            genotype: genotype.into(),
            note: note.into(),
        }
    }

    /// Key with the disambiguation marker stripped
    pub fn variant_id(&self) -> &str {
        self.key
            .strip_prefix(DISAMBIGUATION_MARKER)
            .unwrap_or(&self.key)
    }

    pub fn is_secondary(&self) -> bool {
        self.key.starts_with(DISAMBIGUATION_MARKER)
    }
}

/// Relationship between an observed genotype and a curated one
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Observed call is identical to the curated call
    Exact,
    /// Observed call is the opposite-strand rendering of the curated call
    Complementary,
    /// Variant is of interest but the platform reported a no-call
    NoCallWarning,
    NoRelationship,
}

impl Classification {
    pub fn is_reportable(&self) -> bool {
        !matches!(self, Classification::NoRelationship)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Exact => "exact",
            Classification::Complementary => "complementary",
            Classification::NoCallWarning => "no-call",
            Classification::NoRelationship => "none",
        }
    }
}

/// Outcome of checking one curated entry against the sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    pub variant_id: String,
    pub chromosome: String,
    pub observed_genotype: String,
    pub reference_genotype: String,
    pub gene: String,
    pub note: String,
    pub classification: Classification,
}

/// Input file formats understood by the parser
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FileFormat {
    AndMe,
    Unknown,
}

impl FileFormat {
    /// Identify the export format from its first line
    pub fn detect(first_line: &str) -> Self {
        if first_line.split_whitespace().any(|token| token == "23andMe") {
            FileFormat::AndMe
        } else {
            FileFormat::Unknown
        }
    }
}

/// Compression wrapping an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zip,
}

impl Compression {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "gz" | "gzip" => Compression::Gzip,
            "bz2" => Compression::Bzip2,
            "xz" => Compression::Xz,
            "zip" => Compression::Zip,
            _ => Compression::None,
        }
    }
}

/// Genetic coordinate
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct Coordinate {
    pub chromosome: String,
    pub position: u64,
}

impl Coordinate {
    pub fn new(chromosome: impl Into<String>, position: u64) -> Self {
        Self {
            chromosome: chromosome.into(),
            position,
        }
    }
}
