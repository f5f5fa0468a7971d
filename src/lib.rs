//! # Genotype Report
//!
//! Summary statistics and a noteworthy-variant scan for 23andMe raw genotype
//! data.
//!
//! ## Features
//!
//! - Parses 23andMe raw data exports, plain or compressed (gzip, bzip2, xz, zip)
//! - Tallies calls by chromosome pair and by genotype, and counts reference-SNP
//!   vs internal identifiers
//! - Cross-references a curated table of noteworthy variants with a
//!   strand-aware comparison
//! - Console, JSON, CSV and TSV reports
//!
//! Results are for research and educational use only.

pub mod aggregate;
pub mod config;
pub mod discovery;
pub mod matcher;
pub mod output;
pub mod parsers;
pub mod reference;
pub mod store;
pub mod types;

// Re-export key types
pub use aggregate::{AggregateCounts, Aggregator, PositionPolicy};
pub use discovery::FileDiscovery;
pub use matcher::{ComplementTable, Matcher};
pub use output::{Report, ReportFormat, ReportGenerator};
pub use parsers::{ParseError, TwentyThreeAndMeParser};
pub use reference::ReferenceTable;
pub use store::RecordStore;
pub use types::*;

/// Aggregate a sample and scan it against the curated table
pub fn analyze(
    store: &RecordStore,
    table: &ReferenceTable,
    policy: PositionPolicy,
) -> (AggregateCounts, Vec<MatchResult>) {
    let counts = Aggregator::new(policy).aggregate(store);
    let matches = Matcher::new().match_all(store, table);
    (counts, matches)
}
