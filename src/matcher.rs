use tracing::{debug, info};

use crate::reference::ReferenceTable;
use crate::store::RecordStore;
use crate::types::{Classification, MatchResult, ReferenceEntry, NO_CALL};

/// Genotype pairs the curated source reports from the opposite strand.
/// Each pair is registered in both directions.
pub const COMPLEMENTARY_PAIRS: &[(&str, &str)] =
    &[("GG", "CC"), ("CT", "AG"), ("AC", "GT"), ("AA", "TT")];

/// Finite, symmetric set of (observed, curated) genotype pairs that count as
/// the same call read from opposite strands
#[derive(Debug, Clone)]
pub struct ComplementTable {
    pairs: Vec<(String, String)>,
}

impl Default for ComplementTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (a, b) in COMPLEMENTARY_PAIRS {
            table.insert(a, b);
        }
        table
    }
}

impl ComplementTable {
    pub fn empty() -> Self {
        Self {
            pairs: Vec::new(),
        }
    }

    /// Register `a` and `b` as complementary in both directions
    pub fn insert(&mut self, a: &str, b: &str) {
        for (x, y) in [(a, b), (b, a)] {
            if !self.contains(x, y) {
                self.pairs.push((x.to_string(), y.to_string()));
            }
        }
    }

    pub fn contains(&self, observed: &str, reference: &str) -> bool {
        self.pairs
            .iter()
            .any(|(a, b)| a == observed && b == reference)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Strand-aware comparison of a sample against the curated table
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    complements: ComplementTable,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_complements(complements: ComplementTable) -> Self {
        Self { complements }
    }

    /// Classify an observed call against a curated one. Total: every pair
    /// lands in exactly one class, checked in declaration order.
    pub fn classify(&self, observed: &str, reference: &str) -> Classification {
        if observed == reference {
            Classification::Exact
        } else if self.complements.contains(observed, reference) {
            Classification::Complementary
        } else if observed == NO_CALL {
            Classification::NoCallWarning
        } else {
            Classification::NoRelationship
        }
    }

    /// Check a single curated entry. `None` when the sample has no record for
    /// the entry's variant.
    pub fn classify_entry(
        &self,
        store: &RecordStore,
        entry: &ReferenceEntry,
    ) -> Option<MatchResult> {
        let variant_id = entry.variant_id();
        let record = store.get(variant_id)?;

        Some(MatchResult {
            variant_id: variant_id.to_string(),
            chromosome: record.chromosome_pair().to_string(),
            observed_genotype: record.genotype.clone(),
            reference_genotype: entry.genotype.clone(),
            gene: entry.gene.clone(),
            note: entry.note.clone(),
            classification: self.classify(&record.genotype, &entry.genotype),
        })
    }

    /// Reportable results for every curated entry present in the sample,
    /// in table order
    pub fn match_all(&self, store: &RecordStore, table: &ReferenceTable) -> Vec<MatchResult> {
        let mut absent = 0usize;
        let mut results = Vec::new();

        for entry in table.iter() {
            match self.classify_entry(store, entry) {
                Some(result) if result.classification.is_reportable() => {
                    debug!(
                        "{} ({}): {} vs {} → {:?}",
                        result.variant_id,
                        entry.key,
                        result.observed_genotype,
                        result.reference_genotype,
                        result.classification
                    );
                    results.push(result);
                }
                Some(_) => {}
                None => absent += 1,
            }
        }

        info!(
            "Checked {} curated entries: {} reportable, {} not in sample",
            table.len(),
            results.len(),
            absent
        );

        results
    }
}
