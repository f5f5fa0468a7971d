use indexmap::IndexMap;

use crate::types::GenotypeRecord;

/// Genotype records keyed by variant identifier, in insertion order.
///
/// A duplicate identifier replaces the earlier record in its original slot,
/// so iteration order stays the order in which identifiers first appeared.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: IndexMap<String, GenotypeRecord>,
    overwrites: usize,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any earlier record with the same identifier.
    /// Returns `true` when a record was replaced.
    pub fn put(
        &mut self,
        variant_id: impl Into<String>,
        chromosome: impl Into<String>,
        position: u64,
        genotype: impl Into<String>,
    ) -> bool {
        self.insert(GenotypeRecord::new(variant_id, chromosome, position, genotype))
    }

    pub fn insert(&mut self, record: GenotypeRecord) -> bool {
        let replaced = self
            .records
            .insert(record.variant_id.clone(), record)
            .is_some();
        if replaced {
            self.overwrites += 1;
        }
        replaced
    }

    pub fn get(&self, variant_id: &str) -> Option<&GenotypeRecord> {
        self.records.get(variant_id)
    }

    pub fn contains(&self, variant_id: &str) -> bool {
        self.records.contains_key(variant_id)
    }

    /// All records in insertion order
    pub fn all(&self) -> Vec<&GenotypeRecord> {
        self.records.values().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenotypeRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records replaced by a later duplicate identifier
    pub fn overwrites(&self) -> usize {
        self.overwrites
    }
}

impl FromIterator<GenotypeRecord> for RecordStore {
    fn from_iter<I: IntoIterator<Item = GenotypeRecord>>(iter: I) -> Self {
        let mut store = RecordStore::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let mut store = RecordStore::new();
        assert!(!store.put("rs1695", "11", 67352689, "AA"));

        let record = store.get("rs1695").unwrap();
        assert_eq!(record.chromosome, "11");
        assert_eq!(record.position, 67352689);
        assert_eq!(record.genotype, "AA");
        assert!(store.get("rs7041").is_none());
    }

    #[test]
    fn test_last_write_wins_keeps_slot() {
        let mut store = RecordStore::new();
        store.put("rs1", "1", 100, "AA");
        store.put("rs2", "1", 200, "CC");
        assert!(store.put("rs1", "1", 100, "AG"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.overwrites(), 1);
        assert_eq!(store.get("rs1").unwrap().genotype, "AG");

        let ids: Vec<&str> = store.iter().map(|r| r.variant_id.as_str()).collect();
        assert_eq!(ids, vec!["rs1", "rs2"]);
    }

    #[test]
    fn test_malformed_genotypes_pass_through() {
        let mut store = RecordStore::new();
        store.put("rs9", "2", 5, "ZZZ");
        assert_eq!(store.get("rs9").unwrap().genotype, "ZZZ");
    }

    #[test]
    fn test_collect_from_records() {
        let store: RecordStore = vec![
            GenotypeRecord::new("rs1", "1", 1, "AA"),
            GenotypeRecord::new("i2", "2", 2, "--"),
        ]
        .into_iter()
        .collect();

        assert_eq!(store.len(), 2);
        assert!(store.contains("i2"));
        assert_eq!(store.all()[0].variant_id, "rs1");
    }
}
