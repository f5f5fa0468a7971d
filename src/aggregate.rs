use hashbrown::HashSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::RecordStore;
use crate::types::{Coordinate, GenotypeRecord};

/// How positions are de-duplicated when tallying them
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum PositionPolicy {
    /// A position is new only if it differs from the previous record's
    /// position, regardless of chromosome. Matches the historical output on
    /// sorted exports.
    #[default]
    AdjacentOnly,
    /// Distinct (chromosome pair, position) coordinates
    Global,
}

/// Counts keyed by label, remembering the order labels first appeared in
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Tally(IndexMap<String, usize>);

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump the count for `key`. Returns `true` the first time a key is seen.
    pub fn increment(&mut self, key: &str) -> bool {
        match self.0.get_mut(key) {
            Some(count) => {
                *count += 1;
                false
            }
            None => {
                self.0.insert(key.to_string(), 1);
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> usize {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Labels in first-appearance order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(key, &count)| (key.as_str(), count))
    }

    /// Descending by count; ties keep first-appearance order
    pub fn sorted_by_count(&self) -> Vec<(&str, usize)> {
        let mut sorted: Vec<(&str, usize)> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Running count of positions under a [`PositionPolicy`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct PositionTally {
    pub policy: PositionPolicy,
    pub count: usize,
    #[serde(skip)]
    last: Option<u64>,
    #[serde(skip)]
    seen: HashSet<Coordinate>,
}

impl PositionTally {
    pub fn new(policy: PositionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn observe(&mut self, record: &GenotypeRecord) {
        let is_new = match self.policy {
            PositionPolicy::AdjacentOnly => {
                let changed = self.last != Some(record.position);
                self.last = Some(record.position);
                changed
            }
            PositionPolicy::Global => self.seen.insert(record.coordinate()),
        };

        if is_new {
            self.count += 1;
        }
    }
}

/// Summary statistics over a record store
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateCounts {
    pub total_records: usize,
    /// Records per chromosome pair, in first-appearance order
    pub by_chromosome: Tally,
    /// Records per genotype call, no-calls included
    pub by_genotype: Tally,
    pub positions: PositionTally,
    pub reference_id_count: usize,
    pub internal_id_count: usize,
}

impl AggregateCounts {
    /// Chromosome pairs in the order they first appeared
    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.by_chromosome.keys()
    }

    pub fn chromosome_count(&self) -> usize {
        self.by_chromosome.len()
    }

    pub fn genotype_count(&self) -> usize {
        self.by_genotype.len()
    }

    pub fn position_count(&self) -> usize {
        self.positions.count
    }
}

/// Accumulates [`AggregateCounts`] in a single pass over a store
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    policy: PositionPolicy,
}

impl Aggregator {
    pub fn new(policy: PositionPolicy) -> Self {
        Self { policy }
    }

    pub fn aggregate(&self, store: &RecordStore) -> AggregateCounts {
        let mut counts = AggregateCounts {
            positions: PositionTally::new(self.policy),
            ..AggregateCounts::default()
        };

        for record in store.iter() {
            counts.total_records += 1;

            if record.has_reference_id() {
                counts.reference_id_count += 1;
            } else {
                counts.internal_id_count += 1;
            }

            let chromosome = record.chromosome_pair();
            if counts.by_chromosome.increment(chromosome) {
                debug!("First record on chromosome {}", chromosome);
            }

            counts.positions.observe(record);
            counts.by_genotype.increment(&record.genotype);
        }

        debug!(
            "Aggregated {} records: {} chromosomes, {} positions, {} genotypes",
            counts.total_records,
            counts.chromosome_count(),
            counts.position_count(),
            counts.genotype_count()
        );

        counts
    }
}

/// Aggregate with the default position policy
pub fn aggregate(store: &RecordStore) -> AggregateCounts {
    Aggregator::default().aggregate(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SEX_PAIR_LABEL;

    fn sample_store() -> RecordStore {
        let mut store = RecordStore::new();
        store.put("rs1", "1", 100, "AA");
        store.put("rs2", "1", 200, "AG");
        store.put("i3", "2", 200, "AA");
        store.put("rs4", "2", 300, "--");
        store.put("rs5", "X", 400, "A");
        store.put("rs6", "Y", 400, "A");
        store.put("rs7", "MT", 100, "AA");
        store
    }

    #[test]
    fn test_every_record_counted_once() {
        let store = sample_store();
        let counts = aggregate(&store);

        assert_eq!(counts.total_records, store.len());
        assert_eq!(counts.by_genotype.total(), store.len());
        assert_eq!(counts.by_chromosome.total(), store.len());
        assert_eq!(
            counts.reference_id_count + counts.internal_id_count,
            store.len()
        );
        assert_eq!(counts.reference_id_count, 6);
        assert_eq!(counts.internal_id_count, 1);
    }

    #[test]
    fn test_sex_chromosomes_share_a_bucket() {
        let counts = aggregate(&sample_store());

        assert_eq!(counts.by_chromosome.get(SEX_PAIR_LABEL), 2);
        assert_eq!(counts.by_chromosome.get("X"), 0);
        assert_eq!(counts.by_chromosome.get("Y"), 0);

        let order: Vec<&str> = counts.chromosomes().collect();
        assert_eq!(order, vec!["1", "2", SEX_PAIR_LABEL, "MT"]);
    }

    #[test]
    fn test_no_call_has_its_own_bucket() {
        let counts = aggregate(&sample_store());
        assert_eq!(counts.by_genotype.get("--"), 1);
        assert_eq!(counts.by_genotype.get("AA"), 3);
        assert_eq!(counts.genotype_count(), 4);
    }

    #[test]
    fn test_adjacent_only_positions() {
        // 100, 200, 200, 300, 400, 400, 100 → adjacent repeats collapse
        let counts = Aggregator::new(PositionPolicy::AdjacentOnly).aggregate(&sample_store());
        assert_eq!(counts.position_count(), 5);
    }

    #[test]
    fn test_global_positions() {
        // (1,100) (1,200) (2,200) (2,300) (XY,400) (MT,100)
        let counts = Aggregator::new(PositionPolicy::Global).aggregate(&sample_store());
        assert_eq!(counts.position_count(), 6);
    }

    #[test]
    fn test_sorted_by_count_is_stable() {
        let mut tally = Tally::new();
        for key in ["CC", "AA", "GG", "AA", "GG", "TT"] {
            tally.increment(key);
        }

        let sorted = tally.sorted_by_count();
        assert_eq!(sorted, vec![("AA", 2), ("GG", 2), ("CC", 1), ("TT", 1)]);
    }

    #[test]
    fn test_empty_store() {
        let counts = aggregate(&RecordStore::new());

        assert_eq!(counts.total_records, 0);
        assert_eq!(counts.chromosome_count(), 0);
        assert_eq!(counts.genotype_count(), 0);
        assert_eq!(counts.position_count(), 0);
        assert_eq!(counts.reference_id_count, 0);
        assert_eq!(counts.internal_id_count, 0);
        assert!(counts.by_genotype.sorted_by_count().is_empty());
    }
}
