use parking_lot::Mutex;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// A per-worker word → count map built during the map phase.
///
/// Private to exactly one worker while a batch is in flight; `reset` makes
/// the cross-batch buffer reuse explicit.
#[derive(Debug, Default)]
pub struct LocalTable {
    counts: HashMap<String, u64>,
}

impl LocalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `word`
    pub fn add(&mut self, word: String) {
        *self.counts.entry(word).or_insert(0) += 1;
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Clear for the next batch, keeping allocated capacity
    pub fn reset(&mut self) {
        self.counts.clear();
    }

    /// Remove and yield every entry
    pub fn drain(&mut self) -> impl Iterator<Item = (String, u64)> + '_ {
        self.counts.drain()
    }
}

/// The shared cumulative word → count table, partitioned into a fixed
/// number of stripes.
///
/// Each stripe owns its slice of the key space behind its own lock; a word
/// lives in stripe `hash(word) % stripe_count`, so merge workers touching
/// different stripes never contend. Stripe count is fixed for the table's
/// lifetime. Mutating an entry requires holding that stripe's lock, and a
/// caller holds at most one stripe lock at a time.
#[derive(Debug)]
pub struct GlobalTable {
    stripes: Vec<Mutex<HashMap<String, u64>>>,
    hasher: RandomState,
}

impl GlobalTable {
    /// Create a table with `stripe_count` lock stripes (minimum 1)
    pub fn new(stripe_count: usize) -> Self {
        let stripe_count = stripe_count.max(1);
        Self {
            stripes: (0..stripe_count).map(|_| Mutex::new(HashMap::new())).collect(),
            hasher: RandomState::new(),
        }
    }

    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    fn stripe_of(&self, word: &str) -> usize {
        (self.hasher.hash_one(word) as usize) % self.stripes.len()
    }

    /// Add `count` to `word`, locking only that word's stripe.
    /// The guard is scoped, so the lock is released on every path.
    pub fn add(&self, word: String, count: u64) {
        let idx = self.stripe_of(&word);
        let mut stripe = self.stripes[idx].lock();
        *stripe.entry(word).or_insert(0) += count;
    }

    /// Drain one local table into this one.
    /// Entries move out of `local`, leaving it empty for reuse.
    pub fn merge_local(&self, local: &mut LocalTable) {
        for (word, count) in local.drain() {
            self.add(word, count);
        }
    }

    /// Current count for `word`, if present
    pub fn get(&self, word: &str) -> Option<u64> {
        let stripe = self.stripes[self.stripe_of(word)].lock();
        stripe.get(word).copied()
    }

    /// Number of distinct words across all stripes
    pub fn len(&self) -> usize {
        self.stripes.iter().map(|s| s.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.stripes.iter().all(|s| s.lock().is_empty())
    }

    /// Consume the table into a sequence sorted lexicographically by word.
    ///
    /// Single-threaded by construction: taking `self` by value proves no
    /// concurrent writers remain, so no locking is needed.
    pub fn into_sorted(self) -> Vec<(String, u64)> {
        let mut all: Vec<(String, u64)> = Vec::new();
        for stripe in self.stripes {
            all.extend(stripe.into_inner());
        }
        all.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        all
    }
}
