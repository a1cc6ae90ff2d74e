//! The expression cache and indexed-collection primitives (spec §4.9).
//! The cache keys parsed expressions by source text, version, and the
//! static flags that change parsing; the collection primitives back
//! the O(1)/ordered lookups the evaluator needs for `fn:position`-style
//! indexing and range predicates without re-scanning a sequence.

use std::cmp::Ordering;
use std::collections::HashMap as StdHashMap;

use ahash::HashMap;
use xee_xpath_lexer::XPathVersion;

/// The subset of static flags that change how a source string parses,
/// and therefore must be part of a cache key alongside the source
/// itself (spec §4.9: "keyed by (source, version, relevant static
/// flags)").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: String,
    pub version: XPathVersion,
    pub xpath10_compatibility_mode: bool,
}

impl CacheKey {
    pub fn new(source: impl Into<String>, version: XPathVersion, xpath10_compatibility_mode: bool) -> Self {
        CacheKey {
            source: source.into(),
            version,
            xpath10_compatibility_mode,
        }
    }
}

/// Eviction strategy for a bounded [`ExpressionCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    Lru,
    Lfu,
}

#[derive(Debug, Clone)]
pub struct ExpressionCacheConfig {
    pub capacity: usize,
    pub eviction_policy: EvictionPolicy,
    /// Time-to-live in (host-supplied) ticks; `None` disables expiry.
    /// The cache never reads a clock itself (spec keeps wall-clock
    /// reads at the engine boundary); a host calls
    /// [`ExpressionCache::tick`] to advance time.
    pub ttl_ticks: Option<u64>,
}

impl Default for ExpressionCacheConfig {
    fn default() -> Self {
        ExpressionCacheConfig {
            capacity: 256,
            eviction_policy: EvictionPolicy::Lru,
            ttl_ticks: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct Entry<V> {
    value: V,
    inserted_at: u64,
    last_used_at: u64,
    uses: u64,
}

/// A bounded cache of parsed expressions (or any other keyed
/// value), evicting by LRU or LFU once `capacity` is exceeded.
pub struct ExpressionCache<V> {
    config: ExpressionCacheConfig,
    entries: HashMap<CacheKey, Entry<V>>,
    stats: CacheStats,
    clock: u64,
}

impl<V> ExpressionCache<V> {
    pub fn new(config: ExpressionCacheConfig) -> Self {
        ExpressionCache {
            config,
            entries: HashMap::default(),
            stats: CacheStats::default(),
            clock: 0,
        }
    }

    /// Advance the cache's internal clock by one tick, evicting any
    /// entry whose `ttl_ticks` has elapsed. A host calls this once per
    /// logical unit of time it defines; the cache never reads a clock
    /// on its own.
    pub fn tick(&mut self) {
        self.clock += 1;
        if let Some(ttl) = self.config.ttl_ticks {
            let clock = self.clock;
            let expired: Vec<CacheKey> = self
                .entries
                .iter()
                .filter(|(_, entry)| clock.saturating_sub(entry.inserted_at) > ttl)
                .map(|(key, _)| key.clone())
                .collect();
            for key in expired {
                self.entries.remove(&key);
                self.stats.evictions += 1;
            }
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<&V> {
        let clock = self.clock;
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used_at = clock;
                entry.uses += 1;
                self.stats.hits += 1;
                Some(&entry.value)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, value: V) {
        if self.entries.len() >= self.config.capacity && !self.entries.contains_key(&key) {
            self.evict_one();
        }
        let clock = self.clock;
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: clock,
                last_used_at: clock,
                uses: 0,
            },
        );
    }

    fn evict_one(&mut self) {
        let victim = match self.config.eviction_policy {
            EvictionPolicy::Lru => self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used_at)
                .map(|(key, _)| key.clone()),
            EvictionPolicy::Lfu => self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.uses)
                .map(|(key, _)| key.clone()),
        };
        if let Some(key) = victim {
            self.entries.remove(&key);
            self.stats.evictions += 1;
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A 1-based positional array (spec §4.9 "O(1) positional array with
/// 1-based getByPosition"), matching XPath's own 1-based sequence
/// position numbering so callers never have to translate indices.
#[derive(Debug, Clone, Default)]
pub struct PositionalArray<T> {
    items: Vec<T>,
}

impl<T> PositionalArray<T> {
    pub fn new() -> Self {
        PositionalArray { items: Vec::new() }
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        PositionalArray { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position 1 is the first item; out-of-range positions return
    /// `None` rather than panicking, matching XPath's own treatment of
    /// `$seq[$n]` out of bounds as an empty result rather than an error.
    pub fn get_by_position(&self, position: usize) -> Option<&T> {
        if position == 0 {
            return None;
        }
        self.items.get(position - 1)
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

/// A composite-key index: groups items by a derived key for O(1)
/// lookup by that key (spec §4.9), used e.g. to index nodes by
/// expanded name for repeated name-test steps over the same sequence.
#[derive(Debug, Clone)]
pub struct CompositeIndex<K: std::hash::Hash + Eq, V> {
    buckets: StdHashMap<K, Vec<V>>,
}

impl<K: std::hash::Hash + Eq, V> CompositeIndex<K, V> {
    pub fn build<I, F>(items: I, key_fn: F) -> Self
    where
        I: IntoIterator<Item = V>,
        F: Fn(&V) -> K,
    {
        let mut buckets: StdHashMap<K, Vec<V>> = StdHashMap::new();
        for item in items {
            let key = key_fn(&item);
            buckets.entry(key).or_default().push(item);
        }
        CompositeIndex { buckets }
    }

    pub fn lookup(&self, key: &K) -> &[V] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A comparator-driven range index (spec §4.9): items sorted once by a
/// caller-supplied key, then queried with `<`, `<=`, `>`, `>=`, or a
/// closed `[lo, hi]` range via binary search, for numeric/date
/// predicate filtering without a linear scan.
#[derive(Debug, Clone)]
pub struct RangeIndex<K: Ord + Clone, V> {
    sorted: Vec<(K, V)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Lt,
    Le,
    Gt,
    Ge,
}

impl<K: Ord + Clone, V> RangeIndex<K, V> {
    pub fn build<I, F>(items: I, key_fn: F) -> Self
    where
        I: IntoIterator<Item = V>,
        F: Fn(&V) -> K,
    {
        let mut sorted: Vec<(K, V)> = items.into_iter().map(|v| (key_fn(&v), v)).collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        RangeIndex { sorted }
    }

    fn partition_point(&self, mut matches: impl FnMut(&K) -> bool) -> usize {
        let mut lo = 0;
        let mut hi = self.sorted.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if matches(&self.sorted[mid].0) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    pub fn query(&self, bound: RangeBound, pivot: &K) -> Vec<&V> {
        match bound {
            RangeBound::Lt => self.sorted[..self.partition_point(|k| k < pivot)]
                .iter()
                .map(|(_, v)| v)
                .collect(),
            RangeBound::Le => self.sorted[..self.partition_point(|k| k <= pivot)]
                .iter()
                .map(|(_, v)| v)
                .collect(),
            RangeBound::Gt => self.sorted[self.partition_point(|k| k <= pivot)..]
                .iter()
                .map(|(_, v)| v)
                .collect(),
            RangeBound::Ge => self.sorted[self.partition_point(|k| k < pivot)..]
                .iter()
                .map(|(_, v)| v)
                .collect(),
        }
    }

    /// A closed `[lo, hi]` range query.
    pub fn query_range(&self, lo: &K, hi: &K) -> Vec<&V> {
        if lo.cmp(hi) == Ordering::Greater {
            return Vec::new();
        }
        let start = self.partition_point(|k| k < lo);
        let end = self.partition_point(|k| k <= hi);
        self.sorted[start..end].iter().map(|(_, v)| v).collect()
    }
}
