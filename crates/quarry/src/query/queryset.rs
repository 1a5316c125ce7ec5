use crate::{
    error::QueryError,
    obs::EngineMetrics,
    query::{
        FilterSet,
        cache::{EvictionPolicy, ResultCache},
        exclude::{exclude_rows, excludes},
        matcher::FilterProgram,
        signature::QuerySignature,
    },
    record::{Record, RecordStore, Rows},
    value::Value,
};
use std::{cell::RefCell, rc::Rc};

///
/// EngineShared
///
/// Store, cache, and metrics shared by every handle of one engine.
/// Single-threaded; RefCell is the only synchronization.
///

struct EngineShared {
    store: RecordStore,
    cache: RefCell<ResultCache>,
    metrics: RefCell<EngineMetrics>,
}

///
/// Engine
///
/// Owns the record store and the result cache, and spawns query handles.
/// The cache is injected at construction so callers control retention.
///

pub struct Engine {
    shared: Rc<EngineShared>,
}

impl Engine {
    /// Engine with the reference retention behavior: cache forever.
    #[must_use]
    pub fn new(store: RecordStore) -> Self {
        Self::with_cache(store, ResultCache::default())
    }

    #[must_use]
    pub fn with_cache(store: RecordStore, cache: ResultCache) -> Self {
        Self {
            shared: Rc::new(EngineShared {
                store,
                cache: RefCell::new(cache),
                metrics: RefCell::new(EngineMetrics::default()),
            }),
        }
    }

    /// Engine with a custom eviction policy on an otherwise fresh cache.
    #[must_use]
    pub fn with_policy(store: RecordStore, policy: impl EvictionPolicy + 'static) -> Self {
        Self::with_cache(store, ResultCache::new(policy))
    }

    /// A fresh, unmaterialized handle with no inherited criteria.
    #[must_use]
    pub fn query(&self) -> QuerySet {
        QuerySet {
            shared: Rc::clone(&self.shared),
            base_filters: FilterSet::new(),
            base_filters_exclude: FilterSet::new(),
            results: Rc::new(Vec::new()),
            materialized: false,
        }
    }

    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.shared.store
    }

    /// Copy of the engine's activity counters.
    #[must_use]
    pub fn metrics(&self) -> EngineMetrics {
        *self.shared.metrics.borrow()
    }

    pub fn reset_metrics(&self) {
        self.shared.metrics.borrow_mut().reset();
    }

    #[must_use]
    pub fn cached_queries(&self) -> usize {
        self.shared.cache.borrow().len()
    }
}

// Scan termination behavior; FirstOnly backs `first()`.
#[derive(Clone, Copy, Eq, PartialEq)]
enum ScanMode {
    Full,
    FirstOnly,
}

///
/// QuerySet
///
/// The chainable query handle: inherited inclusion and exclusion criteria
/// plus the materialized row sequence. Handles are immutable; every chained
/// operation returns a new one. Handles produced for the same signature
/// share one materialization through the cache.
///

#[derive(Clone)]
pub struct QuerySet {
    shared: Rc<EngineShared>,
    base_filters: FilterSet,
    base_filters_exclude: FilterSet,
    results: Rc<Rows>,
    materialized: bool,
}

impl QuerySet {
    ///
    /// CHAINED OPERATIONS
    ///

    /// Merge `criteria` over the inherited filters and materialize.
    ///
    /// The cache is consulted under the canonical signature of the merged
    /// criteria; a hit rebuilds a handle around the cached rows without
    /// touching the store.
    pub fn filter(&self, criteria: FilterSet) -> Result<Self, QueryError> {
        self.shared.metrics.borrow_mut().filter_calls += 1;

        let merged = self.base_filters.merged_with(&criteria);
        let signature = QuerySignature::of_query(&merged, &self.base_filters_exclude);

        if let Some(rows) = self.shared.cache.borrow().get(&signature) {
            self.shared.metrics.borrow_mut().cache_hits += 1;

            return Ok(self.handle(merged, self.base_filters_exclude.clone(), rows));
        }
        self.shared.metrics.borrow_mut().cache_misses += 1;

        let rows = self.scan(&merged, ScanMode::Full)?;
        self.shared
            .cache
            .borrow_mut()
            .insert(signature, Rc::clone(&rows));

        Ok(self.handle(merged, self.base_filters_exclude.clone(), rows))
    }

    /// First record matching the merged criteria, if any.
    ///
    /// A cached full materialization is reused; otherwise the scan stops at
    /// the first surviving record and its truncated result is never cached.
    pub fn first(&self, criteria: FilterSet) -> Result<Option<Rc<Record>>, QueryError> {
        self.shared.metrics.borrow_mut().filter_calls += 1;

        let merged = self.base_filters.merged_with(&criteria);
        let signature = QuerySignature::of_query(&merged, &self.base_filters_exclude);

        if let Some(rows) = self.shared.cache.borrow().get(&signature) {
            self.shared.metrics.borrow_mut().cache_hits += 1;

            return Ok(rows.first().cloned());
        }
        self.shared.metrics.borrow_mut().cache_misses += 1;

        let rows = self.scan(&merged, ScanMode::FirstOnly)?;

        Ok(rows.first().cloned())
    }

    /// Merge `criteria` over the inherited exclusions and re-apply them.
    ///
    /// Applies to the current results, or to a freshly derived handle when
    /// nothing has been materialized on this handle yet.
    pub fn exclude(&self, criteria: FilterSet) -> Result<Self, QueryError> {
        self.shared.metrics.borrow_mut().exclude_calls += 1;

        let merged_exclude = self.base_filters_exclude.merged_with(&criteria);
        let program = FilterProgram::compile(&merged_exclude)?;

        let source = if self.materialized {
            Rc::clone(&self.results)
        } else {
            self.filter(FilterSet::new())?.results
        };

        let kept = exclude_rows(&source, &program)?;
        self.shared
            .metrics
            .borrow_mut()
            .record_excluded((source.len() - kept.len()) as u64);

        Ok(self.handle(self.base_filters.clone(), merged_exclude, Rc::new(kept)))
    }

    /// Re-derive through `filter()` and sort by `field` under canonical
    /// value order. A leading `-` reverses; ties keep insertion order.
    pub fn order_by(&self, field: &str) -> Result<Self, QueryError> {
        let (field, reverse) = field
            .strip_prefix('-')
            .map_or((field, false), |stripped| (stripped, true));

        let derived = self.filter(FilterSet::new())?;

        let mut keyed: Vec<(Value, Rc<Record>)> = Vec::with_capacity(derived.results.len());
        for row in derived.results.iter() {
            let key = row
                .field(field)
                .cloned()
                .ok_or_else(|| QueryError::field_absent(field))?;
            keyed.push((key, Rc::clone(row)));
        }

        // stable sort: equal keys keep their insertion order in both
        // directions, so the reversed comparator is not a post-hoc reverse
        keyed.sort_by(|(a, _), (b, _)| {
            if reverse {
                Value::canonical_cmp(b, a)
            } else {
                Value::canonical_cmp(a, b)
            }
        });

        let rows: Rows = keyed.into_iter().map(|(_, row)| row).collect();

        Ok(self.handle(
            derived.base_filters.clone(),
            derived.base_filters_exclude.clone(),
            Rc::new(rows),
        ))
    }

    ///
    /// PROJECTION & INSPECTION
    ///

    /// Number of materialized results.
    #[must_use]
    pub fn count(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Membership test over the materialized results.
    #[must_use]
    pub fn contains(&self, record: &Record) -> bool {
        self.results.iter().any(|row| row.as_ref() == record)
    }

    /// Project one field out of every result, order preserved.
    pub fn values_list(&self, field: &str) -> Result<Vec<Value>, QueryError> {
        self.results
            .iter()
            .map(|row| {
                row.field(field)
                    .cloned()
                    .ok_or_else(|| QueryError::field_absent(field))
            })
            .collect()
    }

    #[must_use]
    pub fn results(&self) -> &[Rc<Record>] {
        self.results.as_slice()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<Record>> {
        self.results.iter()
    }

    #[must_use]
    pub const fn base_filters(&self) -> &FilterSet {
        &self.base_filters
    }

    #[must_use]
    pub const fn base_filters_exclude(&self) -> &FilterSet {
        &self.base_filters_exclude
    }

    /// True when both handles share one materialized result sequence,
    /// the observable identity a cache hit produces.
    #[must_use]
    pub fn shares_results(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.results, &other.results)
    }

    ///
    /// INTERNAL
    ///

    fn handle(
        &self,
        base_filters: FilterSet,
        base_filters_exclude: FilterSet,
        rows: Rc<Rows>,
    ) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
            base_filters,
            base_filters_exclude,
            results: rows,
            materialized: true,
        }
    }

    // One pass over the store: match, then exclusion-check survivors.
    fn scan(&self, merged: &FilterSet, mode: ScanMode) -> Result<Rc<Rows>, QueryError> {
        let program = FilterProgram::compile(merged)?;
        let exclusion = FilterProgram::compile(&self.base_filters_exclude)?;

        let mut rows: Rows = Vec::new();
        let mut scanned = 0_u64;
        let mut removed = 0_u64;

        for row in self.shared.store.rows() {
            scanned += 1;
            if !program.matches(row)? {
                continue;
            }

            if !exclusion.is_empty() && excludes(row, &exclusion)? {
                removed += 1;
                continue;
            }

            rows.push(Rc::clone(row));
            if mode == ScanMode::FirstOnly {
                break;
            }
        }

        let mut metrics = self.shared.metrics.borrow_mut();
        metrics.record_scan(scanned);
        metrics.record_excluded(removed);

        Ok(Rc::new(rows))
    }
}

impl<'a> IntoIterator for &'a QuerySet {
    type Item = &'a Rc<Record>;
    type IntoIter = std::slice::Iter<'a, Rc<Record>>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl std::fmt::Debug for QuerySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySet")
            .field("base_filters", &self.base_filters)
            .field("base_filters_exclude", &self.base_filters_exclude)
            .field("results", &self.results.len())
            .field("materialized", &self.materialized)
            .finish()
    }
}
