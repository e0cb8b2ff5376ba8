//! Request-scoped batch loader
//!
//! A [`BatchLoader`] collects every key requested during one scheduler tick
//! into a pending batch and resolves all of them with a single call to its
//! [`Fetch`] implementation. Results are memoized for the lifetime of the
//! loader, which is one GraphQL request.
//!
//! A tick ends once the pending batch stops growing between two yields of
//! the resolving task, after which the batch stays open for a short delay
//! (1ms unless configured). On a multi-thread runtime, fetches of sibling
//! loaders complete on other workers and reorder the executor's poll queue,
//! so a single yield is not enough to see every key of a wide list. The
//! first caller to resume after the delay dispatches the batch; the fetch
//! itself runs in a spawned task so that it always runs to completion, even
//! if the caller that started it is dropped.
//!
//! Per loader, batches are strictly sequential: a dispatch gate ensures a
//! loader never has two fetches in flight at once. A key that is already
//! part of an in-flight batch joins that batch instead of starting another.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::future::try_join_all;
use thiserror::Error;
use tokio::sync::watch;

/// Bulk fetch behind a [`BatchLoader`]
///
/// Implementations perform exactly one store read for `keys` and return the
/// rows indexed by key. Keys without a row are simply left out of the map;
/// the loader resolves them to `None`.
pub trait Fetch<K>: Send + Sync + 'static {
    /// Value produced for each key
    type Value: Clone + Send + Sync + 'static;

    /// Error delivered to every caller of a failed batch
    type Error: Clone + Send + Sync + 'static;

    fn fetch(
        &self,
        keys: &[K],
    ) -> impl Future<Output = Result<HashMap<K, Self::Value>, Self::Error>> + Send;
}

/// Failure of a single load
#[derive(Debug, Clone, Error)]
pub enum LoadError<E> {
    /// The batch fetch failed; every caller of the batch receives this
    #[error("{0}")]
    Fetch(E),

    /// The batch task ended without producing an outcome
    #[error("{0} batch ended without a result")]
    Aborted(&'static str),
}

/// Default time a batch stays open after its tick, in milliseconds
pub const DEFAULT_BATCH_DELAY_MS: u64 = 1;

/// Upper bound on the yields spent waiting for a pending batch to settle
const MAX_SETTLE_YIELDS: usize = 8;

/// Tuning for a [`BatchLoader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Extra time to keep a batch open after the end of its tick
    ///
    /// `None` dispatches as soon as the tick ends, which only coalesces
    /// reliably on a current-thread runtime.
    pub delay: Option<Duration>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delay: Some(Duration::from_millis(DEFAULT_BATCH_DELAY_MS)),
        }
    }
}

#[derive(Debug, Clone)]
enum BatchState<E> {
    Waiting,
    Done(Result<(), E>),
    Aborted,
}

struct Batch<E> {
    state: watch::Sender<BatchState<E>>,
}

impl<E> Batch<E> {
    fn new() -> Arc<Self> {
        let (state, _) = watch::channel(BatchState::Waiting);
        Arc::new(Self { state })
    }
}

struct Pending<K, E> {
    batch: Arc<Batch<E>>,
    keys: HashSet<K>,
}

struct InFlight<K, E> {
    batch: Arc<Batch<E>>,
    keys: HashSet<K>,
}

struct State<K, V, E> {
    /// Resolved entries; `None` marks a key known to have no row
    cache: HashMap<K, Option<V>>,
    pending: Option<Pending<K, E>>,
    in_flight: Vec<InFlight<K, E>>,
}

struct Inner<K, F: Fetch<K>> {
    name: &'static str,
    fetcher: F,
    options: LoaderOptions,
    state: Mutex<State<K, F::Value, F::Error>>,
    gate: tokio::sync::Mutex<()>,
    dispatches: AtomicUsize,
}

enum Enqueued<V, E> {
    Cached(Option<V>),
    Pending(Arc<Batch<E>>),
    InFlight(Arc<Batch<E>>),
}

/// Coalescing, memoizing loader for one entity type within one request
pub struct BatchLoader<K, F: Fetch<K>> {
    inner: Arc<Inner<K, F>>,
}

impl<K, F> BatchLoader<K, F>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    F: Fetch<K>,
{
    /// Create a loader with the default batch delay
    pub fn new(name: &'static str, fetcher: F) -> Self {
        Self::with_options(name, fetcher, LoaderOptions::default())
    }

    /// Create a loader with explicit options
    pub fn with_options(name: &'static str, fetcher: F, options: LoaderOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                fetcher,
                options,
                state: Mutex::new(State {
                    cache: HashMap::new(),
                    pending: None,
                    in_flight: Vec::new(),
                }),
                gate: tokio::sync::Mutex::new(()),
                dispatches: AtomicUsize::new(0),
            }),
        }
    }

    /// Loader name used in logs
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Number of fetches this loader has dispatched
    pub fn dispatch_count(&self) -> usize {
        self.inner.dispatches.load(Ordering::Relaxed)
    }

    /// Load the value for one key
    ///
    /// Cached keys resolve immediately. Otherwise the key joins the current
    /// tick's batch (or the in-flight batch already carrying it) and the
    /// call resolves once that batch completes. `Ok(None)` means the store
    /// has no row for the key.
    pub async fn load_one(&self, key: K) -> Result<Option<F::Value>, LoadError<F::Error>> {
        let batch = match self.enqueue(&key) {
            Enqueued::Cached(value) => return Ok(value),
            Enqueued::InFlight(batch) => batch,
            Enqueued::Pending(batch) => {
                self.end_of_tick(&batch).await;
                self.dispatch(&batch);
                batch
            }
        };
        self.wait(&batch, &key).await
    }

    /// Load several keys, returning values in the order of `keys`
    ///
    /// Duplicates are fetched once and repeated in the output.
    pub async fn load_many<I>(&self, keys: I) -> Result<Vec<Option<F::Value>>, LoadError<F::Error>>
    where
        I: IntoIterator<Item = K>,
    {
        try_join_all(keys.into_iter().map(|key| self.load_one(key))).await
    }

    /// Seed the cache so a later load of `key` needs no fetch
    ///
    /// An entry that is already cached is kept.
    pub fn prime(&self, key: K, value: F::Value) {
        self.inner.state().cache.entry(key).or_insert(Some(value));
    }

    /// Dispatch the pending batch now instead of at the end of the tick
    ///
    /// Must be called from within a tokio runtime.
    pub fn flush(&self) {
        let batch = self
            .inner
            .state()
            .pending
            .as_ref()
            .map(|pending| Arc::clone(&pending.batch));
        if let Some(batch) = batch {
            self.dispatch(&batch);
        }
    }

    fn enqueue(&self, key: &K) -> Enqueued<F::Value, F::Error> {
        let mut state = self.inner.state();
        if let Some(value) = state.cache.get(key) {
            return Enqueued::Cached(value.clone());
        }
        if let Some(in_flight) = state.in_flight.iter().find(|f| f.keys.contains(key)) {
            return Enqueued::InFlight(Arc::clone(&in_flight.batch));
        }
        let pending = state.pending.get_or_insert_with(|| Pending {
            batch: Batch::new(),
            keys: HashSet::new(),
        });
        pending.keys.insert(key.clone());
        Enqueued::Pending(Arc::clone(&pending.batch))
    }

    async fn end_of_tick(&self, batch: &Arc<Batch<F::Error>>) {
        // Keep yielding while sibling resolvers are still adding keys
        let mut seen = 0;
        for _ in 0..MAX_SETTLE_YIELDS {
            tokio::task::yield_now().await;
            match self.pending_len(batch) {
                Some(len) if len > seen => seen = len,
                _ => break,
            }
        }
        if let Some(delay) = self.inner.options.delay {
            if self.pending_len(batch).is_some() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Number of keys in `batch` while it is still the pending batch
    fn pending_len(&self, batch: &Arc<Batch<F::Error>>) -> Option<usize> {
        self.inner
            .state()
            .pending
            .as_ref()
            .filter(|pending| Arc::ptr_eq(&pending.batch, batch))
            .map(|pending| pending.keys.len())
    }

    /// Move `batch` from pending to in-flight and start its fetch
    ///
    /// No-op when `batch` is no longer the pending batch, i.e. another
    /// caller of the same tick already dispatched it.
    fn dispatch(&self, batch: &Arc<Batch<F::Error>>) {
        let keys = {
            let mut state = self.inner.state();
            let Some(pending) = state
                .pending
                .take_if(|pending| Arc::ptr_eq(&pending.batch, batch))
            else {
                return;
            };
            // Keys primed while the batch was open need no fetch
            let keys: HashSet<K> = pending
                .keys
                .into_iter()
                .filter(|key| !state.cache.contains_key(key))
                .collect();
            state.in_flight.push(InFlight {
                batch: Arc::clone(batch),
                keys: keys.clone(),
            });
            keys.into_iter().collect::<Vec<_>>()
        };

        let inner = Arc::clone(&self.inner);
        let batch = Arc::clone(batch);
        tokio::spawn(async move { inner.run(batch, keys).await });
    }

    async fn wait(
        &self,
        batch: &Batch<F::Error>,
        key: &K,
    ) -> Result<Option<F::Value>, LoadError<F::Error>> {
        let mut rx = batch.state.subscribe();
        let outcome = match rx
            .wait_for(|state| !matches!(state, BatchState::Waiting))
            .await
        {
            Ok(state) => state.clone(),
            Err(_) => BatchState::Aborted,
        };

        match outcome {
            BatchState::Done(Ok(())) => Ok(self.inner.state().cache.get(key).cloned().flatten()),
            BatchState::Done(Err(err)) => Err(LoadError::Fetch(err)),
            BatchState::Waiting | BatchState::Aborted => Err(LoadError::Aborted(self.inner.name)),
        }
    }
}

impl<K, F> Inner<K, F>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    F: Fetch<K>,
{
    fn state(&self) -> MutexGuard<'_, State<K, F::Value, F::Error>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run(&self, batch: Arc<Batch<F::Error>>, keys: Vec<K>) {
        let mut completion = Completion {
            inner: self,
            batch: &batch,
            done: false,
        };

        if keys.is_empty() {
            completion.finish(Ok(()), HashMap::new(), &keys);
            return;
        }

        let _gate = self.gate.lock().await;
        self.dispatches.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(loader = self.name, keys = keys.len(), "Dispatching batch");

        match self.fetcher.fetch(&keys).await {
            Ok(rows) => completion.finish(Ok(()), rows, &keys),
            Err(err) => {
                tracing::warn!(loader = self.name, keys = keys.len(), "Batch fetch failed");
                completion.finish(Err(err), HashMap::new(), &keys);
            }
        }
    }
}

/// Resolves a batch exactly once, marking it aborted if dropped unresolved
struct Completion<'a, K, F: Fetch<K>> {
    inner: &'a Inner<K, F>,
    batch: &'a Arc<Batch<F::Error>>,
    done: bool,
}

impl<K, F> Completion<'_, K, F>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    F: Fetch<K>,
{
    fn finish(
        &mut self,
        outcome: Result<(), F::Error>,
        mut rows: HashMap<K, F::Value>,
        keys: &[K],
    ) {
        {
            let mut state = self.inner.state();
            if outcome.is_ok() {
                for key in keys {
                    let value = rows.remove(key);
                    state.cache.insert(key.clone(), value);
                }
            }
            state.in_flight.retain(|f| !Arc::ptr_eq(&f.batch, self.batch));
        }
        self.batch.state.send_replace(BatchState::Done(outcome));
        self.done = true;
    }
}

impl<K, F: Fetch<K>> Drop for Completion<'_, K, F> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .retain(|f| !Arc::ptr_eq(&f.batch, self.batch));
        self.batch.state.send_replace(BatchState::Aborted);
    }
}
