use crate::application::dto::{
    RecalculationOptions, RecalculationPriority, RecalculationRequest, RecalculationResponse,
};
use crate::career_graph::services::MockRecalculator;
use crate::ports::inbound::RecalculationPort;
use crate::ports::outbound::RecalculationApi;
use crate::shared::error::RecalculationError;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

type RecalculationOutcome = Result<RecalculationResponse, RecalculationError>;
type SharedCall = Shared<BoxFuture<'static, RecalculationOutcome>>;

/// Tunables of the recalculation cache
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecalculationCacheSettings {
    /// How long a stored response is served
    pub ttl: Duration,
    /// Stored responses kept before the oldest is evicted
    pub max_entries: usize,
    /// Answer a missing endpoint (404) with a local mock result
    pub mock_fallback: bool,
}

impl Default for RecalculationCacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_entries: 50,
            mock_fallback: true,
        }
    }
}

/// Snapshot of cache activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationCacheStats {
    pub cached_entries: usize,
    pub in_flight: usize,
    pub hits: u64,
    pub misses: u64,
    pub coalesced: u64,
    pub mock_fallbacks: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    response: RecalculationResponse,
    stored_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

struct InFlight {
    ticket: u64,
    call: SharedCall,
    waiters: usize,
}

/// Held by each caller waiting on an in-flight call
///
/// The last waiter to go away before the call finishes removes the entry, so
/// a caller dropped mid-call never leaves an unpolled future for later
/// requests to join.
struct WaiterGuard {
    in_flight: Arc<DashMap<String, InFlight>>,
    key: String,
    ticket: u64,
}

impl Drop for WaiterGuard {
    fn drop(&mut self) {
        let ticket = self.ticket;
        let abandoned = match self.in_flight.get_mut(&self.key) {
            Some(mut running) if running.ticket == ticket => {
                running.waiters = running.waiters.saturating_sub(1);
                running.waiters == 0
            }
            _ => false,
        };
        if abandoned {
            debug!(key = %self.key, "Abandoning recalculation with no waiters left");
            self.in_flight.remove_if(&self.key, |_, running| {
                running.ticket == ticket && running.waiters == 0
            });
        }
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    coalesced: AtomicU64,
    mock_fallbacks: AtomicU64,
}

/// CachingRecalculationClient wraps a RecalculationApi with a short-lived cache
///
/// This adapter implements the decorator pattern:
/// 1. A fresh stored response for the request key is returned without a call
/// 2. A call already running for the key is joined instead of repeated
/// 3. Otherwise the inner API is called and a successful response stored
///
/// A 404 from the endpoint is answered with a mock result (flagged `mock`)
/// when the fallback is enabled. Mock results are never stored.
///
/// Concurrent callers of one key share a single future. Each caller races it
/// against its own cancellation token; the underlying request is dropped,
/// and so aborted, once no caller is left waiting on it. A caller that is
/// cancelled or simply dropped (a lost `select!` arm, a timeout) counts as
/// gone, and the next request for the key starts a fresh call.
pub struct CachingRecalculationClient<A: RecalculationApi + 'static> {
    inner: Arc<A>,
    cache: Arc<DashMap<String, CacheEntry>>,
    in_flight: Arc<DashMap<String, InFlight>>,
    counters: Arc<Counters>,
    next_ticket: AtomicU64,
    settings: RecalculationCacheSettings,
}

impl<A: RecalculationApi + 'static> CachingRecalculationClient<A> {
    pub fn new(inner: A, settings: RecalculationCacheSettings) -> Self {
        Self {
            inner: Arc::new(inner),
            cache: Arc::new(DashMap::new()),
            in_flight: Arc::new(DashMap::new()),
            counters: Arc::new(Counters::default()),
            next_ticket: AtomicU64::new(0),
            settings,
        }
    }

    pub fn settings(&self) -> &RecalculationCacheSettings {
        &self.settings
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Drops every stored response; running calls are unaffected
    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> RecalculationCacheStats {
        RecalculationCacheStats {
            cached_entries: self.cache.len(),
            in_flight: self.in_flight.len(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            coalesced: self.counters.coalesced.load(Ordering::Relaxed),
            mock_fallbacks: self.counters.mock_fallbacks.load(Ordering::Relaxed),
        }
    }

    fn cached(&self, key: &str) -> Option<RecalculationResponse> {
        let ttl = self.settings.ttl;
        let fresh = self
            .cache
            .get(key)
            .and_then(|entry| entry.is_fresh(ttl).then(|| entry.response.clone()));
        if fresh.is_none() {
            self.cache.remove_if(key, |_, entry| !entry.is_fresh(ttl));
        }
        fresh
    }

    /// Joins the call running for `key`, or starts one
    ///
    /// The returned guard must be held for as long as the caller waits.
    fn join_or_start(
        &self,
        key: &str,
        request: RecalculationRequest,
        priority: RecalculationPriority,
    ) -> (SharedCall, WaiterGuard) {
        let (call, ticket) = match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(mut running) => {
                self.counters.coalesced.fetch_add(1, Ordering::Relaxed);
                debug!(key, "Joining in-flight recalculation");
                let running = running.get_mut();
                running.waiters += 1;
                (running.call.clone(), running.ticket)
            }
            Entry::Vacant(slot) => {
                let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
                let call = self.start_call(key.to_string(), ticket, request, priority);
                slot.insert(InFlight {
                    ticket,
                    call: call.clone(),
                    waiters: 1,
                });
                (call, ticket)
            }
        };
        let guard = WaiterGuard {
            in_flight: Arc::clone(&self.in_flight),
            key: key.to_string(),
            ticket,
        };
        (call, guard)
    }

    fn start_call(
        &self,
        key: String,
        ticket: u64,
        request: RecalculationRequest,
        priority: RecalculationPriority,
    ) -> SharedCall {
        let inner = Arc::clone(&self.inner);
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);
        let counters = Arc::clone(&self.counters);
        let settings = self.settings;

        async move {
            let outcome = match inner.recalculate(&request, priority).await {
                Ok(response) => {
                    store(&cache, key.clone(), response.clone(), &settings);
                    Ok(response)
                }
                Err(RecalculationError::EndpointNotFound { url }) if settings.mock_fallback => {
                    warn!(
                        %url,
                        "Recalculation endpoint not found; serving a non-authoritative mock result"
                    );
                    counters.mock_fallbacks.fetch_add(1, Ordering::Relaxed);
                    Ok(mock_response(&request, &key))
                }
                Err(e) => Err(e),
            };
            in_flight.remove_if(&key, |_, running| running.ticket == ticket);
            outcome
        }
        .boxed()
        .shared()
    }
}

/// Stores a response, dropping expired entries and then the oldest ones over capacity
fn store(
    cache: &DashMap<String, CacheEntry>,
    key: String,
    response: RecalculationResponse,
    settings: &RecalculationCacheSettings,
) {
    cache.insert(
        key,
        CacheEntry {
            response,
            stored_at: Instant::now(),
        },
    );
    cache.retain(|_, entry| entry.is_fresh(settings.ttl));

    while cache.len() > settings.max_entries {
        let oldest = cache
            .iter()
            .min_by_key(|entry| entry.stored_at)
            .map(|entry| entry.key().clone());
        match oldest {
            Some(oldest) => {
                debug!(key = %oldest, "Evicting oldest recalculation");
                cache.remove(&oldest);
            }
            None => break,
        }
    }
}

fn mock_response(request: &RecalculationRequest, key: &str) -> RecalculationResponse {
    let start = std::time::Instant::now();
    let mock = MockRecalculator::recalculate(
        &request.nodes,
        &request.edges,
        request.depth,
        &mut rand::thread_rng(),
    );
    RecalculationResponse {
        updated_nodes: mock.nodes,
        updated_edges: mock.edges,
        confidence: mock.confidence,
        processing_time: start.elapsed().as_secs_f64() * 1000.0,
        cache_key: key.to_string(),
        alternative_paths: None,
        mock: true,
    }
}

#[async_trait]
impl<A: RecalculationApi + 'static> RecalculationPort for CachingRecalculationClient<A> {
    async fn recalculate(
        &self,
        request: RecalculationRequest,
        options: RecalculationOptions,
    ) -> RecalculationOutcome {
        let key = request.cache_key();

        if options.use_cache {
            if let Some(response) = self.cached(&key) {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                debug!(%key, "Recalculation cache hit");
                return Ok(response);
            }
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);

        let (call, _waiting) = self.join_or_start(&key, request, options.priority);

        match options.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(%key, "Recalculation cancelled by caller");
                    Err(RecalculationError::Cancelled)
                }
                outcome = call => outcome,
            },
            None => call.await,
        }
    }
}
