//! Debounced, generation-tagged query coordination.
//!
//! Viewport changes arrive at high frequency during a drag gesture. The
//! coordinator collapses each burst into a single query (trailing-edge
//! debounce: only the final viewport within a quiet window is queried),
//! tags every issued query with a monotonically increasing generation,
//! and discards responses that arrive after a newer generation has been
//! delivered. Cancellation is response-level: an in-flight store request
//! is never aborted, its response is simply dropped on arrival if stale.

use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, Result};
use crate::record::{BoundsQuery, DateFilter, GeoRecord, ObfuscatedRecord};
use crate::store::RecordStore;
use foodshare_geo::{BoundingBox, Coordinate, Viewport};
use foodshare_privacy::LocationObfuscator;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Receives the outcome of settled queries.
///
/// Callbacks are invoked on the coordinator's worker task while internal
/// state is held, which is what makes delivery strictly
/// generation-ordered. Implementations must return promptly and must not
/// call back into the coordinator from inside a callback; push into a
/// channel or queue instead.
pub trait ResultSink: Send + Sync + 'static {
    /// The winning result set for a settled burst. Records are already
    /// redacted; true coordinates never reach this callback for
    /// non-owner viewers.
    fn on_results(&self, generation: u64, records: Vec<ObfuscatedRecord>);

    /// A settled query failed. No result delivery follows for this
    /// generation, so whatever the consumer currently displays remains
    /// the latest good state.
    fn on_query_error(&self, generation: u64, error: DiscoveryError);
}

/// Coordinator lifecycle phase.
///
/// Supersession of an in-flight query is tracked per-query via the
/// generation counter rather than as a phase: when a new change arrives
/// mid-flight the coordinator moves back to `Scheduled` and the old
/// query's response is discarded on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No pending timer, no in-flight query
    Idle,
    /// A settle timer is pending
    Scheduled,
    /// A query has been issued and its response is awaited
    Querying,
}

/// What the next settled query should ask for.
#[derive(Debug, Clone)]
enum QueryTarget {
    /// The latest map viewport
    Viewport(Viewport),
    /// A geocoded address search
    Anchor { point: Coordinate, radius_km: f64 },
}

struct CoordinatorState {
    target: Option<QueryTarget>,
    date_filter: Option<DateFilter>,
    timer: Option<JoinHandle<()>>,
    timer_seq: u64,
    delivered_generation: u64,
    phase: Phase,
}

struct Inner<S, C> {
    store: S,
    sink: C,
    config: DiscoveryConfig,
    obfuscator: LocationObfuscator,
    viewer: Option<String>,
    generation: AtomicU64,
    state: Mutex<CoordinatorState>,
}

/// Orchestrates discovery queries against a moving viewport.
///
/// All mutable state (generation counter, pending-timer handle, latest
/// target) lives inside the instance; there are no module-level
/// singletons. The handle is cheap to clone and safe to share across
/// threads. Methods that schedule work must be called from within a
/// Tokio runtime.
///
/// # Example
/// ```no_run
/// use foodshare_discovery::{
///     Coordinate, DiscoveryConfig, GeoQueryCoordinator, MemoryStore, ObfuscatedRecord,
///     ResultSink, Viewport,
/// };
///
/// struct Printer;
/// impl ResultSink for Printer {
///     fn on_results(&self, generation: u64, records: Vec<ObfuscatedRecord>) {
///         println!("generation {generation}: {} records", records.len());
///     }
///     fn on_query_error(&self, generation: u64, error: foodshare_discovery::DiscoveryError) {
///         eprintln!("generation {generation} failed: {error}");
///     }
/// }
///
/// # async fn example() -> foodshare_discovery::Result<()> {
/// let coordinator =
///     GeoQueryCoordinator::new(MemoryStore::new(), Printer, DiscoveryConfig::default())?;
/// coordinator.on_viewport_changed(Viewport::new(Coordinate::new(51.0447, -114.0719), 11.0))?;
/// # Ok(())
/// # }
/// ```
pub struct GeoQueryCoordinator<S, C> {
    inner: Arc<Inner<S, C>>,
}

impl<S, C> Clone for GeoQueryCoordinator<S, C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: RecordStore, C: ResultSink> GeoQueryCoordinator<S, C> {
    /// Creates a coordinator for an anonymous viewer.
    pub fn new(store: S, sink: C, config: DiscoveryConfig) -> Result<Self> {
        Self::for_viewer(store, sink, config, None)
    }

    /// Creates a coordinator for a known viewer.
    ///
    /// Records owned by `viewer` are delivered with their true coordinate
    /// and address; everything else is redacted.
    ///
    /// # Errors
    /// `InvalidConfig` when the configuration fails validation.
    pub fn for_viewer(
        store: S,
        sink: C,
        config: DiscoveryConfig,
        viewer: Option<String>,
    ) -> Result<Self> {
        config.validate()?;
        let obfuscator = LocationObfuscator::new(config.obfuscation_radius_km);

        Ok(Self {
            inner: Arc::new(Inner {
                store,
                sink,
                config,
                obfuscator,
                viewer,
                generation: AtomicU64::new(0),
                state: Mutex::new(CoordinatorState {
                    target: None,
                    date_filter: None,
                    timer: None,
                    timer_seq: 0,
                    delivered_generation: 0,
                    phase: Phase::Idle,
                }),
            }),
        })
    }

    /// Records a viewport change and (re)starts the settle timer.
    ///
    /// Any previously pending timer is cancelled, so a burst of changes
    /// results in exactly one query, issued for the final viewport after
    /// the quiet window.
    ///
    /// # Errors
    /// `InvalidGeometry` for a non-finite center or zoom; the change is
    /// ignored and any pending schedule is left untouched.
    pub fn on_viewport_changed(&self, viewport: Viewport) -> Result<()> {
        viewport.validate()?;
        self.schedule(QueryTarget::Viewport(viewport), self.inner.config.settle());
        Ok(())
    }

    /// Issues an anchor (geocoded address) search.
    ///
    /// An explicit search is not debounced: it fires immediately, through
    /// the same generation machinery, superseding any pending viewport
    /// timer. Pass `None` to use the configured default radius.
    ///
    /// # Errors
    /// `InvalidGeometry` for an invalid anchor point or radius.
    pub fn on_anchor_search(&self, point: Coordinate, radius_km: Option<f64>) -> Result<()> {
        let radius_km = radius_km.unwrap_or(self.inner.config.anchor_radius_km);
        // Validates both the point and the radius before anything is scheduled
        BoundingBox::from_anchor_radius(&point, radius_km)?;
        self.schedule(QueryTarget::Anchor { point, radius_km }, Duration::ZERO);
        Ok(())
    }

    /// Sets the date range applied to subsequent settled queries.
    pub fn set_date_filter(&self, filter: Option<DateFilter>) {
        self.inner.state.lock().unwrap().date_filter = filter;
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.inner.state.lock().unwrap().phase
    }

    /// Generation of the most recently issued query.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    fn schedule(&self, target: QueryTarget, delay: Duration) {
        let mut state = self.inner.state.lock().unwrap();

        state.target = Some(target);
        state.timer_seq += 1;
        let seq = state.timer_seq;

        // Trailing-edge debounce: at most one timer pending at any instant
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        let inner = Arc::clone(&self.inner);
        state.timer = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Inner::settle(inner, seq).await;
        }));
        state.phase = Phase::Scheduled;

        debug!(seq, delay_ms = delay.as_millis() as u64, "query scheduled");
    }
}

impl<S: RecordStore, C: ResultSink> Inner<S, C> {
    /// Fires after the quiet window: issues exactly one query for the
    /// latest target, tagged with a fresh generation.
    async fn settle(inner: Arc<Self>, seq: u64) {
        let (target, date_filter) = {
            let mut state = inner.state.lock().unwrap();
            if state.timer_seq != seq {
                // A newer change was scheduled while this timer was waking up
                return;
            }
            state.timer = None;
            let Some(target) = state.target.clone() else {
                state.phase = Phase::Idle;
                return;
            };
            state.phase = Phase::Querying;
            (target, state.date_filter)
        };

        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let bounds = match &target {
            QueryTarget::Viewport(viewport) => BoundingBox::from_viewport(viewport),
            QueryTarget::Anchor { point, radius_km } => {
                BoundingBox::from_anchor_radius(point, *radius_km)
            }
        };
        let bounds = match bounds {
            Ok(bounds) => bounds,
            Err(e) => {
                // Targets are validated on entry, so this only fires if a
                // calculator invariant broke; never query with a bad box.
                Self::deliver_error(&inner, generation, e.into());
                return;
            }
        };

        debug!(
            generation,
            min_lat = bounds.min_lat,
            max_lat = bounds.max_lat,
            min_lon = bounds.min_lon,
            max_lon = bounds.max_lon,
            "issuing bounds query"
        );

        let query = BoundsQuery {
            bounds,
            date_filter,
            limit: inner.config.max_results,
        };

        match inner.store.query(query).await {
            Ok(records) => Self::deliver_results(&inner, generation, records),
            Err(source) => Self::deliver_error(
                &inner,
                generation,
                DiscoveryError::QueryFailed { generation, source },
            ),
        }
    }

    fn deliver_results(inner: &Arc<Self>, generation: u64, records: Vec<GeoRecord>) {
        // Cheap unlocked peek so a known-stale response skips redaction
        if generation != inner.generation.load(Ordering::SeqCst) {
            debug!(generation, "discarding stale query result");
            return;
        }

        let total = records.len();
        let redacted: Vec<ObfuscatedRecord> = records
            .into_iter()
            .filter_map(|record| {
                let id = record.id.clone();
                match record.redact_for(inner.viewer.as_deref(), &inner.obfuscator) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        // Never deliver a record that cannot be displaced
                        warn!(record_id = %id, error = %e, "dropping unobfuscatable record");
                        None
                    }
                }
            })
            .collect();

        let mut state = inner.state.lock().unwrap();
        if generation != inner.generation.load(Ordering::SeqCst)
            || generation <= state.delivered_generation
        {
            debug!(generation, "discarding stale query result");
            return;
        }
        state.delivered_generation = generation;
        if state.timer.is_none() {
            state.phase = Phase::Idle;
        }

        debug!(generation, delivered = redacted.len(), total, "delivering results");
        inner.sink.on_results(generation, redacted);
    }

    fn deliver_error(inner: &Arc<Self>, generation: u64, error: DiscoveryError) {
        let mut state = inner.state.lock().unwrap();
        if generation != inner.generation.load(Ordering::SeqCst)
            || generation <= state.delivered_generation
        {
            debug!(generation, "discarding stale query failure");
            return;
        }
        state.delivered_generation = generation;
        if state.timer.is_none() {
            state.phase = Phase::Idle;
        }

        warn!(generation, error = %error, "bounds query failed");
        inner.sink.on_query_error(generation, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    struct NullSink;
    impl ResultSink for NullSink {
        fn on_results(&self, _generation: u64, _records: Vec<ObfuscatedRecord>) {}
        fn on_query_error(&self, _generation: u64, _error: DiscoveryError) {}
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = DiscoveryConfig { settle_ms: 0, ..Default::default() };
        assert!(GeoQueryCoordinator::new(MemoryStore::new(), NullSink, config).is_err());
    }

    #[tokio::test]
    async fn test_invalid_viewport_is_not_scheduled() {
        let coordinator = GeoQueryCoordinator::new(
            MemoryStore::new(),
            NullSink,
            DiscoveryConfig::default(),
        )
        .unwrap();

        let bad = Viewport::new(Coordinate::new(f64::NAN, 0.0), 11.0);
        assert!(coordinator.on_viewport_changed(bad).is_err());
        assert_eq!(coordinator.phase(), Phase::Idle);
        assert_eq!(coordinator.generation(), 0);
    }

    #[tokio::test]
    async fn test_invalid_anchor_is_not_scheduled() {
        let coordinator = GeoQueryCoordinator::new(
            MemoryStore::new(),
            NullSink,
            DiscoveryConfig::default(),
        )
        .unwrap();

        let result = coordinator.on_anchor_search(Coordinate::new(0.0, 0.0), Some(f64::NAN));
        assert!(result.is_err());
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_scheduling_moves_phase() {
        let coordinator = GeoQueryCoordinator::new(
            MemoryStore::new(),
            NullSink,
            DiscoveryConfig::default(),
        )
        .unwrap();

        let viewport = Viewport::new(Coordinate::new(51.0447, -114.0719), 11.0);
        coordinator.on_viewport_changed(viewport).unwrap();
        assert_eq!(coordinator.phase(), Phase::Scheduled);
    }
}
