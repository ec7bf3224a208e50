//! A logged-in viewer and the data they are looking at.
//!
//! Every refresh, whether asked for by the viewer or by the [`Refresher`]
//! timer, goes through [`Session::refresh`]. Only one cycle runs at a time
//! and a cycle that ends after the viewer logged out is thrown away.
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

use crate::{authenticate, load_records, Credential, Record, Source};
use crate::error::Result;

/// The records of one successful fetch.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Grows by one with every successful refresh of a session.
    pub generation: u64,
    pub records: Vec<Record>,
    pub updated_at: SystemTime,
}

/// What came out of a refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// A new snapshot with this generation is in place.
    Updated(u64),
    /// Another refresh was already running.
    Skipped,
    /// The session ended while fetching.
    Discarded,
}

/// Releases the in-flight flag when the cycle ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<InFlight<'a>> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl<'a> Drop for InFlight<'a> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Session<S> {
    source: S,
    viewer: Credential,
    active: AtomicBool,
    in_flight: AtomicBool,
    generation: AtomicU64,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
}

impl<S> Session<S>
where
    S: Source,
{
    /// Starts a session for whoever matches `name` and `key`. No data is
    /// fetched until the first refresh.
    pub fn login(source: S, credentials: &[Credential], name: &str, key: &str) -> Result<Session<S>> {
        let viewer = authenticate(credentials, name, key)?.clone();

        Ok(Session::new(source, viewer))
    }

    pub fn new(source: S, viewer: Credential) -> Session<S> {
        Session {
            source,
            viewer,
            active: AtomicBool::new(true),
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            snapshot: RwLock::new(None),
        }
    }

    pub fn viewer(&self) -> &Credential {
        &self.viewer
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Runs one fetch, decode and map cycle.
    ///
    /// On failure the previous snapshot stays in place and the error is
    /// returned.
    pub fn refresh(&self) -> Result<Refresh> {
        if !self.is_active() {
            return Ok(Refresh::Discarded);
        }

        let _guard = match InFlight::acquire(&self.in_flight) {
            Some(guard) => guard,
            None => {
                debug!("refresh already in flight, skipping");

                return Ok(Refresh::Skipped);
            }
        };

        let records = match load_records(&self.source) {
            Ok(records) => records,
            Err(e) => {
                warn!(source = %self.source.describe(), error = %e, "refresh failed, keeping previous data");

                return Err(e);
            }
        };

        let mut current = self.snapshot.write().unwrap_or_else(|e| e.into_inner());

        if !self.is_active() {
            info!("session ended during refresh, discarding result");

            return Ok(Refresh::Discarded);
        }

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        info!(generation, records = records.len(), "data refreshed");

        *current = Some(Arc::new(Snapshot {
            generation,
            records,
            updated_at: SystemTime::now(),
        }));

        Ok(Refresh::Updated(generation))
    }

    /// Latest data, if any refresh succeeded so far.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Ends the session. Running refreshes finish but their result is
    /// dropped, and refreshers stop.
    pub fn logout(&self) {
        // taking the lock orders this with a refresh about to store its result
        let _current = self.snapshot.write().unwrap_or_else(|e| e.into_inner());

        if self.active.swap(false, Ordering::AcqRel) {
            info!(viewer = self.viewer.name(), "logged out");
        }
    }
}

/// Refreshes a session periodically from a background thread.
pub struct Refresher {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Refresher {
    /// The first refresh happens after `interval`, not immediately.
    pub fn spawn<S>(session: Arc<Session<S>>, interval: Duration) -> Refresher
    where
        S: Source + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();

        let handle = thread::spawn(move || loop {
            match stopped.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if !session.is_active() {
                        break;
                    }

                    // failures are already logged and leave the old data in place
                    let _ = session.refresh();
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        Refresher {
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    /// Whether the background thread is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }

    /// Stops the timer and waits for a refresh in progress to end.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
