//! # Loadout Loader Thread
//!
//! Store fetches are blocking, so they run on a dedicated thread instead of
//! the authority thread. Every request carries a generation number; the
//! coordinator only honors a result whose generation still matches its
//! pending entry, which makes the last reload for an entity win regardless
//! of how fetches interleave.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use prism_core::{CosmeticLoadout, EntityId, LoadoutError, LoadoutStore};

/// Outcome of one fetch, tagged with the generation of the request that
/// produced it.
pub(crate) struct LoadResult {
    /// Entity the fetch was for.
    pub entity: EntityId,
    /// Generation of the originating request.
    pub generation: u64,
    /// The fetched loadout, or the backend failure.
    pub outcome: Result<CosmeticLoadout, LoadoutError>,
}

/// Single fetch thread plus its channels.
pub(crate) struct LoadoutLoader {
    requests: Option<Sender<(EntityId, u64)>>,
    results: Receiver<LoadResult>,
    worker: Option<JoinHandle<()>>,
}

impl LoadoutLoader {
    /// Spawns the fetch thread over a shared store handle.
    pub(crate) fn start(store: Arc<dyn LoadoutStore>) -> Self {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<(EntityId, u64)>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        let worker = thread::Builder::new()
            .name("prism-loadout".to_owned())
            .spawn(move || {
                while let Ok((entity, generation)) = request_rx.recv() {
                    let outcome = store.loadout(entity);
                    if result_tx
                        .send(LoadResult {
                            entity,
                            generation,
                            outcome,
                        })
                        .is_err()
                    {
                        break;
                    }
                }
            })
            .unwrap_or_else(|err| panic!("failed to spawn loadout loader: {err}"));

        Self {
            requests: Some(request_tx),
            results: result_rx,
            worker: Some(worker),
        }
    }

    /// Queues a fetch. Silently a no-op after shutdown.
    pub(crate) fn request(&self, entity: EntityId, generation: u64) {
        if let Some(requests) = &self.requests {
            let _ = requests.send((entity, generation));
        }
    }

    /// Drains every fetch completed so far without blocking.
    pub(crate) fn drain_completed(&self) -> Vec<LoadResult> {
        self.results.try_iter().collect()
    }

    /// Closes the request channel and joins the fetch thread. Idempotent.
    pub(crate) fn shutdown(&mut self) {
        if self.requests.take().is_none() {
            return;
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("loadout loader panicked during shutdown");
            }
        }
        let discarded = self.results.try_iter().count();
        debug!(discarded, "loadout loader stopped");
    }
}

impl Drop for LoadoutLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}
