//! # Geometry Worker Pool
//!
//! Fixed-size pool computing particle geometry off the authority thread.
//! Jobs are whole-heartbeat batches; workers pull batches from a shared
//! channel, run every request in order, and send back one instruction list
//! per batch. A failed request is logged and skipped, never aborting the
//! rest of its batch.
//!
//! Shutdown closes the job channel and joins every worker. Results still in
//! flight at that point are dropped, not flushed.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use prism_core::{CloakEffect, EntityContext, ParticleInstruction, TrailEffect};

/// One unit of off-thread work: a cosmetic instance plus the immutable
/// context it should render against.
pub(crate) enum TickRequest {
    /// Trail tick; the trail's own trigger predicate gates emission.
    Trail {
        /// Shared trail instance.
        trail: Arc<dyn TrailEffect>,
        /// Context snapshot for this heartbeat.
        ctx: EntityContext,
    },
    /// Cloak tick for an already-active cloak.
    Cloak {
        /// Shared cloak instance.
        cloak: Arc<dyn CloakEffect>,
        /// Context snapshot for this heartbeat.
        ctx: EntityContext,
    },
}

impl TickRequest {
    fn cosmetic_id(&self) -> &str {
        match self {
            Self::Trail { trail, .. } => trail.descriptor().id(),
            Self::Cloak { cloak, .. } => cloak.descriptor().id(),
        }
    }

    fn run(&self) -> Result<Vec<ParticleInstruction>, prism_core::CosmeticError> {
        match self {
            Self::Trail { trail, ctx } => {
                if !trail.should_trigger(ctx) {
                    return Ok(Vec::new());
                }
                trail.tick(ctx)
            }
            Self::Cloak { cloak, ctx } => cloak.tick(ctx),
        }
    }
}

/// Fixed pool of named worker threads plus the channels feeding them.
pub(crate) struct WorkerPool {
    jobs: Option<Sender<Vec<TickRequest>>>,
    results: Receiver<Vec<ParticleInstruction>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `threads` workers. The job channel is shared; whichever worker
    /// is free takes the next batch.
    pub(crate) fn start(threads: usize) -> Self {
        let threads = threads.max(1);
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<Vec<TickRequest>>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        let mut workers = Vec::with_capacity(threads);
        for index in 0..threads {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("prism-cosmetic-{index}"))
                .spawn(move || worker_loop(&jobs, &results))
                .unwrap_or_else(|err| panic!("failed to spawn cosmetic worker: {err}"));
            workers.push(handle);
        }
        debug!(threads, "cosmetic worker pool started");

        Self {
            jobs: Some(job_tx),
            results: result_rx,
            workers,
        }
    }

    /// Hands one heartbeat's batch to the pool. Silently a no-op after
    /// shutdown.
    pub(crate) fn submit(&self, batch: Vec<TickRequest>) {
        if batch.is_empty() {
            return;
        }
        if let Some(jobs) = &self.jobs {
            // Send only fails once every worker is gone; at that point the
            // batch is moot anyway.
            let _ = jobs.send(batch);
        }
    }

    /// Drains every batch result completed so far without blocking.
    pub(crate) fn drain_completed(&self) -> Vec<Vec<ParticleInstruction>> {
        self.results.try_iter().collect()
    }

    /// Closes the job channel and joins every worker. In-flight results are
    /// discarded. Idempotent.
    pub(crate) fn shutdown(&mut self) {
        if self.jobs.take().is_none() {
            return;
        }
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("cosmetic worker panicked during shutdown");
            }
        }
        // Anything the workers finished after the last drain is stale now.
        let discarded: usize = self.results.try_iter().count();
        debug!(discarded, "cosmetic worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    jobs: &Receiver<Vec<TickRequest>>,
    results: &Sender<Vec<ParticleInstruction>>,
) {
    while let Ok(batch) = jobs.recv() {
        let mut instructions = Vec::new();
        for request in &batch {
            match request.run() {
                Ok(emitted) => instructions.extend(emitted),
                Err(err) => {
                    warn!(cosmetic = request.cosmetic_id(), %err, "cosmetic tick failed");
                }
            }
        }
        if results.send(instructions).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{
        CosmeticDescriptor, CosmeticError, CosmeticRarity, EntityId, ParticleKind, Vec3, WorldId,
    };
    use std::time::{Duration, Instant};

    fn descriptor(id: &str) -> CosmeticDescriptor {
        CosmeticDescriptor::builder()
            .id(id)
            .display_name("Test")
            .description("test cosmetic")
            .icon("stick")
            .rarity(CosmeticRarity::Common)
            .build()
            .unwrap()
    }

    fn ctx(velocity: Vec3) -> EntityContext {
        EntityContext::new(
            EntityId::new(1),
            WorldId::new(1),
            Vec3::new(0.0, 64.0, 0.0),
            velocity,
            0.0,
            0.0,
            true,
            1_000,
        )
    }

    struct OneParticleTrail {
        descriptor: CosmeticDescriptor,
    }

    impl TrailEffect for OneParticleTrail {
        fn descriptor(&self) -> &CosmeticDescriptor {
            &self.descriptor
        }

        fn tick(&self, ctx: &EntityContext) -> Result<Vec<ParticleInstruction>, CosmeticError> {
            Ok(vec![ParticleInstruction::trail(
                ParticleKind::Flame,
                ctx,
                Vec3::ZERO,
            )])
        }
    }

    struct FailingTrail {
        descriptor: CosmeticDescriptor,
    }

    impl TrailEffect for FailingTrail {
        fn descriptor(&self) -> &CosmeticDescriptor {
            &self.descriptor
        }

        fn should_trigger(&self, _ctx: &EntityContext) -> bool {
            true
        }

        fn tick(&self, _ctx: &EntityContext) -> Result<Vec<ParticleInstruction>, CosmeticError> {
            Err(CosmeticError::TickFailed {
                id: self.descriptor.id().to_owned(),
                reason: "broken".to_owned(),
            })
        }
    }

    fn wait_for_batches(pool: &WorkerPool, expected: usize) -> Vec<Vec<ParticleInstruction>> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut batches = Vec::new();
        while batches.len() < expected && Instant::now() < deadline {
            batches.extend(pool.drain_completed());
            std::thread::sleep(Duration::from_millis(5));
        }
        batches
    }

    #[test]
    fn test_batch_produces_one_result() {
        let mut pool = WorkerPool::start(2);
        let trail: Arc<dyn TrailEffect> = Arc::new(OneParticleTrail {
            descriptor: descriptor("trail:test"),
        });
        pool.submit(vec![
            TickRequest::Trail {
                trail: trail.clone(),
                ctx: ctx(Vec3::new(0.3, 0.0, 0.0)),
            },
            TickRequest::Trail {
                trail,
                ctx: ctx(Vec3::new(0.3, 0.0, 0.0)),
            },
        ]);
        let batches = wait_for_batches(&pool, 1);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
        pool.shutdown();
    }

    #[test]
    fn test_trigger_predicate_gates_trails() {
        let mut pool = WorkerPool::start(1);
        let trail: Arc<dyn TrailEffect> = Arc::new(OneParticleTrail {
            descriptor: descriptor("trail:test"),
        });
        pool.submit(vec![TickRequest::Trail {
            trail,
            ctx: ctx(Vec3::ZERO),
        }]);
        let batches = wait_for_batches(&pool, 1);
        assert_eq!(batches.len(), 1);
        assert!(batches[0].is_empty());
        pool.shutdown();
    }

    #[test]
    fn test_failed_request_does_not_sink_batch() {
        let mut pool = WorkerPool::start(1);
        let failing: Arc<dyn TrailEffect> = Arc::new(FailingTrail {
            descriptor: descriptor("trail:broken"),
        });
        let working: Arc<dyn TrailEffect> = Arc::new(OneParticleTrail {
            descriptor: descriptor("trail:fine"),
        });
        pool.submit(vec![
            TickRequest::Trail {
                trail: failing,
                ctx: ctx(Vec3::new(0.3, 0.0, 0.0)),
            },
            TickRequest::Trail {
                trail: working,
                ctx: ctx(Vec3::new(0.3, 0.0, 0.0)),
            },
        ]);
        let batches = wait_for_batches(&pool, 1);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 1);
        pool.shutdown();
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut pool = WorkerPool::start(2);
        pool.shutdown();
        pool.shutdown();
        pool.submit(vec![]);
        assert!(pool.drain_completed().is_empty());
    }
}
