//! # Cosmetic Runtime Coordinator
//!
//! Owns every piece of per-entity cosmetic state and the two helper threads
//! (geometry workers, loadout loader). The embedder drives it from the
//! authority thread: lifecycle events in, one [`CosmeticRuntime::heartbeat`]
//! call per tick, [`CosmeticRuntime::shutdown`] on the way out.
//!
//! ## Threading contract
//!
//! - All state mutation happens inside the methods of this type, on the
//!   caller's (authority) thread.
//! - Workers only ever see immutable [`EntityContext`] snapshots and return
//!   immutable instruction lists.
//! - Loadout fetches run on the loader thread; a generation counter makes
//!   the most recent reload win when fetches interleave.
//!
//! ## Heartbeat order
//!
//! 1. Drain loader results, applying loadouts whose generation still matches.
//! 2. Drain and flush geometry batches completed since last heartbeat.
//! 3. Snapshot every tracked entity, drive suit and cloak state machines,
//!    and collect tick requests.
//! 4. Submit the collected requests as one batch.
//!
//! Geometry therefore renders one heartbeat after it was requested; for
//! particle effects at 20 Hz the lag is invisible and it keeps the authority
//! thread from ever waiting on a worker.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use prism_core::{
    keys, Cosmetic, CosmeticError, CosmeticLoadout, CosmeticRegistry, CosmeticSlot, EntityContext,
    EntityId, LoadoutStore, ParticleInstruction, SuitSlot, Vec3,
};

use crate::config::RuntimeConfig;
use crate::host::{EntitySnapshot, Host, LifecycleEvent};
use crate::loader::LoadoutLoader;
use crate::pool::{TickRequest, WorkerPool};
use crate::state::ActiveState;

/// The cosmetic animation runtime. One instance per host process.
pub struct CosmeticRuntime {
    registry: Arc<CosmeticRegistry>,
    store: Arc<dyn LoadoutStore>,
    config: RuntimeConfig,
    pool: Option<WorkerPool>,
    loader: Option<LoadoutLoader>,
    active: HashMap<EntityId, ActiveState>,
    pending: HashMap<EntityId, u64>,
    next_generation: u64,
    running: bool,
}

impl CosmeticRuntime {
    /// Creates a stopped runtime. Call [`CosmeticRuntime::start`] before
    /// driving it.
    #[must_use]
    pub fn new(
        registry: Arc<CosmeticRegistry>,
        store: Arc<dyn LoadoutStore>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            registry,
            store,
            config,
            pool: None,
            loader: None,
            active: HashMap::new(),
            pending: HashMap::new(),
            next_generation: 0,
            running: false,
        }
    }

    /// Spawns the worker pool and loader thread. Idempotent.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        let threads = self.config.effective_worker_threads();
        self.pool = Some(WorkerPool::start(threads));
        self.loader = Some(LoadoutLoader::start(Arc::clone(&self.store)));
        self.running = true;
        info!(
            workers = threads,
            registered = self.registry.len(),
            "cosmetic runtime started"
        );
    }

    /// Whether [`CosmeticRuntime::start`] has run and
    /// [`CosmeticRuntime::shutdown`] has not.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// The registry backing this runtime, for menu display.
    #[must_use]
    pub fn registry(&self) -> &CosmeticRegistry {
        &self.registry
    }

    /// Number of entities currently holding active cosmetic state.
    #[must_use]
    pub fn tracked_entities(&self) -> usize {
        self.active.len()
    }

    /// Whether an entity currently holds active cosmetic state.
    #[must_use]
    pub fn is_tracked(&self, entity: EntityId) -> bool {
        self.active.contains_key(&entity)
    }

    /// Queues a loadout fetch for an entity. The result is applied during a
    /// later heartbeat; a newer reload for the same entity supersedes this
    /// one. Safe to call at any time, including for untracked entities.
    pub fn reload(&mut self, entity: EntityId) {
        if !self.running {
            return;
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        self.pending.insert(entity, generation);
        if let Some(loader) = &self.loader {
            loader.request(entity, generation);
        }
        debug!(%entity, generation, "loadout reload queued");
    }

    /// Routes one lifecycle notification.
    pub fn handle_event(&mut self, host: &mut dyn Host, event: LifecycleEvent) {
        if !self.running {
            return;
        }
        match event {
            LifecycleEvent::Joined(entity) => self.reload(entity),
            LifecycleEvent::Respawned(entity)
            | LifecycleEvent::ChangedWorld(entity)
            | LifecycleEvent::Teleported(entity) => self.refresh(host, entity),
            LifecycleEvent::Quit(entity) => {
                self.pending.remove(&entity);
                if let Some(mut state) = self.active.remove(&entity) {
                    Self::teardown_state(host, &mut state);
                }
            }
            LifecycleEvent::Clicked { owner, clicker } => {
                self.handle_click(host, owner, clicker);
            }
        }
    }

    /// One authority-thread tick. See the module docs for the phase order.
    pub fn heartbeat(&mut self, host: &mut dyn Host) {
        if !self.running {
            return;
        }

        for result in self
            .loader
            .as_ref()
            .map(LoadoutLoader::drain_completed)
            .unwrap_or_default()
        {
            match self.pending.get(&result.entity) {
                Some(&generation) if generation == result.generation => {}
                // Superseded by a newer reload, or the entity quit.
                _ => continue,
            }
            self.pending.remove(&result.entity);
            match result.outcome {
                Ok(loadout) => {
                    if host.snapshot(result.entity).is_some() {
                        self.apply_loadout(host, result.entity, &loadout);
                    } else {
                        debug!(entity = %result.entity, "entity left before loadout arrived");
                    }
                }
                Err(err) => {
                    warn!(entity = %result.entity, %err, "loadout fetch failed");
                }
            }
        }

        if let Some(pool) = &self.pool {
            for batch in pool.drain_completed() {
                Self::flush(host, &batch);
            }
        }

        let epsilon = self.config.movement_epsilon;
        let dwell = self.config.idle_dwell();
        let now = Instant::now();
        let now_millis = epoch_millis();

        let mut requests = Vec::new();
        for state in self.active.values_mut() {
            let Some(snapshot) = host.snapshot(state.entity) else {
                continue;
            };
            let ctx = Self::context_from(state.entity, &snapshot, state.last_position, now_millis);
            state.last_position = Some(snapshot.position);

            Self::drive_suit_sets(state, &ctx);

            if let Some(trail) = &state.trail {
                requests.push(TickRequest::Trail {
                    trail: Arc::clone(trail),
                    ctx,
                });
            }
            Self::drive_cloak(state, &snapshot, &ctx, now, epsilon, dwell, &mut requests);
        }

        if let Some(pool) = &self.pool {
            pool.submit(requests);
        }
    }

    /// Tears down every entity, stops both helper threads and drops any
    /// in-flight results unflushed. Idempotent.
    pub fn shutdown(&mut self, host: &mut dyn Host) {
        if !self.running {
            return;
        }
        self.running = false;
        self.pending.clear();

        let entities: Vec<EntityId> = self.active.keys().copied().collect();
        for entity in entities {
            if let Some(mut state) = self.active.remove(&entity) {
                Self::teardown_state(host, &mut state);
            }
        }

        if let Some(mut loader) = self.loader.take() {
            loader.shutdown();
        }
        if let Some(mut pool) = self.pool.take() {
            pool.shutdown();
        }
        info!("cosmetic runtime stopped");
    }

    /// Replaces an entity's cosmetic state with a freshly resolved loadout.
    /// The previous state is fully torn down first, so armor originals are
    /// recorded against the real slot contents, not our own overrides.
    fn apply_loadout(&mut self, host: &mut dyn Host, entity: EntityId, loadout: &CosmeticLoadout) {
        if let Some(mut previous) = self.active.remove(&entity) {
            Self::teardown_state(host, &mut previous);
        }

        let mut state = ActiveState::new(entity);
        state.trail = self
            .resolve(loadout, CosmeticSlot::Trail)
            .and_then(Cosmetic::into_trail);
        state.cloak = self
            .resolve(loadout, CosmeticSlot::Cloak)
            .and_then(Cosmetic::into_cloak);
        state.click = self
            .resolve(loadout, CosmeticSlot::Click)
            .and_then(Cosmetic::into_click);

        for slot in SuitSlot::ALL {
            let Some(key) = loadout.equipped(slot.cosmetic_slot()) else {
                continue;
            };
            if !loadout.is_unlocked(key) {
                debug!(%entity, key, "equipped suit piece no longer unlocked");
                continue;
            }
            let Some(set_id) = keys::set_id_from_piece_key(key) else {
                warn!(%entity, key, "malformed suit piece key");
                continue;
            };
            if !state.suit_sets.contains_key(&set_id) {
                let Some(suit) = self
                    .registry
                    .instantiate(&set_id)
                    .and_then(Cosmetic::into_suit)
                else {
                    warn!(%entity, set_id, "equipped suit set not registered");
                    continue;
                };
                log_hook_error(suit.descriptor().id(), suit.prepare_assets());
                state.suit_sets.insert(set_id, suit);
            }
            state.suit_pieces.insert(slot, keys::normalize_id(key));
        }

        Self::apply_suit_pieces(host, &mut state);

        if state.is_empty() {
            debug!(%entity, "loadout applied, no cosmetics installed");
            return;
        }
        info!(
            %entity,
            suit_pieces = state.suit_pieces.len(),
            trail = state.trail.is_some(),
            cloak = state.cloak.is_some(),
            click = state.click.is_some(),
            "cosmetics applied"
        );
        self.active.insert(entity, state);
    }

    /// Resolves a singleton slot to a fresh instance, enforcing
    /// `equipped` implies `unlocked` against the fetched loadout.
    fn resolve(&self, loadout: &CosmeticLoadout, slot: CosmeticSlot) -> Option<Cosmetic> {
        let key = loadout.equipped(slot)?;
        if !loadout.is_unlocked(key) {
            debug!(key, "equipped cosmetic no longer unlocked");
            return None;
        }
        let cosmetic = self.registry.instantiate_from_flat_key(key);
        if cosmetic.is_none() {
            warn!(key, "equipped cosmetic not registered");
        }
        cosmetic
    }

    /// Writes every equipped suit piece into its armor slot, recording the
    /// slot's original content the first time it is overridden. An empty
    /// original is recorded as an empty original, so restore empties the
    /// slot again.
    fn apply_suit_pieces(host: &mut dyn Host, state: &mut ActiveState) {
        let entity = state.entity;
        for slot in SuitSlot::ALL {
            let Some(key) = state.suit_pieces.get(&slot) else {
                continue;
            };
            let Some(set_id) = keys::set_id_from_piece_key(key) else {
                continue;
            };
            let Some(suit) = state.suit_sets.get(&set_id) else {
                continue;
            };
            let Some(piece) = suit.piece(slot) else {
                continue;
            };
            state
                .original_armor
                .entry(slot)
                .or_insert_with(|| host.armor(entity, slot));
            host.set_armor(entity, slot, Some(piece));
        }
    }

    /// Detects full-set transitions and fires the matching hooks. The
    /// marker flips before the hook runs, so a hook that fails still counts
    /// as fired and cannot fire twice.
    fn drive_suit_sets(state: &mut ActiveState, ctx: &EntityContext) {
        if state.suit_pieces.is_empty() {
            return;
        }
        let mut counts: HashMap<String, usize> = HashMap::new();
        for key in state.suit_pieces.values() {
            if let Some(set_id) = keys::set_id_from_piece_key(key) {
                *counts.entry(set_id).or_insert(0) += 1;
            }
        }
        let full: HashSet<String> = counts
            .into_iter()
            .filter(|(_, count)| *count == SuitSlot::ALL.len())
            .map(|(set_id, _)| set_id)
            .collect();

        for set_id in &full {
            if state.active_full_sets.insert(set_id.clone()) {
                if let Some(suit) = state.suit_sets.get(set_id) {
                    log_hook_error(suit.descriptor().id(), suit.on_full_set_start(ctx));
                }
            }
        }
        let ended: Vec<String> = state
            .active_full_sets
            .iter()
            .filter(|set_id| !full.contains(*set_id))
            .cloned()
            .collect();
        for set_id in ended {
            state.active_full_sets.remove(&set_id);
            if let Some(suit) = state.suit_sets.get(&set_id) {
                log_hook_error(suit.descriptor().id(), suit.on_full_set_end(ctx));
            }
        }
    }

    /// Drives the cloak idle machine for one entity. Gliding and airborne
    /// entities count as moving even when their displacement is tiny.
    #[allow(clippy::too_many_arguments)]
    fn drive_cloak(
        state: &mut ActiveState,
        snapshot: &EntitySnapshot,
        ctx: &EntityContext,
        now: Instant,
        epsilon: f64,
        dwell: Duration,
        requests: &mut Vec<TickRequest>,
    ) {
        let Some(cloak) = state.cloak.clone() else {
            return;
        };
        let airborne = !snapshot.on_ground && !snapshot.flying;
        let moving =
            ctx.velocity().length_squared() > epsilon || snapshot.gliding || airborne;
        if moving {
            state.last_movement_at = now;
            if state.cloak_active {
                state.cloak_active = false;
                log_hook_error(cloak.descriptor().id(), cloak.on_cancel(ctx));
            }
            return;
        }
        if !state.cloak_active {
            if now.duration_since(state.last_movement_at) < dwell {
                return;
            }
            state.cloak_active = true;
            log_hook_error(cloak.descriptor().id(), cloak.on_idle_start(ctx));
        }
        requests.push(TickRequest::Cloak { cloak, ctx: *ctx });
    }

    /// Re-applies suit pieces after the host disturbed armor slots, and
    /// forgets the previous position so the displacement does not register
    /// as movement.
    fn refresh(&mut self, host: &mut dyn Host, entity: EntityId) {
        if let Some(state) = self.active.get_mut(&entity) {
            if host.snapshot(entity).is_some() {
                Self::apply_suit_pieces(host, state);
            }
            state.last_position = None;
        }
    }

    /// Runs an owner's click reaction synchronously and flushes the result.
    /// Self-clicks are ignored.
    fn handle_click(&mut self, host: &mut dyn Host, owner: EntityId, clicker: EntityId) {
        if owner == clicker {
            return;
        }
        let Some(state) = self.active.get(&owner) else {
            return;
        };
        let Some(click) = &state.click else {
            return;
        };
        let Some(snapshot) = host.snapshot(owner) else {
            return;
        };
        let ctx = Self::context_from(owner, &snapshot, state.last_position, epoch_millis());
        match click.on_click(&ctx, clicker) {
            Ok(instructions) => Self::flush(host, &instructions),
            Err(err) => warn!(%owner, %err, "click effect failed"),
        }
    }

    /// Restores armor and fires end hooks for a state being discarded.
    /// Entities the host can no longer see are skipped entirely.
    fn teardown_state(host: &mut dyn Host, state: &mut ActiveState) {
        if host.snapshot(state.entity).is_none() {
            return;
        }
        for slot in SuitSlot::ALL {
            if let Some(original) = state.original_armor.remove(&slot) {
                host.set_armor(state.entity, slot, original);
            }
        }

        let Some(snapshot) = host.snapshot(state.entity) else {
            return;
        };
        let ctx =
            Self::context_from(state.entity, &snapshot, state.last_position, epoch_millis());
        if state.cloak_active {
            state.cloak_active = false;
            if let Some(cloak) = &state.cloak {
                log_hook_error(cloak.descriptor().id(), cloak.on_cancel(&ctx));
            }
        }
        for set_id in std::mem::take(&mut state.active_full_sets) {
            if let Some(suit) = state.suit_sets.get(&set_id) {
                log_hook_error(suit.descriptor().id(), suit.on_full_set_end(&ctx));
            }
        }
    }

    /// Emits a batch, dropping instructions aimed at unloaded worlds.
    fn flush(host: &mut dyn Host, instructions: &[ParticleInstruction]) {
        for instruction in instructions {
            if host.world_exists(instruction.world()) {
                host.emit(instruction);
            }
        }
    }

    /// Builds the immutable per-tick context, deriving velocity from the
    /// previous observed position.
    fn context_from(
        entity: EntityId,
        snapshot: &EntitySnapshot,
        last_position: Option<Vec3>,
        epoch_millis: u64,
    ) -> EntityContext {
        let velocity = last_position.map_or(Vec3::ZERO, |previous| {
            snapshot.position.sub(previous)
        });
        EntityContext::new(
            entity,
            snapshot.world,
            snapshot.position,
            velocity,
            snapshot.yaw,
            snapshot.pitch,
            snapshot.on_ground,
            epoch_millis,
        )
    }
}

fn log_hook_error(id: &str, result: Result<(), CosmeticError>) {
    if let Err(err) = result {
        warn!(cosmetic = id, %err, "cosmetic hook failed");
    }
}

#[allow(clippy::cast_possible_truncation)]
fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::WorldId;

    fn snapshot(position: Vec3) -> EntitySnapshot {
        EntitySnapshot {
            world: WorldId::new(1),
            position,
            yaw: 0.0,
            pitch: 0.0,
            on_ground: true,
            flying: false,
            gliding: false,
        }
    }

    #[test]
    fn test_velocity_derived_from_previous_position() {
        let entity = EntityId::new(1);
        let current = snapshot(Vec3::new(1.0, 64.0, 2.0));
        let ctx = CosmeticRuntime::context_from(
            entity,
            &current,
            Some(Vec3::new(0.5, 64.0, 2.0)),
            1_000,
        );
        assert_eq!(ctx.velocity(), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_first_observation_has_zero_velocity() {
        let ctx = CosmeticRuntime::context_from(
            EntityId::new(1),
            &snapshot(Vec3::new(9.0, 64.0, 9.0)),
            None,
            1_000,
        );
        assert_eq!(ctx.velocity(), Vec3::ZERO);
    }
}
