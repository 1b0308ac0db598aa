//! # PRISM Runtime
//!
//! The cosmetic animation coordinator. Wires the host platform, the loadout
//! store and the cosmetic registry into a heartbeat-driven runtime:
//!
//! - `CosmeticRuntime`: authority-thread coordinator owning all entity state
//! - `Host`: the seam the embedder implements for its platform
//! - Geometry worker pool and loadout loader thread (internal)
//! - `HeartbeatPacer`: fixed-timestep driver for the embedder's loop
//! - `RuntimeConfig`: TOML-backed tunables
//!
//! ## Architecture Rules
//!
//! 1. **One writer** - entity state is mutated on the authority thread only;
//!    helper threads communicate exclusively through channels
//! 2. **Snapshots out, instructions in** - workers never see live host state
//! 3. **Cosmetics never abort the runtime** - tick and hook failures are
//!    logged per cosmetic and skipped

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod host;
pub mod pacer;
pub mod runtime;

mod loader;
mod pool;
mod state;

pub use config::{ConfigError, RuntimeConfig};
pub use host::{EntitySnapshot, Host, LifecycleEvent};
pub use pacer::HeartbeatPacer;
pub use runtime::CosmeticRuntime;
