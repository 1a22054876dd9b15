//! # Entity Records
//!
//! The fixed-layout record stored in every pool slot, plus the pieces it is
//! made of:
//! - [`EntityHandle`]: slot index + generation counter
//! - [`EntityKind`]: the closed type discriminator
//! - [`Payload`]: type-specific state, one case per kind
//! - [`TagList`]: small append-only capability list

mod handle;
mod payload;
mod record;
mod tags;

pub use handle::EntityHandle;
pub use payload::{EnemyData, Payload, PlayerData, ProjectileData};
pub use record::{Entity, EntityKind};
pub use tags::{Capability, TagList, MAX_TAGS};
