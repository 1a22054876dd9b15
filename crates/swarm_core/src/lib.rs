//! # SWARM Core
//!
//! The memory layer underneath the frame loop:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Persistent Arena (process lifetime)                          │
//! │   └─ ObjectPool slots  [Entity; N] + generations [u32; N]     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Transient Arena (reset once per frame)                       │
//! │   └─ query snapshots, scratch lists                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. **No per-object free** - arenas only bump and reset
//! 2. **Addresses never move** - arenas grow by appending chunks
//! 3. **Handles are generation checked** - a reused slot never aliases an old handle

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod entity;
pub mod error;
pub mod memory;

pub use entity::{
    Capability, EnemyData, Entity, EntityHandle, EntityKind, Payload, PlayerData,
    ProjectileData, TagList, MAX_TAGS,
};
pub use error::{CoreError, CoreResult};
pub use memory::{Arena, ArenaConfig, ObjectPool};
