//! # Memory Management
//!
//! Bump arenas and the object pool built on top of them.
//!
//! ## Design Philosophy
//!
//! Memory is reserved in chunks and reused forever. During a warm frame:
//! - No heap allocations
//! - No destructors
//! - O(1) bulk reset at the end of the tick

mod arena;
mod pool;

pub use arena::{Arena, ArenaConfig, DEFAULT_CHUNK_SIZE};
pub use pool::ObjectPool;
