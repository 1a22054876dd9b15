//! # Core Error Types
//!
//! Every error here is fatal to the frame that raised it. The pool and the
//! arenas never retry and never drop work silently.

use thiserror::Error;

/// Errors raised by the arenas and the object pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Every pool slot is occupied by a valid object.
    #[error("object pool exhausted: all {capacity} slots are valid")]
    PoolExhausted {
        /// Pool capacity.
        capacity: usize,
    },

    /// The handle refers to a slot that was invalidated or reused.
    #[error("stale handle: slot {index} generation {generation}")]
    StaleHandle {
        /// Slot index carried by the handle.
        index: u32,
        /// Generation carried by the handle.
        generation: u32,
    },

    /// The arena hit its configured byte limit.
    #[error("arena `{arena}` exhausted: requested {requested} bytes, limit {limit}")]
    ArenaExhausted {
        /// Arena label.
        arena: &'static str,
        /// Size of the failed request.
        requested: usize,
        /// Configured byte limit.
        limit: usize,
    },

    /// An entity's capability list is full.
    #[error("capability list full: capacity {capacity}")]
    TagOverflow {
        /// Inline capacity of the list.
        capacity: usize,
    },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
