//! # Arena Allocator
//!
//! A chunked bump allocator for memory that is released all at once.
//!
//! Growth appends a new chunk instead of reallocating, so every address the
//! arena ever handed out stays put until the next [`Arena::reset`].

// Raw chunk memory is the one place the workspace needs `unsafe`.
#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::ptr::NonNull;

use crate::error::{CoreError, CoreResult};

/// Default chunk size in bytes (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Alignment of every chunk base address.
const CHUNK_ALIGN: usize = 16;

/// Sizing knobs for an [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of each freshly reserved chunk. Oversized requests get a chunk of their own.
    pub chunk_size: usize,
    /// Upper bound on reserved bytes. `None` means grow until the system allocator gives up.
    pub limit: Option<usize>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            limit: None,
        }
    }
}

/// One heap block owned by the arena. Never moved, never resized.
struct Chunk {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl Chunk {
    fn new(capacity: usize) -> Option<Self> {
        let layout = Layout::from_size_align(capacity.max(1), CHUNK_ALIGN).ok()?;
        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let ptr = NonNull::new(raw).unwrap_or_else(|| alloc::handle_alloc_error(layout));
        Some(Self { ptr, layout })
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.layout.size()
    }

    /// Tries to carve `layout` out of this chunk starting at `offset`.
    ///
    /// Returns the aligned pointer and the new offset.
    fn bump(&self, offset: usize, layout: Layout) -> Option<(NonNull<u8>, usize)> {
        let start = self.ptr.as_ptr() as usize;
        let addr = start.checked_add(offset)?;
        let aligned = addr.checked_add(layout.align() - 1)? & !(layout.align() - 1);
        let end = aligned.checked_add(layout.size())?;
        if end > start + self.capacity() {
            return None;
        }
        // SAFETY: `aligned - start <= capacity`, so the pointer stays inside
        // (or one past the end of) this chunk's allocation.
        let ptr = unsafe { self.ptr.as_ptr().add(aligned - start) };
        Some((NonNull::new(ptr)?, end - start))
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        // SAFETY: allocated in `Chunk::new` with exactly this layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

/// A bump-pointer arena allocator.
///
/// Allocations borrow the arena immutably, [`reset`](Arena::reset) borrows it
/// mutably. The borrow checker therefore rejects any arena reference that is
/// still alive when the arena is reset:
///
/// ```compile_fail
/// use swarm_core::memory::Arena;
///
/// let mut arena = Arena::new("frame");
/// let value = arena.alloc(7_u32).unwrap();
/// arena.reset();
/// assert_eq!(*value, 7);
/// ```
///
/// Only `Copy` values are accepted: the arena never runs destructors.
///
/// # Thread Safety
///
/// This arena is NOT thread-safe. Use one arena per thread.
///
/// # Example
///
/// ```rust
/// use swarm_core::memory::Arena;
///
/// let mut arena = Arena::new("scratch");
/// let squares = arena.alloc_slice_fill_with(4, |i| i * i).unwrap();
/// assert_eq!(squares, &[0, 1, 4, 9]);
///
/// arena.reset();
/// assert_eq!(arena.used(), 0);
/// ```
pub struct Arena {
    /// Name used in logs and errors.
    label: &'static str,
    /// Reserved chunks, in reservation order.
    chunks: RefCell<Vec<Chunk>>,
    /// Index of the chunk currently being bumped.
    current: Cell<usize>,
    /// Bytes consumed in the current chunk.
    offset: Cell<usize>,
    /// Bytes handed out since the last reset (padding included).
    used: Cell<usize>,
    /// Highest `used` seen over the arena's lifetime.
    peak: Cell<usize>,
    /// Sum of all chunk capacities.
    reserved: Cell<usize>,
    config: ArenaConfig,
}

impl Arena {
    /// Creates an unbounded arena with the default chunk size.
    ///
    /// No memory is reserved until the first allocation.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self::with_config(label, ArenaConfig::default())
    }

    /// Creates an arena with explicit sizing.
    #[must_use]
    pub fn with_config(label: &'static str, config: ArenaConfig) -> Self {
        Self {
            label,
            chunks: RefCell::new(Vec::new()),
            current: Cell::new(0),
            offset: Cell::new(0),
            used: Cell::new(0),
            peak: Cell::new(0),
            reserved: Cell::new(0),
            config: ArenaConfig {
                chunk_size: config.chunk_size.max(CHUNK_ALIGN),
                ..config
            },
        }
    }

    /// Returns the arena's label.
    #[inline]
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Returns the bytes handed out since the last reset.
    #[inline]
    #[must_use]
    pub fn used(&self) -> usize {
        self.used.get()
    }

    /// Returns the highest usage ever observed.
    #[inline]
    #[must_use]
    pub fn peak(&self) -> usize {
        self.peak.get()
    }

    /// Returns the total bytes reserved from the system allocator.
    #[inline]
    #[must_use]
    pub fn reserved(&self) -> usize {
        self.reserved.get()
    }

    /// Returns the number of reserved chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.borrow().len()
    }

    /// Allocates a raw region matching `layout`.
    ///
    /// The region is uninitialized and stays valid until the next reset.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ArenaExhausted`] when satisfying the request would
    /// exceed the configured limit.
    pub fn alloc_layout(&self, layout: Layout) -> CoreResult<NonNull<u8>> {
        let mut index = self.current.get();
        let mut offset = self.offset.get();

        loop {
            let chunks = self.chunks.borrow();
            let Some(chunk) = chunks.get(index) else {
                drop(chunks);
                self.reserve_chunk(layout)?;
                continue;
            };

            if let Some((ptr, end)) = chunk.bump(offset, layout) {
                self.current.set(index);
                self.offset.set(end);
                let used = self.used.get() + (end - offset);
                self.used.set(used);
                self.peak.set(self.peak.get().max(used));
                return Ok(ptr);
            }

            // Chunks reserved before a reset are reused before growing.
            index += 1;
            offset = 0;
        }
    }

    /// Moves `value` into the arena.
    ///
    /// # Errors
    ///
    /// See [`Arena::alloc_layout`].
    #[allow(clippy::mut_from_ref)]
    pub fn alloc<T: Copy>(&self, value: T) -> CoreResult<&mut T> {
        let ptr = self.alloc_layout(Layout::new::<T>())?.cast::<T>();
        // SAFETY: the region is fresh, aligned for `T` and exclusively ours
        // until `reset`, which needs `&mut self`.
        unsafe {
            ptr.as_ptr().write(value);
            Ok(&mut *ptr.as_ptr())
        }
    }

    /// Allocates a slice of `len` elements, initializing slot `i` with `fill(i)`.
    ///
    /// # Errors
    ///
    /// See [`Arena::alloc_layout`].
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_fill_with<T: Copy>(
        &self,
        len: usize,
        mut fill: impl FnMut(usize) -> T,
    ) -> CoreResult<&mut [T]> {
        let layout = Layout::array::<T>(len).map_err(|_| self.exhausted(usize::MAX))?;
        let ptr = self.alloc_layout(layout)?.cast::<T>();
        // SAFETY: the region holds `len` properly aligned `T`s; every element is
        // written before the slice is formed.
        unsafe {
            for i in 0..len {
                ptr.as_ptr().add(i).write(fill(i));
            }
            Ok(std::slice::from_raw_parts_mut(ptr.as_ptr(), len))
        }
    }

    /// Copies `src` into the arena.
    ///
    /// # Errors
    ///
    /// See [`Arena::alloc_layout`].
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_copy<T: Copy>(&self, src: &[T]) -> CoreResult<&mut [T]> {
        self.alloc_slice_fill_with(src.len(), |i| src[i])
    }

    /// Copies a string into the arena.
    ///
    /// # Errors
    ///
    /// See [`Arena::alloc_layout`].
    pub fn alloc_str(&self, src: &str) -> CoreResult<&str> {
        let bytes = self.alloc_slice_copy(src.as_bytes())?;
        // SAFETY: the bytes were copied verbatim from a `&str`.
        Ok(unsafe { std::str::from_utf8_unchecked(bytes) })
    }

    /// Resets the arena, invalidating all previous allocations.
    ///
    /// This is **O(1)** - reserved chunks are kept for the next frame and no
    /// destructor runs. Stale bytes are not cleared.
    #[inline]
    pub fn reset(&mut self) {
        self.current.set(0);
        self.offset.set(0);
        self.used.set(0);
    }

    /// Runs `f` against the arena, then resets it.
    ///
    /// The result type cannot borrow from the arena, so nothing allocated
    /// inside `f` survives the call.
    pub fn scope<R>(&mut self, f: impl FnOnce(&Self) -> R) -> R {
        let out = f(self);
        self.reset();
        out
    }

    fn reserve_chunk(&self, layout: Layout) -> CoreResult<()> {
        let needed = layout
            .size()
            .checked_add(layout.align())
            .ok_or_else(|| self.exhausted(layout.size()))?;
        let mut capacity = needed.max(self.config.chunk_size);

        if let Some(limit) = self.config.limit {
            let remaining = limit.saturating_sub(self.reserved.get());
            if needed > remaining {
                return Err(self.exhausted(layout.size()));
            }
            capacity = capacity.min(remaining);
        }

        let chunk = Chunk::new(capacity).ok_or_else(|| self.exhausted(layout.size()))?;
        self.reserved.set(self.reserved.get() + chunk.capacity());

        let mut chunks = self.chunks.borrow_mut();
        chunks.push(chunk);
        tracing::debug!(
            arena = self.label,
            capacity,
            chunks = chunks.len(),
            reserved = self.reserved.get(),
            "arena reserved a new chunk"
        );
        Ok(())
    }

    fn exhausted(&self, requested: usize) -> CoreError {
        CoreError::ArenaExhausted {
            arena: self.label,
            requested,
            limit: self.config.limit.unwrap_or(usize::MAX),
        }
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("label", &self.label)
            .field("used", &self.used())
            .field("reserved", &self.reserved())
            .field("chunks", &self.chunk_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(limit: Option<usize>) -> Arena {
        Arena::with_config(
            "test",
            ArenaConfig {
                chunk_size: 64,
                limit,
            },
        )
    }

    #[test]
    fn test_arena_allocation() {
        let arena = Arena::new("test");
        let slice = arena.alloc_slice_fill_with(10, |i| i as f32).unwrap();
        assert_eq!(slice.len(), 10);
        assert_eq!(slice[9], 9.0);
        assert!(arena.used() >= 40);
    }

    #[test]
    fn test_alignment_is_respected() {
        let arena = small(None);
        let _byte = arena.alloc(1_u8).unwrap();
        let wide: &u64 = arena.alloc(7_u64).unwrap();
        assert_eq!(wide as *const u64 as usize % std::mem::align_of::<u64>(), 0);

        let _byte = arena.alloc(2_u8).unwrap();
        let wider: &u128 = arena.alloc(9_u128).unwrap();
        assert_eq!(wider as *const u128 as usize % std::mem::align_of::<u128>(), 0);
    }

    #[test]
    fn test_allocations_do_not_overlap() {
        let arena = small(None);
        let a = arena.alloc_slice_fill_with(8, |_| 0xAA_u8).unwrap();
        let b = arena.alloc_slice_fill_with(8, |_| 0xBB_u8).unwrap();
        b.fill(0xCC);
        assert!(a.iter().all(|&v| v == 0xAA));
        assert!(b.iter().all(|&v| v == 0xCC));
    }

    #[test]
    fn test_growth_keeps_earlier_addresses() {
        let arena = small(None);
        let first: &u32 = arena.alloc(1234_u32).unwrap();
        let first_addr = first as *const u32 as usize;

        // Force several new chunks.
        for i in 0..32_u32 {
            let _ = arena.alloc_slice_fill_with(16, |_| i).unwrap();
        }
        assert!(arena.chunk_count() > 1);

        assert_eq!(first as *const u32 as usize, first_addr);
        assert_eq!(*first, 1234);
    }

    #[test]
    fn test_oversized_request_gets_own_chunk() {
        let arena = small(None);
        let big = arena.alloc_slice_fill_with(1000, |i| i as u16).unwrap();
        assert_eq!(big.len(), 1000);
        assert_eq!(big[999], 999);
    }

    #[test]
    fn test_limit_fails_deterministically() {
        let arena = small(Some(128));
        let _ = arena.alloc_slice_fill_with(40, |_| 0_u8).unwrap();

        let err = arena.alloc_slice_fill_with(512, |_| 0_u8).unwrap_err();
        assert_eq!(
            err,
            CoreError::ArenaExhausted {
                arena: "test",
                requested: 512,
                limit: 128,
            }
        );
        // The failed request left earlier state untouched.
        assert!(arena.used() >= 40);
    }

    #[test]
    fn test_arena_reset() {
        let mut arena = small(None);
        let _ = arena.alloc_slice_fill_with(200, |_| 0_u8).unwrap();
        let chunks = arena.chunk_count();
        assert!(arena.used() > 0);

        arena.reset();
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.chunk_count(), chunks);

        // Reuses the reserved chunks instead of growing.
        let _ = arena.alloc_slice_fill_with(200, |_| 0_u8).unwrap();
        assert_eq!(arena.chunk_count(), chunks);
        assert!(arena.peak() >= 200);
    }

    #[test]
    fn test_scope_resets_afterwards() {
        let mut arena = small(None);
        let total: u32 = arena.scope(|frame| {
            let values = frame.alloc_slice_copy(&[1_u32, 2, 3]).unwrap();
            values.iter().sum()
        });
        assert_eq!(total, 6);
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn test_alloc_str() {
        let arena = Arena::new("test");
        let s = arena.alloc_str("00:01:05").unwrap();
        assert_eq!(s, "00:01:05");
        let empty = arena.alloc_str("").unwrap();
        assert!(empty.is_empty());
    }
}
