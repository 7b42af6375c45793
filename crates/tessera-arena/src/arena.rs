//! Bump allocation over a pre-reserved block.
//!
//! An [`Arena`] hands out [`Span`]s instead of pointers; all byte access goes
//! through the owning arena, so spans stay valid for the arena's lifetime and
//! nothing can outlive or alias the backing storage unsafely. The only
//! release mechanisms are a whole-arena [`Arena::reset`] or a single-level
//! [`Arena::unfreeze`]; there is no per-object free.
//!
//! Arenas are sized generously upfront and never grow. Exhaustion is an
//! error, not a reallocation.

use thiserror::Error;

/// Errors from arena operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// Allocation would exceed the arena's fixed capacity.
    #[error("arena exhausted: requested {requested} bytes, {remaining} remaining")]
    Exhausted {
        /// Bytes requested by the failing allocation
        requested: usize,
        /// Bytes still unallocated
        remaining: usize,
    },

    /// A freeze checkpoint is already active.
    #[error("arena already has an active freeze checkpoint")]
    FrozenActive,

    /// No freeze checkpoint to restore.
    #[error("arena has no active freeze checkpoint")]
    NotFrozen,

    /// Resize requested but nothing has been allocated since the last
    /// reset/unfreeze.
    #[error("no previous allocation to resize")]
    NoPreviousAlloc,

    /// Typed allocation with an alignment the arena cannot satisfy.
    #[error("unsupported alignment {0} (max {MAX_ALIGN})")]
    UnsupportedAlignment(usize),
}

/// Result type for arena operations.
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Maximum element alignment supported by typed allocations.
pub const MAX_ALIGN: usize = 8;

/// A region handed out by an arena: an offset/length pair into the arena's
/// backing storage. Cheap to copy, useless without the owning arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    offset: usize,
    len: usize,
}

impl Span {
    /// Byte offset from the arena base.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the span covers zero bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    const fn range(self) -> core::ops::Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Saved cursor state for freeze/unfreeze.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    used: usize,
    prev_used: Option<usize>,
}

/// Bump cursor shared by root and nested arenas.
///
/// Tracks a monotonic `used` counter, the single remembered mark for
/// resize-previous, and at most one freeze checkpoint.
#[derive(Debug)]
struct BumpState {
    capacity: usize,
    used: usize,
    prev_used: Option<usize>,
    frozen: Option<Checkpoint>,
}

impl BumpState {
    const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            used: 0,
            prev_used: None,
            frozen: None,
        }
    }

    /// Advances the cursor by `size` bytes after `padding` bytes of padding.
    /// Returns the offset of the allocation (relative to this bump region).
    fn alloc(&mut self, size: usize, padding: usize) -> ArenaResult<usize> {
        let total = padding + size;
        let remaining = self.capacity - self.used;
        if total > remaining {
            return Err(ArenaError::Exhausted {
                requested: total,
                remaining,
            });
        }
        let offset = self.used + padding;
        self.prev_used = Some(offset);
        self.used = offset + size;
        Ok(offset)
    }

    /// Grows or shrinks the most recent allocation in place.
    fn resize_last(&mut self, size: usize) -> ArenaResult<usize> {
        let prev = self.prev_used.ok_or(ArenaError::NoPreviousAlloc)?;
        let remaining = self.capacity - prev;
        if size > remaining {
            return Err(ArenaError::Exhausted {
                requested: size,
                remaining,
            });
        }
        self.used = prev + size;
        Ok(prev)
    }

    fn freeze(&mut self) -> ArenaResult<()> {
        if self.frozen.is_some() {
            return Err(ArenaError::FrozenActive);
        }
        self.frozen = Some(Checkpoint {
            used: self.used,
            prev_used: self.prev_used,
        });
        Ok(())
    }

    fn unfreeze(&mut self) -> ArenaResult<()> {
        let mark = self.frozen.take().ok_or(ArenaError::NotFrozen)?;
        self.used = mark.used;
        self.prev_used = mark.prev_used;
        Ok(())
    }

    fn reset(&mut self) {
        self.used = 0;
        self.prev_used = None;
        self.frozen = None;
    }
}

/// Padding needed so `base + used` becomes a multiple of `align`.
fn align_padding(absolute: usize, align: usize) -> ArenaResult<usize> {
    if !align.is_power_of_two() || align > MAX_ALIGN {
        return Err(ArenaError::UnsupportedAlignment(align));
    }
    Ok(absolute.wrapping_neg() & (align - 1))
}

/// A bump allocator over a fixed pre-reserved block.
#[derive(Debug)]
pub struct Arena {
    /// Backing storage, kept as u64 words so the base is 8-aligned.
    words: Box<[u64]>,
    state: BumpState,
}

impl Arena {
    /// Creates an arena with a fixed capacity in bytes.
    ///
    /// Capacity is rounded up to a multiple of 8; the reported capacity is
    /// the requested one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let words = capacity.div_ceil(8);
        Self {
            words: vec![0u64; words].into_boxed_slice(),
            state: BumpState::new(capacity),
        }
    }

    /// Total capacity in bytes.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.state.capacity
    }

    /// Bytes allocated so far.
    #[must_use]
    pub const fn used(&self) -> usize {
        self.state.used
    }

    /// Bytes still available.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.state.capacity - self.state.used
    }

    /// Allocates `size` bytes.
    pub fn alloc(&mut self, size: usize) -> ArenaResult<Span> {
        let offset = self.state.alloc(size, 0)?;
        Ok(Span { offset, len: size })
    }

    /// Allocates `size` bytes and zero-fills them.
    pub fn alloc_zeroed(&mut self, size: usize) -> ArenaResult<Span> {
        let span = self.alloc(size)?;
        self.bytes_mut(span).fill(0);
        Ok(span)
    }

    /// Allocates a typed array of `count` elements, aligned for `T`.
    ///
    /// Alignment padding (if any) is charged to the arena but not included
    /// in the returned span.
    pub fn alloc_array<T: bytemuck::Pod>(&mut self, count: usize) -> ArenaResult<Span> {
        let padding = align_padding(self.state.used, core::mem::align_of::<T>())?;
        let size = count * core::mem::size_of::<T>();
        let offset = self.state.alloc(size, padding)?;
        Ok(Span { offset, len: size })
    }

    /// Grows or shrinks only the most recent allocation in place.
    ///
    /// Valid for exactly one allocation back; the returned span supersedes
    /// the one returned by the resized allocation.
    pub fn resize_last(&mut self, size: usize) -> ArenaResult<Span> {
        let offset = self.state.resize_last(size)?;
        Ok(Span { offset, len: size })
    }

    /// Carves `size` bytes and hands them back as an independent sub-arena.
    ///
    /// The sub-arena's base offset equals this arena's `used` at the time of
    /// the call; its spans resolve against this arena's storage and never
    /// reach outside the carved block.
    pub fn nested(&mut self, size: usize) -> ArenaResult<SubArena> {
        let span = self.alloc(size)?;
        Ok(SubArena {
            base: span.offset,
            state: BumpState::new(size),
        })
    }

    /// Snapshots the cursor. Exactly one snapshot may be active.
    pub fn freeze(&mut self) -> ArenaResult<()> {
        self.state.freeze()
    }

    /// Restores the cursor to the active snapshot and clears it.
    pub fn unfreeze(&mut self) -> ArenaResult<()> {
        self.state.unfreeze()
    }

    /// Returns the arena to empty, clearing marks and any snapshot.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Read access to a span's bytes.
    #[must_use]
    pub fn bytes(&self, span: Span) -> &[u8] {
        &bytemuck::cast_slice(&self.words)[span.range()]
    }

    /// Write access to a span's bytes.
    pub fn bytes_mut(&mut self, span: Span) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut(&mut self.words)[span.range()]
    }

    /// Typed read access to a span produced by [`Arena::alloc_array`].
    #[must_use]
    pub fn slice<T: bytemuck::Pod>(&self, span: Span) -> &[T] {
        bytemuck::cast_slice(self.bytes(span))
    }

    /// Typed write access to a span produced by [`Arena::alloc_array`].
    pub fn slice_mut<T: bytemuck::Pod>(&mut self, span: Span) -> &mut [T] {
        bytemuck::cast_slice_mut(self.bytes_mut(span))
    }
}

/// An independent bump cursor over a block carved from a parent [`Arena`].
///
/// Spans allocated here resolve against the root arena's storage (pass them
/// to the root's accessors, including for zero-filling); the sub-arena
/// guarantees they stay inside the carved block.
#[derive(Debug)]
pub struct SubArena {
    base: usize,
    state: BumpState,
}

impl SubArena {
    /// Byte offset of this sub-arena's base within the parent arena.
    #[must_use]
    pub const fn base_offset(&self) -> usize {
        self.base
    }

    /// Total capacity in bytes.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.state.capacity
    }

    /// Bytes allocated so far.
    #[must_use]
    pub const fn used(&self) -> usize {
        self.state.used
    }

    /// Allocates `size` bytes from the carved block.
    pub fn alloc(&mut self, size: usize) -> ArenaResult<Span> {
        let offset = self.state.alloc(size, 0)?;
        Ok(Span {
            offset: self.base + offset,
            len: size,
        })
    }

    /// Allocates a typed array of `count` elements, aligned for `T` within
    /// the parent's storage.
    pub fn alloc_array<T: bytemuck::Pod>(&mut self, count: usize) -> ArenaResult<Span> {
        let padding = align_padding(self.base + self.state.used, core::mem::align_of::<T>())?;
        let size = count * core::mem::size_of::<T>();
        let offset = self.state.alloc(size, padding)?;
        Ok(Span {
            offset: self.base + offset,
            len: size,
        })
    }

    /// Grows or shrinks only the most recent allocation in place.
    pub fn resize_last(&mut self, size: usize) -> ArenaResult<Span> {
        let offset = self.state.resize_last(size)?;
        Ok(Span {
            offset: self.base + offset,
            len: size,
        })
    }

    /// Carves a further sub-arena out of this one. Its spans still resolve
    /// against the root arena's storage.
    pub fn nested(&mut self, size: usize) -> ArenaResult<SubArena> {
        let span = self.alloc(size)?;
        Ok(SubArena {
            base: span.offset(),
            state: BumpState::new(size),
        })
    }

    /// Snapshots the cursor. Exactly one snapshot may be active.
    pub fn freeze(&mut self) -> ArenaResult<()> {
        self.state.freeze()
    }

    /// Restores the cursor to the active snapshot and clears it.
    pub fn unfreeze(&mut self) -> ArenaResult<()> {
        self.state.unfreeze()
    }

    /// Returns the sub-arena to empty.
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn used_is_sum_of_requested_sizes() {
        let mut arena = Arena::with_capacity(1024);
        for size in [1usize, 7, 64, 100, 3] {
            arena.alloc(size).expect("within capacity");
        }
        assert_eq!(arena.used(), 1 + 7 + 64 + 100 + 3);
    }

    #[test]
    fn exhaustion_after_capacity() {
        // 1024-byte arena: 600 fits, the second 600 does not.
        let mut arena = Arena::with_capacity(1024);
        arena.alloc(600).expect("first alloc fits");
        let err = arena.alloc(600).expect_err("second alloc must fail");
        assert_eq!(
            err,
            ArenaError::Exhausted {
                requested: 600,
                remaining: 424
            }
        );
        // Failed allocation leaves the cursor untouched.
        assert_eq!(arena.used(), 600);
    }

    #[test]
    fn alloc_zeroed_clears_recycled_bytes() {
        let mut arena = Arena::with_capacity(64);
        let span = arena.alloc(16).expect("alloc");
        arena.bytes_mut(span).fill(0xAB);
        arena.reset();
        let span = arena.alloc_zeroed(16).expect("alloc");
        assert!(arena.bytes(span).iter().all(|&b| b == 0));
    }

    #[test]
    fn resize_last_moves_only_the_cursor() {
        let mut arena = Arena::with_capacity(256);
        arena.alloc(10).expect("alloc");
        let span = arena.alloc(20).expect("alloc");
        let grown = arena.resize_last(50).expect("grow");
        assert_eq!(grown.offset(), span.offset());
        assert_eq!(arena.used(), 10 + 50);
        let shrunk = arena.resize_last(5).expect("shrink");
        assert_eq!(shrunk.offset(), span.offset());
        assert_eq!(arena.used(), 10 + 5);
    }

    #[test]
    fn resize_without_alloc_is_an_error() {
        let mut arena = Arena::with_capacity(64);
        assert_eq!(
            arena.resize_last(8).expect_err("nothing to resize"),
            ArenaError::NoPreviousAlloc
        );
    }

    #[test]
    fn nested_base_and_capacity() {
        let mut arena = Arena::with_capacity(256);
        arena.alloc(40).expect("alloc");
        let used_at_creation = arena.used();
        let mut sub = arena.nested(64).expect("nested");
        assert_eq!(sub.base_offset(), used_at_creation);
        assert_eq!(sub.capacity(), 64);

        // Sub-arena spans never leave the carved block.
        let a = sub.alloc(32).expect("sub alloc");
        let b = sub.alloc(32).expect("sub alloc");
        assert!(a.offset() >= sub.base_offset());
        assert_eq!(b.offset() + b.len(), sub.base_offset() + sub.capacity());
        assert_eq!(
            sub.alloc(1).expect_err("sub is full"),
            ArenaError::Exhausted {
                requested: 1,
                remaining: 0
            }
        );
    }

    #[test]
    fn nested_writes_stay_inside_the_block() {
        let mut arena = Arena::with_capacity(128);
        let before = arena.alloc(16).expect("alloc");
        let mut sub = arena.nested(32).expect("nested");
        let after = arena.alloc(16).expect("alloc");

        arena.bytes_mut(before).fill(0x11);
        arena.bytes_mut(after).fill(0x22);
        let inner = sub.alloc(32).expect("sub alloc");
        arena.bytes_mut(inner).fill(0xFF);

        assert!(arena.bytes(before).iter().all(|&b| b == 0x11));
        assert!(arena.bytes(after).iter().all(|&b| b == 0x22));
    }

    #[test]
    fn sub_arenas_nest_further() {
        let mut arena = Arena::with_capacity(256);
        let mut outer = arena.nested(128).expect("nested");
        outer.alloc(8).expect("alloc");
        let inner = outer.nested(32).expect("inner");
        assert_eq!(inner.base_offset(), outer.base_offset() + 8);
        assert_eq!(inner.capacity(), 32);
    }

    #[test]
    fn freeze_restores_cursor_and_mark() {
        let mut arena = Arena::with_capacity(256);
        arena.alloc(10).expect("alloc");
        arena.freeze().expect("freeze");
        arena.alloc(100).expect("alloc");
        arena.alloc(50).expect("alloc");
        arena.unfreeze().expect("unfreeze");
        assert_eq!(arena.used(), 10);
        // The resize mark was restored along with the cursor.
        let span = arena.resize_last(30).expect("resize pre-freeze alloc");
        assert_eq!(span.offset(), 0);
        assert_eq!(arena.used(), 30);
    }

    #[test]
    fn only_one_freeze_level() {
        let mut arena = Arena::with_capacity(64);
        arena.freeze().expect("freeze");
        assert_eq!(
            arena.freeze().expect_err("second freeze"),
            ArenaError::FrozenActive
        );
        arena.unfreeze().expect("unfreeze");
        assert_eq!(
            arena.unfreeze().expect_err("nothing frozen"),
            ArenaError::NotFrozen
        );
    }

    #[test]
    fn reset_returns_to_empty() {
        let mut arena = Arena::with_capacity(64);
        arena.alloc(32).expect("alloc");
        arena.freeze().expect("freeze");
        arena.reset();
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.unfreeze().expect_err("cleared"), ArenaError::NotFrozen);
    }

    #[test]
    fn typed_arrays_are_aligned_and_writable() {
        let mut arena = Arena::with_capacity(256);
        arena.alloc(3).expect("misalign the cursor");
        let span = arena.alloc_array::<u32>(4).expect("array");
        assert_eq!(span.offset() % core::mem::align_of::<u32>(), 0);
        arena.slice_mut::<u32>(span).copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(arena.slice::<u32>(span), &[1, 2, 3, 4]);
    }
}
