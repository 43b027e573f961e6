// Copyright 2025 Lars Brubaker
// License: MIT
//
// Reusable scratch storage shared by every pipeline stage.
//
// A `BufferPool<T>` hands out `WorkBuffer` guards that deref to a cleared
// `Vec<T>`. Dropping the guard returns the Vec, capacity intact, to the pool,
// so every exit path gives its storage back. Pools use interior mutability and
// are therefore single-threaded: give each thread its own `WorkBufferPool`.

use std::cell::{RefCell, RefMut};
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::bucketalloc::BucketAlloc;
use crate::monotone::{Event, PartialHull};

/// A free list of Vecs of one element type.
pub struct BufferPool<T> {
    free: RefCell<Vec<Vec<T>>>,
}

impl<T> BufferPool<T> {
    pub fn new() -> Self {
        Self {
            free: RefCell::new(Vec::new()),
        }
    }

    /// Borrow an empty buffer.
    pub fn get(&self) -> WorkBuffer<'_, T> {
        let buf = self.free.borrow_mut().pop().unwrap_or_default();
        WorkBuffer { buf, pool: self }
    }

    /// Borrow a buffer holding `len` copies of `value`.
    pub fn get_filled(&self, value: T, len: usize) -> WorkBuffer<'_, T>
    where
        T: Clone,
    {
        let mut buf = self.get();
        buf.resize(len, value);
        buf
    }

    /// Number of buffers currently parked in the pool.
    pub fn idle(&self) -> usize {
        self.free.borrow().len()
    }

    fn give_back(&self, mut buf: Vec<T>) {
        buf.clear();
        self.free.borrow_mut().push(buf);
    }
}

impl<T> Default for BufferPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A Vec borrowed from a `BufferPool`, returned when dropped.
pub struct WorkBuffer<'a, T> {
    buf: Vec<T>,
    pool: &'a BufferPool<T>,
}

impl<T> Deref for WorkBuffer<'_, T> {
    type Target = Vec<T>;

    #[inline]
    fn deref(&self) -> &Vec<T> {
        &self.buf
    }
}

impl<T> DerefMut for WorkBuffer<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.buf
    }
}

impl<T> Drop for WorkBuffer<'_, T> {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        if buf.capacity() > 0 {
            self.pool.give_back(buf);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for WorkBuffer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.buf.fmt(f)
    }
}

/// All scratch storage a triangulation call needs, kept between calls.
#[derive(Default)]
pub struct WorkBufferPool {
    pub(crate) events: BufferPool<Event>,
    pub(crate) hulls: BufferPool<PartialHull>,
    pub(crate) cells: BufferPool<[u32; 3]>,
    pub(crate) pairs: BufferPool<[u32; 2]>,
    pub(crate) indices: BufferPool<u32>,
    pub(crate) sides: BufferPool<i8>,
    pub(crate) flags: BufferPool<bool>,
    chains: RefCell<BucketAlloc<Vec<u32>>>,
}

impl WorkBufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hull-chain arena used by the sweep.
    pub(crate) fn chains(&self) -> RefMut<'_, BucketAlloc<Vec<u32>>> {
        self.chains.borrow_mut()
    }
}

impl fmt::Debug for WorkBufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkBufferPool")
            .field("events", &self.events.idle())
            .field("hulls", &self.hulls.idle())
            .field("cells", &self.cells.idle())
            .field("pairs", &self.pairs.idle())
            .field("indices", &self.indices.idle())
            .field("sides", &self.sides.idle())
            .field("flags", &self.flags.idle())
            .finish()
    }
}
