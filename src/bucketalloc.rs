// Copyright 2025 Lars Brubaker
// License: MIT
//
// A Vec-backed arena with a free list. Items are addressed by u32 handles and
// freed slots are recycled in place, so storage allocated by one triangulation
// is reused by the next. The sweep keeps its hull chains here.

/// Items that can be reset to an empty state without dropping their storage.
pub trait Recycle {
    fn recycle(&mut self);
}

impl<T> Recycle for Vec<T> {
    #[inline]
    fn recycle(&mut self) {
        self.clear();
    }
}

/// A simple arena allocator backed by a Vec.
pub struct BucketAlloc<T> {
    items: Vec<T>,
    live: Vec<bool>,
    free_list: Vec<u32>,
}

impl<T: Default + Recycle> BucketAlloc<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            live: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Allocate an empty item, returning its handle.
    pub fn alloc(&mut self) -> u32 {
        if let Some(idx) = self.free_list.pop() {
            self.items[idx as usize].recycle();
            self.live[idx as usize] = true;
            idx
        } else {
            let idx = self.items.len() as u32;
            self.items.push(T::default());
            self.live.push(true);
            idx
        }
    }

    /// Return an item to the free list. Freeing a dead handle is a no-op.
    pub fn free(&mut self, idx: u32) {
        if let Some(live) = self.live.get_mut(idx as usize) {
            if *live {
                *live = false;
                self.free_list.push(idx);
            }
        }
    }

    /// Free every item while keeping the storage.
    pub fn reset(&mut self) {
        self.free_list.clear();
        for (idx, live) in self.live.iter_mut().enumerate().rev() {
            *live = false;
            self.free_list.push(idx as u32);
        }
    }

    pub fn get(&self, idx: u32) -> Option<&T> {
        match self.live.get(idx as usize) {
            Some(true) => self.items.get(idx as usize),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, idx: u32) -> Option<&mut T> {
        match self.live.get(idx as usize) {
            Some(true) => self.items.get_mut(idx as usize),
            _ => None,
        }
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.items.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Default + Recycle> Default for BucketAlloc<T> {
    fn default() -> Self {
        Self::new()
    }
}
