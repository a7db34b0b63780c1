//! A keyed min-priority queue supporting decrease-key and increase-key.
//!
//! Adapted from the `BinaryHeap` + `FxIndexMap` pairing used by the
//! teacher's A* implementation (`pathfinding.rs`), generalized here into a
//! standalone, key-generic component: instead of a `BinaryHeap` holding
//! `SmallestCostHolder` entries alongside a separate index map, the heap
//! array lives directly inside an `IndexMap`, which already gives O(1)
//! key -> slot lookup and in-place index bookkeeping on swap.

use std::cmp::Ordering;
use std::hash::{BuildHasherDefault, Hash};

use fxhash::FxHasher;
use indexmap::IndexMap;

use crate::error::ScissorsError;

type FxIndexMap<K> = IndexMap<K, u32, BuildHasherDefault<FxHasher>>;

/// A binary-heap-backed min-priority queue keyed by `K`, with O(log n)
/// insert, pop-min, and priority update (decrease or increase key).
#[derive(Debug, Clone)]
pub struct MinQueue<K: Eq + Hash + Copy> {
    entries: FxIndexMap<K>,
}

impl<K: Eq + Hash + Copy> Default for MinQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Copy> MinQueue<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: FxIndexMap::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    #[must_use]
    pub fn priority_of(&self, key: &K) -> Option<u32> {
        self.entries.get(key).copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn peek_key(&self) -> Result<K, ScissorsError> {
        self.entries
            .get_index(0)
            .map(|(k, _)| *k)
            .ok_or(ScissorsError::Empty)
    }

    pub fn peek_priority(&self) -> Result<u32, ScissorsError> {
        self.entries
            .get_index(0)
            .map(|(_, p)| *p)
            .ok_or(ScissorsError::Empty)
    }

    /// Insert `key` with `priority` if it is not already present, otherwise
    /// change its priority in place and restore the heap invariant by
    /// sifting in whichever direction the new priority requires.
    pub fn add_or_update(&mut self, key: K, priority: u32) {
        match self.entries.get_index_of(&key) {
            Some(i) => {
                let old = self.priority_at(i);
                if let Some((_, p)) = self.entries.get_index_mut(i) {
                    *p = priority;
                }
                match priority.cmp(&old) {
                    Ordering::Less => self.sift_up(i),
                    Ordering::Greater => self.sift_down(i),
                    Ordering::Equal => {}
                }
            }
            None => {
                self.entries.insert(key, priority);
                self.sift_up(self.entries.len() - 1);
            }
        }
    }

    /// Remove and return the key with the smallest priority.
    ///
    /// Implemented as swap-with-last, shrink, sift-down: `IndexMap` already
    /// performs the swap-and-truncate and keeps its internal key -> index
    /// table consistent for every element it moves; only the sift-down of
    /// the relocated root is ours to do.
    pub fn pop(&mut self) -> Result<K, ScissorsError> {
        if self.entries.is_empty() {
            return Err(ScissorsError::Empty);
        }
        let (key, _) = self.entries.swap_remove_index(0).expect("checked non-empty");
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Ok(key)
    }

    #[inline]
    fn priority_at(&self, i: usize) -> u32 {
        *self.entries.get_index(i).expect("index in bounds").1
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.priority_at(i) < self.priority_at(parent) {
                self.entries.swap_indices(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.entries.len();
        loop {
            let l = 2 * i + 1;
            let r = 2 * i + 2;
            let mut smallest = i;
            if l < n && self.priority_at(l) < self.priority_at(smallest) {
                smallest = l;
            }
            if r < n && self.priority_at(r) < self.priority_at(smallest) {
                smallest = r;
            }
            if smallest == i {
                break;
            }
            self.entries.swap_indices(i, smallest);
            i = smallest;
        }
    }
}
