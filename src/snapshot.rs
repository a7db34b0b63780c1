//! An immutable, point-in-time view of a [`crate::shortest_paths::ShortestPaths`]
//! search, safe to hand to a reader (a live-wire query, a UI progress bar)
//! while the engine keeps working underneath it.

use crate::bitset::BitSet;
use crate::error::ScissorsError;

/// A deep-copied snapshot of one run's distances, predecessors, and settled
/// set, as of the moment it was taken.
#[derive(Debug, Clone)]
pub struct PathfindingSnapshot {
    start_id: u32,
    distance: Vec<Option<u32>>,
    predecessor: Vec<Option<u32>>,
    settled: BitSet,
}

impl PathfindingSnapshot {
    pub(crate) fn new(
        start_id: u32,
        distance: Vec<Option<u32>>,
        predecessor: Vec<Option<u32>>,
        settled: BitSet,
    ) -> Self {
        Self {
            start_id,
            distance,
            predecessor,
            settled,
        }
    }

    #[inline]
    #[must_use]
    pub fn start_id(&self) -> u32 {
        self.start_id
    }

    /// Shortest distance found so far to `id`, or `-1` if `id` has not yet
    /// been discovered.
    #[must_use]
    pub fn distance_to(&self, id: u32) -> i64 {
        self.distance
            .get(id as usize)
            .and_then(|d| *d)
            .map(i64::from)
            .unwrap_or(-1)
    }

    /// A vertex is discovered once it has an assigned distance: the start
    /// vertex (distance zero, no predecessor) or any vertex reached by at
    /// least one relaxed edge.
    #[must_use]
    pub fn discovered(&self, id: u32) -> bool {
        id == self.start_id
            || self
                .distance
                .get(id as usize)
                .map(|d| d.is_some())
                .unwrap_or(false)
    }

    #[must_use]
    pub fn settled(&self, id: u32) -> bool {
        self.settled.contains(id as usize)
    }

    #[must_use]
    pub fn settled_count(&self) -> usize {
        self.settled.count()
    }

    /// Reconstruct the shortest path from the snapshot's start vertex to
    /// `dst`, walking predecessors back to the start.
    pub fn path_to(&self, dst: u32) -> Result<Vec<u32>, ScissorsError> {
        if !self.discovered(dst) {
            return Err(ScissorsError::NotDiscovered(dst));
        }
        let mut path = vec![dst];
        let mut cur = dst;
        while cur != self.start_id {
            let pred = self.predecessor[cur as usize]
                .expect("a discovered non-start vertex always has a predecessor");
            path.push(pred);
            cur = pred;
        }
        path.reverse();
        Ok(path)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn snapshot() -> PathfindingSnapshot {
        // start(0) -> 1 -> 2, with 3 undiscovered.
        PathfindingSnapshot::new(
            0,
            vec![Some(0), Some(5), Some(9), None],
            vec![None, Some(0), Some(1), None],
            {
                let mut s = BitSet::new(4);
                s.insert(0);
                s.insert(1);
                s
            },
        )
    }

    #[test]
    fn distance_and_discovery() {
        let snap = snapshot();
        assert_eq!(snap.distance_to(0), 0);
        assert_eq!(snap.distance_to(2), 9);
        assert_eq!(snap.distance_to(3), -1);
        assert!(snap.discovered(0));
        assert!(snap.discovered(2));
        assert!(!snap.discovered(3));
    }

    #[test]
    fn settled_reflects_input() {
        let snap = snapshot();
        assert!(snap.settled(0));
        assert!(snap.settled(1));
        assert!(!snap.settled(2));
    }

    #[test]
    fn path_to_reconstructs_from_predecessors() {
        let snap = snapshot();
        assert_eq!(snap.path_to(2).unwrap(), vec![0, 1, 2]);
        assert_eq!(snap.path_to(0).unwrap(), vec![0]);
    }

    #[test]
    fn path_to_undiscovered_errors() {
        let snap = snapshot();
        assert!(matches!(
            snap.path_to(3),
            Err(ScissorsError::NotDiscovered(3))
        ));
    }
}
