//! Incremental, batched single-source shortest paths over a generic
//! weighted graph.
//!
//! The engine never runs to completion in one call unless asked to:
//! [`ShortestPaths::extend_search`] settles at most `max_to_settle`
//! vertices and returns a [`PathfindingSnapshot`] of whatever has been
//! discovered so far, so a caller (typically a background worker) can
//! interleave settling work with cancellation checks and progress
//! reporting.

use std::hash::Hash;

use crate::bitset::BitSet;
use crate::min_queue::MinQueue;
use crate::snapshot::PathfindingSnapshot;

/// A directed, weighted edge as seen by the shortest-paths engine.
#[derive(Debug, Clone, Copy)]
pub struct WeightedEdge {
    pub end: u32,
    pub weight: u32,
}

/// A graph the engine can search: a dense vertex id space `0..vertex_count`
/// and, for each vertex, its outgoing weighted edges.
pub trait Graph {
    fn vertex_count(&self) -> u32;
    fn out_edges(&self, id: u32) -> Vec<WeightedEdge>;
}

/// A simple adjacency-list graph, useful for testing the engine against
/// graphs that are not pixel grids.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    edges: Vec<Vec<WeightedEdge>>,
}

impl AdjacencyGraph {
    #[must_use]
    pub fn new(vertex_count: u32) -> Self {
        Self {
            edges: vec![Vec::new(); vertex_count as usize],
        }
    }

    pub fn add_edge(&mut self, from: u32, to: u32, weight: u32) {
        self.edges[from as usize].push(WeightedEdge { end: to, weight });
    }

    /// Add edges in both directions with the same weight.
    pub fn add_undirected_edge(&mut self, a: u32, b: u32, weight: u32) {
        self.add_edge(a, b, weight);
        self.add_edge(b, a, weight);
    }
}

impl Graph for AdjacencyGraph {
    fn vertex_count(&self) -> u32 {
        self.edges.len() as u32
    }

    fn out_edges(&self, id: u32) -> Vec<WeightedEdge> {
        self.edges[id as usize].clone()
    }
}

/// An incremental Dijkstra search over a [`Graph`].
pub struct ShortestPaths<'g, G: Graph> {
    graph: &'g G,
    start: Option<u32>,
    distance: Vec<Option<u32>>,
    predecessor: Vec<Option<u32>>,
    settled: BitSet,
    frontier: MinQueue<u32>,
    settled_count: u32,
}

impl<'g, G: Graph> ShortestPaths<'g, G> {
    #[must_use]
    pub fn new(graph: &'g G) -> Self {
        let n = graph.vertex_count() as usize;
        Self {
            graph,
            start: None,
            distance: vec![None; n],
            predecessor: vec![None; n],
            settled: BitSet::new(n),
            frontier: MinQueue::new(),
            settled_count: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.graph.vertex_count()
    }

    #[inline]
    #[must_use]
    pub fn settled_count(&self) -> u32 {
        self.settled_count
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> Option<u32> {
        self.start
    }

    /// Reset the engine and begin a fresh search from `start`, discarding
    /// any prior search state.
    pub fn set_start(&mut self, start: u32) {
        let n = self.graph.vertex_count() as usize;
        self.distance = vec![None; n];
        self.predecessor = vec![None; n];
        self.settled = BitSet::new(n);
        self.frontier.clear();
        self.settled_count = 0;
        self.start = Some(start);
        self.distance[start as usize] = Some(0);
        self.frontier.add_or_update(start, 0);
        log::trace!("shortest-paths: start set to vertex {start}");
    }

    /// True once the frontier has been fully drained: every vertex
    /// reachable from the start has been settled.
    #[must_use]
    pub fn all_paths_found(&self) -> bool {
        self.start.is_some() && self.frontier.is_empty()
    }

    /// Run `set_start` followed by enough `extend_search` calls to settle
    /// the whole reachable component in one shot.
    pub fn find_all_paths(&mut self, start: u32) -> PathfindingSnapshot {
        self.set_start(start);
        self.extend_search(self.graph.vertex_count())
    }

    /// Settle at most `max_to_settle` additional vertices and return a
    /// snapshot of the search as it stands afterward. Safe to call
    /// repeatedly; once `all_paths_found` is true, further calls are no-ops
    /// that just return the same snapshot.
    pub fn extend_search(&mut self, max_to_settle: u32) -> PathfindingSnapshot {
        let mut settled_this_call = 0;
        while settled_this_call < max_to_settle {
            let next = match self.frontier.pop() {
                Ok(k) => k,
                Err(_) => break,
            };
            // Lazy deletion: a vertex can have stale, higher-priority
            // entries left behind by earlier decrease-key calls.
            if self.settled.contains(next as usize) {
                continue;
            }
            self.settled.insert(next as usize);
            self.settled_count += 1;
            settled_this_call += 1;

            let u_dist = self.distance[next as usize]
                .expect("a popped vertex was necessarily discovered");
            for edge in self.graph.out_edges(next) {
                if self.settled.contains(edge.end as usize) {
                    continue;
                }
                let candidate = u_dist + edge.weight;
                let better = match self.distance[edge.end as usize] {
                    None => true,
                    Some(d) => candidate < d,
                };
                if better {
                    self.distance[edge.end as usize] = Some(candidate);
                    self.predecessor[edge.end as usize] = Some(next);
                    self.frontier.add_or_update(edge.end, candidate);
                }
            }
        }
        log::debug!(
            "shortest-paths: settled {} of {} vertices this batch",
            settled_this_call,
            self.graph.vertex_count()
        );
        self.snapshot()
    }

    fn snapshot(&self) -> PathfindingSnapshot {
        PathfindingSnapshot::new(
            self.start.unwrap_or(0),
            self.distance.clone(),
            self.predecessor.clone(),
            self.settled.clone(),
        )
    }
}
