//! scissors_core
//! =============
//!
//! The engine behind an interactive intelligent-scissors image segmentation
//! tool: an incremental, batched Dijkstra search over an implicit 8-connected
//! pixel grid, gradient-based edge weighers that bias the search toward
//! image boundaries, and the selection state machine (point-to-point and
//! scissors variants) that drives it from user input.
//!
//! Searches never run to completion on the calling thread unless asked to:
//! [`shortest_paths::ShortestPaths::extend_search`] settles a bounded batch
//! of vertices per call and hands back an immutable
//! [`snapshot::PathfindingSnapshot`], which is what lets the scissors
//! variant run its search on a background thread while still being able to
//! preview a live wire and cancel cleanly.

mod bitset;
mod config;
mod direction;
mod error;
mod grid;
mod min_queue;
mod observer;
mod png_export;
mod polyline;
mod raster;
mod selection;
mod shortest_paths;
mod snapshot;
mod weigher;

pub use self::{
    bitset::BitSet,
    config::{ScissorsConfig, DEFAULT_BATCH_SIZE},
    direction::Direction,
    error::ScissorsError,
    grid::{to_uvec2, Grid, GridEdge},
    min_queue::MinQueue,
    observer::{Event, Observers},
    polyline::{Polyline, PolylineBuffer},
    raster::Raster,
    selection::{
        point_to_point::PointToPoint, scissors::Scissors, worker::SolveWorker, SelectionCore,
        SelectionModel, SelectionState, SelectionVariant,
    },
    shortest_paths::{AdjacencyGraph, Graph, ShortestPaths, WeightedEdge},
    snapshot::PathfindingSnapshot,
    weigher::{
        make_weigher, weigher_names, ColoredWeight, CrossGradMono, Weigher, WeightedGrid,
        BORDER_WEIGHT,
    },
};
