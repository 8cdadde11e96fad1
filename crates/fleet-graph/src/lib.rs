//! `fleet-graph` — topology, routing and occupancy for the fleet simulator.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`network`]     | `NavGraph` (CSR + R-tree), `NavGraphBuilder`, `Bounds`    |
//! | [`loader`]      | `load_graph_*` — JSON graph-document parsing              |
//! | [`router`]      | `Router` trait, `Path`, `BfsRouter`, obstacle-avoiding BFS |
//! | [`reservation`] | `ReservationStore` — vertex/lane occupancy                |
//! | [`error`]       | `GraphError`, `GraphResult<T>`                            |
//!
//! # Ownership
//!
//! The topology is immutable once built.  All mutable state — who occupies
//! which vertex or lane — lives in [`ReservationStore`], and the only way to
//! change it is through the store's reserve/release methods (plus the single
//! `revoke_lane` override used by the conflict resolver).  The store is owned
//! by one simulation and lent out `&mut`, so reserve/release pairs are
//! serialised by construction.

pub mod error;
pub mod loader;
pub mod network;
pub mod reservation;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use loader::{load_graph_path, load_graph_reader, load_graph_str, load_level_str};
pub use network::{Bounds, NavGraph, NavGraphBuilder};
pub use reservation::ReservationStore;
pub use router::{BfsRouter, Path, Router, shortest_path_avoiding};
