//! Routing trait and the default breadth-first router.
//!
//! # Cost model
//!
//! Paths minimise **hop count**.  Lane speed limits and blocked flags are not
//! consulted; a blocked or occupied lane on the chosen path simply makes the
//! robot wait when it gets there.
//!
//! # Pluggability
//!
//! The fleet registry plans through the [`Router`] trait so an application
//! can swap in a weighted or reservation-aware planner without touching the
//! robot state machine.

use std::collections::{HashSet, VecDeque};

use fleet_core::VertexId;

use crate::network::NavGraph;
use crate::GraphResult;

// ── Path ──────────────────────────────────────────────────────────────────────

/// An ordered vertex sequence from start to destination, both included.
///
/// A path is never empty: planning from a vertex to itself yields `[v]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub vertices: Vec<VertexId>,
}

impl Path {
    /// Single-vertex path for a task whose destination is the start.
    pub fn trivial(v: VertexId) -> Self {
        Self { vertices: vec![v] }
    }

    /// `(from, to)` for every lane along the path, in order.
    pub fn hops(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.vertices.windows(2).map(|w| (w[0], w[1]))
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable path planner.
pub trait Router: Send + Sync {
    /// Plan a path from `from` to `to`.
    ///
    /// Returns `Ok(None)` when `to` is unreachable and
    /// [`GraphError::VertexNotFound`][crate::GraphError::VertexNotFound] when
    /// either id is outside the graph.
    fn route(&self, graph: &NavGraph, from: VertexId, to: VertexId) -> GraphResult<Option<Path>>;
}

// ── BfsRouter ─────────────────────────────────────────────────────────────────

/// Unweighted breadth-first search over the CSR graph.
///
/// Neighbours are expanded in lane declaration order, so among several
/// minimum-hop paths the one using earlier-declared lanes wins.
pub struct BfsRouter;

impl Router for BfsRouter {
    fn route(&self, graph: &NavGraph, from: VertexId, to: VertexId) -> GraphResult<Option<Path>> {
        graph.check_vertex(from)?;
        graph.check_vertex(to)?;
        Ok(bfs(graph, from, to, |_| false))
    }
}

/// Minimum-hop path that never enters a vertex in `avoid`.
///
/// Behaves as if the avoided vertices were removed from the graph: if `from`
/// or `to` is itself avoided there is no path.
pub fn shortest_path_avoiding(
    graph: &NavGraph,
    from:  VertexId,
    to:    VertexId,
    avoid: &HashSet<VertexId>,
) -> GraphResult<Option<Path>> {
    graph.check_vertex(from)?;
    graph.check_vertex(to)?;
    if avoid.contains(&from) || avoid.contains(&to) {
        return Ok(None);
    }
    Ok(bfs(graph, from, to, |v| avoid.contains(&v)))
}

// ── BFS internals ─────────────────────────────────────────────────────────────

fn bfs(
    graph:   &NavGraph,
    from:    VertexId,
    to:      VertexId,
    blocked: impl Fn(VertexId) -> bool,
) -> Option<Path> {
    if from == to {
        return Some(Path::trivial(from));
    }

    let n = graph.vertex_count();
    // prev[v] = vertex we reached v from; INVALID for unvisited.
    let mut prev    = vec![VertexId::INVALID; n];
    let mut visited = vec![false; n];
    let mut queue   = VecDeque::new();

    visited[from.index()] = true;
    queue.push_back(from);

    while let Some(v) = queue.pop_front() {
        for lane in graph.out_lanes(v) {
            let next = graph.lane_to[lane.index()];
            if visited[next.index()] || blocked(next) {
                continue;
            }
            visited[next.index()] = true;
            prev[next.index()] = v;
            if next == to {
                return Some(reconstruct(&prev, from, to));
            }
            queue.push_back(next);
        }
    }

    None
}

fn reconstruct(prev: &[VertexId], from: VertexId, to: VertexId) -> Path {
    let mut vertices = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        vertices.push(cur);
    }
    vertices.reverse();
    Path { vertices }
}
