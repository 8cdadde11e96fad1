//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! Outgoing lanes use **Compressed Sparse Row (CSR)** format.  Given a
//! `VertexId v`, its outgoing lanes occupy the slice:
//!
//! ```text
//! lane_to[ vertex_out_start[v] .. vertex_out_start[v+1] ]
//! ```
//!
//! Lane arrays (`lane_from`, `lane_to`, `lane_speed_limit`) are sorted by
//! source vertex and indexed by `LaneId`.  The sort is stable, so lanes that
//! share a source keep their declaration order.  Two consequences follow:
//! BFS visits neighbours in the order the document lists them, and when a
//! document declares the same `(from, to)` pair twice, [`lane_between`]
//! resolves to the first one.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a point to the nearest vertex.  Used to
//! resolve pointer positions to vertices without a linear scan.
//!
//! [`lane_between`]: NavGraph::lane_between

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use fleet_core::{LaneId, Point, VertexId};

use crate::{GraphError, GraphResult};

// ── R-tree vertex entry ───────────────────────────────────────────────────────

#[derive(Clone)]
struct VertexEntry {
    point: [f32; 2],
    id:    VertexId,
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for VertexEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box of all vertex positions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Directed vertex/lane graph in CSR format plus a spatial index.
///
/// Immutable after construction; occupancy lives in
/// [`ReservationStore`][crate::ReservationStore].  Fields are `pub` for
/// direct indexed access.  Do not construct directly; use
/// [`NavGraphBuilder`] or one of the loaders.
pub struct NavGraph {
    // ── Vertex data (indexed by VertexId) ─────────────────────────────────
    pub vertex_pos: Vec<Point>,

    /// Display name; `v<index>` when the document gives none.
    pub vertex_name: Vec<String>,

    pub vertex_is_charger: Vec<bool>,

    // ── CSR lane adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `vertex_count + 1`.
    pub vertex_out_start: Vec<u32>,

    // ── Lane data (indexed by LaneId) ─────────────────────────────────────
    pub lane_from: Vec<VertexId>,
    pub lane_to: Vec<VertexId>,

    /// Advisory only — routing and motion ignore it.
    pub lane_speed_limit: Vec<f32>,

    spatial_idx: RTree<VertexEntry>,
}

impl NavGraph {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertex_pos.len()
    }

    pub fn lane_count(&self) -> usize {
        self.lane_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_pos.is_empty()
    }

    // ── Vertex access ─────────────────────────────────────────────────────

    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        v.index() < self.vertex_count()
    }

    /// `Ok(())` if `v` exists, else [`GraphError::VertexNotFound`].
    #[inline]
    pub fn check_vertex(&self, v: VertexId) -> GraphResult<()> {
        if self.contains(v) { Ok(()) } else { Err(GraphError::VertexNotFound(v)) }
    }

    pub fn position(&self, v: VertexId) -> GraphResult<Point> {
        self.check_vertex(v)?;
        Ok(self.vertex_pos[v.index()])
    }

    pub fn name(&self, v: VertexId) -> GraphResult<&str> {
        self.check_vertex(v)?;
        Ok(&self.vertex_name[v.index()])
    }

    pub fn is_charger(&self, v: VertexId) -> GraphResult<bool> {
        self.check_vertex(v)?;
        Ok(self.vertex_is_charger[v.index()])
    }

    /// All vertex ids in ascending order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertex_count() as u32).map(VertexId)
    }

    // ── Lane traversal ────────────────────────────────────────────────────

    /// Outgoing lanes of `v`, in declaration order.  Caller guarantees `v`
    /// exists.
    #[inline]
    pub fn out_lanes(&self, v: VertexId) -> impl Iterator<Item = LaneId> + '_ {
        let start = self.vertex_out_start[v.index()] as usize;
        let end   = self.vertex_out_start[v.index() + 1] as usize;
        (start..end).map(|i| LaneId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, v: VertexId) -> usize {
        let start = self.vertex_out_start[v.index()] as usize;
        let end   = self.vertex_out_start[v.index() + 1] as usize;
        end - start
    }

    /// The first declared lane `from → to`.
    ///
    /// `Ok(None)` when both vertices exist but are not connected in that
    /// direction.
    pub fn lane_between(&self, from: VertexId, to: VertexId) -> GraphResult<Option<LaneId>> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        Ok(self.out_lanes(from).find(|l| self.lane_to[l.index()] == to))
    }

    /// `(from, to)` of `lane`.
    #[inline]
    pub fn endpoints(&self, lane: LaneId) -> (VertexId, VertexId) {
        (self.lane_from[lane.index()], self.lane_to[lane.index()])
    }

    /// All lane ids in CSR order.
    pub fn lane_ids(&self) -> impl Iterator<Item = LaneId> + '_ {
        (0..self.lane_count() as u32).map(LaneId)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest vertex to `pos`.  `None` only if the graph is empty.
    pub fn nearest_vertex(&self, pos: Point) -> Option<VertexId> {
        self.spatial_idx.nearest_neighbor(&[pos.x, pos.y]).map(|e| e.id)
    }

    /// Vertex under a pointer: the nearest vertex if it lies within
    /// `tolerance` of `pos` (inclusive), else `None`.
    pub fn vertex_near(&self, pos: Point, tolerance: f32) -> Option<VertexId> {
        let entry = self.spatial_idx.nearest_neighbor(&[pos.x, pos.y])?;
        (entry.distance_2(&[pos.x, pos.y]) <= tolerance * tolerance).then_some(entry.id)
    }

    /// Bounding box of all vertices.  `None` for an empty graph.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.vertex_pos.first()?;
        let mut b = Bounds { min: first, max: first };
        for p in &self.vertex_pos[1..] {
            b.min.x = b.min.x.min(p.x);
            b.min.y = b.min.y.min(p.y);
            b.max.x = b.max.x.max(p.x);
            b.max.y = b.max.y.max(p.y);
        }
        Some(b)
    }
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use fleet_core::Point;
/// use fleet_graph::NavGraphBuilder;
///
/// let mut b = NavGraphBuilder::new();
/// let a = b.add_vertex(Point::new(0.0, 0.0), "dock", false);
/// let c = b.add_vertex(Point::new(4.0, 0.0), "charger", true);
/// b.add_two_way(a, c, 1.5);
/// let graph = b.build().unwrap();
/// assert_eq!(graph.vertex_count(), 2);
/// assert_eq!(graph.lane_count(), 2);
/// ```
pub struct NavGraphBuilder {
    vertices:  Vec<RawVertex>,
    raw_lanes: Vec<RawLane>,
}

struct RawVertex {
    pos:        Point,
    name:       String,
    is_charger: bool,
}

struct RawLane {
    from:        VertexId,
    to:          VertexId,
    speed_limit: f32,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self { vertices: Vec::new(), raw_lanes: Vec::new() }
    }

    pub fn with_capacity(vertices: usize, lanes: usize) -> Self {
        Self {
            vertices:  Vec::with_capacity(vertices),
            raw_lanes: Vec::with_capacity(lanes),
        }
    }

    /// Add a vertex and return its `VertexId` (sequential from 0).
    pub fn add_vertex(&mut self, pos: Point, name: impl Into<String>, is_charger: bool) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(RawVertex { pos, name: name.into(), is_charger });
        id
    }

    /// Add a **directed** lane `from → to`.
    pub fn add_lane(&mut self, from: VertexId, to: VertexId, speed_limit: f32) {
        self.raw_lanes.push(RawLane { from, to, speed_limit });
    }

    /// Convenience: one lane in each direction.
    pub fn add_two_way(&mut self, a: VertexId, b: VertexId, speed_limit: f32) {
        self.add_lane(a, b, speed_limit);
        self.add_lane(b, a, speed_limit);
    }

    pub fn vertex_count(&self) -> usize { self.vertices.len() }
    pub fn lane_count(&self) -> usize { self.raw_lanes.len() }

    /// Validate lane endpoints and produce a [`NavGraph`].
    ///
    /// Fails with [`GraphError::VertexNotFound`] if any lane references a
    /// vertex that was never added.
    pub fn build(self) -> GraphResult<NavGraph> {
        let n = self.vertices.len();
        for lane in &self.raw_lanes {
            for v in [lane.from, lane.to] {
                if v.index() >= n {
                    return Err(GraphError::VertexNotFound(v));
                }
            }
        }
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> NavGraph {
        let vertex_count = self.vertices.len();

        // Stable: lanes sharing a source keep declaration order.
        let mut raw = self.raw_lanes;
        raw.sort_by_key(|l| l.from.0);

        let lane_from:        Vec<VertexId> = raw.iter().map(|l| l.from).collect();
        let lane_to:          Vec<VertexId> = raw.iter().map(|l| l.to).collect();
        let lane_speed_limit: Vec<f32>      = raw.iter().map(|l| l.speed_limit).collect();

        let mut vertex_out_start = vec![0u32; vertex_count + 1];
        for l in &raw {
            vertex_out_start[l.from.index() + 1] += 1;
        }
        for i in 1..=vertex_count {
            vertex_out_start[i] += vertex_out_start[i - 1];
        }
        debug_assert_eq!(vertex_out_start[vertex_count] as usize, raw.len());

        let entries: Vec<VertexEntry> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| VertexEntry { point: [v.pos.x, v.pos.y], id: VertexId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        let mut vertex_pos        = Vec::with_capacity(vertex_count);
        let mut vertex_name       = Vec::with_capacity(vertex_count);
        let mut vertex_is_charger = Vec::with_capacity(vertex_count);
        for v in self.vertices {
            vertex_pos.push(v.pos);
            vertex_name.push(v.name);
            vertex_is_charger.push(v.is_charger);
        }

        NavGraph {
            vertex_pos,
            vertex_name,
            vertex_is_charger,
            vertex_out_start,
            lane_from,
            lane_to,
            lane_speed_limit,
            spatial_idx,
        }
    }
}

impl Default for NavGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
