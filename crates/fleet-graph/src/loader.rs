//! JSON graph-document loader.
//!
//! # Document format
//!
//! ```json
//! {
//!   "building_name": "optional, ignored",
//!   "levels": {
//!     "L1": {
//!       "vertices": [[0.0, 0.0, {"name": "dock"}], [4.0, 0.0, {"is_charger": true}]],
//!       "lanes":    [[0, 1, {"speed_limit": 1.5}], [1, 0, {}]]
//!     }
//!   }
//! }
//! ```
//!
//! | Tuple  | Fields                                                        |
//! |--------|---------------------------------------------------------------|
//! | vertex | `x`, `y`, attrs: `name` (default `v<index>`), `is_charger` (default `false`) |
//! | lane   | `from`, `to` (vertex indices), attrs: `speed_limit` (default `0`) |
//!
//! A vertex's id is its index in `vertices`.  Unknown attribute keys are
//! ignored.  Any structural problem — no levels, a tuple of the wrong shape,
//! a lane naming a vertex that does not exist — fails the whole load; no
//! partially built graph is ever returned.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use fleet_core::{Point, VertexId};

use crate::network::{NavGraph, NavGraphBuilder};
use crate::{GraphError, GraphResult};

// ── Document records ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GraphDocument {
    levels: Map<String, Value>,
}

#[derive(Deserialize)]
struct LevelDocument {
    vertices: Vec<Value>,
    lanes:    Vec<Value>,
}

#[derive(Deserialize)]
struct VertexAttrs {
    #[serde(default)]
    name:       Option<String>,
    #[serde(default)]
    is_charger: bool,
}

#[derive(Deserialize)]
struct LaneAttrs {
    #[serde(default)]
    speed_limit: f32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the first level (in document order) from a JSON file.
pub fn load_graph_path(path: &Path) -> GraphResult<NavGraph> {
    let file = std::fs::File::open(path)?;
    load_graph_reader(file)
}

/// Like [`load_graph_path`] but accepts any `Read` source.
pub fn load_graph_reader<R: Read>(mut reader: R) -> GraphResult<NavGraph> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    load_graph_str(&text)
}

/// Load the first level (in document order) from a JSON string.
pub fn load_graph_str(json: &str) -> GraphResult<NavGraph> {
    let doc: GraphDocument = serde_json::from_str(json)?;
    let (name, level) = doc.levels.into_iter().next().ok_or(GraphError::NoLevels)?;
    build_level(&name, level)
}

/// Load the level called `level` from a JSON string.
pub fn load_level_str(json: &str, level: &str) -> GraphResult<NavGraph> {
    let mut doc: GraphDocument = serde_json::from_str(json)?;
    if doc.levels.is_empty() {
        return Err(GraphError::NoLevels);
    }
    let value = doc
        .levels
        .remove(level)
        .ok_or_else(|| GraphError::LevelNotFound(level.to_owned()))?;
    build_level(level, value)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn build_level(name: &str, value: Value) -> GraphResult<NavGraph> {
    let level: LevelDocument = serde_json::from_value(value).map_err(|e| GraphError::MalformedLevel {
        level:  name.to_owned(),
        reason: e.to_string(),
    })?;

    let mut b = NavGraphBuilder::with_capacity(level.vertices.len(), level.lanes.len());

    for (index, raw) in level.vertices.into_iter().enumerate() {
        let (x, y, attrs): (f32, f32, VertexAttrs) =
            serde_json::from_value(raw).map_err(|e| GraphError::MalformedVertex {
                level:  name.to_owned(),
                index,
                reason: e.to_string(),
            })?;
        let vname = attrs.name.unwrap_or_else(|| format!("v{index}"));
        b.add_vertex(Point::new(x, y), vname, attrs.is_charger);
    }

    let vertex_count = b.vertex_count();
    for (index, raw) in level.lanes.into_iter().enumerate() {
        let (from, to, attrs): (u32, u32, LaneAttrs) =
            serde_json::from_value(raw).map_err(|e| GraphError::MalformedLane {
                level:  name.to_owned(),
                index,
                reason: e.to_string(),
            })?;
        for v in [from, to] {
            if v as usize >= vertex_count {
                return Err(GraphError::MalformedLane {
                    level:  name.to_owned(),
                    index,
                    reason: format!("vertex {v} does not exist ({vertex_count} vertices)"),
                });
            }
        }
        b.add_lane(VertexId(from), VertexId(to), attrs.speed_limit);
    }

    let graph = b.build()?;
    log::info!(
        "loaded nav graph level {name:?}: {} vertices, {} lanes",
        graph.vertex_count(),
        graph.lane_count()
    );
    Ok(graph)
}
