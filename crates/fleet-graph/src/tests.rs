//! Unit tests for fleet-graph.
//!
//! All tests use hand-built graphs or inline JSON documents.

#[cfg(test)]
mod helpers {
    use fleet_core::{Point, VertexId};
    use crate::{NavGraph, NavGraphBuilder};

    /// Small grid:
    ///
    /// ```text
    ///   0 ── 1 ── 2
    ///   │         │
    ///   3 ─────── 4
    /// ```
    ///
    /// All lanes two-way.  0→4 is two hops via 3, three hops via 1 and 2.
    pub fn grid() -> (NavGraph, [VertexId; 5]) {
        let mut b = NavGraphBuilder::new();
        let v0 = b.add_vertex(Point::new(0.0, 0.0), "v0", false);
        let v1 = b.add_vertex(Point::new(1.0, 0.0), "v1", false);
        let v2 = b.add_vertex(Point::new(2.0, 0.0), "v2", true);
        let v3 = b.add_vertex(Point::new(0.0, 1.0), "v3", false);
        let v4 = b.add_vertex(Point::new(2.0, 1.0), "v4", false);
        b.add_two_way(v0, v1, 1.0);
        b.add_two_way(v1, v2, 1.0);
        b.add_two_way(v2, v4, 1.0);
        b.add_two_way(v0, v3, 1.0);
        b.add_two_way(v3, v4, 1.0);
        (b.build().unwrap(), [v0, v1, v2, v3, v4])
    }

    /// Three vertices in a line with one lane each way between neighbours.
    pub fn line() -> (NavGraph, [VertexId; 3]) {
        let mut b = NavGraphBuilder::new();
        let v0 = b.add_vertex(Point::new(0.0, 0.0), "a", false);
        let v1 = b.add_vertex(Point::new(1.0, 0.0), "b", false);
        let v2 = b.add_vertex(Point::new(2.0, 0.0), "c", false);
        b.add_two_way(v0, v1, 0.0);
        b.add_two_way(v1, v2, 0.0);
        (b.build().unwrap(), [v0, v1, v2])
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use fleet_core::{Point, VertexId};
    use crate::{GraphError, NavGraphBuilder};

    #[test]
    fn empty_build() {
        let g = NavGraphBuilder::new().build().unwrap();
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.lane_count(), 0);
        assert!(g.is_empty());
        assert!(g.bounds().is_none());
        assert!(g.nearest_vertex(Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn csr_degrees() {
        let (g, [v0, v1, v2, v3, v4]) = super::helpers::grid();
        assert_eq!(g.lane_count(), 10);
        assert_eq!(g.out_degree(v0), 2);
        assert_eq!(g.out_degree(v1), 2);
        assert_eq!(g.out_degree(v2), 2);
        assert_eq!(g.out_degree(v3), 2);
        assert_eq!(g.out_degree(v4), 2);
        for l in g.out_lanes(v0) {
            assert_eq!(g.lane_from[l.index()], v0);
        }
    }

    #[test]
    fn out_lanes_keep_declaration_order() {
        let (g, [v0, v1, _, v3, _]) = super::helpers::grid();
        let targets: Vec<VertexId> = g.out_lanes(v0).map(|l| g.lane_to[l.index()]).collect();
        assert_eq!(targets, vec![v1, v3]);
    }

    #[test]
    fn directed_only_lane() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point::new(0.0, 0.0), "a", false);
        let c = b.add_vertex(Point::new(1.0, 0.0), "c", false);
        b.add_lane(a, c, 0.5);
        let g = b.build().unwrap();
        assert_eq!(g.lane_between(a, c).unwrap().map(|l| g.endpoints(l)), Some((a, c)));
        assert_eq!(g.lane_between(c, a).unwrap(), None);
        assert_eq!(g.lane_speed_limit[0], 0.5);
    }

    #[test]
    fn duplicate_lane_resolves_to_first() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point::new(0.0, 0.0), "a", false);
        let c = b.add_vertex(Point::new(1.0, 0.0), "c", false);
        b.add_lane(a, c, 1.0);
        b.add_lane(a, c, 2.0);
        let g = b.build().unwrap();
        let lane = g.lane_between(a, c).unwrap().unwrap();
        assert_eq!(g.lane_speed_limit[lane.index()], 1.0);
    }

    #[test]
    fn lane_to_missing_vertex_rejected() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point::new(0.0, 0.0), "a", false);
        b.add_lane(a, VertexId(9), 0.0);
        assert!(matches!(b.build(), Err(GraphError::VertexNotFound(VertexId(9)))));
    }

    #[test]
    fn vertex_accessors_check_range() {
        let (g, [_, _, v2, _, _]) = super::helpers::grid();
        assert!(g.is_charger(v2).unwrap());
        assert_eq!(g.name(v2).unwrap(), "v2");
        assert_eq!(g.position(v2).unwrap(), Point::new(2.0, 0.0));
        assert!(matches!(g.position(VertexId(5)), Err(GraphError::VertexNotFound(_))));
        assert!(g.lane_between(VertexId(0), VertexId(77)).is_err());
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let (g, _) = super::helpers::grid();
        let b = g.bounds().unwrap();
        assert_eq!(b.min, Point::new(0.0, 0.0));
        assert_eq!(b.max, Point::new(2.0, 1.0));
        assert_eq!(b.width(), 2.0);
        assert_eq!(b.height(), 1.0);
    }
}

// ── Spatial queries ───────────────────────────────────────────────────────────

#[cfg(test)]
mod spatial {
    use fleet_core::Point;

    #[test]
    fn nearest_vertex() {
        let (g, [_, _, v2, _, _]) = super::helpers::grid();
        assert_eq!(g.nearest_vertex(Point::new(2.1, -0.1)), Some(v2));
    }

    #[test]
    fn vertex_near_respects_tolerance() {
        let (g, [v0, ..]) = super::helpers::grid();
        assert_eq!(g.vertex_near(Point::new(0.1, 0.0), 0.2), Some(v0));
        assert_eq!(g.vertex_near(Point::new(0.5, 0.5), 0.2), None);
        // Boundary is inclusive.
        assert_eq!(g.vertex_near(Point::new(0.25, 0.0), 0.25), Some(v0));
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use std::collections::HashSet;

    use fleet_core::{Point, VertexId};
    use crate::{BfsRouter, GraphError, NavGraphBuilder, Router, shortest_path_avoiding};

    #[test]
    fn same_vertex_is_trivial_path() {
        let (g, [v0, ..]) = super::helpers::grid();
        let p = BfsRouter.route(&g, v0, v0).unwrap().unwrap();
        assert_eq!(p.vertices, vec![v0]);
        assert_eq!(p.hops().count(), 0);
    }

    #[test]
    fn minimum_hops() {
        let (g, [v0, _, _, v3, v4]) = super::helpers::grid();
        let p = BfsRouter.route(&g, v0, v4).unwrap().unwrap();
        assert_eq!(p.vertices, vec![v0, v3, v4]);
        assert_eq!(p.hops().collect::<Vec<_>>(), vec![(v0, v3), (v3, v4)]);
    }

    #[test]
    fn ties_follow_declaration_order() {
        // Diamond 0 → {1, 2} → 3, lane to 2 declared first.
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point::new(0.0, 0.0), "a", false);
        let l = b.add_vertex(Point::new(1.0, 1.0), "l", false);
        let r = b.add_vertex(Point::new(1.0, -1.0), "r", false);
        let z = b.add_vertex(Point::new(2.0, 0.0), "z", false);
        b.add_lane(a, r, 0.0);
        b.add_lane(a, l, 0.0);
        b.add_lane(l, z, 0.0);
        b.add_lane(r, z, 0.0);
        let g = b.build().unwrap();
        let p = BfsRouter.route(&g, a, z).unwrap().unwrap();
        assert_eq!(p.vertices, vec![a, r, z]);
    }

    #[test]
    fn ignores_speed_limits() {
        // Two hops at speed 0.1 beat three hops at speed 100.
        let mut b = NavGraphBuilder::new();
        let v: Vec<VertexId> = (0..4)
            .map(|i| b.add_vertex(Point::new(i as f32, 0.0), format!("v{i}"), false))
            .collect();
        b.add_lane(v[0], v[1], 100.0);
        b.add_lane(v[1], v[2], 100.0);
        b.add_lane(v[2], v[3], 100.0);
        b.add_lane(v[0], v[2], 0.1);
        let g = b.build().unwrap();
        let p = BfsRouter.route(&g, v[0], v[3]).unwrap().unwrap();
        assert_eq!(p.vertices, vec![v[0], v[2], v[3]]);
    }

    #[test]
    fn one_way_unreachable_is_none() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point::new(0.0, 0.0), "a", false);
        let c = b.add_vertex(Point::new(1.0, 0.0), "c", false);
        b.add_lane(a, c, 0.0);
        let g = b.build().unwrap();
        assert!(BfsRouter.route(&g, a, c).unwrap().is_some());
        assert!(BfsRouter.route(&g, c, a).unwrap().is_none());
    }

    #[test]
    fn unknown_vertex_is_error() {
        let (g, [v0, ..]) = super::helpers::grid();
        assert!(matches!(
            BfsRouter.route(&g, v0, VertexId(40)),
            Err(GraphError::VertexNotFound(VertexId(40)))
        ));
    }

    #[test]
    fn hops_enumerate_lanes() {
        let (g, [v0, v1, v2]) = super::helpers::line();
        let p = BfsRouter.route(&g, v0, v2).unwrap().unwrap();
        let hops: Vec<_> = p.hops().collect();
        assert_eq!(hops, vec![(v0, v1), (v1, v2)]);
    }

    #[test]
    fn avoiding_detours() {
        let (g, [v0, v1, v2, v3, v4]) = super::helpers::grid();
        let avoid: HashSet<VertexId> = [v3].into_iter().collect();
        let p = shortest_path_avoiding(&g, v0, v4, &avoid).unwrap().unwrap();
        assert_eq!(p.vertices, vec![v0, v1, v2, v4]);
    }

    #[test]
    fn avoiding_endpoint_means_no_path() {
        let (g, [v0, _, _, _, v4]) = super::helpers::grid();
        let avoid: HashSet<VertexId> = [v4].into_iter().collect();
        assert!(shortest_path_avoiding(&g, v0, v4, &avoid).unwrap().is_none());
    }

    #[test]
    fn avoiding_cut_set_means_no_path() {
        let (g, [v0, v1, _, v3, v4]) = super::helpers::grid();
        let avoid: HashSet<VertexId> = [v1, v3].into_iter().collect();
        assert!(shortest_path_avoiding(&g, v0, v4, &avoid).unwrap().is_none());
    }
}

// ── Reservation store ─────────────────────────────────────────────────────────

#[cfg(test)]
mod reservation {
    use fleet_core::{AgentId, VertexId};
    use crate::{GraphError, ReservationStore};

    fn store() -> (ReservationStore, [VertexId; 3]) {
        let (g, v) = super::helpers::line();
        (ReservationStore::new(g), v)
    }

    #[test]
    fn vertex_is_exclusive() {
        let (mut s, [v0, ..]) = store();
        assert!(s.reserve_vertex(v0, AgentId(0)).unwrap());
        assert!(!s.reserve_vertex(v0, AgentId(1)).unwrap());
        // Re-reserving by the holder also reports failure.
        assert!(!s.reserve_vertex(v0, AgentId(0)).unwrap());
        assert_eq!(s.vertex_occupant(v0).unwrap(), Some(AgentId(0)));
    }

    #[test]
    fn release_by_non_owner_is_noop() {
        let (mut s, [v0, v1, _]) = store();
        s.reserve_vertex(v0, AgentId(0)).unwrap();
        s.reserve_lane(v0, v1, AgentId(0)).unwrap();
        let before_v = s.vertex_occupancy().to_vec();
        let before_l = s.lane_occupancy().to_vec();

        assert!(!s.release_vertex(v0, AgentId(1)).unwrap());
        assert!(!s.release_lane(v0, v1, AgentId(1)).unwrap());

        assert_eq!(s.vertex_occupancy(), before_v.as_slice());
        assert_eq!(s.lane_occupancy(), before_l.as_slice());
    }

    #[test]
    fn release_free_vertex_is_noop() {
        let (mut s, [v0, ..]) = store();
        assert!(!s.release_vertex(v0, AgentId(0)).unwrap());
        assert_eq!(s.occupied_vertex_count(), 0);
    }

    #[test]
    fn lane_reserve_and_release() {
        let (mut s, [v0, v1, _]) = store();
        assert!(s.reserve_lane(v0, v1, AgentId(3)).unwrap());
        assert!(!s.reserve_lane(v0, v1, AgentId(4)).unwrap());
        // Opposite direction is a different lane.
        assert!(s.reserve_lane(v1, v0, AgentId(4)).unwrap());
        assert_eq!(s.occupied_lane_count(), 2);
        assert!(s.release_lane(v0, v1, AgentId(3)).unwrap());
        assert_eq!(s.lane_occupant(v0, v1).unwrap(), None);
    }

    #[test]
    fn lane_reservation_ignores_destination_vertex() {
        let (mut s, [v0, v1, _]) = store();
        s.reserve_vertex(v1, AgentId(9)).unwrap();
        assert!(s.reserve_lane(v0, v1, AgentId(0)).unwrap());
    }

    #[test]
    fn missing_lane_fails_without_error() {
        let (mut s, [v0, _, v2]) = store();
        assert!(!s.reserve_lane(v0, v2, AgentId(0)).unwrap());
        assert!(!s.release_lane(v0, v2, AgentId(0)).unwrap());
        assert!(matches!(
            s.lane_occupant(v0, v2),
            Err(GraphError::LaneNotFound { .. })
        ));
    }

    #[test]
    fn blocked_lane_refuses_reservation() {
        let (mut s, [v0, v1, _]) = store();
        s.set_lane_blocked(v0, v1, true).unwrap();
        assert!(s.is_lane_blocked(v0, v1).unwrap());
        assert!(!s.reserve_lane(v0, v1, AgentId(0)).unwrap());
        s.set_lane_blocked(v0, v1, false).unwrap();
        assert!(s.reserve_lane(v0, v1, AgentId(0)).unwrap());
    }

    #[test]
    fn revoke_clears_and_reports_owner() {
        let (mut s, [v0, v1, _]) = store();
        s.reserve_lane(v0, v1, AgentId(2)).unwrap();
        assert_eq!(s.revoke_lane(v0, v1).unwrap(), Some(AgentId(2)));
        assert_eq!(s.lane_occupant(v0, v1).unwrap(), None);
        assert_eq!(s.revoke_lane(v0, v1).unwrap(), None);
    }

    #[test]
    fn out_of_range_ids_are_errors() {
        let (mut s, _) = store();
        let bad = VertexId(3);
        assert!(matches!(s.reserve_vertex(bad, AgentId(0)), Err(GraphError::VertexNotFound(_))));
        assert!(s.release_vertex(bad, AgentId(0)).is_err());
        assert!(s.reserve_lane(VertexId(0), bad, AgentId(0)).is_err());
        assert!(s.vertex_occupant(bad).is_err());
    }

    #[test]
    fn shortest_path_through_store() {
        let (s, [v0, v1, v2]) = store();
        let p = s.shortest_path(v0, v2).unwrap().unwrap();
        assert_eq!(p.vertices, vec![v0, v1, v2]);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use fleet_core::{Point, VertexId};
    use crate::{GraphError, load_graph_reader, load_graph_str, load_level_str};

    const DOC: &str = r#"{
        "building_name": "test",
        "levels": {
            "upper": {
                "vertices": [[0, 0, {"name": "dock"}], [5.5, 1, {"is_charger": true, "extra": 3}]],
                "lanes": [[0, 1, {"speed_limit": 2.0}], [1, 0, {}]]
            },
            "alpha": {
                "vertices": [[1, 1, {}]],
                "lanes": []
            }
        }
    }"#;

    #[test]
    fn first_level_in_document_order() {
        let g = load_graph_str(DOC).unwrap();
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.lane_count(), 2);
        assert_eq!(g.name(VertexId(0)).unwrap(), "dock");
        assert_eq!(g.name(VertexId(1)).unwrap(), "v1");
        assert!(g.is_charger(VertexId(1)).unwrap());
        assert!(!g.is_charger(VertexId(0)).unwrap());
        assert_eq!(g.position(VertexId(1)).unwrap(), Point::new(5.5, 1.0));
        let lane = g.lane_between(VertexId(1), VertexId(0)).unwrap().unwrap();
        assert_eq!(g.lane_speed_limit[lane.index()], 0.0);
    }

    #[test]
    fn named_level() {
        let g = load_level_str(DOC, "alpha").unwrap();
        assert_eq!(g.vertex_count(), 1);
        assert!(matches!(load_level_str(DOC, "cellar"), Err(GraphError::LevelNotFound(_))));
    }

    #[test]
    fn reader_source() {
        let g = load_graph_reader(Cursor::new(DOC.as_bytes())).unwrap();
        assert_eq!(g.vertex_count(), 2);
    }

    #[test]
    fn missing_levels_key() {
        assert!(matches!(load_graph_str(r#"{"floors": {}}"#), Err(GraphError::Json(_))));
    }

    #[test]
    fn empty_levels() {
        assert!(matches!(load_graph_str(r#"{"levels": {}}"#), Err(GraphError::NoLevels)));
    }

    #[test]
    fn level_without_lanes_key() {
        let doc = r#"{"levels": {"L": {"vertices": []}}}"#;
        assert!(matches!(load_graph_str(doc), Err(GraphError::MalformedLevel { .. })));
    }

    #[test]
    fn short_vertex_tuple() {
        let doc = r#"{"levels": {"L": {"vertices": [[0, 0, {}], [1, 2]], "lanes": []}}}"#;
        match load_graph_str(doc) {
            Err(GraphError::MalformedVertex { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected MalformedVertex, got {:?}", other.err()),
        }
    }

    #[test]
    fn lane_to_unknown_vertex() {
        let doc = r#"{"levels": {"L": {"vertices": [[0, 0, {}]], "lanes": [[0, 4, {}]]}}}"#;
        match load_graph_str(doc) {
            Err(GraphError::MalformedLane { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected MalformedLane, got {:?}", other.err()),
        }
    }

    #[test]
    fn negative_lane_endpoint() {
        let doc = r#"{"levels": {"L": {"vertices": [[0, 0, {}]], "lanes": [[-1, 0, {}]]}}}"#;
        assert!(matches!(load_graph_str(doc), Err(GraphError::MalformedLane { .. })));
    }

    #[test]
    fn not_json() {
        assert!(matches!(load_graph_str("levels:"), Err(GraphError::Json(_))));
    }
}
