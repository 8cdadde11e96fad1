//! Fluent builder for constructing a [`Sim`].

use fleet_core::{SimConfig, VertexId};
use fleet_graph::{BfsRouter, NavGraph, ReservationStore, Router};

use crate::traffic::{ConflictPolicy, FirstWaitingOverride};
use crate::{Sim, SimResult};

/// Fluent builder for [`Sim<R, P>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                  |
/// |------------------------|--------------------------|
/// | `.router(r)`           | [`BfsRouter`]            |
/// | `.conflict_policy(p)`  | [`FirstWaitingOverride`] |
/// | `.blocked_lanes(v)`    | No lane blocked          |
///
/// # Example
///
/// ```rust,ignore
/// let graph = fleet_graph::load_graph_path(path)?;
/// let mut sim = SimBuilder::new(SimConfig::default(), graph).build()?;
/// let robot = sim.spawn(VertexId(0), &mut NoopObserver)?;
/// sim.run(&mut LogObserver::new(&sim.config))?;
/// ```
pub struct SimBuilder<R: Router = BfsRouter, P: ConflictPolicy = FirstWaitingOverride> {
    config:  SimConfig,
    graph:   NavGraph,
    router:  R,
    policy:  P,
    blocked: Vec<(VertexId, VertexId)>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, graph: NavGraph) -> Self {
        Self {
            config,
            graph,
            router:  BfsRouter,
            policy:  FirstWaitingOverride,
            blocked: Vec::new(),
        }
    }
}

impl<R: Router, P: ConflictPolicy> SimBuilder<R, P> {
    /// Plan tasks with `router` instead of breadth-first search.
    pub fn router<R2: Router>(self, router: R2) -> SimBuilder<R2, P> {
        SimBuilder {
            config:  self.config,
            graph:   self.graph,
            router,
            policy:  self.policy,
            blocked: self.blocked,
        }
    }

    /// Replace the deadlock override policy.
    pub fn conflict_policy<P2: ConflictPolicy>(self, policy: P2) -> SimBuilder<R, P2> {
        SimBuilder {
            config:  self.config,
            graph:   self.graph,
            router:  self.router,
            policy,
            blocked: self.blocked,
        }
    }

    /// Lanes to mark manually blocked before the first tick.
    pub fn blocked_lanes(mut self, lanes: Vec<(VertexId, VertexId)>) -> Self {
        self.blocked = lanes;
        self
    }

    /// Validate the configuration, wrap the graph in a fresh reservation
    /// store and return a ready-to-run [`Sim`].
    ///
    /// Fails if the config is invalid or a blocked lane does not exist.
    pub fn build(self) -> SimResult<Sim<R, P>> {
        self.config.validate()?;

        let mut store = ReservationStore::new(self.graph);
        for (from, to) in self.blocked {
            store.set_lane_blocked(from, to, true)?;
        }
        log::info!(
            "fleet sim ready: {} vertices, {} lanes, {} blocked",
            store.graph().vertex_count(),
            store.graph().lane_count(),
            store.lane_blocks().iter().filter(|&&b| b).count()
        );

        Ok(Sim::from_parts(self.config, store, self.router, self.policy))
    }
}
