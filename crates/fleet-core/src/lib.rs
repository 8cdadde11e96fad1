//! `fleet-core` — foundational types for the fleet traffic simulator.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It has no
//! `fleet-*` dependencies and a single required external one (`thiserror`),
//! plus optional `serde`.
//!
//! # What lives here
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`ids`]    | `AgentId`, `VertexId`, `LaneId`                        |
//! | [`geo`]    | `Point` (planar), distance, fixed-step motion          |
//! | [`time`]   | `Tick`, `SimClock`, `SimConfig`, `ArrivalPolicy`       |
//! | [`colour`] | `RobotColour` identity palette                         |
//! | [`error`]  | `FleetError`, `FleetResult`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod colour;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use colour::RobotColour;
pub use error::{FleetError, FleetResult};
pub use geo::{Point, Step};
pub use ids::{AgentId, LaneId, VertexId};
pub use time::{ArrivalPolicy, SimClock, SimConfig, Tick};
