//! `fleet-robot` — the per-robot motion state machine.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                         |
//! |-----------|------------------------------------------------------------------|
//! | [`state`] | `RobotState`, `Transition`, `StatusEvent`, `Assignment`          |
//! | [`robot`] | `Robot` — path following by lane and vertex reservation          |
//! | [`error`] | `RobotError`, `RobotResult<T>`                                   |
//!
//! # Movement model (reserve, interpolate, arrive)
//!
//! A robot holds exactly one resource at a time, a vertex while parked and a
//! lane while travelling:
//!
//! 1. To leave a vertex it reserves the lane to the next path vertex.  On
//!    success it releases the vertex and starts `Moving`; on failure it
//!    `Waiting`s and retries every tick.
//! 2. While `Moving` it advances a fixed distance per tick toward the lane's
//!    end.  The occupancy of the vertex ahead is not looked at before
//!    departure.
//! 3. When less than one step remains it arrives: it reserves the vertex,
//!    releases the lane and becomes `Idle` (or `Completed` at the end of
//!    the path).  Under [`ArrivalPolicy::Gated`] a failed vertex reservation
//!    parks it at the lane end in `Waiting` instead; under
//!    [`ArrivalPolicy::Unchecked`] the failure is ignored.
//!
//! [`ArrivalPolicy::Gated`]: fleet_core::ArrivalPolicy::Gated
//! [`ArrivalPolicy::Unchecked`]: fleet_core::ArrivalPolicy::Unchecked

pub mod error;
pub mod robot;
pub mod state;


pub use error::{RobotError, RobotResult};
pub use robot::Robot;
pub use state::{Assignment, RobotState, StatusEvent, Transition};
