//! Simulation time model and run configuration.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  Each tick also carries
//! a nominal `tick_delta_secs` (the frame time a real-time driver would pass
//! to `update`), used only for display:
//!
//!   elapsed = tick * tick_delta_secs
//!
//! Motion never scales by the delta: robots advance a fixed `move_speed` per
//! tick, so path-completion timing is a pure function of the tick count.

use std::fmt;

use crate::{FleetError, FleetResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and maps it to nominal elapsed seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Nominal seconds represented by one tick.
    pub tick_delta_secs: f32,
    /// The current tick — advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_delta_secs: f32) -> Self {
        Self { tick_delta_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Nominal seconds elapsed since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.tick_delta_secs as f64
    }

    /// Break elapsed time into (hours, minutes, seconds).
    pub fn elapsed_hms(&self) -> (u64, u32, f32) {
        let total = self.elapsed_secs().max(0.0);
        let hours = (total / 3_600.0) as u64;
        let minutes = ((total % 3_600.0) / 60.0) as u32;
        let seconds = (total % 60.0) as f32;
        (hours, minutes, seconds)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.elapsed_hms();
        write!(f, "{} ({}:{:02}:{:04.1})", self.current_tick, h, m, s)
    }
}

// ── ArrivalPolicy ─────────────────────────────────────────────────────────────

/// What a robot does when it reaches the end of a lane and the vertex there
/// is held by someone else.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ArrivalPolicy {
    /// Arrival waits for the vertex reservation.  The robot keeps its lane,
    /// parks at the lane end in `Waiting` and retries every tick.
    #[default]
    Gated,
    /// The reservation result is ignored and the robot arrives regardless.
    /// Two robots may then believe they stand on the same vertex while the
    /// store records only the first.
    Unchecked,
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically built in code by the application; with the `serde` feature it
/// can also be read from a JSON/TOML file.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Distance a moving robot covers per tick, in graph units.
    pub move_speed: f32,

    /// Pick radius for `select_nearest`, in graph units.
    pub select_tolerance: f32,

    /// Nominal frame time handed to `update`.  Display only.
    pub tick_delta_secs: f32,

    /// Ticks executed by `Sim::run`.
    pub total_ticks: u64,

    /// Emit a snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,

    /// Behaviour when the vertex at the end of a lane is occupied.
    pub arrival_policy: ArrivalPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            move_speed:            0.1,
            select_tolerance:      0.5,
            tick_delta_secs:       1.0 / 60.0,
            total_ticks:           600,
            output_interval_ticks: 1,
            arrival_policy:        ArrivalPolicy::Gated,
        }
    }
}

impl SimConfig {
    /// The tick at which `Sim::run` stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_delta_secs)
    }

    /// Reject values that would stall or corrupt motion.
    pub fn validate(&self) -> FleetResult<()> {
        if !(self.move_speed.is_finite() && self.move_speed > 0.0) {
            return Err(FleetError::Config(format!(
                "move_speed must be positive, got {}",
                self.move_speed
            )));
        }
        if !(self.select_tolerance.is_finite() && self.select_tolerance >= 0.0) {
            return Err(FleetError::Config(format!(
                "select_tolerance must be non-negative, got {}",
                self.select_tolerance
            )));
        }
        if !(self.tick_delta_secs.is_finite() && self.tick_delta_secs >= 0.0) {
            return Err(FleetError::Config(format!(
                "tick_delta_secs must be non-negative, got {}",
                self.tick_delta_secs
            )));
        }
        Ok(())
    }
}
