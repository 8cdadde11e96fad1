//! Robot identity colours.
//!
//! Colours are assigned round-robin from a fixed palette of twelve visually
//! distinct entries: robot `n` gets `PALETTE[n % 12]`.

use crate::AgentId;

/// An RGB identity token handed to renderers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotColour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RobotColour {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Palette entry for `agent`.
    pub fn for_agent(agent: AgentId) -> Self {
        PALETTE[agent.index() % PALETTE.len()]
    }

    /// `#rrggbb` form.
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub const PALETTE: [RobotColour; 12] = [
    RobotColour::rgb(255, 0, 0),     // red
    RobotColour::rgb(0, 255, 0),     // green
    RobotColour::rgb(0, 0, 255),     // blue
    RobotColour::rgb(255, 255, 0),   // yellow
    RobotColour::rgb(255, 0, 255),   // magenta
    RobotColour::rgb(0, 255, 255),   // cyan
    RobotColour::rgb(255, 128, 0),   // orange
    RobotColour::rgb(128, 0, 128),   // purple
    RobotColour::rgb(0, 128, 0),     // dark green
    RobotColour::rgb(128, 128, 0),   // olive
    RobotColour::rgb(128, 0, 0),     // maroon
    RobotColour::rgb(0, 128, 128),   // teal
];
