use serde::{Deserialize, Serialize};

use crate::common::config::FocusSettings;
use crate::layout_engine::{CardinalOrDfsDirection, DfsDirection, Direction, FocusError};
use crate::sys::window_server::WindowId;

/// Where a boundary is considered hit.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
    strum_macros::EnumString
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Boundaries {
    /// The edge of the current workspace.
    #[default]
    Workspace,
    /// The outer edge of the union of all monitors.
    AllMonitorsOuterFrame,
}

/// What to do once a boundary is hit.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
    strum_macros::EnumString
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BoundariesAction {
    #[default]
    Stop,
    Fail,
    WrapAroundTheWorkspace,
    WrapAroundAllMonitors,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    Direction(Direction),
    WindowId(WindowId),
    DfsIndex(usize),
    DfsRelative(DfsDirection),
}

impl From<CardinalOrDfsDirection> for FocusTarget {
    fn from(direction: CardinalOrDfsDirection) -> Self {
        match direction {
            CardinalOrDfsDirection::Cardinal(direction) => FocusTarget::Direction(direction),
            CardinalOrDfsDirection::Dfs(direction) => FocusTarget::DfsRelative(direction),
        }
    }
}

/// One focus command.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FocusRequest {
    pub target: FocusTarget,
    pub boundaries: Boundaries,
    pub boundaries_action: BoundariesAction,
    pub floating_as_tiling: bool,
}

impl FocusRequest {
    pub fn new(target: FocusTarget) -> Self {
        FocusRequest {
            target,
            boundaries: Boundaries::default(),
            boundaries_action: BoundariesAction::default(),
            floating_as_tiling: true,
        }
    }

    /// A request using the configured defaults.
    pub fn with_settings(target: FocusTarget, settings: &FocusSettings) -> Self {
        FocusRequest {
            target,
            boundaries: settings.boundaries,
            boundaries_action: settings.boundaries_action,
            floating_as_tiling: settings.floating_as_tiling,
        }
    }

    pub fn boundaries(mut self, boundaries: Boundaries) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn boundaries_action(mut self, action: BoundariesAction) -> Self {
        self.boundaries_action = action;
        self
    }

    pub fn floating_as_tiling(mut self, enabled: bool) -> Self {
        self.floating_as_tiling = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), FocusError> {
        validate_boundaries(self.boundaries, self.boundaries_action)
    }
}

pub fn validate_boundaries(
    boundaries: Boundaries,
    action: BoundariesAction,
) -> Result<(), FocusError> {
    if boundaries == Boundaries::Workspace && action == BoundariesAction::WrapAroundAllMonitors {
        return Err(FocusError::InvalidBoundaries { boundaries, action });
    }
    Ok(())
}
