use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Up | Direction::Down => Orientation::Vertical,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Right and down move towards higher child indices.
    pub fn is_positive(self) -> bool { matches!(self, Direction::Right | Direction::Down) }

    pub fn focus_offset(self) -> isize { if self.is_positive() { 1 } else { -1 } }
}

/// Relative step through the depth-first leaf order of a workspace.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DfsDirection {
    DfsNext,
    DfsPrev,
}

impl DfsDirection {
    pub fn is_positive(self) -> bool { self == DfsDirection::DfsNext }

    pub fn opposite(self) -> DfsDirection {
        match self {
            DfsDirection::DfsNext => DfsDirection::DfsPrev,
            DfsDirection::DfsPrev => DfsDirection::DfsNext,
        }
    }

    pub fn focus_offset(self) -> isize { if self.is_positive() { 1 } else { -1 } }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardinalOrDfsDirection {
    Cardinal(Direction),
    Dfs(DfsDirection),
}

impl CardinalOrDfsDirection {
    pub const UNION_LITERAL: &'static str = "(left|down|up|right|dfs-next|dfs-prev)";
}

impl std::fmt::Display for CardinalOrDfsDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardinalOrDfsDirection::Cardinal(direction) => std::fmt::Display::fmt(direction, f),
            CardinalOrDfsDirection::Dfs(direction) => std::fmt::Display::fmt(direction, f),
        }
    }
}

impl std::str::FromStr for CardinalOrDfsDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(direction) = s.parse::<Direction>() {
            return Ok(CardinalOrDfsDirection::Cardinal(direction));
        }
        if let Ok(direction) = s.parse::<DfsDirection>() {
            return Ok(CardinalOrDfsDirection::Dfs(direction));
        }
        Err(format!("Can't parse '{s}'. Possible values: {}", Self::UNION_LITERAL))
    }
}
