use crate::race_interface::{DataPoint, LonLat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Port,
    Starboard,
}

/// Point-of-sail classification of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Board {
    PreStart,
    Upwind(Side),
    Downwind(Side),
}

impl Board {
    /// Classifies a true wind angle; `-90 <= twa < 0` is upwind port,
    /// `0 <= twa <= 90` upwind starboard.
    pub fn from_twa(twa: f64) -> Self {
        if (-90.0..0.0).contains(&twa) {
            Board::Upwind(Side::Port)
        } else if twa < -90.0 {
            Board::Downwind(Side::Port)
        } else if twa > 90.0 {
            Board::Downwind(Side::Starboard)
        } else {
            Board::Upwind(Side::Starboard)
        }
    }

    pub fn is_upwind(&self) -> bool {
        matches!(self, Board::Upwind(_))
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Board::PreStart => None,
            Board::Upwind(side) | Board::Downwind(side) => Some(*side),
        }
    }

    /// Leading letter of the board code: `U`, `D` or `P`.
    pub fn point_of_sail(&self) -> char {
        match self {
            Board::PreStart => 'P',
            Board::Upwind(_) => 'U',
            Board::Downwind(_) => 'D',
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Board::PreStart => "PS",
            Board::Upwind(Side::Port) => "U-P",
            Board::Upwind(Side::Starboard) => "U-S",
            Board::Downwind(Side::Port) => "D-P",
            Board::Downwind(Side::Starboard) => "D-S",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Board {
    type Err = String;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "PS" => Ok(Board::PreStart),
            "U-P" => Ok(Board::Upwind(Side::Port)),
            "U-S" => Ok(Board::Upwind(Side::Starboard)),
            "D-P" => Ok(Board::Downwind(Side::Port)),
            "D-S" => Ok(Board::Downwind(Side::Starboard)),
            other => Err(format!("unknown board '{}'", other)),
        }
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.code().to_string()
    }
}

impl TryFrom<String> for Board {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

/// A maximal run of samples sharing one board. Times are epoch ms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    pub board: Board,
    pub start: i64,
    pub end: i64,
    /// False for the trailing run, whose end is just the last sample seen.
    pub closed: bool,
}

/// Navigational leg boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub leg: usize,
    pub start: i64,
}

/// Key instants of a tack, epoch ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TackTiming {
    pub center: i64,
    pub start: i64,
    pub end: i64,
    pub recovered: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Full,
    Reduced,
}

/// One analyzed tack.
///
/// Speeds are knots, angles degrees and `loss` feet; a negative loss is
/// distance given up against holding the entry VMG.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tack {
    pub time: i64,
    pub board: Board,
    pub timing: TackTiming,
    pub position: Option<LonLat>,
    pub start_position: Option<LonLat>,
    pub end_position: Option<LonLat>,
    pub entry_speed: Option<f64>,
    pub entry_vmg: Option<f64>,
    pub entry_twa: Option<f64>,
    pub entry_hdg: Option<f64>,
    pub max_twa: Option<f64>,
    pub recovery_twa: Option<f64>,
    pub recovery_hdg: Option<f64>,
    pub tws: Option<f64>,
    pub twd: Option<f64>,
    pub loss: Option<f64>,
    pub data: Vec<DataPoint>,
    pub track: Vec<DataPoint>,
    pub notes: Vec<String>,
    pub confidence: Confidence,
}
