//! Crop mode selection for the 9:16 conversion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy for picking the horizontal crop window.
///
/// All modes currently resolve to the same centered crop; `Smart` is a
/// placeholder for face-aware window selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CropMode {
    #[default]
    Center,
    Top,
    Smart,
}

impl CropMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropMode::Center => "center",
            CropMode::Top => "top",
            CropMode::Smart => "smart",
        }
    }
}

impl fmt::Display for CropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CropMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(CropMode::Center),
            "top" => Ok(CropMode::Top),
            "smart" => Ok(CropMode::Smart),
            other => Err(format!("unknown crop mode: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for mode in [CropMode::Center, CropMode::Top, CropMode::Smart] {
            assert_eq!(mode.as_str().parse::<CropMode>().unwrap(), mode);
        }
        assert!("diagonal".parse::<CropMode>().is_err());
    }
}
