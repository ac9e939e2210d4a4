use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::kicks::Direction;
use finder_core::{ParseError, Piece};

/// How a piece may travel from spawn to its resting place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropType {
    /// Pick a rotation and column above the stack, then drop straight down.
    Harddrop,
    /// Shift, rotate with kicks and move down freely before locking.
    #[default]
    Softdrop,
    /// Soft drop for T, hard drop for everything else.
    #[serde(rename = "tsoftdrop")]
    SoftdropTOnly,
    /// Soft drop with 180 turns.
    #[serde(rename = "180")]
    Rotation180,
    /// Soft drop, and every T must lock with a spin.
    #[serde(rename = "anytspin")]
    AnyTSpin,
    /// Soft drop, and every T must be a full T-spin clearing a line or more.
    #[serde(rename = "tss")]
    TSpinSingle,
    #[serde(rename = "tsd")]
    TSpinDouble,
    #[serde(rename = "tst")]
    TSpinTriple,
}

impl DropType {
    pub const ALL: [DropType; 8] = [
        DropType::Harddrop,
        DropType::Softdrop,
        DropType::SoftdropTOnly,
        DropType::Rotation180,
        DropType::AnyTSpin,
        DropType::TSpinSingle,
        DropType::TSpinDouble,
        DropType::TSpinTriple,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DropType::Harddrop => "harddrop",
            DropType::Softdrop => "softdrop",
            DropType::SoftdropTOnly => "tsoftdrop",
            DropType::Rotation180 => "180",
            DropType::AnyTSpin => "anytspin",
            DropType::TSpinSingle => "tss",
            DropType::TSpinDouble => "tsd",
            DropType::TSpinTriple => "tst",
        }
    }

    /// Turns `piece` may make while soft dropping, or `None` when it must
    /// hard drop.
    pub fn turns(self, piece: Piece) -> Option<&'static [Direction]> {
        match self {
            DropType::Harddrop => None,
            DropType::SoftdropTOnly if piece != Piece::T => None,
            DropType::Rotation180 => Some(&Direction::ALL),
            _ => Some(&Direction::QUARTER),
        }
    }

    /// Lines every T must clear with a spin, when T placements are constrained.
    pub fn required_tspin(self) -> Option<u32> {
        match self {
            DropType::AnyTSpin => Some(0),
            DropType::TSpinSingle => Some(1),
            DropType::TSpinDouble => Some(2),
            DropType::TSpinTriple => Some(3),
            _ => None,
        }
    }
}

impl FromStr for DropType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let drop = match s.trim().to_ascii_lowercase().as_str() {
            "soft" | "softdrop" => DropType::Softdrop,
            "hard" | "harddrop" => DropType::Harddrop,
            "180" => DropType::Rotation180,
            "tsoft" | "tsoftdrop" | "t-soft" | "t-softdrop" | "t_soft" | "t_softdrop" => {
                DropType::SoftdropTOnly
            }
            "any" | "any-tspin" | "anytspin" | "tspin0" => DropType::AnyTSpin,
            "tss" | "tspin1" => DropType::TSpinSingle,
            "tsd" | "tspin2" => DropType::TSpinDouble,
            "tst" | "tspin3" => DropType::TSpinTriple,
            _ => {
                return Err(ParseError::UnknownName {
                    kind: "drop type",
                    name: s.to_string(),
                })
            }
        };
        Ok(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("soft".parse::<DropType>(), Ok(DropType::Softdrop));
        assert_eq!(" HardDrop ".parse::<DropType>(), Ok(DropType::Harddrop));
        assert_eq!("t-softdrop".parse::<DropType>(), Ok(DropType::SoftdropTOnly));
        assert_eq!("tspin2".parse::<DropType>(), Ok(DropType::TSpinDouble));
        assert_eq!("any".parse::<DropType>(), Ok(DropType::AnyTSpin));
        assert!("sonic".parse::<DropType>().is_err());
    }

    #[test]
    fn test_names_round_trip() {
        for drop in DropType::ALL {
            assert_eq!(drop.name().parse::<DropType>(), Ok(drop));
        }
    }

    #[test]
    fn test_turns() {
        assert_eq!(DropType::Harddrop.turns(Piece::T), None);
        assert_eq!(DropType::SoftdropTOnly.turns(Piece::S), None);
        assert_eq!(DropType::SoftdropTOnly.turns(Piece::T), Some(&Direction::QUARTER[..]));
        assert_eq!(DropType::Rotation180.turns(Piece::I).map(<[_]>::len), Some(3));
        assert_eq!(DropType::TSpinDouble.required_tspin(), Some(2));
        assert_eq!(DropType::Softdrop.required_tspin(), None);
    }
}
